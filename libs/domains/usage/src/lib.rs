//! Usage Domain
//!
//! Records token statistics for every external model call and derives cost
//! reports from them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ UsageService │  ← validation, cost report, UsageSink impl
//! └──────┬───────┘
//!        │
//! ┌──────▼─────────┐
//! │UsageRepository │  ← data access (trait + Postgres implementation)
//! └──────┬─────────┘
//!        │
//! ┌──────▼───────┐
//! │    Entity    │  ← `responses` table
//! └──────────────┘
//! ```
//!
//! Recording is best-effort: a failed insert is logged and swallowed so cost
//! accounting can never abort the user-facing recommendation flow.

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod pricing;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UsageError, UsageResult};
pub use models::{CostReport, NewUsageRecord, Tier, UsageAggregate, UsageRecord};
pub use postgres::PgUsageRepository;
pub use repository::UsageRepository;
pub use service::UsageService;
