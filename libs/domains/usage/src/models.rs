use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;
use strum::{Display, EnumString};

/// Billing tier of a model call: interactive (regular) vs batch-processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Regular,
    Batch,
}

impl Tier {
    pub fn from_batch(batch: bool) -> Self {
        if batch {
            Tier::Batch
        } else {
            Tier::Regular
        }
    }
}

/// A persisted model-call record.
///
/// Created once per external call and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct UsageRecord {
    pub id: i32,
    pub instructions: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub model: String,
    pub cached_input_tokens: u32,
    pub uncached_input_tokens: u32,
    pub reasoning_output_tokens: u32,
    pub nonreasoning_output_tokens: u32,
    pub batch: bool,
    pub timestamp: DateTime<Utc>,
}

/// Input for recording one model call.
///
/// Token counts are unsigned: non-negativity is guaranteed by construction.
#[derive(Debug, Clone, Default)]
pub struct NewUsageRecord {
    pub instructions: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub model: String,
    pub cached_input_tokens: u32,
    pub uncached_input_tokens: u32,
    pub reasoning_output_tokens: u32,
    pub nonreasoning_output_tokens: u32,
    pub batch: bool,
}

impl From<openai_client::UsageEvent> for NewUsageRecord {
    fn from(event: openai_client::UsageEvent) -> Self {
        Self {
            instructions: event.instructions,
            input: event.input,
            output: event.output,
            model: event.usage.model,
            cached_input_tokens: event.usage.cached_input_tokens,
            uncached_input_tokens: event.usage.uncached_input_tokens,
            reasoning_output_tokens: event.usage.reasoning_output_tokens,
            nonreasoning_output_tokens: event.usage.nonreasoning_output_tokens,
            batch: event.batch,
        }
    }
}

/// Token sums for one (model, batch) group, as returned by the aggregate
/// query.
#[derive(Debug, Clone, FromQueryResult)]
pub struct UsageAggregate {
    pub model: String,
    pub batch: bool,
    pub uncached_input_tokens: i64,
    pub cached_input_tokens: i64,
    pub reasoning_output_tokens: i64,
    pub nonreasoning_output_tokens: i64,
}

/// Costs for one (model family, tier) group, in the report currency.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TierCosts {
    pub uncached_input: f64,
    pub cached_input: f64,
    pub reasoning_output: f64,
    pub nonreasoning_output: f64,
    pub total: f64,
}

/// Per-model cost breakdown across tiers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelCosts {
    pub tiers: BTreeMap<Tier, TierCosts>,
    pub total: f64,
}

/// Read-only cost aggregation over all persisted usage records.
///
/// Unknown model/tier combinations land in `warnings` rather than failing
/// the whole report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CostReport {
    pub models: BTreeMap<String, ModelCosts>,
    pub total: f64,
    pub currency: String,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_display_is_lowercase() {
        assert_eq!(Tier::Regular.to_string(), "regular");
        assert_eq!(Tier::Batch.to_string(), "batch");
    }

    #[test]
    fn tier_from_batch_flag() {
        assert_eq!(Tier::from_batch(false), Tier::Regular);
        assert_eq!(Tier::from_batch(true), Tier::Batch);
    }

    #[test]
    fn usage_event_converts_to_record_input() {
        let event = openai_client::UsageEvent {
            instructions: Some("format".to_string()),
            input: Some("user: hi".to_string()),
            output: Some("hello".to_string()),
            usage: openai_client::TokenUsage {
                model: "gpt-4.1-nano-2025-04-14".to_string(),
                cached_input_tokens: 1,
                uncached_input_tokens: 2,
                reasoning_output_tokens: 3,
                nonreasoning_output_tokens: 4,
            },
            batch: false,
        };

        let record = NewUsageRecord::from(event);
        assert_eq!(record.model, "gpt-4.1-nano-2025-04-14");
        assert_eq!(record.cached_input_tokens, 1);
        assert_eq!(record.uncached_input_tokens, 2);
        assert_eq!(record.reasoning_output_tokens, 3);
        assert_eq!(record.nonreasoning_output_tokens, 4);
        assert!(!record.batch);
    }
}
