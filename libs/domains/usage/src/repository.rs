use async_trait::async_trait;

use crate::error::UsageResult;
use crate::models::{NewUsageRecord, UsageAggregate, UsageRecord};

/// Repository trait for usage-record persistence.
///
/// Each insert is one transaction; the storage layer serializes concurrent
/// writers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Append one usage record
    async fn insert(&self, record: NewUsageRecord) -> UsageResult<UsageRecord>;

    /// Token sums grouped by (model, batch flag)
    async fn aggregate(&self) -> UsageResult<Vec<UsageAggregate>>;
}
