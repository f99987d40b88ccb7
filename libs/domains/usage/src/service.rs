use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use openai_client::{UsageEvent, UsageSink};
use tracing::{debug, instrument, warn};

use crate::error::UsageResult;
use crate::models::{CostReport, ModelCosts, NewUsageRecord, Tier, TierCosts, UsageRecord};
use crate::pricing::{cost_for_tokens, has_pricing, pricing_for, strip_datestamp, CURRENCY};
use crate::repository::UsageRepository;

/// Service layer for usage recording and cost accounting.
pub struct UsageService<R: UsageRepository> {
    repository: Arc<R>,
}

impl<R: UsageRepository> Clone for UsageService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<R: UsageRepository> UsageService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Persist one usage record.
    #[instrument(skip(self, record), fields(model = %record.model))]
    pub async fn record_usage(&self, record: NewUsageRecord) -> UsageResult<UsageRecord> {
        self.repository.insert(record).await
    }

    /// Aggregate all persisted records into a cost report.
    ///
    /// Groups by (model family, tier) with datestamp suffixes stripped, then
    /// prices each token category per million tokens. Unpriced combinations
    /// become warnings instead of failing the report.
    pub async fn compute_cost_report(&self) -> UsageResult<CostReport> {
        let aggregates = self.repository.aggregate().await?;

        // Pre-merge: different datestamps of one family collapse into the
        // same (family, tier) bucket.
        let mut sums: BTreeMap<(String, Tier), [i64; 4]> = BTreeMap::new();
        for aggregate in aggregates {
            let family = strip_datestamp(&aggregate.model).to_string();
            let tier = Tier::from_batch(aggregate.batch);
            let bucket = sums.entry((family, tier)).or_default();
            bucket[0] += aggregate.uncached_input_tokens;
            bucket[1] += aggregate.cached_input_tokens;
            bucket[2] += aggregate.reasoning_output_tokens;
            bucket[3] += aggregate.nonreasoning_output_tokens;
        }

        let mut report = CostReport {
            currency: CURRENCY.to_string(),
            ..CostReport::default()
        };

        for ((family, tier), [uncached, cached, reasoning, nonreasoning]) in sums {
            let Some(pricing) = pricing_for(&family, tier) else {
                if has_pricing(&family) {
                    report
                        .warnings
                        .push(format!("{}: no {} costs defined", family, tier));
                } else {
                    report.warnings.push(format!("{}: no costs defined", family));
                }
                continue;
            };

            let tier_costs = {
                let uncached_input = cost_for_tokens(uncached, pricing.uncached_input);
                let cached_input = cost_for_tokens(cached, pricing.cached_input);
                let reasoning_output = cost_for_tokens(reasoning, pricing.output);
                let nonreasoning_output = cost_for_tokens(nonreasoning, pricing.output);
                TierCosts {
                    uncached_input,
                    cached_input,
                    reasoning_output,
                    nonreasoning_output,
                    total: uncached_input + cached_input + reasoning_output + nonreasoning_output,
                }
            };

            let model_costs = report.models.entry(family).or_insert_with(ModelCosts::default);
            model_costs.total += tier_costs.total;
            report.total += tier_costs.total;
            model_costs.tiers.insert(tier, tier_costs);
        }

        Ok(report)
    }
}

/// Best-effort sink: a failed insert is logged and swallowed so usage
/// recording can never abort the user-facing flow.
#[async_trait]
impl<R: UsageRepository> UsageSink for UsageService<R> {
    async fn record(&self, event: UsageEvent) {
        let record = NewUsageRecord::from(event);
        match self.repository.insert(record).await {
            Ok(stored) => debug!(usage_id = stored.id, "Response recorded in the database"),
            Err(e) => warn!("Failed to record usage statistics: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UsageError;
    use crate::models::UsageAggregate;
    use crate::repository::MockUsageRepository;
    use openai_client::TokenUsage;

    fn aggregate(model: &str, batch: bool, tokens: [i64; 4]) -> UsageAggregate {
        UsageAggregate {
            model: model.to_string(),
            batch,
            uncached_input_tokens: tokens[0],
            cached_input_tokens: tokens[1],
            reasoning_output_tokens: tokens[2],
            nonreasoning_output_tokens: tokens[3],
        }
    }

    #[tokio::test]
    async fn prices_uncached_input_per_million() {
        // Two records of 100 and 200 uncached tokens arrive pre-summed from
        // the aggregate query.
        let mut repository = MockUsageRepository::new();
        repository.expect_aggregate().returning(|| {
            Ok(vec![aggregate(
                "gpt-4.1-nano-2025-04-14",
                false,
                [300, 0, 0, 0],
            )])
        });

        let report = UsageService::new(repository)
            .compute_cost_report()
            .await
            .unwrap();

        let model = &report.models["gpt-4.1-nano"];
        let tier = &model.tiers[&Tier::Regular];
        assert!((tier.uncached_input - 0.00003).abs() < 1e-12);
        assert!((report.total - 0.00003).abs() < 1e-12);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn output_tokens_priced_for_both_output_categories() {
        let mut repository = MockUsageRepository::new();
        repository.expect_aggregate().returning(|| {
            Ok(vec![aggregate(
                "gpt-4.1-nano",
                false,
                [0, 0, 1_000_000, 2_000_000],
            )])
        });

        let report = UsageService::new(repository)
            .compute_cost_report()
            .await
            .unwrap();

        let tier = &report.models["gpt-4.1-nano"].tiers[&Tier::Regular];
        assert!((tier.reasoning_output - 0.40).abs() < 1e-9);
        assert!((tier.nonreasoning_output - 0.80).abs() < 1e-9);
        assert!((report.total - 1.20).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unknown_model_becomes_warning_not_error() {
        let mut repository = MockUsageRepository::new();
        repository.expect_aggregate().returning(|| {
            Ok(vec![
                aggregate("some-new-model", false, [1000, 0, 0, 0]),
                aggregate("text-embedding-3-small", true, [1_000_000, 0, 0, 0]),
            ])
        });

        let report = UsageService::new(repository)
            .compute_cost_report()
            .await
            .unwrap();

        assert_eq!(report.warnings, vec!["some-new-model: no costs defined"]);
        let embedding_tier = &report.models["text-embedding-3-small"].tiers[&Tier::Batch];
        assert!((embedding_tier.uncached_input - 0.01).abs() < 1e-9);
    }

    #[tokio::test]
    async fn datestamped_and_bare_names_merge_into_one_family() {
        let mut repository = MockUsageRepository::new();
        repository.expect_aggregate().returning(|| {
            Ok(vec![
                aggregate("gpt-4.1-nano-2025-04-14", false, [100, 0, 0, 0]),
                aggregate("gpt-4.1-nano", false, [200, 0, 0, 0]),
            ])
        });

        let report = UsageService::new(repository)
            .compute_cost_report()
            .await
            .unwrap();

        assert_eq!(report.models.len(), 1);
        let tier = &report.models["gpt-4.1-nano"].tiers[&Tier::Regular];
        assert!((tier.uncached_input - 0.00003).abs() < 1e-12);
    }

    #[tokio::test]
    async fn empty_table_yields_empty_report() {
        let mut repository = MockUsageRepository::new();
        repository.expect_aggregate().returning(|| Ok(vec![]));

        let report = UsageService::new(repository)
            .compute_cost_report()
            .await
            .unwrap();

        assert!(report.models.is_empty());
        assert_eq!(report.total, 0.0);
    }

    #[tokio::test]
    async fn sink_swallows_persistence_failures() {
        let mut repository = MockUsageRepository::new();
        repository
            .expect_insert()
            .returning(|_| Err(UsageError::Internal("connection pool exhausted".to_string())));

        let service = UsageService::new(repository);
        let sink: &dyn UsageSink = &service;

        // Must not panic or propagate
        sink.record(UsageEvent {
            instructions: None,
            input: Some("[\"x\"]".to_string()),
            output: None,
            usage: TokenUsage {
                model: "text-embedding-3-small".to_string(),
                uncached_input_tokens: 5,
                ..TokenUsage::default()
            },
            batch: false,
        })
        .await;
    }

    #[tokio::test]
    async fn sink_records_one_event_per_call() {
        let mut repository = MockUsageRepository::new();
        repository
            .expect_insert()
            .times(1)
            .withf(|record| {
                record.model == "gpt-4.1-nano" && record.uncached_input_tokens == 42 && !record.batch
            })
            .returning(|record| {
                Ok(UsageRecord {
                    id: 1,
                    instructions: record.instructions.clone(),
                    input: record.input.clone(),
                    output: record.output.clone(),
                    model: record.model.clone(),
                    cached_input_tokens: record.cached_input_tokens,
                    uncached_input_tokens: record.uncached_input_tokens,
                    reasoning_output_tokens: record.reasoning_output_tokens,
                    nonreasoning_output_tokens: record.nonreasoning_output_tokens,
                    batch: record.batch,
                    timestamp: chrono::Utc::now(),
                })
            });

        let service = UsageService::new(repository);
        let sink: &dyn UsageSink = &service;

        sink.record(UsageEvent {
            instructions: Some("identify themes".to_string()),
            input: Some("user: courage".to_string()),
            output: Some("ok".to_string()),
            usage: TokenUsage {
                model: "gpt-4.1-nano".to_string(),
                uncached_input_tokens: 42,
                ..TokenUsage::default()
            },
            batch: false,
        })
        .await;
    }
}
