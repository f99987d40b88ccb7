use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};

use crate::{
    entity,
    error::UsageResult,
    models::{NewUsageRecord, UsageAggregate, UsageRecord},
    repository::UsageRepository,
};

pub struct PgUsageRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgUsageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl UsageRepository for PgUsageRepository {
    async fn insert(&self, record: NewUsageRecord) -> UsageResult<UsageRecord> {
        let active_model: entity::ActiveModel = record.into();

        let model = self.base.insert(active_model).await?;

        tracing::debug!(usage_id = model.id, model = %model.model, "Recorded usage");
        Ok(model.into())
    }

    async fn aggregate(&self) -> UsageResult<Vec<UsageAggregate>> {
        let sql = r#"
            SELECT model, batch,
                   COALESCE(SUM(uncached_input_tokens), 0)::BIGINT AS uncached_input_tokens,
                   COALESCE(SUM(cached_input_tokens), 0)::BIGINT AS cached_input_tokens,
                   COALESCE(SUM(reasoning_output_tokens), 0)::BIGINT AS reasoning_output_tokens,
                   COALESCE(SUM(nonreasoning_output_tokens), 0)::BIGINT AS nonreasoning_output_tokens
            FROM responses
            GROUP BY model, batch
        "#;

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, []);

        let aggregates = UsageAggregate::find_by_statement(stmt)
            .all(self.base.db())
            .await?;

        Ok(aggregates)
    }
}
