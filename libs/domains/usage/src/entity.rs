use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the `responses` table: one row per model call.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub instructions: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub input: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub output: Option<String>,
    pub model: String,
    pub cached_input_tokens: i32,
    pub uncached_input_tokens: i32,
    pub reasoning_output_tokens: i32,
    pub nonreasoning_output_tokens: i32,
    pub batch: bool,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain UsageRecord
impl From<Model> for crate::models::UsageRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            instructions: model.instructions,
            input: model.input,
            output: model.output,
            model: model.model,
            cached_input_tokens: model.cached_input_tokens.max(0) as u32,
            uncached_input_tokens: model.uncached_input_tokens.max(0) as u32,
            reasoning_output_tokens: model.reasoning_output_tokens.max(0) as u32,
            nonreasoning_output_tokens: model.nonreasoning_output_tokens.max(0) as u32,
            batch: model.batch,
            timestamp: model.timestamp.into(),
        }
    }
}

// Conversion from domain NewUsageRecord to Sea-ORM ActiveModel
impl From<crate::models::NewUsageRecord> for ActiveModel {
    fn from(input: crate::models::NewUsageRecord) -> Self {
        ActiveModel {
            id: NotSet,
            instructions: Set(input.instructions),
            input: Set(input.input),
            output: Set(input.output),
            model: Set(input.model),
            cached_input_tokens: Set(input.cached_input_tokens as i32),
            uncached_input_tokens: Set(input.uncached_input_tokens as i32),
            reasoning_output_tokens: Set(input.reasoning_output_tokens as i32),
            nonreasoning_output_tokens: Set(input.nonreasoning_output_tokens as i32),
            batch: Set(input.batch),
            timestamp: Set(chrono::Utc::now().into()),
        }
    }
}
