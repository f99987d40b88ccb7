use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create responses table: one row per external model call
        manager
            .create_table(
                Table::create()
                    .table(Responses::Table)
                    .if_not_exists()
                    .col(pk_auto(Responses::Id))
                    .col(text_null(Responses::Instructions))
                    .col(text_null(Responses::Input))
                    .col(text_null(Responses::Output))
                    .col(string(Responses::Model))
                    .col(integer(Responses::CachedInputTokens).default(0))
                    .col(integer(Responses::UncachedInputTokens).default(0))
                    .col(integer(Responses::ReasoningOutputTokens).default(0))
                    .col(integer(Responses::NonreasoningOutputTokens).default(0))
                    .col(boolean(Responses::Batch).default(false))
                    .col(
                        timestamp_with_time_zone(Responses::Timestamp)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Cost reports group by (model, batch)
        manager
            .create_index(
                Index::create()
                    .name("idx_responses_model_batch")
                    .table(Responses::Table)
                    .col(Responses::Model)
                    .col(Responses::Batch)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_responses_timestamp")
                    .table(Responses::Table)
                    .col(Responses::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Responses::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Responses {
    Table,
    Id,
    Instructions,
    Input,
    Output,
    Model,
    CachedInputTokens,
    UncachedInputTokens,
    ReasoningOutputTokens,
    NonreasoningOutputTokens,
    Batch,
    Timestamp,
}
