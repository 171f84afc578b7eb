use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feedback::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Feedback::TgUserId).big_integer().not_null())
                    .col(ColumnDef::new(Feedback::DeviceId).string())
                    .col(ColumnDef::new(Feedback::Rating).string())
                    .col(ColumnDef::new(Feedback::Topic).string())
                    .col(ColumnDef::new(Feedback::Message).text())
                    .col(
                        ColumnDef::new(Feedback::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_feedback_tg_user_id", Feedback::TgUserId),
            ("idx_feedback_device_id", Feedback::DeviceId),
            ("idx_feedback_created_at", Feedback::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .table(Feedback::Table)
                        .col(col)
                        .name(name)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Feedback {
    Table,
    Id,
    TgUserId,
    DeviceId,
    Rating,
    Topic,
    Message,
    CreatedAt,
}
