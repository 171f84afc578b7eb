use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Partial unique index: only one *active* credit may hold a code, while
/// used/expired/revoked rows keep theirs for the audit trail.
const CREATE_ACTIVE_CODE_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
     uq_credits_active_code ON credits (code) WHERE status = 'active'";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Credits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Credits::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Credits::Code).string().not_null())
                    .col(ColumnDef::new(Credits::TgUserId).big_integer().not_null())
                    .col(ColumnDef::new(Credits::DeviceId).string().not_null())
                    .col(
                        ColumnDef::new(Credits::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Credits::IssuedReason).string().not_null())
                    .col(
                        ColumnDef::new(Credits::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Credits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Credits::UsedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Lookup at redemption time.
        manager
            .create_index(
                Index::create()
                    .table(Credits::Table)
                    .col(Credits::Code)
                    .name("idx_credits_code")
                    .to_owned(),
            )
            .await?;

        // Revocation scope at issuance time.
        manager
            .create_index(
                Index::create()
                    .table(Credits::Table)
                    .col(Credits::TgUserId)
                    .col(Credits::IssuedReason)
                    .col(Credits::Status)
                    .name("idx_credits_scope")
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(CREATE_ACTIVE_CODE_INDEX)
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Credits::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Credits {
    Table,
    Id,
    Code,
    TgUserId,
    DeviceId,
    Status,
    IssuedReason,
    ExpiresAt,
    CreatedAt,
    UsedAt,
}
