use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Redemptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Redemptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Redemptions::CreditId).uuid().not_null())
                    .col(ColumnDef::new(Redemptions::DeviceId).string().not_null())
                    .col(
                        ColumnDef::new(Redemptions::RedeemedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Redemptions::Result).string().not_null())
                    .col(ColumnDef::new(Redemptions::Reason).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Redemptions::Table, Redemptions::CreditId)
                            .to(Credits::Table, Credits::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Redemptions::Table)
                    .col(Redemptions::CreditId)
                    .name("idx_redemptions_credit_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Redemptions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Redemptions {
    Table,
    Id,
    CreditId,
    DeviceId,
    RedeemedAt,
    Result,
    Reason,
}

#[derive(Iden)]
enum Credits {
    Table,
    Id,
}
