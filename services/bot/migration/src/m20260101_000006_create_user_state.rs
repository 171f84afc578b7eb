use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserState::TgUserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserState::State)
                            .string()
                            .not_null()
                            .default("idle"),
                    )
                    .col(ColumnDef::new(UserState::Payload).json_binary())
                    .col(
                        ColumnDef::new(UserState::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserState::Table, UserState::TgUserId)
                            .to(Users::Table, Users::TgUserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(UserState::Table)
                    .col(UserState::State)
                    .name("idx_user_state_state")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(UserState::Table)
                    .col(UserState::UpdatedAt)
                    .name("idx_user_state_updated_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserState::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserState {
    Table,
    TgUserId,
    State,
    Payload,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    TgUserId,
}
