use sea_orm::entity::prelude::*;

/// Immutable audit row: one per redemption attempt that resolved a credit.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "redemptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub credit_id: Uuid,
    /// Device that presented the code (may differ from the bound device).
    pub device_id: String,
    pub redeemed_at: chrono::DateTime<chrono::Utc>,
    pub result: AttemptResult,
    /// Denial tag (`race`, `expired`, ...); null on success.
    pub reason: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AttemptResult {
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "denied")]
    Denied,
    #[sea_orm(string_value = "error")]
    Error,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::credits::Entity",
        from = "Column::CreditId",
        to = "super::credits::Column::Id"
    )]
    Credit,
}

impl Related<super::credits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
