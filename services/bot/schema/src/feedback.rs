use sea_orm::entity::prelude::*;

/// Free-text message and/or rating left by a user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tg_user_id: i64,
    pub device_id: Option<String>,
    pub rating: Option<String>,
    /// What prompted the message (`feedback`, `problem_other`).
    pub topic: Option<String>,
    pub message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
