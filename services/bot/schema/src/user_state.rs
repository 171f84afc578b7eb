use sea_orm::entity::prelude::*;

/// Persisted dialogue state per user (`idle`, `awaiting_feedback_text`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_state")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tg_user_id: i64,
    pub state: String,
    pub payload: Option<Json>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TgUserId",
        to = "super::users::Column::TgUserId"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
