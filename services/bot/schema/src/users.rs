use sea_orm::entity::prelude::*;

/// Telegram user as last seen by the bot.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tg_user_id: i64,
    pub first_seen_at: chrono::DateTime<chrono::Utc>,
    pub last_seen_at: chrono::DateTime<chrono::Utc>,
    /// Last device the user bound via a `/start <DEVICE>` deep link.
    pub current_device_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_state::Entity")]
    UserState,
}

impl Related<super::user_state::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserState.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
