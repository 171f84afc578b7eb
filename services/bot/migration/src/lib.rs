use sea_orm_migration::prelude::*;

mod m20260101_000001_create_users;
mod m20260101_000002_create_devices;
mod m20260101_000003_create_credits;
mod m20260101_000004_create_redemptions;
mod m20260101_000005_create_feedback;
mod m20260101_000006_create_user_state;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_users::Migration),
            Box::new(m20260101_000002_create_devices::Migration),
            Box::new(m20260101_000003_create_credits::Migration),
            Box::new(m20260101_000004_create_redemptions::Migration),
            Box::new(m20260101_000005_create_feedback::Migration),
            Box::new(m20260101_000006_create_user_state::Migration),
        ]
    }
}
