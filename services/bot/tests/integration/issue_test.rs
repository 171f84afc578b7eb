use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use pshik_bot::domain::repository::{CreditRepository, UserRepository};
use pshik_bot::error::BotServiceError;
use pshik_bot::infra::db::{DbCreditRepository, DbUserRepository};
use pshik_bot::usecase::issue::{IssueCreditInput, IssueCreditUseCase};
use pshik_bot_schema::credits;
use pshik_domain::credit::CreditReason;
use pshik_domain::id::{DeviceId, TgUserId};

use crate::helpers::{credit_created_at, device, test_db};

type DbIssue = IssueCreditUseCase<DbCreditRepository, DbUserRepository>;

fn issue_usecase(db: &DatabaseConnection) -> DbIssue {
    IssueCreditUseCase {
        credits: DbCreditRepository { db: db.clone() },
        users: DbUserRepository { db: db.clone() },
    }
}

fn input(device_id: Option<DeviceId>, reason: CreditReason) -> IssueCreditInput {
    IssueCreditInput {
        owner: TgUserId(42),
        device_id,
        reason,
        validity_days: 7,
    }
}

async fn active_codes(db: &DatabaseConnection) -> Vec<credits::Model> {
    credits::Entity::find()
        .filter(credits::Column::Status.eq(credits::Status::Active))
        .all(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn should_issue_six_digit_code_bound_to_device() {
    let db = test_db().await;
    let before = Utc::now();

    let issued = issue_usecase(&db)
        .execute(input(Some(device("BANYA_01")), CreditReason::problem()))
        .await
        .unwrap();

    let code = issued.code.as_str();
    assert_eq!(code.len(), 6);
    assert!(!code.starts_with('0'));
    assert!(issued.expires_at >= before + Duration::days(7));
    assert!(issued.expires_at <= Utc::now() + Duration::days(7));

    let rows = active_codes(&db).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code, code);
    assert_eq!(rows[0].device_id, "BANYA_01");
    assert_eq!(rows[0].issued_reason, "problem");
}

#[tokio::test]
async fn should_leave_one_active_credit_per_owner_and_reason() {
    let db = test_db().await;
    let usecase = issue_usecase(&db);

    let first = usecase
        .execute(input(Some(device("BANYA_01")), CreditReason::problem()))
        .await
        .unwrap();
    let gift = usecase
        .execute(input(Some(device("BANYA_01")), CreditReason::feedback()))
        .await
        .unwrap();
    let second = usecase
        .execute(input(Some(device("BANYA_01")), CreditReason::problem()))
        .await
        .unwrap();

    let active = active_codes(&db).await;
    assert_eq!(active.len(), 2, "newest problem credit plus the feedback gift");
    assert!(active.iter().any(|c| c.id == second.id.0));
    assert!(active.iter().any(|c| c.id == gift.id.0));

    let replaced = credits::Entity::find_by_id(first.id.0)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.status, credits::Status::Revoked);
}

#[tokio::test]
async fn should_fall_back_to_last_scanned_device() {
    let db = test_db().await;
    DbUserRepository { db: db.clone() }
        .touch(TgUserId(42), Some(&device("SAUNA_03")))
        .await
        .unwrap();

    issue_usecase(&db)
        .execute(input(None, CreditReason::problem()))
        .await
        .unwrap();

    assert_eq!(active_codes(&db).await[0].device_id, "SAUNA_03");
}

#[tokio::test]
async fn should_refuse_without_any_device() {
    let db = test_db().await;

    let err = issue_usecase(&db)
        .execute(input(None, CreditReason::problem()))
        .await
        .unwrap_err();

    assert!(matches!(err, BotServiceError::DeviceNotBound));
    assert!(active_codes(&db).await.is_empty());
}

#[tokio::test]
async fn should_refuse_scope_redeemed_within_cooldown() {
    let db = test_db().await;
    let credits = DbCreditRepository { db: db.clone() };
    let used = credit_created_at("810001", Utc::now() - Duration::hours(3));
    credits.insert(&used).await.unwrap();
    assert!(credits
        .mark_used(used.id, Utc::now() - Duration::hours(1))
        .await
        .unwrap());

    let usecase = issue_usecase(&db);
    let err = usecase
        .execute(input(Some(device("BANYA_01")), CreditReason::problem()))
        .await
        .unwrap_err();
    assert!(matches!(err, BotServiceError::Cooldown));
    assert!(active_codes(&db).await.is_empty());

    // Other scopes are unaffected.
    usecase
        .execute(input(Some(device("BANYA_01")), CreditReason::feedback()))
        .await
        .unwrap();
    assert_eq!(active_codes(&db).await.len(), 1);
}

#[tokio::test]
async fn should_issue_again_once_cooldown_has_passed() {
    let db = test_db().await;
    let credits = DbCreditRepository { db: db.clone() };
    let used = credit_created_at("810002", Utc::now() - Duration::days(3));
    credits.insert(&used).await.unwrap();
    assert!(credits
        .mark_used(used.id, Utc::now() - Duration::hours(25))
        .await
        .unwrap());

    issue_usecase(&db)
        .execute(input(Some(device("BANYA_01")), CreditReason::problem()))
        .await
        .unwrap();
    assert_eq!(active_codes(&db).await.len(), 1);
}
