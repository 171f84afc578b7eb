use chrono::{Duration, Utc};
use futures::future::join_all;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use pshik_bot::domain::repository::{CreditRepository, UserRepository};
use pshik_bot::infra::db::{DbCreditRepository, DbRedemptionRepository, DbUserRepository};
use pshik_bot::usecase::issue::{IssueCreditInput, IssueCreditUseCase};
use pshik_bot::usecase::redeem::{RedeemCreditInput, RedeemCreditUseCase};
use pshik_bot_schema::redemptions;
use pshik_domain::credit::{CreditReason, CreditStatus, DenialReason, RedeemOutcome};
use pshik_domain::id::TgUserId;
use pshik_testing::keys::TestKeys;

use crate::helpers::{credit_created_at, device, test_db};

type DbRedeem = RedeemCreditUseCase<DbCreditRepository, DbRedemptionRepository>;

fn redeem_usecase(db: &DatabaseConnection) -> DbRedeem {
    RedeemCreditUseCase {
        credits: DbCreditRepository { db: db.clone() },
        redemptions: DbRedemptionRepository { db: db.clone() },
        device_api_key: TestKeys::default().device_api_key,
    }
}

fn input(device_id: &str, code: &str) -> RedeemCreditInput {
    RedeemCreditInput {
        api_key: Some(TestKeys::default().device_api_key),
        device_id: device_id.to_owned(),
        code: code.to_owned(),
    }
}

async fn attempts(db: &DatabaseConnection) -> Vec<redemptions::Model> {
    redemptions::Entity::find()
        .order_by_asc(redemptions::Column::RedeemedAt)
        .all(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn should_redeem_issued_credit_exactly_once() {
    let db = test_db().await;
    let users = DbUserRepository { db: db.clone() };
    users
        .touch(TgUserId(42), Some(&device("BANYA_01")))
        .await
        .unwrap();

    let issue = IssueCreditUseCase {
        credits: DbCreditRepository { db: db.clone() },
        users,
    };
    let issued = issue
        .execute(IssueCreditInput {
            owner: TgUserId(42),
            device_id: None,
            reason: CreditReason::problem(),
            validity_days: 7,
        })
        .await
        .unwrap();

    let redeem = redeem_usecase(&db);
    let code = issued.code.as_str();

    let first = redeem.execute(input("BANYA_01", code)).await.unwrap();
    assert_eq!(first, RedeemOutcome::Ok);

    let second = redeem.execute(input("BANYA_01", code)).await.unwrap();
    assert_eq!(second, RedeemOutcome::Denied(DenialReason::NotActive));

    let rows = attempts(&db).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].result, redemptions::AttemptResult::Success);
    assert!(rows[0].reason.is_none());
    assert_eq!(rows[1].result, redemptions::AttemptResult::Denied);
    assert_eq!(rows[1].reason.as_deref(), Some("not_active"));
}

#[tokio::test]
async fn should_deny_code_replaced_by_reissue() {
    let db = test_db().await;
    let issue = IssueCreditUseCase {
        credits: DbCreditRepository { db: db.clone() },
        users: DbUserRepository { db: db.clone() },
    };
    let issue_input = || IssueCreditInput {
        owner: TgUserId(42),
        device_id: Some(device("BANYA_01")),
        reason: CreditReason::problem(),
        validity_days: 7,
    };
    let old = issue.execute(issue_input()).await.unwrap();
    let new = issue.execute(issue_input()).await.unwrap();

    let redeem = redeem_usecase(&db);
    let stale = redeem
        .execute(input("BANYA_01", old.code.as_str()))
        .await
        .unwrap();
    assert_eq!(stale, RedeemOutcome::Denied(DenialReason::NotActive));

    let fresh = redeem
        .execute(input("BANYA_01", new.code.as_str()))
        .await
        .unwrap();
    assert_eq!(fresh, RedeemOutcome::Ok);

    let rows = attempts(&db).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].credit_id, old.id.0);
    assert_eq!(rows[0].reason.as_deref(), Some("not_active"));
}

#[tokio::test]
async fn should_let_exactly_one_concurrent_redemption_succeed() {
    let db = test_db().await;
    let credits = DbCreditRepository { db: db.clone() };
    let credit = credit_created_at("654321", Utc::now());
    credits.insert(&credit).await.unwrap();

    // Interleaved on one connection: the status-filtered update picks the winner.
    let redeem = redeem_usecase(&db);
    let outcomes = join_all((0..16).map(|_| redeem.execute(input("BANYA_01", "654321")))).await;

    let mut ok = 0;
    for outcome in outcomes {
        match outcome.unwrap() {
            RedeemOutcome::Ok => ok += 1,
            RedeemOutcome::Denied(reason) => assert!(
                matches!(reason, DenialReason::Race | DenialReason::NotActive),
                "unexpected denial {reason}"
            ),
        }
    }
    assert_eq!(ok, 1, "exactly one redemption must win");

    let rows = attempts(&db).await;
    assert_eq!(rows.len(), 16, "every resolved attempt is audited");
    let successes = rows
        .iter()
        .filter(|r| r.result == redemptions::AttemptResult::Success)
        .count();
    assert_eq!(successes, 1);

    let stored = credits.find_latest_by_code("654321").await.unwrap().unwrap();
    assert_eq!(stored.status, CreditStatus::Used);
}

#[tokio::test]
async fn should_deny_and_audit_wrong_device() {
    let db = test_db().await;
    let credits = DbCreditRepository { db: db.clone() };
    credits
        .insert(&credit_created_at("700001", Utc::now()))
        .await
        .unwrap();

    let outcome = redeem_usecase(&db)
        .execute(input("SAUNA_02", "700001"))
        .await
        .unwrap();
    assert_eq!(outcome, RedeemOutcome::Denied(DenialReason::WrongDevice));

    let rows = attempts(&db).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].device_id, "SAUNA_02");
    assert_eq!(rows[0].reason.as_deref(), Some("wrong_device"));

    // The credit is untouched and still redeemable at its own device.
    let stored = credits.find_latest_by_code("700001").await.unwrap().unwrap();
    assert_eq!(stored.status, CreditStatus::Active);
}

#[tokio::test]
async fn should_expire_stale_credit_on_presentation() {
    let db = test_db().await;
    let credits = DbCreditRepository { db: db.clone() };
    let stale = credit_created_at("700002", Utc::now() - Duration::days(8));
    credits.insert(&stale).await.unwrap();

    let outcome = redeem_usecase(&db)
        .execute(input("BANYA_01", "700002"))
        .await
        .unwrap();
    assert_eq!(outcome, RedeemOutcome::Denied(DenialReason::Expired));

    let stored = credits.find_latest_by_code("700002").await.unwrap().unwrap();
    assert_eq!(stored.status, CreditStatus::Expired);
    assert_eq!(attempts(&db).await[0].reason.as_deref(), Some("expired"));
}

#[tokio::test]
async fn should_not_audit_attempts_that_resolve_no_credit() {
    let db = test_db().await;
    let redeem = redeem_usecase(&db);

    let unknown = redeem.execute(input("BANYA_01", "123123")).await.unwrap();
    assert_eq!(unknown, RedeemOutcome::Denied(DenialReason::NotFound));

    let blank = redeem.execute(input("  ", "123123")).await.unwrap();
    assert_eq!(blank, RedeemOutcome::Denied(DenialReason::BadRequest));

    let mut keyless = input("BANYA_01", "123123");
    keyless.api_key = None;
    let bad_key = redeem.execute(keyless).await.unwrap();
    assert_eq!(bad_key, RedeemOutcome::Denied(DenialReason::BadKey));

    assert!(attempts(&db).await.is_empty());
}
