use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr, TransactionTrait,
};

use pshik_bot_schema::{credits, devices, feedback, redemptions, user_state, users};
use pshik_domain::credit::{AttemptResult, CreditReason, CreditStatus};
use pshik_domain::id::{CreditCode, CreditId, DeviceId, TgUserId};

use crate::domain::repository::{
    CreditRepository, FeedbackRepository, RedemptionRepository, SessionStateRepository,
    UserRepository,
};
use crate::domain::types::{Credit, Feedback, InsertCredit, RedemptionAttempt, SessionState};
use crate::error::BotServiceError;

// ── Credit repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCreditRepository {
    pub db: DatabaseConnection,
}

impl CreditRepository for DbCreditRepository {
    async fn revoke_active(
        &self,
        owner: TgUserId,
        reason: &CreditReason,
    ) -> Result<u64, BotServiceError> {
        let result = credits::Entity::update_many()
            .col_expr(credits::Column::Status, Expr::value(credits::Status::Revoked))
            .filter(credits::Column::TgUserId.eq(owner.0))
            .filter(credits::Column::IssuedReason.eq(reason.as_str()))
            .filter(credits::Column::Status.eq(credits::Status::Active))
            .exec(&self.db)
            .await
            .context("revoke active credits")?;
        Ok(result.rows_affected)
    }

    async fn used_since(
        &self,
        owner: TgUserId,
        reason: &CreditReason,
        since: DateTime<Utc>,
    ) -> Result<bool, BotServiceError> {
        let found = credits::Entity::find()
            .filter(credits::Column::TgUserId.eq(owner.0))
            .filter(credits::Column::IssuedReason.eq(reason.as_str()))
            .filter(credits::Column::Status.eq(credits::Status::Used))
            .filter(credits::Column::UsedAt.gte(since))
            .one(&self.db)
            .await
            .context("check credit cooldown")?;
        Ok(found.is_some())
    }

    async fn is_code_active(&self, code: &CreditCode) -> Result<bool, BotServiceError> {
        let found = credits::Entity::find()
            .filter(credits::Column::Code.eq(code.as_str()))
            .filter(credits::Column::Status.eq(credits::Status::Active))
            .one(&self.db)
            .await
            .context("check active credit code")?;
        Ok(found.is_some())
    }

    async fn insert(&self, credit: &Credit) -> Result<InsertCredit, BotServiceError> {
        let model = credits::ActiveModel {
            id: Set(credit.id.0),
            code: Set(credit.code.to_string()),
            tg_user_id: Set(credit.owner.0),
            device_id: Set(credit.device_id.to_string()),
            status: Set(status_to_model(credit.status)),
            issued_reason: Set(credit.reason.to_string()),
            expires_at: Set(credit.expires_at),
            created_at: Set(credit.created_at),
            used_at: Set(credit.used_at),
        };
        match credits::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(InsertCredit::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(InsertCredit::CodeTaken),
            Err(e) => Err(anyhow::Error::new(e).context("insert credit").into()),
        }
    }

    async fn find_latest_by_code(&self, code: &str) -> Result<Option<Credit>, BotServiceError> {
        let model = credits::Entity::find()
            .filter(credits::Column::Code.eq(code))
            .order_by_desc(credits::Column::CreatedAt)
            .order_by_desc(credits::Column::Id)
            .one(&self.db)
            .await
            .context("find credit by code")?;
        let credit = model
            .map(credit_from_model)
            .transpose()
            .context("decode credit row")?;
        Ok(credit)
    }

    async fn mark_used(&self, id: CreditId, now: DateTime<Utc>) -> Result<bool, BotServiceError> {
        let result = credits::Entity::update_many()
            .col_expr(credits::Column::Status, Expr::value(credits::Status::Used))
            .col_expr(credits::Column::UsedAt, Expr::value(now))
            .filter(credits::Column::Id.eq(id.0))
            .filter(credits::Column::Status.eq(credits::Status::Active))
            .exec(&self.db)
            .await
            .context("mark credit used")?;
        Ok(result.rows_affected == 1)
    }

    async fn mark_expired(&self, id: CreditId) -> Result<bool, BotServiceError> {
        let result = credits::Entity::update_many()
            .col_expr(credits::Column::Status, Expr::value(credits::Status::Expired))
            .filter(credits::Column::Id.eq(id.0))
            .filter(credits::Column::Status.eq(credits::Status::Active))
            .exec(&self.db)
            .await
            .context("mark credit expired")?;
        Ok(result.rows_affected == 1)
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn status_to_model(status: CreditStatus) -> credits::Status {
    match status {
        CreditStatus::Active => credits::Status::Active,
        CreditStatus::Used => credits::Status::Used,
        CreditStatus::Expired => credits::Status::Expired,
        CreditStatus::Revoked => credits::Status::Revoked,
    }
}

fn status_from_model(status: credits::Status) -> CreditStatus {
    match status {
        credits::Status::Active => CreditStatus::Active,
        credits::Status::Used => CreditStatus::Used,
        credits::Status::Expired => CreditStatus::Expired,
        credits::Status::Revoked => CreditStatus::Revoked,
    }
}

fn credit_from_model(model: credits::Model) -> anyhow::Result<Credit> {
    Ok(Credit {
        id: CreditId(model.id),
        code: model.code.try_into()?,
        owner: TgUserId(model.tg_user_id),
        device_id: model.device_id.try_into()?,
        status: status_from_model(model.status),
        reason: model.issued_reason.try_into()?,
        expires_at: model.expires_at,
        created_at: model.created_at,
        used_at: model.used_at,
    })
}

// ── Redemption repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRedemptionRepository {
    pub db: DatabaseConnection,
}

impl RedemptionRepository for DbRedemptionRepository {
    async fn record(&self, attempt: &RedemptionAttempt) -> Result<(), BotServiceError> {
        let result = match attempt.result {
            AttemptResult::Success => redemptions::AttemptResult::Success,
            AttemptResult::Denied => redemptions::AttemptResult::Denied,
            AttemptResult::Error => redemptions::AttemptResult::Error,
        };
        let model = redemptions::ActiveModel {
            id: Set(attempt.id),
            credit_id: Set(attempt.credit_id.0),
            device_id: Set(attempt.device_id.clone()),
            redeemed_at: Set(attempt.redeemed_at),
            result: Set(result),
            reason: Set(attempt.reason.map(|r| r.as_str().to_owned())),
        };
        redemptions::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .context("record redemption attempt")?;
        Ok(())
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn touch(&self, user: TgUserId, device: Option<&DeviceId>) -> Result<(), BotServiceError> {
        let device = device.cloned();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    if let Some(device) = &device {
                        devices::Entity::insert(devices::ActiveModel {
                            device_id: Set(device.to_string()),
                            kind: Set(device.kind().to_owned()),
                            is_active: Set(true),
                            created_at: Set(now),
                        })
                        .on_conflict(
                            OnConflict::column(devices::Column::DeviceId)
                                .do_nothing()
                                .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await?;
                    }

                    // A device is only overwritten by an interaction that carries one.
                    let mut on_conflict = OnConflict::column(users::Column::TgUserId);
                    on_conflict.update_column(users::Column::LastSeenAt);
                    if device.is_some() {
                        on_conflict.update_column(users::Column::CurrentDeviceId);
                    }
                    users::Entity::insert(users::ActiveModel {
                        tg_user_id: Set(user.0),
                        first_seen_at: Set(now),
                        last_seen_at: Set(now),
                        current_device_id: Set(device.map(String::from)),
                    })
                    .on_conflict(on_conflict)
                    .exec_without_returning(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("touch user")?;
        Ok(())
    }

    async fn current_device(&self, user: TgUserId) -> Result<Option<DeviceId>, BotServiceError> {
        let model = users::Entity::find_by_id(user.0)
            .one(&self.db)
            .await
            .context("find user")?;
        let device = model
            .and_then(|m| m.current_device_id)
            .map(DeviceId::try_from)
            .transpose()
            .context("decode current device")?;
        Ok(device)
    }
}

// ── Session state repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionStateRepository {
    pub db: DatabaseConnection,
}

impl SessionStateRepository for DbSessionStateRepository {
    async fn load(&self, user: TgUserId) -> Result<SessionState, BotServiceError> {
        let model = user_state::Entity::find_by_id(user.0)
            .one(&self.db)
            .await
            .context("load session state")?;
        Ok(model
            .map(|m| SessionState::from_parts(&m.state, m.payload))
            .unwrap_or_default())
    }

    async fn save(&self, user: TgUserId, state: &SessionState) -> Result<(), BotServiceError> {
        user_state::Entity::insert(user_state::ActiveModel {
            tg_user_id: Set(user.0),
            state: Set(state.tag().to_owned()),
            payload: Set(state.payload()),
            updated_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(user_state::Column::TgUserId)
                .update_columns([
                    user_state::Column::State,
                    user_state::Column::Payload,
                    user_state::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("save session state")?;
        Ok(())
    }
}

// ── Feedback repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFeedbackRepository {
    pub db: DatabaseConnection,
}

impl FeedbackRepository for DbFeedbackRepository {
    async fn create(&self, entry: &Feedback) -> Result<(), BotServiceError> {
        feedback::Entity::insert(feedback::ActiveModel {
            id: Set(entry.id),
            tg_user_id: Set(entry.tg_user_id.0),
            device_id: Set(entry.device_id.as_ref().map(ToString::to_string)),
            rating: Set(entry.rating.map(|r| r.as_str().to_owned())),
            topic: Set(entry.topic.map(|t| t.as_str().to_owned())),
            message: Set(entry.message.clone()),
            created_at: Set(entry.created_at),
        })
        .exec_without_returning(&self.db)
        .await
        .context("create feedback")?;
        Ok(())
    }
}
