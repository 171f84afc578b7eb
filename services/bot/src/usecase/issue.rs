use chrono::{Duration, Utc};
use uuid::Uuid;

use pshik_domain::credit::{CreditReason, CreditStatus};
use pshik_domain::id::{CreditCode, CreditId, DeviceId, TgUserId};

use crate::domain::repository::{CreditRepository, UserRepository};
use crate::domain::types::{
    CODE_GEN_MAX_ATTEMPTS, CREDIT_COOLDOWN_HOURS, Credit, InsertCredit, IssuedCredit,
    MAX_VALIDITY_DAYS,
};
use crate::error::BotServiceError;
use crate::usecase::codegen::generate_candidate;

pub struct IssueCreditInput {
    pub owner: TgUserId,
    /// Falls back to the owner's last scanned device.
    pub device_id: Option<DeviceId>,
    pub reason: CreditReason,
    pub validity_days: i64,
}

pub struct IssueCreditUseCase<C, U>
where
    C: CreditRepository,
    U: UserRepository,
{
    pub credits: C,
    pub users: U,
}

impl<C, U> IssueCreditUseCase<C, U>
where
    C: CreditRepository,
    U: UserRepository,
{
    pub async fn execute(&self, input: IssueCreditInput) -> Result<IssuedCredit, BotServiceError> {
        if !(1..=MAX_VALIDITY_DAYS).contains(&input.validity_days) {
            return Err(BotServiceError::BadRequest);
        }

        // 1. Resolve the device the credit is bound to
        let device_id = match input.device_id {
            Some(device_id) => device_id,
            None => self
                .users
                .current_device(input.owner)
                .await?
                .ok_or(BotServiceError::DeviceNotBound)?,
        };

        // 2. Nothing new in a scope whose last credit was redeemed recently
        let now = Utc::now();
        let cooldown_start = now - Duration::hours(CREDIT_COOLDOWN_HOURS);
        if self
            .credits
            .used_since(input.owner, &input.reason, cooldown_start)
            .await?
        {
            tracing::info!(
                tg_user_id = %input.owner,
                reason = %input.reason,
                "credit scope in cooldown"
            );
            return Err(BotServiceError::Cooldown);
        }

        // 3. One active credit per (owner, reason)
        let revoked = self
            .credits
            .revoke_active(input.owner, &input.reason)
            .await?;
        if revoked > 0 {
            tracing::info!(
                tg_user_id = %input.owner,
                reason = %input.reason,
                revoked,
                "revoked previous credits"
            );
        }

        // 4. Bounded search for a code no active credit holds
        let expires_at = now + Duration::days(input.validity_days);
        for attempt in 1..=CODE_GEN_MAX_ATTEMPTS {
            let Ok(code) = generate_candidate().parse::<CreditCode>() else {
                continue;
            };
            if self.credits.is_code_active(&code).await? {
                tracing::debug!(attempt, "candidate code already active");
                continue;
            }

            let credit = Credit {
                id: CreditId(Uuid::now_v7()),
                code,
                owner: input.owner,
                device_id: device_id.clone(),
                status: CreditStatus::Active,
                reason: input.reason.clone(),
                expires_at,
                created_at: now,
                used_at: None,
            };
            match self.credits.insert(&credit).await? {
                InsertCredit::Inserted => {
                    tracing::info!(
                        credit_id = %credit.id,
                        tg_user_id = %credit.owner,
                        device_id = %credit.device_id,
                        reason = %credit.reason,
                        attempt,
                        "credit issued"
                    );
                    return Ok(IssuedCredit {
                        id: credit.id,
                        code: credit.code,
                        expires_at,
                    });
                }
                InsertCredit::CodeTaken => {
                    tracing::debug!(attempt, "candidate code taken concurrently");
                }
            }
        }

        Err(BotServiceError::CodeGenerationExhausted)
    }
}
