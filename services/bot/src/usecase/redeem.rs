use chrono::Utc;

use pshik_core::secret::secret_matches;
use pshik_domain::credit::{AttemptResult, DenialReason, RedeemOutcome};

use crate::domain::repository::{CreditRepository, RedemptionRepository};
use crate::domain::types::{Credit, RedemptionAttempt};
use crate::error::BotServiceError;

pub struct RedeemCreditInput {
    /// Value of the `x-device-api-key` header, if any.
    pub api_key: Option<String>,
    pub device_id: String,
    pub code: String,
}

pub struct RedeemCreditUseCase<C, R>
where
    C: CreditRepository,
    R: RedemptionRepository,
{
    pub credits: C,
    pub redemptions: R,
    pub device_api_key: String,
}

impl<C, R> RedeemCreditUseCase<C, R>
where
    C: CreditRepository,
    R: RedemptionRepository,
{
    /// Checks run in order and stop at the first denial. Only denials that
    /// resolved a credit leave an attempt row.
    pub async fn execute(&self, input: RedeemCreditInput) -> Result<RedeemOutcome, BotServiceError> {
        // 1. Device key
        if !secret_matches(input.api_key.as_deref(), &self.device_api_key) {
            tracing::warn!("redeem rejected: bad device key");
            return Ok(RedeemOutcome::Denied(DenialReason::BadKey));
        }

        // 2. Shape
        let device_id = input.device_id.trim();
        let code = input.code.trim();
        if device_id.is_empty() || code.is_empty() {
            return Ok(RedeemOutcome::Denied(DenialReason::BadRequest));
        }

        // 3. Lookup
        let Some(credit) = self.credits.find_latest_by_code(code).await? else {
            tracing::info!(device_id, "redeem denied: unknown code");
            return Ok(RedeemOutcome::Denied(DenialReason::NotFound));
        };

        // 4. Binding
        if credit.device_id.as_str() != device_id {
            return self.deny(&credit, device_id, DenialReason::WrongDevice).await;
        }

        // 5. Status
        if credit.status.is_terminal() {
            return self.deny(&credit, device_id, DenialReason::NotActive).await;
        }

        // 6. Expiry
        let now = Utc::now();
        if credit.is_expired_at(now) {
            self.credits.mark_expired(credit.id).await?;
            return self.deny(&credit, device_id, DenialReason::Expired).await;
        }

        // 7. Compare-and-set; exactly one concurrent caller sees `true`
        let won = match self.credits.mark_used(credit.id, now).await {
            Ok(won) => won,
            Err(e) => {
                let attempt =
                    RedemptionAttempt::new(credit.id, device_id, AttemptResult::Error, None);
                if let Err(audit) = self.redemptions.record(&attempt).await {
                    tracing::warn!(credit_id = %credit.id, error = ?audit, "failed to record error attempt");
                }
                return Err(e);
            }
        };
        if !won {
            return self.deny(&credit, device_id, DenialReason::Race).await;
        }

        // 8. Success
        self.redemptions
            .record(&RedemptionAttempt::new(
                credit.id,
                device_id,
                AttemptResult::Success,
                None,
            ))
            .await?;
        tracing::info!(credit_id = %credit.id, device_id, "credit redeemed");
        Ok(RedeemOutcome::Ok)
    }

    async fn deny(
        &self,
        credit: &Credit,
        device_id: &str,
        reason: DenialReason,
    ) -> Result<RedeemOutcome, BotServiceError> {
        let attempt =
            RedemptionAttempt::new(credit.id, device_id, AttemptResult::Denied, Some(reason));
        self.redemptions.record(&attempt).await?;
        tracing::info!(credit_id = %credit.id, device_id, reason = %reason, "redeem denied");
        Ok(RedeemOutcome::Denied(reason))
    }
}
