#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use pshik_domain::credit::CreditReason;
use pshik_domain::id::{CreditCode, CreditId, DeviceId, TgUserId};

use crate::domain::types::{
    Credit, Feedback, InsertCredit, Keyboard, RedemptionAttempt, SessionState,
};
use crate::error::BotServiceError;

/// Repository for credits.
pub trait CreditRepository: Send + Sync {
    /// Move every `active` credit of `(owner, reason)` to `revoked`. Returns the number revoked.
    async fn revoke_active(
        &self,
        owner: TgUserId,
        reason: &CreditReason,
    ) -> Result<u64, BotServiceError>;

    /// Whether a credit of `(owner, reason)` was redeemed at or after `since`.
    async fn used_since(
        &self,
        owner: TgUserId,
        reason: &CreditReason,
        since: DateTime<Utc>,
    ) -> Result<bool, BotServiceError>;

    /// Whether an `active` credit currently holds `code`.
    async fn is_code_active(&self, code: &CreditCode) -> Result<bool, BotServiceError>;

    /// Insert a new credit. Reports `CodeTaken` when the active-code uniqueness rejects it.
    async fn insert(&self, credit: &Credit) -> Result<InsertCredit, BotServiceError>;

    /// Newest credit carrying `code`, whatever its status.
    async fn find_latest_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Credit>, BotServiceError>;

    /// Compare-and-set `active -> used`. Returns `true` only for the caller that won.
    async fn mark_used(&self, id: CreditId, now: DateTime<Utc>) -> Result<bool, BotServiceError>;

    /// Compare-and-set `active -> expired`. Returns `true` if the row changed.
    async fn mark_expired(&self, id: CreditId) -> Result<bool, BotServiceError>;
}

/// Append-only audit of redemption attempts.
pub trait RedemptionRepository: Send + Sync {
    async fn record(&self, attempt: &RedemptionAttempt) -> Result<(), BotServiceError>;
}

/// Repository for bot users and the devices they scan.
pub trait UserRepository: Send + Sync {
    /// Upsert the user and bump `last_seen_at`. `current_device_id` is only
    /// overwritten when `device` is `Some`; the device row is created if missing.
    async fn touch(
        &self,
        user: TgUserId,
        device: Option<&DeviceId>,
    ) -> Result<(), BotServiceError>;

    async fn current_device(&self, user: TgUserId) -> Result<Option<DeviceId>, BotServiceError>;
}

/// Persisted per-user dialogue state.
pub trait SessionStateRepository: Send + Sync {
    /// Stored state, `Idle` when nothing is stored.
    async fn load(&self, user: TgUserId) -> Result<SessionState, BotServiceError>;

    /// Last write wins.
    async fn save(&self, user: TgUserId, state: &SessionState) -> Result<(), BotServiceError>;
}

pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, feedback: &Feedback) -> Result<(), BotServiceError>;
}

/// Outbound chat channel.
pub trait Messenger: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), BotServiceError>;

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), BotServiceError>;

    /// Dismiss the loading indicator on a pressed button.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), BotServiceError>;
}
