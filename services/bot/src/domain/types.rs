use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pshik_domain::credit::{AttemptResult, CreditReason, CreditStatus, DenialReason};
use pshik_domain::id::{CreditCode, CreditId, DeviceId, TgUserId};

/// Single-use, expiring, device-bound service credit.
#[derive(Debug, Clone)]
pub struct Credit {
    pub id: CreditId,
    pub code: CreditCode,
    pub owner: TgUserId,
    pub device_id: DeviceId,
    pub status: CreditStatus,
    pub reason: CreditReason,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl Credit {
    /// Redemption is allowed up to and including `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Code and expiry handed back to the caller for display.
#[derive(Debug, Clone)]
pub struct IssuedCredit {
    pub id: CreditId,
    pub code: CreditCode,
    pub expires_at: DateTime<Utc>,
}

/// Audit row for one redemption attempt.
#[derive(Debug, Clone)]
pub struct RedemptionAttempt {
    pub id: Uuid,
    pub credit_id: CreditId,
    pub device_id: String,
    pub redeemed_at: DateTime<Utc>,
    pub result: AttemptResult,
    pub reason: Option<DenialReason>,
}

impl RedemptionAttempt {
    pub fn new(
        credit_id: CreditId,
        device_id: &str,
        result: AttemptResult,
        reason: Option<DenialReason>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            credit_id,
            device_id: device_id.to_owned(),
            redeemed_at: Utc::now(),
            result,
            reason,
        }
    }
}

/// Result of inserting a credit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertCredit {
    Inserted,
    /// Another active credit already holds the code.
    CodeTaken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Good,
    Bad,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }
}

/// Why free text is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTopic {
    Feedback,
    ProblemOther,
}

impl FeedbackTopic {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feedback => "feedback",
            Self::ProblemOther => "problem_other",
        }
    }
}

/// Payload carried while waiting for the user's free-text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingText {
    pub topic: FeedbackTopic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Per-user dialogue state, persisted so it survives restarts and is shared
/// by all instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingFeedbackText(PendingText),
}

pub const STATE_IDLE: &str = "idle";
pub const STATE_AWAITING_FEEDBACK_TEXT: &str = "awaiting_feedback_text";

impl SessionState {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Idle => STATE_IDLE,
            Self::AwaitingFeedbackText(_) => STATE_AWAITING_FEEDBACK_TEXT,
        }
    }

    pub fn payload(&self) -> Option<serde_json::Value> {
        match self {
            Self::Idle => None,
            Self::AwaitingFeedbackText(pending) => serde_json::to_value(pending).ok(),
        }
    }

    /// Rebuild from a stored `(state, payload)` pair. Unknown tags or unreadable
    /// payloads fall back to `Idle`.
    pub fn from_parts(tag: &str, payload: Option<serde_json::Value>) -> Self {
        match tag {
            STATE_AWAITING_FEEDBACK_TEXT => payload
                .and_then(|p| serde_json::from_value::<PendingText>(p).ok())
                .map_or(Self::Idle, Self::AwaitingFeedbackText),
            _ => Self::Idle,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Feedback {
    pub id: Uuid,
    pub tg_user_id: TgUserId,
    pub device_id: Option<DeviceId>,
    pub rating: Option<Rating>,
    pub topic: Option<FeedbackTopic>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One inline button; pressing it sends `callback_data` back as a callback query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub text: String,
    pub callback_data: String,
}

/// Inline keyboard attached to an outgoing message, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Keyboard {
    pub inline_keyboard: Vec<Vec<Button>>,
}

impl Button {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

impl Keyboard {
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.inline_keyboard.push(buttons);
        self
    }

    /// Append a row holding a single button.
    pub fn button(self, text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        self.row(vec![Button::new(text, callback_data)])
    }

    pub fn callbacks(&self) -> impl Iterator<Item = &str> {
        self.inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
    }
}

/// Rendered screen: text plus an optional keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Screen {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Maximum number of candidates tried before issuance gives up.
pub const CODE_GEN_MAX_ATTEMPTS: usize = 15;

/// Validity used when the caller does not specify one.
pub const DEFAULT_VALIDITY_DAYS: i64 = 7;

/// Upper bound on requested validity.
pub const MAX_VALIDITY_DAYS: i64 = 365;

/// After a credit is redeemed, its `(owner, reason)` scope issues nothing for this long.
pub const CREDIT_COOLDOWN_HOURS: i64 = 24;

/// Validity of the credit granted for written feedback.
pub const FEEDBACK_GIFT_DAYS: i64 = 14;

/// Longest free-text message stored from a user.
pub const MAX_FEEDBACK_LEN: usize = 2000;
