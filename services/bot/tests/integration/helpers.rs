use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use pshik_bot::config::BotConfig;
use pshik_bot::domain::repository::Messenger;
use pshik_bot::domain::types::{Credit, Keyboard};
use pshik_bot::error::BotServiceError;
use pshik_bot::state::AppState;
use pshik_bot_migration::Migrator;
use pshik_domain::credit::{CreditReason, CreditStatus};
use pshik_domain::id::{CreditId, DeviceId, TgUserId};
use pshik_testing::keys::TestKeys;

// ── Database ─────────────────────────────────────────────────────────────────

/// Fresh in-memory SQLite database with every migration applied.
///
/// A single connection, so every query sees the same `:memory:` database.
/// Concurrent tests therefore interleave on that connection rather than run
/// in parallel; what they exercise is the conditional update, not the pool.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn test_config() -> BotConfig {
    let keys = TestKeys::default();
    BotConfig {
        env: "test".to_owned(),
        database_url: "sqlite::memory:".to_owned(),
        port: 0,
        bot_token: "123:test".to_owned(),
        bot_username: "pshik_test_bot".to_owned(),
        bot_key: keys.bot_key,
        device_api_key: keys.device_api_key,
        tg_secret_token: keys.telegram_secret,
        base_url: "http://localhost".to_owned(),
        webhook_url: None,
        auto_migrate: false,
        // Nothing listens here; outbound messages fail fast and are swallowed.
        telegram_api_url: "http://127.0.0.1:9".to_owned(),
    }
}

pub async fn test_state() -> AppState {
    AppState::new(test_db().await, test_config())
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn device(id: &str) -> DeviceId {
    id.parse().unwrap()
}

/// An active `problem` credit for user 42 on `BANYA_01`, valid for a week.
pub fn active_credit(code: &str) -> Credit {
    credit_created_at(code, Utc::now())
}

pub fn credit_created_at(code: &str, created_at: DateTime<Utc>) -> Credit {
    Credit {
        id: CreditId(Uuid::now_v7()),
        code: code.parse().unwrap(),
        owner: TgUserId(42),
        device_id: device("BANYA_01"),
        status: CreditStatus::Active,
        reason: CreditReason::problem(),
        expires_at: created_at + Duration::days(7),
        created_at,
        used_at: None,
    }
}

// ── RecordingMessenger ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message {
        chat_id: i64,
        text: String,
        callbacks: Vec<String>,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
        callbacks: Vec<String>,
    },
    Answer(String),
}

impl Sent {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Message { text, .. } | Self::Edit { text, .. } => Some(text),
            Self::Answer(_) => None,
        }
    }

    pub fn callbacks(&self) -> &[String] {
        match self {
            Self::Message { callbacks, .. } | Self::Edit { callbacks, .. } => callbacks,
            Self::Answer(_) => &[],
        }
    }
}

/// Messenger that records everything sent. With `failing`, every call errors.
#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Arc<Mutex<Vec<Sent>>>,
    pub failing: bool,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            failing: true,
        }
    }

    /// Returns a shared handle to the recorded calls for post-execution inspection.
    pub fn sent_handle(&self) -> Arc<Mutex<Vec<Sent>>> {
        Arc::clone(&self.sent)
    }

    fn push(&self, sent: Sent) -> Result<(), BotServiceError> {
        if self.failing {
            return Err(anyhow::anyhow!("chat api unavailable").into());
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

fn callbacks(keyboard: Option<&Keyboard>) -> Vec<String> {
    keyboard
        .map(|k| k.callbacks().map(str::to_owned).collect())
        .unwrap_or_default()
}

impl Messenger for RecordingMessenger {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), BotServiceError> {
        self.push(Sent::Message {
            chat_id,
            text: text.to_owned(),
            callbacks: callbacks(keyboard),
        })
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), BotServiceError> {
        self.push(Sent::Edit {
            chat_id,
            message_id,
            text: text.to_owned(),
            callbacks: callbacks(keyboard),
        })
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), BotServiceError> {
        self.push(Sent::Answer(callback_id.to_owned()))
    }
}
