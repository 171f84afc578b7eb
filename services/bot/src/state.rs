use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::BotConfig;
use crate::infra::db::{
    DbCreditRepository, DbFeedbackRepository, DbRedemptionRepository, DbSessionStateRepository,
    DbUserRepository,
};
use crate::infra::telegram::TelegramClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<BotConfig>,
    pub telegram: TelegramClient,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: BotConfig) -> Self {
        let telegram = TelegramClient::new(&config.telegram_api_url, &config.bot_token);
        Self {
            db,
            config: Arc::new(config),
            telegram,
        }
    }

    pub fn credit_repo(&self) -> DbCreditRepository {
        DbCreditRepository {
            db: self.db.clone(),
        }
    }

    pub fn redemption_repo(&self) -> DbRedemptionRepository {
        DbRedemptionRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionStateRepository {
        DbSessionStateRepository {
            db: self.db.clone(),
        }
    }

    pub fn feedback_repo(&self) -> DbFeedbackRepository {
        DbFeedbackRepository {
            db: self.db.clone(),
        }
    }
}
