use pshik_domain::id::TgUserId;

use crate::domain::repository::SessionStateRepository;
use crate::domain::types::{PendingText, SessionState};
use crate::error::BotServiceError;

/// What `capture` did with an incoming text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured {
    /// The user was waiting to type something; the session is back to idle.
    Text { pending: PendingText, text: String },
    /// Nothing was awaited; handle the text as an ordinary message.
    PassThrough(String),
}

pub struct SessionUseCase<S: SessionStateRepository> {
    pub sessions: S,
}

impl<S: SessionStateRepository> SessionUseCase<S> {
    /// Start waiting for free text.
    pub async fn begin(&self, user: TgUserId, pending: PendingText) -> Result<(), BotServiceError> {
        self.sessions
            .save(user, &SessionState::AwaitingFeedbackText(pending))
            .await
    }

    pub async fn capture(&self, user: TgUserId, text: String) -> Result<Captured, BotServiceError> {
        match self.sessions.load(user).await? {
            SessionState::Idle => Ok(Captured::PassThrough(text)),
            SessionState::AwaitingFeedbackText(pending) => {
                self.sessions.save(user, &SessionState::Idle).await?;
                Ok(Captured::Text { pending, text })
            }
        }
    }

    pub async fn cancel(&self, user: TgUserId) -> Result<(), BotServiceError> {
        self.sessions.save(user, &SessionState::Idle).await
    }
}
