use chrono::Utc;
use uuid::Uuid;

use pshik_domain::credit::CreditReason;
use pshik_domain::id::{DeviceId, TgUserId};

use crate::domain::action::{CallbackAction, ProblemKind};
use crate::domain::repository::{
    CreditRepository, FeedbackRepository, Messenger, SessionStateRepository, UserRepository,
};
use crate::domain::types::{
    FEEDBACK_GIFT_DAYS, Feedback, FeedbackTopic, MAX_FEEDBACK_LEN, PendingText, Rating, Screen,
};
use crate::error::BotServiceError;
use crate::usecase::issue::{IssueCreditInput, IssueCreditUseCase};
use crate::usecase::menu::{self, Reward};
use crate::usecase::session::{Captured, SessionUseCase};

/// A chat update reduced to what the dialogue reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `/start`, optionally with the device id from a scanned QR deep link.
    Start {
        user: TgUserId,
        chat: i64,
        device: Option<DeviceId>,
    },
    Text {
        user: TgUserId,
        chat: i64,
        text: String,
    },
    Callback {
        user: TgUserId,
        chat: i64,
        message_id: i64,
        callback_id: String,
        action: CallbackAction,
    },
    Ignored,
}

/// Where a rendered screen goes.
enum Delivery {
    New,
    Replace(i64),
}

pub struct DialogueUseCase<C, U, S, F, M>
where
    C: CreditRepository,
    U: UserRepository,
    S: SessionStateRepository,
    F: FeedbackRepository,
    M: Messenger,
{
    /// Also owns the user repository used for `last_seen_at` and device lookups.
    pub issue: IssueCreditUseCase<C, U>,
    pub session: SessionUseCase<S>,
    pub feedback: F,
    pub messenger: M,
}

impl<C, U, S, F, M> DialogueUseCase<C, U, S, F, M>
where
    C: CreditRepository,
    U: UserRepository,
    S: SessionStateRepository,
    F: FeedbackRepository,
    M: Messenger,
{
    /// Store failures propagate; outbound message failures are logged and swallowed.
    pub async fn handle(&self, event: InboundEvent) -> Result<(), BotServiceError> {
        match event {
            InboundEvent::Start { user, chat, device } => {
                self.issue.users.touch(user, device.as_ref()).await?;
                self.session.cancel(user).await?;
                if let Some(device) = &device {
                    tracing::info!(tg_user_id = %user, device_id = %device, "device bound");
                }
                self.deliver(chat, Delivery::New, menu::welcome()).await;
            }
            InboundEvent::Text { user, chat, text } => {
                self.issue.users.touch(user, None).await?;
                let screen = self.on_text(user, text).await?;
                self.deliver(chat, Delivery::New, screen).await;
            }
            InboundEvent::Callback {
                user,
                chat,
                message_id,
                callback_id,
                action,
            } => {
                self.issue.users.touch(user, None).await?;
                if let Err(e) = self.messenger.answer_callback(&callback_id).await {
                    tracing::warn!(error = ?e, "failed to answer callback query");
                }
                let delivery = match action {
                    CallbackAction::MainMenu | CallbackAction::Unknown(_) => Delivery::New,
                    _ => Delivery::Replace(message_id),
                };
                let screen = self.on_action(user, action).await?;
                self.deliver(chat, delivery, screen).await;
            }
            InboundEvent::Ignored => {}
        }
        Ok(())
    }

    async fn on_text(&self, user: TgUserId, text: String) -> Result<Screen, BotServiceError> {
        if text.trim() == "/cancel" {
            self.session.cancel(user).await?;
            return Ok(menu::cancelled());
        }

        match self.session.capture(user, text).await? {
            Captured::PassThrough(_) => Ok(menu::main_menu()),
            Captured::Text { pending, text } => self.store_text(user, pending, text).await,
        }
    }

    async fn on_action(
        &self,
        user: TgUserId,
        action: CallbackAction,
    ) -> Result<Screen, BotServiceError> {
        let screen = match action {
            CallbackAction::MainMenu => menu::main_menu(),
            CallbackAction::Unknown(data) => {
                tracing::debug!(data = %data, "unknown callback data");
                menu::main_menu()
            }
            CallbackAction::ServiceMenu => menu::service_menu(),
            CallbackAction::Service(topic) => menu::service_page(topic),
            CallbackAction::ProblemMenu => menu::problem_menu(),
            CallbackAction::Problem(kind) => self.compensate(user, kind).await?,
            CallbackAction::ProblemOther => {
                self.wait_for_text(user, FeedbackTopic::ProblemOther)
                    .await?
            }
            CallbackAction::AromasMenu => menu::aromas_menu(),
            CallbackAction::AromaList(line) => menu::aroma_list(line),
            CallbackAction::Aroma(line, number) => menu::aroma_card(line, number),
            CallbackAction::CertsMenu => menu::certs(),
            CallbackAction::FeedbackMenu => menu::feedback_menu(),
            CallbackAction::FeedbackGood => self.rate(user, Rating::Good).await?,
            CallbackAction::FeedbackBad => self.rate(user, Rating::Bad).await?,
            CallbackAction::FeedbackWrite => {
                self.wait_for_text(user, FeedbackTopic::Feedback).await?
            }
            CallbackAction::Cancel => {
                self.session.cancel(user).await?;
                menu::cancelled()
            }
        };
        Ok(screen)
    }

    async fn compensate(&self, user: TgUserId, kind: ProblemKind) -> Result<Screen, BotServiceError> {
        let input = IssueCreditInput {
            owner: user,
            device_id: None,
            reason: CreditReason::problem(),
            validity_days: kind.compensation_days(),
        };
        match self.issue.execute(input).await {
            Ok(issued) => Ok(menu::compensation(&issued)),
            Err(BotServiceError::DeviceNotBound) => Ok(menu::scan_device()),
            Err(BotServiceError::Cooldown) => Ok(menu::cooldown()),
            Err(BotServiceError::CodeGenerationExhausted) => {
                tracing::error!(tg_user_id = %user, "no free credit code for compensation");
                Ok(menu::temporarily_unavailable())
            }
            Err(e) => Err(e),
        }
    }

    async fn wait_for_text(
        &self,
        user: TgUserId,
        topic: FeedbackTopic,
    ) -> Result<Screen, BotServiceError> {
        self.session
            .begin(
                user,
                PendingText {
                    topic,
                    rating: None,
                },
            )
            .await?;
        Ok(menu::ask_for_text(topic))
    }

    /// Records the rating right away, then waits for a message that explains it.
    async fn rate(&self, user: TgUserId, rating: Rating) -> Result<Screen, BotServiceError> {
        let device_id = self.issue.users.current_device(user).await?;
        self.feedback
            .create(&Feedback {
                id: Uuid::now_v7(),
                tg_user_id: user,
                device_id,
                rating: Some(rating),
                topic: None,
                message: None,
                created_at: Utc::now(),
            })
            .await?;
        self.session
            .begin(
                user,
                PendingText {
                    topic: FeedbackTopic::Feedback,
                    rating: Some(rating),
                },
            )
            .await?;
        Ok(menu::rating_saved())
    }

    async fn store_text(
        &self,
        user: TgUserId,
        pending: PendingText,
        text: String,
    ) -> Result<Screen, BotServiceError> {
        let device_id = self.issue.users.current_device(user).await?;
        let message: String = text.trim().chars().take(MAX_FEEDBACK_LEN).collect();
        self.feedback
            .create(&Feedback {
                id: Uuid::now_v7(),
                tg_user_id: user,
                device_id: device_id.clone(),
                rating: pending.rating,
                topic: Some(pending.topic),
                message: Some(message),
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(tg_user_id = %user, topic = pending.topic.as_str(), "feedback stored");

        let gift = match (pending.topic, device_id) {
            (FeedbackTopic::Feedback, Some(device_id)) => self.gift(user, device_id).await?,
            _ => Reward::Nothing,
        };
        Ok(menu::text_received(&gift))
    }

    async fn gift(
        &self,
        user: TgUserId,
        device_id: DeviceId,
    ) -> Result<Reward, BotServiceError> {
        let input = IssueCreditInput {
            owner: user,
            device_id: Some(device_id),
            reason: CreditReason::feedback(),
            validity_days: FEEDBACK_GIFT_DAYS,
        };
        match self.issue.execute(input).await {
            Ok(issued) => Ok(Reward::Gift(issued)),
            Err(BotServiceError::Cooldown) => Ok(Reward::Later),
            Err(BotServiceError::CodeGenerationExhausted) => {
                tracing::error!(tg_user_id = %user, "no free credit code for feedback gift");
                Ok(Reward::Nothing)
            }
            Err(e) => Err(e),
        }
    }

    async fn deliver(&self, chat: i64, delivery: Delivery, screen: Screen) {
        let result = match delivery {
            Delivery::New => {
                self.messenger
                    .send_message(chat, &screen.text, screen.keyboard.as_ref())
                    .await
            }
            Delivery::Replace(message_id) => {
                self.messenger
                    .edit_message(chat, message_id, &screen.text, screen.keyboard.as_ref())
                    .await
            }
        };
        if let Err(e) = result {
            tracing::warn!(chat_id = chat, error = ?e, "failed to deliver message");
        }
    }
}
