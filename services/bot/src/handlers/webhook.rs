use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use serde_json::{Value, json};

use pshik_core::secret::secret_matches;
use pshik_domain::id::{DeviceId, TgUserId};

use crate::domain::action::CallbackAction;
use crate::handlers::{TELEGRAM_SECRET_HEADER, header_str};
use crate::state::AppState;
use crate::usecase::dialogue::{DialogueUseCase, InboundEvent};
use crate::usecase::issue::IssueCreditUseCase;
use crate::usecase::session::SessionUseCase;

// Only the fields the dialogue reads; everything else in an Update is ignored.

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Reduce an update to the event the dialogue handles.
pub fn classify(update: Update) -> InboundEvent {
    if let Some(query) = update.callback_query {
        let (Some(message), Some(data)) = (query.message, query.data) else {
            return InboundEvent::Ignored;
        };
        return InboundEvent::Callback {
            user: TgUserId(query.from.id),
            chat: message.chat.id,
            message_id: message.message_id,
            callback_id: query.id,
            action: CallbackAction::parse(&data),
        };
    }

    let Some(Message {
        from: Some(from),
        chat,
        text: Some(text),
        ..
    }) = update.message
    else {
        return InboundEvent::Ignored;
    };

    let mut words = text.split_whitespace();
    if !words.next().is_some_and(is_start) {
        return InboundEvent::Text {
            user: TgUserId(from.id),
            chat: chat.id,
            text,
        };
    }
    InboundEvent::Start {
        user: TgUserId(from.id),
        chat: chat.id,
        // Anything that is not a `TYPE_NN` device id is dropped.
        device: words.next().and_then(|payload| payload.parse::<DeviceId>().ok()),
    }
}

/// `/start` or `/start@<bot>`.
fn is_start(command: &str) -> bool {
    command == "/start" || command.starts_with("/start@")
}

/// `POST /webhook/telegram`
///
/// Telegram redelivers anything that is not a 2xx, so once the secret matches
/// every outcome is acknowledged with 200.
pub async fn telegram_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Update>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let presented = header_str(&headers, TELEGRAM_SECRET_HEADER);
    if !secret_matches(presented, &state.config.tg_secret_token) {
        tracing::warn!(
            secret_present = presented.is_some(),
            "telegram webhook rejected: bad secret token"
        );
        return (StatusCode::UNAUTHORIZED, Json(json!({ "ok": false })));
    }

    let update = match body {
        Ok(Json(update)) => update,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "unreadable telegram update");
            return (StatusCode::OK, Json(json!({ "ok": true })));
        }
    };
    let update_id = update.update_id;

    let dialogue = DialogueUseCase {
        issue: IssueCreditUseCase {
            credits: state.credit_repo(),
            users: state.user_repo(),
        },
        session: SessionUseCase {
            sessions: state.session_repo(),
        },
        feedback: state.feedback_repo(),
        messenger: state.telegram.clone(),
    };
    if let Err(e) = dialogue.handle(classify(update)).await {
        tracing::error!(update_id, error = ?e, "failed to handle telegram update");
    }
    (StatusCode::OK, Json(json!({ "ok": true })))
}
