//! Builders for Telegram `Update` payloads as delivered to the webhook.

use serde_json::{Value, json};

/// Chat id used by the builders; private chats share the user's id.
pub fn chat_id(user_id: i64) -> i64 {
    user_id
}

/// A plain text message from `user_id`.
pub fn text_update(update_id: i64, user_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "date": 1_767_225_600,
            "from": { "id": user_id, "is_bot": false, "first_name": "Test" },
            "chat": { "id": chat_id(user_id), "type": "private" },
            "text": text,
        }
    })
}

/// `/start` deep link, optionally carrying a device payload (`/start BANYA_01`).
pub fn start_update(update_id: i64, user_id: i64, device: Option<&str>) -> Value {
    let text = match device {
        Some(device) => format!("/start {device}"),
        None => "/start".to_owned(),
    };
    text_update(update_id, user_id, &text)
}

/// An inline-keyboard button press.
pub fn callback_update(update_id: i64, user_id: i64, message_id: i64, data: &str) -> Value {
    json!({
        "update_id": update_id,
        "callback_query": {
            "id": format!("cb-{update_id}"),
            "from": { "id": user_id, "is_bot": false, "first_name": "Test" },
            "message": {
                "message_id": message_id,
                "date": 1_767_225_600,
                "chat": { "id": chat_id(user_id), "type": "private" },
                "text": "menu",
            },
            "chat_instance": "1",
            "data": data,
        }
    })
}
