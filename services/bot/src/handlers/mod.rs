use axum::http::HeaderMap;

pub mod credit;
pub mod health;
pub mod webhook;

pub const BOT_KEY_HEADER: &str = "x-bot-key";
pub const DEVICE_API_KEY_HEADER: &str = "x-device-api-key";
pub const TELEGRAM_SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Header value as text; absent and non-UTF-8 values both read as `None`.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
