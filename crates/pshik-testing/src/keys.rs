//! Shared-secret headers for integration tests.
//!
//! Every pshik endpoint is guarded by a static secret header. `TestKeys`
//! holds one value per header so tests can present the right (or a wrong)
//! secret without going through real device firmware or Telegram.

use http::{HeaderName, HeaderValue};

pub const DEVICE_API_KEY_HEADER: &str = "x-device-api-key";
pub const BOT_KEY_HEADER: &str = "x-bot-key";
pub const TELEGRAM_SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Secrets configured on the service under test.
pub struct TestKeys {
    pub device_api_key: String,
    pub bot_key: String,
    pub telegram_secret: String,
}

impl Default for TestKeys {
    fn default() -> Self {
        Self {
            device_api_key: "test-device-key".to_owned(),
            bot_key: "test-bot-key".to_owned(),
            telegram_secret: "test-telegram-secret".to_owned(),
        }
    }
}

impl TestKeys {
    pub fn device_header(&self) -> (HeaderName, HeaderValue) {
        header(DEVICE_API_KEY_HEADER, &self.device_api_key)
    }

    pub fn bot_header(&self) -> (HeaderName, HeaderValue) {
        header(BOT_KEY_HEADER, &self.bot_key)
    }

    pub fn telegram_header(&self) -> (HeaderName, HeaderValue) {
        header(TELEGRAM_SECRET_HEADER, &self.telegram_secret)
    }
}

/// Build a header pair. Panics on values that are not valid header text.
pub fn header(name: &'static str, value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(name),
        HeaderValue::from_str(value).unwrap(),
    )
}
