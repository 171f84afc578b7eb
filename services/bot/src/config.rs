/// Bot service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Deployment name reported by `/health` (default "dev"). Env var: `ENV`.
    pub env: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3000). Env var: `PORT`.
    pub port: u16,
    /// Telegram Bot API token.
    pub bot_token: String,
    /// Bot username, used for deep links (default "pshikapp_bot").
    pub bot_username: String,
    /// Shared secret for internal callers of `POST /api/bot/issue-credit`.
    pub bot_key: String,
    /// Shared secret presented by devices on `POST /api/device/redeem-credit`.
    pub device_api_key: String,
    /// Secret Telegram echoes in `x-telegram-bot-api-secret-token`.
    pub tg_secret_token: String,
    /// Public base URL of this service (default `http://localhost:<PORT>`).
    pub base_url: String,
    /// When set, the webhook `<WEBHOOK_URL>/webhook/telegram` is registered at startup.
    pub webhook_url: Option<String>,
    /// Run migrations before serving. Env var: `AUTO_MIGRATE=1`.
    pub auto_migrate: bool,
    /// Telegram Bot API root (default "https://api.telegram.org").
    pub telegram_api_url: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing env: {0}")]
    Missing(&'static str),
    #[error("invalid env {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

const DEFAULT_PORT: u16 = 3000;

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            env: get("ENV").unwrap_or_else(|| "dev".to_owned()),
            database_url: require("DATABASE_URL")?,
            port,
            bot_token: require("BOT_TOKEN")?,
            bot_username: get("BOT_USERNAME").unwrap_or_else(|| "pshikapp_bot".to_owned()),
            bot_key: require("BOT_KEY")?,
            device_api_key: require("DEVICE_API_KEY")?,
            tg_secret_token: require("TG_SECRET_TOKEN")?,
            base_url: get("BASE_URL").unwrap_or_else(|| format!("http://localhost:{port}")),
            webhook_url: get("WEBHOOK_URL").map(|url| url.trim_end_matches('/').to_owned()),
            auto_migrate: get("AUTO_MIGRATE").is_some_and(|v| v.trim() == "1"),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| "https://api.telegram.org".to_owned()),
        })
    }
}
