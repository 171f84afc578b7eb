use anyhow::Context as _;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use pshik_bot::config::BotConfig;
use pshik_bot::router::build_router;
use pshik_bot::state::AppState;
use pshik_bot_migration::Migrator;
use pshik_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing("pshik_bot=info,tower_http=info");

    let config = BotConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    if config.auto_migrate {
        info!("AUTO_MIGRATE=1, applying migrations");
        Migrator::up(&db, None)
            .await
            .context("failed to apply migrations")?;
    }

    let state = AppState::new(db, config);

    if let Some(webhook_url) = &state.config.webhook_url {
        let url = format!("{webhook_url}/webhook/telegram");
        match state
            .telegram
            .set_webhook(&url, &state.config.tg_secret_token)
            .await
        {
            Ok(()) => info!(url = %url, "telegram webhook registered"),
            Err(e) => tracing::warn!(error = ?e, "failed to register telegram webhook"),
        }
    }

    let addr = format!("0.0.0.0:{}", state.config.port);
    let base_url = state.config.base_url.clone();
    let bot = format!("@{}", state.config.bot_username);
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%base_url, %bot, "bot service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
