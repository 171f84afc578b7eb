use axum::{
    Router,
    routing::{get, post},
};

use pshik_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    credit::{issue_credit, redeem_credit},
    health::{health, healthz, readyz},
    webhook::telegram_webhook,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Credits
        .route("/api/bot/issue-credit", post(issue_credit))
        .route("/api/device/redeem-credit", post(redeem_credit))
        // Telegram
        .route("/webhook/telegram", post(telegram_webhook))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
