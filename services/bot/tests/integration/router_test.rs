use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use pshik_bot::domain::repository::UserRepository;
use pshik_bot::router::build_router;
use pshik_bot::state::AppState;
use pshik_domain::id::TgUserId;
use pshik_testing::keys::{BOT_KEY_HEADER, DEVICE_API_KEY_HEADER, TestKeys, header};
use pshik_testing::telegram::{callback_update, start_update};

use crate::helpers::{device, test_state};

async fn server() -> (TestServer, AppState) {
    let state = test_state().await;
    let server = TestServer::new(build_router(state.clone())).unwrap();
    (server, state)
}

#[tokio::test]
async fn should_report_health() {
    let (server, _) = server().await;

    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "pshik-bot");
    assert_eq!(body["env"], "test");

    server.get("/readyz").await.assert_status_ok();
    server.get("/healthz").await.assert_status_ok();
}

#[tokio::test]
async fn should_issue_then_redeem_over_http() {
    let (server, _) = server().await;
    let keys = TestKeys::default();
    let (bot_name, bot_value) = keys.bot_header();
    let (device_name, device_value) = keys.device_header();

    let resp = server
        .post("/api/bot/issue-credit")
        .add_header(bot_name.clone(), bot_value.clone())
        .json(&json!({ "tg_user_id": 42, "device_id": "BANYA_01" }))
        .await;
    resp.assert_status_ok();
    let issued: Value = resp.json();
    assert_eq!(issued["ok"], true);
    let code = issued["code"].as_str().unwrap().to_owned();
    assert_eq!(code.len(), 6);
    assert!(issued["expires_at"].as_str().unwrap().ends_with('Z'));

    // Numeric codes are accepted as well as strings.
    let numeric: u64 = code.parse().unwrap();
    let resp = server
        .post("/api/device/redeem-credit")
        .add_header(device_name.clone(), device_value.clone())
        .json(&json!({ "device_id": "BANYA_01", "code": numeric }))
        .await;
    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>(), json!({ "ok": true, "result": "OK" }));

    let resp = server
        .post("/api/device/redeem-credit")
        .add_header(device_name, device_value)
        .json(&json!({ "device_id": "BANYA_01", "code": code }))
        .await;
    resp.assert_status_ok();
    assert_eq!(
        resp.json::<Value>(),
        json!({ "ok": true, "result": "DENIED", "reason": "not_active" })
    );

    // The scope was just redeemed, so it is cooling down.
    let resp = server
        .post("/api/bot/issue-credit")
        .add_header(bot_name, bot_value)
        .json(&json!({ "tg_user_id": 42, "device_id": "BANYA_01" }))
        .await;
    resp.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.json::<Value>()["error"], "cooldown");
}

#[tokio::test]
async fn should_reject_issue_with_bad_key_before_reading_body() {
    let (server, _) = server().await;
    let (name, value) = header(BOT_KEY_HEADER, "wrong");

    let resp = server
        .post("/api/bot/issue-credit")
        .add_header(name, value)
        .text("not json")
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = resp.json();
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "bad_key");
}

#[tokio::test]
async fn should_reject_malformed_issue_request() {
    let (server, _) = server().await;
    let (name, value) = TestKeys::default().bot_header();

    let resp = server
        .post("/api/bot/issue-credit")
        .add_header(name, value)
        .json(&json!({ "tg_user_id": 42, "device_id": "banya-1" }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["error"], "bad_request");
}

#[tokio::test]
async fn should_refuse_issue_for_user_without_device() {
    let (server, _) = server().await;
    let (name, value) = TestKeys::default().bot_header();

    let resp = server
        .post("/api/bot/issue-credit")
        .add_header(name, value)
        .json(&json!({ "tg_user_id": 42 }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["error"], "device_not_bound");
}

#[tokio::test]
async fn should_map_redeem_rejections_to_status_codes() {
    let (server, _) = server().await;

    // Key is checked before the body is looked at.
    let (name, value) = header(DEVICE_API_KEY_HEADER, "wrong");
    let resp = server
        .post("/api/device/redeem-credit")
        .add_header(name, value)
        .text("{")
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.json::<Value>(),
        json!({ "ok": false, "result": "DENIED", "reason": "bad_key" })
    );

    let (name, value) = TestKeys::default().device_header();
    let resp = server
        .post("/api/device/redeem-credit")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "device_id": "BANYA_01" }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["reason"], "bad_request");

    let resp = server
        .post("/api/device/redeem-credit")
        .add_header(name, value)
        .json(&json!({ "device_id": "BANYA_01", "code": "100000" }))
        .await;
    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>()["reason"], "not_found");
}

#[tokio::test]
async fn should_reject_webhook_without_secret() {
    let (server, _) = server().await;

    let resp = server
        .post("/webhook/telegram")
        .json(&start_update(1, 42, Some("BANYA_01")))
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(resp.json::<Value>(), json!({ "ok": false }));
}

#[tokio::test]
async fn should_process_webhook_update_even_when_chat_api_is_down() {
    let (server, state) = server().await;
    let (name, value) = TestKeys::default().telegram_header();

    let resp = server
        .post("/webhook/telegram")
        .add_header(name, value)
        .json(&start_update(1, 42, Some("BANYA_01")))
        .await;
    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>(), json!({ "ok": true }));

    let device_id = state.user_repo().current_device(TgUserId(42)).await.unwrap();
    assert_eq!(device_id, Some(device("BANYA_01")));
}

#[tokio::test]
async fn should_acknowledge_unreadable_and_unknown_updates() {
    let (server, _) = server().await;
    let (name, value) = TestKeys::default().telegram_header();

    let resp = server
        .post("/webhook/telegram")
        .add_header(name.clone(), value.clone())
        .text("garbage")
        .await;
    resp.assert_status_ok();

    let resp = server
        .post("/webhook/telegram")
        .add_header(name, value)
        .json(&callback_update(2, 42, 10, "CB_NOT_A_THING"))
        .await;
    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>(), json!({ "ok": true }));
}
