use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pshik_core::secret::secret_matches;
use pshik_core::serde::to_rfc3339_ms;
use pshik_domain::credit::{CreditReason, DenialReason, RedeemOutcome};
use pshik_domain::id::{CreditCode, DeviceId, TgUserId};

use crate::domain::types::DEFAULT_VALIDITY_DAYS;
use crate::error::BotServiceError;
use crate::handlers::{BOT_KEY_HEADER, DEVICE_API_KEY_HEADER, header_str};
use crate::state::AppState;
use crate::usecase::issue::{IssueCreditInput, IssueCreditUseCase};
use crate::usecase::redeem::{RedeemCreditInput, RedeemCreditUseCase};

/// JSON string or number; devices with numeric keypads send codes as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl TextOrNumber {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

// ── POST /api/bot/issue-credit ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IssueCreditRequest {
    pub tg_user_id: i64,
    pub device_id: Option<String>,
    pub reason: Option<String>,
    pub days: Option<i64>,
}

#[derive(Serialize)]
pub struct IssueCreditResponse {
    pub ok: bool,
    pub code: CreditCode,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

pub async fn issue_credit(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<IssueCreditRequest>, JsonRejection>,
) -> Result<Json<IssueCreditResponse>, BotServiceError> {
    if !secret_matches(header_str(&headers, BOT_KEY_HEADER), &state.config.bot_key) {
        return Err(BotServiceError::BadKey);
    }
    let Json(body) = body.map_err(|_| BotServiceError::BadRequest)?;
    let input = issue_input(body)?;

    let usecase = IssueCreditUseCase {
        credits: state.credit_repo(),
        users: state.user_repo(),
    };
    let issued = usecase.execute(input).await?;
    Ok(Json(IssueCreditResponse {
        ok: true,
        code: issued.code,
        expires_at: issued.expires_at,
    }))
}

fn issue_input(body: IssueCreditRequest) -> Result<IssueCreditInput, BotServiceError> {
    if body.tg_user_id <= 0 {
        return Err(BotServiceError::BadRequest);
    }
    let device_id = body
        .device_id
        .filter(|d| !d.trim().is_empty())
        .map(|d| d.trim().parse::<DeviceId>())
        .transpose()
        .map_err(|_| BotServiceError::BadRequest)?;
    let reason = match body.reason.filter(|r| !r.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<CreditReason>()
            .map_err(|_| BotServiceError::BadRequest)?,
        None => CreditReason::problem(),
    };
    Ok(IssueCreditInput {
        owner: TgUserId(body.tg_user_id),
        device_id,
        reason,
        validity_days: body.days.unwrap_or(DEFAULT_VALIDITY_DAYS),
    })
}

// ── POST /api/device/redeem-credit ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct RedeemCreditRequest {
    pub device_id: Option<TextOrNumber>,
    pub code: Option<TextOrNumber>,
}

#[derive(Serialize)]
pub struct RedeemCreditResponse {
    pub ok: bool,
    /// `OK` or `DENIED`.
    pub result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
}

impl From<RedeemOutcome> for RedeemCreditResponse {
    fn from(outcome: RedeemOutcome) -> Self {
        let reason = outcome.reason();
        Self {
            ok: !reason.is_some_and(DenialReason::is_rejection),
            result: if outcome.is_ok() { "OK" } else { "DENIED" },
            reason,
        }
    }
}

fn redeem_status(outcome: RedeemOutcome) -> StatusCode {
    match outcome.reason() {
        Some(DenialReason::BadKey) => StatusCode::UNAUTHORIZED,
        Some(DenialReason::BadRequest) => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    }
}

pub async fn redeem_credit(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RedeemCreditRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RedeemCreditResponse>), BotServiceError> {
    // A malformed body still has to go through the key check first.
    let (device_id, code) = match body {
        Ok(Json(body)) => (
            body.device_id.map(TextOrNumber::into_string).unwrap_or_default(),
            body.code.map(TextOrNumber::into_string).unwrap_or_default(),
        ),
        Err(_) => (String::new(), String::new()),
    };

    let usecase = RedeemCreditUseCase {
        credits: state.credit_repo(),
        redemptions: state.redemption_repo(),
        device_api_key: state.config.device_api_key.clone(),
    };
    let outcome = usecase
        .execute(RedeemCreditInput {
            api_key: header_str(&headers, DEVICE_API_KEY_HEADER).map(str::to_owned),
            device_id,
            code,
        })
        .await?;
    Ok((redeem_status(outcome), Json(outcome.into())))
}
