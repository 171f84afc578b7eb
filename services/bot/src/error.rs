use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Bot service domain error variants.
///
/// Redemption denials are not errors; they travel as `RedeemOutcome`.
#[derive(Debug, thiserror::Error)]
pub enum BotServiceError {
    #[error("bad request")]
    BadRequest,
    #[error("bad key")]
    BadKey,
    #[error("no device bound to user")]
    DeviceNotBound,
    #[error("credit recently redeemed, try again later")]
    Cooldown,
    #[error("code generation exhausted")]
    CodeGenerationExhausted,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl BotServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::BadKey => "bad_key",
            Self::DeviceNotBound => "device_not_bound",
            Self::Cooldown => "cooldown",
            Self::CodeGenerationExhausted => "code_gen_failed",
            Self::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest | Self::DeviceNotBound => StatusCode::BAD_REQUEST,
            Self::BadKey => StatusCode::UNAUTHORIZED,
            Self::Cooldown => StatusCode::TOO_MANY_REQUESTS,
            Self::CodeGenerationExhausted | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BotServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client errors and already visible in the TraceLayer span.
        match &self {
            Self::Internal(e) => {
                let cause = format!("{e:#}");
                tracing::error!(error = %cause, kind = self.kind(), "internal error");
            }
            Self::CodeGenerationExhausted => {
                tracing::error!(kind = self.kind(), "no free credit code within attempt bound");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "ok": false,
            "error": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
