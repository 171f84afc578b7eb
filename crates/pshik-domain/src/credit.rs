//! Credit lifecycle and redemption outcome types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a credit.
///
/// `Active` is the only non-terminal state: it moves to `Used` on redemption,
/// to `Expired` when presented after `expires_at`, or to `Revoked` when a newer
/// credit is issued in the same scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    Active,
    Used,
    Expired,
    Revoked,
}

impl CreditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Used => "used",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid credit reason: {0:?}")]
pub struct InvalidCreditReason(pub String);

/// Classification tag a credit is issued under (`problem`, `feedback`, ...).
///
/// Also the revocation scope together with the owner: a user holds at most one
/// active credit per reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CreditReason(String);

impl CreditReason {
    pub const MAX_LEN: usize = 32;

    pub fn problem() -> Self {
        Self("problem".to_owned())
    }

    pub fn feedback() -> Self {
        Self("feedback".to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_reason(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }
    s.len() <= CreditReason::MAX_LEN
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

impl FromStr for CreditReason {
    type Err = InvalidCreditReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_reason(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidCreditReason(s.to_owned()))
        }
    }
}

impl TryFrom<String> for CreditReason {
    type Error = InvalidCreditReason;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if is_reason(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidCreditReason(s))
        }
    }
}

impl From<CreditReason> for String {
    fn from(reason: CreditReason) -> Self {
        reason.0
    }
}

impl fmt::Display for CreditReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result tag stored on every redemption attempt row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptResult {
    Success,
    Denied,
    Error,
}

/// Why a redemption was denied. Wire format: snake_case tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    BadKey,
    BadRequest,
    NotFound,
    WrongDevice,
    NotActive,
    Expired,
    Race,
}

impl DenialReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadKey => "bad_key",
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::WrongDevice => "wrong_device",
            Self::NotActive => "not_active",
            Self::Expired => "expired",
            Self::Race => "race",
        }
    }

    /// Client-side failures that are rejected before the credit is consulted.
    pub fn is_rejection(self) -> bool {
        matches!(self, Self::BadKey | Self::BadRequest)
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of presenting a code at a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    Ok,
    Denied(DenialReason),
}

impl RedeemOutcome {
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn reason(self) -> Option<DenialReason> {
        match self {
            Self::Ok => None,
            Self::Denied(reason) => Some(reason),
        }
    }
}
