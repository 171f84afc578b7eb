//! Newtype wrappers for domain identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a chat-platform (Telegram) user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TgUserId(pub i64);

impl fmt::Display for TgUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies a credit row. The code is not the identity; this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditId(pub Uuid);

impl fmt::Display for CreditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid device id: {0:?}")]
pub struct InvalidDeviceId(pub String);

/// Identifies a vending device, formatted `TYPE_NN` (e.g. `BANYA_01`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `TYPE` prefix, e.g. `BANYA` for `BANYA_01`.
    pub fn kind(&self) -> &str {
        self.0.split_once('_').map_or(self.0.as_str(), |(kind, _)| kind)
    }
}

fn is_device_id(s: &str) -> bool {
    let Some((kind, number)) = s.split_once('_') else {
        return false;
    };
    !kind.is_empty()
        && kind.chars().all(|c| c.is_ascii_uppercase())
        && number.len() == 2
        && number.chars().all(|c| c.is_ascii_digit())
}

impl FromStr for DeviceId {
    type Err = InvalidDeviceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_device_id(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidDeviceId(s.to_owned()))
        }
    }
}

impl TryFrom<String> for DeviceId {
    type Error = InvalidDeviceId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if is_device_id(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidDeviceId(s))
        }
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid credit code: {0:?}")]
pub struct InvalidCreditCode(pub String);

/// Six ASCII digits, first digit non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CreditCode(String);

/// Number of digits in a credit code.
pub const CREDIT_CODE_LEN: usize = 6;

impl CreditCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_credit_code(s: &str) -> bool {
    s.len() == CREDIT_CODE_LEN
        && s.bytes().all(|b| b.is_ascii_digit())
        && !s.starts_with('0')
}

impl FromStr for CreditCode {
    type Err = InvalidCreditCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_credit_code(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidCreditCode(s.to_owned()))
        }
    }
}

impl TryFrom<String> for CreditCode {
    type Error = InvalidCreditCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if is_credit_code(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidCreditCode(s))
        }
    }
}

impl From<CreditCode> for String {
    fn from(code: CreditCode) -> Self {
        code.0
    }
}

impl fmt::Display for CreditCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
