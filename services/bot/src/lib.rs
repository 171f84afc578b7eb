//! pshik bot service: credit issuance and redemption over HTTP, and the
//! Telegram dialogue that hands credits out.

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod infra;
pub mod router;
pub mod state;
pub mod usecase;
