//! Test utilities for pshik services.
//!
//! Provides shared-secret header helpers and Telegram update builders.
//! Test-only; never a dependency of production code.

pub mod keys;
pub mod telegram;
