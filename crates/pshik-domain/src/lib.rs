//! Domain types shared across pshik crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; `infra/` maps them to rows.

pub mod credit;
pub mod id;
