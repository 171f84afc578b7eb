//! Plumbing shared by pshik services: request ids, tracing setup,
//! shared-secret checks and wire serializers.

pub mod middleware;
pub mod secret;
pub mod serde;
pub mod tracing;
