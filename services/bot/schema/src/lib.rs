//! sea-orm entities for the bot service tables.

pub mod credits;
pub mod devices;
pub mod feedback;
pub mod redemptions;
pub mod user_state;
pub mod users;
