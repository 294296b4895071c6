//! Rule evaluation: per-room pass and installation-wide pass.

pub mod global;
pub mod room;

pub use global::{validate_global, OCCUPANCY_MESSAGE_KEY, OCCUPANCY_RULE_ID};
pub use room::{validate_room, RoomOutcome};
