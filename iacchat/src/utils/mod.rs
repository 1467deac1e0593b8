mod helpers;
pub mod validation;

pub use helpers::{generate_deterministic_room_id, now_millis};
