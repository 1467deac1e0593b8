pub mod input;
mod message;
mod room;
mod user;

pub use message::Message;
pub use room::{NewRoom, Room};
pub use user::{NewUser, User};
