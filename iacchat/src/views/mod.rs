//! View models composing the store, the chat logic and subscriptions.

mod chat_list;
mod room;

pub use chat_list::{ChatListEntry, ChatListView};
pub use room::{RoomView, TimelineEntry};
