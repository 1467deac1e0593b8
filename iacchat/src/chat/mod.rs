//! Room display logic shared by the chat list and the room view.

mod details;
mod identity;
mod profiles;
mod summary;
mod time;

pub use details::{derive_display, ChatDetails, Icon, Loadable};
pub use identity::other_member;
pub use profiles::ProfileSnapshots;
pub use summary::{summarize, ChatSummary, PREVIEW_SEPARATOR};
pub use time::{format_millis, format_relative};
