use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::{derive_display, format_millis, Icon, Loadable, ProfileSnapshots};
use crate::models::{Message, Room};

pub const PREVIEW_SEPARATOR: &str = " • ";

/// One line of the chat list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSummary {
    pub room_id: String,
    pub name: String,
    pub icon: Icon,
    /// Last message, prefixed with its author where relevant
    pub preview: String,
    pub time_label: String,
}

impl ChatSummary {
    pub fn preview_line(&self) -> String {
        format!("{}{}{}", self.preview, PREVIEW_SEPARATOR, self.time_label)
    }
}

/// Build the chat-list entry for a room from its latest message.
///
/// Group previews name the sender by first name, so they also wait on the
/// sender's profile.
pub fn summarize<Tz>(
    room: &Room,
    last_message: &Message,
    self_id: &str,
    profiles: &ProfileSnapshots,
    now: &DateTime<Tz>,
) -> Loadable<ChatSummary>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let from_self = last_message.sender_id == self_id;

    let preview = if from_self {
        format!("You: {}", last_message.content)
    } else if room.is_direct() {
        last_message.content.clone()
    } else {
        match profiles.get(&last_message.sender_id) {
            Loadable::Loading => return Loadable::Loading,
            Loadable::Failed => return Loadable::Failed,
            Loadable::Ready(sender) => {
                format!("{}: {}", sender.first_name(), last_message.content)
            }
        }
    };

    derive_display(room, self_id, profiles).map(|details| ChatSummary {
        room_id: room.id.clone(),
        name: details.name,
        icon: details.icon,
        preview,
        time_label: format_millis(last_message.created_at, now),
    })
}
