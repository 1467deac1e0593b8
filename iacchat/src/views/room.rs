use serde::Serialize;
use tracing::debug;

use crate::auth::Session;
use crate::chat::{derive_display, other_member, ChatDetails, Loadable, ProfileSnapshots};
use crate::commands::message::send_message;
use crate::error::ChatResult;
use crate::models::{Message, Room};
use crate::store::Store;
use crate::subscription::{Subscription, Topic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub id: String,
    pub text: String,
    pub sender_id: String,
    pub created_at: i64,
    pub is_own: bool,
}

struct Snapshot {
    /// `None` when the room is missing or the session user is not a member
    room: Option<Room>,
    profiles: ProfileSnapshots,
    messages: Vec<Message>,
}

/// A single room: header details plus the message timeline
pub struct RoomView<S: Store + ?Sized> {
    session: Session<S>,
    room_id: String,
    snapshot: Option<Snapshot>,
    subscription: Subscription,
}

impl<S: Store + ?Sized> RoomView<S> {
    pub fn new(session: Session<S>, room_id: impl Into<String>) -> Self {
        let room_id = room_id.into();
        let subscription = session.store().subscribe(vec![
            Topic::Room(room_id.clone()),
            Topic::Messages(room_id.clone()),
        ]);
        Self {
            session,
            room_id,
            snapshot: None,
            subscription,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub async fn refresh(&mut self) -> ChatResult<()> {
        let store = self.session.store();
        let self_id = self.session.user_id();

        let room = store
            .get_room(&self.room_id)
            .await?
            .filter(|room| room.has_member(self_id));

        let mut profiles = ProfileSnapshots::new();
        let mut messages = Vec::new();
        let mut topics = vec![
            Topic::Room(self.room_id.clone()),
            Topic::Messages(self.room_id.clone()),
        ];
        if let Some(room) = &room {
            if let Some(other) = other_member(&room.members, self_id) {
                profiles.load(store, [other.to_string()]).await?;
                topics.push(Topic::User(other.to_string()));
            }
            messages = store.messages_of(&room.id, None).await?;
        }
        self.subscription.set_topics(topics);

        debug!(room_id = %self.room_id, messages = messages.len(), "Room refreshed");
        self.snapshot = Some(Snapshot {
            room,
            profiles,
            messages,
        });
        Ok(())
    }

    /// Wait for the next change to the room, its messages or the counterpart
    /// profile, then refresh
    pub async fn next_change(&mut self) -> ChatResult<bool> {
        match self.subscription.changed().await {
            Some(topic) => {
                debug!(%topic, "Room changed");
                self.refresh().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn details(&self) -> Loadable<ChatDetails> {
        match &self.snapshot {
            None => Loadable::Loading,
            Some(Snapshot { room: None, .. }) => Loadable::Failed,
            Some(Snapshot {
                room: Some(room),
                profiles,
                ..
            }) => derive_display(room, self.session.user_id(), profiles),
        }
    }

    /// Messages newest first, flagged with whether the session user sent them
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };
        let self_id = self.session.user_id();
        snapshot
            .messages
            .iter()
            .map(|message| TimelineEntry {
                id: message.id.clone(),
                text: message.content.clone(),
                sender_id: message.sender_id.clone(),
                created_at: message.created_at,
                is_own: message.sender_id == self_id,
            })
            .collect()
    }

    /// Send a message to this room and reload the timeline
    pub async fn send(&mut self, text: &str) -> ChatResult<Message> {
        let message = send_message(&self.session, &self.room_id, text).await?;
        self.refresh().await?;
        // The refresh already reflects our own write
        let _ = self.subscription.try_changed();
        Ok(message)
    }
}
