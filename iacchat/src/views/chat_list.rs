use std::collections::HashMap;
use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::auth::Session;
use crate::chat::{other_member, summarize, ChatSummary, Loadable, ProfileSnapshots};
use crate::error::ChatResult;
use crate::models::{Message, Room};
use crate::store::Store;
use crate::subscription::{Subscription, Topic};

/// One row of the chat list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatListEntry {
    Loading { room_id: String },
    Ready(ChatSummary),
}

struct Snapshot {
    rooms: Vec<Room>,
    last_messages: HashMap<String, Option<Message>>,
    profiles: ProfileSnapshots,
}

/// The rooms of the session user with their latest message, kept current
/// through a store subscription.
pub struct ChatListView<S: Store + ?Sized> {
    session: Session<S>,
    snapshot: Option<Snapshot>,
    subscription: Subscription,
}

impl<S: Store + ?Sized> ChatListView<S> {
    pub fn new(session: Session<S>) -> Self {
        let subscription = session
            .store()
            .subscribe(vec![Topic::RoomsOf(session.user_id().to_string())]);
        Self {
            session,
            snapshot: None,
            subscription,
        }
    }

    /// Reload rooms, latest messages and the profiles the summaries need
    pub async fn refresh(&mut self) -> ChatResult<()> {
        let store = self.session.store();
        let self_id = self.session.user_id();
        let rooms = store.rooms_containing(self_id).await?;

        let mut last_messages = HashMap::with_capacity(rooms.len());
        let mut wanted = Vec::new();
        for room in &rooms {
            let last = store.messages_of(&room.id, Some(1)).await?.into_iter().next();
            if let Some(other) = other_member(&room.members, self_id) {
                wanted.push(other.to_string());
            } else if let Some(message) = last.as_ref().filter(|m| m.sender_id != self_id) {
                wanted.push(message.sender_id.clone());
            }
            last_messages.insert(room.id.clone(), last);
        }

        let mut profiles = ProfileSnapshots::new();
        profiles.load(store, wanted).await?;

        let mut topics = vec![Topic::RoomsOf(self_id.to_string())];
        topics.extend(rooms.iter().map(|room| Topic::Messages(room.id.clone())));
        topics.extend(profiles.ids().map(|id| Topic::User(id.to_string())));
        self.subscription.set_topics(topics);

        debug!(rooms = rooms.len(), "Chat list refreshed");
        self.snapshot = Some(Snapshot {
            rooms,
            last_messages,
            profiles,
        });
        Ok(())
    }

    /// Wait for the next relevant store change, then refresh.
    /// Returns `false` once the store stops publishing.
    pub async fn next_change(&mut self) -> ChatResult<bool> {
        match self.subscription.changed().await {
            Some(topic) => {
                debug!(%topic, "Chat list changed");
                self.refresh().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Refresh if a change is already queued. Returns whether it refreshed.
    pub async fn poll_change(&mut self) -> ChatResult<bool> {
        if self.subscription.try_changed().is_none() {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Chat-list rows, most recently active first.
    ///
    /// Rooms without any message are left out, as are rooms whose name or
    /// preview cannot be resolved.
    pub fn summaries<Tz>(&self, now: &DateTime<Tz>) -> Loadable<Vec<ChatListEntry>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let Some(snapshot) = &self.snapshot else {
            return Loadable::Loading;
        };
        let self_id = self.session.user_id();

        let entries = snapshot
            .rooms
            .iter()
            .filter_map(|room| {
                let last = snapshot.last_messages.get(&room.id)?.as_ref()?;
                match summarize(room, last, self_id, &snapshot.profiles, now) {
                    Loadable::Ready(summary) => Some(ChatListEntry::Ready(summary)),
                    Loadable::Loading => Some(ChatListEntry::Loading {
                        room_id: room.id.clone(),
                    }),
                    Loadable::Failed => None,
                }
            })
            .collect();
        Loadable::Ready(entries)
    }
}
