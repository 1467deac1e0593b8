use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

/// A piece of store data a view can watch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// A single user document
    User(String),
    /// The set of rooms a user is a member of
    RoomsOf(String),
    /// A single room document
    Room(String),
    /// The messages of a room
    Messages(String),
}

impl Topic {
    fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::User(id) => write!(f, "users/{}", id),
            Topic::RoomsOf(id) => write!(f, "rooms?member={}", id),
            Topic::Room(id) => write!(f, "rooms/{}", id),
            Topic::Messages(id) => write!(f, "rooms/{}/messages", id),
        }
    }
}

struct Listener {
    id: u64,
    tx: mpsc::UnboundedSender<Topic>,
}

/// Registry of listeners keyed by topic
pub struct ChangeHub {
    /// topic key -> listeners (a subscription may sit under several keys)
    listeners: DashMap<String, Vec<Listener>>,
    next_id: AtomicU64,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self {
            listeners: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new subscription on the given topics
    pub fn subscribe(self: &Arc<Self>, topics: impl IntoIterator<Item = Topic>) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscription = Subscription {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            keys: HashSet::new(),
            tx,
            rx,
            hub: Arc::downgrade(self),
        };
        subscription.set_topics(topics);
        subscription
    }

    /// Notify every listener registered on the topic
    pub fn publish(&self, topic: &Topic) {
        let key = topic.key();
        if let Some(mut entry) = self.listeners.get_mut(&key) {
            // Drop listeners whose receiver is gone
            entry.retain(|listener| listener.tx.send(topic.clone()).is_ok());
            if entry.is_empty() {
                drop(entry);
                self.listeners.remove_if(&key, |_, listeners| listeners.is_empty());
            }
        }
    }

    /// Number of live listeners on a topic
    pub fn listener_count(&self, topic: &Topic) -> usize {
        self.listeners
            .get(&topic.key())
            .map(|listeners| listeners.len())
            .unwrap_or(0)
    }

    fn register(&self, key: String, id: u64, tx: mpsc::UnboundedSender<Topic>) {
        self.listeners
            .entry(key)
            .or_default()
            .push(Listener { id, tx });
    }

    fn unregister(&self, key: &str, id: u64) {
        if let Some(mut entry) = self.listeners.get_mut(key) {
            entry.retain(|listener| listener.id != id);
            if entry.is_empty() {
                drop(entry);
                self.listeners.remove_if(key, |_, listeners| listeners.is_empty());
            }
        }
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for a registered observer. Dropping it unregisters every topic.
pub struct Subscription {
    id: u64,
    keys: HashSet<String>,
    tx: mpsc::UnboundedSender<Topic>,
    rx: mpsc::UnboundedReceiver<Topic>,
    hub: Weak<ChangeHub>,
}

impl Subscription {
    /// Wait for the next change. Changes queued behind it are coalesced.
    pub async fn changed(&mut self) -> Option<Topic> {
        let topic = self.rx.recv().await?;
        while self.rx.try_recv().is_ok() {}
        Some(topic)
    }

    /// Non-blocking variant of [`Subscription::changed`]
    pub fn try_changed(&mut self) -> Option<Topic> {
        let topic = self.rx.try_recv().ok()?;
        while self.rx.try_recv().is_ok() {}
        Some(topic)
    }

    /// Replace the watched topics, keeping changes already queued
    pub fn set_topics(&mut self, topics: impl IntoIterator<Item = Topic>) {
        let Some(hub) = self.hub.upgrade() else {
            return;
        };
        let wanted: HashSet<String> = topics.into_iter().map(|t| t.key()).collect();

        for key in self.keys.difference(&wanted) {
            hub.unregister(key, self.id);
        }
        for key in wanted.difference(&self.keys) {
            hub.register(key.clone(), self.id, self.tx.clone());
        }

        debug!(subscription = self.id, topics = wanted.len(), "Subscription retargeted");
        self.keys = wanted;
    }

    pub fn is_watching(&self, topic: &Topic) -> bool {
        self.keys.contains(&topic.key())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(hub) = self.hub.upgrade() {
            for key in &self.keys {
                hub.unregister(key, self.id);
            }
        }
    }
}
