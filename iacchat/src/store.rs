//! Store boundary
//!
//! Everything the client reads or writes goes through [`Store`]. The crate ships
//! one implementation, [`crate::db::Database`], backed by SQLite.

use async_trait::async_trait;

use crate::error::ChatResult;
use crate::models::{Message, NewRoom, NewUser, Room, User};
use crate::subscription::{Subscription, Topic};

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_user(&self, user_id: &str) -> ChatResult<Option<User>>;

    /// Case-insensitive lookup by email
    async fn find_user_by_email(&self, email: &str) -> ChatResult<Option<User>>;

    /// Create the user record if absent and return the stored record
    async fn create_user(&self, user_id: &str, profile: NewUser) -> ChatResult<User>;

    async fn update_user_contacts(&self, user_id: &str, contacts: &[String]) -> ChatResult<()>;

    async fn get_room(&self, room_id: &str) -> ChatResult<Option<Room>>;

    /// Rooms containing the user, most recently updated first
    async fn rooms_containing(&self, user_id: &str) -> ChatResult<Vec<Room>>;

    /// Two-member rooms containing both users, most recently updated first.
    ///
    /// The default fetches every room of `user_a` and filters client-side,
    /// which costs a full scan of that user's rooms per lookup. Stores that
    /// can express the compound membership query should override it.
    async fn direct_rooms_between(&self, user_a: &str, user_b: &str) -> ChatResult<Vec<Room>> {
        let rooms = self.rooms_containing(user_a).await?;
        Ok(rooms
            .into_iter()
            .filter(|room| room.is_direct() && room.has_member(user_b))
            .collect())
    }

    /// Create the room under `room_id` unless a room with that id exists.
    /// Returns the stored room either way.
    async fn create_room(&self, room_id: &str, room: NewRoom) -> ChatResult<Room>;

    /// Messages of a room, newest first
    async fn messages_of(&self, room_id: &str, limit: Option<usize>) -> ChatResult<Vec<Message>>;

    /// Insert a message and bump the room's `last_updated` in one write.
    /// The store assigns the timestamp.
    async fn create_message(
        &self,
        room_id: &str,
        sender_id: &str,
        content: &str,
    ) -> ChatResult<Message>;

    fn subscribe(&self, topics: Vec<Topic>) -> Subscription;
}
