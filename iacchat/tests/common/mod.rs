//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use iacchat_lib::models::{Message, NewRoom, NewUser, Room, User};
use iacchat_lib::subscription::{Subscription, Topic};
use iacchat_lib::{AuthUser, ChatResult, Database, Session, Store};

pub fn store() -> Arc<Database> {
    Arc::new(Database::open_in_memory().expect("in-memory database"))
}

pub fn auth_user(id: &str, name: &str, email: &str) -> AuthUser {
    AuthUser {
        id: id.to_string(),
        display_name: Some(name.to_string()),
        email: Some(email.to_string()),
        photo_url: None,
    }
}

/// Sign a user in and create their profile
pub async fn sign_up<S: Store + ?Sized>(store: Arc<S>, id: &str, name: &str) -> Session<S> {
    let email = format!("{}@example.com", id);
    let session = Session::new(auth_user(id, name, &email), store);
    session.ensure_profile().await.expect("profile");
    session
}

/// Store that only answers the single-condition room query, so direct-room
/// lookups go through the trait's fetch-then-filter default
pub struct ScanOnlyStore(pub Arc<Database>);

#[async_trait]
impl Store for ScanOnlyStore {
    async fn get_user(&self, user_id: &str) -> ChatResult<Option<User>> {
        self.0.get_user(user_id).await
    }

    async fn find_user_by_email(&self, email: &str) -> ChatResult<Option<User>> {
        self.0.find_user_by_email(email).await
    }

    async fn create_user(&self, user_id: &str, profile: NewUser) -> ChatResult<User> {
        self.0.create_user(user_id, profile).await
    }

    async fn update_user_contacts(&self, user_id: &str, contacts: &[String]) -> ChatResult<()> {
        self.0.update_user_contacts(user_id, contacts).await
    }

    async fn get_room(&self, room_id: &str) -> ChatResult<Option<Room>> {
        self.0.get_room(room_id).await
    }

    async fn rooms_containing(&self, user_id: &str) -> ChatResult<Vec<Room>> {
        self.0.rooms_containing(user_id).await
    }

    async fn create_room(&self, room_id: &str, room: NewRoom) -> ChatResult<Room> {
        self.0.create_room(room_id, room).await
    }

    async fn messages_of(&self, room_id: &str, limit: Option<usize>) -> ChatResult<Vec<Message>> {
        self.0.messages_of(room_id, limit).await
    }

    async fn create_message(
        &self,
        room_id: &str,
        sender_id: &str,
        content: &str,
    ) -> ChatResult<Message> {
        self.0.create_message(room_id, sender_id, content).await
    }

    fn subscribe(&self, topics: Vec<Topic>) -> Subscription {
        self.0.subscribe(topics)
    }
}
