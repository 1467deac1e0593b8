use tracing::{debug, info};

use crate::auth::Session;
use crate::error::{ChatError, ChatResult};
use crate::models::input::{OpenDirectInput, ValidateExt};
use crate::models::{NewRoom, Room};
use crate::store::Store;
use crate::utils::generate_deterministic_room_id;
use crate::utils::validation::validate_id;

/// Find the direct room between the session user and `other_id`, creating it
/// if none exists. Returns the room id.
///
/// An existing two-member room is reused, most recently active first. New rooms
/// get an id derived from the sorted pair and are created only if absent, so
/// both parties opening the conversation at once end up in the same room.
pub async fn find_or_create_direct<S>(session: &Session<S>, other_id: &str) -> ChatResult<String>
where
    S: Store + ?Sized,
{
    let input = OpenDirectInput {
        user_id: other_id.to_string(),
    };
    input.validate_input()?;
    validate_id(other_id)?;

    let self_id = session.user_id();
    if other_id == self_id {
        return Err(ChatError::InvalidRoom(
            "cannot open a direct room with yourself".to_string(),
        ));
    }

    let store = session.store();
    let existing = store.direct_rooms_between(self_id, other_id).await?;
    if let Some(room) = existing.first() {
        debug!(room_id = %room.id, "Reusing direct room");
        return Ok(room.id.clone());
    }

    let room_id = generate_deterministic_room_id(self_id, other_id);
    let room = store
        .create_room(&room_id, NewRoom::direct(self_id, other_id))
        .await?;
    info!(room_id = %room.id, other = %other_id, "Opened direct room");
    Ok(room.id)
}

/// A room the session user belongs to. Rooms without the user read as missing.
pub async fn get_room<S>(session: &Session<S>, room_id: &str) -> ChatResult<Room>
where
    S: Store + ?Sized,
{
    session
        .store()
        .get_room(room_id)
        .await?
        .filter(|room| room.has_member(session.user_id()))
        .ok_or_else(|| ChatError::not_found(format!("Room {}", room_id)))
}
