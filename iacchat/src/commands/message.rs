use tracing::debug;

use super::room::get_room;
use crate::auth::Session;
use crate::error::ChatResult;
use crate::models::input::{SendMessageInput, ValidateExt};
use crate::models::Message;
use crate::store::Store;

/// Messages of a room, newest first
pub async fn get_messages<S>(session: &Session<S>, room_id: &str) -> ChatResult<Vec<Message>>
where
    S: Store + ?Sized,
{
    let room = get_room(session, room_id).await?;
    session.store().messages_of(&room.id, None).await
}

/// Send a text message. The text is trimmed; the store stamps the time and
/// bumps the room's activity in the same write.
pub async fn send_message<S>(session: &Session<S>, room_id: &str, text: &str) -> ChatResult<Message>
where
    S: Store + ?Sized,
{
    let input = SendMessageInput {
        room_id: room_id.to_string(),
        content: text.trim().to_string(),
    };
    input.validate_input()?;

    let room = get_room(session, &input.room_id).await?;
    let message = session
        .store()
        .create_message(&room.id, session.user_id(), &input.content)
        .await?;

    debug!(room_id = %room.id, message_id = %message.id, "Message sent");
    Ok(message)
}
