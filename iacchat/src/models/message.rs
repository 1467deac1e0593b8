use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
   pub id: String,
   pub room_id: String,
   pub sender_id: String,
   pub content: String,
   pub created_at: i64,
}
