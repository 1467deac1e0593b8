use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Room {
   pub id: String,
   pub name: Option<String>,
   pub icon_url: Option<String>,
   pub members: Vec<String>,
   pub last_updated: i64,
   pub created_at: i64,
}

impl Room {
   /// A direct room has exactly two members; anything larger is a group.
   pub fn is_direct(&self) -> bool {
      self.members.len() == 2
   }

   pub fn has_member(&self, user_id: &str) -> bool {
      self.members.iter().any(|m| m == user_id)
   }
}

#[derive(Debug, Clone, Default)]
pub struct NewRoom {
   pub members: Vec<String>,
   pub name: Option<String>,
   pub icon_url: Option<String>,
}

impl NewRoom {
   pub fn direct(user_a: &str, user_b: &str) -> Self {
      Self {
         members: vec![user_a.to_string(), user_b.to_string()],
         name: None,
         icon_url: None,
      }
   }

   pub fn group(name: Option<String>, members: Vec<String>) -> Self {
      Self {
         members,
         name,
         icon_url: None,
      }
   }
}
