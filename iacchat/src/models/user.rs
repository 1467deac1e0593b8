use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub contacts: Vec<String>,
    pub created_at: i64,
}

impl User {
    pub fn has_contact(&self, user_id: &str) -> bool {
        self.contacts.iter().any(|c| c == user_id)
    }

    /// First whitespace-delimited token of the name, empty if the name is blank.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

/// Profile fields written when a user record is first created.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}
