use std::collections::HashMap;

use tracing::warn;

use super::Loadable;
use crate::error::ChatResult;
use crate::models::User;
use crate::store::Store;

/// User profiles fetched for one view refresh.
///
/// An id that was never fetched reads as `Loading`, one that was fetched but
/// does not exist reads as `Failed`.
#[derive(Debug, Default, Clone)]
pub struct ProfileSnapshots {
    entries: HashMap<String, Option<User>>,
}

impl ProfileSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: impl Into<String>, profile: Option<User>) {
        self.entries.insert(user_id.into(), profile);
    }

    pub fn get(&self, user_id: &str) -> Loadable<&User> {
        match self.entries.get(user_id) {
            None => Loadable::Loading,
            Some(None) => Loadable::Failed,
            Some(Some(user)) => Loadable::Ready(user),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Fetch every id not already present
    pub async fn load<S, I>(&mut self, store: &S, user_ids: I) -> ChatResult<()>
    where
        S: Store + ?Sized,
        I: IntoIterator<Item = String>,
    {
        for user_id in user_ids {
            if self.entries.contains_key(&user_id) {
                continue;
            }
            let profile = store.get_user(&user_id).await?;
            if profile.is_none() {
                warn!(user_id = %user_id, "Profile not found");
            }
            self.entries.insert(user_id, profile);
        }
        Ok(())
    }
}
