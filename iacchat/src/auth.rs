use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ChatError, ChatResult};
use crate::models::{NewUser, User};
use crate::store::Store;

/// Signed-in identity as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<AuthUser>;
    fn sign_out(&self);
}

/// In-process auth provider holding the signed-in user
#[derive(Default)]
pub struct LocalAuth {
    user: Mutex<Option<AuthUser>>,
}

impl LocalAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: AuthUser) {
        info!(user_id = %user.id, "Signed in");
        if let Ok(mut current) = self.user.lock() {
            *current = Some(user);
        }
    }
}

impl AuthProvider for LocalAuth {
    fn current_user(&self) -> Option<AuthUser> {
        self.user.lock().ok().and_then(|user| user.clone())
    }

    fn sign_out(&self) {
        if let Ok(mut current) = self.user.lock() {
            if let Some(user) = current.take() {
                info!(user_id = %user.id, "Signed out");
            }
        }
    }
}

/// The signed-in user plus the store handle, passed to every operation
pub struct Session<S: Store + ?Sized> {
    user: AuthUser,
    store: Arc<S>,
}

impl<S: Store + ?Sized> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            user: self.user.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S: Store + ?Sized> Session<S> {
    pub fn new(user: AuthUser, store: Arc<S>) -> Self {
        Self { user, store }
    }

    pub fn from_auth(auth: &dyn AuthProvider, store: Arc<S>) -> ChatResult<Self> {
        let user = auth.current_user().ok_or(ChatError::NotSignedIn)?;
        Ok(Self::new(user, store))
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The user's profile record, created from the auth identity on first sign-in
    pub async fn ensure_profile(&self) -> ChatResult<User> {
        if let Some(existing) = self.store.get_user(&self.user.id).await? {
            return Ok(existing);
        }

        let profile = NewUser {
            name: self.user.display_name.clone().unwrap_or_default(),
            email: self.user.email.clone().unwrap_or_default(),
            avatar_url: self.user.photo_url.clone().filter(|url| !url.is_empty()),
        };
        self.store.create_user(&self.user.id, profile).await
    }

    /// The user's profile record; `NotFound` if it was never created
    pub async fn profile(&self) -> ChatResult<User> {
        self.store
            .get_user(&self.user.id)
            .await?
            .ok_or_else(|| ChatError::not_found(format!("User {}", self.user.id)))
    }

    pub fn sign_out(self, auth: &dyn AuthProvider) {
        auth.sign_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn alice() -> AuthUser {
        AuthUser {
            id: "alice".to_string(),
            display_name: Some("Alice Liddell".to_string()),
            email: Some("alice@example.com".to_string()),
            photo_url: None,
        }
    }

    #[test]
    fn test_from_auth_requires_sign_in() {
        let auth = LocalAuth::new();
        let store = Arc::new(Database::open_in_memory().unwrap());
        assert!(matches!(
            Session::from_auth(&auth, store.clone()),
            Err(ChatError::NotSignedIn)
        ));

        auth.sign_in(alice());
        let session = Session::from_auth(&auth, store).unwrap();
        assert_eq!(session.user_id(), "alice");
    }

    #[test]
    fn test_sign_out_clears_user() {
        let auth = LocalAuth::new();
        auth.sign_in(alice());
        let session = Session::from_auth(&auth, Arc::new(Database::open_in_memory().unwrap())).unwrap();
        session.sign_out(&auth);
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_ensure_profile_creates_once() {
        let store = Arc::new(Database::open_in_memory().unwrap());
        let session = Session::new(alice(), store.clone());

        let created = session.ensure_profile().await.unwrap();
        assert_eq!(created.name, "Alice Liddell");
        assert_eq!(created.email, "alice@example.com");
        assert!(created.avatar_url.is_none());
        assert!(created.contacts.is_empty());

        let renamed = Session::new(
            AuthUser {
                display_name: Some("Someone Else".to_string()),
                ..alice()
            },
            store,
        );
        let existing = renamed.ensure_profile().await.unwrap();
        assert_eq!(existing, created);
    }

    #[tokio::test]
    async fn test_profile_missing() {
        let session = Session::new(alice(), Arc::new(Database::open_in_memory().unwrap()));
        assert!(matches!(session.profile().await, Err(ChatError::NotFound(_))));
    }
}
