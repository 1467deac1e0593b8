use tracing::{info, warn};

use crate::auth::Session;
use crate::error::{ChatResult, ValidationError};
use crate::models::input::{AddContactInput, ValidateExt};
use crate::models::User;
use crate::store::Store;
use crate::utils::validation::normalize_email;

/// Add a contact by email.
///
/// Rules are checked in order (format, own email, existence, duplicate) and
/// the first failure is reported.
pub async fn add_contact<S>(session: &Session<S>, email: &str) -> ChatResult<User>
where
    S: Store + ?Sized,
{
    let input = AddContactInput::new(email);
    input
        .validate_input()
        .map_err(|_| ValidationError::InvalidEmail)?;

    let mut profile = session.profile().await?;
    let own_email = session
        .user()
        .email
        .as_deref()
        .unwrap_or(profile.email.as_str());
    if normalize_email(&input.email) == normalize_email(own_email) {
        return Err(ValidationError::OwnEmail.into());
    }

    let contact = session
        .store()
        .find_user_by_email(&input.email)
        .await?
        .ok_or(ValidationError::UnknownEmail)?;
    if contact.id == profile.id {
        return Err(ValidationError::OwnEmail.into());
    }
    if profile.has_contact(&contact.id) {
        return Err(ValidationError::AlreadyContact.into());
    }

    profile.contacts.push(contact.id.clone());
    session
        .store()
        .update_user_contacts(&profile.id, &profile.contacts)
        .await?;

    info!(contact_id = %contact.id, "Contact added");
    Ok(contact)
}

/// Remove a contact. Removing someone who is not a contact does nothing.
pub async fn remove_contact<S>(session: &Session<S>, contact_id: &str) -> ChatResult<()>
where
    S: Store + ?Sized,
{
    let mut profile = session.profile().await?;
    let before = profile.contacts.len();
    profile.contacts.retain(|id| id != contact_id);
    if profile.contacts.len() == before {
        return Ok(());
    }

    session
        .store()
        .update_user_contacts(&profile.id, &profile.contacts)
        .await?;
    info!(contact_id = %contact_id, "Contact removed");
    Ok(())
}

/// Profiles of the session user's contacts, in the order they were added.
/// Contacts whose profile no longer resolves are left out.
pub async fn get_contacts<S>(session: &Session<S>) -> ChatResult<Vec<User>>
where
    S: Store + ?Sized,
{
    let profile = session.profile().await?;
    let mut contacts = Vec::with_capacity(profile.contacts.len());
    for contact_id in &profile.contacts {
        match session.store().get_user(contact_id).await? {
            Some(user) => contacts.push(user),
            None => warn!(contact_id = %contact_id, "Skipping unknown contact"),
        }
    }
    Ok(contacts)
}
