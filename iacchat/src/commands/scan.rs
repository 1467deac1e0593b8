use tracing::debug;

use crate::auth::Session;
use crate::error::ChatResult;
use crate::models::User;
use crate::qr::parse_contact_payload;
use crate::store::Store;

/// What a scanned QR code resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Not one of our contact codes
    Ignored,
    /// The session user's own code
    OwnCode,
    /// Well-formed code for a user that does not exist
    UnknownUser,
    /// The user behind the code; callers prefill the add-contact form with their email
    Found(User),
}

pub async fn scan_contact<S>(session: &Session<S>, data: &str) -> ChatResult<ScanOutcome>
where
    S: Store + ?Sized,
{
    let Some(user_id) = parse_contact_payload(data) else {
        return Ok(ScanOutcome::Ignored);
    };
    if user_id == session.user_id() {
        return Ok(ScanOutcome::OwnCode);
    }

    match session.store().get_user(user_id).await? {
        Some(user) => Ok(ScanOutcome::Found(user)),
        None => {
            debug!(user_id = %user_id, "Scanned code for unknown user");
            Ok(ScanOutcome::UnknownUser)
        }
    }
}
