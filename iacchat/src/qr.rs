//! Contact QR codes: `"<scheme>:<userId>"`

use crate::utils::validation::validate_id;

pub const QR_SCHEME: &str = "iacchat";

/// Payload to render as the user's contact QR code
pub fn contact_payload(user_id: &str) -> String {
    format!("{}:{}", QR_SCHEME, user_id)
}

/// Extract the user id from a scanned payload.
/// Anything without the scheme prefix, or with an invalid id, is not ours.
pub fn parse_contact_payload(data: &str) -> Option<&str> {
    let user_id = data
        .strip_prefix(QR_SCHEME)
        .and_then(|rest| rest.strip_prefix(':'))?;
    validate_id(user_id).ok()?;
    Some(user_id)
}
