use sha2::{Digest, Sha256};

/// Generate a deterministic room ID from two user IDs
/// Both users derive the same ID regardless of who initiates
pub fn generate_deterministic_room_id(user_id_1: &str, user_id_2: &str) -> String {
    let (lo, hi) = if user_id_1 <= user_id_2 {
        (user_id_1, user_id_2)
    } else {
        (user_id_2, user_id_1)
    };

    let digest = Sha256::digest(format!("{}:{}", lo, hi).as_bytes());
    format!("dm_{}", &hex::encode(digest)[..32])
}

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
