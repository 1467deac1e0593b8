/// The counterpart of `self_id` in a two-member room.
///
/// `None` unless there are exactly two members, one of them is `self_id`
/// and the other one differs from it.
pub fn other_member<'a>(members: &'a [String], self_id: &str) -> Option<&'a str> {
    if members.len() != 2 || !members.iter().any(|m| m == self_id) {
        return None;
    }
    members
        .iter()
        .find(|m| m.as_str() != self_id)
        .map(String::as_str)
}
