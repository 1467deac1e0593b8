use serde::Serialize;

use super::{other_member, ProfileSnapshots};
use crate::models::Room;

/// State of data that depends on a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
    /// The fetch has not completed yet
    Loading,
    /// The data cannot be produced (missing profile, unresolvable member)
    Failed,
    Ready(T),
}

impl<T> Loadable<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Loadable::Loading => Loadable::Loading,
            Loadable::Failed => Loadable::Failed,
            Loadable::Ready(value) => Loadable::Ready(f(value)),
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum Icon {
    Remote(String),
    DefaultAvatar,
    DefaultGroup,
}

impl Icon {
    pub fn avatar(url: Option<&str>) -> Self {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => Icon::Remote(url.to_string()),
            None => Icon::DefaultAvatar,
        }
    }

    pub fn group(url: Option<&str>) -> Self {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => Icon::Remote(url.to_string()),
            None => Icon::DefaultGroup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatDetails {
    pub name: String,
    pub icon: Icon,
}

/// Display name and icon of a room as seen by `self_id`.
///
/// Direct rooms take both from the counterpart's profile. Groups use their
/// own fields; an unnamed group falls back to its member ids.
pub fn derive_display(
    room: &Room,
    self_id: &str,
    profiles: &ProfileSnapshots,
) -> Loadable<ChatDetails> {
    if room.is_direct() {
        let Some(other_id) = other_member(&room.members, self_id) else {
            return Loadable::Failed;
        };
        return profiles.get(other_id).map(|user| ChatDetails {
            name: user.name.clone(),
            icon: Icon::avatar(user.avatar_url.as_deref()),
        });
    }

    // TODO: resolve member names once group profiles are loaded with the room
    let name = match room.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => room.members.join(", "),
    };
    Loadable::Ready(ChatDetails {
        name,
        icon: Icon::group(room.icon_url.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn room(members: &[&str]) -> Room {
        Room {
            id: "room1".to_string(),
            name: None,
            icon_url: None,
            members: members.iter().map(|m| m.to_string()).collect(),
            last_updated: 0,
            created_at: 0,
        }
    }

    fn user(id: &str, name: &str, avatar: Option<&str>) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", id),
            avatar_url: avatar.map(String::from),
            contacts: Vec::new(),
            created_at: 0,
        }
    }

    #[test]
    fn test_direct_uses_counterpart_profile() {
        let mut profiles = ProfileSnapshots::new();
        profiles.insert("bob", Some(user("bob", "Bob Stone", Some("https://img/bob.png"))));

        let details = derive_display(&room(&["alice", "bob"]), "alice", &profiles);
        assert_eq!(
            details,
            Loadable::Ready(ChatDetails {
                name: "Bob Stone".to_string(),
                icon: Icon::Remote("https://img/bob.png".to_string()),
            })
        );
    }

    #[test]
    fn test_direct_without_avatar_uses_default() {
        let mut profiles = ProfileSnapshots::new();
        profiles.insert("bob", Some(user("bob", "Bob", Some(""))));

        let details = derive_display(&room(&["alice", "bob"]), "alice", &profiles)
            .ready()
            .unwrap();
        assert_eq!(details.icon, Icon::DefaultAvatar);
    }

    #[test]
    fn test_direct_pending_profile() {
        let profiles = ProfileSnapshots::new();
        let details = derive_display(&room(&["alice", "bob"]), "alice", &profiles);
        assert!(details.is_loading());
    }

    #[test]
    fn test_direct_missing_profile_fails() {
        let mut profiles = ProfileSnapshots::new();
        profiles.insert("bob", None);
        let details = derive_display(&room(&["alice", "bob"]), "alice", &profiles);
        assert_eq!(details, Loadable::Failed);
    }

    #[test]
    fn test_direct_without_self_fails() {
        let profiles = ProfileSnapshots::new();
        let details = derive_display(&room(&["bob", "carol"]), "alice", &profiles);
        assert_eq!(details, Loadable::Failed);
    }

    #[test]
    fn test_group_uses_room_fields() {
        let mut group = room(&["alice", "bob", "carol"]);
        group.name = Some("Climbing".to_string());
        group.icon_url = Some("https://img/group.png".to_string());

        let details = derive_display(&group, "alice", &ProfileSnapshots::new())
            .ready()
            .unwrap();
        assert_eq!(details.name, "Climbing");
        assert_eq!(details.icon, Icon::Remote("https://img/group.png".to_string()));
    }

    #[test]
    fn test_unnamed_group_falls_back_to_members() {
        let details = derive_display(&room(&["alice", "bob", "carol"]), "alice", &ProfileSnapshots::new())
            .ready()
            .unwrap();
        assert_eq!(details.name, "alice, bob, carol");
        assert_eq!(details.icon, Icon::DefaultGroup);
    }
}
