//! Chat list and room views driven by store changes

mod common;

use std::time::Duration;

use chrono::Utc;
use common::{sign_up, store};
use iacchat_lib::chat::{Icon, Loadable};
use iacchat_lib::commands::message::send_message;
use iacchat_lib::commands::room::find_or_create_direct;
use iacchat_lib::models::NewRoom;
use iacchat_lib::views::{ChatListEntry, ChatListView, RoomView};
use iacchat_lib::Store;

fn ready_rows(entries: Loadable<Vec<ChatListEntry>>) -> Vec<(String, String, String)> {
    entries
        .ready()
        .expect("chat list loaded")
        .into_iter()
        .map(|entry| match entry {
            ChatListEntry::Ready(summary) => (summary.room_id, summary.name, summary.preview),
            ChatListEntry::Loading { room_id } => panic!("room {} still loading", room_id),
        })
        .collect()
}

#[tokio::test]
async fn test_chat_list_loading_before_refresh() {
    let store = store();
    let alice = sign_up(store, "alice", "Alice").await;
    let view = ChatListView::new(alice);
    assert!(view.summaries(&Utc::now()).is_loading());
}

#[tokio::test]
async fn test_rooms_without_messages_are_hidden() {
    let store = store();
    let alice = sign_up(store.clone(), "alice", "Alice").await;
    sign_up(store.clone(), "bob", "Bob Stone").await;
    find_or_create_direct(&alice, "bob").await.unwrap();

    let mut view = ChatListView::new(alice);
    view.refresh().await.unwrap();
    assert!(ready_rows(view.summaries(&Utc::now())).is_empty());
}

#[tokio::test]
async fn test_chat_list_orders_and_previews() {
    let store = store();
    let alice = sign_up(store.clone(), "alice", "Alice").await;
    let bob = sign_up(store.clone(), "bob", "Bob Stone").await;
    sign_up(store.clone(), "carol", "Carol Price").await;

    let with_bob = find_or_create_direct(&alice, "bob").await.unwrap();
    let with_carol = find_or_create_direct(&alice, "carol").await.unwrap();
    send_message(&alice, &with_bob, "lunch?").await.unwrap();
    send_message(&alice, &with_carol, "hello").await.unwrap();

    let mut view = ChatListView::new(alice.clone());
    view.refresh().await.unwrap();
    let rows = ready_rows(view.summaries(&Utc::now()));
    assert_eq!(
        rows,
        vec![
            (with_carol.clone(), "Carol Price".to_string(), "You: hello".to_string()),
            (with_bob.clone(), "Bob Stone".to_string(), "You: lunch?".to_string()),
        ]
    );

    send_message(&bob, &with_bob, "sure").await.unwrap();
    assert!(view.poll_change().await.unwrap());
    let rows = ready_rows(view.summaries(&Utc::now()));
    assert_eq!(rows[0], (with_bob, "Bob Stone".to_string(), "sure".to_string()));
    assert_eq!(rows[1].0, with_carol);
}

#[tokio::test]
async fn test_group_preview_names_sender() {
    let store = store();
    let alice = sign_up(store.clone(), "alice", "Alice").await;
    let carol = sign_up(store.clone(), "carol", "Carol Ann Price").await;
    store
        .create_room(
            "trip",
            NewRoom::group(
                Some("Trip".to_string()),
                vec!["alice".into(), "bob".into(), "carol".into()],
            ),
        )
        .await
        .unwrap();
    send_message(&carol, "trip", "tickets booked").await.unwrap();

    let mut view = ChatListView::new(alice);
    view.refresh().await.unwrap();
    let summary = match view.summaries(&Utc::now()).ready().unwrap().remove(0) {
        ChatListEntry::Ready(summary) => summary,
        other => panic!("unexpected entry {:?}", other),
    };
    assert_eq!(summary.name, "Trip");
    assert_eq!(summary.icon, Icon::DefaultGroup);
    assert_eq!(summary.preview, "Carol: tickets booked");
}

#[tokio::test]
async fn test_chat_list_wakes_on_new_room_message() {
    let store = store();
    let alice = sign_up(store.clone(), "alice", "Alice").await;
    let bob = sign_up(store.clone(), "bob", "Bob").await;

    let mut view = ChatListView::new(alice);
    view.refresh().await.unwrap();

    let room_id = find_or_create_direct(&bob, "alice").await.unwrap();
    send_message(&bob, &room_id, "ping").await.unwrap();

    let changed = tokio::time::timeout(Duration::from_secs(1), view.next_change())
        .await
        .expect("change published")
        .unwrap();
    assert!(changed);
    let rows = ready_rows(view.summaries(&Utc::now()));
    assert_eq!(rows, vec![(room_id, "Bob".to_string(), "ping".to_string())]);
}

#[tokio::test]
async fn test_room_view_details_and_timeline() {
    let store = store();
    let alice = sign_up(store.clone(), "alice", "Alice").await;
    let bob = sign_up(store.clone(), "bob", "Bob Stone").await;
    let room_id = find_or_create_direct(&alice, "bob").await.unwrap();

    let mut view = RoomView::new(alice, room_id.clone());
    assert!(view.details().is_loading());
    assert!(view.timeline().is_empty());

    view.refresh().await.unwrap();
    let details = view.details().ready().unwrap();
    assert_eq!(details.name, "Bob Stone");
    assert_eq!(details.icon, Icon::DefaultAvatar);

    view.send("hi bob").await.unwrap();
    send_message(&bob, &room_id, "hi alice").await.unwrap();
    assert!(view.next_change().await.unwrap());

    let timeline: Vec<_> = view.timeline().into_iter().map(|e| (e.text, e.is_own)).collect();
    assert_eq!(
        timeline,
        vec![("hi alice".to_string(), false), ("hi bob".to_string(), true)]
    );
}

#[tokio::test]
async fn test_room_view_for_outsider_fails() {
    let store = store();
    let alice = sign_up(store.clone(), "alice", "Alice").await;
    let carol = sign_up(store.clone(), "carol", "Carol").await;
    let room_id = find_or_create_direct(&alice, "bob").await.unwrap();

    let mut view = RoomView::new(carol, room_id);
    view.refresh().await.unwrap();
    assert_eq!(view.details(), Loadable::Failed);
    assert!(view.timeline().is_empty());
}
