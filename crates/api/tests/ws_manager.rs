//! WebSocket connection manager tests (no live sockets needed; the manager
//! only moves messages between channels).

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use uuid::Uuid;

use b2gthr_api::ws::{start_heartbeat, WsManager};

#[tokio::test]
async fn add_and_remove_tracks_connection_count() {
    let manager = WsManager::new();
    assert_eq!(manager.connection_count().await, 0);

    let user = Uuid::new_v4();
    let (_tx, _rx) = manager.add("conn-1".into(), user).await;
    let (_tx2, _rx2) = manager.add("conn-2".into(), user).await;
    assert_eq!(manager.connection_count().await, 2);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 1);

    // Removing an unknown id is a no-op.
    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 1);
}

#[tokio::test]
async fn send_to_user_reaches_every_connection_of_that_user() {
    let manager = WsManager::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let (_a1_tx, mut a1) = manager.add("a1".into(), alice).await;
    let (_a2_tx, mut a2) = manager.add("a2".into(), alice).await;
    let (_b1_tx, mut b1) = manager.add("b1".into(), bob).await;

    let sent = manager
        .send_to_user(alice, Message::Text("hello".into()))
        .await;
    assert_eq!(sent, 2);

    assert!(matches!(a1.recv().await, Some(Message::Text(t)) if t.as_str() == "hello"));
    assert!(matches!(a2.recv().await, Some(Message::Text(t)) if t.as_str() == "hello"));
    assert!(b1.try_recv().is_err(), "bob must not receive alice's message");
}

#[tokio::test]
async fn disconnect_user_closes_only_that_users_connections() {
    let manager = WsManager::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let (_a_tx, mut a) = manager.add("a".into(), alice).await;
    let (_b_tx, mut b) = manager.add("b".into(), bob).await;

    manager.disconnect_user(alice).await;

    // Alice's connection got a Close frame and was deregistered.
    assert!(matches!(a.recv().await, Some(Message::Close(_))));
    assert_eq!(manager.connection_count().await, 1);

    // Bob is untouched.
    assert!(b.try_recv().is_err());
    assert_eq!(manager.send_to_user(bob, Message::Text("hi".into())).await, 1);
}

#[tokio::test]
async fn disconnect_unknown_user_is_a_noop() {
    let manager = WsManager::new();
    let (_tx, _rx) = manager.add("a".into(), Uuid::new_v4()).await;

    manager.disconnect_user(Uuid::new_v4()).await;
    assert_eq!(manager.connection_count().await, 1);
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();
    let (_a_tx, mut a) = manager.add("a".into(), Uuid::new_v4()).await;
    let (_b_tx, mut b) = manager.add("b".into(), Uuid::new_v4()).await;

    manager.shutdown_all().await;

    assert!(matches!(a.recv().await, Some(Message::Close(_))));
    assert!(matches!(b.recv().await, Some(Message::Close(_))));
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn ping_all_reaches_every_connection() {
    let manager = WsManager::new();
    let (_a_tx, mut a) = manager.add("a".into(), Uuid::new_v4()).await;
    let (_b_tx, mut b) = manager.add("b".into(), Uuid::new_v4()).await;

    manager.ping_all().await;

    assert!(matches!(a.recv().await, Some(Message::Ping(_))));
    assert!(matches!(b.recv().await, Some(Message::Ping(_))));
}

#[tokio::test]
async fn send_to_user_skips_closed_channels() {
    let manager = WsManager::new();
    let user = Uuid::new_v4();
    let (_tx, rx) = manager.add("a".into(), user).await;
    drop(rx);

    // The send fails silently; the stale entry is cleaned up by the
    // connection's own receive loop in production.
    let sent = manager.send_to_user(user, Message::Text("x".into())).await;
    assert_eq!(sent, 1);
}

#[tokio::test]
async fn heartbeat_pings_connections_at_the_configured_interval() {
    let manager = Arc::new(WsManager::new());
    let (_tx, mut rx) = manager.add("a".into(), Uuid::new_v4()).await;

    let handle = start_heartbeat(Arc::clone(&manager), Duration::from_millis(10));

    let frame = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("heartbeat ping should arrive within the timeout");
    assert!(matches!(frame, Some(Message::Ping(_))));

    handle.abort();
}
