//! Integration tests for core-async.
//!
//! These cover the primitives the storage adapters lean on: a mutex that
//! serializes read-modify-write cycles and a watch channel that only keeps
//! the latest value.

use core_async::{sync, task};
use std::sync::Arc;

#[tokio::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    let result = handle.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_yield_now() {
    task::yield_now().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mutex_serializes_read_modify_write() {
    let record = Arc::new(sync::Mutex::new(0u32));
    let mut handles = vec![];

    for bit in 0..8 {
        let record = record.clone();
        handles.push(task::spawn(async move {
            let mut guard = record.lock().await;
            let current = *guard;
            task::yield_now().await;
            *guard = current | (1 << bit);
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(*record.lock().await, 0xFF);
}

#[tokio::test]
async fn test_watch_keeps_only_latest_value() {
    let (tx, mut rx) = sync::watch::channel(0);

    tx.send_replace(1);
    tx.send_replace(2);
    tx.send_replace(3);

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), 3);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_watch_subscribers_are_independent() {
    let (tx, _) = sync::watch::channel(None::<&str>);
    let mut first = tx.subscribe();
    let mut second = tx.subscribe();

    tx.send_replace(Some("a"));
    first.changed().await.unwrap();
    assert_eq!(*first.borrow_and_update(), Some("a"));

    tx.send_replace(Some("b"));
    second.changed().await.unwrap();
    assert_eq!(*second.borrow_and_update(), Some("b"));
    assert_eq!(tx.receiver_count(), 2);

    drop(first);
    assert_eq!(tx.receiver_count(), 1);
}

#[tokio::test]
async fn test_watch_ends_when_sender_dropped() {
    let (tx, mut rx) = sync::watch::channel(0);
    drop(tx);
    assert!(rx.changed().await.is_err());
}

#[tokio::test]
async fn test_create_dir_all_builds_nested_directories() {
    let root = std::env::temp_dir().join(format!("core-async-fs-{}", std::process::id()));
    let nested = root.join("data").join("preferences");

    core_async::fs::create_dir_all(&nested).await.unwrap();
    assert!(nested.is_dir());

    // Creating an existing directory is not an error.
    core_async::fs::create_dir_all(&nested).await.unwrap();

    std::fs::remove_dir_all(root).ok();
}
