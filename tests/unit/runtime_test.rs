//! Tests for runtime adapters

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lfg_matchmaker::core::Spawn;
use lfg_matchmaker::runtime::{banner, build_runtime, TokioSpawner};

#[test]
fn test_tokio_spawner_from_handle() {
    let runtime = build_runtime(2).unwrap();
    let spawner = TokioSpawner::new(runtime.handle().clone());
    let counter = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = crossbeam_channel::unbounded();

    for _ in 0..4 {
        let counter = Arc::clone(&counter);
        let tx = tx.clone();
        spawner.spawn(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(());
        });
    }
    for _ in 0..4 {
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}

#[test]
fn test_spawn_from_plain_thread() {
    let runtime = build_runtime(1).unwrap();
    let spawner = TokioSpawner::new(runtime.handle().clone());
    let (tx, rx) = crossbeam_channel::bounded(1);

    std::thread::spawn(move || {
        spawner.spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let _ = tx.send(std::thread::current().name().map(str::to_string));
        });
    })
    .join()
    .unwrap();

    let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(name.as_deref(), Some("lfg-worker"));
}

#[test]
fn test_build_runtime_clamps_zero_threads() {
    let runtime = build_runtime(0).unwrap();
    assert_eq!(runtime.block_on(async { 1 + 1 }), 2);
}

#[test]
fn test_banner_text() {
    let text = banner();
    assert!(text.contains("Looking for Group Synchronization"));
    assert!(text.starts_with("=========="));
}
