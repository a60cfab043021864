//! Tests for the scroll trigger

use super::*;
use crate::pagination::{PaginationState, Paginator};
use crate::store::testing::GatedStore;
use crate::store::MemoryStore;
use std::sync::Arc;
use test_case::test_case;
use tokio::sync::mpsc;

// ============================================================================
// Geometry Tests
// ============================================================================

#[test]
fn test_trigger_config_default() {
    let config = TriggerConfig::default();
    assert_eq!(config.root_margin_px, 200.0);
    assert_eq!(config.threshold, 0.1);
}

#[test]
fn test_trigger_config_partial_yaml() {
    let config: TriggerConfig = serde_yaml::from_str("root_margin_px: 50").unwrap();
    assert_eq!(config, TriggerConfig::new(50.0, DEFAULT_THRESHOLD));
}

#[test_case(900.0, 1.0, true ; "inside viewport")]
#[test_case(950.0, 1.0, true ; "inside margin")]
#[test_case(1001.0, 1.0, false ; "beyond margin")]
#[test_case(1000.0, 0.0, true ; "marker on margin edge")]
#[test_case(950.0, 100.0, true ; "half inside")]
#[test_case(995.0, 100.0, false ; "below threshold")]
#[test_case(-400.0, 100.0, false ; "scrolled past")]
fn test_sentinel_visibility(top: f64, height: f64, expected: bool) {
    let config = TriggerConfig::default();
    let viewport = Viewport::new(0.0, 800.0);
    assert_eq!(
        config.is_visible(viewport, SentinelRect::new(top, height)),
        expected
    );
}

#[test]
fn test_sentinel_visibility_zero_threshold() {
    let config = TriggerConfig::new(0.0, 0.0);
    let viewport = Viewport::new(1000.0, 500.0);
    assert!(config.is_visible(viewport, SentinelRect::new(1499.0, 10.0)));
    assert!(!config.is_visible(viewport, SentinelRect::new(1500.0, 10.0)));
}

// ============================================================================
// ScrollTrigger Tests
// ============================================================================

#[test]
fn test_trigger_fires_once_per_entry() {
    let mut trigger = ScrollTrigger::new();
    trigger.set_enabled(true);

    assert!(trigger.observe(true));
    assert!(!trigger.observe(true));
    assert!(!trigger.observe(true));
    assert!(!trigger.observe(false));
    assert!(trigger.observe(true));
    assert_eq!(trigger.fired(), 2);
}

#[test]
fn test_trigger_disabled_ignores_reports() {
    let mut trigger = ScrollTrigger::new();

    assert!(!trigger.is_enabled());
    assert!(!trigger.observe(true));
    assert!(!trigger.observe(false));
    assert_eq!(trigger.fired(), 0);
}

#[test]
fn test_trigger_reenabled_waits_for_fresh_report() {
    let mut trigger = ScrollTrigger::new();
    trigger.set_enabled(true);
    assert!(trigger.observe(true));

    trigger.set_enabled(false);
    assert!(!trigger.observe(true));
    trigger.set_enabled(true);
    assert!(!trigger.is_visible());
    assert_eq!(trigger.fired(), 1);

    // The first report after re-enabling counts as an entry
    assert!(trigger.observe(true));
    assert!(!trigger.observe(true));
    assert_eq!(trigger.fired(), 2);
}

#[test]
fn test_trigger_reenabled_while_hidden_waits() {
    let mut trigger = ScrollTrigger::new();
    trigger.set_enabled(true);
    trigger.observe(true);
    trigger.set_enabled(false);
    trigger.observe(false);

    trigger.set_enabled(true);
    assert!(!trigger.observe(false));
    assert!(trigger.observe(true));
}

#[test]
fn test_trigger_enable_is_idempotent() {
    let mut trigger = ScrollTrigger::new();
    trigger.set_enabled(true);
    assert!(trigger.observe(true));

    trigger.set_enabled(true);
    assert!(trigger.is_visible());
    assert!(!trigger.observe(true));
}

#[test]
fn test_trigger_update() {
    let mut trigger = ScrollTrigger::new();

    assert!(!trigger.update(true, false));
    assert!(trigger.update(true, true));
    assert!(!trigger.update(true, true));
    assert!(!trigger.update(false, true));
    assert!(!trigger.update(true, false));
    assert!(!trigger.update(false, true));
    assert!(trigger.update(true, true));
    assert!(trigger.is_visible());
}

// ============================================================================
// Observer Tests
// ============================================================================

#[tokio::test]
async fn test_channel_observer() {
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(true).await.unwrap();
    drop(tx);

    assert_eq!(rx.next_visibility().await, Some(true));
    assert_eq!(rx.next_visibility().await, None);
}

#[tokio::test]
async fn test_viewport_observer() {
    let (tx, mut observer) = ViewportObserver::channel(TriggerConfig::default(), 4);
    let viewport = Viewport::new(0.0, 800.0);

    tx.send(Frame::new(viewport, SentinelRect::new(2000.0, 1.0)))
        .await
        .unwrap();
    tx.send(Frame::new(viewport, SentinelRect::new(900.0, 1.0)))
        .await
        .unwrap();
    tx.send(Frame::removed(viewport)).await.unwrap();

    assert_eq!(observer.next_visibility().await, Some(false));
    assert_eq!(observer.next_visibility().await, Some(true));
    assert_eq!(observer.next_visibility().await, None);
    assert_eq!(observer.config().threshold, DEFAULT_THRESHOLD);
}

// ============================================================================
// Driver Tests
// ============================================================================

async fn loaded_paginator(count: usize) -> (Arc<MemoryStore>, Arc<Paginator<MemoryStore>>) {
    let store = Arc::new(MemoryStore::with_generated(count));
    let paginator = Arc::new(Paginator::new(Arc::clone(&store), 10));
    paginator.load_initial().await;
    (store, paginator)
}

#[tokio::test]
async fn test_single_report_loads_one_page() {
    let (store, paginator) = loaded_paginator(100).await;
    let (tx, rx) = mpsc::channel(4);
    let handle = attach(Arc::clone(&paginator), rx);

    tx.send(true).await.unwrap();
    drop(tx);

    // No report follows the landed page, so nothing else is fetched
    assert_eq!(handle.wait().await, 1);
    assert_eq!(store.calls(), 2);
    assert_eq!(paginator.posts().await.len(), 20);
    assert_eq!(
        paginator.state().await,
        PaginationState::Ready { has_more: true }
    );
}

#[tokio::test]
async fn test_each_fresh_report_loads_until_exhausted() {
    let (store, paginator) = loaded_paginator(23).await;
    let (tx, rx) = mpsc::channel(4);
    let handle = attach(Arc::clone(&paginator), rx);

    for _ in 0..3 {
        tx.send(true).await.unwrap();
    }
    drop(tx);

    assert_eq!(handle.wait().await, 2);
    assert_eq!(store.calls(), 3);
    assert_eq!(paginator.posts().await.len(), 23);
    assert_eq!(paginator.state().await, PaginationState::Exhausted);
}

#[tokio::test]
async fn test_attach_failure_disables_trigger() {
    let (store, paginator) = loaded_paginator(30).await;
    let (tx, rx) = mpsc::channel(4);
    let handle = attach(Arc::clone(&paginator), rx);

    store.fail_next(1);
    tx.send(true).await.unwrap();
    tx.send(false).await.unwrap();
    tx.send(true).await.unwrap();
    drop(tx);

    assert_eq!(handle.wait().await, 1);
    assert_eq!(store.calls(), 2);
    assert_eq!(paginator.posts().await.len(), 10);
    assert!(paginator.state().await.is_failed());
}

#[tokio::test]
async fn test_attach_ignores_reports_when_exhausted() {
    let (store, paginator) = loaded_paginator(5).await;
    let (tx, rx) = mpsc::channel(4);
    let handle = attach(Arc::clone(&paginator), rx);

    tx.send(true).await.unwrap();
    tx.send(false).await.unwrap();
    tx.send(true).await.unwrap();
    drop(tx);

    assert_eq!(handle.wait().await, 0);
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_detach_stops_observing() {
    let (store, paginator) = loaded_paginator(30).await;
    let (tx, rx) = mpsc::channel(4);
    let handle = attach(Arc::clone(&paginator), rx);

    assert_eq!(handle.detach().await, 0);
    assert!(tx.send(true).await.is_err());
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_dropping_handle_detaches() {
    let (store, paginator) = loaded_paginator(30).await;
    let (tx, rx) = mpsc::channel(4);
    let handle = attach(Arc::clone(&paginator), rx);

    drop(handle);
    let _ = tx.send(true).await;
    tx.closed().await;

    assert_eq!(store.calls(), 1);
    assert_eq!(paginator.posts().await.len(), 10);
}

#[tokio::test]
async fn test_detach_lets_running_load_finish() {
    let store = Arc::new(GatedStore::new(MemoryStore::with_generated(30)));
    let paginator = Arc::new(Paginator::new(Arc::clone(&store), 10));
    store.open(1);
    paginator.load_initial().await;

    let (tx, rx) = mpsc::channel(4);
    let handle = attach(Arc::clone(&paginator), rx);
    tx.send(true).await.unwrap();

    while paginator.state().await != PaginationState::LoadingMore {
        tokio::task::yield_now().await;
    }

    let (fired, ()) = tokio::join!(handle.detach(), async { store.open(1) });

    assert_eq!(fired, 1);
    assert_eq!(paginator.posts().await.len(), 20);
    assert_eq!(store.inner.calls(), 2);
}

#[tokio::test]
async fn test_removed_sentinel_ends_observation() {
    let (store, paginator) = loaded_paginator(30).await;
    let (tx, observer) = ViewportObserver::channel(TriggerConfig::default(), 4);
    let handle = attach(Arc::clone(&paginator), observer);

    let viewport = Viewport::new(0.0, 800.0);
    tx.send(Frame::new(viewport, SentinelRect::new(5000.0, 1.0)))
        .await
        .unwrap();
    tx.send(Frame::removed(viewport)).await.unwrap();

    assert_eq!(handle.wait().await, 0);
    assert_eq!(store.calls(), 1);
}
