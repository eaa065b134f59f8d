//! Scroll-driven scenarios over the engine facade: initial anchor, edge
//! expansion with cooldowns, navigation, and degraded-backend behaviour.

mod support;

use std::sync::Arc;
use std::time::Duration;

use support::store::{MockItemStore, MockMembershipDirectory};
use support::{date, init_tracing};
use tempora_common::time::MockClock;
use tempora_core::{CalendarEngine, EdgeDirection, EngineConfig, ScrollMetrics};
use tempora_domain::MonthKey;
use uuid::Uuid;

fn engine_with_clock(store: MockItemStore) -> (CalendarEngine, MockClock) {
    init_tracing();
    let calendar = Uuid::new_v4();
    let memberships = MockMembershipDirectory::with_calendars(vec![calendar]);
    let clock = MockClock::new(date(2025, 6, 15));
    let engine = CalendarEngine::with_clock(
        Arc::new(store),
        Arc::new(memberships),
        Uuid::new_v4(),
        EngineConfig::default(),
        Arc::new(clock.clone()),
    );
    (engine, clock)
}

async fn drain_prefetches() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

fn near_bottom() -> ScrollMetrics {
    ScrollMetrics { distance_from_top: 8000.0, distance_from_bottom: 300.0 }
}

#[tokio::test]
async fn initialize_anchors_today_and_loads_the_window() {
    let store = MockItemStore::default();
    let (engine, _clock) = engine_with_clock(store.clone());

    let target = engine.initialize(None).await.unwrap();

    assert_eq!(target.month, MonthKey::new(2025, 5));
    assert_eq!(target.date, date(2025, 6, 15));
    assert!(!target.animated);

    let months = engine.rendered_months().await;
    assert_eq!(months.len(), 9);
    assert_eq!(months[0].id, "2025-02");
    assert_eq!(months[8].id, "2025-10");

    // Every rendered month was ensured exactly once; the anchor's neighbors
    // were already cached, so prefetch added nothing.
    drain_prefetches().await;
    assert_eq!(store.query_calls(), 9);
}

#[tokio::test]
async fn near_bottom_fires_once_until_the_cooldown_elapses() {
    let (engine, clock) = engine_with_clock(MockItemStore::default());
    engine.initialize(None).await.unwrap();
    clock.advance(Duration::from_millis(401));

    assert_eq!(engine.on_scroll(near_bottom()).await, Some(EdgeDirection::Bottom));
    assert_eq!(engine.rendered_months().await.len(), 12);

    // Scroll ticks keep arriving inside the cooldown window
    assert_eq!(engine.on_scroll(near_bottom()).await, None);
    assert_eq!(engine.on_scroll(near_bottom()).await, None);
    assert_eq!(engine.rendered_months().await.len(), 12);

    clock.advance(Duration::from_millis(501));
    assert_eq!(engine.on_scroll(near_bottom()).await, Some(EdgeDirection::Bottom));
    assert_eq!(engine.rendered_months().await.len(), 15);
}

#[tokio::test]
async fn direct_edge_hooks_respect_the_same_cooldown() {
    let (engine, clock) = engine_with_clock(MockItemStore::default());
    engine.initialize(None).await.unwrap();
    clock.advance(Duration::from_millis(401));

    let added = engine.on_near_top().await;
    assert_eq!(
        added,
        vec![MonthKey::new(2024, 10), MonthKey::new(2024, 11), MonthKey::new(2025, 0)]
    );
    assert_eq!(engine.rendered_months().await[0].id, "2024-11");

    // Immediately again: still cooling down
    assert!(engine.on_near_top().await.is_empty());
}

#[tokio::test]
async fn failed_expansion_still_renders_scrollable_months() {
    let store = MockItemStore::default();
    let (engine, clock) = engine_with_clock(store.clone());
    engine.initialize(None).await.unwrap();
    clock.advance(Duration::from_millis(401));

    store.set_fail_queries(true);
    assert_eq!(engine.on_scroll(near_bottom()).await, Some(EdgeDirection::Bottom));

    // Structure rendered, buckets absent, retryable
    let months = engine.rendered_months().await;
    assert_eq!(months.len(), 12);
    assert_eq!(engine.get_cached_month(2025, 10), None);

    // The cooldown still applies, so a failing backend is not hammered
    assert_eq!(engine.on_scroll(near_bottom()).await, None);

    store.set_fail_queries(false);
    engine.ensure_month(2025, 10).await.unwrap();
    assert_eq!(engine.get_cached_month(2025, 10), Some(Vec::new()));
}

#[tokio::test]
async fn go_to_date_expands_to_the_target_and_suppresses_scroll() {
    let (engine, clock) = engine_with_clock(MockItemStore::default());
    engine.initialize(None).await.unwrap();
    clock.advance(Duration::from_millis(401));

    let target = engine.go_to_date(date(2026, 4, 20)).await.unwrap();
    assert_eq!(target.month, MonthKey::new(2026, 3));
    assert!(target.animated);

    let months = engine.rendered_months().await;
    assert_eq!(months.last().map(|month| month.id.clone()), Some("2026-04".to_string()));
    assert_eq!(engine.month_label().await, Some("April 2026".to_string()));

    // The animated scroll must not feed back into edge detection
    assert_eq!(engine.on_scroll(near_bottom()).await, None);

    engine.finish_programmatic_scroll().await;
    assert_eq!(engine.on_scroll(near_bottom()).await, Some(EdgeDirection::Bottom));
}

#[tokio::test]
async fn month_stepping_walks_the_focused_month() {
    let (engine, _clock) = engine_with_clock(MockItemStore::default());
    engine.initialize(None).await.unwrap();

    let prev = engine.go_to_previous_month().await.unwrap();
    assert_eq!(prev.month, MonthKey::new(2025, 4));

    let next = engine.go_to_next_month().await.unwrap();
    assert_eq!(next.month, MonthKey::new(2025, 5));
    assert_eq!(engine.month_label().await, Some("June 2025".to_string()));
}

#[tokio::test]
async fn reset_all_tears_down_the_viewport() {
    let (engine, clock) = engine_with_clock(MockItemStore::default());
    engine.initialize(None).await.unwrap();
    clock.advance(Duration::from_millis(401));

    engine.reset_all().await;

    assert!(engine.rendered_months().await.is_empty());
    assert_eq!(engine.on_scroll(near_bottom()).await, None);

    // Re-initializing works after a reset
    let target = engine.initialize(Some(date(2024, 1, 10))).await.unwrap();
    assert_eq!(target.month, MonthKey::new(2024, 0));
    assert_eq!(engine.rendered_months().await.len(), 9);
}
