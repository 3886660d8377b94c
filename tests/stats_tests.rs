//! Tests for stats recording ID integrity under concurrency.

use std::sync::Arc;

use arb_engine::adapter::outbound::stats::InMemoryStatsRecorder;
use arb_engine::domain::stats::{RecordedOpportunity, TradeOpenEvent};
use arb_engine::port::outbound::stats::StatsRecorder;
use rust_decimal_macros::dec;

/// Test that `record_opportunity` returns unique IDs under concurrency.
///
/// Spawns many threads recording opportunities against one shared recorder
/// and checks that every returned ID is present and distinct - a counter
/// race would hand out a duplicate or skip a value.
#[test]
fn record_opportunity_returns_unique_ids_under_concurrency() {
    const NUM_THREADS: usize = 32;
    let recorder = Arc::new(InMemoryStatsRecorder::new());

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|i| {
            let recorder = Arc::clone(&recorder);
            std::thread::spawn(move || {
                recorder.record_opportunity(&RecordedOpportunity {
                    strategy: format!("strategy-{i}"),
                    market_ids: vec![format!("market-{i}")],
                    edge: dec!(0.05),
                    expected_profit: dec!(1.0),
                    executed: false,
                    rejected_reason: None,
                })
            })
        })
        .collect();

    let mut ids: Vec<i32> = handles
        .into_iter()
        .map(|h| h.join().unwrap().expect("id should be returned"))
        .collect();

    ids.sort_unstable();
    let before_dedup = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), before_dedup, "all returned IDs should be unique");
    assert_eq!(ids.len(), NUM_THREADS, "every insert should return an id");

    let summary = recorder.get_today();
    assert_eq!(summary.opportunities_detected, NUM_THREADS as i64);
}

/// Test that `record_trade_open` returns unique, independently-numbered IDs
/// under concurrency, distinct from the opportunity ID sequence.
#[test]
fn record_trade_open_returns_unique_ids_under_concurrency() {
    const NUM_THREADS: usize = 32;
    let recorder = Arc::new(InMemoryStatsRecorder::new());

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|i| {
            let recorder = Arc::clone(&recorder);
            std::thread::spawn(move || {
                recorder.record_trade_open(&TradeOpenEvent {
                    opportunity_id: i as i32,
                    strategy: "single_condition".to_string(),
                    market_ids: vec![format!("market-{i}")],
                    legs: vec![],
                    size: dec!(100),
                    expected_profit: dec!(5),
                })
            })
        })
        .collect();

    let mut ids: Vec<i32> = handles
        .into_iter()
        .map(|h| h.join().unwrap().expect("id should be returned"))
        .collect();

    ids.sort_unstable();
    let before_dedup = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), before_dedup, "all returned trade ids should be unique");
    assert_eq!(ids.len(), NUM_THREADS);
}
