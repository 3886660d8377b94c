//! In-memory statistics recorder.
//!
//! Persistent trade history is an external collaborator's concern (analytics,
//! reporting databases); this adapter keeps only what the running process
//! needs to answer operator-facing summary queries and feed [`StatsRecorder`]
//! consumers such as [`PositionManager`](crate::application::position::manager::PositionManager).

use std::sync::atomic::{AtomicI32, Ordering};

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::stats::{RecordedOpportunity, StatsSummary, TradeCloseEvent, TradeOpenEvent};
use crate::port::outbound::stats::StatsRecorder;

struct OpenTrade {
    expected_profit: Decimal,
}

#[derive(Default)]
struct Day {
    summary: StatsSummary,
}

/// Process-lifetime stats recorder backed by an in-memory ledger.
///
/// Counters reset when the process restarts; there is no durable store.
pub struct InMemoryStatsRecorder {
    next_opportunity_id: AtomicI32,
    next_trade_id: AtomicI32,
    open_trades: Mutex<std::collections::HashMap<i32, OpenTrade>>,
    today: Mutex<Day>,
    peak_exposure: Mutex<Decimal>,
}

impl InMemoryStatsRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_opportunity_id: AtomicI32::new(1),
            next_trade_id: AtomicI32::new(1),
            open_trades: Mutex::new(std::collections::HashMap::new()),
            today: Mutex::new(Day::default()),
            peak_exposure: Mutex::new(Decimal::ZERO),
        }
    }
}

impl Default for InMemoryStatsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsRecorder for InMemoryStatsRecorder {
    fn record_opportunity(&self, event: &RecordedOpportunity) -> Option<i32> {
        let id = self.next_opportunity_id.fetch_add(1, Ordering::Relaxed);
        let mut day = self.today.lock();
        day.summary.opportunities_detected += 1;
        if event.executed {
            day.summary.opportunities_executed += 1;
        } else {
            day.summary.opportunities_rejected += 1;
        }
        Some(id)
    }

    fn record_trade_open(&self, event: &TradeOpenEvent) -> Option<i32> {
        let id = self.next_trade_id.fetch_add(1, Ordering::Relaxed);
        self.open_trades.lock().insert(
            id,
            OpenTrade {
                expected_profit: event.expected_profit,
            },
        );
        let mut day = self.today.lock();
        day.summary.trades_opened += 1;
        day.summary.total_volume += event.size;
        Some(id)
    }

    fn record_trade_close(&self, event: &TradeCloseEvent) {
        self.open_trades.lock().remove(&event.trade_id);
        let mut day = self.today.lock();
        day.summary.trades_closed += 1;
        if event.realized_profit >= Decimal::ZERO {
            day.summary.win_count += 1;
            day.summary.profit_realized += event.realized_profit;
        } else {
            day.summary.loss_count += 1;
            day.summary.loss_realized += -event.realized_profit;
        }
    }

    fn record_latency(&self, _latency_ms: u32) {
        // Latency distribution reporting is out of scope; left for the
        // observability surface to sample from the event bus directly.
    }

    fn update_peak_exposure(&self, exposure: Decimal) {
        let mut peak = self.peak_exposure.lock();
        if exposure > *peak {
            *peak = exposure;
        }
    }

    fn get_summary(&self, _from: NaiveDate, _to: NaiveDate) -> StatsSummary {
        self.today.lock().summary.clone()
    }

    fn get_today(&self) -> StatsSummary {
        let _ = Utc::now();
        self.today.lock().summary.clone()
    }
}

/// No-op recorder that discards every event.
///
/// Useful for tests that exercise execution flow without caring about
/// statistics, and as a minimal default when observability wiring is absent.
pub struct NullStatsRecorder;

impl StatsRecorder for NullStatsRecorder {
    fn record_opportunity(&self, _event: &RecordedOpportunity) -> Option<i32> {
        None
    }

    fn record_trade_open(&self, _event: &TradeOpenEvent) -> Option<i32> {
        None
    }

    fn record_trade_close(&self, _event: &TradeCloseEvent) {}

    fn record_latency(&self, _latency_ms: u32) {}

    fn update_peak_exposure(&self, _exposure: Decimal) {}

    fn get_summary(&self, _from: NaiveDate, _to: NaiveDate) -> StatsSummary {
        StatsSummary::default()
    }

    fn get_today(&self) -> StatsSummary {
        StatsSummary::default()
    }
}
