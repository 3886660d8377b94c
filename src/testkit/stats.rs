//! Test helpers for stats recorder setup.

use std::sync::Arc;

use crate::adapter::outbound::stats::InMemoryStatsRecorder;
use crate::port::outbound::stats::StatsRecorder;

/// Build an in-memory stats recorder for tests.
#[must_use]
pub fn in_memory_stats_recorder() -> Arc<dyn StatsRecorder> {
    Arc::new(InMemoryStatsRecorder::new())
}
