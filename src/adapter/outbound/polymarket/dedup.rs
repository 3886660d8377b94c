//! Polymarket message deduplication.
//!
//! Polymarket's WebSocket feed is sometimes fanned out across redundant
//! connections (see [`super::super::super::infrastructure::exchange::pool`]);
//! each connection can deliver the same book update independently. This
//! module filters those duplicates before they reach the strategy engine.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::port::outbound::dedup::{DedupConfig, DedupStrategy, MessageDeduplicator};
use crate::port::outbound::exchange::MarketEvent;

/// Deduplicates Polymarket book events seen across redundant connections.
///
/// Tracks a digest per recently-seen event in a TTL cache; a digest seen
/// again within `cache_ttl_secs` is reported as a duplicate. Events without
/// a meaningful digest (connection lifecycle events) are never deduplicated.
pub struct PolymarketDeduplicator {
    config: DedupConfig,
    seen: DashMap<u64, Instant>,
}

impl PolymarketDeduplicator {
    #[must_use]
    pub fn new(config: &DedupConfig) -> Self {
        Self {
            config: config.clone(),
            seen: DashMap::new(),
        }
    }

    fn digest(&self, event: &MarketEvent) -> Option<u64> {
        let mut hasher = DefaultHasher::new();

        match event {
            MarketEvent::BookSnapshot { token_id, book } | MarketEvent::BookDelta { token_id, book } => {
                token_id.as_str().hash(&mut hasher);
                match self.config.strategy {
                    DedupStrategy::Hash => {
                        book.seq().hash(&mut hasher);
                    }
                    DedupStrategy::Timestamp => {
                        book.updated_at().timestamp_nanos_opt().unwrap_or_default().hash(&mut hasher);
                    }
                    DedupStrategy::Content => {
                        for level in book.bids() {
                            level.price().hash(&mut hasher);
                            level.size().hash(&mut hasher);
                        }
                        for level in book.asks() {
                            level.price().hash(&mut hasher);
                            level.size().hash(&mut hasher);
                        }
                    }
                }
                Some(hasher.finish())
            }
            MarketEvent::MarketSettled { .. } | MarketEvent::Connected | MarketEvent::Disconnected { .. } => None,
        }
    }
}

impl MessageDeduplicator for PolymarketDeduplicator {
    fn is_duplicate(&self, event: &MarketEvent) -> bool {
        if !self.config.enabled {
            return false;
        }

        let Some(key) = self.digest(event) else {
            return false;
        };

        let now = Instant::now();
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);

        if let Some(seen_at) = self.seen.get(&key) {
            if now.duration_since(*seen_at) <= ttl {
                debug!(key, "Dropping duplicate Polymarket event");
                return true;
            }
        }

        if self.seen.len() >= self.config.max_cache_entries {
            self.gc();
        }

        self.seen.insert(key, now);
        false
    }

    fn gc(&self) {
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        let now = Instant::now();
        self.seen.retain(|_, seen_at| now.duration_since(*seen_at) <= ttl);
    }

    fn cache_size(&self) -> usize {
        self.seen.len()
    }

    fn exchange_name(&self) -> &'static str {
        "Polymarket"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{Book, PriceLevel};
    use crate::domain::id::TokenId;
    use rust_decimal_macros::dec;

    fn snapshot(seq: u64) -> MarketEvent {
        MarketEvent::BookSnapshot {
            token_id: TokenId::from("tok-1"),
            book: Book::with_write(
                TokenId::from("tok-1"),
                vec![PriceLevel::new(dec!(0.45), dec!(100))],
                vec![PriceLevel::new(dec!(0.46), dec!(100))],
                seq,
                chrono::Utc::now(),
            ),
        }
    }

    #[test]
    fn first_sighting_is_not_a_duplicate() {
        let dedup = PolymarketDeduplicator::new(&DedupConfig::default());
        assert!(!dedup.is_duplicate(&snapshot(1)));
    }

    #[test]
    fn repeated_event_is_a_duplicate() {
        let dedup = PolymarketDeduplicator::new(&DedupConfig::default());
        assert!(!dedup.is_duplicate(&snapshot(1)));
        assert!(dedup.is_duplicate(&snapshot(1)));
    }

    #[test]
    fn different_sequence_is_not_a_duplicate() {
        let dedup = PolymarketDeduplicator::new(&DedupConfig::default());
        assert!(!dedup.is_duplicate(&snapshot(1)));
        assert!(!dedup.is_duplicate(&snapshot(2)));
    }

    #[test]
    fn disabled_dedup_never_reports_duplicates() {
        let config = DedupConfig {
            enabled: false,
            ..DedupConfig::default()
        };
        let dedup = PolymarketDeduplicator::new(&config);
        assert!(!dedup.is_duplicate(&snapshot(1)));
        assert!(!dedup.is_duplicate(&snapshot(1)));
    }

    #[test]
    fn lifecycle_events_are_never_duplicates() {
        let dedup = PolymarketDeduplicator::new(&DedupConfig::default());
        assert!(!dedup.is_duplicate(&MarketEvent::Connected));
        assert!(!dedup.is_duplicate(&MarketEvent::Connected));
    }

    #[test]
    fn gc_evicts_expired_entries() {
        let config = DedupConfig {
            cache_ttl_secs: 0,
            ..DedupConfig::default()
        };
        let dedup = PolymarketDeduplicator::new(&config);
        dedup.is_duplicate(&snapshot(1));
        std::thread::sleep(Duration::from_millis(5));
        dedup.gc();
        assert_eq!(dedup.cache_size(), 0);
    }

    #[test]
    fn exchange_name_is_polymarket() {
        let dedup = PolymarketDeduplicator::new(&DedupConfig::default());
        assert_eq!(dedup.exchange_name(), "Polymarket");
    }
}
