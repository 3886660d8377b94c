//! Polymarket market eligibility filtering.
//!
//! Filters markets discovered via the Gamma API down to the set worth
//! holding a subscription slot for: sufficiently liquid, sufficiently
//! active, and matching the configured outcome-count shape.

use crate::adapter::outbound::polymarket::settings::PolymarketFilterConfig;
use crate::port::outbound::exchange::MarketInfo;
use crate::port::outbound::filter::{MarketFilter, MarketFilterConfig};

/// Eligibility filter for Polymarket markets.
pub struct PolymarketFilter {
    config: MarketFilterConfig,
}

impl PolymarketFilter {
    #[must_use]
    pub fn new(config: &PolymarketFilterConfig) -> Self {
        Self {
            config: MarketFilterConfig {
                max_markets: config.max_markets,
                max_subscriptions: config.max_subscriptions,
                min_volume_24h: config.min_volume_24h,
                min_liquidity: config.min_liquidity,
                max_spread_pct: config.max_spread_pct,
                include_binary: config.include_binary,
                include_multi_outcome: config.include_multi_outcome,
                max_outcomes: config.max_outcomes,
            },
        }
    }
}

impl MarketFilter for PolymarketFilter {
    fn is_eligible(&self, market: &MarketInfo) -> bool {
        if !market.active {
            return false;
        }

        let outcome_count = market.outcomes.len();
        if outcome_count == 0 || outcome_count > self.config.max_outcomes {
            return false;
        }

        let is_binary = outcome_count == 2;
        if is_binary && !self.config.include_binary {
            return false;
        }
        if !is_binary && !self.config.include_multi_outcome {
            return false;
        }

        if let Some(volume) = market.volume_24h {
            if volume < self.config.min_volume_24h {
                return false;
            }
        }

        if let Some(liquidity) = market.liquidity {
            if liquidity < self.config.min_liquidity {
                return false;
            }
        }

        true
    }

    fn config(&self) -> &MarketFilterConfig {
        &self.config
    }

    fn exchange_name(&self) -> &'static str {
        "Polymarket"
    }
}
