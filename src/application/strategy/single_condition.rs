//! Binary-market arbitrage detection.
//!
//! Evaluates the sum of best-ask prices across a market's outcome tokens
//! against its payout, in integer ticks, to avoid floating-point rounding
//! drift near the 1.0 boundary.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::money::legs_below_payout_in_ticks;
use crate::domain::opportunity::{Opportunity, OpportunityLeg};
use crate::port::inbound::strategy::{DetectionContext, MarketContext, Strategy};

fn default_min_profit_margin() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

fn default_min_size() -> Decimal {
    Decimal::ONE
}

fn default_fee_reserve_bps() -> u32 {
    0
}

/// Configuration for the single-condition (binary market) detection strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct SingleConditionConfig {
    /// Minimum margin, `payout - total_ask_cost`, required to emit an opportunity.
    #[serde(default = "default_min_profit_margin")]
    pub min_profit_margin: Decimal,
    /// Minimum tradeable size (the smaller of the two ask sizes) required to emit.
    #[serde(default = "default_min_size")]
    pub min_size: Decimal,
    /// Fee reserve in basis points of total ask cost, held back from the margin
    /// check. Only used as a fallback when the market's own `fee_bps_taker`
    /// is zero (i.e. the market carries no fee schedule of its own).
    #[serde(default = "default_fee_reserve_bps")]
    pub fee_reserve_bps: u32,
}

impl Default for SingleConditionConfig {
    fn default() -> Self {
        Self {
            min_profit_margin: default_min_profit_margin(),
            min_size: default_min_size(),
            fee_reserve_bps: default_fee_reserve_bps(),
        }
    }
}

/// Detects arbitrage across the UP/DOWN outcome tokens of a binary market.
///
/// Pure on a book snapshot: it reads the context's cached best asks and never
/// mutates state. Suppression of in-flight markets and TTL-based staleness are
/// the caller's responsibility (risk gate and orderbook store, respectively).
pub struct SingleConditionStrategy {
    config: SingleConditionConfig,
}

impl SingleConditionStrategy {
    #[must_use]
    pub fn new(config: SingleConditionConfig) -> Self {
        Self { config }
    }
}

impl Strategy for SingleConditionStrategy {
    fn name(&self) -> &'static str {
        "single_condition"
    }

    fn applies_to(&self, ctx: &MarketContext) -> bool {
        ctx.is_binary()
    }

    fn detect(&self, ctx: &dyn DetectionContext) -> Vec<Opportunity> {
        let token_ids = ctx.token_ids();
        if token_ids.len() != 2 {
            return Vec::new();
        }

        let market = ctx.market();
        let tick_size = market.tick_size();
        let payout = ctx.payout();

        let mut legs = Vec::with_capacity(2);
        let mut ask_prices = Vec::with_capacity(2);
        let mut min_ask_size: Option<Decimal> = None;

        for token_id in &token_ids {
            let Some(ask_price) = ctx.best_ask(token_id) else {
                return Vec::new();
            };
            let Some(ask_size) = ctx.ask_volume(token_id) else {
                return Vec::new();
            };
            min_ask_size = Some(match min_ask_size {
                Some(current) => current.min(ask_size),
                None => ask_size,
            });
            ask_prices.push(ask_price);
            legs.push(OpportunityLeg::new(token_id.clone(), ask_price).with_ask_size(ask_size));
        }

        let size = min_ask_size.unwrap_or(Decimal::ZERO);
        if size < self.config.min_size {
            return Vec::new();
        }

        // Prefer the market's own taker fee schedule; fall back to the
        // configured flat reserve only for markets that carry none.
        let fee_bps = if market.fee_bps_taker() > 0 {
            market.fee_bps_taker()
        } else {
            self.config.fee_reserve_bps
        };

        let fee_reserve = if fee_bps > 0 {
            let total_ask: Decimal = ask_prices.iter().sum();
            total_ask * Decimal::from(fee_bps) / Decimal::from(10_000u32)
        } else {
            Decimal::ZERO
        };

        let margin_threshold = payout - self.config.min_profit_margin - fee_reserve;
        if !legs_below_payout_in_ticks(&ask_prices, margin_threshold, tick_size) {
            return Vec::new();
        }

        vec![Opportunity::new(
            ctx.market_id().clone(),
            ctx.question().to_string(),
            legs,
            size,
            payout,
        )
        .with_market_context(tick_size, market.expiry_ts(), market.fee_bps_taker())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::book::BookCache;
    use crate::application::strategy::context::ConcreteDetectionContext;
    use crate::domain::book::{Book, PriceLevel};
    use crate::domain::id::{MarketId, TokenId};
    use crate::domain::market::{Market, Outcome};
    use rust_decimal_macros::dec;

    fn binary_market() -> Market {
        Market::new(
            MarketId::from("market-1"),
            "Will it happen?",
            vec![
                Outcome::new(TokenId::from("up"), "Up"),
                Outcome::new(TokenId::from("down"), "Down"),
            ],
            dec!(1),
        )
        .with_tick_size(dec!(0.001))
    }

    fn book_with_ask(token: &str, price: Decimal, size: Decimal) -> Book {
        Book::with_levels(
            TokenId::from(token),
            vec![],
            vec![PriceLevel::new(price, size)],
        )
    }

    #[test]
    fn detects_clean_arbitrage() {
        let market = binary_market();
        let cache = BookCache::new();
        cache.update(book_with_ask("up", dec!(0.40), dec!(100)));
        cache.update(book_with_ask("down", dec!(0.50), dec!(100)));

        let ctx = ConcreteDetectionContext::new(&market, &cache);
        let strategy = SingleConditionStrategy::new(SingleConditionConfig {
            min_profit_margin: dec!(0.02),
            min_size: dec!(1),
            fee_reserve_bps: 0,
        });

        let opportunities = strategy.detect(&ctx);
        assert_eq!(opportunities.len(), 1);
        let opp = &opportunities[0];
        assert_eq!(opp.total_cost(), dec!(0.90));
        assert_eq!(opp.edge(), dec!(0.10));
    }

    #[test]
    fn rejects_below_minimum_margin() {
        let market = binary_market();
        let cache = BookCache::new();
        cache.update(book_with_ask("up", dec!(0.49), dec!(100)));
        cache.update(book_with_ask("down", dec!(0.50), dec!(100)));

        let ctx = ConcreteDetectionContext::new(&market, &cache);
        let strategy = SingleConditionStrategy::new(SingleConditionConfig {
            min_profit_margin: dec!(0.02),
            min_size: dec!(1),
            fee_reserve_bps: 0,
        });

        assert!(strategy.detect(&ctx).is_empty());
    }

    #[test]
    fn rejects_exact_boundary() {
        // ask_up + ask_down == payout - min_profit_margin exactly: not strictly below.
        let market = binary_market();
        let cache = BookCache::new();
        cache.update(book_with_ask("up", dec!(0.48), dec!(100)));
        cache.update(book_with_ask("down", dec!(0.50), dec!(100)));

        let ctx = ConcreteDetectionContext::new(&market, &cache);
        let strategy = SingleConditionStrategy::new(SingleConditionConfig {
            min_profit_margin: dec!(0.02),
            min_size: dec!(1),
            fee_reserve_bps: 0,
        });

        assert!(strategy.detect(&ctx).is_empty());
    }

    #[test]
    fn rejects_missing_ask() {
        let market = binary_market();
        let cache = BookCache::new();
        cache.update(book_with_ask("up", dec!(0.40), dec!(100)));
        // no book for "down"

        let ctx = ConcreteDetectionContext::new(&market, &cache);
        let strategy = SingleConditionStrategy::new(SingleConditionConfig::default());

        assert!(strategy.detect(&ctx).is_empty());
    }

    #[test]
    fn rejects_zero_size() {
        let market = binary_market();
        let cache = BookCache::new();
        cache.update(book_with_ask("up", dec!(0.40), dec!(0)));
        cache.update(book_with_ask("down", dec!(0.50), dec!(100)));

        let ctx = ConcreteDetectionContext::new(&market, &cache);
        let strategy = SingleConditionStrategy::new(SingleConditionConfig {
            min_profit_margin: dec!(0.02),
            min_size: dec!(1),
            fee_reserve_bps: 0,
        });

        assert!(strategy.detect(&ctx).is_empty());
    }

    #[test]
    fn does_not_apply_to_multi_outcome_markets() {
        let strategy = SingleConditionStrategy::new(SingleConditionConfig::default());
        assert!(!strategy.applies_to(&MarketContext::multi_outcome(3)));
        assert!(strategy.applies_to(&MarketContext::binary()));
    }
}
