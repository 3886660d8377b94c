//! Context types for strategy detection.
//!
//! Provides concrete implementations of the [`DetectionContext`](DetectionContextTrait)
//! trait that wrap market metadata and order book cache.

use rust_decimal::Decimal;

use crate::application::cache::book::BookCache;
use crate::domain::{book::Book, id::MarketId, id::TokenId, market::Market};
use crate::port::{
    inbound::strategy::DetectionContext as DetectionContextTrait, inbound::strategy::MarketContext,
};

/// Concrete detection context wrapping market metadata and order book cache.
///
/// Passed to strategies during the detection phase. Provides access to market
/// properties and current prices through the [`DetectionContext`](DetectionContextTrait)
/// interface.
///
/// Strategies should fail closed (return no opportunities) when required
/// order books are missing from the cache.
pub struct ConcreteDetectionContext<'a> {
    /// Reference to the market being analyzed.
    pub market: &'a Market,
    /// Reference to the order book cache for price lookups.
    pub cache: &'a BookCache,
    /// Pre-computed market context (binary vs multi-outcome).
    market_ctx: MarketContext,
}

impl<'a> ConcreteDetectionContext<'a> {
    /// Create a new detection context for a market.
    ///
    /// Automatically determines whether the market is binary or multi-outcome
    /// based on the number of outcomes defined in the market.
    pub fn new(market: &'a Market, cache: &'a BookCache) -> Self {
        let market_ctx = if market.is_binary() {
            MarketContext::binary()
        } else {
            MarketContext::multi_outcome(market.outcome_count())
        };
        Self {
            market,
            cache,
            market_ctx,
        }
    }

    /// Override the market context with a custom value.
    ///
    /// Useful for testing or when the context should differ from what
    /// would be inferred from the market structure.
    #[must_use]
    pub fn with_market_context(mut self, ctx: MarketContext) -> Self {
        self.market_ctx = ctx;
        self
    }
}

impl<'a> DetectionContextTrait for ConcreteDetectionContext<'a> {
    fn market_id(&self) -> &MarketId {
        self.market.market_id()
    }

    fn question(&self) -> &str {
        self.market.question()
    }

    fn token_ids(&self) -> Vec<TokenId> {
        self.market.token_ids().into_iter().cloned().collect()
    }

    fn payout(&self) -> Decimal {
        self.market.payout()
    }

    fn market_context(&self) -> MarketContext {
        self.market_ctx.clone()
    }

    fn best_ask(&self, token_id: &TokenId) -> Option<Decimal> {
        self.cache.get(token_id)?.best_ask().map(|l| l.price())
    }

    fn best_bid(&self, token_id: &TokenId) -> Option<Decimal> {
        self.cache.get(token_id)?.best_bid().map(|l| l.price())
    }

    fn ask_volume(&self, token_id: &TokenId) -> Option<Decimal> {
        self.cache.get(token_id)?.best_ask().map(|l| l.size())
    }

    fn order_book(&self, token_id: &TokenId) -> Option<Book> {
        self.cache.get(token_id)
    }

    fn market(&self) -> &Market {
        self.market
    }
}
