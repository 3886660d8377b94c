//! Market-related domain types with proper encapsulation.

use std::fmt;

use super::id::{MarketId, TokenId};
use super::money::Price;

/// A single outcome token within a market (e.g. "Yes"/"No", or one leg of
/// a multi-outcome market).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    token_id: TokenId,
    name: String,
}

impl Outcome {
    #[must_use]
    pub fn new(token_id: TokenId, name: impl Into<String>) -> Self {
        Self {
            token_id,
            name: name.into(),
        }
    }

    #[must_use]
    pub const fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A tradeable market: a question with N mutually-exclusive outcomes that
/// pay out `payout` per share to whichever outcome resolves true.
///
/// Binary markets (two outcomes) are the only shape the core arbitrage
/// strategies currently detect against; `outcome_count() > 2` markets are
/// tracked so registries and feeds can carry them without the detector
/// needing to special-case unknown shapes.
#[derive(Debug, Clone)]
pub struct Market {
    market_id: MarketId,
    question: String,
    outcomes: Vec<Outcome>,
    payout: Price,
    expiry_ts: Option<i64>,
    tick_size: Price,
    fee_bps_taker: u32,
    fee_bps_maker: u32,
}

impl Market {
    #[must_use]
    pub fn new(
        market_id: MarketId,
        question: impl Into<String>,
        outcomes: Vec<Outcome>,
        payout: Price,
    ) -> Self {
        Self {
            market_id,
            question: question.into(),
            outcomes,
            payout,
            expiry_ts: None,
            tick_size: Price::new(1, 3), // 0.001
            fee_bps_taker: 0,
            fee_bps_maker: 0,
        }
    }

    /// Attach a unix-timestamp expiry (used for time-to-resolution sizing).
    #[must_use]
    pub fn with_expiry(mut self, expiry_ts: i64) -> Self {
        self.expiry_ts = Some(expiry_ts);
        self
    }

    #[must_use]
    pub fn with_tick_size(mut self, tick_size: Price) -> Self {
        self.tick_size = tick_size;
        self
    }

    #[must_use]
    pub fn with_fees(mut self, fee_bps_maker: u32, fee_bps_taker: u32) -> Self {
        self.fee_bps_maker = fee_bps_maker;
        self.fee_bps_taker = fee_bps_taker;
        self
    }

    #[must_use]
    pub const fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.outcomes.len() == 2
    }

    #[must_use]
    pub fn payout(&self) -> Price {
        self.payout
    }

    #[must_use]
    pub fn expiry_ts(&self) -> Option<i64> {
        self.expiry_ts
    }

    #[must_use]
    pub fn tick_size(&self) -> Price {
        self.tick_size
    }

    #[must_use]
    pub fn fee_bps_taker(&self) -> u32 {
        self.fee_bps_taker
    }

    #[must_use]
    pub fn fee_bps_maker(&self) -> u32 {
        self.fee_bps_maker
    }

    #[must_use]
    pub fn token_ids(&self) -> Vec<&TokenId> {
        self.outcomes.iter().map(Outcome::token_id).collect()
    }

    /// Seconds remaining until expiry, given the current unix time. `None`
    /// when the market has no expiry set or has already expired.
    #[must_use]
    pub fn time_to_resolution_secs(&self, now_unix: i64) -> Option<i64> {
        self.expiry_ts
            .map(|expiry| expiry - now_unix)
            .filter(|ttr| *ttr > 0)
    }
}

/// Error returned when registering a market whose token already belongs to
/// a different market in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateToken {
    pub token_id: TokenId,
    pub existing_market_id: MarketId,
}

impl fmt::Display for DuplicateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "token {} already registered to market {}",
            self.token_id, self.existing_market_id
        )
    }
}

impl std::error::Error for DuplicateToken {}

/// In-memory registry of known markets, indexed by market id and by the
/// token ids that belong to each market's outcomes.
///
/// Registration is idempotent: re-adding a market with the same id replaces
/// the previous entry and rebuilds its token index. A token that already
/// belongs to a *different* market is rejected with [`DuplicateToken`] so a
/// misbehaving feed can't silently steal another market's token.
#[derive(Debug, Default)]
pub struct MarketRegistry {
    markets: Vec<Market>,
    token_index: std::collections::HashMap<TokenId, usize>,
}

impl MarketRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a market. Rejects the market (leaving the registry
    /// unchanged) if any of its tokens are already owned by another market.
    pub fn add(&mut self, market: Market) -> Result<(), DuplicateToken> {
        if let Some(existing_idx) = self.markets.iter().position(|m| m.market_id() == market.market_id()) {
            self.remove(market.market_id());
            let _ = existing_idx;
        }

        for token_id in market.token_ids() {
            if let Some(&idx) = self.token_index.get(token_id) {
                let owner = self.markets[idx].market_id().clone();
                if owner != *market.market_id() {
                    return Err(DuplicateToken {
                        token_id: token_id.clone(),
                        existing_market_id: owner,
                    });
                }
            }
        }

        let idx = self.markets.len();
        for token_id in market.token_ids() {
            self.token_index.insert(token_id.clone(), idx);
        }
        self.markets.push(market);
        Ok(())
    }

    /// Remove a market (and its token index entries) by id. Idempotent:
    /// removing an unknown market id is a no-op.
    pub fn remove(&mut self, market_id: &MarketId) {
        let Some(idx) = self.markets.iter().position(|m| m.market_id() == market_id) else {
            return;
        };
        self.markets.remove(idx);
        self.token_index.retain(|_, i| *i != idx);
        for i in self.token_index.values_mut() {
            if *i > idx {
                *i -= 1;
            }
        }
    }

    /// Remove every market whose `expiry_ts` is at or before `now_unix`.
    /// Markets without an expiry are never swept.
    pub fn sweep_expired(&mut self, now_unix: i64) {
        let expired: Vec<MarketId> = self
            .markets
            .iter()
            .filter(|m| m.expiry_ts().is_some_and(|ts| ts <= now_unix))
            .map(|m| m.market_id().clone())
            .collect();
        for market_id in expired {
            self.remove(&market_id);
        }
    }

    #[must_use]
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    #[must_use]
    pub fn get(&self, market_id: &MarketId) -> Option<&Market> {
        self.markets.iter().find(|m| m.market_id() == market_id)
    }

    #[must_use]
    pub fn get_by_token(&self, token_id: &TokenId) -> Option<&Market> {
        self.token_index.get(token_id).map(|&idx| &self.markets[idx])
    }
}

/// A YES/NO market pair with proper encapsulation.
#[derive(Debug, Clone)]
pub struct MarketPair {
    market_id: MarketId,
    question: String,
    yes_token: TokenId,
    no_token: TokenId,
}

impl MarketPair {
    /// Create a new `MarketPair`.
    pub fn new(
        market_id: MarketId,
        question: impl Into<String>,
        yes_token: TokenId,
        no_token: TokenId,
    ) -> Self {
        Self {
            market_id,
            question: question.into(),
            yes_token,
            no_token,
        }
    }

    /// Get the market ID.
    #[must_use]
    pub const fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    /// Get the market question.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Get the YES token ID.
    #[must_use]
    pub const fn yes_token(&self) -> &TokenId {
        &self.yes_token
    }

    /// Get the NO token ID.
    #[must_use]
    pub const fn no_token(&self) -> &TokenId {
        &self.no_token
    }
}
