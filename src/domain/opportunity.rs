//! Detected arbitrage opportunities.
//!
//! An [`Opportunity`] is a snapshot of a set of legs (one per outcome token)
//! whose combined ask cost is below the market's guaranteed payout. Unlike
//! the old YES/NO-only model, this supports any outcome count so the same
//! type serves both binary single-condition and multi-outcome strategies.

use std::fmt;

use super::id::{MarketId, TokenId};
use super::money::{Price, Volume};

/// One leg of an opportunity: a token to buy and the ask price used to
/// price it at detection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityLeg {
    token_id: TokenId,
    ask_price: Price,
    ask_size: Volume,
}

impl OpportunityLeg {
    #[must_use]
    pub fn new(token_id: TokenId, ask_price: Price) -> Self {
        Self {
            token_id,
            ask_price,
            ask_size: Volume::ZERO,
        }
    }

    /// Attach the ask size observed at detection time, used by the execution
    /// engine to decide which leg of a hybrid maker/taker pair has the
    /// deeper book.
    #[must_use]
    pub fn with_ask_size(mut self, ask_size: Volume) -> Self {
        self.ask_size = ask_size;
        self
    }

    #[must_use]
    pub fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    #[must_use]
    pub fn ask_price(&self) -> Price {
        self.ask_price
    }

    #[must_use]
    pub fn ask_size(&self) -> Volume {
        self.ask_size
    }
}

/// A detected arbitrage opportunity across one or more outcome legs.
///
/// `total_cost`, `edge`, and `expected_profit` are derived, never stored,
/// so they always reflect the legs actually attached.
#[derive(Debug, Clone)]
pub struct Opportunity {
    market_id: MarketId,
    question: String,
    legs: Vec<OpportunityLeg>,
    volume: Volume,
    payout: Price,
    strategy: &'static str,
    tick_size: Price,
    expiry_ts: Option<i64>,
    fee_bps_taker: u32,
}

impl Opportunity {
    #[must_use]
    pub fn new(
        market_id: MarketId,
        question: impl Into<String>,
        legs: Vec<OpportunityLeg>,
        volume: Volume,
        payout: Price,
    ) -> Self {
        Self {
            market_id,
            question: question.into(),
            legs,
            volume,
            payout,
            strategy: "single_condition",
            tick_size: Price::new(1, 3), // 0.001
            expiry_ts: None,
            fee_bps_taker: 0,
        }
    }

    /// Attach the name of the strategy that produced this opportunity.
    #[must_use]
    pub fn with_strategy(mut self, strategy: &'static str) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the detected volume with a risk-sized volume, e.g. after the
    /// risk gate caps the notional below the full size the book supported.
    #[must_use]
    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volume = volume;
        self
    }

    /// Attach the market's tick size, expiry, and taker fee so the execution
    /// engine can select maker/taker pricing per leg without re-fetching the
    /// market.
    #[must_use]
    pub fn with_market_context(
        mut self,
        tick_size: Price,
        expiry_ts: Option<i64>,
        fee_bps_taker: u32,
    ) -> Self {
        self.tick_size = tick_size;
        self.expiry_ts = expiry_ts;
        self.fee_bps_taker = fee_bps_taker;
        self
    }

    #[must_use]
    pub fn tick_size(&self) -> Price {
        self.tick_size
    }

    #[must_use]
    pub fn expiry_ts(&self) -> Option<i64> {
        self.expiry_ts
    }

    #[must_use]
    pub fn fee_bps_taker(&self) -> u32 {
        self.fee_bps_taker
    }

    /// Seconds remaining until the market resolves, as of `now_unix`. `None`
    /// when no expiry was attached or it has already passed.
    #[must_use]
    pub fn time_to_resolution_secs(&self, now_unix: i64) -> Option<i64> {
        self.expiry_ts
            .map(|expiry| expiry - now_unix)
            .filter(|ttr| *ttr > 0)
    }

    #[must_use]
    pub fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn legs(&self) -> &[OpportunityLeg] {
        &self.legs
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    #[must_use]
    pub fn payout(&self) -> Price {
        self.payout
    }

    #[must_use]
    pub fn strategy(&self) -> &str {
        self.strategy
    }

    /// Sum of all leg ask prices — what buying one share of every leg costs.
    #[must_use]
    pub fn total_cost(&self) -> Price {
        self.legs.iter().map(OpportunityLeg::ask_price).sum()
    }

    /// Guaranteed payout minus total cost. Positive means risk-free profit
    /// per share; negative means the legs are overpriced relative to payout.
    #[must_use]
    pub fn edge(&self) -> Price {
        self.payout - self.total_cost()
    }

    #[must_use]
    pub fn expected_profit(&self) -> Price {
        self.edge() * self.volume
    }

    /// The taker fee, in price units, charged on `base` at this
    /// opportunity's taker fee rate.
    #[must_use]
    pub fn fee_bps_taker_price(&self, base: Price) -> Price {
        base * Price::from(self.fee_bps_taker) / Price::from(10_000u32)
    }
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] edge={} volume={}",
            self.market_id,
            self.strategy,
            self.edge(),
            self.volume
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn legs() -> Vec<OpportunityLeg> {
        vec![
            OpportunityLeg::new(TokenId::from("yes-token"), dec!(0.40)),
            OpportunityLeg::new(TokenId::from("no-token"), dec!(0.50)),
        ]
    }

    #[test]
    fn computes_derived_fields_for_binary_market() {
        let opp = Opportunity::new(
            MarketId::from("test-market"),
            "Will it rain?",
            legs(),
            dec!(100),
            dec!(1),
        );

        assert_eq!(opp.total_cost(), dec!(0.90));
        assert_eq!(opp.edge(), dec!(0.10));
        assert_eq!(opp.expected_profit(), dec!(10.00));
        assert_eq!(opp.strategy(), "single_condition");
    }

    #[test]
    fn negative_edge_when_legs_exceed_payout() {
        let legs = vec![
            OpportunityLeg::new(TokenId::from("yes-token"), dec!(0.60)),
            OpportunityLeg::new(TokenId::from("no-token"), dec!(0.50)),
        ];
        let opp = Opportunity::new(MarketId::from("m"), "q", legs, dec!(100), dec!(1));

        assert_eq!(opp.total_cost(), dec!(1.10));
        assert_eq!(opp.edge(), dec!(-0.10));
        assert_eq!(opp.expected_profit(), dec!(-10.00));
    }

    #[test]
    fn with_strategy_overrides_default() {
        let opp = Opportunity::new(MarketId::from("m"), "q", legs(), dec!(1), dec!(1))
            .with_strategy("market_rebalancing");
        assert_eq!(opp.strategy(), "market_rebalancing");
    }

    #[test]
    fn multi_outcome_supports_more_than_two_legs() {
        let legs = vec![
            OpportunityLeg::new(TokenId::from("a"), dec!(0.20)),
            OpportunityLeg::new(TokenId::from("b"), dec!(0.25)),
            OpportunityLeg::new(TokenId::from("c"), dec!(0.30)),
        ];
        let opp = Opportunity::new(MarketId::from("m"), "q", legs, dec!(10), dec!(1));
        assert_eq!(opp.total_cost(), dec!(0.75));
        assert_eq!(opp.edge(), dec!(0.25));
    }
}
