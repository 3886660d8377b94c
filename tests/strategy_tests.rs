//! Integration tests for the strategy system.

use arb_engine::application::cache::book::BookCache;
use arb_engine::application::strategy::context::ConcreteDetectionContext;
use arb_engine::application::strategy::single_condition::{
    SingleConditionConfig, SingleConditionStrategy,
};
use arb_engine::application::strategy::registry::StrategyRegistry;
use arb_engine::domain::id::MarketId;
use arb_engine::domain::market::{Market, Outcome};
use arb_engine::domain::{Book, PriceLevel};
use arb_engine::port::inbound::strategy::{DetectionContext, MarketContext, Strategy};
use rust_decimal_macros::dec;

fn make_binary_market(id: &str, question: &str, yes_token: &str, no_token: &str) -> Market {
    Market::new(
        MarketId::from(id),
        question,
        vec![
            Outcome::new(yes_token.into(), "Yes"),
            Outcome::new(no_token.into(), "No"),
        ],
        dec!(1),
    )
}

fn setup_arbitrage_books(cache: &BookCache, market: &Market) {
    let yes_token = market.outcomes()[0].token_id().clone();
    let no_token = market.outcomes()[1].token_id().clone();

    // YES: 0.40, NO: 0.50 = 0.90 total (10% edge)
    cache.update(Book::with_levels(
        yes_token,
        vec![],
        vec![PriceLevel::new(dec!(0.40), dec!(100))],
    ));
    cache.update(Book::with_levels(
        no_token,
        vec![],
        vec![PriceLevel::new(dec!(0.50), dec!(100))],
    ));
}

fn setup_no_arbitrage_books(cache: &BookCache, market: &Market) {
    let yes_token = market.outcomes()[0].token_id().clone();
    let no_token = market.outcomes()[1].token_id().clone();

    // YES: 0.50, NO: 0.50 = 1.00 total (no edge)
    cache.update(Book::with_levels(
        yes_token,
        vec![],
        vec![PriceLevel::new(dec!(0.50), dec!(100))],
    ));
    cache.update(Book::with_levels(
        no_token,
        vec![],
        vec![PriceLevel::new(dec!(0.50), dec!(100))],
    ));
}

#[test]
fn test_strategy_registry_detects_with_single_condition() {
    let mut registry = StrategyRegistry::new();
    registry.register(Box::new(SingleConditionStrategy::new(
        SingleConditionConfig::default(),
    )));

    let market = make_binary_market("test-market", "Will it happen?", "yes-token", "no-token");
    let cache = BookCache::new();
    setup_arbitrage_books(&cache, &market);

    let ctx = ConcreteDetectionContext::new(&market, &cache);
    let opportunities = registry.detect_all(&ctx);

    assert_eq!(opportunities.len(), 1);
    assert_eq!(opportunities[0].edge(), dec!(0.10));
}

#[test]
fn test_strategy_registry_empty_when_no_arbitrage() {
    let mut registry = StrategyRegistry::new();
    registry.register(Box::new(SingleConditionStrategy::new(
        SingleConditionConfig::default(),
    )));

    let market = make_binary_market("test-market", "Will it happen?", "yes-token", "no-token");
    let cache = BookCache::new();
    setup_no_arbitrage_books(&cache, &market);

    let ctx = ConcreteDetectionContext::new(&market, &cache);
    let opportunities = registry.detect_all(&ctx);

    assert!(opportunities.is_empty());
}

#[test]
fn test_strategy_applies_to_filtering() {
    let single = SingleConditionStrategy::new(SingleConditionConfig::default());

    assert!(single.applies_to(&MarketContext::binary()));
    assert!(!single.applies_to(&MarketContext::multi_outcome(3)));
}

#[test]
fn test_empty_registry_returns_no_opportunities() {
    let registry = StrategyRegistry::new();

    let market = make_binary_market("test-market", "Will it happen?", "yes-token", "no-token");
    let cache = BookCache::new();
    setup_arbitrage_books(&cache, &market);

    let ctx = ConcreteDetectionContext::new(&market, &cache);
    let opportunities = registry.detect_all(&ctx);

    assert!(opportunities.is_empty());
}

#[test]
fn strategy_skips_when_order_books_missing() {
    let mut registry = StrategyRegistry::new();
    registry.register(Box::new(SingleConditionStrategy::new(
        SingleConditionConfig::default(),
    )));

    let market = make_binary_market("test-market", "Will it happen?", "yes-token", "no-token");
    let cache = BookCache::new();
    // Don't add any order books - cache is empty

    let ctx = ConcreteDetectionContext::new(&market, &cache);
    let opportunities = registry.detect_all(&ctx);

    assert!(
        opportunities.is_empty(),
        "Single-condition strategy should return no opportunities when order books are missing"
    );
}
