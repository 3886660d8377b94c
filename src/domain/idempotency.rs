//! Deterministic idempotency keys for order submission.
//!
//! A retried submission for the same leg of the same execution attempt must
//! never be mistaken for a new order. The key folds in everything that
//! identifies *this* attempt at *this* leg so a retry derives the exact same
//! string and a caller holding a client-order-id cache can short-circuit to
//! the previously returned order instead of submitting again.

use std::fmt::Write as _;

use super::id::{MarketId, TokenId};

/// Build the idempotency key for one leg of one execution attempt.
///
/// `attempt_id` stands in for the reservation id: it is the trade id minted
/// when the attempt opened, unique per execution regardless of how many
/// times an individual leg within it is retried.
#[must_use]
pub fn order_idempotency_key(market_id: &MarketId, token_id: &TokenId, attempt_id: i32) -> String {
    let mut key = String::with_capacity(market_id.as_str().len() + token_id.as_str().len() + 12);
    let _ = write!(key, "{market_id}:{token_id}:{attempt_id}");
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_produce_the_same_key() {
        let market = MarketId::from("m1");
        let token = TokenId::from("up");
        assert_eq!(
            order_idempotency_key(&market, &token, 7),
            order_idempotency_key(&market, &token, 7)
        );
    }

    #[test]
    fn different_attempts_produce_different_keys() {
        let market = MarketId::from("m1");
        let token = TokenId::from("up");
        assert_ne!(
            order_idempotency_key(&market, &token, 7),
            order_idempotency_key(&market, &token, 8)
        );
    }

    #[test]
    fn different_legs_within_the_same_attempt_differ() {
        let market = MarketId::from("m1");
        assert_ne!(
            order_idempotency_key(&market, &TokenId::from("up"), 7),
            order_idempotency_key(&market, &TokenId::from("down"), 7)
        );
    }
}
