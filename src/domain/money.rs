//! Monetary types for price and volume representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Volume represented as a Decimal for precision.
pub type Volume = Decimal;

/// Convert a price to an integer number of ticks at the given tick size.
///
/// Venue order books quote in ticks (e.g. `$0.001` increments); comparing
/// margins in tick units avoids decimal rounding drift when summing many
/// leg prices before comparing against a one-dollar payout.
#[must_use]
pub fn price_to_ticks(price: Price, tick_size: Price) -> i64 {
    if tick_size.is_zero() {
        return 0;
    }
    (price / tick_size).round().mantissa() as i64
}

/// Convert an integer tick count back to a price at the given tick size.
#[must_use]
pub fn ticks_to_price(ticks: i64, tick_size: Price) -> Price {
    Decimal::from(ticks) * tick_size
}

/// True when the sum of leg ask prices (in ticks) is strictly below the
/// number of ticks representing the market's payout, i.e. the integer-tick
/// equivalent of `ask_up_ticks + ask_down_ticks < ticks_per_unit`.
#[must_use]
pub fn legs_below_payout_in_ticks(leg_prices: &[Price], payout: Price, tick_size: Price) -> bool {
    if tick_size.is_zero() {
        return leg_prices.iter().sum::<Price>() < payout;
    }
    let ticks_per_unit = price_to_ticks(payout, tick_size);
    let total_ticks: i64 = leg_prices
        .iter()
        .map(|p| price_to_ticks(*p, tick_size))
        .sum();
    total_ticks < ticks_per_unit
}
