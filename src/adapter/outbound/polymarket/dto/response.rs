//! Polymarket REST API response types.
//!
//! Polymarket exposes two REST surfaces with different shapes:
//!
//! - The CLOB API (`/markets`) returns [`PolymarketMarket`], with a `tokens`
//!   array of structured [`PolymarketToken`] objects.
//! - The Gamma API (`/markets`) returns [`GammaMarket`], with outcome data
//!   packed as JSON-encoded strings (`outcomes`, `outcome_prices`,
//!   `clob_token_ids`) rather than nested arrays.

use serde::Deserialize;

/// A single outcome token as returned by the CLOB `/markets` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PolymarketToken {
    pub token_id: String,
    pub outcome: String,
    pub price: Option<f64>,
}

/// A market as returned by the CLOB `/markets` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PolymarketMarket {
    pub condition_id: String,
    pub question: Option<String>,
    #[serde(default)]
    pub tokens: Vec<PolymarketToken>,
    pub active: bool,
    pub closed: bool,
    pub volume_24h: Option<f64>,
    pub liquidity: Option<f64>,
}

impl PolymarketMarket {
    /// Token identifiers for every outcome in this market.
    #[must_use]
    pub fn token_ids(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.token_id.clone()).collect()
    }
}

/// Envelope returned by the CLOB `/markets` endpoint.
#[derive(Debug, Deserialize)]
pub struct PolymarketMarketsResponse {
    pub data: Option<Vec<PolymarketMarket>>,
}

/// A market as returned by the Gamma `/markets` endpoint.
///
/// Outcome data is packed into JSON-encoded string fields rather than nested
/// arrays; use [`Self::token_ids`], [`Self::outcome_names`], and
/// [`Self::outcome_prices`] to unpack them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GammaMarket {
    pub condition_id: String,
    pub question: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub closed: bool,
    pub outcomes: Option<String>,
    pub outcome_prices: Option<String>,
    pub clob_token_ids: Option<String>,
    pub volume_24hr: Option<f64>,
    pub volume_num: Option<f64>,
    pub liquidity_num: Option<f64>,
}

/// Parse a Gamma field holding a JSON-encoded array of strings.
///
/// Returns an empty vector if the field is absent or the JSON is malformed,
/// matching the Gamma API's tendency to omit or mangle these fields for
/// markets with unusual outcome shapes.
fn parse_string_array(field: &Option<String>) -> Vec<String> {
    field
        .as_ref()
        .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
        .unwrap_or_default()
}

impl GammaMarket {
    /// Token identifiers unpacked from `clob_token_ids`.
    #[must_use]
    pub fn token_ids(&self) -> Vec<String> {
        parse_string_array(&self.clob_token_ids)
    }

    /// Outcome names unpacked from `outcomes`.
    #[must_use]
    pub fn outcome_names(&self) -> Vec<String> {
        parse_string_array(&self.outcomes)
    }

    /// Outcome prices unpacked from `outcome_prices`, parsed as floats.
    ///
    /// Entries that fail to parse as a float are dropped, not substituted
    /// with a placeholder, so indices can shift relative to `outcome_names`
    /// for malformed data; callers already treat missing indices as `None`.
    #[must_use]
    pub fn outcome_prices(&self) -> Vec<f64> {
        parse_string_array(&self.outcome_prices)
            .iter()
            .filter_map(|s| s.parse::<f64>().ok())
            .collect()
    }
}
