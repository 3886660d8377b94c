//! `arb-engine` — binary-outcome prediction-market arbitrage detection and
//! execution engine.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── domain/         # Pure domain types (prices, markets, opportunities)
//! ├── port/           # Hexagonal ports: inbound (driving) and outbound (driven)
//! ├── application/     # Use-case orchestration: caches, risk, position tracking
//! ├── adapter/         # Outbound adapters: exchange, notifier, stats
//! └── infrastructure/  # Config, connection pooling, factories, the composition root
//! ```
//!
//! # Features
//!
//! - `polymarket` - Enable Polymarket exchange support (default)
//! - `testkit` - Expose test doubles for integration tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
