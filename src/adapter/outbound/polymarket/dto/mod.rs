//! Polymarket data transfer objects.
//!
//! Contains types for API and WebSocket communication:
//! - WebSocket messages (subscriptions, book snapshots)
//! - REST API responses (market data, tokens)

pub mod message;
pub mod response;
