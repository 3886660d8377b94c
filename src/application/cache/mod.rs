//! Runtime caches and trackers used by application services.
//!
//! Provides thread-safe, in-memory storage for frequently accessed data:
//!
//! - [`book::BookCache`]: Order book snapshots with optional update notifications
//! - [`position::PositionTracker`]: Open and closed position tracking

pub mod book;
pub mod position;
