//! Exchange abstraction layer.
//!
//! ## Adding a New Exchange
//!
//! 1. Create an adapter under `adapter/outbound/<name>/`
//! 2. Implement [`crate::port::outbound::exchange::MarketDataStream`] and
//!    [`crate::port::outbound::exchange::ArbitrageExecutor`]
//! 3. Implement [`crate::port::outbound::exchange::MarketParser`]
//! 4. Add to [`ExchangeFactory`] for runtime selection

mod factory;
mod pool;
mod reconnecting;

pub use factory::ExchangeFactory;
pub use pool::{ConnectionPool, StreamFactory};
pub use reconnecting::ReconnectingDataStream;
