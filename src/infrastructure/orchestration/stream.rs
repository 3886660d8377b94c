//! Market stream setup.

use std::sync::Arc;

use crate::application::cache::book::BookCache;
use crate::domain::id::TokenId;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::exchange::factory::ExchangeFactory;
use crate::infrastructure::exchange::reconnecting::ReconnectingDataStream;
use crate::port::outbound::exchange::MarketDataStream;
use crate::port::outbound::notifier::NotifierRegistry;
use tracing::info;

/// Build and connect the market stream with optional pooling.
///
/// When connecting over a single connection (no pool), the returned stream
/// is wired to `notifiers` and `cache` so reconnect/disconnect events are
/// broadcast and the affected books are marked stale. The pooled path
/// manages its own connections and reports solely via tracing.
pub(crate) async fn create_connected_stream(
    config: &Config,
    token_ids: &[TokenId],
    notifiers: &Arc<NotifierRegistry>,
    cache: &Arc<BookCache>,
) -> Result<Box<dyn MarketDataStream>> {
    let mut data_stream: Box<dyn MarketDataStream> =
        if let Some(pool) = ExchangeFactory::create_connection_pool(config)? {
            info!(exchange = pool.exchange_name(), "Using connection pool");
            Box::new(pool)
        } else {
            info!("Using single connection");
            let inner = ExchangeFactory::create_data_stream(config);
            Box::new(
                ReconnectingDataStream::new(inner, config.reconnection.clone())
                    .with_notifier(Arc::clone(notifiers))
                    .with_book_cache(Arc::clone(cache)),
            )
        };

    data_stream.connect().await?;
    data_stream.subscribe(token_ids).await?;
    Ok(data_stream)
}
