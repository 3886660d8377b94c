//! Reconnecting wrapper for MarketDataStream.
//!
//! Provides automatic reconnection with exponential backoff and circuit breaker
//! protection for any [`MarketDataStream`] implementation. The wrapper
//! transparently handles disconnections and resubscribes to tracked tokens.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::application::cache::book::BookCache;
use crate::domain::id::TokenId;
use crate::error::Error;
use crate::infrastructure::config::pool::ReconnectionConfig;
use crate::port::outbound::notifier::{Event, NotifierRegistry};
use crate::port::{outbound::exchange::MarketDataStream, outbound::exchange::MarketEvent};

/// Circuit breaker state for connection attempts.
///
/// Implements the circuit breaker pattern to prevent thundering herd problems
/// when the remote service is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CircuitState {
    /// Normal operation; connections are allowed.
    Closed,
    /// Too many consecutive failures; connections blocked until cooldown expires.
    Open {
        /// Instant when the circuit breaker will transition back to Closed.
        until: Instant,
    },
}

/// Wrapper that adds automatic reconnection to any [`MarketDataStream`].
///
/// Transparently handles disconnections by:
/// 1. Waiting with exponential backoff
/// 2. Reconnecting to the WebSocket
/// 3. Resubscribing to all previously tracked tokens
///
/// A circuit breaker trips after too many consecutive failures to prevent
/// resource exhaustion.
pub struct ReconnectingDataStream<S: MarketDataStream> {
    /// The underlying data stream being wrapped.
    inner: S,
    /// Reconnection and backoff configuration.
    config: ReconnectionConfig,
    /// Token IDs to resubscribe after reconnection.
    subscribed_tokens: Vec<TokenId>,
    /// Current consecutive failure count.
    consecutive_failures: u32,
    /// Current backoff delay in milliseconds.
    current_delay_ms: u64,
    /// Circuit breaker state.
    circuit_state: CircuitState,
    /// Whether the stream is currently connected.
    connected: bool,
    /// Notified on feed disconnect/reconnect, if wired up.
    notifier: Option<Arc<NotifierRegistry>>,
    /// Marked stale for our subscribed tokens on disconnect, if wired up.
    book_cache: Option<Arc<BookCache>>,
}

impl<S: MarketDataStream> ReconnectingDataStream<S> {
    /// Create a new reconnecting wrapper around a data stream.
    ///
    /// The wrapper starts in a disconnected state; call [`connect`](Self::connect)
    /// before reading events.
    pub fn new(inner: S, config: ReconnectionConfig) -> Self {
        let initial_delay = config.initial_delay_ms;
        Self {
            inner,
            config,
            subscribed_tokens: Vec::new(),
            consecutive_failures: 0,
            current_delay_ms: initial_delay,
            circuit_state: CircuitState::Closed,
            connected: false,
            notifier: None,
            book_cache: None,
        }
    }

    /// Notify on feed disconnect/reconnect via the given registry.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<NotifierRegistry>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Mark the subscribed tokens stale in `cache` when the feed drops.
    #[must_use]
    pub fn with_book_cache(mut self, cache: Arc<BookCache>) -> Self {
        self.book_cache = Some(cache);
        self
    }

    /// Broadcast that the feed disconnected, if a notifier is wired up, and
    /// mark the currently subscribed tokens' cached books stale.
    fn handle_disconnect(&self, reason: &str) {
        if let Some(notifier) = &self.notifier {
            notifier.notify_all(Event::FeedDisconnected {
                exchange: self.inner.exchange_name(),
                reason: reason.to_string(),
            });
        }
        if let Some(cache) = &self.book_cache {
            cache.mark_stale(&self.subscribed_tokens);
        }
    }

    /// Broadcast that the feed reconnected, if a notifier is wired up.
    fn handle_reconnect(&self) {
        if let Some(notifier) = &self.notifier {
            notifier.notify_all(Event::FeedReconnected {
                exchange: self.inner.exchange_name(),
            });
        }
    }

    /// Reset backoff state after a successful connection.
    ///
    /// Clears the failure count and resets the delay to the initial value.
    fn reset_backoff(&mut self) {
        self.consecutive_failures = 0;
        self.current_delay_ms = self.config.initial_delay_ms;
        self.circuit_state = CircuitState::Closed;
    }

    /// Calculate the next backoff delay using exponential backoff with jitter.
    ///
    /// Returns the current delay and advances the internal delay state for
    /// the next call.
    fn next_delay(&mut self) -> Duration {
        let base_delay = Duration::from_millis(self.current_delay_ms);
        let jitter_ms = self.jitter_ms(base_delay);
        let delay = base_delay + Duration::from_millis(jitter_ms);

        // Increase delay for next attempt
        let next_delay = (self.current_delay_ms as f64 * self.config.backoff_multiplier) as u64;
        self.current_delay_ms = next_delay.min(self.config.max_delay_ms);

        delay
    }

    /// Calculate jitter to add to the base delay.
    ///
    /// Adds up to 20% random jitter to prevent synchronized reconnection storms.
    fn jitter_ms(&self, base_delay: Duration) -> u64 {
        let jitter_range_ms = (base_delay.as_millis() as u64) / 5;
        if jitter_range_ms == 0 {
            return 0;
        }

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        (nanos as u64) % (jitter_range_ms + 1)
    }

    /// Check if the circuit breaker allows connection attempts.
    ///
    /// Returns true if the circuit is closed or has cooled down.
    /// Resets the circuit to closed if the cooldown has expired.
    fn circuit_allows_connection(&mut self) -> bool {
        match self.circuit_state {
            CircuitState::Closed => true,
            CircuitState::Open { until } => {
                if Instant::now() >= until {
                    info!("Circuit breaker cooldown expired, allowing reconnection");
                    self.circuit_state = CircuitState::Closed;
                    self.reset_backoff();
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a connection failure.
    ///
    /// Increments the failure count and trips the circuit breaker if the
    /// maximum consecutive failures threshold is exceeded.
    fn record_failure(&mut self) {
        self.consecutive_failures += 1;
        self.connected = false;

        if self.consecutive_failures >= self.config.max_consecutive_failures {
            let cooldown = Duration::from_millis(self.config.circuit_breaker_cooldown_ms);
            let until = Instant::now() + cooldown;
            self.circuit_state = CircuitState::Open { until };
            error!(
                failures = self.consecutive_failures,
                cooldown_secs = cooldown.as_secs(),
                "Circuit breaker tripped, pausing reconnection attempts"
            );
        }
    }

    /// Attempt to reconnect with backoff.
    ///
    /// Waits for the backoff delay, then attempts to reconnect and resubscribe
    /// to all previously tracked tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if connection or resubscription fails.
    async fn reconnect(&mut self) -> Result<(), Error> {
        if !self.circuit_allows_connection() {
            // Circuit is open, wait for cooldown
            if let CircuitState::Open { until } = self.circuit_state {
                let remaining = until.saturating_duration_since(Instant::now());
                warn!(
                    remaining_secs = remaining.as_secs(),
                    "Circuit breaker open, waiting for cooldown"
                );
                sleep(remaining).await;
                // After cooldown, circuit should allow connection
                self.circuit_state = CircuitState::Closed;
                self.reset_backoff();
            }
        }

        let delay = self.next_delay();
        info!(
            delay_ms = delay.as_millis(),
            attempt = self.consecutive_failures + 1,
            "Reconnecting after delay"
        );
        sleep(delay).await;

        match self.inner.connect().await {
            Ok(()) => {
                info!("Reconnected successfully");
                self.connected = true;

                // Resubscribe to tokens
                if !self.subscribed_tokens.is_empty() {
                    debug!(
                        tokens = self.subscribed_tokens.len(),
                        "Resubscribing to tokens"
                    );
                    if let Err(err) = self.inner.subscribe(&self.subscribed_tokens).await {
                        error!(error = %err, "Resubscribe failed after reconnect");
                        self.connected = false;
                        self.record_failure();
                        return Err(err);
                    }
                }

                self.reset_backoff();
                self.handle_reconnect();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Reconnection failed");
                self.record_failure();
                Err(e)
            }
        }
    }
}

#[async_trait]
impl<S: MarketDataStream + Send> MarketDataStream for ReconnectingDataStream<S> {
    async fn connect(&mut self) -> Result<(), Error> {
        let result = self.inner.connect().await;
        if result.is_ok() {
            self.connected = true;
            self.reset_backoff();
        }
        result
    }

    async fn subscribe(&mut self, token_ids: &[TokenId]) -> Result<(), Error> {
        // Store tokens for resubscription after reconnect
        self.subscribed_tokens = token_ids.to_vec();
        self.inner.subscribe(token_ids).await
    }

    async fn next_event(&mut self) -> Option<MarketEvent> {
        loop {
            // If not connected, try to reconnect
            if !self.connected {
                if let Err(e) = self.reconnect().await {
                    warn!(error = %e, "Reconnection attempt failed, will retry");
                    continue;
                }
            }

            // Get next event from inner stream
            match self.inner.next_event().await {
                Some(MarketEvent::Disconnected { reason }) => {
                    warn!(reason = %reason, "Connection lost, will reconnect");
                    if self.connected {
                        self.handle_disconnect(&reason);
                    }
                    self.connected = false;
                    self.record_failure();
                    // Don't return the disconnected event, just reconnect
                    continue;
                }
                Some(event) => {
                    // Reset failure count on successful event
                    if self.consecutive_failures > 0 {
                        debug!("Received event after reconnection, resetting failure count");
                        self.reset_backoff();
                    }
                    return Some(event);
                }
                None => {
                    // Stream ended unexpectedly
                    warn!("Data stream ended unexpectedly, will reconnect");
                    if self.connected {
                        self.handle_disconnect("stream ended unexpectedly");
                    }
                    self.connected = false;
                    self.record_failure();
                    continue;
                }
            }
        }
    }

    fn exchange_name(&self) -> &'static str {
        self.inner.exchange_name()
    }
}
