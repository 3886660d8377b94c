//! Orchestrator runtime lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;
use tracing::{info, warn};

use super::context::EventProcessingContext;
use super::orchestrator::{process_market_event, Orchestrator};
use super::startup;
use super::stream;
use crate::adapter::outbound::stats::InMemoryStatsRecorder;
use crate::application::cache::book::BookCache;
use crate::application::position::manager::PositionManager;
use crate::application::risk::manager::RiskManager;
use crate::application::state::AppState;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::executor::build_executor;
use crate::infrastructure::factory::notifier::build_notifier_registry;
use crate::infrastructure::factory::strategy::build_strategy_registry;
use crate::port::outbound::notifier::{Event, HedgeEvent};
use crate::port::outbound::stats::StatsRecorder;

impl Orchestrator {
    /// Run the main application loop.
    pub async fn run(config: Config) -> Result<()> {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        super::runtime::run_with_shutdown(config, shutdown_rx).await
    }

    /// Run with externally controlled shutdown signal.
    pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
        super::runtime::run_with_shutdown(config, shutdown).await
    }
}

/// Runtime loop entrypoint used by [`Orchestrator`].
pub async fn run_with_shutdown(config: Config, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    info!(exchange = ?config.exchange, dry_run = config.dry_run, "Starting arb-engine");

    let state = Arc::new(AppState::new(config.risk.clone().into()));
    let stats_recorder: Arc<dyn StatsRecorder> = Arc::new(InMemoryStatsRecorder::new());
    let position_manager = Arc::new(PositionManager::new(Arc::clone(&stats_recorder)));

    let risk_manager = RiskManager::new(Arc::clone(&state));

    let notifiers = Arc::new(build_notifier_registry(&config));
    info!(notifiers = notifiers.len(), "Notifiers initialized");

    let executor = build_executor(&config).await;

    let strategies = build_strategy_registry(&config);
    let Some(prepared) = startup::prepare_markets(&config, strategies).await? else {
        return Ok(());
    };

    let cache = Arc::new(BookCache::new());

    let mut data_stream =
        stream::create_connected_stream(&config, &prepared.token_ids, &notifiers, &cache).await?;
    info!("Listening for market events...");

    let mut reservation_sweep = interval(Duration::from_secs(5));

    loop {
        tokio::select! {
            result = shutdown.changed() => {
                match result {
                    Ok(_) => {
                        if *shutdown.borrow() {
                            info!("Shutdown signal received");
                            break;
                        }
                    }
                    Err(_) => {
                        info!("Shutdown channel closed");
                        break;
                    }
                }
            }
            _ = reservation_sweep.tick() => {
                let ttl = Duration::from_secs(state.risk_limits().reservation_ttl_secs);
                for market_id in state.sweep_stale_executions(ttl) {
                    warn!(
                        market_id = %market_id,
                        ttl_secs = ttl.as_secs(),
                        "Force-released execution lock past reservation TTL"
                    );
                    notifiers.notify_all(Event::HedgeTriggered(HedgeEvent::unresolved(
                        &market_id,
                        "execution lock exceeded reservation TTL and was force-released",
                    )));
                }
            }
            event = data_stream.next_event() => {
                let Some(event) = event else {
                    warn!("Market data stream ended");
                    break;
                };
                process_market_event(
                    event,
                    EventProcessingContext {
                        cache: cache.as_ref(),
                        registry: &prepared.registry,
                        strategies: prepared.strategies.as_ref(),
                        executor: executor.clone(),
                        risk_manager: &risk_manager,
                        notifiers: &notifiers,
                        state: &state,
                        stats: &stats_recorder,
                        position_manager: &position_manager,
                    },
                );
            }
        }
    }

    Ok(())
}
