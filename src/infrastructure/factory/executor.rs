//! Executor factory for trade execution.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::dry_run::DryRunExecutor;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::exchange::factory::ExchangeFactory;
use crate::port::outbound::exchange::ArbitrageExecutor;

/// Initialize the executor. Dry-run mode always gets a simulator; otherwise
/// the executor is wired to the live exchange if a wallet is configured.
pub async fn build_executor(
    config: &Config,
) -> Option<Arc<dyn ArbitrageExecutor + Send + Sync>> {
    if config.dry_run {
        info!(
            fill_latency_ms = config.dry_run_fill_latency_ms,
            "Dry-run mode - using simulated executor"
        );
        return Some(Arc::new(DryRunExecutor::new(config.dry_run_fill_latency_ms)));
    }

    match ExchangeFactory::create_arbitrage_executor(config).await {
        Ok(Some(exec)) => {
            info!("Executor initialized - trading ENABLED");
            Some(exec)
        }
        Ok(None) => {
            info!("No wallet configured - detection only mode");
            None
        }
        Err(e) => {
            warn!(error = %e, "Failed to initialize executor - detection only");
            None
        }
    }
}
