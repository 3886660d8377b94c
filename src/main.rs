use tokio::signal;
use tracing::{error, info};

use arb_engine::infrastructure::config::settings::Config;
use arb_engine::infrastructure::orchestration::orchestrator::Orchestrator;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());

    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();

    info!("arb-engine starting");

    tokio::select! {
        result = Orchestrator::run(config) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("arb-engine stopped");
}
