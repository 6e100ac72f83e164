//! Scenario server binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `scenario-config.yaml` (defaults if absent)
//! 2. Apply `SCENARIO_HOST` / `SCENARIO_PORT` overrides
//! 3. Initialize structured logging (tracing)
//! 4. Restore the stored document, if any
//! 5. Serve until `Ctrl-C`

use std::path::Path;

use scenario_core::config::{LoggingConfig, ServerSection};
use scenario_core::{ConfigError, StudioConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Configuration file, relative to the working directory.
const CONFIG_PATH: &str = "scenario-config.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, from_file) = load_config()?;
    apply_env_overrides(&mut config.server)?;

    init_tracing(&config.logging);

    info!(
        config_file = from_file,
        span_years = config.scenario.span_years,
        host = %config.server.host,
        port = config.server.port,
        store = ?config.server.store_path,
        "scenario-server starting"
    );

    scenario_server::run(&config).await?;
    Ok(())
}

/// Load configuration, falling back to defaults when the file is absent.
fn load_config() -> Result<(StudioConfig, bool), ConfigError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        Ok((StudioConfig::from_file(path)?, true))
    } else {
        Ok((StudioConfig::default(), false))
    }
}

fn apply_env_overrides(server: &mut ServerSection) -> Result<(), ConfigError> {
    if let Ok(host) = std::env::var("SCENARIO_HOST") {
        server.host = host;
    }
    if let Ok(port) = std::env::var("SCENARIO_PORT") {
        server.port = port.parse().map_err(|e| ConfigError::Invalid {
            field: "SCENARIO_PORT",
            reason: format!("{port:?} is not a port number: {e}"),
        })?;
    }
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
