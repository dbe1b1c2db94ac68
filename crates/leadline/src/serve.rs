// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadline serve` command implementation.
//!
//! Opens the SQLite store, runs pending migrations, and serves the HTTP
//! gateway until interrupted. Ctrl-C triggers a graceful shutdown that
//! checkpoints the WAL before exit.

use std::sync::Arc;

use leadline_config::model::LeadlineConfig;
use leadline_core::{LeadStore, LeadlineError, PluginAdapter};
use leadline_gateway::{GatewayState, ServerConfig, start_server};
use leadline_storage::SqliteLeadStore;
use tracing::info;

/// Runs the `leadline serve` command.
pub async fn run_serve(config: LeadlineConfig) -> Result<(), LeadlineError> {
    init_tracing(&config.app.log_level);

    info!("starting leadline serve");

    let store = Arc::new(SqliteLeadStore::new(config.storage.clone()));
    store.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let state = GatewayState::new(store.clone(), config.gateway.bearer_token.clone());
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    tokio::select! {
        res = start_server(&server_config, state) => res?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    store.shutdown().await?;
    info!("leadline stopped");
    Ok(())
}

/// Initialize the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence over the config file when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("leadline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
