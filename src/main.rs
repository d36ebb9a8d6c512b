// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! RedactedHook service
//!
//! Listens for `POST /hook` from an automation client and answers with a
//! status code describing whether the torrent passes the configured filters:
//!
//! - 200: all active filters pass
//! - 226: ratio below the minimum
//! - 227: uploader not allowed
//! - 228: record label not allowed
//! - 229: size outside the requested range
//! - 400: bad request, 500: tracker or configuration failure
//!
//! ## Configuration
//!
//! Settings are read from a TOML file (see `--config`) and can be overridden
//! with `REDACTEDHOOK__*` environment variables, e.g. `REDACTEDHOOK__RED_APIKEY`,
//! `REDACTEDHOOK__PORT` or `REDACTEDHOOK__MINRATIO`. The file is re-read when
//! it changes; listener address and log level need a restart.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use redactedhook::{
    client::TrackerClient,
    config::{self, Config, ConfigHolder},
    evaluator::Evaluator,
    handlers::{router, AppState},
    limiter::RateLimiter,
};

#[derive(Parser)]
#[command(name = "redactedhook", about = "Torrent filter webhook for redacted and ops", version)]
struct Args {
    /// Path to the TOML config file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// How often to check the config file for changes
    #[arg(long, default_value_t = 5)]
    reload_interval_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.logs.loglevel))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        config = %args.config.display(),
        host = %config.server.host,
        port = config.server.port,
        "Starting RedactedHook"
    );

    let bind = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let limiter = Arc::new(RateLimiter::default());
    let client = TrackerClient::new(limiter)?;
    let holder = Arc::new(ConfigHolder::new(config));

    let state = Arc::new(AppState {
        evaluator: Evaluator::new(Arc::new(client)),
        config: holder.clone(),
    });

    // Spawn config reload task
    tokio::spawn(config::watch(
        holder,
        args.config.clone(),
        Duration::from_secs(args.reload_interval_secs.max(1)),
    ));

    // Start server
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "Server listening");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
