// ABOUTME: Server binary for the Startup Mentor streaming agent
// ABOUTME: Loads environment config, starts the sweeper, and serves the chat API until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

//! # Startup Mentor Server Binary
//!
//! Starts the HTTP API that accepts chat turns and streams mentor runs over SSE.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use startup_mentor::{
    config::ServerConfig,
    logging,
    resources::ServerResources,
    server::{self, shutdown_signal},
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "startup-mentor-server")]
#[command(about = "Startup Mentor - token-gated SSE streaming of mentor agent runs")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env();
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    info!("Starting Startup Mentor server");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::new(config)?);
    let sweeper = resources.spawn_sweeper();

    let outcome = server::serve(Arc::clone(&resources), shutdown_signal()).await;

    sweeper.shutdown().await;
    if let Err(e) = outcome {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}
