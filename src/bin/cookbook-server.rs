// ABOUTME: Server binary for the cookbook HTTP API
// ABOUTME: Loads configuration, prepares the database and serves until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! # Cookbook Server Binary
//!
//! Configuration comes from the environment; `--http-port` and
//! `--database-url` override the matching variables.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cookbook_server::{
    config::environment::{DatabaseUrl, ServerConfig},
    logging,
    resources::ServerResources,
    server,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "cookbook-server")]
#[command(about = "Cookbook - recipe sharing API server")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (e.g. `sqlite:./data/cookbook.db`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = DatabaseUrl::parse_url(&database_url)?;
    }
    config.validate()?;

    info!("Starting cookbook server");
    info!("{}", config.summary());

    let resources = ServerResources::from_config(config).await?;
    resources.database.migrate().await?;
    info!("Database ready: {}", resources.config.database_url);

    if let Err(e) = server::run(Arc::new(resources)).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
