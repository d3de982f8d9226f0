// ABOUTME: Server binary for the Tasty Treats recipe sharing API
// ABOUTME: Loads configuration, opens the database, and serves HTTP until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

//! # Tasty Treats API Server Binary
//!
//! Configuration comes from the environment (`HOST`, `HTTP_PORT`,
//! `DATABASE_URL`, `JWT_SECRET`, ...). Command line flags override the
//! port and database location.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tasty_treats_server::config::{DatabaseUrl, ServerConfig};
use tasty_treats_server::database::Database;
use tasty_treats_server::logging;
use tasty_treats_server::resources::ServerResources;
use tasty_treats_server::server::TastyTreatsServer;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tasty-treats-server")]
#[command(about = "Tasty Treats API - share recipes, comment, like, and follow")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override database URL (`sqlite:path` or `sqlite::memory:`)
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
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&url)?;
    }
    config.validate()?;

    info!("Starting Tasty Treats API");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url, config.database.max_connections).await?;
    info!("Database initialized: {}", config.database.url);

    let resources = Arc::new(ServerResources::new(database, Arc::new(config)));
    let server = TastyTreatsServer::new(resources);

    if let Err(e) = server.run().await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
