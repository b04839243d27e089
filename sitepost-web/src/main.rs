// Sitepost - A content publishing API for Hugo sites
// Copyright (C) 2025 Sitepost Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.


use anyhow::{Context, Result};
use axum::{extract::Request, ServiceExt};
use clap::Parser;
use sitepost_web::{configuration::defaults, routes, state::AppState, Configuration};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Content publishing API for Hugo sites
#[derive(Debug, Parser)]
#[command(name = "sitepost", version, about)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value_t = defaults::default_config_file())]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitepost_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Configuration::load(&cli.config)?;
    info!("Starting Sitepost server");

    // Create application state
    let bind_addr = config.bind_addr();
    let state = AppState::new(config)?;

    // Ensure content directory exists
    state
        .store
        .ensure_root()
        .context("Failed to prepare content folder")?;
    info!(
        "The folder {:?} will be used for content",
        state.store.root().display().to_string()
    );

    // Create router
    let app = routes::create_app(state);

    // Start server
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
