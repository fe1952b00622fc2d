//! Experience Ecuador edge server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                 ┌──────────────────────────────────────────┐
//!     ───────────────────────▶│  ee-edge (axum)                          │
//!                             │   request-id → trace → timeout → limit   │
//!                             │        │                                 │
//!                             │        ▼                                 │
//!                             │   /api/health            /api/weather ───┼──▶ Open-Meteo
//!                             │   /api/onboarding-config /api/regions-…  │      (cached)
//!                             │   /api/turnstile-verify ─────────────────┼──▶ Turnstile
//!                             │   /api/contact-submit ───┬───────────────┼──▶ Turnstile
//!                             │                          └───────────────┼──▶ Apps Script
//!                             │                                          │
//!                             │   config (TOML, hot reload) · env secrets│
//!                             └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use experience_ecuador::config::EdgeEnv;
use experience_ecuador::lifecycle::{load_site_config, run};
use experience_ecuador::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "ee-edge")]
#[command(about = "Edge API server for the Experience Ecuador site", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_site_config(cli.config.as_deref())?;
    init_logging(&config.observability.log_level);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ee-edge starting");

    run(config, cli.config.as_deref(), EdgeEnv::from_env()).await?;
    Ok(())
}
