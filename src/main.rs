//! # Lot Calculator — Position Sizing for Forex & Gold
//!
//! ## Flow
//!
//! ```text
//!  stdin ──▶ Session ──▶ sizing::validate_*      (range checks)
//!               │    ──▶ instrument::pip_value    (static table)
//!               │    ──▶ sizing::calculate_lot_size
//!               │    ──▶ sizing::calculate_margin_required   (XAUUSD only)
//!               ▼
//!  stdout ◀── Quote | CalcError          stderr ◀── tracing
//! ```
//!
//! ## Environment Variables
//!
//! | Variable                        | Default               | Description                  |
//! |---------------------------------|-----------------------|------------------------------|
//! | `LOT_CALC_STRICT_MARGIN_INPUTS` | `false`               | Validate gold price/leverage |
//! | `RUST_LOG`                      | `lot_calculator=warn` | Tracing filter               |

use anyhow::Context;
use tokio::io::BufReader;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod engine;
mod error;
mod models;

use config::Config;
use engine::Session;

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional) ──────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging to stderr; stdout is the user transcript ──────
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("").add_directive("lot_calculator=warn".parse()?),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // ── 3. Config ────────────────────────────────────────────────────────────
    let config = Config::from_env().context("Failed to load config")?;
    debug!(?config, "config loaded");

    // ── 4. One interactive pass ──────────────────────────────────────────────
    let mut session = Session::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), config);
    session.run().await.context("Failed to write to stdout")?;

    Ok(())
}
