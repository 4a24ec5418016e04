//! Boss battle client binary.
//!
//! # Examples
//!
//! ```bash
//! # Interactive terminal UI
//! cargo run -p battle-client
//!
//! # Replay a session headless for 300 turns
//! BATTLE_SEED=42 BATTLE_AUTOPLAY=300 cargo run -p battle-client
//! ```

use anyhow::Result;
use battle_client::{app, autoplay, config::ClientConfig, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();

    // 2. Setup logging (stderr only when no TUI owns the terminal)
    let _logging = logging::setup_logging(config.session_id.as_deref(), config.is_headless())?;

    tracing::info!("Starting boss battle client");
    tracing::info!("Seed: {:?}", config.seed);
    tracing::debug!(?config, "client configuration");

    // 3. Run the selected frontend
    match config.autoplay_turns {
        Some(turns) => autoplay::run(&config, turns).await?,
        None => app::run(&config).await?,
    }

    tracing::info!("Client shutdown complete");
    Ok(())
}
