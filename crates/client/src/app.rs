//! Interactive session: runtime plus ratatui frontend.
use anyhow::Result;
use battle_core::AgilityTrack;
use battle_runtime::Runtime;

use crate::config::ClientConfig;
use crate::message::MessageLog;
use crate::presentation::{
    TerminalPresenter, ViewState,
    event_loop::EventLoop,
    terminal::{self, TerminalGuard},
};

pub async fn run(config: &ClientConfig) -> Result<()> {
    let pacing = config.pacing();
    let track = AgilityTrack::from_config(&config.battle_config())?;

    // 1. Build Runtime with the terminal presenter
    let (presenter, cue_rx) = TerminalPresenter::new(pacing);
    let runtime = Runtime::builder()
        .config(config.runtime_config())
        .presenter(presenter)
        .build()
        .await?;
    let seed = runtime.seed();
    tracing::info!(seed, "Runtime built successfully");

    let mut messages = MessageLog::new(config.message_capacity);
    messages.push_text(format!("A monster appears! (seed {seed})"));

    // 2. Hand the terminal to the event loop
    let event_loop = EventLoop::new(
        runtime.handle(),
        cue_rx,
        track,
        seed,
        ViewState::new(pacing),
        messages,
    );
    let result = {
        let mut terminal = terminal::init()?;
        let _guard = TerminalGuard;
        event_loop.run(&mut terminal).await
    };

    // 3. Let the turn in flight finish, then stop the worker
    runtime.shutdown().await?;
    println!("Session seed: {seed}");

    result
}
