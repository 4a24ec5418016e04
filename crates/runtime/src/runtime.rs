//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use battle_core::{AgilityMeter, AgilityTrack, BattleConfig, Encounter, EncounterState, PcgRng};

use crate::api::{AgilityView, NullPresenter, Presenter, Result, RuntimeError, RuntimeHandle};
use crate::events::{EventBus, RuntimeEvent};
use crate::workers::{BattleWorker, Command};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    /// Seed for every combat roll. Drawn from the OS when `None`.
    pub seed: Option<u64>,
    /// Period of the agility pointer. `None` leaves the meter to
    /// [`RuntimeHandle::advance_meter`].
    pub agility_tick: Option<Duration>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    /// One pointer step per frame at roughly 60 frames per second.
    pub const DEFAULT_AGILITY_TICK: Duration = Duration::from_millis(16);
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            seed: None,
            agility_tick: Some(Self::DEFAULT_AGILITY_TICK),
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates a battle session
///
/// Design: Runtime owns the worker and coordinates shutdown.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    seed: u64,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to runtime events
    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.handle.subscribe()
    }

    /// Seed the session's rolls were drawn from. Replaying it with the same
    /// actions and timing reproduces the session.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker to finish its current turn. Every cloned handle
    /// must be dropped first or this never returns.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<EncounterState>,
    presenter: Option<Arc<dyn Presenter>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            presenter: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the seed for reproducible sessions
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Provide initial encounter state (default: a fresh session)
    pub fn initial_state(mut self, state: EncounterState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the presenter (default: [`NullPresenter`])
    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Arc::new(presenter));
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let track = AgilityTrack::from_config(&self.config.battle)?;
        if self.config.agility_tick.is_some_and(|tick| tick.is_zero()) {
            return Err(RuntimeError::ZeroAgilityTick);
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let state = self.state.unwrap_or_default();
        info!(
            target: "battle_runtime",
            seed,
            round = state.round,
            "starting battle runtime"
        );

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let meter = AgilityMeter::new(track);
        let (agility_tx, agility_rx) = watch::channel(AgilityView::of(&meter));
        let handle = RuntimeHandle::new(command_tx, event_bus.clone(), agility_rx);

        let worker = BattleWorker::new(
            Encounter::with_state(state, PcgRng::from_seed(seed)),
            meter,
            self.config.agility_tick,
            self.presenter
                .unwrap_or_else(|| Arc::new(NullPresenter) as Arc<dyn Presenter>),
            command_rx,
            event_bus,
            agility_tx,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            seed,
            worker_handle,
        })
    }
}
