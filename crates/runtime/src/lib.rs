//! Runtime orchestration for a boss battle session.
//!
//! This crate wraps the synchronous [`battle_core::Encounter`] in a single
//! worker task, drives the agility meter on a timer, and forwards every battle
//! outcome to an async [`Presenter`] that can take as long as it likes to show
//! it. Consumers embed [`Runtime`] and talk to it through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] broadcasts runtime events to observers
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    ActOutcome, AgilityView, BattleSnapshot, NullPresenter, Presenter, Result, RuntimeError,
    RuntimeHandle,
};
pub use events::{EventBus, RuntimeEvent};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
