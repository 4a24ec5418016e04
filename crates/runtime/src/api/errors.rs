//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and configuration so clients can
//! bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::ConfigError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("agility tick period must be greater than zero")]
    ZeroAgilityTick,

    #[error("invalid battle configuration")]
    Config(#[from] ConfigError),
}
