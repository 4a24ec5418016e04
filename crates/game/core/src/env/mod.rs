//! External inputs the rules depend on.
//!
//! The encounter reads nothing from the outside world except randomness,
//! which is injected through [`RandomSource`].
mod rng;

pub use rng::{PcgRng, RandomSource, ScriptedRng};
