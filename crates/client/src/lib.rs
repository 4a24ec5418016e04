//! Terminal client for the boss battle.
//!
//! The binary is the composition root: it loads [`config::ClientConfig`],
//! installs logging, builds a [`battle_runtime::Runtime`] with a presenter, and
//! hands control either to the ratatui frontend ([`app`]) or to the headless
//! [`autoplay`] driver.
pub mod app;
pub mod autoplay;
pub mod config;
pub mod input;
pub mod logging;
pub mod message;
pub mod presentation;
