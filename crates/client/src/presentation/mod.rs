//! Terminal presentation: the runtime presenter, view state, and rendering.
pub mod event_loop;
pub mod presenter;
pub mod terminal;
pub mod theme;
pub mod ui;
pub mod view;

pub use presenter::{Cue, Pacing, TerminalPresenter};
pub use view::ViewState;
