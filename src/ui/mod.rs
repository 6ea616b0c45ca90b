//! Ratatui front-end: a single coin list with a missing-only filter and an
//! in-place collected toggle.

mod app;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
