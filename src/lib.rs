//! Core library surface for the CoinMark collection tracker.
//!
//! The binary wires these pieces together at startup; integration tests and
//! any external tooling reuse the same store and importer.
pub mod config;
pub mod db;
pub mod importer;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence entry points used at startup.
pub use db::{ensure_schema, fetch_coins, open_in_memory};

/// Reference-data import and the one-shot seeding phase.
pub use importer::{seed_if_empty, BundledResources, DirectoryResources, SeedOutcome};

pub use config::Config;
pub use models::{Coin, ImportEntry};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
