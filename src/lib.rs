//! Library exports for the desktop app, the CLI and integration tests.
/// Inference backend adapter.
pub mod analysis;
/// Per-user application directories.
pub mod app_dirs;
/// Persisted settings.
pub mod config;
mod http_client;
/// Log setup.
pub mod logging;
/// Trial flow state machine.
pub mod trial;
/// egui front end.
pub mod ui;
