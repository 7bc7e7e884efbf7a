//! The trial flow: pick a scan, preview it, analyze it, inspect the result.

mod controller;
pub mod image;
mod jobs;
pub mod progress;
pub mod state;
pub mod viewport;

pub use controller::{TrialController, TrialError};
pub use state::{NoticeTone, ResultImage, SelectedFile, TrialNotice, ViewState};
pub use viewport::ViewportTransform;
