//! Entry point for the egui-based Cancerna trial app.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use cancerna::config::{self, AppSettings};
use cancerna::logging;
use cancerna::trial::TrialController;
use cancerna::ui::{CancernaApp, MIN_VIEWPORT_SIZE};
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let settings = load_settings();
    let controller = TrialController::from_settings(&settings).or_else(|err| {
        tracing::warn!("{err}; using the default backend");
        TrialController::from_settings(&AppSettings::default())
    })?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_min_inner_size(MIN_VIEWPORT_SIZE)
            .with_inner_size([1100.0, 800.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Cancerna Lab",
        native_options,
        Box::new(move |_cc| Ok(Box::new(CancernaApp::new(controller)))),
    )?;
    Ok(())
}

fn load_settings() -> AppSettings {
    if let Err(err) = config::ensure_config_file() {
        tracing::warn!("Could not write default config: {err}");
    }
    match config::load_or_default() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("Failed to load config, using defaults: {err}");
            AppSettings::default()
        }
    }
}
