//! egui front end: navigation chrome around the trial flow.

mod pages;
mod result_image;
pub mod style;
mod trial_view;

use eframe::egui::{self, Frame, Margin, RichText};

use crate::trial::TrialController;
use crate::trial::progress::STEP_INTERVAL;
use result_image::ResultTexture;

/// Smallest window size the layout supports.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(860.0, 620.0);

/// Top-level pages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Home,
    About,
    Trial,
}

impl Page {
    fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "Technology",
            Self::Trial => "Trial",
        }
    }
}

/// Renders the app and owns the trial controller.
pub struct CancernaApp {
    page: Page,
    trial: TrialController,
    result_texture: Option<ResultTexture>,
    visuals_set: bool,
}

impl CancernaApp {
    pub fn new(trial: TrialController) -> Self {
        Self {
            page: Page::Home,
            trial,
            result_texture: None,
            visuals_set: false,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn trial(&self) -> &TrialController {
        &self.trial
    }

    /// Switch pages. Entering the trial always starts a fresh session.
    pub fn open_page(&mut self, page: Page) {
        if page == Page::Trial {
            self.trial.reset();
            self.result_texture = None;
        }
        tracing::debug!("Opening {:?} page", page);
        self.page = page;
    }

    /// Select the first dropped file while the trial page is open.
    pub fn handle_dropped_files(&mut self, files: &[egui::DroppedFile]) {
        if self.page != Page::Trial {
            return;
        }
        let Some(path) = files.iter().find_map(|file| file.path.as_deref()) else {
            return;
        };
        self.trial.select_path(path);
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        let mut open = None;
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .inner_margin(Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Cancerna")
                            .size(18.0)
                            .strong()
                            .color(palette.accent),
                    );
                    ui.add_space(16.0);
                    for page in [Page::Home, Page::About, Page::Trial] {
                        if ui
                            .selectable_label(self.page == page, page.title())
                            .clicked()
                        {
                            open = Some(page);
                        }
                    }
                });
            });
        if let Some(page) = open {
            self.open_page(page);
        }
    }
}

impl eframe::App for CancernaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.trial.poll_jobs();
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        self.handle_dropped_files(&dropped);
        self.render_top_bar(ctx);
        egui::CentralPanel::default()
            .frame(
                Frame::new()
                    .fill(style::palette().bg_secondary)
                    .inner_margin(Margin::same(16)),
            )
            .show(ctx, |ui| match self.page {
                Page::Home => {
                    if let Some(page) = pages::render_home(ui) {
                        self.open_page(page);
                    }
                }
                Page::About => pages::render_about(ui),
                Page::Trial => {
                    trial_view::render_trial(ui, &mut self.trial, &mut self.result_texture)
                }
            });
        if self.trial.has_pending_jobs() {
            ctx.request_repaint_after(STEP_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppSettings;
    use crate::trial::ViewState;

    fn app() -> CancernaApp {
        CancernaApp::new(TrialController::from_settings(&AppSettings::default()).unwrap())
    }

    fn dropped(path: std::path::PathBuf) -> egui::DroppedFile {
        egui::DroppedFile {
            path: Some(path),
            ..Default::default()
        }
    }

    #[test]
    fn dropped_scan_is_previewed_on_trial_page() {
        let dir = tempfile::tempdir().unwrap();
        let scan = dir.path().join("dropped.dcm");
        std::fs::write(&scan, b"DICM").unwrap();
        let mut app = app();
        app.open_page(Page::Trial);
        app.handle_dropped_files(&[egui::DroppedFile::default(), dropped(scan)]);
        assert_eq!(app.trial().view_state(), ViewState::Preview);
        assert_eq!(app.trial().selected_file().unwrap().name, "dropped.dcm");
    }

    #[test]
    fn drops_outside_trial_page_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let scan = dir.path().join("dropped.png");
        std::fs::write(&scan, b"PNG").unwrap();
        let mut app = app();
        app.handle_dropped_files(&[dropped(scan)]);
        assert_eq!(app.page(), Page::Home);
        assert_eq!(app.trial().view_state(), ViewState::Upload);
    }
}
