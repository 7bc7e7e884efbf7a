//! Static Home and About pages.

use eframe::egui::{self, RichText, Ui};

use super::Page;
use super::style;

/// Returns the page the visitor asked to open, if any.
pub(super) fn render_home(ui: &mut Ui) -> Option<Page> {
    let palette = style::palette();
    let mut open = None;
    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        ui.label(
            RichText::new("AI-assisted lung nodule analysis")
                .size(30.0)
                .strong()
                .color(palette.text_primary),
        );
        ui.add_space(8.0);
        ui.label(
            RichText::new(
                "Upload a chest CT scan and get a malignancy estimate with a segmentation overlay.",
            )
            .color(palette.text_muted),
        );
        ui.add_space(20.0);
        ui.horizontal(|ui| {
            if ui.button(RichText::new("Try the demo").strong()).clicked() {
                open = Some(Page::Trial);
            }
            if ui.button("How it works").clicked() {
                open = Some(Page::About);
            }
        });
    });
    open
}

pub(super) fn render_about(ui: &mut Ui) {
    let muted = style::palette().text_muted;
    egui::ScrollArea::vertical()
        .id_salt("about_scroll")
        .show(ui, |ui| {
            ui.heading("Technology");
            ui.add_space(8.0);
            for (title, body) in [
                (
                    "3D U-Net segmentation",
                    "Locates the nodule in the scan volume and outlines it.",
                ),
                (
                    "Fuzzy classification",
                    "Expresses the estimate as degrees of membership in the benign, malignant and uncertain sets.",
                ),
                (
                    "Inference service",
                    "Scans are sent to the configured backend; nothing is analyzed on this machine.",
                ),
            ] {
                ui.label(RichText::new(title).strong());
                ui.label(RichText::new(body).color(muted));
                ui.add_space(10.0);
            }
            ui.label(
                RichText::new("Research demo only. Not a medical device.")
                    .small()
                    .color(muted),
            );
        });
}
