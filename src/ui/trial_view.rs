//! Trial page: one screen per view state.

use eframe::egui::{self, Frame, Margin, ProgressBar, RichText, Ui};

use super::result_image::{self, ResultTexture};
use super::style;
use crate::analysis::AnalysisResult;
use crate::trial::state::ACCEPTED_EXTENSIONS;
use crate::trial::{TrialController, ViewState};

pub(super) fn render_trial(
    ui: &mut Ui,
    controller: &mut TrialController,
    texture: &mut Option<ResultTexture>,
) {
    render_notice(ui, controller);
    match controller.view_state() {
        ViewState::Upload => render_upload(ui, controller),
        ViewState::Preview => render_preview(ui, controller),
        ViewState::Analyzing => render_analyzing(ui, controller),
        ViewState::Results => render_results(ui, controller, texture),
    }
}

fn card<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    Frame::new()
        .fill(style::palette().bg_tertiary)
        .stroke(style::card_stroke())
        .corner_radius(6)
        .inner_margin(Margin::same(12))
        .show(ui, add_contents)
        .inner
}

fn render_notice(ui: &mut Ui, controller: &mut TrialController) {
    let Some(notice) = controller.notice() else {
        return;
    };
    let color = style::notice_color(notice.tone);
    let text = notice.text.clone();
    let mut dismissed = false;
    Frame::new()
        .fill(color.gamma_multiply(0.15))
        .stroke(egui::Stroke::new(1.0, color))
        .corner_radius(4)
        .inner_margin(Margin::same(8))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(text).color(color));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    dismissed = ui.small_button("✕").clicked();
                });
            });
        });
    if dismissed {
        controller.dismiss_notice();
    }
    ui.add_space(8.0);
}

fn render_upload(ui: &mut Ui, controller: &mut TrialController) {
    let palette = style::palette();
    card(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.heading("Upload a CT scan");
            ui.label(
                RichText::new(format!("Accepted: {}", hint_list())).color(palette.text_muted),
            );
            ui.add_space(12.0);
            if ui.button(RichText::new("Choose file…").size(16.0)).clicked() {
                controller.select_file_via_dialog();
            }
            ui.add_space(24.0);
        });
    });
}

fn hint_list() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_preview(ui: &mut Ui, controller: &mut TrialController) {
    let Some(file) = controller.selected_file().cloned() else {
        return;
    };
    let palette = style::palette();
    let mut analyze = false;
    let mut change = false;
    card(ui, |ui| {
        ui.heading("Ready to analyze");
        ui.add_space(8.0);
        egui::Grid::new("trial_preview_grid")
            .num_columns(2)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                ui.label(RichText::new("File").color(palette.text_muted));
                ui.label(&file.name);
                ui.end_row();
                ui.label(RichText::new("Size").color(palette.text_muted));
                ui.label(format!("{:.2} MB", file.size_mb()));
                ui.end_row();
                ui.label(RichText::new("Type").color(palette.text_muted));
                ui.label(file.type_label());
                ui.end_row();
            });
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            analyze = ui.button(RichText::new("Analyze scan").strong()).clicked();
            change = ui.button("Choose another file").clicked();
        });
    });
    if analyze && let Err(err) = controller.start_analysis() {
        tracing::warn!("{err}");
    }
    if change {
        controller.select_file_via_dialog();
    }
}

fn render_analyzing(ui: &mut Ui, controller: &TrialController) {
    let percent = controller.progress_percent().unwrap_or(0);
    let name = controller
        .selected_file()
        .map(|file| file.name.clone())
        .unwrap_or_default();
    card(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(16.0);
            ui.heading("Analyzing…");
            ui.label(RichText::new(name).color(style::palette().text_muted));
            ui.add_space(12.0);
            ui.add(
                ProgressBar::new(f32::from(percent) / 100.0)
                    .desired_width(320.0)
                    .text(format!("{percent}%")),
            );
            ui.add_space(16.0);
        });
    });
}

fn render_results(
    ui: &mut Ui,
    controller: &mut TrialController,
    texture: &mut Option<ResultTexture>,
) {
    let Some(result) = controller.result().cloned() else {
        return;
    };
    let mut another = false;
    egui::ScrollArea::vertical()
        .id_salt("trial_results_scroll")
        .show(ui, |ui| {
            render_classification(ui, &result);
            ui.add_space(12.0);
            card(ui, |ui| result_image::render_result_image(ui, controller, texture));
            ui.add_space(12.0);
            ui.columns(2, |columns| {
                card(&mut columns[0], |ui| render_segmentation(ui, &result));
                card(&mut columns[1], |ui| render_clinical(ui, &result));
            });
            ui.add_space(12.0);
            card(ui, |ui| render_fuzzy(ui, &result));
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                ui.add_enabled(false, egui::Button::new("Export report"))
                    .on_disabled_hover_text("Not available in the trial");
                another = ui.button("Analyze another scan").clicked();
            });
        });
    if another {
        controller.reset();
        *texture = None;
    }
}

fn render_classification(ui: &mut Ui, result: &AnalysisResult) {
    let classification = &result.classification;
    let color = style::prediction_color(classification.prediction);
    card(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(classification.prediction.label())
                    .size(26.0)
                    .strong()
                    .color(color),
            );
            ui.add_space(16.0);
            metric(ui, "Confidence", percent(classification.confidence));
            metric(ui, "Risk score", percent(classification.risk_score));
            metric(ui, "Uncertainty", percent(classification.uncertainty));
        });
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).small().color(style::palette().text_muted));
        ui.label(RichText::new(value).strong());
    });
    ui.add_space(12.0);
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn render_segmentation(ui: &mut Ui, result: &AnalysisResult) {
    let segmentation = &result.segmentation;
    ui.label(RichText::new("3D U-Net segmentation").strong());
    ui.add_space(6.0);
    key_value_grid(
        ui,
        "trial_segmentation_grid",
        &[
            ("Volume", segmentation.nodule_volume.clone()),
            ("Diameter", segmentation.diameter.clone()),
            ("Density", segmentation.density.clone()),
            (
                "Shape irregularity",
                format!("{:.2}", segmentation.shape_irregularity),
            ),
            ("U-Net confidence", percent(segmentation.unet_confidence)),
        ],
    );
}

fn render_clinical(ui: &mut Ui, result: &AnalysisResult) {
    let clinical = &result.clinical;
    ui.label(RichText::new("Clinical insights").strong());
    ui.add_space(6.0);
    key_value_grid(
        ui,
        "trial_clinical_grid",
        &[
            ("Stage", clinical.stage_prediction.clone()),
            ("Metastasis risk", clinical.metastasis_risk.clone()),
            ("Growth velocity", clinical.growth_velocity.clone()),
            ("Recommended action", clinical.recommended_action.clone()),
        ],
    );
}

fn key_value_grid(ui: &mut Ui, id: &str, rows: &[(&str, String)]) {
    let muted = style::palette().text_muted;
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([16.0, 4.0])
        .show(ui, |ui| {
            for (label, value) in rows {
                ui.label(RichText::new(*label).color(muted));
                ui.label(value);
                ui.end_row();
            }
        });
}

fn render_fuzzy(ui: &mut Ui, result: &AnalysisResult) {
    let fuzzy = &result.fuzzy_analysis;
    ui.label(RichText::new("Fuzzy membership").strong());
    ui.add_space(6.0);
    for (label, score) in fuzzy.membership_scores.entries() {
        ui.horizontal(|ui| {
            ui.add_sized([90.0, 18.0], egui::Label::new(capitalize(label)));
            ui.add(
                ProgressBar::new(score.clamp(0.0, 1.0) as f32)
                    .fill(style::membership_color(label))
                    .desired_width(260.0)
                    .text(percent(score)),
            );
        });
    }
    ui.add_space(8.0);
    ui.label(RichText::new("Risk factors").strong());
    if fuzzy.risk_factors.is_empty() {
        ui.label(RichText::new("None reported").color(style::palette().text_muted));
    }
    for factor in &fuzzy.risk_factors {
        ui.label(format!(
            "{}: {} (weight {:.2})",
            factor.factor,
            percent(factor.score),
            factor.weight
        ));
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
