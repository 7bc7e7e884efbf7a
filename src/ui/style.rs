use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use crate::analysis::result::Prediction;
use crate::trial::NoticeTone;

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub benign: Color32,
    pub malignant: Color32,
    pub uncertain: Color32,
    pub warning: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(8, 12, 20),
        bg_secondary: Color32::from_rgb(17, 24, 39),
        bg_tertiary: Color32::from_rgb(31, 41, 55),
        panel_outline: Color32::from_rgb(45, 55, 72),
        text_primary: Color32::from_rgb(226, 232, 240),
        text_muted: Color32::from_rgb(148, 163, 184),
        accent: Color32::from_rgb(56, 189, 248),
        benign: Color32::from_rgb(74, 222, 128),
        malignant: Color32::from_rgb(248, 113, 113),
        uncertain: Color32::from_rgb(250, 204, 21),
        warning: Color32::from_rgb(251, 146, 60),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_tertiary;
    visuals.error_fg_color = palette.malignant;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.accent.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_rounded(&mut visuals.widgets.inactive, palette);
    set_rounded(&mut visuals.widgets.hovered, palette);
    set_rounded(&mut visuals.widgets.active, palette);
    set_rounded(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::same(6);
    visuals.popup_shadow = Shadow::NONE;
}

fn set_rounded(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::same(4);
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.bg_tertiary;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

pub fn prediction_color(prediction: Prediction) -> Color32 {
    let palette = palette();
    match prediction {
        Prediction::Benign => palette.benign,
        Prediction::Malignant => palette.malignant,
    }
}

pub fn membership_color(label: &str) -> Color32 {
    let palette = palette();
    match label {
        "benign" => palette.benign,
        "malignant" => palette.malignant,
        _ => palette.uncertain,
    }
}

pub fn notice_color(tone: NoticeTone) -> Color32 {
    let palette = palette();
    match tone {
        NoticeTone::Info => palette.accent,
        NoticeTone::Error => palette.malignant,
    }
}

pub fn card_stroke() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}
