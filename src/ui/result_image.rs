//! Segmentation image panel with zoom buttons and drag-to-pan.

use eframe::egui::{
    self, Color32, Pos2, Rect, RichText, Sense, TextureHandle, TextureOptions, Ui, Vec2, pos2,
};

use super::style;
use crate::trial::{ResultImage, TrialController, ViewportTransform};

const FRAME_HEIGHT: f32 = 360.0;

/// Texture uploaded for one results screen.
pub(super) struct ResultTexture {
    request_id: u64,
    handle: TextureHandle,
}

pub(super) fn render_result_image(
    ui: &mut Ui,
    controller: &mut TrialController,
    texture: &mut Option<ResultTexture>,
) {
    let palette = style::palette();
    ui.horizontal(|ui| {
        ui.label(RichText::new("Segmentation").strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Reset view").clicked() {
                controller.viewport_mut().reset();
            }
            if ui.button("−").on_hover_text("Zoom out").clicked() {
                controller.viewport_mut().zoom_out();
            }
            ui.label(format!("{:.0}%", controller.viewport().zoom() * 100.0));
            if ui.button("+").on_hover_text("Zoom in").clicked() {
                controller.viewport_mut().zoom_in();
            }
        });
    });
    ui.add_space(4.0);

    let width = ui.available_width();
    let (frame, response) =
        ui.allocate_exact_size(egui::vec2(width, FRAME_HEIGHT), Sense::click_and_drag());
    let painter = ui.painter_at(frame);
    painter.rect_filled(frame, 4.0, palette.bg_primary);

    let request_id = controller.result_request_id();
    let handle = match controller.result_image() {
        Some(ResultImage::Ready(image)) => {
            let stale = texture
                .as_ref()
                .is_none_or(|cached| Some(cached.request_id) != request_id);
            if stale && let Some(request_id) = request_id {
                let handle = ui.ctx().load_texture(
                    format!("segmentation_{request_id}"),
                    image.to_color_image(),
                    TextureOptions::LINEAR,
                );
                *texture = Some(ResultTexture { request_id, handle });
            }
            texture.as_ref().map(|cached| cached.handle.clone())
        }
        Some(ResultImage::Loading) => {
            painter.text(
                frame.center(),
                egui::Align2::CENTER_CENTER,
                "Loading image…",
                egui::FontId::proportional(14.0),
                palette.text_muted,
            );
            None
        }
        Some(ResultImage::Unavailable(reason)) => {
            painter.text(
                frame.center(),
                egui::Align2::CENTER_CENTER,
                reason,
                egui::FontId::proportional(14.0),
                palette.text_muted,
            );
            None
        }
        None => None,
    };

    let Some(handle) = handle else {
        return;
    };

    let viewport = controller.viewport_mut();
    if response.drag_started()
        && let Some(pointer) = response.interact_pointer_pos()
    {
        viewport.begin_drag(pointer);
    }
    if response.dragged()
        && let Some(pointer) = response.interact_pointer_pos()
    {
        viewport.drag_to(pointer);
    }
    if response.drag_stopped() {
        viewport.end_drag();
    }

    let rect = image_rect(frame, handle.size_vec2(), viewport);
    let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    painter.image(handle.id(), rect, uv, Color32::WHITE);
    if viewport.zoom() > 1.0 {
        response.on_hover_cursor(if viewport.is_dragging() {
            egui::CursorIcon::Grabbing
        } else {
            egui::CursorIcon::Grab
        });
    }
}

/// Screen rect of the image: fitted and centered in `frame`, scaled around
/// the center by the zoom, then shifted by the pan offset.
pub(super) fn image_rect(frame: Rect, image_size: Vec2, viewport: &ViewportTransform) -> Rect {
    let fit = if image_size.x > 0.0 && image_size.y > 0.0 {
        (frame.width() / image_size.x).min(frame.height() / image_size.y)
    } else {
        0.0
    };
    let size = image_size * fit * viewport.zoom();
    let center: Pos2 = frame.center() + viewport.offset() * viewport.zoom();
    Rect::from_center_size(center, size)
}
