//! Pan and zoom state for the segmentation image.

use egui::{Pos2, Vec2};

/// Smallest zoom factor; the image fits its frame.
pub const MIN_ZOOM: f32 = 1.0;
/// Largest zoom factor.
pub const MAX_ZOOM: f32 = 3.0;
/// Zoom change per button press.
pub const ZOOM_STEP: f32 = 0.2;
/// Pan allowance per unit of zoom above 1, in points along each axis.
pub const PAN_LIMIT_PER_ZOOM: f32 = 100.0;

/// Current zoom and pan of the result image.
///
/// `offset` never exceeds `(zoom - 1) * 100` on either axis, so at zoom 1
/// the image cannot move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    zoom: f32,
    offset: Vec2,
    drag_anchor: Option<Pos2>,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            zoom: MIN_ZOOM,
            offset: Vec2::ZERO,
            drag_anchor: None,
        }
    }
}

impl ViewportTransform {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Largest allowed `|offset|` per axis at the current zoom.
    pub fn pan_limit(&self) -> f32 {
        (self.zoom - MIN_ZOOM) * PAN_LIMIT_PER_ZOOM
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn begin_drag(&mut self, pointer: Pos2) {
        self.drag_anchor = Some(pointer - self.offset);
    }

    /// Follow the pointer while a drag is active; ignored otherwise.
    pub fn drag_to(&mut self, pointer: Pos2) {
        let Some(anchor) = self.drag_anchor else {
            return;
        };
        self.offset = self.clamp_offset(pointer - anchor);
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Back to zoom 1 with no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn set_zoom(&mut self, zoom: f32) {
        // Snap to tenths so repeated steps land exactly on the bounds.
        let snapped = (zoom * 10.0).round() / 10.0;
        self.zoom = snapped.clamp(MIN_ZOOM, MAX_ZOOM);
        self.offset = self.clamp_offset(self.offset);
    }

    fn clamp_offset(&self, offset: Vec2) -> Vec2 {
        let limit = self.pan_limit();
        Vec2::new(offset.x.clamp(-limit, limit), offset.y.clamp(-limit, limit))
    }
}
