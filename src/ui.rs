use eframe::egui::{self, Rect, Vec2};

/// Letterboxed placement of a stage image inside the viewport.
pub struct ImageMetrics {
    pub image_rect: Rect,
    pub image_size: Vec2,
    pub scale: f32,
}

impl ImageMetrics {
    pub fn new(viewport: Rect, image_size: Vec2) -> Self {
        let (display, scale) = fit_within(image_size, viewport.size());
        Self {
            image_rect: Rect::from_center_size(viewport.center(), display),
            image_size,
            scale,
        }
    }
}

pub fn fit_within(image_size: Vec2, available: Vec2) -> (Vec2, f32) {
    let safe_size = egui::vec2(image_size.x.max(1.0), image_size.y.max(1.0));
    let scale = (available.x / safe_size.x)
        .min(available.y / safe_size.y)
        .max(0.01);
    (safe_size * scale, scale)
}

pub struct KeyboardState {
    pub back: bool,
    pub forward: bool,
    pub quit: bool,
}
