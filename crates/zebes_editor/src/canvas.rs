//! A pannable, zoomable drawing surface in world coordinates.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Response, Sense, Stroke};
use zebes_core::camera::Camera;
use zebes_core::vec::Vec2;

pub const RULER_THICKNESS: f32 = 20.0;
pub const CANVAS_MIN_ZOOM: f64 = 0.1;
pub const CANVAS_MAX_ZOOM: f64 = 10.0;
const WHEEL_ZOOM_STEP: f64 = 0.1;
const BASE_GRID_STEP: f64 = 50.0;

const GRID_COLOR: Color32 = Color32::from_rgb(60, 60, 60);
const RULER_BG: Color32 = Color32::from_rgb(35, 35, 35);
const RULER_TEXT: Color32 = Color32::from_rgb(180, 180, 180);

/// Grid spacing in screen pixels, kept between 50 and 150 by doubling or
/// halving as the zoom changes.
pub fn grid_step(zoom: f64) -> f64 {
    let mut step = BASE_GRID_STEP * zoom;
    if step <= 0.0 || !step.is_finite() {
        return BASE_GRID_STEP;
    }
    while step < 50.0 {
        step *= 2.0;
    }
    while step > 150.0 {
        step /= 2.0;
    }
    step
}

/// New zoom after one wheel notch in the direction of `scroll_y`.
pub fn wheel_zoom(zoom: f64, scroll_y: f32) -> f64 {
    let next = if scroll_y > 0.0 {
        zoom + WHEEL_ZOOM_STEP
    } else if scroll_y < 0.0 {
        zoom - WHEEL_ZOOM_STEP
    } else {
        zoom
    };
    next.clamp(CANVAS_MIN_ZOOM, CANVAS_MAX_ZOOM)
}

pub struct Canvas {
    pub camera: Camera,
    rect: Rect,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            camera: Camera::default(),
            rect: Rect::NOTHING,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Claim the remaining space of `ui` and sync the camera viewport to it.
    pub fn begin(&mut self, ui: &mut egui::Ui) -> (Response, Painter) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        self.rect = response.rect;
        self.camera.viewport = (self.rect.width() as f64, self.rect.height() as f64);
        painter.rect_filled(self.rect, 0.0, Color32::from_rgb(25, 25, 30));
        (response, painter)
    }

    /// Wheel zoom around the pointer and middle-drag pan.
    pub fn handle_navigation(&mut self, ui: &egui::Ui, response: &Response) {
        if response.hovered() {
            let scroll_y = ui.input(|i| i.raw_scroll_delta.y);
            if scroll_y != 0.0 {
                let anchor = response
                    .hover_pos()
                    .map(|p| p - self.rect.min)
                    .unwrap_or_else(|| self.rect.size() * 0.5);
                let zoom = wheel_zoom(self.camera.zoom, scroll_y);
                self.camera
                    .zoom_at(Vec2::new(anchor.x as f64, anchor.y as f64), zoom);
            }
        }
        if response.dragged_by(egui::PointerButton::Middle) {
            let delta = response.drag_delta();
            self.camera.pan_pixels(delta.x as f64, delta.y as f64);
        }
    }

    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        let local = self.camera.world_to_screen(world);
        self.rect.min + egui::vec2(local.x as f32, local.y as f32)
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        let local = screen - self.rect.min;
        self.camera
            .screen_to_world(Vec2::new(local.x as f64, local.y as f64))
    }

    pub fn world_rect(&self, min: Vec2, max: Vec2) -> Rect {
        Rect::from_two_pos(self.world_to_screen(min), self.world_to_screen(max))
    }

    pub fn draw_grid(&self, painter: &Painter) {
        let step = grid_step(self.camera.zoom) as f32;
        let stroke = Stroke::new(1.0, GRID_COLOR);
        let origin = self.world_to_screen(Vec2::ZERO);

        let first_x = self.rect.left() + (origin.x - self.rect.left()).rem_euclid(step);
        let mut x = first_x;
        while x < self.rect.right() {
            painter.line_segment(
                [Pos2::new(x, self.rect.top()), Pos2::new(x, self.rect.bottom())],
                stroke,
            );
            x += step;
        }
        let first_y = self.rect.top() + (origin.y - self.rect.top()).rem_euclid(step);
        let mut y = first_y;
        while y < self.rect.bottom() {
            painter.line_segment(
                [Pos2::new(self.rect.left(), y), Pos2::new(self.rect.right(), y)],
                stroke,
            );
            y += step;
        }

        self.draw_rulers(painter, first_x, first_y, step);
    }

    fn draw_rulers(&self, painter: &Painter, first_x: f32, first_y: f32, step: f32) {
        let top = Rect::from_min_max(
            self.rect.min,
            Pos2::new(self.rect.right(), self.rect.top() + RULER_THICKNESS),
        );
        let left = Rect::from_min_max(
            self.rect.min,
            Pos2::new(self.rect.left() + RULER_THICKNESS, self.rect.bottom()),
        );
        painter.rect_filled(top, 0.0, RULER_BG);
        painter.rect_filled(left, 0.0, RULER_BG);
        let font = FontId::monospace(9.0);

        let mut x = first_x;
        while x < self.rect.right() {
            if x > left.right() {
                let world = self.screen_to_world(Pos2::new(x, top.top()));
                painter.text(
                    Pos2::new(x + 2.0, top.top() + 2.0),
                    Align2::LEFT_TOP,
                    format!("{:.0}", world.x),
                    font.clone(),
                    RULER_TEXT,
                );
            }
            x += step;
        }
        let mut y = first_y;
        while y < self.rect.bottom() {
            if y > top.bottom() {
                let world = self.screen_to_world(Pos2::new(left.left(), y));
                painter.text(
                    Pos2::new(left.left() + 2.0, y + 2.0),
                    Align2::LEFT_TOP,
                    format!("{:.0}", world.y),
                    font.clone(),
                    RULER_TEXT,
                );
            }
            y += step;
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_step_stays_in_band() {
        for zoom in [0.1, 0.3, 0.9, 1.0, 2.0, 2.9, 3.1, 7.5, 10.0] {
            let step = grid_step(zoom);
            assert!((50.0..=150.0).contains(&step), "zoom {zoom} -> {step}");
        }
        assert_eq!(grid_step(1.0), 50.0);
        assert_eq!(grid_step(0.5), 50.0);
        assert_eq!(grid_step(4.0), 100.0);
    }

    #[test]
    fn test_wheel_zoom_steps_and_clamps() {
        assert!((wheel_zoom(1.0, 3.0) - 1.1).abs() < 1e-9);
        assert!((wheel_zoom(1.0, -1.0) - 0.9).abs() < 1e-9);
        assert_eq!(wheel_zoom(1.0, 0.0), 1.0);
        assert_eq!(wheel_zoom(10.0, 1.0), CANVAS_MAX_ZOOM);
        assert_eq!(wheel_zoom(0.15, -1.0), CANVAS_MIN_ZOOM);
    }

    #[test]
    fn test_screen_world_round_trip_inside_rect() {
        let mut canvas = Canvas::new();
        canvas.rect = Rect::from_min_size(Pos2::new(100.0, 50.0), egui::vec2(400.0, 300.0));
        canvas.camera.viewport = (400.0, 300.0);
        canvas.camera.zoom = 2.0;
        let p = canvas.world_to_screen(Vec2::new(10.0, -5.0));
        assert_eq!(p, Pos2::new(320.0, 190.0));
        let w = canvas.screen_to_world(p);
        assert!((w.x - 10.0).abs() < 1e-4 && (w.y + 5.0).abs() < 1e-4);
    }
}
