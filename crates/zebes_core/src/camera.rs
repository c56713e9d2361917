use crate::vec::Vec2;
use glam::DVec2;

pub const MIN_ZOOM: f64 = 0.1;

/// View into the world. `position` is the world point shown at the center of
/// the viewport; `zoom` scales world units to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub zoom: f64,
    pub viewport: (f64, f64),
}

impl Camera {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport: (viewport_width, viewport_height),
        }
    }

    fn half_viewport(&self) -> DVec2 {
        DVec2::new(self.viewport.0, self.viewport.1) * 0.5
    }

    /// Viewport-local pixel position of a world point. The origin is the top
    /// left corner of the viewport.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let rel = DVec2::from(world) - DVec2::from(self.position);
        (rel * self.zoom + self.half_viewport()).into()
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let rel = DVec2::from(screen) - self.half_viewport();
        (rel / self.zoom + DVec2::from(self.position)).into()
    }

    /// Change zoom while keeping the world point under `anchor` (viewport
    /// pixels) fixed on screen.
    pub fn zoom_at(&mut self, anchor: Vec2, new_zoom: f64) {
        let before = self.screen_to_world(anchor);
        self.zoom = new_zoom.max(MIN_ZOOM);
        let after = self.screen_to_world(anchor);
        self.position.x += before.x - after.x;
        self.position.y += before.y - after.y;
    }

    /// Pan by a screen-space drag delta.
    pub fn pan_pixels(&mut self, dx: f64, dy: f64) {
        self.position.x -= dx / self.zoom;
        self.position.y -= dy / self.zoom;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn origin_maps_to_viewport_center() {
        let camera = Camera::new(800.0, 600.0);
        assert_eq!(camera.world_to_screen(Vec2::ZERO), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn zoom_scales_distance_from_camera() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.position = Vec2::new(100.0, 100.0);
        camera.zoom = 2.0;
        let screen = camera.world_to_screen(Vec2::new(110.0, 90.0));
        assert_eq!(screen, Vec2::new(420.0, 280.0));
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let mut camera = Camera::new(640.0, 480.0);
        camera.position = Vec2::new(-35.5, 12.25);
        camera.zoom = 0.75;
        let world = Vec2::new(123.0, -456.0);
        assert!(approx(
            camera.screen_to_world(camera.world_to_screen(world)),
            world
        ));
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let mut camera = Camera::new(400.0, 400.0);
        let anchor = Vec2::new(300.0, 100.0);
        let world_before = camera.screen_to_world(anchor);
        camera.zoom_at(anchor, 3.0);
        assert!(approx(camera.screen_to_world(anchor), world_before));
        assert_eq!(camera.zoom, 3.0);
    }

    #[test]
    fn pan_is_divided_by_zoom() {
        let mut camera = Camera::new(100.0, 100.0);
        camera.zoom = 2.0;
        camera.pan_pixels(10.0, -4.0);
        assert_eq!(camera.position, Vec2::new(-5.0, 2.0));
    }
}
