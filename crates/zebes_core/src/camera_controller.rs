use crate::camera::Camera;
use crate::input::{ActionMap, InputState, Key};

pub const CONTROLLER_MIN_ZOOM: f64 = 0.1;
pub const CONTROLLER_MAX_ZOOM: f64 = 5.0;

/// Keyboard pan/zoom for a [`Camera`]. Pan speed is in world units per
/// second at zoom 1 and scales inversely with zoom so the on-screen speed
/// stays constant.
pub struct CameraController {
    actions: ActionMap,
    pub move_speed: f64,
    pub zoom_speed: f64,
}

impl CameraController {
    pub fn new(move_speed: f64, zoom_speed: f64) -> Self {
        let mut actions = ActionMap::new();
        actions.bind_action("PanUp", Key::W);
        actions.bind_action("PanDown", Key::S);
        actions.bind_action("PanLeft", Key::A);
        actions.bind_action("PanRight", Key::D);
        actions.bind_action("ZoomIn", Key::E);
        actions.bind_action("ZoomOut", Key::Q);
        Self {
            actions,
            move_speed,
            zoom_speed,
        }
    }

    pub fn actions(&self) -> &ActionMap {
        &self.actions
    }

    pub fn update(&self, camera: &mut Camera, input: &InputState, dt: f64) {
        let active = |name: &str| self.actions.is_action_active(input, name);

        let mut dx = 0.0;
        let mut dy = 0.0;
        if active("PanUp") {
            dy -= 1.0;
        }
        if active("PanDown") {
            dy += 1.0;
        }
        if active("PanLeft") {
            dx -= 1.0;
        }
        if active("PanRight") {
            dx += 1.0;
        }

        let speed = self.move_speed / camera.zoom;
        camera.position.x += dx * speed * dt;
        camera.position.y += dy * speed * dt;

        let zoom_in = active("ZoomIn");
        let zoom_out = active("ZoomOut");
        if zoom_in {
            camera.zoom += self.zoom_speed * dt;
        }
        if zoom_out {
            camera.zoom -= self.zoom_speed * dt;
        }
        // Zoom set elsewhere (mouse wheel) is left alone until a zoom key is held.
        if zoom_in || zoom_out {
            camera.zoom = camera.zoom.clamp(CONTROLLER_MIN_ZOOM, CONTROLLER_MAX_ZOOM);
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(400.0, 1.0)
    }
}
