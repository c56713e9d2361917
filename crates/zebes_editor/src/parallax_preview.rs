use crate::texture_cache::TextureCache;
use zebes_resources::Api;

pub const PREVIEW_MIN_ZOOM: f64 = 0.1;
pub const PREVIEW_MAX_ZOOM: f64 = 10.0;
const PREVIEW_BASE_WIDTH: f64 = 200.0;

/// Zoomable preview of one parallax layer's texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxPreview {
    pub zoom: f64,
}

impl Default for ParallaxPreview {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

impl ParallaxPreview {
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom * 0.8).max(PREVIEW_MIN_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.25).min(PREVIEW_MAX_ZOOM);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// On-screen size for an image of `w` x `h` pixels: `200 * zoom` wide,
    /// height following the aspect ratio.
    pub fn display_size(&self, w: usize, h: usize) -> (f32, f32) {
        let width = PREVIEW_BASE_WIDTH * self.zoom;
        if w == 0 {
            return (width as f32, 0.0);
        }
        let height = width * h as f64 / w as f64;
        (width as f32, height as f32)
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        api: &Api,
        textures: &mut TextureCache,
        texture_id: Option<&str>,
    ) {
        ui.horizontal(|ui| {
            if ui.button("-").clicked() {
                self.zoom_out();
            }
            ui.label(format!("{:.0}%", self.zoom * 100.0));
            if ui.button("+").clicked() {
                self.zoom_in();
            }
            if ui.button("Reset Zoom").clicked() {
                self.reset_zoom();
            }
        });
        ui.separator();

        let Some(texture_id) = texture_id else {
            ui.label("No texture selected for this layer.");
            return;
        };
        let Some(handle) = textures.get(ui.ctx(), api, texture_id) else {
            ui.colored_label(
                egui::Color32::YELLOW,
                format!("Texture {texture_id} could not be loaded."),
            );
            return;
        };
        let [w, h] = handle.size();
        let (dw, dh) = self.display_size(w, h);
        egui::ScrollArea::both().id_salt("parallax_preview").show(ui, |ui| {
            ui.add(egui::Image::new((handle.id(), egui::vec2(dw, dh))));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_steps_and_limits() {
        let mut preview = ParallaxPreview::default();
        preview.zoom_out();
        assert!((preview.zoom - 0.8).abs() < 1e-9);
        preview.reset_zoom();
        preview.zoom_in();
        assert!((preview.zoom - 1.25).abs() < 1e-9);

        for _ in 0..50 {
            preview.zoom_in();
        }
        assert_eq!(preview.zoom, PREVIEW_MAX_ZOOM);
        for _ in 0..50 {
            preview.zoom_out();
        }
        assert_eq!(preview.zoom, PREVIEW_MIN_ZOOM);
    }

    #[test]
    fn test_display_size_keeps_aspect() {
        let mut preview = ParallaxPreview::default();
        assert_eq!(preview.display_size(400, 100), (200.0, 50.0));
        preview.zoom = 2.0;
        assert_eq!(preview.display_size(100, 100), (400.0, 400.0));
        assert_eq!(preview.display_size(0, 10), (400.0, 0.0));
    }
}
