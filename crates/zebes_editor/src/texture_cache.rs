use std::collections::{HashMap, HashSet};
use std::path::Path;
use zebes_resources::Api;

/// Decode an image file into an egui image.
pub fn load_color_image(path: &Path) -> Result<egui::ColorImage, String> {
    let rgba = image::open(path)
        .map_err(|e| format!("Failed to load image {}: {e}", path.display()))?
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// GPU handles for texture images, keyed by texture id. Images that fail to
/// load are remembered so they are not retried every frame.
#[derive(Default)]
pub struct TextureCache {
    handles: HashMap<String, egui::TextureHandle>,
    failed: HashSet<String>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        ctx: &egui::Context,
        api: &Api,
        texture_id: &str,
    ) -> Option<egui::TextureHandle> {
        if texture_id.is_empty() || self.failed.contains(texture_id) {
            return None;
        }
        if let Some(handle) = self.handles.get(texture_id) {
            return Some(handle.clone());
        }

        let loaded = api
            .get_texture(texture_id)
            .map_err(|e| e.to_string())
            .and_then(|texture| load_color_image(&api.texture_image_path(&texture)));
        match loaded {
            Ok(image) => {
                let handle = ctx.load_texture(texture_id, image, egui::TextureOptions::NEAREST);
                self.handles.insert(texture_id.to_string(), handle.clone());
                Some(handle)
            }
            Err(e) => {
                log::warn!("Texture {texture_id} unavailable: {e}");
                self.failed.insert(texture_id.to_string());
                None
            }
        }
    }

    pub fn invalidate(&mut self, texture_id: &str) {
        self.handles.remove(texture_id);
        self.failed.remove(texture_id);
    }

    pub fn clear(&mut self) {
        self.handles.clear();
        self.failed.clear();
    }
}
