//! On-disk asset storage for Zebes: textures, sprites, colliders,
//! blueprints and levels, each managed under `<root>/definitions/<kind>`.

pub mod api;
pub mod blueprint_manager;
pub mod collider_manager;
pub mod level_manager;
pub mod sprite_manager;
pub mod store;
pub mod texture_manager;

pub use api::Api;
pub use level_manager::AssetCatalog;

#[cfg(test)]
pub(crate) mod test_util {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn temp_root(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "zebes_resources_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    /// Write a tiny valid PNG and return its path.
    pub fn write_png(dir: &std::path::Path, file: &str, w: u32, h: u32) -> PathBuf {
        std::fs::create_dir_all(dir).expect("create png dir");
        let path = dir.join(file);
        image::RgbaImage::from_pixel(w, h, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .expect("write png");
        path
    }
}
