//! The Zebes editor: egui panels for textures, sprites, colliders,
//! blueprints, levels and engine settings, plus the host that renders them
//! through wgpu.
//!
//! Every panel keeps its state machine separate from drawing: `handle_op`
//! applies one operation and is what the tests drive, `ui` draws the panel
//! and forwards button presses to `handle_op`.

pub mod blueprint_editor;
pub mod blueprint_panel;
pub mod canvas;
pub mod collider_panel;
pub mod config_editor;
pub mod editor_ui;
pub mod egui_host;
pub mod level_editor;
pub mod level_panel;
pub mod parallax_panel;
pub mod parallax_preview;
pub mod sprite_editor;
pub mod sprite_panel;
pub mod texture_cache;
pub mod texture_editor;
pub mod viewport;

pub use editor_ui::EditorUi;
pub use egui_host::EguiHost;

/// Message used when a panel's stored selection no longer matches its list.
pub(crate) const OUT_OF_RANGE: &str = "Selected index is out of range!";

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
            "zebes_editor_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    pub fn write_png(dir: &std::path::Path, file: &str, w: u32, h: u32) -> PathBuf {
        std::fs::create_dir_all(dir).expect("create png dir");
        let path = dir.join(file);
        image::RgbaImage::from_pixel(w, h, image::Rgba([0, 128, 255, 255]))
            .save(&path)
            .expect("write png");
        path
    }
}
