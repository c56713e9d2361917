//! Engine configuration persisted as `config.json` under the asset root.
//!
//! Every field has a default so partial files load; unknown fields are
//! ignored.

use crate::error::{Result, ZebesError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Zebes".to_string(),
            width: 1400,
            height: 640,
            resizable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub assets: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            assets: "assets".to_string(),
        }
    }
}

/// World extents the camera and editor viewport are allowed to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            max_x: 3000.0,
            min_y: 0.0,
            max_y: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub scale: u32,
    pub source_width: u32,
    pub source_height: u32,
    /// Palette size in tiles.
    pub size_x: u32,
    pub size_y: u32,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            source_width: 16,
            source_height: 16,
            size_x: 200,
            size_y: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub area_width: u32,
    pub area_height: u32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            area_width: 256,
            area_height: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub move_speed: f64,
    pub zoom_speed: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_speed: 400.0,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub paths: PathConfig,
    pub boundaries: BoundaryConfig,
    pub tiles: TileConfig,
    pub collisions: CollisionConfig,
    pub camera: CameraConfig,
    pub fps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            paths: PathConfig::default(),
            boundaries: BoundaryConfig::default(),
            tiles: TileConfig::default(),
            collisions: CollisionConfig::default(),
            camera: CameraConfig::default(),
            fps: 60,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ZebesError::not_found(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            ZebesError::internal(format!("Failed to parse config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ZebesError::internal(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ZebesError::internal(format!("Failed to serialize config: {e}")))?;
        fs::write(path, json).map_err(|e| {
            ZebesError::internal(format!("Failed to write config {}: {e}", path.display()))
        })
    }

    /// Load `path`, writing the defaults there first when it does not exist.
    /// A file that exists but does not parse is an error, never overwritten.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        config.save(path)?;
        log::info!("Wrote default config to {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ZebesError::invalid_argument(
                "Window width and height must be positive",
            ));
        }
        if self.tiles.source_width == 0 || self.tiles.source_height == 0 || self.tiles.scale == 0
        {
            return Err(ZebesError::invalid_argument(
                "Tile size and scale must be positive",
            ));
        }
        if self.fps == 0 {
            return Err(ZebesError::invalid_argument("FPS must be positive"));
        }
        if self.boundaries.max_x < self.boundaries.min_x
            || self.boundaries.max_y < self.boundaries.min_y
        {
            return Err(ZebesError::invalid_argument(
                "Boundary max must not be below min",
            ));
        }
        Ok(())
    }

    pub fn frame_duration(&self) -> f64 {
        1.0 / self.fps.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "zebes_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.window.title, "Zebes");
        assert_eq!((config.window.width, config.window.height), (1400, 640));
        assert_eq!(config.boundaries.max_x, 3000.0);
        assert_eq!(config.tiles.scale, 2);
        assert_eq!(config.collisions.area_width, 256);
        assert_eq!(config.fps, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"window":{"width":800},"fps":30}"#).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 640);
        assert_eq!(config.fps, 30);
        assert_eq!(config.camera.move_speed, 400.0);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let path = temp_file_path("create");
        let config = EngineConfig::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, EngineConfig::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_then_load_keeps_changes() {
        let path = temp_file_path("save");
        let mut config = EngineConfig::default();
        config.window.title = "Edited".to_string();
        config.tiles.size_x = 64;
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded.window.title, "Edited");
        assert_eq!(loaded.tiles.size_x, 64);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_is_error_and_untouched() {
        let path = temp_file_path("bad");
        fs::write(&path, "{ not json").unwrap();
        let err = EngineConfig::load_or_create(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_zero_fps_rejected() {
        let mut config = EngineConfig::default();
        config.fps = 0;
        assert_eq!(
            config.validate().unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }
}
