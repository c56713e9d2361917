//! Level persistence. Each level lives in `definitions/levels/<name>-<id>.json`
//! and is re-read from its serialized form after every save so the cache
//! always matches what is on disk.

use crate::store;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use zebes_core::level::{Level, LevelFile};
use zebes_core::{Result, ZebesError};

pub const LEVEL_DEFINITIONS_DIR: &str = "definitions/levels";

/// Lookup of the assets a level's entities may reference.
pub trait AssetCatalog {
    fn contains_sprite(&self, id: &str) -> bool;
    fn contains_collider(&self, id: &str) -> bool;
}

pub struct LevelManager {
    dir: PathBuf,
    levels: HashMap<String, Level>,
}

fn parse_level(raw: &str, origin: &Path) -> Result<Level> {
    let file: LevelFile = serde_json::from_str(raw).map_err(|e| {
        ZebesError::internal(format!(
            "JSON parsing error for Level in {}: {e}",
            origin.display()
        ))
    })?;
    Level::from_file(file)
}

fn resolve_references(level: &Level, catalog: &dyn AssetCatalog) -> Result<()> {
    for entity in level.entities.values() {
        if let Some(sprite_id) = &entity.sprite_id {
            if !catalog.contains_sprite(sprite_id) {
                return Err(ZebesError::not_found(format!(
                    "Sprite with id {sprite_id} referenced by entity {} not found.",
                    entity.id
                )));
            }
        }
        if let Some(collider_id) = &entity.collider_id {
            if !catalog.contains_collider(collider_id) {
                return Err(ZebesError::not_found(format!(
                    "Collider with id {collider_id} referenced by entity {} not found.",
                    entity.id
                )));
            }
        }
    }
    Ok(())
}

impl LevelManager {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: root.join(LEVEL_DEFINITIONS_DIR),
            levels: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str, id: &str) -> PathBuf {
        self.dir.join(store::resource_file_name(name, id))
    }

    fn name_taken_by_other(&self, name: &str, id: &str) -> bool {
        self.levels.values().any(|l| l.name == name && l.id != id)
    }

    pub fn load_level(&mut self, file: &Path, catalog: &dyn AssetCatalog) -> Result<Level> {
        let raw = store::read_to_string(file)?;
        let level = parse_level(&raw, file)?;
        resolve_references(&level, catalog)?;
        log::debug!("Loaded level '{}' ({})", level.name, level.id);
        self.levels.insert(level.id.clone(), level.clone());
        Ok(level)
    }

    pub fn load_all_levels(&mut self, catalog: &dyn AssetCatalog) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(ZebesError::not_found(format!(
                "Level root directory not found: {}",
                self.dir.display()
            )));
        }
        for file in store::list_json_files(&self.dir)? {
            if let Err(e) = self.load_level(&file, catalog) {
                log::warn!("Skipping level {}: {e}", file.display());
            }
        }
        log::info!("Loaded {} levels", self.levels.len());
        Ok(())
    }

    /// Store a new level under a fresh id. Any id on `level` is ignored.
    pub fn create_level(&mut self, mut level: Level, catalog: &dyn AssetCatalog) -> Result<String> {
        level.id = store::generate_guid();
        if level.name.is_empty() {
            return Err(ZebesError::invalid_argument(
                "Level must have a non-empty name",
            ));
        }
        if self.name_taken_by_other(&level.name, &level.id) {
            return Err(ZebesError::invalid_argument(format!(
                "Level with name '{}' already exists",
                level.name
            )));
        }
        let id = level.id.clone();
        let path = self.path_for(&level.name, &id);
        self.save_level(&level, catalog)?;
        self.load_level(&path, catalog)?;
        log::info!("Created level '{}' ({id})", level.name);
        Ok(id)
    }

    pub fn save_level(&mut self, level: &Level, catalog: &dyn AssetCatalog) -> Result<()> {
        if level.id.is_empty() {
            return Err(ZebesError::invalid_argument(
                "Level must have an ID to be saved.",
            ));
        }
        if level.name.is_empty() {
            return Err(ZebesError::invalid_argument("Level name cannot be empty"));
        }
        store::check_resource_name("Level", &level.name)?;
        if self.name_taken_by_other(&level.name, &level.id) {
            return Err(ZebesError::invalid_argument(format!(
                "Level name '{}' is already taken",
                level.name
            )));
        }
        level.validate()?;
        resolve_references(level, catalog)?;

        store::ensure_dir(&self.dir)?;
        let path = self.path_for(&level.name, &level.id);
        let json = store::to_json_string(&level.to_file())?;
        fs::write(&path, &json).map_err(|e| {
            ZebesError::internal(format!("Failed to write {}: {e}", path.display()))
        })?;
        if let Some(old) = self.levels.get(&level.id) {
            store::remove_old_file_if_renamed(&level.id, &old.name, &level.name, &self.dir);
        }

        let saved = parse_level(&json, &path)?;
        self.levels.insert(saved.id.clone(), saved);
        log::debug!("Saved level '{}' to {}", level.name, path.display());
        Ok(())
    }

    pub fn get_level(&self, id: &str) -> Result<Level> {
        self.levels
            .get(id)
            .cloned()
            .ok_or_else(|| ZebesError::not_found(format!("Level with id {id} not found.")))
    }

    pub fn delete_level(&mut self, id: &str) -> Result<()> {
        let level = self
            .levels
            .remove(id)
            .ok_or_else(|| ZebesError::not_found(format!("Level with id {id} not found.")))?;
        let path = self.path_for(&level.name, &level.id);
        if path.exists() {
            store::remove_file(&path)?;
        }
        log::info!("Deleted level '{}' ({id})", level.name);
        Ok(())
    }

    /// Copies of every cached level, sorted by name.
    pub fn get_all_levels(&self) -> Vec<Level> {
        let mut levels: Vec<Level> = self.levels.values().cloned().collect();
        levels.sort_by(|a, b| a.name.cmp(&b.name));
        levels
    }

    pub fn is_sprite_used(&self, sprite_id: &str) -> bool {
        self.levels.values().any(|l| {
            l.entities
                .values()
                .any(|e| e.sprite_id.as_deref() == Some(sprite_id))
        })
    }

    pub fn is_collider_used(&self, collider_id: &str) -> bool {
        self.levels.values().any(|l| {
            l.entities
                .values()
                .any(|e| e.collider_id.as_deref() == Some(collider_id))
        })
    }
}
