use crate::store;
use crate::texture_manager::TextureManager;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use zebes_core::sprite::Sprite;
use zebes_core::{Result, ZebesError};

pub const SPRITE_DEFINITIONS_DIR: &str = "definitions/sprites";

/// Sprites stored as `<id>.json`. Every sprite must point at a texture the
/// [`TextureManager`] knows about.
pub struct SpriteManager {
    dir: PathBuf,
    sprites: HashMap<String, Sprite>,
}

impl SpriteManager {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: root.join(SPRITE_DEFINITIONS_DIR),
            sprites: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sprites.contains_key(id)
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn load_sprite(&mut self, file: &Path, textures: &TextureManager) -> Result<Sprite> {
        let raw = store::read_to_string(file)?;
        let sprite: Sprite = serde_json::from_str(&raw).map_err(|e| {
            ZebesError::internal(format!("JSON parsing error for Sprite: {e}"))
        })?;
        textures.get_texture(&sprite.texture_id)?;
        self.sprites.insert(sprite.id.clone(), sprite.clone());
        Ok(sprite)
    }

    pub fn load_all_sprites(&mut self, textures: &TextureManager) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(ZebesError::not_found(format!(
                "Sprite root directory not found: {}",
                self.dir.display()
            )));
        }
        for file in store::list_json_files(&self.dir)? {
            if let Err(e) = self.load_sprite(&file, textures) {
                log::warn!("Skipping sprite {}: {e}", file.display());
            }
        }
        log::info!("Loaded {} sprites", self.sprites.len());
        Ok(())
    }

    /// Persist a new sprite, assigning an id when it has none.
    pub fn create_sprite(&mut self, mut sprite: Sprite, textures: &TextureManager) -> Result<String> {
        if sprite.id.is_empty() {
            sprite.id = store::generate_guid();
        }
        let id = sprite.id.clone();
        self.save_sprite(sprite, textures)?;
        Ok(id)
    }

    pub fn save_sprite(&mut self, sprite: Sprite, textures: &TextureManager) -> Result<()> {
        if sprite.id.is_empty() {
            return Err(ZebesError::invalid_argument(
                "Sprite must have an ID to be saved.",
            ));
        }
        if sprite.name.is_empty() {
            return Err(ZebesError::invalid_argument("Sprite name cannot be empty"));
        }
        textures.get_texture(&sprite.texture_id)?;
        store::write_json(&self.path_for(&sprite.id), &sprite)?;
        log::debug!("Saved sprite '{}' ({})", sprite.name, sprite.id);
        self.sprites.insert(sprite.id.clone(), sprite);
        Ok(())
    }

    pub fn get_sprite(&self, id: &str) -> Result<Sprite> {
        self.sprites
            .get(id)
            .cloned()
            .ok_or_else(|| ZebesError::not_found(format!("Sprite with id {id} not found.")))
    }

    pub fn delete_sprite(&mut self, id: &str) -> Result<()> {
        if self.sprites.remove(id).is_none() {
            return Err(ZebesError::not_found(format!("Sprite with id {id} not found.")));
        }
        let path = self.path_for(id);
        if path.exists() {
            store::remove_file(&path)?;
        }
        Ok(())
    }

    pub fn get_all_sprites(&self) -> Vec<Sprite> {
        self.sprites.values().cloned().collect()
    }

    pub fn is_texture_used(&self, texture_id: &str) -> bool {
        self.sprites.values().any(|s| s.texture_id == texture_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{temp_root, write_png};
    use std::fs;
    use zebes_core::ErrorKind;

    fn setup(hint: &str) -> (PathBuf, TextureManager, String) {
        let root = temp_root(hint);
        let src = write_png(&root.join("incoming"), "sheet.png", 32, 16);
        let mut textures = TextureManager::new(&root);
        let texture_id = textures.create_texture(&src, None).unwrap().id;
        (root, textures, texture_id)
    }

    fn sprite(texture_id: &str) -> Sprite {
        Sprite {
            id: String::new(),
            name: "walk".into(),
            texture_id: texture_id.into(),
            frames: Sprite::grid_frames(2, 1, 16, 16, 4),
        }
    }

    #[test]
    fn test_create_and_reload() {
        let (root, textures, texture_id) = setup("sprite_create");
        let id = {
            let mut sprites = SpriteManager::new(&root);
            sprites.create_sprite(sprite(&texture_id), &textures).unwrap()
        };
        assert!(root.join(SPRITE_DEFINITIONS_DIR).join(format!("{id}.json")).is_file());

        let mut sprites = SpriteManager::new(&root);
        sprites.load_all_sprites(&textures).unwrap();
        let loaded = sprites.get_sprite(&id).unwrap();
        assert_eq!(loaded.frames.len(), 2);
        assert!(sprites.is_texture_used(&texture_id));
        assert!(!sprites.is_texture_used("other"));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_unknown_texture_is_not_found() {
        let (root, textures, _) = setup("sprite_tex");
        let mut sprites = SpriteManager::new(&root);
        let err = sprites.create_sprite(sprite("missing"), &textures).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_save_without_id() {
        let (root, textures, texture_id) = setup("sprite_noid");
        let mut sprites = SpriteManager::new(&root);
        let err = sprites.save_sprite(sprite(&texture_id), &textures).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.message(), "Sprite must have an ID to be saved.");
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_bad_json_is_internal() {
        let (root, textures, _) = setup("sprite_json");
        let dir = root.join(SPRITE_DEFINITIONS_DIR);
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("bad.json");
        fs::write(&file, "[1, 2").unwrap();
        let mut sprites = SpriteManager::new(&root);
        let err = sprites.load_sprite(&file, &textures).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.message().starts_with("JSON parsing error for Sprite"));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_delete() {
        let (root, textures, texture_id) = setup("sprite_delete");
        let mut sprites = SpriteManager::new(&root);
        let id = sprites.create_sprite(sprite(&texture_id), &textures).unwrap();
        sprites.delete_sprite(&id).unwrap();
        assert!(sprites.get_all_sprites().is_empty());
        assert_eq!(sprites.delete_sprite(&id).unwrap_err().kind(), ErrorKind::NotFound);
        let _ = fs::remove_dir_all(&root);
    }
}
