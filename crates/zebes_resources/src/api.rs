//! Single entry point the editor talks to. Owns the config and every manager
//! and enforces the cross-resource rules: a texture cannot be deleted while a
//! sprite uses it, a sprite or collider cannot be deleted while a blueprint
//! or level entity references it.

use crate::blueprint_manager::{BlueprintManager, BLUEPRINT_DEFINITIONS_DIR};
use crate::collider_manager::{ColliderManager, COLLIDER_DEFINITIONS_DIR};
use crate::level_manager::{AssetCatalog, LevelManager, LEVEL_DEFINITIONS_DIR};
use crate::sprite_manager::{SpriteManager, SPRITE_DEFINITIONS_DIR};
use crate::store;
use crate::texture_manager::{TextureManager, TEXTURE_DEFINITIONS_DIR, TEXTURE_IMAGES_DIR};
use std::path::{Path, PathBuf};
use zebes_core::blueprint::Blueprint;
use zebes_core::collider::Collider;
use zebes_core::config::EngineConfig;
use zebes_core::level::Level;
use zebes_core::sprite::Sprite;
use zebes_core::texture::Texture;
use zebes_core::{Result, ZebesError};

pub const CONFIG_FILE: &str = "config.json";

struct Catalog<'a> {
    sprites: &'a SpriteManager,
    colliders: &'a ColliderManager,
}

impl AssetCatalog for Catalog<'_> {
    fn contains_sprite(&self, id: &str) -> bool {
        self.sprites.contains(id)
    }

    fn contains_collider(&self, id: &str) -> bool {
        self.colliders.contains(id)
    }
}

pub struct Api {
    root: PathBuf,
    config: EngineConfig,
    textures: TextureManager,
    sprites: SpriteManager,
    colliders: ColliderManager,
    blueprints: BlueprintManager,
    levels: LevelManager,
}

impl Api {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for dir in [
            TEXTURE_IMAGES_DIR,
            TEXTURE_DEFINITIONS_DIR,
            SPRITE_DEFINITIONS_DIR,
            COLLIDER_DEFINITIONS_DIR,
            BLUEPRINT_DEFINITIONS_DIR,
            LEVEL_DEFINITIONS_DIR,
        ] {
            store::ensure_dir(&root.join(dir))?;
        }
        let config = EngineConfig::load_or_create(&root.join(CONFIG_FILE))?;

        let mut api = Self {
            textures: TextureManager::new(&root),
            sprites: SpriteManager::new(&root),
            colliders: ColliderManager::new(&root),
            blueprints: BlueprintManager::new(&root),
            levels: LevelManager::new(&root),
            root,
            config,
        };
        api.textures.load_all_textures()?;
        api.sprites.load_all_sprites(&api.textures)?;
        api.colliders.load_all_colliders()?;
        api.blueprints.load_all_blueprints()?;
        let catalog = Catalog {
            sprites: &api.sprites,
            colliders: &api.colliders,
        };
        api.levels.load_all_levels(&catalog)?;
        log::info!("Opened asset root {}", api.root.display());
        Ok(api)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // --- Config ---

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn save_config(&mut self, config: EngineConfig) -> Result<()> {
        config.save(&self.root.join(CONFIG_FILE))?;
        self.config = config;
        Ok(())
    }

    // --- Textures ---

    pub fn create_texture(&mut self, source: &Path, name: Option<&str>) -> Result<Texture> {
        self.textures.create_texture(source, name)
    }

    pub fn update_texture(&mut self, texture: &Texture) -> Result<Texture> {
        self.textures.update_texture(texture)
    }

    pub fn delete_texture(&mut self, id: &str) -> Result<()> {
        if self.sprites.is_texture_used(id) {
            return Err(ZebesError::failed_precondition(format!(
                "Texture {id} is used by a sprite and cannot be deleted."
            )));
        }
        self.textures.delete_texture(id)
    }

    pub fn get_texture(&self, id: &str) -> Result<Texture> {
        self.textures.get_texture(id)
    }

    pub fn get_all_textures(&self) -> Vec<Texture> {
        let mut textures = self.textures.get_all_textures();
        textures.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        textures
    }

    pub fn texture_image_path(&self, texture: &Texture) -> PathBuf {
        self.textures.image_path(texture)
    }

    // --- Sprites ---

    pub fn create_sprite(&mut self, sprite: Sprite) -> Result<String> {
        self.sprites.create_sprite(sprite, &self.textures)
    }

    pub fn update_sprite(&mut self, sprite: Sprite) -> Result<()> {
        self.sprites.get_sprite(&sprite.id)?;
        self.sprites.save_sprite(sprite, &self.textures)
    }

    pub fn delete_sprite(&mut self, id: &str) -> Result<()> {
        if self.blueprints.is_sprite_used(id) || self.levels.is_sprite_used(id) {
            return Err(ZebesError::failed_precondition(format!(
                "Sprite {id} is in use and cannot be deleted."
            )));
        }
        self.sprites.delete_sprite(id)
    }

    pub fn get_sprite(&self, id: &str) -> Result<Sprite> {
        self.sprites.get_sprite(id)
    }

    pub fn get_all_sprites(&self) -> Vec<Sprite> {
        let mut sprites = self.sprites.get_all_sprites();
        sprites.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        sprites
    }

    // --- Colliders ---

    pub fn create_collider(&mut self, collider: Collider) -> Result<String> {
        self.colliders.create_collider(collider)
    }

    pub fn update_collider(&mut self, collider: Collider) -> Result<()> {
        self.colliders.get_collider(&collider.id)?;
        self.colliders.save_collider(collider)
    }

    pub fn delete_collider(&mut self, id: &str) -> Result<()> {
        if self.blueprints.is_collider_used(id) || self.levels.is_collider_used(id) {
            return Err(ZebesError::failed_precondition(format!(
                "Collider {id} is in use and cannot be deleted."
            )));
        }
        self.colliders.delete_collider(id)
    }

    pub fn get_collider(&self, id: &str) -> Result<Collider> {
        self.colliders.get_collider(id)
    }

    pub fn get_all_colliders(&self) -> Vec<Collider> {
        let mut colliders = self.colliders.get_all_colliders();
        colliders.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        colliders
    }

    // --- Blueprints ---

    fn check_blueprint_refs(&self, blueprint: &Blueprint) -> Result<()> {
        for (i, _) in blueprint.states.iter().enumerate() {
            if let Some(sprite_id) = blueprint.sprite_id(i) {
                self.sprites.get_sprite(sprite_id)?;
            }
            if let Some(collider_id) = blueprint.collider_id(i) {
                self.colliders.get_collider(collider_id)?;
            }
        }
        Ok(())
    }

    pub fn create_blueprint(&mut self, blueprint: Blueprint) -> Result<String> {
        self.check_blueprint_refs(&blueprint)?;
        self.blueprints.create_blueprint(blueprint)
    }

    pub fn update_blueprint(&mut self, blueprint: Blueprint) -> Result<()> {
        self.blueprints.get_blueprint(&blueprint.id)?;
        self.check_blueprint_refs(&blueprint)?;
        self.blueprints.save_blueprint(blueprint)
    }

    pub fn delete_blueprint(&mut self, id: &str) -> Result<()> {
        self.blueprints.delete_blueprint(id)
    }

    pub fn get_blueprint(&self, id: &str) -> Result<Blueprint> {
        self.blueprints.get_blueprint(id)
    }

    pub fn get_all_blueprints(&self) -> Vec<Blueprint> {
        let mut blueprints = self.blueprints.get_all_blueprints();
        blueprints.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        blueprints
    }

    // --- Levels ---

    pub fn create_level(&mut self, level: Level) -> Result<String> {
        let catalog = Catalog {
            sprites: &self.sprites,
            colliders: &self.colliders,
        };
        self.levels.create_level(level, &catalog)
    }

    pub fn save_level(&mut self, level: &Level) -> Result<()> {
        let catalog = Catalog {
            sprites: &self.sprites,
            colliders: &self.colliders,
        };
        self.levels.save_level(level, &catalog)
    }

    pub fn delete_level(&mut self, id: &str) -> Result<()> {
        self.levels.delete_level(id)
    }

    pub fn get_level(&self, id: &str) -> Result<Level> {
        self.levels.get_level(id)
    }

    pub fn get_all_levels(&self) -> Vec<Level> {
        self.levels.get_all_levels()
    }
}
