//! Texture metadata under `definitions/textures/<id>.json`, image files
//! under `textures/`.

use crate::store;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use zebes_core::texture::{Texture, MAX_TEXTURE_NAME_LENGTH};
use zebes_core::{Result, ZebesError};

pub const TEXTURE_DEFINITIONS_DIR: &str = "definitions/textures";
pub const TEXTURE_IMAGES_DIR: &str = "textures";

#[derive(Debug, Deserialize)]
struct TextureJson {
    id: Option<String>,
    name: Option<String>,
    path: Option<String>,
}

#[derive(Debug, Serialize)]
struct TextureJsonOut<'a> {
    id: &'a str,
    name: &'a str,
    path: &'a str,
}

pub struct TextureManager {
    root: PathBuf,
    textures: HashMap<String, Texture>,
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn check_name(name: &str) -> Result<()> {
    if name.chars().count() > MAX_TEXTURE_NAME_LENGTH {
        return Err(ZebesError::invalid_argument(format!(
            "Texture name too long (max {MAX_TEXTURE_NAME_LENGTH} characters)"
        )));
    }
    Ok(())
}

impl TextureManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: HashMap::new(),
        }
    }

    pub fn definitions_dir(&self) -> PathBuf {
        self.root.join(TEXTURE_DEFINITIONS_DIR)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(TEXTURE_IMAGES_DIR)
    }

    pub fn image_path(&self, texture: &Texture) -> PathBuf {
        self.root.join(&texture.path)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.textures.contains_key(id)
    }

    fn read_dimensions(&self, texture: &mut Texture) -> Result<()> {
        let path = self.image_path(texture);
        let (w, h) = image::image_dimensions(&path).map_err(|e| {
            ZebesError::internal(format!("Failed to load image {}: {e}", path.display()))
        })?;
        texture.width = w;
        texture.height = h;
        Ok(())
    }

    fn write_definition(&self, texture: &Texture) -> Result<()> {
        let path = self.definitions_dir().join(format!("{}.json", texture.id));
        store::write_json(
            &path,
            &TextureJsonOut {
                id: &texture.id,
                name: &texture.name,
                path: &texture.path,
            },
        )
    }

    /// Load one definition file. A texture whose id is already loaded is
    /// returned unchanged.
    pub fn load_texture(&mut self, file: &Path) -> Result<Texture> {
        let raw = store::read_to_string(file)?;
        let json: TextureJson = serde_json::from_str(&raw).map_err(|e| {
            ZebesError::invalid_argument(format!(
                "Invalid texture JSON in {}: {e}",
                file.display()
            ))
        })?;
        let (Some(id), Some(path)) = (json.id, json.path) else {
            return Err(ZebesError::invalid_argument(format!(
                "Invalid texture JSON in {}. Missing 'id' or 'path'",
                file.display()
            )));
        };
        if let Some(existing) = self.textures.get(&id) {
            return Ok(existing.clone());
        }

        let name = json
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| file_stem(&path));
        check_name(&name)?;

        let mut texture = Texture {
            id,
            name,
            path,
            width: 0,
            height: 0,
        };
        self.read_dimensions(&mut texture)?;
        log::debug!("Loaded texture '{}' ({})", texture.name, texture.id);
        self.textures.insert(texture.id.clone(), texture.clone());
        Ok(texture)
    }

    pub fn load_all_textures(&mut self) -> Result<()> {
        let dir = self.definitions_dir();
        if !dir.is_dir() {
            return Err(ZebesError::not_found(format!(
                "Texture root directory not found: {}",
                dir.display()
            )));
        }
        for file in store::list_json_files(&dir)? {
            if let Err(e) = self.load_texture(&file) {
                log::warn!("Skipping texture {}: {e}", file.display());
            }
        }
        log::info!("Loaded {} textures", self.textures.len());
        Ok(())
    }

    /// Import an image. The file is copied into `textures/` unless a file with
    /// identical content already sits at the destination.
    pub fn create_texture(&mut self, source: &Path, name: Option<&str>) -> Result<Texture> {
        if !source.is_file() {
            return Err(ZebesError::not_found(format!(
                "Source image file not found: {}",
                source.display()
            )));
        }
        let file_name = source
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ZebesError::invalid_argument(format!("Invalid image path: {}", source.display()))
            })?;
        let stored_path = format!("{TEXTURE_IMAGES_DIR}/{file_name}");
        let name = match name {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => file_stem(&file_name),
        };
        check_name(&name)?;

        let images_dir = self.images_dir();
        store::ensure_dir(&images_dir)?;
        let dest = images_dir.join(&file_name);
        let same_content = dest.is_file()
            && store::hash_file(&dest)? == store::hash_file(source)?;
        if same_content {
            log::debug!("{} already present, skipping copy", dest.display());
        } else {
            std::fs::copy(source, &dest).map_err(|e| {
                ZebesError::internal(format!(
                    "Failed to copy {} to {}: {e}",
                    source.display(),
                    dest.display()
                ))
            })?;
        }

        let mut texture = Texture {
            id: store::generate_guid(),
            name,
            path: stored_path,
            width: 0,
            height: 0,
        };
        self.read_dimensions(&mut texture)?;
        self.write_definition(&texture)?;
        log::info!("Created texture '{}' ({})", texture.name, texture.id);
        self.textures.insert(texture.id.clone(), texture.clone());
        Ok(texture)
    }

    /// Rename a texture. Path and dimensions are never taken from `texture`.
    pub fn update_texture(&mut self, texture: &Texture) -> Result<Texture> {
        check_name(&texture.name)?;
        let updated = {
            let existing = self.textures.get_mut(&texture.id).ok_or_else(|| {
                ZebesError::not_found(format!("Texture with id {} not found.", texture.id))
            })?;
            existing.name = texture.name.clone();
            existing.clone()
        };
        self.write_definition(&updated)?;
        Ok(updated)
    }

    pub fn get_texture(&self, id: &str) -> Result<Texture> {
        self.textures
            .get(id)
            .cloned()
            .ok_or_else(|| ZebesError::not_found(format!("Texture with id {id} not found.")))
    }

    /// Remove the definition. The image file stays in `textures/`.
    pub fn delete_texture(&mut self, id: &str) -> Result<()> {
        if !self.textures.contains_key(id) {
            return Err(ZebesError::not_found(format!(
                "Texture with id {id} not found."
            )));
        }
        let path = self.definitions_dir().join(format!("{id}.json"));
        if path.exists() {
            store::remove_file(&path)?;
        }
        self.textures.remove(id);
        Ok(())
    }

    pub fn get_all_textures(&self) -> Vec<Texture> {
        self.textures.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{temp_root, write_png};
    use std::fs;
    use zebes_core::ErrorKind;

    #[test]
    fn test_create_copies_image_and_reads_dimensions() {
        let root = temp_root("tex_create");
        let src = write_png(&root.join("incoming"), "hero.png", 8, 4);
        let mut manager = TextureManager::new(&root);

        let texture = manager.create_texture(&src, None).unwrap();
        assert_eq!(texture.name, "hero");
        assert_eq!(texture.path, "textures/hero.png");
        assert_eq!((texture.width, texture.height), (8, 4));
        assert!(root.join("textures/hero.png").is_file());
        assert!(manager
            .definitions_dir()
            .join(format!("{}.json", texture.id))
            .is_file());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_reload_from_disk() {
        let root = temp_root("tex_reload");
        let src = write_png(&root.join("incoming"), "tiles.png", 2, 2);
        let id = {
            let mut manager = TextureManager::new(&root);
            manager.create_texture(&src, Some("Tiles")).unwrap().id
        };
        let mut manager = TextureManager::new(&root);
        manager.load_all_textures().unwrap();
        let texture = manager.get_texture(&id).unwrap();
        assert_eq!(texture.name, "Tiles");
        assert_eq!(texture.width, 2);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_missing_source_is_not_found() {
        let root = temp_root("tex_missing");
        let mut manager = TextureManager::new(&root);
        let err = manager
            .create_texture(&root.join("nope.png"), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.message().starts_with("Source image file not found"));
    }

    #[test]
    fn test_name_too_long() {
        let root = temp_root("tex_long");
        let src = write_png(&root.join("incoming"), "a.png", 1, 1);
        let mut manager = TextureManager::new(&root);
        let long = "x".repeat(MAX_TEXTURE_NAME_LENGTH + 1);
        let err = manager.create_texture(&src, Some(&long)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.message().contains("Texture name too long"));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_definition_without_path_is_invalid() {
        let root = temp_root("tex_invalid");
        let dir = root.join(TEXTURE_DEFINITIONS_DIR);
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("broken.json");
        fs::write(&file, r#"{"id":"abc"}"#).unwrap();
        let mut manager = TextureManager::new(&root);
        let err = manager.load_texture(&file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.message().contains("Missing 'id' or 'path'"));

        manager.load_all_textures().unwrap();
        assert!(manager.get_all_textures().is_empty());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_load_all_without_directory() {
        let root = temp_root("tex_nodir");
        let mut manager = TextureManager::new(&root);
        assert_eq!(
            manager.load_all_textures().unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_update_only_renames() {
        let root = temp_root("tex_update");
        let src = write_png(&root.join("incoming"), "a.png", 1, 1);
        let mut manager = TextureManager::new(&root);
        let mut texture = manager.create_texture(&src, None).unwrap();
        texture.name = "Renamed".into();
        texture.path = "elsewhere.png".into();
        let updated = manager.update_texture(&texture).unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.path, "textures/a.png");
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_delete_keeps_image() {
        let root = temp_root("tex_delete");
        let src = write_png(&root.join("incoming"), "a.png", 1, 1);
        let mut manager = TextureManager::new(&root);
        let texture = manager.create_texture(&src, None).unwrap();
        manager.delete_texture(&texture.id).unwrap();
        assert!(manager.get_texture(&texture.id).is_err());
        assert!(root.join("textures/a.png").is_file());
        assert_eq!(
            manager.delete_texture(&texture.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_identical_import_shares_file() {
        let root = temp_root("tex_dupe");
        let src = write_png(&root.join("incoming"), "a.png", 3, 3);
        let mut manager = TextureManager::new(&root);
        let first = manager.create_texture(&src, None).unwrap();
        let second = manager.create_texture(&src, Some("again")).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.path, second.path);
        assert_eq!(manager.get_all_textures().len(), 2);
        let _ = fs::remove_dir_all(&root);
    }
}
