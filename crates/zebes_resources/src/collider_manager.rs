use crate::store;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use zebes_core::collider::Collider;
use zebes_core::{Result, ZebesError};

pub const COLLIDER_DEFINITIONS_DIR: &str = "definitions/colliders";

/// Colliders stored as `<name>-<id>.json`.
pub struct ColliderManager {
    dir: PathBuf,
    colliders: HashMap<String, Collider>,
}

impl ColliderManager {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: root.join(COLLIDER_DEFINITIONS_DIR),
            colliders: HashMap::new(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.colliders.contains_key(id)
    }

    pub fn load_collider(&mut self, file: &Path) -> Result<Collider> {
        let raw = store::read_to_string(file)?;
        let collider: Collider = serde_json::from_str(&raw).map_err(|e| {
            ZebesError::internal(format!(
                "JSON parsing error for Collider in {}: {e}",
                file.display()
            ))
        })?;
        self.colliders.insert(collider.id.clone(), collider.clone());
        Ok(collider)
    }

    pub fn load_all_colliders(&mut self) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(ZebesError::not_found(format!(
                "Collider root directory not found: {}",
                self.dir.display()
            )));
        }
        for file in store::list_json_files(&self.dir)? {
            if let Err(e) = self.load_collider(&file) {
                log::warn!("Skipping collider {}: {e}", file.display());
            }
        }
        log::info!("Loaded {} colliders", self.colliders.len());
        Ok(())
    }

    pub fn create_collider(&mut self, mut collider: Collider) -> Result<String> {
        if collider.id.is_empty() {
            collider.id = store::generate_guid();
        }
        let id = collider.id.clone();
        self.save_collider(collider)?;
        Ok(id)
    }

    pub fn save_collider(&mut self, collider: Collider) -> Result<()> {
        if collider.id.is_empty() {
            return Err(ZebesError::invalid_argument(
                "Collider must have an ID to be saved.",
            ));
        }
        if collider.name.is_empty() {
            return Err(ZebesError::invalid_argument("Collider name cannot be empty"));
        }
        store::check_resource_name("Collider", &collider.name)?;
        let path = self
            .dir
            .join(store::resource_file_name(&collider.name, &collider.id));
        store::write_json(&path, &collider)?;
        if let Some(old) = self.colliders.get(&collider.id) {
            store::remove_old_file_if_renamed(&collider.id, &old.name, &collider.name, &self.dir);
        }
        self.colliders.insert(collider.id.clone(), collider);
        Ok(())
    }

    pub fn get_collider(&self, id: &str) -> Result<Collider> {
        self.colliders
            .get(id)
            .cloned()
            .ok_or_else(|| ZebesError::not_found(format!("Collider with id {id} not found.")))
    }

    pub fn delete_collider(&mut self, id: &str) -> Result<()> {
        let collider = self
            .colliders
            .remove(id)
            .ok_or_else(|| ZebesError::not_found(format!("Collider with id {id} not found.")))?;
        let path = self
            .dir
            .join(store::resource_file_name(&collider.name, &collider.id));
        if path.exists() {
            store::remove_file(&path)?;
        }
        Ok(())
    }

    pub fn get_all_colliders(&self) -> Vec<Collider> {
        self.colliders.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::temp_root;
    use std::fs;
    use zebes_core::vec::Vec2;
    use zebes_core::ErrorKind;

    fn collider(name: &str) -> Collider {
        Collider {
            id: String::new(),
            name: name.into(),
            polygons: vec![vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(16.0, 0.0),
                Vec2::new(16.0, 16.0),
            ]],
        }
    }

    #[test]
    fn test_create_writes_named_file() {
        let root = temp_root("col_create");
        let mut manager = ColliderManager::new(&root);
        let id = manager.create_collider(collider("box")).unwrap();
        assert!(root
            .join(COLLIDER_DEFINITIONS_DIR)
            .join(format!("box-{id}.json"))
            .is_file());

        let mut reloaded = ColliderManager::new(&root);
        reloaded.load_all_colliders().unwrap();
        assert_eq!(reloaded.get_collider(&id).unwrap().polygons[0].len(), 3);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_rename_removes_old_file() {
        let root = temp_root("col_rename");
        let mut manager = ColliderManager::new(&root);
        let id = manager.create_collider(collider("box")).unwrap();
        let mut c = manager.get_collider(&id).unwrap();
        c.name = "crate".into();
        manager.save_collider(c).unwrap();
        let dir = root.join(COLLIDER_DEFINITIONS_DIR);
        assert!(!dir.join(format!("box-{id}.json")).exists());
        assert!(dir.join(format!("crate-{id}.json")).is_file());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_failed_rename_keeps_old_file() {
        let root = temp_root("col_rename_fail");
        let mut manager = ColliderManager::new(&root);
        let id = manager.create_collider(collider("box")).unwrap();
        let dir = root.join(COLLIDER_DEFINITIONS_DIR);
        fs::create_dir_all(dir.join(format!("crate-{id}.json"))).unwrap();

        let mut c = manager.get_collider(&id).unwrap();
        c.name = "crate".into();
        assert_eq!(manager.save_collider(c).unwrap_err().kind(), ErrorKind::Internal);
        assert!(dir.join(format!("box-{id}.json")).is_file());
        assert_eq!(manager.get_collider(&id).unwrap().name, "box");
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_path_like_name_rejected() {
        let root = temp_root("col_path_name");
        let mut manager = ColliderManager::new(&root);
        for name in ["../up", "nested/box", "win\\box"] {
            let err = manager.create_collider(collider(name)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{name}");
        }
        assert!(!root.join("definitions").join("up").exists());
        assert!(!root.join(COLLIDER_DEFINITIONS_DIR).join("nested").exists());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_missing_name_is_json_error() {
        let root = temp_root("col_json");
        let dir = root.join(COLLIDER_DEFINITIONS_DIR);
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("x.json");
        fs::write(&file, r#"{"id":"abc","polygons":[]}"#).unwrap();
        let mut manager = ColliderManager::new(&root);
        let err = manager.load_collider(&file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.message().contains("JSON parsing error"));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_save_validation() {
        let root = temp_root("col_validate");
        let mut manager = ColliderManager::new(&root);
        assert_eq!(
            manager.save_collider(collider("a")).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        let mut unnamed = collider("");
        unnamed.id = "id".into();
        assert_eq!(
            manager.save_collider(unnamed).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_delete_removes_file() {
        let root = temp_root("col_delete");
        let mut manager = ColliderManager::new(&root);
        let id = manager.create_collider(collider("box")).unwrap();
        manager.delete_collider(&id).unwrap();
        assert!(!root
            .join(COLLIDER_DEFINITIONS_DIR)
            .join(format!("box-{id}.json"))
            .exists());
        assert!(manager.get_all_colliders().is_empty());
        let _ = fs::remove_dir_all(&root);
    }
}
