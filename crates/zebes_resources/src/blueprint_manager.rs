use crate::store;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use zebes_core::blueprint::Blueprint;
use zebes_core::{Result, ZebesError};

pub const BLUEPRINT_DEFINITIONS_DIR: &str = "definitions/blueprints";

/// Blueprints stored as `<name>-<id>.json`.
pub struct BlueprintManager {
    dir: PathBuf,
    blueprints: HashMap<String, Blueprint>,
}

fn validate(blueprint: &Blueprint) -> Result<()> {
    if blueprint.id.is_empty() {
        return Err(ZebesError::invalid_argument(
            "Blueprint must have an ID to be saved.",
        ));
    }
    if blueprint.name.is_empty() {
        return Err(ZebesError::invalid_argument("Blueprint name cannot be empty"));
    }
    store::check_resource_name("Blueprint", &blueprint.name)?;
    if blueprint.states.iter().any(|s| s.name.is_empty()) {
        return Err(ZebesError::invalid_argument(
            "Blueprint state name cannot be empty",
        ));
    }
    Ok(())
}

impl BlueprintManager {
    pub fn new(root: &Path) -> Self {
        Self {
            dir: root.join(BLUEPRINT_DEFINITIONS_DIR),
            blueprints: HashMap::new(),
        }
    }

    pub fn load_blueprint(&mut self, file: &Path) -> Result<Blueprint> {
        let raw = store::read_to_string(file)?;
        let blueprint: Blueprint = serde_json::from_str(&raw).map_err(|e| {
            ZebesError::internal(format!(
                "JSON parsing error for Blueprint in {}: {e}",
                file.display()
            ))
        })?;
        validate(&blueprint)?;
        self.blueprints
            .insert(blueprint.id.clone(), blueprint.clone());
        Ok(blueprint)
    }

    pub fn load_all_blueprints(&mut self) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(ZebesError::not_found(format!(
                "Blueprint root directory not found: {}",
                self.dir.display()
            )));
        }
        for file in store::list_json_files(&self.dir)? {
            if let Err(e) = self.load_blueprint(&file) {
                log::warn!("Skipping blueprint {}: {e}", file.display());
            }
        }
        log::info!("Loaded {} blueprints", self.blueprints.len());
        Ok(())
    }

    pub fn create_blueprint(&mut self, mut blueprint: Blueprint) -> Result<String> {
        if blueprint.id.is_empty() {
            blueprint.id = store::generate_guid();
        }
        let id = blueprint.id.clone();
        self.save_blueprint(blueprint)?;
        Ok(id)
    }

    pub fn save_blueprint(&mut self, blueprint: Blueprint) -> Result<()> {
        validate(&blueprint)?;
        let path = self
            .dir
            .join(store::resource_file_name(&blueprint.name, &blueprint.id));
        store::write_json(&path, &blueprint)?;
        if let Some(old) = self.blueprints.get(&blueprint.id) {
            store::remove_old_file_if_renamed(&blueprint.id, &old.name, &blueprint.name, &self.dir);
        }
        self.blueprints.insert(blueprint.id.clone(), blueprint);
        Ok(())
    }

    pub fn get_blueprint(&self, id: &str) -> Result<Blueprint> {
        self.blueprints
            .get(id)
            .cloned()
            .ok_or_else(|| ZebesError::not_found(format!("Blueprint with id {id} not found.")))
    }

    pub fn delete_blueprint(&mut self, id: &str) -> Result<()> {
        let blueprint = self
            .blueprints
            .remove(id)
            .ok_or_else(|| ZebesError::not_found(format!("Blueprint with id {id} not found.")))?;
        let path = self
            .dir
            .join(store::resource_file_name(&blueprint.name, &blueprint.id));
        if path.exists() {
            store::remove_file(&path)?;
        }
        Ok(())
    }

    pub fn get_all_blueprints(&self) -> Vec<Blueprint> {
        self.blueprints.values().cloned().collect()
    }

    pub fn is_sprite_used(&self, sprite_id: &str) -> bool {
        self.blueprints.values().any(|b| b.uses_sprite(sprite_id))
    }

    pub fn is_collider_used(&self, collider_id: &str) -> bool {
        self.blueprints.values().any(|b| b.uses_collider(collider_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::temp_root;
    use std::fs;
    use zebes_core::blueprint::BlueprintState;
    use zebes_core::ErrorKind;

    fn blueprint() -> Blueprint {
        Blueprint {
            id: String::new(),
            name: "hero".into(),
            states: vec![BlueprintState {
                name: "idle".into(),
                sprite_id: "s1".into(),
                collider_id: "c1".into(),
            }],
        }
    }

    #[test]
    fn test_create_reload_and_usage() {
        let root = temp_root("bp_create");
        let id = {
            let mut manager = BlueprintManager::new(&root);
            manager.create_blueprint(blueprint()).unwrap()
        };
        let mut manager = BlueprintManager::new(&root);
        manager.load_all_blueprints().unwrap();
        assert_eq!(manager.get_blueprint(&id).unwrap().states.len(), 1);
        assert!(manager.is_sprite_used("s1"));
        assert!(manager.is_collider_used("c1"));
        assert!(!manager.is_sprite_used("c1"));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_empty_state_name_rejected() {
        let root = temp_root("bp_state");
        let mut manager = BlueprintManager::new(&root);
        let mut bp = blueprint();
        bp.states.push(BlueprintState::new(""));
        let err = manager.create_blueprint(bp).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.message(), "Blueprint state name cannot be empty");
    }

    #[test]
    fn test_failed_rename_keeps_old_file() {
        let root = temp_root("bp_rename_fail");
        let mut manager = BlueprintManager::new(&root);
        let id = manager.create_blueprint(blueprint()).unwrap();
        let dir = root.join(BLUEPRINT_DEFINITIONS_DIR);
        fs::create_dir_all(dir.join(format!("villain-{id}.json"))).unwrap();

        let mut bp = manager.get_blueprint(&id).unwrap();
        bp.name = "villain".into();
        assert_eq!(manager.save_blueprint(bp).unwrap_err().kind(), ErrorKind::Internal);
        assert!(dir.join(format!("hero-{id}.json")).is_file());
        assert_eq!(manager.get_blueprint(&id).unwrap().name, "hero");
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_path_like_name_rejected() {
        let root = temp_root("bp_path_name");
        let mut manager = BlueprintManager::new(&root);
        let mut bp = blueprint();
        bp.name = "../../hero".into();
        let err = manager.create_blueprint(bp).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(manager.get_all_blueprints().is_empty());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_rename_and_delete() {
        let root = temp_root("bp_rename");
        let mut manager = BlueprintManager::new(&root);
        let id = manager.create_blueprint(blueprint()).unwrap();
        let mut bp = manager.get_blueprint(&id).unwrap();
        bp.name = "villain".into();
        manager.save_blueprint(bp).unwrap();
        let dir = root.join(BLUEPRINT_DEFINITIONS_DIR);
        assert!(!dir.join(format!("hero-{id}.json")).exists());
        assert!(dir.join(format!("villain-{id}.json")).is_file());

        manager.delete_blueprint(&id).unwrap();
        assert!(!dir.join(format!("villain-{id}.json")).exists());
        assert_eq!(
            manager.get_blueprint(&id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        let _ = fs::remove_dir_all(&root);
    }
}
