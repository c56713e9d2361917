use serde::{Deserialize, Serialize};

/// A named state of a blueprint. Empty ids mean "nothing attached".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintState {
    pub name: String,
    #[serde(default)]
    pub sprite_id: String,
    #[serde(default)]
    pub collider_id: String,
}

impl BlueprintState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Reusable entity template. State order is significant: the editor and the
/// runtime address states by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub states: Vec<BlueprintState>,
}

impl Blueprint {
    pub fn sprite_id(&self, index: usize) -> Option<&str> {
        self.states
            .get(index)
            .map(|s| s.sprite_id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn collider_id(&self, index: usize) -> Option<&str> {
        self.states
            .get(index)
            .map(|s| s.collider_id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn uses_sprite(&self, sprite_id: &str) -> bool {
        !sprite_id.is_empty() && self.states.iter().any(|s| s.sprite_id == sprite_id)
    }

    pub fn uses_collider(&self, collider_id: &str) -> bool {
        !collider_id.is_empty() && self.states.iter().any(|s| s.collider_id == collider_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ids_read_as_none() {
        let blueprint = Blueprint {
            id: "b".to_string(),
            name: "hero".to_string(),
            states: vec![
                BlueprintState {
                    name: "idle".to_string(),
                    sprite_id: String::new(),
                    collider_id: "c1".to_string(),
                },
                BlueprintState::new("run"),
            ],
        };
        assert_eq!(blueprint.sprite_id(0), None);
        assert_eq!(blueprint.collider_id(0), Some("c1"));
        assert_eq!(blueprint.collider_id(5), None);
        assert!(blueprint.uses_collider("c1"));
        assert!(!blueprint.uses_sprite("c1"));
    }
}
