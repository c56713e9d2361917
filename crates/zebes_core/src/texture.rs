use serde::{Deserialize, Serialize};

pub const MAX_TEXTURE_NAME_LENGTH: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texture {
    pub id: String,
    pub name: String,
    /// Relative to the assets root, e.g. `textures/hero.png`.
    pub path: String,
    #[serde(skip)]
    pub width: u32,
    #[serde(skip)]
    pub height: u32,
}

impl Texture {
    pub fn name_id(&self) -> String {
        format!("{},{}", self.name, self.id)
    }
}
