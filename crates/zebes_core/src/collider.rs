use crate::vec::Vec2;
use serde::{Deserialize, Serialize};

/// Points are offsets from the owning transform. Polygons are expected to be
/// convex.
pub type Polygon = Vec<Vec2>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub polygons: Vec<Polygon>,
}

impl Collider {
    pub fn name_id(&self) -> String {
        format!("{},{}", self.name, self.id)
    }
}
