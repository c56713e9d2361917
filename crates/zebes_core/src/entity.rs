use crate::vec::Vec2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub drag: Vec2,
    pub mass: f64,
    pub is_static: bool,
}

/// A placed object in a level.
///
/// Position and physics state are owned per entity. Sprites and colliders are
/// shared assets owned by their managers, so the entity only keeps their ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u64,
    /// Soft-delete flag; inactive entities stay in the level file.
    pub active: bool,
    pub transform: Transform,
    pub body: Body,
    pub sprite_id: Option<String>,
    pub collider_id: Option<String>,
    pub current_frame_index: i32,
    pub animation_timer: f64,
}

impl Entity {
    pub const INVALID_ID: u64 = 0;

    pub fn new(id: u64) -> Self {
        Self {
            id,
            active: true,
            transform: Transform::default(),
            body: Body::default(),
            sprite_id: None,
            collider_id: None,
            current_frame_index: 0,
            animation_timer: 0.0,
        }
    }

    pub fn at(id: u64, position: Vec2) -> Self {
        let mut entity = Self::new(id);
        entity.transform.position = position;
        entity
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(Self::INVALID_ID)
    }
}
