//! Level data model: chunked tile storage, owned entities and parallax layers.
//!
//! Tiles live in fixed 16x16 chunks keyed by a packed `(cx, cy)` pair so an
//! empty world costs nothing and painting far from the origin only allocates
//! the chunks it touches. The level owns its entities by value, keyed by id.
//!
//! The on-disk shape is described by the `*File` structs at the bottom of this
//! module; it is flatter than the in-memory model (`vx`/`vy` instead of a
//! nested velocity) and every field except the ids is optional on read.

use crate::entity::{Body, Entity, Transform};
use crate::error::{Result, ZebesError};
use crate::vec::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Tile index for an empty cell.
pub const NO_TILE: i32 = 0;

/// Side length of one tile in world units. Level bounds snap to this.
pub const TILE_SIZE: i32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileChunk {
    tiles: Vec<i32>,
}

impl TileChunk {
    pub const SIZE: i32 = 16;
    pub const CELLS: usize = (Self::SIZE * Self::SIZE) as usize;

    pub fn new() -> Self {
        Self {
            tiles: vec![NO_TILE; Self::CELLS],
        }
    }

    pub fn from_tiles(tiles: Vec<i32>) -> Result<Self> {
        if tiles.len() != Self::CELLS {
            return Err(ZebesError::invalid_argument(format!(
                "Tile chunk has {} tiles, expected {}",
                tiles.len(),
                Self::CELLS
            )));
        }
        Ok(Self { tiles })
    }

    /// Local coordinates are in `0..SIZE`; anything outside reads as `NO_TILE`.
    pub fn get(&self, lx: i32, ly: i32) -> i32 {
        Self::cell_index(lx, ly).map_or(NO_TILE, |i| self.tiles[i])
    }

    /// Returns false and leaves the chunk untouched for out-of-range cells.
    pub fn set(&mut self, lx: i32, ly: i32, value: i32) -> bool {
        match Self::cell_index(lx, ly) {
            Some(i) => {
                self.tiles[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn tiles(&self) -> &[i32] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [i32] {
        &mut self.tiles
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(|&t| t == NO_TILE)
    }

    fn cell_index(lx: i32, ly: i32) -> Option<usize> {
        let range = 0..Self::SIZE;
        if range.contains(&lx) && range.contains(&ly) {
            Some((ly * Self::SIZE + lx) as usize)
        } else {
            None
        }
    }
}

impl Default for TileChunk {
    fn default() -> Self {
        Self::new()
    }
}

/// Pack chunk coordinates into a single map key: high 32 bits hold `cx`,
/// low 32 bits hold `cy`.
pub fn chunk_key(cx: i32, cy: i32) -> i64 {
    ((cx as i64) << 32) | (cy as u32 as i64)
}

pub fn chunk_coords(key: i64) -> (i32, i32) {
    ((key >> 32) as i32, key as u32 as i32)
}

/// Split a tile coordinate into (chunk coordinate, local coordinate).
fn split_tile_coord(t: i32) -> (i32, i32) {
    (t.div_euclid(TileChunk::SIZE), t.rem_euclid(TileChunk::SIZE))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    pub name: String,
    pub texture_id: String,
    pub scroll_factor: Vec2,
    pub repeat_x: bool,
}

impl ParallaxLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture_id: String::new(),
            scroll_factor: Vec2::ONE,
            repeat_x: false,
        }
    }

    /// Screen-space shift of this layer relative to the world origin for a
    /// camera at `camera`. A factor of 1 moves with the world, 0 stays put.
    pub fn offset(&self, camera: Vec2) -> Vec2 {
        Vec2::new(
            camera.x * (1.0 - self.scroll_factor.x),
            camera.y * (1.0 - self.scroll_factor.y),
        )
    }
}

impl Default for ParallaxLayer {
    fn default() -> Self {
        Self::new("")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Level {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub spawn_point: Vec2,
    pub tile_chunks: HashMap<i64, TileChunk>,
    pub entities: BTreeMap<u64, Entity>,
    pub parallax_layers: Vec<ParallaxLayer>,
}

impl Level {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_entity(&mut self, entity: Entity) -> Result<()> {
        if entity.id == Entity::INVALID_ID {
            return Err(ZebesError::invalid_argument("Entity id must be non-zero"));
        }
        if self.entities.contains_key(&entity.id) {
            return Err(ZebesError::invalid_argument(format!(
                "Entity with id {} already exists",
                entity.id
            )));
        }
        self.entities.insert(entity.id, entity);
        Ok(())
    }

    pub fn remove_entity(&mut self, id: u64) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn entity(&self, id: u64) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: u64) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn next_entity_id(&self) -> Result<u64> {
        match self.entities.keys().next_back() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| ZebesError::failed_precondition("No entity ids left in level")),
        }
    }

    pub fn tile(&self, tx: i32, ty: i32) -> i32 {
        let (cx, lx) = split_tile_coord(tx);
        let (cy, ly) = split_tile_coord(ty);
        self.tile_chunks
            .get(&chunk_key(cx, cy))
            .map_or(NO_TILE, |chunk| chunk.get(lx, ly))
    }

    /// Write one cell. Returns true when the stored value changed.
    pub fn set_tile(&mut self, tx: i32, ty: i32, value: i32) -> bool {
        let (cx, lx) = split_tile_coord(tx);
        let (cy, ly) = split_tile_coord(ty);
        let key = chunk_key(cx, cy);

        match self.tile_chunks.get_mut(&key) {
            Some(chunk) => {
                if chunk.get(lx, ly) == value {
                    return false;
                }
                chunk.set(lx, ly, value);
                if value == NO_TILE && chunk.is_empty() {
                    self.tile_chunks.remove(&key);
                }
                true
            }
            None if value == NO_TILE => false,
            None => {
                let mut chunk = TileChunk::new();
                chunk.set(lx, ly, value);
                self.tile_chunks.insert(key, chunk);
                true
            }
        }
    }

    /// Iterate every non-empty cell as `(tx, ty, tile)`.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        self.tile_chunks.iter().flat_map(|(&key, chunk)| {
            let (cx, cy) = chunk_coords(key);
            chunk
                .tiles()
                .iter()
                .enumerate()
                .filter(|&(_, &t)| t != NO_TILE)
                .map(move |(i, &t)| {
                    let lx = i as i32 % TileChunk::SIZE;
                    let ly = i as i32 / TileChunk::SIZE;
                    (cx * TileChunk::SIZE + lx, cy * TileChunk::SIZE + ly, t)
                })
        })
    }

    pub fn validate_bounds(&self) -> Result<()> {
        let on_grid = |v: f64| v >= 0.0 && v.fract() == 0.0 && (v as i64) % TILE_SIZE as i64 == 0;
        if !on_grid(self.width) || !on_grid(self.height) {
            return Err(ZebesError::invalid_argument(format!(
                "Level boundaries must be multiples of tile size ({TILE_SIZE})"
            )));
        }
        Ok(())
    }

    pub fn validate_parallax(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for layer in &self.parallax_layers {
            if layer.name.is_empty() {
                return Err(ZebesError::invalid_argument(
                    "Parallax layer name cannot be empty",
                ));
            }
            if !seen.insert(layer.name.as_str()) {
                return Err(ZebesError::invalid_argument(format!(
                    "Duplicate parallax layer name: {}",
                    layer.name
                )));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_bounds()?;
        self.validate_parallax()
    }

    /// Ids of every sprite and collider referenced by an entity.
    pub fn referenced_assets(&self) -> (Vec<&str>, Vec<&str>) {
        let sprites = self
            .entities
            .values()
            .filter_map(|e| e.sprite_id.as_deref())
            .collect();
        let colliders = self
            .entities
            .values()
            .filter_map(|e| e.collider_id.as_deref())
            .collect();
        (sprites, colliders)
    }

    pub fn to_file(&self) -> LevelFile {
        let mut tile_chunks: Vec<TileChunkFile> = self
            .tile_chunks
            .iter()
            .map(|(&chunk_id, chunk)| TileChunkFile {
                chunk_id,
                tiles: chunk.tiles().to_vec(),
            })
            .collect();
        tile_chunks.sort_by_key(|c| c.chunk_id);

        LevelFile {
            id: self.id.clone(),
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            spawn_point: self.spawn_point,
            parallax_layers: self
                .parallax_layers
                .iter()
                .map(|layer| ParallaxLayerFile {
                    name: layer.name.clone(),
                    texture_id: layer.texture_id.clone(),
                    scroll_factor_x: layer.scroll_factor.x,
                    scroll_factor_y: layer.scroll_factor.y,
                    repeat_x: layer.repeat_x,
                })
                .collect(),
            tile_chunks,
            entities: self.entities.values().map(EntityFile::from).collect(),
        }
    }

    /// Build a level from its file form. Only structural checks run here;
    /// asset references are resolved by the caller.
    pub fn from_file(file: LevelFile) -> Result<Self> {
        let mut level = Level {
            id: file.id,
            name: file.name,
            width: file.width,
            height: file.height,
            spawn_point: file.spawn_point,
            ..Level::default()
        };
        level.validate_bounds()?;

        level.parallax_layers = file
            .parallax_layers
            .into_iter()
            .map(|l| ParallaxLayer {
                name: l.name,
                texture_id: l.texture_id,
                scroll_factor: Vec2::new(l.scroll_factor_x, l.scroll_factor_y),
                repeat_x: l.repeat_x,
            })
            .collect();

        for chunk in file.tile_chunks {
            let tiles = TileChunk::from_tiles(chunk.tiles).map_err(|e| {
                ZebesError::invalid_argument(format!("Chunk {}: {e}", chunk.chunk_id))
            })?;
            level.tile_chunks.insert(chunk.chunk_id, tiles);
        }

        for entity in file.entities {
            level.add_entity(entity.into())?;
        }

        Ok(level)
    }
}

// --- File format ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub spawn_point: Vec2,
    #[serde(default)]
    pub parallax_layers: Vec<ParallaxLayerFile>,
    #[serde(default)]
    pub tile_chunks: Vec<TileChunkFile>,
    #[serde(default)]
    pub entities: Vec<EntityFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxLayerFile {
    #[serde(default)]
    pub name: String,
    pub texture_id: String,
    pub scroll_factor_x: f64,
    pub scroll_factor_y: f64,
    #[serde(default)]
    pub repeat_x: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileChunkFile {
    pub chunk_id: i64,
    pub tiles: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityFile {
    pub id: u64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub transform: TransformFile,
    #[serde(default)]
    pub current_frame_index: i32,
    #[serde(default)]
    pub body: BodyFile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collider_id: Option<String>,
}

const fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformFile {
    pub x: f64,
    pub y: f64,
    pub rotation: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyFile {
    pub vx: f64,
    pub vy: f64,
    pub ax: f64,
    pub ay: f64,
    pub is_static: bool,
    pub mass: f64,
}

impl From<&Entity> for EntityFile {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id,
            active: e.active,
            transform: TransformFile {
                x: e.transform.position.x,
                y: e.transform.position.y,
                rotation: e.transform.rotation,
            },
            current_frame_index: e.current_frame_index,
            body: BodyFile {
                vx: e.body.velocity.x,
                vy: e.body.velocity.y,
                ax: e.body.acceleration.x,
                ay: e.body.acceleration.y,
                is_static: e.body.is_static,
                mass: e.body.mass,
            },
            sprite_id: e.sprite_id.clone(),
            collider_id: e.collider_id.clone(),
        }
    }
}

impl From<EntityFile> for Entity {
    fn from(f: EntityFile) -> Self {
        Self {
            id: f.id,
            active: f.active,
            transform: Transform {
                position: Vec2::new(f.transform.x, f.transform.y),
                rotation: f.transform.rotation,
            },
            body: Body {
                velocity: Vec2::new(f.body.vx, f.body.vy),
                acceleration: Vec2::new(f.body.ax, f.body.ay),
                drag: Vec2::ZERO,
                mass: f.body.mass,
                is_static: f.body.is_static,
            },
            sprite_id: f.sprite_id,
            collider_id: f.collider_id,
            current_frame_index: f.current_frame_index,
            animation_timer: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sized(name: &str, width: f64, height: f64) -> Level {
        Level {
            width,
            height,
            ..Level::new(name)
        }
    }

    #[test]
    fn chunk_key_round_trips_negative_coords() {
        for &(cx, cy) in &[(0, 0), (-1, 3), (7, -9), (i32::MIN, i32::MAX)] {
            assert_eq!(chunk_coords(chunk_key(cx, cy)), (cx, cy));
        }
        assert_ne!(chunk_key(1, 0), chunk_key(0, 1));
    }

    #[test]
    fn set_tile_allocates_chunk_lazily() {
        let mut level = Level::new("tiles");
        assert_eq!(level.tile(3, 4), NO_TILE);
        assert!(!level.set_tile(3, 4, NO_TILE));
        assert!(level.tile_chunks.is_empty());

        assert!(level.set_tile(3, 4, 7));
        assert_eq!(level.tile(3, 4), 7);
        assert_eq!(level.tile_chunks.len(), 1);
        assert!(level.tile_chunks.contains_key(&chunk_key(0, 0)));
    }

    #[test]
    fn negative_tiles_land_in_negative_chunks() {
        let mut level = Level::new("tiles");
        level.set_tile(-1, -1, 2);
        assert!(level.tile_chunks.contains_key(&chunk_key(-1, -1)));
        let chunk = &level.tile_chunks[&chunk_key(-1, -1)];
        assert_eq!(chunk.get(15, 15), 2);
        assert_eq!(level.tile(-1, -1), 2);
        assert_eq!(level.tile(-17, -1), NO_TILE);
    }

    #[test]
    fn clearing_last_tile_drops_chunk() {
        let mut level = Level::new("tiles");
        level.set_tile(20, 1, 5);
        level.set_tile(21, 1, 6);
        assert!(level.set_tile(20, 1, NO_TILE));
        assert_eq!(level.tile_chunks.len(), 1);
        assert!(level.set_tile(21, 1, NO_TILE));
        assert!(level.tile_chunks.is_empty());
    }

    #[test]
    fn set_tile_reports_no_change_for_same_value() {
        let mut level = Level::new("tiles");
        assert!(level.set_tile(0, 0, 1));
        assert!(!level.set_tile(0, 0, 1));
    }

    #[test]
    fn iter_tiles_returns_world_coordinates() {
        let mut level = Level::new("tiles");
        level.set_tile(17, 2, 9);
        level.set_tile(-3, 0, 4);
        let mut tiles: Vec<_> = level.iter_tiles().collect();
        tiles.sort();
        assert_eq!(tiles, vec![(-3, 0, 4), (17, 2, 9)]);
    }

    #[test]
    fn chunk_ignores_out_of_range_cells() {
        let mut chunk = TileChunk::new();
        assert!(!chunk.set(16, 0, 4));
        assert!(!chunk.set(-1, 3, 4));
        assert!(!chunk.set(0, 16, 4));
        assert!(chunk.is_empty());
        assert!(chunk.set(0, 1, 4));
        assert_eq!(chunk.get(16, 0), NO_TILE);
        assert_eq!(chunk.get(-1, 0), NO_TILE);
        assert_eq!(chunk.get(0, 1), 4);
    }

    #[test]
    fn next_entity_id_does_not_overflow() {
        let mut level = Level::new("entities");
        level.add_entity(Entity::new(u64::MAX)).expect("add");
        let err = level.next_entity_id().expect_err("exhausted");
        assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
    }

    #[test]
    fn from_tiles_rejects_wrong_length() {
        let err = TileChunk::from_tiles(vec![1, 2, 3]).expect_err("short chunk");
        assert!(err.to_string().contains("expected 256"));
        assert!(TileChunk::from_tiles(vec![0; 256]).is_ok());
    }

    #[test]
    fn add_entity_rejects_invalid_and_duplicate_ids() {
        let mut level = Level::new("entities");
        assert!(level.add_entity(Entity::new(Entity::INVALID_ID)).is_err());
        level.add_entity(Entity::new(5)).expect("first add");
        let err = level.add_entity(Entity::new(5)).expect_err("duplicate");
        assert!(err.to_string().contains("already exists"));
        assert_eq!(level.next_entity_id().expect("id"), 6);
    }

    #[test]
    fn remove_entity_returns_owned_value() {
        let mut level = Level::new("entities");
        level
            .add_entity(Entity::at(3, Vec2::new(1.0, 2.0)))
            .expect("add");
        let removed = level.remove_entity(3).expect("present");
        assert_eq!(removed.transform.position, Vec2::new(1.0, 2.0));
        assert!(level.entity(3).is_none());
        assert!(level.remove_entity(3).is_none());
        assert_eq!(level.next_entity_id().expect("id"), 1);
    }

    #[test]
    fn clone_is_deep() {
        let mut level = Level::new("copy");
        level.add_entity(Entity::new(1)).expect("add");
        level.set_tile(0, 0, 3);
        let mut copy = level.clone();
        copy.entity_mut(1).expect("entity").transform.position.x = 50.0;
        copy.set_tile(0, 0, 8);
        assert_eq!(level.entity(1).expect("entity").transform.position.x, 0.0);
        assert_eq!(level.tile(0, 0), 3);
    }

    #[test]
    fn bounds_must_be_tile_multiples() {
        assert!(sized("ok", 320.0, 160.0).validate_bounds().is_ok());
        assert!(sized("zero", 0.0, 0.0).validate_bounds().is_ok());
        let err = sized("bad", 17.0, 16.0)
            .validate_bounds()
            .expect_err("17 is not a multiple");
        assert!(err
            .to_string()
            .contains("Level boundaries must be multiples of tile size"));
        assert!(sized("frac", 16.5, 16.0).validate_bounds().is_err());
        assert!(sized("neg", -16.0, 16.0).validate_bounds().is_err());
    }

    #[test]
    fn parallax_names_must_be_present_and_unique() {
        let mut level = Level::new("p");
        level.parallax_layers.push(ParallaxLayer::new(""));
        let err = level.validate().expect_err("empty name");
        assert!(err.to_string().contains("Parallax layer name cannot be empty"));

        level.parallax_layers = vec![
            ParallaxLayer::new("Background"),
            ParallaxLayer::new("Background"),
        ];
        let err = level.validate().expect_err("duplicate");
        assert!(err.to_string().contains("Duplicate parallax layer name"));
    }

    #[test]
    fn parallax_offset_scales_with_factor() {
        let mut layer = ParallaxLayer::new("sky");
        layer.scroll_factor = Vec2::new(0.25, 1.0);
        let offset = layer.offset(Vec2::new(100.0, 40.0));
        assert_eq!(offset, Vec2::new(75.0, 0.0));
    }

    #[test]
    fn file_form_preserves_everything() {
        let mut level = sized("Complex Level", 320.0, 320.0);
        level.id = "abc".to_string();
        level.spawn_point = Vec2::new(100.0, 200.0);
        level.parallax_layers.push(ParallaxLayer {
            name: "My Layer".to_string(),
            texture_id: "tex1".to_string(),
            scroll_factor: Vec2::new(0.5, 0.5),
            repeat_x: true,
        });
        level.set_tile(1, 0, 2);
        let mut entity = Entity::at(123, Vec2::new(10.0, 20.0));
        entity.body.velocity = Vec2::new(1.0, 0.0);
        entity.body.is_static = true;
        entity.sprite_id = Some("spr".to_string());
        level.add_entity(entity).expect("add");

        let json = serde_json::to_string(&level.to_file()).expect("serialize");
        let file: LevelFile = serde_json::from_str(&json).expect("parse");
        let loaded = Level::from_file(file).expect("rebuild");
        assert_eq!(loaded, level);
    }

    #[test]
    fn file_defaults_fill_missing_fields() {
        let json = r#"{
            "id": "x",
            "name": "Sparse",
            "parallax_layers": [
                { "texture_id": "t", "scroll_factor_x": 0.1, "scroll_factor_y": 0.2 }
            ],
            "entities": [ { "id": 9 } ]
        }"#;
        let file: LevelFile = serde_json::from_str(json).expect("parse");
        let level = Level::from_file(file).expect("valid");
        assert_eq!(level.width, 0.0);
        assert!(!level.parallax_layers[0].repeat_x);
        assert_eq!(level.parallax_layers[0].name, "");
        let entity = level.entity(9).expect("entity");
        assert!(entity.active);
        assert_eq!(entity.transform.position, Vec2::ZERO);
        assert!(entity.sprite_id.is_none());
    }

    #[test]
    fn from_file_rejects_bad_bounds() {
        let json = r#"{ "id": "x", "name": "Bad", "width": 17, "height": 16 }"#;
        let file: LevelFile = serde_json::from_str(json).expect("parse");
        assert!(Level::from_file(file).is_err());
    }

    #[test]
    fn missing_sprite_id_is_not_serialized() {
        let file = EntityFile::from(&Entity::new(1));
        let json = serde_json::to_value(&file).expect("serialize");
        assert!(json.get("sprite_id").is_none());
        assert!(json.get("collider_id").is_none());
        assert_eq!(json["body"]["is_static"], false);
    }
}
