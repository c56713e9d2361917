//! Level viewport: draws parallax layers, tiles, entities, spawn point and
//! bounds, and paints tiles with the mouse.

use crate::canvas::Canvas;
use crate::texture_cache::TextureCache;
use egui::{Align2, Color32, FontId, Painter, PointerButton, Rect, Response, Stroke, StrokeKind};
use zebes_core::level::{Level, NO_TILE, TILE_SIZE};
use zebes_core::vec::Vec2;
use zebes_resources::Api;

const BOUNDS_COLOR: Color32 = Color32::from_rgb(220, 40, 40);
const SPAWN_COLOR: Color32 = Color32::from_rgb(40, 220, 80);
const SELECTED_COLOR: Color32 = Color32::from_rgb(255, 220, 0);

/// World x positions at which a layer `width` wide starting at `base_x` has
/// to be drawn to cover `[view_min, view_max]`.
pub fn repeat_origins(base_x: f64, width: f64, view_min: f64, view_max: f64) -> Vec<f64> {
    if width <= 0.0 || view_max < view_min {
        return Vec::new();
    }
    let first = ((view_min - base_x) / width).floor() as i64;
    let last = ((view_max - base_x) / width).ceil() as i64;
    (first..last).map(|k| base_x + k as f64 * width).collect()
}

pub fn tile_at(world: Vec2) -> (i32, i32) {
    let size = TILE_SIZE as f64;
    ((world.x / size).floor() as i32, (world.y / size).floor() as i32)
}

pub fn tile_in_bounds(level: &Level, tx: i32, ty: i32) -> bool {
    let size = TILE_SIZE as f64;
    tx >= 0 && ty >= 0 && (tx as f64) * size < level.width && (ty as f64) * size < level.height
}

/// Write `value` into the tile under `world` if it lies inside the level.
pub fn paint_tile(level: &mut Level, world: Vec2, value: i32) -> bool {
    let (tx, ty) = tile_at(world);
    tile_in_bounds(level, tx, ty) && level.set_tile(tx, ty, value)
}

/// Flat color for tiles when no tileset texture is chosen.
fn tile_color(tile: i32) -> Color32 {
    let h = (tile as u32).wrapping_mul(2_654_435_761);
    Color32::from_rgb(80 + (h >> 24) as u8 % 150, 80 + (h >> 16) as u8 % 150, 80 + (h >> 8) as u8 % 150)
}

pub struct Viewport {
    pub canvas: Canvas,
    pub tileset_id: Option<String>,
    pub selected_tile: i32,
    pub show_grid: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            canvas: Canvas::new(),
            tileset_id: None,
            selected_tile: 1,
            show_grid: true,
        }
    }
}

impl Viewport {
    /// Draw `level` and apply tile painting. Returns true when a tile changed.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        api: &Api,
        textures: &mut TextureCache,
        level: &mut Level,
        selected_entity: Option<u64>,
    ) -> bool {
        let (response, painter) = self.canvas.begin(ui);
        self.canvas.handle_navigation(ui, &response);
        let painter = painter.with_clip_rect(self.canvas.rect());

        self.draw_parallax(ui.ctx(), &painter, api, textures, level);
        if self.show_grid {
            self.canvas.draw_grid(&painter);
        }
        self.draw_tiles(ui.ctx(), &painter, api, textures, level);
        self.draw_entities(ui.ctx(), &painter, api, textures, level, selected_entity);
        self.draw_spawn_and_bounds(&painter, level);

        self.handle_painting(ui, &response, level)
    }

    fn handle_painting(&self, ui: &egui::Ui, response: &Response, level: &mut Level) -> bool {
        let Some(pos) = response.interact_pointer_pos() else {
            return false;
        };
        let (primary, secondary) = ui.input(|i| {
            (
                i.pointer.button_down(PointerButton::Primary),
                i.pointer.button_down(PointerButton::Secondary),
            )
        });
        let world = self.canvas.screen_to_world(pos);
        if primary && self.selected_tile != NO_TILE {
            paint_tile(level, world, self.selected_tile)
        } else if secondary {
            paint_tile(level, world, NO_TILE)
        } else {
            false
        }
    }

    fn visible_world(&self) -> (Vec2, Vec2) {
        let rect = self.canvas.rect();
        (
            self.canvas.screen_to_world(rect.min),
            self.canvas.screen_to_world(rect.max),
        )
    }

    fn draw_parallax(
        &self,
        ctx: &egui::Context,
        painter: &Painter,
        api: &Api,
        textures: &mut TextureCache,
        level: &Level,
    ) {
        let (view_min, view_max) = self.visible_world();
        let full_uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        for layer in &level.parallax_layers {
            let Some(handle) = textures.get(ctx, api, &layer.texture_id) else {
                continue;
            };
            let [w, h] = handle.size();
            let (w, h) = (w as f64, h as f64);
            let offset = layer.offset(self.canvas.camera.position);
            let origins = if layer.repeat_x {
                repeat_origins(offset.x, w, view_min.x, view_max.x)
            } else {
                vec![offset.x]
            };
            for x in origins {
                let rect = self
                    .canvas
                    .world_rect(Vec2::new(x, offset.y), Vec2::new(x + w, offset.y + h));
                painter.image(handle.id(), rect, full_uv, Color32::WHITE);
            }
        }
    }

    fn draw_tiles(
        &self,
        ctx: &egui::Context,
        painter: &Painter,
        api: &Api,
        textures: &mut TextureCache,
        level: &Level,
    ) {
        let tileset = self
            .tileset_id
            .as_deref()
            .and_then(|id| textures.get(ctx, api, id));
        let size = TILE_SIZE as f64;
        let clip = self.canvas.rect();
        for (tx, ty, tile) in level.iter_tiles() {
            let min = Vec2::new(tx as f64 * size, ty as f64 * size);
            let rect = self
                .canvas
                .world_rect(min, Vec2::new(min.x + size, min.y + size));
            if !clip.intersects(rect) {
                continue;
            }
            match &tileset {
                Some(handle) => {
                    let [tw, th] = handle.size();
                    let columns = (tw / TILE_SIZE as usize).max(1);
                    let cell = (tile - 1).max(0) as usize;
                    let (cx, cy) = ((cell % columns) as f32, (cell / columns) as f32);
                    let (uw, vh) = (TILE_SIZE as f32 / tw as f32, TILE_SIZE as f32 / th as f32);
                    let uv = Rect::from_min_size(egui::pos2(cx * uw, cy * vh), egui::vec2(uw, vh));
                    painter.image(handle.id(), rect, uv, Color32::WHITE);
                }
                None => {
                    painter.rect_filled(rect, 0.0, tile_color(tile));
                }
            }
        }
    }

    fn draw_entities(
        &self,
        ctx: &egui::Context,
        painter: &Painter,
        api: &Api,
        textures: &mut TextureCache,
        level: &Level,
        selected: Option<u64>,
    ) {
        for entity in level.entities.values() {
            let pos = entity.transform.position;
            let mut extent = Vec2::new(TILE_SIZE as f64, TILE_SIZE as f64);
            let mut drawn = false;

            if let Some(sprite) = entity
                .sprite_id
                .as_deref()
                .and_then(|id| api.get_sprite(id).ok())
            {
                let index = (entity.current_frame_index.max(0) as usize)
                    .min(sprite.frames.len().saturating_sub(1));
                if let (Some(frame), Some(handle)) = (
                    sprite.frames.get(index),
                    textures.get(ctx, api, &sprite.texture_id),
                ) {
                    let [tw, th] = handle.size();
                    let (u0, v0, u1, v1) = frame.uv(tw as u32, th as u32);
                    let min = Vec2::new(pos.x + frame.offset_x as f64, pos.y + frame.offset_y as f64);
                    extent = Vec2::new(frame.render_w as f64, frame.render_h as f64);
                    let rect = self
                        .canvas
                        .world_rect(min, Vec2::new(min.x + extent.x, min.y + extent.y));
                    let uv = Rect::from_min_max(egui::pos2(u0, v0), egui::pos2(u1, v1));
                    let tint = if entity.active {
                        Color32::WHITE
                    } else {
                        Color32::from_white_alpha(90)
                    };
                    painter.image(handle.id(), rect, uv, tint);
                    drawn = true;
                }
            }

            let bounds = self
                .canvas
                .world_rect(pos, Vec2::new(pos.x + extent.x, pos.y + extent.y));
            if !drawn {
                painter.rect_filled(bounds, 0.0, Color32::from_rgba_unmultiplied(200, 0, 200, 140));
            }

            if let Some(collider) = entity
                .collider_id
                .as_deref()
                .and_then(|id| api.get_collider(id).ok())
            {
                let stroke = Stroke::new(1.0, Color32::from_rgb(0, 220, 120));
                for polygon in &collider.polygons {
                    let points: Vec<egui::Pos2> = polygon
                        .iter()
                        .map(|p| self.canvas.world_to_screen(Vec2::new(pos.x + p.x, pos.y + p.y)))
                        .collect();
                    if points.len() > 1 {
                        painter.add(egui::Shape::closed_line(points, stroke));
                    }
                }
            }

            if selected == Some(entity.id) {
                painter.rect_stroke(bounds, 0.0, Stroke::new(2.0, SELECTED_COLOR), StrokeKind::Outside);
            }
        }
    }

    fn draw_spawn_and_bounds(&self, painter: &Painter, level: &Level) {
        let spawn = self.canvas.world_to_screen(level.spawn_point);
        painter.circle_filled(spawn, 5.0, SPAWN_COLOR);
        painter.text(
            spawn + egui::vec2(7.0, -7.0),
            Align2::LEFT_BOTTOM,
            "Spawn",
            FontId::proportional(11.0),
            SPAWN_COLOR,
        );

        let bounds = self
            .canvas
            .world_rect(Vec2::ZERO, Vec2::new(level.width, level.height));
        painter.rect_stroke(bounds, 0.0, Stroke::new(2.0, BOUNDS_COLOR), StrokeKind::Outside);
        painter.text(
            bounds.left_top() + egui::vec2(4.0, -4.0),
            Align2::LEFT_BOTTOM,
            "Level Bounds",
            FontId::proportional(12.0),
            BOUNDS_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_origins_cover_view() {
        let xs = repeat_origins(10.0, 100.0, 0.0, 250.0);
        assert_eq!(xs, vec![-90.0, 10.0, 110.0, 210.0]);
        assert!(repeat_origins(0.0, 0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_tile_at_floors_negative() {
        assert_eq!(tile_at(Vec2::new(15.9, 16.0)), (0, 1));
        assert_eq!(tile_at(Vec2::new(-0.1, -16.0)), (-1, -1));
    }

    #[test]
    fn test_paint_respects_level_bounds() {
        let mut level = Level::new("l");
        level.width = 32.0;
        level.height = 16.0;
        assert!(paint_tile(&mut level, Vec2::new(20.0, 5.0), 3));
        assert_eq!(level.tile(1, 0), 3);
        assert!(!paint_tile(&mut level, Vec2::new(20.0, 5.0), 3));
        assert!(!paint_tile(&mut level, Vec2::new(40.0, 5.0), 3));
        assert!(!paint_tile(&mut level, Vec2::new(-1.0, 5.0), 3));
        assert!(paint_tile(&mut level, Vec2::new(20.0, 5.0), NO_TILE));
        assert_eq!(level.tile(1, 0), NO_TILE);
    }
}
