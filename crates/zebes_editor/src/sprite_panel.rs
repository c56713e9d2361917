//! Browse sprites, step through their frames and edit frame offsets.

use crate::texture_cache::TextureCache;
use zebes_core::animation::Animator;
use zebes_core::sprite::{Sprite, SpriteFrame};
use zebes_core::Result;
use zebes_resources::Api;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteOp {
    Attach,
    Detach,
    Save,
    Refresh,
    SelectFrame(usize),
    SetOffset { x: i32, y: i32 },
    TogglePlay,
    /// Advance the playing animation by one tick.
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteResult {
    None,
    Attach(String),
    Detach,
}

const PREVIEW_MAX: f32 = 192.0;

#[derive(Default)]
pub struct SpritePanel {
    sprite_cache: Vec<Sprite>,
    sprite_index: Option<usize>,
    editing_sprite: Option<Sprite>,
    attached_sprite_id: Option<String>,
    frame_index: usize,
    animator: Animator,
}

impl SpritePanel {
    pub fn new(api: &Api) -> Self {
        let mut panel = Self::default();
        panel.refresh(api);
        panel
    }

    pub fn refresh(&mut self, api: &Api) {
        self.sprite_cache = api.get_all_sprites();
        match self.editing_sprite.as_ref().map(|s| s.id.clone()) {
            Some(id) => {
                let frame = self.frame_index;
                self.set_sprite(&id);
                self.select_frame(frame);
            }
            None => self.sprite_index = None,
        }
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprite_cache
    }

    /// Select and start editing the sprite with `id`. Unknown ids clear the
    /// selection.
    pub fn set_sprite(&mut self, id: &str) {
        match self.sprite_cache.iter().position(|s| s.id == id) {
            Some(i) => {
                self.sprite_index = Some(i);
                self.editing_sprite = Some(self.sprite_cache[i].clone());
            }
            None => {
                if !id.is_empty() {
                    log::warn!("Sprite {id} not found, clearing selection");
                }
                self.sprite_index = None;
                self.editing_sprite = None;
            }
        }
        self.frame_index = 0;
        self.animator.clear();
    }

    pub fn set_attached_sprite(&mut self, id: Option<String>) {
        self.attached_sprite_id = id.filter(|id| !id.is_empty());
    }

    pub fn attached_sprite_id(&self) -> Option<&str> {
        self.attached_sprite_id.as_deref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached_sprite_id.is_some()
    }

    pub fn reset(&mut self) {
        self.sprite_index = None;
        self.editing_sprite = None;
        self.attached_sprite_id = None;
        self.frame_index = 0;
        self.animator.clear();
    }

    pub fn is_playing(&self) -> bool {
        self.animator.is_active()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn editing_sprite(&self) -> Option<&Sprite> {
        self.editing_sprite.as_ref()
    }

    pub fn current_frame(&self) -> Option<&SpriteFrame> {
        self.editing_sprite
            .as_ref()
            .and_then(|s| s.frames.get(self.frame_index))
    }

    fn select_frame(&mut self, index: usize) {
        let count = self.editing_sprite.as_ref().map_or(0, |s| s.frames.len());
        self.frame_index = index.min(count.saturating_sub(1));
    }

    pub fn handle_op(&mut self, api: &mut Api, op: SpriteOp) -> Result<SpriteResult> {
        match op {
            SpriteOp::Attach => {
                let Some(sprite) = &self.editing_sprite else {
                    return Ok(SpriteResult::None);
                };
                let id = sprite.id.clone();
                self.attached_sprite_id = Some(id.clone());
                Ok(SpriteResult::Attach(id))
            }
            SpriteOp::Detach => {
                if self.attached_sprite_id.take().is_none() {
                    return Ok(SpriteResult::None);
                }
                Ok(SpriteResult::Detach)
            }
            SpriteOp::Save => {
                let Some(sprite) = self.editing_sprite.clone() else {
                    return Ok(SpriteResult::None);
                };
                api.update_sprite(sprite)?;
                self.refresh(api);
                Ok(SpriteResult::None)
            }
            SpriteOp::Refresh => {
                self.refresh(api);
                Ok(SpriteResult::None)
            }
            SpriteOp::SelectFrame(index) => {
                self.select_frame(index);
                Ok(SpriteResult::None)
            }
            SpriteOp::SetOffset { x, y } => {
                let index = self.frame_index;
                if let Some(frame) = self
                    .editing_sprite
                    .as_mut()
                    .and_then(|s| s.frames.get_mut(index))
                {
                    frame.offset_x = x;
                    frame.offset_y = y;
                }
                Ok(SpriteResult::None)
            }
            SpriteOp::TogglePlay => {
                if self.animator.sprite().is_some() {
                    self.animator.clear();
                } else if let Some(sprite) = &self.editing_sprite {
                    self.animator.set_sprite(sprite.clone());
                    self.frame_index = self.animator.frame_index();
                }
                Ok(SpriteResult::None)
            }
            SpriteOp::Tick => {
                if self.animator.is_active() {
                    self.animator.update();
                    self.frame_index = self.animator.frame_index();
                }
                Ok(SpriteResult::None)
            }
        }
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        api: &mut Api,
        textures: &mut TextureCache,
    ) -> Result<SpriteResult> {
        ui.heading("Sprites");
        let mut picked = self.sprite_index;
        let current = picked
            .and_then(|i| self.sprite_cache.get(i))
            .map_or("(none)".to_string(), |s| s.name.clone());
        egui::ComboBox::from_id_salt("sprite_panel_pick")
            .selected_text(current)
            .show_ui(ui, |ui| {
                for (i, sprite) in self.sprite_cache.iter().enumerate() {
                    ui.selectable_value(&mut picked, Some(i), sprite.name.as_str());
                }
            });
        if picked != self.sprite_index {
            if let Some(id) = picked.and_then(|i| self.sprite_cache.get(i)).map(|s| s.id.clone()) {
                self.set_sprite(&id);
            }
        }

        let mut ops = Vec::new();
        if let Some(sprite) = &self.editing_sprite {
            let count = sprite.frames.len();
            ui.label(format!("{count} frame(s)"));
            if count > 0 {
                ui.horizontal(|ui| {
                    if ui.button("◀").clicked() {
                        ops.push(SpriteOp::SelectFrame(self.frame_index.saturating_sub(1)));
                    }
                    ui.label(format!("Frame {} / {count}", self.frame_index + 1));
                    if ui.button("▶").clicked() {
                        ops.push(SpriteOp::SelectFrame(self.frame_index + 1));
                    }
                    let label = if self.is_playing() { "Stop" } else { "Play" };
                    if ui.button(label).clicked() {
                        ops.push(SpriteOp::TogglePlay);
                    }
                });
                if self.is_playing() {
                    ops.push(SpriteOp::Tick);
                    ui.ctx().request_repaint();
                }
            }
        }

        if let Some(frame) = self.current_frame().cloned() {
            self.frame_preview(ui, api, textures, &frame);
            ui.label(format!(
                "Source {}x{} at ({}, {})",
                frame.texture_w, frame.texture_h, frame.texture_x, frame.texture_y
            ));
            ui.label(format!(
                "Render {}x{}, {} tick(s)",
                frame.render_w, frame.render_h, frame.frames_per_cycle
            ));
            let mut x = frame.offset_x;
            let mut y = frame.offset_y;
            ui.horizontal(|ui| {
                ui.label("Offset");
                ui.add(egui::DragValue::new(&mut x).prefix("x "));
                ui.add(egui::DragValue::new(&mut y).prefix("y "));
            });
            if (x, y) != (frame.offset_x, frame.offset_y) {
                ops.push(SpriteOp::SetOffset { x, y });
            }
        }

        ui.horizontal(|ui| {
            let editing = self.editing_sprite.is_some();
            if ui.add_enabled(editing, egui::Button::new("Save")).clicked() {
                ops.push(SpriteOp::Save);
            }
            if ui.button("Refresh").clicked() {
                ops.push(SpriteOp::Refresh);
            }
            if ui.add_enabled(editing, egui::Button::new("Attach")).clicked() {
                ops.push(SpriteOp::Attach);
            }
            if ui
                .add_enabled(self.is_attached(), egui::Button::new("Detach"))
                .clicked()
            {
                ops.push(SpriteOp::Detach);
            }
        });

        let mut result = SpriteResult::None;
        for op in ops {
            let r = self.handle_op(api, op)?;
            if r != SpriteResult::None {
                result = r;
            }
        }
        Ok(result)
    }

    fn frame_preview(
        &self,
        ui: &mut egui::Ui,
        api: &Api,
        textures: &mut TextureCache,
        frame: &SpriteFrame,
    ) {
        let Some(sprite) = &self.editing_sprite else {
            return;
        };
        let Some(handle) = textures.get(ui.ctx(), api, &sprite.texture_id) else {
            ui.colored_label(egui::Color32::YELLOW, "Texture not available");
            return;
        };
        let [tw, th] = handle.size();
        let (u0, v0, u1, v1) = frame.uv(tw as u32, th as u32);
        let w = frame.render_w.max(1) as f32;
        let h = frame.render_h.max(1) as f32;
        let scale = (PREVIEW_MAX / w.max(h)).max(1.0).floor();
        ui.add(
            egui::Image::new((handle.id(), egui::vec2(w * scale, h * scale))).uv(
                egui::Rect::from_min_max(egui::pos2(u0, v0), egui::pos2(u1, v1)),
            ),
        );
    }
}
