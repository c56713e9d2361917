//! Blueprint editing: the blueprint panel on its own, or one state with the
//! sprite and collider panels wired to it.

use crate::blueprint_panel::{BlueprintPanel, BlueprintStatePanel};
use crate::canvas::Canvas;
use crate::collider_panel::{ColliderPanel, ColliderResult};
use crate::sprite_panel::{SpritePanel, SpriteResult};
use crate::texture_cache::TextureCache;
use egui::{Color32, Pos2, Stroke};
use zebes_core::vec::Vec2;
use zebes_core::Result;
use zebes_resources::Api;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlueprintEditorMode {
    #[default]
    Blueprint,
    BlueprintState,
}

pub struct BlueprintEditor {
    mode: BlueprintEditorMode,
    blueprint_panel: BlueprintPanel,
    state_panel: BlueprintStatePanel,
    sprite_panel: SpritePanel,
    collider_panel: ColliderPanel,
    canvas: Canvas,
}

impl BlueprintEditor {
    pub fn new(api: &Api) -> Self {
        Self {
            mode: BlueprintEditorMode::Blueprint,
            blueprint_panel: BlueprintPanel::new(api),
            state_panel: BlueprintStatePanel::default(),
            sprite_panel: SpritePanel::new(api),
            collider_panel: ColliderPanel::new(api),
            canvas: Canvas::new(),
        }
    }

    pub fn mode(&self) -> BlueprintEditorMode {
        self.mode
    }

    pub fn blueprint_panel(&mut self) -> &mut BlueprintPanel {
        &mut self.blueprint_panel
    }

    pub fn sprite_panel(&self) -> &SpritePanel {
        &self.sprite_panel
    }

    pub fn collider_panel(&self) -> &ColliderPanel {
        &self.collider_panel
    }

    /// Switch to editing state `index` of the blueprint being edited, pointing
    /// the sprite and collider panels at that state's references.
    pub fn open_state(&mut self, api: &Api, index: usize) {
        let Some(blueprint) = self.blueprint_panel.editing() else {
            return;
        };
        self.state_panel.set_state(index, blueprint);
        if self.state_panel.state_index().is_none() {
            return;
        }
        let sprite_id = blueprint.sprite_id(index).map(str::to_string);
        let collider_id = blueprint.collider_id(index).map(str::to_string);

        self.sprite_panel.refresh(api);
        self.sprite_panel.reset();
        if let Some(id) = &sprite_id {
            self.sprite_panel.set_sprite(id);
        }
        self.sprite_panel.set_attached_sprite(sprite_id);

        self.collider_panel.refresh(api);
        self.collider_panel.clear();
        if let Some(id) = &collider_id {
            self.collider_panel.set_collider(id);
        }
        self.collider_panel.set_attached_collider(collider_id);

        self.mode = BlueprintEditorMode::BlueprintState;
    }

    pub fn apply_sprite_result(&mut self, result: SpriteResult) {
        let Some(index) = self.state_panel.state_index() else {
            return;
        };
        let Some(state) = self
            .blueprint_panel
            .editing_mut()
            .and_then(|b| b.states.get_mut(index))
        else {
            return;
        };
        match result {
            SpriteResult::Attach(id) => state.sprite_id = id,
            SpriteResult::Detach => state.sprite_id.clear(),
            SpriteResult::None => {}
        }
    }

    pub fn apply_collider_result(&mut self, result: ColliderResult) {
        let Some(index) = self.state_panel.state_index() else {
            return;
        };
        let Some(state) = self
            .blueprint_panel
            .editing_mut()
            .and_then(|b| b.states.get_mut(index))
        else {
            return;
        };
        match result {
            ColliderResult::Attach(id) => state.collider_id = id,
            ColliderResult::Detach => state.collider_id.clear(),
            ColliderResult::None => {}
        }
    }

    pub fn save(&mut self, api: &mut Api) -> Result<()> {
        if let Some(blueprint) = self.blueprint_panel.editing().cloned() {
            api.update_blueprint(blueprint)?;
            self.blueprint_panel.refresh(api);
        }
        Ok(())
    }

    pub fn back(&mut self) {
        self.mode = BlueprintEditorMode::Blueprint;
        self.state_panel.reset();
        self.sprite_panel.reset();
        self.collider_panel.clear();
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, api: &mut Api, textures: &mut TextureCache) -> Result<()> {
        match self.mode {
            BlueprintEditorMode::Blueprint => {
                if let Some(index) = self.blueprint_panel.ui(ui, api)? {
                    self.open_state(api, index);
                }
                Ok(())
            }
            BlueprintEditorMode::BlueprintState => self.state_ui(ui, api, textures),
        }
    }

    fn state_ui(&mut self, ui: &mut egui::Ui, api: &mut Api, textures: &mut TextureCache) -> Result<()> {
        let mut sprite_result = SpriteResult::None;
        let mut collider_result = ColliderResult::None;
        let mut panel_error = None;
        let mut save = false;
        let mut back = false;

        egui::SidePanel::left("blueprint_state_left")
            .resizable(true)
            .default_width(280.0)
            .show_inside(ui, |ui| {
                if let Some(blueprint) = self.blueprint_panel.editing_mut() {
                    self.state_panel.ui(ui, blueprint);
                }
                ui.horizontal(|ui| {
                    save = ui.button("Save").clicked();
                    back = ui.button("Back").clicked();
                });
                ui.separator();
                match self.sprite_panel.ui(ui, api, textures) {
                    Ok(r) => sprite_result = r,
                    Err(e) => panel_error = Some(e),
                }
                ui.separator();
                match self.collider_panel.ui(ui, api) {
                    Ok(r) => collider_result = r,
                    Err(e) => panel_error = Some(e),
                }
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            self.preview_ui(ui, api, textures);
        });

        self.apply_sprite_result(sprite_result);
        self.apply_collider_result(collider_result);
        if let Some(e) = panel_error {
            return Err(e);
        }
        if save {
            self.save(api)?;
        }
        if back {
            self.back();
        }
        Ok(())
    }

    /// Current sprite frame with the collider polygons drawn over it.
    fn preview_ui(&mut self, ui: &mut egui::Ui, api: &Api, textures: &mut TextureCache) {
        let (response, painter) = self.canvas.begin(ui);
        self.canvas.handle_navigation(ui, &response);
        self.canvas.draw_grid(&painter);

        if let (Some(sprite), Some(frame)) = (
            self.sprite_panel.editing_sprite(),
            self.sprite_panel.current_frame(),
        ) {
            if let Some(handle) = textures.get(ui.ctx(), api, &sprite.texture_id) {
                let [tw, th] = handle.size();
                let (u0, v0, u1, v1) = frame.uv(tw as u32, th as u32);
                let min = Vec2::new(frame.offset_x as f64, frame.offset_y as f64);
                let max = Vec2::new(
                    min.x + frame.render_w as f64,
                    min.y + frame.render_h as f64,
                );
                painter.image(
                    handle.id(),
                    self.canvas.world_rect(min, max),
                    egui::Rect::from_min_max(egui::pos2(u0, v0), egui::pos2(u1, v1)),
                    Color32::WHITE,
                );
            }
        }

        if let Some(collider) = self.collider_panel.editing() {
            let stroke = Stroke::new(1.5, Color32::from_rgb(0, 220, 120));
            for polygon in &collider.polygons {
                let points: Vec<Pos2> = polygon
                    .iter()
                    .map(|p| self.canvas.world_to_screen(*p))
                    .collect();
                for p in &points {
                    painter.circle_filled(*p, 3.0, stroke.color);
                }
                if points.len() > 1 {
                    painter.add(egui::Shape::closed_line(points, stroke));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint_panel::BlueprintOp;
    use crate::collider_panel::ColliderOp;
    use crate::sprite_panel::SpriteOp;
    use crate::test_util::{temp_root, write_png};
    use std::fs;
    use zebes_core::collider::Collider;
    use zebes_core::sprite::Sprite;

    #[test]
    fn test_attach_writes_state_and_save_persists() {
        let root = temp_root("bpe_attach");
        let src = write_png(&root.join("incoming"), "s.png", 16, 16);
        let mut api = Api::open(&root).unwrap();
        let texture = api.create_texture(&src, None).unwrap();
        let sprite_id = api
            .create_sprite(Sprite {
                id: String::new(),
                name: "idle".into(),
                texture_id: texture.id,
                frames: Sprite::grid_frames(1, 1, 16, 16, 1),
            })
            .unwrap();
        let collider_id = api
            .create_collider(Collider {
                id: String::new(),
                name: "body".into(),
                polygons: vec![],
            })
            .unwrap();

        let mut editor = BlueprintEditor::new(&api);
        editor
            .blueprint_panel()
            .handle_op(&mut api, BlueprintOp::Create("hero".into()))
            .unwrap();
        editor.open_state(&api, 0);
        assert_eq!(editor.mode(), BlueprintEditorMode::BlueprintState);
        assert!(!editor.sprite_panel().is_attached());

        editor.sprite_panel.set_sprite(&sprite_id);
        let r = editor.sprite_panel.handle_op(&mut api, SpriteOp::Attach).unwrap();
        editor.apply_sprite_result(r);
        editor.collider_panel.set_collider(&collider_id);
        let r = editor
            .collider_panel
            .handle_op(&mut api, ColliderOp::Attach)
            .unwrap();
        editor.apply_collider_result(r);
        editor.save(&mut api).unwrap();

        let blueprint = api.get_all_blueprints().remove(0);
        assert_eq!(blueprint.sprite_id(0), Some(sprite_id.as_str()));
        assert_eq!(blueprint.collider_id(0), Some(collider_id.as_str()));

        editor.back();
        editor.open_state(&api, 0);
        assert_eq!(editor.sprite_panel().attached_sprite_id(), Some(sprite_id.as_str()));
        assert_eq!(
            editor.collider_panel().attached_collider_id(),
            Some(collider_id.as_str())
        );

        editor.apply_sprite_result(SpriteResult::Detach);
        editor.apply_collider_result(ColliderResult::Detach);
        let state = &editor.blueprint_panel().editing().unwrap().states[0];
        assert!(state.sprite_id.is_empty());
        assert!(state.collider_id.is_empty());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_back_resets_panels() {
        let root = temp_root("bpe_back");
        let mut api = Api::open(&root).unwrap();
        let mut editor = BlueprintEditor::new(&api);
        editor
            .blueprint_panel()
            .handle_op(&mut api, BlueprintOp::Create("hero".into()))
            .unwrap();
        editor.open_state(&api, 0);
        editor.back();
        assert_eq!(editor.mode(), BlueprintEditorMode::Blueprint);
        assert!(editor.sprite_panel().editing_sprite().is_none());
        editor.open_state(&api, 5);
        assert_eq!(editor.mode(), BlueprintEditorMode::Blueprint);
        let _ = fs::remove_dir_all(&root);
    }
}
