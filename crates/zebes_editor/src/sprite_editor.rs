//! Slice textures into sprites and tune frame offsets.

use crate::sprite_panel::SpritePanel;
use crate::texture_cache::TextureCache;
use zebes_core::sprite::Sprite;
use zebes_core::{Result, ZebesError};
use zebes_resources::Api;

/// Grid used to cut a texture into frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceSettings {
    pub name: String,
    pub texture_id: Option<String>,
    pub columns: i32,
    pub rows: i32,
    pub frame_w: i32,
    pub frame_h: i32,
    pub frames_per_cycle: i32,
}

impl Default for SliceSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            texture_id: None,
            columns: 1,
            rows: 1,
            frame_w: 16,
            frame_h: 16,
            frames_per_cycle: 8,
        }
    }
}

pub struct SpriteEditor {
    settings: SliceSettings,
    panel: SpritePanel,
}

impl SpriteEditor {
    pub fn new(api: &Api) -> Self {
        Self {
            settings: SliceSettings::default(),
            panel: SpritePanel::new(api),
        }
    }

    pub fn settings_mut(&mut self) -> &mut SliceSettings {
        &mut self.settings
    }

    pub fn panel(&self) -> &SpritePanel {
        &self.panel
    }

    pub fn create(&mut self, api: &mut Api) -> Result<String> {
        let s = &self.settings;
        let Some(texture_id) = s.texture_id.clone() else {
            return Err(ZebesError::invalid_argument("Select a texture first"));
        };
        if s.columns <= 0 || s.rows <= 0 || s.frame_w <= 0 || s.frame_h <= 0 {
            return Err(ZebesError::invalid_argument(
                "Grid and frame size must be positive",
            ));
        }
        let sprite = Sprite {
            id: String::new(),
            name: s.name.trim().to_string(),
            texture_id,
            frames: Sprite::grid_frames(s.columns, s.rows, s.frame_w, s.frame_h, s.frames_per_cycle),
        };
        let id = api.create_sprite(sprite)?;
        self.panel.refresh(api);
        self.panel.set_sprite(&id);
        self.settings.name.clear();
        Ok(id)
    }

    pub fn delete_selected(&mut self, api: &mut Api) -> Result<()> {
        let Some(id) = self.panel.editing_sprite().map(|s| s.id.clone()) else {
            return Ok(());
        };
        api.delete_sprite(&id)?;
        self.panel.reset();
        self.panel.refresh(api);
        Ok(())
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, api: &mut Api, textures: &mut TextureCache) -> Result<()> {
        let mut create = false;
        let mut delete = false;
        let texture_list: Vec<(String, String)> = api
            .get_all_textures()
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        egui::SidePanel::left("sprite_editor_new")
            .resizable(true)
            .default_width(260.0)
            .show_inside(ui, |ui| {
                ui.heading("New Sprite");
                let s = &mut self.settings;
                ui.horizontal(|ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut s.name);
                });
                let current = s
                    .texture_id
                    .as_deref()
                    .and_then(|id| texture_list.iter().find(|(tid, _)| tid == id))
                    .map_or("(none)", |(_, name)| name.as_str());
                egui::ComboBox::from_id_salt("sprite_editor_texture")
                    .selected_text(current)
                    .show_ui(ui, |ui| {
                        for (id, name) in &texture_list {
                            ui.selectable_value(&mut s.texture_id, Some(id.clone()), name.as_str());
                        }
                    });
                egui::Grid::new("slice_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Columns");
                    ui.add(egui::DragValue::new(&mut s.columns).range(1..=256));
                    ui.end_row();
                    ui.label("Rows");
                    ui.add(egui::DragValue::new(&mut s.rows).range(1..=256));
                    ui.end_row();
                    ui.label("Frame width");
                    ui.add(egui::DragValue::new(&mut s.frame_w).range(1..=4096));
                    ui.end_row();
                    ui.label("Frame height");
                    ui.add(egui::DragValue::new(&mut s.frame_h).range(1..=4096));
                    ui.end_row();
                    ui.label("Ticks per frame");
                    ui.add(egui::DragValue::new(&mut s.frames_per_cycle).range(1..=600));
                    ui.end_row();
                });
                create = ui.button("Create Sprite").clicked();
            });

        let mut panel_result = Ok(());
        egui::CentralPanel::default().show_inside(ui, |ui| {
            panel_result = self.panel.ui(ui, api, textures).map(|_| ());
            ui.separator();
            delete = ui
                .add_enabled(self.panel.editing_sprite().is_some(), egui::Button::new("Delete Sprite"))
                .clicked();
        });

        panel_result?;
        if create {
            self.create(api)?;
        }
        if delete {
            self.delete_selected(api)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{temp_root, write_png};
    use std::fs;
    use zebes_core::ErrorKind;

    #[test]
    fn test_create_slices_grid() {
        let root = temp_root("se_create");
        let src = write_png(&root.join("incoming"), "run.png", 64, 32);
        let mut api = Api::open(&root).unwrap();
        let texture = api.create_texture(&src, None).unwrap();
        let mut editor = SpriteEditor::new(&api);

        let s = editor.settings_mut();
        s.name = "run".into();
        s.texture_id = Some(texture.id);
        s.columns = 4;
        s.rows = 2;
        let id = editor.create(&mut api).unwrap();

        let sprite = api.get_sprite(&id).unwrap();
        assert_eq!(sprite.frames.len(), 8);
        assert_eq!(sprite.frames[5].texture_x, 16);
        assert_eq!(sprite.frames[5].texture_y, 16);
        assert_eq!(editor.panel().editing_sprite().unwrap().id, id);

        editor.delete_selected(&mut api).unwrap();
        assert!(api.get_all_sprites().is_empty());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_create_requires_texture_and_name() {
        let root = temp_root("se_invalid");
        let src = write_png(&root.join("incoming"), "a.png", 16, 16);
        let mut api = Api::open(&root).unwrap();
        let mut editor = SpriteEditor::new(&api);
        let err = editor.create(&mut api).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let texture = api.create_texture(&src, None).unwrap();
        editor.settings_mut().texture_id = Some(texture.id);
        let err = editor.create(&mut api).unwrap_err();
        assert_eq!(err.message(), "Sprite name cannot be empty");
        let _ = fs::remove_dir_all(&root);
    }
}
