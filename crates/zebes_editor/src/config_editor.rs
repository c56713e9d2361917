use zebes_core::config::EngineConfig;
use zebes_core::Result;
use zebes_resources::Api;

/// Edits a draft copy of the engine config; nothing touches disk until
/// `save`.
pub struct ConfigEditor {
    draft: EngineConfig,
}

impl ConfigEditor {
    pub fn new(api: &Api) -> Self {
        Self {
            draft: api.config().clone(),
        }
    }

    pub fn draft(&self) -> &EngineConfig {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut EngineConfig {
        &mut self.draft
    }

    pub fn is_dirty(&self, api: &Api) -> bool {
        &self.draft != api.config()
    }

    pub fn save(&mut self, api: &mut Api) -> Result<()> {
        api.save_config(self.draft.clone())?;
        log::info!("Saved engine config");
        Ok(())
    }

    pub fn revert(&mut self, api: &Api) {
        self.draft = api.config().clone();
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, api: &mut Api) -> Result<()> {
        let dirty = self.is_dirty(api);
        let d = &mut self.draft;

        egui::ScrollArea::vertical().id_salt("config_editor").show(ui, |ui| {
            ui.heading("Window");
            egui::Grid::new("config_window").num_columns(2).show(ui, |ui| {
                ui.label("Title");
                ui.text_edit_singleline(&mut d.window.title);
                ui.end_row();
                ui.label("Width");
                ui.add(egui::DragValue::new(&mut d.window.width).range(1..=8192));
                ui.end_row();
                ui.label("Height");
                ui.add(egui::DragValue::new(&mut d.window.height).range(1..=8192));
                ui.end_row();
                ui.label("Resizable");
                ui.checkbox(&mut d.window.resizable, "");
                ui.end_row();
                ui.label("FPS");
                ui.add(egui::DragValue::new(&mut d.fps).range(1..=240));
                ui.end_row();
            });

            ui.separator();
            ui.heading("Boundaries");
            egui::Grid::new("config_bounds").num_columns(4).show(ui, |ui| {
                ui.label("Min X");
                ui.add(egui::DragValue::new(&mut d.boundaries.min_x).speed(10.0));
                ui.label("Max X");
                ui.add(egui::DragValue::new(&mut d.boundaries.max_x).speed(10.0));
                ui.end_row();
                ui.label("Min Y");
                ui.add(egui::DragValue::new(&mut d.boundaries.min_y).speed(10.0));
                ui.label("Max Y");
                ui.add(egui::DragValue::new(&mut d.boundaries.max_y).speed(10.0));
                ui.end_row();
            });

            ui.separator();
            ui.heading("Tiles");
            egui::Grid::new("config_tiles").num_columns(2).show(ui, |ui| {
                ui.label("Scale");
                ui.add(egui::DragValue::new(&mut d.tiles.scale).range(1..=16));
                ui.end_row();
                ui.label("Source size");
                ui.horizontal(|ui| {
                    ui.add(egui::DragValue::new(&mut d.tiles.source_width).range(1..=512));
                    ui.add(egui::DragValue::new(&mut d.tiles.source_height).range(1..=512));
                });
                ui.end_row();
                ui.label("Palette");
                ui.horizontal(|ui| {
                    ui.add(egui::DragValue::new(&mut d.tiles.size_x).range(1..=4096));
                    ui.add(egui::DragValue::new(&mut d.tiles.size_y).range(1..=4096));
                });
                ui.end_row();
            });

            ui.separator();
            ui.heading("Collisions");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut d.collisions.area_width).prefix("w: "));
                ui.add(egui::DragValue::new(&mut d.collisions.area_height).prefix("h: "));
            });

            ui.separator();
            ui.heading("Camera");
            ui.horizontal(|ui| {
                ui.add(
                    egui::DragValue::new(&mut d.camera.move_speed)
                        .speed(5.0)
                        .range(0.0..=5000.0)
                        .prefix("move: "),
                );
                ui.add(
                    egui::DragValue::new(&mut d.camera.zoom_speed)
                        .speed(0.05)
                        .range(0.0..=10.0)
                        .prefix("zoom: "),
                );
            });

            ui.separator();
            ui.label("Assets directory");
            ui.text_edit_singleline(&mut d.paths.assets);
        });

        ui.separator();
        let mut save = false;
        let mut revert = false;
        ui.horizontal(|ui| {
            save = ui.add_enabled(dirty, egui::Button::new("Save")).clicked();
            revert = ui.add_enabled(dirty, egui::Button::new("Revert")).clicked();
            if dirty {
                ui.label("unsaved changes");
            }
        });
        if save {
            self.save(api)?;
        }
        if revert {
            self.revert(api);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::temp_root;
    use std::fs;
    use zebes_core::ErrorKind;

    #[test]
    fn test_save_persists_draft() {
        let root = temp_root("ce_save");
        let mut api = Api::open(&root).unwrap();
        let mut editor = ConfigEditor::new(&api);
        assert!(!editor.is_dirty(&api));

        editor.draft_mut().window.title = "Brinstar".into();
        editor.draft_mut().camera.move_speed = 250.0;
        assert!(editor.is_dirty(&api));
        editor.save(&mut api).unwrap();
        assert!(!editor.is_dirty(&api));

        let reopened = Api::open(&root).unwrap();
        assert_eq!(reopened.config().window.title, "Brinstar");
        assert_eq!(reopened.config().camera.move_speed, 250.0);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_invalid_draft_is_rejected_and_revertable() {
        let root = temp_root("ce_invalid");
        let mut api = Api::open(&root).unwrap();
        let mut editor = ConfigEditor::new(&api);
        editor.draft_mut().fps = 0;
        let err = editor.save(&mut api).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(api.config().fps, 60);

        editor.revert(&api);
        assert_eq!(editor.draft(), api.config());
        let _ = fs::remove_dir_all(&root);
    }
}
