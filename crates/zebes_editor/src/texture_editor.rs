use crate::texture_cache::TextureCache;
use std::path::Path;
use zebes_core::texture::Texture;
use zebes_core::Result;
use zebes_resources::Api;

/// Import, rename and delete textures.
#[derive(Default)]
pub struct TextureEditor {
    import_path: String,
    import_name: String,
    selected_id: Option<String>,
    rename_buffer: String,
}

impl TextureEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn select(&mut self, api: &Api, id: &str) {
        match api.get_texture(id) {
            Ok(texture) => {
                self.rename_buffer = texture.name;
                self.selected_id = Some(texture.id);
            }
            Err(e) => {
                log::warn!("{e}");
                self.selected_id = None;
                self.rename_buffer.clear();
            }
        }
    }

    pub fn import(&mut self, api: &mut Api, path: &str, name: &str) -> Result<Texture> {
        let name = name.trim();
        let texture = api.create_texture(Path::new(path.trim()), (!name.is_empty()).then_some(name))?;
        self.select(api, &texture.id);
        self.import_path.clear();
        self.import_name.clear();
        Ok(texture)
    }

    pub fn rename(&mut self, api: &mut Api, textures: &mut TextureCache) -> Result<()> {
        let Some(id) = self.selected_id.clone() else {
            return Ok(());
        };
        let mut texture = api.get_texture(&id)?;
        texture.name = self.rename_buffer.clone();
        api.update_texture(&texture)?;
        textures.invalidate(&id);
        Ok(())
    }

    pub fn delete(&mut self, api: &mut Api, textures: &mut TextureCache) -> Result<()> {
        let Some(id) = self.selected_id.clone() else {
            return Ok(());
        };
        api.delete_texture(&id)?;
        textures.invalidate(&id);
        self.selected_id = None;
        self.rename_buffer.clear();
        Ok(())
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, api: &mut Api, textures: &mut TextureCache) -> Result<()> {
        let mut import = false;
        let mut rename = false;
        let mut delete = false;
        let mut picked = None;

        egui::SidePanel::left("texture_editor_list")
            .resizable(true)
            .default_width(260.0)
            .show_inside(ui, |ui| {
                ui.heading("Textures");
                egui::ScrollArea::vertical()
                    .id_salt("texture_list")
                    .max_height(300.0)
                    .show(ui, |ui| {
                        for texture in api.get_all_textures() {
                            let selected = self.selected_id.as_deref() == Some(texture.id.as_str());
                            let label = format!("{} ({}x{})", texture.name, texture.width, texture.height);
                            if ui.selectable_label(selected, label).clicked() {
                                picked = Some(texture.id.clone());
                            }
                        }
                    });
                ui.separator();
                ui.label("Import image");
                ui.horizontal(|ui| {
                    ui.label("Path");
                    ui.text_edit_singleline(&mut self.import_path);
                });
                ui.horizontal(|ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut self.import_name);
                });
                import = ui
                    .add_enabled(!self.import_path.trim().is_empty(), egui::Button::new("Import"))
                    .clicked();
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            let Some(id) = self.selected_id.clone() else {
                ui.label("Select a texture.");
                return;
            };
            ui.horizontal(|ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut self.rename_buffer);
                rename = ui.button("Rename").clicked();
                delete = ui.button("Delete").clicked();
            });
            if let Ok(texture) = api.get_texture(&id) {
                ui.label(format!("Path: {}", texture.path));
            }
            if let Some(handle) = textures.get(ui.ctx(), api, &id) {
                let [w, h] = handle.size();
                let scale = (512.0 / w.max(h).max(1) as f32).clamp(1.0, 8.0).floor();
                egui::ScrollArea::both().id_salt("texture_image").show(ui, |ui| {
                    ui.add(egui::Image::new((
                        handle.id(),
                        egui::vec2(w as f32 * scale, h as f32 * scale),
                    )));
                });
            }
        });

        if let Some(id) = picked {
            self.select(api, &id);
        }
        if import {
            let (path, name) = (self.import_path.clone(), self.import_name.clone());
            self.import(api, &path, &name)?;
        }
        if rename {
            self.rename(api, textures)?;
        }
        if delete {
            self.delete(api, textures)?;
        }
        Ok(())
    }
}
