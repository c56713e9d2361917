//! Three-column level editor: level and parallax panels on the left, the
//! viewport or parallax preview in the middle, the inspector on the right.

use crate::level_panel::{LevelPanel, LevelResult, LevelResultKind};
use crate::parallax_panel::ParallaxPanel;
use crate::parallax_preview::ParallaxPreview;
use crate::texture_cache::TextureCache;
use crate::viewport::Viewport;
use zebes_core::camera::Camera;
use zebes_core::entity::Entity;
use zebes_core::level::{Level, TILE_SIZE};
use zebes_core::Result;
use zebes_resources::Api;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelTab {
    #[default]
    Viewport,
    ParallaxLayer,
}

/// Place a new entity on the spawn point with the next free id.
pub fn add_entity_at_spawn(level: &mut Level) -> Result<u64> {
    let id = level.next_entity_id()?;
    level.add_entity(Entity::at(id, level.spawn_point))?;
    Ok(id)
}

/// Combo box over `(id, name)` pairs with a "(none)" entry.
fn id_picker(ui: &mut egui::Ui, salt: &str, current: &mut Option<String>, options: &[(String, String)]) {
    let selected_text = current
        .as_deref()
        .and_then(|id| options.iter().find(|(oid, _)| oid == id))
        .map_or_else(
            || current.clone().unwrap_or_else(|| "(none)".to_string()),
            |(_, name)| name.clone(),
        );
    egui::ComboBox::from_id_salt(salt)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            ui.selectable_value(current, None, "(none)");
            for (id, name) in options {
                ui.selectable_value(current, Some(id.clone()), name.as_str());
            }
        });
}

pub struct LevelEditor {
    level_panel: LevelPanel,
    parallax_panel: ParallaxPanel,
    editing: Option<Level>,
    tab: LevelTab,
    viewport: Viewport,
    preview: ParallaxPreview,
    selected_entity: Option<u64>,
}

impl LevelEditor {
    pub fn new(api: &Api) -> Self {
        Self {
            level_panel: LevelPanel::new(api),
            parallax_panel: ParallaxPanel::new(api.get_all_textures()),
            editing: None,
            tab: LevelTab::Viewport,
            viewport: Viewport::default(),
            preview: ParallaxPreview::default(),
            selected_entity: None,
        }
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.viewport.canvas.camera
    }

    pub fn attached_level(&self) -> Option<&Level> {
        self.editing.as_ref()
    }

    pub fn tab(&self) -> LevelTab {
        self.tab
    }

    fn on_level_result(&mut self, api: &Api, result: LevelResult) {
        match result.kind {
            LevelResultKind::Attach => {
                self.parallax_panel.set_textures(api.get_all_textures());
                self.parallax_panel.reset();
                self.selected_entity = None;
                if let Some(level) = &self.editing {
                    let camera = &mut self.viewport.canvas.camera;
                    camera.position.x = level.width / 2.0;
                    camera.position.y = level.height / 2.0;
                }
                log::info!("Attached level {}", result.level_id);
            }
            LevelResultKind::Detach => {
                self.parallax_panel.reset();
                self.selected_entity = None;
                log::info!("Detached level {}", result.level_id);
            }
            LevelResultKind::Changed | LevelResultKind::None => {}
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, api: &mut Api, textures: &mut TextureCache) -> Result<()> {
        let mut level_result = Ok(LevelResult::default());
        let mut parallax_error = None;

        egui::SidePanel::left("level_editor_left")
            .resizable(true)
            .default_width(240.0)
            .show_inside(ui, |ui| {
                level_result = self.level_panel.ui(ui, api, &mut self.editing);
                ui.separator();
                match self.editing.as_mut() {
                    Some(level) => {
                        if let Err(e) = self.parallax_panel.ui(ui, level) {
                            parallax_error = Some(e);
                        }
                    }
                    None => self.parallax_panel.reset(),
                }
            });

        let mut details_error = None;
        egui::SidePanel::right("level_editor_details")
            .resizable(true)
            .default_width(260.0)
            .show_inside(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("level_details")
                    .show(ui, |ui| {
                        if let Err(e) = self.details_ui(ui, api) {
                            details_error = Some(e);
                        }
                    });
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, LevelTab::Viewport, "Viewport");
                ui.selectable_value(&mut self.tab, LevelTab::ParallaxLayer, "Parallax Layer");
            });
            ui.separator();
            match (self.tab, self.editing.as_mut()) {
                (_, None) => {
                    ui.label("Attach a level to edit it.");
                }
                (LevelTab::Viewport, Some(level)) => {
                    self.viewport
                        .ui(ui, api, textures, level, self.selected_entity);
                }
                (LevelTab::ParallaxLayer, Some(level)) => {
                    let texture_id = self.parallax_panel.texture(level);
                    self.preview.ui(ui, api, textures, texture_id.as_deref());
                }
            }
        });

        let level_result = level_result?;
        self.on_level_result(api, level_result);
        if let Some(e) = parallax_error.or(details_error) {
            return Err(e);
        }
        Ok(())
    }

    fn details_ui(&mut self, ui: &mut egui::Ui, api: &Api) -> Result<()> {
        ui.heading("Details");
        let Some(level) = self.editing.as_mut() else {
            ui.label("No level attached.");
            return Ok(());
        };

        let tile = TILE_SIZE as f64;
        ui.horizontal(|ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut level.name);
        });
        ui.horizontal(|ui| {
            ui.label("Size");
            ui.add(egui::DragValue::new(&mut level.width).speed(tile).range(tile..=f64::MAX));
            ui.add(egui::DragValue::new(&mut level.height).speed(tile).range(tile..=f64::MAX));
        });
        ui.horizontal(|ui| {
            ui.label("Spawn");
            ui.add(egui::DragValue::new(&mut level.spawn_point.x).prefix("x "));
            ui.add(egui::DragValue::new(&mut level.spawn_point.y).prefix("y "));
        });

        ui.separator();
        ui.label("Tiles");
        ui.horizontal(|ui| {
            ui.label("Paint index");
            ui.add(egui::DragValue::new(&mut self.viewport.selected_tile).range(0..=i32::MAX));
        });
        let textures: Vec<(String, String)> = api
            .get_all_textures()
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();
        ui.horizontal(|ui| {
            ui.label("Tileset");
            id_picker(ui, "level_tileset", &mut self.viewport.tileset_id, &textures);
        });
        ui.checkbox(&mut self.viewport.show_grid, "Show grid");

        ui.separator();
        ui.label("Entities");
        egui::ScrollArea::vertical()
            .id_salt("entity_list")
            .max_height(150.0)
            .show(ui, |ui| {
                for entity in level.entities.values() {
                    let label = format!(
                        "#{} ({:.0}, {:.0}){}",
                        entity.id,
                        entity.transform.position.x,
                        entity.transform.position.y,
                        if entity.active { "" } else { " [inactive]" }
                    );
                    if ui
                        .selectable_label(self.selected_entity == Some(entity.id), label)
                        .clicked()
                    {
                        self.selected_entity = Some(entity.id);
                    }
                }
            });

        let mut add = false;
        let mut remove = false;
        ui.horizontal(|ui| {
            add = ui.button("Add Entity").clicked();
            remove = ui
                .add_enabled(self.selected_entity.is_some(), egui::Button::new("Remove"))
                .clicked();
        });
        if add {
            self.selected_entity = Some(add_entity_at_spawn(level)?);
        }
        if remove {
            if let Some(id) = self.selected_entity.take() {
                level.remove_entity(id);
            }
        }

        let Some(entity) = self.selected_entity.and_then(|id| level.entity_mut(id)) else {
            return Ok(());
        };
        ui.separator();
        ui.label(format!("Entity #{}", entity.id));
        ui.checkbox(&mut entity.active, "Active");
        ui.horizontal(|ui| {
            ui.label("Position");
            ui.add(egui::DragValue::new(&mut entity.transform.position.x).prefix("x "));
            ui.add(egui::DragValue::new(&mut entity.transform.position.y).prefix("y "));
        });
        ui.horizontal(|ui| {
            ui.label("Rotation");
            ui.add(egui::DragValue::new(&mut entity.transform.rotation).speed(0.01));
        });
        ui.horizontal(|ui| {
            ui.label("Velocity");
            ui.add(egui::DragValue::new(&mut entity.body.velocity.x).prefix("x "));
            ui.add(egui::DragValue::new(&mut entity.body.velocity.y).prefix("y "));
        });
        ui.horizontal(|ui| {
            ui.label("Acceleration");
            ui.add(egui::DragValue::new(&mut entity.body.acceleration.x).prefix("x "));
            ui.add(egui::DragValue::new(&mut entity.body.acceleration.y).prefix("y "));
        });
        ui.horizontal(|ui| {
            ui.label("Mass");
            ui.add(egui::DragValue::new(&mut entity.body.mass).speed(0.1).range(0.0..=f64::MAX));
            ui.checkbox(&mut entity.body.is_static, "Static");
        });
        ui.horizontal(|ui| {
            ui.label("Frame");
            ui.add(egui::DragValue::new(&mut entity.current_frame_index).range(0..=i32::MAX));
        });

        let sprites: Vec<(String, String)> = api
            .get_all_sprites()
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        let colliders: Vec<(String, String)> = api
            .get_all_colliders()
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        ui.horizontal(|ui| {
            ui.label("Sprite");
            id_picker(ui, "entity_sprite", &mut entity.sprite_id, &sprites);
        });
        ui.horizontal(|ui| {
            ui.label("Collider");
            id_picker(ui, "entity_collider", &mut entity.collider_id, &colliders);
        });
        Ok(())
    }
}
