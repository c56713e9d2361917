//! List and edit the parallax layers of the attached level.
//!
//! Edits happen on a copy (`editing_layer`) and are written back to the
//! level only on `Save`.

use crate::OUT_OF_RANGE;
use zebes_core::level::{Level, ParallaxLayer};
use zebes_core::texture::Texture;
use zebes_core::{Result, ZebesError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallaxOp {
    Create,
    Edit,
    Save,
    Delete,
    Back,
    Texture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallaxResult {
    List,
    Edit,
    Changed,
}

#[derive(Default)]
pub struct ParallaxPanel {
    selected_index: Option<usize>,
    selected_texture_index: Option<usize>,
    editing_layer: Option<ParallaxLayer>,
    texture_cache: Vec<Texture>,
}

impl ParallaxPanel {
    pub fn new(textures: Vec<Texture>) -> Self {
        let mut panel = Self::default();
        panel.set_textures(textures);
        panel
    }

    pub fn set_textures(&mut self, mut textures: Vec<Texture>) {
        textures.sort_by(|a, b| a.name.cmp(&b.name));
        self.texture_cache = textures;
        self.selected_texture_index = None;
    }

    pub fn textures(&self) -> &[Texture] {
        &self.texture_cache
    }

    pub fn reset(&mut self) {
        self.selected_index = None;
        self.selected_texture_index = None;
        self.editing_layer = None;
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected_index = index;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn select_texture(&mut self, index: Option<usize>) {
        self.selected_texture_index = index;
    }

    pub fn selected_texture_index(&self) -> Option<usize> {
        self.selected_texture_index
    }

    pub fn is_editing(&self) -> bool {
        self.editing_layer.is_some()
    }

    pub fn editing_layer(&self) -> Option<&ParallaxLayer> {
        self.editing_layer.as_ref()
    }

    pub fn editing_layer_mut(&mut self) -> Option<&mut ParallaxLayer> {
        self.editing_layer.as_mut()
    }

    fn view(&self) -> ParallaxResult {
        if self.is_editing() {
            ParallaxResult::Edit
        } else {
            ParallaxResult::List
        }
    }

    /// Texture id to preview: the layer being edited, else the selected one.
    pub fn texture(&self, level: &Level) -> Option<String> {
        let id = match &self.editing_layer {
            Some(layer) => Some(layer.texture_id.clone()),
            None => self
                .selected_index
                .and_then(|i| level.parallax_layers.get(i))
                .map(|layer| layer.texture_id.clone()),
        };
        id.filter(|id| !id.is_empty())
    }

    fn create(&mut self, level: &mut Level) -> ParallaxResult {
        let n = level.parallax_layers.len();
        let layer = ParallaxLayer::new(format!("Layer {n}"));
        level.parallax_layers.push(layer.clone());
        self.selected_index = Some(n);
        self.editing_layer = Some(layer);
        self.selected_texture_index = None;
        ParallaxResult::Changed
    }

    pub fn handle_op(&mut self, level: &mut Level, op: ParallaxOp) -> Result<ParallaxResult> {
        let index = match (op, self.selected_index) {
            (ParallaxOp::Create, _) => return Ok(self.create(level)),
            (_, None) => return Ok(self.view()),
            (_, Some(index)) => index,
        };
        if index >= level.parallax_layers.len() {
            return Err(ZebesError::internal(OUT_OF_RANGE));
        }

        match op {
            ParallaxOp::Create => Ok(self.create(level)),
            ParallaxOp::Edit => {
                let layer = level.parallax_layers[index].clone();
                self.selected_texture_index = self
                    .texture_cache
                    .iter()
                    .position(|t| t.id == layer.texture_id);
                self.editing_layer = Some(layer);
                Ok(ParallaxResult::Edit)
            }
            ParallaxOp::Save => {
                let Some(layer) = &self.editing_layer else {
                    return Ok(ParallaxResult::List);
                };
                if layer.name.is_empty() {
                    return Err(ZebesError::invalid_argument("Layer name cannot be empty"));
                }
                if layer.texture_id.is_empty() {
                    return Err(ZebesError::invalid_argument(
                        "Layer texture must be selected",
                    ));
                }
                let clash = level
                    .parallax_layers
                    .iter()
                    .enumerate()
                    .any(|(i, l)| i != index && l.name == layer.name);
                if clash {
                    return Err(ZebesError::invalid_argument(format!(
                        "Duplicate parallax layer name: {}",
                        layer.name
                    )));
                }
                level.parallax_layers[index] = layer.clone();
                self.editing_layer = None;
                Ok(ParallaxResult::Changed)
            }
            ParallaxOp::Delete => {
                level.parallax_layers.remove(index);
                self.reset();
                Ok(ParallaxResult::Changed)
            }
            ParallaxOp::Back => {
                self.editing_layer = None;
                Ok(ParallaxResult::List)
            }
            ParallaxOp::Texture => {
                let texture_id = self
                    .selected_texture_index
                    .and_then(|i| self.texture_cache.get(i))
                    .map(|t| t.id.clone());
                if let (Some(layer), Some(id)) = (self.editing_layer.as_mut(), texture_id) {
                    layer.texture_id = id;
                }
                Ok(self.view())
            }
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, level: &mut Level) -> Result<ParallaxResult> {
        ui.heading("Parallax Layers");
        let mut op = None;

        if self.is_editing() {
            self.edit_ui(ui, &mut op);
        } else {
            egui::ScrollArea::vertical()
                .id_salt("parallax_layers")
                .max_height(160.0)
                .show(ui, |ui| {
                    for (i, layer) in level.parallax_layers.iter().enumerate() {
                        let selected = self.selected_index == Some(i);
                        if ui.selectable_label(selected, layer.name.as_str()).clicked() {
                            self.selected_index = Some(i);
                        }
                    }
                });
            ui.horizontal(|ui| {
                if ui.button("New").clicked() {
                    op = Some(ParallaxOp::Create);
                }
                let has_selection = self.selected_index.is_some();
                if ui.add_enabled(has_selection, egui::Button::new("Edit")).clicked() {
                    op = Some(ParallaxOp::Edit);
                }
                if ui.add_enabled(has_selection, egui::Button::new("Delete")).clicked() {
                    op = Some(ParallaxOp::Delete);
                }
            });
        }

        match op {
            Some(op) => self.handle_op(level, op),
            None => Ok(self.view()),
        }
    }

    fn edit_ui(&mut self, ui: &mut egui::Ui, op: &mut Option<ParallaxOp>) {
        let texture_names: Vec<String> = self.texture_cache.iter().map(|t| t.name.clone()).collect();
        let mut picked = self.selected_texture_index;
        if let Some(layer) = self.editing_layer.as_mut() {
            ui.horizontal(|ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut layer.name);
            });
            ui.horizontal(|ui| {
                ui.label("Scroll");
                ui.add(egui::DragValue::new(&mut layer.scroll_factor.x).speed(0.01).prefix("x "));
                ui.add(egui::DragValue::new(&mut layer.scroll_factor.y).speed(0.01).prefix("y "));
            });
            ui.checkbox(&mut layer.repeat_x, "Repeat horizontally");

            let current = picked
                .and_then(|i| texture_names.get(i))
                .map_or("(none)", |s| s.as_str());
            egui::ComboBox::from_id_salt("parallax_texture")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for (i, name) in texture_names.iter().enumerate() {
                        ui.selectable_value(&mut picked, Some(i), name.as_str());
                    }
                });
        }
        if picked != self.selected_texture_index {
            self.selected_texture_index = picked;
            *op = Some(ParallaxOp::Texture);
        }

        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                *op = Some(ParallaxOp::Save);
            }
            if ui.button("Back").clicked() {
                *op = Some(ParallaxOp::Back);
            }
        });
    }
}
