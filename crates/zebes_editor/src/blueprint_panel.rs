//! Blueprint list/editor and the per-state detail panel.

use crate::OUT_OF_RANGE;
use zebes_core::blueprint::{Blueprint, BlueprintState};
use zebes_core::{Result, ZebesError};
use zebes_resources::Api;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlueprintMode {
    #[default]
    List,
    New,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlueprintOp {
    New,
    Create(String),
    Edit,
    Update,
    Delete,
    Back,
    AddState,
    RemoveState(usize),
    OpenState(usize),
}

#[derive(Default)]
pub struct BlueprintPanel {
    mode: BlueprintMode,
    blueprint_cache: Vec<Blueprint>,
    selected_index: Option<usize>,
    editing: Option<Blueprint>,
    new_name: String,
}

impl BlueprintPanel {
    pub fn new(api: &Api) -> Self {
        let mut panel = Self::default();
        panel.refresh(api);
        panel
    }

    pub fn refresh(&mut self, api: &Api) {
        self.blueprint_cache = api.get_all_blueprints();
        let editing_id = self.editing.as_ref().map(|b| b.id.clone());
        self.selected_index = match editing_id {
            Some(id) => self.blueprint_cache.iter().position(|b| b.id == id),
            None => self
                .selected_index
                .filter(|&i| i < self.blueprint_cache.len()),
        };
    }

    pub fn mode(&self) -> BlueprintMode {
        self.mode
    }

    pub fn blueprints(&self) -> &[Blueprint] {
        &self.blueprint_cache
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected_index = index;
    }

    pub fn editing(&self) -> Option<&Blueprint> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut Blueprint> {
        self.editing.as_mut()
    }

    fn selected(&self) -> Result<Option<&Blueprint>> {
        match self.selected_index {
            None => Ok(None),
            Some(i) => self
                .blueprint_cache
                .get(i)
                .map(Some)
                .ok_or_else(|| ZebesError::internal(OUT_OF_RANGE)),
        }
    }

    /// Apply one operation. Returns the index of the state to open, if any.
    pub fn handle_op(&mut self, api: &mut Api, op: BlueprintOp) -> Result<Option<usize>> {
        match op {
            BlueprintOp::New => {
                self.mode = BlueprintMode::New;
                self.new_name.clear();
            }
            BlueprintOp::Create(name) => {
                let id = api.create_blueprint(Blueprint {
                    id: String::new(),
                    name,
                    states: vec![BlueprintState::new("Default")],
                })?;
                self.editing = Some(api.get_blueprint(&id)?);
                self.mode = BlueprintMode::Edit;
                self.new_name.clear();
                self.refresh(api);
            }
            BlueprintOp::Edit => {
                if let Some(blueprint) = self.selected()? {
                    self.editing = Some(blueprint.clone());
                    self.mode = BlueprintMode::Edit;
                }
            }
            BlueprintOp::Update => {
                if let Some(blueprint) = self.editing.clone() {
                    api.update_blueprint(blueprint)?;
                    self.refresh(api);
                }
            }
            BlueprintOp::Delete => {
                if let Some(id) = self.selected()?.map(|b| b.id.clone()) {
                    api.delete_blueprint(&id)?;
                    self.editing = None;
                    self.selected_index = None;
                    self.mode = BlueprintMode::List;
                    self.refresh(api);
                }
            }
            BlueprintOp::Back => {
                self.editing = None;
                self.mode = BlueprintMode::List;
            }
            BlueprintOp::AddState => {
                if let Some(blueprint) = self.editing.as_mut() {
                    let n = blueprint.states.len();
                    blueprint.states.push(BlueprintState::new(format!("State {n}")));
                }
            }
            BlueprintOp::RemoveState(index) => {
                if let Some(blueprint) = self.editing.as_mut() {
                    if index < blueprint.states.len() {
                        blueprint.states.remove(index);
                    }
                }
            }
            BlueprintOp::OpenState(index) => {
                let exists = self
                    .editing
                    .as_ref()
                    .is_some_and(|b| index < b.states.len());
                if exists {
                    return Ok(Some(index));
                }
            }
        }
        Ok(None)
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, api: &mut Api) -> Result<Option<usize>> {
        ui.heading("Blueprints");
        let mut ops = Vec::new();
        match self.mode {
            BlueprintMode::List => {
                egui::ScrollArea::vertical()
                    .id_salt("blueprint_list")
                    .max_height(200.0)
                    .show(ui, |ui| {
                        for (i, blueprint) in self.blueprint_cache.iter().enumerate() {
                            if ui
                                .selectable_label(
                                    self.selected_index == Some(i),
                                    blueprint.name.as_str(),
                                )
                                .clicked()
                            {
                                self.selected_index = Some(i);
                            }
                        }
                    });
                ui.horizontal(|ui| {
                    if ui.button("New").clicked() {
                        ops.push(BlueprintOp::New);
                    }
                    let has = self.selected_index.is_some();
                    if ui.add_enabled(has, egui::Button::new("Edit")).clicked() {
                        ops.push(BlueprintOp::Edit);
                    }
                    if ui.add_enabled(has, egui::Button::new("Delete")).clicked() {
                        ops.push(BlueprintOp::Delete);
                    }
                });
            }
            BlueprintMode::New => {
                ui.horizontal(|ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut self.new_name);
                });
                ui.horizontal(|ui| {
                    if ui.button("Create").clicked() {
                        ops.push(BlueprintOp::Create(self.new_name.clone()));
                    }
                    if ui.button("Back").clicked() {
                        ops.push(BlueprintOp::Back);
                    }
                });
            }
            BlueprintMode::Edit => {
                if let Some(blueprint) = self.editing.as_mut() {
                    ui.horizontal(|ui| {
                        ui.label("Name");
                        ui.text_edit_singleline(&mut blueprint.name);
                    });
                    ui.label("States");
                    for (i, state) in blueprint.states.iter().enumerate() {
                        ui.horizontal(|ui| {
                            ui.label(state.name.as_str());
                            if ui.small_button("Open").clicked() {
                                ops.push(BlueprintOp::OpenState(i));
                            }
                            if ui.small_button("Remove").clicked() {
                                ops.push(BlueprintOp::RemoveState(i));
                            }
                        });
                    }
                }
                if ui.button("Add State").clicked() {
                    ops.push(BlueprintOp::AddState);
                }
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        ops.push(BlueprintOp::Update);
                    }
                    if ui.button("Back").clicked() {
                        ops.push(BlueprintOp::Back);
                    }
                });
            }
        }

        let mut opened = None;
        for op in ops {
            if let Some(i) = self.handle_op(api, op)? {
                opened = Some(i);
            }
        }
        Ok(opened)
    }
}

/// Shows one state of the blueprint being edited.
#[derive(Default)]
pub struct BlueprintStatePanel {
    state_index: Option<usize>,
}

impl BlueprintStatePanel {
    pub fn set_state(&mut self, index: usize, blueprint: &Blueprint) {
        self.state_index = (index < blueprint.states.len()).then_some(index);
    }

    pub fn state_index(&self) -> Option<usize> {
        self.state_index
    }

    pub fn reset(&mut self) {
        self.state_index = None;
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, blueprint: &mut Blueprint) {
        let Some(state) = self.state_index.and_then(|i| blueprint.states.get_mut(i)) else {
            ui.label("No state selected");
            return;
        };
        ui.heading(format!("{} / {}", blueprint.name, state.name));
        ui.horizontal(|ui| {
            ui.label("State name");
            ui.text_edit_singleline(&mut state.name);
        });
        let show = |id: &str| {
            if id.is_empty() {
                "(none)".to_string()
            } else {
                id.to_string()
            }
        };
        ui.label(format!("Sprite: {}", show(&state.sprite_id)));
        ui.label(format!("Collider: {}", show(&state.collider_id)));
    }
}
