use crate::OUT_OF_RANGE;
use zebes_core::collider::Collider;
use zebes_core::vec::Vec2;
use zebes_core::{Result, ZebesError};
use zebes_resources::Api;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColliderMode {
    #[default]
    List,
    New,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColliderOp {
    New,
    Create(String),
    Edit,
    Update,
    Delete,
    Reset,
    Back,
    Attach,
    Detach,
    AddPolygon,
    RemovePolygon(usize),
    AddVertex(usize),
    RemoveVertex(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColliderResult {
    None,
    Attach(String),
    Detach,
}

const DEFAULT_POLYGON_SIZE: f64 = 16.0;

/// Collider list plus a polygon editor for the selected collider.
#[derive(Default)]
pub struct ColliderPanel {
    mode: ColliderMode,
    collider_cache: Vec<Collider>,
    selected_index: Option<usize>,
    editing: Option<Collider>,
    attached_collider_id: Option<String>,
    new_name: String,
}

impl ColliderPanel {
    pub fn new(api: &Api) -> Self {
        let mut panel = Self::default();
        panel.refresh(api);
        panel
    }

    pub fn refresh(&mut self, api: &Api) {
        self.collider_cache = api.get_all_colliders();
        let editing_id = self.editing.as_ref().map(|c| c.id.clone());
        self.selected_index = match editing_id {
            Some(id) => self.collider_cache.iter().position(|c| c.id == id),
            None => self
                .selected_index
                .filter(|&i| i < self.collider_cache.len()),
        };
    }

    pub fn mode(&self) -> ColliderMode {
        self.mode
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.collider_cache
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected_index = index;
    }

    pub fn editing(&self) -> Option<&Collider> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut Collider> {
        self.editing.as_mut()
    }

    pub fn attached_collider_id(&self) -> Option<&str> {
        self.attached_collider_id.as_deref()
    }

    pub fn set_attached_collider(&mut self, id: Option<String>) {
        self.attached_collider_id = id.filter(|id| !id.is_empty());
    }

    /// Select and edit the collider with `id`; unknown ids fall back to the
    /// list.
    pub fn set_collider(&mut self, id: &str) {
        match self.collider_cache.iter().position(|c| c.id == id) {
            Some(i) => {
                self.selected_index = Some(i);
                self.editing = Some(self.collider_cache[i].clone());
                self.mode = ColliderMode::Edit;
            }
            None => {
                log::warn!("Collider {id} not found");
                self.selected_index = None;
                self.editing = None;
                self.mode = ColliderMode::List;
            }
        }
    }

    pub fn clear(&mut self) {
        self.mode = ColliderMode::List;
        self.selected_index = None;
        self.editing = None;
        self.attached_collider_id = None;
        self.new_name.clear();
    }

    fn selected(&self) -> Result<Option<&Collider>> {
        match self.selected_index {
            None => Ok(None),
            Some(i) => self
                .collider_cache
                .get(i)
                .map(Some)
                .ok_or_else(|| ZebesError::internal(OUT_OF_RANGE)),
        }
    }

    fn polygon_mut(&mut self, polygon: usize) -> Option<&mut Vec<Vec2>> {
        self.editing.as_mut().and_then(|c| c.polygons.get_mut(polygon))
    }

    pub fn handle_op(&mut self, api: &mut Api, op: ColliderOp) -> Result<ColliderResult> {
        match op {
            ColliderOp::New => {
                self.mode = ColliderMode::New;
                self.new_name.clear();
            }
            ColliderOp::Create(name) => {
                let id = api.create_collider(Collider {
                    id: String::new(),
                    name,
                    polygons: Vec::new(),
                })?;
                self.refresh(api);
                self.set_collider(&id);
                self.new_name.clear();
            }
            ColliderOp::Edit => {
                if let Some(collider) = self.selected()? {
                    self.editing = Some(collider.clone());
                    self.mode = ColliderMode::Edit;
                }
            }
            ColliderOp::Update => {
                if let Some(collider) = self.editing.clone() {
                    api.update_collider(collider)?;
                    self.refresh(api);
                }
            }
            ColliderOp::Delete => {
                let Some(collider) = self.selected()? else {
                    return Ok(ColliderResult::None);
                };
                let id = collider.id.clone();
                api.delete_collider(&id)?;
                let was_attached = self.attached_collider_id.as_deref() == Some(id.as_str());
                self.editing = None;
                self.selected_index = None;
                self.mode = ColliderMode::List;
                self.refresh(api);
                if was_attached {
                    self.attached_collider_id = None;
                    return Ok(ColliderResult::Detach);
                }
            }
            ColliderOp::Reset => {
                if let Some(id) = self.editing.as_ref().map(|c| c.id.clone()) {
                    self.editing = Some(api.get_collider(&id)?);
                }
            }
            ColliderOp::Back => {
                self.editing = None;
                self.mode = ColliderMode::List;
            }
            ColliderOp::Attach => {
                if let Some(id) = self.editing.as_ref().map(|c| c.id.clone()) {
                    self.attached_collider_id = Some(id.clone());
                    return Ok(ColliderResult::Attach(id));
                }
            }
            ColliderOp::Detach => {
                if self.attached_collider_id.take().is_some() {
                    return Ok(ColliderResult::Detach);
                }
            }
            ColliderOp::AddPolygon => {
                if let Some(collider) = self.editing.as_mut() {
                    let s = DEFAULT_POLYGON_SIZE;
                    collider.polygons.push(vec![
                        Vec2::new(0.0, 0.0),
                        Vec2::new(s, 0.0),
                        Vec2::new(s, s),
                        Vec2::new(0.0, s),
                    ]);
                }
            }
            ColliderOp::RemovePolygon(polygon) => {
                if let Some(collider) = self.editing.as_mut() {
                    if polygon < collider.polygons.len() {
                        collider.polygons.remove(polygon);
                    }
                }
            }
            ColliderOp::AddVertex(polygon) => {
                if let Some(points) = self.polygon_mut(polygon) {
                    let next = points
                        .last()
                        .map_or(Vec2::ZERO, |p| Vec2::new(p.x + DEFAULT_POLYGON_SIZE / 2.0, p.y));
                    points.push(next);
                }
            }
            ColliderOp::RemoveVertex(polygon, vertex) => {
                if let Some(points) = self.polygon_mut(polygon) {
                    if vertex < points.len() {
                        points.remove(vertex);
                    }
                }
            }
        }
        Ok(ColliderResult::None)
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, api: &mut Api) -> Result<ColliderResult> {
        ui.heading("Colliders");
        let mut ops = Vec::new();

        match self.mode {
            ColliderMode::List => {
                egui::ScrollArea::vertical()
                    .id_salt("collider_list")
                    .max_height(160.0)
                    .show(ui, |ui| {
                        for (i, collider) in self.collider_cache.iter().enumerate() {
                            if ui
                                .selectable_label(self.selected_index == Some(i), collider.name.as_str())
                                .clicked()
                            {
                                self.selected_index = Some(i);
                            }
                        }
                    });
                ui.horizontal(|ui| {
                    if ui.button("New").clicked() {
                        ops.push(ColliderOp::New);
                    }
                    let has = self.selected_index.is_some();
                    if ui.add_enabled(has, egui::Button::new("Edit")).clicked() {
                        ops.push(ColliderOp::Edit);
                    }
                    if ui.add_enabled(has, egui::Button::new("Delete")).clicked() {
                        ops.push(ColliderOp::Delete);
                    }
                });
            }
            ColliderMode::New => {
                ui.horizontal(|ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut self.new_name);
                });
                ui.horizontal(|ui| {
                    if ui.button("Create").clicked() {
                        ops.push(ColliderOp::Create(self.new_name.clone()));
                    }
                    if ui.button("Back").clicked() {
                        ops.push(ColliderOp::Back);
                    }
                });
            }
            ColliderMode::Edit => self.edit_ui(ui, &mut ops),
        }

        let mut result = ColliderResult::None;
        for op in ops {
            let r = self.handle_op(api, op)?;
            if r != ColliderResult::None {
                result = r;
            }
        }
        Ok(result)
    }

    fn edit_ui(&mut self, ui: &mut egui::Ui, ops: &mut Vec<ColliderOp>) {
        let attached = self.attached_collider_id.is_some();
        let Some(collider) = self.editing.as_mut() else {
            return;
        };
        ui.horizontal(|ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut collider.name);
        });
        egui::ScrollArea::vertical()
            .id_salt("collider_polygons")
            .max_height(240.0)
            .show(ui, |ui| {
                for (p, polygon) in collider.polygons.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(format!("Polygon {p}"));
                        if ui.small_button("+ vertex").clicked() {
                            ops.push(ColliderOp::AddVertex(p));
                        }
                        if ui.small_button("remove").clicked() {
                            ops.push(ColliderOp::RemovePolygon(p));
                        }
                    });
                    for (v, point) in polygon.iter_mut().enumerate() {
                        ui.horizontal(|ui| {
                            ui.add(egui::DragValue::new(&mut point.x).prefix("x "));
                            ui.add(egui::DragValue::new(&mut point.y).prefix("y "));
                            if ui.small_button("✖").clicked() {
                                ops.push(ColliderOp::RemoveVertex(p, v));
                            }
                        });
                    }
                }
            });
        if ui.button("Add Polygon").clicked() {
            ops.push(ColliderOp::AddPolygon);
        }
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                ops.push(ColliderOp::Update);
            }
            if ui.button("Reset").clicked() {
                ops.push(ColliderOp::Reset);
            }
            if ui.button("Back").clicked() {
                ops.push(ColliderOp::Back);
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Attach").clicked() {
                ops.push(ColliderOp::Attach);
            }
            if ui.add_enabled(attached, egui::Button::new("Detach")).clicked() {
                ops.push(ColliderOp::Detach);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::temp_root;
    use std::fs;
    use zebes_core::ErrorKind;

    #[test]
    fn test_create_enters_edit_mode() {
        let root = temp_root("cp_create");
        let mut api = Api::open(&root).unwrap();
        let mut panel = ColliderPanel::new(&api);
        panel.handle_op(&mut api, ColliderOp::New).unwrap();
        assert_eq!(panel.mode(), ColliderMode::New);
        panel
            .handle_op(&mut api, ColliderOp::Create("box".into()))
            .unwrap();
        assert_eq!(panel.mode(), ColliderMode::Edit);
        assert_eq!(panel.editing().unwrap().name, "box");
        assert_eq!(panel.colliders().len(), 1);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_create_with_empty_name_fails() {
        let root = temp_root("cp_empty");
        let mut api = Api::open(&root).unwrap();
        let mut panel = ColliderPanel::new(&api);
        let err = panel
            .handle_op(&mut api, ColliderOp::Create(String::new()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_polygon_editing_and_update() {
        let root = temp_root("cp_poly");
        let mut api = Api::open(&root).unwrap();
        let mut panel = ColliderPanel::new(&api);
        panel
            .handle_op(&mut api, ColliderOp::Create("box".into()))
            .unwrap();
        panel.handle_op(&mut api, ColliderOp::AddPolygon).unwrap();
        panel.handle_op(&mut api, ColliderOp::AddVertex(0)).unwrap();
        assert_eq!(panel.editing().unwrap().polygons[0].len(), 5);
        panel
            .handle_op(&mut api, ColliderOp::RemoveVertex(0, 0))
            .unwrap();
        panel
            .handle_op(&mut api, ColliderOp::RemoveVertex(3, 0))
            .unwrap();
        panel.handle_op(&mut api, ColliderOp::Update).unwrap();

        let id = panel.editing().unwrap().id.clone();
        assert_eq!(api.get_collider(&id).unwrap().polygons[0].len(), 4);

        panel.handle_op(&mut api, ColliderOp::RemovePolygon(0)).unwrap();
        panel.handle_op(&mut api, ColliderOp::Reset).unwrap();
        assert_eq!(panel.editing().unwrap().polygons.len(), 1);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_attach_detach_and_delete() {
        let root = temp_root("cp_attach");
        let mut api = Api::open(&root).unwrap();
        let mut panel = ColliderPanel::new(&api);
        panel
            .handle_op(&mut api, ColliderOp::Create("box".into()))
            .unwrap();
        let id = panel.editing().unwrap().id.clone();
        assert_eq!(
            panel.handle_op(&mut api, ColliderOp::Attach).unwrap(),
            ColliderResult::Attach(id)
        );
        assert_eq!(
            panel.handle_op(&mut api, ColliderOp::Delete).unwrap(),
            ColliderResult::Detach
        );
        assert!(panel.colliders().is_empty());
        assert_eq!(panel.mode(), ColliderMode::List);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_set_collider_and_clear() {
        let root = temp_root("cp_set");
        let mut api = Api::open(&root).unwrap();
        let id = api
            .create_collider(Collider {
                id: String::new(),
                name: "spike".into(),
                polygons: vec![],
            })
            .unwrap();
        let mut panel = ColliderPanel::new(&api);
        panel.set_collider(&id);
        assert_eq!(panel.mode(), ColliderMode::Edit);
        panel.set_attached_collider(Some(id));
        panel.clear();
        assert_eq!(panel.mode(), ColliderMode::List);
        assert!(panel.attached_collider_id().is_none());
        panel.set_collider("missing");
        assert!(panel.editing().is_none());
        let _ = fs::remove_dir_all(&root);
    }
}
