//! Level list with create/attach/save/reset/delete.
//!
//! "Attached" means a copy of the level is loaded into the editor for
//! editing. The copy only reaches disk through `Update`.

use crate::OUT_OF_RANGE;
use zebes_core::level::{Level, TILE_SIZE};
use zebes_core::{Result, ZebesError};
use zebes_resources::Api;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOp {
    Create,
    Attach,
    Update,
    Reset,
    Delete,
    Detach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelResultKind {
    #[default]
    None,
    Changed,
    Attach,
    Detach,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelResult {
    pub kind: LevelResultKind,
    pub level_id: String,
}

impl LevelResult {
    fn new(kind: LevelResultKind, level_id: impl Into<String>) -> Self {
        Self {
            kind,
            level_id: level_id.into(),
        }
    }
}

/// Round down to a whole number of tiles, at least one tile.
fn snap_to_tiles(v: f64) -> f64 {
    let tile = TILE_SIZE as f64;
    ((v / tile).floor() * tile).max(tile)
}

#[derive(Default)]
pub struct LevelPanel {
    level_cache: Vec<Level>,
    selected_index: Option<usize>,
}

impl LevelPanel {
    pub fn new(api: &Api) -> Self {
        let mut panel = Self::default();
        panel.refresh(api);
        panel
    }

    pub fn refresh(&mut self, api: &Api) {
        self.level_cache = api.get_all_levels();
        if self
            .selected_index
            .is_some_and(|i| i >= self.level_cache.len())
        {
            self.selected_index = None;
        }
    }

    pub fn levels(&self) -> &[Level] {
        &self.level_cache
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected_index = index;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    fn select_id(&mut self, id: &str) {
        self.selected_index = self.level_cache.iter().position(|l| l.id == id);
    }

    fn selected_level(&self) -> Result<Option<&Level>> {
        match self.selected_index {
            None => Ok(None),
            Some(i) => self
                .level_cache
                .get(i)
                .map(Some)
                .ok_or_else(|| ZebesError::internal(OUT_OF_RANGE)),
        }
    }

    fn unique_name(&self) -> String {
        let mut n = self.level_cache.len();
        loop {
            let name = format!("Level {n}");
            if !self.level_cache.iter().any(|l| l.name == name) {
                return name;
            }
            n += 1;
        }
    }

    pub fn handle_op(
        &mut self,
        api: &mut Api,
        editing: &mut Option<Level>,
        op: LevelOp,
    ) -> Result<LevelResult> {
        match op {
            LevelOp::Create => {
                let bounds = &api.config().boundaries;
                let mut level = Level::new(self.unique_name());
                level.width = snap_to_tiles(bounds.max_x - bounds.min_x);
                level.height = snap_to_tiles(bounds.max_y - bounds.min_y);
                let id = api.create_level(level)?;
                self.refresh(api);
                self.select_id(&id);
                log::info!("Created level {id}");
                Ok(LevelResult::new(LevelResultKind::Changed, id))
            }
            LevelOp::Attach => {
                let Some(level) = self.selected_level()? else {
                    return Ok(LevelResult::default());
                };
                let id = level.id.clone();
                *editing = Some(level.clone());
                Ok(LevelResult::new(LevelResultKind::Attach, id))
            }
            LevelOp::Update => {
                let Some(level) = editing.as_ref() else {
                    return Ok(LevelResult::default());
                };
                api.save_level(level)?;
                let id = level.id.clone();
                self.refresh(api);
                self.select_id(&id);
                Ok(LevelResult::new(LevelResultKind::Changed, id))
            }
            LevelOp::Reset => {
                let Some(level) = editing.as_ref() else {
                    return Ok(LevelResult::default());
                };
                let fresh = api.get_level(&level.id)?;
                let id = fresh.id.clone();
                *editing = Some(fresh);
                Ok(LevelResult::new(LevelResultKind::Changed, id))
            }
            LevelOp::Delete => {
                let Some(level) = self.selected_level()? else {
                    return Ok(LevelResult::default());
                };
                let id = level.id.clone();
                api.delete_level(&id)?;
                self.selected_index = None;
                self.refresh(api);
                if editing.as_ref().is_some_and(|l| l.id == id) {
                    *editing = None;
                    return Ok(LevelResult::new(LevelResultKind::Detach, id));
                }
                Ok(LevelResult::new(LevelResultKind::Changed, id))
            }
            LevelOp::Detach => match editing.take() {
                Some(level) => Ok(LevelResult::new(LevelResultKind::Detach, level.id)),
                None => Ok(LevelResult::default()),
            },
        }
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        api: &mut Api,
        editing: &mut Option<Level>,
    ) -> Result<LevelResult> {
        ui.heading("Levels");
        let attached_id = editing.as_ref().map(|l| l.id.clone());

        egui::ScrollArea::vertical()
            .id_salt("level_list")
            .max_height(200.0)
            .show(ui, |ui| {
                for (i, level) in self.level_cache.iter().enumerate() {
                    let marker = if attached_id.as_deref() == Some(level.id.as_str()) {
                        "● "
                    } else {
                        ""
                    };
                    let label = format!("{marker}{}", level.name);
                    if ui
                        .selectable_label(self.selected_index == Some(i), label)
                        .clicked()
                    {
                        self.selected_index = Some(i);
                    }
                }
            });

        let mut op = None;
        let has_selection = self.selected_index.is_some();
        let attached = attached_id.is_some();
        ui.horizontal(|ui| {
            if ui.button("New").clicked() {
                op = Some(LevelOp::Create);
            }
            if ui.add_enabled(has_selection, egui::Button::new("Attach")).clicked() {
                op = Some(LevelOp::Attach);
            }
            if ui.add_enabled(has_selection, egui::Button::new("Delete")).clicked() {
                op = Some(LevelOp::Delete);
            }
        });
        ui.horizontal(|ui| {
            if ui.add_enabled(attached, egui::Button::new("Save")).clicked() {
                op = Some(LevelOp::Update);
            }
            if ui.add_enabled(attached, egui::Button::new("Reset")).clicked() {
                op = Some(LevelOp::Reset);
            }
            if ui.add_enabled(attached, egui::Button::new("Detach")).clicked() {
                op = Some(LevelOp::Detach);
            }
        });

        match op {
            Some(op) => self.handle_op(api, editing, op),
            None => Ok(LevelResult::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::temp_root;
    use std::fs;
    use zebes_core::ErrorKind;

    #[test]
    fn test_create_uses_unique_name_and_selects() {
        let root = temp_root("lp_create");
        let mut api = Api::open(&root).unwrap();
        let mut panel = LevelPanel::new(&api);
        let mut editing = None;

        let first = panel.handle_op(&mut api, &mut editing, LevelOp::Create).unwrap();
        assert_eq!(first.kind, LevelResultKind::Changed);
        assert_eq!(panel.levels()[0].name, "Level 0");
        assert_eq!(panel.selected_index(), Some(0));

        panel.handle_op(&mut api, &mut editing, LevelOp::Create).unwrap();
        let names: Vec<_> = panel.levels().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Level 0", "Level 1"]);
        assert_eq!(panel.levels()[0].width % TILE_SIZE as f64, 0.0);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_unique_name_skips_taken_numbers() {
        let root = temp_root("lp_unique");
        let mut api = Api::open(&root).unwrap();
        let mut level = Level::new("Level 1");
        level.width = 16.0;
        level.height = 16.0;
        api.create_level(level).unwrap();
        let mut panel = LevelPanel::new(&api);
        let mut editing = None;
        panel.handle_op(&mut api, &mut editing, LevelOp::Create).unwrap();
        assert!(panel.levels().iter().any(|l| l.name == "Level 2"));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_attach_update_reset_detach() {
        let root = temp_root("lp_cycle");
        let mut api = Api::open(&root).unwrap();
        let mut panel = LevelPanel::new(&api);
        let mut editing = None;
        let created = panel.handle_op(&mut api, &mut editing, LevelOp::Create).unwrap();

        let attach = panel.handle_op(&mut api, &mut editing, LevelOp::Attach).unwrap();
        assert_eq!(attach.kind, LevelResultKind::Attach);
        assert_eq!(attach.level_id, created.level_id);

        editing.as_mut().unwrap().set_tile(1, 1, 9);
        panel.handle_op(&mut api, &mut editing, LevelOp::Update).unwrap();
        assert_eq!(api.get_level(&created.level_id).unwrap().tile(1, 1), 9);

        editing.as_mut().unwrap().set_tile(2, 2, 5);
        panel.handle_op(&mut api, &mut editing, LevelOp::Reset).unwrap();
        assert_eq!(editing.as_ref().unwrap().tile(2, 2), 0);
        assert_eq!(editing.as_ref().unwrap().tile(1, 1), 9);

        let detach = panel.handle_op(&mut api, &mut editing, LevelOp::Detach).unwrap();
        assert_eq!(detach.kind, LevelResultKind::Detach);
        assert!(editing.is_none());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_ops_without_selection_or_attachment() {
        let root = temp_root("lp_noop");
        let mut api = Api::open(&root).unwrap();
        let mut panel = LevelPanel::new(&api);
        let mut editing = None;
        for op in [
            LevelOp::Attach,
            LevelOp::Delete,
            LevelOp::Update,
            LevelOp::Reset,
            LevelOp::Detach,
        ] {
            let result = panel.handle_op(&mut api, &mut editing, op).unwrap();
            assert_eq!(result.kind, LevelResultKind::None);
        }
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_delete_attached_level_detaches() {
        let root = temp_root("lp_delete");
        let mut api = Api::open(&root).unwrap();
        let mut panel = LevelPanel::new(&api);
        let mut editing = None;
        panel.handle_op(&mut api, &mut editing, LevelOp::Create).unwrap();
        panel.handle_op(&mut api, &mut editing, LevelOp::Attach).unwrap();

        let result = panel.handle_op(&mut api, &mut editing, LevelOp::Delete).unwrap();
        assert_eq!(result.kind, LevelResultKind::Detach);
        assert!(editing.is_none());
        assert!(panel.levels().is_empty());
        assert_eq!(panel.selected_index(), None);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_invalid_save_is_reported() {
        let root = temp_root("lp_invalid");
        let mut api = Api::open(&root).unwrap();
        let mut panel = LevelPanel::new(&api);
        let mut editing = None;
        panel.handle_op(&mut api, &mut editing, LevelOp::Create).unwrap();
        panel.handle_op(&mut api, &mut editing, LevelOp::Attach).unwrap();
        editing.as_mut().unwrap().width = 17.0;
        let err = panel
            .handle_op(&mut api, &mut editing, LevelOp::Update)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_stale_selection_is_internal() {
        let root = temp_root("lp_stale");
        let mut api = Api::open(&root).unwrap();
        let mut panel = LevelPanel::new(&api);
        let mut editing = None;
        panel.select(Some(4));
        let err = panel
            .handle_op(&mut api, &mut editing, LevelOp::Attach)
            .unwrap_err();
        assert_eq!(err.message(), OUT_OF_RANGE);
        let _ = fs::remove_dir_all(&root);
    }
}
