//! Top-level editor shell: tab bar, the active editor and a status line.

use crate::blueprint_editor::BlueprintEditor;
use crate::config_editor::ConfigEditor;
use crate::level_editor::LevelEditor;
use crate::sprite_editor::SpriteEditor;
use crate::texture_cache::TextureCache;
use crate::texture_editor::TextureEditor;
use zebes_core::camera::Camera;
use zebes_core::{ErrorKind, Result, ZebesError};
use zebes_resources::Api;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTab {
    Texture,
    Sprite,
    Blueprint,
    #[default]
    Level,
    Config,
}

impl EditorTab {
    pub const ALL: [EditorTab; 5] = [
        EditorTab::Texture,
        EditorTab::Sprite,
        EditorTab::Blueprint,
        EditorTab::Level,
        EditorTab::Config,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditorTab::Texture => "Texture",
            EditorTab::Sprite => "Sprite",
            EditorTab::Blueprint => "Blueprint",
            EditorTab::Level => "Level",
            EditorTab::Config => "Config",
        }
    }
}

pub struct EditorUi {
    tab: EditorTab,
    texture_editor: TextureEditor,
    sprite_editor: SpriteEditor,
    blueprint_editor: BlueprintEditor,
    level_editor: LevelEditor,
    config_editor: ConfigEditor,
    textures: TextureCache,
    status: Option<String>,
    settings_visible: bool,
    fps: f64,
}

impl EditorUi {
    pub fn new(api: &Api) -> Self {
        Self {
            tab: EditorTab::default(),
            texture_editor: TextureEditor::new(),
            sprite_editor: SpriteEditor::new(api),
            blueprint_editor: BlueprintEditor::new(api),
            level_editor: LevelEditor::new(api),
            config_editor: ConfigEditor::new(api),
            textures: TextureCache::new(),
            status: None,
            settings_visible: false,
            fps: 0.0,
        }
    }

    pub fn tab(&self) -> EditorTab {
        self.tab
    }

    /// Switch tabs. List-based editors are rebuilt so they pick up changes
    /// made in other tabs; the level editor keeps its attached level.
    pub fn set_tab(&mut self, api: &Api, tab: EditorTab) {
        if tab == self.tab {
            return;
        }
        self.tab = tab;
        match tab {
            EditorTab::Sprite | EditorTab::Blueprint | EditorTab::Config => {
                self.rebuild(api, tab)
            }
            EditorTab::Texture | EditorTab::Level => {}
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.fps = fps;
    }

    pub fn toggle_settings(&mut self) {
        self.settings_visible = !self.settings_visible;
        log::info!(
            "Settings window: {}",
            if self.settings_visible { "ON" } else { "OFF" }
        );
    }

    pub fn settings_visible(&self) -> bool {
        self.settings_visible
    }

    /// Camera of the level viewport, when the level tab is showing.
    pub fn level_camera_mut(&mut self) -> Option<&mut Camera> {
        if self.tab == EditorTab::Level {
            Some(self.level_editor.camera_mut())
        } else {
            None
        }
    }

    pub fn level_editor(&self) -> &LevelEditor {
        &self.level_editor
    }

    fn rebuild(&mut self, api: &Api, tab: EditorTab) {
        match tab {
            EditorTab::Texture => {
                self.texture_editor = TextureEditor::new();
                self.textures.clear();
            }
            EditorTab::Sprite => self.sprite_editor = SpriteEditor::new(api),
            EditorTab::Blueprint => self.blueprint_editor = BlueprintEditor::new(api),
            EditorTab::Level => self.level_editor = LevelEditor::new(api),
            EditorTab::Config => self.config_editor = ConfigEditor::new(api),
        }
    }

    /// Record the outcome of one frame of the active editor. Errors land in
    /// the status line; internal errors also rebuild the editor since its
    /// state can no longer be trusted.
    pub fn report(&mut self, api: &Api, result: Result<()>) {
        let Err(err) = result else {
            return;
        };
        self.report_error(api, &err);
    }

    fn report_error(&mut self, api: &Api, err: &ZebesError) {
        match err.kind() {
            ErrorKind::Internal => {
                log::error!("{} editor failed: {err}", self.tab.label());
                self.rebuild(api, self.tab);
            }
            ErrorKind::NotFound | ErrorKind::InvalidArgument | ErrorKind::FailedPrecondition => {
                log::warn!("{err}");
            }
        }
        self.status = Some(err.message().to_string());
    }

    pub fn ui(&mut self, ctx: &egui::Context, api: &mut Api) {
        let mut picked = self.tab;
        egui::TopBottomPanel::top("editor_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in EditorTab::ALL {
                    ui.selectable_value(&mut picked, tab, tab.label());
                }
            });
        });
        if picked != self.tab {
            self.set_tab(api, picked);
        }

        let mut dismiss = false;
        egui::TopBottomPanel::bottom("editor_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{:.0} fps", self.fps));
                ui.separator();
                match &self.status {
                    Some(status) => {
                        ui.colored_label(egui::Color32::LIGHT_RED, status.as_str());
                        dismiss = ui.small_button("x").clicked();
                    }
                    None => {
                        ui.label("Ready");
                    }
                }
            });
        });
        if dismiss {
            self.clear_status();
        }

        let mut result = Ok(());
        egui::CentralPanel::default().show(ctx, |ui| {
            result = match self.tab {
                EditorTab::Texture => self.texture_editor.ui(ui, api, &mut self.textures),
                EditorTab::Sprite => self.sprite_editor.ui(ui, api, &mut self.textures),
                EditorTab::Blueprint => self.blueprint_editor.ui(ui, api, &mut self.textures),
                EditorTab::Level => self.level_editor.ui(ui, api, &mut self.textures),
                EditorTab::Config => self.config_editor.ui(ui, api),
            };
        });
        self.report(api, result);

        if self.settings_visible {
            let mut open = true;
            egui::Window::new("Settings")
                .open(&mut open)
                .default_pos([10.0, 40.0])
                .show(ctx, |ui| ctx.settings_ui(ui));
            self.settings_visible = open;
        }
    }
}
