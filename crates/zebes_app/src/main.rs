//! Zebes editor entry point.
//!
//! winit drives the loop through `ApplicationHandler`. Every window event goes
//! to egui first; keys egui does not consume feed `InputState`. Each redraw:
//!
//!   1. tick the frame clock and let `CameraController` move the level camera
//!   2. run the editor UI through `EguiHost::prepare`
//!   3. clear the surface, then upload and paint the egui frame

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use zebes_core::camera_controller::CameraController;
use zebes_core::input::{InputState, Key};
use zebes_core::time::FrameClock;
use zebes_editor::{EditorUi, EguiHost};
use zebes_render::GpuContext;
use zebes_resources::Api;

const DEFAULT_ASSETS_DIR: &str = "assets";

struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    egui: EguiHost,
    api: Api,
    editor: EditorUi,
    input: InputState,
    clock: FrameClock,
    controller: CameraController,
}

impl EngineState {
    fn new(window: Arc<Window>, api: Api) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let egui = EguiHost::new(&gpu.device, gpu.surface_format, &window);
        let editor = EditorUi::new(&api);
        let camera = &api.config().camera;
        let controller = CameraController::new(camera.move_speed, camera.zoom_speed);
        Ok(Self {
            window,
            gpu,
            egui,
            api,
            editor,
            input: InputState::new(),
            clock: FrameClock::new(),
            controller,
        })
    }

    fn update(&mut self) {
        let dt = self.clock.tick();
        self.editor.set_fps(self.clock.smoothed_fps);

        if self.input.is_just_pressed(Key::F1) {
            self.editor.toggle_settings();
        }
        if !self.egui.wants_keyboard_input() {
            if let Some(camera) = self.editor.level_camera_mut() {
                self.controller.update(camera, &self.input, dt);
            }
        }
    }

    fn render(&mut self) {
        if self.gpu.size.0 == 0 || self.gpu.size.1 == 0 {
            return;
        }

        let Self {
            ref window,
            ref mut egui,
            ref mut api,
            ref mut editor,
            ..
        } = *self;
        let frame = egui.prepare(window, |ctx| editor.ui(ctx, api));

        let Some((output, view)) = self.gpu.begin_frame() else {
            self.egui.cleanup(&frame);
            return;
        };

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.gpu.clear(&mut encoder, &view);
        self.egui
            .upload(&self.gpu.device, &self.gpu.queue, &mut encoder, &frame, &screen);
        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui.paint(&mut egui_pass, &frame, &screen);
        }
        self.egui.cleanup(&frame);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    assets_dir: PathBuf,
    state: Option<EngineState>,
    frame_duration: Duration,
    next_frame: Instant,
    error: Option<String>,
}

impl App {
    fn new(assets_dir: PathBuf) -> Self {
        Self {
            assets_dir,
            state: None,
            frame_duration: Duration::from_secs_f64(1.0 / 60.0),
            next_frame: Instant::now(),
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), String> {
        let api = Api::open(&self.assets_dir)
            .map_err(|e| format!("Failed to open assets at {}: {e}", self.assets_dir.display()))?;
        log::info!("Opened assets at {}", api.root().display());
        self.frame_duration = Duration::from_secs_f64(api.config().frame_duration());
        let window = zebes_platform::create_window(event_loop, &api.config().window)?;
        self.state = Some(EngineState::new(window, api)?);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            log::error!("{e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &self.state else {
            return;
        };
        let now = Instant::now();
        if now >= self.next_frame {
            state.window.request_redraw();
            self.next_frame = now + self.frame_duration;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let egui_consumed = state.egui.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    state.gpu.resize(size.width, size.height);
                    log::debug!("Resized to {}x{}", size.width, size.height);
                }
            }

            WindowEvent::Focused(false) => state.input.release_all(),

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(key) = zebes_platform::map_key(code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(key),
                            ElementState::Released => state.input.key_up(key),
                        }
                    }
                }
                if state.input.is_just_pressed(Key::Escape) {
                    state.input.request_quit();
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } if !egui_consumed => {
                if let Some(btn) = zebes_platform::map_mouse_button(button) {
                    match button_state {
                        ElementState::Pressed => state.input.mouse_down(btn),
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.mouse_position = (position.x, position.y);
            }

            WindowEvent::RedrawRequested => {
                if state.input.quit_requested() {
                    log::info!("Quit requested, exiting.");
                    event_loop.exit();
                    return;
                }
                state.update();
                state.render();
                state.input.end_frame();
            }

            _ => {}
        }
    }
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let assets_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));
    log::info!("Zebes starting with assets at {}", assets_dir.display());

    let event_loop = EventLoop::new().map_err(|e| format!("Failed to create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(assets_dir);
    event_loop
        .run_app(&mut app)
        .map_err(|e| format!("Event loop error: {e}"))?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
