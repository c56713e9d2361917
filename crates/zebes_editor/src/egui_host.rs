//! Runs egui on top of the wgpu surface.
//!
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>` while
//! `begin_render_pass` borrows the encoder, so a frame goes through four
//! steps:
//!
//!   1. `prepare()` runs the UI closure and tessellates the output
//!   2. `upload()` pushes texture and buffer updates through the encoder
//!   3. `paint()` draws into a pass created with `forget_lifetime()`
//!   4. `cleanup()` frees textures egui dropped this frame

use winit::window::Window;

/// One tessellated egui frame waiting to be uploaded and painted.
pub struct EguiFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
}

pub struct EguiHost {
    ctx: egui::Context,
    winit_state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl EguiHost {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let winit_state = egui_winit::State::new(
            ctx.clone(),
            ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);
        Self {
            ctx,
            winit_state,
            renderer,
        }
    }

    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    /// Feed a window event to egui. Returns true when egui consumed it and
    /// the game should not see it.
    pub fn handle_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    /// True while a text field or other widget has keyboard focus.
    pub fn wants_keyboard_input(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    pub fn prepare(&mut self, window: &Window, run_ui: impl FnMut(&egui::Context)) -> EguiFrame {
        let raw_input = self.winit_state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, run_ui);
        self.winit_state
            .handle_platform_output(window, full_output.platform_output);
        let primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        EguiFrame {
            primitives,
            textures_delta: full_output.textures_delta,
        }
    }

    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &EguiFrame,
        screen: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &frame.primitives, screen);
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        frame: &EguiFrame,
        screen: &egui_wgpu::ScreenDescriptor,
    ) {
        self.renderer.render(render_pass, &frame.primitives, screen);
    }

    pub fn cleanup(&mut self, frame: &EguiFrame) {
        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
