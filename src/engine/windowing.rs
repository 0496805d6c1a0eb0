use std::sync::Arc;
use std::time::Instant;

use crate::engine::graphics::{
    CpuMesh, FrameContext, MeshHandle, Renderer, TextureData, TextureHandle,
};
use crate::engine::scene::Scene;
use crate::engine::{EngineError, EngineResult};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

/// Minimal winit wrapper (ApplicationHandler style).
pub struct Windowing;

impl Windowing {
    pub fn run_app(
        scene: Scene,
        renderer: Renderer,
        mesh: CpuMesh,
        texture: Option<TextureData>,
    ) -> EngineResult<()> {
        let event_loop = EventLoop::new().map_err(|e| EngineError::Window(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App {
            window: None,
            scene,
            renderer,
            pending_mesh: Some(mesh),
            pending_texture: texture,
            mesh_handle: None,
            texture_handle: None,
            last_frame: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| EngineError::Window(e.to_string()))?;

        Ok(())
    }
}

struct App {
    window: Option<Arc<Window>>,
    scene: Scene,
    renderer: Renderer,
    pending_mesh: Option<CpuMesh>,
    pending_texture: Option<TextureData>,
    mesh_handle: Option<MeshHandle>,
    texture_handle: Option<TextureHandle>,
    last_frame: Option<Instant>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.scene.camera.resolution();
        let attrs: WindowAttributes = Window::default_attributes()
            .with_title("meshview")
            .with_inner_size(winit::dpi::LogicalSize::new(width as f64, height as f64));

        let window = event_loop
            .create_window(attrs)
            .expect("failed to create window");
        let window = Arc::new(window);

        self.renderer
            .init_for_window(&window)
            .expect("renderer init failed");

        // One-time GPU upload of the scene assets.
        if let Some(mesh) = self.pending_mesh.take() {
            let handle = self.renderer.upload_mesh(&mesh).expect("mesh upload failed");
            self.mesh_handle = Some(handle);
        }
        if let Some(texture) = self.pending_texture.take() {
            let handle = self
                .renderer
                .upload_texture_rgba8(&texture.rgba, texture.width, texture.height)
                .expect("texture upload failed");
            self.texture_handle = Some(handle);
        }

        // The camera projects into the window's actual pixel size.
        let size = window.inner_size();
        if size.width > 0 && size.height > 0 {
            self.scene.camera.set_resolution(size.width, size.height);
        }

        self.window = Some(window);
        self.last_frame = Some(Instant::now());

        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                if size.width > 0 && size.height > 0 {
                    self.scene.camera.set_resolution(size.width, size.height);
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = self
                    .last_frame
                    .replace(now)
                    .map(|prev| (now - prev).as_secs_f32())
                    .unwrap_or(0.0);

                self.scene.update(dt);

                let Some(mesh) = self.mesh_handle else {
                    return;
                };

                let frame = FrameContext {
                    model: self.scene.model.local_to_world(false).to_array(),
                    view: self.scene.camera.world_to_camera(false).to_array(),
                    proj: self.scene.camera.projection_matrix(false).to_array(),
                    mesh,
                    texture: self.texture_handle,
                };

                self.renderer.draw_frame(&frame).expect("draw failed");

                if let Some(w) = &self.window {
                    w.pre_present_notify();
                    w.request_redraw();
                }
            }

            _ => {}
        }
    }
}
