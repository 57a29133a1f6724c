//! Application shell
//!
//! Owns the winit event loop and wires the per-frame flow: run the UI
//! panel, apply the actions it requested, sync settings into the scene,
//! then render the frame with the UI overlay on top.

use anyhow::Context as _;
use cgmath::Vector3;
use std::path::Path;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::export;
use crate::gfx::{
    camera::{
        camera_controller::CameraController, camera_utils::CameraManager, orbit_camera::OrbitCamera,
    },
    rendering::render_engine::RenderEngine,
    scene::Scene,
};
use crate::settings::StudioSettings;
use crate::ui::{studio_panel, PanelState, UiAction, UiManager};

pub struct BoxShotApp {
    event_loop: Option<EventLoop<()>>,
    pub app_state: AppState,
}

pub struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    pub scene: Scene,
    pub settings: StudioSettings,
    panel_state: PanelState,
}

impl BoxShotApp {
    /// Creates a new studio application with default settings
    pub async fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let settings = StudioSettings::default();

        let mut camera = OrbitCamera::new(5.0, 0.3, 0.2, Vector3::new(0.0, 0.0, 0.0), 1.5);
        let [x, y, z] = settings.camera.preset.eye();
        camera.aim_from(Vector3::new(x, y, z));
        camera.set_fov_degrees(settings.camera.fov_degrees);
        let controller = CameraController::new(0.005, 0.1);

        let camera_manager = CameraManager::new(camera, controller);
        let scene = Scene::new(camera_manager);
        let panel_state = PanelState::new(&settings);

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                settings,
                panel_state,
            },
        }
    }

    /// Runs the application (consumes self and starts the event loop)
    pub fn run(mut self) -> Result<(), winit::error::EventLoopError> {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title("Box Shot Studio")
            .with_inner_size(winit::dpi::LogicalSize::new(1200, 800));

        if let Ok(window) = event_loop.create_window(attributes) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();

            let window_clone = window_handle.clone();
            let renderer =
                pollster::block_on(
                    async move { RenderEngine::new(window_clone, width, height).await },
                );

            self.scene
                .camera_manager
                .camera
                .resize_projection(width, height);
            self.scene.rebuild_box(renderer.device(), &self.settings);
            renderer.update_materials(&mut self.scene);
            self.settings.export.derive_height(width, height);
            self.panel_state.export_path = export::default_file_name(&self.settings);

            let ui_manager = UiManager::new(
                renderer.device(),
                renderer.queue(),
                renderer.surface_format(),
                &window_handle,
            );

            self.ui_manager = Some(ui_manager);
            self.render_engine = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Handle UI input first
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(window, &ui_event) {
                // UI consumed the event
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if matches!(
                    event.physical_key,
                    winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape)
                ) {
                    event_loop.exit();
                    return;
                }
                self.scene.camera_manager.process_keyboard_event(&event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(ui_manager) = self.ui_manager.as_mut() else {
                    return;
                };

                let viewport = render_engine.surface_size();
                let settings = &mut self.settings;
                let panel_state = &mut self.panel_state;
                let scene = &mut self.scene;

                let mut actions: Vec<UiAction> = Vec::new();
                ui_manager.update_logic(window, |ui| {
                    studio_panel(ui, settings, panel_state, &mut actions, viewport);
                });

                apply_actions(actions, render_engine, scene, settings, panel_state);

                scene.sync(settings);
                scene.update();
                render_engine.update_materials(scene);
                render_engine.update(scene.camera_manager.camera.uniform, &scene.lights);

                render_engine.render_frame(
                    scene,
                    &settings.background,
                    Some(|device: &wgpu::Device, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView| {
                        ui_manager.render_display_only(device, queue, encoder, view);
                    }),
                );
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Don't steal camera input from the UI
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            let io = ui_manager.context.io();
            if io.want_capture_mouse || io.want_capture_keyboard {
                return;
            }
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

/// Applies the actions collected by the panel this frame
fn apply_actions(
    actions: Vec<UiAction>,
    engine: &mut RenderEngine,
    scene: &mut Scene,
    settings: &mut StudioSettings,
    panel_state: &mut PanelState,
) {
    for action in actions {
        match action {
            UiAction::RebuildBox => {
                scene.rebuild_box(engine.device(), settings);
            }
            UiAction::ApplyCameraPreset => {
                let [x, y, z] = settings.camera.preset.eye();
                scene.camera_manager.camera.aim_from(Vector3::new(x, y, z));
            }
            UiAction::LoadFaceTexture { face, path } => match load_rgba(&path) {
                Ok((data, width, height)) => {
                    engine.load_face_texture(scene, face, &data, width, height);
                    panel_state.status =
                        Some(format!("Loaded {} face texture: {}", face.label(), path));
                }
                Err(err) => {
                    log::warn!("face texture load failed: {err:#}");
                    panel_state.status = Some(format!("Could not load {path}: {err}"));
                }
            },
            UiAction::LoadBackdrop { path } => match load_rgba(&path) {
                Ok((data, width, height)) => {
                    engine.set_backdrop_image(&data, width, height);
                    settings.background.use_image = true;
                    panel_state.status = Some(format!("Loaded backdrop: {path}"));
                }
                Err(err) => {
                    log::warn!("backdrop load failed: {err:#}");
                    panel_state.status = Some(format!("Could not load {path}: {err}"));
                }
            },
            UiAction::ClearBackdrop => {
                engine.clear_backdrop_image();
                settings.background.use_image = false;
            }
            UiAction::ExportImage { path } => {
                match export::export_png(engine, scene, settings, Path::new(&path)) {
                    Ok(written) => {
                        panel_state.status = Some(format!("Saved {}", written.display()));
                    }
                    Err(err) => {
                        log::error!("export failed: {err}");
                        panel_state.status = Some(format!("Export failed: {err}"));
                    }
                }
            }
        }
    }
}

/// Decodes an image file into RGBA8 pixels
fn load_rgba(path: &str) -> anyhow::Result<(Vec<u8>, u32, u32)> {
    let image = image::open(path)
        .with_context(|| format!("failed to open image {path}"))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok((image.into_raw(), width, height))
}
