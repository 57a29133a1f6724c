//! WGPU-based render engine for the box-shot studio
//!
//! Owns the surface, depth buffer, pipelines and global uniforms. Two entry
//! points: [`RenderEngine::render_frame`] draws into the window surface with
//! an optional UI overlay, [`RenderEngine::render_offscreen`] draws into an
//! offscreen texture at an arbitrary size and reads the pixels back for PNG
//! export.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    camera::camera_utils::CameraUniform,
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightRig},
        material::material_layout,
        texture_resource::TextureResource,
    },
    scene::{object::DrawMesh, scene::Scene},
};
use crate::settings::BackgroundSettings;
use crate::wgpu_utils::binding_builder::BindGroupLayoutWithDesc;

use super::backdrop::BackdropLayer;
use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::{padded_bytes_per_row, unpad_rows, CaptureError, CapturedFrame};

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    material_layout: BindGroupLayoutWithDesc,
    pub backdrop: BackdropLayer,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Panics
    /// Panics if unable to create a wgpu adapter or device
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> RenderEngine {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to request adapter!");

        let (device, queue) = {
            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("WGPU Device"),
                    required_features: wgpu::Features::default(),
                    required_limits: wgpu::Limits {
                        max_texture_dimension_2d: 8192,
                        ..wgpu::Limits::downlevel_defaults()
                    },
                    memory_hints: wgpu::MemoryHints::default(),
                    trace: wgpu::Trace::Off,
                })
                .await
                .expect("Failed to request a device!")
        };

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, width, height, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let material_layout = material_layout(&device);
        let backdrop = BackdropLayer::new(&device);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("phong", include_str!("phong.wgsl"));
        pipeline_manager.load_shader("backdrop", include_str!("backdrop.wgsl"));

        pipeline_manager.register_pipeline(
            "Faces",
            PipelineConfig::default()
                .with_label("FACES")
                .with_shader("phong")
                .with_depth(TextureResource::DEPTH_FORMAT)
                .with_color_format(format)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    material_layout.layout.clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            "Backdrop",
            PipelineConfig::default()
                .with_label("BACKDROP")
                .with_shader("backdrop")
                .with_depth_read_only(TextureResource::DEPTH_FORMAT)
                .with_color_format(format)
                .with_cull_mode(None)
                .with_no_vertex_buffers()
                .with_bind_group_layouts(vec![backdrop.bind_group_layout().clone()]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in &errors {
                log::error!("{error}");
            }
            panic!("Failed to create render pipelines");
        }

        RenderEngine {
            device: device_handle,
            config,
            format,
            surface,
            queue: queue_handle,
            depth_texture,
            pipeline_manager,
            global_bindings,
            global_ubo,
            material_layout,
            backdrop,
        }
    }

    /// Updates the camera and light uniform buffer
    ///
    /// Should be called each frame after the scene has synced its settings.
    pub fn update(&mut self, camera_uniform: CameraUniform, lights: &LightRig) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, lights);
    }

    /// Uploads pending material changes to the GPU
    pub fn update_materials(&self, scene: &mut Scene) {
        scene
            .materials
            .update_gpu_resources(&self.material_layout, &self.device, &self.queue);
    }

    /// Replaces one face's texture with decoded RGBA image data
    pub fn load_face_texture(
        &self,
        scene: &mut Scene,
        face: crate::gfx::geometry::Face,
        data: &[u8],
        width: u32,
        height: u32,
    ) {
        scene.materials.material_mut(face).set_texture(
            &self.material_layout,
            &self.device,
            &self.queue,
            data,
            width,
            height,
        );
    }

    /// Uploads a backdrop image to draw behind the box
    pub fn set_backdrop_image(&mut self, data: &[u8], width: u32, height: u32) {
        self.backdrop
            .set_image(&self.device, &self.queue, data, width, height);
    }

    /// Drops the backdrop image
    pub fn clear_backdrop_image(&mut self) {
        self.backdrop.clear_image();
    }

    /// Renders a frame into the window surface with an optional UI overlay
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        background: &BackgroundSettings,
        ui_callback: Option<F>,
    ) where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.backdrop
            .update_scale(&self.queue, self.config.width, self.config.height);

        let surface_texture = self
            .surface
            .get_current_texture()
            .expect("Failed to get surface texture!");

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        Self::record_scene_pass(
            &mut encoder,
            &self.pipeline_manager,
            &self.global_bindings,
            &self.backdrop,
            &surface_texture_view,
            &self.depth_texture.view,
            scene,
            background,
        );

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Renders the scene into an offscreen texture and reads the pixels back
    ///
    /// Used by PNG export: the caller has already pointed the camera at the
    /// export aspect ratio; this renders one frame at `width` x `height` and
    /// returns tightly packed RGBA pixels.
    pub fn render_offscreen(
        &mut self,
        scene: &Scene,
        background: &BackgroundSettings,
        width: u32,
        height: u32,
    ) -> Result<CapturedFrame, CaptureError> {
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let color_texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Export Color Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture =
            TextureResource::create_depth_texture(&self.device, width, height, "export_depth");

        self.backdrop.update_scale(&self.queue, width, height);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Export Encoder"),
            });

        Self::record_scene_pass(
            &mut encoder,
            &self.pipeline_manager,
            &self.global_bindings,
            &self.backdrop,
            &color_view,
            &depth_texture.view,
            scene,
            background,
        );

        let bytes_per_row = padded_bytes_per_row(width);
        let readback_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Export Readback Buffer"),
            size: bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &color_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            extent,
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = readback_buffer.slice(..);
        let (sender, receiver) = futures::channel::oneshot::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::PollType::Wait)?;
        pollster::block_on(receiver).map_err(|_| CaptureError::ChannelClosed)??;

        let mapped = buffer_slice.get_mapped_range();
        let mut rgba = unpad_rows(&mapped, width, height, bytes_per_row);
        drop(mapped);
        readback_buffer.unmap();

        // Surface formats are commonly BGRA; PNG wants RGBA.
        if matches!(
            self.format,
            TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb
        ) {
            for pixel in rgba.chunks_exact_mut(4) {
                pixel.swap(0, 2);
            }
        }

        Ok(CapturedFrame {
            width,
            height,
            rgba,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn record_scene_pass(
        encoder: &mut wgpu::CommandEncoder,
        pipeline_manager: &PipelineManager,
        global_bindings: &GlobalBindings,
        backdrop: &BackdropLayer,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        scene: &Scene,
        background: &BackgroundSettings,
    ) {
        let clear_color = if background.transparent {
            wgpu::Color::TRANSPARENT
        } else {
            wgpu::Color {
                r: background.color[0] as f64,
                g: background.color[1] as f64,
                b: background.color[2] as f64,
                a: 1.0,
            }
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        // Backdrop image first; transparency wins over the image.
        let draw_backdrop = background.use_image && !background.transparent;
        if draw_backdrop {
            if let (Some(pipeline), Some(bind_group)) = (
                pipeline_manager.get_pipeline("Backdrop"),
                backdrop.bind_group(),
            ) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, bind_group, &[]);
                render_pass.draw(0..6, 0..1);
            }
        }

        if let Some(pipeline) = pipeline_manager.get_pipeline("Faces") {
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, global_bindings.bind_group(), &[]);

            for plate in &scene.faces {
                let material = scene.materials.material(plate.face);
                if let Some(material_bind_group) = material.bind_group() {
                    render_pass.set_bind_group(1, material_bind_group, &[]);
                    render_pass.draw_mesh(&plate.mesh);
                } else {
                    log::warn!(
                        "skipping {} face: material has no GPU resources",
                        plate.face.label()
                    );
                }
            }
        }
    }

    /// Resizes the surface and recreates the depth buffer
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, width, height, "depth_texture");
    }

    /// Returns current surface dimensions
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
