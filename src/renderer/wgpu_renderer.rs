//! The on-screen renderer.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, error, warn};
use winit::window::Window;

use crate::builtin::HalftoneMaterial;
use crate::camera::Camera3d;
use crate::color::{self, Srgb8};
use crate::context::Context;
use crate::error::Result;
use crate::panel::UiFrame;
use crate::renderer::{BlitPass, EguiRenderer, Renderer, SceneBuffer, SceneTarget};
use crate::resource::{GpuMesh3d, MeshId, ShaderMaterial};
use crate::scene::SceneNode3d;

/// Presentation and antialiasing settings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RendererSetup {
    /// Whether presentation waits for the vertical blank.
    pub vsync: bool,
    /// MSAA sample count. 1 disables antialiasing.
    pub samples: u32,
}

impl Default for RendererSetup {
    fn default() -> Self {
        RendererSetup {
            vsync: true,
            samples: 4,
        }
    }
}

/// Renders the scene and the UI into a window surface with wgpu.
///
/// The surface always matches the window's physical size. The scene is drawn
/// at the logical size times the pixel ratio given through [`Renderer`],
/// offscreen when that differs from the surface size.
pub struct WgpuRenderer {
    ctxt: Context,
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    scene_target: Option<SceneTarget>,
    blit: BlitPass,
    material: HalftoneMaterial,
    meshes: HashMap<MeshId, GpuMesh3d>,
    egui: EguiRenderer,
    clear_color: wgpu::Color,
    size: (u32, u32),
    pixel_ratio: f32,
    needs_reconfigure: bool,
}

impl WgpuRenderer {
    /// Creates the GPU context and the surface of `window`, and the pipeline of `material`.
    pub async fn new(
        window: Arc<Window>,
        material: &ShaderMaterial,
        setup: RendererSetup,
    ) -> Result<WgpuRenderer> {
        let (ctxt, surface) = Context::new(window.clone()).await?;

        let surface_caps = surface.get_capabilities(&ctxt.adapter);
        let physical = window.inner_size();
        let present_mode = if setup.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: ctxt.surface_format,
            width: physical.width.max(1),
            height: physical.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&ctxt.device, &surface_config);

        let sample_count = setup.samples.max(1);
        let (depth_view, msaa_view) =
            create_attachments(&ctxt, surface_config.width, surface_config.height, sample_count);

        let material = HalftoneMaterial::new(&ctxt, material, sample_count);
        let egui = EguiRenderer::new(&ctxt);
        let blit = BlitPass::new(&ctxt);

        Ok(WgpuRenderer {
            ctxt,
            window,
            surface,
            surface_config,
            sample_count,
            depth_view,
            msaa_view,
            scene_target: None,
            blit,
            material,
            meshes: HashMap::new(),
            egui,
            clear_color: wgpu::Color::BLACK,
            size: (0, 0),
            pixel_ratio: 1.0,
            needs_reconfigure: false,
        })
    }

    fn reconfigure(&mut self) {
        let physical = self.window.inner_size();
        self.needs_reconfigure = false;

        if physical.width == 0 || physical.height == 0 {
            return;
        }

        self.surface_config.width = physical.width;
        self.surface_config.height = physical.height;
        self.surface.configure(&self.ctxt.device, &self.surface_config);

        // Before the first `set_size`, draw at the surface size.
        let scene_buffer = if self.size == (0, 0) {
            SceneBuffer::Surface(physical.width, physical.height)
        } else {
            SceneBuffer::select(self.size, self.pixel_ratio, (physical.width, physical.height))
        };

        let (width, height) = scene_buffer.size();
        debug!(
            "Configuring the surface at {}x{}, drawing the scene at {}x{} ({}x{} logical, ratio {})",
            physical.width, physical.height, width, height, self.size.0, self.size.1, self.pixel_ratio
        );

        self.scene_target = scene_buffer
            .is_offscreen()
            .then(|| SceneTarget::new(&self.ctxt, &self.blit, width, height));

        let (depth_view, msaa_view) = create_attachments(&self.ctxt, width, height, self.sample_count);
        self.depth_view = depth_view;
        self.msaa_view = msaa_view;
    }

    fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                warn!("Surface unavailable ({e}), reconfiguring");
                self.reconfigure();
                None
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Out of memory while acquiring the next frame");
                None
            }
            Err(e) => {
                warn!("Skipping frame: {e}");
                None
            }
        }
    }
}

impl Renderer for WgpuRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        if self.size != (width, height) {
            self.size = (width, height);
            self.needs_reconfigure = true;
        }
    }

    fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        if self.pixel_ratio != pixel_ratio {
            self.pixel_ratio = pixel_ratio;
            self.needs_reconfigure = true;
        }
    }

    fn set_clear_color(&mut self, color: Srgb8) {
        // A non-sRGB surface stores the encoded values as they are.
        let [r, g, b] = if self.ctxt.encodes_srgb_in_shader() {
            color.map(|c| c as f32 / 255.0)
        } else {
            let linear = color::from_srgb8(color);
            [linear.r, linear.g, linear.b]
        };

        self.clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };
    }

    fn render(&mut self, scene: &SceneNode3d, camera: &dyn Camera3d, ui: Option<UiFrame>) {
        if self.needs_reconfigure {
            self.reconfigure();
        }

        let Some(frame) = self.acquire_frame() else {
            return;
        };
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draws = scene.draw_list();

        self.material.prepare_frame(&self.ctxt, camera);
        for item in &draws {
            let mesh = &item.mesh;
            self.meshes
                .entry(mesh.id())
                .or_insert_with(|| GpuMesh3d::new(&self.ctxt, mesh));
            self.material.prepare_object(&self.ctxt, item);
        }

        let mut encoder = self.ctxt.create_command_encoder(Some("scene_command_encoder"));

        {
            let color_view = match &self.scene_target {
                Some(target) => target.view(),
                None => &frame_view,
            };
            let (view, resolve_target) = match &self.msaa_view {
                Some(msaa_view) => (msaa_view, Some(color_view)),
                None => (color_view, None),
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.material.begin(&mut render_pass);

            for item in &draws {
                if let Some(mesh) = self.meshes.get(&item.mesh.id()) {
                    if self.material.bind_object(&mut render_pass, item.object) {
                        mesh.draw(&mut render_pass);
                    }
                }
            }
        }

        if let Some(target) = &self.scene_target {
            self.blit.draw(&mut encoder, target, &frame_view);
        }

        self.ctxt.submit(std::iter::once(encoder.finish()));

        if let Some(ui) = ui {
            let size = [self.surface_config.width, self.surface_config.height];
            self.egui.render(&self.ctxt, &frame_view, size, ui);
        }

        frame.present();

        // Release the GPU data of whatever left the scene.
        let live_objects: HashSet<_> = draws.iter().map(|d| d.object).collect();
        let live_meshes: HashSet<_> = draws.iter().map(|d| d.mesh.id()).collect();
        self.material.retain_objects(|id| live_objects.contains(&id));
        self.meshes.retain(|id, _| live_meshes.contains(id));
    }
}

fn create_attachments(
    ctxt: &Context,
    width: u32,
    height: u32,
    sample_count: u32,
) -> (wgpu::TextureView, Option<wgpu::TextureView>) {
    let depth_view = ctxt.create_attachment(
        "depth_texture",
        width,
        height,
        Context::depth_format(),
        sample_count,
    );

    let msaa_view = (sample_count > 1).then(|| {
        ctxt.create_attachment(
            "msaa_texture",
            width,
            height,
            ctxt.surface_format,
            sample_count,
        )
    });

    (depth_view, msaa_view)
}
