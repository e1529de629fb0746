//! A renderer for egui UI using wgpu.

use crate::context::Context;
use crate::panel::UiFrame;

/// Structure which manages the egui UI rendering.
pub struct EguiRenderer {
    renderer: egui_wgpu::Renderer,
}

impl EguiRenderer {
    /// Creates a new egui renderer drawing into targets of the context's surface format.
    pub fn new(ctxt: &Context) -> EguiRenderer {
        let renderer = egui_wgpu::Renderer::new(
            &ctxt.device,
            ctxt.surface_format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None, // no depth
                msaa_samples: 1,            // sample count
                dithering: true,            // dithering
                ..Default::default()
            },
        );

        EguiRenderer { renderer }
    }

    /// Draws the UI over `color_view`, which is `size_in_pixels` large.
    pub fn render(
        &mut self,
        ctxt: &Context,
        color_view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        ui: UiFrame,
    ) {
        // Update textures
        for (id, image_delta) in &ui.textures_delta.set {
            self.renderer
                .update_texture(&ctxt.device, &ctxt.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: ui.pixels_per_point,
        };

        // Create our own encoder for egui rendering to avoid lifetime issues
        let mut encoder = ctxt.create_command_encoder(Some("egui_command_encoder"));

        let user_buffers = self.renderer.update_buffers(
            &ctxt.device,
            &ctxt.queue,
            &mut encoder,
            &ui.primitives,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu requires a 'static render pass; it is dropped before the encoder is finished.
            let mut render_pass = render_pass.forget_lifetime();

            self.renderer
                .render(&mut render_pass, &ui.primitives, &screen_descriptor);
        }

        ctxt.submit(user_buffers.into_iter().chain(std::iter::once(encoder.finish())));

        // Free textures
        for id in &ui.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
