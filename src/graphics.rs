//! The graphics capability handed to the render step.
//!
//! [`GraphicsContext`] bundles the GPU context with the impostor pipeline and
//! its uniform binding. The host creates it once at startup and passes it to
//! [`GraphicsContext::render`] every frame; nothing is reached through globals.

use std::sync::Arc;

use anyhow::{Context, Result};
use winit::window::Window;

use crate::gpu::{GpuContext, SurfaceErrorAction};
use crate::impostor::ImpostorUniforms;
use crate::impostor_pass::ImpostorPass;

/// Result of one render attempt.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// The frame was drawn and presented.
    Presented,
    /// The surface was unavailable; try again next frame.
    Skipped,
    /// The surface cannot recover; rendering must stop.
    Fatal,
}

/// GPU device, surface and impostor pipeline.
pub struct GraphicsContext {
    pub gpu: GpuContext,
    pass: ImpostorPass,
    clear_color: wgpu::Color,
}

impl GraphicsContext {
    /// Initialize the GPU and build the impostor pipeline.
    ///
    /// Fails if no adapter is available or the shader does not compile; the
    /// error then carries the compiler output and shader source.
    pub fn new(window: Arc<Window>, prefer_srgb: bool, clear_color: [f32; 4]) -> Result<Self> {
        let gpu = GpuContext::new(window, prefer_srgb)?;
        let pass = ImpostorPass::new(&gpu).context("failed to build impostor pipeline")?;

        Ok(Self {
            gpu,
            pass,
            clear_color: wgpu::Color {
                r: clear_color[0] as f64,
                g: clear_color[1] as f64,
                b: clear_color[2] as f64,
                a: clear_color[3] as f64,
            },
        })
    }

    /// Reconfigure the surface so the viewport matches the window.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Clear the surface, draw the impostor with `uniforms`, and present.
    pub fn render(&self, uniforms: &ImpostorUniforms) -> FrameOutcome {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => FrameOutcome::Fatal,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        FrameOutcome::Skipped
                    }
                };
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Impostor Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Impostor Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.pass.render(&self.gpu, &mut render_pass, uniforms);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        FrameOutcome::Presented
    }
}
