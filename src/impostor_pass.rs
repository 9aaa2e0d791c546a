//! GPU pipeline for the sphere impostor.
//!
//! [`ImpostorPass`] owns the render pipeline, the uniform buffer and its bind
//! group. Drawing writes one [`ImpostorUniforms`] block and issues six vertices
//! with no vertex or index buffer; the shader expands them into the billboard.

use crate::error::ShaderError;
use crate::gpu::GpuContext;
use crate::impostor::{ImpostorUniforms, VERTEX_COUNT};
use crate::shader::{FRAGMENT_ENTRY, IMPOSTOR_WGSL, VERTEX_ENTRY, validate_impostor_wgsl};

/// The impostor render pipeline and its uniform binding.
pub struct ImpostorPass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ImpostorPass {
    /// Create the pass from the built-in impostor shader.
    pub fn new(gpu: &GpuContext) -> Result<Self, ShaderError> {
        Self::with_shader(gpu, IMPOSTOR_WGSL)
    }

    /// Create the pass from custom WGSL.
    ///
    /// The shader must declare the [`ImpostorUniforms`] block at
    /// `@group(0) @binding(0)` and `vs` / `fs` entry points. The source is
    /// validated before any GPU object is created, and anything the device
    /// still rejects while building the pipeline comes back as
    /// [`ShaderError::Link`].
    pub fn with_shader(gpu: &GpuContext, shader_source: &str) -> Result<Self, ShaderError> {
        validate_impostor_wgsl("impostor", shader_source)?;

        let device = &gpu.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Impostor Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Impostor Uniforms"),
            size: std::mem::size_of::<ImpostorUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Impostor Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ImpostorUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Impostor Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Impostor Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Impostor Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                label: "impostor".to_string(),
                diagnostic: err.to_string(),
                source_text: shader_source.to_string(),
            });
        }

        log::debug!("impostor pipeline created for {:?}", gpu.config.format);

        Ok(Self {
            pipeline,
            uniform_buffer,
            bind_group,
        })
    }

    /// Upload this frame's uniforms and draw the billboard.
    pub fn render(
        &self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        uniforms: &ImpostorUniforms,
    ) {
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..VERTEX_COUNT, 0..1);
    }
}
