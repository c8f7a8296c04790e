//! GPU point-sprite renderer
//!
//! [`CloudRenderer`] owns the pipeline state shared by every cloud;
//! [`GpuCloud`] owns the per-cloud instance buffer. The renderer implements
//! [`CloudBackend`], so the engine can drive it like any other display
//! backend.

use crate::camera::OrbitCamera;
use bytemuck::{Pod, Zeroable};
use stardust_cloud::{CloudBackend, PointMaterial, SlotError};
use stardust_core::buffer::PointBuffer;
use stardust_core::color::Rgb;
use std::sync::Arc;
use wgpu::util::DeviceExt;

/// Uniform buffer data sent to the GPU
///
/// Field order must match the WGSL struct layout exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub point_size: f32,
    pub time: f32,
}

impl Uniforms {
    pub fn new(camera: &OrbitCamera, viewport: [f32; 2], material: &PointMaterial, time: f32) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            viewport,
            point_size: material.point_size,
            time,
        }
    }
}

/// One instance per generated point
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

/// GPU resources owned by one displayed cloud
#[derive(Debug)]
pub struct GpuCloud {
    instances: wgpu::Buffer,
    count: u32,
    additive: bool,
}

impl GpuCloud {
    pub fn point_count(&self) -> u32 {
        self.count
    }
}

/// Point-sprite renderer using WGPU
pub struct CloudRenderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    additive_pipeline: wgpu::RenderPipeline,
    alpha_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    surface_format: wgpu::TextureFormat,
    clear_color: wgpu::Color,
}

impl CloudRenderer {
    /// Create a renderer targeting the given surface format
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Galaxy Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("galaxy.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[Uniforms {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
                viewport: [1280.0, 720.0],
                point_size: 6.0,
                time: 0.0,
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cloud Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let additive_pipeline =
            build_pipeline(&device, &pipeline_layout, &shader, surface_format, additive);
        let alpha_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::BlendState::ALPHA_BLENDING,
        );

        Self {
            device,
            queue,
            additive_pipeline,
            alpha_pipeline,
            uniform_buffer,
            uniform_bind_group,
            surface_format,
            clear_color: wgpu::Color::BLACK,
        }
    }

    /// Update per-frame uniforms from camera, material, and clock state
    pub fn update_uniforms(
        &self,
        camera: &OrbitCamera,
        viewport: [f32; 2],
        material: &PointMaterial,
        time: f32,
    ) {
        let uniforms = Uniforms::new(camera, viewport, material, time);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Set the clear color behind the cloud
    pub fn set_background(&mut self, background: Rgb) {
        self.clear_color = wgpu::Color {
            r: f64::from(background.r),
            g: f64::from(background.g),
            b: f64::from(background.b),
            a: 1.0,
        };
    }

    /// Render a frame to the given texture view
    pub fn render(&self, view: &wgpu::TextureView, cloud: Option<&GpuCloud>) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cloud Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cloud Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(cloud) = cloud {
                let pipeline = if cloud.additive {
                    &self.additive_pipeline
                } else {
                    &self.alpha_pipeline
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, cloud.instances.slice(..));
                render_pass.draw(0..4, 0..cloud.count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Get the surface format
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub(crate) fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }
}

impl CloudBackend for CloudRenderer {
    type Cloud = GpuCloud;

    fn upload(
        &mut self,
        buffer: &PointBuffer,
        material: &PointMaterial,
    ) -> Result<GpuCloud, SlotError> {
        if !buffer.is_consistent() {
            return Err(SlotError::InconsistentBuffer(format!(
                "positions {} / colors {} / scales {}",
                buffer.positions().len(),
                buffer.colors().len(),
                buffer.scales().len()
            )));
        }

        let instances = interleave(buffer);
        let bytes = std::mem::size_of_val(instances.as_slice()) as u64;
        let limit = self.device.limits().max_buffer_size;
        if bytes > limit {
            return Err(SlotError::ResourceCreation(format!(
                "instance buffer of {bytes} bytes exceeds device limit {limit}"
            )));
        }

        let instance_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Cloud Instance Buffer"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            });

        tracing::debug!(points = buffer.point_count(), bytes, "uploaded cloud");

        Ok(GpuCloud {
            instances: instance_buffer,
            count: buffer.point_count() as u32,
            additive: material.additive,
        })
    }

    fn remove(&mut self, cloud: GpuCloud) {
        // Free GPU memory now rather than waiting for the handle to drop
        // through wgpu's deferred cleanup
        cloud.instances.destroy();
    }
}

/// Interleave the flat parallel arrays into per-instance structs
fn interleave(buffer: &PointBuffer) -> Vec<PointInstance> {
    let mut instances = Vec::with_capacity(buffer.point_count());
    for i in 0..buffer.point_count() {
        instances.push(PointInstance {
            position: buffer.position(i).to_array(),
            scale: buffer.scales()[i],
            color: buffer.color(i).to_array(),
            _pad: 0.0,
        });
    }
    instances
}

fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Cloud Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<PointInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3, // position
                    },
                    wgpu::VertexAttribute {
                        offset: 12,
                        shader_location: 1,
                        format: wgpu::VertexFormat::Float32, // scale
                    },
                    wgpu::VertexAttribute {
                        offset: 16,
                        shader_location: 2,
                        format: wgpu::VertexFormat::Float32x3, // color
                    },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_instance_layout_matches_vertex_attributes() {
        // The attribute offsets above hard-code this layout
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
        assert_eq!(std::mem::offset_of!(PointInstance, position), 0);
        assert_eq!(std::mem::offset_of!(PointInstance, scale), 12);
        assert_eq!(std::mem::offset_of!(PointInstance, color), 16);
    }

    #[test]
    fn test_uniform_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 80);
        assert_eq!(std::mem::offset_of!(Uniforms, viewport), 64);
        assert_eq!(std::mem::offset_of!(Uniforms, point_size), 72);
        assert_eq!(std::mem::offset_of!(Uniforms, time), 76);
    }

    #[test]
    fn test_interleave_preserves_point_data() {
        let mut buffer = PointBuffer::new();
        buffer.push(Vec3::new(1.0, 2.0, 3.0), Rgb::new(0.1, 0.2, 0.3), 0.7);
        buffer.push(Vec3::new(-1.0, 0.0, 4.0), Rgb::WHITE, 0.2);

        let instances = interleave(&buffer);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(instances[0].color, [0.1, 0.2, 0.3]);
        assert_eq!(instances[0].scale, 0.7);
        assert_eq!(instances[1].position, [-1.0, 0.0, 4.0]);
    }
}
