use crate::helpers;
use pano_core::constants::{SPHERE_HEIGHT_SEGMENTS, SPHERE_WIDTH_SEGMENTS};
use pano_core::geometry::{inward_sphere, SphereVertex};
use wgpu::util::DeviceExt;

const SPHERE_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

pub(crate) struct PanoramaTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

pub(crate) struct SpherePass {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    pub(crate) texture_layout: wgpu::BindGroupLayout,
    panorama: Option<PanoramaTexture>,
}

impl SpherePass {
    pub(crate) fn new(
        device: &wgpu::Device,
        globals_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        radius: f32,
    ) -> Self {
        let mesh = inward_sphere(radius, SPHERE_WIDTH_SEGMENTS, SPHERE_HEIGHT_SEGMENTS);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("panorama_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::PANORAMA_WGSL.into()),
        });
        let texture_layout = helpers::texture_bind_group_layout(device, "panorama_bgl");
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("panorama_pl"),
            bind_group_layouts: &[globals_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_pipeline(
            device,
            "panorama_pipeline",
            &layout,
            &shader,
            "vs_sphere",
            "fs_sphere",
            &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SphereVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &SPHERE_ATTRS,
            }],
            color_format,
            None,
        );
        log::info!(
            "[render] sphere r={} with {} vertices / {} indices",
            radius,
            mesh.vertices.len(),
            mesh.indices.len()
        );
        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            texture_layout,
            panorama: None,
        }
    }

    pub(crate) fn has_panorama(&self) -> bool {
        self.panorama.is_some()
    }

    /// Swap in a new panorama, freeing the previous texture first.
    pub(crate) fn set_panorama(&mut self, texture: wgpu::Texture, bind_group: wgpu::BindGroup) {
        self.clear_panorama();
        self.panorama = Some(PanoramaTexture { texture, bind_group });
    }

    pub(crate) fn clear_panorama(&mut self) {
        if let Some(old) = self.panorama.take() {
            old.texture.destroy();
        }
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, globals: &wgpu::BindGroup) {
        let Some(pano) = &self.panorama else {
            return;
        };
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, globals, &[]);
        rpass.set_bind_group(1, &pano.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
