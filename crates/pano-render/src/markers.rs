use crate::helpers;
use crate::icons::IconCache;
use pano_core::geometry::MARKER_QUAD;
use pano_core::{HotspotKind, Marker, MarkerSet};
use wgpu::util::DeviceExt;

const CORNER_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const INSTANCE_ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    1 => Float32x4,
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4
];

/// Tint of the default marker disc.
pub fn tint_for(kind: HotspotKind) -> [f32; 4] {
    match kind {
        HotspotKind::Info => [0.15, 0.55, 0.95, 0.9],
        HotspotKind::Navigation => [0.2, 0.8, 0.45, 0.9],
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MarkerInstance {
    /// xyz centre, w = 1 when the icon texture is used
    pub center: [f32; 4],
    pub half_right: [f32; 4],
    pub half_up: [f32; 4],
    pub tint: [f32; 4],
}

impl MarkerInstance {
    pub fn new(m: &Marker, has_icon: bool) -> Self {
        let hr = m.half_right();
        let hu = m.half_up();
        Self {
            center: [m.center.x, m.center.y, m.center.z, if has_icon { 1.0 } else { 0.0 }],
            half_right: [hr.x, hr.y, hr.z, 0.0],
            half_up: [hu.x, hu.y, hu.z, 0.0],
            tint: tint_for(m.kind),
        }
    }
}

/// Pack the current marker set; `icon_ready` tells which icon URLs have a
/// texture.
pub fn marker_instances(markers: &MarkerSet, icon_ready: impl Fn(&str) -> bool) -> Vec<MarkerInstance> {
    markers
        .iter()
        .map(|m| {
            let has_icon = m.icon_url.as_deref().is_some_and(&icon_ready);
            MarkerInstance::new(m, has_icon)
        })
        .collect()
}

pub(crate) struct MarkerPass {
    pipeline: wgpu::RenderPipeline,
    corner_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    capacity: usize,
    count: usize,
    /// Icon URL per instance, for bind group selection at draw time.
    icons: Vec<Option<String>>,
    /// Marker generation and icon revision of the last upload.
    uploaded: Option<(u64, u64)>,
}

impl MarkerPass {
    pub(crate) fn new(
        device: &wgpu::Device,
        globals_layout: &wgpu::BindGroupLayout,
        texture_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("marker_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::MARKER_WGSL.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker_pl"),
            bind_group_layouts: &[globals_layout, texture_layout],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_pipeline(
            device,
            "marker_pipeline",
            &layout,
            &shader,
            "vs_marker",
            "fs_marker",
            &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &CORNER_ATTRS,
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MarkerInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE_ATTRS,
                },
            ],
            color_format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );
        let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker_corners"),
            contents: bytemuck::cast_slice(&MARKER_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let capacity = 16;
        Self {
            pipeline,
            corner_buffer,
            instance_buffer: Self::alloc(device, capacity),
            capacity,
            count: 0,
            icons: Vec::new(),
            uploaded: None,
        }
    }

    fn alloc(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("marker_instances"),
            size: (capacity * std::mem::size_of::<MarkerInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Upload the billboards if the markers or their icons changed since
    /// the last upload.
    pub(crate) fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        markers: &MarkerSet,
        icons: &IconCache,
    ) {
        let key = (markers.generation(), icons.requests.revision());
        if self.uploaded == Some(key) {
            return;
        }
        self.uploaded = Some(key);
        let instances = marker_instances(markers, |url| icons.requests.is_ready(url));
        if instances.len() > self.capacity {
            self.capacity = instances.len().next_power_of_two();
            self.instance_buffer.destroy();
            self.instance_buffer = Self::alloc(device, self.capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.count = instances.len();
        self.icons.clear();
        self.icons.extend(markers.iter().map(|m| m.icon_url.clone()));
    }

    pub(crate) fn draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        globals: &wgpu::BindGroup,
        icons: &IconCache,
    ) {
        if self.count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, globals, &[]);
        rpass.set_vertex_buffer(0, self.corner_buffer.slice(..));
        rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        for (i, url) in self.icons.iter().enumerate().take(self.count) {
            let bg = icons.bind_group(url.as_deref()).unwrap_or(icons.fallback());
            rpass.set_bind_group(1, bg, &[]);
            let i = i as u32;
            rpass.draw(0..MARKER_QUAD.len() as u32, i..i + 1);
        }
    }

    pub(crate) fn destroy(&mut self) {
        self.instance_buffer.destroy();
        self.corner_buffer.destroy();
        self.count = 0;
        self.uploaded = None;
    }
}
