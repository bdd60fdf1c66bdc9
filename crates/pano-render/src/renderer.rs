use crate::helpers;
use crate::icons::{IconCache, IconRequests, IconState};
use crate::markers::MarkerPass;
use crate::sphere::SpherePass;
use crate::texture;
use image::RgbaImage;
use pano_core::{Camera, MarkerSet};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    /// x = scene opacity during fades
    pub fade: [f32; 4],
}

impl Globals {
    pub fn new(camera: &Camera, opacity: f32) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            fade: [opacity.clamp(0.0, 1.0), 0.0, 0.0, 0.0],
        }
    }
}

/// Owns the GPU side of one viewer: surface, sphere, markers and textures.
pub struct Renderer<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    globals_buffer: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    sampler_pano: wgpu::Sampler,
    sampler_icon: wgpu::Sampler,
    sphere: SpherePass,
    markers: MarkerPass,
    icons: IconCache,
    clear_color: wgpu::Color,
    disposed: bool,
}

impl<'a> Renderer<'a> {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'a>,
        width: u32,
        height: u32,
        sphere_radius: f32,
    ) -> anyhow::Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
                fade: [1.0, 0.0, 0.0, 0.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        // u wraps around the seam, v clamps at the poles
        let sampler_pano = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("panorama_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let sampler_icon = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("icon_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let sphere = SpherePass::new(&device, &globals_layout, format, sphere_radius);
        let markers = MarkerPass::new(&device, &globals_layout, &sphere.texture_layout, format);
        let icons = IconCache::new(&device, &queue, &sphere.texture_layout, &sampler_icon);
        log::info!("[render] surface {}x{} format {:?}", config.width, config.height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            globals_buffer,
            globals_bg,
            sampler_pano,
            sampler_icon,
            sphere,
            markers,
            icons,
            clear_color: wgpu::Color::BLACK,
            disposed: false,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    pub fn has_panorama(&self) -> bool {
        self.sphere.has_panorama()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || self.disposed {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload a decoded panorama, replacing (and freeing) the previous one.
    pub fn set_panorama(&mut self, img: &RgbaImage) {
        if self.disposed {
            return;
        }
        let fitted;
        let img = if img.width().max(img.height()) > self.max_texture_dimension() {
            fitted = texture::fit_to_limit(img.clone(), self.max_texture_dimension());
            &fitted
        } else {
            img
        };
        let (tex, view) = helpers::create_rgba_texture(&self.device, &self.queue, "panorama", img);
        let bg = helpers::texture_bind_group(
            &self.device,
            &self.sphere.texture_layout,
            "panorama_bg",
            &view,
            &self.sampler_pano,
        );
        self.sphere.set_panorama(tex, bg);
        log::info!("[render] panorama {}x{} uploaded", img.width(), img.height());
    }

    pub fn icon_requests(&self) -> &IconRequests {
        &self.icons.requests
    }

    /// Icon URLs the markers reference that have not been requested yet.
    pub fn take_missing_icons(&mut self, markers: &MarkerSet) -> Vec<String> {
        self.icons.requests.take_missing(markers)
    }

    pub fn insert_icon(&mut self, url: &str, img: &RgbaImage) {
        if self.disposed {
            return;
        }
        self.icons.insert(
            &self.device,
            &self.queue,
            &self.sphere.texture_layout,
            &self.sampler_icon,
            url,
            img,
        );
    }

    /// Keep drawing the default disc for this URL.
    pub fn icon_failed(&mut self, url: &str) {
        log::warn!("[render] icon {} unavailable, using default marker", url);
        self.icons.requests.mark(url, IconState::Failed);
    }

    pub fn render(
        &mut self,
        camera: &Camera,
        markers: &MarkerSet,
        opacity: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        if self.disposed {
            return Ok(());
        }
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[render] surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::new(camera, opacity)),
        );
        self.markers
            .update(&self.device, &self.queue, markers, &self.icons);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            self.sphere.draw(&mut rpass, &self.globals_bg);
            self.markers.draw(&mut rpass, &self.globals_bg, &self.icons);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Release GPU memory. Safe to call more than once; later calls to
    /// `render` and the upload methods do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.sphere.clear_panorama();
        self.markers.destroy();
        self.icons.destroy();
        self.globals_buffer.destroy();
        log::info!("[render] disposed");
    }
}
