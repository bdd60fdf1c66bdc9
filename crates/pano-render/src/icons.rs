use crate::helpers;
use fnv::FnvHashMap;
use image::RgbaImage;
use pano_core::MarkerSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconState {
    Pending,
    Ready,
    Failed,
}

/// Which icon URLs have been asked for and how they ended. Kept apart from
/// the GPU side so frontends can decide what to fetch.
#[derive(Debug, Default)]
pub struct IconRequests {
    states: FnvHashMap<String, IconState>,
    revision: u64,
}

impl IconRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs used by `markers` that were never requested. They are marked
    /// pending, so each URL is returned once.
    pub fn take_missing(&mut self, markers: &MarkerSet) -> Vec<String> {
        let mut out = Vec::new();
        for url in markers.iter().filter_map(|m| m.icon_url.as_deref()) {
            if !self.states.contains_key(url) {
                self.states.insert(url.to_string(), IconState::Pending);
                out.push(url.to_string());
            }
        }
        out
    }

    pub fn state(&self, url: &str) -> Option<IconState> {
        self.states.get(url).copied()
    }

    pub fn is_ready(&self, url: &str) -> bool {
        self.state(url) == Some(IconState::Ready)
    }

    pub fn mark(&mut self, url: &str, state: IconState) {
        self.states.insert(url.to_string(), state);
        self.revision += 1;
    }

    /// Bumped by every `mark`, i.e. whenever an icon settles.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

struct IconTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// GPU textures for loaded icons plus a white fallback used for the default
/// marker disc.
pub(crate) struct IconCache {
    pub(crate) requests: IconRequests,
    textures: FnvHashMap<String, IconTexture>,
    fallback_texture: wgpu::Texture,
    fallback: wgpu::BindGroup,
}

impl IconCache {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let white = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        let (fallback_texture, view) =
            helpers::create_rgba_texture(device, queue, "icon_fallback", &white);
        let fallback = helpers::texture_bind_group(device, layout, "icon_fallback_bg", &view, sampler);
        Self {
            requests: IconRequests::new(),
            textures: FnvHashMap::default(),
            fallback_texture,
            fallback,
        }
    }

    pub(crate) fn insert(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        url: &str,
        img: &RgbaImage,
    ) {
        let (texture, view) = helpers::create_rgba_texture(device, queue, "icon", img);
        let bind_group = helpers::texture_bind_group(device, layout, "icon_bg", &view, sampler);
        if let Some(old) = self
            .textures
            .insert(url.to_string(), IconTexture { texture, bind_group })
        {
            old.texture.destroy();
        }
        self.requests.mark(url, IconState::Ready);
    }

    /// Bind group for `url`, or `None` if it is not uploaded.
    pub(crate) fn bind_group(&self, url: Option<&str>) -> Option<&wgpu::BindGroup> {
        url.and_then(|u| self.textures.get(u)).map(|t| &t.bind_group)
    }

    pub(crate) fn fallback(&self) -> &wgpu::BindGroup {
        &self.fallback
    }

    pub(crate) fn destroy(&mut self) {
        for (_, t) in self.textures.drain() {
            t.texture.destroy();
        }
        self.fallback_texture.destroy();
    }
}
