use crate::config::ViewerConfig;
use crate::constants::sphere_center_vec3;
use crate::model::{HotspotKind, Scene};
use crate::picking::{ray_quad, Ray};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

/// Pickable, camera-facing stand-in for one hotspot.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub hotspot_id: String,
    pub kind: HotspotKind,
    /// World position, pulled slightly inside the sphere so it draws over it.
    pub center: Vec3,
    /// Half width/height in world units.
    pub half_size: Vec2,
    pub icon_url: Option<String>,
    /// Unit basis of the quad, refreshed by [`MarkerSet::billboard`].
    pub right: Vec3,
    pub up: Vec3,
}

impl Marker {
    #[inline]
    pub fn half_right(&self) -> Vec3 {
        self.right * self.half_size.x
    }

    #[inline]
    pub fn half_up(&self) -> Vec3 {
        self.up * self.half_size.y
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.right.cross(self.up)
    }

    fn face(&mut self, eye: Vec3) {
        let to_eye = eye - self.center;
        let n = to_eye.normalize_or_zero();
        if n == Vec3::ZERO {
            return;
        }
        let mut right = Vec3::Y.cross(n);
        if right.length_squared() < 1e-8 {
            // looking straight up or down at the marker
            right = Vec3::Z.cross(n);
        }
        self.right = right.normalize();
        self.up = n.cross(self.right);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MarkerHit<'a> {
    pub index: usize,
    pub hotspot_id: &'a str,
    pub t: f32,
}

/// The markers mirroring the current scene's hotspots.
///
/// `generation` changes whenever marker geometry changes, so GPU-side copies
/// can skip re-uploading an unchanged set.
#[derive(Clone, Debug)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    generation: u64,
    facing: Option<Vec3>,
    center: Vec3,
    inset: f32,
    world_per_px: f32,
}

impl MarkerSet {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            markers: Vec::new(),
            generation: 0,
            facing: None,
            center: sphere_center_vec3(),
            inset: config.marker_inset,
            world_per_px: config.marker_world_per_px,
        }
    }

    /// Drop every existing marker and build one per hotspot.
    pub fn rebuild(&mut self, scene: &Scene) {
        self.markers = scene
            .hotspots
            .iter()
            .map(|h| {
                let size = h.icon_size_or_default();
                let mut m = Marker {
                    hotspot_id: h.id.clone(),
                    kind: h.kind,
                    center: self.center + (h.position - self.center) * self.inset,
                    half_size: Vec2::new(size.width, size.height) * self.world_per_px * 0.5,
                    icon_url: h.icon_url.clone().filter(|u| !u.is_empty()),
                    right: Vec3::X,
                    up: Vec3::Y,
                };
                m.face(self.center);
                m
            })
            .collect();
        self.facing = Some(self.center);
        self.generation += 1;
        log::debug!(
            "[markers] rebuilt {} markers for scene {} (gen {})",
            self.markers.len(),
            scene.id,
            self.generation
        );
    }

    /// Per-frame pass: turn every marker toward the camera. A no-op while
    /// the eye stays where the markers already face.
    pub fn billboard(&mut self, eye: Vec3) {
        if self.facing == Some(eye) {
            return;
        }
        for m in &mut self.markers {
            m.face(eye);
        }
        self.facing = Some(eye);
        self.generation += 1;
    }

    pub fn intersect(&self, ray: &Ray) -> Option<MarkerHit<'_>> {
        let hits: SmallVec<[MarkerHit<'_>; 4]> = self
            .markers
            .iter()
            .enumerate()
            .filter_map(|(index, m)| {
                ray_quad(ray, m.center, m.half_right(), m.half_up()).map(|t| MarkerHit {
                    index,
                    hotspot_id: m.hotspot_id.as_str(),
                    t,
                })
            })
            .collect();
        hits.into_iter().min_by(|a, b| a.t.total_cmp(&b.t))
    }

    pub fn get(&self, hotspot_id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.hotspot_id == hotspot_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
