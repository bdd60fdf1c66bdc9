use crate::markers::MarkerSet;
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Nearest non-negative hit distance along a unit-length ray.
///
/// Rays starting inside the sphere (the camera always does) return the far
/// root, i.e. the point on the inner surface the pointer is over.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let near = -b - sq;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sq;
    (far >= 0.0).then_some(far)
}

/// Möller–Trumbore, double sided.
pub fn ray_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let eps = 1.0e-7;
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < eps {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    (t > eps).then_some(t)
}

/// Ray against a quad given by its centre and half-extent axes.
pub fn ray_quad(ray: &Ray, center: Vec3, half_right: Vec3, half_up: Vec3) -> Option<f32> {
    let p0 = center - half_right - half_up;
    let p1 = center + half_right - half_up;
    let p2 = center + half_right + half_up;
    let p3 = center - half_right + half_up;
    ray_triangle(ray.origin, ray.dir, p0, p1, p2)
        .or_else(|| ray_triangle(ray.origin, ray.dir, p0, p2, p3))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Edit,
    #[default]
    View,
}

/// The inner surface the panorama is projected on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanoramaSphere {
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PickResult {
    /// A point on the panorama sphere (edit mode).
    Surface(Vec3),
    /// The nearest hotspot marker under the pointer (view mode).
    Hotspot(String),
}

/// What a ray may hit.
pub struct PickTargets<'a> {
    pub sphere: PanoramaSphere,
    pub markers: &'a MarkerSet,
}

pub trait PickStrategy {
    fn pick(&self, ray: &Ray, targets: &PickTargets<'_>) -> Option<PickResult>;
}

/// Intersects the panorama sphere only.
#[derive(Clone, Copy, Debug, Default)]
pub struct EditPick;

impl PickStrategy for EditPick {
    fn pick(&self, ray: &Ray, targets: &PickTargets<'_>) -> Option<PickResult> {
        let s = targets.sphere;
        let t = ray_sphere(ray.origin, ray.dir, s.center, s.radius)?;
        let hit = ray.at(t);
        // Project back onto the surface to shed float drift.
        let p = s.center + (hit - s.center).normalize_or_zero() * s.radius;
        Some(PickResult::Surface(p))
    }
}

/// Intersects the marker quads only; nearest wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewPick;

impl PickStrategy for ViewPick {
    fn pick(&self, ray: &Ray, targets: &PickTargets<'_>) -> Option<PickResult> {
        targets
            .markers
            .intersect(ray)
            .map(|hit| PickResult::Hotspot(hit.hotspot_id.to_string()))
    }
}

static EDIT_PICK: EditPick = EditPick;
static VIEW_PICK: ViewPick = ViewPick;

pub fn strategy_for(mode: Mode) -> &'static dyn PickStrategy {
    match mode {
        Mode::Edit => &EDIT_PICK,
        Mode::View => &VIEW_PICK,
    }
}
