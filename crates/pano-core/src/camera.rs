use crate::config::ViewerConfig;
use crate::constants::{CAMERA_ZFAR, CAMERA_ZNEAR};
use crate::picking::Ray;
use glam::{Mat4, Vec2, Vec3, Vec4};
use std::f32::consts::TAU;

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn panorama(center: Vec3, aspect: f32, fov_deg: f32) -> Self {
        Self {
            eye: center,
            target: center + Vec3::NEG_Z,
            up: Vec3::Y,
            aspect: aspect.max(1e-3),
            fovy_radians: fov_deg.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        normalize_or_forward(self.target - self.eye)
    }

    /// Recompute aspect from the surface size. Zero-sized surfaces are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }
}

/// Compute a world-space ray from pixel coordinates in a `width`×`height`
/// viewport (origin top-left).
pub fn screen_to_world_ray(camera: &Camera, width: f32, height: f32, sx: f32, sy: f32) -> Ray {
    let ndc_x = (2.0 * sx / width.max(1.0)) - 1.0;
    let ndc_y = 1.0 - (2.0 * sy / height.max(1.0));
    let inv = camera.view_proj().inverse();
    let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let p1: Vec3 = p_far.truncate() / p_far.w;
    Ray::new(camera.eye, p1 - camera.eye)
}

/// Drag-to-look controller. Rotation is driven by pointer deltas scaled by the
/// viewport height, like a classic orbit control with zoom and pan removed.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub yaw: f32,
    pub pitch: f32,
    rotate_speed: f32,
    pitch_limit: f32,
    drag_from: Option<Vec2>,
}

impl OrbitControls {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            rotate_speed: config.rotate_speed,
            pitch_limit: config.pitch_limit_deg.to_radians(),
            drag_from: None,
        }
    }

    pub fn begin_drag(&mut self, at: Vec2) {
        self.drag_from = Some(at);
    }

    /// Returns true when the pointer move rotated the view.
    pub fn drag_to(&mut self, at: Vec2, viewport_height: f32) -> bool {
        let Some(from) = self.drag_from else {
            return false;
        };
        let delta = at - from;
        self.drag_from = Some(at);
        let k = TAU / viewport_height.max(1.0) * self.rotate_speed;
        self.rotate_by(delta.x * k, -delta.y * k);
        delta != Vec2::ZERO
    }

    pub fn end_drag(&mut self) {
        self.drag_from = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    pub fn rotate_by(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw = (self.yaw + d_yaw).rem_euclid(TAU);
        self.pitch = (self.pitch + d_pitch).clamp(-self.pitch_limit, self.pitch_limit);
    }

    /// Point the view along `dir` (e.g. to restore a saved heading).
    pub fn look_along(&mut self, dir: Vec3) {
        let d = normalize_or_forward(dir);
        self.pitch = d.y.clamp(-1.0, 1.0).asin().clamp(-self.pitch_limit, self.pitch_limit);
        self.yaw = d.x.atan2(-d.z).rem_euclid(TAU);
    }

    pub fn direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(sy * cp, sp, -cy * cp)
    }

    pub fn apply(&self, camera: &mut Camera) {
        camera.target = camera.eye + self.direction();
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

#[inline]
fn normalize_or_forward(v: Vec3) -> Vec3 {
    let n = v.normalize_or_zero();
    if n == Vec3::ZERO {
        Vec3::NEG_Z
    } else {
        n
    }
}
