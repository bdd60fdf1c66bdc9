use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Runtime-tunable viewer settings. Every field falls back to the value in
/// `constants.rs`, so hosts only pass what they want to override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub sphere_radius: f32,
    pub fov_deg: f32,
    pub rotate_speed: f32,
    pub pitch_limit_deg: f32,
    pub fade_out_sec: f32,
    pub settle_sec: f32,
    pub fade_in_sec: f32,
    pub marker_inset: f32,
    pub marker_world_per_px: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sphere_radius: SPHERE_RADIUS,
            fov_deg: CAMERA_FOV_DEG,
            rotate_speed: ROTATE_SPEED,
            pitch_limit_deg: PITCH_LIMIT_DEG,
            fade_out_sec: FADE_OUT_SEC,
            settle_sec: SETTLE_SEC,
            fade_in_sec: FADE_IN_SEC,
            marker_inset: MARKER_INSET,
            marker_world_per_px: MARKER_WORLD_PER_PX,
        }
    }
}

impl ViewerConfig {
    /// Parse a partial JSON override; an empty string yields the defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str::<Self>(text).map(Self::sanitized)
    }

    /// Replace out-of-range values with defaults rather than failing.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        // the whole sphere must sit between the camera's near and far planes
        if !(self.sphere_radius > CAMERA_ZNEAR * 10.0 && self.sphere_radius < CAMERA_ZFAR) {
            self.sphere_radius = d.sphere_radius;
        }
        if !(self.fov_deg > 10.0 && self.fov_deg < 150.0) {
            self.fov_deg = d.fov_deg;
        }
        if !self.rotate_speed.is_finite() {
            self.rotate_speed = d.rotate_speed;
        }
        self.pitch_limit_deg = if self.pitch_limit_deg.is_finite() {
            self.pitch_limit_deg.clamp(0.0, 89.5)
        } else {
            d.pitch_limit_deg
        };
        for v in [
            &mut self.fade_out_sec,
            &mut self.settle_sec,
            &mut self.fade_in_sec,
        ] {
            if !(v.is_finite() && *v >= 0.0) {
                *v = 0.0;
            }
        }
        if !(self.marker_inset > 0.0 && self.marker_inset <= 1.0) {
            self.marker_inset = d.marker_inset;
        }
        if !(self.marker_world_per_px.is_finite() && self.marker_world_per_px > 0.0) {
            self.marker_world_per_px = d.marker_world_per_px;
        }
        self
    }
}
