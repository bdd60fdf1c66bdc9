use glam::Vec3;

// Shared tuning constants used by both web and native frontends.

// Panorama sphere
pub const SPHERE_RADIUS: f32 = 500.0;
pub const SPHERE_WIDTH_SEGMENTS: u32 = 60;
pub const SPHERE_HEIGHT_SEGMENTS: u32 = 40;
pub const SPHERE_CENTER: [f32; 3] = [0.0, 0.0, 0.0];

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const ROTATE_SPEED: f32 = -0.3; // negative = drag the world, not the camera
pub const PITCH_LIMIT_DEG: f32 = 85.0;
pub const KEY_ROTATE_STEP_DEG: f32 = 5.0;

// Navigation fades (seconds)
pub const FADE_OUT_SEC: f32 = 0.5;
pub const SETTLE_SEC: f32 = 0.1;
pub const FADE_IN_SEC: f32 = 0.5;

// Markers
pub const MARKER_INSET: f32 = 0.95; // fraction of sphere radius markers render at
pub const MARKER_WORLD_PER_PX: f32 = 1.0;
pub const DEFAULT_ICON_PX: f32 = 40.0;
pub const ICON_SIZE_MIN: f32 = 10.0;
pub const ICON_SIZE_MAX: f32 = 100.0;

// Icon uploads
pub const ICON_UPLOAD_FOLDER: &str = "hotspot-icons";
pub const ICON_MAX_BYTES: u64 = 2 * 1024 * 1024;
pub const ICON_ALLOWED_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

// Panorama uploads
pub const PANORAMA_UPLOAD_FOLDER: &str = "panoramas";
pub const PANORAMA_MAX_BYTES: u64 = 50 * 1024 * 1024;
pub const PANORAMA_ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

// Picking
pub const SURFACE_EPSILON: f32 = 1e-3; // relative tolerance for on-sphere checks

#[inline]
pub fn sphere_center_vec3() -> Vec3 {
    Vec3::new(SPHERE_CENTER[0], SPHERE_CENTER[1], SPHERE_CENTER[2])
}
