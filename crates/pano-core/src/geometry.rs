use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereVertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug, Default)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

/// UV sphere seen from the inside.
///
/// Longitude grows to the viewer's right as seen from the centre, so the
/// equirectangular image is not mirrored. `u` runs 0..1 around the equator
/// starting at -Z, `v` 0..1 from top to bottom. The pipeline draws it without
/// face culling.
pub fn inward_sphere(radius: f32, width_segments: u32, height_segments: u32) -> SphereMesh {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let theta = v * PI;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let phi = u * TAU;
            let dir = equirect_direction(phi, theta);
            vertices.push(SphereVertex {
                pos: (dir * radius).to_array(),
                uv: [u, v],
            });
        }
    }
    let row = ws + 1;
    let mut indices = Vec::with_capacity((ws * hs * 6) as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix;
            let b = a + row;
            let c = b + 1;
            let d = a + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, d, b]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[d, c, b]);
            }
        }
    }
    SphereMesh { vertices, indices }
}

/// Direction for longitude `phi` (0..2π, starting at -Z, turning toward +X)
/// and colatitude `theta` (0 at +Y).
#[inline]
pub fn equirect_direction(phi: f32, theta: f32) -> Vec3 {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    Vec3::new(st * sp, ct, -st * cp)
}

/// Inverse of the sphere's texture mapping: which texel a view direction shows.
pub fn direction_to_uv(dir: Vec3) -> [f32; 2] {
    let d = dir.normalize_or_zero();
    let phi = d.x.atan2(-d.z).rem_euclid(TAU);
    let theta = d.y.clamp(-1.0, 1.0).acos();
    [phi / TAU, theta / PI]
}

/// Unit quad (two triangles) used for billboarded markers; corners in -1..1.
pub const MARKER_QUAD: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];
