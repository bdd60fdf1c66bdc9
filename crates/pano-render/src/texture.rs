use anyhow::Context;
use image::{imageops::FilterType, RgbaImage};

/// Largest side used for hotspot icon textures.
pub const ICON_TEXTURE_MAX: u32 = 256;

/// Decode any supported image format into RGBA8.
pub fn decode_image(bytes: &[u8]) -> anyhow::Result<RgbaImage> {
    let img = image::load_from_memory(bytes).context("decode image")?;
    Ok(img.to_rgba8())
}

/// Scale `width`×`height` down (never up) so both sides fit in `max_side`,
/// keeping the aspect ratio.
pub fn fit_within(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let max_side = max_side.max(1);
    if width <= max_side && height <= max_side {
        return (width, height);
    }
    let scale = max_side as f64 / width.max(height) as f64;
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_side);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_side);
    (w, h)
}

/// Downscale an image to the device's texture limit if needed.
pub fn fit_to_limit(img: RgbaImage, max_side: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let (fw, fh) = fit_within(w, h, max_side);
    if (fw, fh) == (w, h) {
        return img;
    }
    log::info!("[texture] downscaling {}x{} -> {}x{}", w, h, fw, fh);
    image::imageops::resize(&img, fw, fh, FilterType::Triangle)
}

/// Decode a panorama and make sure it fits in a `max_side` texture.
pub fn decode_panorama(bytes: &[u8], max_side: u32) -> anyhow::Result<RgbaImage> {
    let img = decode_image(bytes).context("panorama")?;
    let (w, h) = img.dimensions();
    if w != h * 2 {
        log::warn!("[texture] panorama is {}x{}, expected 2:1 equirectangular", w, h);
    }
    Ok(fit_to_limit(img, max_side))
}

pub fn decode_icon(bytes: &[u8]) -> anyhow::Result<RgbaImage> {
    let img = decode_image(bytes).context("icon")?;
    Ok(fit_to_limit(img, ICON_TEXTURE_MAX))
}
