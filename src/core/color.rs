use nalgebra::Vector3;

/// Clamps a scalar to [0, 1].
#[inline]
pub fn saturate(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Brings an HDR color back into range while keeping its hue.
/// If any channel exceeds 1.0, all channels are divided by the largest one.
pub fn max_to_one(color: Vector3<f32>) -> Vector3<f32> {
    let max_channel = color.x.max(color.y).max(color.z);
    if max_channel > 1.0 {
        color / max_channel
    } else {
        color
    }
}

/// Equal-channel color.
#[inline]
pub fn gray(value: f32) -> Vector3<f32> {
    Vector3::new(value, value, value)
}

/// Packs a [0, 1] color into an opaque `0xFFRRGGBB` pixel.
/// Channels are truncated, not rounded.
pub fn pack_rgb(color: Vector3<f32>) -> u32 {
    let r = (saturate(color.x) * 255.0) as u32;
    let g = (saturate(color.y) * 255.0) as u32;
    let b = (saturate(color.z) * 255.0) as u32;
    (255 << 24) | (r << 16) | (g << 8) | b
}

/// Splits a packed pixel into its 8-bit channels.
#[inline]
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    ]
}
