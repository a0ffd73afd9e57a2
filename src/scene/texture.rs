use crate::error::Result;
use image::{DynamicImage, RgbImage};
use log::info;
use nalgebra::{Vector2, Vector3};
use std::path::Path;
use std::sync::Arc;

/// Represents a 2D texture map.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: Arc<RgbImage>,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)?;
        let texture = Self::from_image(img);

        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );

        Ok(texture)
    }

    pub fn from_image(img: DynamicImage) -> Self {
        let rgb = img.into_rgb8();
        Self {
            width: rgb.width(),
            height: rgb.height(),
            image: Arc::new(rgb),
        }
    }

    /// A 1x1 texture of a single [0, 1] color.
    pub fn solid(color: Vector3<f32>) -> Self {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let pixel = image::Rgb([to_byte(color.x), to_byte(color.y), to_byte(color.z)]);
        Self::from_image(DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, pixel)))
    }

    /// Nearest-neighbor sample. UV in [0, 1], V grows down the image.
    ///
    /// Coordinates that land outside the image are clamped to the border texel.
    pub fn sample(&self, uv: &Vector2<f32>) -> Vector3<f32> {
        // `as u32` saturates negatives to 0
        let x = ((uv.x * self.width as f32) as u32).min(self.width - 1);
        let y = ((uv.y * self.height as f32) as u32).min(self.height - 1);

        let pixel = self.image.get_pixel(x, y);
        Vector3::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }
}
