use crate::core::color::unpack_rgb;
use crate::core::framebuffer::FrameBuffer;
use crate::error::Result;
use image::RgbImage;
use log::info;
use rayon::prelude::*;
use std::path::Path;

/// Converts the packed color buffer into an RGB image, one row per task.
pub fn framebuffer_to_image(fb: &FrameBuffer) -> RgbImage {
    let width = fb.width;
    let mut raw = vec![0u8; width * fb.height * 3];

    raw.par_chunks_mut(width * 3)
        .zip(fb.color_buffer().par_chunks(width))
        .for_each(|(row_out, row_in)| {
            for (dst, &pixel) in row_out.chunks_exact_mut(3).zip(row_in) {
                dst.copy_from_slice(&unpack_rgb(pixel));
            }
        });

    // Buffer length always matches the dimensions.
    RgbImage::from_raw(width as u32, fb.height as u32, raw)
        .unwrap_or_else(|| RgbImage::new(width as u32, fb.height as u32))
}

/// Saves the framebuffer as an image; the format follows the file extension.
pub fn save_framebuffer_to_image<P: AsRef<Path>>(fb: &FrameBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    framebuffer_to_image(fb).save(path)?;
    info!("Saved {}x{} frame to {:?}", fb.width, fb.height, path);
    Ok(())
}
