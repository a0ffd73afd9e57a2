use crate::core::color::pack_rgb;
use crate::error::{RasterError, Result};
use log::debug;
use nalgebra::Vector3;

/// Represents a 2D buffer containing color and depth information.
///
/// Allocated once at startup and reused every frame. Owned by a single render
/// call at a time, so plain `Vec`s are enough.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,

    /// Packed `0xFFRRGGBB` pixels, row-major.
    color_buffer: Vec<u32>,

    /// One depth per pixel, row-major.
    depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let size = width
            .checked_mul(height)
            .filter(|&size| size > 0)
            .ok_or(RasterError::InvalidDimensions { width, height })?;

        debug!("Allocating {}x{} framebuffer", width, height);

        Ok(Self {
            width,
            height,
            color_buffer: vec![0; size],
            depth_buffer: vec![f32::INFINITY; size],
        })
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Fills the color buffer with `color` and resets every depth to `depth`.
    pub fn clear(&mut self, color: Vector3<f32>, depth: f32) {
        self.color_buffer.fill(pack_rgb(color));
        self.depth_buffer.fill(depth);
    }

    /// Strict less-than depth test.
    /// Returns true and stores `new_depth` if it is closer than the stored value;
    /// equal depths keep the earlier write.
    #[inline]
    pub fn depth_test_and_update(&mut self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        if new_depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = new_depth;
            true
        } else {
            false
        }
    }

    /// Writes a packed pixel. Should only be called after a passing depth test.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: u32) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.color_buffer[idx] = pixel;
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u32> {
        self.in_bounds(x, y)
            .then(|| self.color_buffer[self.index(x, y)])
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        self.in_bounds(x, y)
            .then(|| self.depth_buffer[self.index(x, y)])
    }

    /// The whole color buffer, ready for presentation.
    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            FrameBuffer::new(0, 10),
            Err(RasterError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn clear_resets_both_buffers() {
        let mut fb = FrameBuffer::new(4, 3).unwrap();
        assert!(fb.depth_test_and_update(1, 1, 0.5));
        fb.set_pixel(1, 1, 0xFFFF_FFFF);

        fb.clear(Vector3::new(1.0, 0.0, 0.0), f32::INFINITY);
        assert!(fb.color_buffer().iter().all(|&p| p == 0xFFFF_0000));
        assert!(fb.depth_buffer().iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn depth_test_is_strict_less() {
        let mut fb = FrameBuffer::new(2, 2).unwrap();
        assert!(fb.depth_test_and_update(0, 0, 0.7));
        assert!(!fb.depth_test_and_update(0, 0, 0.7));
        assert!(!fb.depth_test_and_update(0, 0, 0.8));
        assert!(fb.depth_test_and_update(0, 0, 0.3));
        assert_eq!(fb.get_depth(0, 0), Some(0.3));
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut fb = FrameBuffer::new(2, 2).unwrap();
        assert!(!fb.depth_test_and_update(2, 0, 0.1));
        fb.set_pixel(0, 5, 1);
        assert_eq!(fb.get_pixel(0, 5), None);
    }
}
