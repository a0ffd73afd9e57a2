use crate::core::color::{max_to_one, pack_rgb};
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::{Fragment, TransformedVertex, normalize_or_zero};
use crate::core::math::interpolation::{
    barycentric_weights, interpolate_reciprocal, perspective_interpolate, safe_recip,
};
use crate::core::math::transform::ndc_to_screen;
use crate::core::pipeline::FragmentShader;
use nalgebra::{Point2, Vector3};

/// The Rasterizer is responsible for drawing triangles onto the FrameBuffer.
///
/// Triangles with any vertex outside the NDC square are dropped whole; there is
/// no polygon clipping. Coverage uses closed half-planes with clockwise-on-screen
/// winding, so counter-clockwise (back-facing) triangles produce no pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rasterizer;

impl Rasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Rasterize a single triangle of transformed vertices.
    ///
    /// Returns the number of pixels that passed the depth test and were shaded.
    pub fn rasterize_triangle<S: FragmentShader + ?Sized>(
        &self,
        framebuffer: &mut FrameBuffer,
        shader: &S,
        vertices: [&TransformedVertex; 3],
    ) -> usize {
        // 1. Whole-triangle frustum discard
        if vertices.iter().any(|v| !v.is_inside_ndc()) {
            return 0;
        }

        // 2. Viewport transform
        let width = framebuffer.width as f32;
        let height = framebuffer.height as f32;
        let screen = vertices.map(|v| ndc_to_screen(v.position.x, v.position.y, width, height));

        // 3. Bounding box, one pixel of slack on each side
        let (start_x, start_y, end_x, end_y) =
            Self::compute_bounding_box(&screen, framebuffer.width, framebuffer.height);

        let inv_ws = vertices.map(|v| safe_recip(v.position.w));
        let zs = vertices.map(|v| v.position.z);
        let mut shaded = 0;

        // 4. Pixel loop
        for y in start_y..=end_y {
            for x in start_x..=end_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

                let Some(weights) = barycentric_weights(pixel_center, screen[0], screen[1], screen[2])
                else {
                    continue;
                };

                // Depth: interpolate 1/z
                let depth = 1.0 / interpolate_reciprocal(&weights, zs);
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }

                if !framebuffer.depth_test_and_update(x, y, depth) {
                    continue;
                }

                let fragment = Self::interpolate_fragment(x, y, depth, &weights, &inv_ws, vertices);
                let color = max_to_one(shader.shade(&fragment));
                framebuffer.set_pixel(x, y, pack_rgb(color));
                shaded += 1;
            }
        }

        shaded
    }

    /// Perspective-correct interpolation of every vertex attribute.
    fn interpolate_fragment(
        x: usize,
        y: usize,
        depth: f32,
        weights: &Vector3<f32>,
        inv_ws: &[f32; 3],
        v: [&TransformedVertex; 3],
    ) -> Fragment {
        let inv_w = weights.x * inv_ws[0] + weights.y * inv_ws[1] + weights.z * inv_ws[2];
        let w = safe_recip(inv_w);

        Fragment {
            pixel: Point2::new(x, y),
            depth,
            w,
            uv: perspective_interpolate([v[0].uv, v[1].uv, v[2].uv], weights, inv_ws, w),
            normal: normalize_or_zero(perspective_interpolate(
                [v[0].normal, v[1].normal, v[2].normal],
                weights,
                inv_ws,
                w,
            )),
            tangent: normalize_or_zero(perspective_interpolate(
                [v[0].tangent, v[1].tangent, v[2].tangent],
                weights,
                inv_ws,
                w,
            )),
            view_direction: normalize_or_zero(perspective_interpolate(
                [v[0].view_direction, v[1].view_direction, v[2].view_direction],
                weights,
                inv_ws,
                w,
            )),
        }
    }

    /// Inclusive pixel range covering the triangle, clamped to the buffer.
    fn compute_bounding_box(
        points: &[Point2<f32>; 3],
        width: usize,
        height: usize,
    ) -> (usize, usize, usize, usize) {
        let max_x = (width - 1) as f32;
        let max_y = (height - 1) as f32;

        let min_px = (points[0].x.min(points[1].x).min(points[2].x) - 1.0).floor();
        let min_py = (points[0].y.min(points[1].y).min(points[2].y) - 1.0).floor();
        let max_px = (points[0].x.max(points[1].x).max(points[2].x) + 1.0).ceil();
        let max_py = (points[0].y.max(points[1].y).max(points[2].y) + 1.0).ceil();

        (
            min_px.clamp(0.0, max_x) as usize,
            min_py.clamp(0.0, max_y) as usize,
            max_px.clamp(0.0, max_x) as usize,
            max_py.clamp(0.0, max_y) as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::unpack_rgb;
    use crate::pipeline::shaders::flat::FlatShader;
    use nalgebra::{Vector2, Vector4};
    use std::cell::RefCell;

    const BACKGROUND: u32 = 0xFF00_0000;

    fn vertex(ndc_x: f32, ndc_y: f32, z: f32, w: f32) -> TransformedVertex {
        TransformedVertex {
            position: Vector4::new(ndc_x, ndc_y, z, w),
            normal: Vector3::z(),
            tangent: Vector3::x(),
            view_direction: Vector3::z(),
            ..Default::default()
        }
    }

    fn framebuffer(size: usize) -> FrameBuffer {
        let mut fb = FrameBuffer::new(size, size).unwrap();
        fb.clear(Vector3::zeros(), f32::INFINITY);
        fb
    }

    /// Records every fragment it is asked to shade.
    struct RecordingShader {
        fragments: RefCell<Vec<Fragment>>,
    }

    impl FragmentShader for RecordingShader {
        fn shade(&self, fragment: &Fragment) -> Vector3<f32> {
            self.fragments.borrow_mut().push(*fragment);
            Vector3::new(1.0, 1.0, 1.0)
        }
    }

    #[test]
    fn pixel_center_on_edge_is_covered() {
        // Screen (0.5, 2.5) -> (8.5, 2.5) -> (8.5, 10.5) on a 16x16 target.
        let mut fb = framebuffer(16);
        let a = vertex(-0.9375, 0.6875, 0.5, 1.0);
        let b = vertex(0.0625, 0.6875, 0.5, 1.0);
        let c = vertex(0.0625, -0.3125, 0.5, 1.0);
        let shader = FlatShader::new(Vector3::new(1.0, 1.0, 1.0));

        let shaded = Rasterizer::new().rasterize_triangle(&mut fb, &shader, [&a, &b, &c]);
        assert!(shaded > 0);

        // Center (4.5, 2.5) lies exactly on edge AB.
        assert_ne!(fb.get_pixel(4, 2), Some(BACKGROUND));
        // One row up is outside.
        assert_eq!(fb.get_pixel(4, 1), Some(BACKGROUND));
        assert_eq!(fb.get_depth(4, 1), Some(f32::INFINITY));
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let near = [
            vertex(-0.5, 0.5, 0.3, 1.0),
            vertex(0.5, 0.5, 0.3, 1.0),
            vertex(0.5, -0.5, 0.3, 1.0),
        ];
        let far = [
            vertex(-0.6, 0.6, 0.7, 1.0),
            vertex(0.6, 0.6, 0.7, 1.0),
            vertex(0.6, -0.6, 0.7, 1.0),
        ];
        let red = FlatShader::new(Vector3::new(1.0, 0.0, 0.0));
        let blue = FlatShader::new(Vector3::new(0.0, 0.0, 1.0));
        let rasterizer = Rasterizer::new();

        let mut near_first = framebuffer(64);
        rasterizer.rasterize_triangle(&mut near_first, &red, [&near[0], &near[1], &near[2]]);
        rasterizer.rasterize_triangle(&mut near_first, &blue, [&far[0], &far[1], &far[2]]);

        let mut far_first = framebuffer(64);
        rasterizer.rasterize_triangle(&mut far_first, &blue, [&far[0], &far[1], &far[2]]);
        rasterizer.rasterize_triangle(&mut far_first, &red, [&near[0], &near[1], &near[2]]);

        // Inside the near triangle (upper right half of its square).
        for (x, y) in [(40, 20), (45, 30), (35, 18)] {
            assert_eq!(near_first.get_pixel(x, y).map(unpack_rgb), Some([255, 0, 0]));
            assert_eq!(far_first.get_pixel(x, y).map(unpack_rgb), Some([255, 0, 0]));
        }
        assert_eq!(near_first.color_buffer(), far_first.color_buffer());
    }

    #[test]
    fn attributes_are_perspective_correct() {
        // Screen (10, 10), (90, 10), (90, 90); the first vertex is much closer.
        let mut a = vertex(-0.8, 0.8, 0.5, 1.0);
        let mut b = vertex(0.8, 0.8, 0.5, 10.0);
        let mut c = vertex(0.8, -0.8, 0.5, 10.0);
        a.uv = Vector2::new(0.0, 0.0);
        b.uv = Vector2::new(1.0, 0.0);
        c.uv = Vector2::new(1.0, 1.0);

        let shader = RecordingShader {
            fragments: RefCell::new(Vec::new()),
        };
        let mut fb = framebuffer(100);
        Rasterizer::new().rasterize_triangle(&mut fb, &shader, [&a, &b, &c]);

        // Pixel closest to the screen-space centroid (63.3, 36.7).
        let fragments = shader.fragments.borrow();
        let centroid = fragments
            .iter()
            .find(|f| f.pixel == Point2::new(63, 36))
            .expect("centroid pixel is covered");

        // Affine interpolation would give u ~= 2/3 here.
        let affine_u = 2.0 / 3.0;
        assert!((centroid.uv.x - affine_u).abs() > 0.3, "u = {}", centroid.uv.x);
        assert!((centroid.uv.x - 1.0 / 6.0).abs() < 0.05);
        assert!(centroid.w > 1.0 && centroid.w < 10.0);
    }

    #[test]
    fn triangle_with_vertex_outside_ndc_is_discarded() {
        let mut fb = framebuffer(32);
        let a = vertex(-0.5, 0.5, 0.5, 1.0);
        let b = vertex(1.01, 0.5, 0.5, 1.0);
        let c = vertex(0.5, -0.5, 0.5, 1.0);
        let shader = FlatShader::new(Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(Rasterizer::new().rasterize_triangle(&mut fb, &shader, [&a, &b, &c]), 0);
        assert!(fb.color_buffer().iter().all(|&p| p == BACKGROUND));
    }

    #[test]
    fn depth_outside_unit_range_is_discarded() {
        let mut fb = framebuffer(32);
        let shader = FlatShader::new(Vector3::new(1.0, 1.0, 1.0));
        let tri = [
            vertex(-0.5, 0.5, 1.5, 1.0),
            vertex(0.5, 0.5, 1.5, 1.0),
            vertex(0.5, -0.5, 1.5, 1.0),
        ];
        assert_eq!(
            Rasterizer::new().rasterize_triangle(&mut fb, &shader, [&tri[0], &tri[1], &tri[2]]),
            0
        );
    }

    #[test]
    fn back_facing_triangle_is_not_drawn() {
        let mut fb = framebuffer(32);
        let shader = FlatShader::new(Vector3::new(1.0, 1.0, 1.0));
        let a = vertex(-0.5, 0.5, 0.5, 1.0);
        let b = vertex(0.5, 0.5, 0.5, 1.0);
        let c = vertex(0.5, -0.5, 0.5, 1.0);
        assert_eq!(Rasterizer::new().rasterize_triangle(&mut fb, &shader, [&a, &c, &b]), 0);
    }

    #[test]
    fn overbright_colors_keep_their_hue() {
        let mut fb = framebuffer(16);
        let shader = FlatShader::new(Vector3::new(4.0, 2.0, 0.0));
        let a = vertex(-0.5, 0.5, 0.5, 1.0);
        let b = vertex(0.5, 0.5, 0.5, 1.0);
        let c = vertex(0.5, -0.5, 0.5, 1.0);
        Rasterizer::new().rasterize_triangle(&mut fb, &shader, [&a, &b, &c]);
        assert_eq!(fb.get_pixel(10, 5).map(unpack_rgb), Some([255, 127, 0]));
    }
}
