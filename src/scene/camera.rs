use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::FRAC_PI_2;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

const MIN_FOV_DEG: f32 = 10.0;
const MAX_FOV_DEG: f32 = 120.0;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Left-handed perspective camera looking down +Z by default.
///
/// Keeps the view matrix equal to the inverse of its orthonormal basis and
/// rebuilds both matrices whenever origin, orientation or FOV change.
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Point3<f32>,
    pub forward: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,

    /// Vertical field of view in degrees.
    fov_deg: f32,
    aspect_ratio: f32,

    total_yaw: f32,
    total_pitch: f32,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(origin: Point3<f32>, fov_deg: f32, aspect_ratio: f32) -> Self {
        let mut cam = Self {
            origin,
            forward: Vector3::z(),
            right: Vector3::x(),
            up: Vector3::y(),
            fov_deg: fov_deg.clamp(MIN_FOV_DEG, MAX_FOV_DEG),
            aspect_ratio,
            total_yaw: 0.0,
            total_pitch: 0.0,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    /// Recomputes the basis from `forward`, then both matrices.
    pub fn update_matrices(&mut self) {
        self.right = Vector3::y().cross(&self.forward).normalize();
        self.up = self.forward.cross(&self.right).normalize();

        let basis =
            TransformFactory::orthonormal_basis(&self.right, &self.up, &self.forward, &self.origin);
        self.view_matrix = TransformFactory::view_from_basis(&basis);
        self.projection_matrix = TransformFactory::perspective_lh(
            self.fov_deg.to_radians(),
            self.aspect_ratio,
            NEAR_PLANE,
            FAR_PLANE,
        );
    }

    /// Moves the camera without changing where it looks.
    pub fn translate(&mut self, offset: &Vector3<f32>) {
        self.origin += *offset;
        self.update_matrices();
    }

    /// Adds yaw (around world Y) and pitch (around the camera's right axis), in radians.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.total_yaw += yaw_delta;
        self.total_pitch = (self.total_pitch + pitch_delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let rotation = TransformFactory::rotation_y(self.total_yaw)
            * TransformFactory::rotation_x(self.total_pitch);
        self.forward = (rotation * Vector3::z().to_homogeneous()).xyz().normalize();
        self.update_matrices();
    }

    pub fn set_fov(&mut self, fov_deg: f32) {
        self.fov_deg = fov_deg.clamp(MIN_FOV_DEG, MAX_FOV_DEG);
        self.update_matrices();
    }

    pub fn fov(&self) -> f32 {
        self.fov_deg
    }

    pub fn basis_matrix(&self) -> Matrix4<f32> {
        TransformFactory::orthonormal_basis(&self.right, &self.up, &self.forward, &self.origin)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_basis_is_left_handed() {
        let cam = Camera::new(Point3::origin(), 90.0, 1.0);
        assert!((cam.right - Vector3::x()).norm() < 1e-6);
        assert!((cam.up - Vector3::y()).norm() < 1e-6);
    }

    #[test]
    fn view_is_inverse_of_basis_after_moves() {
        let mut cam = Camera::new(Point3::new(0.0, 0.0, -5.0), 45.0, 16.0 / 9.0);
        cam.rotate(0.4, -0.2);
        cam.translate(&Vector3::new(1.0, 2.0, 3.0));

        let product = cam.view_matrix() * cam.basis_matrix();
        assert!((product - Matrix4::identity()).norm() < 1e-5);
    }

    #[test]
    fn point_ahead_projects_to_center() {
        let cam = Camera::new(Point3::new(0.0, 0.0, -5.0), 90.0, 1.0);
        let clip = cam.projection_matrix()
            * cam.view_matrix()
            * Point3::new(0.0, 0.0, 0.0).to_homogeneous();
        assert!((clip.w - 5.0).abs() < 1e-5);
        assert!(clip.x.abs() < 1e-6 && clip.y.abs() < 1e-6);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn yaw_turns_right() {
        let mut cam = Camera::new(Point3::origin(), 45.0, 1.0);
        cam.rotate(FRAC_PI_2, 0.0);
        assert!((cam.forward - Vector3::x()).norm() < 1e-5);
    }

    #[test]
    fn fov_is_clamped() {
        let mut cam = Camera::new(Point3::origin(), 45.0, 1.0);
        cam.set_fov(500.0);
        assert_eq!(cam.fov(), 120.0);
    }
}
