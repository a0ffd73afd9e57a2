use crate::core::geometry::Vertex;
use crate::core::math::transform::TransformFactory;
use crate::core::topology::Topology;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// A collection of vertices and indices representing a 3D object.
///
/// Vertices and indices never change after construction; only the world
/// matrix is animated.
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    pub topology: Topology,
    pub world_matrix: Matrix4<f32>,
}

impl Mesh {
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        topology: Topology,
        world_matrix: Matrix4<f32>,
    ) -> Self {
        Self {
            vertices,
            indices,
            topology,
            world_matrix,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Spins the mesh around its own Y axis.
    pub fn rotate_y(&mut self, angle_rad: f32) {
        self.world_matrix *= TransformFactory::rotation_y(angle_rad);
    }

    /// Axis-aligned cube of side 1 centered at the origin: 8 shared vertices,
    /// 12 triangles, front faces clockwise when seen from outside.
    pub fn unit_cube(world_matrix: Matrix4<f32>) -> Self {
        #[rustfmt::skip]
        let corners = [
            (-0.5, -0.5, -0.5), ( 0.5, -0.5, -0.5), ( 0.5,  0.5, -0.5), (-0.5,  0.5, -0.5),
            (-0.5, -0.5,  0.5), ( 0.5, -0.5,  0.5), ( 0.5,  0.5,  0.5), (-0.5,  0.5,  0.5),
        ];

        let vertices = corners
            .iter()
            .map(|&(x, y, z)| {
                let position = Point3::new(x, y, z);
                // Shared corners: the normal points away from the center.
                let normal = position.coords.normalize();
                let tangent = Vector3::y().cross(&normal).try_normalize(1e-6).unwrap_or_else(Vector3::x);
                let texcoord = Vector2::new(x + 0.5, 0.5 - y);
                Vertex::new(position, texcoord, normal, tangent)
            })
            .collect();

        #[rustfmt::skip]
        let indices = vec![
            3, 2, 1,  3, 1, 0, // front  (-Z)
            4, 5, 6,  4, 6, 7, // back   (+Z)
            1, 2, 6,  1, 6, 5, // right  (+X)
            0, 4, 7,  0, 7, 3, // left   (-X)
            3, 7, 6,  3, 6, 2, // top    (+Y)
            0, 1, 5,  0, 5, 4, // bottom (-Y)
        ];

        Self::new(vertices, indices, Topology::TriangleList, world_matrix)
    }
}
