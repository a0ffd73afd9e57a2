use crate::core::geometry::Vertex;
use crate::error::Result;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file into a single vertex/index pair, merging all sub-meshes.
///
/// Faces are triangulated and positions, normals and UVs share one index, so
/// the result is a triangle list. Tangents are generated from the UVs.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<(Vec<Vertex>, Vec<u32>)> {
    let path = path.as_ref();
    info!("Loading OBJ file: {:?}", path);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Important: Unifies indices for Position/Normal/UV
        ..Default::default()
    };

    // Materials are ignored; textures come from the config.
    let (models, _materials) = tobj::load_obj(path, &load_options)?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut index_offset = 0;

    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = !mesh.normals.is_empty();
        let has_texcoords = !mesh.texcoords.is_empty();

        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. Using default (0, 1, 0).",
                model.name
            );
        }
        if !has_texcoords {
            warn!("Mesh '{}' is missing texture coordinates.", model.name);
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );

            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::y()
            };

            // OBJ v points up the image; textures are sampled top-down.
            let texcoord = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(Vertex::new(position, texcoord, normal, Vector3::zeros()));
        }

        // Offset by the vertices already merged from earlier sub-meshes.
        indices.extend(mesh.indices.iter().map(|index| index + index_offset));
        index_offset += num_vertices as u32;
    }

    compute_tangents(&mut vertices, &indices);

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total indices: {}",
        vertices.len(),
        indices.len()
    );

    Ok((vertices, indices))
}

/// Fills in per-vertex tangents for a triangle list.
///
/// Each triangle contributes its UV-aligned tangent to its three corners; the
/// sums are then made orthogonal to the vertex normal and normalized.
pub fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![Vector3::<f32>::zeros(); vertices.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }
        let (v0, v1, v2) = (&vertices[i0], &vertices[i1], &vertices[i2]);

        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;
        let duv1 = v1.texcoord - v0.texcoord;
        let duv2 = v2.texcoord - v0.texcoord;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < 1e-8 {
            continue;
        }
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) / det;

        accumulated[i0] += tangent;
        accumulated[i1] += tangent;
        accumulated[i2] += tangent;
    }

    for (vertex, tangent) in vertices.iter_mut().zip(accumulated) {
        let n = vertex.normal;
        // Gram-Schmidt
        let orthogonal = tangent - n * n.dot(&tangent);
        vertex.tangent = orthogonal
            .try_normalize(1e-8)
            .unwrap_or_else(|| fallback_tangent(&n));
    }
}

/// Any unit vector perpendicular to `normal`.
fn fallback_tangent(normal: &Vector3<f32>) -> Vector3<f32> {
    let axis = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    normal
        .cross(&axis)
        .cross(normal)
        .try_normalize(1e-8)
        .unwrap_or(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::texture::Texture;
    use std::io::Write;

    const QUAD: &str = "\
v -1.0 -1.0 0.0
v  1.0 -1.0 0.0
v  1.0  1.0 0.0
v -1.0  1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 -1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn loads_and_triangulates_quad() {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(QUAD.as_bytes()).unwrap();

        let (vertices, indices) = load_obj(file.path()).unwrap();
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 6);
        assert!(vertices.iter().all(|v| v.normal == Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn v_is_flipped_to_image_rows() {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(QUAD.as_bytes()).unwrap();

        let (vertices, _) = load_obj(file.path()).unwrap();
        let top_right = vertices
            .iter()
            .find(|v| v.position == Point3::new(1.0, 1.0, 0.0))
            .unwrap();
        assert_eq!(top_right.texcoord, Vector2::new(1.0, 0.0));

        // vt 1 1 is the top row of the image.
        let mut img = image::RgbImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        img.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        let tex = Texture::from_image(image::DynamicImage::ImageRgb8(img));
        assert_eq!(tex.sample(&top_right.texcoord), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn tangents_follow_u_direction() {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(QUAD.as_bytes()).unwrap();

        let (vertices, _) = load_obj(file.path()).unwrap();
        for v in &vertices {
            assert!((v.tangent - Vector3::x()).norm() < 1e-5, "{:?}", v.tangent);
            assert!(v.tangent.dot(&v.normal).abs() < 1e-6);
        }
    }

    #[test]
    fn degenerate_uvs_still_give_unit_tangent() {
        let mut vertices: Vec<Vertex> = (0..3)
            .map(|i| {
                Vertex::new(
                    Point3::new(i as f32, (i % 2) as f32, 0.0),
                    Vector2::zeros(),
                    Vector3::z(),
                    Vector3::zeros(),
                )
            })
            .collect();
        compute_tangents(&mut vertices, &[0, 1, 2]);
        for v in &vertices {
            assert!((v.tangent.norm() - 1.0).abs() < 1e-5);
            assert!(v.tangent.dot(&v.normal).abs() < 1e-6);
        }
    }

    #[test]
    fn missing_file_is_obj_error() {
        let err = load_obj("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, crate::error::RasterError::Obj(_)));
    }
}
