//! Mesh representation and procedural geometry
//!
//! [`Mesh`] is plain CPU-side vertex and index data with no backend types.
//! Backends turn it into GPU buffers on upload. The generators build the
//! three shapes a planetarium scene needs: UV spheres, flat annuli and tori.

use std::f32::consts::{PI, TAU};

/// Vertex with position, normal and texture coordinate
///
/// `#[repr(C)]` keeps the layout stable for GPU uploads; the Vulkan backend
/// describes the same offsets in its vertex input state.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Unit normal
    pub normal: [f32; 3],

    /// Texture coordinates, `v` pointing down the image
    pub tex_coord: [f32; 2],
}

// Only f32 arrays, no padding
unsafe impl bytemuck::Pod for Vertex {}
unsafe impl bytemuck::Zeroable for Vertex {}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Triangle indices, three per triangle
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh from raw vertex and index data
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// UV sphere centred on the origin
    ///
    /// Produces `(width_segments + 1) * (height_segments + 1)` vertices; the
    /// seam and pole rows are duplicated so texture coordinates stay
    /// continuous. The degenerate triangles at the poles are skipped.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let row = width_segments + 1;

        let mut vertices = Vec::with_capacity((row * (height_segments + 1)) as usize);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let (sin_theta, cos_theta) = (v * PI).sin_cos();

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (sin_phi, cos_phi) = (u * TAU).sin_cos();

                let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
                let position = normal.map(|n| n * radius);
                vertices.push(Vertex::new(position, normal, [u, v]));
            }
        }

        let mut indices = Vec::with_capacity((6 * width_segments * (height_segments - 1)) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self::new(vertices, indices)
    }

    /// Flat annulus in the XY plane, facing +Z
    ///
    /// The two radii may be given in either order. Rotate the node a quarter
    /// turn about X to lay it in the XZ plane.
    pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> Self {
        let theta_segments = theta_segments.max(3);
        let row = theta_segments + 1;
        let uv_extent = inner_radius.abs().max(outer_radius.abs());

        let mut vertices = Vec::with_capacity((row * 2) as usize);
        for radius in [inner_radius, outer_radius] {
            for i in 0..=theta_segments {
                let angle = i as f32 / theta_segments as f32 * TAU;
                let (sin, cos) = angle.sin_cos();
                let (x, y) = (radius * cos, radius * sin);
                let uv = [(x / uv_extent + 1.0) * 0.5, (y / uv_extent + 1.0) * 0.5];
                vertices.push(Vertex::new([x, y, 0.0], [0.0, 0.0, 1.0], uv));
            }
        }

        let mut indices = Vec::with_capacity((6 * theta_segments) as usize);
        for i in 0..theta_segments {
            let a = i;
            let b = i + row;
            let c = i + row + 1;
            let d = i + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        Self::new(vertices, indices)
    }

    /// Torus around the Z axis, lying in the XY plane
    ///
    /// `radius` is the distance from the centre to the middle of the tube,
    /// `tube` the tube's own radius.
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial_segments = radial_segments.max(3);
        let tubular_segments = tubular_segments.max(3);
        let row = tubular_segments + 1;

        let mut vertices = Vec::with_capacity((row * (radial_segments + 1)) as usize);
        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32;
            let (sin_v, cos_v) = (v * TAU).sin_cos();

            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32;
                let (sin_u, cos_u) = (u * TAU).sin_cos();

                let ring = radius + tube * cos_v;
                let position = [ring * cos_u, ring * sin_u, tube * sin_v];
                let normal = [cos_v * cos_u, cos_v * sin_u, sin_v];
                vertices.push(Vertex::new(position, normal, [u, v]));
            }
        }

        let mut indices = Vec::with_capacity((6 * radial_segments * tubular_segments) as usize);
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self::new(vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn length(v: [f32; 3]) -> f32 {
        v.iter().map(|c| c * c).sum::<f32>().sqrt()
    }

    fn indices_in_range(mesh: &Mesh) -> bool {
        mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len())
    }

    #[test]
    fn test_sphere_counts() {
        let sphere = Mesh::sphere(2.0, 50, 50);
        assert_eq!(sphere.vertices.len(), 51 * 51);
        assert_eq!(sphere.indices.len(), 6 * 50 * 49);
        assert!(indices_in_range(&sphere));
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let sphere = Mesh::sphere(6.0, 16, 12);
        for vertex in &sphere.vertices {
            assert_relative_eq!(length(vertex.position), 6.0, epsilon = 1e-4);
            assert_relative_eq!(length(vertex.normal), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_ring_counts_and_radii() {
        let ring = Mesh::ring(30.01, 29.99, 320);
        assert_eq!(ring.vertices.len(), 2 * 321);
        assert_eq!(ring.indices.len(), 6 * 320);
        assert!(indices_in_range(&ring));

        for vertex in &ring.vertices {
            let r = length(vertex.position);
            assert!((29.99 - 1e-3..=30.01 + 1e-3).contains(&r));
            assert_relative_eq!(vertex.position[2], 0.0);
        }
    }

    #[test]
    fn test_torus_counts() {
        let torus = Mesh::torus(3.0, 0.2, 48, 64);
        assert_eq!(torus.vertices.len(), 49 * 65);
        assert_eq!(torus.indices.len(), 6 * 48 * 64);
        assert_eq!(torus.triangle_count(), 2 * 48 * 64);
        assert!(indices_in_range(&torus));
    }

    #[test]
    fn test_torus_vertices_within_tube() {
        let torus = Mesh::torus(3.0, 0.2, 12, 24);
        for vertex in &torus.vertices {
            let [x, y, z] = vertex.position;
            let from_centre_line = (x.hypot(y) - 3.0).hypot(z);
            assert_relative_eq!(from_centre_line, 0.2, epsilon = 1e-4);
        }
    }
}
