//! Mesh geometry representation.
//!
//! A mesh is an indexed triangle list that the renderer flattens into
//! independent triangle primitives. No shared-vertex topology survives
//! that conversion.

use ember_math::Vec3;

use crate::obj::{LoadError, LoadResult};

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals, parallel to `positions` when present
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

/// One triangle extracted from a mesh, in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTriangle {
    pub positions: [Vec3; 3],
    pub normals: Option<[Vec3; 3]>,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    ///
    /// Normals are NOT computed automatically. Call `compute_normals()` if
    /// smooth shading is wanted for a mesh that shipped without them.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Check the index buffer and normal array against the vertex count.
    pub fn validate(&self) -> LoadResult<()> {
        if self.indices.len() % 3 != 0 {
            return Err(LoadError::IncompleteFace(self.indices.len()));
        }

        let vertex_count = self.positions.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(LoadError::InvalidIndex {
                index,
                vertex_count,
            });
        }

        if let Some(normals) = &self.normals {
            if normals.len() != vertex_count {
                return Err(LoadError::NormalCountMismatch {
                    normals: normals.len(),
                    vertices: vertex_count,
                });
            }
        }

        Ok(())
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Face normals are accumulated unnormalized, so larger faces weigh more.
    /// Counter-clockwise winding is treated as front facing.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let edge1 = self.positions[i1] - self.positions[i0];
            let edge2 = self.positions[i2] - self.positions[i0];
            let face_normal = edge1.cross(edge2);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            // Isolated or degenerate vertices get an arbitrary up vector
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds()
            .map(|(min, max)| (min + max) * 0.5)
            .unwrap_or(Vec3::ZERO)
    }

    /// Get the mesh size (diagonal length of bounding box).
    pub fn size(&self) -> f64 {
        self.bounds()
            .map(|(min, max)| (max - min).length())
            .unwrap_or(0.0)
    }

    /// Extract every triangle with its vertex positions and normals.
    pub fn triangles(&self) -> LoadResult<Vec<MeshTriangle>> {
        self.validate()?;

        let triangles = self
            .indices
            .chunks_exact(3)
            .map(|face| {
                let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
                MeshTriangle {
                    positions: [self.positions[i0], self.positions[i1], self.positions[i2]],
                    normals: self
                        .normals
                        .as_ref()
                        .map(|n| [n[i0], n[i1], n[i2]]),
                }
            })
            .collect();

        Ok(triangles)
    }
}
