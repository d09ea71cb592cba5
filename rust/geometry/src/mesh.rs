// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use slice27_core::BoxBounds;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Suffix appended to the name of a working copy
pub const SLICED_SUFFIX: &str = "_27sliced";

/// A contiguous range of the index buffer drawn with one material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubMesh {
    /// First index in [`Mesh::indices`]
    pub index_start: usize,
    /// Number of indices (multiple of 3)
    pub index_count: usize,
}

impl SubMesh {
    /// Create a new sub-mesh range
    pub fn new(index_start: usize, index_count: usize) -> Self {
        Self {
            index_start,
            index_count,
        }
    }
}

/// Triangle mesh
///
/// Only `positions` are rewritten by slicing. The remaining attributes are
/// carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Mesh {
    /// Asset name
    pub name: String,
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v)
    pub uvs: Vec<f32>,
    /// Vertex colors (r, g, b, a)
    pub colors: Vec<f32>,
    /// Vertex tangents (x, y, z, w)
    pub tangents: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
    /// Index ranges per material; empty means one implicit sub-mesh
    pub submeshes: Vec<SubMesh>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a mesh holding only positions
    pub fn from_positions(name: impl Into<String>, positions: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            positions,
            ..Self::default()
        }
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of sub-meshes (at least 1 for a mesh with indices)
    pub fn submesh_count(&self) -> usize {
        if self.submeshes.is_empty() {
            usize::from(!self.indices.is_empty())
        } else {
            self.submeshes.len()
        }
    }

    /// Index slice of one sub-mesh
    pub fn submesh_indices(&self, submesh: usize) -> Option<&[u32]> {
        if self.submeshes.is_empty() {
            return (submesh == 0 && !self.indices.is_empty()).then_some(&self.indices[..]);
        }
        let range = self.submeshes.get(submesh)?;
        self.indices
            .get(range.index_start..range.index_start + range.index_count)
    }

    /// Position of one vertex in f64
    #[inline]
    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        let chunk = self.positions.get(index * 3..index * 3 + 3)?;
        Some(Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64))
    }

    /// Calculate bounds (min, max) - optimized with chunk iteration
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }

    /// Axis-aligned bounding box in f64, `None` for an empty mesh
    pub fn bounding_box(&self) -> Option<BoxBounds> {
        if self.is_empty() {
            return None;
        }
        let (min, max) = self.bounds();
        Some(BoxBounds::new(min.cast::<f64>(), max.cast::<f64>()))
    }

    /// Check buffer shapes, attribute lengths, index range and finiteness
    pub fn validate(&self) -> Result<()> {
        if self.positions.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "'{}': position buffer length {} is not a multiple of 3",
                self.name,
                self.positions.len()
            )));
        }
        let vertex_count = self.vertex_count();

        let attributes: [(&str, usize, usize); 4] = [
            ("normals", self.normals.len(), 3),
            ("uvs", self.uvs.len(), 2),
            ("colors", self.colors.len(), 4),
            ("tangents", self.tangents.len(), 4),
        ];
        for (attribute, len, stride) in attributes {
            if len != 0 && len != vertex_count * stride {
                return Err(Error::InvalidMesh(format!(
                    "'{}': {attribute} has {} entries for {vertex_count} vertices",
                    self.name,
                    len / stride
                )));
            }
        }

        if let Some(pos) = self.positions.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidMesh(format!(
                "'{}': vertex {} has a non-finite coordinate",
                self.name,
                pos / 3
            )));
        }

        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(Error::InvalidMesh(format!(
                "'{}': index {bad} out of range for {vertex_count} vertices",
                self.name
            )));
        }

        for (i, sub) in self.submeshes.iter().enumerate() {
            if sub.index_start + sub.index_count > self.indices.len() {
                return Err(Error::InvalidMesh(format!(
                    "'{}': sub-mesh {i} exceeds index buffer",
                    self.name
                )));
            }
        }

        Ok(())
    }

    /// Hash of positions and indices.
    /// Uses FxHasher for speed - we don't need cryptographic hashing
    pub fn content_hash(&self) -> u64 {
        use rustc_hash::FxHasher;
        let mut hasher = FxHasher::default();

        // Hash lengths first for fast rejection
        self.positions.len().hash(&mut hasher);
        self.indices.len().hash(&mut hasher);

        // Convert f32 to bits for reliable hashing
        for pos in &self.positions {
            pos.to_bits().hash(&mut hasher);
        }
        for idx in &self.indices {
            idx.hash(&mut hasher);
        }

        hasher.finish()
    }

    /// Working copy for slicing: every attribute copied, name suffixed
    pub fn sliced_copy(&self) -> Mesh {
        Mesh {
            name: format!("{}{}", self.name, SLICED_SUFFIX),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let mut mesh = Mesh::new("quad");
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        mesh.add_vertex(Point3::new(1.0, 2.0, 0.0), Vector3::z());
        mesh.add_vertex(Point3::new(0.0, 2.0, 0.0), Vector3::z());
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        mesh
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new("empty");
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert_eq!(mesh.submesh_count(), 0);
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = Mesh::new("one");
        mesh.add_vertex(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.positions, vec![1.0, 2.0, 3.0]);
        assert_eq!(mesh.normals, vec![0.0, 0.0, 1.0]);
        assert_eq!(mesh.position(0), Some(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(mesh.position(1), None);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = quad().bounding_box().unwrap();
        assert_eq!(bbox.size(), Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(bbox.center(), Point3::new(0.5, 1.0, 0.0));
    }

    #[test]
    fn test_submesh_indices() {
        let mut mesh = quad();
        assert_eq!(mesh.submesh_count(), 1);
        assert_eq!(mesh.submesh_indices(0).unwrap().len(), 6);

        mesh.submeshes = vec![SubMesh::new(0, 3), SubMesh::new(3, 3)];
        assert_eq!(mesh.submesh_count(), 2);
        assert_eq!(mesh.submesh_indices(1), Some(&[0u32, 2, 3][..]));
        assert_eq!(mesh.submesh_indices(2), None);
    }

    #[test]
    fn test_validate() {
        assert!(quad().validate().is_ok());

        let mut mesh = quad();
        mesh.positions.push(1.0);
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));

        let mut mesh = quad();
        mesh.uvs = vec![0.0; 6];
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));

        let mut mesh = quad();
        mesh.positions[4] = f32::NAN;
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));

        let mut mesh = quad();
        mesh.add_triangle(0, 1, 9);
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));

        let mut mesh = quad();
        mesh.submeshes = vec![SubMesh::new(3, 6)];
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn test_content_hash_tracks_positions() {
        let a = quad();
        let mut b = quad();
        assert_eq!(a.content_hash(), b.content_hash());

        b.positions[0] = 0.5;
        assert_ne!(a.content_hash(), b.content_hash());

        // Names and passthrough attributes do not affect the hash
        let mut c = quad();
        c.name = "renamed".into();
        c.uvs = vec![0.0; 8];
        assert_eq!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn test_sliced_copy() {
        let mut mesh = quad();
        mesh.uvs = vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let copy = mesh.sliced_copy();
        assert_eq!(copy.name, "quad_27sliced");
        assert_eq!(copy.positions, mesh.positions);
        assert_eq!(copy.uvs, mesh.uvs);
        assert_eq!(copy.indices, mesh.indices);
    }
}
