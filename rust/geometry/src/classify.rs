// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-vertex sector classification
//!
//! Classification runs once per rest configuration: when a reference mesh is
//! assigned or when a new rest pose is committed. The resulting
//! [`Classification`] remembers the bounds and mesh it was built from so a
//! remap can refuse to run against records that no longer match.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use rayon::prelude::*;
use slice27_core::{AxisBounds, AxisClassification, Sector, SliceBounds, SliceSettings};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Classification of one vertex on all three axes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexClassification {
    pub x: AxisClassification,
    pub y: AxisClassification,
    pub z: AxisClassification,
}

impl VertexClassification {
    /// Sector ids as `[x, y, z]`
    #[inline]
    pub fn sectors(&self) -> [Sector; 3] {
        [self.x.sector, self.y.sector, self.z.sector]
    }

    /// Index of the 3x3x3 cell this vertex belongs to (0..27)
    #[inline]
    pub fn cell(&self) -> u8 {
        self.x.sector.id() + 3 * self.y.sector.id() + 9 * self.z.sector.id()
    }

    /// True when the vertex sits inside the inner box on every axis
    #[inline]
    pub fn is_rigid(&self) -> bool {
        self.sectors().iter().all(|&s| s == Sector::Inner)
    }
}

/// Classifies every vertex of a mesh against a set of bounds
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexClassifier {
    settings: SliceSettings,
}

impl VertexClassifier {
    pub fn new(settings: SliceSettings) -> Self {
        Self { settings }
    }

    /// Classify a flat xyz position buffer.
    ///
    /// Fails on buffers whose length is not a multiple of 3 and on
    /// non-finite coordinates.
    pub fn classify(
        &self,
        positions: &[f32],
        bounds: &SliceBounds,
    ) -> Result<Vec<VertexClassification>> {
        if positions.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "position buffer length {} is not a multiple of 3",
                positions.len()
            )));
        }
        if let Some(pos) = positions.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidMesh(format!(
                "vertex {} has a non-finite coordinate",
                pos / 3
            )));
        }

        let [x, y, z] = bounds.axes();
        let vertex_count = positions.len() / 3;

        let records: Vec<VertexClassification> = if self.settings.is_parallel(vertex_count) {
            positions
                .par_chunks_exact(3)
                .map(|p| classify_vertex(p, &x, &y, &z))
                .collect()
        } else {
            positions
                .chunks_exact(3)
                .map(|p| classify_vertex(p, &x, &y, &z))
                .collect()
        };

        Ok(records)
    }
}

#[inline]
fn classify_vertex(
    p: &[f32],
    x: &AxisBounds,
    y: &AxisBounds,
    z: &AxisBounds,
) -> VertexClassification {
    VertexClassification {
        x: x.classify(p[0] as f64),
        y: y.classify(p[1] as f64),
        z: z.classify(p[2] as f64),
    }
}

/// Classification records tied to the rest configuration they were built in
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Classification {
    records: Vec<VertexClassification>,
    rest: SliceBounds,
    mesh_epoch: u64,
    mesh_hash: u64,
    epoch: u64,
}

impl Classification {
    /// Classify `mesh` against `rest` and stamp the result
    pub fn build(
        classifier: &VertexClassifier,
        mesh: &Mesh,
        rest: &SliceBounds,
        mesh_epoch: u64,
        epoch: u64,
    ) -> Result<Self> {
        let records = classifier.classify(&mesh.positions, rest)?;
        Ok(Self {
            records,
            rest: *rest,
            mesh_epoch,
            mesh_hash: mesh.content_hash(),
            epoch,
        })
    }

    /// Per-vertex records, indexed like the source mesh
    #[inline]
    pub fn records(&self) -> &[VertexClassification] {
        &self.records
    }

    /// Bounds at classification time
    #[inline]
    pub fn rest(&self) -> &SliceBounds {
        &self.rest
    }

    /// Number of classified vertices
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stamp of the classification pass that produced these records
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Mesh epoch these records were built against
    #[inline]
    pub fn mesh_epoch(&self) -> u64 {
        self.mesh_epoch
    }

    /// True unless the records match `mesh_epoch` and `vertex_count`
    #[inline]
    pub fn is_stale(&self, mesh_epoch: u64, vertex_count: usize) -> bool {
        self.mesh_epoch != mesh_epoch || self.records.len() != vertex_count
    }

    /// Compare against the content hash of the mesh the records came from
    pub fn built_from(&self, mesh: &Mesh) -> bool {
        self.records.len() == mesh.vertex_count() && self.mesh_hash == mesh.content_hash()
    }

    /// Count of vertices per 3x3x3 cell, indexed by [`VertexClassification::cell`]
    pub fn cell_histogram(&self) -> [usize; 27] {
        let mut histogram = [0usize; 27];
        for record in &self.records {
            histogram[record.cell() as usize] += 1;
        }
        histogram
    }
}
