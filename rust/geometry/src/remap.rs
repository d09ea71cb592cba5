// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rebuild vertex positions from stored classifications and current bounds

use crate::classify::VertexClassification;
use crate::error::{Error, Result};
use rayon::prelude::*;
use slice27_core::{AxisBounds, SliceBounds, SliceSettings};

/// Writes remapped positions into a working buffer.
///
/// Runs on every bounds edit, so the per-vertex loop only reads the stored
/// records and writes in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexRemapper {
    settings: SliceSettings,
}

impl VertexRemapper {
    pub fn new(settings: SliceSettings) -> Self {
        Self { settings }
    }

    /// Overwrite every position in `out` (xyz triplets, same order as `records`)
    pub fn remap_into(
        &self,
        records: &[VertexClassification],
        bounds: &SliceBounds,
        out: &mut [f32],
    ) -> Result<()> {
        if out.len() != records.len() * 3 {
            return Err(Error::VertexCountMismatch {
                expected: records.len(),
                found: out.len() / 3,
            });
        }

        let [x, y, z] = bounds.axes();

        if self.settings.is_parallel(records.len()) {
            out.par_chunks_exact_mut(3)
                .zip(records.par_iter())
                .for_each(|(p, record)| remap_vertex(p, record, &x, &y, &z));
        } else {
            out.chunks_exact_mut(3)
                .zip(records.iter())
                .for_each(|(p, record)| remap_vertex(p, record, &x, &y, &z));
        }

        Ok(())
    }

    /// Remap into a freshly allocated buffer
    pub fn remap(&self, records: &[VertexClassification], bounds: &SliceBounds) -> Result<Vec<f32>> {
        let mut out = vec![0.0f32; records.len() * 3];
        self.remap_into(records, bounds, &mut out)?;
        Ok(out)
    }
}

#[inline]
fn remap_vertex(
    p: &mut [f32],
    record: &VertexClassification,
    x: &AxisBounds,
    y: &AxisBounds,
    z: &AxisBounds,
) {
    p[0] = x.reconstruct(&record.x) as f32;
    p[1] = y.reconstruct(&record.y) as f32;
    p[2] = z.reconstruct(&record.z) as f32;
}
