// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Job and report documents.

use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use slice27_core::{Axis, AxisBounds, BoxHandle, EditPolicy, SliceBounds};
use slice27_geometry::{HandleSpace, Mesh};

/// A batch editing job.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Reference mesh.
    pub mesh: Mesh,
    /// Rest configuration; bounds are fitted to the mesh when absent.
    #[serde(default)]
    pub rest: Option<SliceBounds>,
    /// Policy for `drag` commands.
    #[serde(default)]
    pub policy: EditPolicy,
    /// Local-to-world matrix (column-major) for `drag` commands.
    #[serde(default)]
    pub transform: Option<[f64; 16]>,
    /// Edits applied in order.
    #[serde(default)]
    pub edits: Vec<EditCommand>,
}

impl Job {
    /// Handle space described by `transform` (identity when absent).
    pub fn handle_space(&self) -> HandleSpace {
        self.transform
            .map(|m| HandleSpace::new(Matrix4::from_column_slice(&m)))
            .unwrap_or_default()
    }
}

/// One editing step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    /// Place the inner box.
    Inner { size: [f64; 3], center: [f64; 3] },
    /// Place the outer box.
    Outer { size: [f64; 3], center: [f64; 3] },
    /// Resize the outer box keeping the shell thickness.
    Entire { size: [f64; 3] },
    /// Overwrite the four values of one axis.
    Axis { axis: Axis, bounds: AxisBounds },
    /// Handle drag in handle space, applied under the job policy.
    Drag {
        handle: BoxHandle,
        size: [f64; 3],
        center: [f64; 3],
    },
    /// Fit the bounds back onto the mesh.
    Reset,
    /// Discard the deformation (leaves scale mode).
    Rollback,
    /// Enter or leave scale mode.
    ScaleMode { enabled: bool },
}

#[inline]
pub fn vector(v: &[f64; 3]) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}

#[inline]
pub fn point(v: &[f64; 3]) -> Point3<f64> {
    Point3::new(v[0], v[1], v[2])
}

/// Result of a job.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    /// Working mesh after all edits.
    pub mesh: Mesh,
    /// Final bounds.
    pub bounds: SliceBounds,
    /// Bounds of the last classification pass.
    pub rest: Option<SliceBounds>,
    /// Vertices per 3x3x3 cell of the last classification.
    pub cells: Option<[usize; 27]>,
    /// Number of edits applied.
    pub applied: usize,
    /// Number of edits ignored by the policy or mode.
    pub ignored: usize,
}
