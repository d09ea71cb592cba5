// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handle edit policies
//!
//! A box handle drag produces a size and a center. How that pair is applied
//! depends on the active [`EditPolicy`].

use crate::bounds::SliceBounds;
use crate::error::Result;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which box a handle edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BoxHandle {
    Inner,
    Outer,
}

/// How a handle edit is mapped onto [`SliceBounds`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EditPolicy {
    /// Size and center are taken as dragged
    #[default]
    Free,
    /// Size is taken as dragged, the edited box keeps its current center
    Mirrored,
    /// Outer edits resize everything with fixed shell thickness; the inner
    /// box cannot be edited directly
    LockedOffset,
}

impl EditPolicy {
    /// Whether edits to `handle` have any effect under this policy
    #[inline]
    pub fn accepts(self, handle: BoxHandle) -> bool {
        !matches!((self, handle), (EditPolicy::LockedOffset, BoxHandle::Inner))
    }
}

impl SliceBounds {
    /// Apply a handle drag under `policy`.
    ///
    /// Returns `Ok(false)` when the policy ignores edits to `handle`.
    pub fn apply_handle_edit(
        &mut self,
        handle: BoxHandle,
        policy: EditPolicy,
        size: Vector3<f64>,
        center: Point3<f64>,
    ) -> Result<bool> {
        if !policy.accepts(handle) {
            return Ok(false);
        }

        match (policy, handle) {
            (EditPolicy::LockedOffset, _) => self.set_entire_box(size)?,
            (EditPolicy::Free, BoxHandle::Inner) => self.set_inner_box(size, center)?,
            (EditPolicy::Free, BoxHandle::Outer) => self.set_outer_box(size, center)?,
            (EditPolicy::Mirrored, BoxHandle::Inner) => {
                let fixed = self.inner_center();
                self.set_inner_box(size, fixed)?;
            }
            (EditPolicy::Mirrored, BoxHandle::Outer) => {
                let fixed = self.outer_center();
                self.set_outer_box(size, fixed)?;
            }
        }
        Ok(true)
    }
}
