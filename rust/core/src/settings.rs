// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tunables shared by the classifier, remapper and controller

use crate::bounds::DEFAULT_MARGIN;
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vertex count above which per-vertex passes run on the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 16_384;

/// Slicing settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SliceSettings {
    /// Gap kept between inner and outer faces
    pub margin: f64,
    /// Vertex count at which classification and remapping go parallel
    pub parallel_threshold: usize,
}

impl Default for SliceSettings {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SliceSettings {
    /// Set the inner/outer margin
    pub fn with_margin(mut self, margin: f64) -> Result<Self> {
        if !margin.is_finite() || margin < 0.0 {
            return Err(Error::InvalidMargin(margin));
        }
        self.margin = margin;
        Ok(self)
    }

    /// Set the parallel threshold (`usize::MAX` keeps every pass sequential)
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Whether a pass over `vertex_count` vertices should use rayon
    #[inline]
    pub fn is_parallel(&self, vertex_count: usize) -> bool {
        vertex_count >= self.parallel_threshold
    }
}
