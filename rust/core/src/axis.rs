// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-axis sector classification and reconstruction
//!
//! Each axis is cut into three sectors by the inner box:
//!
//! ```text
//!   min_outer      min_inner          max_inner      max_outer
//!      |   Below       |      Inner       |    Above     |
//! ```
//!
//! [`AxisBounds::classify`] records where a coordinate sits inside its sector
//! as a ratio. [`AxisBounds::reconstruct`] replays that ratio against another
//! set of bounds. The pair is only an inverse when both calls see the same
//! bounds; replaying against new bounds is what stretches the outer shell
//! while the inner box rescales affinely.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shell widths below this are treated as collapsed and never divided by.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// One of the three zones of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Sector {
    /// At or below the inner minimum (negative outer shell)
    Below = 0,
    /// Inside the inner box (rigid region)
    Inner = 1,
    /// Above the inner maximum (positive outer shell)
    Above = 2,
}

impl Sector {
    /// Numeric sector id (0, 1 or 2)
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Sector for a numeric id
    #[inline]
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Sector::Below),
            1 => Some(Sector::Inner),
            2 => Some(Sector::Above),
            _ => None,
        }
    }
}

/// Classification of one coordinate on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisClassification {
    /// Sector the coordinate fell into
    pub sector: Sector,
    /// Normalized position within the sector at classification time.
    /// Outside `[0, 1]` when the coordinate lay beyond the outer box.
    pub distance_ratio: f64,
    /// Absolute distance to the nearest outer bound (0 for [`Sector::Inner`])
    pub outer_box_distance: f64,
}

/// The four bound values of a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisBounds {
    pub min_outer: f64,
    pub min_inner: f64,
    pub max_inner: f64,
    pub max_outer: f64,
}

impl AxisBounds {
    /// Create axis bounds in left-to-right order
    #[inline]
    pub fn new(min_outer: f64, min_inner: f64, max_inner: f64, max_outer: f64) -> Self {
        Self {
            min_outer,
            min_inner,
            max_inner,
            max_outer,
        }
    }

    /// Width of the negative shell
    #[inline]
    pub fn lower_shell(&self) -> f64 {
        self.min_inner - self.min_outer
    }

    /// Width of the positive shell
    #[inline]
    pub fn upper_shell(&self) -> f64 {
        self.max_outer - self.max_inner
    }

    /// Width of the inner box
    #[inline]
    pub fn inner_size(&self) -> f64 {
        self.max_inner - self.min_inner
    }

    /// Width of the outer box
    #[inline]
    pub fn outer_size(&self) -> f64 {
        self.max_outer - self.min_outer
    }

    /// Classify a coordinate against these bounds.
    ///
    /// A coordinate exactly on `min_inner` is [`Sector::Below`] with ratio 1,
    /// one exactly on `max_inner` is [`Sector::Inner`] with ratio 1. Either
    /// way the coordinate reconstructs onto the inner face it touched.
    #[inline]
    pub fn classify(&self, value: f64) -> AxisClassification {
        if value <= self.min_inner {
            let width = self.lower_shell();
            let distance_ratio = if width.abs() < DEGENERATE_EPSILON {
                // Collapsed shell: keep beyond-outer points on the offset path
                if value < self.min_outer {
                    -1.0
                } else {
                    0.0
                }
            } else {
                (value - self.min_outer) / width
            };
            AxisClassification {
                sector: Sector::Below,
                distance_ratio,
                outer_box_distance: (value - self.min_outer).abs(),
            }
        } else if value <= self.max_inner {
            let width = self.inner_size();
            let distance_ratio = if width.abs() < DEGENERATE_EPSILON {
                0.0
            } else {
                (value - self.min_inner) / width
            };
            AxisClassification {
                sector: Sector::Inner,
                distance_ratio,
                outer_box_distance: 0.0,
            }
        } else {
            let width = self.upper_shell();
            let distance_ratio = if width.abs() < DEGENERATE_EPSILON {
                if value > self.max_outer {
                    2.0
                } else {
                    1.0
                }
            } else {
                (value - self.max_inner) / width
            };
            AxisClassification {
                sector: Sector::Above,
                distance_ratio,
                outer_box_distance: (value - self.max_outer).abs(),
            }
        }
    }

    /// Rebuild a coordinate from a classification captured against other bounds.
    ///
    /// Points that were beyond the outer box keep their absolute distance to
    /// it instead of scaling with the shell.
    #[inline]
    pub fn reconstruct(&self, classification: &AxisClassification) -> f64 {
        let ratio = classification.distance_ratio;
        match classification.sector {
            Sector::Below => {
                if ratio < 0.0 {
                    self.min_outer - classification.outer_box_distance
                } else {
                    self.min_outer + ratio * self.lower_shell()
                }
            }
            Sector::Inner => self.min_inner + ratio * self.inner_size(),
            Sector::Above => {
                if ratio > 1.0 {
                    self.max_outer + classification.outer_box_distance
                } else {
                    self.max_inner + ratio * self.upper_shell()
                }
            }
        }
    }
}
