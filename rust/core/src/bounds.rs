// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inner/outer box bounds
//!
//! [`SliceBounds`] owns the twelve scalars that define the rigid inner box and
//! the outer box around it. Every mutation re-validates the pair so that, on
//! each axis, the inner box stays at least `margin` inside the outer box.

use crate::axis::AxisBounds;
use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default gap kept between the inner and outer box on every side
pub const DEFAULT_MARGIN: f64 = 1e-4;

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All three axes in x, y, z order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (0, 1, 2)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Axis-aligned box stored as six scalars
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl BoxBounds {
    /// Create a box from its min and max corners
    #[inline]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min_x: min.x,
            max_x: max.x,
            min_y: min.y,
            max_y: max.y,
            min_z: min.z,
            max_z: max.z,
        }
    }

    /// Create a box of `size` centered on `center`
    #[inline]
    pub fn from_size_center(size: &Vector3<f64>, center: &Point3<f64>) -> Self {
        let half = size / 2.0;
        Self::new(center - half, center + half)
    }

    /// Min corner
    #[inline]
    pub fn min(&self) -> Point3<f64> {
        Point3::new(self.min_x, self.min_y, self.min_z)
    }

    /// Max corner
    #[inline]
    pub fn max(&self) -> Point3<f64> {
        Point3::new(self.max_x, self.max_y, self.max_z)
    }

    /// Extent per axis (`max - min`)
    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        Vector3::new(
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        )
    }

    /// Center per axis (`(max + min) / 2`)
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.max_x + self.min_x) / 2.0,
            (self.max_y + self.min_y) / 2.0,
            (self.max_z + self.min_z) / 2.0,
        )
    }

    /// `(min, max)` on one axis
    #[inline]
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.min_x, self.max_x),
            Axis::Y => (self.min_y, self.max_y),
            Axis::Z => (self.min_z, self.max_z),
        }
    }

    #[inline]
    fn set_range(&mut self, axis: Axis, min: f64, max: f64) {
        match axis {
            Axis::X => (self.min_x, self.max_x) = (min, max),
            Axis::Y => (self.min_y, self.max_y) = (min, max),
            Axis::Z => (self.min_z, self.max_z) = (min, max),
        }
    }

    /// Check that `point` lies inside the box (inclusive)
    #[inline]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let (min, max) = self.range(axis);
            let v = point[axis.index()];
            v >= min && v <= max
        })
    }
}

/// The inner/outer box pair used to slice a mesh.
///
/// Construct with [`SliceBounds::new`] or [`SliceBounds::from_boxes`]; all
/// mutators return an error and leave the bounds untouched when the edit
/// cannot satisfy the margin invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BoundsRepr", into = "BoundsRepr"))]
pub struct SliceBounds {
    inner: BoxBounds,
    outer: BoxBounds,
    margin: f64,
}

/// Unchecked wire shape of [`SliceBounds`]
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct BoundsRepr {
    inner: BoxBounds,
    outer: BoxBounds,
    #[serde(default = "default_margin")]
    margin: f64,
}

#[cfg(feature = "serde")]
fn default_margin() -> f64 {
    DEFAULT_MARGIN
}

#[cfg(feature = "serde")]
impl TryFrom<BoundsRepr> for SliceBounds {
    type Error = Error;

    fn try_from(repr: BoundsRepr) -> Result<Self> {
        SliceBounds::from_boxes(repr.outer, repr.inner, repr.margin)
    }
}

#[cfg(feature = "serde")]
impl From<SliceBounds> for BoundsRepr {
    fn from(bounds: SliceBounds) -> Self {
        Self {
            inner: bounds.inner,
            outer: bounds.outer,
            margin: bounds.margin,
        }
    }
}

impl Default for SliceBounds {
    /// Unit outer box with a half-size inner box, both centered on the origin
    fn default() -> Self {
        let outer = BoxBounds::from_size_center(&Vector3::repeat(1.0), &Point3::origin());
        let inner = BoxBounds::from_size_center(&Vector3::repeat(0.5), &Point3::origin());
        Self {
            inner,
            outer,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl SliceBounds {
    /// Default bounds with a custom margin
    pub fn new(margin: f64) -> Result<Self> {
        let defaults = Self::default();
        Self::from_boxes(defaults.outer, defaults.inner, margin)
    }

    /// Build from explicit boxes, clamping the inner box into the outer one
    pub fn from_boxes(outer: BoxBounds, inner: BoxBounds, margin: f64) -> Result<Self> {
        if !margin.is_finite() || margin < 0.0 {
            return Err(Error::InvalidMargin(margin));
        }
        for axis in Axis::ALL {
            let (min_o, max_o) = outer.range(axis);
            let (min_i, max_i) = inner.range(axis);
            check_finite("bound", axis, min_o)?;
            check_finite("bound", axis, max_o)?;
            check_finite("bound", axis, min_i)?;
            check_finite("bound", axis, max_i)?;
            check_ordered(axis, min_i, max_i, "inner")?;
            check_outer_fits(axis, min_o, max_o, margin)?;
        }

        let mut bounds = Self {
            inner,
            outer,
            margin,
        };
        bounds.clamp_inner();
        Ok(bounds)
    }

    /// Inner (rigid) box
    #[inline]
    pub fn inner(&self) -> &BoxBounds {
        &self.inner
    }

    /// Outer box
    #[inline]
    pub fn outer(&self) -> &BoxBounds {
        &self.outer
    }

    /// Gap enforced between inner and outer faces
    #[inline]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn inner_size(&self) -> Vector3<f64> {
        self.inner.size()
    }

    pub fn inner_center(&self) -> Point3<f64> {
        self.inner.center()
    }

    pub fn outer_size(&self) -> Vector3<f64> {
        self.outer.size()
    }

    pub fn outer_center(&self) -> Point3<f64> {
        self.outer.center()
    }

    /// The four bound values of one axis
    #[inline]
    pub fn axis(&self, axis: Axis) -> AxisBounds {
        let (min_outer, max_outer) = self.outer.range(axis);
        let (min_inner, max_inner) = self.inner.range(axis);
        AxisBounds::new(min_outer, min_inner, max_inner, max_outer)
    }

    /// Axis bounds for x, y and z
    #[inline]
    pub fn axes(&self) -> [AxisBounds; 3] {
        [self.axis(Axis::X), self.axis(Axis::Y), self.axis(Axis::Z)]
    }

    /// Place the inner box; it is clamped into the outer box afterwards
    pub fn set_inner_box(&mut self, size: Vector3<f64>, center: Point3<f64>) -> Result<()> {
        check_size_center(&size, &center)?;
        self.inner = BoxBounds::from_size_center(&size, &center);
        self.clamp_inner();
        Ok(())
    }

    /// Place the outer box; the inner box is clamped into it afterwards
    pub fn set_outer_box(&mut self, size: Vector3<f64>, center: Point3<f64>) -> Result<()> {
        check_size_center(&size, &center)?;
        let outer = BoxBounds::from_size_center(&size, &center);
        for axis in Axis::ALL {
            let (min, max) = outer.range(axis);
            check_outer_fits(axis, min, max, self.margin)?;
        }
        self.outer = outer;
        self.clamp_inner();
        Ok(())
    }

    /// Resize the outer box to `new_outer_size` while keeping shell thickness.
    ///
    /// Every bound moves outward (or inward) by half the size delta, so the
    /// inner box grows with the outer box and the gap on each side is kept.
    /// Shrinking by more than the inner width collapses the inner box onto
    /// its center on that axis.
    pub fn set_entire_box(&mut self, new_outer_size: Vector3<f64>) -> Result<()> {
        check_size_center(&new_outer_size, &self.outer.center())?;
        let delta = (new_outer_size - self.outer.size()) / 2.0;

        let mut outer = self.outer;
        let mut inner = self.inner;
        for axis in Axis::ALL {
            let d = delta[axis.index()];
            let (min_o, max_o) = outer.range(axis);
            let (min_i, max_i) = inner.range(axis);
            check_outer_fits(axis, min_o - d, max_o + d, self.margin)?;
            outer.set_range(axis, min_o - d, max_o + d);

            let (new_min, new_max) = (min_i - d, max_i + d);
            if new_min > new_max {
                let mid = (min_i + max_i) / 2.0;
                inner.set_range(axis, mid, mid);
            } else {
                inner.set_range(axis, new_min, new_max);
            }
        }

        self.outer = outer;
        self.inner = inner;
        self.clamp_inner();
        Ok(())
    }

    /// Overwrite the four values of one axis (inspector field edit)
    pub fn set_axis(&mut self, axis: Axis, bounds: AxisBounds) -> Result<()> {
        check_finite("bound", axis, bounds.min_outer)?;
        check_finite("bound", axis, bounds.min_inner)?;
        check_finite("bound", axis, bounds.max_inner)?;
        check_finite("bound", axis, bounds.max_outer)?;
        check_ordered(axis, bounds.min_inner, bounds.max_inner, "inner")?;
        check_outer_fits(axis, bounds.min_outer, bounds.max_outer, self.margin)?;

        self.outer.set_range(axis, bounds.min_outer, bounds.max_outer);
        self.inner.set_range(axis, bounds.min_inner, bounds.max_inner);
        self.clamp_inner();
        Ok(())
    }

    /// Replace both boxes with a previously captured snapshot (undo/redo).
    ///
    /// The snapshot is re-validated against this instance's margin, which is
    /// kept; a snapshot taken under a smaller margin gets its inner box clamped.
    pub fn restore(&mut self, snapshot: &SliceBounds) -> Result<()> {
        *self = Self::from_boxes(snapshot.outer, snapshot.inner, self.margin)?;
        Ok(())
    }

    /// Check the margin invariant on every axis
    pub fn satisfies_margin(&self) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let a = self.axis(axis);
            a.min_inner >= a.min_outer + self.margin && a.max_inner <= a.max_outer - self.margin
        })
    }

    /// Pull the inner box inside `[outer_min + margin, outer_max - margin]`.
    ///
    /// The outer box is never moved. An inner box lying entirely outside the
    /// allowed range collapses onto the nearest allowed face.
    fn clamp_inner(&mut self) {
        for axis in Axis::ALL {
            let (min_o, max_o) = self.outer.range(axis);
            let (min_i, max_i) = self.inner.range(axis);
            let lo = min_o + self.margin;
            let hi = max_o - self.margin;

            let mut new_min = min_i.max(lo);
            let mut new_max = max_i.min(hi);
            if min_i > max_i {
                let mid = ((min_i + max_i) / 2.0).clamp(lo, hi);
                new_min = mid;
                new_max = mid;
            } else if new_min > new_max {
                let face = if max_i < lo { lo } else { hi };
                new_min = face;
                new_max = face;
            }

            if new_min != min_i || new_max != max_i {
                tracing::trace!(
                    %axis,
                    from_min = min_i,
                    from_max = max_i,
                    to_min = new_min,
                    to_max = new_max,
                    "Clamped inner box into outer box"
                );
                self.inner.set_range(axis, new_min, new_max);
            }
        }
    }
}

#[inline]
fn check_finite(what: &'static str, axis: Axis, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFinite { what, axis, value })
    }
}

fn check_size_center(size: &Vector3<f64>, center: &Point3<f64>) -> Result<()> {
    for axis in Axis::ALL {
        let s = size[axis.index()];
        check_finite("size", axis, s)?;
        check_finite("center", axis, center[axis.index()])?;
        if s < 0.0 {
            return Err(Error::NegativeSize { axis, size: s });
        }
    }
    Ok(())
}

#[inline]
fn check_ordered(axis: Axis, min: f64, max: f64, which: &str) -> Result<()> {
    if min <= max {
        Ok(())
    } else {
        Err(Error::Unordered {
            axis,
            detail: format!("{which} min {min} > {which} max {max}"),
        })
    }
}

/// Reject outer ranges too narrow to hold an inner face on both sides
#[inline]
fn check_outer_fits(axis: Axis, min: f64, max: f64, margin: f64) -> Result<()> {
    check_finite("bound", axis, min)?;
    check_finite("bound", axis, max)?;
    if max - margin < min + margin {
        return Err(Error::OuterTooSmall {
            axis,
            size: max - min,
            min: 2.0 * margin,
        });
    }
    Ok(())
}
