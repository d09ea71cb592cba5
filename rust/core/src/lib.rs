// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Slice27 Core
//!
//! Scalar math behind 27-slice mesh scaling, the 3D counterpart of 9-slice
//! sprite scaling. An inner box marks the part of a mesh that must keep its
//! proportions; everything between the inner box and the outer box stretches
//! to absorb size changes.
//!
//! ## Overview
//!
//! - **Axis remapping**: [`AxisBounds::classify`] places a coordinate in one
//!   of three [`Sector`]s and records its relative position;
//!   [`AxisBounds::reconstruct`] replays it against new bounds
//! - **Bounds model**: [`SliceBounds`] owns the inner and outer [`BoxBounds`]
//!   and keeps the inner box `margin` inside the outer box after every edit
//! - **Edit policies**: [`EditPolicy`] selects free, mirrored or
//!   locked-offset handle editing
//!
//! ## Quick Start
//!
//! ```rust
//! use slice27_core::{Axis, SliceBounds};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut bounds = SliceBounds::default();
//! let x = bounds.axis(Axis::X);
//! let rest = x.classify(0.45);
//!
//! bounds.set_outer_box(Vector3::repeat(2.0), Point3::origin()).unwrap();
//! let moved = bounds.axis(Axis::X).reconstruct(&rest);
//! assert!((moved - 0.85).abs() < 1e-9);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for bounds and classifications

pub mod axis;
pub mod bounds;
pub mod edit;
pub mod error;
pub mod settings;

pub use axis::{AxisBounds, AxisClassification, Sector, DEGENERATE_EPSILON};
pub use bounds::{Axis, BoxBounds, SliceBounds, DEFAULT_MARGIN};
pub use edit::{BoxHandle, EditPolicy};
pub use error::{Error, Result};
pub use settings::{SliceSettings, DEFAULT_PARALLEL_THRESHOLD};
