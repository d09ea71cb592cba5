// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for bounds editing.

use crate::bounds::Axis;
use thiserror::Error;

/// Result type for bounds operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing slice bounds.
///
/// A rejected edit never leaves the bounds model half-updated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A size, center or bound value was NaN or infinite.
    #[error("non-finite {what} on {axis} axis: {value}")]
    NonFinite {
        what: &'static str,
        axis: Axis,
        value: f64,
    },

    /// A box size was negative.
    #[error("negative box size on {axis} axis: {size}")]
    NegativeSize { axis: Axis, size: f64 },

    /// The outer box is too narrow to fit any inner box with the margin.
    #[error("outer box too small on {axis} axis: {size} < {min}")]
    OuterTooSmall { axis: Axis, size: f64, min: f64 },

    /// Per-axis bounds were not ordered `min_outer <= min_inner <= max_inner <= max_outer`.
    #[error("unordered bounds on {axis} axis: {detail}")]
    Unordered { axis: Axis, detail: String },

    /// Margin must be finite and non-negative.
    #[error("invalid margin: {0}")]
    InvalidMargin(f64),
}
