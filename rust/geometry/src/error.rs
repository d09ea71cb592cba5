// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for slicing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while classifying or remapping a mesh
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Stale classification: {0}")]
    StaleClassification(String),

    #[error("Vertex count mismatch: expected {expected}, found {found}")]
    VertexCountMismatch { expected: usize, found: usize },

    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Bounds error: {0}")]
    Bounds(#[from] slice27_core::Error),
}
