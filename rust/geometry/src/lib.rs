// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slice27 Geometry
//!
//! Applies 27-slice scaling to triangle meshes: vertices are classified once
//! against a rest configuration, then remapped whenever the bounds change.
//! Large meshes are processed with rayon.
//!
//! ```rust
//! use slice27_geometry::{Mesh, SliceController, Vector3, Point3};
//! use std::sync::Arc;
//!
//! let mesh = Arc::new(Mesh::from_positions("bar", vec![-2.0, 0.0, 0.0, 2.0, 0.0, 0.0]));
//! let mut controller = SliceController::default();
//! controller.initialize(Some(mesh)).unwrap();
//! controller.reset_bounds().unwrap();
//! controller.define_vertices().unwrap();
//!
//! let outer = controller.bounds().outer_size();
//! controller
//!     .set_outer_box(Vector3::new(8.0, outer.y, outer.z), Point3::origin())
//!     .unwrap();
//! controller.update_mesh_scale().unwrap();
//! assert!((controller.working_positions().unwrap()[3] - 4.0).abs() < 1e-5);
//! ```

pub mod classify;
pub mod controller;
pub mod error;
pub mod handle;
pub mod mesh;
pub mod remap;
pub mod session;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use classify::{Classification, VertexClassification, VertexClassifier};
pub use controller::{HostEvent, SliceController};
pub use error::{Error, Result};
pub use handle::{invert_scale, HandleSpace};
pub use mesh::{Mesh, SubMesh, SLICED_SUFFIX};
pub use remap::VertexRemapper;
pub use session::SliceSession;
