// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between mesh space and box-handle space
//!
//! Box handles are drawn in world space, so their size carries the object's
//! scale while the bounds are stored unscaled in mesh space.

use nalgebra::{Matrix4, Point3, Vector3};

/// Mesh-space ↔ handle-space mapping derived from a local-to-world matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleSpace {
    local_to_world: Matrix4<f64>,
    world_to_local: Matrix4<f64>,
    lossy_scale: Vector3<f64>,
}

impl Default for HandleSpace {
    fn default() -> Self {
        Self::new(Matrix4::identity())
    }
}

impl HandleSpace {
    /// Build from a local-to-world transform.
    ///
    /// A singular matrix falls back to identity for the inverse mapping.
    pub fn new(local_to_world: Matrix4<f64>) -> Self {
        let world_to_local = local_to_world
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);
        let lossy_scale = Vector3::new(
            local_to_world.fixed_view::<3, 1>(0, 0).norm(),
            local_to_world.fixed_view::<3, 1>(0, 1).norm(),
            local_to_world.fixed_view::<3, 1>(0, 2).norm(),
        );
        Self {
            local_to_world,
            world_to_local,
            lossy_scale,
        }
    }

    /// Per-axis scale baked into the transform (column lengths)
    #[inline]
    pub fn lossy_scale(&self) -> Vector3<f64> {
        self.lossy_scale
    }

    #[inline]
    pub fn center_to_handle(&self, center: &Point3<f64>) -> Point3<f64> {
        self.local_to_world.transform_point(center)
    }

    #[inline]
    pub fn center_from_handle(&self, center: &Point3<f64>) -> Point3<f64> {
        self.world_to_local.transform_point(center)
    }

    #[inline]
    pub fn size_to_handle(&self, size: &Vector3<f64>) -> Vector3<f64> {
        size.component_mul(&self.lossy_scale)
    }

    /// Undo the object scale; axes with zero scale map to zero
    #[inline]
    pub fn size_from_handle(&self, size: &Vector3<f64>) -> Vector3<f64> {
        size.component_mul(&invert_scale(&self.lossy_scale))
    }
}

/// Component-wise reciprocal that keeps zero components at zero
#[inline]
pub fn invert_scale(scale: &Vector3<f64>) -> Vector3<f64> {
    scale.map(|s| if s == 0.0 { 0.0 } else { 1.0 / s })
}
