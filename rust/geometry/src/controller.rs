// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slice Controller - owns the working mesh and drives classify/remap passes
//!
//! The reference mesh is shared read-only. Assigning one creates a working
//! copy, bumping the mesh epoch so that classifications built for an earlier
//! mesh are rejected instead of remapped.

use crate::classify::{Classification, VertexClassifier};
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::remap::VertexRemapper;
use nalgebra::{Point3, Vector3};
use slice27_core::{Axis, AxisBounds, BoxHandle, EditPolicy, SliceBounds, SliceSettings};
use std::sync::Arc;

/// Notifications sent by the host editor
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A (possibly absent) reference mesh was assigned
    MeshAssigned(Option<Arc<Mesh>>),
    /// The current bounds become the new rest configuration
    RestPoseCommitted,
    /// Bounds were edited; the working mesh should follow
    BoundsChanged,
    /// Bounds should be fitted back onto the reference mesh
    ResetRequested,
}

/// 27-slice controller
pub struct SliceController {
    settings: SliceSettings,
    bounds: SliceBounds,
    reference: Option<Arc<Mesh>>,
    working: Option<Mesh>,
    classification: Option<Classification>,
    classifier: VertexClassifier,
    remapper: VertexRemapper,
    /// Bumped whenever a new working copy is made
    mesh_epoch: u64,
    /// Bumped on every classification pass
    classification_epoch: u64,
}

impl SliceController {
    /// Create an idle controller (no reference mesh)
    pub fn new(settings: SliceSettings) -> Result<Self> {
        let bounds = SliceBounds::new(settings.margin)?;
        Ok(Self {
            settings,
            bounds,
            reference: None,
            working: None,
            classification: None,
            classifier: VertexClassifier::new(settings),
            remapper: VertexRemapper::new(settings),
            mesh_epoch: 0,
            classification_epoch: 0,
        })
    }

    /// Create a controller starting from explicit bounds
    pub fn with_bounds(settings: SliceSettings, bounds: SliceBounds) -> Result<Self> {
        let mut controller = Self::new(settings)?;
        controller.bounds = SliceBounds::from_boxes(*bounds.outer(), *bounds.inner(), settings.margin)?;
        Ok(controller)
    }

    pub fn settings(&self) -> &SliceSettings {
        &self.settings
    }

    /// Current bounds
    pub fn bounds(&self) -> &SliceBounds {
        &self.bounds
    }

    /// Reference mesh, if assigned
    pub fn reference(&self) -> Option<&Arc<Mesh>> {
        self.reference.as_ref()
    }

    /// Working (sliced) mesh, if initialized
    pub fn working_mesh(&self) -> Option<&Mesh> {
        self.working.as_ref()
    }

    /// Working position buffer (xyz triplets)
    pub fn working_positions(&self) -> Option<&[f32]> {
        self.working.as_ref().map(|m| m.positions.as_slice())
    }

    /// Last classification pass, if any
    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    pub fn mesh_epoch(&self) -> u64 {
        self.mesh_epoch
    }

    /// True when a classification exists for the current working copy
    pub fn is_classified(&self) -> bool {
        match (&self.classification, &self.reference) {
            (Some(c), Some(reference)) => !c.is_stale(self.mesh_epoch, reference.vertex_count()),
            _ => false,
        }
    }

    /// Copy `reference` into a fresh working mesh and drop the classification.
    ///
    /// `None` leaves the controller untouched.
    pub fn initialize(&mut self, reference: Option<Arc<Mesh>>) -> Result<()> {
        let Some(reference) = reference else {
            tracing::debug!("No reference mesh, initialize skipped");
            return Ok(());
        };
        reference.validate()?;

        self.working = Some(reference.sliced_copy());
        self.reference = Some(reference);
        self.classification = None;
        self.mesh_epoch += 1;

        tracing::debug!(
            mesh_epoch = self.mesh_epoch,
            vertices = self.reference.as_ref().map_or(0, |m| m.vertex_count()),
            "Initialized working mesh"
        );
        Ok(())
    }

    /// Throw away all deformation and start over from the reference mesh
    pub fn rollback(&mut self) -> Result<()> {
        let reference = self.reference.clone();
        self.initialize(reference)
    }

    /// Classify the reference mesh against the current bounds.
    ///
    /// The current bounds become the rest configuration of later remaps.
    pub fn define_vertices(&mut self) -> Result<()> {
        let Some(reference) = self.reference.as_ref() else {
            tracing::debug!("No reference mesh, classification skipped");
            return Ok(());
        };

        let epoch = self.classification_epoch + 1;
        let classification = Classification::build(
            &self.classifier,
            reference,
            &self.bounds,
            self.mesh_epoch,
            epoch,
        )?;

        tracing::debug!(
            epoch,
            vertices = classification.len(),
            rigid = classification.records().iter().filter(|r| r.is_rigid()).count(),
            "Classified vertices"
        );

        self.classification_epoch = epoch;
        self.classification = Some(classification);
        Ok(())
    }

    /// Remap the working mesh against the current bounds.
    ///
    /// Idle (no reference or working mesh) is a no-op; a missing or outdated
    /// classification is an error.
    pub fn update_mesh_scale(&mut self) -> Result<()> {
        let (Some(reference), Some(working)) = (self.reference.as_ref(), self.working.as_mut())
        else {
            tracing::debug!("No working mesh, remap skipped");
            return Ok(());
        };

        let classification = self.classification.as_ref().ok_or_else(|| {
            Error::StaleClassification(format!(
                "'{}' has not been classified since it was assigned",
                reference.name
            ))
        })?;
        if classification.is_stale(self.mesh_epoch, reference.vertex_count()) {
            return Err(Error::StaleClassification(format!(
                "classified at mesh epoch {} with {} vertices, current epoch {} has {}",
                classification.mesh_epoch(),
                classification.len(),
                self.mesh_epoch,
                reference.vertex_count()
            )));
        }

        self.remapper
            .remap_into(classification.records(), &self.bounds, &mut working.positions)
    }

    /// Fit the outer box to the reference bounding box and the inner box to
    /// half of it, both on the bounding box center.
    ///
    /// Flat axes are widened to `4 * margin` so an inner box still fits.
    pub fn reset_bounds(&mut self) -> Result<()> {
        let Some(bbox) = self.reference.as_ref().and_then(|m| m.bounding_box()) else {
            tracing::debug!("No reference geometry, reset skipped");
            return Ok(());
        };

        let min_size = 4.0 * self.bounds.margin();
        let size = bbox.size().map(|s| s.max(min_size));
        let center = bbox.center();

        let mut next = self.bounds;
        next.set_outer_box(size, center)?;
        next.set_inner_box(size / 2.0, center)?;
        self.bounds = next;
        Ok(())
    }

    pub fn set_inner_box(&mut self, size: Vector3<f64>, center: Point3<f64>) -> Result<()> {
        self.bounds
            .set_inner_box(size, center)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected inner box edit"))?;
        Ok(())
    }

    pub fn set_outer_box(&mut self, size: Vector3<f64>, center: Point3<f64>) -> Result<()> {
        self.bounds
            .set_outer_box(size, center)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected outer box edit"))?;
        Ok(())
    }

    pub fn set_entire_box(&mut self, new_outer_size: Vector3<f64>) -> Result<()> {
        self.bounds
            .set_entire_box(new_outer_size)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected entire box edit"))?;
        Ok(())
    }

    /// Apply a handle drag under `policy`; `Ok(false)` if the policy ignored it
    pub fn apply_handle_edit(
        &mut self,
        handle: BoxHandle,
        policy: EditPolicy,
        size: Vector3<f64>,
        center: Point3<f64>,
    ) -> Result<bool> {
        let applied = self
            .bounds
            .apply_handle_edit(handle, policy, size, center)
            .inspect_err(|e| tracing::warn!(error = %e, ?handle, ?policy, "Rejected handle edit"))?;
        Ok(applied)
    }

    /// Overwrite one axis from inspector fields
    pub fn set_axis(&mut self, axis: Axis, bounds: AxisBounds) -> Result<()> {
        self.bounds
            .set_axis(axis, bounds)
            .inspect_err(|e| tracing::warn!(error = %e, %axis, "Rejected field edit"))?;
        Ok(())
    }

    /// Restore a bounds snapshot (undo/redo), keeping the configured margin
    pub fn restore_bounds(&mut self, snapshot: &SliceBounds) -> Result<()> {
        self.bounds
            .restore(snapshot)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected bounds snapshot"))?;
        Ok(())
    }

    /// Dispatch a host notification
    pub fn handle_event(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::MeshAssigned(mesh) => {
                if mesh.is_none() {
                    tracing::debug!("Mesh assignment without a mesh");
                    return Ok(());
                }
                self.initialize(mesh)?;
                self.reset_bounds()?;
                self.define_vertices()
            }
            HostEvent::RestPoseCommitted => self.define_vertices(),
            HostEvent::BoundsChanged => self.update_mesh_scale(),
            HostEvent::ResetRequested => self.reset_bounds(),
        }
    }
}

impl Default for SliceController {
    fn default() -> Self {
        Self {
            settings: SliceSettings::default(),
            bounds: SliceBounds::default(),
            reference: None,
            working: None,
            classification: None,
            classifier: VertexClassifier::default(),
            remapper: VertexRemapper::default(),
            mesh_epoch: 0,
            classification_epoch: 0,
        }
    }
}
