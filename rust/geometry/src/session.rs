// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Editing session over a [`SliceController`]
//!
//! Tracks the editor toggles (edit mode, scale mode, edit policy) and decides
//! when a bounds change should classify, remap, or do nothing. While scale
//! mode is off, bounds edits only move the boxes; the mesh follows once
//! scale mode is entered, which commits the current bounds as the rest pose.

use crate::controller::SliceController;
use crate::error::Result;
use crate::handle::HandleSpace;
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use slice27_core::{Axis, AxisBounds, BoxHandle, EditPolicy, SliceBounds};
use std::sync::Arc;

/// Headless slice editor
pub struct SliceSession {
    controller: SliceController,
    editing: bool,
    scale_mode: bool,
    policy: EditPolicy,
}

impl SliceSession {
    pub fn new(controller: SliceController) -> Self {
        Self {
            controller,
            editing: false,
            scale_mode: false,
            policy: EditPolicy::Free,
        }
    }

    pub fn controller(&self) -> &SliceController {
        &self.controller
    }

    pub fn into_controller(self) -> SliceController {
        self.controller
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_scale_mode(&self) -> bool {
        self.scale_mode
    }

    pub fn policy(&self) -> EditPolicy {
        self.policy
    }

    /// Assign a new reference mesh: fresh working copy, bounds fitted to it,
    /// and a classification pass when editing.
    ///
    /// Assigning `None` ends editing.
    pub fn assign_mesh(&mut self, mesh: Option<Arc<Mesh>>) -> Result<()> {
        if mesh.is_none() {
            self.set_editing(false);
            return Ok(());
        }
        self.controller.initialize(mesh)?;
        self.controller.reset_bounds()?;
        if self.editing {
            self.controller.define_vertices()?;
        }
        Ok(())
    }

    /// Enter or leave edit mode. Leaving clears scale mode and the policy.
    ///
    /// Edit mode cannot be entered without a reference mesh.
    pub fn set_editing(&mut self, editing: bool) -> bool {
        if editing && self.controller.reference().is_none() {
            tracing::debug!("Edit mode needs a reference mesh");
            return false;
        }
        self.editing = editing;
        if !editing {
            self.scale_mode = false;
            self.policy = EditPolicy::Free;
        }
        true
    }

    /// Toggle scale mode; entering it commits the current bounds as rest pose.
    ///
    /// Committing re-classifies the reference mesh, not the working mesh: if
    /// the boxes are moved outside scale mode and scale mode is entered again,
    /// any deformation applied in the earlier scale-mode session is dropped.
    pub fn set_scale_mode(&mut self, scale_mode: bool) -> Result<bool> {
        if !self.editing {
            return Ok(false);
        }
        if scale_mode && !self.scale_mode {
            self.controller.define_vertices()?;
        }
        self.scale_mode = scale_mode;
        Ok(true)
    }

    /// Select how handle drags are applied
    pub fn set_policy(&mut self, policy: EditPolicy) -> bool {
        if !self.editing {
            return false;
        }
        self.policy = policy;
        true
    }

    /// Apply a handle drag given in mesh space
    pub fn drag_handle(
        &mut self,
        handle: BoxHandle,
        size: Vector3<f64>,
        center: Point3<f64>,
    ) -> Result<bool> {
        if !self.editing {
            return Ok(false);
        }
        let applied = self
            .controller
            .apply_handle_edit(handle, self.policy, size, center)?;
        if applied {
            self.follow_bounds()?;
        }
        Ok(applied)
    }

    /// Apply a handle drag given in handle (world) space
    pub fn drag_handle_in(
        &mut self,
        space: &HandleSpace,
        handle: BoxHandle,
        handle_size: Vector3<f64>,
        handle_center: Point3<f64>,
    ) -> Result<bool> {
        let size = space.size_from_handle(&handle_size);
        let center = space.center_from_handle(&handle_center);
        self.drag_handle(handle, size, center)
    }

    /// Inspector edit of one axis' four values
    pub fn edit_axis(&mut self, axis: Axis, bounds: AxisBounds) -> Result<()> {
        self.controller.set_axis(axis, bounds)?;
        self.follow_bounds()
    }

    /// Replay an undo/redo snapshot
    pub fn undo_redo(&mut self, snapshot: &SliceBounds) -> Result<()> {
        self.controller.restore_bounds(snapshot)?;
        self.follow_bounds()
    }

    /// Fit bounds back onto the reference mesh
    pub fn reset(&mut self) -> Result<()> {
        self.controller.reset_bounds()?;
        self.follow_bounds()
    }

    /// Discard the deformation and leave scale mode
    pub fn rollback(&mut self) -> Result<()> {
        self.controller.rollback()?;
        self.scale_mode = false;
        Ok(())
    }

    /// Remap when the mesh is supposed to track the bounds
    fn follow_bounds(&mut self) -> Result<()> {
        if self.scale_mode {
            self.controller.update_mesh_scale()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bar() -> Arc<Mesh> {
        // Two vertices on each end of a 4 x 1 x 1 bar
        Arc::new(Mesh::from_positions(
            "bar",
            vec![-2.0, 0.0, 0.0, -1.5, 0.0, 0.0, 1.5, 0.0, 0.0, 2.0, 0.0, 0.0],
        ))
    }

    fn editing_session() -> SliceSession {
        let mut session = SliceSession::new(SliceController::default());
        session.assign_mesh(Some(bar())).unwrap();
        assert!(session.set_editing(true));
        session
    }

    #[test]
    fn test_cannot_edit_without_mesh() {
        let mut session = SliceSession::new(SliceController::default());
        assert!(!session.set_editing(true));
        assert!(!session.set_scale_mode(true).unwrap());
        assert!(!session.set_policy(EditPolicy::Mirrored));
    }

    #[test]
    fn test_drag_without_scale_mode_leaves_mesh() {
        let mut session = editing_session();
        let before = session.controller().working_positions().unwrap().to_vec();

        session
            .drag_handle(BoxHandle::Outer, Vector3::new(8.0, 1.0, 1.0), Point3::origin())
            .unwrap();
        assert_eq!(session.controller().working_positions().unwrap(), &before[..]);
    }

    #[test]
    fn test_scale_mode_tracks_outer_drag() {
        let mut session = editing_session();
        session.set_scale_mode(true).unwrap();
        session
            .drag_handle(BoxHandle::Outer, Vector3::new(8.0, 1e-3, 1e-3), Point3::origin())
            .unwrap();

        let positions = session.controller().working_positions().unwrap();
        // Outer ends follow the outer box, inner box (x in [-1, 1]) is unchanged
        assert_relative_eq!(positions[0], -4.0, epsilon = 1e-5);
        assert_relative_eq!(positions[9], 4.0, epsilon = 1e-5);
        assert_relative_eq!(positions[3], -2.5, epsilon = 1e-5);
        assert_relative_eq!(positions[6], 2.5, epsilon = 1e-5);
    }

    #[test]
    fn test_locked_offset_ignores_inner_drag() {
        let mut session = editing_session();
        session.set_policy(EditPolicy::LockedOffset);
        let before = *session.controller().bounds();
        let applied = session
            .drag_handle(BoxHandle::Inner, Vector3::repeat(0.1), Point3::origin())
            .unwrap();
        assert!(!applied);
        assert_eq!(*session.controller().bounds(), before);
    }

    #[test]
    fn test_leaving_edit_mode_resets_toggles() {
        let mut session = editing_session();
        session.set_scale_mode(true).unwrap();
        session.set_policy(EditPolicy::Mirrored);
        session.set_editing(false);
        assert!(!session.is_scale_mode());
        assert_eq!(session.policy(), EditPolicy::Free);
    }

    #[test]
    fn test_undo_redo_remaps_in_scale_mode() {
        let mut session = editing_session();
        session.set_scale_mode(true).unwrap();
        let rest = *session.controller().bounds();
        let original = session.controller().working_positions().unwrap().to_vec();

        session
            .drag_handle(BoxHandle::Outer, Vector3::new(10.0, 1.0, 1.0), Point3::origin())
            .unwrap();
        assert_ne!(session.controller().working_positions().unwrap(), &original[..]);

        session.undo_redo(&rest).unwrap();
        let restored = session.controller().working_positions().unwrap();
        for (a, b) in restored.iter().zip(original.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_reentering_scale_mode_drops_earlier_deformation() {
        let mut session = editing_session();
        session.set_scale_mode(true).unwrap();
        session
            .drag_handle(BoxHandle::Outer, Vector3::new(8.0, 1.0, 1.0), Point3::origin())
            .unwrap();
        assert_relative_eq!(session.controller().working_positions().unwrap()[0], -4.0, epsilon = 1e-5);

        // Box moves outside scale mode leave the mesh alone
        session.set_scale_mode(false).unwrap();
        session
            .drag_handle(BoxHandle::Outer, Vector3::new(6.0, 1.0, 1.0), Point3::origin())
            .unwrap();
        assert_relative_eq!(session.controller().working_positions().unwrap()[0], -4.0, epsilon = 1e-5);

        // Re-entering classifies the reference mesh against the moved boxes
        session.set_scale_mode(true).unwrap();
        session
            .drag_handle(BoxHandle::Outer, Vector3::new(6.0, 1.0, 1.0), Point3::origin())
            .unwrap();
        let positions = session.controller().working_positions().unwrap();
        for (a, b) in positions.iter().zip(bar().positions.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_rollback_leaves_scale_mode() {
        let mut session = editing_session();
        session.set_scale_mode(true).unwrap();
        session
            .drag_handle(BoxHandle::Outer, Vector3::new(10.0, 1.0, 1.0), Point3::origin())
            .unwrap();

        session.rollback().unwrap();
        assert!(!session.is_scale_mode());
        assert_eq!(session.controller().working_positions().unwrap(), &bar().positions[..]);
    }

    #[test]
    fn test_drag_in_handle_space() {
        let mut session = editing_session();
        let space = HandleSpace::new(nalgebra::Matrix4::new_scaling(2.0));
        session
            .drag_handle_in(&space, BoxHandle::Outer, Vector3::new(12.0, 2.0, 2.0), Point3::origin())
            .unwrap();
        assert_relative_eq!(session.controller().bounds().outer_size().x, 6.0, epsilon = 1e-9);
    }
}
