// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runs a [`Job`] through a headless editing session.

use crate::types::{point, vector, EditCommand, Job, JobReport};
use anyhow::{Context, Result};
use slice27_core::{BoxHandle, EditPolicy, SliceSettings};
use slice27_geometry::{HandleSpace, SliceController, SliceSession};
use std::sync::Arc;

/// Load the mesh, enter scale mode at the rest configuration and apply every
/// edit in order.
pub fn run_job(job: Job, settings: SliceSettings) -> Result<JobReport> {
    let space = job.handle_space();
    let mesh = Arc::new(job.mesh);
    tracing::info!(
        mesh = %mesh.name,
        vertices = mesh.vertex_count(),
        edits = job.edits.len(),
        "Running job"
    );

    let controller = SliceController::new(settings).context("invalid settings")?;
    let mut session = SliceSession::new(controller);
    session
        .assign_mesh(Some(mesh))
        .context("failed to load reference mesh")?;

    if let Some(rest) = job.rest {
        session
            .undo_redo(&rest)
            .context("invalid rest configuration")?;
    }

    session.set_editing(true);
    session.set_policy(job.policy);
    session.set_scale_mode(true)?;

    let mut applied = 0;
    let mut ignored = 0;
    for (step, edit) in job.edits.iter().enumerate() {
        let done = apply(&mut session, edit, job.policy, &space)
            .with_context(|| format!("edit {} ({:?}) failed", step, edit))?;
        if done {
            applied += 1;
        } else {
            tracing::debug!(step, ?edit, "Edit ignored");
            ignored += 1;
        }
    }

    let controller = session.into_controller();
    let classification = controller.classification();
    let report = JobReport {
        mesh: controller
            .working_mesh()
            .cloned()
            .context("no working mesh")?,
        bounds: *controller.bounds(),
        rest: classification.map(|c| *c.rest()),
        cells: classification.map(|c| c.cell_histogram()),
        applied,
        ignored,
    };

    tracing::info!(applied, ignored, "Job finished");
    Ok(report)
}

fn apply(
    session: &mut SliceSession,
    edit: &EditCommand,
    policy: EditPolicy,
    space: &HandleSpace,
) -> Result<bool> {
    let done = match edit {
        EditCommand::Inner { size, center } => drag_with(
            session,
            EditPolicy::Free,
            policy,
            BoxHandle::Inner,
            size,
            center,
        )?,
        EditCommand::Outer { size, center } => drag_with(
            session,
            EditPolicy::Free,
            policy,
            BoxHandle::Outer,
            size,
            center,
        )?,
        EditCommand::Entire { size } => {
            let center = session.controller().bounds().outer_center();
            drag_with(
                session,
                EditPolicy::LockedOffset,
                policy,
                BoxHandle::Outer,
                size,
                &[center.x, center.y, center.z],
            )?
        }
        EditCommand::Axis { axis, bounds } => {
            session.edit_axis(*axis, *bounds)?;
            true
        }
        EditCommand::Drag {
            handle,
            size,
            center,
        } => session.drag_handle_in(space, *handle, vector(size), point(center))?,
        EditCommand::Reset => {
            session.reset()?;
            true
        }
        EditCommand::Rollback => {
            session.rollback()?;
            true
        }
        EditCommand::ScaleMode { enabled } => session.set_scale_mode(*enabled)?,
    };
    Ok(done)
}

/// Apply one drag under `policy`, then go back to the job policy
fn drag_with(
    session: &mut SliceSession,
    policy: EditPolicy,
    job_policy: EditPolicy,
    handle: BoxHandle,
    size: &[f64; 3],
    center: &[f64; 3],
) -> Result<bool> {
    session.set_policy(policy);
    let result = session.drag_handle(handle, vector(size), point(center));
    session.set_policy(job_policy);
    Ok(result?)
}
