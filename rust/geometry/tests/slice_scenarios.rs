// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use slice27_core::{Axis, AxisBounds, BoxBounds, Sector, SliceBounds, SliceSettings};
use slice27_geometry::{Mesh, Point3, SliceController, Vector3};
use std::sync::Arc;

/// Outer box [-0.5, 0.5]^3 with inner box [-0.4, 0.4]^3
fn unit_cube_bounds() -> SliceBounds {
    let outer = BoxBounds::from_size_center(&Vector3::repeat(1.0), &Point3::origin());
    let inner = BoxBounds::from_size_center(&Vector3::repeat(0.8), &Point3::origin());
    SliceBounds::from_boxes(outer, inner, 1e-4).unwrap()
}

/// Vertices along the x axis: outer face, inside the inner box, inside the upper shell
fn sample_mesh() -> Arc<Mesh> {
    Arc::new(Mesh::from_positions(
        "sample",
        vec![-0.5, 0.0, 0.0, 0.2, 0.0, 0.0, 0.45, 0.0, 0.0, 0.0, 0.0, 0.0],
    ))
}

fn classified(bounds: SliceBounds, mesh: Arc<Mesh>) -> SliceController {
    let mut controller = SliceController::with_bounds(SliceSettings::default(), bounds).unwrap();
    controller.initialize(Some(mesh)).unwrap();
    controller.define_vertices().unwrap();
    controller
}

fn x_of(controller: &SliceController, vertex: usize) -> f32 {
    controller.working_positions().unwrap()[vertex * 3]
}

#[test]
fn test_outer_stretch_keeps_inner_region() {
    let mut controller = classified(unit_cube_bounds(), sample_mesh());
    controller
        .set_outer_box(Vector3::new(2.0, 1.0, 1.0), Point3::origin())
        .unwrap();
    controller.update_mesh_scale().unwrap();

    assert_relative_eq!(x_of(&controller, 0), -1.0, epsilon = 1e-5);
    assert_relative_eq!(x_of(&controller, 1), 0.2, epsilon = 1e-5);
    assert_relative_eq!(x_of(&controller, 2), 0.7, epsilon = 1e-5);
    assert_relative_eq!(x_of(&controller, 3), 0.0, epsilon = 1e-5);
}

#[test]
fn test_inner_resize_is_affine_inside_inner_box() {
    let mut controller = classified(unit_cube_bounds(), sample_mesh());
    // inner x becomes [-0.2, 0.4]
    controller
        .set_inner_box(Vector3::new(0.6, 0.8, 0.8), Point3::new(0.1, 0.0, 0.0))
        .unwrap();
    controller.update_mesh_scale().unwrap();

    let a = x_of(&controller, 3);
    let b = x_of(&controller, 1);
    assert_relative_eq!(a, 0.1, epsilon = 1e-5);
    assert_relative_eq!(b, 0.25, epsilon = 1e-5);
    // Slope equals the inner size ratio
    assert_relative_eq!((b - a) / 0.2, 0.75, epsilon = 1e-4);
    // Outer face vertex is pinned to the unchanged outer box
    assert_relative_eq!(x_of(&controller, 0), -0.5, epsilon = 1e-5);
}

#[test]
fn test_remap_is_idempotent() {
    let mut controller = classified(unit_cube_bounds(), sample_mesh());
    controller
        .set_outer_box(Vector3::new(1.7, 2.0, 0.9), Point3::new(0.3, 0.0, 0.0))
        .unwrap();
    controller.update_mesh_scale().unwrap();
    let once = controller.working_positions().unwrap().to_vec();
    controller.update_mesh_scale().unwrap();
    assert_eq!(controller.working_positions().unwrap(), &once[..]);
}

#[test]
fn test_restoring_rest_bounds_round_trips() {
    let mesh = sample_mesh();
    let mut controller = classified(unit_cube_bounds(), mesh.clone());
    let rest = *controller.bounds();

    controller
        .set_outer_box(Vector3::new(3.0, 0.5, 2.0), Point3::new(-1.0, 0.0, 0.5))
        .unwrap();
    controller
        .set_inner_box(Vector3::new(0.2, 0.2, 0.2), Point3::new(-1.0, 0.0, 0.5))
        .unwrap();
    controller.update_mesh_scale().unwrap();

    controller.restore_bounds(&rest).unwrap();
    controller.update_mesh_scale().unwrap();
    for (a, b) in controller
        .working_positions()
        .unwrap()
        .iter()
        .zip(mesh.positions.iter())
    {
        assert_relative_eq!(*a, *b, epsilon = 1e-5);
    }
}

#[test]
fn test_margin_holds_after_every_edit() {
    let mut bounds = unit_cube_bounds();

    bounds
        .set_inner_box(Vector3::repeat(5.0), Point3::origin())
        .unwrap();
    assert!(bounds.satisfies_margin());

    bounds
        .set_inner_box(Vector3::repeat(0.1), Point3::new(3.0, -3.0, 0.0))
        .unwrap();
    assert!(bounds.satisfies_margin());

    bounds
        .set_outer_box(Vector3::repeat(0.3), Point3::new(0.2, 0.0, 0.0))
        .unwrap();
    assert!(bounds.satisfies_margin());

    bounds.set_entire_box(Vector3::new(4.0, 0.5, 1.0)).unwrap();
    assert!(bounds.satisfies_margin());

    bounds
        .set_axis(Axis::Z, AxisBounds::new(-1.0, -2.0, 2.0, 1.0))
        .unwrap();
    assert!(bounds.satisfies_margin());

    let before = bounds;
    assert!(bounds
        .set_outer_box(Vector3::new(1.0, 1e-5, 1.0), Point3::origin())
        .is_err());
    assert_eq!(bounds, before);
}

#[test]
fn test_entire_box_keeps_shell_thickness() {
    let mut controller = classified(unit_cube_bounds(), sample_mesh());
    controller.set_entire_box(Vector3::new(3.0, 1.0, 1.0)).unwrap();

    let x = controller.bounds().axis(Axis::X);
    assert_relative_eq!(x.lower_shell(), 0.1, epsilon = 1e-9);
    assert_relative_eq!(x.upper_shell(), 0.1, epsilon = 1e-9);
    assert_relative_eq!(x.inner_size(), 2.8, epsilon = 1e-9);

    controller.update_mesh_scale().unwrap();
    // Shell vertices translate with their faces
    assert_relative_eq!(x_of(&controller, 0), -1.5, epsilon = 1e-5);
    assert_relative_eq!(x_of(&controller, 2), 1.45, epsilon = 1e-5);
    // Inner vertices stretch with the inner box
    assert_relative_eq!(x_of(&controller, 1), 0.7, epsilon = 1e-5);
}

#[test]
fn test_entire_box_shrink_keeps_center() {
    let mut controller = classified(unit_cube_bounds(), sample_mesh());
    controller.set_entire_box(Vector3::new(0.9, 1.0, 1.0)).unwrap();

    let bounds = controller.bounds();
    assert_relative_eq!(bounds.outer_size().x, 0.9, epsilon = 1e-9);
    assert_relative_eq!(bounds.inner_size().x, 0.7, epsilon = 1e-9);
    assert_relative_eq!(bounds.inner_center().x, 0.0, epsilon = 1e-12);
    assert!(bounds.satisfies_margin());

    controller.update_mesh_scale().unwrap();
    assert_relative_eq!(x_of(&controller, 0), -0.45, epsilon = 1e-5);
    assert_relative_eq!(x_of(&controller, 1), 0.175, epsilon = 1e-5);
    assert_relative_eq!(x_of(&controller, 2), 0.4, epsilon = 1e-5);
    assert_relative_eq!(x_of(&controller, 3), 0.0, epsilon = 1e-5);
}

#[test]
fn test_entire_box_shrink_past_inner_collapses_on_center() {
    let mut controller = classified(unit_cube_bounds(), sample_mesh());
    // Shrinking by 0.9 eats the whole 0.8 inner width
    controller.set_entire_box(Vector3::new(0.1, 1.0, 1.0)).unwrap();

    let bounds = controller.bounds();
    let x = bounds.axis(Axis::X);
    assert_relative_eq!(bounds.outer_size().x, 0.1, epsilon = 1e-9);
    assert_eq!(x.min_inner, 0.0);
    assert_eq!(x.max_inner, 0.0);
    assert!(bounds.satisfies_margin());

    controller.update_mesh_scale().unwrap();
    assert_relative_eq!(x_of(&controller, 0), -0.05, epsilon = 1e-5);
    assert_relative_eq!(x_of(&controller, 1), 0.0, epsilon = 1e-5);
    assert_relative_eq!(x_of(&controller, 2), 0.025, epsilon = 1e-5);
}

#[test]
fn test_cube_corners_follow_doubled_outer_box() {
    let corners: Vec<f32> = (0..8)
        .flat_map(|i| {
            let c = |bit: u32| if i & bit == 0 { -0.5 } else { 0.5 };
            [c(1), c(2), c(4)]
        })
        .collect();
    let mut controller = classified(unit_cube_bounds(), Arc::new(Mesh::from_positions("cube", corners)));
    controller
        .set_outer_box(Vector3::repeat(2.0), Point3::origin())
        .unwrap();
    controller.update_mesh_scale().unwrap();

    let positions = controller.working_positions().unwrap();
    assert_eq!(positions.len(), 24);
    for p in positions {
        assert_relative_eq!(p.abs(), 1.0, epsilon = 1e-5);
    }
    // Corner signs are kept
    assert!(positions[..3].iter().all(|&v| v < 0.0));
    assert!(positions[21..].iter().all(|&v| v > 0.0));
}

#[test]
fn test_vertex_on_inner_face_follows_the_face() {
    let outer = BoxBounds::from_size_center(&Vector3::repeat(2.0), &Point3::origin());
    let inner = BoxBounds::from_size_center(&Vector3::repeat(1.0), &Point3::origin());
    let bounds = SliceBounds::from_boxes(outer, inner, 1e-4).unwrap();
    let mesh = Arc::new(Mesh::from_positions("face", vec![-0.5, 0.5, 0.0]));

    let mut controller = classified(bounds, mesh);
    let record = controller.classification().unwrap().records()[0];
    assert_eq!(record.x.sector, Sector::Below);
    assert_eq!(record.y.sector, Sector::Inner);

    controller
        .set_inner_box(Vector3::repeat(1.0), Point3::new(0.25, 0.25, 0.0))
        .unwrap();
    controller.update_mesh_scale().unwrap();

    let p = controller.working_positions().unwrap();
    assert_relative_eq!(p[0], -0.25, epsilon = 1e-6);
    assert_relative_eq!(p[1], 0.75, epsilon = 1e-6);
}

#[test]
fn test_classification_uses_reference_not_working_mesh() {
    let mesh = sample_mesh();
    let mut controller = classified(unit_cube_bounds(), mesh.clone());
    controller
        .set_outer_box(Vector3::new(2.0, 1.0, 1.0), Point3::origin())
        .unwrap();
    controller.update_mesh_scale().unwrap();

    // Committing a new rest pose re-reads the untouched reference positions
    controller.define_vertices().unwrap();
    let classification = controller.classification().unwrap();
    assert!(classification.built_from(&mesh));
    assert_eq!(classification.epoch(), 2);
}
