//! Integration tests for plotting sessions
//!
//! Sessions here draw to the headless surface, so the scene state can be
//! inspected without a window.

use ptviz_core::{Error, Point3f, PointTable, Rgb, TableLayout, TriangleMesh};
use ptviz_visualization::*;

/// Cosine ripple sampled on a small grid
fn create_ripple(size: usize) -> PointTable {
    let half = size as f64 / 2.0;
    let mut values = Vec::with_capacity(size * size * 3);
    for y in 0..size {
        for x in 0..size {
            let (x, y) = (x as f64, y as f64);
            let z = 10.0 * (0.1 * ((x - half).powi(2) + (y - half).powi(2)).sqrt()).cos();
            values.extend_from_slice(&[x, y, z]);
        }
    }
    PointTable::new(3, values).unwrap()
}

fn create_colored_table() -> PointTable {
    PointTable::from_rows(&[
        [0.0, 0.0, 0.0, 255.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0, 127.6, 0.0],
        [0.0, 1.0, 0.0, 0.0, 0.0, 300.0],
    ])
    .unwrap()
}

fn create_tetrahedron() -> TriangleMesh {
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.0, 0.0, 1.0),
        ],
        vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    )
}

fn session() -> Session {
    Session::create(ViewerConfig::default())
}

#[test]
fn test_plot_without_hold_replaces_scene() {
    let mut session = session();
    session.plot_xyz(&create_ripple(8), 'r', false).unwrap();
    let second = session.plot_xyz(&create_ripple(4), 'b', false).unwrap();

    let control = session.control().unwrap();
    assert_eq!(control.actor_count(), 1);
    assert_eq!(control.last_actor_id(), Some(second));
    assert_eq!(control.actor(second).unwrap().geometry.element_count(), 16);
}

#[test]
fn test_plot_with_hold_keeps_scene() {
    let mut session = session();
    let first = session.plot_xyz(&create_ripple(8), 'r', false).unwrap();
    let second = session.plot_xyzrgb(&create_colored_table(), true).unwrap();

    let control = session.control().unwrap();
    assert_eq!(control.actor_count(), 2);
    assert!(control.actor(first).is_ok());
    assert!(second > first);
}

#[test]
fn test_session_hold_flag_applies_to_every_plot() {
    let mut session = session();
    session.set_hold(true);
    assert!(session.is_hold_enabled());

    for _ in 0..3 {
        session.plot_xyz(&create_ripple(2), 'g', false).unwrap();
    }
    assert_eq!(session.control().unwrap().actor_count(), 3);

    session.set_hold(false);
    session.plot_xyz(&create_ripple(2), 'g', false).unwrap();
    assert_eq!(session.control().unwrap().actor_count(), 1);
}

#[test]
fn test_plot_xyz_applies_color_letter() {
    let mut session = session();
    let id = session.plot_xyz(&create_ripple(3), 'm', false).unwrap();

    let control = session.control().unwrap();
    assert_eq!(control.actor_color(id).unwrap(), Some(Rgb::MAGENTA));
    assert_eq!(control.actor(id).unwrap().kind, ActorKind::PointCloud);
}

#[test]
fn test_plot_xyz_with_scalar_column_is_greyscale() {
    let table = PointTable::from_rows(&[[0.0, 0.0, 0.0, 0.0], [1.0, 1.0, 1.0, 1.0]]).unwrap();
    let mut session = session();
    let id = session.plot_xyz(&table, 'r', false).unwrap();

    let control = session.control().unwrap();
    let actor = control.actor(id).unwrap();
    assert_eq!(actor.kind, ActorKind::ScalarPointCloud);
    assert_eq!(control.actor_color(id).unwrap(), None);
    match &actor.geometry {
        Geometry::Points { colors, .. } => {
            assert_eq!(colors.as_deref(), Some(&[[0, 0, 0], [255, 255, 255]][..]));
        }
        other => panic!("expected points, got {:?}", other),
    }
}

#[test]
fn test_plot_xyzrgb_rounds_and_clamps_colors() {
    let mut session = session();
    let id = session.plot_xyzrgb(&create_colored_table(), false).unwrap();

    let control = session.control().unwrap();
    match &control.actor(id).unwrap().geometry {
        Geometry::Points { positions, colors, .. } => {
            assert_eq!(positions.len(), 3);
            assert_eq!(
                colors.as_deref(),
                Some(&[[255, 0, 0], [0, 128, 0], [0, 0, 255]][..])
            );
        }
        other => panic!("expected points, got {:?}", other),
    }
}

#[test]
fn test_invalid_input_leaves_scene_untouched() {
    let mut session = session();
    session.plot_xyz(&create_ripple(4), 'r', false).unwrap();
    let redraws = session.control().unwrap().redraw_count();

    let five = PointTable::new(5, vec![0.0; 10]).unwrap();
    assert!(matches!(
        session.plot_xyz(&five, 'r', false),
        Err(Error::InvalidShape { found: 5, .. })
    ));
    assert!(matches!(
        session.plot_xyz(&create_ripple(2), 'x', false),
        Err(Error::UnknownColor('x'))
    ));
    assert!(session.plot_xyzrgb(&create_ripple(2), false).is_err());
    assert!(session.plot_hedgehog(&create_ripple(2), 1.0, false).is_err());

    let control = session.control().unwrap();
    assert_eq!(control.actor_count(), 1);
    assert_eq!(control.redraw_count(), redraws);
}

#[test]
fn test_each_plot_requests_one_redraw() {
    let mut session = session();
    session.plot_xyz(&create_ripple(2), 'r', false).unwrap();
    session.plot_xyzrgb(&create_colored_table(), true).unwrap();
    assert_eq!(session.control().unwrap().redraw_count(), 2);
}

#[test]
fn test_plot_hedgehog_and_table_layouts() {
    let table = PointTable::from_rows(&[
        [0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.5],
        [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0],
    ])
    .unwrap();
    let mut session = session();
    let id = session.plot_hedgehog(&table, 3.0, false).unwrap();
    {
        let control = session.control().unwrap();
        let actor = control.actor(id).unwrap();
        assert_eq!(actor.kind, ActorKind::HedgeHog);
        match &actor.geometry {
            Geometry::Lines { segments, colors } => {
                assert_eq!(segments.len(), 2);
                assert_eq!(segments[0][1], Point3f::new(0.0, 0.0, 6.0));
                assert!(colors.is_some());
            }
            other => panic!("expected lines, got {:?}", other),
        }
    }

    let id = session
        .plot_table(TableLayout::XyzRgb, &create_colored_table(), true)
        .unwrap();
    let control = session.control().unwrap();
    assert_eq!(control.actor_count(), 2);
    assert_eq!(control.actor(id).unwrap().kind, ActorKind::ColoredPointCloud);
}

#[test]
fn test_plot_normal_table_scales_by_config() {
    let config = ViewerConfig {
        hedgehog_scale: 0.5,
        ..ViewerConfig::default()
    };
    let mut session = Session::create(config);
    let table = PointTable::from_rows(&[[0.0, 1.0, 0.0, 4.0, 0.0, 0.0]]).unwrap();
    let id = session.plot_table(TableLayout::XyzNormal, &table, false).unwrap();
    let control = session.control().unwrap();
    match &control.actor(id).unwrap().geometry {
        Geometry::Lines { segments, .. } => {
            assert_eq!(segments[0][0], Point3f::new(0.0, 1.0, 0.0));
            assert_eq!(segments[0][1], Point3f::new(2.0, 1.0, 0.0));
        }
        other => panic!("expected lines, got {:?}", other),
    }
}

#[test]
fn test_plot_mesh_files() {
    let dir = tempfile::tempdir().unwrap();
    let ply = dir.path().join("tetra.ply");
    let stl = dir.path().join("tetra.stl");
    ptviz_io::write_mesh(&create_tetrahedron(), &ply).unwrap();
    ptviz_io::write_mesh(&create_tetrahedron(), &stl).unwrap();

    let mut session = session();
    let from_ply = session.plot_mesh_file(&ply, false).unwrap();
    let from_stl = session.plot_mesh_file(&stl, true).unwrap();

    let control = session.control().unwrap();
    assert_eq!(control.actor_count(), 2);
    for id in [from_ply, from_stl] {
        let actor = control.actor(id).unwrap();
        assert_eq!(actor.kind, ActorKind::Mesh);
        assert_eq!(actor.geometry.element_count(), 4);
    }
}

#[test]
fn test_missing_mesh_file_keeps_scene() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session();
    session.plot_xyz(&create_ripple(2), 'r', false).unwrap();

    let result = session.plot_mesh_file(dir.path().join("missing.ply"), false);
    assert!(matches!(result, Err(Error::Io(_))));
    let result = session.plot_mesh_file(dir.path().join("teapot.obj"), false);
    assert!(matches!(result, Err(Error::UnsupportedFormat(_))));

    assert_eq!(session.control().unwrap().actor_count(), 1);
}

#[test]
fn test_primitives_scene() {
    let mut session = session();
    let control = session.control().unwrap();

    let bx = control.add_box([-10.0, -5.0, -10.0, -5.0, -10.0, 0.0]).unwrap();
    control.add_sphere(Point3f::new(-10.0, -10.0, 10.0), 5.0).unwrap();
    control.add_cylinder(Point3f::new(10.0, 0.0, 0.0), 2.0, 10.0).unwrap();
    let plane = control.add_plane();
    control.add_axes(10.0).unwrap();

    control.set_actor_color(plane, (0.0f32, 1.0f32, 0.0f32)).unwrap();
    control.set_actor_opacity(plane, 0.5).unwrap();
    control.set_actor_scale(plane, nalgebra::Vector3::new(10.0f32, 10.0, 0.0)).unwrap();

    assert_eq!(control.actor_count(), 5);
    assert_eq!(control.actor(bx).unwrap().kind, ActorKind::Box);
    assert_eq!(control.actor_color(plane).unwrap(), Some(Rgb::GREEN));
    assert_eq!(control.actor_opacity(plane).unwrap(), 0.5);

    let bounds = control.bounds().unwrap();
    assert!(bounds.min.x <= -15.0 && bounds.max.x >= 12.0);
    assert!(bounds.max.z >= 15.0);

    assert!(control.add_box([1.0, 0.0, 0.0, 1.0, 0.0, 1.0]).is_err());
    assert!(control.add_sphere(Point3f::origin(), -1.0).is_err());
    assert_eq!(control.actor_count(), 5);
}

#[test]
fn test_shutdown_clears_scene() {
    let mut session = session();
    session.plot_xyz(&create_ripple(2), 'r', false).unwrap();
    session.plot_xyz(&create_ripple(2), 'g', true).unwrap();

    let stats = session.shutdown();
    assert_eq!(stats, SessionStats { actors: 2, redraws: 2 });
}
