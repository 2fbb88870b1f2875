//! Geometric primitive generation
//!
//! Every solid is returned as a [`TriangleMesh`] with outward vertex normals.
//! Faces are wound counter-clockwise when seen from outside.

use crate::error::{Error, Result};
use crate::mesh::TriangleMesh;
use crate::point::*;
use std::f32::consts::PI;

/// Segments per full turn for spheres and cylinders
pub const DEFAULT_RESOLUTION: usize = 24;

/// A colored line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3f,
    pub end: Point3f,
    pub color: [u8; 3],
}

/// Axis-aligned box from `[xmin, xmax, ymin, ymax, zmin, zmax]`
pub fn generate_box(bounds: [f32; 6]) -> Result<TriangleMesh> {
    let [x0, x1, y0, y1, z0, z1] = bounds;
    if bounds.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidData(format!(
            "box bounds must be finite, got {:?}",
            bounds
        )));
    }
    if x0 > x1 || y0 > y1 || z0 > z1 {
        return Err(Error::InvalidData(format!(
            "box bounds must be ordered as [xmin, xmax, ymin, ymax, zmin, zmax], got {:?}",
            bounds
        )));
    }

    // (normal, four corners counter-clockwise seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]]),
        ([0.0, 0.0, -1.0], [[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]]),
        ([-1.0, 0.0, 0.0], [[x0, y0, z0], [x0, y0, z1], [x0, y1, z1], [x0, y1, z0]]),
        ([1.0, 0.0, 0.0], [[x1, y0, z1], [x1, y0, z0], [x1, y1, z0], [x1, y1, z1]]),
        ([0.0, 1.0, 0.0], [[x0, y1, z1], [x1, y1, z1], [x1, y1, z0], [x0, y1, z0]]),
        ([0.0, -1.0, 0.0], [[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]]),
    ];

    let mut mesh = TriangleMesh::new();
    let mut normals = Vec::with_capacity(24);
    for (normal, corners) in faces {
        let base = mesh.vertices.len();
        for c in corners {
            mesh.add_vertex(Point3f::new(c[0], c[1], c[2]));
            normals.push(Vector3f::new(normal[0], normal[1], normal[2]));
        }
        mesh.add_face([base, base + 1, base + 2]);
        mesh.add_face([base, base + 2, base + 3]);
    }
    mesh.set_normals(normals);
    Ok(mesh)
}

/// UV sphere around `center`
pub fn generate_sphere(center: Point3f, radius: f32, resolution: usize) -> Result<TriangleMesh> {
    check_positive("sphere radius", radius)?;
    let slices = resolution.max(3);
    let stacks = (resolution / 2).max(2);

    let mut mesh = TriangleMesh::new();
    let mut normals = Vec::new();
    for stack in 0..=stacks {
        let phi = PI * stack as f32 / stacks as f32;
        for slice in 0..=slices {
            let theta = 2.0 * PI * slice as f32 / slices as f32;
            let n = Vector3f::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            mesh.add_vertex(center + n * radius);
            normals.push(n);
        }
    }

    let row = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * row + slice;
            let b = a + row;
            if stack != 0 {
                mesh.add_face([a, a + 1, b]);
            }
            if stack != stacks - 1 {
                mesh.add_face([a + 1, b + 1, b]);
            }
        }
    }
    mesh.set_normals(normals);
    Ok(mesh)
}

/// Capped cylinder with its axis along +Y, centred on `center`
pub fn generate_cylinder(
    center: Point3f,
    radius: f32,
    height: f32,
    resolution: usize,
) -> Result<TriangleMesh> {
    check_positive("cylinder radius", radius)?;
    check_positive("cylinder height", height)?;
    let slices = resolution.max(3);
    let half = height / 2.0;

    let mut mesh = TriangleMesh::new();
    let mut normals = Vec::new();

    // Side wall: bottom and top ring, duplicated seam vertex
    for slice in 0..=slices {
        let theta = 2.0 * PI * slice as f32 / slices as f32;
        let n = Vector3f::new(theta.cos(), 0.0, theta.sin());
        for y in [-half, half] {
            mesh.add_vertex(center + Vector3f::new(n.x * radius, y, n.z * radius));
            normals.push(n);
        }
    }
    for slice in 0..slices {
        let b0 = slice * 2;
        let t0 = b0 + 1;
        let b1 = b0 + 2;
        let t1 = b0 + 3;
        mesh.add_face([b0, t0, t1]);
        mesh.add_face([b0, t1, b1]);
    }

    // Caps
    for (y, ny) in [(half, 1.0f32), (-half, -1.0f32)] {
        let normal = Vector3f::new(0.0, ny, 0.0);
        let hub = mesh.add_vertex(center + Vector3f::new(0.0, y, 0.0));
        normals.push(normal);
        let first = mesh.vertices.len();
        for slice in 0..slices {
            let theta = 2.0 * PI * slice as f32 / slices as f32;
            mesh.add_vertex(center + Vector3f::new(theta.cos() * radius, y, theta.sin() * radius));
            normals.push(normal);
        }
        for slice in 0..slices {
            let a = first + slice;
            let b = first + (slice + 1) % slices;
            if ny > 0.0 {
                mesh.add_face([hub, b, a]);
            } else {
                mesh.add_face([hub, a, b]);
            }
        }
    }

    mesh.set_normals(normals);
    Ok(mesh)
}

/// Unit square in the XY plane centred at the origin, facing +Z
pub fn generate_plane() -> TriangleMesh {
    let mut mesh = TriangleMesh::from_vertices_and_faces(
        vec![
            Point3f::new(-0.5, -0.5, 0.0),
            Point3f::new(0.5, -0.5, 0.0),
            Point3f::new(0.5, 0.5, 0.0),
            Point3f::new(-0.5, 0.5, 0.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    );
    mesh.set_normals(vec![Vector3f::z(); 4]);
    mesh
}

/// Coordinate axes from the origin: X red, Y green, Z blue
pub fn generate_axes(length: f32) -> Result<Vec<Segment>> {
    check_positive("axes length", length)?;
    let origin = Point3f::origin();
    Ok(vec![
        Segment {
            start: origin,
            end: Point3f::new(length, 0.0, 0.0),
            color: [255, 0, 0],
        },
        Segment {
            start: origin,
            end: Point3f::new(0.0, length, 0.0),
            color: [0, 255, 0],
        },
        Segment {
            start: origin,
            end: Point3f::new(0.0, 0.0, length),
            color: [0, 0, 255],
        },
    ])
}

fn check_positive(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidData(format!("{} must be positive, got {}", what, value)))
    }
}
