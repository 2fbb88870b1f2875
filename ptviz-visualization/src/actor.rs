//! Actors: renderable objects tracked by id

use nalgebra::Vector3;
use ptviz_core::{Bounds, Point3f, Rgb, Transform3D, TriangleMesh, Vector3f};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier handed out by the visualizer control, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an actor was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    PointCloud,
    ScalarPointCloud,
    ColoredPointCloud,
    ShadedPoints,
    HedgeHog,
    Normals,
    Box,
    Sphere,
    Cylinder,
    Plane,
    Axes,
    Mesh,
}

/// Geometry owned by an actor
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Points {
        positions: Vec<Point3f>,
        colors: Option<Vec<[u8; 3]>>,
        normals: Option<Vec<Vector3f>>,
    },
    /// Line segments with an optional color per segment
    Lines {
        segments: Vec<[Point3f; 2]>,
        colors: Option<Vec<[u8; 3]>>,
    },
    Mesh(TriangleMesh),
}

impl Geometry {
    /// Number of primitives: points, segments or triangles
    pub fn element_count(&self) -> usize {
        match self {
            Geometry::Points { positions, .. } => positions.len(),
            Geometry::Lines { segments, .. } => segments.len(),
            Geometry::Mesh(mesh) => mesh.face_count(),
        }
    }

    fn positions(&self) -> Box<dyn Iterator<Item = &Point3f> + '_> {
        match self {
            Geometry::Points { positions, .. } => Box::new(positions.iter()),
            Geometry::Lines { segments, .. } => Box::new(segments.iter().flatten()),
            Geometry::Mesh(mesh) => Box::new(mesh.vertices.iter()),
        }
    }
}

/// Per-actor display properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorProperties {
    /// Uniform color overriding per-vertex colors; `None` keeps the geometry's own
    pub color: Option<Rgb>,
    pub opacity: f32,
    pub scale: Vector3<f32>,
    pub point_size: f32,
    pub visible: bool,
}

impl Default for ActorProperties {
    fn default() -> Self {
        Self {
            color: None,
            opacity: 1.0,
            scale: Vector3::new(1.0, 1.0, 1.0),
            point_size: 2.0,
            visible: true,
        }
    }
}

impl ActorProperties {
    pub fn transform(&self) -> Transform3D {
        Transform3D::scaling(self.scale)
    }
}

/// A renderable object in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub geometry: Geometry,
    pub properties: ActorProperties,
}

impl Actor {
    /// World-space bounds with the actor's scale applied
    pub fn bounds(&self) -> Option<Bounds> {
        let transform = self.properties.transform();
        let scaled: Vec<Point3f> = self
            .geometry
            .positions()
            .map(|p| transform.transform_point(p))
            .collect();
        Bounds::from_points(&scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_scale() {
        let actor = Actor {
            id: ActorId(0),
            kind: ActorKind::Plane,
            geometry: Geometry::Mesh(ptviz_core::primitives::generate_plane()),
            properties: ActorProperties {
                scale: Vector3::new(10.0, 10.0, 0.0),
                ..Default::default()
            },
        };
        let b = actor.bounds().unwrap();
        assert_eq!(b.min, Point3f::new(-5.0, -5.0, 0.0));
        assert_eq!(b.max, Point3f::new(5.0, 5.0, 0.0));
    }

    #[test]
    fn test_element_count() {
        let lines = Geometry::Lines {
            segments: vec![[Point3f::origin(), Point3f::new(1.0, 0.0, 0.0)]; 3],
            colors: None,
        };
        assert_eq!(lines.element_count(), 3);
    }
}
