//! Turning actors into GPU-ready vertex batches
//!
//! Actor color, opacity and scale are applied here, on the CPU, so the
//! renderer only needs one view-projection uniform per frame.

use crate::actor::{Actor, Geometry};
use bytemuck::{Pod, Zeroable};
use ptviz_core::{Rgb, Vector3f};

/// Default color for geometry that has neither per-vertex colors nor an actor color
const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Vertex for line and triangle batches
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    /// Zero for unlit geometry
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// One point, drawn as a screen-aligned square `size` pixels wide
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub size: f32,
}

impl PointInstance {
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            0 => Float32x3, 1 => Float32x3, 2 => Float32x4, 3 => Float32
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// All drawable geometry of one scene
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameGeometry {
    pub points: Vec<PointInstance>,
    /// Pairs of vertices
    pub lines: Vec<Vertex>,
    /// Triples of vertices
    pub triangles: Vec<Vertex>,
}

impl FrameGeometry {
    pub fn build(actors: &[Actor]) -> Self {
        let mut frame = Self::default();
        for actor in actors.iter().filter(|a| a.properties.visible) {
            frame.push_actor(actor);
        }
        frame
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty() && self.triangles.is_empty()
    }

    fn push_actor(&mut self, actor: &Actor) {
        let props = &actor.properties;
        let transform = props.transform();
        let paint = Paint {
            uniform: props.color,
            opacity: props.opacity,
        };

        match &actor.geometry {
            Geometry::Points {
                positions,
                colors,
                normals,
            } => {
                for (i, p) in positions.iter().enumerate() {
                    let normal = normals
                        .as_ref()
                        .and_then(|n| n.get(i))
                        .map(|n| transform.transform_normal(n))
                        .unwrap_or_else(Vector3f::zeros);
                    self.points.push(PointInstance {
                        position: transform.transform_point(p).into(),
                        normal: normal.into(),
                        color: paint.resolve(colors.as_ref().and_then(|c| c.get(i))),
                        size: props.point_size,
                    });
                }
            }
            Geometry::Lines { segments, colors } => {
                for (i, segment) in segments.iter().enumerate() {
                    let color = paint.resolve(colors.as_ref().and_then(|c| c.get(i)));
                    for p in segment {
                        self.lines.push(Vertex {
                            position: transform.transform_point(p).into(),
                            normal: [0.0; 3],
                            color,
                        });
                    }
                }
            }
            Geometry::Mesh(mesh) => {
                let face_normals = match mesh.normals {
                    Some(_) => None,
                    None => Some(mesh.calculate_face_normals()),
                };
                for (f, face) in mesh.faces.iter().enumerate() {
                    for &i in face {
                        let normal = match (&mesh.normals, &face_normals) {
                            (Some(n), _) => n.get(i).copied(),
                            (None, Some(fnormals)) => fnormals.get(f).copied(),
                            (None, None) => None,
                        }
                        .unwrap_or_else(Vector3f::zeros);
                        self.triangles.push(Vertex {
                            position: transform.transform_point(&mesh.vertices[i]).into(),
                            normal: transform.transform_normal(&normal).into(),
                            color: paint.resolve(mesh.colors.as_ref().and_then(|c| c.get(i))),
                        });
                    }
                }
            }
        }
    }
}

struct Paint {
    uniform: Option<Rgb>,
    opacity: f32,
}

impl Paint {
    /// Actor color wins over per-vertex color, which wins over the default
    fn resolve(&self, vertex: Option<&[u8; 3]>) -> [f32; 4] {
        let [r, g, b] = match (self.uniform, vertex) {
            (Some(c), _) => c.to_array(),
            (None, Some(c)) => Rgb::from_u8(*c).to_array(),
            (None, None) => DEFAULT_COLOR,
        };
        [r, g, b, self.opacity]
    }
}
