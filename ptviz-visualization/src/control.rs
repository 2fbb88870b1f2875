//! The visualizer control: actor store and construction call surface

use crate::actor::{Actor, ActorId, ActorKind, ActorProperties, Geometry};
use crate::config::ViewerConfig;
use crate::surface::{HeadlessSurface, RenderSurface};
use log::debug;
use nalgebra::Vector3;
use ptviz_core::primitives::{self, DEFAULT_RESOLUTION};
use ptviz_core::{
    scalar_to_grey, Bounds, Error, Point3f, PointTable, Result, Rgb, TableLayout, TriangleMesh,
};
use ptviz_io::{MeshReader, PlyReader, StlReader};
use std::path::Path;

/// Owns the actors of one scene and forwards redraw requests to a surface
pub struct VisualizerControl {
    actors: Vec<Actor>,
    next_id: u64,
    surface: Box<dyn RenderSurface>,
    config: ViewerConfig,
}

impl VisualizerControl {
    /// Control backed by a [`HeadlessSurface`]
    pub fn new(config: ViewerConfig) -> Self {
        Self::with_surface(config, Box::new(HeadlessSurface::new()))
    }

    pub fn with_surface(config: ViewerConfig, surface: Box<dyn RenderSurface>) -> Self {
        Self {
            actors: Vec::new(),
            next_id: 0,
            surface,
            config,
        }
    }

    /// Swap the render surface, returning the previous one
    pub fn set_surface(&mut self, surface: Box<dyn RenderSurface>) -> Box<dyn RenderSurface> {
        std::mem::replace(&mut self.surface, surface)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    // ---- point tables ----

    /// Points from a 3-column table, or scalar-colored points from a 4-column table
    pub fn add_point_cloud(&mut self, table: &PointTable) -> Result<ActorId> {
        match table.columns() {
            3 => self.add_table(TableLayout::PlainXyz, table),
            4 => self.add_table(TableLayout::XyzScalar, table),
            n => Err(Error::invalid_shape("3 or 4 columns", n)),
        }
    }

    /// Points with per-point colors from a 6-column (x, y, z, r, g, b) table
    pub fn add_colored_point_cloud(&mut self, table: &PointTable) -> Result<ActorId> {
        self.add_table(TableLayout::XyzRgb, table)
    }

    /// Segments from each point along its normal, scaled by `scale`
    pub fn add_hedgehog(&mut self, table: &PointTable, scale: f32) -> Result<ActorId> {
        TableLayout::XyzNormal.check(table)?;
        let geometry = hedgehog(table, scale, false)?;
        Ok(self.add_actor(ActorKind::HedgeHog, geometry))
    }

    /// Like [`add_hedgehog`](Self::add_hedgehog), with the 7th column greyscaling the segments
    pub fn add_hedgehog_with_scalars(&mut self, table: &PointTable, scale: f32) -> Result<ActorId> {
        TableLayout::XyzNormalScalar.check(table)?;
        let geometry = hedgehog(table, scale, false)?;
        Ok(self.add_actor(ActorKind::HedgeHog, geometry))
    }

    /// Unit-length normals scaled by `scale`, regardless of their stored magnitude
    pub fn add_normals(&mut self, table: &PointTable, scale: f32) -> Result<ActorId> {
        TableLayout::XyzNormal.check(table)?;
        let geometry = hedgehog(table, scale, true)?;
        Ok(self.add_actor(ActorKind::Normals, geometry))
    }

    /// Points lit by their normals
    pub fn add_shaded_points(&mut self, table: &PointTable) -> Result<ActorId> {
        let cloud = table.to_normal_points()?;
        let geometry = Geometry::Points {
            positions: cloud.iter().map(|p| p.position).collect(),
            colors: None,
            normals: Some(cloud.iter().map(|p| p.normal).collect()),
        };
        Ok(self.add_actor(ActorKind::ShadedPoints, geometry))
    }

    /// Add a table whose layout is stated rather than inferred.
    ///
    /// `XyzNormal` and `XyzNormalScalar` tables become hedgehogs with the
    /// configured default scale.
    pub fn add_table(&mut self, layout: TableLayout, table: &PointTable) -> Result<ActorId> {
        layout.check(table)?;
        let (kind, geometry) = match layout {
            TableLayout::PlainXyz => (
                ActorKind::PointCloud,
                Geometry::Points {
                    positions: table.to_points()?.points,
                    colors: None,
                    normals: None,
                },
            ),
            TableLayout::XyzScalar => {
                let cloud = table.to_scalar_points()?;
                (
                    ActorKind::ScalarPointCloud,
                    Geometry::Points {
                        positions: cloud.iter().map(|p| p.position).collect(),
                        colors: Some(cloud.iter().map(|p| scalar_to_grey(p.scalar)).collect()),
                        normals: None,
                    },
                )
            }
            TableLayout::XyzRgb => {
                let cloud = table.to_colored_points()?;
                (
                    ActorKind::ColoredPointCloud,
                    Geometry::Points {
                        positions: cloud.iter().map(|p| p.position).collect(),
                        colors: Some(cloud.iter().map(|p| p.color).collect()),
                        normals: None,
                    },
                )
            }
            TableLayout::XyzNormal | TableLayout::XyzNormalScalar => (
                ActorKind::HedgeHog,
                hedgehog(table, self.config.hedgehog_scale, false)?,
            ),
        };
        Ok(self.add_actor(kind, geometry))
    }

    // ---- primitives ----

    /// Axis-aligned box from `[xmin, xmax, ymin, ymax, zmin, zmax]`
    pub fn add_box(&mut self, bounds: [f32; 6]) -> Result<ActorId> {
        let mesh = primitives::generate_box(bounds)?;
        Ok(self.add_actor(ActorKind::Box, Geometry::Mesh(mesh)))
    }

    pub fn add_sphere(&mut self, center: impl Into<Point3f>, radius: f32) -> Result<ActorId> {
        let mesh = primitives::generate_sphere(center.into(), radius, DEFAULT_RESOLUTION)?;
        Ok(self.add_actor(ActorKind::Sphere, Geometry::Mesh(mesh)))
    }

    /// Cylinder with its axis along +Y, centred on `center`
    pub fn add_cylinder(
        &mut self,
        center: impl Into<Point3f>,
        radius: f32,
        height: f32,
    ) -> Result<ActorId> {
        let mesh = primitives::generate_cylinder(center.into(), radius, height, DEFAULT_RESOLUTION)?;
        Ok(self.add_actor(ActorKind::Cylinder, Geometry::Mesh(mesh)))
    }

    /// Unit plane in XY centred at the origin; size it with [`set_actor_scale`](Self::set_actor_scale)
    pub fn add_plane(&mut self) -> ActorId {
        self.add_actor(ActorKind::Plane, Geometry::Mesh(primitives::generate_plane()))
    }

    pub fn add_axes(&mut self, length: f32) -> Result<ActorId> {
        let axes = primitives::generate_axes(length)?;
        let geometry = Geometry::Lines {
            segments: axes.iter().map(|s| [s.start, s.end]).collect(),
            colors: Some(axes.iter().map(|s| s.color).collect()),
        };
        Ok(self.add_actor(ActorKind::Axes, geometry))
    }

    // ---- meshes ----

    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> Result<ActorId> {
        if !mesh.has_valid_faces() {
            return Err(Error::InvalidData(
                "mesh faces reference missing vertices".to_string(),
            ));
        }
        Ok(self.add_actor(ActorKind::Mesh, Geometry::Mesh(mesh)))
    }

    pub fn add_ply<P: AsRef<Path>>(&mut self, path: P) -> Result<ActorId> {
        let mesh = PlyReader::read_mesh(path)?;
        self.add_mesh(mesh)
    }

    pub fn add_stl<P: AsRef<Path>>(&mut self, path: P) -> Result<ActorId> {
        let mesh = StlReader::read_mesh(path)?;
        self.add_mesh(mesh)
    }

    /// Load a PLY or STL file, chosen by extension
    pub fn add_mesh_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ActorId> {
        let mesh = ptviz_io::read_mesh(path)?;
        self.add_mesh(mesh)
    }

    // ---- scene ----

    pub fn remove_all_actors(&mut self) {
        if !self.actors.is_empty() {
            debug!("removing {} actors", self.actors.len());
        }
        self.actors.clear();
    }

    pub fn remove_actor(&mut self, id: ActorId) -> Result<Actor> {
        let index = self
            .actors
            .iter()
            .position(|a| a.id == id)
            .ok_or(Error::ActorNotFound(id.0))?;
        debug!("removing actor {}", id);
        Ok(self.actors.remove(index))
    }

    /// Id of the most recently added actor that is still in the scene
    pub fn last_actor_id(&self) -> Option<ActorId> {
        self.actors.last().map(|a| a.id)
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Result<&Actor> {
        self.actors
            .iter()
            .find(|a| a.id == id)
            .ok_or(Error::ActorNotFound(id.0))
    }

    fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor> {
        self.actors
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(Error::ActorNotFound(id.0))
    }

    /// Bounds of all visible actors, scale applied
    pub fn bounds(&self) -> Option<Bounds> {
        self.actors
            .iter()
            .filter(|a| a.properties.visible)
            .filter_map(Actor::bounds)
            .reduce(|a, b| a.union(&b))
    }

    // ---- properties ----

    pub fn set_actor_color(&mut self, id: ActorId, color: impl Into<Rgb>) -> Result<()> {
        self.actor_mut(id)?.properties.color = Some(color.into());
        Ok(())
    }

    /// The uniform color, or `None` when the actor shows its own colors
    pub fn actor_color(&self, id: ActorId) -> Result<Option<Rgb>> {
        Ok(self.actor(id)?.properties.color)
    }

    /// Set opacity, clamped to [0, 1]
    pub fn set_actor_opacity(&mut self, id: ActorId, opacity: f32) -> Result<()> {
        let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
        self.actor_mut(id)?.properties.opacity = opacity;
        Ok(())
    }

    pub fn actor_opacity(&self, id: ActorId) -> Result<f32> {
        Ok(self.actor(id)?.properties.opacity)
    }

    /// Per-axis scale about the origin
    pub fn set_actor_scale(&mut self, id: ActorId, scale: impl Into<Vector3<f32>>) -> Result<()> {
        self.actor_mut(id)?.properties.scale = scale.into();
        Ok(())
    }

    pub fn actor_scale(&self, id: ActorId) -> Result<Vector3<f32>> {
        Ok(self.actor(id)?.properties.scale)
    }

    pub fn set_actor_point_size(&mut self, id: ActorId, size: f32) -> Result<()> {
        if !(size >= 0.0) {
            return Err(Error::InvalidData(format!(
                "point size must be non-negative, got {}",
                size
            )));
        }
        self.actor_mut(id)?.properties.point_size = size;
        Ok(())
    }

    pub fn actor_point_size(&self, id: ActorId) -> Result<f32> {
        Ok(self.actor(id)?.properties.point_size)
    }

    pub fn set_actor_visibility(&mut self, id: ActorId, visible: bool) -> Result<()> {
        self.actor_mut(id)?.properties.visible = visible;
        Ok(())
    }

    pub fn actor_visibility(&self, id: ActorId) -> Result<bool> {
        Ok(self.actor(id)?.properties.visible)
    }

    // ---- drawing ----

    /// Ask the surface to redraw the current scene
    pub fn render(&mut self) -> Result<()> {
        self.surface.request_redraw(&self.actors)
    }

    pub fn redraw_count(&self) -> u64 {
        self.surface.redraw_count()
    }

    fn add_actor(&mut self, kind: ActorKind, geometry: Geometry) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        debug!(
            "added {:?} actor {} with {} elements",
            kind,
            id,
            geometry.element_count()
        );
        self.actors.push(Actor {
            id,
            kind,
            geometry,
            properties: ActorProperties {
                point_size: self.config.point_size,
                ..Default::default()
            },
        });
        id
    }
}

/// Segments from each row's point along its normal.
///
/// With `unit` set the normal is normalized first; a 7th column greyscales
/// each segment.
fn hedgehog(table: &PointTable, scale: f32, unit: bool) -> Result<Geometry> {
    if !scale.is_finite() {
        return Err(Error::InvalidData(format!("scale must be finite, got {}", scale)));
    }
    let (points, scalars): (Vec<_>, Option<Vec<f32>>) = match table.columns() {
        6 => (table.to_normal_points()?.points, None),
        7 => {
            let cloud = table.to_scalar_normal_points()?;
            let scalars = cloud.iter().map(|p| p.scalar).collect();
            let points = cloud
                .iter()
                .map(|p| ptviz_core::NormalPoint3f {
                    position: p.position,
                    normal: p.normal,
                })
                .collect();
            (points, Some(scalars))
        }
        n => return Err(Error::invalid_shape("6 or 7 columns", n)),
    };

    let segments = points
        .iter()
        .map(|p| {
            let direction = if unit {
                p.normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros)
            } else {
                p.normal
            };
            [p.position, p.position + direction * scale]
        })
        .collect();
    let colors = scalars.map(|s| s.into_iter().map(scalar_to_grey).collect());
    Ok(Geometry::Lines { segments, colors })
}
