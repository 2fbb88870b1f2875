//! Plotting session: the current visualizer control and the hold flag
//!
//! A [`Session`] replaces process-wide plotting state with an explicit
//! context. Plot calls validate their input, clear the scene unless hold is
//! in effect, add exactly one actor and request a redraw.

use crate::actor::ActorId;
use crate::config::ViewerConfig;
use crate::control::VisualizerControl;
use crate::surface::{HeadlessSurface, RenderSurface};
use log::{debug, info};
use ptviz_core::{color_from_char, Error, PointTable, Result, TableLayout};
use std::path::Path;

/// Builds the render surface when the control is first needed
pub type SurfaceFactory = Box<dyn FnMut(&ViewerConfig) -> Result<Box<dyn RenderSurface>>>;

/// Summary returned by [`Session::shutdown`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub actors: usize,
    pub redraws: u64,
}

pub struct Session {
    config: ViewerConfig,
    control: Option<VisualizerControl>,
    hold: bool,
    factory: SurfaceFactory,
}

impl Session {
    /// Session whose control draws to a [`HeadlessSurface`] until a viewer attaches a window
    pub fn create(config: ViewerConfig) -> Self {
        Self::with_surface_factory(
            config,
            Box::new(|_: &ViewerConfig| -> Result<Box<dyn RenderSurface>> {
                Ok(Box::new(HeadlessSurface::new()))
            }),
        )
    }

    pub fn with_surface_factory(config: ViewerConfig, factory: SurfaceFactory) -> Self {
        Self {
            config,
            control: None,
            hold: false,
            factory,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The session's control, constructed on first use
    pub fn control(&mut self) -> Result<&mut VisualizerControl> {
        if self.control.is_none() {
            let surface = (self.factory)(&self.config)?;
            debug!("created visualizer control");
            self.control = Some(VisualizerControl::with_surface(self.config.clone(), surface));
        }
        self.control
            .as_mut()
            .ok_or_else(|| Error::Visualization("visualizer control unavailable".to_string()))
    }

    /// Whether a control has been constructed yet
    pub fn has_control(&self) -> bool {
        self.control.is_some()
    }

    /// Keep previously plotted actors when new ones are added
    pub fn set_hold(&mut self, hold: bool) {
        self.hold = hold;
    }

    pub fn is_hold_enabled(&self) -> bool {
        self.hold
    }

    /// Plot a 3-column point table in a one-letter color, or a 4-column table
    /// colored by its scalar column (0 black, 1 white).
    pub fn plot_xyz(&mut self, table: &PointTable, color: char, hold: bool) -> Result<ActorId> {
        let color = match table.columns() {
            3 => Some(color_from_char(color)?),
            4 => None,
            n => return Err(Error::invalid_shape("3 or 4 columns", n)),
        };
        let control = self.prepare(hold)?;
        let id = control.add_point_cloud(table)?;
        if let Some(color) = color {
            control.set_actor_color(id, color)?;
        }
        control.render()?;
        Ok(id)
    }

    /// [`plot_xyz`](Self::plot_xyz) in the configured default color
    pub fn plot(&mut self, table: &PointTable, hold: bool) -> Result<ActorId> {
        let color = self.config.default_color;
        self.plot_xyz(table, color, hold)
    }

    /// Plot a 6-column (x, y, z, r, g, b) table with colors in 0..255
    pub fn plot_xyzrgb(&mut self, table: &PointTable, hold: bool) -> Result<ActorId> {
        TableLayout::XyzRgb.check(table)?;
        let control = self.prepare(hold)?;
        let id = control.add_colored_point_cloud(table)?;
        control.render()?;
        Ok(id)
    }

    /// Plot points with normals as a hedgehog; a 7th column greyscales the segments
    pub fn plot_hedgehog(&mut self, table: &PointTable, scale: f32, hold: bool) -> Result<ActorId> {
        let layout = match table.columns() {
            6 => TableLayout::XyzNormal,
            7 => TableLayout::XyzNormalScalar,
            n => return Err(Error::invalid_shape("6 or 7 columns", n)),
        };
        if !scale.is_finite() {
            return Err(Error::InvalidData(format!("scale must be finite, got {}", scale)));
        }
        let control = self.prepare(hold)?;
        let id = match layout {
            TableLayout::XyzNormalScalar => control.add_hedgehog_with_scalars(table, scale)?,
            _ => control.add_hedgehog(table, scale)?,
        };
        control.render()?;
        Ok(id)
    }

    /// Plot a table whose column meaning is stated explicitly
    pub fn plot_table(
        &mut self,
        layout: TableLayout,
        table: &PointTable,
        hold: bool,
    ) -> Result<ActorId> {
        layout.check(table)?;
        let control = self.prepare(hold)?;
        let id = control.add_table(layout, table)?;
        control.render()?;
        Ok(id)
    }

    /// Plot a PLY or STL file as one actor
    pub fn plot_mesh_file<P: AsRef<Path>>(&mut self, path: P, hold: bool) -> Result<ActorId> {
        let mesh = ptviz_io::read_mesh(path)?;
        let control = self.prepare(hold)?;
        let id = control.add_mesh(mesh)?;
        control.render()?;
        Ok(id)
    }

    /// Clear the scene and report what the session did
    pub fn shutdown(mut self) -> SessionStats {
        let stats = match self.control.as_mut() {
            Some(control) => {
                let stats = SessionStats {
                    actors: control.actor_count(),
                    redraws: control.redraw_count(),
                };
                control.remove_all_actors();
                stats
            }
            None => SessionStats::default(),
        };
        info!(
            "session shut down with {} actors after {} redraws",
            stats.actors, stats.redraws
        );
        stats
    }

    /// Get the control, clearing it unless the call or the session holds
    fn prepare(&mut self, hold: bool) -> Result<&mut VisualizerControl> {
        let keep = hold || self.hold;
        let control = self.control()?;
        if !keep {
            control.remove_all_actors();
        }
        Ok(control)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::create(ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyz() -> PointTable {
        PointTable::from_rows(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap()
    }

    #[test]
    fn test_control_is_lazy() {
        let mut session = Session::default();
        assert!(!session.has_control());
        session.control().unwrap();
        assert!(session.has_control());
    }

    #[test]
    fn test_factory_error_propagates() {
        let mut session = Session::with_surface_factory(
            ViewerConfig::default(),
            Box::new(|_: &ViewerConfig| -> Result<Box<dyn RenderSurface>> {
                Err(Error::Visualization("no display".to_string()))
            }),
        );
        assert!(matches!(session.control(), Err(Error::Visualization(_))));
        assert!(session.plot_xyz(&xyz(), 'r', false).is_err());
    }

    #[test]
    fn test_bad_color_leaves_scene_untouched() {
        let mut session = Session::default();
        session.plot_xyz(&xyz(), 'r', false).unwrap();
        assert!(matches!(
            session.plot_xyz(&xyz(), 'x', false),
            Err(Error::UnknownColor('x'))
        ));
        assert_eq!(session.control().unwrap().actor_count(), 1);
    }

    #[test]
    fn test_plot_uses_default_color() {
        let mut session = Session::create(ViewerConfig {
            default_color: 'c',
            ..ViewerConfig::default()
        });
        let id = session.plot(&xyz(), false).unwrap();
        let color = session.control().unwrap().actor_color(id).unwrap();
        assert_eq!(color, Some(ptviz_core::Rgb::CYAN));
    }

    #[test]
    fn test_shutdown_reports_stats() {
        let mut session = Session::default();
        session.set_hold(true);
        session.plot_xyz(&xyz(), 'r', false).unwrap();
        session.plot_xyz(&xyz(), 'b', false).unwrap();
        let stats = session.shutdown();
        assert_eq!(stats, SessionStats { actors: 2, redraws: 2 });
    }
}
