//! Render surfaces receive redraw requests from the visualizer control

use crate::actor::Actor;
use ptviz_core::Result;

/// Anything that can be asked to redraw the scene
pub trait RenderSurface {
    /// Ask for the given scene to be drawn
    fn request_redraw(&mut self, actors: &[Actor]) -> Result<()>;

    /// Number of redraws requested so far
    fn redraw_count(&self) -> u64;
}

/// Surface that draws nothing and only records requests
#[derive(Debug, Default, Clone)]
pub struct HeadlessSurface {
    redraws: u64,
    last_actor_count: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headless surface that continues counting from `redraws`
    pub fn starting_at(redraws: u64) -> Self {
        Self {
            redraws,
            last_actor_count: 0,
        }
    }

    /// Number of actors in the most recent redraw request
    pub fn last_actor_count(&self) -> usize {
        self.last_actor_count
    }
}

impl RenderSurface for HeadlessSurface {
    fn request_redraw(&mut self, actors: &[Actor]) -> Result<()> {
        self.redraws += 1;
        self.last_actor_count = actors.len();
        Ok(())
    }

    fn redraw_count(&self) -> u64 {
        self.redraws
    }
}
