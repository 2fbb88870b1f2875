//! Actor scene, plotting session and interactive viewer
//!
//! - [`VisualizerControl`] owns the actors of one scene
//! - [`Session`] adds the hold flag and the `plot_*` entry points
//! - [`Viewer`] shows a session in a wgpu window

pub mod actor;
pub mod camera;
pub mod config;
pub mod control;
pub mod frame;
pub mod renderer;
pub mod session;
pub mod surface;
pub mod viewer;

pub use actor::*;
pub use camera::*;
pub use config::*;
pub use control::*;
pub use session::*;
pub use surface::*;
pub use viewer::*;
