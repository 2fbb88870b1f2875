//! # ptviz
//!
//! Quick 3D plotting of point clouds, normals, primitives and meshes.
//!
//! This is the umbrella crate. It re-exports the data types of
//! `ptviz-core` and, behind features, the file readers and the viewer.
//!
//! ## Quick Start
//!
//! ```rust
//! use ptviz::prelude::*;
//!
//! # fn main() -> ptviz::Result<()> {
//! let mut session = Session::create(ViewerConfig::default());
//! let table = PointTable::from_rows(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])?;
//! session.plot_xyz(&table, 'r', false)?;
//!
//! let stats = session.shutdown();
//! assert_eq!(stats.actors, 1);
//! # Ok(())
//! # }
//! ```
//!
//! Pass the session to [`Viewer::new`](visualization::Viewer::new) and call
//! `run` to look at it in a window.
//!
//! ## Feature Flags
//!
//! - `io`: PLY and STL mesh files
//! - `visualization`: actor scene, plotting session and the wgpu viewer (implies `io`)

pub use ptviz_core::*;

#[cfg(feature = "io")]
pub use ptviz_io as io;

#[cfg(feature = "visualization")]
pub use ptviz_visualization as visualization;

/// Convenient imports for common use cases
pub mod prelude {
    pub use ptviz_core::*;

    #[cfg(feature = "io")]
    pub use ptviz_io::{read_mesh, write_mesh, MeshFormat, MeshReader, MeshWriter};

    #[cfg(feature = "visualization")]
    pub use ptviz_visualization::{
        ActorId, ActorKind, Camera, Session, SessionStats, Viewer, ViewerConfig, VisualizerControl,
    };
}
