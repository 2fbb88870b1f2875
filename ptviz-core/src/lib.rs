//! Core data structures for ptviz
//!
//! This crate provides the data that flows into the visualizer: fixed-width
//! point tables and their explicit layouts, point and mesh types, colors,
//! model transforms and generated geometric primitives.

pub mod color;
pub mod error;
pub mod mesh;
pub mod point;
pub mod point_cloud;
pub mod primitives;
pub mod table;
pub mod traits;
pub mod transform;

pub use color::*;
pub use error::*;
pub use mesh::*;
pub use point::*;
pub use point_cloud::*;
pub use table::*;
pub use traits::*;
pub use transform::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};
