//! Mesh file I/O for ptviz
//!
//! PLY is handled by `ply-rs` and STL by `stl_io`. Both produce a
//! [`TriangleMesh`] that the visualizer turns into a single actor.

pub mod ply;
pub mod stl;

pub use ply::{PlyReader, PlyWriter};
pub use stl::{StlReader, StlWriter};

use ptviz_core::{Error, Result, TriangleMesh};
use std::path::Path;

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()>;
}

/// Mesh file formats understood by [`read_mesh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Ply,
    Stl,
}

impl MeshFormat {
    /// Detect the format from the file extension, ignoring case
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("ply") => Ok(MeshFormat::Ply),
            Some("stl") => Ok(MeshFormat::Stl),
            _ => Err(Error::UnsupportedFormat(format!(
                "unsupported mesh format: {}",
                path.display()
            ))),
        }
    }
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match MeshFormat::from_path(path)? {
        MeshFormat::Ply => PlyReader::read_mesh(path),
        MeshFormat::Stl => StlReader::read_mesh(path),
    }
}

/// Auto-detect format and write mesh
pub fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match MeshFormat::from_path(path)? {
        MeshFormat::Ply => PlyWriter::write_mesh(mesh, path),
        MeshFormat::Stl => StlWriter::write_mesh(mesh, path),
    }
}

#[cfg(test)]
mod tests;
