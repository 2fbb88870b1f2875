//! Format detection through the public entry points

use crate::{read_mesh, MeshFormat};
use ptviz_core::Error;

#[test]
fn test_format_detection() {
    assert_eq!(MeshFormat::from_path("teapot.ply").unwrap(), MeshFormat::Ply);
    assert_eq!(MeshFormat::from_path("TEAPOT.STL").unwrap(), MeshFormat::Stl);
    assert!(matches!(
        MeshFormat::from_path("teapot.obj"),
        Err(Error::UnsupportedFormat(_))
    ));
    assert!(MeshFormat::from_path("no_extension").is_err());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.ply");
    assert!(matches!(read_mesh(&missing), Err(Error::Io(_))));
    let missing = dir.path().join("missing.stl");
    assert!(matches!(read_mesh(&missing), Err(Error::Io(_))));
}
