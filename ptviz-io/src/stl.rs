//! STL format support (ASCII and binary)

use crate::{MeshReader, MeshWriter};
use log::debug;
use ptviz_core::{Error, Point3f, Result, TriangleMesh};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub struct StlReader;
pub struct StlWriter;

impl MeshReader for StlReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let indexed = stl_io::read_stl(&mut reader)
            .map_err(|e| Error::InvalidData(format!("malformed STL file {}: {}", path.display(), e)))?;

        let vertices = indexed
            .vertices
            .iter()
            .map(|v| Point3f::new(v[0], v[1], v[2]))
            .collect();
        let faces = indexed.faces.iter().map(|f| f.vertices).collect();

        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
        if !mesh.has_valid_faces() {
            return Err(Error::InvalidData(format!(
                "STL file {} references missing vertices",
                path.display()
            )));
        }
        mesh.compute_vertex_normals();

        debug!(
            "read STL {}: {} vertices, {} triangles",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

impl MeshWriter for StlWriter {
    /// Writes binary STL with per-face normals
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        if !mesh.has_valid_faces() {
            return Err(Error::InvalidData(
                "mesh faces reference missing vertices".to_string(),
            ));
        }
        let vertex = |i: usize| {
            let p = mesh.vertices[i];
            stl_io::Vertex::new([p.x, p.y, p.z])
        };
        let triangles: Vec<stl_io::Triangle> = mesh
            .faces
            .iter()
            .zip(mesh.calculate_face_normals())
            .map(|(face, n)| stl_io::Triangle {
                normal: stl_io::Normal::new([n.x, n.y, n.z]),
                vertices: [vertex(face[0]), vertex(face[1]), vertex(face[2])],
            })
            .collect();

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        stl_io::write_stl(&mut writer, triangles.iter())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ptviz_core::{primitives, Drawable};

    #[test]
    fn test_box_roundtrip_is_indexed() {
        let mesh = primitives::generate_box([0.0, 1.0, 0.0, 2.0, 0.0, 3.0]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("box.stl");

        StlWriter::write_mesh(&mesh, &path).unwrap();
        let loaded = StlReader::read_mesh(&path).unwrap();

        assert_eq!(loaded.face_count(), 12);
        // Shared corners are merged by the reader
        assert_eq!(loaded.vertex_count(), 8);
        let b = loaded.bounding_box().unwrap();
        assert_relative_eq!(b.max, Point3f::new(1.0, 2.0, 3.0));
        assert!(loaded.normals.is_some());
    }

    #[test]
    fn test_ascii_stl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.stl");
        std::fs::write(
            &path,
            "solid tri\n  facet normal 0 0 1\n    outer loop\n      vertex 0 0 0\n      vertex 1 0 0\n      vertex 0 1 0\n    endloop\n  endfacet\nendsolid tri\n",
        )
        .unwrap();
        let mesh = StlReader::read_mesh(&path).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
    }
}
