//! PLY format support

use crate::{MeshReader, MeshWriter};
use log::debug;
use ply_rs::{
    parser::Parser,
    ply::{
        Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
        ScalarType,
    },
    writer::Writer,
};
use ptviz_core::{Error, Point3f, Result, TriangleMesh, Vector3f};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub struct PlyReader;
pub struct PlyWriter;

impl MeshReader for PlyReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let ply = parser
            .read_ply(&mut reader)
            .map_err(|e| Error::InvalidData(format!("malformed PLY file {}: {}", path.display(), e)))?;

        let empty = Vec::new();
        let vertex_elements = ply.payload.get("vertex").unwrap_or(&empty);

        let mut vertices = Vec::with_capacity(vertex_elements.len());
        for vertex in vertex_elements {
            vertices.push(Point3f::new(
                extract_property_value(vertex, "x")?,
                extract_property_value(vertex, "y")?,
                extract_property_value(vertex, "z")?,
            ));
        }

        // Faces are fan-triangulated
        let mut faces = Vec::new();
        if let Some(face_elements) = ply.payload.get("face") {
            for face in face_elements {
                let indices = extract_face_indices(face)?;
                if let Some(&bad) = indices.iter().find(|&&i| i >= vertices.len()) {
                    return Err(Error::InvalidData(format!(
                        "face references vertex {} but only {} vertices exist",
                        bad,
                        vertices.len()
                    )));
                }
                for k in 1..indices.len().saturating_sub(1) {
                    faces.push([indices[0], indices[k], indices[k + 1]]);
                }
            }
        }

        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
        if let Some(normals) = extract_normals(vertex_elements) {
            mesh.set_normals(normals);
        } else if !mesh.faces.is_empty() {
            mesh.compute_vertex_normals();
        }
        if let Some(colors) = extract_colors(vertex_elements) {
            mesh.set_colors(colors);
        }

        debug!(
            "read PLY {}: {} vertices, {} triangles",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

impl MeshWriter for PlyWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let mut ply = Ply::<DefaultElement>::new();
        ply.header.encoding = Encoding::Ascii;

        let mut vertex_element = ElementDef::new("vertex".to_string());
        vertex_element.count = mesh.vertices.len();
        let mut names = vec!["x", "y", "z"];
        if mesh.normals.is_some() {
            names.extend(["nx", "ny", "nz"]);
        }
        for name in names {
            vertex_element.properties.add(PropertyDef::new(
                name.to_string(),
                PropertyType::Scalar(ScalarType::Float),
            ));
        }
        if mesh.colors.is_some() {
            for name in ["red", "green", "blue"] {
                vertex_element.properties.add(PropertyDef::new(
                    name.to_string(),
                    PropertyType::Scalar(ScalarType::UChar),
                ));
            }
        }
        ply.header.elements.add(vertex_element);

        let mut face_element = ElementDef::new("face".to_string());
        face_element.count = mesh.faces.len();
        face_element.properties.add(PropertyDef::new(
            "vertex_indices".to_string(),
            PropertyType::List(ScalarType::UChar, ScalarType::Int),
        ));
        ply.header.elements.add(face_element);

        let mut vertices = Vec::with_capacity(mesh.vertices.len());
        for (i, v) in mesh.vertices.iter().enumerate() {
            let mut element = DefaultElement::new();
            element.insert("x".to_string(), Property::Float(v.x));
            element.insert("y".to_string(), Property::Float(v.y));
            element.insert("z".to_string(), Property::Float(v.z));
            if let Some(n) = mesh.normals.as_ref().and_then(|n| n.get(i)) {
                element.insert("nx".to_string(), Property::Float(n.x));
                element.insert("ny".to_string(), Property::Float(n.y));
                element.insert("nz".to_string(), Property::Float(n.z));
            }
            if let Some(c) = mesh.colors.as_ref().and_then(|c| c.get(i)) {
                element.insert("red".to_string(), Property::UChar(c[0]));
                element.insert("green".to_string(), Property::UChar(c[1]));
                element.insert("blue".to_string(), Property::UChar(c[2]));
            }
            vertices.push(element);
        }
        ply.payload.insert("vertex".to_string(), vertices);

        let mut faces = Vec::with_capacity(mesh.faces.len());
        for face in &mesh.faces {
            let mut element = DefaultElement::new();
            let indices = face.iter().map(|&i| i as i32).collect();
            element.insert("vertex_indices".to_string(), Property::ListInt(indices));
            faces.push(element);
        }
        ply.payload.insert("face".to_string(), faces);

        Writer::new().write_ply(&mut writer, &mut ply)?;
        Ok(())
    }
}

/// Extract a scalar property as f32 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f32> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val),
        Some(Property::Double(val)) => Ok(*val as f32),
        Some(Property::Char(val)) => Ok(*val as f32),
        Some(Property::UChar(val)) => Ok(*val as f32),
        Some(Property::Short(val)) => Ok(*val as f32),
        Some(Property::UShort(val)) => Ok(*val as f32),
        Some(Property::Int(val)) => Ok(*val as f32),
        Some(Property::UInt(val)) => Ok(*val as f32),
        _ => Err(Error::InvalidData(format!(
            "Property '{}' not found or invalid type",
            name
        ))),
    }
}

fn extract_color_channel(element: &DefaultElement, names: &[&str]) -> Option<u8> {
    names.iter().find_map(|name| match element.get(*name) {
        Some(Property::UChar(val)) => Some(*val),
        Some(Property::Float(val)) => Some((val.clamp(0.0, 1.0) * 255.0).round() as u8),
        Some(Property::Double(val)) => Some((val.clamp(0.0, 1.0) * 255.0).round() as u8),
        _ => None,
    })
}

fn extract_normals(vertices: &[DefaultElement]) -> Option<Vec<Vector3f>> {
    if vertices.is_empty() {
        return None;
    }
    vertices
        .iter()
        .map(|v| {
            Some(Vector3f::new(
                extract_property_value(v, "nx").ok()?,
                extract_property_value(v, "ny").ok()?,
                extract_property_value(v, "nz").ok()?,
            ))
        })
        .collect()
}

fn extract_colors(vertices: &[DefaultElement]) -> Option<Vec<[u8; 3]>> {
    if vertices.is_empty() {
        return None;
    }
    vertices
        .iter()
        .map(|v| {
            Some([
                extract_color_channel(v, &["red", "diffuse_red", "r"])?,
                extract_color_channel(v, &["green", "diffuse_green", "g"])?,
                extract_color_channel(v, &["blue", "diffuse_blue", "b"])?,
            ])
        })
        .collect()
}

/// Extract face indices from a PLY face element
fn extract_face_indices(element: &DefaultElement) -> Result<Vec<usize>> {
    let indices: Option<Vec<i64>> = match element
        .get("vertex_indices")
        .or_else(|| element.get("vertex_index"))
    {
        Some(Property::ListInt(v)) => Some(v.iter().map(|&i| i as i64).collect()),
        Some(Property::ListUInt(v)) => Some(v.iter().map(|&i| i as i64).collect()),
        Some(Property::ListShort(v)) => Some(v.iter().map(|&i| i as i64).collect()),
        Some(Property::ListUShort(v)) => Some(v.iter().map(|&i| i as i64).collect()),
        Some(Property::ListChar(v)) => Some(v.iter().map(|&i| i as i64).collect()),
        Some(Property::ListUChar(v)) => Some(v.iter().map(|&i| i as i64).collect()),
        _ => None,
    };
    let indices = indices.ok_or_else(|| Error::InvalidData("Face indices not found".to_string()))?;
    indices
        .into_iter()
        .map(|i| {
            usize::try_from(i)
                .map_err(|_| Error::InvalidData(format!("negative face index {}", i)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn write_fixture(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.ply");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_ascii_quad_is_fan_triangulated() {
        let (_dir, path) = write_fixture(
            "ply\nformat ascii 1.0\nelement vertex 4\nproperty float x\nproperty float y\nproperty float z\n\
             property uchar red\nproperty uchar green\nproperty uchar blue\n\
             element face 1\nproperty list uchar int vertex_indices\nend_header\n\
             0 0 0 255 0 0\n1 0 0 0 255 0\n1 1 0 0 0 255\n0 1 0 255 255 255\n4 0 1 2 3\n",
        );
        let mesh = PlyReader::read_mesh(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.colors.as_ref().unwrap()[1], [0, 255, 0]);
        // No normals in the file, so they are derived from the faces
        assert_relative_eq!(mesh.normals.unwrap()[2], Vector3f::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_out_of_range_face_index() {
        let (_dir, path) = write_fixture(
            "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\n\
             element face 1\nproperty list uchar int vertex_indices\nend_header\n\
             0 0 0\n1 0 0\n0 1 0\n3 0 1 7\n",
        );
        assert!(matches!(PlyReader::read_mesh(&path), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_garbage_is_invalid_data() {
        let (_dir, path) = write_fixture("this is not a ply file\n");
        assert!(matches!(PlyReader::read_mesh(&path), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_write_then_read_keeps_normals_and_colors() {
        let mut mesh = ptviz_core::primitives::generate_plane();
        mesh.set_colors(vec![[10, 20, 30]; 4]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plane.ply");

        PlyWriter::write_mesh(&mesh, &path).unwrap();
        let loaded = PlyReader::read_mesh(&path).unwrap();

        assert_eq!(loaded.faces, mesh.faces);
        assert_eq!(loaded.colors, mesh.colors);
        for (a, b) in loaded.vertices.iter().zip(&mesh.vertices) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
        assert_eq!(loaded.normals, mesh.normals);
    }
}
