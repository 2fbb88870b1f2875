//! Point types produced from point tables

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A point with an 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColoredPoint3f {
    pub position: Point3f,
    pub color: [u8; 3],
}

/// A point with a scalar attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarPoint3f {
    pub position: Point3f,
    pub scalar: f32,
}

/// A point with normal vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalPoint3f {
    pub position: Point3f,
    pub normal: Vector3f,
}

/// A point with normal vector and a scalar attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarNormalPoint3f {
    pub position: Point3f,
    pub normal: Vector3f,
    pub scalar: f32,
}

impl Default for ColoredPoint3f {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            color: [255, 255, 255],
        }
    }
}

impl Default for NormalPoint3f {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            normal: Vector3f::new(0.0, 0.0, 1.0),
        }
    }
}

impl From<ColoredPoint3f> for Point3f {
    fn from(point: ColoredPoint3f) -> Self {
        point.position
    }
}

impl From<ScalarPoint3f> for Point3f {
    fn from(point: ScalarPoint3f) -> Self {
        point.position
    }
}

impl From<NormalPoint3f> for Point3f {
    fn from(point: NormalPoint3f) -> Self {
        point.position
    }
}

impl From<ScalarNormalPoint3f> for Point3f {
    fn from(point: ScalarNormalPoint3f) -> Self {
        point.position
    }
}

/// Map a scalar to a grey level: 0 is black, 1 is white, values are clamped.
pub fn scalar_to_grey(scalar: f32) -> [u8; 3] {
    let level = if scalar.is_nan() { 0.0 } else { scalar.clamp(0.0, 1.0) };
    let v = (level * 255.0).round() as u8;
    [v, v, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_to_grey_endpoints() {
        assert_eq!(scalar_to_grey(0.0), [0, 0, 0]);
        assert_eq!(scalar_to_grey(1.0), [255, 255, 255]);
        assert_eq!(scalar_to_grey(0.5), [128, 128, 128]);
    }

    #[test]
    fn test_scalar_to_grey_clamps() {
        assert_eq!(scalar_to_grey(-3.0), [0, 0, 0]);
        assert_eq!(scalar_to_grey(7.5), [255, 255, 255]);
        assert_eq!(scalar_to_grey(f32::NAN), [0, 0, 0]);
    }
}
