//! Model transforms applied to actors

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// An affine transformation stored as a homogeneous matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Per-axis scaling about the origin
    pub fn scaling(scale: Vector3<f32>) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        self.matrix.transform_point(point)
    }

    /// Transform a surface normal with the inverse transpose and renormalize.
    ///
    /// Singular transforms (a zero scale axis) fall back to the linear part.
    pub fn transform_normal(&self, normal: &Vector3<f32>) -> Vector3<f32> {
        let linear: Matrix3<f32> = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let n = match linear.try_inverse() {
            Some(inv) => inv.transpose() * normal,
            None => linear * normal,
        };
        n.try_normalize(f32::EPSILON).unwrap_or(*normal)
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scaling_is_about_origin() {
        let t = Transform3D::scaling(Vector3::new(2.0, 3.0, 4.0));
        let p = t.transform_point(&Point3::new(1.0, 1.0, -1.0));
        assert_relative_eq!(p, Point3::new(2.0, 3.0, -4.0));
        assert_relative_eq!(Transform3D::default().transform_point(&p), p);
    }

    #[test]
    fn test_normal_under_nonuniform_scale() {
        let t = Transform3D::scaling(Vector3::new(1.0, 2.0, 1.0));
        let n = t.transform_normal(&Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(n, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-6);

        let flat = Transform3D::scaling(Vector3::new(10.0, 10.0, 0.0));
        let n = flat.transform_normal(&Vector3::new(0.0, 0.0, 1.0));
        assert!(n.norm() > 0.0);
    }
}
