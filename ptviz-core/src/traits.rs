//! Bounding volumes for drawable data

use crate::{mesh::TriangleMesh, point::*, point_cloud::PointCloud};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point3f,
    pub max: Point3f,
}

impl Bounds {
    /// Bounds of a set of points, or `None` when there are none
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3f>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(
            Self {
                min: first,
                max: first,
            },
            |b, p| b.include(p),
        ))
    }

    /// Grow to contain `point`
    pub fn include(self, point: &Point3f) -> Self {
        Self {
            min: self.min.inf(point),
            max: self.max.sup(point),
        }
    }

    pub fn union(self, other: &Bounds) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).norm()
    }
}

/// Types with a spatial extent
pub trait Drawable {
    fn bounding_box(&self) -> Option<Bounds>;

    fn center(&self) -> Option<Point3f> {
        self.bounding_box().map(|b| b.center())
    }
}

impl<T> Drawable for PointCloud<T>
where
    T: Copy,
    Point3f: From<T>,
{
    fn bounding_box(&self) -> Option<Bounds> {
        Bounds::from_points(&self.positions())
    }
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> Option<Bounds> {
        Bounds::from_points(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cloud_has_no_bounds() {
        let cloud: PointCloud<Point3f> = PointCloud::default();
        assert!(cloud.bounding_box().is_none());
    }

    #[test]
    fn test_cloud_bounds_and_center() {
        let cloud = PointCloud::from_points(vec![
            Point3f::new(-1.0, 2.0, 0.0),
            Point3f::new(3.0, -2.0, 4.0),
            Point3f::new(0.0, 0.0, 1.0),
        ]);
        let b = cloud.bounding_box().unwrap();
        assert_eq!(b.min, Point3f::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Point3f::new(3.0, 2.0, 4.0));
        assert_eq!(cloud.center().unwrap(), Point3f::new(1.0, 0.0, 2.0));
    }
}
