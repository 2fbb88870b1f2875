//! Point cloud container produced by table conversions

use crate::point::Point3f;
use serde::{Deserialize, Serialize};

/// Points of one kind, in table row order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointCloud<T> {
    pub points: Vec<T>,
}

impl<T> PointCloud<T> {
    pub fn from_points(points: Vec<T>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.points.iter()
    }
}

impl<T> FromIterator<T> for PointCloud<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}

impl<T: Copy> PointCloud<T>
where
    Point3f: From<T>,
{
    /// Positions of all points, dropping any attributes
    pub fn positions(&self) -> Vec<Point3f> {
        self.points.iter().map(|&p| Point3f::from(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::ColoredPoint3f;

    #[test]
    fn test_positions_drop_attributes() {
        let cloud: PointCloud<ColoredPoint3f> = (0..3)
            .map(|i| ColoredPoint3f {
                position: Point3f::new(i as f32, 0.0, 0.0),
                color: [i as u8, 0, 0],
            })
            .collect();
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.positions()[2], Point3f::new(2.0, 0.0, 0.0));
    }
}
