//! Fixed-width numeric point tables
//!
//! A [`PointTable`] stores rows of `f64` values in row-major order. The column
//! count decides what the rows mean when a plotting call infers it; the
//! [`TableLayout`] tag lets callers state it explicitly instead.

use crate::error::{Error, Result};
use crate::point::*;
use crate::point_cloud::PointCloud;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row-major table of points and per-point attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPointTable")]
pub struct PointTable {
    columns: usize,
    values: Vec<f64>,
}

/// Unchecked serialized form; deserialization goes through [`PointTable::new`]
#[derive(Deserialize)]
struct RawPointTable {
    columns: usize,
    values: Vec<f64>,
}

impl TryFrom<RawPointTable> for PointTable {
    type Error = Error;

    fn try_from(raw: RawPointTable) -> Result<Self> {
        PointTable::new(raw.columns, raw.values)
    }
}

/// Explicit meaning of a table's columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableLayout {
    /// (x, y, z)
    PlainXyz,
    /// (x, y, z, scalar)
    XyzScalar,
    /// (x, y, z, r, g, b) with colors in 0..255
    XyzRgb,
    /// (x, y, z, nx, ny, nz)
    XyzNormal,
    /// (x, y, z, nx, ny, nz, scalar)
    XyzNormalScalar,
}

impl TableLayout {
    /// Number of columns a table with this layout must have
    pub fn columns(self) -> usize {
        match self {
            TableLayout::PlainXyz => 3,
            TableLayout::XyzScalar => 4,
            TableLayout::XyzRgb | TableLayout::XyzNormal => 6,
            TableLayout::XyzNormalScalar => 7,
        }
    }

    /// Fail with `InvalidShape` unless the table width matches this layout
    pub fn check(self, table: &PointTable) -> Result<()> {
        if table.columns() == self.columns() {
            Ok(())
        } else {
            Err(Error::invalid_shape(
                format!("{} columns for {}", self.columns(), self),
                table.columns(),
            ))
        }
    }
}

impl fmt::Display for TableLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableLayout::PlainXyz => "xyz",
            TableLayout::XyzScalar => "xyz+scalar",
            TableLayout::XyzRgb => "xyz+rgb",
            TableLayout::XyzNormal => "xyz+normal",
            TableLayout::XyzNormalScalar => "xyz+normal+scalar",
        };
        f.write_str(name)
    }
}

impl PointTable {
    /// Create a table from row-major values
    pub fn new(columns: usize, values: Vec<f64>) -> Result<Self> {
        if columns == 0 {
            return Err(Error::invalid_shape("at least one column", 0));
        }
        if values.len() % columns != 0 {
            return Err(Error::InvalidData(format!(
                "{} values cannot be split into rows of {} columns",
                values.len(),
                columns
            )));
        }
        Ok(Self { columns, values })
    }

    /// Create a table from fixed-size rows
    pub fn from_rows<const N: usize>(rows: &[[f64; N]]) -> Result<Self> {
        Self::new(N, rows.iter().flatten().copied().collect())
    }

    /// Create a table from variable-length rows, which must all have the same width
    pub fn from_row_vecs(rows: &[Vec<f64>]) -> Result<Self> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns) {
            return Err(Error::InvalidData(format!(
                "row {} has {} values, expected {}",
                index,
                row.len(),
                columns
            )));
        }
        Self::new(columns, rows.concat())
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows (points)
    pub fn rows(&self) -> usize {
        self.values.len() / self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Borrow one row
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.columns)?;
        let end = start.checked_add(self.columns)?;
        self.values.get(start..end)
    }

    /// Iterate over the rows
    pub fn iter_rows(&self) -> std::slice::ChunksExact<'_, f64> {
        self.values.chunks_exact(self.columns)
    }

    /// Append the columns of `other` to the right of this table's columns
    pub fn hstack(&self, other: &PointTable) -> Result<PointTable> {
        if self.rows() != other.rows() {
            return Err(Error::InvalidData(format!(
                "cannot stack tables with {} and {} rows",
                self.rows(),
                other.rows()
            )));
        }
        let values = self
            .iter_rows()
            .zip(other.iter_rows())
            .flat_map(|(a, b)| a.iter().chain(b.iter()).copied())
            .collect();
        PointTable::new(self.columns + other.columns, values)
    }

    /// Positions from the first three columns; requires at least three columns
    pub fn to_points(&self) -> Result<PointCloud<Point3f>> {
        if self.columns < 3 {
            return Err(Error::invalid_shape("at least 3 columns", self.columns));
        }
        Ok(self.iter_rows().map(position).collect())
    }

    pub fn to_scalar_points(&self) -> Result<PointCloud<ScalarPoint3f>> {
        TableLayout::XyzScalar.check(self)?;
        Ok(self
            .iter_rows()
            .map(|row| ScalarPoint3f {
                position: position(row),
                scalar: row[3] as f32,
            })
            .collect())
    }

    /// Colored points; color columns are taken as 0..255 values without rescaling
    pub fn to_colored_points(&self) -> Result<PointCloud<ColoredPoint3f>> {
        TableLayout::XyzRgb.check(self)?;
        Ok(self
            .iter_rows()
            .map(|row| ColoredPoint3f {
                position: position(row),
                color: [channel(row[3]), channel(row[4]), channel(row[5])],
            })
            .collect())
    }

    pub fn to_normal_points(&self) -> Result<PointCloud<NormalPoint3f>> {
        TableLayout::XyzNormal.check(self)?;
        Ok(self
            .iter_rows()
            .map(|row| NormalPoint3f {
                position: position(row),
                normal: normal(row),
            })
            .collect())
    }

    pub fn to_scalar_normal_points(&self) -> Result<PointCloud<ScalarNormalPoint3f>> {
        TableLayout::XyzNormalScalar.check(self)?;
        Ok(self
            .iter_rows()
            .map(|row| ScalarNormalPoint3f {
                position: position(row),
                normal: normal(row),
                scalar: row[6] as f32,
            })
            .collect())
    }
}

fn position(row: &[f64]) -> Point3f {
    Point3f::new(row[0] as f32, row[1] as f32, row[2] as f32)
}

fn normal(row: &[f64]) -> Vector3f {
    Vector3f::new(row[3] as f32, row[4] as f32, row[5] as f32)
}

fn channel(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.round().clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_ragged_values() {
        assert!(matches!(
            PointTable::new(3, vec![1.0, 2.0, 3.0, 4.0]),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            PointTable::new(0, vec![]),
            Err(Error::InvalidShape { found: 0, .. })
        ));
    }

    #[test]
    fn test_rows_and_columns() {
        let table = PointTable::from_rows(&[[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]]).unwrap();
        assert_eq!(table.columns(), 3);
        assert_eq!(table.rows(), 2);
        assert_eq!(table.row(1), Some(&[3.0, 4.0, 5.0][..]));
        assert_eq!(table.row(2), None);
        assert_eq!(table.row(usize::MAX / 3), None);
        assert_eq!(table.row(usize::MAX), None);
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let ragged = serde_json::from_str::<PointTable>(r#"{"columns":3,"values":[1,2,3,4]}"#);
        assert!(ragged.is_err());
        let no_columns = serde_json::from_str::<PointTable>(r#"{"columns":0,"values":[]}"#);
        assert!(no_columns.is_err());

        let table = PointTable::from_rows(&[[1.0, 2.0, 3.0]]).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(serde_json::from_str::<PointTable>(&json).unwrap(), table);
    }

    #[test]
    fn test_from_row_vecs_rejects_mixed_widths() {
        let rows = vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0]];
        assert!(PointTable::from_row_vecs(&rows).is_err());
    }

    #[test]
    fn test_colors_are_used_without_rescaling() {
        let table = PointTable::from_rows(&[[0.0, 0.0, 0.0, 12.0, 200.4, 255.0]]).unwrap();
        let cloud = table.to_colored_points().unwrap();
        assert_eq!(cloud.points[0].color, [12, 200, 255]);

        let out_of_range = PointTable::from_rows(&[[0.0, 0.0, 0.0, -4.0, 0.7, 900.0]]).unwrap();
        assert_eq!(out_of_range.to_colored_points().unwrap().points[0].color, [0, 1, 255]);
    }

    #[test]
    fn test_layout_check() {
        let table = PointTable::from_rows(&[[0.0; 6]]).unwrap();
        assert!(TableLayout::XyzRgb.check(&table).is_ok());
        assert!(TableLayout::XyzNormal.check(&table).is_ok());
        assert!(matches!(
            TableLayout::XyzNormalScalar.check(&table),
            Err(Error::InvalidShape { found: 6, .. })
        ));
    }

    #[test]
    fn test_hstack() {
        let xyz = PointTable::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let rgb = PointTable::from_rows(&[[10.0, 20.0, 30.0], [40.0, 50.0, 60.0]]).unwrap();
        let stacked = xyz.hstack(&rgb).unwrap();
        assert_eq!(stacked.columns(), 6);
        assert_eq!(stacked.row(1), Some(&[4.0, 5.0, 6.0, 40.0, 50.0, 60.0][..]));

        let short = PointTable::from_rows(&[[0.0, 0.0, 0.0]]).unwrap();
        assert!(xyz.hstack(&short).is_err());
    }

    #[test]
    fn test_to_points_needs_three_columns() {
        let table = PointTable::from_rows(&[[1.0, 2.0]]).unwrap();
        assert!(matches!(
            table.to_points(),
            Err(Error::InvalidShape { found: 2, .. })
        ));
    }
}
