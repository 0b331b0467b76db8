use crate::KMeansError;
use num::{Float, NumCast};
use rand::distributions::uniform::SampleUniform;
use std::{
    fmt::{Debug, Display, LowerExp},
    iter::Sum,
    ops::{AddAssign, SubAssign},
};

pub trait Primitive: AddAssign + Sum + SubAssign + Float + NumCast + SampleUniform
                + PartialOrd + Copy + Default + Display + Debug + Sync + Send + LowerExp + 'static {}
impl Primitive for f32 {}
impl Primitive for f64 {}


/// Ordered set of points with uniform dimensionality, stored in one row-major buffer.
///
/// Used for both the dataset handed to [`crate::KMeans`] and the centroids it produces.
///
/// ## Fields
/// - **dims**: Amount of dimensions of every point
/// - **values**: Point coordinates [row-major] = [<point0>,<point1>,<point2>,...]
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet<T: Primitive> {
    dims: usize,
    values: Vec<T>,
}
impl<T: Primitive> PointSet<T> {
    /// Create a point set from a row-major buffer.
    ///
    /// ## Arguments
    /// - **values**: Vector of points [row-major] = [<point0>,<point1>,<point2>,...]
    /// - **dims**: Amount of dimensions each point from the **values** vector has
    pub fn new(values: Vec<T>, dims: usize) -> Result<Self, KMeansError<T>> {
        if dims == 0 {
            return Err(KMeansError::DimensionMismatch("points need at least one dimension".into()));
        }
        if values.len() % dims != 0 {
            return Err(KMeansError::DimensionMismatch(format!(
                "buffer of {} values can not be split into points of {} dimensions", values.len(), dims)));
        }
        Ok(Self { dims, values })
    }

    /// Create a point set from individual rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, KMeansError<T>> {
        let dims = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if dims == 0 && !rows.is_empty() {
            return Err(KMeansError::DimensionMismatch("points need at least one dimension".into()));
        }
        let mut values = Vec::with_capacity(rows.len() * dims);
        for (idx, row) in rows.iter().map(AsRef::as_ref).enumerate() {
            if row.len() != dims {
                return Err(KMeansError::DimensionMismatch(format!(
                    "point {} has {} dimensions, expected {}", idx, row.len(), dims)));
            }
            values.extend_from_slice(row);
        }
        Ok(Self { dims, values })
    }

    pub(crate) fn zeros(len: usize, dims: usize) -> Self {
        Self { dims, values: vec![T::zero(); len * dims] }
    }

    pub fn len(&self) -> usize {
        if self.dims == 0 { 0 } else { self.values.len() / self.dims }
    }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }
    pub fn dims(&self) -> usize { self.dims }

    /// Coordinates of the point at **idx**.
    ///
    /// ## Panics
    /// If **idx** is out of bounds.
    pub fn point(&self, idx: usize) -> &[T] {
        &self.values[idx * self.dims..(idx + 1) * self.dims]
    }
    pub(crate) fn point_mut(&mut self, idx: usize) -> &mut [T] {
        &mut self.values[idx * self.dims..(idx + 1) * self.dims]
    }

    pub fn iter(&self) -> std::slice::ChunksExact<'_, T> {
        self.values.chunks_exact(self.dims.max(1))
    }
    pub fn as_slice(&self) -> &[T] { &self.values }
    pub fn into_vec(self) -> Vec<T> { self.values }
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter().map(|p| p.to_vec()).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_flattens_row_major() {
        let set = PointSet::from_rows(&[vec![1.0f64, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.dims(), 2);
        assert_eq!(set.point(1), &[3.0, 4.0]);
        assert_eq!(set.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(set.to_rows()[2], vec![5.0, 6.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let res = PointSet::from_rows(&[vec![1.0f32, 2.0], vec![3.0]]);
        assert!(matches!(res, Err(KMeansError::DimensionMismatch(_))));
    }

    #[test]
    fn buffer_must_split_into_whole_points() {
        assert!(matches!(PointSet::new(vec![1.0f64, 2.0, 3.0], 2), Err(KMeansError::DimensionMismatch(_))));
        assert!(matches!(PointSet::new(vec![1.0f64], 0), Err(KMeansError::DimensionMismatch(_))));
        assert_eq!(PointSet::new(vec![1.0f64, 2.0, 3.0], 3).unwrap().len(), 1);
    }

    #[test]
    fn empty_sets() {
        let set = PointSet::<f64>::from_rows::<Vec<f64>>(&[]).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(PointSet::<f64>::new(vec![], 4).unwrap().is_empty());
    }
}
