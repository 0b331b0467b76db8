mod euclideandistance;

pub use euclideandistance::EuclideanDistance;

use crate::{helpers, KMeansError, PointSet, Primitive};

/// Pairwise euclidean distances between two point sets.
///
/// For sets **a** (`Ma x D`) and **b** (`Mb x D`), entry `(i, j)` holds the distance between
/// `a[i]` and `b[j]`. Stored row-major, one row per point of **a**.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix<T: Primitive> {
    rows: usize,
    cols: usize,
    values: Vec<T>,
}
impl<T: Primitive> DistanceMatrix<T> {
    /// Compute the distances between all points of **a** and all points of **b**.
    ///
    /// ## Errors
    /// [`KMeansError::DimensionMismatch`] if the sets have differing dimensions or either one is empty.
    pub fn compute(a: &PointSet<T>, b: &PointSet<T>) -> Result<Self, KMeansError<T>> {
        if a.is_empty() || b.is_empty() {
            return Err(KMeansError::DimensionMismatch(format!(
                "distance between empty point sets ({} x {})", a.len(), b.len())));
        }
        if a.dims() != b.dims() {
            return Err(KMeansError::DimensionMismatch(format!(
                "points of {} dimensions can not be compared with points of {} dimensions", a.dims(), b.dims())));
        }

        let mut values = Vec::with_capacity(a.len() * b.len());
        for pa in a.iter() {
            values.extend(b.iter().map(|pb| EuclideanDistance::distance(pa, pb)));
        }
        Ok(Self { rows: a.len(), cols: b.len(), values })
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.values[i * self.cols + j]
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    /// Column index of the smallest entry in row **i**. Ties resolve to the lowest index.
    pub fn argmin_row(&self, i: usize) -> usize {
        helpers::argmin(self.row(i))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn random_set<T: Primitive>(rnd: &mut StdRng, len: usize, dims: usize) -> PointSet<T> {
        let values = (0..len * dims).map(|_| rnd.gen_range(T::zero(), T::from(50.0).unwrap())).collect();
        PointSet::new(values, dims).unwrap()
    }

    #[test] fn symmetry_under_swap_f32() { symmetry_under_swap::<f32>(); }
    #[test] fn symmetry_under_swap_f64() { symmetry_under_swap::<f64>(); }

    fn symmetry_under_swap<T: Primitive>() {
        let mut rnd = StdRng::seed_from_u64(1337);
        let a = random_set::<T>(&mut rnd, 40, 7);
        let b = random_set::<T>(&mut rnd, 13, 7);

        let ab = DistanceMatrix::compute(&a, &b).unwrap();
        let ba = DistanceMatrix::compute(&b, &a).unwrap();
        assert_eq!((ab.rows(), ab.cols()), (40, 13));
        assert_eq!((ba.rows(), ba.cols()), (13, 40));
        for i in 0..a.len() {
            for j in 0..b.len() {
                assert_eq!(ab.get(i, j), ba.get(j, i));
            }
        }
    }

    #[test]
    fn self_distance_is_zero() {
        let mut rnd = StdRng::seed_from_u64(7);
        let a = random_set::<f64>(&mut rnd, 25, 300);
        let aa = DistanceMatrix::compute(&a, &a).unwrap();
        for i in 0..a.len() {
            assert_eq!(aa.get(i, i), 0.0);
        }
    }

    #[test]
    fn known_distances() {
        let a = PointSet::from_rows(&[[0.0f64, 0.0], [10.0, 0.0]]).unwrap();
        let b = PointSet::from_rows(&[[3.0f64, 4.0], [10.0, 0.0], [0.0, 0.0]]).unwrap();
        let dm = DistanceMatrix::compute(&a, &b).unwrap();
        assert_eq!(dm.row(0), &[5.0, 10.0, 0.0]);
        assert_approx_eq!(dm.get(1, 0), 65.0f64.sqrt(), 1e-12);
        assert_eq!(dm.get(1, 1), 0.0);
        assert_eq!(dm.argmin_row(0), 2);
        assert_eq!(dm.argmin_row(1), 1);
    }

    #[test]
    fn argmin_ties_resolve_to_lowest_index() {
        let a = PointSet::from_rows(&[[5.0f64, 0.0]]).unwrap();
        let b = PointSet::from_rows(&[[9.0f64, 0.0], [0.0, 0.0], [10.0, 0.0], [1.0, 0.0]]).unwrap();
        let dm = DistanceMatrix::compute(&a, &b).unwrap();
        // 4, 5, 5, 4 -> first minimum wins
        assert_eq!(dm.argmin_row(0), 0);
    }

    #[test]
    fn mismatching_inputs() {
        let a = PointSet::from_rows(&[[0.0f64, 0.0]]).unwrap();
        let b = PointSet::from_rows(&[[0.0f64, 0.0, 0.0]]).unwrap();
        let empty = PointSet::<f64>::new(vec![], 2).unwrap();
        assert!(matches!(DistanceMatrix::compute(&a, &b), Err(KMeansError::DimensionMismatch(_))));
        assert!(matches!(DistanceMatrix::compute(&a, &empty), Err(KMeansError::DimensionMismatch(_))));
        assert!(matches!(DistanceMatrix::compute(&empty, &a), Err(KMeansError::DimensionMismatch(_))));
    }
}
