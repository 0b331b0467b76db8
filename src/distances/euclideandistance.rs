use crate::Primitive;

/// Euclidean metric over raw coordinate slices.
pub struct EuclideanDistance;

impl EuclideanDistance {
    /// Squared euclidean distance between two points of equal dimension.
    #[inline(always)]
    pub fn squared<T: Primitive>(a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        a.iter().cloned()
            .zip(b.iter().cloned())
            .map(|(av, bv)| av - bv)    // <a> - <b>
            .map(|v| v * v)             // <vec_components> ^2
            .sum()
    }

    #[inline(always)]
    pub fn distance<T: Primitive>(a: &[T], b: &[T]) -> T {
        Self::squared(a, b).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pythagorean_triple() {
        assert_eq!(EuclideanDistance::distance(&[0.0f64, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(EuclideanDistance::squared(&[1.0f32, 1.0, 1.0], &[2.0, 2.0, 2.0]), 3.0);
    }

    #[test]
    fn high_dimensional_distance() {
        // 400 dimensions, each differing by 0.5 -> sqrt(400 * 0.25) = 10
        let a = vec![1.0f64; 400];
        let b = vec![1.5f64; 400];
        assert_approx_eq!(EuclideanDistance::distance(&a, &b), 10.0, 1e-12);
        assert_eq!(EuclideanDistance::distance(&a, &a), 0.0);
    }
}
