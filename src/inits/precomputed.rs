use crate::{KMeans, KMeansConfig, KMeansError, KMeansState, PointSet, Primitive};

#[inline(always)]
pub fn calculate<T: Primitive>(
    kmean: &KMeans<T>, state: &mut KMeansState<T>, _config: &KMeansConfig<'_, T>, computed: PointSet<T>,
) -> Result<(), KMeansError<T>> {
    if computed.len() != state.k {
        return Err(KMeansError::InvalidParameter(format!(
            "initialized with {} centroids, but k is {}", computed.len(), state.k)));
    }
    if computed.dims() != kmean.sample_dims() {
        return Err(KMeansError::DimensionMismatch(format!(
            "centroids have {} dimensions, samples have {}", computed.dims(), kmean.sample_dims())));
    }
    if computed.as_slice().iter().any(|v| !v.is_finite()) {
        return Err(KMeansError::InvalidParameter("initial centroids contain non-finite coordinates".into()));
    }
    computed.iter().enumerate().for_each(|(ci, c)| {
        state.set_centroid_from_iter(ci, c.iter().cloned());
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_with_precomputed_centroids() {
        let samples = vec![0.0, 1.0, 10.0, 11.0, 20.0, 21.0];
        let centroids = PointSet::new(vec![0.0, 10.0], 1).unwrap();
        let (sample_cnt, sample_dims) = (samples.len(), 1);

        let kmean: KMeans<f32> = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
        let result = kmean.kmeans_lloyd(2, KMeans::init_precomputed(centroids), &KMeansConfig::default()).unwrap();

        assert_eq!(result.centroids.into_vec(), vec![0.5, 15.5]);
    }

    #[test]
    fn precomputed_centroids_must_match() {
        let kmean: KMeans<f64> = KMeans::new(vec![0.0, 1.0, 2.0, 3.0], 2, 2).unwrap();
        let conf = KMeansConfig::default();

        let too_many = PointSet::new(vec![0.0, 1.0, 2.0, 3.0], 2).unwrap();
        assert!(matches!(kmean.kmeans_lloyd(1, KMeans::init_precomputed(too_many), &conf),
            Err(KMeansError::InvalidParameter(_))));

        let wrong_dims = PointSet::new(vec![0.0, 1.0, 2.0], 3).unwrap();
        assert!(matches!(kmean.kmeans_lloyd(1, KMeans::init_precomputed(wrong_dims), &conf),
            Err(KMeansError::DimensionMismatch(_))));

        let with_nan = PointSet::new(vec![0.0, f64::NAN], 2).unwrap();
        assert!(matches!(kmean.kmeans_lloyd(1, KMeans::init_precomputed(with_nan), &conf),
            Err(KMeansError::InvalidParameter(_))));
    }
}
