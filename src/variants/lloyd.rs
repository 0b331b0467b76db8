use crate::abort_strategy::Progress;
use crate::{helpers, EmptyClusterPolicy, EuclideanDistance, KMeans, KMeansConfig, KMeansError, KMeansState, PointSet, Primitive};
use tracing::{debug, info, trace, warn};

pub(crate) struct Lloyd<T: Primitive> {
	_p: std::marker::PhantomData<T>
}
impl<T: Primitive> Lloyd<T> {
    /// Move clusters without samples according to the configured policy.
    /// Only [`EmptyClusterPolicy::ReseedFarthest`] touches the state; retained centroids are
    /// simply skipped when the means are calculated.
    fn handle_empty_clusters(state: &mut KMeansState<T>, policy: EmptyClusterPolicy) {
        for i in 0..state.k {
            if state.centroid_frequency[i] != 0 {
                continue;
            }
            if policy == EmptyClusterPolicy::RetainPrevious {
                trace!(cluster = i, "empty cluster retains its previous centroid");
                continue;
            }

            // Find the sample with the highest distance to its centroid, that is not alone in its cluster
            let candidate = state.centroid_distances.iter().cloned().enumerate()
                .filter(|&(sample_id, dist)| !dist.is_nan() && state.centroid_frequency[state.assignments[sample_id]] > 1)
                .fold(None, |best: Option<(usize, T)>, (sample_id, dist)| match best {
                    Some((_, best_dist)) if dist <= best_dist => best,
                    _ => Some((sample_id, dist)),
                });
            let Some((sample_id, _)) = candidate else {
                trace!(cluster = i, "no sample available for reseeding, retaining previous centroid");
                continue;
            };

            // Re-Assign found sample to centroid without any samples
            let prev_centroid_id = state.assignments[sample_id];
            state.centroid_frequency[prev_centroid_id] -= 1;
            state.centroid_frequency[i] += 1;
            state.assignments[sample_id] = i;
            // Centroid is moved into the chosen sample -> the sample's centroid distance is 0
            state.centroid_distances[sample_id] = T::zero();
            trace!(cluster = i, sample = sample_id, from = prev_centroid_id, "reseeded empty cluster");
        }
    }

    /// Calculate the new centroid set from the current cluster assignments.
    fn update_centroids(data: &KMeans<T>, state: &mut KMeansState<T>, policy: EmptyClusterPolicy) -> PointSet<T> {
        let used_centroids_cnt = data.update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);
        if used_centroids_cnt != state.k {
            debug!(empty = state.k - used_centroids_cnt, ?policy, "clusters without samples");
            Self::handle_empty_clusters(state, policy);
        }

        // Sum all samples in a cluster together into new_centroids
        let mut new_centroids = PointSet::zeros(state.k, data.sample_dims());
        data.samples.iter()
            .zip(state.assignments.iter().cloned())
            .for_each(|(s, centroid_id)| {
                new_centroids.point_mut(centroid_id).iter_mut()
                    .zip(s.iter().cloned())
                    .for_each(|(cv, sv)| *cv += sv);
            });

        // Divide sums by the cluster frequencies, keep empty clusters where they were
        for (ci, cfreq) in state.centroid_frequency.iter().cloned().enumerate() {
            if cfreq == 0 {
                new_centroids.point_mut(ci).copy_from_slice(state.centroids.point(ci));
                continue;
            }
            let cfreq: T = helpers::count_as(cfreq);
            new_centroids.point_mut(ci).iter_mut().for_each(|cv| *cv = *cv / cfreq);
        }
        new_centroids
    }

    /// Summed distance between corresponding centroids of two centroid sets.
    fn displacement(old: &PointSet<T>, new: &PointSet<T>) -> T {
        old.iter().zip(new.iter())
            .map(|(o, n)| EuclideanDistance::distance(o, n))
            .sum()
    }

    pub fn calculate<'a, F>(data: &KMeans<T>, k: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>, KMeansError<T>>
                where for<'c> F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<(), KMeansError<T>> {
        data.validate_k(k)?;
        config.abort_strategy.validate()?;

        let mut state = KMeansState::new(data.sample_cnt(), data.sample_dims(), k);

        // Initialize clusters and notify subscriber
        init(data, &mut state, config)?;
        (config.init_done)(&state);
        debug!(k, samples = data.sample_cnt(), dims = data.sample_dims(), "centroids initialized");
        let mut abort_strategy = config.abort_strategy.create_logic();

        loop {
            if (config.abort_requested)() {
                warn!(iterations = state.iterations, "k-means calculation cancelled");
                data.update_centroid_distances(&mut state);
                return Err(KMeansError::Cancelled { iterations: state.iterations, state: Box::new(state) });
            }

            data.update_cluster_assignments(&mut state)?;
            let new_centroids = Self::update_centroids(data, &mut state, config.empty_cluster_policy);
            let displacement = Self::displacement(&state.centroids, &new_centroids);
            state.centroids = new_centroids;
            state.displacement = displacement;
            state.iterations += 1;

            // Notify subscriber about finished iteration
            (config.iteration_done)(&state, state.iterations, displacement);
            debug!(iteration = state.iterations, %displacement, distsum = %state.distsum, "iteration done");

            match abort_strategy.next(displacement) {
                Progress::Continue => {}
                Progress::Converged => break,
                Progress::Exhausted => {
                    warn!(iterations = state.iterations, %displacement, "k-means did not converge");
                    data.update_centroid_distances(&mut state);
                    return Err(KMeansError::NonConvergence {
                        iterations: state.iterations, displacement, state: Box::new(state)
                    });
                }
            }
        }

        data.update_centroid_distances(&mut state);
        info!(iterations = state.iterations, distsum = %state.distsum, "k-means converged");
        Ok(state)
    }
}
