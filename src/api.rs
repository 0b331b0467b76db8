use crate::{distances::DistanceMatrix, memory::*, AbortStrategy, EuclideanDistance, KMeansError};
use std::cell::RefCell;
use rand::prelude::*;

pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>);
pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>, usize, T);
pub type AbortRequestedCallbackFn<'a> = &'a dyn Fn() -> bool;

/// Specifies how a centroid is updated, when no sample was assigned to it during an iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// Keep the centroid where it was in the previous iteration.
    #[default]
    RetainPrevious,
    /// Move the centroid onto the sample that is farthest away from its own centroid, taking only
    /// samples into account that are not alone in their cluster (ties resolve to the lowest sample index).
    /// The chosen sample is moved into the previously empty cluster.
    ReseedFarthest,
}

/// This is a structure holding various configuration options for the a k-means calculations, such as
/// the random number generator to use, the abort-strategy, or a couple of callbacks, that can be set to
/// get status information from (or abort) a running k-means calculation.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Callback that is called, when the initialization phase finished
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the initialization
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the iteration
    /// - **iteration_id**: Number of the current iteration
    /// - **displacement**: Summed distance all centroids moved during this iteration
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Callback that is polled before each iteration. Returning **true** cancels the calculation.
    pub(crate) abort_requested: AbortRequestedCallbackFn<'a>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// The abort-strategy to use for the running calculation
    pub(crate) abort_strategy: AbortStrategy<T>,
    /// Handling of clusters without samples
    pub(crate) empty_cluster_policy: EmptyClusterPolicy,
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_,_,_| {},
            abort_requested: &|| false,
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            abort_strategy: AbortStrategy::default(),
            empty_cluster_policy: EmptyClusterPolicy::default(),
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("abort_strategy", &self.abort_strategy)
            .field("empty_cluster_policy", &self.empty_cluster_policy)
            .finish_non_exhaustive()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration during a running k-means calculation.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set a callback that is polled between iterations. Once it returns **true**, the calculation stops
    /// with [`KMeansError::Cancelled`].
    pub fn abort_requested(mut self, abort_requested: AbortRequestedCallbackFn<'a>) -> Self {
        self.config.abort_requested = abort_requested; self
    }
    /// Set the random number generator that should be used in the k-means calculation.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Shorthand for [`KMeansConfigBuilder::random_generator`] with a seeded [`StdRng`].
    pub fn seed(self, seed: u64) -> Self {
        self.random_generator(StdRng::seed_from_u64(seed))
    }
    /// Set the abort-strategy to use during a running k-means calculation. For more information,
    /// see documentation of [`AbortStrategy`].
    /// ## Default
    /// [`AbortStrategy`] `{ tolerance: 0, max_iter: 300 }`
    pub fn abort_strategy(mut self, abort_strategy: AbortStrategy<T>) -> Self {
        self.config.abort_strategy = abort_strategy; self
    }
    /// Set the convergence tolerance for the summed centroid displacement per iteration.
    pub fn tolerance(mut self, tolerance: T) -> Self {
        self.config.abort_strategy.tolerance = tolerance; self
    }
    /// Set the maximum amount of iterations.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.config.abort_strategy.max_iter = max_iter; self
    }
    /// Set the handling of clusters that lost all their samples. See [`EmptyClusterPolicy`].
    pub fn empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.config.empty_cluster_policy = policy; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}


/// This is the internally used data-structure, storing the current state during calculation, as
/// well as the final result, as returned by the API.
/// All mutations are done in this structure, making [`KMeans`] immutable.
///
/// ## Generics
/// - **T**: Underlying primitive type that was used for the calculation
///
/// ## Fields
/// - **k**: The amount of clusters that were requested when calculating this k-means result
/// - **distsum**: The total sum of squared distances from all samples to their respective centroids
/// - **centroids**: Calculated cluster centers, one point per cluster
/// - **centroid_frequency**: Amount of samples in each centroid
/// - **assignments**: Vector mapping each sample to its respective nearest cluster
/// - **centroid_distances**: Vector containing each sample's distance to its centroid
/// - **iterations**: Amount of finished iterations
/// - **displacement**: Summed distance all centroids moved during the last iteration
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub distsum: T,
    pub centroids: PointSet<T>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<usize>,
    pub centroid_distances: Vec<T>,
    pub iterations: usize,
    pub displacement: T,
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(sample_cnt: usize, sample_dims: usize, k: usize) -> Self {
        Self {
            k,
            distsum: T::zero(),
            centroids: PointSet::zeros(k, sample_dims),
            centroid_frequency: vec![0usize;k],
            assignments: vec![0usize;sample_cnt],
            centroid_distances: vec![T::infinity();sample_cnt],
            iterations: 0,
            displacement: T::infinity(),
        }
    }
    pub(crate) fn set_centroid_from_iter(&mut self, idx: usize, src: impl Iterator<Item = T>) {
        self.centroids.point_mut(idx).iter_mut()
                .zip(src)
                .for_each(|(c,s)| *c = s);
    }
}




/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the samples you want to operate on. The primitive type
/// of the passed samples will be the type used internaly for all calculations, as well as the result
/// as stored in the returned [`KMeansState`] structure.
///
/// ## Supported variants
/// - k-Means clustering (Lloyd) [`KMeans::kmeans_lloyd`]
///
/// ## Supported initialization methods
/// - Random-Sample [`KMeans::init_random_sample`]
/// - Precomputed [`KMeans::init_precomputed`]
#[derive(Clone, Debug)]
pub struct KMeans<T: Primitive> {
    pub(crate) samples: PointSet<T>,
}
impl<T: Primitive> KMeans<T> {
    /// Create a new instance of the [`KMeans`] structure.
    ///
    /// ## Arguments
    /// - **samples**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_cnt**: Amount of samples, contained in the passed **samples** vector
    /// - **sample_dims**: Amount of dimensions each sample from the **sample** vector has
    pub fn new(samples: Vec<T>, sample_cnt: usize, sample_dims: usize) -> Result<Self, KMeansError<T>> {
        if samples.len() != sample_cnt * sample_dims {
            return Err(KMeansError::DimensionMismatch(format!(
                "expected {} x {} values, got {}", sample_cnt, sample_dims, samples.len())));
        }
        Self::from_points(PointSet::new(samples, sample_dims)?)
    }

    /// Create a new instance of the [`KMeans`] structure from an existing [`PointSet`].
    pub fn from_points(samples: PointSet<T>) -> Result<Self, KMeansError<T>> {
        if samples.is_empty() {
            return Err(KMeansError::InvalidParameter("dataset is empty".into()));
        }
        if let Some(pos) = samples.as_slice().iter().position(|v| !v.is_finite()) {
            return Err(KMeansError::InvalidParameter(format!(
                "sample {} contains the non-finite coordinate {}", pos / samples.dims(), samples.as_slice()[pos])));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &PointSet<T> { &self.samples }
    pub fn sample_cnt(&self) -> usize { self.samples.len() }
    pub fn sample_dims(&self) -> usize { self.samples.dims() }

    pub(crate) fn validate_k(&self, k: usize) -> Result<(), KMeansError<T>> {
        if k == 0 || k > self.sample_cnt() {
            return Err(KMeansError::InvalidParameter(format!(
                "k must be within [1, {}], got {}", self.sample_cnt(), k)));
        }
        Ok(())
    }

    /// Assign every sample to its nearest centroid (ties resolve to the lowest centroid index).
    /// Updates assignments, centroid distances and the distance sum.
    pub(crate) fn update_cluster_assignments(&self, state: &mut KMeansState<T>) -> Result<(), KMeansError<T>> {
        let distances = DistanceMatrix::compute(&self.samples, &state.centroids)?;
        state.assignments.iter_mut()
            .zip(state.centroid_distances.iter_mut())
            .enumerate()
            .for_each(|(i, (assignment, centroid_dist))| {
                *assignment = distances.argmin_row(i);
                *centroid_dist = distances.get(i, *assignment);
            });
        state.distsum = state.centroid_distances.iter().map(|&d| d * d).sum();
        Ok(())
    }

    /// Recalculate every sample's distance to its (already assigned) centroid.
    pub(crate) fn update_centroid_distances(&self, state: &mut KMeansState<T>) {
        let centroids = &state.centroids;
        self.samples.iter()
            .zip(state.assignments.iter().cloned())
            .zip(state.centroid_distances.iter_mut())
            .for_each(|((s, assignment), centroid_dist)| {
                *centroid_dist = EuclideanDistance::distance(s, centroids.point(assignment));
            });
        state.distsum = state.centroid_distances.iter().map(|&d| d * d).sum();
    }

    pub(crate) fn update_cluster_frequencies(&self, assignments: &[usize], centroid_frequency: &mut[usize]) -> usize {
        centroid_frequency.iter_mut().for_each(|v| *v = 0);
        let mut used_centroids_cnt = 0;
        assignments.iter().cloned()
            .for_each(|centroid_id| {
                if centroid_frequency[centroid_id] == 0 {
                    used_centroids_cnt += 1; // Count the amount of centroids with more than 0 samples
                }
                centroid_frequency[centroid_id] += 1;
            });
        used_centroids_cnt
    }



    /// Normal K-Means algorithm implementation (Lloyd).
    ///
    /// Alternates between assigning each sample to its nearest centroid and moving each centroid into
    /// the mean of its assigned samples, until the summed centroid displacement of one iteration drops
    /// to the configured tolerance.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`KMeansState`], containing the final state (result).
    ///
    /// ## Errors
    /// - [`KMeansError::InvalidParameter`] if `k == 0`, `k > sample_cnt` or the abort-strategy is invalid
    /// - [`KMeansError::NonConvergence`] if `max_iter` iterations did not suffice (carries the last state)
    /// - [`KMeansError::Cancelled`] if the abort callback fired (carries the last state)
    ///
    /// ## Example
    /// ```rust
    /// use lloyd_kmeans::*;
    ///
    /// let (sample_cnt, sample_dims, k) = (2000, 20, 4);
    ///
    /// // Generate some random data
    /// let mut samples = vec![0.0f64;sample_cnt * sample_dims];
    /// samples.iter_mut().for_each(|v| *v = rand::random());
    ///
    /// let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
    /// let conf = KMeansConfig::build().seed(42).max_iter(1000).build();
    /// match kmean.kmeans_lloyd(k, KMeans::init_random_sample, &conf) {
    ///     Ok(result) => println!("Centroids: {:?}", result.centroids),
    ///     Err(err) => println!("{}", err),
    /// }
    /// ```
    pub fn kmeans_lloyd<'a, F>(&self, k: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>, KMeansError<T>>
                where for<'c> F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<(), KMeansError<T>> {
        crate::variants::Lloyd::calculate(self, k, init, config)
    }

    /// Random sample initialization method (a.k.a. Forgy)
    ///
    /// ## Description
    /// This initialization method selects k distinct samples uniformly at random (without replacement)
    /// as initial centroids.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to an instance-method of [`KMeans`].
    pub fn init_random_sample<'a>(kmean: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'a, T>) -> Result<(), KMeansError<T>> {
        crate::inits::randomsample::calculate(kmean, state, config)
    }

    /// Precomputed initialization method
    ///
    /// ## Description
    /// Uses the given **centroids** as initial centroids. Their count has to match k and their
    /// dimensionality has to match the samples.
    pub fn init_precomputed(centroids: PointSet<T>) -> impl for<'c> FnOnce(&KMeans<T>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<(), KMeansError<T>> {
        move |kmean: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'_, T>| {
            crate::inits::precomputed::calculate(kmean, state, config, centroids)
        }
    }

}

/// Cluster **dataset** into **k** clusters, using random-sample initialization, and return the centroids.
///
/// Convenience wrapper around [`KMeans::kmeans_lloyd`]; see there for the possible errors.
pub fn cluster<T: Primitive>(dataset: PointSet<T>, k: usize, config: &KMeansConfig<'_, T>) -> Result<PointSet<T>, KMeansError<T>> {
    KMeans::from_points(dataset)?
        .kmeans_lloyd(k, KMeans::init_random_sample, config)
        .map(|state| state.centroids)
}

/// Mean of all samples, used as reference in tests.
#[cfg(test)]
pub(crate) fn sample_mean<T: Primitive>(samples: &PointSet<T>) -> Vec<T> {
    let mut mean = vec![T::zero(); samples.dims()];
    samples.iter().for_each(|s| mean.iter_mut().zip(s.iter().cloned()).for_each(|(m, v)| *m += v));
    let cnt: T = crate::helpers::count_as(samples.len());
    mean.iter_mut().for_each(|m| *m = *m / cnt);
    mean
}
