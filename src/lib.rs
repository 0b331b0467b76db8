//! # lloyd-kmeans - API documentation
//!
//! lloyd-kmeans is a small rust library for k-means clustering with Lloyd's algorithm.
//!
//! ## Design target
//! The crate partitions a set of points in N-dimensional space into k clusters: centroids are
//! initialized from randomly chosen samples, then every sample is assigned to its nearest centroid
//! and every centroid is moved into the mean of its samples, until the centroids stop moving.
//! Samples are given using a raw row-major vector (or a [`PointSet`]), instead of any high-level
//! matrix crate such as nalgebra or ndarray.
//!
//! Lloyd's algorithm only finds a local optimum. Which one depends on the initialization, so
//! pass a seeded random generator for repeatable results.
//!
//! ## Convergence
//! The calculation stops once the summed distance all centroids moved during one iteration is
//! `<=` the configured tolerance (`0` by default, meaning the centroids have to stop moving exactly).
//! Since that is not guaranteed to happen in bounded time, there is an iteration limit. When it is
//! exhausted, [`KMeansError::NonConvergence`] is returned, which still carries the last state.
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use lloyd_kmeans::*;
//!
//! let (sample_cnt, sample_dims, k) = (2000, 16, 4);
//!
//! // Generate some random data
//! let mut samples = vec![0.0f64;sample_cnt * sample_dims];
//! samples.iter_mut().for_each(|v| *v = rand::random());
//!
//! // Calculate kmeans, using random samples as initial centroids
//! let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
//! let conf = KMeansConfig::build().seed(1337).max_iter(1000).build();
//! let result = match kmean.kmeans_lloyd(k, KMeans::init_random_sample, &conf) {
//!     Ok(result) => result,
//!     Err(err) => err.into_state().expect("invalid parameters"),
//! };
//!
//! println!("Centroids: {:?}", result.centroids);
//! println!("Cluster-Assignments: {:?}", result.assignments);
//! println!("Error: {}", result.distsum);
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use lloyd_kmeans::*;
//!
//! let dataset = PointSet::from_rows(&[[0.0f64, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]).unwrap();
//!
//! let conf = KMeansConfig::build()
//!     .seed(7)
//!     .init_done(&|_| println!("Initialization completed."))
//!     .iteration_done(&|s, nr, displacement|
//!         println!("Iteration {} - Displacement: {:.2} | Error: {:.2}", nr, displacement, s.distsum))
//!     .empty_cluster_policy(EmptyClusterPolicy::ReseedFarthest)
//!     .build();
//!
//! let centroids = cluster(dataset, 2, &conf).unwrap();
//! assert_eq!(centroids.len(), 2);
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct, which takes over the sample data into its ownership.
//! Calling [`KMeans::kmeans_lloyd`] does not mutate it, so multiple runs can be done on the same data.
//! Internally, a new instance of [`KMeansState`] is used to store the state (and finally the result) of a
//! calculation. The free function [`cluster`] wraps all of this and only returns the centroids.
//!
//! [`DistanceMatrix`] computes the pairwise euclidean distances between two point sets and is used for the
//! assignment step. The [`textio`] module contains the plain-text matrix format used by the `lloyd` binary.

#[macro_use] mod helpers;
mod memory;
mod error;
mod distances;
mod api;
mod variants;
mod inits;
mod abort_strategy;
pub mod textio;

pub use abort_strategy::AbortStrategy;
pub use api::{cluster, EmptyClusterPolicy, KMeansState, KMeansConfig, KMeansConfigBuilder, KMeans};
pub use distances::{DistanceMatrix, EuclideanDistance};
pub use error::KMeansError;
pub use memory::{PointSet, Primitive};
