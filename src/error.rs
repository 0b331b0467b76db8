use crate::{KMeansState, Primitive};
use thiserror::Error;

/// Errors returned by the clustering entry points.
///
/// [`KMeansError::NonConvergence`] and [`KMeansError::Cancelled`] are not hard failures: both carry
/// the state reached so far, which can be recovered with [`KMeansError::into_state`].
#[derive(Error, Debug)]
pub enum KMeansError<T: Primitive> {
    /// Point sets of differing dimensionality, an empty distance input, or ragged dataset rows
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Invalid cluster count, empty dataset or invalid configuration value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The iteration limit was exhausted before the centroids settled
    #[error("No convergence after {iterations} iterations (last displacement: {displacement})")]
    NonConvergence {
        iterations: usize,
        displacement: T,
        state: Box<KMeansState<T>>,
    },

    /// The abort callback requested termination
    #[error("Calculation cancelled after {iterations} iterations")]
    Cancelled {
        iterations: usize,
        state: Box<KMeansState<T>>,
    },
}
impl<T: Primitive> KMeansError<T> {
    /// Best-available state of an interrupted calculation, if this error carries one.
    pub fn into_state(self) -> Option<KMeansState<T>> {
        match self {
            KMeansError::NonConvergence { state, .. } | KMeansError::Cancelled { state, .. } => Some(*state),
            _ => None,
        }
    }
}
