use crate::{KMeansError, Primitive};

/// Specifies when a running k-means calculation stops iterating.
///
/// The calculation converged, once the summed displacement of all centroids within one iteration
/// is `<= tolerance`. With the default tolerance of `0`, the centroids have to stop moving exactly.
/// ## Fields:
/// - **tolerance**: Non-negative threshold for the summed centroid displacement
/// - **max_iter**: Upper bound on iterations. When exhausted, the calculation is reported as not converged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbortStrategy<T: Primitive> {
	pub tolerance: T,
	pub max_iter: usize,
}
impl<T: Primitive> Default for AbortStrategy<T> {
	fn default() -> Self {
		Self { tolerance: T::zero(), max_iter: 300 }
	}
}
impl<T: Primitive> AbortStrategy<T> {
	pub(crate) fn validate(&self) -> Result<(), KMeansError<T>> {
		if self.tolerance.is_nan() || self.tolerance < T::zero() {
			return Err(KMeansError::InvalidParameter(format!("tolerance must be >= 0, got {}", self.tolerance)));
		}
		if self.max_iter == 0 {
			return Err(KMeansError::InvalidParameter("max_iter must be at least 1".into()));
		}
		Ok(())
	}

	pub(crate) fn create_logic(&self) -> AbortStrategyLogic<T> {
		AbortStrategyLogic { tolerance: self.tolerance, max_iter: self.max_iter, iteration: 0 }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Progress {
	Continue,
	Converged,
	Exhausted,
}

pub(crate) struct AbortStrategyLogic<T: Primitive> {
	tolerance: T,
	max_iter: usize,
	iteration: usize,
}
impl<T: Primitive> AbortStrategyLogic<T> {
	/// Has to be called once per finished iteration.
	/// ## Arguments
	/// - **displacement**: Summed distance all centroids moved during the iteration
	pub fn next(&mut self, displacement: T) -> Progress {
		self.iteration += 1;
		if displacement <= self.tolerance {
			Progress::Converged
		} else if self.iteration >= self.max_iter {
			Progress::Exhausted
		} else {
			Progress::Continue
		}
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test] fn test_exact_zero_f32() { test_exact_zero::<f32>(); }
	#[test] fn test_exact_zero_f64() { test_exact_zero::<f64>(); }

	fn test_exact_zero<T: Primitive>() {
		let mut logic = AbortStrategy::<T>::default().create_logic();
		assert_eq!(logic.next(T::from(3000.0).unwrap()), Progress::Continue);
		assert_eq!(logic.next(T::from(1e-30).unwrap()), Progress::Continue);
		assert_eq!(logic.next(T::zero()), Progress::Converged);
	}

	#[test]
	fn test_tolerance() {
		let mut logic = AbortStrategy { tolerance: 0.0005f64, max_iter: 100 }.create_logic();
		assert_eq!(logic.next(0.0006), Progress::Continue);
		assert_eq!(logic.next(0.0005), Progress::Converged);
	}

	#[test]
	fn test_iteration_limit() {
		let mut logic = AbortStrategy { tolerance: 0.0f64, max_iter: 2 }.create_logic();
		assert_eq!(logic.next(1.0), Progress::Continue);
		assert_eq!(logic.next(1.0), Progress::Exhausted);

		// Converging on the last allowed iteration still counts as converged
		let mut logic = AbortStrategy { tolerance: 0.0f64, max_iter: 1 }.create_logic();
		assert_eq!(logic.next(0.0), Progress::Converged);
	}

	#[test]
	fn test_nan_never_converges() {
		let mut logic = AbortStrategy { tolerance: 1.0f64, max_iter: 2 }.create_logic();
		assert_eq!(logic.next(f64::NAN), Progress::Continue);
		assert_eq!(logic.next(f64::NAN), Progress::Exhausted);
	}

	#[test]
	fn test_validation() {
		assert!(AbortStrategy::<f64>::default().validate().is_ok());
		assert!(matches!(AbortStrategy { tolerance: -1.0f64, max_iter: 10 }.validate(), Err(KMeansError::InvalidParameter(_))));
		assert!(matches!(AbortStrategy { tolerance: f32::NAN, max_iter: 10 }.validate(), Err(KMeansError::InvalidParameter(_))));
		assert!(matches!(AbortStrategy { tolerance: 0.0f64, max_iter: 0 }.validate(), Err(KMeansError::InvalidParameter(_))));
	}
}
