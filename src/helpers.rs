use crate::Primitive;

/// Index of the smallest value. The first occurrence wins on ties, NaN never wins
/// (unless every value is NaN, in which case index 0 is returned).
pub(crate) fn argmin<T: Primitive>(values: &[T]) -> usize {
    let mut best: Option<(usize, T)> = None;
    for (idx, v) in values.iter().cloned().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, bv)) if v >= bv => {}
            _ => best = Some((idx, v)),
        }
    }
    best.map(|(idx, _)| idx).unwrap_or(0)
}

/// Convert a sample count into the calculation's primitive type.
pub(crate) fn count_as<T: Primitive>(cnt: usize) -> T {
    // usize -> float only rounds, it does not fail
    <T as num::NumCast>::from(cnt).unwrap_or_else(T::max_value)
}

#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta <= tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-15))
}

#[cfg(test)]
pub(crate) mod testing {
	use crate::{PointSet, Primitive};

	/// Compare two centroid sets, ignoring the order in which the centroids are listed.
	pub fn assert_centroids_eq_unordered<T: Primitive>(should: &[Vec<T>], actual: &PointSet<T>, cmp_epsilon: T) {
		assert_eq!(should.len(), actual.len(), "centroid count differs. Actual: {:?}", actual);
		let mut unmatched: Vec<&[T]> = actual.iter().collect();
		for s in should {
			let pos = unmatched.iter().position(|a| {
				a.len() == s.len() && a.iter().zip(s.iter()).all(|(av, sv)| (*av - *sv).abs() <= cmp_epsilon)
			});
			match pos {
				Some(pos) => { unmatched.remove(pos); }
				None => panic!("Centroid {:?} missing.\nActual: {:?}\nShould: {:?}", s, actual.to_rows(), should),
			}
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn argmin_first_occurrence() {
		assert_eq!(argmin(&[3.0f64, 1.0, 2.0, 1.0]), 1);
		assert_eq!(argmin(&[0.0f32, 0.0, 0.0]), 0);
		assert_eq!(argmin(&[5.0f64]), 0);
	}

	#[test]
	fn argmin_skips_nan() {
		assert_eq!(argmin(&[f64::NAN, 2.0, 1.0]), 2);
		assert_eq!(argmin(&[f32::NAN, f32::NAN]), 0);
	}

	#[test]
	fn count_conversion() {
		assert_eq!(count_as::<f64>(0), 0.0);
		assert_eq!(count_as::<f32>(150), 150.0);
	}
}
