use crate::{KMeans, KMeansState, KMeansConfig, KMeansError, Primitive};
use std::ops::DerefMut;

#[inline(always)] pub fn calculate<'a, T: Primitive>(kmean: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'a, T>) -> Result<(), KMeansError<T>> {
	kmean.validate_k(state.k)?;
	let mut rnd = config.rnd.borrow_mut();
	rand::seq::index::sample(rnd.deref_mut(), kmean.sample_cnt(), state.k).into_vec().into_iter()
		.enumerate()
		.for_each(|(ci, si)| { // Copy randomly chosen samples into state.centroids
			state.set_centroid_from_iter(ci, kmean.samples.point(si).iter().cloned());
		});
	Ok(())
}
