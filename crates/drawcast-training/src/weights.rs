//! Weight vector operations for the genetic algorithm.
//!
//! - **Initialization**: [`random`] draws every weight uniformly from `[0, max_weight]`
//! - **Mutation**: [`mutate_single_point`] replaces one weight with a fresh random value
//!
//! Weights are not normalized. The combiner ranks signs, so scaling every weight by the same
//! factor leaves the ranking unchanged and the absolute scale carries no meaning.

use rand::Rng;

/// Creates a weight vector by applying a function to each index.
///
/// ```
/// use drawcast_training::weights;
///
/// let weights = weights::from_fn(|i| i as f32, 3);
/// assert_eq!(weights, vec![0.0, 1.0, 2.0]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Generates `len` weights, each uniform in `[0.0, max_weight]`.
pub fn random<R>(rng: &mut R, max_weight: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(0.0..=max_weight), len)
}

/// Replaces one randomly chosen weight with a new value uniform in `[0.0, max_weight]`.
///
/// Returns the index that changed, or `None` for an empty vector.
pub fn mutate_single_point<R>(weights: &mut [f32], max_weight: f32, rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    if weights.is_empty() {
        return None;
    }
    let index = rng.random_range(0..weights.len());
    weights[index] = rng.random_range(0.0..=max_weight);
    Some(index)
}
