use ndarray::{Array, ArrayBase, Axis, Data, RemoveAxis};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Returns a random permutation of `0..n` drawn from a `Xoshiro256PlusPlus`
/// generator seeded with `seed`.
///
/// The same `(n, seed)` pair always yields the same permutation.
pub fn permutation(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    permutation_with_rng(n, &mut rng)
}

/// Returns a random permutation of `0..n` drawn from `rng`.
pub fn permutation_with_rng<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    order
}

/// Applies one permutation along axis 0 of two aligned arrays.
///
/// Both arrays are gathered with the same index order, so the pairing between
/// a sample and its label survives the shuffle. Returns `None` when the two
/// arrays disagree on the number of samples.
pub fn shuffle_arrays_together<A, B, S, T, D, E, R>(
    data: &ArrayBase<S, D>,
    labels: &ArrayBase<T, E>,
    rng: &mut R,
) -> Option<(Array<A, D>, Array<B, E>)>
where
    A: Clone,
    B: Clone,
    S: Data<Elem = A>,
    T: Data<Elem = B>,
    D: RemoveAxis,
    E: RemoveAxis,
    R: Rng + ?Sized,
{
    let n = data.len_of(Axis(0));
    if labels.len_of(Axis(0)) != n {
        return None;
    }
    let order = permutation_with_rng(n, rng);
    Some((data.select(Axis(0), &order), labels.select(Axis(0), &order)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, array};

    #[test]
    fn test_permutation_is_complete() {
        let mut order = permutation(50, 7);
        order.sort_unstable();
        assert_eq!(order, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_permutation_reproducible_with_seed() {
        assert_eq!(permutation(100, 42), permutation(100, 42));
        assert_ne!(permutation(100, 42), permutation(100, 43));
    }

    #[test]
    fn test_shuffle_keeps_pairs_aligned() {
        // Each row stores its own label in column 0.
        let data = Array2::from_shape_fn((20, 3), |(i, j)| (i * 10 + j) as f64);
        let labels = Array1::from_shape_fn(20, |i| (i * 10) as f64);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);

        let (x, y) = shuffle_arrays_together(&data, &labels, &mut rng).unwrap();

        assert_eq!(x.dim(), (20, 3));
        for (row, label) in x.rows().into_iter().zip(y.iter()) {
            assert_eq!(row[0], *label);
        }
        assert_ne!(y, labels);
    }

    #[test]
    fn test_shuffle_rejects_mismatched_lengths() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let labels = array![0, 1, 2];
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert!(shuffle_arrays_together(&data, &labels, &mut rng).is_none());
    }
}
