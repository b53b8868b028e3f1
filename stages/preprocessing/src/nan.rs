use ndarray::{Array, ArrayBase, Axis, Data, RemoveAxis};
use prep_helpers::Float;

use crate::PreprocessError;

/// Drops every sample that holds a NaN anywhere in its non-sample axes.
///
/// Samples are rows along axis 0 of both arrays. Kept samples retain their
/// relative order, and each kept label stays paired with its sample.
///
/// # Errors
///
/// Returns `PreprocessError::SampleCountMismatch` if `data` and `labels`
/// disagree on the length of axis 0.
pub fn remove_nan_samples<F, L, S, T, D, E>(
    data: &ArrayBase<S, D>,
    labels: &ArrayBase<T, E>,
) -> Result<(Array<F, D>, Array<L, E>), PreprocessError>
where
    F: Float,
    L: Clone,
    S: Data<Elem = F>,
    T: Data<Elem = L>,
    D: RemoveAxis,
    E: RemoveAxis,
{
    let n_samples = data.len_of(Axis(0));
    let n_labels = labels.len_of(Axis(0));
    if n_samples != n_labels {
        return Err(PreprocessError::SampleCountMismatch {
            data: n_samples,
            labels: n_labels,
        });
    }

    let keep: Vec<usize> = data
        .axis_iter(Axis(0))
        .enumerate()
        .filter(|(_, sample)| !sample.iter().any(|v| v.is_nan()))
        .map(|(i, _)| i)
        .collect();

    let dropped = n_samples - keep.len();
    if dropped > 0 {
        log::debug!("dropping {} of {} samples containing NaN", dropped, n_samples);
    }

    Ok((data.select(Axis(0), &keep), labels.select(Axis(0), &keep)))
}
