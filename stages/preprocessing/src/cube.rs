use ndarray::{Array2, ArrayBase, Data, Dimension, Ix3};
use num_traits::AsPrimitive;

use crate::PreprocessError;

/// Reshapes a `[.., .., ..]` image cube into one row of channels per pixel.
///
/// The axis at `channels_idx` is moved to the last position, the two spatial
/// axes are flattened (row-major) into the sample axis, and every value is
/// cast to `f32`. Labels are laid out as `(pixels, label_dims)` in the same
/// row-major pixel order, so a `(H, W)` label map becomes `(H * W, 1)`.
///
/// # Errors
///
/// * `InvalidChannelAxis` if `channels_idx` is not 0, 1 or 2.
/// * `LabelShapeMismatch` if the label count is not a positive multiple of the
///   number of pixels.
pub fn reshape_cube_to_1d_samples<A, B, S, T, E>(
    data: &ArrayBase<S, Ix3>,
    labels: &ArrayBase<T, E>,
    channels_idx: usize,
) -> Result<(Array2<f32>, Array2<f32>), PreprocessError>
where
    A: AsPrimitive<f32>,
    B: AsPrimitive<f32>,
    S: Data<Elem = A>,
    T: Data<Elem = B>,
    E: Dimension,
{
    if channels_idx >= 3 {
        return Err(PreprocessError::InvalidChannelAxis {
            axis: channels_idx,
            ndim: 3,
        });
    }

    let mut order: Vec<usize> = (0..3).filter(|&axis| axis != channels_idx).collect();
    order.push(channels_idx);
    let moved = data.view().permuted_axes([order[0], order[1], order[2]]);
    let (height, width, channels) = moved.dim();
    let pixels = height * width;

    if pixels == 0 || labels.len() % pixels != 0 {
        return Err(PreprocessError::LabelShapeMismatch {
            labels: labels.len(),
            pixels,
        });
    }
    let label_dims = labels.len() / pixels;

    // `iter` walks the permuted view in logical order, which is exactly the
    // row-major layout of the flattened output.
    let samples = Array2::from_shape_vec(
        (pixels, channels),
        moved.iter().map(|&v| v.as_()).collect(),
    )?;
    let targets = Array2::from_shape_vec(
        (pixels, label_dims),
        labels.iter().map(|&v| v.as_()).collect(),
    )?;

    log::debug!(
        "reshaped cube {:?} (channels at axis {}) into {} samples of {} channels",
        data.dim(),
        channels_idx,
        pixels,
        channels
    );
    Ok((samples, targets))
}
