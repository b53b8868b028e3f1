//! Array preparation for hyperspectral classification.
//!
//! Turns image cubes into per-pixel samples, drops samples holding NaNs and
//! partitions the result into train, validation and test sets.

use ndarray::ShapeError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod cube;
mod nan;
pub mod split;

pub use cube::reshape_cube_to_1d_samples;
pub use nan::remove_nan_samples;
pub use split::{
    SetSize, SplitConfig, SplitError, SplitIndices, SplitSets, split_indices,
    train_val_test_split, train_val_test_split_with_config, train_val_test_split_with_rng,
};

/// Errors raised while reshaping or filtering sample arrays.
#[derive(Debug, Clone)]
pub enum PreprocessError {
    /// The requested channel axis does not exist in the input cube.
    InvalidChannelAxis { axis: usize, ndim: usize },
    /// The label array cannot be laid out as one row per pixel.
    LabelShapeMismatch { labels: usize, pixels: usize },
    /// Data and labels disagree on the number of samples along axis 0.
    SampleCountMismatch { data: usize, labels: usize },
    /// Reshaping the underlying array failed.
    Shape(ShapeError),
}

impl Display for PreprocessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PreprocessError::InvalidChannelAxis { axis, ndim } => write!(
                f,
                "channel axis {} is out of range for a {}-dimensional cube",
                axis, ndim
            ),
            PreprocessError::LabelShapeMismatch { labels, pixels } => write!(
                f,
                "{} labels cannot be split into rows for {} pixels",
                labels, pixels
            ),
            PreprocessError::SampleCountMismatch { data, labels } => write!(
                f,
                "data holds {} samples but labels hold {}",
                data, labels
            ),
            PreprocessError::Shape(e) => write!(f, "shape error: {}", e),
        }
    }
}

impl Error for PreprocessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PreprocessError::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for PreprocessError {
    fn from(e: ShapeError) -> Self {
        PreprocessError::Shape(e)
    }
}
