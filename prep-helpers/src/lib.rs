use ndarray::NdFloat;

// Include submodules
mod classes;
mod shuffle;

// Re-export types from submodules
pub use classes::{ClassIndices, UnorderableLabel, label_indices_per_class};
pub use shuffle::{permutation, permutation_with_rng, shuffle_arrays_together};

/// Float element types the NaN filter operates on.
pub trait Float: NdFloat {}

impl Float for f32 {}

impl Float for f64 {}
