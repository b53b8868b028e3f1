//! Train/validation/test partitioning.
//!
//! The split always works on a shuffled copy of the inputs: one seeded
//! permutation is gathered into both the data and the labels, then the
//! requested set sizes are resolved against the shuffled label vector.

use ndarray::{Array, Array1, ArrayBase, Axis, Data, Dimension, Ix1, RemoveAxis};
use prep_helpers::{UnorderableLabel, label_indices_per_class, shuffle_arrays_together};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Errors that can occur while resolving set sizes or splitting a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitError {
    /// A fractional size must lie in (0, 1].
    FractionOutOfRange(f64),
    /// The validation fraction must lie in (0, 1].
    InvalidValidationFraction(f64),
    /// An absolute count must be at least one.
    CountTooSmall(u64),
    /// An absolute count asks for more samples than the dataset holds.
    CountExceedsSamples { requested: u64, available: usize },
    /// A per-class size needs at least one count.
    EmptyClassCounts,
    /// A label cannot be ordered against the others (e.g. a NaN label).
    UnorderableLabel(usize),
    /// Data and labels disagree on the number of samples.
    SampleCountMismatch { data: usize, labels: usize },
}

impl Display for SplitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitError::FractionOutOfRange(size) => {
                write!(f, "fractional set size {} is outside (0, 1]", size)
            }
            SplitError::InvalidValidationFraction(size) => {
                write!(f, "validation size {} is outside (0, 1]", size)
            }
            SplitError::CountTooSmall(size) => {
                write!(f, "set size {} must be at least 1", size)
            }
            SplitError::CountExceedsSamples {
                requested,
                available,
            } => write!(
                f,
                "requested {} samples but only {} are available",
                requested, available
            ),
            SplitError::EmptyClassCounts => write!(f, "per-class set size needs at least one count"),
            SplitError::UnorderableLabel(position) => {
                write!(f, "label at position {} cannot be ordered", position)
            }
            SplitError::SampleCountMismatch { data, labels } => write!(
                f,
                "data holds {} samples but labels hold {}",
                data, labels
            ),
        }
    }
}

impl Error for SplitError {}

impl From<UnorderableLabel> for SplitError {
    fn from(e: UnorderableLabel) -> Self {
        SplitError::UnorderableLabel(e.position)
    }
}

/// How many samples a set should receive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum SetSize {
    /// Leading `floor(n * fraction)` positions, regardless of class.
    Fraction(f64),
    /// Leading `count` positions, regardless of class.
    Count(u64),
    /// First `counts[i]` positions of class `i`, classes in ascending label
    /// order. A single count applies to every class.
    PerClass(Vec<u64>),
}

impl From<f64> for SetSize {
    fn from(fraction: f64) -> Self {
        SetSize::Fraction(fraction)
    }
}

impl From<u64> for SetSize {
    fn from(count: u64) -> Self {
        SetSize::Count(count)
    }
}

impl From<Vec<u64>> for SetSize {
    fn from(counts: Vec<u64>) -> Self {
        SetSize::PerClass(counts)
    }
}

impl SetSize {
    /// Resolves the size against a label vector into sample positions.
    ///
    /// `Fraction` and `Count` select a positional prefix. `PerClass` groups
    /// positions by label and takes a prefix of every group, so the result is
    /// ordered class by class rather than positionally. Classes without a
    /// matching count (when more than one count is given) receive nothing.
    pub fn resolve<L, S>(&self, labels: &ArrayBase<S, Ix1>) -> Result<Vec<usize>, SplitError>
    where
        L: Clone + PartialOrd,
        S: Data<Elem = L>,
    {
        let n = labels.len();
        match self {
            SetSize::Fraction(fraction) => {
                let fraction = *fraction;
                if !(fraction > 0.0 && fraction <= 1.0) {
                    return Err(SplitError::FractionOutOfRange(fraction));
                }
                let take = (n as f64 * fraction).floor() as usize;
                Ok((0..take.min(n)).collect())
            }
            SetSize::Count(count) => {
                if *count < 1 {
                    return Err(SplitError::CountTooSmall(*count));
                }
                match usize::try_from(*count) {
                    Ok(take) if take <= n => Ok((0..take).collect()),
                    _ => Err(SplitError::CountExceedsSamples {
                        requested: *count,
                        available: n,
                    }),
                }
            }
            SetSize::PerClass(counts) => resolve_per_class(counts, labels),
        }
    }
}

fn resolve_per_class<L, S>(
    counts: &[u64],
    labels: &ArrayBase<S, Ix1>,
) -> Result<Vec<usize>, SplitError>
where
    L: Clone + PartialOrd,
    S: Data<Elem = L>,
{
    if counts.is_empty() {
        return Err(SplitError::EmptyClassCounts);
    }
    let classes = label_indices_per_class(labels)?;
    if counts.len() > 1 && counts.len() < classes.num_classes() {
        log::warn!(
            "{} per-class counts given for {} classes; the last {} classes get no samples",
            counts.len(),
            classes.num_classes(),
            classes.num_classes() - counts.len()
        );
    }

    let mut selected = Vec::new();
    for (class, positions) in classes.indices.iter().enumerate() {
        let count = match counts {
            [single] => *single,
            _ => counts.get(class).copied().unwrap_or(0),
        };
        let take = usize::try_from(count)
            .unwrap_or(usize::MAX)
            .min(positions.len());
        selected.extend_from_slice(&positions[..take]);
    }
    Ok(selected)
}

/// Split parameters with the defaults used across the pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct SplitConfig {
    pub train_size: SetSize,
    /// Share of the training set moved into validation.
    pub val_size: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_size: SetSize::Fraction(0.8),
            val_size: 0.1,
            seed: 0,
        }
    }
}

/// Pairwise disjoint sample positions of the three sets.
///
/// `train` and `test` are sorted ascending; `val` keeps the order in which it
/// was drawn from the training set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub val: Vec<usize>,
    pub test: Vec<usize>,
}

impl SplitIndices {
    pub fn total(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }
}

/// Partitions positions `0..labels.len()` into train, validation and test.
///
/// `labels` is expected to be shuffled already. Validation is carved out of the
/// resolved training set (it never takes test samples), and test is whatever
/// the training size left over.
pub fn split_indices<L, S>(
    labels: &ArrayBase<S, Ix1>,
    train_size: &SetSize,
    val_size: f64,
) -> Result<SplitIndices, SplitError>
where
    L: Clone + PartialOrd,
    S: Data<Elem = L>,
{
    let initial_train = train_size.resolve(labels)?;

    let train_labels = labels.select(Axis(0), &initial_train);
    let local_val = SetSize::Fraction(val_size)
        .resolve(&train_labels)
        .map_err(|e| match e {
            SplitError::FractionOutOfRange(size) => SplitError::InvalidValidationFraction(size),
            other => other,
        })?;
    let val: Vec<usize> = local_val.iter().map(|&i| initial_train[i]).collect();

    let test = set_difference(0..labels.len(), &initial_train);
    let train = set_difference(initial_train.iter().copied(), &val);

    Ok(SplitIndices { train, val, test })
}

/// Sorted, deduplicated members of `from` that are absent from `remove`.
fn set_difference<I>(from: I, remove: &[usize]) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    let remove: HashSet<usize> = remove.iter().copied().collect();
    from.into_iter()
        .filter(|i| !remove.contains(i))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The six arrays produced by a split.
#[derive(Debug, Clone)]
pub struct SplitSets<A, L, D: Dimension> {
    pub train_x: Array<A, D>,
    pub train_y: Array1<L>,
    pub val_x: Array<A, D>,
    pub val_y: Array1<L>,
    pub test_x: Array<A, D>,
    pub test_y: Array1<L>,
}

impl<A, L, D> SplitSets<A, L, D>
where
    A: Clone,
    L: Clone,
    D: RemoveAxis,
{
    /// Gathers the three sets out of already shuffled arrays.
    pub fn gather(data: &Array<A, D>, labels: &Array1<L>, indices: &SplitIndices) -> Self {
        Self {
            train_x: data.select(Axis(0), &indices.train),
            train_y: labels.select(Axis(0), &indices.train),
            val_x: data.select(Axis(0), &indices.val),
            val_y: labels.select(Axis(0), &indices.val),
            test_x: data.select(Axis(0), &indices.test),
            test_y: labels.select(Axis(0), &indices.test),
        }
    }

    /// `(train_x, train_y, val_x, val_y, test_x, test_y)`
    #[allow(clippy::type_complexity)]
    pub fn into_tuple(
        self,
    ) -> (
        Array<A, D>,
        Array1<L>,
        Array<A, D>,
        Array1<L>,
        Array<A, D>,
        Array1<L>,
    ) {
        (
            self.train_x,
            self.train_y,
            self.val_x,
            self.val_y,
            self.test_x,
            self.test_y,
        )
    }
}

/// Shuffles `data` and `labels` with `seed` and splits them into train,
/// validation and test sets.
///
/// # Arguments
///
/// * `data`: Samples along axis 0, any per-sample shape.
/// * `labels`: One label per sample.
/// * `train_size`: Size of the initial training set.
/// * `val_size`: Fraction of the training set moved into validation.
/// * `seed`: Seed of the shuffling permutation.
///
/// # Errors
///
/// Returns a `SplitError` when a size is out of range, when labels cannot be
/// ordered for a per-class split, or when the inputs are misaligned.
pub fn train_val_test_split<A, L, S, T, D>(
    data: &ArrayBase<S, D>,
    labels: &ArrayBase<T, Ix1>,
    train_size: &SetSize,
    val_size: f64,
    seed: u64,
) -> Result<SplitSets<A, L, D>, SplitError>
where
    A: Clone,
    L: Clone + PartialOrd,
    S: Data<Elem = A>,
    T: Data<Elem = L>,
    D: RemoveAxis,
{
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    train_val_test_split_with_rng(data, labels, train_size, val_size, &mut rng)
}

/// Same as [`train_val_test_split`], taking every parameter from `config`.
pub fn train_val_test_split_with_config<A, L, S, T, D>(
    data: &ArrayBase<S, D>,
    labels: &ArrayBase<T, Ix1>,
    config: &SplitConfig,
) -> Result<SplitSets<A, L, D>, SplitError>
where
    A: Clone,
    L: Clone + PartialOrd,
    S: Data<Elem = A>,
    T: Data<Elem = L>,
    D: RemoveAxis,
{
    train_val_test_split(data, labels, &config.train_size, config.val_size, config.seed)
}

/// Splits with a caller-owned random number generator.
pub fn train_val_test_split_with_rng<A, L, S, T, D, R>(
    data: &ArrayBase<S, D>,
    labels: &ArrayBase<T, Ix1>,
    train_size: &SetSize,
    val_size: f64,
    rng: &mut R,
) -> Result<SplitSets<A, L, D>, SplitError>
where
    A: Clone,
    L: Clone + PartialOrd,
    S: Data<Elem = A>,
    T: Data<Elem = L>,
    D: RemoveAxis,
    R: Rng + ?Sized,
{
    let n_samples = data.len_of(Axis(0));
    let (data, labels) =
        shuffle_arrays_together(data, labels, rng).ok_or(SplitError::SampleCountMismatch {
            data: n_samples,
            labels: labels.len(),
        })?;

    let indices = split_indices(&labels, train_size, val_size)?;
    log::debug!(
        "split {} samples into train={} val={} test={}",
        n_samples,
        indices.train.len(),
        indices.val.len(),
        indices.test.len()
    );
    Ok(SplitSets::gather(&data, &labels, &indices))
}
