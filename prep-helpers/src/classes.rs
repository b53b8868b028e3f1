use ndarray::{ArrayBase, Data, Ix1};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// A label that has no place in a total order (for float labels, NaN).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnorderableLabel {
    /// Position of the offending label in the label vector.
    pub position: usize,
}

impl Display for UnorderableLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "label at position {} cannot be ordered", self.position)
    }
}

impl Error for UnorderableLabel {}

/// Sample positions grouped by class label.
///
/// `labels` holds the unique labels in ascending order and `indices[i]` the
/// positions carrying `labels[i]`, in the order they appear in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassIndices<L> {
    pub labels: Vec<L>,
    pub indices: Vec<Vec<usize>>,
}

impl<L> ClassIndices<L> {
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }
}

/// Groups the positions of `labels` by class.
///
/// Classes are listed in ascending label order, so class `0` is always the
/// smallest label value. Within a class the original positional order is kept.
pub fn label_indices_per_class<L, S>(
    labels: &ArrayBase<S, Ix1>,
) -> Result<ClassIndices<L>, UnorderableLabel>
where
    L: Clone + PartialOrd,
    S: Data<Elem = L>,
{
    for (position, label) in labels.iter().enumerate() {
        if label.partial_cmp(label).is_none() {
            return Err(UnorderableLabel { position });
        }
    }

    let mut uniques: Vec<L> = labels.iter().cloned().collect();
    // Every label compares with itself, so the fallback is never taken.
    uniques.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    uniques.dedup_by(|a, b| a == b);

    let mut indices = vec![Vec::new(); uniques.len()];
    for (position, label) in labels.iter().enumerate() {
        let class = uniques
            .binary_search_by(|probe| probe.partial_cmp(label).unwrap_or(Ordering::Equal))
            .map_err(|_| UnorderableLabel { position })?;
        indices[class].push(position);
    }

    Ok(ClassIndices {
        labels: uniques,
        indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_groups_in_sorted_label_order() {
        let labels = array![2, 0, 1, 0, 2, 2];
        let classes = label_indices_per_class(&labels).unwrap();

        assert_eq!(classes.labels, vec![0, 1, 2]);
        assert_eq!(classes.indices, vec![vec![1, 3], vec![2], vec![0, 4, 5]]);
        assert_eq!(classes.num_classes(), 3);
    }

    #[test]
    fn test_float_labels() {
        let labels = array![1.0_f32, 3.0, 1.0, 2.0];
        let classes = label_indices_per_class(&labels).unwrap();

        assert_eq!(classes.labels, vec![1.0, 2.0, 3.0]);
        assert_eq!(classes.indices, vec![vec![0, 2], vec![3], vec![1]]);
    }

    #[test]
    fn test_nan_label_is_rejected() {
        let labels = array![1.0, f64::NAN, 2.0];
        let err = label_indices_per_class(&labels).unwrap_err();
        assert_eq!(err, UnorderableLabel { position: 1 });
    }

    #[test]
    fn test_empty_labels() {
        let labels = ndarray::Array1::<i32>::from(vec![]);
        let classes = label_indices_per_class(&labels).unwrap();
        assert_eq!(classes.num_classes(), 0);
        assert!(classes.indices.is_empty());
    }
}
