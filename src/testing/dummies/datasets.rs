use crate::core::{Batch, Context, DatasetInfo, DatasetKind};

/// `counts[c]` samples of class `c`, grouped by ascending class id.
pub fn labels_with_counts(counts: &[usize]) -> Vec<usize> {
    counts
        .iter()
        .enumerate()
        .flat_map(|(c, &n)| std::iter::repeat_n(c, n))
        .collect()
}

/// Classification context whose splits are counted from the given labels.
pub fn context_for(train_labels: &[usize], test_labels: &[usize], num_classes: usize) -> Context {
    Context::new(
        DatasetInfo::from_labels(train_labels, num_classes),
        DatasetInfo::from_labels(test_labels, num_classes),
    )
}

/// One-hot batch that predicts the true label, except that every
/// `miss_every`-th sample (1-based) is predicted as the next class.
pub fn batch_with_misses(labels: &[usize], num_classes: usize, miss_every: usize) -> Batch {
    let predicted: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            if miss_every > 0 && (i + 1) % miss_every == 0 {
                (y + 1) % num_classes
            } else {
                y
            }
        })
        .collect();
    Batch::from_predicted_classes(&predicted, labels.to_vec(), num_classes)
        .expect("one label per prediction")
}

/// Splits `batch` into `(kind, chunk)` pairs of at most `size` samples.
pub fn batches_of(kind: DatasetKind, batch: &Batch, size: usize) -> Vec<(DatasetKind, Batch)> {
    batch
        .predictions()
        .chunks(size.max(1))
        .zip(batch.labels().chunks(size.max(1)))
        .map(|(p, l)| {
            (
                kind,
                Batch::new(p.to_vec(), l.to_vec()).expect("chunks keep their shape"),
            )
        })
        .collect()
}
