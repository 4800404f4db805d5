mod datasets;

pub use datasets::{batch_with_misses, batches_of, context_for, labels_with_counts};
