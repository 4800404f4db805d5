/// Output of [`ClassMetric::compute`].
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// One value per class id; `NaN` where the class could not be scored.
    PerClass(Vec<f64>),
    /// A single summary value. Checks that report per class reject it.
    Scalar(f64),
}

/// Incremental classification metric.
///
/// A metric is fed batches of score vectors and true class ids and keeps only
/// sufficient statistics, never the samples themselves.
pub trait ClassMetric {
    /// Clears accumulated statistics.
    fn reset(&mut self);

    /// Feeds one batch. `predictions[i]` holds one score per class for the
    /// sample whose true class is `labels[i]`.
    fn update(&mut self, predictions: &[Vec<f64>], labels: &[usize]);

    fn compute(&self) -> MetricValue;
}

/// Index of the highest finite score; the first one wins on ties.
#[inline]
pub(crate) fn argmax(v: &[f64]) -> Option<usize> {
    let mut best = None;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &x) in v.iter().enumerate() {
        if !x.is_finite() {
            continue;
        }
        if best.is_none() || x > best_value {
            best = Some(i);
            best_value = x;
        }
    }
    best
}
