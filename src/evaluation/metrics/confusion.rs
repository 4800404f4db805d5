use crate::evaluation::metrics::class_metric::argmax;

/// Per-class true positive / false positive / false negative counters.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConfusionCounts {
    tp: Vec<u64>,
    fp: Vec<u64>,
    fn_: Vec<u64>,
}

impl ConfusionCounts {
    #[inline]
    fn ensure_initialized(&mut self, k_hint: usize) {
        if k_hint > self.tp.len() {
            self.tp.resize(k_hint, 0);
            self.fp.resize(k_hint, 0);
            self.fn_.resize(k_hint, 0);
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn update(&mut self, predictions: &[Vec<f64>], labels: &[usize]) {
        for (scores, &y) in predictions.iter().zip(labels) {
            self.ensure_initialized(scores.len().max(y + 1));
            let Some(yhat) = argmax(scores) else {
                self.fn_[y] += 1;
                continue;
            };
            if yhat == y {
                self.tp[y] += 1;
            } else {
                self.fp[yhat] += 1;
                self.fn_[y] += 1;
            }
        }
    }

    #[inline]
    pub(crate) fn num_classes(&self) -> usize {
        self.tp.len()
    }

    #[inline]
    fn support(&self, c: usize) -> u64 {
        self.tp[c] + self.fn_[c]
    }

    #[inline]
    fn predicted(&self, c: usize) -> u64 {
        self.tp[c] + self.fp[c]
    }

    /// `NaN` when the class is neither present nor predicted, `0` when only never predicted.
    pub(crate) fn precision(&self, c: usize) -> f64 {
        match (self.support(c), self.predicted(c)) {
            (0, 0) => f64::NAN,
            (_, 0) => 0.0,
            (_, p) => self.tp[c] as f64 / p as f64,
        }
    }

    /// `NaN` when the class has no true samples.
    pub(crate) fn recall(&self, c: usize) -> f64 {
        match self.support(c) {
            0 => f64::NAN,
            s => self.tp[c] as f64 / s as f64,
        }
    }

    pub(crate) fn fbeta(&self, c: usize, beta: f64) -> f64 {
        if self.support(c) == 0 && self.predicted(c) == 0 {
            return f64::NAN;
        }
        let p = self.precision(c);
        let r = self.recall(c);
        let r = if r.is_nan() { 0.0 } else { r };
        let b2 = beta * beta;
        let denom = b2 * p + r;
        if denom > f64::EPSILON {
            (1.0 + b2) * p * r / denom
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hot(c: usize, k: usize) -> Vec<f64> {
        crate::core::one_hot(c, k)
    }

    #[test]
    fn counts_hits_and_misses() {
        let mut cc = ConfusionCounts::default();
        // true 0 -> pred 0, true 1 -> pred 0, true 1 -> pred 1
        cc.update(&[hot(0, 3), hot(0, 3), hot(1, 3)], &[0, 1, 1]);
        assert_eq!(cc.num_classes(), 3);
        assert!((cc.precision(0) - 0.5).abs() < 1e-12);
        assert!((cc.recall(0) - 1.0).abs() < 1e-12);
        assert!((cc.precision(1) - 1.0).abs() < 1e-12);
        assert!((cc.recall(1) - 0.5).abs() < 1e-12);
        assert!(cc.precision(2).is_nan());
        assert!(cc.recall(2).is_nan());
        assert!(cc.fbeta(2, 1.0).is_nan());
    }

    #[test]
    fn never_predicted_present_class_scores_zero() {
        let mut cc = ConfusionCounts::default();
        cc.update(&[hot(0, 2)], &[1]);
        assert_eq!(cc.precision(1), 0.0);
        assert_eq!(cc.recall(1), 0.0);
        assert_eq!(cc.fbeta(1, 1.0), 0.0);
        // predicted but absent: precision 0, recall undefined, f1 0
        assert_eq!(cc.precision(0), 0.0);
        assert!(cc.recall(0).is_nan());
        assert_eq!(cc.fbeta(0, 1.0), 0.0);
    }

    #[test]
    fn labels_beyond_prediction_width_grow_counts() {
        let mut cc = ConfusionCounts::default();
        cc.update(&[hot(0, 2)], &[4]);
        assert_eq!(cc.num_classes(), 5);
        assert_eq!(cc.recall(4), 0.0);
    }
}
