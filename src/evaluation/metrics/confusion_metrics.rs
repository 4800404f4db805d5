use crate::evaluation::metrics::confusion::ConfusionCounts;
use crate::evaluation::metrics::{ClassMetric, MetricValue};
use crate::evaluation::{BasicEstimator, Estimator};

fn finish(per_class: Vec<f64>, average: bool) -> MetricValue {
    if average {
        let mean: BasicEstimator = per_class.into_iter().collect();
        MetricValue::Scalar(mean.estimation())
    } else {
        MetricValue::PerClass(per_class)
    }
}

/// Per-class precision of the arg-max prediction.
///
/// With `average` set the metric reports the macro mean instead, which the
/// per-class checks refuse.
#[derive(Debug, Clone, Default)]
pub struct Precision {
    counts: ConfusionCounts,
    average: bool,
}

impl Precision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn averaged() -> Self {
        Self {
            average: true,
            ..Self::default()
        }
    }
}

impl ClassMetric for Precision {
    fn reset(&mut self) {
        self.counts.reset();
    }

    fn update(&mut self, predictions: &[Vec<f64>], labels: &[usize]) {
        self.counts.update(predictions, labels);
    }

    fn compute(&self) -> MetricValue {
        let v = (0..self.counts.num_classes())
            .map(|c| self.counts.precision(c))
            .collect();
        finish(v, self.average)
    }
}

/// Per-class recall of the arg-max prediction.
#[derive(Debug, Clone, Default)]
pub struct Recall {
    counts: ConfusionCounts,
    average: bool,
}

impl Recall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn averaged() -> Self {
        Self {
            average: true,
            ..Self::default()
        }
    }
}

impl ClassMetric for Recall {
    fn reset(&mut self) {
        self.counts.reset();
    }

    fn update(&mut self, predictions: &[Vec<f64>], labels: &[usize]) {
        self.counts.update(predictions, labels);
    }

    fn compute(&self) -> MetricValue {
        let v = (0..self.counts.num_classes())
            .map(|c| self.counts.recall(c))
            .collect();
        finish(v, self.average)
    }
}

/// Per-class F-beta score; `Fbeta::f1()` is the usual F1.
#[derive(Debug, Clone)]
pub struct Fbeta {
    counts: ConfusionCounts,
    beta: f64,
    average: bool,
}

impl Fbeta {
    pub fn new(beta: f64, average: bool) -> Self {
        Self {
            counts: ConfusionCounts::default(),
            beta,
            average,
        }
    }

    pub fn f1() -> Self {
        Self::new(1.0, false)
    }
}

impl ClassMetric for Fbeta {
    fn reset(&mut self) {
        self.counts.reset();
    }

    fn update(&mut self, predictions: &[Vec<f64>], labels: &[usize]) {
        self.counts.update(predictions, labels);
    }

    fn compute(&self) -> MetricValue {
        let v = (0..self.counts.num_classes())
            .map(|c| self.counts.fbeta(c, self.beta))
            .collect();
        finish(v, self.average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::one_hot;

    fn per_class(v: MetricValue) -> Vec<f64> {
        match v {
            MetricValue::PerClass(v) => v,
            MetricValue::Scalar(s) => panic!("expected per-class, got scalar {s}"),
        }
    }

    fn feed<M: ClassMetric>(m: &mut M) {
        // class 0: 2 samples, both right; class 1: 2 samples, one predicted as 0
        let preds = vec![one_hot(0, 2), one_hot(0, 2), one_hot(1, 2), one_hot(0, 2)];
        m.update(&preds, &[0, 0, 1, 1]);
    }

    #[test]
    fn precision_per_class() {
        let mut m = Precision::new();
        feed(&mut m);
        let v = per_class(m.compute());
        assert!((v[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((v[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn recall_per_class() {
        let mut m = Recall::new();
        feed(&mut m);
        let v = per_class(m.compute());
        assert!((v[0] - 1.0).abs() < 1e-12);
        assert!((v[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn f1_per_class() {
        let mut m = Fbeta::f1();
        feed(&mut m);
        let v = per_class(m.compute());
        assert!((v[0] - 0.8).abs() < 1e-12);
        assert!((v[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn averaged_metric_is_scalar() {
        let mut m = Precision::averaged();
        feed(&mut m);
        match m.compute() {
            MetricValue::Scalar(s) => assert!((s - 5.0 / 6.0).abs() < 1e-12),
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[test]
    fn reset_forgets_everything() {
        let mut m = Recall::new();
        feed(&mut m);
        m.reset();
        assert_eq!(per_class(m.compute()), Vec::<f64>::new());
    }

    #[test]
    fn updates_accumulate_across_batches() {
        let mut m = Recall::new();
        m.update(&[one_hot(1, 2)], &[1]);
        m.update(&[one_hot(0, 2)], &[1]);
        let v = per_class(m.compute());
        assert!((v[1] - 0.5).abs() < 1e-12);
    }
}
