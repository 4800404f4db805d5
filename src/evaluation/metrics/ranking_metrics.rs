use crate::evaluation::metrics::{ClassMetric, MetricValue};
use crate::evaluation::{BasicEstimator, Estimator};

const BINS: usize = 101;
const RECALL_THRESHOLDS: [usize; 10] = [50, 55, 60, 65, 70, 75, 80, 85, 90, 95];

/// Scores are clamped to `[0, 1]` and bucketed in steps of 0.01.
#[inline]
fn bin_of(score: f64) -> usize {
    if !score.is_finite() {
        return 0;
    }
    ((score.clamp(0.0, 1.0) * 100.0).floor() as usize).min(BINS - 1)
}

/// One-vs-rest score histograms of positives and negatives for every class.
#[derive(Debug, Clone, Default)]
struct ScoreHistogram {
    pos: Vec<[u64; BINS]>,
    neg: Vec<[u64; BINS]>,
    seen: u64,
}

impl ScoreHistogram {
    fn ensure_initialized(&mut self, k_hint: usize) {
        while self.pos.len() < k_hint {
            self.pos.push([0; BINS]);
            let mut neg = [0; BINS];
            // earlier samples had no score for this class
            neg[0] = self.seen;
            self.neg.push(neg);
        }
    }

    fn update(&mut self, predictions: &[Vec<f64>], labels: &[usize]) {
        for (scores, &y) in predictions.iter().zip(labels) {
            self.ensure_initialized(scores.len().max(y + 1));
            for c in 0..self.pos.len() {
                let b = bin_of(scores.get(c).copied().unwrap_or(0.0));
                if c == y {
                    self.pos[c][b] += 1;
                } else {
                    self.neg[c][b] += 1;
                }
            }
            self.seen += 1;
        }
    }

    fn positives(&self, c: usize) -> u64 {
        self.pos[c].iter().sum()
    }

    fn average_precision(&self, c: usize) -> f64 {
        let total = self.positives(c);
        if total == 0 {
            return f64::NAN;
        }
        let (mut tp, mut fp, mut ap) = (0u64, 0u64, 0.0);
        for b in (0..BINS).rev() {
            tp += self.pos[c][b];
            fp += self.neg[c][b];
            if self.pos[c][b] == 0 {
                continue;
            }
            let precision = tp as f64 / (tp + fp) as f64;
            ap += self.pos[c][b] as f64 / total as f64 * precision;
        }
        ap
    }

    fn average_recall(&self, c: usize) -> f64 {
        let total = self.positives(c);
        if total == 0 {
            return f64::NAN;
        }
        let mean: BasicEstimator = RECALL_THRESHOLDS
            .iter()
            .map(|&t| self.pos[c][t..].iter().sum::<u64>() as f64 / total as f64)
            .collect();
        mean.estimation()
    }
}

/// Area under the one-vs-rest precision/recall curve of each class's score.
#[derive(Debug, Clone, Default)]
pub struct AveragePrecision {
    hist: ScoreHistogram,
}

impl AveragePrecision {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClassMetric for AveragePrecision {
    fn reset(&mut self) {
        self.hist = ScoreHistogram::default();
    }

    fn update(&mut self, predictions: &[Vec<f64>], labels: &[usize]) {
        self.hist.update(predictions, labels);
    }

    fn compute(&self) -> MetricValue {
        MetricValue::PerClass(
            (0..self.hist.pos.len())
                .map(|c| self.hist.average_precision(c))
                .collect(),
        )
    }
}

/// Mean recall of each class over the confidence thresholds 0.50, 0.55, ..., 0.95.
#[derive(Debug, Clone, Default)]
pub struct AverageRecall {
    hist: ScoreHistogram,
}

impl AverageRecall {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClassMetric for AverageRecall {
    fn reset(&mut self) {
        self.hist = ScoreHistogram::default();
    }

    fn update(&mut self, predictions: &[Vec<f64>], labels: &[usize]) {
        self.hist.update(predictions, labels);
    }

    fn compute(&self) -> MetricValue {
        MetricValue::PerClass(
            (0..self.hist.pos.len())
                .map(|c| self.hist.average_recall(c))
                .collect(),
        )
    }
}
