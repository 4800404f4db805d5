use crate::evaluation::estimators::Estimator;

/// Unweighted arithmetic mean: every observation counts once.
///
/// Used to average per-class scores, so a class with ten samples weighs the
/// same as a class with ten thousand.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicEstimator {
    len: usize,
    sum: f64,
}

impl Estimator for BasicEstimator {
    #[inline]
    fn add(&mut self, v: f64) {
        if v.is_nan() {
            return;
        }
        self.len += 1;
        self.sum += v;
    }

    #[inline]
    fn estimation(&self) -> f64 {
        if self.len > 0 {
            self.sum / self.len as f64
        } else {
            f64::NAN
        }
    }

    #[inline]
    fn count(&self) -> usize {
        self.len
    }
}

impl FromIterator<f64> for BasicEstimator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut est = Self::default();
        for v in iter {
            est.add(v);
        }
        est
    }
}
