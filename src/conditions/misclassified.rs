use crate::conditions::{CheckCondition, ConditionCategory, ConditionOutcome};
use crate::error::ensure_unit_interval;
use crate::evaluation::metrics::ConfusionMatrix;
use crate::utils::format_percent;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_misclassified_samples_threshold() -> f64 {
    0.2
}

/// Every off-diagonal cell of the confusion matrix must hold at most
/// `ceil(misclassified_samples_threshold * total)` samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MisclassifiedSamplesLowerThan {
    #[serde(default = "default_misclassified_samples_threshold")]
    #[schemars(
        title = "Misclassified samples threshold",
        description = "Largest allowed share of all samples in one misclassified cell, in [0, 1]",
        default = "default_misclassified_samples_threshold"
    )]
    pub misclassified_samples_threshold: f64,
}

impl Default for MisclassifiedSamplesLowerThan {
    fn default() -> Self {
        Self::new(default_misclassified_samples_threshold())
    }
}

impl MisclassifiedSamplesLowerThan {
    pub fn new(misclassified_samples_threshold: f64) -> Self {
        Self {
            misclassified_samples_threshold,
        }
    }
}

impl CheckCondition<ConfusionMatrix> for MisclassifiedSamplesLowerThan {
    fn name(&self) -> String {
        format!(
            "Misclassified cell size lower than {} of the total samples",
            format_percent(self.misclassified_samples_threshold, 2)
        )
    }

    fn evaluate(&self, matrix: &ConfusionMatrix) -> ConditionOutcome {
        let t = self.misclassified_samples_threshold;
        let verdict = ensure_unit_interval("misclassified_samples_threshold", t).map(|_| {
            let thresh = (t * matrix.total() as f64).ceil() as u64;
            let above: Vec<u64> = matrix
                .misclassified()
                .map(|(_, _, n)| n)
                .filter(|&n| n > thresh)
                .collect();
            match above.iter().max() {
                None => (
                    ConditionCategory::Pass,
                    format!(
                        "Number of samples in each of the misclassified cells in the confusion matrix is \
                         lesser than the threshold ({thresh}) based on the given \
                         misclassified_samples_threshold ratio"
                    ),
                ),
                Some(worst) => (
                    ConditionCategory::Fail,
                    format!(
                        "The confusion matrix has {} cells with samples greater than the threshold \
                         ({thresh}) based on the given misclassified_samples_threshold ratio. \
                         The worst performing cell has {worst} samples",
                        above.len()
                    ),
                ),
            }
        });
        ConditionOutcome::from_result(self.name(), verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::one_hot;

    /// 10 samples; cells (0,1) = 2, (1,2) = 2, (2,0) = 1.
    fn matrix() -> ConfusionMatrix {
        let pairs = [(0, 0), (0, 1), (0, 1), (0, 0), (1, 1), (1, 2), (1, 1), (1, 2), (2, 2), (2, 0)];
        let mut m = ConfusionMatrix::new(3);
        let (labels, preds): (Vec<usize>, Vec<Vec<f64>>) =
            pairs.iter().map(|&(y, p)| (y, one_hot(p, 3))).unzip();
        m.update(&preds, &labels);
        m
    }

    #[test]
    fn cells_above_threshold_fail() {
        let o = MisclassifiedSamplesLowerThan::new(0.1).evaluate(&matrix());
        assert_eq!(o.category, ConditionCategory::Fail);
        assert_eq!(o.name, "Misclassified cell size lower than 10% of the total samples");
        assert_eq!(
            o.message,
            "The confusion matrix has 2 cells with samples greater than the threshold (1) based on \
             the given misclassified_samples_threshold ratio. The worst performing cell has 2 samples"
        );
    }

    #[test]
    fn cells_within_threshold_pass() {
        let o = MisclassifiedSamplesLowerThan::new(0.25).evaluate(&matrix());
        assert!(o.is_pass());
        assert_eq!(
            o.message,
            "Number of samples in each of the misclassified cells in the confusion matrix is lesser \
             than the threshold (3) based on the given misclassified_samples_threshold ratio"
        );
        // ceil(0.2 * 10) = 2, and a cell equal to the threshold passes
        assert!(MisclassifiedSamplesLowerThan::default().evaluate(&matrix()).is_pass());
    }

    #[test]
    fn threshold_outside_unit_interval_is_error() {
        for (t, name) in [(-0.1, "-10%"), (1.1, "110%")] {
            let o = MisclassifiedSamplesLowerThan::new(t).evaluate(&matrix());
            assert_eq!(o.category, ConditionCategory::Error);
            assert_eq!(
                o.name,
                format!("Misclassified cell size lower than {name} of the total samples")
            );
            assert!(o.message.contains("misclassified_samples_threshold"));
        }
    }
}
