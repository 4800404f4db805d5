use crate::checks::NewLabelReport;
use crate::conditions::{CheckCondition, ConditionCategory, ConditionOutcome};
use crate::error::ensure_unit_interval;
use crate::utils::format_percent;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_max_ratio() -> f64 {
    0.0
}

/// Ratio of test samples whose label never appears in train must not exceed `max_ratio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NewLabelRatioLessOrEqual {
    #[serde(default = "default_max_ratio")]
    #[schemars(
        title = "Maximum ratio",
        description = "Largest allowed share of test samples with unseen labels, in [0, 1]",
        default = "default_max_ratio"
    )]
    pub max_ratio: f64,
}

impl NewLabelRatioLessOrEqual {
    pub fn new(max_ratio: f64) -> Self {
        Self { max_ratio }
    }
}

impl CheckCondition<NewLabelReport> for NewLabelRatioLessOrEqual {
    fn name(&self) -> String {
        format!(
            "New labels ratio is less or equal to {}",
            format_percent(self.max_ratio, 2)
        )
    }

    fn evaluate(&self, report: &NewLabelReport) -> ConditionOutcome {
        let verdict = ensure_unit_interval("max_ratio", self.max_ratio).map(|_| {
            if report.new_labels.is_empty() {
                return (ConditionCategory::Pass, "No new labels found".to_string());
            }
            let category = if report.ratio <= self.max_ratio {
                ConditionCategory::Pass
            } else {
                ConditionCategory::Fail
            };
            (
                category,
                format!(
                    "Found {} new labels ({:?}) in {} of test samples",
                    report.new_labels.len(),
                    report.new_labels,
                    format_percent(report.ratio, 2)
                ),
            )
        });
        ConditionOutcome::from_result(self.name(), verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(new_labels: Vec<usize>, ratio: f64) -> NewLabelReport {
        NewLabelReport {
            new_labels,
            n_new_label_samples: 0,
            n_samples: 0,
            ratio,
        }
    }

    #[test]
    fn no_new_labels_pass() {
        let o = NewLabelRatioLessOrEqual::new(0.0).evaluate(&report(vec![], 0.0));
        assert!(o.is_pass());
        assert_eq!(o.name, "New labels ratio is less or equal to 0%");
    }

    #[test]
    fn ratio_above_limit_fails() {
        let o = NewLabelRatioLessOrEqual::new(0.1).evaluate(&report(vec![3], 0.25));
        assert_eq!(o.category, ConditionCategory::Fail);
        assert_eq!(o.message, "Found 1 new labels ([3]) in 25% of test samples");
        let o = NewLabelRatioLessOrEqual::new(0.3).evaluate(&report(vec![3], 0.25));
        assert!(o.is_pass());
    }

    #[test]
    fn invalid_limit_is_error() {
        let o = NewLabelRatioLessOrEqual::new(1.1).evaluate(&report(vec![], 0.0));
        assert_eq!(o.category, ConditionCategory::Error);
        assert!(o.message.contains("1.1"));
    }
}
