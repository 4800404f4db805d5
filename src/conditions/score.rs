use crate::conditions::ConditionCategory;
use crate::conditions::condition::{ScoreParameters, Verdict, format_failures, included};
use crate::core::{ResultTable, TEST};
use crate::error::CheckError;
use crate::utils::format_number;

pub(crate) fn evaluate(table: &ResultTable, p: &ScoreParameters) -> Verdict {
    let mut min: Option<(f64, String)> = None;
    let mut fails: Vec<(String, Vec<(String, String)>)> = Vec::new();

    for metric in table.metrics_of(TEST) {
        let mut failed_classes = Vec::new();
        for row in table
            .rows_for_model(TEST)
            .filter(|r| r.metric_name == metric && included(&p.classes, r.class_id))
        {
            if min.as_ref().is_none_or(|(v, _)| row.value < *v) {
                min = Some((
                    row.value,
                    format!(
                        "Found minimum score for {metric} metric of value {} for class {}",
                        format_number(row.value, 2),
                        row.class_name
                    ),
                ));
            }
            if row.value <= p.min_score {
                failed_classes.push((row.class_name.clone(), format_number(row.value, 2)));
            }
        }
        if !failed_classes.is_empty() {
            fails.push((metric, failed_classes));
        }
    }

    let Some((_, min_message)) = min else {
        return Err(CheckError::MissingValue(
            "no test scores to compare with the threshold".into(),
        ));
    };
    if fails.is_empty() {
        Ok((ConditionCategory::Pass, min_message))
    } else {
        Ok((
            ConditionCategory::Fail,
            format!(
                "Found metrics with scores below threshold:\n{}",
                format_failures(&fails)
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{CheckCondition, Condition};
    use crate::core::{ClassMetricRecord, TRAIN};

    fn t() -> ResultTable {
        ResultTable::from_records([
            ClassMetricRecord::new(TEST, "Precision", 0, "0", 5, 0.99),
            ClassMetricRecord::new(TEST, "Recall", 9, "9", 5, 0.9712),
            ClassMetricRecord::new(TEST, "Recall", 0, "0", 5, 1.0),
            ClassMetricRecord::new(TRAIN, "Recall", 9, "9", 5, 0.1),
        ])
        .unwrap()
    }

    #[test]
    fn pass_cites_minimum_test_score() {
        let o = Condition::test_performance_greater_than(0.5).evaluate(&t());
        assert!(o.is_pass());
        assert_eq!(o.message, "Found minimum score for Recall metric of value 0.97 for class 9");
    }

    #[test]
    fn fail_lists_scores_at_or_below_threshold() {
        let o = Condition::test_performance_greater_than(1.0).evaluate(&t());
        assert_eq!(o.category, ConditionCategory::Fail);
        assert_eq!(
            o.message,
            "Found metrics with scores below threshold:\n{Precision: {0: 0.99}, Recall: {9: 0.97, 0: 1}}"
        );
    }

    #[test]
    fn empty_selection_is_an_error() {
        let o = Condition::test_performance_greater_than(0.5)
            .for_classes(vec![42])
            .evaluate(&t());
        assert_eq!(o.category, ConditionCategory::Error);
    }
}
