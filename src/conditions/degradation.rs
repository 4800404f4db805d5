use crate::conditions::ConditionCategory;
use crate::conditions::condition::{DegradationParameters, Verdict, included};
use crate::core::{ResultTable, TEST, TRAIN};
use crate::evaluation::{BasicEstimator, Estimator};
use crate::utils::format_percent;
use std::collections::BTreeSet;

/// Relative drop from `train` to `test`; `None` when the train score is zero.
pub fn relative_degradation(train: f64, test: f64) -> Option<f64> {
    if train == 0.0 {
        None
    } else {
        Some((train - test) / train)
    }
}

#[derive(Default)]
struct MaxDegradation(Option<(f64, String)>);

impl MaxDegradation {
    fn update(&mut self, value: f64, metric: &str, class_name: Option<&str>) {
        if self.0.as_ref().is_some_and(|(v, _)| *v >= value) {
            return;
        }
        let mut msg = format!(
            "Found max degradation of {} for metric {metric}",
            format_percent(value, 2)
        );
        if let Some(c) = class_name {
            msg.push_str(&format!(" and class {c}"));
        }
        self.0 = Some((value, msg));
    }

    fn message(&self) -> &str {
        self.0
            .as_ref()
            .map_or("No class has both a non-zero train score and a test score", |(_, m)| m.as_str())
    }
}

pub(crate) fn evaluate(table: &ResultTable, p: &DegradationParameters) -> Verdict {
    if p.average {
        averaged(table, p)
    } else {
        per_class(table, p)
    }
}

fn per_class(table: &ResultTable, p: &DegradationParameters) -> Verdict {
    let mut max = MaxDegradation::default();
    let mut failed_classes = BTreeSet::new();

    for metric in table.metrics_of(TEST) {
        for row in table
            .rows_for_model(TEST)
            .filter(|r| r.metric_name == metric && included(&p.classes, r.class_id))
        {
            let Some(train) = table.value_of(TRAIN, &metric, row.class_id) else {
                continue;
            };
            let Some(d) = relative_degradation(train, row.value) else {
                continue;
            };
            max.update(d, &metric, Some(&row.class_name));
            if d > p.threshold {
                failed_classes.insert(row.class_id);
            }
        }
    }

    if failed_classes.is_empty() {
        Ok((ConditionCategory::Pass, max.message().to_string()))
    } else {
        Ok((
            ConditionCategory::Fail,
            format!(
                "{} classes scores failed. {}",
                failed_classes.len(),
                max.message()
            ),
        ))
    }
}

fn averaged(table: &ResultTable, p: &DegradationParameters) -> Verdict {
    let mut max = MaxDegradation::default();
    let mut failed_metrics = 0usize;

    for metric in table.metrics_of(TEST) {
        let mut train_avg = BasicEstimator::default();
        let mut test_avg = BasicEstimator::default();
        for row in table
            .rows_for_model(TEST)
            .filter(|r| r.metric_name == metric && included(&p.classes, r.class_id))
        {
            match table.value_of(TRAIN, &metric, row.class_id) {
                Some(train) if train != 0.0 => {
                    train_avg.add(train);
                    test_avg.add(row.value);
                }
                _ => {}
            }
        }
        if train_avg.count() == 0 {
            continue;
        }
        let Some(d) = relative_degradation(train_avg.estimation(), test_avg.estimation()) else {
            continue;
        };
        max.update(d, &metric, None);
        if d > p.threshold {
            failed_metrics += 1;
        }
    }

    if failed_metrics == 0 {
        Ok((ConditionCategory::Pass, max.message().to_string()))
    } else {
        Ok((
            ConditionCategory::Fail,
            format!("{failed_metrics} metrics scores failed. {}", max.message()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{CheckCondition, Condition};
    use crate::core::ClassMetricRecord;

    /// (metric, class, train, test)
    fn table(rows: &[(&str, usize, f64, f64)]) -> ResultTable {
        let mut recs = Vec::new();
        for &(m, c, tr, te) in rows {
            let name = c.to_string();
            recs.push(ClassMetricRecord::new(TRAIN, m, c, &name, 10, tr));
            recs.push(ClassMetricRecord::new(TEST, m, c, &name, 10, te));
        }
        ResultTable::from_records(recs).unwrap()
    }

    #[test]
    fn formula() {
        assert_eq!(relative_degradation(0.8, 0.6).map(|d| (d * 100.0).round()), Some(25.0));
        assert_eq!(relative_degradation(0.0, 0.6), None);
    }

    #[test]
    fn pass_reports_max_degradation() {
        let t = table(&[("Precision", 0, 1.0, 0.99), ("Precision", 5, 0.5, 0.45)]);
        let o = Condition::train_test_degradation_less_than(0.2).evaluate(&t);
        assert_eq!(o.category, ConditionCategory::Pass);
        assert_eq!(o.message, "Found max degradation of 10% for metric Precision and class 5");
    }

    #[test]
    fn fail_counts_distinct_classes() {
        let t = table(&[
            ("Precision", 0, 1.0, 0.9),
            ("Recall", 0, 1.0, 0.9),
            ("Precision", 1, 1.0, 0.5),
            ("Precision", 2, 1.0, 1.0),
        ]);
        let o = Condition::train_test_degradation_less_than(0.05).evaluate(&t);
        assert_eq!(o.category, ConditionCategory::Fail);
        assert_eq!(
            o.message,
            "2 classes scores failed. Found max degradation of 50% for metric Precision and class 1"
        );
    }

    #[test]
    fn zero_train_score_is_skipped() {
        let t = table(&[("F1", 0, 0.0, 0.9), ("F1", 1, 0.5, 0.5)]);
        let o = Condition::train_test_degradation_less_than(0.0).evaluate(&t);
        assert_eq!(o.category, ConditionCategory::Pass);
        assert_eq!(o.message, "Found max degradation of 0% for metric F1 and class 1");
    }

    #[test]
    fn average_mode_excludes_zero_train_classes() {
        // class 0 excluded: averages are train 0.8, test 0.6 -> 25%
        let t = table(&[("F1", 0, 0.0, 0.0), ("F1", 1, 1.0, 0.8), ("F1", 2, 0.6, 0.4)]);
        let pass = Condition::train_test_degradation_less_than(0.3)
            .averaged()
            .evaluate(&t);
        assert_eq!(pass.category, ConditionCategory::Pass);
        assert_eq!(pass.message, "Found max degradation of 25% for metric F1");

        let fail = Condition::train_test_degradation_less_than(0.2)
            .averaged()
            .evaluate(&t);
        assert_eq!(fail.category, ConditionCategory::Fail);
        assert_eq!(
            fail.message,
            "1 metrics scores failed. Found max degradation of 25% for metric F1"
        );
    }

    #[test]
    fn test_class_missing_in_train_is_ignored() {
        let mut recs = vec![ClassMetricRecord::new(TEST, "F1", 3, "3", 4, 0.1)];
        recs.push(ClassMetricRecord::new(TRAIN, "F1", 0, "0", 4, 0.9));
        recs.push(ClassMetricRecord::new(TEST, "F1", 0, "0", 4, 0.9));
        let t = ResultTable::from_records(recs).unwrap();
        let o = Condition::train_test_degradation_less_than(0.1).evaluate(&t);
        assert!(o.is_pass());
    }
}
