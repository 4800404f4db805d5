use crate::checks::check::{CheckResult, TrainTestCheck, evaluate_conditions};
use crate::conditions::NewLabelRatioLessOrEqual;
use crate::core::{Batch, Context, DatasetKind, TaskType};
use crate::error::CheckError;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// Labels of the test split that never occur in the train split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLabelReport {
    /// Sorted ascending.
    pub new_labels: Vec<usize>,
    pub n_new_label_samples: usize,
    pub n_samples: usize,
    /// `n_new_label_samples / n_samples`, `0` for an empty test split.
    pub ratio: f64,
}

#[derive(Debug, Default)]
struct LabelCounts {
    train: BTreeMap<usize, usize>,
    test: BTreeMap<usize, usize>,
}

/// Finds labels present in test but absent from train.
#[derive(Debug, Default)]
pub struct NewLabelTrainTest {
    conditions: Vec<NewLabelRatioLessOrEqual>,
    counts: Option<LabelCounts>,
}

impl NewLabelTrainTest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_condition_new_labels_ratio_less_or_equal(mut self, max_ratio: f64) -> Self {
        self.conditions.push(NewLabelRatioLessOrEqual::new(max_ratio));
        self
    }

    pub fn conditions(&self) -> &[NewLabelRatioLessOrEqual] {
        &self.conditions
    }
}

impl LabelCounts {
    fn report(&self) -> NewLabelReport {
        let new: Vec<(usize, usize)> = self
            .test
            .iter()
            .filter(|(label, _)| !self.train.contains_key(label))
            .map(|(&label, &n)| (label, n))
            .collect();
        let n_samples: usize = self.test.values().sum();
        let n_new_label_samples: usize = new.iter().map(|(_, n)| n).sum();
        let ratio = if n_samples == 0 {
            0.0
        } else {
            n_new_label_samples as f64 / n_samples as f64
        };
        NewLabelReport {
            new_labels: new.into_iter().map(|(label, _)| label).collect(),
            n_new_label_samples,
            n_samples,
            ratio,
        }
    }
}

impl TrainTestCheck for NewLabelTrainTest {
    type Value = NewLabelReport;

    fn header(&self) -> &'static str {
        "New Label Train Test"
    }

    fn initialize_run(&mut self, context: &Context) -> Result<(), CheckError> {
        context.assert_task_type(TaskType::Classification)?;
        self.counts = Some(LabelCounts::default());
        Ok(())
    }

    fn update(
        &mut self,
        _context: &Context,
        batch: &Batch,
        kind: DatasetKind,
    ) -> Result<(), CheckError> {
        let counts = self
            .counts
            .as_mut()
            .ok_or(CheckError::NotInitialized("update"))?;
        let split = match kind {
            DatasetKind::Train => &mut counts.train,
            DatasetKind::Test => &mut counts.test,
        };
        for &label in batch.labels() {
            *split.entry(label).or_insert(0) += 1;
        }
        Ok(())
    }

    fn compute(&mut self, _context: &Context) -> Result<CheckResult<NewLabelReport>, CheckError> {
        let report = self
            .counts
            .take()
            .ok_or(CheckError::NotInitialized("compute"))?
            .report();
        info!(
            "{}: {} new labels in {} of {} test samples",
            self.header(),
            report.new_labels.len(),
            report.n_new_label_samples,
            report.n_samples
        );
        let conditions = evaluate_conditions(&self.conditions, &report);
        Ok(CheckResult {
            header: self.header().to_string(),
            value: report,
            display: None,
            conditions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::run_check;
    use crate::conditions::ConditionCategory;
    use crate::testing::dummies::{batch_with_misses, batches_of, context_for};

    fn run(
        train: &[usize],
        test: &[usize],
        check: &mut NewLabelTrainTest,
    ) -> CheckResult<NewLabelReport> {
        let ctx = context_for(train, test, 4);
        let mut batches = batches_of(DatasetKind::Train, &batch_with_misses(train, 4, 0), 2);
        batches.extend(batches_of(DatasetKind::Test, &batch_with_misses(test, 4, 0), 2));
        run_check(check, &ctx, batches).unwrap()
    }

    #[test]
    fn finds_labels_missing_from_train() {
        let result = run(&[0, 1, 2, 0], &[1, 2, 3, 3], &mut NewLabelTrainTest::new());
        assert_eq!(
            result.value,
            NewLabelReport {
                new_labels: vec![3],
                n_new_label_samples: 2,
                n_samples: 4,
                ratio: 0.5,
            }
        );
        assert!(result.display.is_none());
    }

    #[test]
    fn unseen_test_label() {
        let result = run(&[0, 1, 2], &[1, 2, 3], &mut NewLabelTrainTest::new());
        assert_eq!(result.value.new_labels, vec![3]);
        assert_eq!(result.value.ratio, 1.0 / 3.0);
    }

    #[test]
    fn no_new_labels() {
        let mut check = NewLabelTrainTest::new().add_condition_new_labels_ratio_less_or_equal(0.0);
        let result = run(&[0, 1, 2], &[2, 1, 1, 0], &mut check);
        assert!(result.value.new_labels.is_empty());
        assert_eq!(result.value.ratio, 0.0);
        assert!(result.passed_conditions());
    }

    #[test]
    fn ratio_condition() {
        let mut check = NewLabelTrainTest::new()
            .add_condition_new_labels_ratio_less_or_equal(0.0)
            .add_condition_new_labels_ratio_less_or_equal(0.5);
        let result = run(&[0, 1], &[0, 2, 3, 1], &mut check);
        assert_eq!(result.value.new_labels, vec![2, 3]);
        assert_eq!(result.conditions[0].category, ConditionCategory::Fail);
        assert!(result.conditions[1].is_pass());
    }

    #[test]
    fn empty_test_split() {
        let result = run(&[0, 1], &[], &mut NewLabelTrainTest::new());
        assert_eq!(result.value.n_samples, 0);
        assert_eq!(result.value.ratio, 0.0);
    }
}
