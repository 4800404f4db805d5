use crate::checks::check::{CheckResult, TrainTestCheck, evaluate_conditions};
use crate::conditions::MisclassifiedSamplesLowerThan;
use crate::core::{Batch, Context, DatasetKind, TaskType};
use crate::error::CheckError;
use crate::evaluation::metrics::ConfusionMatrix;
use log::info;

/// Confusion matrix of the given model on the test split.
#[derive(Debug, Default)]
pub struct ConfusionMatrixReport {
    conditions: Vec<MisclassifiedSamplesLowerThan>,
    matrix: Option<ConfusionMatrix>,
}

impl ConfusionMatrixReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_condition(mut self, condition: MisclassifiedSamplesLowerThan) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn add_condition_misclassified_samples_lower_than(self, threshold: f64) -> Self {
        self.add_condition(MisclassifiedSamplesLowerThan::new(threshold))
    }

    pub fn conditions(&self) -> &[MisclassifiedSamplesLowerThan] {
        &self.conditions
    }
}

impl TrainTestCheck for ConfusionMatrixReport {
    type Value = ConfusionMatrix;

    fn header(&self) -> &'static str {
        "Confusion Matrix Report"
    }

    fn initialize_run(&mut self, context: &Context) -> Result<(), CheckError> {
        context.assert_task_type(TaskType::Classification)?;
        self.matrix = Some(ConfusionMatrix::new(context.test.num_classes()));
        Ok(())
    }

    fn update(
        &mut self,
        _context: &Context,
        batch: &Batch,
        kind: DatasetKind,
    ) -> Result<(), CheckError> {
        if kind != DatasetKind::Test {
            return Ok(());
        }
        self.matrix
            .as_mut()
            .ok_or(CheckError::NotInitialized("update"))?
            .update(batch.predictions(), batch.labels());
        Ok(())
    }

    fn compute(&mut self, _context: &Context) -> Result<CheckResult<ConfusionMatrix>, CheckError> {
        let matrix = self
            .matrix
            .take()
            .ok_or(CheckError::NotInitialized("compute"))?;
        info!(
            "{}: {} classes, {} test samples",
            self.header(),
            matrix.num_classes(),
            matrix.total()
        );
        let conditions = evaluate_conditions(&self.conditions, &matrix);
        Ok(CheckResult {
            header: self.header().to_string(),
            value: matrix,
            display: None,
            conditions,
        })
    }
}
