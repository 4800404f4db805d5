use crate::checks::check::{CheckResult, TrainTestCheck, evaluate_conditions};
use crate::conditions::Condition;
use crate::core::{Batch, Context, DatasetKind, ResultTable, TEST, TRAIN, TaskType};
use crate::display::{ClassSelection, ClassSelector};
use crate::error::CheckError;
use crate::evaluation::{MetricCollector, MetricSet, ModelMetrics, aggregate};
use log::info;

/// Per-class scores of one model on its train and test splits.
pub struct ClassPerformance {
    metrics: MetricSet,
    selector: ClassSelector,
    conditions: Vec<Condition>,
    collector: Option<MetricCollector>,
}

impl ClassPerformance {
    /// `alternative_metrics` replaces the default `Precision` + `Recall` set when non-empty.
    pub fn new(
        alternative_metrics: Option<MetricSet>,
        selection: ClassSelection,
    ) -> Result<Self, CheckError> {
        let alternative_metrics = alternative_metrics.filter(|m| !m.is_empty());
        let custom = alternative_metrics.is_some();
        let metrics = alternative_metrics.unwrap_or_else(MetricSet::precision_recall);
        metrics.ensure_unique_names()?;
        let selector = ClassSelector::new(selection, &metrics, custom)?;
        Ok(Self {
            metrics,
            selector,
            conditions: Vec::new(),
            collector: None,
        })
    }

    pub fn add_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn add_condition_test_performance_greater_than(self, min_score: f64) -> Self {
        self.add_condition(Condition::test_performance_greater_than(min_score))
    }

    pub fn add_condition_train_test_relative_degradation_less_than(self, threshold: f64) -> Self {
        self.add_condition(Condition::train_test_degradation_less_than(threshold))
    }

    pub fn add_condition_class_performance_imbalance_ratio_less_than<M: Into<String>>(
        self,
        threshold: f64,
        metric: M,
    ) -> Self {
        self.add_condition(Condition::imbalance_ratio_less_than(threshold, metric))
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

impl TrainTestCheck for ClassPerformance {
    type Value = ResultTable;

    fn header(&self) -> &'static str {
        "Class Performance"
    }

    fn initialize_run(&mut self, context: &Context) -> Result<(), CheckError> {
        context.assert_task_type(TaskType::Classification)?;
        self.collector = Some(MetricCollector::new([TRAIN, TEST], &self.metrics));
        Ok(())
    }

    fn update(
        &mut self,
        _context: &Context,
        batch: &Batch,
        kind: DatasetKind,
    ) -> Result<(), CheckError> {
        let key = match kind {
            DatasetKind::Train => TRAIN,
            DatasetKind::Test => TEST,
        };
        self.collector
            .as_mut()
            .ok_or(CheckError::NotInitialized("update"))?
            .update_batch(key, batch)
    }

    fn compute(&mut self, context: &Context) -> Result<CheckResult<ResultTable>, CheckError> {
        let collector = self
            .collector
            .take()
            .ok_or(CheckError::NotInitialized("compute"))?;
        let train = collector.compute(TRAIN)?;
        let test = collector.compute(TEST)?;

        let table = aggregate([
            ModelMetrics {
                model_name: TRAIN,
                results: &train,
                dataset: &context.train,
            },
            ModelMetrics {
                model_name: TEST,
                results: &test,
                dataset: &context.test,
            },
        ])?;
        info!(
            "{}: {} rows from {} train and {} test samples",
            self.header(),
            table.len(),
            collector.samples(TRAIN)?,
            collector.samples(TEST)?
        );

        let display = context
            .with_display
            .then(|| self.selector.select(&table, TEST));
        let conditions = evaluate_conditions(&self.conditions, &table);
        Ok(CheckResult {
            header: self.header().to_string(),
            value: table,
            display,
            conditions,
        })
    }
}
