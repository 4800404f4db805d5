use crate::checks::check::{CheckResult, TrainTestCheck, evaluate_conditions};
use crate::conditions::Condition;
use crate::core::{
    Batch, Context, DatasetKind, GIVEN_MODEL, PERFECT_MODEL, ResultTable, SIMPLE_MODEL, TaskType,
};
use crate::display::{ClassSelection, ClassSelector};
use crate::error::CheckError;
use crate::evaluation::{
    BaselineStrategy, MetricCollector, MetricResults, MetricSet, ModelMetrics, SimpleModel,
    aggregate, class_prior, labels_from_counts, perfect_predictions,
};
use log::info;

/// Compares the given model with a perfect oracle and a simple baseline on the test split.
///
/// Only test batches are scored. The baseline never sees the batches: its
/// labels and prior come from the class counts of the two splits.
pub struct SimpleModelComparison {
    strategy: BaselineStrategy,
    metrics: MetricSet,
    selector: ClassSelector,
    seed: Option<u64>,
    conditions: Vec<Condition>,
    collector: Option<MetricCollector>,
}

impl SimpleModelComparison {
    /// `alternative_metrics` replaces the default `F1` set when non-empty.
    /// The stratified baseline seeds from the OS unless [`Self::with_seed`] is used.
    pub fn new(
        strategy: BaselineStrategy,
        alternative_metrics: Option<MetricSet>,
        selection: ClassSelection,
    ) -> Result<Self, CheckError> {
        let alternative_metrics = alternative_metrics.filter(|m| !m.is_empty());
        let custom = alternative_metrics.is_some();
        let metrics = alternative_metrics.unwrap_or_else(MetricSet::f1);
        metrics.ensure_unique_names()?;
        let selector = ClassSelector::new(selection, &metrics, custom)?;
        Ok(Self {
            strategy,
            metrics,
            selector,
            seed: None,
            conditions: Vec::new(),
            collector: None,
        })
    }

    pub fn add_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn add_condition_gain_greater_than(self, min_allowed_gain: f64) -> Self {
        self.add_condition(Condition::gain_greater_than(min_allowed_gain))
    }

    /// Seeds the stratified baseline. Independent of the display selection seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn strategy(&self) -> BaselineStrategy {
        self.strategy
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    fn simple_model_results(&self, context: &Context) -> Result<MetricResults, CheckError> {
        let width = context.train.num_classes().max(context.test.num_classes());
        let labels = labels_from_counts(&context.test);
        let mut model = SimpleModel::new(
            self.strategy,
            class_prior(&context.train, width),
            self.seed,
        )?;
        let predictions = model.predict_many(labels.len());

        let mut collector = MetricCollector::new([SIMPLE_MODEL], &self.metrics);
        collector.update(SIMPLE_MODEL, &predictions, &labels)?;
        collector.compute(SIMPLE_MODEL)
    }
}

impl TrainTestCheck for SimpleModelComparison {
    type Value = ResultTable;

    fn header(&self) -> &'static str {
        "Simple Model Comparison"
    }

    fn initialize_run(&mut self, context: &Context) -> Result<(), CheckError> {
        context.assert_task_type(TaskType::Classification)?;
        self.collector = Some(MetricCollector::new(
            [GIVEN_MODEL, PERFECT_MODEL],
            &self.metrics,
        ));
        Ok(())
    }

    fn update(
        &mut self,
        context: &Context,
        batch: &Batch,
        kind: DatasetKind,
    ) -> Result<(), CheckError> {
        if kind != DatasetKind::Test {
            return Ok(());
        }
        let collector = self
            .collector
            .as_mut()
            .ok_or(CheckError::NotInitialized("update"))?;
        collector.update_batch(GIVEN_MODEL, batch)?;

        let width = batch.num_columns().max(context.test.num_classes());
        let perfect = perfect_predictions(batch.labels(), width);
        collector.update(PERFECT_MODEL, &perfect, batch.labels())
    }

    fn compute(&mut self, context: &Context) -> Result<CheckResult<ResultTable>, CheckError> {
        let collector = self
            .collector
            .take()
            .ok_or(CheckError::NotInitialized("compute"))?;
        let given = collector.compute(GIVEN_MODEL)?;
        let perfect = collector.compute(PERFECT_MODEL)?;
        let simple = self.simple_model_results(context)?;

        let table = aggregate([
            ModelMetrics {
                model_name: GIVEN_MODEL,
                results: &given,
                dataset: &context.test,
            },
            ModelMetrics {
                model_name: PERFECT_MODEL,
                results: &perfect,
                dataset: &context.test,
            },
            ModelMetrics {
                model_name: SIMPLE_MODEL,
                results: &simple,
                dataset: &context.test,
            },
        ])?;
        info!(
            "{}: {} rows from {} test samples ({} baseline)",
            self.header(),
            table.len(),
            collector.samples(GIVEN_MODEL)?,
            self.strategy
        );

        let display = context
            .with_display
            .then(|| self.selector.select(&table, GIVEN_MODEL));
        let conditions = evaluate_conditions(&self.conditions, &table);
        Ok(CheckResult {
            header: self.header().to_string(),
            value: table,
            display,
            conditions,
        })
    }
}
