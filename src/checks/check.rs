use crate::conditions::{CheckCondition, ConditionOutcome};
use crate::core::{Batch, Context, DatasetKind, ResultTable};
use crate::error::CheckError;
use log::info;
use serde::Serialize;

/// Output of one check run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult<V> {
    pub header: String,
    pub value: V,
    /// Rows selected for display; `None` when the run had display disabled
    /// or the check has nothing tabular to show.
    pub display: Option<ResultTable>,
    pub conditions: Vec<ConditionOutcome>,
}

impl<V> CheckResult<V> {
    /// True when every condition passed (vacuously true without conditions).
    pub fn passed_conditions(&self) -> bool {
        self.conditions.iter().all(ConditionOutcome::is_pass)
    }

    pub fn map_value<U, F: FnOnce(V) -> U>(self, f: F) -> CheckResult<U> {
        CheckResult {
            header: self.header,
            value: f(self.value),
            display: self.display,
            conditions: self.conditions,
        }
    }
}

/// A check that consumes train and test batches and produces one result.
///
/// The driver calls [`initialize_run`](TrainTestCheck::initialize_run) once,
/// then [`update`](TrainTestCheck::update) for every batch in order, then
/// [`compute`](TrainTestCheck::compute) once. State built by `initialize_run`
/// belongs to that run only.
pub trait TrainTestCheck {
    type Value;

    fn header(&self) -> &'static str;

    fn initialize_run(&mut self, context: &Context) -> Result<(), CheckError>;

    fn update(
        &mut self,
        context: &Context,
        batch: &Batch,
        kind: DatasetKind,
    ) -> Result<(), CheckError>;

    fn compute(&mut self, context: &Context) -> Result<CheckResult<Self::Value>, CheckError>;
}

/// Evaluates every condition independently; one failing body never hides the others.
pub fn evaluate_conditions<V, C>(conditions: &[C], value: &V) -> Vec<ConditionOutcome>
where
    C: CheckCondition<V>,
{
    conditions.iter().map(|c| c.evaluate(value)).collect()
}

/// Runs `check` over `batches` sequentially.
pub fn run_check<C, I>(
    check: &mut C,
    context: &Context,
    batches: I,
) -> Result<CheckResult<C::Value>, CheckError>
where
    C: TrainTestCheck + ?Sized,
    I: IntoIterator<Item = (DatasetKind, Batch)>,
{
    info!("running check \"{}\"", check.header());
    check.initialize_run(context)?;

    let mut processed = [0usize; 2];
    for (kind, batch) in batches {
        check.update(context, &batch, kind)?;
        processed[kind as usize] += batch.len();
    }
    info!(
        "check \"{}\": {} train and {} test samples processed",
        check.header(),
        processed[DatasetKind::Train as usize],
        processed[DatasetKind::Test as usize]
    );

    let result = check.compute(context)?;
    let failed = result.conditions.iter().filter(|c| !c.is_pass()).count();
    if failed > 0 {
        info!(
            "check \"{}\": {failed} of {} conditions did not pass",
            check.header(),
            result.conditions.len()
        );
    }
    Ok(result)
}
