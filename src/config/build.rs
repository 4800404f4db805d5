use crate::checks::{
    CheckResult, ClassPerformance, ConfusionMatrixReport, NewLabelReport, NewLabelTrainTest,
    SimpleModelComparison, run_check,
};
use crate::conditions::{Condition, ConditionKind};
use crate::config::{
    CheckChoice, CheckKind, ClassPerformanceParameters, ConfusionMatrixParameters,
    NewLabelParameters, SelectionParameters, SimpleModelComparisonParameters, build_metric_set,
};
use crate::core::{Batch, Context, DatasetKind, ResultTable};
use crate::display::{ClassSelection, ShowOnly};
use crate::error::CheckError;
use crate::evaluation::BaselineStrategy;
use crate::evaluation::metrics::ConfusionMatrix;
use serde::Serialize;

impl TryFrom<SelectionParameters> for ClassSelection {
    type Error = CheckError;

    fn try_from(p: SelectionParameters) -> Result<Self, Self::Error> {
        Ok(ClassSelection {
            n_to_show: p.n_to_show,
            show_only: ShowOnly::parse(&p.show_only)?,
            metric_to_show_by: p.metric_to_show_by,
            class_list_to_show: p.class_list_to_show,
            seed: p.seed,
        })
    }
}

fn ensure_supported(
    check: CheckKind,
    condition: &Condition,
    supported: &[ConditionKind],
) -> Result<(), CheckError> {
    let kind = condition.kind();
    if supported.contains(&kind) {
        Ok(())
    } else {
        Err(CheckError::UnsupportedCondition {
            check: check.into(),
            condition: kind.to_string(),
        })
    }
}

impl TryFrom<SimpleModelComparisonParameters> for SimpleModelComparison {
    type Error = CheckError;

    fn try_from(p: SimpleModelComparisonParameters) -> Result<Self, Self::Error> {
        let strategy = BaselineStrategy::parse(&p.strategy)?;
        let metrics = build_metric_set(&p.alternative_metrics)?;
        let mut check = SimpleModelComparison::new(strategy, metrics, p.selection.try_into()?)?;
        if let Some(seed) = p.random_state {
            check = check.with_seed(seed);
        }
        for condition in p.conditions {
            ensure_supported(
                CheckKind::SimpleModelComparison,
                &condition,
                &[ConditionKind::GainGreaterThan],
            )?;
            check = check.add_condition(condition);
        }
        Ok(check)
    }
}

impl TryFrom<ClassPerformanceParameters> for ClassPerformance {
    type Error = CheckError;

    fn try_from(p: ClassPerformanceParameters) -> Result<Self, Self::Error> {
        let metrics = build_metric_set(&p.alternative_metrics)?;
        let mut check = ClassPerformance::new(metrics, p.selection.try_into()?)?;
        for condition in p.conditions {
            ensure_supported(
                CheckKind::ClassPerformance,
                &condition,
                &[
                    ConditionKind::TestPerformanceGreaterThan,
                    ConditionKind::TrainTestDegradationLessThan,
                    ConditionKind::ImbalanceRatioLessThan,
                ],
            )?;
            check = check.add_condition(condition);
        }
        Ok(check)
    }
}

impl TryFrom<NewLabelParameters> for NewLabelTrainTest {
    type Error = CheckError;

    fn try_from(p: NewLabelParameters) -> Result<Self, Self::Error> {
        Ok(p.conditions
            .into_iter()
            .fold(NewLabelTrainTest::new(), |check, c| {
                check.add_condition_new_labels_ratio_less_or_equal(c.max_ratio)
            }))
    }
}

impl From<ConfusionMatrixParameters> for ConfusionMatrixReport {
    fn from(p: ConfusionMatrixParameters) -> Self {
        p.conditions
            .into_iter()
            .fold(ConfusionMatrixReport::new(), ConfusionMatrixReport::add_condition)
    }
}

/// Value of any configured check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckValue {
    Table(ResultTable),
    NewLabels(NewLabelReport),
    ConfusionMatrix(ConfusionMatrix),
}

/// A check built from a [`CheckChoice`].
pub enum ConfiguredCheck {
    SimpleModelComparison(SimpleModelComparison),
    ClassPerformance(ClassPerformance),
    NewLabelTrainTest(NewLabelTrainTest),
    ConfusionMatrixReport(ConfusionMatrixReport),
}

impl ConfiguredCheck {
    pub fn run<I>(
        &mut self,
        context: &Context,
        batches: I,
    ) -> Result<CheckResult<CheckValue>, CheckError>
    where
        I: IntoIterator<Item = (DatasetKind, Batch)>,
    {
        match self {
            ConfiguredCheck::SimpleModelComparison(c) => {
                Ok(run_check(c, context, batches)?.map_value(CheckValue::Table))
            }
            ConfiguredCheck::ClassPerformance(c) => {
                Ok(run_check(c, context, batches)?.map_value(CheckValue::Table))
            }
            ConfiguredCheck::NewLabelTrainTest(c) => {
                Ok(run_check(c, context, batches)?.map_value(CheckValue::NewLabels))
            }
            ConfiguredCheck::ConfusionMatrixReport(c) => {
                Ok(run_check(c, context, batches)?.map_value(CheckValue::ConfusionMatrix))
            }
        }
    }
}

pub fn build_check(choice: CheckChoice) -> Result<ConfiguredCheck, CheckError> {
    match choice {
        CheckChoice::SimpleModelComparison(p) => {
            Ok(ConfiguredCheck::SimpleModelComparison(p.try_into()?))
        }
        CheckChoice::ClassPerformance(p) => Ok(ConfiguredCheck::ClassPerformance(p.try_into()?)),
        CheckChoice::NewLabelTrainTest(p) => Ok(ConfiguredCheck::NewLabelTrainTest(p.try_into()?)),
        CheckChoice::ConfusionMatrixReport(p) => Ok(ConfiguredCheck::ConfusionMatrixReport(p.into())),
    }
}

/// Parses and builds a check from its JSON configuration.
pub fn load_check(json: &str) -> anyhow::Result<ConfiguredCheck> {
    let choice = CheckChoice::from_json(json)?;
    Ok(build_check(choice)?)
}
