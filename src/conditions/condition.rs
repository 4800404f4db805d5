use crate::conditions::{CheckCondition, ConditionCategory, ConditionOutcome};
use crate::conditions::{degradation, gain, imbalance, score};
use crate::core::ResultTable;
use crate::error::{CheckError, ensure_unit_interval};
use crate::utils::{format_number, format_percent};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

pub(crate) type Verdict = Result<(ConditionCategory, String), CheckError>;

fn default_min_allowed_gain() -> f64 {
    0.1
}

fn default_max_gain() -> f64 {
    50.0
}

fn default_degradation() -> f64 {
    0.1
}

fn default_imbalance() -> f64 {
    0.3
}

fn default_metric() -> String {
    "F1".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GainParameters {
    #[serde(default = "default_min_allowed_gain")]
    #[schemars(
        title = "Minimum gain",
        description = "Minimum allowed gain over the simple model, in [0, 1]",
        default = "default_min_allowed_gain"
    )]
    pub min_allowed_gain: f64,

    #[serde(default = "default_max_gain")]
    #[schemars(
        title = "Maximum gain",
        description = "Gain is clipped to [-max_gain, max_gain]",
        default = "default_max_gain"
    )]
    pub max_gain: f64,

    #[serde(default)]
    #[schemars(title = "Classes", description = "Restrict the condition to these class ids")]
    pub classes: Option<Vec<usize>>,

    #[serde(default)]
    #[schemars(
        title = "Average",
        description = "Test the class-averaged scores once per metric instead of every class"
    )]
    pub average: bool,
}

impl Default for GainParameters {
    fn default() -> Self {
        Self {
            min_allowed_gain: default_min_allowed_gain(),
            max_gain: default_max_gain(),
            classes: None,
            average: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct ScoreParameters {
    #[schemars(title = "Minimum score", description = "Every test score must be above this")]
    pub min_score: f64,

    #[serde(default)]
    #[schemars(title = "Classes", description = "Restrict the condition to these class ids")]
    pub classes: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DegradationParameters {
    #[serde(default = "default_degradation")]
    #[schemars(
        title = "Threshold",
        description = "Maximum relative train-to-test degradation, in [0, 1]",
        default = "default_degradation"
    )]
    pub threshold: f64,

    #[serde(default)]
    #[schemars(title = "Classes", description = "Restrict the condition to these class ids")]
    pub classes: Option<Vec<usize>>,

    #[serde(default)]
    #[schemars(
        title = "Average",
        description = "Compare class-averaged scores once per metric instead of every class"
    )]
    pub average: bool,
}

impl Default for DegradationParameters {
    fn default() -> Self {
        Self {
            threshold: default_degradation(),
            classes: None,
            average: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ImbalanceParameters {
    #[serde(default = "default_imbalance")]
    #[schemars(
        title = "Threshold",
        description = "Maximum (max - min) / max ratio between classes, in [0, 1]",
        default = "default_imbalance"
    )]
    pub threshold: f64,

    #[serde(default = "default_metric")]
    #[schemars(title = "Metric", default = "default_metric")]
    pub metric: String,
}

impl Default for ImbalanceParameters {
    fn default() -> Self {
        Self {
            threshold: default_imbalance(),
            metric: default_metric(),
        }
    }
}

/// Threshold predicate over a per-class [`ResultTable`], with its parameters bound as data.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(ConditionKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum Condition {
    #[strum_discriminants(strum(
        message = "Gain over simple model",
        detailed_message = "Given model gain over the simple model must exceed a minimum."
    ))]
    GainGreaterThan(GainParameters),

    #[strum_discriminants(strum(
        message = "Test performance",
        detailed_message = "Every test score must be greater than a minimum."
    ))]
    TestPerformanceGreaterThan(ScoreParameters),

    #[strum_discriminants(strum(
        message = "Train-test degradation",
        detailed_message = "Relative drop from train to test scores must stay below a threshold."
    ))]
    TrainTestDegradationLessThan(DegradationParameters),

    #[strum_discriminants(strum(
        message = "Class imbalance ratio",
        detailed_message = "Spread between best and worst class score must stay below a threshold."
    ))]
    ImbalanceRatioLessThan(ImbalanceParameters),
}

impl Condition {
    pub fn gain_greater_than(min_allowed_gain: f64) -> Self {
        Condition::GainGreaterThan(GainParameters {
            min_allowed_gain,
            ..GainParameters::default()
        })
    }

    pub fn test_performance_greater_than(min_score: f64) -> Self {
        Condition::TestPerformanceGreaterThan(ScoreParameters {
            min_score,
            classes: None,
        })
    }

    pub fn train_test_degradation_less_than(threshold: f64) -> Self {
        Condition::TrainTestDegradationLessThan(DegradationParameters {
            threshold,
            ..DegradationParameters::default()
        })
    }

    pub fn imbalance_ratio_less_than<M: Into<String>>(threshold: f64, metric: M) -> Self {
        Condition::ImbalanceRatioLessThan(ImbalanceParameters {
            threshold,
            metric: metric.into(),
        })
    }

    /// Restricts the condition to `classes` (no effect on the imbalance ratio).
    pub fn for_classes(mut self, classes: Vec<usize>) -> Self {
        match &mut self {
            Condition::GainGreaterThan(p) => p.classes = Some(classes),
            Condition::TestPerformanceGreaterThan(p) => p.classes = Some(classes),
            Condition::TrainTestDegradationLessThan(p) => p.classes = Some(classes),
            Condition::ImbalanceRatioLessThan(_) => {}
        }
        self
    }

    /// Switches to class-averaged evaluation where supported.
    pub fn averaged(mut self) -> Self {
        match &mut self {
            Condition::GainGreaterThan(p) => p.average = true,
            Condition::TrainTestDegradationLessThan(p) => p.average = true,
            _ => {}
        }
        self
    }

    pub fn kind(&self) -> ConditionKind {
        self.into()
    }

    fn validate(&self) -> Result<(), CheckError> {
        match self {
            Condition::GainGreaterThan(p) => {
                ensure_unit_interval("min_allowed_gain", p.min_allowed_gain)?;
                if p.max_gain.is_nan() || p.max_gain <= 0.0 {
                    return Err(CheckError::ParameterOutOfRange {
                        name: "max_gain",
                        value: p.max_gain,
                        expected: "greater than 0",
                    });
                }
                Ok(())
            }
            Condition::TestPerformanceGreaterThan(p) => {
                if p.min_score.is_finite() {
                    Ok(())
                } else {
                    Err(CheckError::ParameterOutOfRange {
                        name: "min_score",
                        value: p.min_score,
                        expected: "a finite number",
                    })
                }
            }
            Condition::TrainTestDegradationLessThan(p) => {
                ensure_unit_interval("threshold", p.threshold)
            }
            Condition::ImbalanceRatioLessThan(p) => ensure_unit_interval("threshold", p.threshold),
        }
    }
}

impl CheckCondition<ResultTable> for Condition {
    fn name(&self) -> String {
        match self {
            Condition::GainGreaterThan(p) => {
                let mut name = format!(
                    "Model performance gain over simple model is greater than {}",
                    format_percent(p.min_allowed_gain, 2)
                );
                if let Some(classes) = &p.classes {
                    name.push_str(&format!(" for classes {classes:?}"));
                }
                name
            }
            Condition::TestPerformanceGreaterThan(p) => {
                format!("Scores are greater than {}", format_number(p.min_score, 2))
            }
            Condition::TrainTestDegradationLessThan(p) => format!(
                "Train-Test scores relative degradation is less than {}",
                p.threshold
            ),
            Condition::ImbalanceRatioLessThan(p) => format!(
                "Relative ratio difference between labels '{}' score is less than {}",
                p.metric,
                format_percent(p.threshold, 2)
            ),
        }
    }

    fn evaluate(&self, table: &ResultTable) -> ConditionOutcome {
        let verdict = self.validate().and_then(|_| match self {
            Condition::GainGreaterThan(p) => gain::evaluate(table, p),
            Condition::TestPerformanceGreaterThan(p) => score::evaluate(table, p),
            Condition::TrainTestDegradationLessThan(p) => degradation::evaluate(table, p),
            Condition::ImbalanceRatioLessThan(p) => imbalance::evaluate(table, p),
        });
        ConditionOutcome::from_result(self.name(), verdict)
    }
}

/// Value of `(model, metric, class)` or a [`CheckError::MissingValue`] naming it.
pub(crate) fn lookup(
    table: &ResultTable,
    model: &str,
    metric: &str,
    class_id: usize,
) -> Result<f64, CheckError> {
    table.value_of(model, metric, class_id).ok_or_else(|| {
        CheckError::MissingValue(format!(
            "no {model} score for metric {metric} and class {class_id}"
        ))
    })
}

#[inline]
pub(crate) fn included(classes: &Option<Vec<usize>>, class_id: usize) -> bool {
    classes.as_ref().is_none_or(|c| c.contains(&class_id))
}

/// `{metric: {class: value, ...}, ...}`
pub(crate) fn format_failures(fails: &[(String, Vec<(String, String)>)]) -> String {
    let body: Vec<String> = fails
        .iter()
        .map(|(metric, classes)| {
            let inner: Vec<String> = classes.iter().map(|(c, v)| format!("{c}: {v}")).collect();
            format!("{metric}: {{{}}}", inner.join(", "))
        })
        .collect();
    format!("{{{}}}", body.join(", "))
}
