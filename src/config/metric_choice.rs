use crate::config::Choice;
use crate::error::CheckError;
use crate::evaluation::MetricSet;
use crate::evaluation::metrics::{
    AveragePrecision, AverageRecall, ClassMetric, Fbeta, MetricFactory, Precision, Recall,
};
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_false() -> bool {
    false
}

fn default_beta() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct AverageParameters {
    #[serde(default = "default_false")]
    #[schemars(
        title = "Average",
        description = "Report the macro average instead of one value per class?",
        default = "default_false"
    )]
    pub average: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FbetaParameters {
    #[serde(default = "default_beta")]
    #[schemars(
        title = "Beta",
        description = "Weight of recall relative to precision (1 gives F1)",
        default = "default_beta",
        range(min = 0.0)
    )]
    pub beta: f64,

    #[serde(default = "default_false")]
    #[schemars(
        title = "Average",
        description = "Report the macro average instead of one value per class?",
        default = "default_false"
    )]
    pub average: bool,
}

impl Default for FbetaParameters {
    fn default() -> Self {
        Self {
            beta: default_beta(),
            average: default_false(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(MetricKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum MetricChoice {
    #[strum_discriminants(strum(message = "Precision", detailed_message = "tp / (tp + fp)"))]
    Precision(AverageParameters),

    #[strum_discriminants(strum(message = "Recall", detailed_message = "tp / (tp + fn)"))]
    Recall(AverageParameters),

    #[strum_discriminants(strum(
        message = "F-beta",
        detailed_message = "Weighted harmonic mean of precision and recall."
    ))]
    Fbeta(FbetaParameters),

    #[strum_discriminants(strum(
        message = "Average precision",
        detailed_message = "One-vs-rest area under the precision-recall curve."
    ))]
    AveragePrecision,

    #[strum_discriminants(strum(
        message = "Average recall",
        detailed_message = "One-vs-rest recall averaged over confidence thresholds 0.5 to 0.95."
    ))]
    AverageRecall,
}

impl MetricChoice {
    /// Factory building a fresh accumulator for every run.
    pub fn factory(&self) -> Result<MetricFactory, CheckError> {
        let factory: MetricFactory = match self.clone() {
            MetricChoice::Precision(p) if p.average => Arc::new(|| boxed(Precision::averaged())),
            MetricChoice::Precision(_) => Arc::new(|| boxed(Precision::new())),
            MetricChoice::Recall(p) if p.average => Arc::new(|| boxed(Recall::averaged())),
            MetricChoice::Recall(_) => Arc::new(|| boxed(Recall::new())),
            MetricChoice::Fbeta(p) => {
                if !(p.beta > 0.0 && p.beta.is_finite()) {
                    return Err(CheckError::ParameterOutOfRange {
                        name: "beta",
                        value: p.beta,
                        expected: "a finite number greater than 0",
                    });
                }
                Arc::new(move || boxed(Fbeta::new(p.beta, p.average)))
            }
            MetricChoice::AveragePrecision => Arc::new(|| boxed(AveragePrecision::new())),
            MetricChoice::AverageRecall => Arc::new(|| boxed(AverageRecall::new())),
        };
        Ok(factory)
    }
}

fn boxed<M: ClassMetric + 'static>(metric: M) -> Box<dyn ClassMetric> {
    Box::new(metric)
}

/// A metric under the name it is reported with.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NamedMetric {
    #[schemars(title = "Name", description = "Metric column in the result table")]
    pub name: String,
    pub metric: MetricChoice,
}

impl NamedMetric {
    pub fn new<N: Into<String>>(name: N, metric: MetricChoice) -> Self {
        Self {
            name: name.into(),
            metric,
        }
    }
}

/// `None` for an empty list, so the check falls back to its default metrics.
pub fn build_metric_set(metrics: &[NamedMetric]) -> Result<Option<MetricSet>, CheckError> {
    if metrics.is_empty() {
        return Ok(None);
    }
    let mut set = MetricSet::new();
    for m in metrics {
        set = set.with_factory(m.name.as_str(), m.metric.factory()?);
    }
    set.ensure_unique_names()?;
    Ok(Some(set))
}

impl Choice for MetricChoice {
    type Kind = MetricKind;

    fn schema() -> Schema {
        schema_for!(MetricChoice)
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            MetricKind::Precision | MetricKind::Recall => {
                serde_json::to_value(AverageParameters::default()).unwrap_or_default()
            }
            MetricKind::Fbeta => {
                serde_json::to_value(FbetaParameters::default()).unwrap_or_default()
            }
            MetricKind::AveragePrecision | MetricKind::AverageRecall => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::one_hot;
    use crate::evaluation::MetricValue;
    use serde_json::json;
    use strum::EnumMessage;

    #[test]
    fn tagged_serialization() {
        let v = serde_json::to_value(MetricChoice::Fbeta(FbetaParameters::default())).unwrap();
        assert_eq!(v, json!({"type": "fbeta", "params": {"beta": 1.0, "average": false}}));

        let v = serde_json::to_value(MetricChoice::AveragePrecision).unwrap();
        assert_eq!(v, json!({"type": "average-precision"}));
    }

    #[test]
    fn missing_params_apply_defaults() {
        let m: MetricChoice =
            serde_json::from_value(json!({"type": "precision", "params": {}})).unwrap();
        assert_eq!(m, MetricChoice::Precision(AverageParameters { average: false }));
    }

    #[test]
    fn default_params_rebuild_the_choice() {
        let v = MetricChoice::default_params(MetricKind::Fbeta);
        let rebuilt = MetricChoice::from_parts(MetricKind::Fbeta, v).unwrap();
        assert_eq!(rebuilt, MetricChoice::Fbeta(FbetaParameters::default()));
    }

    #[test]
    fn factories_build_independent_metrics() {
        let f = MetricChoice::Recall(AverageParameters::default())
            .factory()
            .unwrap();
        let mut a = f();
        let b = f();
        a.update(&[one_hot(0, 2)], &[0]);
        match a.compute() {
            MetricValue::PerClass(v) => {
                assert_eq!(v[0], 1.0);
                assert!(v[1].is_nan());
            }
            other => panic!("expected per-class values, got {other:?}"),
        }
        assert_eq!(b.compute(), MetricValue::PerClass(vec![]));
    }

    #[test]
    fn averaged_precision_is_scalar() {
        let f = MetricChoice::Precision(AverageParameters { average: true })
            .factory()
            .unwrap();
        let mut m = f();
        m.update(&[one_hot(0, 2), one_hot(1, 2)], &[0, 1]);
        assert_eq!(m.compute(), MetricValue::Scalar(1.0));
    }

    #[test]
    fn non_positive_beta_is_rejected() {
        let choice = MetricChoice::Fbeta(FbetaParameters {
            beta: 0.0,
            average: false,
        });
        let err = choice.factory().err().unwrap();
        assert!(err.to_string().contains("beta"));
    }

    #[test]
    fn metric_set_keeps_names_and_order() {
        let set = build_metric_set(&[
            NamedMetric::new("ap", MetricChoice::AveragePrecision),
            NamedMetric::new(
                "f2",
                MetricChoice::Fbeta(FbetaParameters {
                    beta: 2.0,
                    average: false,
                }),
            ),
        ])
        .unwrap()
        .unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["ap", "f2"]);
        assert!(build_metric_set(&[]).unwrap().is_none());
    }

    #[test]
    fn kinds_have_messages() {
        assert_eq!(MetricKind::AverageRecall.get_message(), Some("Average recall"));
        assert_eq!(MetricChoice::catalog().len(), 5);
    }
}
