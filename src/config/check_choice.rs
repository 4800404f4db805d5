use crate::conditions::{Condition, MisclassifiedSamplesLowerThan, NewLabelRatioLessOrEqual};
use crate::config::{Choice, NamedMetric};
use anyhow::Context;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_n_to_show() -> Option<usize> {
    Some(20)
}

fn default_show_only() -> String {
    "largest".into()
}

fn default_strategy() -> String {
    "most_frequent".into()
}

/// Display options as they appear in configuration files.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SelectionParameters {
    #[serde(default = "default_n_to_show")]
    #[schemars(
        title = "Classes to show",
        description = "Number of classes to display; null shows every class",
        default = "default_n_to_show"
    )]
    pub n_to_show: Option<usize>,

    #[serde(default = "default_show_only")]
    #[schemars(
        title = "Show only",
        description = "largest, smallest, random, best or worst",
        default = "default_show_only"
    )]
    pub show_only: String,

    #[serde(default)]
    #[schemars(
        title = "Ranking metric",
        description = "Metric used by best/worst; required with several custom metrics"
    )]
    pub metric_to_show_by: Option<String>,

    #[serde(default)]
    #[schemars(
        title = "Classes",
        description = "Explicit class ids to display; overrides the other options"
    )]
    pub class_list_to_show: Option<Vec<usize>>,

    #[serde(default)]
    #[schemars(
        title = "Seed",
        description = "Seed for show_only = random"
    )]
    pub seed: Option<u64>,
}

impl Default for SelectionParameters {
    fn default() -> Self {
        Self {
            n_to_show: default_n_to_show(),
            show_only: default_show_only(),
            metric_to_show_by: None,
            class_list_to_show: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SimpleModelComparisonParameters {
    #[serde(default = "default_strategy")]
    #[schemars(
        title = "Simple model strategy",
        description = "most_frequent, prior, stratified or uniform",
        default = "default_strategy"
    )]
    pub strategy: String,

    #[serde(default)]
    #[schemars(
        title = "Alternative metrics",
        description = "Replaces the default F1 metric when not empty"
    )]
    pub alternative_metrics: Vec<NamedMetric>,

    #[serde(flatten)]
    pub selection: SelectionParameters,

    #[serde(default)]
    #[schemars(
        title = "Random state",
        description = "Seed for the stratified simple model; independent of the display seed"
    )]
    pub random_state: Option<u64>,

    #[serde(default)]
    #[schemars(title = "Conditions")]
    pub conditions: Vec<Condition>,
}

impl Default for SimpleModelComparisonParameters {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            alternative_metrics: Vec::new(),
            selection: SelectionParameters::default(),
            random_state: None,
            conditions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct ClassPerformanceParameters {
    #[serde(default)]
    #[schemars(
        title = "Alternative metrics",
        description = "Replaces the default Precision and Recall metrics when not empty"
    )]
    pub alternative_metrics: Vec<NamedMetric>,

    #[serde(flatten)]
    pub selection: SelectionParameters,

    #[serde(default)]
    #[schemars(title = "Conditions")]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct NewLabelParameters {
    #[serde(default)]
    #[schemars(title = "Conditions")]
    pub conditions: Vec<NewLabelRatioLessOrEqual>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct ConfusionMatrixParameters {
    #[serde(default)]
    #[schemars(title = "Conditions")]
    pub conditions: Vec<MisclassifiedSamplesLowerThan>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(CheckKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum CheckChoice {
    #[strum_discriminants(strum(
        message = "Simple Model Comparison",
        detailed_message = "Per-class gain of the model over a perfect oracle and a simple baseline."
    ))]
    SimpleModelComparison(SimpleModelComparisonParameters),

    #[strum_discriminants(strum(
        message = "Class Performance",
        detailed_message = "Per-class scores on the train and test splits."
    ))]
    ClassPerformance(ClassPerformanceParameters),

    #[strum_discriminants(strum(
        message = "New Label Train Test",
        detailed_message = "Labels found in the test split but never in the train split."
    ))]
    NewLabelTrainTest(NewLabelParameters),

    #[strum_discriminants(strum(
        message = "Confusion Matrix Report",
        detailed_message = "Confusion matrix of the model on the test split."
    ))]
    ConfusionMatrixReport(ConfusionMatrixParameters),
}

impl CheckChoice {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid check configuration")
    }

    pub fn kind(&self) -> CheckKind {
        self.into()
    }
}

impl Choice for CheckChoice {
    type Kind = CheckKind;

    fn schema() -> Schema {
        schema_for!(CheckChoice)
    }

    fn default_params(kind: Self::Kind) -> Value {
        let params = match kind {
            CheckKind::SimpleModelComparison => {
                serde_json::to_value(SimpleModelComparisonParameters::default())
            }
            CheckKind::ClassPerformance => {
                serde_json::to_value(ClassPerformanceParameters::default())
            }
            CheckKind::NewLabelTrainTest => serde_json::to_value(NewLabelParameters::default()),
            CheckKind::ConfusionMatrixReport => {
                serde_json::to_value(ConfusionMatrixParameters::default())
            }
        };
        params.unwrap_or_default()
    }
}
