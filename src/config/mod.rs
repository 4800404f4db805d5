mod build;
mod check_choice;
mod choice;
mod metric_choice;

pub use build::{CheckValue, ConfiguredCheck, build_check, load_check};
pub use check_choice::{
    CheckChoice, CheckKind, ClassPerformanceParameters, ConfusionMatrixParameters,
    NewLabelParameters, SelectionParameters, SimpleModelComparisonParameters,
};
pub use choice::Choice;
pub use metric_choice::{
    AverageParameters, FbetaParameters, MetricChoice, MetricKind, NamedMetric, build_metric_set,
};
