mod class_metric;
mod confusion;
mod confusion_matrix;
mod confusion_metrics;
mod metric_set;
mod ranking_metrics;

pub use class_metric::{ClassMetric, MetricValue};
pub(crate) use class_metric::argmax;
pub use confusion_matrix::ConfusionMatrix;
pub use confusion_metrics::{Fbeta, Precision, Recall};
pub use metric_set::{MetricFactory, MetricSet};
pub use ranking_metrics::{AveragePrecision, AverageRecall};
