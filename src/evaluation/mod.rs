mod aggregate;
mod baseline;
mod collector;
mod estimators;
pub mod metrics;

pub use aggregate::{ModelMetrics, aggregate};
pub use baseline::{
    BaselineStrategy, SimpleModel, class_prior, labels_from_counts, perfect_predictions,
};
pub use collector::{MetricCollector, MetricResults};
pub use estimators::{BasicEstimator, Estimator};
pub use metrics::{ClassMetric, MetricSet, MetricValue};
