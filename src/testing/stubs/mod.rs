mod scalar_metric;

pub use scalar_metric::ScalarMetric;
