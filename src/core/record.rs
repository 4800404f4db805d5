use serde::{Deserialize, Serialize};

pub const GIVEN_MODEL: &str = "Given Model";
pub const PERFECT_MODEL: &str = "Perfect Model";
pub const SIMPLE_MODEL: &str = "Simple Model";
pub const TRAIN: &str = "Train";
pub const TEST: &str = "Test";

/// Value of one metric for one class, as measured on one model (or split).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetricRecord {
    pub model_name: String,
    pub metric_name: String,
    pub class_id: usize,
    pub class_name: String,
    pub sample_count: usize,
    pub value: f64,
}

impl ClassMetricRecord {
    pub fn new<M: Into<String>, N: Into<String>, C: Into<String>>(
        model_name: M,
        metric_name: N,
        class_id: usize,
        class_name: C,
        sample_count: usize,
        value: f64,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            metric_name: metric_name.into(),
            class_id,
            class_name: class_name.into(),
            sample_count,
            value,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> (&str, &str, usize) {
        (&self.model_name, &self.metric_name, self.class_id)
    }
}
