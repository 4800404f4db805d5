use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("unknown strategy type: {given}, expected one of {allowed:?}")]
    UnknownStrategy {
        given: String,
        allowed: &'static [&'static str],
    },

    #[error("invalid value for show_only: {given}, should be one of {allowed:?}")]
    InvalidShowOnly {
        given: String,
        allowed: &'static [&'static str],
    },

    #[error(
        "when several metrics are provided and show_only is one of [\"best\", \"worst\"], metric_to_show_by must be specified"
    )]
    MissingRankingMetric,

    #[error("metric_to_show_by {given} is not one of the check metrics {available:?}")]
    UnknownRankingMetric {
        given: String,
        available: Vec<String>,
    },

    #[error("metric name {0} is used more than once")]
    DuplicateMetric(String),

    #[error("parameter {name} must be {expected}, got {value}")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("condition {condition} cannot be attached to the {check} check")]
    UnsupportedCondition {
        check: &'static str,
        condition: String,
    },

    #[error("the metric {metric} returned a scalar instead of a per-class array")]
    MetricShape { metric: String },

    #[error("{0} was called before initialize_run")]
    NotInitialized(&'static str),

    #[error("unknown model key: {0}")]
    UnknownModel(String),

    #[error("missing value: {0}")]
    MissingValue(String),

    #[error("data compatibility: {0}")]
    DataCompatibility(String),

    #[error("duplicate record for model {model}, metric {metric}, class {class_id}")]
    DuplicateRecord {
        model: String,
        metric: String,
        class_id: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CheckError {
    /// True for the errors that describe an invalid check setup rather than bad data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CheckError::UnknownStrategy { .. }
                | CheckError::InvalidShowOnly { .. }
                | CheckError::MissingRankingMetric
                | CheckError::UnknownRankingMetric { .. }
                | CheckError::DuplicateMetric(_)
                | CheckError::ParameterOutOfRange { .. }
                | CheckError::UnsupportedCondition { .. }
        )
    }
}

/// Checks that `value` lies in `[0, 1]`.
pub fn ensure_unit_interval(name: &'static str, value: f64) -> Result<(), CheckError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CheckError::ParameterOutOfRange {
            name,
            value,
            expected: "between 0 and 1",
        })
    }
}
