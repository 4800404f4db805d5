use crate::error::CheckError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};
use strum_macros::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, StrumDisplay, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ConditionCategory {
    Pass,
    Fail,
    Error,
}

/// Verdict of one condition on one check result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionOutcome {
    pub name: String,
    pub category: ConditionCategory,
    pub message: String,
}

impl ConditionOutcome {
    pub fn new<N: Into<String>, M: Into<String>>(
        name: N,
        category: ConditionCategory,
        message: M,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        self.category == ConditionCategory::Pass
    }

    /// Turns the result of a condition body into an outcome; an error becomes
    /// an `ERROR` outcome carrying the error text.
    pub fn from_result<N: Into<String>>(
        name: N,
        result: std::result::Result<(ConditionCategory, String), CheckError>,
    ) -> Self {
        let name = name.into();
        match result {
            Ok((category, message)) => Self::new(name, category, message),
            Err(e) => {
                warn!("condition \"{name}\" could not be evaluated: {e}");
                Self::new(name, ConditionCategory::Error, e.to_string())
            }
        }
    }
}

impl Display for ConditionOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[{}] {}: {}", self.category, self.name, self.message)
    }
}

/// A pass/fail predicate over the value `V` computed by a check.
pub trait CheckCondition<V> {
    fn name(&self) -> String;

    /// Never fails: problems surface as an `ERROR` outcome.
    fn evaluate(&self, value: &V) -> ConditionOutcome;
}
