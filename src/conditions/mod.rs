mod condition;
mod degradation;
mod gain;
mod imbalance;
mod misclassified;
mod new_label;
mod outcome;
mod score;

pub use condition::{
    Condition, ConditionKind, DegradationParameters, GainParameters, ImbalanceParameters,
    ScoreParameters,
};
pub use degradation::relative_degradation;
pub use gain::get_gain;
pub use imbalance::imbalance_ratio;
pub use misclassified::MisclassifiedSamplesLowerThan;
pub use new_label::NewLabelRatioLessOrEqual;
pub use outcome::{CheckCondition, ConditionCategory, ConditionOutcome};
