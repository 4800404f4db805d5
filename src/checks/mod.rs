mod check;
mod class_performance;
mod confusion_matrix_report;
mod new_label;
mod simple_model_comparison;

pub use check::{CheckResult, TrainTestCheck, evaluate_conditions, run_check};
pub use class_performance::ClassPerformance;
pub use confusion_matrix_report::ConfusionMatrixReport;
pub use new_label::{NewLabelReport, NewLabelTrainTest};
pub use simple_model_comparison::SimpleModelComparison;
