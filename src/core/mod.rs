mod batch;
mod dataset;
mod record;
mod result_table;

pub use batch::{Batch, DatasetKind, one_hot};
pub use dataset::{Context, DatasetInfo, TaskType};
pub use record::{ClassMetricRecord, GIVEN_MODEL, PERFECT_MODEL, SIMPLE_MODEL, TEST, TRAIN};
pub use result_table::{ResultTable, TableFormat};
