use crate::core::{ClassMetricRecord, DatasetInfo, ResultTable};
use crate::error::CheckError;
use crate::evaluation::MetricResults;

/// Computed metrics of one model together with the split they were measured on.
pub struct ModelMetrics<'a> {
    pub model_name: &'a str,
    pub results: &'a MetricResults,
    pub dataset: &'a DatasetInfo,
}

/// Flattens per-model metric vectors into one [`ResultTable`].
///
/// A class contributes a row only when its value is a number and the split
/// has samples of it. Rows are then ordered by model name and value, both
/// descending, keeping insertion order on ties.
pub fn aggregate<'a, I>(entries: I) -> Result<ResultTable, CheckError>
where
    I: IntoIterator<Item = ModelMetrics<'a>>,
{
    let mut records = Vec::new();
    for entry in entries {
        for (metric, values) in entry.results {
            for (class_id, &value) in values.iter().enumerate() {
                if value.is_nan() {
                    continue;
                }
                let Some(samples) = entry.dataset.samples_of(class_id) else {
                    continue;
                };
                records.push(ClassMetricRecord::new(
                    entry.model_name,
                    metric.as_str(),
                    class_id,
                    entry.dataset.class_name(class_id),
                    samples,
                    value,
                ));
            }
        }
    }
    let mut table = ResultTable::from_records(records)?;
    table.sort_by_model_and_value();
    Ok(table)
}
