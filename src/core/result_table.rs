use crate::core::ClassMetricRecord;
use crate::error::CheckError;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub enum TableFormat {
    Csv,
    Tsv,
    Json,
}

/// Ordered rows of [`ClassMetricRecord`], unique on (model, metric, class).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<ClassMetricRecord>,
}

impl ResultTable {
    pub fn from_records<I>(records: I) -> Result<Self, CheckError>
    where
        I: IntoIterator<Item = ClassMetricRecord>,
    {
        let mut table = Self::default();
        for r in records {
            table.push(r)?;
        }
        Ok(table)
    }

    pub(crate) fn push(&mut self, record: ClassMetricRecord) -> Result<(), CheckError> {
        if self.rows.iter().any(|r| r.key() == record.key()) {
            return Err(CheckError::DuplicateRecord {
                model: record.model_name,
                metric: record.metric_name,
                class_id: record.class_id,
            });
        }
        self.rows.push(record);
        Ok(())
    }

    /// Stable sort by model name, then value, both descending.
    pub(crate) fn sort_by_model_and_value(&mut self) {
        self.rows.sort_by(|a, b| {
            b.model_name
                .cmp(&a.model_name)
                .then_with(|| b.value.total_cmp(&a.value))
        });
    }

    #[inline]
    pub fn rows(&self) -> &[ClassMetricRecord] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassMetricRecord> {
        self.rows.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows matching `pred`, in table order.
    pub fn filter<F>(&self, pred: F) -> ResultTable
    where
        F: Fn(&ClassMetricRecord) -> bool,
    {
        ResultTable {
            rows: self.rows.iter().filter(|r| pred(r)).cloned().collect(),
        }
    }

    pub fn rows_for_model<'a>(
        &'a self,
        model: &'a str,
    ) -> impl Iterator<Item = &'a ClassMetricRecord> + 'a {
        self.rows.iter().filter(move |r| r.model_name == model)
    }

    pub fn value_of(&self, model: &str, metric: &str, class_id: usize) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.model_name == model && r.metric_name == metric && r.class_id == class_id)
            .map(|r| r.value)
    }

    /// Metric names of `model`, in order of first appearance.
    pub fn metrics_of(&self, model: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows_for_model(model)
            .filter(|r| seen.insert(r.metric_name.as_str()))
            .map(|r| r.metric_name.clone())
            .collect()
    }

    pub fn classes(&self) -> BTreeSet<usize> {
        self.rows.iter().map(|r| r.class_id).collect()
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, fmt: TableFormat) -> Result<(), CheckError> {
        match fmt {
            TableFormat::Csv => self.export_with_delimiter(path, ','),
            TableFormat::Tsv => self.export_with_delimiter(path, '\t'),
            TableFormat::Json => self.export_json(path),
        }
    }

    fn export_with_delimiter<P: AsRef<Path>>(
        &self,
        path: P,
        delimiter: char,
    ) -> Result<(), CheckError> {
        let mut w = BufWriter::new(File::create(path)?);
        writeln!(
            w,
            "model{d}metric{d}class{d}class_name{d}samples{d}value",
            d = delimiter
        )?;
        for r in &self.rows {
            writeln!(
                w,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{:.12}",
                r.model_name,
                r.metric_name,
                r.class_id,
                r.class_name,
                r.sample_count,
                r.value,
                d = delimiter
            )?;
        }
        w.flush()?;
        Ok(())
    }

    fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckError> {
        let w = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(w, self)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ClassMetricRecord;
    type IntoIter = std::slice::Iter<'a, ClassMetricRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    fn rec(model: &str, metric: &str, class_id: usize, value: f64) -> ClassMetricRecord {
        ClassMetricRecord::new(model, metric, class_id, class_id.to_string(), 10, value)
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let err = ResultTable::from_records([rec("A", "F1", 0, 0.5), rec("A", "F1", 0, 0.7)])
            .unwrap_err();
        assert!(matches!(err, CheckError::DuplicateRecord { class_id: 0, .. }));
    }

    #[test]
    fn same_class_in_other_model_is_fine() {
        let t = ResultTable::from_records([rec("A", "F1", 0, 0.5), rec("B", "F1", 0, 0.7)])
            .unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn sort_is_model_then_value_descending_and_stable() {
        let mut t = ResultTable::from_records([
            rec("Given Model", "F1", 0, 0.2),
            rec("Simple Model", "F1", 0, 0.1),
            rec("Given Model", "F1", 1, 0.9),
            rec("Given Model", "F1", 2, 0.2),
            rec("Perfect Model", "F1", 0, 1.0),
        ])
        .unwrap();
        t.sort_by_model_and_value();
        let order: Vec<(&str, usize)> = t
            .iter()
            .map(|r| (r.model_name.as_str(), r.class_id))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Simple Model", 0),
                ("Perfect Model", 0),
                ("Given Model", 1),
                ("Given Model", 0),
                ("Given Model", 2),
            ]
        );
    }

    #[test]
    fn metrics_of_keeps_first_appearance_order() {
        let t = ResultTable::from_records([
            rec("A", "Recall", 0, 0.5),
            rec("A", "Precision", 0, 0.5),
            rec("A", "Recall", 1, 0.5),
            rec("B", "Other", 0, 0.5),
        ])
        .unwrap();
        assert_eq!(t.metrics_of("A"), vec!["Recall", "Precision"]);
        assert_eq!(t.value_of("B", "Other", 0), Some(0.5));
        assert_eq!(t.value_of("B", "Other", 1), None);
    }

    #[test]
    fn export_csv() {
        let t = ResultTable::from_records([rec("A", "F1", 1, 0.25)]).unwrap();
        let tf = NamedTempFile::new().unwrap();
        t.export(tf.path(), TableFormat::Csv).unwrap();
        let got = fs::read_to_string(tf.path()).unwrap();
        let exp = "\
model,metric,class,class_name,samples,value
A,F1,1,1,10,0.250000000000
";
        assert_eq!(got, exp);
    }

    #[test]
    fn export_tsv_empty() {
        let t = ResultTable::default();
        let tf = NamedTempFile::new().unwrap();
        t.export(tf.path(), TableFormat::Tsv).unwrap();
        let got = fs::read_to_string(tf.path()).unwrap();
        assert_eq!(got, "model\tmetric\tclass\tclass_name\tsamples\tvalue\n");
    }

    #[test]
    fn export_json_is_array_of_records() {
        let t = ResultTable::from_records([rec("A", "F1", 1, 0.25)]).unwrap();
        let tf = NamedTempFile::new().unwrap();
        t.export(tf.path(), TableFormat::Json).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tf.path()).unwrap()).unwrap();
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["model_name"], "A");
        assert_eq!(arr[0]["value"], 0.25);
    }
}
