use crate::error::CheckError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskType {
    Classification,
    ObjectDetection,
    Other,
}

/// Static description of one split: task, class count and per-class sample counts.
///
/// Classes never seen in the split have no entry in `n_of_samples_per_class`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    task_type: TaskType,
    num_classes: usize,
    n_of_samples_per_class: BTreeMap<usize, usize>,
    class_names: BTreeMap<usize, String>,
}

impl DatasetInfo {
    pub fn new(
        task_type: TaskType,
        num_classes: usize,
        n_of_samples_per_class: BTreeMap<usize, usize>,
    ) -> Self {
        let max_seen = n_of_samples_per_class
            .keys()
            .next_back()
            .map_or(0, |&c| c + 1);
        Self {
            task_type,
            num_classes: num_classes.max(max_seen),
            n_of_samples_per_class,
            class_names: BTreeMap::new(),
        }
    }

    /// Classification split built by counting `labels`.
    pub fn from_labels(labels: &[usize], num_classes: usize) -> Self {
        let mut counts = BTreeMap::new();
        for &y in labels {
            *counts.entry(y).or_insert(0) += 1;
        }
        Self::new(TaskType::Classification, num_classes, counts)
    }

    pub fn with_class_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        self.class_names = names.into_iter().map(|(c, n)| (c, n.into())).collect();
        self
    }

    #[inline]
    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn n_of_samples_per_class(&self) -> &BTreeMap<usize, usize> {
        &self.n_of_samples_per_class
    }

    pub fn samples_of(&self, class_id: usize) -> Option<usize> {
        self.n_of_samples_per_class.get(&class_id).copied()
    }

    pub fn n_samples(&self) -> usize {
        self.n_of_samples_per_class.values().sum()
    }

    /// Display name of a class, falling back to its id.
    pub fn class_name(&self, class_id: usize) -> String {
        self.class_names
            .get(&class_id)
            .cloned()
            .unwrap_or_else(|| class_id.to_string())
    }
}

/// Everything a check may know about the run besides the batches themselves.
#[derive(Debug, Clone)]
pub struct Context {
    pub train: DatasetInfo,
    pub test: DatasetInfo,
    pub with_display: bool,
}

impl Context {
    pub fn new(train: DatasetInfo, test: DatasetInfo) -> Self {
        Self {
            train,
            test,
            with_display: true,
        }
    }

    pub fn without_display(mut self) -> Self {
        self.with_display = false;
        self
    }

    pub fn dataset(&self, kind: crate::core::DatasetKind) -> &DatasetInfo {
        match kind {
            crate::core::DatasetKind::Train => &self.train,
            crate::core::DatasetKind::Test => &self.test,
        }
    }

    pub fn assert_task_type(&self, expected: TaskType) -> Result<(), CheckError> {
        for (kind, ds) in [("train", &self.train), ("test", &self.test)] {
            if ds.task_type != expected {
                return Err(CheckError::DataCompatibility(format!(
                    "check is relevant for {expected} tasks, but the {kind} dataset is {}",
                    ds.task_type
                )));
            }
        }
        Ok(())
    }
}
