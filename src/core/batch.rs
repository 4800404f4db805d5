use crate::error::CheckError;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Which split a batch belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
pub enum DatasetKind {
    Train,
    Test,
}

/// One chunk of model output: a score vector per sample plus the true class id.
///
/// Every prediction row has the same width (the number of classes the model
/// scores), and there is exactly one label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    predictions: Vec<Vec<f64>>,
    labels: Vec<usize>,
}

impl Batch {
    pub fn new(predictions: Vec<Vec<f64>>, labels: Vec<usize>) -> Result<Self, CheckError> {
        if predictions.len() != labels.len() {
            return Err(CheckError::DataCompatibility(format!(
                "got {} predictions for {} labels",
                predictions.len(),
                labels.len()
            )));
        }
        if let Some(first) = predictions.first() {
            let width = first.len();
            if let Some(i) = predictions.iter().position(|p| p.len() != width) {
                return Err(CheckError::DataCompatibility(format!(
                    "prediction {i} has {} scores, expected {width}",
                    predictions[i].len()
                )));
            }
        }
        Ok(Self {
            predictions,
            labels,
        })
    }

    /// Builds a batch whose predictions are one-hot vectors of `predicted`.
    pub fn from_predicted_classes(
        predicted: &[usize],
        labels: Vec<usize>,
        num_classes: usize,
    ) -> Result<Self, CheckError> {
        let predictions = predicted
            .iter()
            .map(|&c| one_hot(c, num_classes))
            .collect();
        Self::new(predictions, labels)
    }

    #[inline]
    pub fn predictions(&self) -> &[Vec<f64>] {
        &self.predictions
    }

    #[inline]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Width of the prediction vectors, `0` for an empty batch.
    pub fn num_columns(&self) -> usize {
        self.predictions.first().map_or(0, Vec::len)
    }
}

/// `1.0` at `class`, `0.0` elsewhere. Out-of-range classes give an all-zero vector.
pub fn one_hot(class: usize, width: usize) -> Vec<f64> {
    let mut v = vec![0.0; width];
    if let Some(slot) = v.get_mut(class) {
        *slot = 1.0;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_length_mismatch() {
        let err = Batch::new(vec![vec![1.0, 0.0]], vec![0, 1]).unwrap_err();
        assert!(matches!(err, CheckError::DataCompatibility(_)));
    }

    #[test]
    fn rejects_ragged_predictions() {
        let err = Batch::new(vec![vec![1.0, 0.0], vec![1.0]], vec![0, 1]).unwrap_err();
        assert!(err.to_string().contains("prediction 1"));
    }

    #[test]
    fn one_hot_batch() {
        let b = Batch::from_predicted_classes(&[2, 0], vec![2, 1], 3).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b.num_columns(), 3);
        assert_eq!(b.predictions()[0], vec![0.0, 0.0, 1.0]);
        assert_eq!(b.predictions()[1], vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_batch_has_no_columns() {
        let b = Batch::new(vec![], vec![]).unwrap();
        assert!(b.is_empty());
        assert_eq!(b.num_columns(), 0);
    }

    #[test]
    fn dataset_kind_parses() {
        assert_eq!("Train".parse::<DatasetKind>().unwrap(), DatasetKind::Train);
        assert_eq!(DatasetKind::Test.to_string(), "Test");
    }
}
