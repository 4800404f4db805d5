use crate::evaluation::metrics::class_metric::argmax;
use serde::Serialize;

/// Full confusion matrix: rows are true classes, columns the argmax prediction.
///
/// The matrix grows to fit the widest score vector or largest label seen.
/// Samples whose scores have no argmax are not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    cells: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    /// Square zero matrix of `num_classes` rows.
    pub fn new(num_classes: usize) -> Self {
        let mut m = Self::default();
        m.ensure_initialized(num_classes);
        m
    }

    #[inline]
    fn ensure_initialized(&mut self, k_hint: usize) {
        let k = self.cells.len();
        if k_hint > k {
            for row in &mut self.cells {
                row.resize(k_hint, 0);
            }
            self.cells.resize(k_hint, vec![0; k_hint]);
        }
    }

    pub fn update(&mut self, predictions: &[Vec<f64>], labels: &[usize]) {
        for (scores, &y) in predictions.iter().zip(labels) {
            self.ensure_initialized(scores.len().max(y + 1));
            if let Some(yhat) = argmax(scores) {
                self.cells[y][yhat] += 1;
            }
        }
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.cells.len()
    }

    /// Samples of true class `actual` predicted as `predicted`; `0` outside the matrix.
    pub fn get(&self, actual: usize, predicted: usize) -> u64 {
        self.cells
            .get(actual)
            .and_then(|row| row.get(predicted))
            .copied()
            .unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.cells
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    /// Off-diagonal cells as `(actual, predicted, count)`, row-major.
    pub fn misclassified(&self) -> impl Iterator<Item = (usize, usize, u64)> + '_ {
        self.cells.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(move |&(j, _)| i != j)
                .map(move |(j, &n)| (i, j, n))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::one_hot;

    #[test]
    fn counts_true_against_predicted() {
        let mut m = ConfusionMatrix::new(3);
        m.update(&[one_hot(0, 3), one_hot(2, 3), one_hot(1, 3)], &[0, 1, 1]);
        assert_eq!(m.rows(), &[vec![1, 0, 0], vec![0, 1, 1], vec![0, 0, 0]]);
        assert_eq!(m.total(), 3);
        assert_eq!(m.get(1, 2), 1);
        assert_eq!(m.get(7, 0), 0);
        assert_eq!(m.misclassified().filter(|c| c.2 > 0).collect::<Vec<_>>(), vec![(1, 2, 1)]);
    }

    #[test]
    fn grows_with_unseen_classes() {
        let mut m = ConfusionMatrix::new(2);
        m.update(&[one_hot(0, 2)], &[3]);
        assert_eq!(m.num_classes(), 4);
        assert_eq!(m.get(3, 0), 1);
        assert!(m.rows().iter().all(|r| r.len() == 4));
    }

    #[test]
    fn empty_scores_are_skipped() {
        let mut m = ConfusionMatrix::new(2);
        m.update(&[vec![]], &[1]);
        assert_eq!(m.total(), 0);
    }
}
