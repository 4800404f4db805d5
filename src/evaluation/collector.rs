use crate::core::Batch;
use crate::error::CheckError;
use crate::evaluation::metrics::{ClassMetric, MetricSet, MetricValue};
use log::debug;

/// Computed metrics of one model: `(metric name, value per class id)` in registration order.
pub type MetricResults = Vec<(String, Vec<f64>)>;

struct ModelAccumulator {
    name: String,
    metrics: Vec<(String, Box<dyn ClassMetric>)>,
    samples: usize,
}

/// Runs the same metric set over several models side by side.
///
/// Typical keys are the evaluated model plus its counterfactuals (a perfect
/// oracle, a simple baseline) or the train and test splits of one model. The
/// collector is owned by a single run; nothing is shared between collectors.
pub struct MetricCollector {
    models: Vec<ModelAccumulator>,
}

impl MetricCollector {
    pub fn new<I, S>(model_keys: I, metrics: &MetricSet) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models = model_keys
            .into_iter()
            .map(|k| ModelAccumulator {
                name: k.into(),
                metrics: metrics.instantiate(),
                samples: 0,
            })
            .collect();
        Self { models }
    }

    fn model_mut(&mut self, key: &str) -> Result<&mut ModelAccumulator, CheckError> {
        self.models
            .iter_mut()
            .find(|m| m.name == key)
            .ok_or_else(|| CheckError::UnknownModel(key.to_string()))
    }

    fn model(&self, key: &str) -> Result<&ModelAccumulator, CheckError> {
        self.models
            .iter()
            .find(|m| m.name == key)
            .ok_or_else(|| CheckError::UnknownModel(key.to_string()))
    }

    pub fn update(
        &mut self,
        model_key: &str,
        predictions: &[Vec<f64>],
        labels: &[usize],
    ) -> Result<(), CheckError> {
        if predictions.len() != labels.len() {
            return Err(CheckError::DataCompatibility(format!(
                "got {} predictions for {} labels",
                predictions.len(),
                labels.len()
            )));
        }
        let model = self.model_mut(model_key)?;
        for (_, metric) in model.metrics.iter_mut() {
            metric.update(predictions, labels);
        }
        model.samples += labels.len();
        debug!(
            "collector: {model_key} += {} samples ({} total)",
            labels.len(),
            model.samples
        );
        Ok(())
    }

    pub fn update_batch(&mut self, model_key: &str, batch: &Batch) -> Result<(), CheckError> {
        self.update(model_key, batch.predictions(), batch.labels())
    }

    /// Samples seen so far by `model_key`.
    pub fn samples(&self, model_key: &str) -> Result<usize, CheckError> {
        Ok(self.model(model_key)?.samples)
    }

    pub fn model_keys(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }

    /// Per-class values of every metric of `model_key`.
    ///
    /// Fails with [`CheckError::MetricShape`] when a metric reports a single
    /// scalar instead of one value per class.
    pub fn compute(&self, model_key: &str) -> Result<MetricResults, CheckError> {
        self.model(model_key)?
            .metrics
            .iter()
            .map(|(name, metric)| match metric.compute() {
                MetricValue::PerClass(v) => Ok((name.clone(), v)),
                MetricValue::Scalar(_) => Err(CheckError::MetricShape {
                    metric: name.clone(),
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::one_hot;
    use crate::evaluation::metrics::{Precision, Recall};

    fn collector() -> MetricCollector {
        MetricCollector::new(["a", "b"], &MetricSet::precision_recall())
    }

    #[test]
    fn models_accumulate_independently() {
        let mut c = collector();
        c.update("a", &[one_hot(0, 2), one_hot(1, 2)], &[0, 1]).unwrap();
        c.update("b", &[one_hot(1, 2), one_hot(1, 2)], &[0, 1]).unwrap();

        let a = c.compute("a").unwrap();
        let b = c.compute("b").unwrap();
        assert_eq!(a[1].0, "Recall");
        assert_eq!(a[1].1, vec![1.0, 1.0]);
        assert_eq!(b[1].1, vec![0.0, 1.0]);
        assert_eq!(c.samples("a").unwrap(), 2);
    }

    #[test]
    fn unknown_model_is_an_error() {
        let mut c = collector();
        let err = c.update("zzz", &[], &[]).unwrap_err();
        assert!(matches!(err, CheckError::UnknownModel(k) if k == "zzz"));
        assert!(c.compute("zzz").is_err());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut c = collector();
        let err = c.update("a", &[one_hot(0, 2)], &[0, 1]).unwrap_err();
        assert!(matches!(err, CheckError::DataCompatibility(_)));
    }

    #[test]
    fn scalar_metric_is_a_shape_error_naming_the_metric() {
        let set = MetricSet::new()
            .with("r", Recall::new)
            .with("p", Precision::averaged);
        let mut c = MetricCollector::new(["m"], &set);
        c.update("m", &[one_hot(0, 2)], &[0]).unwrap();
        let err = c.compute("m").unwrap_err();
        assert!(matches!(&err, CheckError::MetricShape { metric } if metric == "p"));
    }

    #[test]
    fn keys_keep_order() {
        let c = collector();
        assert_eq!(c.model_keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
