use crate::core::{DatasetInfo, one_hot};
use crate::error::CheckError;
use crate::evaluation::metrics::argmax;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// How the simple (non-learned) model turns the training class prior into predictions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BaselineStrategy {
    /// One-hot at the most frequent training class.
    #[default]
    MostFrequent,
    /// The class prior itself.
    Prior,
    /// One-hot vectors drawn from `Multinomial(1, prior)`.
    Stratified,
    /// Equal score for every class.
    Uniform,
}

impl BaselineStrategy {
    pub const ALLOWED: &'static [&'static str] = &["most_frequent", "prior", "stratified", "uniform"];

    pub fn parse(name: &str) -> Result<Self, CheckError> {
        name.parse().map_err(|_| CheckError::UnknownStrategy {
            given: name.to_string(),
            allowed: Self::ALLOWED,
        })
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

/// Fraction of training samples per class; classes unseen in training get `0`.
pub fn class_prior(train: &DatasetInfo, num_classes: usize) -> Vec<f64> {
    let width = num_classes.max(train.num_classes());
    let mut prior = vec![0.0; width];
    let total = train.n_samples();
    if total == 0 {
        return prior;
    }
    for (&c, &n) in train.n_of_samples_per_class() {
        prior[c] = n as f64 / total as f64;
    }
    prior
}

/// Test labels rebuilt from per-class counts, grouped by ascending class id.
pub fn labels_from_counts(dataset: &DatasetInfo) -> Vec<usize> {
    dataset
        .n_of_samples_per_class()
        .iter()
        .flat_map(|(&c, &n)| std::iter::repeat_n(c, n))
        .collect()
}

/// One-hot of every true label, `width` wide.
pub fn perfect_predictions(labels: &[usize], width: usize) -> Vec<Vec<f64>> {
    labels.iter().map(|&y| one_hot(y, width)).collect()
}

/// Generator of baseline score vectors for a fixed strategy and prior.
#[derive(Debug)]
pub struct SimpleModel {
    strategy: BaselineStrategy,
    prior: Vec<f64>,
    sampler: Option<WeightedIndex<f64>>,
    rng: StdRng,
}

impl SimpleModel {
    /// `seed` only matters for [`BaselineStrategy::Stratified`]; without one the
    /// RNG is seeded from the OS and the draws differ between runs.
    pub fn new(
        strategy: BaselineStrategy,
        prior: Vec<f64>,
        seed: Option<u64>,
    ) -> Result<Self, CheckError> {
        if prior.iter().sum::<f64>() <= 0.0 {
            return Err(CheckError::DataCompatibility(
                "class prior is empty: the train dataset has no labeled samples".into(),
            ));
        }
        let sampler = match strategy {
            BaselineStrategy::Stratified => Some(
                WeightedIndex::new(&prior)
                    .map_err(|e| CheckError::DataCompatibility(format!("invalid class prior: {e}")))?,
            ),
            _ => None,
        };
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            strategy,
            prior,
            sampler,
            rng,
        })
    }

    #[inline]
    pub fn strategy(&self) -> BaselineStrategy {
        self.strategy
    }

    pub fn predict(&mut self) -> Vec<f64> {
        let k = self.prior.len();
        match self.strategy {
            BaselineStrategy::MostFrequent => match argmax(&self.prior) {
                Some(c) => one_hot(c, k),
                None => vec![0.0; k],
            },
            BaselineStrategy::Prior => self.prior.clone(),
            BaselineStrategy::Stratified => match &self.sampler {
                Some(dist) => one_hot(dist.sample(&mut self.rng), k),
                None => vec![0.0; k],
            },
            BaselineStrategy::Uniform => vec![1.0 / k as f64; k],
        }
    }

    pub fn predict_many(&mut self, n: usize) -> Vec<Vec<f64>> {
        (0..n).map(|_| self.predict()).collect()
    }
}
