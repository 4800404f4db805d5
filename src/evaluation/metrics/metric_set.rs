use crate::error::CheckError;
use crate::evaluation::metrics::{ClassMetric, Fbeta, Precision, Recall};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

pub type MetricFactory = Arc<dyn Fn() -> Box<dyn ClassMetric> + Send + Sync>;

/// Ordered, named recipe for the metrics a check reports.
///
/// The set holds factories rather than metric instances, so every run (and
/// every model inside a run) starts from freshly built accumulators.
#[derive(Clone, Default)]
pub struct MetricSet {
    entries: Vec<(String, MetricFactory)>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<N, F, M>(mut self, name: N, factory: F) -> Self
    where
        N: Into<String>,
        F: Fn() -> M + Send + Sync + 'static,
        M: ClassMetric + 'static,
    {
        self.entries.push((
            name.into(),
            Arc::new(move || Box::new(factory()) as Box<dyn ClassMetric>),
        ));
        self
    }

    pub fn with_factory<N: Into<String>>(mut self, name: N, factory: MetricFactory) -> Self {
        self.entries.push((name.into(), factory));
        self
    }

    /// `F1` only.
    pub fn f1() -> Self {
        Self::new().with("F1", Fbeta::f1)
    }

    /// `Precision` and `Recall`.
    pub fn precision_recall() -> Self {
        Self::new()
            .with("Precision", Precision::new)
            .with("Recall", Recall::new)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Result rows are keyed by metric name, so a name may appear only once.
    pub fn ensure_unique_names(&self) -> Result<(), CheckError> {
        let mut seen = HashSet::new();
        match self.names().find(|n| !seen.insert(*n)) {
            Some(dup) => Err(CheckError::DuplicateMetric(dup.to_string())),
            None => Ok(()),
        }
    }

    pub fn instantiate(&self) -> Vec<(String, Box<dyn ClassMetric>)> {
        self.entries
            .iter()
            .map(|(n, f)| (n.clone(), f()))
            .collect()
    }
}

impl fmt::Debug for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
