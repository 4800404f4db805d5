use crate::core::{ClassMetricRecord, ResultTable};
use crate::error::CheckError;
use crate::evaluation::MetricSet;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Which classes to keep when only `n` of them are displayed.
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
pub enum ShowOnly {
    /// Most samples first.
    #[default]
    Largest,
    /// Fewest samples first.
    Smallest,
    /// Uniform sample without replacement.
    Random,
    /// Highest ranking-metric value first.
    Best,
    /// Lowest ranking-metric value first.
    Worst,
}

impl ShowOnly {
    pub const ALLOWED: &'static [&'static str] = &["largest", "smallest", "random", "best", "worst"];

    pub fn parse(name: &str) -> Result<Self, CheckError> {
        name.parse().map_err(|_| CheckError::InvalidShowOnly {
            given: name.to_string(),
            allowed: Self::ALLOWED,
        })
    }

    #[inline]
    fn ranks_by_score(self) -> bool {
        matches!(self, ShowOnly::Best | ShowOnly::Worst)
    }
}

/// Display options shared by the per-class checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassSelection {
    /// Number of classes to show; `None` shows them all.
    pub n_to_show: Option<usize>,
    pub show_only: ShowOnly,
    /// Metric used by `best`/`worst`.
    pub metric_to_show_by: Option<String>,
    /// Explicit classes; overrides every other option.
    pub class_list_to_show: Option<Vec<usize>>,
    /// Seed for `random`.
    pub seed: Option<u64>,
}

impl Default for ClassSelection {
    fn default() -> Self {
        Self {
            n_to_show: Some(20),
            show_only: ShowOnly::Largest,
            metric_to_show_by: None,
            class_list_to_show: None,
            seed: None,
        }
    }
}

/// Picks the subset of a [`ResultTable`] handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct ClassSelector {
    selection: ClassSelection,
    ranking_metric: Option<String>,
}

impl ClassSelector {
    /// Validates the selection against the metrics the check will report.
    ///
    /// `custom_metrics` tells whether `metrics` were supplied by the user; in
    /// that case ranking by score over several metrics needs an explicit
    /// `metric_to_show_by`. Otherwise the first metric is used.
    pub fn new(
        selection: ClassSelection,
        metrics: &MetricSet,
        custom_metrics: bool,
    ) -> Result<Self, CheckError> {
        let ranking_metric = match (&selection.class_list_to_show, &selection.metric_to_show_by) {
            (Some(_), m) => m.clone(),
            (None, Some(m)) => Some(m.clone()),
            (None, None) => {
                if selection.show_only.ranks_by_score() && custom_metrics && metrics.len() > 1 {
                    return Err(CheckError::MissingRankingMetric);
                }
                metrics.names().next().map(str::to_string)
            }
        };
        if let Some(given) = &selection.metric_to_show_by {
            if !metrics.names().any(|m| m == given) {
                return Err(CheckError::UnknownRankingMetric {
                    given: given.clone(),
                    available: metrics.names().map(str::to_string).collect(),
                });
            }
        }
        if selection.class_list_to_show.is_none()
            && selection.show_only.ranks_by_score()
            && ranking_metric.is_none()
        {
            return Err(CheckError::MissingRankingMetric);
        }
        Ok(Self {
            selection,
            ranking_metric,
        })
    }

    pub fn selection(&self) -> &ClassSelection {
        &self.selection
    }

    pub fn ranking_metric(&self) -> Option<&str> {
        self.ranking_metric.as_deref()
    }

    /// Rows of every model and metric whose class was selected.
    ///
    /// Classes of `primary_model` are ranked first; classes only other models
    /// report fill the remaining slots.
    pub fn select(&self, table: &ResultTable, primary_model: &str) -> ResultTable {
        if let Some(list) = &self.selection.class_list_to_show {
            let keep: HashSet<usize> = list.iter().copied().collect();
            return table.filter(|r| keep.contains(&r.class_id));
        }
        let Some(n) = self.selection.n_to_show else {
            return table.clone();
        };

        let chosen: HashSet<usize> = self.rank(table, primary_model).into_iter().take(n).collect();
        debug!(
            "selector: {} of {} classes kept by {}",
            chosen.len(),
            table.classes().len(),
            self.selection.show_only
        );
        table.filter(|r| chosen.contains(&r.class_id))
    }

    /// Candidate class ids in display priority order.
    fn rank(&self, table: &ResultTable, primary_model: &str) -> Vec<usize> {
        match self.selection.show_only {
            ShowOnly::Largest => ordered_classes(table, primary_model, true, |r| {
                Some(r.sample_count as f64)
            }),
            ShowOnly::Smallest => ordered_classes(table, primary_model, false, |r| {
                Some(r.sample_count as f64)
            }),
            ShowOnly::Random => {
                let classes: Vec<usize> = table.classes().into_iter().collect();
                let mut rng = match self.selection.seed {
                    Some(s) => StdRng::seed_from_u64(s),
                    None => StdRng::from_os_rng(),
                };
                let amount = self.selection.n_to_show.unwrap_or(classes.len()).min(classes.len());
                index::sample(&mut rng, classes.len(), amount)
                    .into_iter()
                    .map(|i| classes[i])
                    .collect()
            }
            ShowOnly::Best | ShowOnly::Worst => {
                let metric = self.ranking_metric.as_deref();
                let descending = self.selection.show_only == ShowOnly::Best;
                ordered_classes(table, primary_model, descending, |r| {
                    (Some(r.metric_name.as_str()) == metric).then_some(r.value)
                })
            }
        }
    }
}

/// Distinct class ids: first those of `primary_model` sorted by `key`, then
/// those only other models report sorted the same way, then every class
/// `key` gives no value for, in order of appearance. Ties keep table order.
fn ordered_classes<F>(
    table: &ResultTable,
    primary_model: &str,
    descending: bool,
    key: F,
) -> Vec<usize>
where
    F: Fn(&ClassMetricRecord) -> Option<f64>,
{
    let mut seen = HashSet::new();
    let mut groups: [Vec<(usize, f64)>; 2] = [Vec::new(), Vec::new()];
    for (group, is_primary) in [(0, true), (1, false)] {
        for r in table.iter().filter(|r| (r.model_name == primary_model) == is_primary) {
            if let Some(k) = key(r) {
                if seen.insert(r.class_id) {
                    groups[group].push((r.class_id, k));
                }
            }
        }
    }
    let mut out = Vec::new();
    for mut group in groups {
        if descending {
            group.sort_by(|a, b| b.1.total_cmp(&a.1));
        } else {
            group.sort_by(|a, b| a.1.total_cmp(&b.1));
        }
        out.extend(group.into_iter().map(|(c, _)| c));
    }
    out.extend(table.iter().map(|r| r.class_id).filter(|&c| seen.insert(c)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClassMetricRecord;
    use crate::evaluation::metrics::{Precision, Recall};

    fn table() -> ResultTable {
        // class: samples, given value
        let given = [(0, 50, 0.9), (1, 10, 0.2), (2, 30, 0.5), (3, 5, 0.95)];
        let mut rows = Vec::new();
        for (c, n, v) in given {
            rows.push(ClassMetricRecord::new("Given Model", "F1", c, c.to_string(), n, v));
            rows.push(ClassMetricRecord::new("Simple Model", "F1", c, c.to_string(), n, 0.1));
        }
        ResultTable::from_records(rows).unwrap()
    }

    fn selector(n: Option<usize>, show_only: ShowOnly) -> ClassSelector {
        let sel = ClassSelection {
            n_to_show: n,
            show_only,
            ..ClassSelection::default()
        };
        ClassSelector::new(sel, &MetricSet::f1(), false).unwrap()
    }

    fn classes(t: &ResultTable) -> Vec<usize> {
        t.classes().into_iter().collect()
    }

    #[test]
    fn invalid_show_only_name() {
        let err = ShowOnly::parse("median").unwrap_err();
        assert!(matches!(err, CheckError::InvalidShowOnly { .. }));
        assert_eq!(ShowOnly::parse("worst").unwrap(), ShowOnly::Worst);
    }

    #[test]
    fn largest_and_smallest() {
        let t = table();
        assert_eq!(classes(&selector(Some(2), ShowOnly::Largest).select(&t, "Given Model")), vec![0, 2]);
        assert_eq!(classes(&selector(Some(2), ShowOnly::Smallest).select(&t, "Given Model")), vec![1, 3]);
    }

    #[test]
    fn selection_keeps_all_models_of_chosen_classes() {
        let t = table();
        let out = selector(Some(1), ShowOnly::Largest).select(&t, "Given Model");
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.class_id == 0));
    }

    #[test]
    fn largest_is_idempotent_and_bounded() {
        let t = table();
        for k in 0..6 {
            let s = selector(Some(k), ShowOnly::Largest);
            let once = s.select(&t, "Given Model");
            assert_eq!(once.classes().len(), k.min(4));
            let twice = s.select(&once, "Given Model");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn best_and_worst_rank_on_primary_model() {
        let t = table();
        assert_eq!(classes(&selector(Some(2), ShowOnly::Best).select(&t, "Given Model")), vec![0, 3]);
        assert_eq!(classes(&selector(Some(2), ShowOnly::Worst).select(&t, "Given Model")), vec![1, 2]);
    }

    #[test]
    fn random_with_seed_is_reproducible() {
        let t = table();
        let sel = ClassSelection {
            n_to_show: Some(3),
            show_only: ShowOnly::Random,
            seed: Some(11),
            ..ClassSelection::default()
        };
        let s = ClassSelector::new(sel, &MetricSet::f1(), false).unwrap();
        let a = s.select(&t, "Given Model");
        let b = s.select(&t, "Given Model");
        assert_eq!(a.classes().len(), 3);
        assert_eq!(a, b);
    }

    #[test]
    fn explicit_list_wins_over_n() {
        let t = table();
        let sel = ClassSelection {
            n_to_show: Some(1),
            class_list_to_show: Some(vec![1, 3]),
            ..ClassSelection::default()
        };
        let s = ClassSelector::new(sel, &MetricSet::f1(), false).unwrap();
        assert_eq!(classes(&s.select(&t, "Given Model")), vec![1, 3]);
    }

    #[test]
    fn no_limit_returns_everything() {
        let t = table();
        assert_eq!(selector(None, ShowOnly::Best).select(&t, "Given Model"), t);
    }

    #[test]
    fn several_custom_metrics_need_a_ranking_metric() {
        let metrics = MetricSet::new()
            .with("p", Precision::new)
            .with("r", Recall::new);
        let sel = ClassSelection {
            show_only: ShowOnly::Worst,
            ..ClassSelection::default()
        };
        let err = ClassSelector::new(sel.clone(), &metrics, true).unwrap_err();
        assert!(matches!(err, CheckError::MissingRankingMetric));

        // default metrics fall back to the first one
        let s = ClassSelector::new(sel.clone(), &metrics, false).unwrap();
        assert_eq!(s.ranking_metric(), Some("p"));

        let explicit = ClassSelection {
            metric_to_show_by: Some("r".into()),
            ..sel
        };
        let s = ClassSelector::new(explicit, &metrics, true).unwrap();
        assert_eq!(s.ranking_metric(), Some("r"));
    }

    fn split_table() -> ResultTable {
        // class 2 only exists in train, and is its largest class
        let mut rows = Vec::new();
        for (split, classes) in [("Test", &[(0, 40), (1, 20)][..]), ("Train", &[(0, 30), (1, 10), (2, 90)][..])] {
            for &(c, n) in classes {
                rows.push(ClassMetricRecord::new(split, "Recall", c, c.to_string(), n, 0.5));
            }
        }
        ResultTable::from_records(rows).unwrap()
    }

    #[test]
    fn classes_missing_from_primary_model_fill_remaining_slots() {
        let t = split_table();
        for (k, expected) in [(1, vec![0]), (2, vec![0, 1]), (3, vec![0, 1, 2]), (5, vec![0, 1, 2])] {
            let out = selector(Some(k), ShowOnly::Largest).select(&t, "Test");
            assert_eq!(classes(&out), expected, "n_to_show = {k}");
            assert_eq!(out.classes().len(), k.min(t.classes().len()));
        }
        let out = selector(Some(3), ShowOnly::Smallest).select(&t, "Test");
        assert_eq!(classes(&out), vec![0, 1, 2]);
    }

    #[test]
    fn best_fills_from_other_models_too() {
        let t = split_table();
        let sel = ClassSelection {
            n_to_show: Some(3),
            show_only: ShowOnly::Best,
            metric_to_show_by: Some("Recall".into()),
            ..ClassSelection::default()
        };
        let metrics = MetricSet::new().with("Recall", Recall::new);
        let s = ClassSelector::new(sel, &metrics, true).unwrap();
        assert_eq!(classes(&s.select(&t, "Test")), vec![0, 1, 2]);
    }

    #[test]
    fn unknown_ranking_metric_is_rejected() {
        let sel = ClassSelection {
            show_only: ShowOnly::Best,
            metric_to_show_by: Some("Recal".into()),
            ..ClassSelection::default()
        };
        let err = ClassSelector::new(sel, &MetricSet::precision_recall(), false).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "metric_to_show_by Recal is not one of the check metrics [\"Precision\", \"Recall\"]"
        );
    }
}
