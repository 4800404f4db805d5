use crate::conditions::ConditionCategory;
use crate::conditions::condition::{
    GainParameters, Verdict, format_failures, included, lookup,
};
use crate::core::{GIVEN_MODEL, PERFECT_MODEL, ResultTable, SIMPLE_MODEL};
use crate::evaluation::{BasicEstimator, Estimator};
use crate::utils::format_percent;

/// Improvement of `score` over `base_score`, relative to the room left up to
/// `perfect_score`, clipped to `[-max_gain, max_gain]`. Zero when the baseline
/// is already perfect.
pub fn get_gain(base_score: f64, score: f64, perfect_score: f64, max_gain: f64) -> f64 {
    let room = perfect_score - base_score;
    if room == 0.0 {
        return 0.0;
    }
    ((score - base_score) / room).clamp(-max_gain, max_gain)
}

/// Smallest gain seen so far, with the message describing where.
#[derive(Default)]
struct MinGain(Option<(f64, String)>);

impl MinGain {
    fn update(&mut self, gain: f64, metric: &str, class_name: Option<&str>) {
        if self.0.as_ref().is_some_and(|(g, _)| *g <= gain) {
            return;
        }
        let mut msg = format!(
            "Found minimal gain of {} for metric {metric}",
            format_percent(gain, 2)
        );
        if let Some(c) = class_name {
            msg.push_str(&format!(" and class {c}"));
        }
        self.0 = Some((gain, msg));
    }

    fn into_message(self) -> String {
        self.0.map(|(_, m)| m).unwrap_or_else(|| {
            "No gain was computed: every evaluated score equals the perfect score".into()
        })
    }
}

pub(crate) fn evaluate(table: &ResultTable, p: &GainParameters) -> Verdict {
    if p.average {
        averaged(table, p)
    } else {
        per_class(table, p)
    }
}

fn per_class(table: &ResultTable, p: &GainParameters) -> Verdict {
    let mut min_gain = MinGain::default();
    let mut fails = Vec::new();

    for metric in table.metrics_of(GIVEN_MODEL) {
        let mut failed_classes = Vec::new();
        for row in table
            .rows_for_model(GIVEN_MODEL)
            .filter(|r| r.metric_name == metric && included(&p.classes, r.class_id))
        {
            let perfect = lookup(table, PERFECT_MODEL, &metric, row.class_id)?;
            if row.value == perfect {
                continue;
            }
            let simple = lookup(table, SIMPLE_MODEL, &metric, row.class_id)?;
            let gain = get_gain(simple, row.value, perfect, p.max_gain);
            min_gain.update(gain, &metric, Some(&row.class_name));
            if gain <= p.min_allowed_gain {
                failed_classes.push((row.class_name.clone(), format_percent(gain, 2)));
            }
        }
        if !failed_classes.is_empty() {
            fails.push((metric, failed_classes));
        }
    }

    if fails.is_empty() {
        Ok((ConditionCategory::Pass, min_gain.into_message()))
    } else {
        Ok((
            ConditionCategory::Fail,
            format!(
                "Found metrics with gain below threshold: {}",
                format_failures(&fails)
            ),
        ))
    }
}

/// Given, simple and perfect scores averaged over the included classes of one metric.
struct AverageScores {
    given: BasicEstimator,
    simple: BasicEstimator,
    perfect: BasicEstimator,
}

fn average_scores(
    table: &ResultTable,
    metric: &str,
    classes: &Option<Vec<usize>>,
) -> Result<AverageScores, crate::error::CheckError> {
    let mut avg = AverageScores {
        given: BasicEstimator::default(),
        simple: BasicEstimator::default(),
        perfect: BasicEstimator::default(),
    };
    for row in table
        .rows_for_model(GIVEN_MODEL)
        .filter(|r| r.metric_name == metric && included(classes, r.class_id))
    {
        avg.given.add(row.value);
        avg.simple.add(lookup(table, SIMPLE_MODEL, metric, row.class_id)?);
        avg.perfect.add(lookup(table, PERFECT_MODEL, metric, row.class_id)?);
    }
    Ok(avg)
}

fn averaged(table: &ResultTable, p: &GainParameters) -> Verdict {
    let mut min_gain = MinGain::default();
    let mut fails: Vec<(String, String)> = Vec::new();

    for metric in table.metrics_of(GIVEN_MODEL) {
        let avg = average_scores(table, &metric, &p.classes)?;
        if avg.given.count() == 0 {
            continue;
        }
        let (given, perfect) = (avg.given.estimation(), avg.perfect.estimation());
        if given == perfect {
            continue;
        }
        let gain = get_gain(avg.simple.estimation(), given, perfect, p.max_gain);
        min_gain.update(gain, &metric, None);
        if gain <= p.min_allowed_gain {
            fails.push((metric, format_percent(gain, 2)));
        }
    }

    if fails.is_empty() {
        Ok((ConditionCategory::Pass, min_gain.into_message()))
    } else {
        let body: Vec<String> = fails.iter().map(|(m, g)| format!("{m}: {g}")).collect();
        Ok((
            ConditionCategory::Fail,
            format!(
                "Found metrics with gain below threshold: {{{}}}",
                body.join(", ")
            ),
        ))
    }
}
