use crate::conditions::ConditionCategory;
use crate::conditions::condition::{ImbalanceParameters, Verdict};
use crate::core::{ClassMetricRecord, ResultTable, TEST, TRAIN};
use crate::error::CheckError;
use crate::utils::{format_number, format_percent};

/// `(max - min) / max`, or `0` when the best class scores zero.
pub fn imbalance_ratio(min: f64, max: f64) -> f64 {
    if max == 0.0 { 0.0 } else { (max - min) / max }
}

struct SplitSpread<'a> {
    ratio: f64,
    lowest: &'a ClassMetricRecord,
    highest: &'a ClassMetricRecord,
}

fn spread<'a>(
    table: &'a ResultTable,
    split: &str,
    metric: &str,
) -> Result<SplitSpread<'a>, CheckError> {
    let mut rows = table
        .iter()
        .filter(|r| r.model_name == split && r.metric_name == metric);
    let first = rows.next().ok_or_else(|| {
        CheckError::MissingValue(format!("no {metric} scores for the {split} dataset"))
    })?;
    let (mut lowest, mut highest) = (first, first);
    for r in rows {
        if r.value < lowest.value {
            lowest = r;
        }
        if r.value > highest.value {
            highest = r;
        }
    }
    Ok(SplitSpread {
        ratio: imbalance_ratio(lowest.value, highest.value),
        lowest,
        highest,
    })
}

pub(crate) fn evaluate(table: &ResultTable, p: &ImbalanceParameters) -> Verdict {
    let mut lines = Vec::with_capacity(2);
    let mut failed = false;
    for split in [TEST, TRAIN] {
        let s = spread(table, split, &p.metric)?;
        failed |= s.ratio > p.threshold;
        lines.push(format!(
            "Relative ratio difference between highest and lowest in {split} dataset classes is {}, \
             using {} metric. Lowest class - {}: {}; Highest class - {}: {}",
            format_percent(s.ratio, 2),
            p.metric,
            s.lowest.class_name,
            format_number(s.lowest.value, 2),
            s.highest.class_name,
            format_number(s.highest.value, 2),
        ));
    }
    let category = if failed {
        ConditionCategory::Fail
    } else {
        ConditionCategory::Pass
    };
    Ok((category, lines.join("\n")))
}
