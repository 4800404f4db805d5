/// Renders a ratio as a percentage with at most `floating_point` decimals.
///
/// Whole ratios print without decimals (`0.5` → `"50%"`), trailing zeros are
/// dropped, and non-zero values too small to show become `"<0.01%"`.
pub fn format_percent(ratio: f64, floating_point: usize) -> String {
    if ratio.is_nan() {
        return "nan".into();
    }
    if ratio < 0.0 {
        return format!("-{}", format_percent(-ratio, floating_point));
    }
    let pct = ratio * 100.0;
    let smallest = format!("{:.floating_point$}", 10f64.powi(-(floating_point as i32)));
    if pct > 0.0 && format!("{pct:.floating_point$}").trim_matches(|c| c == '0' || c == '.').is_empty() {
        return format!("<{smallest}%");
    }
    format!("{}%", trim_decimals(&format!("{pct:.floating_point$}")))
}

/// Rounds to `floating_point` decimals and drops trailing zeros (`0.970` → `"0.97"`).
pub fn format_number(x: f64, floating_point: usize) -> String {
    if x.is_nan() {
        return "nan".into();
    }
    let s = trim_decimals(&format!("{x:.floating_point$}"));
    if s == "-0" { "0".into() } else { s }
}

fn trim_decimals(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
