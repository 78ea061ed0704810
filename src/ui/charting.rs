use typeblast::time_series::{peak_wpm, TimeSeriesPoint};

/// Compute X (seconds) and Y (WPM) bounds for the results chart
pub fn compute_chart_params(samples: &[TimeSeriesPoint], duration_secs: u32) -> (f64, f64) {
    let overall_duration = match samples.last() {
        Some(p) => p.t,
        None => f64::from(duration_secs),
    }
    .max(1.0);

    (overall_duration, peak_wpm(samples).round())
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
