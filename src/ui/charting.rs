/// Compute X (lap number) and Y (seconds) bounds for the lap time chart.
/// The Y bound always leaves room for the static target line.
pub fn compute_chart_params(lap_times: &[f64], static_lap_target: f64) -> (f64, f64) {
    let highest = lap_times
        .iter()
        .copied()
        .fold(static_lap_target, f64::max);

    let laps = (lap_times.len() as f64).max(1.0);
    let ceiling = if highest > 0.0 { highest * 1.1 } else { 1.0 };

    (laps, ceiling.ceil())
}

/// (lap number, seconds) points starting at lap 1
pub fn lap_points(lap_times: &[f64]) -> Vec<(f64, f64)> {
    lap_times
        .iter()
        .enumerate()
        .map(|(i, t)| ((i + 1) as f64, *t))
        .collect()
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
