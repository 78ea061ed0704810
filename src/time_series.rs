/// WPM observed at `t` seconds into a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub t: f64,
    pub wpm: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: f64, wpm: f64) -> Self {
        Self { t, wpm }
    }

    pub fn from_tick(elapsed_secs: u32, wpm: u32) -> Self {
        Self::new(f64::from(elapsed_secs), f64::from(wpm))
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.t, p.wpm)
    }
}

/// Highest sampled WPM, 0 for an empty series
pub fn peak_wpm(points: &[TimeSeriesPoint]) -> f64 {
    points.iter().map(|p| p.wpm).fold(0.0, f64::max)
}
