// Time window in global ticks

use std::ops::Range;

use crate::core::time::TimeFormatter;

/// The span `[ts0, tsf)` to render. `tsf` is always at least `ts0 + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub ts0: i64,
    pub tsf: i64,
    pub tfreq: f64,
    /// Requested length in seconds, kept for the time axis labels.
    pub duration: f64,
}

impl TimeWindow {
    pub fn new(ts0: i64, tsf: i64, tfreq: f64, duration: f64) -> Self {
        let ts0 = ts0.min(i64::MAX - 1);
        let tsf = if ts0 >= tsf { ts0 + 1 } else { tsf };
        Self { ts0, tsf, tfreq: TimeFormatter::new(tfreq).tfreq(), duration }
    }

    /// Builds the window from the start field and a duration in seconds.
    pub fn from_request(start: &str, duration: f64, tfreq: f64) -> Self {
        let formatter = TimeFormatter::new(tfreq);
        let ts0 = formatter.parse(start);
        let duration = if duration.is_finite() { duration } else { 0.0 };
        let tsf = ts0.saturating_add(formatter.seconds_to_ticks(duration));
        Self::new(ts0, tsf, formatter.tfreq(), duration)
    }

    pub fn formatter(&self) -> TimeFormatter {
        TimeFormatter::new(self.tfreq)
    }

    pub fn ticks(&self) -> Range<i64> {
        self.ts0..self.tsf
    }

    pub fn len(&self) -> i64 {
        self.tsf - self.ts0
    }

    /// Start field text for this window.
    pub fn start_label(&self) -> String {
        self.formatter().format(self.ts0)
    }

    /// The next window of the same length. `None` going backward past zero.
    pub fn shifted(&self, forward: bool) -> Option<Self> {
        let step = self.formatter().seconds_to_ticks(self.duration);
        let ts0 = if forward {
            self.ts0.checked_add(step)?
        } else {
            let ts0 = self.ts0.checked_sub(step)?;
            if ts0 < 0 {
                return None;
            }
            ts0
        };
        Some(Self::new(ts0, ts0.saturating_add(step), self.tfreq, self.duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request() {
        let w = TimeWindow::from_request("0:10", 5.0, 360.0);
        assert_eq!(w.ts0, 3600);
        assert_eq!(w.tsf, 3600 + 1800);
        assert_eq!(w.len(), 1800);
    }

    #[test]
    fn test_empty_window_normalised() {
        let w = TimeWindow::from_request("3", 0.0, 100.0);
        assert_eq!(w.ts0, 300);
        assert_eq!(w.tsf, 301);

        let w = TimeWindow::from_request("3", -4.0, 100.0);
        assert_eq!(w.tsf, w.ts0 + 1);

        let w = TimeWindow::new(10, 2, 1.0, 0.0);
        assert_eq!(w.ticks(), 10..11);
    }

    #[test]
    fn test_huge_start_falls_back_to_zero() {
        let w = TimeWindow::from_request("99999999999999999", 10.0, 360.0);
        assert_eq!(w.ticks(), 0..3600);

        let w = TimeWindow::new(i64::MAX, i64::MAX, 1.0, 0.0);
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn test_shift_forward_and_back() {
        let w = TimeWindow::from_request("0", 10.0, 250.0);
        let fwd = w.shifted(true).unwrap();
        assert_eq!(fwd.ts0, 2500);
        assert_eq!(fwd.tsf, 5000);
        assert_eq!(fwd.start_label(), "00:10.000");

        let back = fwd.shifted(false).unwrap();
        assert_eq!(back.ts0, 0);
        assert!(back.shifted(false).is_none());
    }

    #[test]
    fn test_shift_back_would_go_negative() {
        let w = TimeWindow::from_request("5", 10.0, 1.0);
        assert!(w.shifted(false).is_none());
    }
}
