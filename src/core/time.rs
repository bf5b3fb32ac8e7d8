// Tick <-> time string conversion

/// Converts between global ticks and `[Dd]HH:MM:SS.mmm` strings at a
/// fixed tick rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeFormatter {
    tfreq: f64,
}

impl TimeFormatter {
    /// A non-positive or non-finite rate falls back to one tick per second.
    pub fn new(tfreq: f64) -> Self {
        let tfreq = if tfreq.is_finite() && tfreq > 0.0 { tfreq } else { 1.0 };
        Self { tfreq }
    }

    pub fn tfreq(&self) -> f64 {
        self.tfreq
    }

    /// Formats a tick count. Hours are dropped while zero; past 23 hours a
    /// day count is prefixed (`1d02:00:00.000`).
    pub fn format(&self, ticks: i64) -> String {
        let ticks = ticks.max(0);
        // small bias keeps exact multiples from flooring one ms low
        let total_ms = (1000.0 * ticks as f64 / self.tfreq + 1e-6).floor() as i64;

        let mmm = total_ms % 1000;
        let total_s = total_ms / 1000;
        let ss = total_s % 60;
        let total_m = total_s / 60;
        let mm = total_m % 60;
        let total_h = total_m / 60;
        let hh = total_h % 24;
        let dd = total_h / 24;

        if dd > 0 {
            format!("{}d{:02}:{:02}:{:02}.{:03}", dd, hh, mm, ss, mmm)
        } else if hh > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hh, mm, ss, mmm)
        } else {
            format!("{:02}:{:02}.{:03}", mm, ss, mmm)
        }
    }

    /// Parses `s`, `m:s`, `h:m:s` or `d:h:m:s` (any non-digit run separates
    /// fields) into ticks. Digits after the first `.` are ignored. Anything
    /// else, or a time too large to count in ticks, yields 0.
    pub fn parse(&self, s: &str) -> i64 {
        let whole = s.split('.').next().unwrap_or("");
        let mut fields = Vec::with_capacity(4);
        for field in whole.split(|c: char| !c.is_ascii_digit()).filter(|f| !f.is_empty()) {
            match field.parse::<i64>() {
                Ok(v) => fields.push(v),
                Err(_) => return 0,
            }
        }

        let seconds = match fields.as_slice() {
            [s] => Some(*s),
            [m, s] => m.checked_mul(60).and_then(|v| v.checked_add(*s)),
            [h, m, s] => h
                .checked_mul(3600)
                .and_then(|v| v.checked_add(m.checked_mul(60)?))
                .and_then(|v| v.checked_add(*s)),
            [d, h, m, s] => d
                .checked_mul(86400)
                .and_then(|v| v.checked_add(h.checked_mul(3600)?))
                .and_then(|v| v.checked_add(m.checked_mul(60)?))
                .and_then(|v| v.checked_add(*s)),
            _ => None,
        };

        let ticks = seconds.map(|secs| (secs as f64 * self.tfreq).round());
        match ticks {
            Some(ticks) if ticks.is_finite() && ticks < i64::MAX as f64 => ticks as i64,
            _ => 0,
        }
    }

    /// Duration in seconds to ticks, rounded.
    pub fn seconds_to_ticks(&self, seconds: f64) -> i64 {
        (seconds * self.tfreq).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(TimeFormatter::new(360.0).format(0), "00:00.000");
    }

    #[test]
    fn test_format_minute_rollover() {
        assert_eq!(TimeFormatter::new(1.0).format(90), "01:30.000");
    }

    #[test]
    fn test_format_hours_and_days() {
        let tf = TimeFormatter::new(1.0);
        assert_eq!(tf.format(3600 + 61), "01:01:01.000");
        assert_eq!(tf.format(86400 + 2 * 3600), "1d02:00:00.000");
        assert_eq!(tf.format(3 * 86400 + 23 * 3600 + 59 * 60 + 59), "3d23:59:59.000");
    }

    #[test]
    fn test_format_milliseconds_truncate() {
        let tf = TimeFormatter::new(360.0);
        // 1 tick = 2.777.. ms
        assert_eq!(tf.format(1), "00:00.002");
        assert_eq!(tf.format(361), "00:01.002");
        assert_eq!(tf.format(-5), "00:00.000");
    }

    #[test]
    fn test_parse_field_counts() {
        let tf = TimeFormatter::new(10.0);
        assert_eq!(tf.parse("5"), 50);
        assert_eq!(tf.parse("1:30"), 900);
        assert_eq!(tf.parse("1:00:00"), 36000);
        assert_eq!(tf.parse("1d02:00:00"), (86400 + 7200) * 10);
        assert_eq!(tf.parse("1:2:3:4:5"), 0);
        assert_eq!(tf.parse(""), 0);
        assert_eq!(tf.parse("abc"), 0);
    }

    #[test]
    fn test_parse_tick_overflow_is_zero() {
        let tf = TimeFormatter::new(360.0);
        assert_eq!(tf.parse("99999999999999999"), 0);
        assert_eq!(tf.parse("30000000000000000"), 0);
        assert_eq!(tf.parse("10000000000000"), 3_600_000_000_000_000);
    }

    #[test]
    fn test_parse_ignores_subseconds() {
        let tf = TimeFormatter::new(360.0);
        assert_eq!(tf.parse("01:30.500"), 90 * 360);
        assert_eq!(tf.parse("2.9"), 720);
    }

    #[test]
    fn test_parse_overflow_is_zero() {
        let tf = TimeFormatter::new(1.0);
        assert_eq!(tf.parse("99999999999999999999999"), 0);
    }

    #[test]
    fn test_bad_tfreq_falls_back() {
        assert_eq!(TimeFormatter::new(0.0).tfreq(), 1.0);
        assert_eq!(TimeFormatter::new(f64::NAN).tfreq(), 1.0);
    }

    proptest! {
        #[test]
        fn parse_inverts_format_on_whole_seconds(secs in 0i64..400_000, rate in 1i64..1000) {
            let tf = TimeFormatter::new(rate as f64);
            let ticks = secs * rate;
            prop_assert_eq!(tf.parse(&tf.format(ticks)), ticks);
        }
    }
}
