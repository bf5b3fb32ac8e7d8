// Delta decoding and physical unit conversion

use crate::core::format::{effective_gain, RawSignal, Signal};
use crate::core::window::TimeWindow;

/// Replaces first differences with absolute values (running sum from 0).
pub fn decode_deltas(samples: &mut [i64]) {
    let mut acc: i64 = 0;
    for v in samples.iter_mut() {
        acc = acc.wrapping_add(*v);
        *v = acc;
    }
}

impl RawSignal {
    /// Consumes the wire record; the sample buffer is decoded in place.
    pub fn decode(self) -> Signal {
        let mut samples = self.samp;
        decode_deltas(&mut samples);
        Signal {
            name: self.name,
            units: self.units,
            gain: effective_gain(self.gain),
            baseline: self.base,
            scale: match self.scale {
                Some(s) if s != 0.0 && s.is_finite() => s,
                _ => 1.0,
            },
            tps: self.tps.max(1),
            samples,
        }
    }
}

pub fn decode_all(raw: Vec<RawSignal>) -> Vec<Signal> {
    raw.into_iter().map(RawSignal::decode).collect()
}

impl Signal {
    pub fn physical(&self, raw: i64) -> f64 {
        (raw - self.baseline) as f64 / self.gain
    }

    /// Raw sample at global tick `t`, if this signal has one there.
    pub fn sample_at(&self, window: &TimeWindow, t: i64) -> Option<i64> {
        if t < window.ts0 || t % self.tps != 0 {
            return None;
        }
        let index = usize::try_from((t - window.ts0) / self.tps).ok()?;
        self.samples.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(samp: Vec<i64>, tps: i64) -> RawSignal {
        RawSignal {
            name: "ECG".to_string(),
            units: None,
            t0: None,
            tf: None,
            gain: Some(1.0),
            base: 0,
            tps,
            scale: Some(1.0),
            samp,
        }
    }

    #[test]
    fn test_decode_example() {
        let sig = raw(vec![0, 1, 1, 1], 1).decode();
        assert_eq!(sig.samples, vec![0, 1, 2, 3]);
        assert_eq!(sig.units(), "[mV]");
    }

    #[test]
    fn test_decode_empty() {
        let mut v: Vec<i64> = vec![];
        decode_deltas(&mut v);
        assert!(v.is_empty());
    }

    #[test]
    fn test_physical() {
        let mut r = raw(vec![1124], 1);
        r.gain = Some(200.0);
        r.base = 1024;
        let sig = r.decode();
        assert_eq!(sig.physical(sig.samples[0]), 0.5);
    }

    #[test]
    fn test_defaults_for_missing_gain_scale_tps() {
        let mut r = raw(vec![], 0);
        r.gain = None;
        r.scale = Some(0.0);
        let sig = r.decode();
        assert_eq!(sig.gain, 200.0);
        assert_eq!(sig.scale, 1.0);
        assert_eq!(sig.tps, 1);
    }

    #[test]
    fn test_sample_alignment() {
        let sig = raw(vec![10, 1, 1], 2).decode();
        let w = TimeWindow::new(0, 6, 2.0, 3.0);
        let present: Vec<_> = w.ticks().map(|t| sig.sample_at(&w, t)).collect();
        assert_eq!(present, vec![Some(10), None, Some(11), None, Some(12), None]);
    }

    #[test]
    fn test_sample_past_end_is_none() {
        let sig = raw(vec![1], 1).decode();
        let w = TimeWindow::new(4, 8, 1.0, 4.0);
        assert_eq!(sig.sample_at(&w, 4), Some(1));
        assert_eq!(sig.sample_at(&w, 5), None);
        assert_eq!(sig.sample_at(&w, 3), None);
    }

    proptest! {
        #[test]
        fn decoded_is_prefix_sum(deltas in proptest::collection::vec(-5000i64..5000, 0..200)) {
            let mut decoded = deltas.clone();
            decode_deltas(&mut decoded);
            for i in 0..deltas.len() {
                prop_assert_eq!(decoded[i], deltas[..=i].iter().sum::<i64>());
            }
        }
    }
}
