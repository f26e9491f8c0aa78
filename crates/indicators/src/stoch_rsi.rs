use crate::buffer::CircularBuffer;
use crate::rsi::Rsi;
use crate::sma::Sma;
use crate::Indicator;
use quantstream_core::IndicatorError;
use serde::Serialize;

/// Stochastic RSI.
///
/// raw = 100 * (RSI - lowest RSI) / (highest RSI - lowest RSI) over the last
/// `stoch_period` RSI values, %K = SMA(raw, k_period), %D = SMA(%K, d_period).
/// A window with no RSI range yields a raw value of 0.
#[derive(Debug, Clone)]
pub struct StochRsi {
    rsi: Rsi,
    window: CircularBuffer<f64>,
    k_sma: Sma,
    d_sma: Sma,
    current: Option<StochRsiOutput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StochRsiOutput {
    pub stoch_rsi: f64,
    pub k: f64,
    pub d: f64,
}

impl StochRsi {
    pub fn new(
        rsi_period: usize,
        stoch_period: usize,
        k_period: usize,
        d_period: usize,
    ) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("StochRSI window", stoch_period, 1)?;
        Ok(Self {
            rsi: Rsi::new(rsi_period)?,
            window: CircularBuffer::new(stoch_period)?,
            k_sma: Sma::new(k_period)?,
            d_sma: Sma::new(d_period)?,
            current: None,
        })
    }

    /// Standard Stochastic RSI (14, 14, 14, 3): %K is smoothed over as many
    /// samples as the stochastic window.
    pub fn default_periods() -> Result<Self, IndicatorError> {
        Self::new(14, 14, 14, 3)
    }

    fn raw(&self, rsi: f64) -> f64 {
        let (lowest, highest) = self
            .window
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let range = highest - lowest;
        if range > 0.0 {
            100.0 * (rsi - lowest) / range
        } else {
            0.0
        }
    }

    fn step(&mut self, value: f64) -> Option<StochRsiOutput> {
        let rsi = self.rsi.next(value)?;
        self.window.push(rsi);
        if !self.window.filled() {
            return None;
        }
        let stoch_rsi = self.raw(rsi);
        let k = self.k_sma.next(stoch_rsi)?;
        let d = self.d_sma.next(k)?;
        Some(StochRsiOutput { stoch_rsi, k, d })
    }
}

impl Indicator for StochRsi {
    type Input = f64;
    type Output = StochRsiOutput;

    fn next(&mut self, value: f64) -> Option<StochRsiOutput> {
        if let Some(out) = self.step(value) {
            self.current = Some(out);
        }
        self.current
    }

    fn value(&self) -> Option<StochRsiOutput> {
        self.current
    }

    fn reset(&mut self) {
        self.rsi.reset();
        self.window.clear();
        self.k_sma.reset();
        self.d_sma.reset();
        self.current = None;
    }

    fn warmup_period(&self) -> usize {
        self.rsi.warmup_period()
            + (self.window.capacity() - 1)
            + (self.k_sma.warmup_period() - 1)
            + (self.d_sma.warmup_period() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(i: usize) -> f64 {
        100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1
    }

    #[test]
    fn test_stoch_rsi_warmup() {
        let mut srsi = StochRsi::new(3, 4, 2, 2).unwrap();
        // rsi 4 + window 3 + k 1 + d 1
        assert_eq!(srsi.warmup_period(), 9);
        for i in 0..8 {
            assert!(srsi.next(zigzag(i)).is_none(), "ready at {i}");
        }
        assert!(srsi.next(zigzag(8)).is_some());
    }

    #[test]
    fn test_stoch_rsi_default_warmup() {
        let srsi = StochRsi::default_periods().unwrap();
        // rsi 15 + window 13 + k 13 + d 2
        assert_eq!(srsi.warmup_period(), 43);
    }

    #[test]
    fn test_stoch_rsi_bounds() {
        let mut srsi = StochRsi::default_periods().unwrap();
        for i in 0..300 {
            if let Some(out) = srsi.next(zigzag(i)) {
                for v in [out.stoch_rsi, out.k, out.d] {
                    assert!((-1e-9..=100.0 + 1e-9).contains(&v), "out of range: {v}");
                }
            }
        }
        assert!(srsi.is_ready());
    }

    #[test]
    fn test_stoch_rsi_flat_window_is_zero() {
        let mut srsi = StochRsi::new(2, 3, 1, 1).unwrap();
        let mut last = None;
        for i in 0..20 {
            last = srsi.next(10.0 + i as f64);
        }
        // RSI pinned at 100 → no range
        let out = last.unwrap();
        assert_eq!(out.stoch_rsi, 0.0);
        assert_eq!(out.k, 0.0);
        assert_eq!(out.d, 0.0);
    }

    #[test]
    fn test_stoch_rsi_invalid_periods() {
        assert!(StochRsi::new(0, 14, 3, 3).is_err());
        assert!(StochRsi::new(14, 0, 3, 3).is_err());
        assert!(StochRsi::new(14, 14, 0, 3).is_err());
        assert!(StochRsi::new(14, 14, 3, 0).is_err());
    }

    #[test]
    fn test_stoch_rsi_reset() {
        let mut srsi = StochRsi::new(2, 2, 1, 1).unwrap();
        for i in 0..10 {
            srsi.next(zigzag(i));
        }
        assert!(srsi.is_ready());
        srsi.reset();
        assert!(!srsi.is_ready());
        assert!(srsi.next(1.0).is_none());
    }
}
