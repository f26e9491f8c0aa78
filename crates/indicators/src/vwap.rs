use crate::Indicator;
use quantstream_core::Candle;

/// Volume Weighted Average Price (VWAP).
///
/// Cumulative over a session. Call `reset()` at session boundaries.
/// Stays pending while cumulative volume is exactly zero.
#[derive(Debug, Clone, Default)]
pub struct Vwap {
    cumulative_tp_vol: f64,
    cumulative_vol: f64,
    current: Option<f64>,
    count: usize,
}

impl Vwap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed high, low, close, volume and compute VWAP.
    pub fn next_hlcv(&mut self, high: f64, low: f64, close: f64, volume: f64) -> Option<f64> {
        self.next(Candle::new(high, low, close, volume))
    }

    /// Candles accumulated since construction or the last reset.
    pub fn session_len(&self) -> usize {
        self.count
    }

    pub fn cumulative_volume(&self) -> f64 {
        self.cumulative_vol
    }
}

impl Indicator for Vwap {
    type Input = Candle;
    type Output = f64;

    fn next(&mut self, candle: Candle) -> Option<f64> {
        self.cumulative_tp_vol += candle.typical_price() * candle.volume;
        self.cumulative_vol += candle.volume;
        self.count += 1;

        self.current = if self.cumulative_vol == 0.0 {
            tracing::trace!(candles = self.count, "VWAP pending on zero volume");
            None
        } else {
            Some(self.cumulative_tp_vol / self.cumulative_vol)
        };
        self.current
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        tracing::debug!(candles = self.count, "VWAP session reset");
        self.cumulative_tp_vol = 0.0;
        self.cumulative_vol = 0.0;
        self.current = None;
        self.count = 0;
    }

    fn warmup_period(&self) -> usize {
        1
    }
}
