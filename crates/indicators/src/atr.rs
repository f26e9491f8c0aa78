use crate::Indicator;
use quantstream_core::{Candle, IndicatorError};

/// Average True Range (ATR).
///
/// Requires high, low, close data. Feed a [`Candle`] via `next()` or use
/// `next_hlc()`. The first candle has no previous close, so its true range
/// is plain high - low.
#[derive(Debug, Clone)]
pub struct Atr {
    len: usize,
    prev_close: Option<f64>,
    tr_sum: f64,
    current_atr: Option<f64>,
    count: usize,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("ATR", period, 2)?;
        Ok(Self {
            len: period,
            prev_close: None,
            tr_sum: 0.0,
            current_atr: None,
            count: 0,
        })
    }

    /// Feed high, low, close and compute ATR.
    pub fn next_hlc(&mut self, high: f64, low: f64, close: f64) -> Option<f64> {
        self.next(Candle::new(high, low, close, 0.0))
    }

    pub fn period(&self) -> usize {
        self.len
    }
}

impl Indicator for Atr {
    type Input = Candle;
    type Output = f64;

    fn next(&mut self, candle: Candle) -> Option<f64> {
        let tr = candle.true_range(self.prev_close);
        self.prev_close = Some(candle.close);

        match self.current_atr {
            None => {
                self.count += 1;
                self.tr_sum += tr;
                if self.count >= self.len {
                    self.current_atr = Some(self.tr_sum / self.len as f64);
                    tracing::trace!(period = self.len, "ATR seeded");
                }
            }
            Some(prev_atr) => {
                // Wilder's smoothing
                let n = self.len as f64;
                self.current_atr = Some((prev_atr * (n - 1.0) + tr) / n);
            }
        }

        self.current_atr
    }

    fn value(&self) -> Option<f64> {
        self.current_atr
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.tr_sum = 0.0;
        self.current_atr = None;
        self.count = 0;
    }

    fn warmup_period(&self) -> usize {
        self.len
    }
}
