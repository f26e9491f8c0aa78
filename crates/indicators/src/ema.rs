use crate::Indicator;
use quantstream_core::IndicatorError;

/// Exponential Moving Average (EMA).
///
/// Seeded with the SMA of the first `period` samples, then
/// `ema = x * k + ema * (1 - k)` with `k = 2 / (period + 1)`.
/// The seed is taken as `first + mean(x - first)`, so a flat warm-up seeds
/// at exactly that value. A period of 1 tracks the input with no warm-up.
#[derive(Debug, Clone)]
pub struct Ema {
    len: usize,
    multiplier: f64,
    current: Option<f64>,
    count: usize,
    /// First warm-up sample; the seed sum is kept relative to it.
    seed_anchor: Option<f64>,
    seed_sum: f64,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("EMA", period, 1)?;
        Ok(Self::with_period(period))
    }

    /// Callers must have validated `period >= 1`.
    pub(crate) fn with_period(period: usize) -> Self {
        Self {
            len: period,
            multiplier: 2.0 / (period as f64 + 1.0),
            current: None,
            count: 0,
            seed_anchor: None,
            seed_sum: 0.0,
        }
    }

    pub fn period(&self) -> usize {
        self.len
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Indicator for Ema {
    type Input = f64;
    type Output = f64;

    fn next(&mut self, value: f64) -> Option<f64> {
        if self.len == 1 {
            self.count = 1;
            self.current = Some(value);
            return self.current;
        }

        match self.current {
            None => {
                let anchor = *self.seed_anchor.get_or_insert(value);
                self.count += 1;
                self.seed_sum += value - anchor;
                if self.count >= self.len {
                    let seed = anchor + self.seed_sum / self.len as f64;
                    tracing::trace!(period = self.len, seed, "EMA seeded");
                    self.current = Some(seed);
                }
            }
            Some(prev) => {
                // Same as value * k + prev * (1 - k), but exact for flat input.
                self.current = Some((value - prev) * self.multiplier + prev);
            }
        }

        self.current
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.current = None;
        self.count = 0;
        self.seed_anchor = None;
        self.seed_sum = 0.0;
    }

    fn warmup_period(&self) -> usize {
        self.len
    }
}
