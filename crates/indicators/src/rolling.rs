use crate::buffer::CircularBuffer;
use crate::Indicator;
use quantstream_core::IndicatorError;
use serde::Serialize;

/// Rolling mean and population standard deviation over a fixed window.
///
/// The running sums are kept on `x - anchor`, where `anchor` is the first
/// sample seen since construction or the last `reset`. A constant window
/// therefore sums to exactly zero: the mean comes back as the sample itself
/// and the deviation as `0.0`.
#[derive(Debug, Clone)]
pub struct RollingStats {
    window: CircularBuffer<f64>,
    anchor: Option<f64>,
    sum: f64,
    sum_sq: f64,
    current: Option<RollingOutput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingOutput {
    pub mean: f64,
    pub std: f64,
}

impl RollingStats {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("RollingStats", period, 1)?;
        Ok(Self::with_period(period))
    }

    /// Callers must have validated `period >= 1`.
    pub(crate) fn with_period(period: usize) -> Self {
        Self {
            window: CircularBuffer::with_capacity(period),
            anchor: None,
            sum: 0.0,
            sum_sq: 0.0,
            current: None,
        }
    }

    pub fn period(&self) -> usize {
        self.window.capacity()
    }
}

impl Indicator for RollingStats {
    type Input = f64;
    type Output = RollingOutput;

    fn next(&mut self, value: f64) -> Option<RollingOutput> {
        let anchor = *self.anchor.get_or_insert(value);

        let d = value - anchor;
        self.sum += d;
        self.sum_sq += d * d;
        if let Some(evicted) = self.window.push(value) {
            let e = evicted - anchor;
            self.sum -= e;
            self.sum_sq -= e * e;
        }

        if !self.window.filled() {
            return None;
        }

        let n = self.window.capacity() as f64;
        let mean_d = self.sum / n;
        // variance is shift-invariant; clamp what cancellation leaves below zero
        let variance = (self.sum_sq / n - mean_d * mean_d).max(0.0);
        let out = RollingOutput {
            mean: anchor + mean_d,
            std: variance.sqrt(),
        };
        self.current = Some(out);
        self.current
    }

    fn value(&self) -> Option<RollingOutput> {
        self.current
    }

    fn reset(&mut self) {
        self.window.clear();
        self.anchor = None;
        self.sum = 0.0;
        self.sum_sq = 0.0;
        self.current = None;
    }

    fn warmup_period(&self) -> usize {
        self.window.capacity()
    }
}
