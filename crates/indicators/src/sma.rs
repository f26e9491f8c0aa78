use crate::buffer::CircularBuffer;
use crate::Indicator;
use quantstream_core::IndicatorError;

/// Simple Moving Average (SMA).
#[derive(Debug, Clone)]
pub struct Sma {
    buffer: CircularBuffer<f64>,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("SMA", period, 1)?;
        Ok(Self {
            buffer: CircularBuffer::new(period)?,
            sum: 0.0,
        })
    }

    pub fn period(&self) -> usize {
        self.buffer.capacity()
    }
}

impl Indicator for Sma {
    type Input = f64;
    type Output = f64;

    fn next(&mut self, value: f64) -> Option<f64> {
        self.sum += value;
        if let Some(removed) = self.buffer.push(value) {
            self.sum -= removed;
        }
        self.value()
    }

    /// Get the current SMA value without feeding new data.
    fn value(&self) -> Option<f64> {
        if self.buffer.filled() {
            Some(self.sum / self.buffer.capacity() as f64)
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.sum = 0.0;
    }

    fn warmup_period(&self) -> usize {
        self.buffer.capacity()
    }
}
