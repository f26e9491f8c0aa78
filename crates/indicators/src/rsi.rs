use crate::Indicator;
use quantstream_core::IndicatorError;

/// Relative Strength Index (RSI).
/// Uses Wilder's smoothing for average gain/loss, seeded with the plain
/// mean of the first `period` changes.
///
/// Zero average loss saturates to 100, unless average gain is also zero:
/// a flat market reads as neutral 50.
#[derive(Debug, Clone)]
pub struct Rsi {
    len: usize,
    prev_value: Option<f64>,
    count: usize,
    gain_sum: f64,
    loss_sum: f64,
    avg_gain: Option<f64>,
    avg_loss: Option<f64>,
}

/// RSI from Wilder averages.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            tracing::trace!("RSI flat market, reporting neutral");
            50.0
        } else {
            100.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("RSI", period, 1)?;
        Ok(Self {
            len: period,
            prev_value: None,
            count: 0,
            gain_sum: 0.0,
            loss_sum: 0.0,
            avg_gain: None,
            avg_loss: None,
        })
    }

    pub fn period(&self) -> usize {
        self.len
    }

    pub fn avg_gain(&self) -> Option<f64> {
        self.avg_gain
    }

    pub fn avg_loss(&self) -> Option<f64> {
        self.avg_loss
    }
}

impl Indicator for Rsi {
    type Input = f64;
    type Output = f64;

    fn next(&mut self, value: f64) -> Option<f64> {
        if let Some(prev) = self.prev_value {
            let change = value - prev;
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);

            match (self.avg_gain, self.avg_loss) {
                (Some(ag), Some(al)) => {
                    // Wilder's smoothing
                    let n = self.len as f64;
                    self.avg_gain = Some((ag * (n - 1.0) + gain) / n);
                    self.avg_loss = Some((al * (n - 1.0) + loss) / n);
                }
                _ => {
                    // Accumulate initial period
                    self.count += 1;
                    self.gain_sum += gain;
                    self.loss_sum += loss;

                    if self.count >= self.len {
                        let n = self.len as f64;
                        self.avg_gain = Some(self.gain_sum / n);
                        self.avg_loss = Some(self.loss_sum / n);
                        tracing::trace!(period = self.len, "RSI seeded");
                    }
                }
            }
        }

        self.prev_value = Some(value);
        self.value()
    }

    fn value(&self) -> Option<f64> {
        match (self.avg_gain, self.avg_loss) {
            (Some(ag), Some(al)) => Some(rsi_from_averages(ag, al)),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.prev_value = None;
        self.count = 0;
        self.gain_sum = 0.0;
        self.loss_sum = 0.0;
        self.avg_gain = None;
        self.avg_loss = None;
    }

    fn warmup_period(&self) -> usize {
        self.len + 1 // need one extra data point for the first change
    }

    fn is_ready(&self) -> bool {
        self.avg_gain.is_some()
    }
}
