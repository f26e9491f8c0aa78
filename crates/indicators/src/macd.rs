use crate::ema::Ema;
use crate::Indicator;
use quantstream_core::IndicatorError;
use serde::Serialize;

/// MACD (Moving Average Convergence Divergence).
///
/// Composed of three EMAs:
/// - Fast EMA (default 12)
/// - Slow EMA (default 26)
/// - Signal EMA (default 9) over the fast - slow line
///
/// Output appears once the signal EMA has seeded, so the warm-up is
/// `slow + signal - 1` samples.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_ema: Ema,
    slow_ema: Ema,
    signal_ema: Ema,
    macd_line: Option<f64>,
    current: Option<MacdOutput>,
}

/// MACD output with all three components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl Macd {
    pub fn new(
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("MACD fast", fast_period, 1)?;
        IndicatorError::check_period("MACD signal", signal_period, 1)?;
        if fast_period >= slow_period {
            return Err(IndicatorError::InvalidSpans {
                fast: fast_period,
                slow: slow_period,
            });
        }
        Ok(Self::with_periods(fast_period, slow_period, signal_period))
    }

    /// Standard MACD (12, 26, 9).
    pub fn default_periods() -> Self {
        Self::with_periods(12, 26, 9)
    }

    fn with_periods(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_ema: Ema::with_period(fast_period),
            slow_ema: Ema::with_period(slow_period),
            signal_ema: Ema::with_period(signal_period),
            macd_line: None,
            current: None,
        }
    }

    /// The fast - slow line, available before the signal line is.
    pub fn macd_line(&self) -> Option<f64> {
        self.macd_line
    }

    pub fn periods(&self) -> (usize, usize, usize) {
        (
            self.fast_ema.period(),
            self.slow_ema.period(),
            self.signal_ema.period(),
        )
    }
}

impl Indicator for Macd {
    type Input = f64;
    type Output = MacdOutput;

    fn next(&mut self, value: f64) -> Option<MacdOutput> {
        let fast = self.fast_ema.next(value);
        let slow = self.slow_ema.next(value);

        if let (Some(f), Some(s)) = (fast, slow) {
            let macd = f - s;
            self.macd_line = Some(macd);
            if let Some(signal) = self.signal_ema.next(macd) {
                self.current = Some(MacdOutput {
                    macd,
                    signal,
                    histogram: macd - signal,
                });
            }
        }

        self.current
    }

    fn value(&self) -> Option<MacdOutput> {
        self.current
    }

    fn reset(&mut self) {
        self.fast_ema.reset();
        self.slow_ema.reset();
        self.signal_ema.reset();
        self.macd_line = None;
        self.current = None;
    }

    fn warmup_period(&self) -> usize {
        let lines_ready = self
            .fast_ema
            .warmup_period()
            .max(self.slow_ema.warmup_period());
        lines_ready + self.signal_ema.warmup_period() - 1
    }
}
