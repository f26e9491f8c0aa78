use crate::rolling::RollingStats;
use crate::Indicator;
use quantstream_core::IndicatorError;
use serde::Serialize;

/// Bollinger Bands.
///
/// Middle band is the rolling mean; bands sit `num_std` population standard
/// deviations either side.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    num_std: f64,
    stats: RollingStats,
    current: Option<BollingerOutput>,
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub std: f64,
}

impl BollingerOutput {
    pub fn bandwidth(&self) -> f64 {
        self.upper - self.lower
    }
}

impl BollingerBands {
    pub fn new(period: usize, num_std_dev: f64) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("Bollinger", period, 1)?;
        if !num_std_dev.is_finite() || num_std_dev < 0.0 {
            return Err(IndicatorError::InvalidMultiplier(num_std_dev));
        }
        Ok(Self::with_params(period, num_std_dev))
    }

    /// Standard Bollinger Bands (20, 2).
    pub fn default_periods() -> Self {
        Self::with_params(20, 2.0)
    }

    fn with_params(period: usize, num_std: f64) -> Self {
        Self {
            num_std,
            stats: RollingStats::with_period(period),
            current: None,
        }
    }

    pub fn period(&self) -> usize {
        self.stats.period()
    }

    pub fn num_std(&self) -> f64 {
        self.num_std
    }
}

impl Indicator for BollingerBands {
    type Input = f64;
    type Output = BollingerOutput;

    fn next(&mut self, value: f64) -> Option<BollingerOutput> {
        if let Some(stats) = self.stats.next(value) {
            let offset = self.num_std * stats.std;
            self.current = Some(BollingerOutput {
                upper: stats.mean + offset,
                middle: stats.mean,
                lower: stats.mean - offset,
                std: stats.std,
            });
        }
        self.current
    }

    fn value(&self) -> Option<BollingerOutput> {
        self.current
    }

    fn reset(&mut self) {
        self.stats.reset();
        self.current = None;
    }

    fn warmup_period(&self) -> usize {
        self.stats.warmup_period()
    }
}
