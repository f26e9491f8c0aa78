use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;

// ---------------------------------------------------------------------------
// Market Data
// ---------------------------------------------------------------------------

/// A single OHLCV bar as delivered by the market-data feed.
///
/// Prices stay in `Decimal` here; indicators work on [`Candle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub instrument: String,
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// The price/volume shape consumed by candle-based indicators.
///
/// The timestamp lives with the caller. `high >= low` is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Candle {
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            high,
            low,
            close,
            volume,
        }
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// True range against the previous close; plain high - low without one.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        let hl = self.high - self.low;
        match prev_close {
            Some(pc) => hl.max((self.high - pc).abs()).max((self.low - pc).abs()),
            None => hl,
        }
    }
}

fn decimal_to_f64(value: Decimal, field: &str) -> Result<f64, IndicatorError> {
    value
        .to_f64()
        .ok_or_else(|| IndicatorError::Conversion(format!("{field} {value} has no f64 form")))
}

impl TryFrom<&Bar> for Candle {
    type Error = IndicatorError;

    fn try_from(bar: &Bar) -> Result<Self, Self::Error> {
        Ok(Self {
            high: decimal_to_f64(bar.high, "high")?,
            low: decimal_to_f64(bar.low, "low")?,
            close: decimal_to_f64(bar.close, "close")?,
            volume: decimal_to_f64(bar.volume, "volume")?,
        })
    }
}
