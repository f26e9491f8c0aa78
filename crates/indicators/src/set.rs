//! Config-driven bundle of indicators fed from one candle stream.
//!
//! ```toml
//! [[indicators]]
//! name = "rsi"
//! indicator = { kind = "rsi", period = 14 }
//!
//! [[indicators]]
//! name = "bands"
//! indicator = { kind = "bollinger" }
//! ```

use crate::atr::Atr;
use crate::bollinger::{BollingerBands, BollingerOutput};
use crate::ema::Ema;
use crate::macd::{Macd, MacdOutput};
use crate::rsi::Rsi;
use crate::sma::Sma;
use crate::stoch_rsi::{StochRsi, StochRsiOutput};
use crate::vwap::Vwap;
use crate::Indicator;
use quantstream_core::{Candle, IndicatorError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_ma_period() -> usize {
    20
}
fn default_wilder_period() -> usize {
    14
}
fn default_macd_fast() -> usize {
    12
}
fn default_macd_slow() -> usize {
    26
}
fn default_macd_signal() -> usize {
    9
}
fn default_num_std() -> f64 {
    2.0
}
fn default_stoch_d_period() -> usize {
    3
}

/// Parameters for one indicator instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorConfig {
    Sma {
        #[serde(default = "default_ma_period")]
        period: usize,
    },
    Ema {
        #[serde(default = "default_ma_period")]
        period: usize,
    },
    Rsi {
        #[serde(default = "default_wilder_period")]
        period: usize,
    },
    Atr {
        #[serde(default = "default_wilder_period")]
        period: usize,
    },
    Macd {
        #[serde(default = "default_macd_fast")]
        fast: usize,
        #[serde(default = "default_macd_slow")]
        slow: usize,
        #[serde(default = "default_macd_signal")]
        signal: usize,
    },
    Bollinger {
        #[serde(default = "default_ma_period")]
        period: usize,
        #[serde(default = "default_num_std")]
        num_std: f64,
    },
    Vwap,
    StochRsi {
        #[serde(default = "default_wilder_period")]
        rsi_period: usize,
        #[serde(default = "default_wilder_period")]
        stoch_period: usize,
        #[serde(default = "default_wilder_period")]
        k_period: usize,
        #[serde(default = "default_stoch_d_period")]
        d_period: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedIndicator {
    pub name: String,
    pub indicator: IndicatorConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSetConfig {
    #[serde(default)]
    pub indicators: Vec<NamedIndicator>,
}

/// One indicator's output after a candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reading {
    Pending,
    Value { value: f64 },
    Macd(MacdOutput),
    Bollinger(BollingerOutput),
    StochRsi(StochRsiOutput),
}

impl Reading {
    pub fn is_pending(&self) -> bool {
        matches!(self, Reading::Pending)
    }

    /// The scalar value, if this reading has one.
    pub fn as_value(&self) -> Option<f64> {
        match self {
            Reading::Value { value } => Some(*value),
            _ => None,
        }
    }

    fn scalar(value: Option<f64>) -> Self {
        value.map_or(Reading::Pending, |value| Reading::Value { value })
    }
}

#[derive(Debug, Clone)]
enum Member {
    Sma(Sma),
    Ema(Ema),
    Rsi(Rsi),
    Atr(Atr),
    Macd(Macd),
    Bollinger(BollingerBands),
    Vwap(Vwap),
    StochRsi(StochRsi),
}

impl Member {
    fn build(config: &IndicatorConfig) -> Result<Self, IndicatorError> {
        Ok(match *config {
            IndicatorConfig::Sma { period } => Member::Sma(Sma::new(period)?),
            IndicatorConfig::Ema { period } => Member::Ema(Ema::new(period)?),
            IndicatorConfig::Rsi { period } => Member::Rsi(Rsi::new(period)?),
            IndicatorConfig::Atr { period } => Member::Atr(Atr::new(period)?),
            IndicatorConfig::Macd { fast, slow, signal } => {
                Member::Macd(Macd::new(fast, slow, signal)?)
            }
            IndicatorConfig::Bollinger { period, num_std } => {
                Member::Bollinger(BollingerBands::new(period, num_std)?)
            }
            IndicatorConfig::Vwap => Member::Vwap(Vwap::new()),
            IndicatorConfig::StochRsi {
                rsi_period,
                stoch_period,
                k_period,
                d_period,
            } => Member::StochRsi(StochRsi::new(rsi_period, stoch_period, k_period, d_period)?),
        })
    }

    /// Sample-based members see the close.
    fn next(&mut self, candle: Candle) -> Reading {
        match self {
            Member::Sma(i) => Reading::scalar(i.next(candle.close)),
            Member::Ema(i) => Reading::scalar(i.next(candle.close)),
            Member::Rsi(i) => Reading::scalar(i.next(candle.close)),
            Member::Atr(i) => Reading::scalar(i.next(candle)),
            Member::Vwap(i) => Reading::scalar(i.next(candle)),
            Member::Macd(i) => i.next(candle.close).map_or(Reading::Pending, Reading::Macd),
            Member::Bollinger(i) => i
                .next(candle.close)
                .map_or(Reading::Pending, Reading::Bollinger),
            Member::StochRsi(i) => i
                .next(candle.close)
                .map_or(Reading::Pending, Reading::StochRsi),
        }
    }

    fn reading(&self) -> Reading {
        match self {
            Member::Sma(i) => Reading::scalar(i.value()),
            Member::Ema(i) => Reading::scalar(i.value()),
            Member::Rsi(i) => Reading::scalar(i.value()),
            Member::Atr(i) => Reading::scalar(i.value()),
            Member::Vwap(i) => Reading::scalar(i.value()),
            Member::Macd(i) => i.value().map_or(Reading::Pending, Reading::Macd),
            Member::Bollinger(i) => i.value().map_or(Reading::Pending, Reading::Bollinger),
            Member::StochRsi(i) => i.value().map_or(Reading::Pending, Reading::StochRsi),
        }
    }

    fn reset(&mut self) {
        match self {
            Member::Sma(i) => i.reset(),
            Member::Ema(i) => i.reset(),
            Member::Rsi(i) => i.reset(),
            Member::Atr(i) => i.reset(),
            Member::Vwap(i) => i.reset(),
            Member::Macd(i) => i.reset(),
            Member::Bollinger(i) => i.reset(),
            Member::StochRsi(i) => i.reset(),
        }
    }

    fn warmup_period(&self) -> usize {
        match self {
            Member::Sma(i) => i.warmup_period(),
            Member::Ema(i) => i.warmup_period(),
            Member::Rsi(i) => i.warmup_period(),
            Member::Atr(i) => i.warmup_period(),
            Member::Vwap(i) => i.warmup_period(),
            Member::Macd(i) => i.warmup_period(),
            Member::Bollinger(i) => i.warmup_period(),
            Member::StochRsi(i) => i.warmup_period(),
        }
    }
}

/// A named collection of independent indicators driven by one candle stream.
///
/// Each entry owns its own instance; nothing is shared between entries.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    names: Vec<String>,
    members: Vec<Member>,
}

impl IndicatorSet {
    pub fn from_config(config: &IndicatorSetConfig) -> Result<Self, IndicatorError> {
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(config.indicators.len());
        let mut members = Vec::with_capacity(config.indicators.len());

        for entry in &config.indicators {
            if !seen.insert(entry.name.as_str()) {
                return Err(IndicatorError::DuplicateName(entry.name.clone()));
            }
            members.push(Member::build(&entry.indicator)?);
            names.push(entry.name.clone());
        }

        tracing::info!(indicators = names.len(), "Built indicator set");
        Ok(Self { names, members })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, IndicatorError> {
        let config: IndicatorSetConfig =
            toml::from_str(s).map_err(|e| IndicatorError::Config(e.to_string()))?;
        Self::from_config(&config)
    }

    /// Feed one candle to every indicator, in configuration order.
    pub fn next(&mut self, candle: Candle) -> Vec<(&str, Reading)> {
        let readings: Vec<Reading> = self.members.iter_mut().map(|m| m.next(candle)).collect();
        self.names.iter().map(String::as_str).zip(readings).collect()
    }

    /// Latest readings without advancing any indicator.
    pub fn readings(&self) -> Vec<(&str, Reading)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.members.iter().map(Member::reading))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<Reading> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.members[i].reading())
    }

    /// Candles needed before every member is ready.
    pub fn warmup_period(&self) -> usize {
        self.members
            .iter()
            .map(Member::warmup_period)
            .max()
            .unwrap_or(0)
    }

    pub fn all_ready(&self) -> bool {
        self.members.iter().all(|m| !m.reading().is_pending())
    }

    /// Start every indicator over, e.g. at a trading-session boundary.
    pub fn reset_session(&mut self) {
        tracing::debug!(indicators = self.members.len(), "Resetting indicator set");
        self.members.iter_mut().for_each(Member::reset);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
