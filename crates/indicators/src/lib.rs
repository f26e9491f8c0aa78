pub mod atr;
pub mod bollinger;
pub mod buffer;
pub mod ema;
pub mod macd;
pub mod pivots;
pub mod rolling;
pub mod rsi;
pub mod set;
pub mod sma;
pub mod stoch_rsi;
pub mod vwap;

pub use quantstream_core::{Candle, IndicatorError};

/// Trait for streaming (incremental) indicators.
/// Feed one observation at a time; the indicator maintains internal state.
///
/// `None` means "still warming up", never zero.
pub trait Indicator {
    /// A sample (`f64`) or a [`Candle`].
    type Input;
    /// Scalar for most indicators, a record for composites.
    type Output;

    /// Process the next observation and return the indicator output (if ready).
    fn next(&mut self, input: Self::Input) -> Option<Self::Output>;

    /// The last computed output, without advancing state.
    fn value(&self) -> Option<Self::Output>;

    /// Reset the indicator to its initial state.
    fn reset(&mut self);

    /// The number of observations needed before the indicator produces output.
    fn warmup_period(&self) -> usize;

    /// Whether the indicator has enough data to produce output.
    fn is_ready(&self) -> bool {
        self.value().is_some()
    }
}
