use quantstream_core::Bar;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

const FIB_RATIOS: [Decimal; 3] = [dec!(0.382), dec!(0.618), dec!(1.000)];

/// Fibonacci pivot levels derived from one completed candle.
///
/// Levels are price levels used for order placement, so they stay in
/// `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PivotLevels {
    pub pivot: Decimal,
    pub r1: Decimal,
    pub r2: Decimal,
    pub r3: Decimal,
    pub s1: Decimal,
    pub s2: Decimal,
    pub s3: Decimal,
}

/// Round to the nearest multiple of `step` (half to even). A zero step is a no-op.
fn round_to_step(value: Decimal, step: Option<Decimal>) -> Decimal {
    match step {
        Some(s) if !s.is_zero() => (value / s).round() * s,
        _ => value,
    }
}

/// Compute Fibonacci pivots from a candle's high, low and close.
///
/// Support/resistance levels are snapped to `round_step` when given;
/// the pivot itself is left unrounded.
pub fn fibonacci_pivots(
    high: Decimal,
    low: Decimal,
    close: Decimal,
    round_step: Option<Decimal>,
) -> PivotLevels {
    let pivot = (high + low + close) / Decimal::from(3);
    let range = high - low;
    let [r1, r2, r3] = FIB_RATIOS.map(|ratio| round_to_step(pivot + range * ratio, round_step));
    let [s1, s2, s3] = FIB_RATIOS.map(|ratio| round_to_step(pivot - range * ratio, round_step));

    PivotLevels {
        pivot,
        r1,
        r2,
        r3,
        s1,
        s2,
        s3,
    }
}

impl PivotLevels {
    pub fn from_bar(bar: &Bar, round_step: Option<Decimal>) -> Self {
        fibonacci_pivots(bar.high, bar.low, bar.close, round_step)
    }

    /// Resistance levels, nearest first.
    pub fn resistances(&self) -> [Decimal; 3] {
        [self.r1, self.r2, self.r3]
    }

    /// Support levels, nearest first.
    pub fn supports(&self) -> [Decimal; 3] {
        [self.s1, self.s2, self.s3]
    }
}
