//! Invariants that must hold for arbitrary price streams.

use proptest::prelude::*;

use quantstream_indicators::atr::Atr;
use quantstream_indicators::bollinger::BollingerBands;
use quantstream_indicators::buffer::CircularBuffer;
use quantstream_indicators::ema::Ema;
use quantstream_indicators::macd::Macd;
use quantstream_indicators::rsi::Rsi;
use quantstream_indicators::set::IndicatorSet;
use quantstream_indicators::sma::Sma;
use quantstream_indicators::vwap::Vwap;
use quantstream_indicators::{Candle, Indicator};

fn arb_price_series(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, min_len..=max_len)
}

fn arb_candles(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<Candle>> {
    prop::collection::vec(
        (1.0..1000.0_f64, 0.0..0.1_f64, 0.0..0.1_f64, 0.0..1e6_f64),
        min_len..=max_len,
    )
    .prop_map(|data| {
        data.into_iter()
            .map(|(base, up, down, volume)| {
                Candle::new(base * (1.0 + up), base * (1.0 - down), base, volume)
            })
            .collect()
    })
}

fn replay<I: Indicator>(
    indicator: &mut I,
    inputs: impl IntoIterator<Item = I::Input>,
) -> Vec<Option<I::Output>> {
    inputs.into_iter().map(|x| indicator.next(x)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_buffer_keeps_last_n(capacity in 1usize..50, extra in 1usize..50) {
        let mut buf = CircularBuffer::new(capacity).unwrap();
        let total = capacity + extra;
        for v in 0..total {
            buf.push(v);
        }
        let values = buf.values();
        prop_assert_eq!(values.len(), capacity);
        prop_assert!(!values.contains(&0));
        prop_assert_eq!(values, (extra..total).collect::<Vec<_>>());
    }

    #[test]
    fn prop_buffer_eviction_returns_oldest(capacity in 1usize..20) {
        let mut buf = CircularBuffer::new(capacity).unwrap();
        for v in 0..capacity {
            prop_assert_eq!(buf.push(v), None);
        }
        prop_assert_eq!(buf.push(capacity), Some(0));
        prop_assert_eq!(buf.len(), capacity);
    }

    #[test]
    fn prop_sma_warmup_count(data in arb_price_series(1, 100), period in 1usize..=20) {
        let mut sma = Sma::new(period).unwrap();
        let out = replay(&mut sma, data.iter().copied());
        let pending = out.iter().take_while(|v| v.is_none()).count();
        prop_assert_eq!(pending, (period - 1).min(data.len()));
        prop_assert!(out.iter().skip(pending).all(Option::is_some));
    }

    #[test]
    fn prop_ema_constant_input(value in 1.0..1000.0_f64, period in 1usize..=30) {
        let mut ema = Ema::new(period).unwrap();
        for i in 1..=period * 3 {
            let out = ema.next(value);
            if i < period {
                prop_assert_eq!(out, None);
            } else {
                prop_assert_eq!(out, Some(value));
            }
        }
    }

    #[test]
    fn prop_bollinger_constant_input(value in 1.0..1000.0_f64, period in 1usize..=30, k in 0.0..4.0_f64) {
        let mut bb = BollingerBands::new(period, k).unwrap();
        for out in replay(&mut bb, vec![value; period * 4]).into_iter().skip(period - 1) {
            let out = out.unwrap();
            prop_assert_eq!(out.std, 0.0);
            prop_assert_eq!(out.middle, value);
            prop_assert_eq!(out.upper, value);
            prop_assert_eq!(out.lower, value);
        }
    }

    #[test]
    fn prop_rsi_bounded(data in arb_price_series(2, 200), period in 1usize..=30) {
        let mut rsi = Rsi::new(period).unwrap();
        for v in replay(&mut rsi, data).into_iter().flatten() {
            prop_assert!((0.0..=100.0).contains(&v), "RSI out of range: {}", v);
        }
    }

    #[test]
    fn prop_atr_non_negative(candles in arb_candles(2, 100), period in 2usize..=20) {
        let mut atr = Atr::new(period).unwrap();
        for v in replay(&mut atr, candles).into_iter().flatten() {
            prop_assert!(v >= 0.0);
        }
    }

    #[test]
    fn prop_bollinger_ordering(data in arb_price_series(1, 100), period in 1usize..=20, k in 0.0..4.0_f64) {
        let mut bb = BollingerBands::new(period, k).unwrap();
        for out in replay(&mut bb, data).into_iter().flatten() {
            prop_assert!(out.std >= 0.0);
            prop_assert!(out.upper >= out.middle);
            prop_assert!(out.middle >= out.lower);
        }
    }

    #[test]
    fn prop_macd_warmup_is_derived(fast in 1usize..10, gap in 1usize..10, signal in 1usize..10, data in arb_price_series(60, 80)) {
        let slow = fast + gap;
        let mut macd = Macd::new(fast, slow, signal).unwrap();
        let warmup = slow + signal - 1;
        prop_assert_eq!(macd.warmup_period(), warmup);
        let out = replay(&mut macd, data);
        prop_assert!(out[..warmup - 1].iter().all(Option::is_none));
        prop_assert!(out[warmup - 1..].iter().all(Option::is_some));
    }

    #[test]
    fn prop_vwap_within_typical_range(candles in arb_candles(1, 100)) {
        let mut vwap = Vwap::new();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for c in candles {
            if c.volume > 0.0 {
                lo = lo.min(c.typical_price());
                hi = hi.max(c.typical_price());
            }
            if let Some(v) = vwap.next(c) {
                prop_assert!(v >= lo * (1.0 - 1e-9) && v <= hi * (1.0 + 1e-9));
            }
        }
    }

    #[test]
    fn prop_replay_is_deterministic(candles in arb_candles(1, 120)) {
        let config = r#"
            [[indicators]]
            name = "ema"
            indicator = { kind = "ema", period = 5 }
            [[indicators]]
            name = "rsi"
            indicator = { kind = "rsi", period = 6 }
            [[indicators]]
            name = "atr"
            indicator = { kind = "atr", period = 4 }
            [[indicators]]
            name = "macd"
            indicator = { kind = "macd", fast = 3, slow = 7, signal = 4 }
            [[indicators]]
            name = "bb"
            indicator = { kind = "bollinger", period = 8, num_std = 2.5 }
            [[indicators]]
            name = "vwap"
            indicator = { kind = "vwap" }
            [[indicators]]
            name = "srsi"
            indicator = { kind = "stoch_rsi", rsi_period = 5, stoch_period = 5 }
        "#;
        let mut a = IndicatorSet::from_toml_str(config).unwrap();
        let mut b = IndicatorSet::from_toml_str(config).unwrap();
        for c in candles {
            let ra = serde_json::to_string(&a.next(c)).unwrap();
            let rb = serde_json::to_string(&b.next(c)).unwrap();
            prop_assert_eq!(ra, rb);
        }
    }
}

#[test]
fn macd_standard_spans_ready_after_33() {
    let mut macd = Macd::default_periods();
    let out = replay(&mut macd, (0..80).map(|i| 50.0 + (i as f64 * 0.3).cos()));
    assert!(out[..33].iter().all(Option::is_none));
    assert!(out[33..].iter().all(Option::is_some));
}

#[test]
fn readings_serialize_with_type_tag() {
    let mut set = IndicatorSet::from_toml_str(
        r#"
        [[indicators]]
        name = "sma"
        indicator = { kind = "sma", period = 1 }
        "#,
    )
    .unwrap();
    let json = serde_json::to_value(set.next(Candle::new(2.0, 1.0, 1.5, 1.0))).unwrap();
    assert_eq!(
        json,
        serde_json::json!([["sma", { "type": "value", "value": 1.5 }]])
    );
}
