/// Errors raised while configuring or feeding indicators.
///
/// Every variant is a configuration or boundary failure. Warm-up and
/// degenerate numeric states are never reported here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("{name} period must be >= {min}, got {period}")]
    InvalidPeriod {
        name: &'static str,
        period: usize,
        min: usize,
    },
    #[error("Buffer capacity must be > 0")]
    InvalidCapacity,
    #[error("Fast span ({fast}) must be less than slow span ({slow})")]
    InvalidSpans { fast: usize, slow: usize },
    #[error("Band multiplier must be finite and >= 0, got {0}")]
    InvalidMultiplier(f64),
    #[error("Duplicate indicator name: {0}")]
    DuplicateName(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Conversion error: {0}")]
    Conversion(String),
}

impl IndicatorError {
    /// Check `period >= min`, naming the offending indicator on failure.
    pub fn check_period(name: &'static str, period: usize, min: usize) -> Result<(), Self> {
        if period < min {
            Err(Self::InvalidPeriod { name, period, min })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_period() {
        assert!(IndicatorError::check_period("SMA", 1, 1).is_ok());
        let err = IndicatorError::check_period("ATR", 1, 2).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InvalidPeriod {
                name: "ATR",
                period: 1,
                min: 2
            }
        );
        assert_eq!(err.to_string(), "ATR period must be >= 2, got 1");
    }
}
