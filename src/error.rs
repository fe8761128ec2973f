use thiserror::Error;

/// Construction-time configuration errors
///
/// The learning core has no recoverable runtime errors; everything that can
/// go wrong is a bad parameter and is rejected before any training starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for `{name}`: must be at least 1")]
    Zero { name: &'static str },

    #[error("invalid value for `{name}`: must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("invalid value for `{name}`: must be in the interval [{lo}, {hi}], got {value}")]
    OutOfInterval {
        name: &'static str,
        lo: f64,
        hi: f64,
        value: f64,
    },

    #[error("invalid bounds for `{name}`: must satisfy lo < hi, got [{lo}, {hi}]")]
    EmptyRange {
        name: &'static str,
        lo: f64,
        hi: f64,
    },

    #[error("weight vectors must share one length: expected {expected}, got {found}")]
    MismatchedLengths { expected: usize, found: usize },
}

/// Checks that `value` lies in the half-open interval `(0, hi]`.
pub(crate) fn check_positive_upto(
    name: &'static str,
    value: f64,
    hi: f64,
) -> Result<(), ConfigError> {
    if value <= 0.0 {
        Err(ConfigError::NonPositive { name, value })
    } else if value > hi {
        Err(ConfigError::OutOfInterval {
            name,
            lo: 0.0,
            hi,
            value,
        })
    } else {
        Ok(())
    }
}

/// Checks that `value` lies in the closed interval `[lo, hi]`.
pub(crate) fn check_interval(
    name: &'static str,
    value: f64,
    lo: f64,
    hi: f64,
) -> Result<(), ConfigError> {
    if value >= lo && value <= hi {
        Ok(())
    } else {
        Err(ConfigError::OutOfInterval {
            name,
            lo,
            hi,
            value,
        })
    }
}
