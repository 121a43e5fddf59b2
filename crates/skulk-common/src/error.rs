//! Error types for Skulk.

use thiserror::Error;

/// Top-level error type for Skulk operations.
#[derive(Debug, Error)]
pub enum SkulkError {
    /// Configuration rejected by validation
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid simulation parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Arena dimensions must be positive and finite
    #[error("Invalid arena size {width}x{height}")]
    InvalidArena {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    /// A `(min, max)` range was inverted or not finite
    #[error("Invalid range for {name}: ({min}, {max})")]
    InvalidRange {
        /// Name of the parameter
        name: &'static str,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },

    /// A value that must be strictly positive was not
    #[error("{name} must be positive, got {value}")]
    NotPositive {
        /// Name of the parameter
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// A value that must not be negative was
    #[error("{name} must not be negative, got {value}")]
    Negative {
        /// Name of the parameter
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// The final-stand override could exceed the attacker cap
    #[error("Final stand threshold {threshold} exceeds attacker cap {max_attackers}")]
    FinalStandAboveCap {
        /// Final-stand enemy count
        threshold: usize,
        /// Maximum simultaneous attackers
        max_attackers: usize,
    },
}

impl ConfigError {
    /// Checks that `value` is finite and strictly positive.
    pub fn ensure_positive(name: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::NotPositive { name, value })
        }
    }

    /// Checks that `value` is finite and not below zero.
    pub fn ensure_non_negative(name: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Self::Negative { name, value })
        }
    }

    /// Checks that `(min, max)` is finite and ordered.
    pub fn ensure_range(name: &'static str, (min, max): (f32, f32)) -> Result<(), Self> {
        if min.is_finite() && max.is_finite() && min <= max {
            Ok(())
        } else {
            Err(Self::InvalidRange { name, min, max })
        }
    }
}

/// Result type alias for Skulk operations.
pub type SkulkResult<T> = Result<T, SkulkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ConfigError::ensure_positive("speed", 1.0).is_ok());
        assert_eq!(
            ConfigError::ensure_positive("speed", 0.0),
            Err(ConfigError::NotPositive {
                name: "speed",
                value: 0.0
            })
        );
        assert!(ConfigError::ensure_positive("speed", f32::NAN).is_err());
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ConfigError::ensure_non_negative("weight", 0.0).is_ok());
        assert_eq!(
            ConfigError::ensure_non_negative("weight", -0.5),
            Err(ConfigError::Negative {
                name: "weight",
                value: -0.5
            })
        );
        assert!(ConfigError::ensure_non_negative("weight", f32::INFINITY).is_err());
    }

    #[test]
    fn test_ensure_range() {
        assert!(ConfigError::ensure_range("radius", (10.0, 10.0)).is_ok());
        assert!(ConfigError::ensure_range("radius", (12.0, 10.0)).is_err());
        assert!(ConfigError::ensure_range("radius", (0.0, f32::INFINITY)).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = SkulkError::from(ConfigError::FinalStandAboveCap {
            threshold: 9,
            max_attackers: 8,
        });
        assert_eq!(
            err.to_string(),
            "Config error: Final stand threshold 9 exceeds attacker cap 8"
        );
    }
}
