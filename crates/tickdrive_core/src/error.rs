//! Configuration error types
//!
//! Accumulators validate their configuration once, at construction. A failed
//! construction leaves nothing behind.

use thiserror::Error;

/// Error returned when an accumulator configuration is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    #[error("{field} must not be negative, got {value}")]
    NegativeMagnitude { field: &'static str, value: f32 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },

    #[error("phase count must be at least 1")]
    ZeroPhaseCount,
}

impl ConfigError {
    /// Name of the offending field, if the error refers to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::NonFinite { field }
            | ConfigError::NegativeMagnitude { field, .. }
            | ConfigError::OutOfRange { field, .. } => Some(*field),
            ConfigError::ZeroPhaseCount => None,
        }
    }
}

/// Reject NaN and infinities
pub(crate) fn check_finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

/// Reject negative and non-finite values
pub(crate) fn check_non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    let value = check_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::NegativeMagnitude { field, value });
    }
    Ok(value)
}

/// Reject values outside `[min, max]`
pub(crate) fn check_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<f32, ConfigError> {
    let value = check_finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange { field, min, max, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = ConfigError::OutOfRange {
            field: "damping_factor",
            min: 0.0,
            max: 10.0,
            value: 12.0,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("damping_factor"));
        assert!(msg.contains("10"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_negative_display() {
        let err = ConfigError::NegativeMagnitude { field: "magnitude", value: -1.0 };
        assert!(format!("{}", err).contains("must not be negative"));
    }

    #[test]
    fn test_field_accessor() {
        assert_eq!(ConfigError::NonFinite { field: "target" }.field(), Some("target"));
        assert_eq!(ConfigError::ZeroPhaseCount.field(), None);
    }

    #[test]
    fn test_checks() {
        assert_eq!(check_finite("x", 1.0), Ok(1.0));
        assert!(check_finite("x", f32::NAN).is_err());
        assert!(check_non_negative("x", -0.5).is_err());
        assert_eq!(check_non_negative("x", 0.0), Ok(0.0));
        assert!(check_range("x", 1.5, 0.0, 1.0).is_err());
        assert_eq!(check_range("x", 1.0, 0.0, 1.0), Ok(1.0));
        assert!(check_range("x", f32::INFINITY, 0.0, 1.0).is_err());
    }
}
