//! Parameter validation shared by the built-in filters.

use crate::ConfigError;

/// `min <= max`, both non-negative and not NaN. `max` may be infinite.
pub(crate) fn check_range(filter: &str, what: &str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min.is_nan() || max.is_nan() {
        return Err(ConfigError::invalid(filter, format!("{what} range contains NaN")));
    }
    if min < 0.0 {
        return Err(ConfigError::invalid(filter, format!("minimum {what} {min} is negative")));
    }
    if min > max {
        return Err(ConfigError::invalid(
            filter,
            format!("minimum {what} {min} exceeds maximum {max}"),
        ));
    }
    Ok(())
}

/// `0 <= value <= 1`.
pub(crate) fn check_fraction(filter: &str, what: &str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(
            filter,
            format!("{what} must be within [0, 1], got {value}"),
        ));
    }
    Ok(())
}

/// Finite and non-negative.
pub(crate) fn check_non_negative(filter: &str, what: &str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(
            filter,
            format!("{what} must be finite and non-negative, got {value}"),
        ));
    }
    Ok(())
}

/// Serde adapter for upper bounds: `null` (or a missing field) means
/// unbounded, since JSON has no infinity.
pub(crate) mod unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() && value.is_sign_positive() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_validated() {
        assert!(check_range("f", "area", 0.0, f32::INFINITY).is_ok());
        assert!(check_range("f", "area", 5.0, 5.0).is_ok());
        assert!(check_range("f", "area", -1.0, 5.0).is_err());
        assert!(check_range("f", "area", 6.0, 5.0).is_err());
        assert!(check_range("f", "area", f32::NAN, 5.0).is_err());
        assert!(check_fraction("f", "ratio", 1.2).is_err());
        assert!(check_non_negative("f", "coefficient", f32::INFINITY).is_err());
    }
}
