//! Product rating on a 0-5 scale.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    /// The input is not a finite number.
    #[error("rating must be a number")]
    NotANumber,
    /// The value is outside `[0, 5]`.
    #[error("rating must be between {min} and {max}")]
    OutOfRange {
        /// Lowest allowed rating.
        min: u8,
        /// Highest allowed rating.
        max: u8,
    },
}

/// A product rating in `[0, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
    /// Lowest rating.
    pub const MIN: Self = Self(0.0);
    /// Highest rating.
    pub const MAX: Self = Self(5.0);

    /// Create a rating, rejecting values outside `[0, 5]`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError::NotANumber`] for NaN or infinite values and
    /// [`RatingError::OutOfRange`] for values outside the scale.
    pub fn new(value: f64) -> Result<Self, RatingError> {
        if !value.is_finite() {
            return Err(RatingError::NotANumber);
        }
        if !(Self::MIN.0..=Self::MAX.0).contains(&value) {
            return Err(RatingError::OutOfRange { min: 0, max: 5 });
        }
        Ok(Self(value))
    }

    /// Parse a rating from user input such as `"4.5"`.
    ///
    /// # Errors
    ///
    /// See [`Rating::new`]; unparsable input is [`RatingError::NotANumber`].
    pub fn parse(s: &str) -> Result<Self, RatingError> {
        let value: f64 = s.trim().parse().map_err(|_| RatingError::NotANumber)?;
        Self::new(value)
    }

    /// Clamp any value into `[0, 5]`. NaN becomes `0`.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Clamp and round to the nearest multiple of `step`, as a slider does.
    #[must_use]
    pub fn snapped(value: f64, step: f64) -> Self {
        let clamped = Self::clamped(value).0;
        if step <= 0.0 {
            return Self(clamped);
        }
        Self::clamped((clamped / step).round() * step)
    }

    /// Returns the rating as a float.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Number of whole stars to highlight (ratings are shown out of five).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn filled_stars(&self) -> u8 {
        // Bounded to [0, 5] by construction.
        self.0.floor() as u8
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bounds() {
        assert!(Rating::new(0.0).is_ok());
        assert!(Rating::new(5.0).is_ok());
        assert_eq!(
            Rating::new(5.1),
            Err(RatingError::OutOfRange { min: 0, max: 5 })
        );
        assert_eq!(Rating::new(f64::NAN), Err(RatingError::NotANumber));
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Rating::clamped(7.0), Rating::MAX);
        assert_eq!(Rating::clamped(-2.0), Rating::MIN);
        assert_eq!(Rating::clamped(f64::NAN), Rating::MIN);
        assert_eq!(Rating::clamped(f64::INFINITY), Rating::MAX);
        assert!((Rating::clamped(3.3).value() - 3.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapped_to_half_steps() {
        assert!((Rating::snapped(3.3, 0.5).value() - 3.5).abs() < f64::EPSILON);
        assert!((Rating::snapped(3.2, 0.5).value() - 3.0).abs() < f64::EPSILON);
        assert_eq!(Rating::snapped(9.0, 0.5), Rating::MAX);
    }

    #[test]
    fn test_parse() {
        assert!((Rating::parse("4.5").unwrap().value() - 4.5).abs() < f64::EPSILON);
        assert_eq!(Rating::parse("four"), Err(RatingError::NotANumber));
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("6").is_err());
        assert_eq!(Rating::new(2.0).unwrap().filled_stars(), 2);
    }
}
