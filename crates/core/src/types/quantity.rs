//! Order quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of items in an order. Always at least [`Quantity::MIN`].
///
/// Raw input never fails to convert: anything that does not parse as a
/// number degrades to the minimum, fractional input is floored, and values
/// below one are clamped up.
///
/// ```
/// use order_intake_core::Quantity;
///
/// assert_eq!(Quantity::from_input("5").get(), 5);
/// assert_eq!(Quantity::from_input("0").get(), 1);
/// assert_eq!(Quantity::from_input("-3").get(), 1);
/// assert_eq!(Quantity::from_input("lots").get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawQuantity", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Smallest allowed quantity.
    pub const MIN: Self = Self(1);

    /// Create a quantity, clamping zero up to the minimum.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value < Self::MIN.0 {
            Self::MIN
        } else {
            Self(value)
        }
    }

    /// Coerce raw text from a form input: parse-or-default, then clamp.
    #[must_use]
    pub fn from_input(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(whole) = raw.parse::<i64>() {
            return Self::from_i64(whole);
        }
        raw.parse::<f64>().map_or(Self::MIN, Self::from_f64)
    }

    /// Returns the quantity as an integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    fn from_i64(value: i64) -> Self {
        u32::try_from(value.max(1)).map_or(Self(u32::MAX), Self)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked above the cast
    fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value < 1.0 {
            return Self::MIN;
        }
        let floored = value.floor();
        if floored >= f64::from(u32::MAX) {
            Self(u32::MAX)
        } else {
            Self(floored as u32)
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

/// Accepted JSON shapes for a quantity.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Whole(i64),
    Fractional(f64),
    Text(String),
}

impl From<RawQuantity> for Quantity {
    fn from(raw: RawQuantity) -> Self {
        match raw {
            RawQuantity::Whole(value) => Self::from_i64(value),
            RawQuantity::Fractional(value) => Self::from_f64(value),
            RawQuantity::Text(text) => Self::from_input(&text),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_positive() {
        assert_eq!(Quantity::from_input("5").get(), 5);
        assert_eq!(Quantity::from_input(" 12 ").get(), 12);
    }

    #[test]
    fn test_from_input_clamps_to_minimum() {
        assert_eq!(Quantity::from_input("0").get(), 1);
        assert_eq!(Quantity::from_input("-4").get(), 1);
        assert_eq!(Quantity::from_input("-0.5").get(), 1);
    }

    #[test]
    fn test_from_input_non_numeric() {
        assert_eq!(Quantity::from_input("").get(), 1);
        assert_eq!(Quantity::from_input("abc").get(), 1);
        assert_eq!(Quantity::from_input("3 shirts").get(), 1);
        assert_eq!(Quantity::from_input("NaN").get(), 1);
        assert_eq!(Quantity::from_input("inf").get(), 1);
    }

    #[test]
    fn test_from_input_fractional_is_floored() {
        assert_eq!(Quantity::from_input("2.7").get(), 2);
        assert_eq!(Quantity::from_input("1e1").get(), 10);
    }

    #[test]
    fn test_from_input_saturates() {
        assert_eq!(Quantity::from_input("99999999999").get(), u32::MAX);
        assert_eq!(Quantity::from_input("1e20").get(), u32::MAX);
    }

    #[test]
    fn test_new_clamps_zero() {
        assert_eq!(Quantity::new(0), Quantity::MIN);
        assert_eq!(Quantity::new(7).get(), 7);
        assert_eq!(Quantity::default(), Quantity::MIN);
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Quantity::new(2)).unwrap(), "2");
    }

    #[test]
    fn test_deserialize_coerces() {
        let q: Quantity = serde_json::from_str("3").unwrap();
        assert_eq!(q.get(), 3);
        let q: Quantity = serde_json::from_str("-2").unwrap();
        assert_eq!(q.get(), 1);
        let q: Quantity = serde_json::from_str("4.9").unwrap();
        assert_eq!(q.get(), 4);
        let q: Quantity = serde_json::from_str("\"6\"").unwrap();
        assert_eq!(q.get(), 6);
    }
}
