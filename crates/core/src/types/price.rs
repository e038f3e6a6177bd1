//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in the CMS as plain JSON numbers in the store's single
//! currency. `Price` keeps them as [`Decimal`] so that line totals do not pick
//! up floating point drift, and refuses negative amounts.
//!
//! Arithmetic saturates at [`Price::MAX`] instead of overflowing, so totals
//! over any valid catalog price and quantity never panic.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative price in the store's currency.
///
/// ## Examples
///
/// ```
/// use loomwise_core::Price;
/// use rust_decimal::Decimal;
///
/// let shirt = Price::new(Decimal::new(1999, 2)).unwrap();
/// assert_eq!(shirt.to_string(), "19.99");
/// assert_eq!((shirt * 2).to_string(), "39.98");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest representable price. Sums and products clamp here.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:.2}", self.0))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

// The CMS stores prices as JSON numbers, not strings.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-5, 1)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_line_arithmetic() {
        let price = Price::from_cents(1050).unwrap();
        let total: Price = [price * 2, Price::from_cents(1).unwrap()].into_iter().sum();
        assert_eq!(total.amount(), Decimal::new(2101, 2));
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total: Price = core::iter::empty().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_arithmetic_saturates_at_max() {
        let huge = Price::new(Decimal::from_i128_with_scale(10_i128.pow(20), 0)).unwrap();

        assert_eq!(huge * 1_000_000_000, Price::MAX);
        assert_eq!(Price::MAX + huge, Price::MAX);

        let total: Price = [huge * u32::MAX, huge * u32::MAX, huge].into_iter().sum();
        assert_eq!(total, Price::MAX);
        assert!(!total.to_string().is_empty());
    }

    #[test]
    fn test_deserializes_json_numbers() {
        let price: Price = serde_json::from_str("10").unwrap();
        assert_eq!(price.amount(), Decimal::from(10));

        let price: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(price.to_string(), "19.99");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("-1").is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Price::from_cents(2500).unwrap()).unwrap();
        assert!(json.is_number());
        assert_eq!(json.as_f64(), Some(25.0));
    }
}
