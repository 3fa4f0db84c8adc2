//! Money representation using decimal arithmetic.
//!
//! The storefront operates in a single currency, so `Price` is a thin
//! newtype over [`rust_decimal::Decimal`] rather than an amount/currency
//! pair. Amounts carry minor-unit precision (cents) and are serialized as
//! decimal strings.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency.
///
/// ```
/// use adas_kitchen_core::Price;
///
/// let unit = Price::from_minor(1250); // $12.50
/// let line = unit.times(3);
/// assert_eq!(line.to_string(), "$37.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero in the store currency.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a raw decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole currency units (e.g., dollars).
    #[must_use]
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a price from minor currency units (e.g., cents).
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity (line total = unit price x quantity).
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        assert_eq!(Price::from_minor(999).to_string(), "$9.99");
        assert_eq!(Price::from_minor(100).to_string(), "$1.00");
    }

    #[test]
    fn test_times_and_sum() {
        let lines = [Price::from_minor(1200).times(3), Price::from_minor(550)];
        let total: Price = lines.into_iter().sum();
        assert_eq!(total, Price::from_minor(4150));
    }

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Price::from_major(12).to_string(), "$12.00");
        assert_eq!(Price::from_minor(1250).to_string(), "$12.50");
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let price = Price::from_minor(1234);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"12.34\"");

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_ordering() {
        assert!(Price::from_minor(4999) < Price::from_major(50));
        assert!(Price::from_major(50) >= Price::from_major(50));
    }
}
