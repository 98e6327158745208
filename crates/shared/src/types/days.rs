//! Day-count type with decimal precision.
//!
//! CRITICAL: Never use floating-point for entitlement calculations.
//! Half-day leave exists, so counts are fractional; this type wraps
//! `rust_decimal::Decimal` for exact arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A count of leave days (possibly fractional, e.g. half days).
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct DayCount(pub Decimal);

impl DayCount {
    /// Zero days.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a day count from a decimal value.
    #[must_use]
    pub const fn new(days: Decimal) -> Self {
        Self(days)
    }

    /// Creates a day count from a whole number of days.
    #[must_use]
    pub fn whole(days: i64) -> Self {
        Self(Decimal::from(days))
    }

    /// Returns the inner decimal value.
    #[must_use]
    pub const fn into_inner(self) -> Decimal {
        self.0
    }

    /// Returns true if the count is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the count is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true if the count is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns the smaller of two counts.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self <= other { self } else { other }
    }
}

impl std::ops::Add for DayCount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for DayCount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for DayCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, d| acc + d)
    }
}

impl std::fmt::Display for DayCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for DayCount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_day_count_whole() {
        assert_eq!(DayCount::whole(5).into_inner(), dec!(5));
    }

    #[test]
    fn test_day_count_zero() {
        assert!(DayCount::ZERO.is_zero());
        assert!(!DayCount::ZERO.is_negative());
        assert!(!DayCount::ZERO.is_positive());
    }

    #[test]
    fn test_day_count_signs() {
        assert!(DayCount::new(dec!(0.5)).is_positive());
        assert!(DayCount::new(dec!(-1)).is_negative());
    }

    #[test]
    fn test_day_count_arithmetic() {
        let a = DayCount::new(dec!(2.5));
        let b = DayCount::whole(1);
        assert_eq!(a + b, DayCount::new(dec!(3.5)));
        assert_eq!(a - b, DayCount::new(dec!(1.5)));
    }

    #[test]
    fn test_day_count_ordering_and_min() {
        let small = DayCount::whole(3);
        let large = DayCount::whole(7);
        assert!(small < large);
        assert_eq!(small.min(large), small);
        assert_eq!(large.min(small), small);
    }

    #[test]
    fn test_day_count_sum() {
        let total: DayCount = [DayCount::whole(1), DayCount::new(dec!(0.5))]
            .into_iter()
            .sum();
        assert_eq!(total, DayCount::new(dec!(1.5)));
    }

    #[test]
    fn test_day_count_display() {
        assert_eq!(DayCount::new(dec!(2.5)).to_string(), "2.5");
    }
}
