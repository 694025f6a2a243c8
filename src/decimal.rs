use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Money type with 8 decimal places of working precision.
///
/// Display rounding (two places for euros) happens at the edges, never
/// inside the accrual loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));
    /// largest single cash flow, 10^15; keeps the accrual products inside `Decimal` range
    pub const MAX_CASH_FLOW: Money =
        Money(Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0));

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(8))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.round_dp(8)))
    }

    /// create from whole euros
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from cents
    pub fn from_minor(amount: i64) -> Self {
        Money(Decimal::new(amount, 2))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    /// round to cents, halves away from zero
    pub fn round_cents(&self) -> Self {
        Money(self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly below zero; `-0` is not negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// simple interest on this balance for `days` at `annual_rate` over a `year_basis` day year
    pub fn simple_interest(&self, annual_rate: Rate, days: i64, year_basis: u32) -> Self {
        let interest =
            self.0 * Decimal::from(days) / Decimal::from(year_basis) * annual_rate.as_decimal();
        Money(interest.round_dp(8))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money((self.0 + other.0).round_dp(8))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = (self.0 + other.0).round_dp(8);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money((self.0 - other.0).round_dp(8))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = (self.0 - other.0).round_dp(8);
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

/// annualized interest rate, stored as a fraction (0.02 for 2%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    /// highest accepted annual rate, 10 000%
    pub const MAX: Rate = Rate(Decimal::ONE_HUNDRED);

    /// create from decimal (e.g., 0.02 for 2%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 2 or dec!(2.5))
    pub fn from_percentage(p: impl Into<Decimal>) -> Self {
        Rate(p.into() / Decimal::ONE_HUNDRED)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// non-negative and no higher than [`Rate::MAX`]
    pub fn is_valid(&self) -> bool {
        !self.is_negative() && *self <= Rate::MAX
    }

    /// percentage rounded for display and export, halves away from zero
    pub fn percentage_dp(&self, dp: u32) -> Decimal {
        self.as_percentage()
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.to_string(), "100.12345679");
    }

    #[test]
    fn test_cash_flow_ceiling() {
        assert_eq!(Money::MAX_CASH_FLOW, Money::from_major(1_000_000_000_000_000));
        assert!(Rate::from_percentage(10_000).is_valid());
        assert!(!Rate::from_percentage(10_001).is_valid());
        assert!(!Rate::from_percentage(-1).is_valid());
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Money::from_minor(12_345), Money::from_str_exact("123.45").unwrap());
        assert_eq!(Money::from_minor(1), Money::CENT);
    }

    #[test]
    fn test_simple_interest_actual_365() {
        let balance = Money::from_major(100_000);
        let rate = Rate::from_percentage(2);

        let interest = balance.simple_interest(rate, 198, 365);
        assert_eq!(interest.round_cents().to_string(), "1084.93");
    }

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(Money::from_str_exact("2.345").unwrap().round_cents().to_string(), "2.35");
        assert_eq!(Money::from_str_exact("-2.345").unwrap().round_cents().to_string(), "-2.35");
    }

    #[test]
    fn test_simple_interest_zero_days() {
        let balance = Money::from_major(50_000);
        let interest = balance.simple_interest(Rate::from_percentage(5), 0, 365);
        assert!(interest.is_zero());
    }

    #[test]
    fn test_fractional_percentage() {
        let rate = Rate::from_percentage(dec!(2.75));
        assert_eq!(rate.as_decimal(), dec!(0.0275));
        assert_eq!(rate.to_string(), "2.75%");
    }

    #[test]
    fn test_sum_and_negation() {
        let total: Money = [Money::from_major(10), Money::from_major(5)].iter().sum();
        assert_eq!(total, Money::from_major(15));
        assert!((-total).is_negative());
        assert!(!Money::ZERO.is_negative());
    }
}
