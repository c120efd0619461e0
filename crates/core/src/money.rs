//! Money amounts.
//!
//! Amounts are Colombian pesos held as a signed integer (no subunit).
//! Percentages are expressed in basis points so surcharge and tax math is
//! exact and deterministic; arithmetic is overflow-checked.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// An amount of money in pesos.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    pub const fn amount(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(overflow)
    }

    pub fn checked_mul(self, factor: i64) -> DomainResult<Money> {
        self.0
            .checked_mul(factor)
            .map(Money)
            .ok_or_else(overflow)
    }

    /// A percentage of this amount, expressed in basis points (1/100th of
    /// a percent): `basis_points(250)` is 2.5%. Truncates toward zero.
    pub fn basis_points(self, basis_points: i64) -> DomainResult<Money> {
        let scaled = self.0.checked_mul(basis_points).ok_or_else(overflow)?;
        Ok(Money(scaled / 10_000))
    }

    /// Sum a collection of amounts, failing on overflow.
    pub fn sum(amounts: impl IntoIterator<Item = Money>) -> DomainResult<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, Money::checked_add)
    }
}

fn overflow() -> DomainError {
    DomainError::validation("money amount overflow")
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    /// Peso formatting with dot-grouped thousands: `$1.458.000`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}${grouped}")
    }
}
