//! The additional-service tagged variant.
//!
//! Laundry and restaurant orders carry caller-provided prices; robe sales
//! price by size from a fixed table. Amounts are validated against
//! overflow when the service is appended to a reservation, so `cost()`
//! on a stored service is total.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use posada_core::{DomainError, DomainResult, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    RoomService,
}

impl core::fmt::Display for MealType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::RoomService => "room service",
        })
    }
}

/// Bathrobe size; each size has a fixed unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobeSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl RobeSize {
    pub fn code(&self) -> &'static str {
        match self {
            RobeSize::Small => "S",
            RobeSize::Medium => "M",
            RobeSize::Large => "L",
            RobeSize::ExtraLarge => "XL",
        }
    }

    pub fn unit_price(&self) -> Money {
        match self {
            RobeSize::Small => Money::new(60_000),
            RobeSize::Medium => Money::new(65_000),
            RobeSize::Large => Money::new(70_000),
            RobeSize::ExtraLarge => Money::new(75_000),
        }
    }
}

impl FromStr for RobeSize {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "S" => Ok(RobeSize::Small),
            "M" => Ok(RobeSize::Medium),
            "L" => Ok(RobeSize::Large),
            "XL" => Ok(RobeSize::ExtraLarge),
            other => Err(DomainError::validation(format!(
                "unknown robe size: {other}"
            ))),
        }
    }
}

impl core::fmt::Display for RobeSize {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// A billable add-on attached to a reservation, independent of room and
/// minibar charges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum AdditionalService {
    Laundry {
        description: String,
        piece_count: u32,
        price_per_piece: Money,
    },
    Restaurant {
        meal: MealType,
        quantity: u32,
        unit_price: Money,
    },
    RobeSale {
        size: RobeSize,
        quantity: u32,
        unit_price: Money,
    },
}

impl AdditionalService {
    /// Validated cost of the service; fails on count zero or overflow.
    /// Ledgers call this before appending, so a stored service's
    /// [`AdditionalService::cost`] is always defined.
    pub fn checked_cost(&self) -> DomainResult<Money> {
        let (unit, count) = self.unit_and_count();
        if count == 0 {
            return Err(DomainError::validation("service quantity must be positive"));
        }
        unit.checked_mul(i64::from(count))
    }

    /// Cost of the service (unit price × count).
    pub fn cost(&self) -> Money {
        let (unit, count) = self.unit_and_count();
        Money::new(unit.amount().saturating_mul(i64::from(count)))
    }

    pub fn describe(&self) -> String {
        match self {
            AdditionalService::Laundry {
                description,
                piece_count,
                ..
            } => format!("Laundry: {description} ({piece_count} pieces)"),
            AdditionalService::Restaurant { meal, quantity, .. } => {
                format!("Restaurant: {meal} x{quantity}")
            }
            AdditionalService::RobeSale { size, quantity, .. } => {
                format!("Bathrobe size {size} x{quantity}")
            }
        }
    }

    fn unit_and_count(&self) -> (Money, u32) {
        match self {
            AdditionalService::Laundry {
                piece_count,
                price_per_piece,
                ..
            } => (*price_per_piece, *piece_count),
            AdditionalService::Restaurant {
                quantity,
                unit_price,
                ..
            } => (*unit_price, *quantity),
            AdditionalService::RobeSale {
                quantity,
                unit_price,
                ..
            } => (*unit_price, *quantity),
        }
    }
}
