//! Strongly-typed identifiers used across the domain.
//!
//! Every aggregate collection hands out ids from its own
//! [`SequenceGenerator`]; there are no ambient global counters.

use core::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! impl_sequence_id {
    ($t:ident, $name:literal) => {
        #[doc = concat!("Identifier of a ", $name, ".")]
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $t(u64);

        impl $t {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.trim().parse::<u64>().map_err(|e| {
                    DomainError::validation(format!("{} id: {}", $name, e))
                })?;
                Ok(Self(value))
            }
        }
    };
}

impl_sequence_id!(RoomId, "room");
impl_sequence_id!(ProductId, "minibar product");
impl_sequence_id!(ClientId, "client");
impl_sequence_id!(GuestId, "guest");
impl_sequence_id!(ReservationId, "reservation");
impl_sequence_id!(InvoiceId, "invoice");

/// Monotonic id sequence owned by one manager.
///
/// Increments are atomic: two concurrent requests can never be assigned
/// the same id.
#[derive(Debug)]
pub struct SequenceGenerator {
    next: AtomicU64,
}

impl SequenceGenerator {
    /// A sequence starting at 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Allocate the next id in the sequence.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The id the next call to [`SequenceGenerator::next_id`] would return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}
