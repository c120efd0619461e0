//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// A closed set of deterministic business failures. Callers map each kind
/// to their own presentation; infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (malformed or out-of-range input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced client/room/reservation/product/invoice is unknown.
    #[error("not found: {0}")]
    NotFound(String),

    /// A business-rule conflict (room unavailable, duplicate identifying
    /// document, stale record version).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A minibar consumption exceeds the stock currently on hand.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { available: u32, requested: u32 },

    /// An illegal lifecycle transition.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The target does not support the requested operation (e.g. a robe
    /// sale on a room type that does not sell robes).
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn insufficient_stock(available: u32, requested: u32) -> Self {
        Self::InsufficientStock {
            available,
            requested,
        }
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
