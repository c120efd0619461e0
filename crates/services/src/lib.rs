//! Additional billable services attached to a reservation.

pub mod service;

pub use service::{AdditionalService, MealType, RobeSize};
