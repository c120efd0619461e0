//! Reservation lifecycle module.
//!
//! Owns reservations, their state machine and room assignment, plus the
//! ledger of additional services accrued against each reservation.

pub mod ledger;
pub mod manager;
pub mod reservation;

pub use ledger::AdditionalServicesLedger;
pub use manager::{NewReservation, ReservationManager};
pub use reservation::{Reservation, ReservationStatus};
