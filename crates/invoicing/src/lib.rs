//! Invoice computation module.
//!
//! Derives an immutable, itemized invoice from a reservation plus its
//! room, minibar and service data. Totals are always recomputed from
//! source data, never patched incrementally.

pub mod engine;
pub mod invoice;

pub use engine::InvoiceEngine;
pub use invoice::{ChargeKind, Invoice, InvoiceLine, PaymentMethod};
