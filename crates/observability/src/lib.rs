//! `posada-observability` — logging/tracing setup for the process.

pub mod tracing;

pub use crate::tracing::{init, init_for_tests};
