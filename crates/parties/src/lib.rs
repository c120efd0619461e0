//! Client and guest identity management.
//!
//! Clients hold the reservation (and pay the bill); guests occupy the
//! rooms. Both live in their own in-memory directories and are consumed
//! by the reservation/invoicing core through the [`ClientLookup`] and
//! [`GuestLookup`] seams.

pub mod client;
pub mod guest;
pub mod validate;

pub use client::{Client, ClientDirectory, ClientLookup, DocumentKind, NewClient};
pub use guest::{Guest, GuestDirectory, GuestLookup, NewGuest};
