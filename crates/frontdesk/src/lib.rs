//! Front-desk facade over the hotel core.
//!
//! A thin orchestration layer: wires the managers over shared audit and
//! notification sinks, runs the check-in/check-out flows, and renders
//! invoice statements. HTTP/session concerns live outside this
//! workspace.

pub mod desk;
pub mod hotel;
pub mod profile;
mod view;

pub use desk::FrontDesk;
pub use hotel::Hotel;
pub use profile::HotelProfile;
