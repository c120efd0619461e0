//! Room inventory and minibar domain module.
//!
//! Owns the room catalog, per-room availability state and, for capable
//! room kinds, the embedded minibar stock plus its consumption ledger.
//! Pure in-memory state behind one inventory lock; no IO.

pub mod catalog;
pub mod inventory;
pub mod ledger;
pub mod minibar;
pub mod room;

pub use catalog::CatalogSpec;
pub use inventory::{RoomInventory, RoomInventoryGuard};
pub use ledger::MinibarLedger;
pub use minibar::{Consumption, Minibar, MinibarProduct, ProductCategory};
pub use room::{BedType, Room, RoomKind, RoomState};
