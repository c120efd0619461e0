//! Minibar consumption ledger.
//!
//! Consumption accrues against the **room identity**, not the
//! reservation: records persist until explicitly cleared, and no clearing
//! operation exists. A stay inherits whatever the room's ledger already
//! holds.

use std::sync::Arc;

use chrono::Utc;

use posada_core::{DomainError, DomainResult, Money, ProductId, RoomId};
use posada_events::AuditSink;

use crate::inventory::RoomInventory;
use crate::minibar::Consumption;

pub struct MinibarLedger {
    inventory: Arc<RoomInventory>,
    audit: Arc<dyn AuditSink>,
}

impl MinibarLedger {
    pub fn new(inventory: Arc<RoomInventory>, audit: Arc<dyn AuditSink>) -> Self {
        Self { inventory, audit }
    }

    /// Record one consumption: decrements stock and appends the record,
    /// or changes nothing at all.
    pub fn register_consumption(
        &self,
        room_id: RoomId,
        product_id: ProductId,
        quantity: u32,
    ) -> DomainResult<Consumption> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let record = self.inventory.with_room_mut(room_id, |room| {
            let number = room.number().to_owned();
            let minibar = room.minibar_mut().ok_or_else(|| {
                DomainError::not_found(format!("room {number} has no minibar"))
            })?;
            minibar.consume(room_id, product_id, quantity, Utc::now())
        })?;

        self.audit.record(
            "MINIBAR consumption",
            "front desk",
            &format!(
                "room #{room_id} - {} x{} - total: {}",
                record.product_name, record.quantity, record.subtotal
            ),
        );
        tracing::info!(
            room = %room_id,
            product = %record.product_name,
            quantity,
            "minibar consumption registered"
        );
        Ok(record)
    }

    /// Every consumption recorded against the room, oldest first.
    pub fn consumption_for(&self, room_id: RoomId) -> DomainResult<Vec<Consumption>> {
        let room = self
            .inventory
            .find_by_id(room_id)
            .ok_or_else(|| DomainError::not_found(format!("room {room_id} not found")))?;
        Ok(room
            .minibar()
            .map(|m| m.consumptions().to_vec())
            .unwrap_or_default())
    }

    /// Running cost of the room's ledger; zero for minibar-less rooms.
    pub fn total_cost(&self, room_id: RoomId) -> DomainResult<Money> {
        let room = self
            .inventory
            .find_by_id(room_id)
            .ok_or_else(|| DomainError::not_found(format!("room {room_id} not found")))?;
        match room.minibar() {
            Some(minibar) => minibar.consumption_total(),
            None => Ok(Money::ZERO),
        }
    }

    pub fn has_minibar(&self, room_id: RoomId) -> DomainResult<bool> {
        let room = self
            .inventory
            .find_by_id(room_id)
            .ok_or_else(|| DomainError::not_found(format!("room {room_id} not found")))?;
        Ok(room.minibar().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSpec;
    use posada_events::InMemoryAuditSink;

    fn ledger() -> (MinibarLedger, Arc<RoomInventory>, Arc<InMemoryAuditSink>) {
        let audit = Arc::new(InMemoryAuditSink::new());
        let inventory = Arc::new(RoomInventory::new(audit.clone()));
        inventory.initialize(&CatalogSpec::default()).unwrap();
        (
            MinibarLedger::new(inventory.clone(), audit.clone()),
            inventory,
            audit,
        )
    }

    fn room_id(inventory: &RoomInventory, number: &str) -> RoomId {
        inventory.find_by_number(number).unwrap().id_typed()
    }

    #[test]
    fn consumption_decrements_stock_and_audits() {
        let (ledger, inventory, audit) = ledger();
        let executive = room_id(&inventory, "501");

        // Still water, 3 of 4 in stock.
        let record = ledger
            .register_consumption(executive, ProductId::new(1), 3)
            .unwrap();
        assert_eq!(record.subtotal, Money::new(9_000));

        let room = inventory.find_by_id(executive).unwrap();
        assert_eq!(
            room.minibar()
                .unwrap()
                .product(ProductId::new(1))
                .unwrap()
                .stock(),
            1
        );

        let actions: Vec<_> = audit.entries().into_iter().map(|e| e.action).collect();
        assert!(actions.contains(&"MINIBAR consumption".to_owned()));
    }

    #[test]
    fn over_stock_request_reports_available_and_changes_nothing() {
        let (ledger, inventory, _) = ledger();
        let executive = room_id(&inventory, "501");

        let err = ledger
            .register_consumption(executive, ProductId::new(1), 5)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                available: 4,
                requested: 5
            }
        );

        assert!(ledger.consumption_for(executive).unwrap().is_empty());
        assert_eq!(ledger.total_cost(executive).unwrap(), Money::ZERO);
    }

    #[test]
    fn zero_quantity_is_rejected_before_touching_the_room() {
        let (ledger, inventory, audit) = ledger();
        let executive = room_id(&inventory, "501");

        let err = ledger
            .register_consumption(executive, ProductId::new(1), 0)
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        // Only the catalog-initialization entry exists.
        assert_eq!(audit.entries().len(), 1);
    }

    #[test]
    fn single_rooms_have_no_minibar() {
        let (ledger, inventory, _) = ledger();
        let single = room_id(&inventory, "201");

        assert!(!ledger.has_minibar(single).unwrap());
        let err = ledger
            .register_consumption(single, ProductId::new(1), 1)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        // Reads still answer, with empty data.
        assert!(ledger.consumption_for(single).unwrap().is_empty());
        assert_eq!(ledger.total_cost(single).unwrap(), Money::ZERO);
    }

    #[test]
    fn premium_products_exist_only_in_suites() {
        let (ledger, inventory, _) = ledger();
        let executive = room_id(&inventory, "501");
        let suite = room_id(&inventory, "601");

        // Champagne is a suite-only product.
        let err = ledger
            .register_consumption(executive, ProductId::new(14), 1)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let record = ledger
            .register_consumption(suite, ProductId::new(14), 1)
            .unwrap();
        assert_eq!(record.subtotal, Money::new(120_000));
    }

    #[test]
    fn totals_accumulate_across_recordings() {
        let (ledger, inventory, _) = ledger();
        let suite = room_id(&inventory, "601");

        ledger
            .register_consumption(suite, ProductId::new(1), 2)
            .unwrap(); // 6 000
        ledger
            .register_consumption(suite, ProductId::new(12), 1)
            .unwrap(); // 80 000

        assert_eq!(ledger.consumption_for(suite).unwrap().len(), 2);
        assert_eq!(ledger.total_cost(suite).unwrap(), Money::new(86_000));
    }

    #[test]
    fn unknown_room_is_not_found() {
        let (ledger, _, _) = ledger();
        let err = ledger
            .register_consumption(RoomId::new(999), ProductId::new(1), 1)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(ledger.consumption_for(RoomId::new(999)).is_err());
        assert!(ledger.total_cost(RoomId::new(999)).is_err());
        assert!(ledger.has_minibar(RoomId::new(999)).is_err());
    }
}
