//! Additional-services ledger: billable add-ons per reservation.

use std::sync::Arc;

use chrono::Utc;

use posada_core::{DomainError, DomainResult, Money, ReservationId, RoomId};
use posada_events::AuditSink;
use posada_rooms::{Room, RoomInventory};
use posada_services::{AdditionalService, MealType, RobeSize};

use crate::manager::ReservationManager;

pub struct AdditionalServicesLedger {
    reservations: Arc<ReservationManager>,
    rooms: Arc<RoomInventory>,
    audit: Arc<dyn AuditSink>,
}

impl AdditionalServicesLedger {
    pub fn new(
        reservations: Arc<ReservationManager>,
        rooms: Arc<RoomInventory>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            reservations,
            rooms,
            audit,
        }
    }

    pub fn add_laundry(
        &self,
        reservation_id: ReservationId,
        description: &str,
        piece_count: u32,
        price_per_piece: Money,
    ) -> DomainResult<AdditionalService> {
        self.append(
            reservation_id,
            AdditionalService::Laundry {
                description: description.to_owned(),
                piece_count,
                price_per_piece,
            },
        )
    }

    pub fn add_restaurant(
        &self,
        reservation_id: ReservationId,
        meal: MealType,
        quantity: u32,
        unit_price: Money,
    ) -> DomainResult<AdditionalService> {
        self.append(
            reservation_id,
            AdditionalService::Restaurant {
                meal,
                quantity,
                unit_price,
            },
        )
    }

    /// Sell bathrobes through a robe-capable room (Executive/Suite). The
    /// unit price is indexed by size.
    pub fn add_robe_sale(
        &self,
        reservation_id: ReservationId,
        room_id: RoomId,
        size: RobeSize,
        quantity: u32,
    ) -> DomainResult<AdditionalService> {
        let room = self
            .rooms
            .find_by_id(room_id)
            .ok_or_else(|| DomainError::not_found(format!("room {room_id} not found")))?;
        if !room.kind().sells_robes() {
            return Err(DomainError::unsupported(format!(
                "room {} does not sell bathrobes",
                room.number()
            )));
        }

        self.append(
            reservation_id,
            AdditionalService::RobeSale {
                size,
                quantity,
                unit_price: size.unit_price(),
            },
        )
    }

    /// Remove the service at `index`; bounds-checked.
    pub fn remove(
        &self,
        reservation_id: ReservationId,
        index: usize,
    ) -> DomainResult<AdditionalService> {
        let now = Utc::now();
        let removed = self
            .reservations
            .with_reservation_mut(reservation_id, |r| r.remove_service(index, now))?;

        self.audit.record(
            "SERVICE removed",
            "front desk",
            &format!("reservation #{reservation_id}: {}", removed.describe()),
        );
        Ok(removed)
    }

    pub fn services_for(
        &self,
        reservation_id: ReservationId,
    ) -> DomainResult<Vec<AdditionalService>> {
        let reservation = self.reservations.find_by_id(reservation_id).ok_or_else(|| {
            DomainError::not_found(format!("reservation {reservation_id} not found"))
        })?;
        Ok(reservation.services().to_vec())
    }

    /// Σ `cost()` over every service on the reservation.
    pub fn total_cost(&self, reservation_id: ReservationId) -> DomainResult<Money> {
        let reservation = self.reservations.find_by_id(reservation_id).ok_or_else(|| {
            DomainError::not_found(format!("reservation {reservation_id} not found"))
        })?;
        Money::sum(reservation.services().iter().map(AdditionalService::cost))
    }

    /// The reservation's rooms that can sell robes.
    pub fn robe_capable_rooms(
        &self,
        reservation_id: ReservationId,
    ) -> DomainResult<Vec<Room>> {
        let reservation = self.reservations.find_by_id(reservation_id).ok_or_else(|| {
            DomainError::not_found(format!("reservation {reservation_id} not found"))
        })?;
        Ok(reservation
            .room_ids()
            .iter()
            .filter_map(|id| self.rooms.find_by_id(*id))
            .filter(|room| room.kind().sells_robes())
            .collect())
    }

    fn append(
        &self,
        reservation_id: ReservationId,
        service: AdditionalService,
    ) -> DomainResult<AdditionalService> {
        // Validates count and arithmetic before anything is stored.
        let cost = service.checked_cost()?;

        let now = Utc::now();
        self.reservations.with_reservation_mut(reservation_id, |r| {
            r.add_service(service.clone(), now);
            Ok(())
        })?;

        self.audit.record(
            "SERVICE added",
            "front desk",
            &format!(
                "reservation #{reservation_id}: {} - {cost}",
                service.describe()
            ),
        );
        tracing::debug!(
            reservation = %reservation_id,
            service = %service.describe(),
            "additional service added"
        );
        Ok(service)
    }
}
