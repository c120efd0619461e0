//! Reservation manager: creation, lifecycle transitions and queries.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use posada_core::{
    ClientId, DomainError, DomainResult, GuestId, ReservationId, RoomId, SequenceGenerator,
};
use posada_events::{AuditSink, Notifier};
use posada_parties::{ClientLookup, GuestLookup};
use posada_rooms::RoomInventory;

use crate::reservation::Reservation;

/// Reservation request as received from the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub client_id: ClientId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: u32,
    pub room_ids: Vec<RoomId>,
    pub guest_ids: Vec<GuestId>,
}

/// Owns all reservations and serializes their transitions.
///
/// Lock discipline: operations touching rooms and the reservation store
/// together (`create_reservation`, `cancel`) take the room-inventory
/// guard first, then the store lock.
pub struct ReservationManager {
    reservations: RwLock<BTreeMap<ReservationId, Reservation>>,
    seq: SequenceGenerator,
    rooms: Arc<RoomInventory>,
    clients: Arc<dyn ClientLookup>,
    guests: Arc<dyn GuestLookup>,
    audit: Arc<dyn AuditSink>,
    notifier: Notifier,
}

impl ReservationManager {
    pub fn new(
        rooms: Arc<RoomInventory>,
        clients: Arc<dyn ClientLookup>,
        guests: Arc<dyn GuestLookup>,
        audit: Arc<dyn AuditSink>,
        notifier: Notifier,
    ) -> Self {
        Self {
            reservations: RwLock::new(BTreeMap::new()),
            seq: SequenceGenerator::new(),
            rooms,
            clients,
            guests,
            audit,
            notifier,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<ReservationId, Reservation>> {
        self.reservations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<ReservationId, Reservation>> {
        self.reservations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a Pending reservation, reserving every requested room.
    ///
    /// Availability of **all** rooms is validated before any is reserved,
    /// inside one room-inventory critical section: a partial failure
    /// leaves no room touched.
    pub fn create_reservation(&self, request: NewReservation) -> DomainResult<Reservation> {
        let client = self.clients.client(request.client_id).ok_or_else(|| {
            DomainError::not_found(format!("client {} not found", request.client_id))
        })?;

        let today = Utc::now().date_naive();
        Reservation::validate_stay(request.check_in, request.check_out, today)?;

        let mut seen = BTreeSet::new();
        for room_id in &request.room_ids {
            if !seen.insert(*room_id) {
                return Err(DomainError::validation(format!(
                    "room {room_id} is listed more than once"
                )));
            }
        }

        // Attach only resolvable guests, as the request layer may carry
        // stale ids.
        let guest_ids: Vec<GuestId> = request
            .guest_ids
            .iter()
            .copied()
            .filter(|id| self.guests.guest(*id).is_some())
            .collect();

        let mut inventory = self.rooms.lock_exclusive();
        for room_id in &request.room_ids {
            let room = inventory.get(*room_id).ok_or_else(|| {
                DomainError::not_found(format!("room {room_id} not found"))
            })?;
            if !room.is_available() {
                return Err(DomainError::conflict(format!(
                    "room {} is not available",
                    room.number()
                )));
            }
        }

        let mut reserved: Vec<RoomId> = Vec::with_capacity(request.room_ids.len());
        for room_id in &request.room_ids {
            if let Err(err) = inventory.reserve(*room_id) {
                for undo in reserved {
                    let _ = inventory.release(undo);
                }
                return Err(err);
            }
            reserved.push(*room_id);
        }

        let now = Utc::now();
        let id = ReservationId::new(self.seq.next_id());
        let reservation = Reservation::new(
            id,
            request.client_id,
            request.check_in,
            request.check_out,
            request.guest_count,
            request.room_ids,
            guest_ids,
            now,
        );

        let mut store = self.write();
        store.insert(id, reservation.clone());
        drop(store);
        drop(inventory);

        self.audit.record(
            "RESERVATION created",
            "system",
            &format!(
                "reservation #{id} - client: {} - {} to {}",
                client.full_name(),
                reservation.check_in_date(),
                reservation.check_out_date()
            ),
        );
        tracing::info!(
            reservation = %id,
            client = %request.client_id,
            rooms = reservation.room_ids().len(),
            "reservation created"
        );
        Ok(reservation)
    }

    /// Pending → Confirmed; sends a best-effort confirmation notice.
    pub fn confirm(&self, id: ReservationId) -> DomainResult<Reservation> {
        let now = Utc::now();
        let updated = self.with_reservation_mut(id, |r| {
            r.confirm(now)?;
            Ok(r.clone())
        })?;

        self.audit
            .record("RESERVATION confirmed", "system", &format!("reservation #{id}"));
        if let Some(client) = self.clients.client(updated.client_id()) {
            self.notifier.send(
                client.email(),
                "Reservation Confirmed",
                &format!(
                    "Your reservation #{id} is confirmed. Check-in: {}, check-out: {}.",
                    updated.check_in_date(),
                    updated.check_out_date()
                ),
            );
        }
        Ok(updated)
    }

    /// Confirmed → CheckedIn; notifies the holder (best-effort).
    pub fn check_in(&self, id: ReservationId) -> DomainResult<Reservation> {
        let now = Utc::now();
        let updated = self.with_reservation_mut(id, |r| {
            r.check_in(now)?;
            Ok(r.clone())
        })?;

        let numbers = self.room_numbers(&updated).join(", ");
        self.audit.record(
            "CHECK-IN",
            "front desk",
            &format!("reservation #{id} - rooms: {numbers}"),
        );
        if let Some(client) = self.clients.client(updated.client_id()) {
            self.notifier.send(
                client.email(),
                "Check-In Complete",
                &format!(
                    "Welcome! Your check-in is complete. Rooms: {numbers}. Enjoy your stay!"
                ),
            );
        }
        for guest in updated
            .guest_ids()
            .iter()
            .filter_map(|id| self.guests.guest(*id))
        {
            if guest.email().is_empty() {
                continue;
            }
            self.notifier.send(
                guest.email(),
                "Welcome",
                &format!(
                    "Welcome, {}! Your room is ready: {numbers}. Enjoy your stay!",
                    guest.full_name()
                ),
            );
        }
        tracing::info!(reservation = %id, "checked in");
        Ok(updated)
    }

    /// CheckedIn → CheckedOut. Rooms stay reserved: only an explicit
    /// cancellation releases them. Billing is orchestrated by the front
    /// desk around this transition.
    pub fn check_out(&self, id: ReservationId) -> DomainResult<Reservation> {
        let now = Utc::now();
        let updated = self.with_reservation_mut(id, |r| {
            r.check_out(now)?;
            Ok(r.clone())
        })?;

        tracing::info!(reservation = %id, "checked out");
        Ok(updated)
    }

    /// Cancel from Pending or Confirmed, releasing every assigned room
    /// in the same critical section as the state change.
    pub fn cancel(&self, id: ReservationId) -> DomainResult<Reservation> {
        let now = Utc::now();

        let mut inventory = self.rooms.lock_exclusive();
        let mut store = self.write();
        let reservation = store.get_mut(&id).ok_or_else(|| {
            DomainError::not_found(format!("reservation {id} not found"))
        })?;
        reservation.cancel(now)?;
        for room_id in reservation.room_ids().to_vec() {
            inventory.release(room_id)?;
        }
        let updated = reservation.clone();
        drop(store);
        drop(inventory);

        self.audit
            .record("RESERVATION cancelled", "system", &format!("reservation #{id}"));
        if let Some(client) = self.clients.client(updated.client_id()) {
            self.notifier.send(
                client.email(),
                "Reservation Cancelled",
                &format!("Your reservation #{id} has been cancelled."),
            );
        }
        tracing::info!(reservation = %id, "reservation cancelled");
        Ok(updated)
    }

    pub fn find_by_id(&self, id: ReservationId) -> Option<Reservation> {
        self.read().get(&id).cloned()
    }

    pub fn list_all(&self) -> Vec<Reservation> {
        self.read().values().cloned().collect()
    }

    pub fn list_by_client(&self, client_id: ClientId) -> Vec<Reservation> {
        self.read()
            .values()
            .filter(|r| r.client_id() == client_id)
            .cloned()
            .collect()
    }

    /// Reservations whose stay interval includes `date`, inclusive on
    /// both ends.
    pub fn list_by_date(&self, date: NaiveDate) -> Vec<Reservation> {
        self.read()
            .values()
            .filter(|r| r.stay_includes(date))
            .cloned()
            .collect()
    }

    /// Run a closure against one reservation under the store write lock.
    pub(crate) fn with_reservation_mut<R>(
        &self,
        id: ReservationId,
        f: impl FnOnce(&mut Reservation) -> DomainResult<R>,
    ) -> DomainResult<R> {
        let mut store = self.write();
        let reservation = store.get_mut(&id).ok_or_else(|| {
            DomainError::not_found(format!("reservation {id} not found"))
        })?;
        f(reservation)
    }

    fn room_numbers(&self, reservation: &Reservation) -> Vec<String> {
        reservation
            .room_ids()
            .iter()
            .map(|id| {
                self.rooms
                    .find_by_id(*id)
                    .map(|room| room.number().to_owned())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect()
    }
}
