//! Reservation aggregate and its lifecycle state machine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use posada_core::{
    AggregateRoot, ClientId, DomainError, DomainResult, Entity, GuestId, ReservationId, RoomId,
};
use posada_services::AdditionalService;

/// Reservation lifecycle state.
///
/// Transitions: Pending→Confirmed, Confirmed→CheckedIn,
/// CheckedIn→CheckedOut; Cancelled is reachable from Pending and
/// Confirmed only. Everything else is illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::CheckedIn => "checked-in",
            ReservationStatus::CheckedOut => "checked-out",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate root: Reservation.
///
/// Reservations are never deleted; they only move through the state
/// machine and accrue services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    id: ReservationId,
    client_id: ClientId,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guest_count: u32,
    room_ids: Vec<RoomId>,
    guest_ids: Vec<GuestId>,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    services: Vec<AdditionalService>,
    version: u64,
}

impl Reservation {
    /// Stay-window rule: check-in is today or later, and strictly before
    /// check-out.
    pub fn validate_stay(
        check_in: NaiveDate,
        check_out: NaiveDate,
        today: NaiveDate,
    ) -> DomainResult<()> {
        if check_in < today {
            return Err(DomainError::validation(
                "check-in date cannot be in the past",
            ));
        }
        if check_in >= check_out {
            return Err(DomainError::validation(
                "check-in date must be before the check-out date",
            ));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: ReservationId,
        client_id: ClientId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guest_count: u32,
        room_ids: Vec<RoomId>,
        guest_ids: Vec<GuestId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            client_id,
            check_in,
            check_out,
            guest_count,
            room_ids,
            guest_ids,
            status: ReservationStatus::Pending,
            created_at: now,
            modified_at: now,
            services: Vec::new(),
            version: 1,
        }
    }

    pub fn id_typed(&self) -> ReservationId {
        self.id
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn check_in_date(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out_date(&self) -> NaiveDate {
        self.check_out
    }

    pub fn guest_count(&self) -> u32 {
        self.guest_count
    }

    pub fn room_ids(&self) -> &[RoomId] {
        &self.room_ids
    }

    pub fn guest_ids(&self) -> &[GuestId] {
        &self.guest_ids
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    pub fn services(&self) -> &[AdditionalService] {
        &self.services
    }

    /// Whole nights between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Whether the stay interval includes `date`, both ends inclusive.
    pub fn stay_includes(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date <= self.check_out
    }

    /// A non-cancelled reservation keeps its rooms reserved.
    pub fn holds_rooms(&self) -> bool {
        self.status != ReservationStatus::Cancelled
    }

    pub fn can_check_out(&self) -> bool {
        self.status == ReservationStatus::CheckedIn
    }

    pub(crate) fn confirm(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != ReservationStatus::Pending {
            return Err(illegal("confirm", self.status));
        }
        self.status = ReservationStatus::Confirmed;
        self.touch(now);
        Ok(())
    }

    pub(crate) fn check_in(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != ReservationStatus::Confirmed {
            return Err(illegal("check in", self.status));
        }
        self.status = ReservationStatus::CheckedIn;
        self.touch(now);
        Ok(())
    }

    pub(crate) fn check_out(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != ReservationStatus::CheckedIn {
            return Err(illegal("check out", self.status));
        }
        self.status = ReservationStatus::CheckedOut;
        self.touch(now);
        Ok(())
    }

    pub(crate) fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Pending | ReservationStatus::Confirmed => {
                self.status = ReservationStatus::Cancelled;
                self.touch(now);
                Ok(())
            }
            other => Err(illegal("cancel", other)),
        }
    }

    pub(crate) fn add_service(&mut self, service: AdditionalService, now: DateTime<Utc>) {
        self.services.push(service);
        self.touch(now);
    }

    pub(crate) fn remove_service(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
    ) -> DomainResult<AdditionalService> {
        if index >= self.services.len() {
            return Err(DomainError::validation(format!(
                "service index {index} is out of range"
            )));
        }
        let removed = self.services.remove(index);
        self.touch(now);
        Ok(removed)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_at = now;
        self.version += 1;
    }
}

fn illegal(action: &str, status: ReservationStatus) -> DomainError {
    DomainError::invalid_state(format!(
        "cannot {action} a reservation in state {status}"
    ))
}

impl Entity for Reservation {
    type Id = ReservationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Reservation {
    fn version(&self) -> u64 {
        self.version
    }
}
