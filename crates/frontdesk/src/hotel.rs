//! Process wiring: one call assembles the whole hotel core.

use std::sync::Arc;

use posada_core::DomainResult;
use posada_events::{AuditSink, NotificationSink, Notifier};
use posada_invoicing::InvoiceEngine;
use posada_parties::{ClientDirectory, GuestDirectory};
use posada_reservations::{AdditionalServicesLedger, ReservationManager};
use posada_rooms::{CatalogSpec, MinibarLedger, RoomInventory};

use crate::desk::FrontDesk;
use crate::profile::HotelProfile;

/// The assembled hotel: every manager wired over shared sinks, with the
/// room catalog seeded. Collaborating request layers hold this and call
/// into the parts they need.
pub struct Hotel {
    pub profile: HotelProfile,
    pub audit: Arc<dyn AuditSink>,
    pub clients: Arc<ClientDirectory>,
    pub guests: Arc<GuestDirectory>,
    pub rooms: Arc<RoomInventory>,
    pub minibar: Arc<MinibarLedger>,
    pub reservations: Arc<ReservationManager>,
    pub services: Arc<AdditionalServicesLedger>,
    pub invoices: Arc<InvoiceEngine>,
    pub front_desk: FrontDesk,
}

impl Hotel {
    /// Deterministically regenerate the catalog and wire every component.
    pub fn bootstrap(
        catalog: &CatalogSpec,
        profile: HotelProfile,
        audit: Arc<dyn AuditSink>,
        notifications: Arc<dyn NotificationSink>,
    ) -> DomainResult<Hotel> {
        let notifier = Notifier::new(notifications, audit.clone());

        let rooms = Arc::new(RoomInventory::new(audit.clone()));
        rooms.initialize(catalog)?;
        let minibar = Arc::new(MinibarLedger::new(rooms.clone(), audit.clone()));

        let clients = Arc::new(ClientDirectory::new(audit.clone()));
        let guests = Arc::new(GuestDirectory::new(audit.clone()));

        let reservations = Arc::new(ReservationManager::new(
            rooms.clone(),
            clients.clone(),
            guests.clone(),
            audit.clone(),
            notifier.clone(),
        ));
        let services = Arc::new(AdditionalServicesLedger::new(
            reservations.clone(),
            rooms.clone(),
            audit.clone(),
        ));
        let invoices = Arc::new(InvoiceEngine::new(
            rooms.clone(),
            minibar.clone(),
            guests.clone(),
            audit.clone(),
        ));

        let front_desk = FrontDesk::new(
            profile.clone(),
            reservations.clone(),
            invoices.clone(),
            clients.clone(),
            audit.clone(),
            notifier,
        );

        tracing::info!(hotel = %profile.name, "hotel core assembled");
        Ok(Hotel {
            profile,
            audit,
            clients,
            guests,
            rooms,
            minibar,
            reservations,
            services,
            invoices,
            front_desk,
        })
    }
}
