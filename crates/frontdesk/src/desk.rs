//! Check-in/check-out orchestration.

use std::sync::Arc;

use posada_core::{DomainError, DomainResult, InvoiceId, ReservationId};
use posada_events::{AuditSink, Notifier};
use posada_invoicing::{Invoice, InvoiceEngine, PaymentMethod};
use posada_parties::ClientLookup;
use posada_reservations::{Reservation, ReservationManager};

use crate::profile::HotelProfile;
use crate::view;

pub struct FrontDesk {
    profile: HotelProfile,
    reservations: Arc<ReservationManager>,
    invoices: Arc<InvoiceEngine>,
    clients: Arc<dyn ClientLookup>,
    audit: Arc<dyn AuditSink>,
    notifier: Notifier,
}

impl FrontDesk {
    pub fn new(
        profile: HotelProfile,
        reservations: Arc<ReservationManager>,
        invoices: Arc<InvoiceEngine>,
        clients: Arc<dyn ClientLookup>,
        audit: Arc<dyn AuditSink>,
        notifier: Notifier,
    ) -> Self {
        Self {
            profile,
            reservations,
            invoices,
            clients,
            audit,
            notifier,
        }
    }

    pub fn profile(&self) -> &HotelProfile {
        &self.profile
    }

    pub fn check_in(&self, reservation_id: ReservationId) -> DomainResult<Reservation> {
        self.reservations.check_in(reservation_id)
    }

    /// Bill the stay and complete the checkout.
    ///
    /// The invoice is prepared first, the state transition runs second,
    /// and only then is the invoice issued: if the transition loses a
    /// race (or the reservation is not checked in), no invoice is
    /// stored. The payment method is recorded on the invoice, not
    /// processed.
    pub fn check_out(
        &self,
        reservation_id: ReservationId,
        payment_method: PaymentMethod,
    ) -> DomainResult<Invoice> {
        let reservation = self.reservations.find_by_id(reservation_id).ok_or_else(|| {
            DomainError::not_found(format!("reservation {reservation_id} not found"))
        })?;
        if !reservation.can_check_out() {
            return Err(DomainError::invalid_state(format!(
                "cannot check out a reservation in state {}",
                reservation.status()
            )));
        }

        let draft = self.invoices.prepare(&reservation, payment_method)?;
        self.reservations.check_out(reservation_id)?;
        let invoice = self.invoices.issue(draft);

        let client = self.clients.client(invoice.client_id());
        let client_name = client
            .as_ref()
            .map(|c| c.full_name())
            .unwrap_or_else(|| format!("client #{}", invoice.client_id()));
        self.audit.record(
            "CHECK-OUT",
            "front desk",
            &format!(
                "reservation #{reservation_id} - client: {client_name} - invoice: {} - total: {}",
                invoice.number(),
                invoice.total()
            ),
        );

        if let Some(client) = client {
            self.notifier.send(
                client.email(),
                "Check-Out and Invoice",
                &format!(
                    "Thank you for staying with us, {client_name}! Your check-out is \
                     complete. Invoice {}: total {} ({}). We hope to see you again at {}.",
                    invoice.number(),
                    invoice.total(),
                    invoice.payment_method(),
                    self.profile.name
                ),
            );
        }

        Ok(invoice)
    }

    /// Formatted statement for one issued invoice.
    pub fn invoice_view(&self, invoice_id: InvoiceId) -> DomainResult<String> {
        let invoice = self.invoices.find_by_id(invoice_id).ok_or_else(|| {
            DomainError::not_found(format!("invoice {invoice_id} not found"))
        })?;
        Ok(view::render(&self.profile, &invoice))
    }

    pub fn list_invoices(&self) -> Vec<Invoice> {
        self.invoices.list_all()
    }
}
