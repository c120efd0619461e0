//! The invoice engine: computation, numbering and queries.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use posada_core::{DomainError, DomainResult, InvoiceId, Money, ReservationId, SequenceGenerator};
use posada_events::AuditSink;
use posada_parties::GuestLookup;
use posada_reservations::Reservation;
use posada_rooms::{MinibarLedger, RoomInventory};

use crate::invoice::{ChargeKind, Invoice, InvoiceLine, PaymentMethod};

/// Insurance surcharge: 2.5% of the room subtotal, on every invoice.
const INSURANCE_RATE_BP: i64 = 250;

/// VAT: 19% of the room subtotal, applied only when a Colombian guest is
/// attached to the reservation.
const VAT_RATE_BP: i64 = 1_900;

/// Computes invoices from reservation/room/minibar/service data and owns
/// the append-only invoice store.
pub struct InvoiceEngine {
    invoices: RwLock<BTreeMap<InvoiceId, Invoice>>,
    seq: SequenceGenerator,
    rooms: Arc<RoomInventory>,
    minibar: Arc<MinibarLedger>,
    guests: Arc<dyn GuestLookup>,
    audit: Arc<dyn AuditSink>,
}

impl InvoiceEngine {
    pub fn new(
        rooms: Arc<RoomInventory>,
        minibar: Arc<MinibarLedger>,
        guests: Arc<dyn GuestLookup>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            invoices: RwLock::new(BTreeMap::new()),
            seq: SequenceGenerator::new(),
            rooms,
            minibar,
            guests,
            audit,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<InvoiceId, Invoice>> {
        self.invoices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<InvoiceId, Invoice>> {
        self.invoices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Compute a full invoice for the reservation as it stands.
    ///
    /// Nothing is stored: the front desk prepares the invoice, performs
    /// the checkout transition, and only then [`InvoiceEngine::issue`]s
    /// it, so a failed transition leaves no invoice behind. Every total
    /// is recomputed from source data.
    pub fn prepare(
        &self,
        reservation: &Reservation,
        payment_method: PaymentMethod,
    ) -> DomainResult<Invoice> {
        let nights = reservation.nights();
        // Billing policy: the guest-count multiplier applies per room in
        // full, not divided across rooms of the party.
        let guest_multiplier = i64::from(reservation.guest_count().max(1));

        let mut lines: Vec<InvoiceLine> = Vec::new();
        let mut room_numbers: Vec<(posada_core::RoomId, String)> = Vec::new();
        let mut subtotal = Money::ZERO;

        for room_id in reservation.room_ids() {
            let room = self.rooms.find_by_id(*room_id).ok_or_else(|| {
                DomainError::not_found(format!("room {room_id} not found"))
            })?;
            let room_cost = room
                .price_per_night()
                .checked_mul(nights)?
                .checked_mul(guest_multiplier)?;
            subtotal = subtotal.checked_add(room_cost)?;
            lines.push(InvoiceLine {
                kind: ChargeKind::Accommodation,
                description: format!(
                    "Room {} ({}), {} night(s) x {} guest(s)",
                    room.number(),
                    room.kind(),
                    nights,
                    guest_multiplier
                ),
                amount: room_cost,
            });
            room_numbers.push((*room_id, room.number().to_owned()));
        }

        let mut minibar_total = Money::ZERO;
        for (room_id, number) in &room_numbers {
            let room_minibar = self.minibar.total_cost(*room_id)?;
            if room_minibar.is_zero() {
                continue;
            }
            minibar_total = minibar_total.checked_add(room_minibar)?;
            lines.push(InvoiceLine {
                kind: ChargeKind::Minibar,
                description: format!("Minibar consumption, room {number}"),
                amount: room_minibar,
            });
        }

        let mut services_total = Money::ZERO;
        for service in reservation.services() {
            let cost = service.cost();
            services_total = services_total.checked_add(cost)?;
            lines.push(InvoiceLine {
                kind: ChargeKind::Service,
                description: service.describe(),
                amount: cost,
            });
        }

        let insurance = subtotal.basis_points(INSURANCE_RATE_BP)?;
        lines.push(InvoiceLine {
            kind: ChargeKind::Insurance,
            description: "Guest insurance surcharge (2.5%)".to_owned(),
            amount: insurance,
        });

        let colombian_guest = reservation
            .guest_ids()
            .iter()
            .filter_map(|id| self.guests.guest(*id))
            .any(|guest| is_colombian(guest.nationality()));
        let tax = if colombian_guest {
            subtotal.basis_points(VAT_RATE_BP)?
        } else {
            Money::ZERO
        };
        if colombian_guest {
            lines.push(InvoiceLine {
                kind: ChargeKind::Tax,
                description: "VAT (19%)".to_owned(),
                amount: tax,
            });
        }

        let total = Money::sum([subtotal, insurance, tax, minibar_total, services_total])?;

        let generated_at = Utc::now();
        let id = InvoiceId::new(self.seq.next_id());
        let number = format!("FAC-{}-{:04}", generated_at.format("%Y%m%d"), id);

        Ok(Invoice::new(
            id,
            number,
            reservation.client_id(),
            reservation.id_typed(),
            reservation.check_in_date(),
            reservation.check_out_date(),
            nights,
            lines,
            subtotal,
            insurance,
            tax,
            minibar_total,
            services_total,
            total,
            payment_method,
            generated_at,
        ))
    }

    /// Append a prepared invoice to the store. Invoices are never
    /// mutated afterwards.
    pub fn issue(&self, invoice: Invoice) -> Invoice {
        let mut invoices = self.write();
        invoices.insert(invoice.id_typed(), invoice.clone());
        drop(invoices);

        self.audit.record(
            "INVOICE issued",
            "front desk",
            &format!(
                "{} - reservation #{} - total: {}",
                invoice.number(),
                invoice.reservation_id(),
                invoice.total()
            ),
        );
        tracing::info!(
            invoice = invoice.number(),
            total = invoice.total().amount(),
            "invoice issued"
        );
        invoice
    }

    /// Prepare and immediately issue; for callers that do not split the
    /// flow around a state transition.
    pub fn generate_invoice(
        &self,
        reservation: &Reservation,
        payment_method: PaymentMethod,
    ) -> DomainResult<Invoice> {
        let invoice = self.prepare(reservation, payment_method)?;
        Ok(self.issue(invoice))
    }

    pub fn list_all(&self) -> Vec<Invoice> {
        self.read().values().cloned().collect()
    }

    pub fn find_by_id(&self, id: InvoiceId) -> Option<Invoice> {
        self.read().get(&id).cloned()
    }

    /// First (oldest) invoice issued for the reservation.
    pub fn find_by_reservation(&self, reservation_id: ReservationId) -> Option<Invoice> {
        self.read()
            .values()
            .find(|i| i.reservation_id() == reservation_id)
            .cloned()
    }
}

fn is_colombian(nationality: &str) -> bool {
    matches!(
        nationality.trim().to_lowercase().as_str(),
        "colombia" | "colombiano"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Utc};
    use posada_core::{ClientId, GuestId, ProductId};
    use posada_events::{InMemoryAuditSink, InMemoryNotificationSink, Notifier};
    use posada_parties::{
        ClientDirectory, DocumentKind, GuestDirectory, NewClient, NewGuest,
    };
    use posada_reservations::{
        AdditionalServicesLedger, NewReservation, ReservationManager,
    };
    use posada_rooms::CatalogSpec;
    use posada_services::MealType;
    use proptest::prelude::*;

    struct Fixture {
        rooms: Arc<RoomInventory>,
        minibar: Arc<MinibarLedger>,
        guests: Arc<GuestDirectory>,
        manager: Arc<ReservationManager>,
        services: AdditionalServicesLedger,
        engine: InvoiceEngine,
        client_id: ClientId,
    }

    fn fixture() -> Fixture {
        let audit = Arc::new(InMemoryAuditSink::new());
        let rooms = Arc::new(RoomInventory::new(audit.clone()));
        rooms.initialize(&CatalogSpec::default()).unwrap();
        let minibar = Arc::new(MinibarLedger::new(rooms.clone(), audit.clone()));
        let clients = Arc::new(ClientDirectory::new(audit.clone()));
        let guests = Arc::new(GuestDirectory::new(audit.clone()));
        let notifier = Notifier::new(Arc::new(InMemoryNotificationSink::new()), audit.clone());
        let manager = Arc::new(ReservationManager::new(
            rooms.clone(),
            clients.clone(),
            guests.clone(),
            audit.clone(),
            notifier,
        ));
        let services =
            AdditionalServicesLedger::new(manager.clone(), rooms.clone(), audit.clone());
        let engine = InvoiceEngine::new(
            rooms.clone(),
            minibar.clone(),
            guests.clone(),
            audit,
        );

        let client_id = clients
            .register(NewClient {
                document_kind: DocumentKind::CitizenCard,
                document_number: "1000001".to_owned(),
                first_name: "Laura".to_owned(),
                last_name: "Pérez".to_owned(),
                phone: "3001234567".to_owned(),
                email: "laura@example.com".to_owned(),
                credit_card_number: None,
                category: None,
                preferences: None,
            })
            .unwrap()
            .id_typed();

        Fixture {
            rooms,
            minibar,
            guests,
            manager,
            services,
            engine,
            client_id,
        }
    }

    fn guest(fixture: &Fixture, document: &str, nationality: &str) -> GuestId {
        fixture
            .guests
            .register(NewGuest {
                document_kind: DocumentKind::CitizenCard,
                document_number: document.to_owned(),
                first_name: "Carlos".to_owned(),
                last_name: "Gómez".to_owned(),
                phone: "3109876543".to_owned(),
                nationality: nationality.to_owned(),
                email: String::new(),
            })
            .unwrap()
            .id_typed()
    }

    fn reserve(
        fixture: &Fixture,
        numbers: &[&str],
        nights: u64,
        guest_count: u32,
        guest_ids: Vec<GuestId>,
    ) -> Reservation {
        let today = Utc::now().date_naive();
        let room_ids = numbers
            .iter()
            .map(|n| fixture.rooms.find_by_number(n).unwrap().id_typed())
            .collect();
        fixture
            .manager
            .create_reservation(NewReservation {
                client_id: fixture.client_id,
                check_in: today.checked_add_days(Days::new(1)).unwrap(),
                check_out: today.checked_add_days(Days::new(1 + nights)).unwrap(),
                guest_count,
                room_ids,
                guest_ids,
            })
            .unwrap()
    }

    #[test]
    fn single_room_three_nights_one_guest_no_extras() {
        let fixture = fixture();
        let reservation = reserve(&fixture, &["201"], 3, 1, Vec::new());

        let invoice = fixture
            .engine
            .prepare(&reservation, PaymentMethod::Cash)
            .unwrap();

        assert_eq!(invoice.nights(), 3);
        assert_eq!(invoice.subtotal(), Money::new(600_000));
        assert_eq!(invoice.insurance(), Money::new(15_000));
        assert_eq!(invoice.tax(), Money::ZERO);
        assert_eq!(invoice.minibar_total(), Money::ZERO);
        assert_eq!(invoice.services_total(), Money::ZERO);
        assert_eq!(invoice.total(), Money::new(615_000));
    }

    #[test]
    fn two_guests_with_colombian_nationality_pay_vat() {
        let fixture = fixture();
        let colombian = guest(&fixture, "2000001", "Colombia");
        let reservation = reserve(&fixture, &["201"], 3, 2, vec![colombian]);

        let invoice = fixture
            .engine
            .prepare(&reservation, PaymentMethod::CreditCard)
            .unwrap();

        assert_eq!(invoice.subtotal(), Money::new(1_200_000));
        assert_eq!(invoice.insurance(), Money::new(30_000));
        assert_eq!(invoice.tax(), Money::new(228_000));
        assert_eq!(invoice.total(), Money::new(1_458_000));
    }

    #[test]
    fn nationality_matching_is_case_insensitive() {
        let fixture = fixture();
        let colombian = guest(&fixture, "2000001", "COLOMBIANO");
        let foreign = guest(&fixture, "2000002", "Argentina");

        let reservation = reserve(&fixture, &["201"], 1, 1, vec![foreign, colombian]);
        let invoice = fixture
            .engine
            .prepare(&reservation, PaymentMethod::Cash)
            .unwrap();
        assert_eq!(invoice.tax(), Money::new(38_000));
    }

    #[test]
    fn foreign_guests_pay_no_vat() {
        let fixture = fixture();
        let foreign = guest(&fixture, "2000001", "Argentina");
        let reservation = reserve(&fixture, &["201"], 1, 1, vec![foreign]);

        let invoice = fixture
            .engine
            .prepare(&reservation, PaymentMethod::Cash)
            .unwrap();
        assert_eq!(invoice.tax(), Money::ZERO);
    }

    #[test]
    fn guest_multiplier_applies_per_room_in_full() {
        let fixture = fixture();
        // Two singles, two nights, three guests: each room bills the full
        // multiplier (the observed policy, preserved).
        let reservation = reserve(&fixture, &["201", "202"], 2, 3, Vec::new());

        let invoice = fixture
            .engine
            .prepare(&reservation, PaymentMethod::Cash)
            .unwrap();
        assert_eq!(invoice.subtotal(), Money::new(2 * 200_000 * 2 * 3));
    }

    #[test]
    fn zero_guest_count_bills_as_one() {
        let fixture = fixture();
        let reservation = reserve(&fixture, &["201"], 2, 0, Vec::new());

        let invoice = fixture
            .engine
            .prepare(&reservation, PaymentMethod::Cash)
            .unwrap();
        assert_eq!(invoice.subtotal(), Money::new(400_000));
    }

    #[test]
    fn minibar_ledger_of_the_room_lands_on_the_invoice() {
        let fixture = fixture();
        let executive = fixture.rooms.find_by_number("501").unwrap().id_typed();

        // Recorded before the reservation even exists: the ledger accrues
        // against the room identity and is never cleared.
        fixture
            .minibar
            .register_consumption(executive, ProductId::new(3), 2)
            .unwrap(); // cola, 8 000

        let reservation = reserve(&fixture, &["501"], 1, 1, Vec::new());
        let invoice = fixture
            .engine
            .prepare(&reservation, PaymentMethod::Cash)
            .unwrap();

        assert_eq!(invoice.minibar_total(), Money::new(8_000));
        assert_eq!(invoice.subtotal(), Money::new(350_000));
        assert!(
            invoice
                .lines()
                .iter()
                .any(|l| l.kind == ChargeKind::Minibar && l.description.contains("501"))
        );
        // Minibar charges ride on top of subtotal-based surcharges.
        let expected_total = Money::new(350_000 + 8_750 + 8_000);
        assert_eq!(invoice.total(), expected_total);
    }

    #[test]
    fn services_appear_as_their_own_lines() {
        let fixture = fixture();
        let reservation = reserve(&fixture, &["201"], 1, 1, Vec::new());
        let id = reservation.id_typed();

        fixture
            .services
            .add_laundry(id, "Two suits", 4, Money::new(8_000))
            .unwrap();
        fixture
            .services
            .add_restaurant(id, MealType::Dinner, 2, Money::new(48_000))
            .unwrap();

        // The engine reads services from the reservation record as it
        // stands at preparation time.
        let snapshot = fixture.manager.find_by_id(id).unwrap();
        let invoice = fixture
            .engine
            .prepare(&snapshot, PaymentMethod::Cash)
            .unwrap();

        let service_lines: Vec<_> = invoice
            .lines()
            .iter()
            .filter(|l| l.kind == ChargeKind::Service)
            .collect();
        assert_eq!(service_lines.len(), 2);
        assert_eq!(invoice.services_total(), Money::new(32_000 + 96_000));
        assert_eq!(
            invoice.total(),
            Money::new(200_000 + 5_000 + 32_000 + 96_000)
        );
    }

    #[test]
    fn invoice_numbers_are_sequential_and_dated() {
        let fixture = fixture();
        let reservation = reserve(&fixture, &["201"], 1, 1, Vec::new());

        let first = fixture
            .engine
            .generate_invoice(&reservation, PaymentMethod::Cash)
            .unwrap();
        let second = fixture
            .engine
            .generate_invoice(&reservation, PaymentMethod::Cash)
            .unwrap();

        let date = Utc::now().format("%Y%m%d").to_string();
        assert_eq!(first.number(), format!("FAC-{date}-0001"));
        assert_eq!(second.number(), format!("FAC-{date}-0002"));
        assert_eq!(first.id_typed(), InvoiceId::new(1));
        assert_eq!(second.id_typed(), InvoiceId::new(2));
    }

    #[test]
    fn generation_is_deterministic_over_a_fixed_snapshot() {
        let fixture = fixture();
        let colombian = guest(&fixture, "2000001", "colombia");
        let reservation = reserve(&fixture, &["601", "202"], 4, 2, vec![colombian]);
        fixture
            .minibar
            .register_consumption(
                fixture.rooms.find_by_number("601").unwrap().id_typed(),
                ProductId::new(14),
                1,
            )
            .unwrap();

        let first = fixture
            .engine
            .prepare(&reservation, PaymentMethod::Cash)
            .unwrap();
        let second = fixture
            .engine
            .prepare(&reservation, PaymentMethod::Cash)
            .unwrap();

        assert_eq!(first.subtotal(), second.subtotal());
        assert_eq!(first.insurance(), second.insurance());
        assert_eq!(first.tax(), second.tax());
        assert_eq!(first.minibar_total(), second.minibar_total());
        assert_eq!(first.services_total(), second.services_total());
        assert_eq!(first.total(), second.total());
        assert_ne!(first.id_typed(), second.id_typed());
        assert_ne!(first.number(), second.number());
    }

    #[test]
    fn queries_find_issued_invoices() {
        let fixture = fixture();
        let reservation = reserve(&fixture, &["201"], 1, 1, Vec::new());

        let first = fixture
            .engine
            .generate_invoice(&reservation, PaymentMethod::Cash)
            .unwrap();
        let _second = fixture
            .engine
            .generate_invoice(&reservation, PaymentMethod::Cash)
            .unwrap();

        assert_eq!(fixture.engine.list_all().len(), 2);
        assert_eq!(
            fixture.engine.find_by_id(first.id_typed()).unwrap(),
            first
        );
        // First match wins.
        assert_eq!(
            fixture
                .engine
                .find_by_reservation(reservation.id_typed())
                .unwrap(),
            first
        );
        assert!(fixture.engine.find_by_id(InvoiceId::new(99)).is_none());
        assert!(
            fixture
                .engine
                .find_by_reservation(ReservationId::new(99))
                .is_none()
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: for any stay length and party size on a single
        /// room, the billing identities hold and re-preparation is
        /// total-stable.
        #[test]
        fn billing_identities_hold(
            nights in 1u64..14,
            guest_count in 0u32..6,
        ) {
            let fixture = fixture();
            let reservation = reserve(&fixture, &["301"], nights, guest_count, Vec::new());

            let invoice = fixture
                .engine
                .prepare(&reservation, PaymentMethod::Cash)
                .unwrap();

            let expected_subtotal =
                200_000i64 * nights as i64 * i64::from(guest_count.max(1));
            prop_assert_eq!(invoice.subtotal(), Money::new(expected_subtotal));
            prop_assert_eq!(
                invoice.insurance(),
                Money::new(expected_subtotal * 250 / 10_000)
            );
            prop_assert_eq!(invoice.tax(), Money::ZERO);
            prop_assert_eq!(
                invoice.total(),
                Money::new(expected_subtotal + expected_subtotal * 250 / 10_000)
            );

            let again = fixture
                .engine
                .prepare(&reservation, PaymentMethod::Cash)
                .unwrap();
            prop_assert_eq!(invoice.total(), again.total());
        }
    }
}
