//! The immutable invoice.

use core::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use posada_core::{ClientId, DomainError, Entity, InvoiceId, Money, ReservationId};

/// How the guest settled the bill. Recorded only; no processing happens
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit card",
            PaymentMethod::DebitCard => "debit card",
            PaymentMethod::BankTransfer => "bank transfer",
        })
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "credit" | "credit card" | "credit-card" => Ok(PaymentMethod::CreditCard),
            "debit" | "debit card" | "debit-card" => Ok(PaymentMethod::DebitCard),
            "transfer" | "bank transfer" | "bank-transfer" => Ok(PaymentMethod::BankTransfer),
            other => Err(DomainError::validation(format!(
                "unknown payment method: {other}"
            ))),
        }
    }
}

/// What an invoice line charges for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeKind {
    Accommodation,
    Minibar,
    Service,
    Insurance,
    Tax,
}

/// One line of the itemized breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub kind: ChargeKind,
    pub description: String,
    pub amount: Money,
}

/// An issued invoice. All fields are fixed at generation time; there is
/// no mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    id: InvoiceId,
    number: String,
    client_id: ClientId,
    reservation_id: ReservationId,
    check_in: NaiveDate,
    check_out: NaiveDate,
    nights: i64,
    lines: Vec<InvoiceLine>,
    subtotal: Money,
    insurance: Money,
    tax: Money,
    minibar_total: Money,
    services_total: Money,
    total: Money,
    payment_method: PaymentMethod,
    generated_at: DateTime<Utc>,
}

impl Invoice {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: InvoiceId,
        number: String,
        client_id: ClientId,
        reservation_id: ReservationId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        nights: i64,
        lines: Vec<InvoiceLine>,
        subtotal: Money,
        insurance: Money,
        tax: Money,
        minibar_total: Money,
        services_total: Money,
        total: Money,
        payment_method: PaymentMethod,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            number,
            client_id,
            reservation_id,
            check_in,
            check_out,
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
        }
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    /// Human-readable number, `FAC-{yyyyMMdd}-{id:04}`.
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn reservation_id(&self) -> ReservationId {
        self.reservation_id
    }

    pub fn check_in_date(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out_date(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        self.nights
    }

    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn insurance(&self) -> Money {
        self.insurance
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn minibar_total(&self) -> Money {
        self.minibar_total
    }

    pub fn services_total(&self) -> Money {
        self.services_total
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
