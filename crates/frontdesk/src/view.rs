//! Plain-text invoice statement.

use std::fmt::Write as _;

use posada_invoicing::Invoice;

use crate::profile::HotelProfile;

const WIDTH: usize = 64;

pub(crate) fn render(profile: &HotelProfile, invoice: &Invoice) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=".repeat(WIDTH));
    let _ = writeln!(
        out,
        "{} {}",
        profile.name,
        "*".repeat(usize::from(profile.stars))
    );
    let _ = writeln!(out, "{} | {} | {}", profile.address, profile.phone, profile.email);
    let _ = writeln!(out, "{}", "=".repeat(WIDTH));
    let _ = writeln!(out, "Invoice {}", invoice.number());
    let _ = writeln!(
        out,
        "Client #{} - Reservation #{}",
        invoice.client_id(),
        invoice.reservation_id()
    );
    let _ = writeln!(
        out,
        "Stay: {} to {} ({} night(s))",
        invoice.check_in_date(),
        invoice.check_out_date(),
        invoice.nights()
    );
    let _ = writeln!(out, "{}", "-".repeat(WIDTH));

    for line in invoice.lines() {
        let amount = line.amount.to_string();
        let _ = writeln!(
            out,
            "{:<desc$}{:>amt$}",
            line.description,
            amount,
            desc = WIDTH - 16,
            amt = 16
        );
    }

    let _ = writeln!(out, "{}", "-".repeat(WIDTH));
    let total = invoice.total().to_string();
    let _ = writeln!(out, "{:<desc$}{:>amt$}", "TOTAL", total, desc = WIDTH - 16, amt = 16);
    let _ = writeln!(out, "Payment method: {}", invoice.payment_method());
    let _ = writeln!(
        out,
        "Generated at: {}",
        invoice.generated_at().format("%Y-%m-%d %H:%M")
    );

    out
}
