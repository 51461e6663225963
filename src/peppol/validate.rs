//! Peppol BIS Billing 3.0 validation rules (PEPPOL-EN16931-Rxxx).
//!
//! These rules are stricter than base EN 16931.

use rust_decimal::Decimal;
use tracing::trace;

use crate::core::calculate::line_net_amount;
use crate::core::decimal::round_half_up;
use crate::core::rules::*;
use crate::core::*;
use crate::core::validation::{Findings, blank};

/// Run the Peppol family, rules in ascending code order.
pub(crate) fn check(invoice: &Invoice, out: &mut Findings) {
    trace!("running PEPPOL-EN16931 rules");

    // R001
    if blank(invoice.business_process.as_deref()) {
        out.violation(&PEPPOL_R001, "business process identifier is missing");
    }

    // R002: German domestic invoices may carry several notes
    let domestic_de =
        invoice.seller.country_code() == Some("DE") && invoice.buyer.country_code() == Some("DE");
    if invoice.notes.len() > 1 && !domestic_de {
        out.violation(
            &PEPPOL_R002,
            format!("{} notes on document level, at most one allowed", invoice.notes.len()),
        );
    }

    // R003
    if blank(invoice.buyer_reference.as_deref()) && blank(invoice.order_reference.as_deref()) {
        out.violation(&PEPPOL_R003, "buyer reference or order reference is required");
    }

    // R005
    if let Some(tax_currency) = &invoice.tax_currency {
        if tax_currency == &invoice.currency {
            out.violation(
                &PEPPOL_R005,
                format!("VAT accounting currency {tax_currency} equals the invoice currency"),
            );
        }
    }

    // R007
    if let Some(process) = invoice.business_process.as_deref() {
        if !process.trim().is_empty() && !super::is_business_process(process) {
            out.violation(
                &PEPPOL_R007,
                format!("business process '{process}' is not of the form urn:fdc:peppol.eu:2017:poacc:billing:NN:1.0"),
            );
        }
    }

    // R010, R020
    if invoice.buyer.electronic_address.is_none() {
        out.violation(&PEPPOL_R010, "buyer electronic address is required");
    }
    if invoice.seller.electronic_address.is_none() {
        out.violation(&PEPPOL_R020, "seller electronic address is required");
    }

    // R040 .. R042, document level first, then line level
    let adjustments: Vec<(String, &AllowanceCharge)> = invoice
        .allowances_charges
        .iter()
        .enumerate()
        .map(|(i, ac)| (format!("allowances_charges[{i}]"), ac))
        .chain(invoice.lines.iter().enumerate().flat_map(|(i, line)| {
            line.allowances_charges
                .iter()
                .map(move |ac| (format!("lines[{i}] ({})", line.id), ac))
        }))
        .collect();
    for (place, ac) in &adjustments {
        if let (Some(basis), Some(percent)) = (ac.basis_amount, ac.percent) {
            let Some(expected) = basis
                .checked_mul(percent)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                .map(|v| round_half_up(v, 2))
            else {
                out.violation(
                    &PEPPOL_R040,
                    format!("{place}: {percent}% of {basis} exceeds the representable decimal range"),
                );
                continue;
            };
            if ac.amount != expected {
                out.violation(
                    &PEPPOL_R040,
                    format!(
                        "{place}: amount is {}, expected {expected} ({percent}% of {basis})",
                        ac.amount
                    ),
                );
            }
        }
    }
    for (place, ac) in &adjustments {
        if ac.percent.is_some() && ac.basis_amount.is_none() {
            out.violation(&PEPPOL_R041, format!("{place}: percentage without base amount"));
        }
    }
    for (place, ac) in &adjustments {
        if ac.basis_amount.is_some() && ac.percent.is_none() {
            out.violation(&PEPPOL_R042, format!("{place}: base amount without percentage"));
        }
    }

    // R046
    for (i, line) in invoice.lines.iter().enumerate() {
        if let Some(gross) = line.gross_price {
            let Some(expected) = gross.checked_sub(line.price_allowance.unwrap_or_default()) else {
                out.violation(
                    &PEPPOL_R046,
                    format!(
                        "lines[{i}] ({}): gross price minus discount exceeds the representable decimal range",
                        line.id
                    ),
                );
                continue;
            };
            if line.net_price != expected {
                out.violation(
                    &PEPPOL_R046,
                    format!(
                        "lines[{i}] ({}): net price is {}, expected {expected}",
                        line.id, line.net_price
                    ),
                );
            }
        }
    }

    // R055
    if let Some(accounting) = invoice.totals.tax_total_accounting {
        let tax_total = invoice.totals.tax_total;
        let opposite = (tax_total > Decimal::ZERO && accounting < Decimal::ZERO)
            || (tax_total < Decimal::ZERO && accounting > Decimal::ZERO);
        if opposite {
            out.violation(
                &PEPPOL_R055,
                format!("VAT total {tax_total} and accounting VAT total {accounting} differ in sign"),
            );
        }
    }

    // R061
    let direct_debit = invoice
        .payment_means
        .iter()
        .any(|m| m.type_code.is_some_and(|c| c.is_direct_debit()));
    let has_mandate = invoice
        .payment_terms
        .iter()
        .any(|t| !blank(t.direct_debit_mandate_id.as_deref()));
    if direct_debit && !has_mandate {
        out.violation(&PEPPOL_R061, "direct debit requires a mandate reference");
    }

    // R110, R111
    let period = invoice.billing_period.unwrap_or_default();
    for (i, line) in invoice.lines.iter().enumerate() {
        if let (Some(outer), Some(start)) = (period.start, line.billing_period.and_then(|p| p.start)) {
            if start < outer {
                out.violation(
                    &PEPPOL_R110,
                    format!(
                        "lines[{i}] ({}): line period starts {start}, before the invoicing period {outer}",
                        line.id
                    ),
                );
            }
        }
    }
    for (i, line) in invoice.lines.iter().enumerate() {
        if let (Some(outer), Some(end)) = (period.end, line.billing_period.and_then(|p| p.end)) {
            if end > outer {
                out.violation(
                    &PEPPOL_R111,
                    format!(
                        "lines[{i}] ({}): line period ends {end}, after the invoicing period {outer}",
                        line.id
                    ),
                );
            }
        }
    }

    // R120
    for (i, line) in invoice.lines.iter().enumerate() {
        let Some(expected) = line_net_amount(line) else {
            out.violation(
                &PEPPOL_R120,
                format!(
                    "lines[{i}] ({}): line net amount exceeds the representable decimal range",
                    line.id
                ),
            );
            continue;
        };
        if line.line_total != expected {
            out.violation(
                &PEPPOL_R120,
                format!(
                    "lines[{i}] ({}): line net amount is {}, expected {expected}",
                    line.id, line.line_total
                ),
            );
        }
    }

    // R121
    for (i, line) in invoice.lines.iter().enumerate() {
        if let Some(base) = line.base_quantity {
            if base <= Decimal::ZERO {
                out.violation(
                    &PEPPOL_R121,
                    format!("lines[{i}] ({}): base quantity {base} is not positive", line.id),
                );
            }
        }
    }

    // R130
    for (i, line) in invoice.lines.iter().enumerate() {
        if let Some(unit) = line.base_quantity_unit.as_deref() {
            if unit != line.unit {
                out.violation(
                    &PEPPOL_R130,
                    format!(
                        "lines[{i}] ({}): base quantity unit {unit} differs from quantity unit {}",
                        line.id, line.unit
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn codes(invoice: &Invoice) -> Vec<&'static str> {
        let mut out = Findings::default();
        check(invoice, &mut out);
        out.violations.iter().map(|v| v.code()).collect()
    }

    #[test]
    fn empty_invoice_misses_references_and_addresses() {
        let codes = codes(&Invoice::default());
        assert_eq!(
            codes,
            vec![
                "PEPPOL-EN16931-R001",
                "PEPPOL-EN16931-R003",
                "PEPPOL-EN16931-R010",
                "PEPPOL-EN16931-R020",
            ]
        );
    }

    #[test]
    fn percentage_and_base_are_paired() {
        let mut inv = Invoice::default();
        inv.allowances_charges.push(AllowanceCharge {
            amount: dec!(10),
            percent: Some(dec!(5)),
            ..Default::default()
        });
        inv.allowances_charges.push(AllowanceCharge {
            amount: dec!(10),
            basis_amount: Some(dec!(200)),
            percent: Some(dec!(5)),
            ..Default::default()
        });
        let codes = codes(&inv);
        assert!(codes.contains(&"PEPPOL-EN16931-R041"));
        assert!(!codes.contains(&"PEPPOL-EN16931-R040"));
    }

    #[test]
    fn base_quantity_unit_must_match() {
        let mut inv = Invoice::default();
        inv.lines.push(InvoiceLine {
            id: "1".into(),
            quantity: dec!(2),
            unit: "C62".into(),
            net_price: dec!(5),
            line_total: dec!(10),
            base_quantity: Some(dec!(1)),
            base_quantity_unit: Some("KGM".into()),
            ..Default::default()
        });
        let codes = codes(&inv);
        assert!(codes.contains(&"PEPPOL-EN16931-R130"));
        assert!(!codes.contains(&"PEPPOL-EN16931-R120"));
    }
}
