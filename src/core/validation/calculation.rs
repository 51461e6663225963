use rust_decimal::Decimal;

use crate::core::calculate::tax_amount;
use crate::core::decimal::checked_sum;
use crate::core::rules::*;
use crate::core::types::*;

use super::{Findings, blank};

/// Calculation rules (BR-CO-*). Amount equations compare exactly; the
/// message carries both the expected and the stated value.
pub(super) fn check(invoice: &Invoice, out: &mut Findings) {
    let totals = &invoice.totals;

    // BR-CO-03
    for (i, tax) in invoice.trade_taxes.iter().enumerate() {
        if let (Some(date), Some(code)) = (tax.tax_point_date, &tax.due_date_type_code) {
            out.violation(
                &BR_CO_03,
                format!("trade_taxes[{i}]: tax point date {date} and tax point date code {code} are both set"),
            );
        }
    }

    // BR-CO-04
    for (i, line) in invoice.lines.iter().enumerate() {
        if line.tax_category.is_none() {
            out.violation(
                &BR_CO_04,
                format!("lines[{i}] ({}): VAT category is missing", line.id),
            );
        }
    }

    // BR-CO-09
    let vat_ids = [
        ("seller", invoice.seller.vat_id.as_deref()),
        (
            "tax representative",
            invoice
                .tax_representative
                .as_ref()
                .and_then(|p| p.vat_id.as_deref()),
        ),
        ("buyer", invoice.buyer.vat_id.as_deref()),
    ];
    for (role, vat_id) in vat_ids {
        if let Some(id) = vat_id.filter(|id| !id.trim().is_empty()) {
            if !has_country_prefix(id) {
                out.violation(
                    &BR_CO_09,
                    format!("{role} VAT identifier '{id}' has no ISO 3166-1 country prefix"),
                );
            }
        }
    }

    // BR-CO-10
    match checked_sum(invoice.lines.iter().map(|l| l.line_total)) {
        None => overflowed(out, &BR_CO_10, "sum of line net amounts"),
        Some(line_sum) => {
            if totals.presence.line_total.resolve(totals.line_total) && totals.line_total != line_sum {
                out.violation(
                    &BR_CO_10,
                    format!(
                        "sum of line net amounts is {}, expected {line_sum}",
                        totals.line_total
                    ),
                );
            }
        }
    }

    // BR-CO-11, BR-CO-12
    match checked_sum(invoice.allowances().map(|ac| ac.amount)) {
        None => overflowed(out, &BR_CO_11, "sum of document allowances"),
        Some(allowance_sum) if totals.allowance_total != allowance_sum => out.violation(
            &BR_CO_11,
            format!(
                "sum of document allowances is {}, expected {allowance_sum}",
                totals.allowance_total
            ),
        ),
        Some(_) => {}
    }
    match checked_sum(invoice.charges().map(|ac| ac.amount)) {
        None => overflowed(out, &BR_CO_12, "sum of document charges"),
        Some(charge_sum) if totals.charge_total != charge_sum => out.violation(
            &BR_CO_12,
            format!(
                "sum of document charges is {}, expected {charge_sum}",
                totals.charge_total
            ),
        ),
        Some(_) => {}
    }

    // BR-CO-13
    let basis = totals
        .line_total
        .checked_sub(totals.allowance_total)
        .and_then(|v| v.checked_add(totals.charge_total));
    match basis {
        None => overflowed(out, &BR_CO_13, "total without VAT"),
        Some(basis) if totals.tax_basis_total != basis => out.violation(
            &BR_CO_13,
            format!(
                "total without VAT is {}, expected {basis}",
                totals.tax_basis_total
            ),
        ),
        Some(_) => {}
    }

    // BR-CO-14
    match checked_sum(invoice.trade_taxes.iter().map(|t| t.calculated_amount)) {
        None => overflowed(out, &BR_CO_14, "total VAT amount"),
        Some(tax_sum) if totals.tax_total != tax_sum => out.violation(
            &BR_CO_14,
            format!(
                "total VAT amount is {}, expected {tax_sum}",
                totals.tax_total
            ),
        ),
        Some(_) => {}
    }

    // BR-CO-15
    match totals.tax_basis_total.checked_add(totals.tax_total) {
        None => overflowed(out, &BR_CO_15, "total with VAT"),
        Some(grand) if totals.grand_total != grand => out.violation(
            &BR_CO_15,
            format!("total with VAT is {}, expected {grand}", totals.grand_total),
        ),
        Some(_) => {}
    }

    // BR-CO-16
    let due = totals
        .grand_total
        .checked_sub(totals.prepaid)
        .and_then(|v| v.checked_add(totals.rounding));
    match due {
        None => overflowed(out, &BR_CO_16, "amount due"),
        Some(due) if totals.due_payable != due => out.violation(
            &BR_CO_16,
            format!("amount due is {}, expected {due}", totals.due_payable),
        ),
        Some(_) => {}
    }

    // BR-CO-17
    for (i, tax) in invoice.trade_taxes.iter().enumerate() {
        let Some(expected) = tax_amount(tax.basis_amount, tax.rate) else {
            overflowed(out, &BR_CO_17, &format!("trade_taxes[{i}] VAT amount"));
            continue;
        };
        if tax.calculated_amount != expected {
            out.violation(
                &BR_CO_17,
                format!(
                    "trade_taxes[{i}] ({} {}%): tax amount is {}, expected {expected}",
                    category_code(tax.category),
                    tax.rate,
                    tax.calculated_amount
                ),
            );
        }
    }

    // BR-CO-18
    if !invoice.lines.is_empty() && invoice.trade_taxes.is_empty() {
        out.violation(&BR_CO_18, "invoice has lines but no VAT breakdown");
    }

    // BR-CO-19, BR-CO-20
    if let Some(period) = invoice.billing_period {
        if period.start.is_none() && period.end.is_none() {
            out.violation(&BR_CO_19, "invoicing period has neither start nor end date");
        }
    }
    for (i, line) in invoice.lines.iter().enumerate() {
        if let Some(period) = line.billing_period {
            if period.start.is_none() && period.end.is_none() {
                out.violation(
                    &BR_CO_20,
                    format!(
                        "lines[{i}] ({}): line period has neither start nor end date",
                        line.id
                    ),
                );
            }
        }
    }

    // BR-CO-21, BR-CO-22
    for (i, ac) in invoice.allowances_charges.iter().enumerate() {
        if has_reason(ac) {
            continue;
        }
        if ac.is_charge {
            out.violation(
                &BR_CO_22,
                format!("allowances_charges[{i}]: charge of {} has no reason", ac.amount),
            );
        } else {
            out.violation(
                &BR_CO_21,
                format!("allowances_charges[{i}]: allowance of {} has no reason", ac.amount),
            );
        }
    }

    // BR-CO-23, BR-CO-24
    for (i, line) in invoice.lines.iter().enumerate() {
        for ac in line.allowances_charges.iter().filter(|ac| !has_reason(ac)) {
            let (rule, kind) = if ac.is_charge {
                (&BR_CO_24, "charge")
            } else {
                (&BR_CO_23, "allowance")
            };
            out.violation(
                rule,
                format!(
                    "lines[{i}] ({}): line {kind} of {} has no reason",
                    line.id, ac.amount
                ),
            );
        }
    }

    // BR-CO-25
    if totals.due_payable > Decimal::ZERO
        && invoice.due_date().is_none()
        && invoice
            .payment_terms
            .iter()
            .all(|t| blank(t.description.as_deref()))
    {
        out.violation(
            &BR_CO_25,
            format!(
                "amount due {} is positive but neither a due date nor payment terms are given",
                totals.due_payable
            ),
        );
    }

    // BR-CO-26
    let seller = &invoice.seller;
    let legal_id = seller
        .legal_organization
        .as_ref()
        .and_then(|o| o.id.as_deref());
    if seller.ids.iter().all(|id| id.id.trim().is_empty())
        && blank(legal_id)
        && blank(seller.vat_id.as_deref())
    {
        out.violation(
            &BR_CO_26,
            "seller has no identifier, legal registration identifier or VAT identifier",
        );
    }
}

fn overflowed(out: &mut Findings, rule: &'static Rule, what: &str) {
    out.violation(rule, format!("{what} exceeds the representable decimal range"));
}

fn has_country_prefix(vat_id: &str) -> bool {
    let bytes = vat_id.trim().as_bytes();
    bytes.len() > 2 && bytes[..2].iter().all(u8::is_ascii_uppercase)
}

fn has_reason(ac: &AllowanceCharge) -> bool {
    !blank(ac.reason.as_deref()) || !blank(ac.reason_code.as_deref())
}

pub(super) fn category_code(category: Option<TaxCategory>) -> &'static str {
    category.map_or("?", |c| c.code())
}
