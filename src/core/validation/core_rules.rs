use crate::core::rules::*;
use crate::core::types::*;

use super::{Findings, blank};

/// Core EN 16931 rules (BR-01 .. BR-65), in ascending code order.
pub(super) fn check(invoice: &Invoice, out: &mut Findings) {
    // BR-01 .. BR-05: document header
    if invoice.specification_id.trim().is_empty() {
        out.violation(&BR_01, "specification identifier must not be empty");
    }
    if invoice.number.trim().is_empty() {
        out.violation(&BR_02, "invoice number must not be empty");
    }
    if invoice.issue_date.is_none() {
        out.violation(&BR_03, "issue date is missing");
    }
    if invoice.type_code.is_none() {
        out.violation(&BR_04, "invoice type code is missing");
    }
    if invoice.currency.trim().is_empty() {
        out.violation(&BR_05, "currency code must not be empty");
    }

    // BR-06 .. BR-11: seller and buyer
    if invoice.seller.name.trim().is_empty() {
        out.violation(&BR_06, "seller name must not be empty");
    }
    if invoice.buyer.name.trim().is_empty() {
        out.violation(&BR_07, "buyer name must not be empty");
    }
    match &invoice.seller.address {
        None => out.violation(&BR_08, "seller postal address is missing"),
        Some(address) if address.country_code.trim().is_empty() => {
            out.violation(&BR_09, "seller country code must not be empty")
        }
        Some(_) => {}
    }
    match &invoice.buyer.address {
        None => out.violation(&BR_10, "buyer postal address is missing"),
        Some(address) if address.country_code.trim().is_empty() => {
            out.violation(&BR_11, "buyer country code must not be empty")
        }
        Some(_) => {}
    }

    // BR-12 .. BR-15: mandatory totals, by presence
    let totals = &invoice.totals;
    if !totals.presence.line_total.resolve(totals.line_total) {
        out.violation(&BR_12, "sum of line net amounts is missing");
    }
    if !totals.presence.tax_basis_total.resolve(totals.tax_basis_total) {
        out.violation(&BR_13, "total amount without VAT is missing");
    }
    if !totals.presence.grand_total.resolve(totals.grand_total) {
        out.violation(&BR_14, "total amount with VAT is missing");
    }
    if !totals.presence.due_payable.resolve(totals.due_payable) {
        out.violation(&BR_15, "amount due for payment is missing");
    }

    // BR-16
    if invoice.lines.is_empty() {
        out.violation(&BR_16, "invoice must have at least one line");
    }

    // BR-17 .. BR-20: payee and tax representative
    if let Some(payee) = &invoice.payee {
        if payee.name.trim().is_empty() {
            out.violation(&BR_17, "payee name must not be empty");
        }
    }
    if let Some(rep) = &invoice.tax_representative {
        if rep.name.trim().is_empty() {
            out.violation(&BR_18, "tax representative name must not be empty");
        }
        match &rep.address {
            None => out.violation(&BR_19, "tax representative postal address is missing"),
            Some(address) if address.country_code.trim().is_empty() => out.violation(
                &BR_20,
                "tax representative country code must not be empty",
            ),
            Some(_) => {}
        }
    }

    check_lines(invoice, out);

    // BR-29
    if let Some(Period {
        start: Some(start),
        end: Some(end),
    }) = invoice.billing_period
    {
        if end < start {
            out.violation(
                &BR_29,
                format!("invoicing period ends {end} before it starts {start}"),
            );
        }
    }

    // BR-30
    for (i, line) in invoice.lines.iter().enumerate() {
        if let Some(Period {
            start: Some(start),
            end: Some(end),
        }) = line.billing_period
        {
            if end < start {
                out.violation(
                    &BR_30,
                    format!(
                        "lines[{i}] ({}): line period ends {end} before it starts {start}",
                        line.id
                    ),
                );
            }
        }
    }

    // BR-31, BR-36
    for (i, ac) in invoice.allowances_charges.iter().enumerate() {
        if ac.amount_presence.is_absent() {
            let (rule, kind) = if ac.is_charge { (&BR_36, "charge") } else { (&BR_31, "allowance") };
            out.violation(rule, format!("allowances_charges[{i}]: {kind} amount is missing"));
        }
    }

    // BR-32, BR-37
    for (i, ac) in invoice.allowances_charges.iter().enumerate() {
        if ac.tax_category.is_some() {
            continue;
        }
        if ac.is_charge {
            out.violation(
                &BR_37,
                format!("allowances_charges[{i}]: charge has no VAT category"),
            );
        } else {
            out.violation(
                &BR_32,
                format!("allowances_charges[{i}]: allowance has no VAT category"),
            );
        }
    }

    // BR-45 .. BR-48
    for (i, tax) in invoice.trade_taxes.iter().enumerate() {
        if tax.basis_presence.is_absent() {
            out.violation(&BR_45, format!("trade_taxes[{i}]: taxable amount is missing"));
        }
        if tax.calculated_presence.is_absent() {
            out.violation(&BR_46, format!("trade_taxes[{i}]: tax amount is missing"));
        }
        if tax.category.is_none() {
            out.violation(&BR_47, format!("trade_taxes[{i}]: VAT category is missing"));
        }
        if tax.rate_presence.is_absent() && tax.category != Some(TaxCategory::NotSubjectToVat) {
            out.violation(&BR_48, format!("trade_taxes[{i}]: VAT category rate is missing"));
        }
    }

    check_payment(invoice, out);

    // BR-52
    for (i, doc) in invoice.attachments.iter().enumerate() {
        if doc.id.trim().is_empty() {
            out.violation(&BR_52, format!("attachments[{i}]: reference must not be empty"));
        }
    }

    // BR-53
    if let Some(tax_currency) = &invoice.tax_currency {
        if totals.tax_total_accounting.is_none() {
            out.violation(
                &BR_53,
                format!("VAT accounting currency {tax_currency} given without a tax total in it"),
            );
        }
    }

    // BR-54
    for (i, line) in invoice.lines.iter().enumerate() {
        for attr in &line.characteristics {
            if attr.name.trim().is_empty() || attr.value.trim().is_empty() {
                out.violation(
                    &BR_54,
                    format!(
                        "lines[{i}] ({}): item attribute '{}' needs both name and value",
                        line.id, attr.name
                    ),
                );
            }
        }
    }

    // BR-55
    for (i, preceding) in invoice.preceding_invoices.iter().enumerate() {
        if preceding.id.trim().is_empty() {
            out.violation(
                &BR_55,
                format!("preceding_invoices[{i}]: reference must not be empty"),
            );
        }
    }

    // BR-56
    if let Some(rep) = &invoice.tax_representative {
        if blank(rep.vat_id.as_deref()) {
            out.violation(&BR_56, "tax representative VAT identifier is missing");
        }
    }

    // BR-57
    if let Some(address) = invoice.ship_to.as_ref().and_then(|p| p.address.as_ref()) {
        if address.country_code.trim().is_empty() {
            out.violation(&BR_57, "deliver-to country code must not be empty");
        }
    }

    // BR-61
    for (i, means) in invoice.payment_means.iter().enumerate() {
        let Some(code) = means.type_code else {
            continue;
        };
        let has_account = means
            .payee_account
            .as_ref()
            .and_then(|a| a.account_id())
            .is_some();
        if code.is_credit_transfer() && !has_account {
            out.violation(
                &BR_61,
                format!(
                    "payment_means[{i}]: payment means {} requires a payee account identifier",
                    code.code()
                ),
            );
        }
    }

    // BR-62, BR-63
    if let Some(address) = &invoice.seller.electronic_address {
        if blank(address.scheme.as_deref()) {
            out.violation(
                &BR_62,
                format!("seller electronic address '{}' has no scheme", address.uri),
            );
        }
    }
    if let Some(address) = &invoice.buyer.electronic_address {
        if blank(address.scheme.as_deref()) {
            out.violation(
                &BR_63,
                format!("buyer electronic address '{}' has no scheme", address.uri),
            );
        }
    }

    // BR-64, BR-65
    for (i, line) in invoice.lines.iter().enumerate() {
        if let Some(global_id) = &line.global_id {
            if blank(global_id.scheme.as_deref()) {
                out.violation(
                    &BR_64,
                    format!(
                        "lines[{i}] ({}): standard identifier '{}' has no scheme",
                        line.id, global_id.id
                    ),
                );
            }
        }
    }
    for (i, line) in invoice.lines.iter().enumerate() {
        for class in &line.classifications {
            if blank(class.list_id.as_deref()) {
                out.violation(
                    &BR_65,
                    format!(
                        "lines[{i}] ({}): classification '{}' has no list identifier",
                        line.id, class.code
                    ),
                );
            }
        }
    }
}

/// BR-21 .. BR-28, BR-41 and BR-43, one line at a time.
fn check_lines(invoice: &Invoice, out: &mut Findings) {
    for (i, line) in invoice.lines.iter().enumerate() {
        if line.id.trim().is_empty() {
            out.violation(&BR_21, format!("lines[{i}]: line identifier must not be empty"));
        }
        if line.quantity_presence.is_absent() {
            out.violation(
                &BR_22,
                format!("lines[{i}] ({}): invoiced quantity is missing", line.id),
            );
        }
        if line.unit.trim().is_empty() {
            out.violation(
                &BR_23,
                format!("lines[{i}] ({}): unit of measure must not be empty", line.id),
            );
        }
        if !line.line_total_presence.resolve(line.line_total) {
            out.violation(
                &BR_24,
                format!("lines[{i}] ({}): line net amount is missing", line.id),
            );
        }
        if line.item_name.trim().is_empty() {
            out.violation(
                &BR_25,
                format!("lines[{i}] ({}): item name must not be empty", line.id),
            );
        }
        if !line.net_price_presence.resolve(line.net_price) {
            out.violation(
                &BR_26,
                format!("lines[{i}] ({}): item net price is missing", line.id),
            );
        }
        if line.net_price.is_sign_negative() && !line.net_price.is_zero() {
            out.violation(
                &BR_27,
                format!(
                    "lines[{i}] ({}): net price {} is negative",
                    line.id, line.net_price
                ),
            );
        }
        if let Some(gross) = line.gross_price {
            if gross.is_sign_negative() && !gross.is_zero() {
                out.violation(
                    &BR_28,
                    format!("lines[{i}] ({}): gross price {gross} is negative", line.id),
                );
            }
        }
        for (j, ac) in line.allowances_charges.iter().enumerate() {
            if ac.amount_presence.is_absent() {
                let (rule, kind) = if ac.is_charge { (&BR_43, "charge") } else { (&BR_41, "allowance") };
                out.violation(
                    rule,
                    format!("lines[{i}] ({}): {kind} {j} has no amount", line.id),
                );
            }
        }
    }
}

/// BR-49 .. BR-51.
fn check_payment(invoice: &Invoice, out: &mut Findings) {
    for (i, means) in invoice.payment_means.iter().enumerate() {
        if means.type_code.is_none() {
            out.violation(
                &BR_49,
                format!("payment_means[{i}]: payment means type code is missing"),
            );
        }
        if let Some(account) = &means.payee_account {
            if account.account_id().is_none() {
                out.violation(
                    &BR_50,
                    format!("payment_means[{i}]: credit transfer account has no identifier"),
                );
            }
        }
        if let Some(card) = &means.card {
            let digits = card
                .account_number
                .chars()
                .filter(char::is_ascii_digit)
                .count();
            if digits > 10 {
                out.warning(
                    &BR_51,
                    format!(
                        "payment_means[{i}]: card number shows {digits} digits, at most 10 should be visible"
                    ),
                );
            }
        }
    }
}
