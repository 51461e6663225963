use std::collections::HashSet;

use tracing::trace;

use crate::core::rules::*;
use crate::core::*;
use crate::core::validation::{Findings, blank};
use crate::profile;

use super::ALLOWED_TYPE_CODES;

/// XRechnung rules (BR-DE-*), in ascending code order.
pub(crate) fn check(invoice: &Invoice, out: &mut Findings) {
    trace!("running BR-DE rules");

    // BR-DE-1
    if invoice.payment_means.is_empty() {
        out.violation(&BR_DE_1, "payment instructions are required");
    }

    // BR-DE-2
    if invoice.seller.contact.is_none() {
        out.violation(&BR_DE_2, "seller contact is required");
    }

    // BR-DE-3, BR-DE-4
    let seller_address = invoice.seller.address.as_ref();
    if blank(seller_address.and_then(|a| a.city.as_deref())) {
        out.violation(&BR_DE_3, "seller city is required");
    }
    if blank(seller_address.and_then(|a| a.postcode.as_deref())) {
        out.violation(&BR_DE_4, "seller post code is required");
    }

    // BR-DE-5 .. BR-DE-7
    if let Some(contact) = &invoice.seller.contact {
        if blank(contact.name.as_deref()) {
            out.violation(&BR_DE_5, "seller contact point is required");
        }
        if blank(contact.phone.as_deref()) {
            out.violation(&BR_DE_6, "seller contact telephone number is required");
        }
        if blank(contact.email.as_deref()) {
            out.violation(&BR_DE_7, "seller contact email address is required");
        }
    }

    // BR-DE-8, BR-DE-9
    let buyer_address = invoice.buyer.address.as_ref();
    if blank(buyer_address.and_then(|a| a.city.as_deref())) {
        out.violation(&BR_DE_8, "buyer city is required");
    }
    if blank(buyer_address.and_then(|a| a.postcode.as_deref())) {
        out.violation(&BR_DE_9, "buyer post code is required");
    }

    // BR-DE-10, BR-DE-11
    if let Some(address) = invoice.ship_to.as_ref().and_then(|p| p.address.as_ref()) {
        if blank(address.city.as_deref()) {
            out.violation(&BR_DE_10, "deliver-to city is required");
        }
        if blank(address.postcode.as_deref()) {
            out.violation(&BR_DE_11, "deliver-to post code is required");
        }
    }

    // BR-DE-15
    if blank(invoice.buyer_reference.as_deref()) {
        out.violation(&BR_DE_15, "buyer reference (Leitweg-ID) is required");
    }

    // BR-DE-16
    let taxed: Vec<&str> = invoice
        .tax_categories()
        .into_iter()
        .filter(|c| *c != TaxCategory::NotSubjectToVat)
        .map(|c| c.code())
        .collect();
    let seller_tax_id = !blank(invoice.seller.vat_id.as_deref())
        || !blank(invoice.seller.tax_registration_id.as_deref())
        || invoice.tax_representative.is_some();
    if !taxed.is_empty() && !seller_tax_id {
        out.violation(
            &BR_DE_16,
            format!(
                "categories {} need a seller VAT identifier, tax number or tax representative",
                taxed.join(", ")
            ),
        );
    }

    // BR-DE-17
    if let Some(type_code) = invoice.type_code {
        if !ALLOWED_TYPE_CODES.contains(&type_code.code()) {
            out.violation(
                &BR_DE_17,
                format!(
                    "invoice type code {} is not one of {ALLOWED_TYPE_CODES:?}",
                    type_code.code()
                ),
            );
        }
    }

    // BR-DE-22
    let mut filenames = HashSet::new();
    for doc in &invoice.attachments {
        if let Some(binary) = &doc.attachment {
            if !filenames.insert(binary.filename.as_str()) {
                out.violation(
                    &BR_DE_22,
                    format!("attachment filename '{}' is used more than once", binary.filename),
                );
            }
        }
    }

    check_payment_means(invoice, out);

    // BR-DE-26
    if invoice.type_code == Some(InvoiceTypeCode::Corrected) && invoice.preceding_invoices.is_empty() {
        out.warning(&BR_DE_26, "corrected invoice should reference the preceding invoice");
    }

    // BR-DE-27, BR-DE-28
    if let Some(contact) = &invoice.seller.contact {
        if let Some(phone) = contact.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            if digits < 3 {
                out.warning(
                    &BR_DE_27,
                    format!("seller telephone number '{phone}' has fewer than three digits"),
                );
            }
        }
        if let Some(email) = contact.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !plausible_email(email) {
                out.warning(
                    &BR_DE_28,
                    format!("seller email address '{email}' should contain exactly one inner @"),
                );
            }
        }
    }
}

/// BR-DE-23 .. BR-DE-25.
fn check_payment_means(invoice: &Invoice, out: &mut Findings) {
    for (i, means) in invoice.payment_means.iter().enumerate() {
        let Some(code) = means.type_code else {
            continue;
        };
        let transfer = means.payee_account.is_some();
        let card = means.card.is_some();
        let debit = !blank(means.payer_account.as_deref());

        if code.is_credit_transfer() && (!transfer || card || debit) {
            out.violation(
                &BR_DE_23,
                format!(
                    "payment_means[{i}]: code {} needs credit transfer details only",
                    code.code()
                ),
            );
        }
        if code.is_card() && (!card || transfer || debit) {
            out.violation(
                &BR_DE_24,
                format!(
                    "payment_means[{i}]: code {} needs payment card details only",
                    code.code()
                ),
            );
        }
        if code == PaymentMeansCode::SepaDirectDebit {
            let mandate = invoice
                .payment_terms
                .iter()
                .any(|t| !blank(t.direct_debit_mandate_id.as_deref()));
            let creditor = !blank(invoice.creditor_reference.as_deref());
            if !(mandate && creditor && debit) {
                out.violation(
                    &BR_DE_25,
                    format!(
                        "payment_means[{i}]: SEPA direct debit needs mandate reference, creditor identifier and debited account"
                    ),
                );
            }
        }
    }
}

/// Country rules for a seller located in Germany.
pub(crate) fn check_germany(invoice: &Invoice, xrechnung: bool, out: &mut Findings) {
    trace!("running German country rules");
    if !xrechnung && profile::is_en16931(&invoice.specification_id) {
        out.warning(
            &BR_DE_21,
            format!(
                "seller is located in Germany but '{}' is not an XRechnung identifier",
                invoice.specification_id
            ),
        );
    }
}

fn plausible_email(email: &str) -> bool {
    let email = email.trim();
    email.matches('@').count() == 1 && !email.starts_with('@') && !email.ends_with('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(plausible_email("billing@example.de"));
        assert!(!plausible_email("@example.de"));
        assert!(!plausible_email("billing@"));
        assert!(!plausible_email("a@b@c"));
        assert!(!plausible_email("no-at-sign"));
    }

    #[test]
    fn german_seller_with_plain_en16931_gets_a_warning() {
        let invoice = Invoice {
            specification_id: profile::EN16931_URN.into(),
            ..Default::default()
        };
        let mut out = Findings::default();
        check_germany(&invoice, false, &mut out);
        assert!(out.violations.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].code(), "BR-DE-21");

        let mut out = Findings::default();
        check_germany(&invoice, true, &mut out);
        assert!(out.warnings.is_empty());
    }
}
