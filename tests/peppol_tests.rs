#![cfg(feature = "peppol")]

use chrono::NaiveDate;
use einvoice::core::*;
use einvoice::peppol::*;
use einvoice::profile::PEPPOL_URN;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn peppol_invoice() -> InvoiceBuilder {
    InvoiceBuilder::new("PEPP-001", date(2024, 6, 15))
        .specification(PEPPOL_CUSTOMIZATION_ID)
        .business_process(PEPPOL_PROFILE_ID)
        .buyer_reference("BR-123")
        .seller(
            PartyBuilder::new(
                "Seller GmbH",
                AddressBuilder::new("Berlin", "10115", "DE").build(),
            )
            .vat_id("DE123456789")
            .electronic_address("EM", "seller@peppol.eu")
            .build(),
        )
        .buyer(
            PartyBuilder::new(
                "Buyer BV",
                AddressBuilder::new("Amsterdam", "1011", "NL").build(),
            )
            .electronic_address("EM", "buyer@peppol.eu")
            .build(),
        )
        .due_date(date(2024, 7, 15))
        .payment_means(PaymentMeans::sepa_credit_transfer("DE89370400440532013000"))
        .add_line(
            LineBuilder::new("1", "Consulting services", dec!(10), "HUR", dec!(150))
                .tax(TaxCategory::StandardRate, dec!(19))
                .build(),
        )
}

fn peppol_codes(invoice: &mut Invoice) -> Vec<&'static str> {
    match validate(invoice) {
        Ok(()) => Vec::new(),
        Err(err) => err
            .violations()
            .iter()
            .filter(|v| v.rule.family() == "PEPPOL-EN16931")
            .map(Violation::code)
            .collect(),
    }
}

#[test]
fn customization_id_matches_the_profile_urn() {
    assert_eq!(PEPPOL_CUSTOMIZATION_ID, PEPPOL_URN);
    assert!(PEPPOL_INVOICE_DOCTYPE.contains(PEPPOL_CUSTOMIZATION_ID));
    assert!(PEPPOL_CREDIT_NOTE_DOCTYPE.starts_with("urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2"));
}

#[test]
fn valid_peppol_invoice() {
    let inv = peppol_invoice().build().unwrap();
    assert!(inv.violations().is_empty());
    assert_eq!(inv.totals.grand_total, dec!(1785.00));
}

#[test]
fn peppol_rules_only_run_for_the_peppol_identifier() {
    let mut inv = peppol_invoice().build_unchecked().unwrap();
    inv.business_process = None;
    assert_eq!(peppol_codes(&mut inv), vec!["PEPPOL-EN16931-R001"]);

    inv.specification_id = einvoice::profile::EN16931_URN.into();
    assert!(peppol_codes(&mut inv).is_empty());
}

#[test]
fn business_process_must_have_the_billing_shape() {
    let mut inv = peppol_invoice()
        .business_process("urn:fdc:peppol.eu:2017:poacc:billing:1:1.0")
        .build_unchecked()
        .unwrap();
    let err = validate(&mut inv).unwrap_err();
    let violation = err.get("PEPPOL-EN16931-R007").unwrap();
    assert!(violation.text.contains("billing:1:1.0"));
}

#[test]
fn buyer_or_order_reference_is_required() {
    let mut inv = peppol_invoice().build_unchecked().unwrap();
    inv.buyer_reference = None;
    assert_eq!(peppol_codes(&mut inv), vec!["PEPPOL-EN16931-R003"]);

    inv.order_reference = Some("PO-77".into());
    assert!(peppol_codes(&mut inv).is_empty());
}

#[test]
fn both_parties_need_an_electronic_address() {
    let mut inv = peppol_invoice().build_unchecked().unwrap();
    inv.seller.electronic_address = None;
    inv.buyer.electronic_address = None;
    assert_eq!(
        peppol_codes(&mut inv),
        vec!["PEPPOL-EN16931-R010", "PEPPOL-EN16931-R020"]
    );
}

#[test]
fn one_note_unless_both_parties_are_german() {
    let mut inv = peppol_invoice()
        .note("Erste Bemerkung")
        .note("Zweite Bemerkung")
        .build_unchecked()
        .unwrap();
    assert_eq!(peppol_codes(&mut inv), vec!["PEPPOL-EN16931-R002"]);

    if let Some(address) = inv.buyer.address.as_mut() {
        address.country_code = "DE".into();
    }
    assert!(peppol_codes(&mut inv).is_empty());
}

#[test]
fn tax_currency_must_differ() {
    let mut inv = peppol_invoice()
        .tax_currency("EUR", dec!(285.00))
        .build_unchecked()
        .unwrap();
    assert!(peppol_codes(&mut inv).contains(&"PEPPOL-EN16931-R005"));
}

#[test]
fn accounting_tax_total_keeps_the_sign() {
    let mut inv = peppol_invoice()
        .tax_currency("SEK", dec!(-3200))
        .build_unchecked()
        .unwrap();
    assert!(peppol_codes(&mut inv).contains(&"PEPPOL-EN16931-R055"));

    inv.totals.tax_total_accounting = Some(dec!(3200));
    assert!(!peppol_codes(&mut inv).contains(&"PEPPOL-EN16931-R055"));
}

#[test]
fn percentage_allowance_must_add_up() {
    let mut inv = peppol_invoice()
        .add_allowance(
            AllowanceCharge::allowance(dec!(80), "Rabatt")
                .with_percent(dec!(5), dec!(1500))
                .with_tax(TaxCategory::StandardRate, dec!(19)),
        )
        .build_unchecked()
        .unwrap();
    let err = validate(&mut inv).unwrap_err();
    let violation = err.get("PEPPOL-EN16931-R040").unwrap();
    assert!(violation.text.contains("expected 75 (5% of 1500)"));

    let mut inv = peppol_invoice()
        .add_allowance(
            AllowanceCharge::allowance(dec!(75), "Rabatt")
                .with_percent(dec!(5), dec!(1500))
                .with_tax(TaxCategory::StandardRate, dec!(19)),
        )
        .build()
        .unwrap();
    assert!(validate(&mut inv).is_ok());
}

#[test]
fn net_price_is_gross_minus_discount() {
    let mut inv = peppol_invoice().build_unchecked().unwrap();
    inv.lines[0].gross_price = Some(dec!(160));
    inv.lines[0].price_allowance = Some(dec!(5));
    assert!(peppol_codes(&mut inv).contains(&"PEPPOL-EN16931-R046"));

    inv.lines[0].price_allowance = Some(dec!(10));
    assert!(!peppol_codes(&mut inv).contains(&"PEPPOL-EN16931-R046"));
}

#[test]
fn direct_debit_needs_a_mandate() {
    let mut inv = peppol_invoice()
        .payment_means(PaymentMeans::sepa_direct_debit("DE02120300000000202051"))
        .build_unchecked()
        .unwrap();
    assert!(peppol_codes(&mut inv).contains(&"PEPPOL-EN16931-R061"));

    inv.payment_terms[0].direct_debit_mandate_id = Some("MANDATE-1".into());
    assert!(!peppol_codes(&mut inv).contains(&"PEPPOL-EN16931-R061"));
}

#[test]
fn line_period_stays_inside_the_invoicing_period() {
    let mut inv = peppol_invoice()
        .billing_period(date(2024, 6, 1), date(2024, 6, 30))
        .add_line(
            LineBuilder::new("2", "Wartung", dec!(1), "C62", dec!(100))
                .billing_period(date(2024, 5, 15), date(2024, 7, 15))
                .build(),
        )
        .build_unchecked()
        .unwrap();
    assert_eq!(
        peppol_codes(&mut inv),
        vec!["PEPPOL-EN16931-R110", "PEPPOL-EN16931-R111"]
    );
}

#[test]
fn line_amount_follows_price_and_quantity() {
    let mut inv = peppol_invoice().build_unchecked().unwrap();
    inv.lines[0].line_total = dec!(1499.00);
    let err = validate(&mut inv).unwrap_err();
    let violation = err.get("PEPPOL-EN16931-R120").unwrap();
    assert!(violation.text.contains("expected 1500"));
}

#[test]
fn base_quantity_rules() {
    let mut inv = peppol_invoice().build_unchecked().unwrap();
    inv.lines[0].base_quantity = Some(dec!(0));
    assert!(peppol_codes(&mut inv).contains(&"PEPPOL-EN16931-R121"));

    inv.lines[0].base_quantity = Some(dec!(1));
    inv.lines[0].base_quantity_unit = Some("DAY".into());
    assert_eq!(peppol_codes(&mut inv), vec!["PEPPOL-EN16931-R130"]);
}

#[cfg(feature = "xml")]
#[test]
fn peppol_invoice_survives_ubl() {
    let inv = peppol_invoice().build().unwrap();
    let ubl = einvoice::xml::to_ubl_xml(&inv).unwrap();
    assert!(ubl.contains(&format!("<cbc:CustomizationID>{PEPPOL_CUSTOMIZATION_ID}</cbc:CustomizationID>")));
    assert!(ubl.contains(&format!("<cbc:ProfileID>{PEPPOL_PROFILE_ID}</cbc:ProfileID>")));

    let mut parsed = einvoice::xml::parse(ubl.as_bytes()).unwrap();
    assert!(validate(&mut parsed).is_ok());
    assert_eq!(
        parsed.buyer.electronic_address.map(|a| a.uri),
        Some("buyer@peppol.eu".to_string())
    );
}
