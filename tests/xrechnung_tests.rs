#![cfg(feature = "xrechnung")]

use chrono::NaiveDate;
use einvoice::core::*;
use einvoice::xrechnung::{self, XRECHNUNG_URN};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn contact() -> Contact {
    Contact {
        name: Some("Max Mustermann".into()),
        department: None,
        phone: Some("+49 30 12345".into()),
        email: Some("max@acme.de".into()),
    }
}

fn xrechnung_invoice() -> InvoiceBuilder {
    InvoiceBuilder::new("RE-2024-001", date(2024, 6, 15))
        .specification(XRECHNUNG_URN)
        .due_date(date(2024, 7, 15))
        .buyer_reference("04011000-12345-03")
        .seller(
            PartyBuilder::new(
                "ACME GmbH",
                AddressBuilder::new("Berlin", "10115", "DE")
                    .street("Friedrichstraße 123")
                    .build(),
            )
            .vat_id("DE123456789")
            .electronic_address("EM", "seller@acme.de")
            .contact(contact())
            .build(),
        )
        .buyer(
            PartyBuilder::new(
                "Kunde AG",
                AddressBuilder::new("München", "80331", "DE")
                    .street("Marienplatz 1")
                    .build(),
            )
            .electronic_address("EM", "buyer@kunde.de")
            .build(),
        )
        .add_line(
            LineBuilder::new("1", "Softwareentwicklung", dec!(80), "HUR", dec!(120))
                .tax(TaxCategory::StandardRate, dec!(19))
                .description("React Frontend")
                .build(),
        )
        .add_line(
            LineBuilder::new("2", "Hosting", dec!(1), "C62", dec!(49.90))
                .tax(TaxCategory::StandardRate, dec!(19))
                .build(),
        )
        .payment_means(PaymentMeans::sepa_credit_transfer("DE89370400440532013000"))
}

fn de_codes(invoice: &mut Invoice) -> Vec<&'static str> {
    match validate(invoice) {
        Ok(()) => Vec::new(),
        Err(err) => err
            .violations()
            .iter()
            .filter(|v| v.rule.family() == "BR-DE")
            .map(Violation::code)
            .collect(),
    }
}

fn warning_codes(invoice: &Invoice) -> Vec<&'static str> {
    invoice.warnings().iter().map(Violation::code).collect()
}

#[test]
fn compliant_invoice_passes_without_warnings() {
    let inv = xrechnung_invoice().build().unwrap();
    assert!(inv.violations().is_empty());
    assert!(inv.warnings().is_empty());
    assert_eq!(inv.totals.line_total, dec!(9649.90));
    assert_eq!(inv.totals.tax_total, dec!(1833.48));
    assert_eq!(inv.totals.grand_total, dec!(11483.38));
}

#[test]
fn every_accepted_identifier_runs_the_rules() {
    for urn in xrechnung::XRECHNUNG_URNS {
        let mut inv = xrechnung_invoice().specification(*urn).build_unchecked().unwrap();
        inv.buyer_reference = None;
        assert_eq!(de_codes(&mut inv), vec!["BR-DE-15"], "{urn}");
    }
    assert_eq!(xrechnung::XRECHNUNG_CUSTOMIZATION_ID, XRECHNUNG_URN);
}

#[test]
fn payment_instructions_are_required() {
    let mut inv = xrechnung_invoice().build_unchecked().unwrap();
    inv.payment_means.clear();
    assert_eq!(de_codes(&mut inv), vec!["BR-DE-1"]);
}

#[test]
fn seller_contact_is_required() {
    let mut inv = xrechnung_invoice().build_unchecked().unwrap();
    inv.seller.contact = None;
    assert_eq!(de_codes(&mut inv), vec!["BR-DE-2"]);

    inv.seller.contact = Some(Contact::default());
    assert_eq!(de_codes(&mut inv), vec!["BR-DE-5", "BR-DE-6", "BR-DE-7"]);
}

#[test]
fn postal_details_are_required() {
    let mut inv = xrechnung_invoice().build_unchecked().unwrap();
    if let Some(address) = inv.seller.address.as_mut() {
        address.city = None;
        address.postcode = Some("  ".into());
    }
    if let Some(address) = inv.buyer.address.as_mut() {
        address.city = None;
        address.postcode = None;
    }
    inv.ship_to = Some(Party {
        name: "Lager".into(),
        address: Some(PostalAddress {
            country_code: "DE".into(),
            ..Default::default()
        }),
        ..Default::default()
    });
    assert_eq!(
        de_codes(&mut inv),
        vec!["BR-DE-3", "BR-DE-4", "BR-DE-8", "BR-DE-9", "BR-DE-10", "BR-DE-11"]
    );
}

#[test]
fn buyer_reference_is_the_leitweg_id() {
    let mut inv = xrechnung_invoice().build_unchecked().unwrap();
    inv.buyer_reference = Some(String::new());
    let err = validate(&mut inv).unwrap_err();
    assert!(err.get("BR-DE-15").unwrap().text.contains("Leitweg-ID"));
}

#[test]
fn seller_needs_a_tax_identifier() {
    let mut inv = xrechnung_invoice().build_unchecked().unwrap();
    inv.seller.vat_id = None;
    inv.seller.tax_registration_id = Some("201/113/40209".into());
    assert!(de_codes(&mut inv).is_empty());

    inv.seller.tax_registration_id = None;
    let err = validate(&mut inv).unwrap_err();
    assert!(err.contains("BR-DE-16"));
    assert!(err.get("BR-DE-16").unwrap().text.contains("categories S"));
}

#[test]
fn type_code_must_be_on_the_allowlist() {
    let mut inv = xrechnung_invoice()
        .type_code(InvoiceTypeCode::DebitNote)
        .build_unchecked()
        .unwrap();
    assert_eq!(de_codes(&mut inv), vec!["BR-DE-17"]);

    for code in xrechnung::ALLOWED_TYPE_CODES {
        inv.type_code = Some(InvoiceTypeCode::from_code(code));
        assert!(!de_codes(&mut inv).contains(&"BR-DE-17"), "{code}");
    }
}

#[test]
fn attachment_filenames_are_unique() {
    let document = |id: &str| ReferencedDocument {
        id: id.into(),
        type_code: Some("916".into()),
        description: None,
        uri: None,
        attachment: Some(BinaryObject {
            content: b"data".to_vec(),
            mime_type: "application/pdf".into(),
            filename: "anlage.pdf".into(),
        }),
    };
    let mut inv = xrechnung_invoice()
        .attachment(document("A-1"))
        .attachment(document("A-2"))
        .build_unchecked()
        .unwrap();
    assert_eq!(de_codes(&mut inv), vec!["BR-DE-22"]);
}

#[test]
fn payment_means_carry_matching_details() {
    let mut inv = xrechnung_invoice().build_unchecked().unwrap();
    inv.payment_means[0].card = Some(PaymentCard {
        account_number: "1234".into(),
        ..Default::default()
    });
    assert_eq!(de_codes(&mut inv), vec!["BR-DE-23"]);

    inv.payment_means[0] = PaymentMeans {
        type_code: Some(PaymentMeansCode::BankCard),
        card: None,
        ..Default::default()
    };
    assert_eq!(de_codes(&mut inv), vec!["BR-DE-24"]);
}

#[test]
fn sepa_direct_debit_needs_mandate_and_creditor() {
    let mut inv = xrechnung_invoice().build_unchecked().unwrap();
    inv.payment_means[0] = PaymentMeans::sepa_direct_debit("DE02120300000000202051");
    assert_eq!(de_codes(&mut inv), vec!["BR-DE-25"]);

    inv.payment_terms[0].direct_debit_mandate_id = Some("MANDATE-1".into());
    inv.creditor_reference = Some("DE98ZZZ09999999999".into());
    assert!(de_codes(&mut inv).is_empty());
}

#[test]
fn corrected_invoice_should_reference_its_predecessor() {
    let mut inv = xrechnung_invoice()
        .type_code(InvoiceTypeCode::Corrected)
        .build_unchecked()
        .unwrap();
    assert!(validate(&mut inv).is_ok());
    assert_eq!(warning_codes(&inv), vec!["BR-DE-26"]);

    inv.preceding_invoices.push(PrecedingInvoice {
        id: "RE-2024-000".into(),
        issue_date: Some(date(2024, 5, 1)),
    });
    assert!(validate(&mut inv).is_ok());
    assert!(inv.warnings().is_empty());
}

#[test]
fn contact_details_should_be_plausible() {
    let mut inv = xrechnung_invoice().build_unchecked().unwrap();
    inv.seller.contact = Some(Contact {
        phone: Some("+4".into()),
        email: Some("max.acme.de".into()),
        ..contact()
    });
    assert!(validate(&mut inv).is_ok());
    assert_eq!(warning_codes(&inv), vec!["BR-DE-27", "BR-DE-28"]);
}

#[test]
fn german_seller_outside_xrechnung_only_gets_a_warning() {
    let mut inv = xrechnung_invoice()
        .specification(einvoice::profile::EN16931_URN)
        .build_unchecked()
        .unwrap();
    inv.buyer_reference = None;
    inv.seller.contact = None;

    assert!(validate(&mut inv).is_ok());
    assert_eq!(warning_codes(&inv), vec!["BR-DE-21"]);
    let warning = &inv.warnings()[0];
    assert!(warning.text.contains(einvoice::profile::EN16931_URN));
}

#[test]
fn foreign_seller_gets_no_country_warning() {
    let mut inv = xrechnung_invoice()
        .specification(einvoice::profile::EN16931_URN)
        .build_unchecked()
        .unwrap();
    if let Some(address) = inv.seller.address.as_mut() {
        address.country_code = "AT".into();
    }
    inv.seller.vat_id = Some("ATU12345678".into());
    assert!(validate(&mut inv).is_ok());
    assert!(inv.warnings().is_empty());
}

#[cfg(feature = "xml")]
#[test]
fn xrechnung_invoice_survives_cii() {
    let inv = xrechnung_invoice().build().unwrap();
    let cii = einvoice::xml::to_cii_xml(&inv).unwrap();
    assert!(cii.contains(XRECHNUNG_URN));

    let mut parsed = einvoice::xml::parse(cii.as_bytes()).unwrap();
    assert!(validate(&mut parsed).is_ok());
    assert!(parsed.warnings().is_empty());
    assert_eq!(parsed.buyer_reference.as_deref(), Some("04011000-12345-03"));
    assert_eq!(parsed.totals.grand_total, dec!(11483.38));
}
