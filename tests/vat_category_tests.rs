use chrono::NaiveDate;
use einvoice::core::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seller(vat_id: &str) -> Party {
    PartyBuilder::new(
        "ACME GmbH",
        AddressBuilder::new("Berlin", "10115", "DE")
            .street("Friedrichstraße 123")
            .build(),
    )
    .vat_id(vat_id)
    .build()
}

fn french_buyer() -> PartyBuilder {
    PartyBuilder::new(
        "Client SARL",
        AddressBuilder::new("Paris", "75001", "FR")
            .street("1 Rue de Rivoli")
            .build(),
    )
}

fn invoice(buyer: Party) -> InvoiceBuilder {
    InvoiceBuilder::new("RE-2024-100", date(2024, 6, 15))
        .seller(seller("DE123"))
        .buyer(buyer)
        .payment_terms("30 jours net")
}

fn line(id: &str, price: rust_decimal::Decimal, category: TaxCategory, rate: rust_decimal::Decimal) -> InvoiceLine {
    LineBuilder::new(id, "Ware", dec!(1), "C62", price)
        .tax(category, rate)
        .build()
}

fn families(err: &ValidationError) -> Vec<&'static str> {
    err.violations().iter().map(|v| v.rule.family()).collect()
}

fn expect_violations(builder: InvoiceBuilder) -> ValidationError {
    match builder.build() {
        Err(InvoiceError::Validation(err)) => err,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn reverse_charge_with_both_vat_ids() {
    let inv = invoice(french_buyer().vat_id("FR456").build())
        .add_line(line("1", dec!(100), TaxCategory::ReverseCharge, dec!(0)))
        .build()
        .unwrap();

    assert!(inv.violations().is_empty());
    assert_eq!(inv.trade_taxes.len(), 1);
    assert_eq!(inv.trade_taxes[0].category, Some(TaxCategory::ReverseCharge));
    assert_eq!(inv.trade_taxes[0].exemption_reason.as_deref(), Some("Reverse charge"));
    assert_eq!(inv.totals.tax_total, dec!(0));
}

#[test]
fn reverse_charge_accepts_buyer_legal_registration() {
    let buyer = french_buyer()
        .legal_registration("552100554", Some("0002".into()))
        .build();
    let inv = invoice(buyer)
        .add_line(line("1", dec!(100), TaxCategory::ReverseCharge, dec!(0)))
        .exemption_reason(TaxCategory::ReverseCharge, "reverse charge")
        .build()
        .unwrap();
    assert_eq!(inv.trade_taxes[0].exemption_reason.as_deref(), Some("reverse charge"));
}

#[test]
fn reverse_charge_without_buyer_ids() {
    let err = expect_violations(
        invoice(french_buyer().build())
            .add_line(line("1", dec!(100), TaxCategory::ReverseCharge, dec!(0))),
    );
    assert!(err.contains("BR-AE-02"));
}

#[test]
fn intra_community_supply_rounds_line_amounts() {
    let inv = invoice(french_buyer().vat_id("FR456").build())
        .add_line(line("1", dec!(50.004), TaxCategory::IntraCommunitySupply, dec!(0)))
        .add_line(line("2", dec!(49.997), TaxCategory::IntraCommunitySupply, dec!(0)))
        .delivery_date(date(2024, 6, 10))
        .ship_to(
            PartyBuilder::new("Lager Paris", AddressBuilder::new("Paris", "75002", "FR").build())
                .build(),
        )
        .build()
        .unwrap();

    assert_eq!(inv.lines[0].line_total, dec!(50.00));
    assert_eq!(inv.lines[1].line_total, dec!(50.00));
    assert_eq!(inv.trade_taxes[0].basis_amount, dec!(100.00));
    assert!(inv.violations().is_empty());
}

#[test]
fn taxable_amount_is_compared_after_rounding() {
    let mut inv = invoice(french_buyer().vat_id("FR456").build())
        .add_line(
            LineBuilder::new("1", "Ware", dec!(1), "C62", dec!(50.004))
                .tax(TaxCategory::IntraCommunitySupply, dec!(0))
                .line_total(dec!(50.004))
                .build(),
        )
        .add_line(
            LineBuilder::new("2", "Ware", dec!(1), "C62", dec!(49.997))
                .tax(TaxCategory::IntraCommunitySupply, dec!(0))
                .line_total(dec!(49.997))
                .build(),
        )
        .delivery_date(date(2024, 6, 10))
        .ship_to(
            PartyBuilder::new("Lager Paris", AddressBuilder::new("Paris", "75002", "FR").build())
                .build(),
        )
        .build_unchecked()
        .unwrap();

    assert_eq!(inv.trade_taxes[0].basis_amount, dec!(100.00));
    let err = validate(&mut inv).unwrap_err();
    assert!(!families(&err).contains(&"BR-IC"));
    assert!(err.contains("BR-DEC-23"));
}

#[test]
fn intra_community_supply_needs_delivery_information() {
    let err = expect_violations(
        invoice(french_buyer().vat_id("FR456").build())
            .add_line(line("1", dec!(100), TaxCategory::IntraCommunitySupply, dec!(0))),
    );
    assert!(err.contains("BR-IC-11"));
    assert!(err.contains("BR-IC-12"));

    let err = expect_violations(
        invoice(french_buyer().build())
            .add_line(line("1", dec!(100), TaxCategory::IntraCommunitySupply, dec!(0)))
            .billing_period(date(2024, 6, 1), date(2024, 6, 30)),
    );
    assert!(!err.contains("BR-IC-11"));
    assert!(err.contains("BR-IC-02"));
}

#[test]
fn intra_community_charge_rate_and_tax_amount_are_separate_rules() {
    let valid = invoice(french_buyer().vat_id("FR456").build())
        .add_line(line("1", dec!(100), TaxCategory::IntraCommunitySupply, dec!(0)))
        .delivery_date(date(2024, 6, 10))
        .ship_to(
            PartyBuilder::new("Lager Paris", AddressBuilder::new("Paris", "75002", "FR").build())
                .build(),
        )
        .build()
        .unwrap();

    let mut taxed = valid.clone();
    taxed.trade_taxes[0].calculated_amount = dec!(19.00);
    let err = validate(&mut taxed).unwrap_err();
    assert!(err.get("BR-IC-09").unwrap().text.contains("19.00"));
    assert!(!err.contains("BR-IC-07"));

    let mut charged = valid;
    charged.allowances_charges.push(
        AllowanceCharge::charge(dec!(0), "Fracht").with_tax(TaxCategory::IntraCommunitySupply, dec!(7)),
    );
    let err = validate(&mut charged).unwrap_err();
    assert!(err.contains("BR-IC-07"));
    assert!(!err.contains("BR-IC-09"));
}

#[test]
fn standard_rate_forbids_exemption_reason() {
    let mut inv = invoice(french_buyer().build())
        .add_line(line("1", dec!(100), TaxCategory::StandardRate, dec!(19)))
        .build_unchecked()
        .unwrap();
    inv.trade_taxes[0].exemption_reason = Some("Steuerfrei".into());

    let err = validate(&mut inv).unwrap_err();
    assert_eq!(
        err.violations().iter().map(Violation::code).collect::<Vec<_>>(),
        vec!["BR-S-10"]
    );
}

#[test]
fn standard_rate_needs_positive_rate() {
    let err = expect_violations(
        invoice(french_buyer().build())
            .add_line(line("1", dec!(100), TaxCategory::StandardRate, dec!(0))),
    );
    assert!(err.contains("BR-S-05"));
}

#[test]
fn zero_rated_goods_have_no_reason() {
    let inv = invoice(french_buyer().build())
        .add_line(line("1", dec!(100), TaxCategory::ZeroRated, dec!(0)))
        .build()
        .unwrap();
    assert_eq!(inv.trade_taxes[0].exemption_reason, None);
    assert_eq!(inv.totals.grand_total, dec!(100));
}

#[test]
fn exempt_needs_a_reason() {
    let mut inv = invoice(french_buyer().build())
        .add_line(line("1", dec!(100), TaxCategory::Exempt, dec!(0)))
        .build_unchecked()
        .unwrap();
    assert!(validate(&mut inv).is_ok());

    inv.trade_taxes[0].exemption_reason = None;
    let err = validate(&mut inv).unwrap_err();
    assert!(err.contains("BR-E-10"));

    inv.trade_taxes[0].exemption_reason_code = Some("VATEX-EU-132".into());
    assert!(validate(&mut inv).is_ok());
}

#[test]
fn export_needs_seller_vat() {
    let seller = PartyBuilder::new(
        "ACME GmbH",
        AddressBuilder::new("Berlin", "10115", "DE").build(),
    )
    .tax_registration_id("201/113/40209")
    .build();
    let err = expect_violations(
        invoice(french_buyer().build())
            .seller(seller)
            .add_line(line("1", dec!(100), TaxCategory::Export, dec!(0))),
    );
    assert!(err.contains("BR-G-02"));
}

#[test]
fn not_subject_to_vat_stands_alone() {
    let err = expect_violations(
        invoice(french_buyer().build())
            .add_line(line("1", dec!(100), TaxCategory::NotSubjectToVat, dec!(0)))
            .add_line(line("2", dec!(100), TaxCategory::StandardRate, dec!(19))),
    );
    assert!(err.contains("BR-O-02"));
    assert!(err.contains("BR-O-12"));
    assert!(err.contains("BR-O-14"));
}

#[test]
fn not_subject_to_vat_allows_one_entry() {
    let err = expect_violations(
        invoice(french_buyer().build())
            .add_line(line("1", dec!(100), TaxCategory::NotSubjectToVat, dec!(0)))
            .add_line(line("2", dec!(100), TaxCategory::NotSubjectToVat, dec!(5))),
    );
    assert!(err.contains("BR-O-05"));
    assert!(err.contains("BR-O-11"));
    assert!(!err.contains("BR-O-14"));
}

#[test]
fn canary_islands_allow_their_own_rates() {
    let inv = invoice(french_buyer().build())
        .add_line(line("1", dec!(100), TaxCategory::CanaryIslands, dec!(7)))
        .build()
        .unwrap();
    assert_eq!(inv.totals.tax_total, dec!(7.00));
}

#[test]
fn ceuta_and_melilla_forbid_buyer_vat() {
    let err = expect_violations(
        invoice(french_buyer().vat_id("FR456").build())
            .add_line(line("1", dec!(100), TaxCategory::CeutaMelilla, dec!(4))),
    );
    assert!(err.contains("BR-AG-02"));
}

#[test]
fn families_run_in_category_order() {
    let anonymous = PartyBuilder::new(
        "ACME GmbH",
        AddressBuilder::new("Berlin", "10115", "DE").build(),
    )
    .build();
    let err = expect_violations(
        invoice(french_buyer().build())
            .seller(anonymous)
            .add_line(line("1", dec!(100), TaxCategory::Exempt, dec!(0)))
            .add_line(line("2", dec!(100), TaxCategory::StandardRate, dec!(19))),
    );
    let vat: Vec<&str> = families(&err)
        .into_iter()
        .filter(|f| *f == "BR-S" || *f == "BR-E")
        .collect();
    assert_eq!(vat, vec!["BR-S", "BR-E"]);
}
