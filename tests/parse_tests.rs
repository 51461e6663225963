use chrono::NaiveDate;
use einvoice::core::*;
use einvoice::xml;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const UBL_INVOICE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
    xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2"
    xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
  <cbc:CustomizationID>urn:cen.eu:en16931:2017</cbc:CustomizationID>
  <cbc:ID>UBL-2024-1</cbc:ID>
  <cbc:IssueDate>2024-06-15</cbc:IssueDate>
  <cbc:DueDate>2024-07-15</cbc:DueDate>
  <cbc:InvoiceTypeCode>380</cbc:InvoiceTypeCode>
  <cbc:Note>#AAI#Lieferung frei Haus</cbc:Note>
  <cbc:DocumentCurrencyCode>EUR</cbc:DocumentCurrencyCode>
  <cbc:BuyerReference>04011000-12345-34</cbc:BuyerReference>
  <cac:AccountingSupplierParty>
    <cac:Party>
      <cbc:EndpointID schemeID="EM">rechnung@acme.de</cbc:EndpointID>
      <cac:PartyIdentification><cbc:ID schemeID="SEPA">DE98ZZZ09999999999</cbc:ID></cac:PartyIdentification>
      <cac:PostalAddress>
        <cbc:StreetName>Friedrichstraße 123</cbc:StreetName>
        <cbc:CityName>Berlin</cbc:CityName>
        <cbc:PostalZone>10115</cbc:PostalZone>
        <cac:Country><cbc:IdentificationCode>DE</cbc:IdentificationCode></cac:Country>
      </cac:PostalAddress>
      <cac:PartyTaxScheme>
        <cbc:CompanyID>DE123456789</cbc:CompanyID>
        <cac:TaxScheme><cbc:ID>VAT</cbc:ID></cac:TaxScheme>
      </cac:PartyTaxScheme>
      <cac:PartyLegalEntity><cbc:RegistrationName>ACME GmbH</cbc:RegistrationName></cac:PartyLegalEntity>
    </cac:Party>
  </cac:AccountingSupplierParty>
  <cac:AccountingCustomerParty>
    <cac:Party>
      <cac:PostalAddress>
        <cbc:CityName>München</cbc:CityName>
        <cbc:PostalZone>80331</cbc:PostalZone>
        <cac:Country><cbc:IdentificationCode>DE</cbc:IdentificationCode></cac:Country>
      </cac:PostalAddress>
      <cac:PartyLegalEntity><cbc:RegistrationName>Kunde AG</cbc:RegistrationName></cac:PartyLegalEntity>
    </cac:Party>
  </cac:AccountingCustomerParty>
  <cac:PaymentMeans>
    <cbc:PaymentMeansCode>58</cbc:PaymentMeansCode>
    <cbc:PaymentID>UBL-2024-1</cbc:PaymentID>
    <cac:PayeeFinancialAccount><cbc:ID>DE89370400440532013000</cbc:ID></cac:PayeeFinancialAccount>
  </cac:PaymentMeans>
  <cac:TaxTotal>
    <cbc:TaxAmount currencyID="EUR">19.00</cbc:TaxAmount>
    <cac:TaxSubtotal>
      <cbc:TaxableAmount currencyID="EUR">100.00</cbc:TaxableAmount>
      <cbc:TaxAmount currencyID="EUR">19.00</cbc:TaxAmount>
      <cac:TaxCategory>
        <cbc:ID>S</cbc:ID>
        <cbc:Percent>19</cbc:Percent>
        <cac:TaxScheme><cbc:ID>VAT</cbc:ID></cac:TaxScheme>
      </cac:TaxCategory>
    </cac:TaxSubtotal>
  </cac:TaxTotal>
  <cac:LegalMonetaryTotal>
    <cbc:LineExtensionAmount currencyID="EUR">100.00</cbc:LineExtensionAmount>
    <cbc:TaxExclusiveAmount currencyID="EUR">100.00</cbc:TaxExclusiveAmount>
    <cbc:TaxInclusiveAmount currencyID="EUR">119.00</cbc:TaxInclusiveAmount>
    <cbc:PayableAmount currencyID="EUR">119.00</cbc:PayableAmount>
  </cac:LegalMonetaryTotal>
  <cac:InvoiceLine>
    <cbc:ID>1</cbc:ID>
    <cbc:InvoicedQuantity unitCode="C62">1</cbc:InvoicedQuantity>
    <cbc:LineExtensionAmount currencyID="EUR">100.00</cbc:LineExtensionAmount>
    <cac:Item>
      <cbc:Name>Beratung</cbc:Name>
      <cac:ClassifiedTaxCategory>
        <cbc:ID>S</cbc:ID>
        <cbc:Percent>19</cbc:Percent>
        <cac:TaxScheme><cbc:ID>VAT</cbc:ID></cac:TaxScheme>
      </cac:ClassifiedTaxCategory>
    </cac:Item>
    <cac:Price><cbc:PriceAmount currencyID="EUR">100.00</cbc:PriceAmount></cac:Price>
  </cac:InvoiceLine>
</Invoice>
"#;

const CII_HEAD: &str = r#"<rsm:CrossIndustryInvoice
    xmlns:rsm="urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100"
    xmlns:ram="urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100"
    xmlns:udt="urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100">"#;

fn cii(body: &str) -> String {
    format!("{CII_HEAD}{body}</rsm:CrossIndustryInvoice>")
}

fn cii_with_summation(summation: &str) -> String {
    cii(&format!(
        r#"<rsm:ExchangedDocumentContext>
             <ram:GuidelineSpecifiedDocumentContextParameter><ram:ID>urn:cen.eu:en16931:2017</ram:ID></ram:GuidelineSpecifiedDocumentContextParameter>
           </rsm:ExchangedDocumentContext>
           <rsm:ExchangedDocument>
             <ram:ID>CII-1</ram:ID>
             <ram:TypeCode>380</ram:TypeCode>
             <ram:IssueDateTime><udt:DateTimeString format="102">20240615</udt:DateTimeString></ram:IssueDateTime>
           </rsm:ExchangedDocument>
           <rsm:SupplyChainTradeTransaction>
             <ram:ApplicableHeaderTradeSettlement>
               <ram:InvoiceCurrencyCode>EUR</ram:InvoiceCurrencyCode>
               <ram:SpecifiedTradeSettlementHeaderMonetarySummation>{summation}</ram:SpecifiedTradeSettlementHeaderMonetarySummation>
             </ram:ApplicableHeaderTradeSettlement>
           </rsm:SupplyChainTradeTransaction>"#
    ))
}

#[test]
fn reads_a_ubl_invoice() {
    let inv = xml::parse(UBL_INVOICE.as_bytes()).unwrap();

    assert_eq!(inv.schema_type, SchemaType::Ubl);
    assert!(inv.is_parsed());
    assert_eq!(inv.number, "UBL-2024-1");
    assert_eq!(inv.issue_date, Some(date(2024, 6, 15)));
    assert_eq!(inv.type_code, Some(InvoiceTypeCode::Invoice));
    assert_eq!(inv.due_date(), Some(date(2024, 7, 15)));
    assert_eq!(inv.notes[0].subject_code.as_deref(), Some("AAI"));
    assert_eq!(inv.notes[0].text, "Lieferung frei Haus");
    assert_eq!(inv.seller.name, "ACME GmbH");
    assert_eq!(inv.seller.vat_id.as_deref(), Some("DE123456789"));
    assert!(inv.seller.ids.is_empty());
    assert_eq!(inv.creditor_reference.as_deref(), Some("DE98ZZZ09999999999"));
    assert_eq!(inv.payment_reference.as_deref(), Some("UBL-2024-1"));
    assert_eq!(
        inv.payment_means[0].payee_account.as_ref().and_then(|a| a.iban.as_deref()),
        Some("DE89370400440532013000")
    );
    assert_eq!(inv.trade_taxes[0].category, Some(TaxCategory::StandardRate));
    assert_eq!(inv.totals.grand_total, dec!(119.00));
    assert_eq!(inv.totals.presence.prepaid, Presence::Absent);
    assert_eq!(inv.lines[0].item_name, "Beratung");
    assert_eq!(inv.lines[0].line_total_presence, Presence::Present);
}

#[test]
fn parsed_ubl_invoice_validates() {
    let mut inv = xml::from_ubl_xml(UBL_INVOICE).unwrap();
    assert!(validate(&mut inv).is_ok());
    assert!(inv.violations().is_empty());
}

#[test]
fn amounts_at_the_decimal_limit_fail_validation_without_panicking() {
    let start = UBL_INVOICE.find("<cac:InvoiceLine>").unwrap();
    let end = UBL_INVOICE.find("</Invoice>").unwrap();
    let line = UBL_INVOICE[start..end].replace(
        ">100.00</cbc:LineExtensionAmount>",
        ">79228162514264337593543950335</cbc:LineExtensionAmount>",
    );
    let doc = format!("{}{line}{line}</Invoice>", &UBL_INVOICE[..start]);

    let mut inv = xml::parse(doc.as_bytes()).unwrap();
    assert_eq!(inv.lines.len(), 2);

    let err = validate(&mut inv).unwrap_err();
    let line_sum = err.get("BR-CO-10").unwrap();
    assert!(line_sum.text.contains("exceeds the representable decimal range"));
    assert!(err.contains("BR-S-08"));

    assert!(matches!(update_totals(&mut inv), Err(InvoiceError::Overflow(_))));
    assert_eq!(inv.totals.grand_total, dec!(119.00));
    assert!(matches!(
        derive_tax_breakdown(&mut inv, &default_exemption_reasons()),
        Err(InvoiceError::Overflow(_))
    ));
}

#[test]
fn explicit_zero_is_present_and_missing_total_is_absent() {
    let mut inv = xml::parse(
        cii_with_summation(
            r#"<ram:LineTotalAmount>0.00</ram:LineTotalAmount>
               <ram:TaxBasisTotalAmount>0.00</ram:TaxBasisTotalAmount>
               <ram:TaxTotalAmount currencyID="EUR">0.00</ram:TaxTotalAmount>
               <ram:DuePayableAmount>0.00</ram:DuePayableAmount>"#,
        )
        .as_bytes(),
    )
    .unwrap();

    assert_eq!(inv.totals.presence.line_total, Presence::Present);
    assert_eq!(inv.totals.presence.grand_total, Presence::Absent);
    assert_eq!(inv.totals.presence.allowance_total, Presence::Absent);

    let err = validate(&mut inv).unwrap_err();
    assert!(err.contains("BR-14"));
    assert!(!err.contains("BR-12"));
    assert!(!err.contains("BR-13"));
    assert!(!err.contains("BR-15"));
}

#[test]
fn foreign_tax_total_goes_to_the_side_list() {
    let inv = xml::parse(
        cii_with_summation(
            r#"<ram:TaxTotalAmount currencyID="EUR">19.00</ram:TaxTotalAmount>
               <ram:TaxTotalAmount currencyID="GBP">16.20</ram:TaxTotalAmount>"#,
        )
        .as_bytes(),
    )
    .unwrap();

    assert_eq!(inv.totals.tax_total, dec!(19.00));
    assert_eq!(inv.totals.tax_total_accounting, None);
    assert_eq!(
        inv.unexpected_currency_amounts(),
        vec![CurrencyAmount {
            element: "TaxTotalAmount".into(),
            amount: dec!(16.20),
            currency: "GBP".into(),
        }]
    );
}

#[test]
fn invalid_decimal_names_the_field() {
    let err = xml::parse(
        cii_with_summation("<ram:GrandTotalAmount>12,50</ram:GrandTotalAmount>").as_bytes(),
    )
    .unwrap_err();
    match err {
        InvoiceError::InvalidDecimal { field, value } => {
            assert!(field.contains("BT-112"));
            assert_eq!(value, "12,50");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn cii_issue_date_needs_format_102() {
    let doc = cii(
        r#"<rsm:ExchangedDocument>
             <ram:ID>CII-2</ram:ID>
             <ram:IssueDateTime><udt:DateTimeString format="610">202406</udt:DateTimeString></ram:IssueDateTime>
           </rsm:ExchangedDocument>"#,
    );
    let err = xml::parse(doc.as_bytes()).unwrap_err();
    assert!(matches!(err, InvoiceError::InvalidDate { ref field, .. } if field.contains("BT-2")));
}

#[test]
fn ubl_dates_are_iso() {
    let doc = UBL_INVOICE.replace("2024-06-15", "15.06.2024");
    let err = xml::parse(doc.as_bytes()).unwrap_err();
    assert!(matches!(err, InvoiceError::InvalidDate { .. }));
}

#[test]
fn malformed_and_foreign_documents() {
    let err = xml::parse(b"<Invoice xmlns=\"urn:oasis:names:specification:ubl:schema:xsd:Invoice-2\"><ID>1</ID>")
        .unwrap_err();
    assert!(matches!(err, InvoiceError::MalformedXml(_)));

    let err = xml::parse(b"<Order xmlns=\"urn:oasis:names:specification:ubl:schema:xsd:Order-2\"/>")
        .unwrap_err();
    assert!(matches!(err, InvoiceError::UnknownSyntax(_)));

    let err = xml::from_cii_xml(UBL_INVOICE).unwrap_err();
    assert!(matches!(err, InvoiceError::UnknownSyntax(_)));
}

#[test]
fn broken_attachment_is_rejected() {
    let doc = UBL_INVOICE.replace(
        "<cac:AccountingSupplierParty>",
        r#"<cac:AdditionalDocumentReference>
             <cbc:ID>Zeitnachweis</cbc:ID>
             <cac:Attachment>
               <cbc:EmbeddedDocumentBinaryObject mimeCode="application/pdf" filename="z.pdf">!!not base64!!</cbc:EmbeddedDocumentBinaryObject>
             </cac:Attachment>
           </cac:AdditionalDocumentReference>
           <cac:AccountingSupplierParty>"#,
    );
    let err = xml::parse(doc.as_bytes()).unwrap_err();
    assert!(matches!(err, InvoiceError::InvalidAttachment { .. }));
}

#[test]
fn foreign_profiles_skip_validation() {
    let doc = UBL_INVOICE
        .replace("urn:cen.eu:en16931:2017", "urn:example:custom-profile")
        .replace("<cbc:ID>UBL-2024-1</cbc:ID>", "<cbc:ID></cbc:ID>");
    let mut inv = xml::parse(doc.as_bytes()).unwrap();
    assert!(validate(&mut inv).is_ok());
    assert!(inv.warnings().is_empty());

    let mut built = inv.clone();
    built.specification_id = "urn:cen.eu:en16931:2017".into();
    let err = validate(&mut built).unwrap_err();
    assert!(err.contains("BR-02"));
}

#[test]
fn factur_x_minimum_is_still_validated() {
    let doc = UBL_INVOICE
        .replace("urn:cen.eu:en16931:2017", "urn:factur-x.eu:1p0:minimum")
        .replace("<cbc:ID>UBL-2024-1</cbc:ID>", "<cbc:ID></cbc:ID>");
    let mut inv = xml::parse(doc.as_bytes()).unwrap();
    let err = validate(&mut inv).unwrap_err();
    assert!(err.contains("BR-02"));
}

#[test]
fn credit_note_is_read_with_its_own_vocabulary() {
    let doc = UBL_INVOICE
        .replace(
            "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2",
            "urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2",
        )
        .replace("<Invoice ", "<CreditNote ")
        .replace("</Invoice>", "</CreditNote>")
        .replace("InvoiceTypeCode", "CreditNoteTypeCode")
        .replace(">380<", ">381<")
        .replace("InvoiceLine>", "CreditNoteLine>")
        .replace("InvoicedQuantity", "CreditedQuantity");
    let inv = xml::parse(doc.as_bytes()).unwrap();
    assert_eq!(inv.type_code, Some(InvoiceTypeCode::CreditNote));
    assert_eq!(inv.lines.len(), 1);
    assert_eq!(inv.lines[0].quantity, dec!(1));
}

#[test]
fn missing_ubl_amounts_and_quantity_are_reported() {
    let allowance = |reason: &str, tax: &str| {
        format!(
            "<cac:AllowanceCharge><cbc:ChargeIndicator>false</cbc:ChargeIndicator>\
             <cbc:AllowanceChargeReason>{reason}</cbc:AllowanceChargeReason>{tax}</cac:AllowanceCharge>\n"
        )
    };
    let doc = UBL_INVOICE
        .replace(r#"<cbc:InvoicedQuantity unitCode="C62">1</cbc:InvoicedQuantity>"#, "")
        .replace(
            "<cbc:TaxableAmount currencyID=\"EUR\">100.00</cbc:TaxableAmount>\n      \
             <cbc:TaxAmount currencyID=\"EUR\">19.00</cbc:TaxAmount>",
            "",
        )
        .replacen("<cbc:Percent>19</cbc:Percent>", "", 1)
        .replace(
            "  <cac:TaxTotal>",
            &format!(
                "  {}  <cac:TaxTotal>",
                allowance(
                    "Treuerabatt",
                    "<cac:TaxCategory><cbc:ID>S</cbc:ID><cbc:Percent>19</cbc:Percent>\
                     <cac:TaxScheme><cbc:ID>VAT</cbc:ID></cac:TaxScheme></cac:TaxCategory>",
                )
            ),
        )
        .replace("    <cac:Item>", &format!("    {}    <cac:Item>", allowance("Rabatt", "")));

    let mut inv = xml::parse(doc.as_bytes()).unwrap();
    assert_eq!(inv.lines[0].quantity_presence, Presence::Absent);
    assert_eq!(inv.allowances_charges[0].amount_presence, Presence::Absent);
    assert_eq!(inv.lines[0].allowances_charges[0].amount_presence, Presence::Absent);
    let tax = &inv.trade_taxes[0];
    assert_eq!(
        (tax.basis_presence, tax.calculated_presence, tax.rate_presence),
        (Presence::Absent, Presence::Absent, Presence::Absent)
    );

    let err = validate(&mut inv).unwrap_err();
    for code in ["BR-22", "BR-31", "BR-41", "BR-45", "BR-46", "BR-48"] {
        assert!(err.contains(code), "{code} missing from {err}");
    }
    assert!(!err.contains("BR-36"));
    assert!(!err.contains("BR-43"));
}

#[test]
fn missing_cii_amounts_are_reported_and_rate_is_optional_outside_vat() {
    let mut inv = xml::parse(
        cii(r#"<rsm:ExchangedDocumentContext>
             <ram:GuidelineSpecifiedDocumentContextParameter><ram:ID>urn:cen.eu:en16931:2017</ram:ID></ram:GuidelineSpecifiedDocumentContextParameter>
           </rsm:ExchangedDocumentContext>
           <rsm:ExchangedDocument>
             <ram:ID>CII-2</ram:ID>
             <ram:TypeCode>380</ram:TypeCode>
             <ram:IssueDateTime><udt:DateTimeString format="102">20240615</udt:DateTimeString></ram:IssueDateTime>
           </rsm:ExchangedDocument>
           <rsm:SupplyChainTradeTransaction>
             <ram:IncludedSupplyChainTradeLineItem>
               <ram:AssociatedDocumentLineDocument><ram:LineID>1</ram:LineID></ram:AssociatedDocumentLineDocument>
               <ram:SpecifiedTradeProduct><ram:Name>Beratung</ram:Name></ram:SpecifiedTradeProduct>
               <ram:SpecifiedLineTradeSettlement>
                 <ram:ApplicableTradeTax><ram:TypeCode>VAT</ram:TypeCode><ram:CategoryCode>S</ram:CategoryCode><ram:RateApplicablePercent>19</ram:RateApplicablePercent></ram:ApplicableTradeTax>
                 <ram:SpecifiedTradeAllowanceCharge>
                   <ram:ChargeIndicator><udt:Indicator>true</udt:Indicator></ram:ChargeIndicator>
                   <ram:Reason>Verpackung</ram:Reason>
                 </ram:SpecifiedTradeAllowanceCharge>
                 <ram:SpecifiedTradeSettlementLineMonetarySummation><ram:LineTotalAmount>100.00</ram:LineTotalAmount></ram:SpecifiedTradeSettlementLineMonetarySummation>
               </ram:SpecifiedLineTradeSettlement>
             </ram:IncludedSupplyChainTradeLineItem>
             <ram:ApplicableHeaderTradeSettlement>
               <ram:InvoiceCurrencyCode>EUR</ram:InvoiceCurrencyCode>
               <ram:ApplicableTradeTax><ram:TypeCode>VAT</ram:TypeCode><ram:CategoryCode>S</ram:CategoryCode></ram:ApplicableTradeTax>
               <ram:ApplicableTradeTax>
                 <ram:CalculatedAmount>0.00</ram:CalculatedAmount>
                 <ram:TypeCode>VAT</ram:TypeCode>
                 <ram:BasisAmount>0.00</ram:BasisAmount>
                 <ram:CategoryCode>O</ram:CategoryCode>
               </ram:ApplicableTradeTax>
               <ram:SpecifiedTradeAllowanceCharge>
                 <ram:ChargeIndicator><udt:Indicator>true</udt:Indicator></ram:ChargeIndicator>
                 <ram:Reason>Versand</ram:Reason>
                 <ram:CategoryTradeTax><ram:TypeCode>VAT</ram:TypeCode><ram:CategoryCode>S</ram:CategoryCode><ram:RateApplicablePercent>19</ram:RateApplicablePercent></ram:CategoryTradeTax>
               </ram:SpecifiedTradeAllowanceCharge>
             </ram:ApplicableHeaderTradeSettlement>
           </rsm:SupplyChainTradeTransaction>"#)
        .as_bytes(),
    )
    .unwrap();
    assert_eq!(inv.trade_taxes[1].calculated_presence, Presence::Present);
    assert_eq!(inv.trade_taxes[1].rate_presence, Presence::Absent);

    let err = validate(&mut inv).unwrap_err();
    for code in ["BR-22", "BR-36", "BR-43"] {
        assert!(err.contains(code), "{code} missing from {err}");
    }
    assert!(!err.contains("BR-31"));
    assert!(!err.contains("BR-41"));

    let only_first = |code: &str| {
        let hits: Vec<_> = inv.violations().into_iter().filter(|v| v.code() == code).collect();
        hits.len() == 1 && hits[0].text.contains("trade_taxes[0]")
    };
    assert!(only_first("BR-45"));
    assert!(only_first("BR-46"));
    assert!(only_first("BR-48"));
}
