//! UN/CEFACT Cross Industry Invoice (D16B) binding.

use std::io::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::xml_utils::{
    Element, XmlWriter, decode_binary, encode_binary, ns, parse_code, parse_decimal,
};
use super::{Gate, PartyGate, Role, category_from, present, unexpected_currency};
use crate::core::*;
use crate::profile::Field;

const CONTEXT: &str = "rsm:ExchangedDocumentContext";
const DOCUMENT: &str = "rsm:ExchangedDocument";
const TRANSACTION: &str = "rsm:SupplyChainTradeTransaction";

const DATE_WRAPPERS: [&str; 4] = [
    "udt:DateTimeString",
    "qdt:DateTimeString",
    "udt:DateString",
    "qdt:DateString",
];

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

pub(super) fn read(root: &Element) -> Result<Invoice, InvoiceError> {
    let mut invoice = Invoice::default();

    if let Some(context) = root.child(CONTEXT) {
        invoice.business_process =
            context.text("ram:BusinessProcessSpecifiedDocumentContextParameter/ram:ID");
        invoice.specification_id = context
            .text("ram:GuidelineSpecifiedDocumentContextParameter/ram:ID")
            .unwrap_or_default();
    }

    if let Some(doc) = root.child(DOCUMENT) {
        invoice.number = doc.text("ram:ID").unwrap_or_default();
        invoice.type_code = doc
            .text("ram:TypeCode")
            .map(|code| parse_code(&code, "BT-3 invoice type code"))
            .transpose()?
            .map(InvoiceTypeCode::from_code);
        invoice.issue_date = read_date(doc.child("ram:IssueDateTime"), "BT-2 issue date", true)?;
        for note in doc.children("ram:IncludedNote") {
            invoice.notes.push(Note {
                subject_code: note.text("ram:SubjectCode"),
                text: note.text("ram:Content").unwrap_or_default(),
            });
        }
    }

    let Some(transaction) = root.child(TRANSACTION) else {
        return Ok(invoice);
    };
    for item in transaction.children("ram:IncludedSupplyChainTradeLineItem") {
        invoice.lines.push(read_line(item)?);
    }
    if let Some(agreement) = transaction.child("ram:ApplicableHeaderTradeAgreement") {
        read_agreement(agreement, &mut invoice)?;
    }
    if let Some(delivery) = transaction.child("ram:ApplicableHeaderTradeDelivery") {
        invoice.ship_to = delivery.child("ram:ShipToTradeParty").map(read_party);
        invoice.delivery_date = read_date(
            delivery.find("ram:ActualDeliverySupplyChainEvent/ram:OccurrenceDateTime"),
            "BT-72 actual delivery date",
            false,
        )?;
    }
    if let Some(settlement) = transaction.child("ram:ApplicableHeaderTradeSettlement") {
        read_settlement(settlement, &mut invoice)?;
    }
    Ok(invoice)
}

/// Date inside a CII date wrapper. Only format 102 is understood: a
/// mandatory date in another format fails, an optional one is skipped.
fn read_date(
    wrapper: Option<&Element>,
    field: &str,
    mandatory: bool,
) -> Result<Option<NaiveDate>, InvoiceError> {
    let Some(value) = wrapper.and_then(|w| DATE_WRAPPERS.iter().find_map(|q| w.child(q))) else {
        return Ok(None);
    };
    match value.attr("format") {
        None | Some("102") => parse_date_cii(value.value(), field).map(Some),
        Some(_) if mandatory => Err(InvoiceError::InvalidDate {
            field: field.to_string(),
            value: value.value().to_string(),
            expected: "format 102 (YYYYMMDD)",
        }),
        Some(format) => {
            debug!(field, format, "skipping date in unsupported format");
            Ok(None)
        }
    }
}

fn read_period(el: &Element, field: &str) -> Result<Period, InvoiceError> {
    Ok(Period {
        start: read_date(el.child("ram:StartDateTime"), &format!("{field} start date"), false)?,
        end: read_date(el.child("ram:EndDateTime"), &format!("{field} end date"), false)?,
    })
}

fn read_party(el: &Element) -> Party {
    let mut party = Party {
        name: el.text("ram:Name").unwrap_or_default(),
        ..Default::default()
    };
    for id in el.children("ram:ID") {
        party.ids.push(Identifier {
            id: id.value().to_string(),
            scheme: id.attr("schemeID").map(str::to_string),
        });
    }
    for id in el.children("ram:GlobalID") {
        party.ids.push(Identifier {
            id: id.value().to_string(),
            scheme: id.attr("schemeID").map(str::to_string),
        });
    }
    party.legal_organization = el.child("ram:SpecifiedLegalOrganization").map(|org| {
        LegalOrganization {
            id: org.text("ram:ID"),
            scheme: org
                .child("ram:ID")
                .and_then(|id| id.attr("schemeID"))
                .map(str::to_string),
            trading_name: org.text("ram:TradingBusinessName"),
        }
    });
    party.contact = el.child("ram:DefinedTradeContact").map(|c| Contact {
        name: c.text("ram:PersonName"),
        department: c.text("ram:DepartmentName"),
        phone: c.text("ram:TelephoneUniversalCommunication/ram:CompleteNumber"),
        email: c.text("ram:EmailURIUniversalCommunication/ram:URIID"),
    });
    party.address = el.child("ram:PostalTradeAddress").map(|a| PostalAddress {
        country_code: a.text("ram:CountryID").unwrap_or_default(),
        postcode: a.text("ram:PostcodeCode"),
        line1: a.text("ram:LineOne"),
        line2: a.text("ram:LineTwo"),
        line3: a.text("ram:LineThree"),
        city: a.text("ram:CityName"),
        subdivision: a.text("ram:CountrySubDivisionName"),
    });
    party.electronic_address = el
        .find("ram:URIUniversalCommunication/ram:URIID")
        .map(|uri| ElectronicAddress {
            uri: uri.value().to_string(),
            scheme: uri.attr("schemeID").map(str::to_string),
        });
    for id in el.all("ram:SpecifiedTaxRegistration/ram:ID") {
        let value = Some(id.value().to_string()).filter(|v| !v.is_empty());
        match id.attr("schemeID") {
            Some("FC") => party.tax_registration_id = value,
            _ => party.vat_id = value,
        }
    }
    party
}

fn read_line(item: &Element) -> Result<InvoiceLine, InvoiceError> {
    let mut line = InvoiceLine {
        net_price_presence: Presence::Absent,
        quantity_presence: Presence::Absent,
        line_total_presence: Presence::Absent,
        ..Default::default()
    };

    if let Some(doc) = item.child("ram:AssociatedDocumentLineDocument") {
        line.id = doc.text("ram:LineID").unwrap_or_default();
        line.note = doc.text("ram:IncludedNote/ram:Content");
    }

    if let Some(product) = item.child("ram:SpecifiedTradeProduct") {
        line.global_id = product.child("ram:GlobalID").map(|g| Identifier {
            id: g.value().to_string(),
            scheme: g.attr("schemeID").map(str::to_string),
        });
        line.seller_item_id = product.text("ram:SellerAssignedID");
        line.buyer_item_id = product.text("ram:BuyerAssignedID");
        line.item_name = product.text("ram:Name").unwrap_or_default();
        line.description = product.text("ram:Description");
        for c in product.children("ram:ApplicableProductCharacteristic") {
            line.characteristics.push(ItemAttribute {
                name: c.text("ram:Description").unwrap_or_default(),
                value: c.text("ram:Value").unwrap_or_default(),
            });
        }
        for code in product.all("ram:DesignatedProductClassification/ram:ClassCode") {
            line.classifications.push(Classification {
                code: code.value().to_string(),
                list_id: code.attr("listID").map(str::to_string),
                list_version: code.attr("listVersionID").map(str::to_string),
            });
        }
        line.origin_country = product.text("ram:OriginTradeCountry/ram:ID");
    }

    if let Some(agreement) = item.child("ram:SpecifiedLineTradeAgreement") {
        line.order_line_reference = agreement.text("ram:BuyerOrderReferencedDocument/ram:LineID");
        if let Some(gross) = agreement.child("ram:GrossPriceProductTradePrice") {
            line.gross_price = gross.decimal("ram:ChargeAmount", "BT-148 item gross price")?;
            let mut discount = Decimal::ZERO;
            for ac in gross.children("ram:AppliedTradeAllowanceCharge") {
                let amount = ac
                    .decimal("ram:ActualAmount", "BT-147 item price discount")?
                    .unwrap_or_default();
                discount = discount
                    .checked_add(amount)
                    .ok_or_else(|| InvoiceError::Overflow("BT-147 item price discount".into()))?;
            }
            line.price_allowance = (!discount.is_zero()).then_some(discount);
        }
        if let Some(net) = agreement.child("ram:NetPriceProductTradePrice") {
            if let Some(price) = net.decimal("ram:ChargeAmount", "BT-146 item net price")? {
                line.net_price = price;
                line.net_price_presence = Presence::Present;
            }
            if let Some(base) = net.child("ram:BasisQuantity") {
                line.base_quantity =
                    Some(parse_decimal(base.value(), "BT-149 item price base quantity")?);
                line.base_quantity_unit = base.attr("unitCode").map(str::to_string);
            }
        }
    }

    if let Some(quantity) = item.find("ram:SpecifiedLineTradeDelivery/ram:BilledQuantity") {
        line.quantity = parse_decimal(quantity.value(), "BT-129 invoiced quantity")?;
        line.quantity_presence = Presence::Present;
        line.unit = quantity.attr("unitCode").unwrap_or_default().to_string();
    }

    if let Some(settlement) = item.child("ram:SpecifiedLineTradeSettlement") {
        if let Some(tax) = settlement.child("ram:ApplicableTradeTax") {
            line.tax_category = category_from(tax.text("ram:CategoryCode"));
            line.tax_rate = tax
                .decimal("ram:RateApplicablePercent", "BT-152 invoiced item VAT rate")?
                .unwrap_or_default();
        }
        if let Some(period) = settlement.child("ram:BillingSpecifiedPeriod") {
            line.billing_period = Some(read_period(period, "BG-26 invoice line period")?);
        }
        for ac in settlement.children("ram:SpecifiedTradeAllowanceCharge") {
            line.allowances_charges.push(read_allowance_charge(ac, "line")?);
        }
        if let Some(total) = settlement.decimal(
            "ram:SpecifiedTradeSettlementLineMonetarySummation/ram:LineTotalAmount",
            "BT-131 line net amount",
        )? {
            line.line_total = total;
            line.line_total_presence = Presence::Present;
        }
        line.accounting_reference =
            settlement.text("ram:ReceivableSpecifiedTradeAccountingAccount/ram:ID");
    }
    Ok(line)
}

fn read_allowance_charge(el: &Element, scope: &str) -> Result<AllowanceCharge, InvoiceError> {
    let indicator = el
        .text("ram:ChargeIndicator/udt:Indicator")
        .or_else(|| el.text("ram:ChargeIndicator"))
        .unwrap_or_default();
    let amount = el.decimal("ram:ActualAmount", &format!("{scope} allowance/charge amount"))?;
    Ok(AllowanceCharge {
        is_charge: indicator.eq_ignore_ascii_case("true") || indicator == "1",
        percent: el.decimal(
            "ram:CalculationPercent",
            &format!("{scope} allowance/charge percentage"),
        )?,
        basis_amount: el.decimal(
            "ram:BasisAmount",
            &format!("{scope} allowance/charge base amount"),
        )?,
        amount: amount.unwrap_or_default(),
        amount_presence: Presence::of(amount.is_some()),
        reason_code: el.text("ram:ReasonCode"),
        reason: el.text("ram:Reason"),
        tax_category: category_from(el.text("ram:CategoryTradeTax/ram:CategoryCode")),
        tax_rate: el
            .decimal(
                "ram:CategoryTradeTax/ram:RateApplicablePercent",
                &format!("{scope} allowance/charge VAT rate"),
            )?
            .unwrap_or_default(),
    })
}

fn read_agreement(agreement: &Element, invoice: &mut Invoice) -> Result<(), InvoiceError> {
    invoice.buyer_reference = agreement.text("ram:BuyerReference");
    if let Some(seller) = agreement.child("ram:SellerTradeParty") {
        invoice.seller = read_party(seller);
    }
    if let Some(buyer) = agreement.child("ram:BuyerTradeParty") {
        invoice.buyer = read_party(buyer);
    }
    invoice.tax_representative = agreement
        .child("ram:SellerTaxRepresentativeTradeParty")
        .map(read_party);
    invoice.order_reference = agreement.text("ram:BuyerOrderReferencedDocument/ram:IssuerAssignedID");
    invoice.contract_reference =
        agreement.text("ram:ContractReferencedDocument/ram:IssuerAssignedID");

    for doc in agreement.children("ram:AdditionalReferencedDocument") {
        let attachment = match doc.child("ram:AttachmentBinaryObject") {
            Some(binary) => Some(BinaryObject {
                content: decode_binary(binary.value(), "BT-125 attached document")?,
                mime_type: binary.attr("mimeCode").unwrap_or_default().to_string(),
                filename: binary.attr("filename").unwrap_or_default().to_string(),
            }),
            None => None,
        };
        invoice.attachments.push(ReferencedDocument {
            id: doc.text("ram:IssuerAssignedID").unwrap_or_default(),
            type_code: doc.text("ram:TypeCode"),
            description: doc.text("ram:Name"),
            uri: doc.text("ram:URIID"),
            attachment,
        });
    }
    Ok(())
}

fn read_settlement(settlement: &Element, invoice: &mut Invoice) -> Result<(), InvoiceError> {
    invoice.currency = settlement.text("ram:InvoiceCurrencyCode").unwrap_or_default();
    invoice.tax_currency = settlement.text("ram:TaxCurrencyCode");
    invoice.creditor_reference = settlement.text("ram:CreditorReferenceID");
    invoice.payment_reference = settlement.text("ram:PaymentReference");
    invoice.payee = settlement.child("ram:PayeeTradeParty").map(read_party);

    for means in settlement.children("ram:SpecifiedTradeSettlementPaymentMeans") {
        invoice.payment_means.push(read_payment_means(means)?);
    }

    for tax in settlement.children("ram:ApplicableTradeTax") {
        let rate = tax.decimal("ram:RateApplicablePercent", "BT-119 VAT category rate")?;
        let basis = tax.decimal("ram:BasisAmount", "BT-116 VAT category taxable amount")?;
        let calculated = tax.decimal("ram:CalculatedAmount", "BT-117 VAT category tax amount")?;
        invoice.trade_taxes.push(TradeTax {
            type_code: tax.text("ram:TypeCode").unwrap_or_default(),
            category: category_from(tax.text("ram:CategoryCode")),
            rate: rate.unwrap_or_default(),
            rate_presence: Presence::of(rate.is_some()),
            basis_amount: basis.unwrap_or_default(),
            basis_presence: Presence::of(basis.is_some()),
            calculated_amount: calculated.unwrap_or_default(),
            calculated_presence: Presence::of(calculated.is_some()),
            exemption_reason: tax.text("ram:ExemptionReason"),
            exemption_reason_code: tax.text("ram:ExemptionReasonCode"),
            tax_point_date: read_date(tax.child("ram:TaxPointDate"), "BT-7 VAT point date", false)?,
            due_date_type_code: tax.text("ram:DueDateTypeCode"),
        });
    }

    if let Some(period) = settlement.child("ram:BillingSpecifiedPeriod") {
        invoice.billing_period = Some(read_period(period, "BG-14 invoicing period")?);
    }

    for ac in settlement.children("ram:SpecifiedTradeAllowanceCharge") {
        invoice
            .allowances_charges
            .push(read_allowance_charge(ac, "document")?);
    }

    for terms in settlement.children("ram:SpecifiedTradePaymentTerms") {
        invoice.payment_terms.push(PaymentTerms {
            description: terms.text("ram:Description"),
            due_date: read_date(terms.child("ram:DueDateDateTime"), "BT-9 payment due date", false)?,
            direct_debit_mandate_id: terms.text("ram:DirectDebitMandateID"),
        });
    }

    if let Some(summation) = settlement.child("ram:SpecifiedTradeSettlementHeaderMonetarySummation") {
        read_totals(summation, invoice)?;
    }

    for doc in settlement.children("ram:InvoiceReferencedDocument") {
        invoice.preceding_invoices.push(PrecedingInvoice {
            id: doc.text("ram:IssuerAssignedID").unwrap_or_default(),
            issue_date: read_date(
                doc.child("ram:FormattedIssueDateTime"),
                "BT-26 preceding invoice issue date",
                false,
            )?,
        });
    }
    Ok(())
}

fn read_payment_means(means: &Element) -> Result<PaymentMeans, InvoiceError> {
    let creditor = means.child("ram:PayeePartyCreditorFinancialAccount");
    let bic = means.text("ram:PayeeSpecifiedCreditorFinancialInstitution/ram:BICID");
    let payee_account = (creditor.is_some() || bic.is_some()).then(|| FinancialAccount {
        iban: creditor.and_then(|c| c.text("ram:IBANID")),
        proprietary_id: creditor.and_then(|c| c.text("ram:ProprietaryID")),
        name: creditor.and_then(|c| c.text("ram:AccountName")),
        bic,
    });
    Ok(PaymentMeans {
        type_code: means
            .text("ram:TypeCode")
            .map(|code| parse_code(&code, "BT-81 payment means type code"))
            .transpose()?
            .map(PaymentMeansCode::from_code),
        information: means.text("ram:Information"),
        payee_account,
        card: means
            .child("ram:ApplicableTradeSettlementFinancialCard")
            .map(|card| PaymentCard {
                account_number: card.text("ram:ID").unwrap_or_default(),
                network_id: None,
                holder: card.text("ram:CardholderName"),
            }),
        payer_account: means.text("ram:PayerPartyDebtorFinancialAccount/ram:IBANID"),
    })
}

fn read_totals(summation: &Element, invoice: &mut Invoice) -> Result<(), InvoiceError> {
    fn amount(
        el: &Element,
        path: &str,
        field: &str,
        presence: &mut Presence,
    ) -> Result<Decimal, InvoiceError> {
        let value = el.decimal(path, field)?;
        *presence = Presence::of(value.is_some());
        Ok(value.unwrap_or_default())
    }

    let mut presence = SummationPresence::default();
    let totals = &mut invoice.totals;
    totals.line_total = amount(
        summation,
        "ram:LineTotalAmount",
        "BT-106 sum of invoice line net amount",
        &mut presence.line_total,
    )?;
    totals.charge_total = amount(
        summation,
        "ram:ChargeTotalAmount",
        "BT-108 sum of charges on document level",
        &mut presence.charge_total,
    )?;
    totals.allowance_total = amount(
        summation,
        "ram:AllowanceTotalAmount",
        "BT-107 sum of allowances on document level",
        &mut presence.allowance_total,
    )?;
    totals.tax_basis_total = amount(
        summation,
        "ram:TaxBasisTotalAmount",
        "BT-109 invoice total amount without VAT",
        &mut presence.tax_basis_total,
    )?;
    totals.rounding = amount(
        summation,
        "ram:RoundingAmount",
        "BT-114 rounding amount",
        &mut presence.rounding,
    )?;
    totals.grand_total = amount(
        summation,
        "ram:GrandTotalAmount",
        "BT-112 invoice total amount with VAT",
        &mut presence.grand_total,
    )?;
    totals.prepaid = amount(
        summation,
        "ram:TotalPrepaidAmount",
        "BT-113 paid amount",
        &mut presence.prepaid,
    )?;
    totals.due_payable = amount(
        summation,
        "ram:DuePayableAmount",
        "BT-115 amount due for payment",
        &mut presence.due_payable,
    )?;

    presence.tax_total = Presence::Absent;
    for tax in summation.children("ram:TaxTotalAmount") {
        let value = parse_decimal(tax.value(), "BT-110 invoice total VAT amount")?;
        let currency = tax.attr("currencyID");
        let own = currency.is_none_or(|c| c == invoice.currency);
        let accounting = currency.is_some() && currency == invoice.tax_currency.as_deref();
        if own && presence.tax_total == Presence::Absent {
            invoice.totals.tax_total = value;
            presence.tax_total = Presence::Present;
        } else if accounting && invoice.totals.tax_total_accounting.is_none() {
            invoice.totals.tax_total_accounting = Some(value);
        } else {
            let currency = currency.unwrap_or_default().to_string();
            unexpected_currency(invoice, "TaxTotalAmount", value, &currency);
        }
    }
    invoice.totals.presence = presence;
    Ok(())
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

pub(super) fn write<W: Write>(
    invoice: &Invoice,
    sink: W,
    gate: Gate,
    indent: usize,
) -> Result<(), InvoiceError> {
    let mut w = XmlWriter::new(sink, indent)?;

    w.start_element_with_attrs(
        "rsm:CrossIndustryInvoice",
        &[
            ("xmlns:rsm", ns::RSM),
            ("xmlns:ram", ns::RAM),
            ("xmlns:qdt", ns::QDT),
            ("xmlns:udt", ns::UDT),
        ],
    )?;

    // --- ExchangedDocumentContext ---
    w.start_element(CONTEXT)?;
    if gate.emits(Field::BusinessProcess) {
        if let Some(process) = present(&invoice.business_process) {
            w.start_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
            w.text_element("ram:ID", process)?;
            w.end_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
        }
    }
    w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.text_element("ram:ID", &invoice.specification_id)?;
    w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.end_element(CONTEXT)?;

    // --- ExchangedDocument ---
    w.start_element(DOCUMENT)?;
    w.text_element("ram:ID", &invoice.number)?;
    if let Some(code) = invoice.type_code {
        w.text_element("ram:TypeCode", &code.code().to_string())?;
    }
    if let Some(date) = invoice.issue_date {
        write_date(&mut w, "ram:IssueDateTime", "udt:DateTimeString", date)?;
    }
    if gate.emits(Field::Notes) {
        for note in &invoice.notes {
            w.start_element("ram:IncludedNote")?;
            w.text_element("ram:Content", &note.text)?;
            w.optional_element("ram:SubjectCode", note.subject_code.as_deref())?;
            w.end_element("ram:IncludedNote")?;
        }
    }
    w.end_element(DOCUMENT)?;

    // --- SupplyChainTradeTransaction ---
    w.start_element(TRANSACTION)?;
    if gate.emits(Field::Lines) {
        for line in &invoice.lines {
            write_line(&mut w, line, gate)?;
        }
    }
    write_agreement(&mut w, invoice, gate)?;
    write_delivery(&mut w, invoice, gate)?;
    write_settlement(&mut w, invoice, gate)?;
    w.end_element(TRANSACTION)?;

    w.end_element("rsm:CrossIndustryInvoice")?;
    w.into_inner().flush()?;
    Ok(())
}

fn write_date<W: Write>(
    w: &mut XmlWriter<W>,
    element: &str,
    inner: &str,
    date: NaiveDate,
) -> Result<(), InvoiceError> {
    w.start_element(element)?;
    w.text_element_with_attrs(inner, &format_date_cii(date), &[("format", "102")])?;
    w.end_element(element)?;
    Ok(())
}

fn write_period<W: Write>(w: &mut XmlWriter<W>, period: &Period) -> Result<(), InvoiceError> {
    w.start_element("ram:BillingSpecifiedPeriod")?;
    if let Some(start) = period.start {
        write_date(w, "ram:StartDateTime", "udt:DateTimeString", start)?;
    }
    if let Some(end) = period.end {
        write_date(w, "ram:EndDateTime", "udt:DateTimeString", end)?;
    }
    w.end_element("ram:BillingSpecifiedPeriod")?;
    Ok(())
}

fn write_party<W: Write>(
    w: &mut XmlWriter<W>,
    party: &Party,
    element: &str,
    show: PartyGate,
) -> Result<(), InvoiceError> {
    w.start_element(element)?;
    for id in party.ids.iter().filter(|id| id.scheme.is_none()) {
        w.text_element("ram:ID", &id.id)?;
    }
    for id in party.ids.iter().filter(|id| id.scheme.is_some()) {
        w.id_element("ram:GlobalID", &id.id, id.scheme.as_deref())?;
    }
    if !party.name.is_empty() {
        w.text_element("ram:Name", &party.name)?;
    }

    if let Some(org) = &party.legal_organization {
        let trading_name = present(&org.trading_name).filter(|_| show.trading_name);
        if present(&org.id).is_some() || trading_name.is_some() {
            w.start_element("ram:SpecifiedLegalOrganization")?;
            if let Some(id) = present(&org.id) {
                w.id_element("ram:ID", id, org.scheme.as_deref())?;
            }
            w.optional_element("ram:TradingBusinessName", trading_name)?;
            w.end_element("ram:SpecifiedLegalOrganization")?;
        }
    }

    if let Some(contact) = party.contact.as_ref().filter(|_| show.contact) {
        w.start_element("ram:DefinedTradeContact")?;
        w.optional_element("ram:PersonName", contact.name.as_deref())?;
        w.optional_element("ram:DepartmentName", contact.department.as_deref())?;
        if let Some(phone) = present(&contact.phone) {
            w.start_element("ram:TelephoneUniversalCommunication")?;
            w.text_element("ram:CompleteNumber", phone)?;
            w.end_element("ram:TelephoneUniversalCommunication")?;
        }
        if let Some(email) = present(&contact.email) {
            w.start_element("ram:EmailURIUniversalCommunication")?;
            w.text_element("ram:URIID", email)?;
            w.end_element("ram:EmailURIUniversalCommunication")?;
        }
        w.end_element("ram:DefinedTradeContact")?;
    }

    if let Some(address) = party.address.as_ref().filter(|_| show.address) {
        w.start_element("ram:PostalTradeAddress")?;
        w.optional_element("ram:PostcodeCode", address.postcode.as_deref())?;
        w.optional_element("ram:LineOne", address.line1.as_deref())?;
        w.optional_element("ram:LineTwo", address.line2.as_deref())?;
        w.optional_element("ram:LineThree", address.line3.as_deref())?;
        w.optional_element("ram:CityName", address.city.as_deref())?;
        w.text_element("ram:CountryID", &address.country_code)?;
        w.optional_element("ram:CountrySubDivisionName", address.subdivision.as_deref())?;
        w.end_element("ram:PostalTradeAddress")?;
    }

    if let Some(address) = party
        .electronic_address
        .as_ref()
        .filter(|_| show.electronic_address)
    {
        w.start_element("ram:URIUniversalCommunication")?;
        w.id_element("ram:URIID", &address.uri, address.scheme.as_deref())?;
        w.end_element("ram:URIUniversalCommunication")?;
    }

    for (id, scheme) in [(&party.vat_id, "VA"), (&party.tax_registration_id, "FC")] {
        if let Some(id) = present(id) {
            w.start_element("ram:SpecifiedTaxRegistration")?;
            w.id_element("ram:ID", id, Some(scheme))?;
            w.end_element("ram:SpecifiedTaxRegistration")?;
        }
    }

    w.end_element(element)?;
    Ok(())
}

fn write_category<W: Write>(
    w: &mut XmlWriter<W>,
    category: Option<TaxCategory>,
    rate: Decimal,
) -> Result<(), InvoiceError> {
    w.text_element("ram:TypeCode", "VAT")?;
    if let Some(category) = category {
        w.text_element("ram:CategoryCode", category.code())?;
    }
    if category != Some(TaxCategory::NotSubjectToVat) {
        w.decimal_element("ram:RateApplicablePercent", rate)?;
    }
    Ok(())
}

fn write_allowance_charge<W: Write>(
    w: &mut XmlWriter<W>,
    ac: &AllowanceCharge,
    document_level: bool,
) -> Result<(), InvoiceError> {
    w.start_element("ram:SpecifiedTradeAllowanceCharge")?;
    w.start_element("ram:ChargeIndicator")?;
    w.text_element("udt:Indicator", if ac.is_charge { "true" } else { "false" })?;
    w.end_element("ram:ChargeIndicator")?;
    if let Some(percent) = ac.percent {
        w.decimal_element("ram:CalculationPercent", percent)?;
    }
    if let Some(basis) = ac.basis_amount {
        w.plain_amount_element("ram:BasisAmount", basis)?;
    }
    w.plain_amount_element("ram:ActualAmount", ac.amount)?;
    w.optional_element("ram:ReasonCode", ac.reason_code.as_deref())?;
    w.optional_element("ram:Reason", ac.reason.as_deref())?;
    if document_level {
        w.start_element("ram:CategoryTradeTax")?;
        write_category(w, ac.tax_category, ac.tax_rate)?;
        w.end_element("ram:CategoryTradeTax")?;
    }
    w.end_element("ram:SpecifiedTradeAllowanceCharge")?;
    Ok(())
}

fn write_line<W: Write>(
    w: &mut XmlWriter<W>,
    line: &InvoiceLine,
    gate: Gate,
) -> Result<(), InvoiceError> {
    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;

    w.start_element("ram:AssociatedDocumentLineDocument")?;
    w.text_element("ram:LineID", &line.id)?;
    if gate.emits(Field::LineNote) {
        if let Some(note) = present(&line.note) {
            w.start_element("ram:IncludedNote")?;
            w.text_element("ram:Content", note)?;
            w.end_element("ram:IncludedNote")?;
        }
    }
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    // Product
    let details = gate.emits(Field::LineItemDetails);
    w.start_element("ram:SpecifiedTradeProduct")?;
    if let Some(id) = line.global_id.as_ref().filter(|_| gate.emits(Field::LineGlobalId)) {
        w.id_element("ram:GlobalID", &id.id, id.scheme.as_deref())?;
    }
    if details {
        w.optional_element("ram:SellerAssignedID", line.seller_item_id.as_deref())?;
        w.optional_element("ram:BuyerAssignedID", line.buyer_item_id.as_deref())?;
    }
    w.text_element("ram:Name", &line.item_name)?;
    if details {
        w.optional_element("ram:Description", line.description.as_deref())?;
    }
    if gate.emits(Field::LineCharacteristics) {
        for attribute in &line.characteristics {
            w.start_element("ram:ApplicableProductCharacteristic")?;
            w.text_element("ram:Description", &attribute.name)?;
            w.text_element("ram:Value", &attribute.value)?;
            w.end_element("ram:ApplicableProductCharacteristic")?;
        }
    }
    if gate.emits(Field::LineClassifications) {
        for class in &line.classifications {
            let mut attrs = Vec::new();
            if let Some(list) = &class.list_id {
                attrs.push(("listID", list.as_str()));
            }
            if let Some(version) = &class.list_version {
                attrs.push(("listVersionID", version.as_str()));
            }
            w.start_element("ram:DesignatedProductClassification")?;
            w.text_element_with_attrs("ram:ClassCode", &class.code, &attrs)?;
            w.end_element("ram:DesignatedProductClassification")?;
        }
    }
    if gate.emits(Field::LineOrigin) {
        if let Some(country) = present(&line.origin_country) {
            w.start_element("ram:OriginTradeCountry")?;
            w.text_element("ram:ID", country)?;
            w.end_element("ram:OriginTradeCountry")?;
        }
    }
    w.end_element("ram:SpecifiedTradeProduct")?;

    // Prices
    w.start_element("ram:SpecifiedLineTradeAgreement")?;
    if gate.emits(Field::LineOrderReference) {
        if let Some(reference) = present(&line.order_line_reference) {
            w.start_element("ram:BuyerOrderReferencedDocument")?;
            w.text_element("ram:LineID", reference)?;
            w.end_element("ram:BuyerOrderReferencedDocument")?;
        }
    }
    if let Some(gross) = line.gross_price.filter(|_| gate.emits(Field::GrossPrice)) {
        w.start_element("ram:GrossPriceProductTradePrice")?;
        w.decimal_element("ram:ChargeAmount", gross)?;
        if let Some(discount) = line.price_allowance {
            w.start_element("ram:AppliedTradeAllowanceCharge")?;
            w.start_element("ram:ChargeIndicator")?;
            w.text_element("udt:Indicator", "false")?;
            w.end_element("ram:ChargeIndicator")?;
            w.decimal_element("ram:ActualAmount", discount)?;
            w.end_element("ram:AppliedTradeAllowanceCharge")?;
        }
        w.end_element("ram:GrossPriceProductTradePrice")?;
    }
    if line.net_price_presence.resolve(line.net_price) {
        w.start_element("ram:NetPriceProductTradePrice")?;
        w.decimal_element("ram:ChargeAmount", line.net_price)?;
        if let Some(base) = line.base_quantity.filter(|_| gate.emits(Field::BaseQuantity)) {
            w.quantity_element(
                "ram:BasisQuantity",
                base,
                line.base_quantity_unit.as_deref().unwrap_or_default(),
            )?;
        }
        w.end_element("ram:NetPriceProductTradePrice")?;
    }
    w.end_element("ram:SpecifiedLineTradeAgreement")?;

    w.start_element("ram:SpecifiedLineTradeDelivery")?;
    w.quantity_element("ram:BilledQuantity", line.quantity, &line.unit)?;
    w.end_element("ram:SpecifiedLineTradeDelivery")?;

    // Settlement
    w.start_element("ram:SpecifiedLineTradeSettlement")?;
    w.start_element("ram:ApplicableTradeTax")?;
    write_category(w, line.tax_category, line.tax_rate)?;
    w.end_element("ram:ApplicableTradeTax")?;
    if let Some(period) = line.billing_period.filter(|_| gate.emits(Field::LineBillingPeriod)) {
        write_period(w, &period)?;
    }
    if gate.emits(Field::LineAllowancesCharges) {
        for ac in &line.allowances_charges {
            write_allowance_charge(w, ac, false)?;
        }
    }
    if line.line_total_presence.resolve(line.line_total) {
        w.start_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
        w.plain_amount_element("ram:LineTotalAmount", line.line_total)?;
        w.end_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    }
    if gate.emits(Field::LineAccountingReference) {
        if let Some(reference) = present(&line.accounting_reference) {
            w.start_element("ram:ReceivableSpecifiedTradeAccountingAccount")?;
            w.text_element("ram:ID", reference)?;
            w.end_element("ram:ReceivableSpecifiedTradeAccountingAccount")?;
        }
    }
    w.end_element("ram:SpecifiedLineTradeSettlement")?;

    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}

fn write_agreement<W: Write>(
    w: &mut XmlWriter<W>,
    invoice: &Invoice,
    gate: Gate,
) -> Result<(), InvoiceError> {
    w.start_element("ram:ApplicableHeaderTradeAgreement")?;
    w.optional_element("ram:BuyerReference", invoice.buyer_reference.as_deref())?;
    write_party(w, &invoice.seller, "ram:SellerTradeParty", gate.party(Role::Seller))?;
    write_party(w, &invoice.buyer, "ram:BuyerTradeParty", gate.party(Role::Buyer))?;
    if let Some(representative) = invoice
        .tax_representative
        .as_ref()
        .filter(|_| gate.emits(Field::TaxRepresentative))
    {
        write_party(
            w,
            representative,
            "ram:SellerTaxRepresentativeTradeParty",
            gate.party(Role::Other),
        )?;
    }
    if let Some(order) = present(&invoice.order_reference) {
        w.start_element("ram:BuyerOrderReferencedDocument")?;
        w.text_element("ram:IssuerAssignedID", order)?;
        w.end_element("ram:BuyerOrderReferencedDocument")?;
    }
    if gate.emits(Field::ContractReference) {
        if let Some(contract) = present(&invoice.contract_reference) {
            w.start_element("ram:ContractReferencedDocument")?;
            w.text_element("ram:IssuerAssignedID", contract)?;
            w.end_element("ram:ContractReferencedDocument")?;
        }
    }
    if gate.emits(Field::Attachments) {
        for doc in &invoice.attachments {
            w.start_element("ram:AdditionalReferencedDocument")?;
            w.text_element("ram:IssuerAssignedID", &doc.id)?;
            w.optional_element("ram:URIID", doc.uri.as_deref())?;
            w.text_element("ram:TypeCode", doc.type_code.as_deref().unwrap_or("916"))?;
            w.optional_element("ram:Name", doc.description.as_deref())?;
            if let Some(binary) = &doc.attachment {
                w.text_element_with_attrs(
                    "ram:AttachmentBinaryObject",
                    &encode_binary(&binary.content),
                    &[
                        ("mimeCode", binary.mime_type.as_str()),
                        ("filename", binary.filename.as_str()),
                    ],
                )?;
            }
            w.end_element("ram:AdditionalReferencedDocument")?;
        }
    }
    w.end_element("ram:ApplicableHeaderTradeAgreement")?;
    Ok(())
}

fn write_delivery<W: Write>(
    w: &mut XmlWriter<W>,
    invoice: &Invoice,
    gate: Gate,
) -> Result<(), InvoiceError> {
    w.start_element("ram:ApplicableHeaderTradeDelivery")?;
    if let Some(ship_to) = invoice.ship_to.as_ref().filter(|_| gate.emits(Field::ShipTo)) {
        write_party(w, ship_to, "ram:ShipToTradeParty", gate.party(Role::Other))?;
    }
    if let Some(date) = invoice.delivery_date.filter(|_| gate.emits(Field::ActualDeliveryDate)) {
        w.start_element("ram:ActualDeliverySupplyChainEvent")?;
        write_date(w, "ram:OccurrenceDateTime", "udt:DateTimeString", date)?;
        w.end_element("ram:ActualDeliverySupplyChainEvent")?;
    }
    w.end_element("ram:ApplicableHeaderTradeDelivery")?;
    Ok(())
}

fn write_settlement<W: Write>(
    w: &mut XmlWriter<W>,
    invoice: &Invoice,
    gate: Gate,
) -> Result<(), InvoiceError> {
    w.start_element("ram:ApplicableHeaderTradeSettlement")?;
    if gate.emits(Field::CreditorReference) {
        w.optional_element("ram:CreditorReferenceID", invoice.creditor_reference.as_deref())?;
    }
    if gate.emits(Field::PaymentReference) {
        w.optional_element("ram:PaymentReference", invoice.payment_reference.as_deref())?;
    }
    if gate.emits(Field::TaxCurrency) {
        w.optional_element("ram:TaxCurrencyCode", invoice.tax_currency.as_deref())?;
    }
    w.text_element("ram:InvoiceCurrencyCode", &invoice.currency)?;
    if let Some(payee) = invoice.payee.as_ref().filter(|_| gate.emits(Field::Payee)) {
        write_party(w, payee, "ram:PayeeTradeParty", gate.party(Role::Other))?;
    }

    if gate.emits(Field::PaymentMeans) {
        for means in &invoice.payment_means {
            write_payment_means(w, means, gate)?;
        }
    }

    if gate.emits(Field::TaxBreakdown) {
        for tax in &invoice.trade_taxes {
            w.start_element("ram:ApplicableTradeTax")?;
            w.plain_amount_element("ram:CalculatedAmount", tax.calculated_amount)?;
            w.text_element(
                "ram:TypeCode",
                if tax.type_code.is_empty() { "VAT" } else { tax.type_code.as_str() },
            )?;
            w.optional_element("ram:ExemptionReason", tax.exemption_reason.as_deref())?;
            w.plain_amount_element("ram:BasisAmount", tax.basis_amount)?;
            if let Some(category) = tax.category {
                w.text_element("ram:CategoryCode", category.code())?;
            }
            w.optional_element("ram:ExemptionReasonCode", tax.exemption_reason_code.as_deref())?;
            if let Some(date) = tax.tax_point_date.filter(|_| gate.emits(Field::TaxPointDate)) {
                write_date(w, "ram:TaxPointDate", "udt:DateString", date)?;
            }
            w.optional_element("ram:DueDateTypeCode", tax.due_date_type_code.as_deref())?;
            if tax.category != Some(TaxCategory::NotSubjectToVat) {
                w.decimal_element("ram:RateApplicablePercent", tax.rate)?;
            }
            w.end_element("ram:ApplicableTradeTax")?;
        }
    }

    if let Some(period) = invoice.billing_period.filter(|_| gate.emits(Field::BillingPeriod)) {
        write_period(w, &period)?;
    }

    if gate.emits(Field::DocumentAllowancesCharges) {
        for ac in &invoice.allowances_charges {
            write_allowance_charge(w, ac, true)?;
        }
    }

    if gate.emits(Field::PaymentTerms) {
        for terms in &invoice.payment_terms {
            w.start_element("ram:SpecifiedTradePaymentTerms")?;
            w.optional_element("ram:Description", terms.description.as_deref())?;
            if let Some(due) = terms.due_date {
                write_date(w, "ram:DueDateDateTime", "udt:DateTimeString", due)?;
            }
            w.optional_element(
                "ram:DirectDebitMandateID",
                terms.direct_debit_mandate_id.as_deref(),
            )?;
            w.end_element("ram:SpecifiedTradePaymentTerms")?;
        }
    }

    write_totals(w, invoice, gate)?;

    if gate.emits(Field::PrecedingInvoices) {
        for preceding in &invoice.preceding_invoices {
            w.start_element("ram:InvoiceReferencedDocument")?;
            w.text_element("ram:IssuerAssignedID", &preceding.id)?;
            if let Some(date) = preceding.issue_date {
                write_date(w, "ram:FormattedIssueDateTime", "qdt:DateTimeString", date)?;
            }
            w.end_element("ram:InvoiceReferencedDocument")?;
        }
    }

    w.end_element("ram:ApplicableHeaderTradeSettlement")?;
    Ok(())
}

fn write_payment_means<W: Write>(
    w: &mut XmlWriter<W>,
    means: &PaymentMeans,
    gate: Gate,
) -> Result<(), InvoiceError> {
    w.start_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    if let Some(code) = means.type_code {
        w.text_element("ram:TypeCode", &code.code().to_string())?;
    }
    w.optional_element("ram:Information", means.information.as_deref())?;
    if let Some(card) = means.card.as_ref().filter(|_| gate.emits(Field::PaymentCard)) {
        w.start_element("ram:ApplicableTradeSettlementFinancialCard")?;
        w.text_element("ram:ID", &card.account_number)?;
        w.optional_element("ram:CardholderName", card.holder.as_deref())?;
        w.end_element("ram:ApplicableTradeSettlementFinancialCard")?;
    }
    if let Some(payer) = present(&means.payer_account) {
        w.start_element("ram:PayerPartyDebtorFinancialAccount")?;
        w.text_element("ram:IBANID", payer)?;
        w.end_element("ram:PayerPartyDebtorFinancialAccount")?;
    }
    if let Some(account) = &means.payee_account {
        let has_account = [&account.iban, &account.name, &account.proprietary_id]
            .into_iter()
            .any(|v| present(v).is_some());
        if has_account {
            w.start_element("ram:PayeePartyCreditorFinancialAccount")?;
            w.optional_element("ram:IBANID", account.iban.as_deref())?;
            w.optional_element("ram:AccountName", account.name.as_deref())?;
            w.optional_element("ram:ProprietaryID", account.proprietary_id.as_deref())?;
            w.end_element("ram:PayeePartyCreditorFinancialAccount")?;
        }
        if let Some(bic) = present(&account.bic) {
            w.start_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
            w.text_element("ram:BICID", bic)?;
            w.end_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
        }
    }
    w.end_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    Ok(())
}

fn write_totals<W: Write>(
    w: &mut XmlWriter<W>,
    invoice: &Invoice,
    gate: Gate,
) -> Result<(), InvoiceError> {
    let totals = &invoice.totals;
    let presence = totals.presence;
    let adjustments = gate.emits(Field::AllowanceChargeTotals);
    let prepaid_and_rounding = gate.emits(Field::PrepaidAndRounding);

    w.start_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    if gate.emits(Field::LineTotalAmount) && presence.line_total.resolve(totals.line_total) {
        w.plain_amount_element("ram:LineTotalAmount", totals.line_total)?;
    }
    if adjustments && presence.charge_total.resolve(totals.charge_total) {
        w.plain_amount_element("ram:ChargeTotalAmount", totals.charge_total)?;
    }
    if adjustments && presence.allowance_total.resolve(totals.allowance_total) {
        w.plain_amount_element("ram:AllowanceTotalAmount", totals.allowance_total)?;
    }
    if presence.tax_basis_total.resolve(totals.tax_basis_total) {
        w.plain_amount_element("ram:TaxBasisTotalAmount", totals.tax_basis_total)?;
    }
    if presence.tax_total.resolve(totals.tax_total) {
        w.amount_element("ram:TaxTotalAmount", totals.tax_total, &invoice.currency)?;
    }
    if gate.emits(Field::TaxTotalAccounting) {
        if let (Some(amount), Some(currency)) =
            (totals.tax_total_accounting, present(&invoice.tax_currency))
        {
            w.amount_element("ram:TaxTotalAmount", amount, currency)?;
        }
    }
    if prepaid_and_rounding && presence.rounding.resolve(totals.rounding) {
        w.plain_amount_element("ram:RoundingAmount", totals.rounding)?;
    }
    if presence.grand_total.resolve(totals.grand_total) {
        w.plain_amount_element("ram:GrandTotalAmount", totals.grand_total)?;
    }
    if prepaid_and_rounding && presence.prepaid.resolve(totals.prepaid) {
        w.plain_amount_element("ram:TotalPrepaidAmount", totals.prepaid)?;
    }
    if presence.due_payable.resolve(totals.due_payable) {
        w.plain_amount_element("ram:DuePayableAmount", totals.due_payable)?;
    }
    w.end_element("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    Ok(())
}
