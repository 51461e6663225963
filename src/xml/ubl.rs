//! OASIS UBL 2.1 `Invoice` and `CreditNote` binding.

use std::io::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::xml_utils::{
    Element, XmlWriter, decode_binary, encode_binary, format_decimal, ns, parse_code,
    parse_decimal,
};
use super::{Gate, PartyGate, Role, category_from, present, unexpected_currency};
use crate::core::*;
use crate::profile::Field;

/// Element names that differ between the two document types.
struct Vocabulary {
    root: &'static str,
    namespace: &'static str,
    type_code: &'static str,
    line: &'static str,
    quantity: &'static str,
}

const INVOICE: Vocabulary = Vocabulary {
    root: "Invoice",
    namespace: ns::UBL_INVOICE,
    type_code: "cbc:InvoiceTypeCode",
    line: "cac:InvoiceLine",
    quantity: "cbc:InvoicedQuantity",
};

const CREDIT_NOTE: Vocabulary = Vocabulary {
    root: "CreditNote",
    namespace: ns::UBL_CREDIT_NOTE,
    type_code: "cbc:CreditNoteTypeCode",
    line: "cac:CreditNoteLine",
    quantity: "cbc:CreditedQuantity",
};

/// Scheme of the party identifier that carries the SEPA creditor reference.
const SEPA: &str = "SEPA";

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

pub(super) fn read(root: &Element) -> Result<Invoice, InvoiceError> {
    let voc = if root.name == CREDIT_NOTE.root { &CREDIT_NOTE } else { &INVOICE };
    let mut invoice = Invoice {
        specification_id: root.text("cbc:CustomizationID").unwrap_or_default(),
        business_process: root.text("cbc:ProfileID"),
        number: root.text("cbc:ID").unwrap_or_default(),
        issue_date: read_date(root, "cbc:IssueDate", "BT-2 issue date")?,
        type_code: root
            .text(voc.type_code)
            .map(|code| parse_code(&code, "BT-3 invoice type code"))
            .transpose()?
            .map(InvoiceTypeCode::from_code),
        currency: root.text("cbc:DocumentCurrencyCode").unwrap_or_default(),
        tax_currency: root.text("cbc:TaxCurrencyCode"),
        buyer_reference: root.text("cbc:BuyerReference"),
        order_reference: root.text("cac:OrderReference/cbc:ID"),
        contract_reference: root.text("cac:ContractDocumentReference/cbc:ID"),
        ..Default::default()
    };

    for note in root.children("cbc:Note") {
        invoice.notes.push(split_note(note.value()));
    }

    let tax_point_date = read_date(root, "cbc:TaxPointDate", "BT-7 VAT point date")?;
    let mut due_date_type_code = None;
    if let Some(period) = root.child("cac:InvoicePeriod") {
        let period_value = read_period(period, "BG-14 invoicing period")?;
        if period_value.start.is_some() || period_value.end.is_some() {
            invoice.billing_period = Some(period_value);
        }
        due_date_type_code = period.text("cbc:DescriptionCode");
    }

    for reference in root.all("cac:BillingReference/cac:InvoiceDocumentReference") {
        invoice.preceding_invoices.push(PrecedingInvoice {
            id: reference.text("cbc:ID").unwrap_or_default(),
            issue_date: read_date(reference, "cbc:IssueDate", "BT-26 preceding invoice issue date")?,
        });
    }

    for doc in root.children("cac:AdditionalDocumentReference") {
        invoice.attachments.push(read_document_reference(doc)?);
    }

    if let Some(seller) = root.find("cac:AccountingSupplierParty/cac:Party") {
        invoice.seller = read_party(seller);
        invoice.creditor_reference = sepa_reference(seller);
    }
    if let Some(buyer) = root.find("cac:AccountingCustomerParty/cac:Party") {
        invoice.buyer = read_party(buyer);
    }
    if let Some(payee) = root.child("cac:PayeeParty") {
        invoice.creditor_reference = sepa_reference(payee).or(invoice.creditor_reference.take());
        invoice.payee = Some(read_party(payee));
    }
    invoice.tax_representative = root.child("cac:TaxRepresentativeParty").map(read_party);

    if let Some(delivery) = root.child("cac:Delivery") {
        invoice.delivery_date =
            read_date(delivery, "cbc:ActualDeliveryDate", "BT-72 actual delivery date")?;
        invoice.ship_to = read_ship_to(delivery);
    }

    let mut mandate = None;
    let mut due_date = read_date(root, "cbc:DueDate", "BT-9 payment due date")?;
    for means in root.children("cac:PaymentMeans") {
        if due_date.is_none() {
            due_date = read_date(means, "cbc:PaymentDueDate", "BT-9 payment due date")?;
        }
        if invoice.payment_reference.is_none() {
            invoice.payment_reference = means.text("cbc:PaymentID");
        }
        if mandate.is_none() {
            mandate = means.text("cac:PaymentMandate/cbc:ID");
        }
        invoice.payment_means.push(read_payment_means(means)?);
    }

    for terms in root.children("cac:PaymentTerms") {
        invoice.payment_terms.push(PaymentTerms {
            description: terms.text("cbc:Note"),
            ..Default::default()
        });
    }
    if due_date.is_some() || mandate.is_some() {
        if invoice.payment_terms.is_empty() {
            invoice.payment_terms.push(PaymentTerms::default());
        }
        let first = &mut invoice.payment_terms[0];
        first.due_date = due_date;
        first.direct_debit_mandate_id = mandate;
    }

    for ac in root.children("cac:AllowanceCharge") {
        invoice
            .allowances_charges
            .push(read_allowance_charge(ac, "document")?);
    }

    read_tax_totals(root, &mut invoice)?;
    for tax in &mut invoice.trade_taxes {
        tax.tax_point_date = tax_point_date;
        tax.due_date_type_code = due_date_type_code.clone();
    }

    if let Some(totals) = root.child("cac:LegalMonetaryTotal") {
        read_totals(totals, &mut invoice)?;
    } else {
        invoice.totals.presence = SummationPresence {
            tax_total: invoice.totals.presence.tax_total,
            ..absent_totals()
        };
    }

    for line in root.children(voc.line) {
        invoice.lines.push(read_line(line, voc)?);
    }
    Ok(invoice)
}

fn absent_totals() -> SummationPresence {
    SummationPresence {
        line_total: Presence::Absent,
        allowance_total: Presence::Absent,
        charge_total: Presence::Absent,
        tax_basis_total: Presence::Absent,
        tax_total: Presence::Absent,
        grand_total: Presence::Absent,
        prepaid: Presence::Absent,
        rounding: Presence::Absent,
        due_payable: Presence::Absent,
    }
}

fn read_date(el: &Element, path: &str, field: &str) -> Result<Option<NaiveDate>, InvoiceError> {
    el.text(path)
        .map(|value| parse_date_ubl(&value, field))
        .transpose()
}

fn read_period(el: &Element, field: &str) -> Result<Period, InvoiceError> {
    Ok(Period {
        start: read_date(el, "cbc:StartDate", &format!("{field} start date"))?,
        end: read_date(el, "cbc:EndDate", &format!("{field} end date"))?,
    })
}

/// UBL notes carry the subject code inline as `#CODE#text`.
fn split_note(raw: &str) -> Note {
    if let Some(rest) = raw.strip_prefix('#') {
        if let Some((code, text)) = rest.split_once('#') {
            if !code.is_empty() && !code.contains(char::is_whitespace) {
                return Note {
                    subject_code: Some(code.to_string()),
                    text: text.to_string(),
                };
            }
        }
    }
    Note {
        subject_code: None,
        text: raw.to_string(),
    }
}

fn identifier(el: &Element) -> Identifier {
    Identifier {
        id: el.value().to_string(),
        scheme: el.attr("schemeID").map(str::to_string),
    }
}

fn sepa_reference(party: &Element) -> Option<String> {
    party
        .all("cac:PartyIdentification/cbc:ID")
        .into_iter()
        .find(|id| id.attr("schemeID") == Some(SEPA))
        .map(|id| id.value().to_string())
}

fn read_address(el: &Element) -> PostalAddress {
    PostalAddress {
        country_code: el.text("cac:Country/cbc:IdentificationCode").unwrap_or_default(),
        postcode: el.text("cbc:PostalZone"),
        line1: el.text("cbc:StreetName"),
        line2: el.text("cbc:AdditionalStreetName"),
        line3: el.text("cac:AddressLine/cbc:Line"),
        city: el.text("cbc:CityName"),
        subdivision: el.text("cbc:CountrySubentity"),
    }
}

/// A `cac:Party`-shaped element. The legal registration name is the party
/// name; without one, `cac:PartyName` names the party instead of being its
/// trading name.
fn read_party(el: &Element) -> Party {
    let registration_name = el.text("cac:PartyLegalEntity/cbc:RegistrationName");
    let party_name = el.text("cac:PartyName/cbc:Name");
    let (name, trading_name) = match registration_name {
        Some(name) => (name, party_name),
        None => (party_name.unwrap_or_default(), None),
    };

    let mut party = Party {
        name,
        ..Default::default()
    };
    party.ids = el
        .all("cac:PartyIdentification/cbc:ID")
        .into_iter()
        .filter(|id| id.attr("schemeID") != Some(SEPA))
        .map(identifier)
        .collect();
    party.electronic_address = el.child("cbc:EndpointID").map(|endpoint| ElectronicAddress {
        uri: endpoint.value().to_string(),
        scheme: endpoint.attr("schemeID").map(str::to_string),
    });
    party.address = el.child("cac:PostalAddress").map(read_address);

    for scheme in el.children("cac:PartyTaxScheme") {
        let id = scheme.text("cbc:CompanyID");
        if scheme.text("cac:TaxScheme/cbc:ID").as_deref() == Some("VAT") {
            party.vat_id = id;
        } else {
            party.tax_registration_id = id;
        }
    }

    let legal = el.find("cac:PartyLegalEntity/cbc:CompanyID");
    if legal.is_some() || trading_name.is_some() {
        party.legal_organization = Some(LegalOrganization {
            id: legal.map(|id| id.value().to_string()).filter(|id| !id.is_empty()),
            scheme: legal.and_then(|id| id.attr("schemeID")).map(str::to_string),
            trading_name,
        });
    }

    party.contact = el.child("cac:Contact").map(|c| Contact {
        name: c.text("cbc:Name"),
        department: None,
        phone: c.text("cbc:Telephone"),
        email: c.text("cbc:ElectronicMail"),
    });
    party
}

fn read_ship_to(delivery: &Element) -> Option<Party> {
    let location = delivery.child("cac:DeliveryLocation");
    let name = delivery.text("cac:DeliveryParty/cac:PartyName/cbc:Name");
    if location.is_none() && name.is_none() {
        return None;
    }
    Some(Party {
        name: name.unwrap_or_default(),
        ids: location
            .map(|l| l.children("cbc:ID").map(identifier).collect())
            .unwrap_or_default(),
        address: location.and_then(|l| l.child("cac:Address")).map(read_address),
        ..Default::default()
    })
}

fn read_document_reference(doc: &Element) -> Result<ReferencedDocument, InvoiceError> {
    let attachment = match doc.find("cac:Attachment/cbc:EmbeddedDocumentBinaryObject") {
        Some(binary) => Some(BinaryObject {
            content: decode_binary(binary.value(), "BT-125 attached document")?,
            mime_type: binary.attr("mimeCode").unwrap_or_default().to_string(),
            filename: binary.attr("filename").unwrap_or_default().to_string(),
        }),
        None => None,
    };
    Ok(ReferencedDocument {
        id: doc.text("cbc:ID").unwrap_or_default(),
        type_code: doc.text("cbc:DocumentTypeCode"),
        description: doc.text("cbc:DocumentDescription"),
        uri: doc.text("cac:Attachment/cac:ExternalReference/cbc:URI"),
        attachment,
    })
}

/// IBANs start with a country code and two check digits.
fn looks_like_iban(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() > 4
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
}

fn read_payment_means(means: &Element) -> Result<PaymentMeans, InvoiceError> {
    let code = means.child("cbc:PaymentMeansCode");
    let payee_account = means.child("cac:PayeeFinancialAccount").map(|account| {
        let id = account.text("cbc:ID");
        let (iban, proprietary_id) = match id {
            Some(id) if looks_like_iban(&id) => (Some(id), None),
            other => (None, other),
        };
        FinancialAccount {
            iban,
            proprietary_id,
            name: account.text("cbc:Name"),
            bic: account.text("cac:FinancialInstitutionBranch/cbc:ID"),
        }
    });
    Ok(PaymentMeans {
        type_code: code
            .map(|c| parse_code(c.value(), "BT-81 payment means type code"))
            .transpose()?
            .map(PaymentMeansCode::from_code),
        information: code
            .and_then(|c| c.attr("name"))
            .map(str::to_string)
            .or_else(|| means.text("cbc:InstructionNote")),
        payee_account,
        card: means.child("cac:CardAccount").map(|card| PaymentCard {
            account_number: card.text("cbc:PrimaryAccountNumberID").unwrap_or_default(),
            network_id: card.text("cbc:NetworkID"),
            holder: card.text("cbc:HolderName"),
        }),
        payer_account: means.text("cac:PaymentMandate/cac:PayerFinancialAccount/cbc:ID"),
    })
}

fn read_tax_category(
    el: Option<&Element>,
    field: &str,
) -> Result<(Option<TaxCategory>, Option<Decimal>), InvoiceError> {
    let Some(el) = el else {
        return Ok((None, None));
    };
    Ok((category_from(el.text("cbc:ID")), el.decimal("cbc:Percent", field)?))
}

fn read_allowance_charge(el: &Element, scope: &str) -> Result<AllowanceCharge, InvoiceError> {
    let indicator = el.text("cbc:ChargeIndicator").unwrap_or_default();
    let (tax_category, tax_rate) = read_tax_category(
        el.child("cac:TaxCategory"),
        &format!("{scope} allowance/charge VAT rate"),
    )?;
    let amount = el.decimal("cbc:Amount", &format!("{scope} allowance/charge amount"))?;
    Ok(AllowanceCharge {
        is_charge: indicator.eq_ignore_ascii_case("true") || indicator == "1",
        percent: el.decimal(
            "cbc:MultiplierFactorNumeric",
            &format!("{scope} allowance/charge percentage"),
        )?,
        basis_amount: el.decimal(
            "cbc:BaseAmount",
            &format!("{scope} allowance/charge base amount"),
        )?,
        amount: amount.unwrap_or_default(),
        amount_presence: Presence::of(amount.is_some()),
        reason_code: el.text("cbc:AllowanceChargeReasonCode"),
        reason: el.text("cbc:AllowanceChargeReason"),
        tax_category,
        tax_rate: tax_rate.unwrap_or_default(),
    })
}

fn read_tax_totals(root: &Element, invoice: &mut Invoice) -> Result<(), InvoiceError> {
    let mut tax_total = Presence::Absent;
    for total in root.children("cac:TaxTotal") {
        if let Some(amount) = total.child("cbc:TaxAmount") {
            let value = parse_decimal(amount.value(), "BT-110 invoice total VAT amount")?;
            let currency = amount.attr("currencyID");
            let own = currency.is_none_or(|c| c == invoice.currency);
            let accounting = currency.is_some() && currency == invoice.tax_currency.as_deref();
            if own && tax_total == Presence::Absent {
                invoice.totals.tax_total = value;
                tax_total = Presence::Present;
            } else if accounting && invoice.totals.tax_total_accounting.is_none() {
                invoice.totals.tax_total_accounting = Some(value);
            } else {
                let currency = currency.unwrap_or_default().to_string();
                unexpected_currency(invoice, "TaxTotal/TaxAmount", value, &currency);
            }
        }

        for subtotal in total.children("cac:TaxSubtotal") {
            let category = subtotal.child("cac:TaxCategory");
            let (tax_category, rate) = read_tax_category(category, "BT-119 VAT category rate")?;
            let basis = subtotal.decimal("cbc:TaxableAmount", "BT-116 VAT category taxable amount")?;
            let calculated = subtotal.decimal("cbc:TaxAmount", "BT-117 VAT category tax amount")?;
            invoice.trade_taxes.push(TradeTax {
                type_code: category
                    .and_then(|c| c.text("cac:TaxScheme/cbc:ID"))
                    .unwrap_or_else(|| "VAT".to_string()),
                category: tax_category,
                rate: rate.unwrap_or_default(),
                rate_presence: Presence::of(rate.is_some()),
                basis_amount: basis.unwrap_or_default(),
                basis_presence: Presence::of(basis.is_some()),
                calculated_amount: calculated.unwrap_or_default(),
                calculated_presence: Presence::of(calculated.is_some()),
                exemption_reason: category.and_then(|c| c.text("cbc:TaxExemptionReason")),
                exemption_reason_code: category.and_then(|c| c.text("cbc:TaxExemptionReasonCode")),
                tax_point_date: None,
                due_date_type_code: None,
            });
        }
    }
    invoice.totals.presence.tax_total = tax_total;
    Ok(())
}

fn read_totals(el: &Element, invoice: &mut Invoice) -> Result<(), InvoiceError> {
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

    let totals = &mut invoice.totals;
    let mut presence = SummationPresence {
        tax_total: totals.presence.tax_total,
        ..absent_totals()
    };
    totals.line_total = amount(
        el,
        "cbc:LineExtensionAmount",
        "BT-106 sum of invoice line net amount",
        &mut presence.line_total,
    )?;
    totals.tax_basis_total = amount(
        el,
        "cbc:TaxExclusiveAmount",
        "BT-109 invoice total amount without VAT",
        &mut presence.tax_basis_total,
    )?;
    totals.grand_total = amount(
        el,
        "cbc:TaxInclusiveAmount",
        "BT-112 invoice total amount with VAT",
        &mut presence.grand_total,
    )?;
    totals.allowance_total = amount(
        el,
        "cbc:AllowanceTotalAmount",
        "BT-107 sum of allowances on document level",
        &mut presence.allowance_total,
    )?;
    totals.charge_total = amount(
        el,
        "cbc:ChargeTotalAmount",
        "BT-108 sum of charges on document level",
        &mut presence.charge_total,
    )?;
    totals.prepaid = amount(
        el,
        "cbc:PrepaidAmount",
        "BT-113 paid amount",
        &mut presence.prepaid,
    )?;
    totals.rounding = amount(
        el,
        "cbc:PayableRoundingAmount",
        "BT-114 rounding amount",
        &mut presence.rounding,
    )?;
    totals.due_payable = amount(
        el,
        "cbc:PayableAmount",
        "BT-115 amount due for payment",
        &mut presence.due_payable,
    )?;
    totals.presence = presence;
    Ok(())
}

fn read_line(el: &Element, voc: &Vocabulary) -> Result<InvoiceLine, InvoiceError> {
    let mut line = InvoiceLine {
        id: el.text("cbc:ID").unwrap_or_default(),
        note: el.text("cbc:Note"),
        net_price_presence: Presence::Absent,
        quantity_presence: Presence::Absent,
        line_total_presence: Presence::Absent,
        accounting_reference: el.text("cbc:AccountingCost"),
        order_line_reference: el.text("cac:OrderLineReference/cbc:LineID"),
        ..Default::default()
    };

    if let Some(quantity) = el.child(voc.quantity) {
        line.quantity = parse_decimal(quantity.value(), "BT-129 invoiced quantity")?;
        line.quantity_presence = Presence::Present;
        line.unit = quantity.attr("unitCode").unwrap_or_default().to_string();
    }
    if let Some(total) = el.decimal("cbc:LineExtensionAmount", "BT-131 line net amount")? {
        line.line_total = total;
        line.line_total_presence = Presence::Present;
    }
    if let Some(period) = el.child("cac:InvoicePeriod") {
        line.billing_period = Some(read_period(period, "BG-26 invoice line period")?);
    }
    for ac in el.children("cac:AllowanceCharge") {
        line.allowances_charges.push(read_allowance_charge(ac, "line")?);
    }

    if let Some(item) = el.child("cac:Item") {
        line.description = item.text("cbc:Description");
        line.item_name = item.text("cbc:Name").unwrap_or_default();
        line.buyer_item_id = item.text("cac:BuyersItemIdentification/cbc:ID");
        line.seller_item_id = item.text("cac:SellersItemIdentification/cbc:ID");
        line.global_id = item
            .find("cac:StandardItemIdentification/cbc:ID")
            .map(identifier);
        line.origin_country = item.text("cac:OriginCountry/cbc:IdentificationCode");
        for code in item.all("cac:CommodityClassification/cbc:ItemClassificationCode") {
            line.classifications.push(Classification {
                code: code.value().to_string(),
                list_id: code.attr("listID").map(str::to_string),
                list_version: code.attr("listVersionID").map(str::to_string),
            });
        }
        let (category, rate) = read_tax_category(
            item.child("cac:ClassifiedTaxCategory"),
            "BT-152 invoiced item VAT rate",
        )?;
        line.tax_category = category;
        line.tax_rate = rate.unwrap_or_default();
        for property in item.children("cac:AdditionalItemProperty") {
            line.characteristics.push(ItemAttribute {
                name: property.text("cbc:Name").unwrap_or_default(),
                value: property.text("cbc:Value").unwrap_or_default(),
            });
        }
    }

    if let Some(price) = el.child("cac:Price") {
        if let Some(net) = price.decimal("cbc:PriceAmount", "BT-146 item net price")? {
            line.net_price = net;
            line.net_price_presence = Presence::Present;
        }
        if let Some(base) = price.child("cbc:BaseQuantity") {
            line.base_quantity = Some(parse_decimal(base.value(), "BT-149 item price base quantity")?);
            line.base_quantity_unit = base.attr("unitCode").map(str::to_string);
        }
        if let Some(discount) = price.child("cac:AllowanceCharge") {
            line.price_allowance = discount
                .decimal("cbc:Amount", "BT-147 item price discount")?
                .filter(|d| !d.is_zero());
            line.gross_price = discount.decimal("cbc:BaseAmount", "BT-148 item gross price")?;
        }
    }
    Ok(line)
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
    let voc = match invoice.type_code {
        Some(code) if code.is_credit_note() => &CREDIT_NOTE,
        _ => &INVOICE,
    };
    debug!(root = voc.root, "writing UBL document");
    let currency = invoice.currency.as_str();
    let mut w = XmlWriter::new(sink, indent)?;

    w.start_element_with_attrs(
        voc.root,
        &[
            ("xmlns", voc.namespace),
            ("xmlns:cac", ns::CAC),
            ("xmlns:cbc", ns::CBC),
        ],
    )?;

    w.text_element("cbc:CustomizationID", &invoice.specification_id)?;
    if gate.emits(Field::BusinessProcess) {
        w.optional_element("cbc:ProfileID", invoice.business_process.as_deref())?;
    }
    w.text_element("cbc:ID", &invoice.number)?;
    if let Some(date) = invoice.issue_date {
        w.text_element("cbc:IssueDate", &format_date_ubl(date))?;
    }
    let due_date = invoice.due_date().filter(|_| gate.emits(Field::PaymentTerms));
    if voc.root == INVOICE.root {
        if let Some(due) = due_date {
            w.text_element("cbc:DueDate", &format_date_ubl(due))?;
        }
    }
    if let Some(code) = invoice.type_code {
        w.text_element(voc.type_code, &code.code().to_string())?;
    }
    if gate.emits(Field::Notes) {
        for note in &invoice.notes {
            let text = match present(&note.subject_code) {
                Some(code) => format!("#{code}#{}", note.text),
                None => note.text.clone(),
            };
            w.text_element("cbc:Note", &text)?;
        }
    }
    let breakdown = gate.emits(Field::TaxBreakdown);
    if gate.emits(Field::TaxPointDate) {
        if let Some(date) = invoice.trade_taxes.iter().find_map(|t| t.tax_point_date) {
            w.text_element("cbc:TaxPointDate", &format_date_ubl(date))?;
        }
    }
    w.text_element("cbc:DocumentCurrencyCode", currency)?;
    if gate.emits(Field::TaxCurrency) {
        w.optional_element("cbc:TaxCurrencyCode", invoice.tax_currency.as_deref())?;
    }
    w.optional_element("cbc:BuyerReference", invoice.buyer_reference.as_deref())?;

    let period = invoice.billing_period.filter(|_| gate.emits(Field::BillingPeriod));
    let description_code = invoice
        .trade_taxes
        .iter()
        .find_map(|t| present(&t.due_date_type_code))
        .filter(|_| breakdown);
    if period.is_some() || description_code.is_some() {
        w.start_element("cac:InvoicePeriod")?;
        if let Some(period) = period {
            write_period_dates(&mut w, &period)?;
        }
        w.optional_element("cbc:DescriptionCode", description_code)?;
        w.end_element("cac:InvoicePeriod")?;
    }

    if let Some(order) = present(&invoice.order_reference) {
        w.start_element("cac:OrderReference")?;
        w.text_element("cbc:ID", order)?;
        w.end_element("cac:OrderReference")?;
    }
    if gate.emits(Field::PrecedingInvoices) {
        for preceding in &invoice.preceding_invoices {
            w.start_element("cac:BillingReference")?;
            w.start_element("cac:InvoiceDocumentReference")?;
            w.text_element("cbc:ID", &preceding.id)?;
            if let Some(date) = preceding.issue_date {
                w.text_element("cbc:IssueDate", &format_date_ubl(date))?;
            }
            w.end_element("cac:InvoiceDocumentReference")?;
            w.end_element("cac:BillingReference")?;
        }
    }
    if gate.emits(Field::ContractReference) {
        if let Some(contract) = present(&invoice.contract_reference) {
            w.start_element("cac:ContractDocumentReference")?;
            w.text_element("cbc:ID", contract)?;
            w.end_element("cac:ContractDocumentReference")?;
        }
    }
    if gate.emits(Field::Attachments) {
        for doc in &invoice.attachments {
            write_document_reference(&mut w, doc)?;
        }
    }

    // --- Parties ---
    let creditor_reference = present(&invoice.creditor_reference)
        .filter(|_| gate.emits(Field::CreditorReference));
    let payee = invoice.payee.as_ref().filter(|_| gate.emits(Field::Payee));

    w.start_element("cac:AccountingSupplierParty")?;
    write_party(
        &mut w,
        &invoice.seller,
        gate.party(Role::Seller),
        creditor_reference.filter(|_| payee.is_none()),
    )?;
    w.end_element("cac:AccountingSupplierParty")?;

    w.start_element("cac:AccountingCustomerParty")?;
    write_party(&mut w, &invoice.buyer, gate.party(Role::Buyer), None)?;
    w.end_element("cac:AccountingCustomerParty")?;

    if let Some(payee) = payee {
        write_named_party(&mut w, "cac:PayeeParty", payee, creditor_reference)?;
    }
    if let Some(representative) = invoice
        .tax_representative
        .as_ref()
        .filter(|_| gate.emits(Field::TaxRepresentative))
    {
        write_named_party(&mut w, "cac:TaxRepresentativeParty", representative, None)?;
    }

    let ship_to = invoice.ship_to.as_ref().filter(|_| gate.emits(Field::ShipTo));
    let delivery_date = invoice.delivery_date.filter(|_| gate.emits(Field::ActualDeliveryDate));
    if ship_to.is_some() || delivery_date.is_some() {
        w.start_element("cac:Delivery")?;
        if let Some(date) = delivery_date {
            w.text_element("cbc:ActualDeliveryDate", &format_date_ubl(date))?;
        }
        if let Some(ship_to) = ship_to {
            write_ship_to(&mut w, ship_to)?;
        }
        w.end_element("cac:Delivery")?;
    }

    // --- Payment ---
    if gate.emits(Field::PaymentMeans) {
        let mandate = invoice
            .payment_terms
            .iter()
            .find_map(|t| present(&t.direct_debit_mandate_id));
        let credit_note_due = due_date.filter(|_| voc.root == CREDIT_NOTE.root);
        let payment_reference =
            present(&invoice.payment_reference).filter(|_| gate.emits(Field::PaymentReference));
        for means in &invoice.payment_means {
            write_payment_means(
                &mut w,
                means,
                gate,
                credit_note_due,
                payment_reference,
                mandate,
            )?;
        }
    }
    if gate.emits(Field::PaymentTerms) {
        for terms in &invoice.payment_terms {
            if let Some(note) = present(&terms.description) {
                w.start_element("cac:PaymentTerms")?;
                w.text_element("cbc:Note", note)?;
                w.end_element("cac:PaymentTerms")?;
            }
        }
    }

    if gate.emits(Field::DocumentAllowancesCharges) {
        for ac in &invoice.allowances_charges {
            write_allowance_charge(&mut w, ac, currency, true)?;
        }
    }

    write_tax_totals(&mut w, invoice, gate)?;
    write_totals(&mut w, invoice, gate)?;

    if gate.emits(Field::Lines) {
        for line in &invoice.lines {
            write_line(&mut w, line, voc, currency, gate)?;
        }
    }

    w.end_element(voc.root)?;
    w.into_inner().flush()?;
    Ok(())
}

fn write_period_dates<W: Write>(w: &mut XmlWriter<W>, period: &Period) -> Result<(), InvoiceError> {
    if let Some(start) = period.start {
        w.text_element("cbc:StartDate", &format_date_ubl(start))?;
    }
    if let Some(end) = period.end {
        w.text_element("cbc:EndDate", &format_date_ubl(end))?;
    }
    Ok(())
}

fn write_document_reference<W: Write>(
    w: &mut XmlWriter<W>,
    doc: &ReferencedDocument,
) -> Result<(), InvoiceError> {
    w.start_element("cac:AdditionalDocumentReference")?;
    w.text_element("cbc:ID", &doc.id)?;
    w.optional_element("cbc:DocumentTypeCode", doc.type_code.as_deref())?;
    w.optional_element("cbc:DocumentDescription", doc.description.as_deref())?;
    let uri = present(&doc.uri);
    if doc.attachment.is_some() || uri.is_some() {
        w.start_element("cac:Attachment")?;
        if let Some(binary) = &doc.attachment {
            w.text_element_with_attrs(
                "cbc:EmbeddedDocumentBinaryObject",
                &encode_binary(&binary.content),
                &[
                    ("mimeCode", binary.mime_type.as_str()),
                    ("filename", binary.filename.as_str()),
                ],
            )?;
        }
        if let Some(uri) = uri {
            w.start_element("cac:ExternalReference")?;
            w.text_element("cbc:URI", uri)?;
            w.end_element("cac:ExternalReference")?;
        }
        w.end_element("cac:Attachment")?;
    }
    w.end_element("cac:AdditionalDocumentReference")?;
    Ok(())
}

fn write_address<W: Write>(
    w: &mut XmlWriter<W>,
    element: &str,
    address: &PostalAddress,
) -> Result<(), InvoiceError> {
    w.start_element(element)?;
    w.optional_element("cbc:StreetName", address.line1.as_deref())?;
    w.optional_element("cbc:AdditionalStreetName", address.line2.as_deref())?;
    w.optional_element("cbc:CityName", address.city.as_deref())?;
    w.optional_element("cbc:PostalZone", address.postcode.as_deref())?;
    w.optional_element("cbc:CountrySubentity", address.subdivision.as_deref())?;
    if let Some(line3) = address.line3.as_deref().filter(|l| !l.trim().is_empty()) {
        w.start_element("cac:AddressLine")?;
        w.text_element("cbc:Line", line3)?;
        w.end_element("cac:AddressLine")?;
    }
    w.start_element("cac:Country")?;
    w.text_element("cbc:IdentificationCode", &address.country_code)?;
    w.end_element("cac:Country")?;
    w.end_element(element)?;
    Ok(())
}

fn write_party_identifications<W: Write>(
    w: &mut XmlWriter<W>,
    ids: &[Identifier],
    creditor_reference: Option<&str>,
) -> Result<(), InvoiceError> {
    for id in ids {
        w.start_element("cac:PartyIdentification")?;
        w.id_element("cbc:ID", &id.id, id.scheme.as_deref())?;
        w.end_element("cac:PartyIdentification")?;
    }
    if let Some(reference) = creditor_reference {
        w.start_element("cac:PartyIdentification")?;
        w.id_element("cbc:ID", reference, Some(SEPA))?;
        w.end_element("cac:PartyIdentification")?;
    }
    Ok(())
}

fn write_tax_scheme<W: Write>(
    w: &mut XmlWriter<W>,
    company_id: &str,
    scheme: &str,
) -> Result<(), InvoiceError> {
    w.start_element("cac:PartyTaxScheme")?;
    w.text_element("cbc:CompanyID", company_id)?;
    w.start_element("cac:TaxScheme")?;
    w.text_element("cbc:ID", scheme)?;
    w.end_element("cac:TaxScheme")?;
    w.end_element("cac:PartyTaxScheme")?;
    Ok(())
}

/// Seller or buyer: `cac:PartyName` carries the trading name and
/// `cac:PartyLegalEntity` the registration name.
fn write_party<W: Write>(
    w: &mut XmlWriter<W>,
    party: &Party,
    show: PartyGate,
    creditor_reference: Option<&str>,
) -> Result<(), InvoiceError> {
    w.start_element("cac:Party")?;
    if let Some(endpoint) = party
        .electronic_address
        .as_ref()
        .filter(|_| show.electronic_address)
    {
        w.id_element("cbc:EndpointID", &endpoint.uri, endpoint.scheme.as_deref())?;
    }
    write_party_identifications(w, &party.ids, creditor_reference)?;

    let legal = party.legal_organization.as_ref();
    if let Some(trading_name) = legal
        .and_then(|org| present(&org.trading_name))
        .filter(|_| show.trading_name)
    {
        w.start_element("cac:PartyName")?;
        w.text_element("cbc:Name", trading_name)?;
        w.end_element("cac:PartyName")?;
    }
    if let Some(address) = party.address.as_ref().filter(|_| show.address) {
        write_address(w, "cac:PostalAddress", address)?;
    }
    if let Some(vat_id) = present(&party.vat_id) {
        write_tax_scheme(w, vat_id, "VAT")?;
    }
    if let Some(tax_id) = present(&party.tax_registration_id) {
        write_tax_scheme(w, tax_id, "FC")?;
    }

    w.start_element("cac:PartyLegalEntity")?;
    w.text_element("cbc:RegistrationName", &party.name)?;
    if let Some(org) = legal {
        if let Some(id) = present(&org.id) {
            w.id_element("cbc:CompanyID", id, org.scheme.as_deref())?;
        }
    }
    w.end_element("cac:PartyLegalEntity")?;

    if let Some(contact) = party.contact.as_ref().filter(|_| show.contact) {
        w.start_element("cac:Contact")?;
        w.optional_element("cbc:Name", contact.name.as_deref())?;
        w.optional_element("cbc:Telephone", contact.phone.as_deref())?;
        w.optional_element("cbc:ElectronicMail", contact.email.as_deref())?;
        w.end_element("cac:Contact")?;
    }
    w.end_element("cac:Party")?;
    Ok(())
}

/// Payee or tax representative: named through `cac:PartyName`.
fn write_named_party<W: Write>(
    w: &mut XmlWriter<W>,
    element: &str,
    party: &Party,
    creditor_reference: Option<&str>,
) -> Result<(), InvoiceError> {
    w.start_element(element)?;
    write_party_identifications(w, &party.ids, creditor_reference)?;
    w.start_element("cac:PartyName")?;
    w.text_element("cbc:Name", &party.name)?;
    w.end_element("cac:PartyName")?;
    if let Some(address) = &party.address {
        write_address(w, "cac:PostalAddress", address)?;
    }
    if let Some(vat_id) = present(&party.vat_id) {
        write_tax_scheme(w, vat_id, "VAT")?;
    }
    if let Some(org) = &party.legal_organization {
        if let Some(id) = present(&org.id) {
            w.start_element("cac:PartyLegalEntity")?;
            w.id_element("cbc:CompanyID", id, org.scheme.as_deref())?;
            w.end_element("cac:PartyLegalEntity")?;
        }
    }
    w.end_element(element)?;
    Ok(())
}

fn write_ship_to<W: Write>(w: &mut XmlWriter<W>, party: &Party) -> Result<(), InvoiceError> {
    if !party.ids.is_empty() || party.address.is_some() {
        w.start_element("cac:DeliveryLocation")?;
        if let Some(id) = party.ids.first() {
            w.id_element("cbc:ID", &id.id, id.scheme.as_deref())?;
        }
        if let Some(address) = &party.address {
            write_address(w, "cac:Address", address)?;
        }
        w.end_element("cac:DeliveryLocation")?;
    }
    if !party.name.is_empty() {
        w.start_element("cac:DeliveryParty")?;
        w.start_element("cac:PartyName")?;
        w.text_element("cbc:Name", &party.name)?;
        w.end_element("cac:PartyName")?;
        w.end_element("cac:DeliveryParty")?;
    }
    Ok(())
}

fn write_payment_means<W: Write>(
    w: &mut XmlWriter<W>,
    means: &PaymentMeans,
    gate: Gate,
    due_date: Option<NaiveDate>,
    payment_reference: Option<&str>,
    mandate: Option<&str>,
) -> Result<(), InvoiceError> {
    w.start_element("cac:PaymentMeans")?;
    if let Some(code) = means.type_code {
        let code = code.code().to_string();
        match present(&means.information) {
            Some(name) => w.text_element_with_attrs("cbc:PaymentMeansCode", &code, &[("name", name)])?,
            None => w.text_element("cbc:PaymentMeansCode", &code)?,
        };
    }
    if let Some(due) = due_date {
        w.text_element("cbc:PaymentDueDate", &format_date_ubl(due))?;
    }
    w.optional_element("cbc:PaymentID", payment_reference)?;

    if let Some(card) = means.card.as_ref().filter(|_| gate.emits(Field::PaymentCard)) {
        w.start_element("cac:CardAccount")?;
        w.text_element("cbc:PrimaryAccountNumberID", &card.account_number)?;
        w.optional_element("cbc:NetworkID", card.network_id.as_deref())?;
        w.optional_element("cbc:HolderName", card.holder.as_deref())?;
        w.end_element("cac:CardAccount")?;
    }
    if let Some(account) = &means.payee_account {
        w.start_element("cac:PayeeFinancialAccount")?;
        w.text_element("cbc:ID", account.account_id().unwrap_or_default())?;
        w.optional_element("cbc:Name", account.name.as_deref())?;
        if let Some(bic) = present(&account.bic) {
            w.start_element("cac:FinancialInstitutionBranch")?;
            w.text_element("cbc:ID", bic)?;
            w.end_element("cac:FinancialInstitutionBranch")?;
        }
        w.end_element("cac:PayeeFinancialAccount")?;
    }

    let debit = means.type_code.is_some_and(|c| c.is_direct_debit());
    let mandate = mandate.filter(|_| debit);
    let payer = present(&means.payer_account);
    if mandate.is_some() || payer.is_some() {
        w.start_element("cac:PaymentMandate")?;
        w.optional_element("cbc:ID", mandate)?;
        if let Some(payer) = payer {
            w.start_element("cac:PayerFinancialAccount")?;
            w.text_element("cbc:ID", payer)?;
            w.end_element("cac:PayerFinancialAccount")?;
        }
        w.end_element("cac:PaymentMandate")?;
    }
    w.end_element("cac:PaymentMeans")?;
    Ok(())
}

fn write_tax_category<W: Write>(
    w: &mut XmlWriter<W>,
    element: &str,
    category: Option<TaxCategory>,
    rate: Decimal,
    exemption: Option<&TradeTax>,
) -> Result<(), InvoiceError> {
    w.start_element(element)?;
    if let Some(category) = category {
        w.text_element("cbc:ID", category.code())?;
    }
    if category != Some(TaxCategory::NotSubjectToVat) {
        w.decimal_element("cbc:Percent", rate)?;
    }
    if let Some(tax) = exemption {
        w.optional_element("cbc:TaxExemptionReasonCode", tax.exemption_reason_code.as_deref())?;
        w.optional_element("cbc:TaxExemptionReason", tax.exemption_reason.as_deref())?;
    }
    let scheme = exemption
        .map(|t| t.type_code.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("VAT");
    w.start_element("cac:TaxScheme")?;
    w.text_element("cbc:ID", scheme)?;
    w.end_element("cac:TaxScheme")?;
    w.end_element(element)?;
    Ok(())
}

fn write_allowance_charge<W: Write>(
    w: &mut XmlWriter<W>,
    ac: &AllowanceCharge,
    currency: &str,
    document_level: bool,
) -> Result<(), InvoiceError> {
    w.start_element("cac:AllowanceCharge")?;
    w.text_element("cbc:ChargeIndicator", if ac.is_charge { "true" } else { "false" })?;
    w.optional_element("cbc:AllowanceChargeReasonCode", ac.reason_code.as_deref())?;
    w.optional_element("cbc:AllowanceChargeReason", ac.reason.as_deref())?;
    if let Some(percent) = ac.percent {
        w.decimal_element("cbc:MultiplierFactorNumeric", percent)?;
    }
    w.amount_element("cbc:Amount", ac.amount, currency)?;
    if let Some(basis) = ac.basis_amount {
        w.amount_element("cbc:BaseAmount", basis, currency)?;
    }
    if document_level {
        write_tax_category(w, "cac:TaxCategory", ac.tax_category, ac.tax_rate, None)?;
    }
    w.end_element("cac:AllowanceCharge")?;
    Ok(())
}

fn write_tax_totals<W: Write>(
    w: &mut XmlWriter<W>,
    invoice: &Invoice,
    gate: Gate,
) -> Result<(), InvoiceError> {
    let totals = &invoice.totals;
    let subtotals: &[TradeTax] = if gate.emits(Field::TaxBreakdown) {
        &invoice.trade_taxes
    } else {
        &[]
    };
    let tax_amount = totals.presence.tax_total.resolve(totals.tax_total);
    if tax_amount || !subtotals.is_empty() {
        w.start_element("cac:TaxTotal")?;
        if tax_amount {
            w.amount_element("cbc:TaxAmount", totals.tax_total, &invoice.currency)?;
        }
        for tax in subtotals {
            w.start_element("cac:TaxSubtotal")?;
            w.amount_element("cbc:TaxableAmount", tax.basis_amount, &invoice.currency)?;
            w.amount_element("cbc:TaxAmount", tax.calculated_amount, &invoice.currency)?;
            write_tax_category(w, "cac:TaxCategory", tax.category, tax.rate, Some(tax))?;
            w.end_element("cac:TaxSubtotal")?;
        }
        w.end_element("cac:TaxTotal")?;
    }

    if gate.emits(Field::TaxTotalAccounting) {
        if let (Some(amount), Some(currency)) =
            (totals.tax_total_accounting, present(&invoice.tax_currency))
        {
            w.start_element("cac:TaxTotal")?;
            w.amount_element("cbc:TaxAmount", amount, currency)?;
            w.end_element("cac:TaxTotal")?;
        }
    }
    Ok(())
}

fn write_totals<W: Write>(
    w: &mut XmlWriter<W>,
    invoice: &Invoice,
    gate: Gate,
) -> Result<(), InvoiceError> {
    let totals = &invoice.totals;
    let presence = totals.presence;
    let currency = invoice.currency.as_str();
    let adjustments = gate.emits(Field::AllowanceChargeTotals);
    let prepaid_and_rounding = gate.emits(Field::PrepaidAndRounding);

    let rows = [
        (
            "cbc:LineExtensionAmount",
            totals.line_total,
            gate.emits(Field::LineTotalAmount) && presence.line_total.resolve(totals.line_total),
        ),
        (
            "cbc:TaxExclusiveAmount",
            totals.tax_basis_total,
            presence.tax_basis_total.resolve(totals.tax_basis_total),
        ),
        (
            "cbc:TaxInclusiveAmount",
            totals.grand_total,
            presence.grand_total.resolve(totals.grand_total),
        ),
        (
            "cbc:AllowanceTotalAmount",
            totals.allowance_total,
            adjustments && presence.allowance_total.resolve(totals.allowance_total),
        ),
        (
            "cbc:ChargeTotalAmount",
            totals.charge_total,
            adjustments && presence.charge_total.resolve(totals.charge_total),
        ),
        (
            "cbc:PrepaidAmount",
            totals.prepaid,
            prepaid_and_rounding && presence.prepaid.resolve(totals.prepaid),
        ),
        (
            "cbc:PayableRoundingAmount",
            totals.rounding,
            prepaid_and_rounding && presence.rounding.resolve(totals.rounding),
        ),
        (
            "cbc:PayableAmount",
            totals.due_payable,
            presence.due_payable.resolve(totals.due_payable),
        ),
    ];

    w.start_element("cac:LegalMonetaryTotal")?;
    for (element, amount, emit) in rows {
        if emit {
            w.amount_element(element, amount, currency)?;
        }
    }
    w.end_element("cac:LegalMonetaryTotal")?;
    Ok(())
}

fn write_line<W: Write>(
    w: &mut XmlWriter<W>,
    line: &InvoiceLine,
    voc: &Vocabulary,
    currency: &str,
    gate: Gate,
) -> Result<(), InvoiceError> {
    w.start_element(voc.line)?;
    w.text_element("cbc:ID", &line.id)?;
    if gate.emits(Field::LineNote) {
        w.optional_element("cbc:Note", line.note.as_deref())?;
    }
    w.quantity_element(voc.quantity, line.quantity, &line.unit)?;
    if line.line_total_presence.resolve(line.line_total) {
        w.amount_element("cbc:LineExtensionAmount", line.line_total, currency)?;
    }
    if gate.emits(Field::LineAccountingReference) {
        w.optional_element("cbc:AccountingCost", line.accounting_reference.as_deref())?;
    }
    if let Some(period) = line.billing_period.filter(|_| gate.emits(Field::LineBillingPeriod)) {
        w.start_element("cac:InvoicePeriod")?;
        write_period_dates(w, &period)?;
        w.end_element("cac:InvoicePeriod")?;
    }
    if gate.emits(Field::LineOrderReference) {
        if let Some(reference) = present(&line.order_line_reference) {
            w.start_element("cac:OrderLineReference")?;
            w.text_element("cbc:LineID", reference)?;
            w.end_element("cac:OrderLineReference")?;
        }
    }
    if gate.emits(Field::LineAllowancesCharges) {
        for ac in &line.allowances_charges {
            write_allowance_charge(w, ac, currency, false)?;
        }
    }

    // Item
    let details = gate.emits(Field::LineItemDetails);
    w.start_element("cac:Item")?;
    if details {
        w.optional_element("cbc:Description", line.description.as_deref())?;
    }
    w.text_element("cbc:Name", &line.item_name)?;
    if details {
        if let Some(id) = present(&line.buyer_item_id) {
            w.start_element("cac:BuyersItemIdentification")?;
            w.text_element("cbc:ID", id)?;
            w.end_element("cac:BuyersItemIdentification")?;
        }
        if let Some(id) = present(&line.seller_item_id) {
            w.start_element("cac:SellersItemIdentification")?;
            w.text_element("cbc:ID", id)?;
            w.end_element("cac:SellersItemIdentification")?;
        }
    }
    if let Some(id) = line.global_id.as_ref().filter(|_| gate.emits(Field::LineGlobalId)) {
        w.start_element("cac:StandardItemIdentification")?;
        w.id_element("cbc:ID", &id.id, id.scheme.as_deref())?;
        w.end_element("cac:StandardItemIdentification")?;
    }
    if gate.emits(Field::LineOrigin) {
        if let Some(country) = present(&line.origin_country) {
            w.start_element("cac:OriginCountry")?;
            w.text_element("cbc:IdentificationCode", country)?;
            w.end_element("cac:OriginCountry")?;
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
            w.start_element("cac:CommodityClassification")?;
            w.text_element_with_attrs("cbc:ItemClassificationCode", &class.code, &attrs)?;
            w.end_element("cac:CommodityClassification")?;
        }
    }
    write_tax_category(w, "cac:ClassifiedTaxCategory", line.tax_category, line.tax_rate, None)?;
    if gate.emits(Field::LineCharacteristics) {
        for attribute in &line.characteristics {
            w.start_element("cac:AdditionalItemProperty")?;
            w.text_element("cbc:Name", &attribute.name)?;
            w.text_element("cbc:Value", &attribute.value)?;
            w.end_element("cac:AdditionalItemProperty")?;
        }
    }
    w.end_element("cac:Item")?;

    // Price
    let base = line.base_quantity.filter(|_| gate.emits(Field::BaseQuantity));
    let gross = line.gross_price.filter(|_| gate.emits(Field::GrossPrice));
    let net = line.net_price_presence.resolve(line.net_price);
    if net || base.is_some() || gross.is_some() {
        w.start_element("cac:Price")?;
        if net {
            w.text_element_with_attrs(
                "cbc:PriceAmount",
                &format_decimal(line.net_price),
                &[("currencyID", currency)],
            )?;
        }
        if let Some(base) = base {
            w.quantity_element(
                "cbc:BaseQuantity",
                base,
                line.base_quantity_unit.as_deref().unwrap_or_default(),
            )?;
        }
        if let Some(gross) = gross {
            let discount = line.price_allowance.unwrap_or_default();
            w.start_element("cac:AllowanceCharge")?;
            w.text_element("cbc:ChargeIndicator", "false")?;
            w.text_element_with_attrs(
                "cbc:Amount",
                &format_decimal(discount),
                &[("currencyID", currency)],
            )?;
            w.text_element_with_attrs(
                "cbc:BaseAmount",
                &format_decimal(gross),
                &[("currencyID", currency)],
            )?;
            w.end_element("cac:AllowanceCharge")?;
        }
        w.end_element("cac:Price")?;
    }

    w.end_element(voc.line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn root(name: &str, namespace: &str, body: &str) -> Element {
        let doc = format!(
            r#"<{name} xmlns="{namespace}" xmlns:cac="{}" xmlns:cbc="{}">{body}</{name}>"#,
            ns::CAC,
            ns::CBC
        );
        Element::parse(doc.as_bytes()).unwrap()
    }

    #[test]
    fn note_subject_code_is_split() {
        assert_eq!(
            split_note("#AAI#Leistung laut Vertrag"),
            Note {
                subject_code: Some("AAI".into()),
                text: "Leistung laut Vertrag".into()
            }
        );
        assert_eq!(split_note("# 1 # note").subject_code, None);
        assert_eq!(split_note("plain").text, "plain");
    }

    #[test]
    fn iban_shape() {
        assert!(looks_like_iban("DE89370400440532013000"));
        assert!(!looks_like_iban("12345678"));
        assert!(!looks_like_iban("DE"));
    }

    #[test]
    fn credit_note_vocabulary_is_read() {
        let doc = root(
            "CreditNote",
            ns::UBL_CREDIT_NOTE,
            r#"<cbc:ID>GS-1</cbc:ID>
               <cbc:IssueDate>2024-06-15</cbc:IssueDate>
               <cbc:CreditNoteTypeCode>381</cbc:CreditNoteTypeCode>
               <cbc:DocumentCurrencyCode>EUR</cbc:DocumentCurrencyCode>
               <cac:PaymentMeans>
                 <cbc:PaymentMeansCode name="Überweisung">58</cbc:PaymentMeansCode>
                 <cbc:PaymentDueDate>2024-07-15</cbc:PaymentDueDate>
               </cac:PaymentMeans>
               <cac:CreditNoteLine>
                 <cbc:ID>1</cbc:ID>
                 <cbc:CreditedQuantity unitCode="C62">2</cbc:CreditedQuantity>
                 <cbc:LineExtensionAmount currencyID="EUR">20.00</cbc:LineExtensionAmount>
                 <cac:Item><cbc:Name>Ware</cbc:Name></cac:Item>
               </cac:CreditNoteLine>"#,
        );
        let invoice = read(&doc).unwrap();
        assert_eq!(invoice.type_code, Some(InvoiceTypeCode::CreditNote));
        assert_eq!(invoice.due_date(), NaiveDate::from_ymd_opt(2024, 7, 15));
        assert_eq!(invoice.payment_means[0].information.as_deref(), Some("Überweisung"));
        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].quantity, dec!(2));
        assert_eq!(invoice.lines[0].line_total_presence, Presence::Present);
        assert_eq!(invoice.lines[0].net_price_presence, Presence::Absent);
        assert_eq!(invoice.totals.presence.grand_total, Presence::Absent);
    }

    #[test]
    fn sepa_identifier_is_the_creditor_reference() {
        let doc = root(
            "Invoice",
            ns::UBL_INVOICE,
            r#"<cac:AccountingSupplierParty><cac:Party>
                 <cac:PartyIdentification><cbc:ID schemeID="SEPA">DE98ZZZ09999999999</cbc:ID></cac:PartyIdentification>
                 <cac:PartyIdentification><cbc:ID>4711</cbc:ID></cac:PartyIdentification>
                 <cac:PartyLegalEntity><cbc:RegistrationName>ACME GmbH</cbc:RegistrationName></cac:PartyLegalEntity>
               </cac:Party></cac:AccountingSupplierParty>"#,
        );
        let invoice = read(&doc).unwrap();
        assert_eq!(invoice.creditor_reference.as_deref(), Some("DE98ZZZ09999999999"));
        assert_eq!(invoice.seller.ids, vec![Identifier::new("4711")]);
        assert_eq!(invoice.seller.name, "ACME GmbH");
    }

    #[test]
    fn ubl_dates_must_be_iso() {
        let doc = root("Invoice", ns::UBL_INVOICE, "<cbc:IssueDate>20240615</cbc:IssueDate>");
        assert!(matches!(read(&doc), Err(InvoiceError::InvalidDate { .. })));
    }
}
