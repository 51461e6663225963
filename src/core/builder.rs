use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calculate::{default_exemption_reasons, derive_tax_breakdown, line_net_amount, update_totals};
use super::error::InvoiceError;
use super::types::*;
use super::validation;
use crate::profile::EN16931_URN;

/// Builder for invoices assembled in code.
///
/// `build()` derives the VAT breakdown and totals, then validates.
///
/// ```
/// use einvoice::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = InvoiceBuilder::new("RE-2024-001", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
///     .seller(PartyBuilder::new("ACME GmbH", AddressBuilder::new("Berlin", "10115", "DE").build())
///         .vat_id("DE123456789")
///         .build())
///     .buyer(PartyBuilder::new("Kunde AG", AddressBuilder::new("München", "80331", "DE").build())
///         .build())
///     .add_line(LineBuilder::new("1", "Beratung", dec!(10), "HUR", dec!(150.00))
///         .tax(TaxCategory::StandardRate, dec!(19))
///         .build())
///     .payment_terms("Zahlbar innerhalb von 30 Tagen")
///     .build()
///     .unwrap();
///
/// assert_eq!(invoice.totals.grand_total, dec!(1785.00));
/// ```
pub struct InvoiceBuilder {
    invoice: Invoice,
    seller: Option<Party>,
    buyer: Option<Party>,
    tax_point_date: Option<NaiveDate>,
    exemption_reasons: HashMap<TaxCategory, String>,
}

impl InvoiceBuilder {
    pub fn new(number: impl Into<String>, issue_date: NaiveDate) -> Self {
        Self {
            invoice: Invoice {
                number: number.into(),
                issue_date: Some(issue_date),
                type_code: Some(InvoiceTypeCode::Invoice),
                currency: "EUR".to_string(),
                specification_id: EN16931_URN.to_string(),
                ..Default::default()
            },
            seller: None,
            buyer: None,
            tax_point_date: None,
            exemption_reasons: default_exemption_reasons(),
        }
    }

    pub fn type_code(mut self, code: InvoiceTypeCode) -> Self {
        self.invoice.type_code = Some(code);
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.invoice.currency = code.into();
        self
    }

    pub fn tax_currency(mut self, code: impl Into<String>, tax_total: Decimal) -> Self {
        self.invoice.tax_currency = Some(code.into());
        self.invoice.totals.tax_total_accounting = Some(tax_total);
        self
    }

    /// Specification identifier (BT-24), e.g. [`crate::profile::XRECHNUNG_URN`].
    pub fn specification(mut self, urn: impl Into<String>) -> Self {
        self.invoice.specification_id = urn.into();
        self
    }

    pub fn business_process(mut self, urn: impl Into<String>) -> Self {
        self.invoice.business_process = Some(urn.into());
        self
    }

    pub fn note(mut self, text: impl Into<String>) -> Self {
        self.invoice.notes.push(Note {
            subject_code: None,
            text: text.into(),
        });
        self
    }

    pub fn note_with_subject(mut self, subject: impl Into<String>, text: impl Into<String>) -> Self {
        self.invoice.notes.push(Note {
            subject_code: Some(subject.into()),
            text: text.into(),
        });
        self
    }

    pub fn buyer_reference(mut self, reference: impl Into<String>) -> Self {
        self.invoice.buyer_reference = Some(reference.into());
        self
    }

    pub fn order_reference(mut self, reference: impl Into<String>) -> Self {
        self.invoice.order_reference = Some(reference.into());
        self
    }

    pub fn contract_reference(mut self, reference: impl Into<String>) -> Self {
        self.invoice.contract_reference = Some(reference.into());
        self
    }

    pub fn preceding_invoice(mut self, id: impl Into<String>, issue_date: Option<NaiveDate>) -> Self {
        self.invoice.preceding_invoices.push(PrecedingInvoice {
            id: id.into(),
            issue_date,
        });
        self
    }

    pub fn seller(mut self, party: Party) -> Self {
        self.seller = Some(party);
        self
    }

    pub fn buyer(mut self, party: Party) -> Self {
        self.buyer = Some(party);
        self
    }

    pub fn payee(mut self, party: Party) -> Self {
        self.invoice.payee = Some(party);
        self
    }

    pub fn tax_representative(mut self, party: Party) -> Self {
        self.invoice.tax_representative = Some(party);
        self
    }

    pub fn ship_to(mut self, party: Party) -> Self {
        self.invoice.ship_to = Some(party);
        self
    }

    pub fn billing_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.invoice.billing_period = Some(Period {
            start: Some(start),
            end: Some(end),
        });
        self
    }

    pub fn delivery_date(mut self, date: NaiveDate) -> Self {
        self.invoice.delivery_date = Some(date);
        self
    }

    pub fn add_line(mut self, line: InvoiceLine) -> Self {
        self.invoice.lines.push(line);
        self
    }

    pub fn add_allowance(mut self, allowance: AllowanceCharge) -> Self {
        self.invoice.allowances_charges.push(AllowanceCharge {
            is_charge: false,
            ..allowance
        });
        self
    }

    pub fn add_charge(mut self, charge: AllowanceCharge) -> Self {
        self.invoice.allowances_charges.push(AllowanceCharge {
            is_charge: true,
            ..charge
        });
        self
    }

    pub fn payment_means(mut self, means: PaymentMeans) -> Self {
        self.invoice.payment_means.push(means);
        self
    }

    pub fn payment_terms(mut self, description: impl Into<String>) -> Self {
        self.terms().description = Some(description.into());
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.terms().due_date = Some(date);
        self
    }

    pub fn direct_debit_mandate(mut self, mandate_id: impl Into<String>) -> Self {
        self.terms().direct_debit_mandate_id = Some(mandate_id.into());
        self
    }

    pub fn payment_reference(mut self, reference: impl Into<String>) -> Self {
        self.invoice.payment_reference = Some(reference.into());
        self
    }

    pub fn creditor_reference(mut self, reference: impl Into<String>) -> Self {
        self.invoice.creditor_reference = Some(reference.into());
        self
    }

    pub fn attachment(mut self, document: ReferencedDocument) -> Self {
        self.invoice.attachments.push(document);
        self
    }

    pub fn prepaid(mut self, amount: Decimal) -> Self {
        self.invoice.totals.prepaid = amount;
        self
    }

    pub fn rounding(mut self, amount: Decimal) -> Self {
        self.invoice.totals.rounding = amount;
        self
    }

    /// Tax point date (BT-7), applied to every VAT breakdown entry.
    pub fn tax_point_date(mut self, date: NaiveDate) -> Self {
        self.tax_point_date = Some(date);
        self
    }

    /// Exemption text for zero-rate entries of `category`, replacing the default.
    pub fn exemption_reason(mut self, category: TaxCategory, text: impl Into<String>) -> Self {
        self.exemption_reasons.insert(category, text.into());
        self
    }

    fn terms(&mut self) -> &mut PaymentTerms {
        if self.invoice.payment_terms.is_empty() {
            self.invoice.payment_terms.push(PaymentTerms::default());
        }
        &mut self.invoice.payment_terms[0]
    }

    /// Build the invoice, derive breakdown and totals, and validate.
    pub fn build(self) -> Result<Invoice, InvoiceError> {
        let mut invoice = self.build_unchecked()?;
        validation::validate(&mut invoice)?;
        Ok(invoice)
    }

    /// Build and calculate without validating.
    pub fn build_unchecked(self) -> Result<Invoice, InvoiceError> {
        let mut invoice = self.invoice;
        invoice.seller = self
            .seller
            .ok_or_else(|| InvoiceError::Builder("seller is required".into()))?;
        invoice.buyer = self
            .buyer
            .ok_or_else(|| InvoiceError::Builder("buyer is required".into()))?;

        derive_tax_breakdown(&mut invoice, &self.exemption_reasons)?;
        if let Some(date) = self.tax_point_date {
            for tax in &mut invoice.trade_taxes {
                tax.tax_point_date = Some(date);
            }
        }
        update_totals(&mut invoice)?;
        Ok(invoice)
    }
}

impl AllowanceCharge {
    /// Document or line level allowance.
    pub fn allowance(amount: Decimal, reason: impl Into<String>) -> Self {
        Self {
            is_charge: false,
            amount,
            amount_presence: Presence::Present,
            reason: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Document or line level charge.
    pub fn charge(amount: Decimal, reason: impl Into<String>) -> Self {
        Self {
            is_charge: true,
            amount,
            amount_presence: Presence::Present,
            reason: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn with_reason_code(mut self, code: impl Into<String>) -> Self {
        self.reason_code = Some(code.into());
        self
    }

    /// Percentage of a basis amount; `amount` is left as given.
    pub fn with_percent(mut self, percent: Decimal, basis_amount: Decimal) -> Self {
        self.percent = Some(percent);
        self.basis_amount = Some(basis_amount);
        self
    }

    pub fn with_tax(mut self, category: TaxCategory, rate: Decimal) -> Self {
        self.tax_category = Some(category);
        self.tax_rate = rate;
        self
    }
}

impl PaymentMeans {
    /// SEPA credit transfer (58) to the given IBAN.
    pub fn sepa_credit_transfer(iban: impl Into<String>) -> Self {
        Self {
            type_code: Some(PaymentMeansCode::SepaCreditTransfer),
            payee_account: Some(FinancialAccount {
                iban: Some(iban.into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// SEPA direct debit (59) from the given IBAN.
    pub fn sepa_direct_debit(payer_iban: impl Into<String>) -> Self {
        Self {
            type_code: Some(PaymentMeansCode::SepaDirectDebit),
            payer_account: Some(payer_iban.into()),
            ..Default::default()
        }
    }
}

/// Builder for parties.
pub struct PartyBuilder {
    party: Party,
}

impl PartyBuilder {
    pub fn new(name: impl Into<String>, address: PostalAddress) -> Self {
        Self {
            party: Party {
                name: name.into(),
                address: Some(address),
                ..Default::default()
            },
        }
    }

    /// A party without postal address, e.g. a payee.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            party: Party {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    pub fn vat_id(mut self, id: impl Into<String>) -> Self {
        self.party.vat_id = Some(id.into());
        self
    }

    pub fn tax_registration_id(mut self, id: impl Into<String>) -> Self {
        self.party.tax_registration_id = Some(id.into());
        self
    }

    pub fn id(mut self, id: Identifier) -> Self {
        self.party.ids.push(id);
        self
    }

    pub fn legal_registration(mut self, id: impl Into<String>, scheme: Option<String>) -> Self {
        let org = self.party.legal_organization.get_or_insert_with(Default::default);
        org.id = Some(id.into());
        org.scheme = scheme;
        self
    }

    pub fn trading_name(mut self, name: impl Into<String>) -> Self {
        let org = self.party.legal_organization.get_or_insert_with(Default::default);
        org.trading_name = Some(name.into());
        self
    }

    pub fn contact(mut self, contact: Contact) -> Self {
        self.party.contact = Some(contact);
        self
    }

    pub fn electronic_address(mut self, scheme: impl Into<String>, uri: impl Into<String>) -> Self {
        self.party.electronic_address = Some(ElectronicAddress {
            uri: uri.into(),
            scheme: Some(scheme.into()),
        });
        self
    }

    pub fn build(self) -> Party {
        self.party
    }
}

/// Builder for postal addresses.
pub struct AddressBuilder {
    address: PostalAddress,
}

impl AddressBuilder {
    pub fn new(
        city: impl Into<String>,
        postcode: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            address: PostalAddress {
                country_code: country_code.into(),
                postcode: Some(postcode.into()),
                city: Some(city.into()),
                ..Default::default()
            },
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.address.line1 = Some(street.into());
        self
    }

    pub fn additional(mut self, additional: impl Into<String>) -> Self {
        self.address.line2 = Some(additional.into());
        self
    }

    pub fn line3(mut self, line: impl Into<String>) -> Self {
        self.address.line3 = Some(line.into());
        self
    }

    pub fn subdivision(mut self, subdivision: impl Into<String>) -> Self {
        self.address.subdivision = Some(subdivision.into());
        self
    }

    pub fn build(self) -> PostalAddress {
        self.address
    }
}

/// Builder for invoice lines.
///
/// The line net amount is computed on `build()` from quantity, price, base
/// quantity and line allowances/charges unless set with [`Self::line_total`].
pub struct LineBuilder {
    line: InvoiceLine,
    explicit_total: Option<Decimal>,
}

impl LineBuilder {
    pub fn new(
        id: impl Into<String>,
        item_name: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        net_price: Decimal,
    ) -> Self {
        Self {
            line: InvoiceLine {
                id: id.into(),
                item_name: item_name.into(),
                quantity,
                quantity_presence: Presence::Present,
                unit: unit.into(),
                net_price,
                net_price_presence: Presence::Present,
                tax_category: Some(TaxCategory::StandardRate),
                tax_rate: Decimal::new(19, 0),
                ..Default::default()
            },
            explicit_total: None,
        }
    }

    pub fn tax(mut self, category: TaxCategory, rate: Decimal) -> Self {
        self.line.tax_category = Some(category);
        self.line.tax_rate = rate;
        self
    }

    /// Gross price (BT-148); the price discount (BT-147) becomes gross minus net.
    pub fn gross_price(mut self, price: Decimal) -> Self {
        self.line.gross_price = Some(price);
        self.line.price_allowance = price
            .checked_sub(self.line.net_price)
            .filter(|discount| !discount.is_zero());
        self
    }

    pub fn base_quantity(mut self, quantity: Decimal, unit: impl Into<String>) -> Self {
        self.line.base_quantity = Some(quantity);
        self.line.base_quantity_unit = Some(unit.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.line.note = Some(note.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.line.description = Some(desc.into());
        self
    }

    pub fn seller_item_id(mut self, id: impl Into<String>) -> Self {
        self.line.seller_item_id = Some(id.into());
        self
    }

    pub fn buyer_item_id(mut self, id: impl Into<String>) -> Self {
        self.line.buyer_item_id = Some(id.into());
        self
    }

    pub fn global_id(mut self, id: impl Into<String>, scheme: impl Into<String>) -> Self {
        self.line.global_id = Some(Identifier::with_scheme(id, scheme));
        self
    }

    pub fn characteristic(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.line.characteristics.push(ItemAttribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn classification(mut self, code: impl Into<String>, list_id: impl Into<String>) -> Self {
        self.line.classifications.push(Classification {
            code: code.into(),
            list_id: Some(list_id.into()),
            list_version: None,
        });
        self
    }

    pub fn origin_country(mut self, country: impl Into<String>) -> Self {
        self.line.origin_country = Some(country.into());
        self
    }

    pub fn billing_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.line.billing_period = Some(Period {
            start: Some(start),
            end: Some(end),
        });
        self
    }

    pub fn order_line_reference(mut self, reference: impl Into<String>) -> Self {
        self.line.order_line_reference = Some(reference.into());
        self
    }

    pub fn accounting_reference(mut self, reference: impl Into<String>) -> Self {
        self.line.accounting_reference = Some(reference.into());
        self
    }

    pub fn add_allowance(mut self, allowance: AllowanceCharge) -> Self {
        self.line.allowances_charges.push(AllowanceCharge {
            is_charge: false,
            ..allowance
        });
        self
    }

    pub fn add_charge(mut self, charge: AllowanceCharge) -> Self {
        self.line.allowances_charges.push(AllowanceCharge {
            is_charge: true,
            ..charge
        });
        self
    }

    /// Set the line net amount (BT-131) instead of computing it.
    pub fn line_total(mut self, total: Decimal) -> Self {
        self.explicit_total = Some(total);
        self
    }

    /// Finish the line. Without an explicit total the net amount is
    /// computed; if that overflows the total is marked absent (BR-24).
    pub fn build(self) -> InvoiceLine {
        let mut line = self.line;
        let total = self.explicit_total.or_else(|| line_net_amount(&line));
        line.line_total = total.unwrap_or_default();
        line.line_total_presence = Presence::of(total.is_some());
        line
    }
}
