use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::Violation;

/// Wire syntax an invoice was read from, or should be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaType {
    /// Built in code; no input provenance.
    #[default]
    Unknown,
    /// UN/CEFACT Cross Industry Invoice.
    Cii,
    /// OASIS UBL 2.1 Invoice or CreditNote.
    Ubl,
}

/// Whether an amount element was present in the source document.
///
/// EN 16931 distinguishes an absent amount from a zero amount for a few
/// terms. Parsers record `Present` or `Absent`; values built in code default
/// to `Inferred`. For the document totals, line net amount and net price an
/// inferred value counts as present iff it is non-zero; quantities,
/// allowance/charge amounts and VAT breakdown amounts are only missing when
/// recorded `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Presence {
    #[default]
    Inferred,
    Present,
    Absent,
}

impl Presence {
    pub fn of(present: bool) -> Self {
        if present { Self::Present } else { Self::Absent }
    }

    pub fn is_absent(self) -> bool {
        self == Self::Absent
    }

    /// Resolve against the amount the flag shadows.
    pub fn resolve(self, value: Decimal) -> bool {
        match self {
            Self::Inferred => !value.is_zero(),
            Self::Present => true,
            Self::Absent => false,
        }
    }
}

/// An EN 16931 invoice (or credit note), independent of wire syntax.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Invoice {
    /// BT-1: Invoice number.
    pub number: String,
    /// BT-3: Invoice type code (UNTDID 1001).
    pub type_code: Option<InvoiceTypeCode>,
    /// BT-2: Issue date.
    pub issue_date: Option<NaiveDate>,
    /// BT-5: Invoice currency code (ISO 4217).
    pub currency: String,
    /// BT-6: VAT accounting currency code.
    pub tax_currency: Option<String>,
    /// BT-24: Specification identifier.
    pub specification_id: String,
    /// BT-23: Business process type.
    pub business_process: Option<String>,
    /// BT-10: Buyer reference (Leitweg-ID for XRechnung).
    pub buyer_reference: Option<String>,
    /// BT-13: Purchase order reference.
    pub order_reference: Option<String>,
    /// BT-12: Contract reference.
    pub contract_reference: Option<String>,
    /// BG-3: Preceding invoice references.
    pub preceding_invoices: Vec<PrecedingInvoice>,
    /// BG-1: Invoice notes.
    pub notes: Vec<Note>,
    /// BG-4: Seller.
    pub seller: Party,
    /// BG-7: Buyer.
    pub buyer: Party,
    /// BG-10: Payee, if different from the seller.
    pub payee: Option<Party>,
    /// BG-11: Seller tax representative.
    pub tax_representative: Option<Party>,
    /// BG-13/BG-15: Deliver-to party and address.
    pub ship_to: Option<Party>,
    /// BG-14: Invoicing period.
    pub billing_period: Option<Period>,
    /// BT-72: Actual delivery date.
    pub delivery_date: Option<NaiveDate>,
    /// BG-25: Invoice lines.
    pub lines: Vec<InvoiceLine>,
    /// BG-20/BG-21: Document level allowances and charges, in document order.
    pub allowances_charges: Vec<AllowanceCharge>,
    /// BG-23: VAT breakdown, one entry per (category, rate).
    pub trade_taxes: Vec<TradeTax>,
    /// BG-22: Document totals.
    pub totals: MonetarySummation,
    /// BG-16: Payment instructions.
    pub payment_means: Vec<PaymentMeans>,
    /// BT-20/BT-9/BT-89: Payment terms.
    pub payment_terms: Vec<PaymentTerms>,
    /// BT-83: Remittance information.
    pub payment_reference: Option<String>,
    /// BT-90: Bank assigned creditor identifier.
    pub creditor_reference: Option<String>,
    /// BG-24: Additional supporting documents.
    pub attachments: Vec<ReferencedDocument>,
    /// Syntax the invoice was parsed from; also the default output syntax.
    pub schema_type: SchemaType,

    #[serde(skip)]
    pub(crate) parsed: bool,
    #[serde(skip)]
    pub(crate) violations: Vec<Violation>,
    #[serde(skip)]
    pub(crate) warnings: Vec<Violation>,
    #[serde(skip)]
    pub(crate) unexpected_currency_amounts: Vec<CurrencyAmount>,
}

impl Invoice {
    /// Violations recorded by the last validation pass.
    pub fn violations(&self) -> Vec<Violation> {
        self.violations.clone()
    }

    /// Warnings recorded by the last validation pass.
    pub fn warnings(&self) -> Vec<Violation> {
        self.warnings.clone()
    }

    /// Amounts the parser found with a currency that is neither the invoice
    /// currency nor the VAT accounting currency.
    pub fn unexpected_currency_amounts(&self) -> Vec<CurrencyAmount> {
        self.unexpected_currency_amounts.clone()
    }

    /// Whether the invoice came out of a parser rather than code.
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Document level allowances (BG-20).
    pub fn allowances(&self) -> impl Iterator<Item = &AllowanceCharge> {
        self.allowances_charges.iter().filter(|ac| !ac.is_charge)
    }

    /// Document level charges (BG-21).
    pub fn charges(&self) -> impl Iterator<Item = &AllowanceCharge> {
        self.allowances_charges.iter().filter(|ac| ac.is_charge)
    }

    /// Payment due date (BT-9), taken from the first payment term carrying one.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.payment_terms.iter().find_map(|t| t.due_date)
    }

    /// Every VAT category used on lines, document level allowances/charges
    /// or in the breakdown, in code order.
    pub fn tax_categories(&self) -> Vec<TaxCategory> {
        let mut categories: Vec<TaxCategory> = self
            .lines
            .iter()
            .filter_map(|l| l.tax_category)
            .chain(self.allowances_charges.iter().filter_map(|ac| ac.tax_category))
            .chain(self.trade_taxes.iter().filter_map(|t| t.category))
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}

/// An amount the parser could not attribute to a known currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    /// Element the amount was read from.
    pub element: String,
    pub amount: Decimal,
    pub currency: String,
}

/// BG-3: Preceding invoice reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrecedingInvoice {
    /// BT-25
    pub id: String,
    /// BT-26
    pub issue_date: Option<NaiveDate>,
}

/// BG-1: Invoice note.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Note {
    /// BT-21: Subject code (UNTDID 4451), e.g. `AAI`.
    pub subject_code: Option<String>,
    /// BT-22
    pub text: String,
}

/// A trading party: seller, buyer, payee, tax representative or deliver-to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Party {
    /// BT-27/BT-44/BT-59/BT-62/BT-70: Name.
    pub name: String,
    /// BT-29/BT-46/BT-60/BT-71: Identifiers, free or schemed.
    pub ids: Vec<Identifier>,
    /// BT-30/BT-47/BT-61 and BT-28/BT-45: Legal registration and trading name.
    pub legal_organization: Option<LegalOrganization>,
    /// BG-5/BG-8/BG-12/BG-15: Postal address.
    pub address: Option<PostalAddress>,
    /// BT-34/BT-49: Electronic address.
    pub electronic_address: Option<ElectronicAddress>,
    /// BT-31/BT-48/BT-63: VAT identifier.
    pub vat_id: Option<String>,
    /// BT-32: Tax registration identifier (local tax number).
    pub tax_registration_id: Option<String>,
    /// BG-6/BG-9: Contact.
    pub contact: Option<Contact>,
}

impl Party {
    /// Country code of the postal address, if any.
    pub fn country_code(&self) -> Option<&str> {
        self.address
            .as_ref()
            .map(|a| a.country_code.as_str())
            .filter(|c| !c.is_empty())
    }
}

/// An identifier with an optional scheme (ISO 6523 ICD or similar).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identifier {
    pub id: String,
    pub scheme: Option<String>,
}

impl Identifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scheme: None,
        }
    }

    pub fn with_scheme(id: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scheme: Some(scheme.into()),
        }
    }
}

/// Legal organization of a party.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegalOrganization {
    /// BT-30/BT-47/BT-61: Legal registration identifier.
    pub id: Option<String>,
    pub scheme: Option<String>,
    /// BT-28/BT-45: Trading name.
    pub trading_name: Option<String>,
}

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostalAddress {
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
    pub postcode: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub city: Option<String>,
    pub subdivision: Option<String>,
}

/// Contact information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Electronic address (e.g. Peppol participant ID).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElectronicAddress {
    pub uri: String,
    /// EAS scheme, e.g. `EM` for email, `0088` for GLN, `9930` for German VAT.
    pub scheme: Option<String>,
}

/// BG-14/BG-26: A period with optional ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// BG-25: Invoice line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// BT-126
    pub id: String,
    /// BT-127
    pub note: Option<String>,
    /// BT-153
    pub item_name: String,
    /// BT-154
    pub description: Option<String>,
    /// BT-155
    pub seller_item_id: Option<String>,
    /// BT-156
    pub buyer_item_id: Option<String>,
    /// BT-157: Standard identifier (e.g. GTIN with scheme 0160).
    pub global_id: Option<Identifier>,
    /// BG-32: Item attributes.
    pub characteristics: Vec<ItemAttribute>,
    /// BT-158: Item classifications.
    pub classifications: Vec<Classification>,
    /// BT-159
    pub origin_country: Option<String>,
    /// BT-148: Gross price.
    pub gross_price: Option<Decimal>,
    /// BT-147: Price discount (gross minus net).
    pub price_allowance: Option<Decimal>,
    /// BT-146: Net price.
    pub net_price: Decimal,
    pub net_price_presence: Presence,
    /// BT-149: Price base quantity.
    pub base_quantity: Option<Decimal>,
    /// BT-150: Unit of the base quantity.
    pub base_quantity_unit: Option<String>,
    /// BT-129: Invoiced quantity.
    pub quantity: Decimal,
    pub quantity_presence: Presence,
    /// BT-130: UN/ECE Rec 20 unit code.
    pub unit: String,
    /// BT-131: Line net amount.
    pub line_total: Decimal,
    pub line_total_presence: Presence,
    /// BT-151
    pub tax_category: Option<TaxCategory>,
    /// BT-152
    pub tax_rate: Decimal,
    /// BG-27/BG-28: Line level allowances and charges.
    pub allowances_charges: Vec<AllowanceCharge>,
    /// BG-26
    pub billing_period: Option<Period>,
    /// BT-132: Referenced purchase order line.
    pub order_line_reference: Option<String>,
    /// BT-133: Buyer accounting reference.
    pub accounting_reference: Option<String>,
}

impl InvoiceLine {
    pub fn allowances(&self) -> impl Iterator<Item = &AllowanceCharge> {
        self.allowances_charges.iter().filter(|ac| !ac.is_charge)
    }

    pub fn charges(&self) -> impl Iterator<Item = &AllowanceCharge> {
        self.allowances_charges.iter().filter(|ac| ac.is_charge)
    }
}

/// BG-32: Item attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemAttribute {
    pub name: String,
    pub value: String,
}

/// BT-158: Item classification code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classification {
    pub code: String,
    /// UNTDID 7143 list id, e.g. `STI`.
    pub list_id: Option<String>,
    pub list_version: Option<String>,
}

/// Allowance (discount) or charge (surcharge), on document or line level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllowanceCharge {
    /// `true` for a charge, `false` for an allowance.
    pub is_charge: bool,
    /// BT-94/BT-101/BT-138/BT-143
    pub percent: Option<Decimal>,
    /// BT-93/BT-100/BT-137/BT-142
    pub basis_amount: Option<Decimal>,
    /// BT-92/BT-99/BT-136/BT-141
    pub amount: Decimal,
    pub amount_presence: Presence,
    /// BT-98/BT-105/BT-140/BT-145: UNTDID 5189 (allowances) or 7161 (charges).
    pub reason_code: Option<String>,
    /// BT-97/BT-104/BT-139/BT-144
    pub reason: Option<String>,
    /// BT-95/BT-102: VAT category (document level only).
    pub tax_category: Option<TaxCategory>,
    /// BT-96/BT-103: VAT rate (document level only).
    pub tax_rate: Decimal,
}

/// BG-23: VAT breakdown entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TradeTax {
    /// Tax type; always `VAT` for EN 16931.
    pub type_code: String,
    /// BT-118
    pub category: Option<TaxCategory>,
    /// BT-119
    pub rate: Decimal,
    pub rate_presence: Presence,
    /// BT-116
    pub basis_amount: Decimal,
    pub basis_presence: Presence,
    /// BT-117
    pub calculated_amount: Decimal,
    pub calculated_presence: Presence,
    /// BT-120
    pub exemption_reason: Option<String>,
    /// BT-121: VATEX code.
    pub exemption_reason_code: Option<String>,
    /// BT-7
    pub tax_point_date: Option<NaiveDate>,
    /// BT-8: UNTDID 2005 code.
    pub due_date_type_code: Option<String>,
}

/// BG-22: Document totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonetarySummation {
    /// BT-106
    pub line_total: Decimal,
    /// BT-107
    pub allowance_total: Decimal,
    /// BT-108
    pub charge_total: Decimal,
    /// BT-109
    pub tax_basis_total: Decimal,
    /// BT-110
    pub tax_total: Decimal,
    /// BT-111: Tax total in the VAT accounting currency.
    pub tax_total_accounting: Option<Decimal>,
    /// BT-112
    pub grand_total: Decimal,
    /// BT-113
    pub prepaid: Decimal,
    /// BT-114
    pub rounding: Decimal,
    /// BT-115
    pub due_payable: Decimal,
    pub presence: SummationPresence,
}

/// Presence flags for the amounts of [`MonetarySummation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummationPresence {
    pub line_total: Presence,
    pub allowance_total: Presence,
    pub charge_total: Presence,
    pub tax_basis_total: Presence,
    pub tax_total: Presence,
    pub grand_total: Presence,
    pub prepaid: Presence,
    pub rounding: Presence,
    pub due_payable: Presence,
}

/// BG-16: Payment instructions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentMeans {
    /// BT-81
    pub type_code: Option<PaymentMeansCode>,
    /// BT-82
    pub information: Option<String>,
    /// BG-17: Credit transfer account.
    pub payee_account: Option<FinancialAccount>,
    /// BG-18: Payment card.
    pub card: Option<PaymentCard>,
    /// BT-91: Debited account (direct debit).
    pub payer_account: Option<String>,
}

/// BG-17: Payee financial account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FinancialAccount {
    /// BT-84 as IBAN.
    pub iban: Option<String>,
    /// BT-84 as proprietary account number.
    pub proprietary_id: Option<String>,
    /// BT-85
    pub name: Option<String>,
    /// BT-86
    pub bic: Option<String>,
}

impl FinancialAccount {
    /// BT-84, whichever form is present.
    pub fn account_id(&self) -> Option<&str> {
        self.iban
            .as_deref()
            .or(self.proprietary_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }
}

/// BG-18: Payment card information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentCard {
    /// BT-87: Primary account number (masked).
    pub account_number: String,
    /// Card network, UBL only.
    pub network_id: Option<String>,
    /// BT-88
    pub holder: Option<String>,
}

/// Payment terms.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentTerms {
    /// BT-20
    pub description: Option<String>,
    /// BT-9
    pub due_date: Option<NaiveDate>,
    /// BT-89
    pub direct_debit_mandate_id: Option<String>,
}

/// BG-24: Additional supporting document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReferencedDocument {
    /// BT-122
    pub id: String,
    /// UNTDID 1001 code: 916 supporting document, 50 tender, 130 invoiced object.
    pub type_code: Option<String>,
    /// BT-123
    pub description: Option<String>,
    /// BT-124: External location.
    pub uri: Option<String>,
    /// BT-125: Embedded binary.
    pub attachment: Option<BinaryObject>,
}

/// BT-125: Embedded binary object, already base64-decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BinaryObject {
    pub content: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

/// VAT category code (UNTDID 5305 subset used by EN 16931).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    /// S — Standard rate.
    StandardRate,
    /// Z — Zero rated goods.
    ZeroRated,
    /// E — Exempt from tax.
    Exempt,
    /// AE — VAT reverse charge.
    ReverseCharge,
    /// K — Intra-community supply.
    IntraCommunitySupply,
    /// G — Free export item, VAT not charged.
    Export,
    /// O — Services outside scope of tax.
    NotSubjectToVat,
    /// L — Canary Islands general indirect tax (IGIC).
    CanaryIslands,
    /// M — Tax for production, services and importation in Ceuta and Melilla (IPSI).
    CeutaMelilla,
}

impl TaxCategory {
    pub const ALL: [TaxCategory; 9] = [
        Self::StandardRate,
        Self::ZeroRated,
        Self::Exempt,
        Self::ReverseCharge,
        Self::IntraCommunitySupply,
        Self::Export,
        Self::NotSubjectToVat,
        Self::CanaryIslands,
        Self::CeutaMelilla,
    ];

    /// UNTDID 5305 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StandardRate => "S",
            Self::ZeroRated => "Z",
            Self::Exempt => "E",
            Self::ReverseCharge => "AE",
            Self::IntraCommunitySupply => "K",
            Self::Export => "G",
            Self::NotSubjectToVat => "O",
            Self::CanaryIslands => "L",
            Self::CeutaMelilla => "M",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Categories whose rate is always zero.
    pub fn is_zero_rated(&self) -> bool {
        matches!(
            self,
            Self::ZeroRated
                | Self::Exempt
                | Self::ReverseCharge
                | Self::IntraCommunitySupply
                | Self::Export
                | Self::NotSubjectToVat
        )
    }
}

/// UNTDID 1001 document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceTypeCode {
    /// 380 — Commercial invoice.
    Invoice,
    /// 381 — Credit note.
    CreditNote,
    /// 383 — Debit note.
    DebitNote,
    /// 384 — Corrected invoice.
    Corrected,
    /// 386 — Prepayment invoice.
    Prepayment,
    /// 389 — Self-billed invoice.
    SelfBilled,
    /// 326 — Partial invoice.
    Partial,
    /// Other code value.
    Other(u16),
}

impl InvoiceTypeCode {
    /// UNTDID 1001 numeric code.
    pub fn code(&self) -> u16 {
        match self {
            Self::Invoice => 380,
            Self::CreditNote => 381,
            Self::DebitNote => 383,
            Self::Corrected => 384,
            Self::Prepayment => 386,
            Self::SelfBilled => 389,
            Self::Partial => 326,
            Self::Other(c) => *c,
        }
    }

    /// Parse from UNTDID 1001 numeric code.
    pub fn from_code(code: u16) -> Self {
        match code {
            380 => Self::Invoice,
            381 => Self::CreditNote,
            383 => Self::DebitNote,
            384 => Self::Corrected,
            386 => Self::Prepayment,
            389 => Self::SelfBilled,
            326 => Self::Partial,
            c => Self::Other(c),
        }
    }

    /// Codes carried by a UBL `CreditNote` document rather than an `Invoice`.
    pub fn is_credit_note(&self) -> bool {
        matches!(self.code(), 81 | 83 | 261 | 262 | 296 | 308 | 381 | 396 | 420 | 458 | 532)
    }
}

/// UNTDID 4461 payment means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMeansCode {
    /// 10 — Cash.
    Cash,
    /// 30 — Credit transfer.
    CreditTransfer,
    /// 42 — Payment to bank account.
    PaymentToBankAccount,
    /// 48 — Bank card.
    BankCard,
    /// 49 — Direct debit.
    DirectDebit,
    /// 54 — Credit card.
    CreditCard,
    /// 55 — Debit card.
    DebitCard,
    /// 57 — Standing agreement.
    StandingAgreement,
    /// 58 — SEPA credit transfer.
    SepaCreditTransfer,
    /// 59 — SEPA direct debit.
    SepaDirectDebit,
    /// Other code value.
    Other(u16),
}

impl PaymentMeansCode {
    pub fn code(&self) -> u16 {
        match self {
            Self::Cash => 10,
            Self::CreditTransfer => 30,
            Self::PaymentToBankAccount => 42,
            Self::BankCard => 48,
            Self::DirectDebit => 49,
            Self::CreditCard => 54,
            Self::DebitCard => 55,
            Self::StandingAgreement => 57,
            Self::SepaCreditTransfer => 58,
            Self::SepaDirectDebit => 59,
            Self::Other(c) => *c,
        }
    }

    /// Parse from UNTDID 4461 numeric code.
    pub fn from_code(code: u16) -> Self {
        match code {
            10 => Self::Cash,
            30 => Self::CreditTransfer,
            42 => Self::PaymentToBankAccount,
            48 => Self::BankCard,
            49 => Self::DirectDebit,
            54 => Self::CreditCard,
            55 => Self::DebitCard,
            57 => Self::StandingAgreement,
            58 => Self::SepaCreditTransfer,
            59 => Self::SepaDirectDebit,
            c => Self::Other(c),
        }
    }

    /// Credit transfer codes that require a payee account (30, 58).
    pub fn is_credit_transfer(&self) -> bool {
        matches!(self, Self::CreditTransfer | Self::SepaCreditTransfer)
    }

    /// Card payment codes (48, 54, 55).
    pub fn is_card(&self) -> bool {
        matches!(self, Self::BankCard | Self::CreditCard | Self::DebitCard)
    }

    /// Direct debit codes (49, 59).
    pub fn is_direct_debit(&self) -> bool {
        matches!(self, Self::DirectDebit | Self::SepaDirectDebit)
    }
}
