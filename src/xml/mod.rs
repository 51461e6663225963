//! CII and UBL bindings of the semantic model.
//!
//! [`parse`] detects the syntax from the root element namespace and reads
//! either vocabulary into the same [`Invoice`]. [`write`] serializes back,
//! in the syntax the invoice came from unless [`WriteOptions`] says
//! otherwise, emitting only the optional content the profile level of the
//! specification identifier (BT-24) allows.
//!
//! ```
//! use einvoice::SchemaType;
//! use einvoice::xml::{self, WriteOptions};
//!
//! let xml = r#"<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
//!     xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
//!   <cbc:ID>RE-1</cbc:ID>
//!   <cbc:IssueDate>2024-06-15</cbc:IssueDate>
//! </Invoice>"#;
//! let invoice = xml::parse(xml.as_bytes()).unwrap();
//! assert_eq!(invoice.number, "RE-1");
//! assert_eq!(invoice.schema_type, SchemaType::Ubl);
//!
//! let mut cii = Vec::new();
//! xml::write_with(&invoice, &mut cii, &WriteOptions::default().syntax(SchemaType::Cii)).unwrap();
//! assert!(String::from_utf8(cii).unwrap().contains("rsm:CrossIndustryInvoice"));
//! ```

mod cii;
mod ubl;
mod xml_utils;

use std::io::Write;

use tracing::debug;

use crate::core::{CurrencyAmount, Invoice, InvoiceError, SchemaType, TaxCategory};
use crate::profile::{self, Field, ProfileLevel};
use xml_utils::{Element, ns};

/// Output settings for [`write_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Syntax used when the invoice's schema tag is [`SchemaType::Unknown`].
    pub default_syntax: Option<SchemaType>,
    /// Syntax forced regardless of the schema tag.
    pub syntax: Option<SchemaType>,
    /// Profile level overriding the one derived from BT-24.
    pub profile: Option<ProfileLevel>,
    /// Spaces per nesting level; 0 writes compact output.
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            default_syntax: None,
            syntax: None,
            profile: None,
            indent: 2,
        }
    }
}

impl WriteOptions {
    pub fn default_syntax(mut self, syntax: SchemaType) -> Self {
        self.default_syntax = Some(syntax);
        self
    }

    pub fn syntax(mut self, syntax: SchemaType) -> Self {
        self.syntax = Some(syntax);
        self
    }

    pub fn profile(mut self, level: ProfileLevel) -> Self {
        self.profile = Some(level);
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Profile gate of one write: which optional content to emit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Gate {
    syntax: SchemaType,
    level: ProfileLevel,
}

impl Gate {
    pub fn emits(&self, field: Field) -> bool {
        profile::emits(field, self.syntax, self.level)
    }

    /// Party content to emit for `role`. Payee, tax representative and
    /// deliver-to are gated as a whole by the caller.
    pub fn party(&self, role: Role) -> PartyGate {
        match role {
            Role::Seller => PartyGate {
                address: true,
                contact: self.emits(Field::SellerContact),
                electronic_address: self.emits(Field::SellerElectronicAddress),
                trading_name: self.emits(Field::SellerTradingName),
            },
            Role::Buyer => PartyGate {
                address: self.emits(Field::BuyerPostalAddress),
                contact: self.emits(Field::BuyerContact),
                electronic_address: self.emits(Field::BuyerElectronicAddress),
                trading_name: self.emits(Field::BuyerTradingName),
            },
            Role::Other => PartyGate {
                address: true,
                contact: true,
                electronic_address: true,
                trading_name: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Seller,
    Buyer,
    Other,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PartyGate {
    pub address: bool,
    pub contact: bool,
    pub electronic_address: bool,
    pub trading_name: bool,
}

/// VAT category from its code; unknown codes are logged and dropped.
pub(crate) fn category_from(code: Option<String>) -> Option<TaxCategory> {
    let code = code?;
    let category = TaxCategory::from_code(&code);
    if category.is_none() {
        debug!(code = %code, "unrecognized VAT category code");
    }
    category
}

/// Non-blank content of an optional text field.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Record an amount whose currency is neither the invoice nor the VAT
/// accounting currency.
pub(crate) fn unexpected_currency(
    invoice: &mut Invoice,
    element: &str,
    amount: rust_decimal::Decimal,
    currency: &str,
) {
    debug!(element, %amount, currency, "amount with unexpected currency");
    invoice.unexpected_currency_amounts.push(CurrencyAmount {
        element: element.to_string(),
        amount,
        currency: currency.to_string(),
    });
}

/// Parse a CII or UBL document.
pub fn parse(bytes: &[u8]) -> Result<Invoice, InvoiceError> {
    parse_as(bytes, None)
}

/// Parse a document that must be CII.
pub fn from_cii_xml(xml: &str) -> Result<Invoice, InvoiceError> {
    parse_as(xml.as_bytes(), Some(SchemaType::Cii))
}

/// Parse a document that must be UBL (`Invoice` or `CreditNote`).
pub fn from_ubl_xml(xml: &str) -> Result<Invoice, InvoiceError> {
    parse_as(xml.as_bytes(), Some(SchemaType::Ubl))
}

fn parse_as(bytes: &[u8], expected: Option<SchemaType>) -> Result<Invoice, InvoiceError> {
    let root = Element::parse(bytes)?;
    let syntax = detect(&root)?;
    if expected.is_some_and(|e| e != syntax) {
        return Err(InvoiceError::UnknownSyntax(root.namespace.clone()));
    }

    let mut invoice = match syntax {
        SchemaType::Cii => cii::read(&root)?,
        _ => ubl::read(&root)?,
    };
    invoice.schema_type = syntax;
    invoice.parsed = true;
    debug!(
        number = %invoice.number,
        lines = invoice.lines.len(),
        ?syntax,
        "parsed invoice"
    );
    Ok(invoice)
}

fn detect(root: &Element) -> Result<SchemaType, InvoiceError> {
    let syntax = match root.namespace.as_str() {
        ns::RSM if root.name == "CrossIndustryInvoice" => SchemaType::Cii,
        ns::UBL_INVOICE if root.name == "Invoice" => SchemaType::Ubl,
        ns::UBL_CREDIT_NOTE if root.name == "CreditNote" => SchemaType::Ubl,
        "" => return Err(InvoiceError::UnknownSyntax("<none>".to_string())),
        other => return Err(InvoiceError::UnknownSyntax(other.to_string())),
    };
    debug!(namespace = %root.namespace, root = %root.name, ?syntax, "detected syntax");
    Ok(syntax)
}

/// Write `invoice` with [`WriteOptions::default`].
pub fn write<W: Write>(invoice: &Invoice, sink: W) -> Result<(), InvoiceError> {
    write_with(invoice, sink, &WriteOptions::default())
}

/// Write `invoice` to `sink`.
///
/// The syntax is `options.syntax`, else the invoice's schema tag, else
/// `options.default_syntax`; [`InvoiceError::UnsupportedSyntax`] when none
/// of them names CII or UBL.
pub fn write_with<W: Write>(
    invoice: &Invoice,
    sink: W,
    options: &WriteOptions,
) -> Result<(), InvoiceError> {
    let syntax = options
        .syntax
        .or(match invoice.schema_type {
            SchemaType::Unknown => options.default_syntax,
            tagged => Some(tagged),
        })
        .unwrap_or(SchemaType::Unknown);
    let level = options
        .profile
        .unwrap_or_else(|| profile::level_for_urn(&invoice.specification_id));
    debug!(?syntax, ?level, number = %invoice.number, "writing invoice");

    let gate = Gate { syntax, level };
    match syntax {
        SchemaType::Cii => cii::write(invoice, sink, gate, options.indent),
        SchemaType::Ubl => ubl::write(invoice, sink, gate, options.indent),
        SchemaType::Unknown => Err(InvoiceError::UnsupportedSyntax(invoice.schema_type)),
    }
}

/// CII document as a string.
pub fn to_cii_xml(invoice: &Invoice) -> Result<String, InvoiceError> {
    to_string(invoice, SchemaType::Cii)
}

/// UBL document (`Invoice` or `CreditNote` by type code) as a string.
pub fn to_ubl_xml(invoice: &Invoice) -> Result<String, InvoiceError> {
    to_string(invoice, SchemaType::Ubl)
}

fn to_string(invoice: &Invoice, syntax: SchemaType) -> Result<String, InvoiceError> {
    let mut buf = Vec::new();
    write_with(invoice, &mut buf, &WriteOptions::default().syntax(syntax))?;
    String::from_utf8(buf).map_err(|e| InvoiceError::Io(std::io::Error::other(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_root_namespace_is_rejected() {
        let err = parse(b"<Invoice xmlns=\"urn:example\"/>").unwrap_err();
        assert!(matches!(err, InvoiceError::UnknownSyntax(ref ns) if ns == "urn:example"));
        let err = parse(b"<Invoice/>").unwrap_err();
        assert!(matches!(err, InvoiceError::UnknownSyntax(ref ns) if ns == "<none>"));
    }

    #[test]
    fn untagged_invoice_needs_a_syntax() {
        let invoice = Invoice::default();
        let err = write(&invoice, Vec::new()).unwrap_err();
        assert!(matches!(err, InvoiceError::UnsupportedSyntax(SchemaType::Unknown)));

        let mut out = Vec::new();
        let options = WriteOptions::default().default_syntax(SchemaType::Ubl).indent(0);
        write_with(&invoice, &mut out, &options).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("<Invoice xmlns="));
        assert!(!text.contains("\n"));
    }

    #[test]
    fn typed_parse_checks_the_syntax() {
        let ubl = "<Invoice xmlns=\"urn:oasis:names:specification:ubl:schema:xsd:Invoice-2\"/>";
        assert!(from_ubl_xml(ubl).is_ok());
        assert!(matches!(from_cii_xml(ubl), Err(InvoiceError::UnknownSyntax(_))));
    }
}
