//! Vocabulary adapter shared by the CII and UBL bindings: a
//! namespace-resolved element tree addressed with `prefix:Name/prefix:Name`
//! paths, and an indenting writer.

use std::io::Write;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::{NsReader, Writer};
use rust_decimal::Decimal;

use crate::core::InvoiceError;

pub(crate) mod ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UBL_INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const UBL_CREDIT_NOTE: &str = "urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
}

/// Prefixes usable in lookup paths. Document prefixes are irrelevant: the
/// tree holds resolved namespace URIs.
const PREFIXES: &[(&str, &str)] = &[
    ("rsm", ns::RSM),
    ("ram", ns::RAM),
    ("udt", ns::UDT),
    ("qdt", ns::QDT),
    ("cac", ns::CAC),
    ("cbc", ns::CBC),
    ("inv", ns::UBL_INVOICE),
    ("cn", ns::UBL_CREDIT_NOTE),
];

fn malformed(err: impl std::fmt::Display) -> InvoiceError {
    InvoiceError::MalformedXml(err.to_string())
}

/// One element with its namespace resolved, attributes (namespace
/// declarations dropped), accumulated text and children in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub namespace: String,
    pub name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Read a whole document into a tree.
    pub fn parse(bytes: &[u8]) -> Result<Element, InvoiceError> {
        let mut reader = NsReader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        loop {
            let (resolved, event) = reader.read_resolved_event().map_err(malformed)?;
            match event {
                Event::Start(start) => stack.push(open(&resolved, &start)?),
                Event::Empty(start) => {
                    let element = open(&resolved, &start)?;
                    close(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed("closing tag without an open element"))?;
                    close(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text.unescape().map_err(malformed)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(std::str::from_utf8(&data).map_err(malformed)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = stack.last() {
            return Err(malformed(format!("element <{}> is not closed", unclosed.name)));
        }
        root.ok_or_else(|| malformed("document has no root element"))
    }

    /// Trimmed text content.
    pub fn value(&self) -> &str {
        self.text.trim()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn is(&self, qname: &str) -> bool {
        let (prefix, local) = qname.split_once(':').unwrap_or(("", qname));
        let namespace = PREFIXES
            .iter()
            .find(|(p, _)| *p == prefix)
            .map_or("", |(_, uri)| *uri);
        self.name == local && self.namespace == namespace
    }

    /// Direct children named `qname`.
    pub fn children<'a>(&'a self, qname: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.is(qname))
    }

    pub fn child(&self, qname: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(qname))
    }

    /// Every element reached by `path`, in document order.
    pub fn all(&self, path: &str) -> Vec<&Element> {
        let mut current = vec![self];
        for step in path.split('/') {
            current = current
                .into_iter()
                .flat_map(|e| e.children.iter().filter(move |c| c.is(step)))
                .collect();
        }
        current
    }

    pub fn find(&self, path: &str) -> Option<&Element> {
        self.all(path).into_iter().next()
    }

    /// Trimmed text at `path`; `None` when absent or blank.
    pub fn text(&self, path: &str) -> Option<String> {
        self.find(path)
            .map(Element::value)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// Decimal at `path`; `field` names the business term in errors.
    pub fn decimal(&self, path: &str, field: &str) -> Result<Option<Decimal>, InvoiceError> {
        self.find(path)
            .map(|e| parse_decimal(e.value(), field))
            .transpose()
    }
}

fn open(resolved: &ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Element, InvoiceError> {
    let namespace = match resolved {
        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.0).into_owned(),
        ResolveResult::Unbound => String::new(),
        ResolveResult::Unknown(prefix) => {
            return Err(malformed(format!(
                "unknown namespace prefix '{}'",
                String::from_utf8_lossy(prefix)
            )));
        }
    };
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(malformed)?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        namespace,
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn close(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), InvoiceError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(malformed("more than one root element")),
    }
    Ok(())
}

/// Decimal literal, citing `field` on failure.
pub(crate) fn parse_decimal(text: &str, field: &str) -> Result<Decimal, InvoiceError> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed).map_err(|_| InvoiceError::InvalidDecimal {
        field: field.to_string(),
        value: trimmed.to_string(),
    })
}

/// Numeric code list value (UNTDID 1001, 4461), citing `field` on failure.
pub(crate) fn parse_code(text: &str, field: &str) -> Result<u16, InvoiceError> {
    let trimmed = text.trim();
    trimmed.parse().map_err(|_| InvoiceError::InvalidDecimal {
        field: field.to_string(),
        value: trimmed.to_string(),
    })
}

/// Decode base64 element text; line breaks and blanks are ignored.
pub(crate) fn decode_binary(text: &str, field: &str) -> Result<Vec<u8>, InvoiceError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| InvoiceError::InvalidAttachment {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

pub(crate) fn encode_binary(content: &[u8]) -> String {
    STANDARD.encode(content)
}

/// Monetary amount: at least two fractional digits, longer scales kept.
pub(crate) fn format_amount(amount: Decimal) -> String {
    if amount.scale() < 2 {
        let mut padded = amount;
        padded.rescale(2);
        padded.to_string()
    } else {
        amount.to_string()
    }
}

/// Price, quantity or percentage: trailing zeros stripped, at least two
/// fractional digits.
pub(crate) fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    match s.find('.') {
        Some(dot) if s.len() - dot - 1 >= 2 => s,
        Some(dot) => format!("{s}{}", "0".repeat(2 - (s.len() - dot - 1))),
        None => format!("{s}.00"),
    }
}

/// Indenting XML writer over any sink.
pub(crate) struct XmlWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlWriter<W> {
    /// Start a document with an XML declaration. `indent` 0 writes compact output.
    pub fn new(sink: W, indent: usize) -> Result<Self, InvoiceError> {
        let mut writer = if indent == 0 {
            Writer::new(sink)
        } else {
            Writer::new_with_indent(sink, b' ', indent)
        };
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, InvoiceError> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, InvoiceError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer.write_event(Event::Start(elem))?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, InvoiceError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, InvoiceError> {
        self.text_element_with_attrs(name, text, &[])
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, InvoiceError> {
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))?;
        self.end_element(name)
    }

    /// Text element only when `text` is set and not blank.
    pub fn optional_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, InvoiceError> {
        match text.filter(|t| !t.trim().is_empty()) {
            Some(text) => self.text_element(name, text),
            None => Ok(self),
        }
    }

    /// Identifier element with an optional `schemeID`.
    pub fn id_element(
        &mut self,
        name: &str,
        id: &str,
        scheme: Option<&str>,
    ) -> Result<&mut Self, InvoiceError> {
        match scheme {
            Some(scheme) => self.text_element_with_attrs(name, id, &[("schemeID", scheme)]),
            None => self.text_element(name, id),
        }
    }

    /// Monetary amount with a `currencyID` attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<&mut Self, InvoiceError> {
        self.text_element_with_attrs(name, &format_amount(amount), &[("currencyID", currency)])
    }

    /// Monetary amount without a currency attribute (CII).
    pub fn plain_amount_element(
        &mut self,
        name: &str,
        amount: Decimal,
    ) -> Result<&mut Self, InvoiceError> {
        self.text_element(name, &format_amount(amount))
    }

    pub fn decimal_element(&mut self, name: &str, value: Decimal) -> Result<&mut Self, InvoiceError> {
        self.text_element(name, &format_decimal(value))
    }

    /// Quantity with a `unitCode` attribute.
    pub fn quantity_element(
        &mut self,
        name: &str,
        qty: Decimal,
        unit: &str,
    ) -> Result<&mut Self, InvoiceError> {
        if unit.is_empty() {
            return self.decimal_element(name, qty);
        }
        self.text_element_with_attrs(name, &format_decimal(qty), &[("unitCode", unit)])
    }
}
