use std::fmt;

use thiserror::Error;

use super::rules::Rule;
use super::types::SchemaType;

/// Errors that can occur while parsing, building, validating or writing an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// The root element namespace is neither CII nor UBL.
    #[error("unknown syntax: root namespace '{0}' is neither CII nor UBL")]
    UnknownSyntax(String),

    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    MalformedXml(String),

    /// A decimal field carries non-numeric content.
    #[error("invalid decimal '{value}' in {field}")]
    InvalidDecimal { field: String, value: String },

    /// A date field does not match the format of its syntax.
    #[error("invalid date '{value}' in {field}: expected {expected}")]
    InvalidDate {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// An embedded binary object could not be decoded.
    #[error("invalid attachment in {field}: {reason}")]
    InvalidAttachment { field: String, reason: String },

    /// An amount computed from the document left the representable range.
    #[error("arithmetic overflow while computing {0}")]
    Overflow(String),

    /// The writer was asked to emit a syntax it cannot produce.
    #[error("unsupported syntax for writing: {0:?}")]
    UnsupportedSyntax(SchemaType),

    /// The output sink failed.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more business rules failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),
}

/// One business-rule finding: the catalog row it refers to and a message.
///
/// `text` always starts with the bracketed rule code, e.g.
/// `[BR-CO-10] sum of line net amounts 99.00 does not match ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: &'static Rule,
    pub text: String,
}

impl Violation {
    pub fn new(rule: &'static Rule, message: impl fmt::Display) -> Self {
        Self {
            rule,
            text: format!("[{}] {message}", rule.code),
        }
    }

    /// The rule code, e.g. `BR-S-08`.
    pub fn code(&self) -> &'static str {
        self.rule.code
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Result of a failed validation pass.
///
/// Holds copies of the violations and warnings recorded on the invoice, so
/// it stays valid after the invoice is mutated or validated again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<Violation>,
    warnings: Vec<Violation>,
}

impl ValidationError {
    pub(crate) fn new(violations: Vec<Violation>, warnings: Vec<Violation>) -> Self {
        Self {
            violations,
            warnings,
        }
    }

    /// Number of violations (warnings are not counted).
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn warnings(&self) -> &[Violation] {
        &self.warnings
    }

    /// First violation recorded for `code`.
    pub fn get(&self, code: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.rule.code == code)
    }

    /// All violations recorded for `code`, in detection order.
    pub fn by_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.rule.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violations.first() {
            Some(first) => {
                f.write_str(&first.text)?;
                if self.violations.len() > 1 {
                    write!(f, " (and {} more)", self.violations.len() - 1)?;
                }
                Ok(())
            }
            None => f.write_str("validation failed"),
        }
    }
}

impl std::error::Error for ValidationError {}
