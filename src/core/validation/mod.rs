//! Business-rule validation.
//!
//! Families run in a fixed order: core (BR-*), calculation (BR-CO-*),
//! decimal precision (BR-DEC-*), one VAT category family per category in
//! use, then PEPPOL and XRechnung when the specification identifier asks for
//! them, then country rules keyed by the seller's country.

mod calculation;
mod core_rules;
mod decimals;
mod vat_categories;

use std::fmt;

use tracing::{debug, trace};

use super::error::{ValidationError, Violation};
use super::rules::Rule;
use super::types::Invoice;
use crate::profile;

/// Violations and warnings collected during one validation pass.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub violations: Vec<Violation>,
    pub warnings: Vec<Violation>,
}

impl Findings {
    pub fn violation(&mut self, rule: &'static Rule, message: impl fmt::Display) {
        self.violations.push(Violation::new(rule, message));
    }

    pub fn warning(&mut self, rule: &'static Rule, message: impl fmt::Display) {
        self.warnings.push(Violation::new(rule, message));
    }
}

/// Validate an invoice against every applicable rule family.
///
/// Previous findings on the invoice are discarded first. Violations fail
/// the call; warnings are kept on the invoice (see [`Invoice::warnings`])
/// and copied into the error when there is one.
///
/// A parsed invoice whose specification identifier names neither EN 16931,
/// Factur-X nor ZUGFeRD is accepted without running any family.
pub fn validate(invoice: &mut Invoice) -> Result<(), ValidationError> {
    invoice.violations.clear();
    invoice.warnings.clear();

    let urn = invoice.specification_id.clone();
    if invoice.parsed && !profile::is_en16931(&urn) {
        debug!(urn = %urn, "specification identifier is not EN 16931, skipping rules");
        return Ok(());
    }

    let mut findings = Findings::default();
    trace!("running core rules");
    core_rules::check(invoice, &mut findings);
    trace!("running BR-CO rules");
    calculation::check(invoice, &mut findings);
    trace!("running BR-DEC rules");
    decimals::check(invoice, &mut findings);
    trace!("running VAT category rules");
    vat_categories::check(invoice, &mut findings);

    #[cfg(feature = "peppol")]
    if profile::is_peppol(&urn) {
        crate::peppol::check(invoice, &mut findings);
    }

    let xrechnung = profile::is_xrechnung(&urn);
    #[cfg(feature = "xrechnung")]
    if xrechnung {
        crate::xrechnung::check(invoice, &mut findings);
    }

    country_rules(invoice, xrechnung, &mut findings);

    debug!(
        number = %invoice.number,
        peppol = profile::is_peppol(&urn),
        xrechnung,
        violations = findings.violations.len(),
        warnings = findings.warnings.len(),
        "validation finished"
    );

    invoice.violations = findings.violations;
    invoice.warnings = findings.warnings;
    if invoice.violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(
            invoice.violations.clone(),
            invoice.warnings.clone(),
        ))
    }
}

/// Rules keyed by the seller's country. Only Germany has a family so far.
fn country_rules(invoice: &Invoice, xrechnung: bool, findings: &mut Findings) {
    match invoice.seller.country_code() {
        #[cfg(feature = "xrechnung")]
        Some("DE") => crate::xrechnung::check_germany(invoice, xrechnung, findings),
        _ => {
            let _ = (xrechnung, findings);
        }
    }
}

/// `true` when the string is absent or only whitespace.
pub(crate) fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
