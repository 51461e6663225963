//! Peppol BIS Billing 3.0 rules.
//!
//! Peppol BIS 3.0 is a CIUS of EN 16931: the same UBL and CII documents
//! with stricter rules (`PEPPOL-EN16931-R*`). The family runs from
//! [`crate::validate`] whenever the specification identifier (BT-24) equals
//! [`PEPPOL_CUSTOMIZATION_ID`].
//!
//! # Example
//!
//! ```
//! use einvoice::peppol;
//!
//! assert!(peppol::is_business_process("urn:fdc:peppol.eu:2017:poacc:billing:01:1.0"));
//! assert!(!peppol::is_business_process("urn:fdc:peppol.eu:2017:poacc:billing:1:1.0"));
//! ```

mod validate;

pub(crate) use validate::check;

/// Peppol BIS Billing 3.0 customization identifier (BT-24).
pub const PEPPOL_CUSTOMIZATION_ID: &str = crate::profile::PEPPOL_URN;

/// Peppol BIS Billing 3.0 profile identifier (BT-23) for the billing process.
pub const PEPPOL_PROFILE_ID: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";

/// Peppol document type identifier for invoices (used in SMP routing).
pub const PEPPOL_INVOICE_DOCTYPE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2::Invoice##urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0::2.1";

/// Peppol document type identifier for credit notes (used in SMP routing).
pub const PEPPOL_CREDIT_NOTE_DOCTYPE: &str = "urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2::CreditNote##urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0::2.1";

/// Whether a business process identifier (BT-23) has the form
/// `urn:fdc:peppol.eu:2017:poacc:billing:NN:1.0` with a two-digit `NN`.
pub fn is_business_process(value: &str) -> bool {
    let Some(rest) = value
        .trim()
        .strip_prefix("urn:fdc:peppol.eu:2017:poacc:billing:")
    else {
        return false;
    };
    match rest.strip_suffix(":1.0") {
        Some(number) => number.len() == 2 && number.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_process_shape() {
        assert!(is_business_process(PEPPOL_PROFILE_ID));
        assert!(is_business_process("urn:fdc:peppol.eu:2017:poacc:billing:12:1.0"));
        assert!(!is_business_process("urn:fdc:peppol.eu:2017:poacc:billing:01:2.0"));
        assert!(!is_business_process("urn:fdc:peppol.eu:2017:poacc:billing:AB:1.0"));
        assert!(!is_business_process("billing:01:1.0"));
        assert!(!is_business_process(""));
    }
}
