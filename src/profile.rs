//! Profiles, their specification identifiers (BT-24) and the profile level
//! each optional field needs before a writer emits it.

use serde::{Deserialize, Serialize};

use crate::core::SchemaType;

/// Pure EN 16931.
pub const EN16931_URN: &str = "urn:cen.eu:en16931:2017";

/// PEPPOL BIS Billing 3.0 specification identifier.
pub const PEPPOL_URN: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0";

/// XRechnung 3.0 specification identifier.
pub const XRECHNUNG_URN: &str =
    "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0";

/// Every XRechnung specification identifier accepted (2.0 up to 3.0).
pub const XRECHNUNG_URNS: &[&str] = &[
    "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.0",
    "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.1",
    "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.2",
    "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_2.3",
    "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0",
    "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.0#conformant#urn:xoev-de:kosit:extension:xrechnung_2.0",
    "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.1#conformant#urn:xoev-de:kosit:extension:xrechnung_2.1",
    "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.2#conformant#urn:xoev-de:kosit:extension:xrechnung_2.2",
    "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_2.3#conformant#urn:xeinkauf.de:kosit:extension:xrechnung_2.3",
    "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0#conformant#urn:xeinkauf.de:kosit:extension:xrechnung_3.0",
];

/// Specification identifiers with a fixed profile. Order matters only for
/// [`Profile::urn`], which returns the first match.
const KNOWN_URNS: &[(&str, Profile)] = &[
    ("urn:factur-x.eu:1p0:minimum", Profile::Minimum),
    ("urn:factur-x.eu:1p0:basicwl", Profile::BasicWl),
    (
        "urn:cen.eu:en16931:2017#compliant#urn:factur-x.eu:1p0:basic",
        Profile::Basic,
    ),
    (EN16931_URN, Profile::EN16931),
    (
        "urn:cen.eu:en16931:2017#conformant#urn:factur-x.eu:1p0:extended",
        Profile::Extended,
    ),
    (PEPPOL_URN, Profile::Peppol),
    (XRECHNUNG_URN, Profile::XRechnung),
    ("urn:zugferd.de:2p0:minimum", Profile::Minimum),
    ("urn:zugferd.de:2p0:basicwl", Profile::BasicWl),
    (
        "urn:cen.eu:en16931:2017#compliant#urn:zugferd.de:2p0:basic",
        Profile::Basic,
    ),
    (
        "urn:cen.eu:en16931:2017#conformant#urn:zugferd.de:2p0:extended",
        Profile::Extended,
    ),
];

/// Named conformance profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    /// Factur-X / ZUGFeRD Minimum: header and totals only.
    Minimum,
    /// Factur-X / ZUGFeRD Basic WL: document level data without lines.
    BasicWl,
    /// Factur-X / ZUGFeRD Basic: with simplified lines.
    Basic,
    /// Full EN 16931.
    EN16931,
    /// PEPPOL BIS Billing 3.0.
    Peppol,
    /// XRechnung (German public sector).
    XRechnung,
    /// Factur-X / ZUGFeRD Extended.
    Extended,
}

/// Ordered profile level. PEPPOL and XRechnung sit at [`ProfileLevel::En16931`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProfileLevel {
    Minimum,
    BasicWithoutLines,
    Basic,
    En16931,
    Extended,
}

impl Profile {
    /// Canonical specification identifier (BT-24).
    pub fn urn(&self) -> &'static str {
        KNOWN_URNS
            .iter()
            .find(|(_, profile)| profile == self)
            .map_or(EN16931_URN, |(urn, _)| *urn)
    }

    pub fn level(&self) -> ProfileLevel {
        match self {
            Self::Minimum => ProfileLevel::Minimum,
            Self::BasicWl => ProfileLevel::BasicWithoutLines,
            Self::Basic => ProfileLevel::Basic,
            Self::EN16931 | Self::Peppol | Self::XRechnung => ProfileLevel::En16931,
            Self::Extended => ProfileLevel::Extended,
        }
    }

    /// Classify a specification identifier. Exact identifiers first, then
    /// the profile keyword the identifier ends with.
    pub fn from_urn(urn: &str) -> Option<Self> {
        let urn = urn.trim();
        if let Some((_, profile)) = KNOWN_URNS.iter().find(|(known, _)| *known == urn) {
            return Some(*profile);
        }
        if is_xrechnung(urn) {
            return Some(Self::XRechnung);
        }
        let lower = urn.to_ascii_lowercase();
        if lower.contains("peppol") {
            Some(Self::Peppol)
        } else if lower.contains("extended") {
            Some(Self::Extended)
        } else if lower.contains("basicwl") {
            Some(Self::BasicWl)
        } else if lower.contains("minimum") {
            Some(Self::Minimum)
        } else if lower.contains("basic") {
            Some(Self::Basic)
        } else if lower.contains("en16931") {
            Some(Self::EN16931)
        } else {
            None
        }
    }
}

/// Level a writer emits at for this specification identifier. Unknown
/// identifiers emit everything the model holds.
pub fn level_for_urn(urn: &str) -> ProfileLevel {
    Profile::from_urn(urn).map_or(ProfileLevel::Extended, |p| p.level())
}

/// EN 16931 compliance: the identifier names EN 16931, Factur-X or ZUGFeRD.
pub fn is_en16931(urn: &str) -> bool {
    let lower = urn.to_ascii_lowercase();
    ["en16931", "factur-x", "zugferd"]
        .iter()
        .any(|token| lower.contains(token))
}

pub fn is_peppol(urn: &str) -> bool {
    urn.trim() == PEPPOL_URN
}

pub fn is_xrechnung(urn: &str) -> bool {
    XRECHNUNG_URNS.contains(&urn.trim())
}

/// Optional content the writers gate by profile level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Notes,
    BusinessProcess,
    SellerElectronicAddress,
    SellerTradingName,
    SellerContact,
    BuyerPostalAddress,
    BuyerElectronicAddress,
    BuyerTradingName,
    BuyerContact,
    Payee,
    TaxRepresentative,
    ShipTo,
    ActualDeliveryDate,
    BillingPeriod,
    ContractReference,
    PrecedingInvoices,
    Attachments,
    TaxCurrency,
    PaymentReference,
    CreditorReference,
    PaymentMeans,
    PaymentCard,
    PaymentTerms,
    DocumentAllowancesCharges,
    TaxBreakdown,
    TaxPointDate,
    LineTotalAmount,
    AllowanceChargeTotals,
    PrepaidAndRounding,
    TaxTotalAccounting,
    Lines,
    LineNote,
    LineGlobalId,
    LineItemDetails,
    LineCharacteristics,
    LineClassifications,
    LineOrigin,
    LineOrderReference,
    LineAccountingReference,
    LineBillingPeriod,
    LineAllowancesCharges,
    GrossPrice,
    BaseQuantity,
}

use Field::*;
use ProfileLevel::{Basic, BasicWithoutLines as BasicWl, En16931, Minimum};
use SchemaType::{Cii, Ubl};

/// Minimum level per (field, syntax). A pair without a row is emitted at
/// every level.
static FIELD_LEVELS: &[(Field, SchemaType, ProfileLevel)] = &[
    (Notes, Cii, BasicWl),
    (Notes, Ubl, BasicWl),
    (BusinessProcess, Cii, Minimum),
    (BusinessProcess, Ubl, Minimum),
    (SellerElectronicAddress, Cii, BasicWl),
    (SellerElectronicAddress, Ubl, BasicWl),
    (SellerTradingName, Cii, BasicWl),
    (SellerTradingName, Ubl, BasicWl),
    (SellerContact, Cii, En16931),
    (SellerContact, Ubl, En16931),
    (BuyerPostalAddress, Cii, BasicWl),
    (BuyerPostalAddress, Ubl, BasicWl),
    (BuyerElectronicAddress, Cii, BasicWl),
    (BuyerElectronicAddress, Ubl, BasicWl),
    (BuyerTradingName, Cii, En16931),
    (BuyerTradingName, Ubl, En16931),
    (BuyerContact, Cii, En16931),
    (BuyerContact, Ubl, En16931),
    (Payee, Cii, BasicWl),
    (Payee, Ubl, BasicWl),
    (TaxRepresentative, Cii, BasicWl),
    (TaxRepresentative, Ubl, BasicWl),
    (ShipTo, Cii, BasicWl),
    (ShipTo, Ubl, BasicWl),
    (ActualDeliveryDate, Cii, BasicWl),
    (ActualDeliveryDate, Ubl, BasicWl),
    (BillingPeriod, Cii, BasicWl),
    (BillingPeriod, Ubl, BasicWl),
    (ContractReference, Cii, BasicWl),
    (ContractReference, Ubl, BasicWl),
    (PrecedingInvoices, Cii, BasicWl),
    (PrecedingInvoices, Ubl, BasicWl),
    (Attachments, Cii, En16931),
    (Attachments, Ubl, En16931),
    (TaxCurrency, Cii, BasicWl),
    (TaxCurrency, Ubl, BasicWl),
    (PaymentReference, Cii, BasicWl),
    (PaymentReference, Ubl, BasicWl),
    (CreditorReference, Cii, BasicWl),
    (CreditorReference, Ubl, BasicWl),
    (PaymentMeans, Cii, BasicWl),
    (PaymentMeans, Ubl, BasicWl),
    (PaymentCard, Cii, En16931),
    (PaymentCard, Ubl, En16931),
    (PaymentTerms, Cii, BasicWl),
    (PaymentTerms, Ubl, BasicWl),
    (DocumentAllowancesCharges, Cii, BasicWl),
    (DocumentAllowancesCharges, Ubl, BasicWl),
    // UBL requires a TaxTotal, the line net sum and at least one line.
    (TaxBreakdown, Cii, BasicWl),
    (TaxBreakdown, Ubl, Minimum),
    (TaxPointDate, Cii, BasicWl),
    (TaxPointDate, Ubl, BasicWl),
    (LineTotalAmount, Cii, BasicWl),
    (LineTotalAmount, Ubl, Minimum),
    (AllowanceChargeTotals, Cii, BasicWl),
    (AllowanceChargeTotals, Ubl, BasicWl),
    (PrepaidAndRounding, Cii, BasicWl),
    (PrepaidAndRounding, Ubl, BasicWl),
    (TaxTotalAccounting, Cii, BasicWl),
    (TaxTotalAccounting, Ubl, BasicWl),
    (Lines, Cii, Basic),
    (Lines, Ubl, Minimum),
    (LineNote, Cii, Basic),
    (LineNote, Ubl, Basic),
    (LineGlobalId, Cii, Basic),
    (LineGlobalId, Ubl, Basic),
    (LineItemDetails, Cii, En16931),
    (LineItemDetails, Ubl, En16931),
    (LineCharacteristics, Cii, En16931),
    (LineCharacteristics, Ubl, En16931),
    (LineClassifications, Cii, En16931),
    (LineClassifications, Ubl, En16931),
    (LineOrigin, Cii, En16931),
    (LineOrigin, Ubl, En16931),
    (LineOrderReference, Cii, En16931),
    (LineOrderReference, Ubl, En16931),
    (LineAccountingReference, Cii, En16931),
    (LineAccountingReference, Ubl, En16931),
    (LineBillingPeriod, Cii, En16931),
    (LineBillingPeriod, Ubl, En16931),
    (LineAllowancesCharges, Cii, Basic),
    (LineAllowancesCharges, Ubl, Basic),
    (GrossPrice, Cii, Basic),
    (GrossPrice, Ubl, Basic),
    (BaseQuantity, Cii, Basic),
    (BaseQuantity, Ubl, Basic),
];

/// Minimum level at which `field` is emitted in `syntax`.
pub fn min_level(field: Field, syntax: SchemaType) -> ProfileLevel {
    FIELD_LEVELS
        .iter()
        .find(|(f, s, _)| *f == field && *s == syntax)
        .map_or(Minimum, |(_, _, level)| *level)
}

/// Whether a writer for `syntax` at `level` emits `field`.
pub fn emits(field: Field, syntax: SchemaType, level: ProfileLevel) -> bool {
    level >= min_level(field, syntax)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(ProfileLevel::Minimum < ProfileLevel::BasicWithoutLines);
        assert!(ProfileLevel::Basic < ProfileLevel::En16931);
        assert_eq!(Profile::Peppol.level(), Profile::XRechnung.level());
        assert!(Profile::Extended.level() > Profile::EN16931.level());
    }

    #[test]
    fn classifies_known_urns() {
        assert_eq!(Profile::from_urn(PEPPOL_URN), Some(Profile::Peppol));
        assert_eq!(Profile::from_urn(XRECHNUNG_URN), Some(Profile::XRechnung));
        assert_eq!(
            Profile::from_urn("urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.1"),
            Some(Profile::XRechnung)
        );
        assert_eq!(
            Profile::from_urn("urn:factur-x.eu:1p0:minimum"),
            Some(Profile::Minimum)
        );
        assert_eq!(
            Profile::from_urn("urn:cen.eu:en16931:2017#conformant#urn:zugferd.de:2p0:extended"),
            Some(Profile::Extended)
        );
        assert_eq!(Profile::from_urn(EN16931_URN), Some(Profile::EN16931));
        assert_eq!(Profile::from_urn("urn:example:custom"), None);
    }

    #[test]
    fn urn_round_trips_through_classifier() {
        for profile in [
            Profile::Minimum,
            Profile::BasicWl,
            Profile::Basic,
            Profile::EN16931,
            Profile::Peppol,
            Profile::XRechnung,
            Profile::Extended,
        ] {
            assert_eq!(Profile::from_urn(profile.urn()), Some(profile));
        }
    }

    #[test]
    fn compliance_predicates() {
        assert!(is_en16931("urn:cen.eu:en16931:2017"));
        assert!(is_en16931("urn:factur-x.eu:1p0:minimum"));
        assert!(is_en16931("urn:zugferd.de:2p0:basicwl"));
        assert!(!is_en16931("urn:example:custom"));
        assert!(is_peppol(PEPPOL_URN));
        assert!(!is_peppol(EN16931_URN));
        assert!(is_xrechnung(XRECHNUNG_URN));
        assert!(!is_xrechnung(PEPPOL_URN));
    }

    #[test]
    fn gating_table() {
        assert!(!emits(Field::BuyerPostalAddress, Cii, ProfileLevel::Minimum));
        assert!(emits(Field::BuyerPostalAddress, Cii, ProfileLevel::BasicWithoutLines));
        assert!(emits(Field::ActualDeliveryDate, Ubl, ProfileLevel::BasicWithoutLines));
        assert!(!emits(Field::Lines, Cii, ProfileLevel::BasicWithoutLines));
        assert!(emits(Field::Lines, Cii, ProfileLevel::Basic));
        assert!(emits(Field::Lines, Ubl, ProfileLevel::Minimum));
        assert!(emits(Field::Attachments, Cii, ProfileLevel::Extended));
        assert!(emits(Field::SellerTradingName, Ubl, ProfileLevel::Basic));
        assert!(!emits(Field::BuyerTradingName, Ubl, ProfileLevel::Basic));
        assert!(emits(Field::BuyerTradingName, Cii, ProfileLevel::En16931));
    }

    #[test]
    fn every_field_has_a_row_per_syntax() {
        let fields: Vec<Field> = FIELD_LEVELS.iter().map(|(f, _, _)| *f).collect();
        for field in &fields {
            for syntax in [Cii, Ubl] {
                assert_eq!(
                    FIELD_LEVELS
                        .iter()
                        .filter(|(f, s, _)| f == field && *s == syntax)
                        .count(),
                    1,
                    "{field:?} {syntax:?}"
                );
            }
        }
    }
}
