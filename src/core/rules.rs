//! Static catalog of the business rules this crate checks.
//!
//! Every row is `(code, affected semantic fields, description)`. Validators
//! refer to rows by their static name (e.g. [`BR_CO_10`]) and never spell a
//! rule code as a string literal, so the catalog is the single place a code
//! or description can change.

/// A single catalog row.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Rule {
    /// Rule identifier including its family prefix, e.g. `BR-CO-10`.
    pub code: &'static str,
    /// Business terms (BT-x) and groups (BG-x) the rule inspects.
    pub fields: &'static [&'static str],
    pub description: &'static str,
}

impl Rule {
    /// Family prefix of the code: `BR-CO` for `BR-CO-10`, `BR` for `BR-01`.
    pub fn family(&self) -> &'static str {
        match self.code.rfind('-') {
            Some(idx) => &self.code[..idx],
            None => self.code,
        }
    }
}

macro_rules! catalog {
    ($($name:ident $code:literal [$($field:literal),*] $desc:literal;)+) => {
        $(
            pub static $name: Rule = Rule {
                code: $code,
                fields: &[$($field),*],
                description: $desc,
            };
        )+

        static CATALOG: &[&Rule] = &[$(&$name),+];
    };
}

/// All rules, in family order.
pub fn catalog() -> &'static [&'static Rule] {
    CATALOG
}

/// Look up a rule by its code.
pub fn lookup(code: &str) -> Option<&'static Rule> {
    CATALOG.iter().copied().find(|rule| rule.code == code)
}

catalog! {
    // Core
    BR_01 "BR-01" ["BT-24"]
        "An Invoice shall have a Specification identifier (BT-24).";
    BR_02 "BR-02" ["BT-1"]
        "An Invoice shall have an Invoice number (BT-1).";
    BR_03 "BR-03" ["BT-2"]
        "An Invoice shall have an Invoice issue date (BT-2).";
    BR_04 "BR-04" ["BT-3"]
        "An Invoice shall have an Invoice type code (BT-3).";
    BR_05 "BR-05" ["BT-5"]
        "An Invoice shall have an Invoice currency code (BT-5).";
    BR_06 "BR-06" ["BT-27"]
        "An Invoice shall contain the Seller name (BT-27).";
    BR_07 "BR-07" ["BT-44"]
        "An Invoice shall contain the Buyer name (BT-44).";
    BR_08 "BR-08" ["BG-5"]
        "An Invoice shall contain the Seller postal address (BG-5).";
    BR_09 "BR-09" ["BT-40"]
        "The Seller postal address (BG-5) shall contain a Seller country code (BT-40).";
    BR_10 "BR-10" ["BG-8"]
        "An Invoice shall contain the Buyer postal address (BG-8).";
    BR_11 "BR-11" ["BT-55"]
        "The Buyer postal address shall contain a Buyer country code (BT-55).";
    BR_12 "BR-12" ["BT-106"]
        "An Invoice shall have the Sum of Invoice line net amount (BT-106).";
    BR_13 "BR-13" ["BT-109"]
        "An Invoice shall have the Invoice total amount without VAT (BT-109).";
    BR_14 "BR-14" ["BT-112"]
        "An Invoice shall have the Invoice total amount with VAT (BT-112).";
    BR_15 "BR-15" ["BT-115"]
        "An Invoice shall have the Amount due for payment (BT-115).";
    BR_16 "BR-16" ["BG-25"]
        "An Invoice shall have at least one Invoice line (BG-25).";
    BR_17 "BR-17" ["BT-59"]
        "The Payee name (BT-59) shall be provided in the Invoice, if the Payee (BG-10) is different from the Seller (BG-4).";
    BR_18 "BR-18" ["BT-62"]
        "The Seller tax representative name (BT-62) shall be provided in the Invoice, if the Seller (BG-4) has a Seller tax representative party (BG-11).";
    BR_19 "BR-19" ["BG-12"]
        "The Seller tax representative postal address (BG-12) shall be provided in the Invoice, if the Seller (BG-4) has a Seller tax representative party (BG-11).";
    BR_20 "BR-20" ["BT-69"]
        "The Seller tax representative postal address (BG-12) shall contain a Tax representative country code (BT-69).";
    BR_21 "BR-21" ["BT-126"]
        "Each Invoice line (BG-25) shall have an Invoice line identifier (BT-126).";
    BR_22 "BR-22" ["BT-129"]
        "Each Invoice line (BG-25) shall have an Invoiced quantity (BT-129).";
    BR_23 "BR-23" ["BT-130"]
        "An Invoice line (BG-25) shall have an Invoiced quantity unit of measure code (BT-130).";
    BR_24 "BR-24" ["BT-131"]
        "Each Invoice line (BG-25) shall have an Invoice line net amount (BT-131).";
    BR_25 "BR-25" ["BT-153"]
        "Each Invoice line (BG-25) shall contain the Item name (BT-153).";
    BR_26 "BR-26" ["BT-146"]
        "Each Invoice line (BG-25) shall contain the Item net price (BT-146).";
    BR_27 "BR-27" ["BT-146"]
        "The Item net price (BT-146) shall NOT be negative.";
    BR_28 "BR-28" ["BT-148"]
        "The Item gross price (BT-148) shall NOT be negative.";
    BR_29 "BR-29" ["BT-73", "BT-74"]
        "If both Invoicing period start date (BT-73) and Invoicing period end date (BT-74) are given then the Invoicing period end date shall be later or equal to the Invoicing period start date.";
    BR_30 "BR-30" ["BT-134", "BT-135"]
        "If both Invoice line period start date (BT-134) and Invoice line period end date (BT-135) are given then the Invoice line period end date shall be later or equal to the Invoice line period start date.";
    BR_31 "BR-31" ["BT-92"]
        "Each Document level allowance (BG-20) shall have a Document level allowance amount (BT-92).";
    BR_32 "BR-32" ["BT-95"]
        "Each Document level allowance (BG-20) shall have a Document level allowance VAT category code (BT-95).";
    BR_36 "BR-36" ["BT-99"]
        "Each Document level charge (BG-21) shall have a Document level charge amount (BT-99).";
    BR_37 "BR-37" ["BT-102"]
        "Each Document level charge (BG-21) shall have a Document level charge VAT category code (BT-102).";
    BR_41 "BR-41" ["BT-136"]
        "Each Invoice line allowance (BG-27) shall have an Invoice line allowance amount (BT-136).";
    BR_43 "BR-43" ["BT-141"]
        "Each Invoice line charge (BG-28) shall have an Invoice line charge amount (BT-141).";
    BR_45 "BR-45" ["BT-116"]
        "Each VAT breakdown (BG-23) shall have a VAT category taxable amount (BT-116).";
    BR_46 "BR-46" ["BT-117"]
        "Each VAT breakdown (BG-23) shall have a VAT category tax amount (BT-117).";
    BR_47 "BR-47" ["BT-118"]
        "Each VAT breakdown (BG-23) shall be defined through a VAT category code (BT-118).";
    BR_48 "BR-48" ["BT-119"]
        "Each VAT breakdown (BG-23) shall have a VAT category rate (BT-119), except if the Invoice is not subject to VAT.";
    BR_49 "BR-49" ["BT-81"]
        "A Payment instruction (BG-16) shall specify the Payment means type code (BT-81).";
    BR_50 "BR-50" ["BT-84"]
        "A Payment account identifier (BT-84) shall be present if Credit transfer (BG-17) information is provided in the Invoice.";
    BR_51 "BR-51" ["BT-87"]
        "In accordance with card payments security standards an invoice should never include a full card primary account number (BT-87). At the moment PCI Security Standards Council has defined that the first 6 digits and last 4 digits are the maximum number of digits to be shown.";
    BR_52 "BR-52" ["BT-122"]
        "Each Additional supporting document (BG-24) shall contain a Supporting document reference (BT-122).";
    BR_53 "BR-53" ["BT-6", "BT-111"]
        "If the VAT accounting currency code (BT-6) is present, then the Invoice total VAT amount in accounting currency (BT-111) shall be provided.";
    BR_54 "BR-54" ["BT-160", "BT-161"]
        "Each Item attribute (BG-32) shall contain an Item attribute name (BT-160) and an Item attribute value (BT-161).";
    BR_55 "BR-55" ["BT-25"]
        "Each Preceding Invoice reference (BG-3) shall contain a Preceding Invoice reference (BT-25).";
    BR_56 "BR-56" ["BT-63"]
        "Each Seller tax representative party (BG-11) shall have a Seller tax representative VAT identifier (BT-63).";
    BR_57 "BR-57" ["BT-80"]
        "Each Deliver to address (BG-15) shall contain a Deliver to country code (BT-80).";
    BR_61 "BR-61" ["BT-81", "BT-84"]
        "If the Payment means type code (BT-81) means SEPA credit transfer, Local credit transfer or Non-SEPA international credit transfer, the Payment account identifier (BT-84) shall be present.";
    BR_62 "BR-62" ["BT-34"]
        "The Seller electronic address (BT-34) shall have a Scheme identifier.";
    BR_63 "BR-63" ["BT-49"]
        "The Buyer electronic address (BT-49) shall have a Scheme identifier.";
    BR_64 "BR-64" ["BT-157"]
        "The Item standard identifier (BT-157) shall have a Scheme identifier.";
    BR_65 "BR-65" ["BT-158"]
        "The Item classification identifier (BT-158) shall have a Scheme identifier.";

    // Calculation
    BR_CO_03 "BR-CO-03" ["BT-7", "BT-8"]
        "Value added tax point date (BT-7) and Value added tax point date code (BT-8) are mutually exclusive.";
    BR_CO_04 "BR-CO-04" ["BT-151"]
        "Each Invoice line (BG-25) shall be categorized with an Invoiced item VAT category code (BT-151).";
    BR_CO_09 "BR-CO-09" ["BT-31", "BT-63", "BT-48"]
        "The Seller VAT identifier (BT-31), the Seller tax representative VAT identifier (BT-63) and the Buyer VAT identifier (BT-48) shall have a prefix in accordance with ISO code ISO 3166-1 alpha-2 by which the country of issue may be identified. Nevertheless, Greece may use the prefix 'EL'.";
    BR_CO_10 "BR-CO-10" ["BT-106", "BT-131"]
        "Sum of Invoice line net amount (BT-106) = Σ Invoice line net amount (BT-131).";
    BR_CO_11 "BR-CO-11" ["BT-107", "BT-92"]
        "Sum of allowances on document level (BT-107) = Σ Document level allowance amount (BT-92).";
    BR_CO_12 "BR-CO-12" ["BT-108", "BT-99"]
        "Sum of charges on document level (BT-108) = Σ Document level charge amount (BT-99).";
    BR_CO_13 "BR-CO-13" ["BT-109", "BT-106", "BT-107", "BT-108"]
        "Invoice total amount without VAT (BT-109) = Σ Invoice line net amount (BT-131) - Sum of allowances on document level (BT-107) + Sum of charges on document level (BT-108).";
    BR_CO_14 "BR-CO-14" ["BT-110", "BT-117"]
        "Invoice total VAT amount (BT-110) = Σ VAT category tax amount (BT-117).";
    BR_CO_15 "BR-CO-15" ["BT-112", "BT-109", "BT-110"]
        "Invoice total amount with VAT (BT-112) = Invoice total amount without VAT (BT-109) + Invoice total VAT amount (BT-110).";
    BR_CO_16 "BR-CO-16" ["BT-115", "BT-112", "BT-113", "BT-114"]
        "Amount due for payment (BT-115) = Invoice total amount with VAT (BT-112) - Paid amount (BT-113) + Rounding amount (BT-114).";
    BR_CO_17 "BR-CO-17" ["BT-117", "BT-116", "BT-119"]
        "VAT category tax amount (BT-117) = VAT category taxable amount (BT-116) x (VAT category rate (BT-119) / 100), rounded to two decimals.";
    BR_CO_18 "BR-CO-18" ["BG-23"]
        "An Invoice shall at least have one VAT breakdown group (BG-23).";
    BR_CO_19 "BR-CO-19" ["BG-14", "BT-73", "BT-74"]
        "If Invoicing period (BG-14) is used, the Invoicing period start date (BT-73) or the Invoicing period end date (BT-74) shall be filled, or both.";
    BR_CO_20 "BR-CO-20" ["BG-26", "BT-134", "BT-135"]
        "If Invoice line period (BG-26) is used, the Invoice line period start date (BT-134) or the Invoice line period end date (BT-135) shall be filled, or both.";
    BR_CO_21 "BR-CO-21" ["BT-97", "BT-98"]
        "Each Document level allowance (BG-20) shall contain a Document level allowance reason (BT-97) or a Document level allowance reason code (BT-98), or both.";
    BR_CO_22 "BR-CO-22" ["BT-104", "BT-105"]
        "Each Document level charge (BG-21) shall contain a Document level charge reason (BT-104) or a Document level charge reason code (BT-105), or both.";
    BR_CO_23 "BR-CO-23" ["BT-139", "BT-140"]
        "Each Invoice line allowance (BG-27) shall contain an Invoice line allowance reason (BT-139) or an Invoice line allowance reason code (BT-140), or both.";
    BR_CO_24 "BR-CO-24" ["BT-144", "BT-145"]
        "Each Invoice line charge (BG-28) shall contain an Invoice line charge reason (BT-144) or an Invoice line charge reason code (BT-145), or both.";
    BR_CO_25 "BR-CO-25" ["BT-115", "BT-9", "BT-20"]
        "In case the Amount due for payment (BT-115) is positive, either the Payment due date (BT-9) or the Payment terms (BT-20) shall be present.";
    BR_CO_26 "BR-CO-26" ["BT-29", "BT-30", "BT-31"]
        "In order for the buyer to automatically identify a supplier, the Seller identifier (BT-29), the Seller legal registration identifier (BT-30) and/or the Seller VAT identifier (BT-31) shall be present.";

    // Decimal precision
    BR_DEC_01 "BR-DEC-01" ["BT-92"]
        "The allowed maximum number of decimals for the Document level allowance amount (BT-92) is 2.";
    BR_DEC_02 "BR-DEC-02" ["BT-93"]
        "The allowed maximum number of decimals for the Document level allowance base amount (BT-93) is 2.";
    BR_DEC_05 "BR-DEC-05" ["BT-99"]
        "The allowed maximum number of decimals for the Document level charge amount (BT-99) is 2.";
    BR_DEC_06 "BR-DEC-06" ["BT-100"]
        "The allowed maximum number of decimals for the Document level charge base amount (BT-100) is 2.";
    BR_DEC_09 "BR-DEC-09" ["BT-106"]
        "The allowed maximum number of decimals for the Sum of Invoice line net amount (BT-106) is 2.";
    BR_DEC_10 "BR-DEC-10" ["BT-107"]
        "The allowed maximum number of decimals for the Sum of allowances on document level (BT-107) is 2.";
    BR_DEC_11 "BR-DEC-11" ["BT-108"]
        "The allowed maximum number of decimals for the Sum of charges on document level (BT-108) is 2.";
    BR_DEC_12 "BR-DEC-12" ["BT-109"]
        "The allowed maximum number of decimals for the Invoice total amount without VAT (BT-109) is 2.";
    BR_DEC_13 "BR-DEC-13" ["BT-110"]
        "The allowed maximum number of decimals for the Invoice total VAT amount (BT-110) is 2.";
    BR_DEC_14 "BR-DEC-14" ["BT-112"]
        "The allowed maximum number of decimals for the Invoice total amount with VAT (BT-112) is 2.";
    BR_DEC_15 "BR-DEC-15" ["BT-111"]
        "The allowed maximum number of decimals for the Invoice total VAT amount in accounting currency (BT-111) is 2.";
    BR_DEC_16 "BR-DEC-16" ["BT-113"]
        "The allowed maximum number of decimals for the Paid amount (BT-113) is 2.";
    BR_DEC_17 "BR-DEC-17" ["BT-114"]
        "The allowed maximum number of decimals for the Rounding amount (BT-114) is 2.";
    BR_DEC_18 "BR-DEC-18" ["BT-115"]
        "The allowed maximum number of decimals for the Amount due for payment (BT-115) is 2.";
    BR_DEC_19 "BR-DEC-19" ["BT-116"]
        "The allowed maximum number of decimals for the VAT category taxable amount (BT-116) is 2.";
    BR_DEC_20 "BR-DEC-20" ["BT-117"]
        "The allowed maximum number of decimals for the VAT category tax amount (BT-117) is 2.";
    BR_DEC_23 "BR-DEC-23" ["BT-131"]
        "The allowed maximum number of decimals for the Invoice line net amount (BT-131) is 2.";
    BR_DEC_24 "BR-DEC-24" ["BT-136"]
        "The allowed maximum number of decimals for the Invoice line allowance amount (BT-136) is 2.";
    BR_DEC_25 "BR-DEC-25" ["BT-137"]
        "The allowed maximum number of decimals for the Invoice line allowance base amount (BT-137) is 2.";
    BR_DEC_27 "BR-DEC-27" ["BT-141"]
        "The allowed maximum number of decimals for the Invoice line charge amount (BT-141) is 2.";
    BR_DEC_28 "BR-DEC-28" ["BT-142"]
        "The allowed maximum number of decimals for the Invoice line charge base amount (BT-142) is 2.";

    // Standard rated (S)
    BR_S_01 "BR-S-01" ["BG-23", "BT-118", "BT-151", "BT-95", "BT-102"]
        "An Invoice that contains an Invoice line, a document level allowance or a document level charge where the VAT category code is 'Standard rated' (S) shall contain at least one VAT breakdown (BG-23) with the VAT category code (BT-118) equal to 'Standard rated' (S).";
    BR_S_02 "BR-S-02" ["BT-151", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Standard rated' (S): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_S_03 "BR-S-03" ["BT-95", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level allowance (BG-20) where the VAT category code (BT-95) is 'Standard rated' (S): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_S_04 "BR-S-04" ["BT-102", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level charge (BG-21) where the VAT category code (BT-102) is 'Standard rated' (S): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_S_05 "BR-S-05" ["BT-151", "BT-152"]
        "In an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Standard rated' (S) the Invoiced item VAT rate (BT-152) shall be greater than zero.";
    BR_S_06 "BR-S-06" ["BT-95", "BT-96"]
        "In a document level allowance (BG-20) where the VAT category code (BT-95) is 'Standard rated' (S) the Document level allowance VAT rate (BT-96) shall be greater than zero.";
    BR_S_07 "BR-S-07" ["BT-102", "BT-103"]
        "In a document level charge (BG-21) where the VAT category code (BT-102) is 'Standard rated' (S) the Document level charge VAT rate (BT-103) shall be greater than zero.";
    BR_S_08 "BR-S-08" ["BT-116", "BT-131", "BT-92", "BT-99"]
        "In a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Standard rated' (S) the VAT category taxable amount (BT-116) shall equal the sum of Invoice line net amounts (BT-131) minus the sum of document level allowance amounts (BT-92) plus the sum of document level charge amounts (BT-99) where the VAT category codes are 'Standard rated' (S).";
    BR_S_09 "BR-S-09" ["BT-117", "BT-116", "BT-119"]
        "The VAT category tax amount (BT-117) in a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Standard rated' (S) shall equal the VAT category taxable amount multiplied by the VAT category rate, rounded to two decimals.";
    BR_S_10 "BR-S-10" ["BT-118", "BT-120", "BT-121"]
        "A VAT breakdown (BG-23) with VAT category code (BT-118) 'Standard rated' (S) shall not have a VAT exemption reason code (BT-121) or VAT exemption reason text (BT-120).";

    // Zero rated (Z)
    BR_Z_01 "BR-Z-01" ["BG-23", "BT-118", "BT-151", "BT-95", "BT-102"]
        "An Invoice that contains an Invoice line, a document level allowance or a document level charge where the VAT category code is 'Zero rated' (Z) shall contain at least one VAT breakdown (BG-23) with the VAT category code (BT-118) equal to 'Zero rated' (Z).";
    BR_Z_02 "BR-Z-02" ["BT-151", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Zero rated' (Z): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_Z_03 "BR-Z-03" ["BT-95", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level allowance (BG-20) where the VAT category code (BT-95) is 'Zero rated' (Z): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_Z_04 "BR-Z-04" ["BT-102", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level charge (BG-21) where the VAT category code (BT-102) is 'Zero rated' (Z): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_Z_05 "BR-Z-05" ["BT-151", "BT-152"]
        "In an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Zero rated' (Z) the Invoiced item VAT rate (BT-152) shall be 0 (zero).";
    BR_Z_06 "BR-Z-06" ["BT-95", "BT-96"]
        "In a document level allowance (BG-20) where the VAT category code (BT-95) is 'Zero rated' (Z) the Document level allowance VAT rate (BT-96) shall be 0 (zero).";
    BR_Z_07 "BR-Z-07" ["BT-102", "BT-103"]
        "In a document level charge (BG-21) where the VAT category code (BT-102) is 'Zero rated' (Z) the Document level charge VAT rate (BT-103) shall be 0 (zero).";
    BR_Z_08 "BR-Z-08" ["BT-116", "BT-131", "BT-92", "BT-99"]
        "In a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Zero rated' (Z) the VAT category taxable amount (BT-116) shall equal the sum of Invoice line net amounts (BT-131) minus the sum of document level allowance amounts (BT-92) plus the sum of document level charge amounts (BT-99) where the VAT category codes are 'Zero rated' (Z).";
    BR_Z_09 "BR-Z-09" ["BT-117", "BT-116", "BT-119"]
        "The VAT category tax amount (BT-117) in a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Zero rated' (Z) shall equal 0 (zero).";
    BR_Z_10 "BR-Z-10" ["BT-118", "BT-120", "BT-121"]
        "A VAT breakdown (BG-23) with VAT category code (BT-118) 'Zero rated' (Z) shall not have a VAT exemption reason code (BT-121) or VAT exemption reason text (BT-120).";

    // Exempt from VAT (E)
    BR_E_01 "BR-E-01" ["BG-23", "BT-118", "BT-151", "BT-95", "BT-102"]
        "An Invoice that contains an Invoice line, a document level allowance or a document level charge where the VAT category code is 'Exempt from VAT' (E) shall contain at least one VAT breakdown (BG-23) with the VAT category code (BT-118) equal to 'Exempt from VAT' (E).";
    BR_E_02 "BR-E-02" ["BT-151", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Exempt from VAT' (E): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_E_03 "BR-E-03" ["BT-95", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level allowance (BG-20) where the VAT category code (BT-95) is 'Exempt from VAT' (E): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_E_04 "BR-E-04" ["BT-102", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level charge (BG-21) where the VAT category code (BT-102) is 'Exempt from VAT' (E): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_E_05 "BR-E-05" ["BT-151", "BT-152"]
        "In an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Exempt from VAT' (E) the Invoiced item VAT rate (BT-152) shall be 0 (zero).";
    BR_E_06 "BR-E-06" ["BT-95", "BT-96"]
        "In a document level allowance (BG-20) where the VAT category code (BT-95) is 'Exempt from VAT' (E) the Document level allowance VAT rate (BT-96) shall be 0 (zero).";
    BR_E_07 "BR-E-07" ["BT-102", "BT-103"]
        "In a document level charge (BG-21) where the VAT category code (BT-102) is 'Exempt from VAT' (E) the Document level charge VAT rate (BT-103) shall be 0 (zero).";
    BR_E_08 "BR-E-08" ["BT-116", "BT-131", "BT-92", "BT-99"]
        "In a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Exempt from VAT' (E) the VAT category taxable amount (BT-116) shall equal the sum of Invoice line net amounts (BT-131) minus the sum of document level allowance amounts (BT-92) plus the sum of document level charge amounts (BT-99) where the VAT category codes are 'Exempt from VAT' (E).";
    BR_E_09 "BR-E-09" ["BT-117", "BT-116", "BT-119"]
        "The VAT category tax amount (BT-117) in a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Exempt from VAT' (E) shall equal 0 (zero).";
    BR_E_10 "BR-E-10" ["BT-118", "BT-120", "BT-121"]
        "A VAT breakdown (BG-23) with VAT category code (BT-118) 'Exempt from VAT' (E) shall have a VAT exemption reason code (BT-121) or a VAT exemption reason text (BT-120).";

    // Reverse charge (AE)
    BR_AE_01 "BR-AE-01" ["BG-23", "BT-118", "BT-151", "BT-95", "BT-102"]
        "An Invoice that contains an Invoice line, a document level allowance or a document level charge where the VAT category code is 'Reverse charge' (AE) shall contain at least one VAT breakdown (BG-23) with the VAT category code (BT-118) equal to 'Reverse charge' (AE).";
    BR_AE_02 "BR-AE-02" ["BT-151", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Reverse charge' (AE): the Seller VAT identifier (BT-31) and/or the Seller tax representative VAT identifier (BT-63), and the Buyer VAT identifier (BT-48) and/or the Buyer legal registration identifier (BT-47) shall be present.";
    BR_AE_03 "BR-AE-03" ["BT-95", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level allowance (BG-20) where the VAT category code (BT-95) is 'Reverse charge' (AE): the Seller VAT identifier (BT-31) and/or the Seller tax representative VAT identifier (BT-63), and the Buyer VAT identifier (BT-48) and/or the Buyer legal registration identifier (BT-47) shall be present.";
    BR_AE_04 "BR-AE-04" ["BT-102", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level charge (BG-21) where the VAT category code (BT-102) is 'Reverse charge' (AE): the Seller VAT identifier (BT-31) and/or the Seller tax representative VAT identifier (BT-63), and the Buyer VAT identifier (BT-48) and/or the Buyer legal registration identifier (BT-47) shall be present.";
    BR_AE_05 "BR-AE-05" ["BT-151", "BT-152"]
        "In an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Reverse charge' (AE) the Invoiced item VAT rate (BT-152) shall be 0 (zero).";
    BR_AE_06 "BR-AE-06" ["BT-95", "BT-96"]
        "In a document level allowance (BG-20) where the VAT category code (BT-95) is 'Reverse charge' (AE) the Document level allowance VAT rate (BT-96) shall be 0 (zero).";
    BR_AE_07 "BR-AE-07" ["BT-102", "BT-103"]
        "In a document level charge (BG-21) where the VAT category code (BT-102) is 'Reverse charge' (AE) the Document level charge VAT rate (BT-103) shall be 0 (zero).";
    BR_AE_08 "BR-AE-08" ["BT-116", "BT-131", "BT-92", "BT-99"]
        "In a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Reverse charge' (AE) the VAT category taxable amount (BT-116) shall equal the sum of Invoice line net amounts (BT-131) minus the sum of document level allowance amounts (BT-92) plus the sum of document level charge amounts (BT-99) where the VAT category codes are 'Reverse charge' (AE).";
    BR_AE_09 "BR-AE-09" ["BT-117", "BT-116", "BT-119"]
        "The VAT category tax amount (BT-117) in a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Reverse charge' (AE) shall equal 0 (zero).";
    BR_AE_10 "BR-AE-10" ["BT-118", "BT-120", "BT-121"]
        "A VAT breakdown (BG-23) with VAT category code (BT-118) 'Reverse charge' (AE) shall have a VAT exemption reason code (BT-121) or a VAT exemption reason text (BT-120).";

    // Intra-community supply (K)
    BR_IC_01 "BR-IC-01" ["BG-23", "BT-118", "BT-151", "BT-95", "BT-102"]
        "An Invoice that contains an Invoice line, a document level allowance or a document level charge where the VAT category code is 'Intra-community supply' (K) shall contain at least one VAT breakdown (BG-23) with the VAT category code (BT-118) equal to 'Intra-community supply' (K).";
    BR_IC_02 "BR-IC-02" ["BT-151", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Intra-community supply' (K): the Seller VAT identifier (BT-31) and/or the Seller tax representative VAT identifier (BT-63), and the Buyer VAT identifier (BT-48) shall be present.";
    BR_IC_03 "BR-IC-03" ["BT-95", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level allowance (BG-20) where the VAT category code (BT-95) is 'Intra-community supply' (K): the Seller VAT identifier (BT-31) and/or the Seller tax representative VAT identifier (BT-63), and the Buyer VAT identifier (BT-48) shall be present.";
    BR_IC_04 "BR-IC-04" ["BT-102", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level charge (BG-21) where the VAT category code (BT-102) is 'Intra-community supply' (K): the Seller VAT identifier (BT-31) and/or the Seller tax representative VAT identifier (BT-63), and the Buyer VAT identifier (BT-48) shall be present.";
    BR_IC_05 "BR-IC-05" ["BT-151", "BT-152"]
        "In an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Intra-community supply' (K) the Invoiced item VAT rate (BT-152) shall be 0 (zero).";
    BR_IC_06 "BR-IC-06" ["BT-95", "BT-96"]
        "In a document level allowance (BG-20) where the VAT category code (BT-95) is 'Intra-community supply' (K) the Document level allowance VAT rate (BT-96) shall be 0 (zero).";
    BR_IC_07 "BR-IC-07" ["BT-102", "BT-103"]
        "In a document level charge (BG-21) where the VAT category code (BT-102) is 'Intra-community supply' (K) the Document level charge VAT rate (BT-103) shall be 0 (zero).";
    BR_IC_08 "BR-IC-08" ["BT-116", "BT-131", "BT-92", "BT-99"]
        "In a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Intra-community supply' (K) the VAT category taxable amount (BT-116) shall equal the sum of Invoice line net amounts (BT-131) minus the sum of document level allowance amounts (BT-92) plus the sum of document level charge amounts (BT-99) where the VAT category codes are 'Intra-community supply' (K).";
    BR_IC_09 "BR-IC-09" ["BT-117", "BT-116", "BT-119"]
        "The VAT category tax amount (BT-117) in a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Intra-community supply' (K) shall equal 0 (zero).";
    BR_IC_10 "BR-IC-10" ["BT-118", "BT-120", "BT-121"]
        "A VAT breakdown (BG-23) with VAT category code (BT-118) 'Intra-community supply' (K) shall have a VAT exemption reason code (BT-121) or a VAT exemption reason text (BT-120).";
    BR_IC_11 "BR-IC-11" ["BT-72", "BG-14"]
        "In an Invoice with a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Intra-community supply' (K) the Actual delivery date (BT-72) or the Invoicing period (BG-14) shall not be blank.";
    BR_IC_12 "BR-IC-12" ["BT-80"]
        "In an Invoice with a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Intra-community supply' (K) the Deliver to country code (BT-80) shall not be blank.";

    // Export outside the EU (G)
    BR_G_01 "BR-G-01" ["BG-23", "BT-118", "BT-151", "BT-95", "BT-102"]
        "An Invoice that contains an Invoice line, a document level allowance or a document level charge where the VAT category code is 'Export outside the EU' (G) shall contain at least one VAT breakdown (BG-23) with the VAT category code (BT-118) equal to 'Export outside the EU' (G).";
    BR_G_02 "BR-G-02" ["BT-151", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Export outside the EU' (G): the Seller VAT identifier (BT-31) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_G_03 "BR-G-03" ["BT-95", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level allowance (BG-20) where the VAT category code (BT-95) is 'Export outside the EU' (G): the Seller VAT identifier (BT-31) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_G_04 "BR-G-04" ["BT-102", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level charge (BG-21) where the VAT category code (BT-102) is 'Export outside the EU' (G): the Seller VAT identifier (BT-31) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_G_05 "BR-G-05" ["BT-151", "BT-152"]
        "In an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Export outside the EU' (G) the Invoiced item VAT rate (BT-152) shall be 0 (zero).";
    BR_G_06 "BR-G-06" ["BT-95", "BT-96"]
        "In a document level allowance (BG-20) where the VAT category code (BT-95) is 'Export outside the EU' (G) the Document level allowance VAT rate (BT-96) shall be 0 (zero).";
    BR_G_07 "BR-G-07" ["BT-102", "BT-103"]
        "In a document level charge (BG-21) where the VAT category code (BT-102) is 'Export outside the EU' (G) the Document level charge VAT rate (BT-103) shall be 0 (zero).";
    BR_G_08 "BR-G-08" ["BT-116", "BT-131", "BT-92", "BT-99"]
        "In a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Export outside the EU' (G) the VAT category taxable amount (BT-116) shall equal the sum of Invoice line net amounts (BT-131) minus the sum of document level allowance amounts (BT-92) plus the sum of document level charge amounts (BT-99) where the VAT category codes are 'Export outside the EU' (G).";
    BR_G_09 "BR-G-09" ["BT-117", "BT-116", "BT-119"]
        "The VAT category tax amount (BT-117) in a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Export outside the EU' (G) shall equal 0 (zero).";
    BR_G_10 "BR-G-10" ["BT-118", "BT-120", "BT-121"]
        "A VAT breakdown (BG-23) with VAT category code (BT-118) 'Export outside the EU' (G) shall have a VAT exemption reason code (BT-121) or a VAT exemption reason text (BT-120).";

    // Not subject to VAT (O)
    BR_O_01 "BR-O-01" ["BG-23", "BT-118", "BT-151", "BT-95", "BT-102"]
        "An Invoice that contains an Invoice line, a document level allowance or a document level charge where the VAT category code is 'Not subject to VAT' (O) shall contain at least one VAT breakdown (BG-23) with the VAT category code (BT-118) equal to 'Not subject to VAT' (O).";
    BR_O_02 "BR-O-02" ["BT-151", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Not subject to VAT' (O): the Seller VAT identifier (BT-31), the Seller tax representative VAT identifier (BT-63) and the Buyer VAT identifier (BT-48) shall not be present.";
    BR_O_03 "BR-O-03" ["BT-95", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level allowance (BG-20) where the VAT category code (BT-95) is 'Not subject to VAT' (O): the Seller VAT identifier (BT-31), the Seller tax representative VAT identifier (BT-63) and the Buyer VAT identifier (BT-48) shall not be present.";
    BR_O_04 "BR-O-04" ["BT-102", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level charge (BG-21) where the VAT category code (BT-102) is 'Not subject to VAT' (O): the Seller VAT identifier (BT-31), the Seller tax representative VAT identifier (BT-63) and the Buyer VAT identifier (BT-48) shall not be present.";
    BR_O_05 "BR-O-05" ["BT-151", "BT-152"]
        "In an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'Not subject to VAT' (O) the Invoiced item VAT rate (BT-152) shall not be present (zero).";
    BR_O_06 "BR-O-06" ["BT-95", "BT-96"]
        "In a document level allowance (BG-20) where the VAT category code (BT-95) is 'Not subject to VAT' (O) the Document level allowance VAT rate (BT-96) shall not be present (zero).";
    BR_O_07 "BR-O-07" ["BT-102", "BT-103"]
        "In a document level charge (BG-21) where the VAT category code (BT-102) is 'Not subject to VAT' (O) the Document level charge VAT rate (BT-103) shall not be present (zero).";
    BR_O_08 "BR-O-08" ["BT-116", "BT-131", "BT-92", "BT-99"]
        "In a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Not subject to VAT' (O) the VAT category taxable amount (BT-116) shall equal the sum of Invoice line net amounts (BT-131) minus the sum of document level allowance amounts (BT-92) plus the sum of document level charge amounts (BT-99) where the VAT category codes are 'Not subject to VAT' (O).";
    BR_O_09 "BR-O-09" ["BT-117", "BT-116", "BT-119"]
        "The VAT category tax amount (BT-117) in a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'Not subject to VAT' (O) shall equal 0 (zero).";
    BR_O_10 "BR-O-10" ["BT-118", "BT-120", "BT-121"]
        "A VAT breakdown (BG-23) with VAT category code (BT-118) 'Not subject to VAT' (O) shall have a VAT exemption reason code (BT-121) or a VAT exemption reason text (BT-120).";
    BR_O_11 "BR-O-11" ["BG-23", "BT-118"]
        "An Invoice that contains a VAT breakdown group (BG-23) with a VAT category code (BT-118) 'Not subject to VAT' (O) shall contain only one such VAT breakdown group.";
    BR_O_12 "BR-O-12" ["BT-151"]
        "An Invoice that contains a VAT breakdown group (BG-23) with a VAT category code (BT-118) 'Not subject to VAT' (O) shall not contain an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is not 'Not subject to VAT' (O).";
    BR_O_13 "BR-O-13" ["BT-95", "BT-102"]
        "An Invoice that contains a VAT breakdown group (BG-23) with a VAT category code (BT-118) 'Not subject to VAT' (O) shall not contain document level allowances (BG-20) or charges (BG-21) where the VAT category code is not 'Not subject to VAT' (O).";
    BR_O_14 "BR-O-14" ["BG-23", "BT-118"]
        "An Invoice that contains a VAT breakdown group (BG-23) with a VAT category code (BT-118) 'Not subject to VAT' (O) shall not contain other VAT breakdown groups (BG-23).";

    // IGIC (L)
    BR_AF_01 "BR-AF-01" ["BG-23", "BT-118", "BT-151", "BT-95", "BT-102"]
        "An Invoice that contains an Invoice line, a document level allowance or a document level charge where the VAT category code is 'IGIC' (L) shall contain at least one VAT breakdown (BG-23) with the VAT category code (BT-118) equal to 'IGIC' (L).";
    BR_AF_02 "BR-AF-02" ["BT-151", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'IGIC' (L): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_AF_03 "BR-AF-03" ["BT-95", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level allowance (BG-20) where the VAT category code (BT-95) is 'IGIC' (L): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_AF_04 "BR-AF-04" ["BT-102", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level charge (BG-21) where the VAT category code (BT-102) is 'IGIC' (L): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present.";
    BR_AF_05 "BR-AF-05" ["BT-151", "BT-152"]
        "In an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'IGIC' (L) the Invoiced item VAT rate (BT-152) shall be 0 (zero) or greater than zero.";
    BR_AF_06 "BR-AF-06" ["BT-95", "BT-96"]
        "In a document level allowance (BG-20) where the VAT category code (BT-95) is 'IGIC' (L) the Document level allowance VAT rate (BT-96) shall be 0 (zero) or greater than zero.";
    BR_AF_07 "BR-AF-07" ["BT-102", "BT-103"]
        "In a document level charge (BG-21) where the VAT category code (BT-102) is 'IGIC' (L) the Document level charge VAT rate (BT-103) shall be 0 (zero) or greater than zero.";
    BR_AF_08 "BR-AF-08" ["BT-116", "BT-131", "BT-92", "BT-99"]
        "In a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'IGIC' (L) the VAT category taxable amount (BT-116) shall equal the sum of Invoice line net amounts (BT-131) minus the sum of document level allowance amounts (BT-92) plus the sum of document level charge amounts (BT-99) where the VAT category codes are 'IGIC' (L).";
    BR_AF_09 "BR-AF-09" ["BT-117", "BT-116", "BT-119"]
        "The VAT category tax amount (BT-117) in a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'IGIC' (L) shall equal the VAT category taxable amount multiplied by the VAT category rate, rounded to two decimals.";
    BR_AF_10 "BR-AF-10" ["BT-118", "BT-120", "BT-121"]
        "A VAT breakdown (BG-23) with VAT category code (BT-118) 'IGIC' (L) shall not have a VAT exemption reason code (BT-121) or VAT exemption reason text (BT-120).";

    // IPSI (M)
    BR_AG_01 "BR-AG-01" ["BG-23", "BT-118", "BT-151", "BT-95", "BT-102"]
        "An Invoice that contains an Invoice line, a document level allowance or a document level charge where the VAT category code is 'IPSI' (M) shall contain at least one VAT breakdown (BG-23) with the VAT category code (BT-118) equal to 'IPSI' (M).";
    BR_AG_02 "BR-AG-02" ["BT-151", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'IPSI' (M): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present, and the Buyer VAT identifier (BT-48) shall not be present.";
    BR_AG_03 "BR-AG-03" ["BT-95", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level allowance (BG-20) where the VAT category code (BT-95) is 'IPSI' (M): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present, and the Buyer VAT identifier (BT-48) shall not be present.";
    BR_AG_04 "BR-AG-04" ["BT-102", "BT-31", "BT-32", "BT-48", "BT-63"]
        "An Invoice that contains a document level charge (BG-21) where the VAT category code (BT-102) is 'IPSI' (M): the Seller VAT identifier (BT-31), the Seller tax registration identifier (BT-32) and/or the Seller tax representative VAT identifier (BT-63) shall be present, and the Buyer VAT identifier (BT-48) shall not be present.";
    BR_AG_05 "BR-AG-05" ["BT-151", "BT-152"]
        "In an Invoice line (BG-25) where the Invoiced item VAT category code (BT-151) is 'IPSI' (M) the Invoiced item VAT rate (BT-152) shall be 0 (zero) or greater than zero.";
    BR_AG_06 "BR-AG-06" ["BT-95", "BT-96"]
        "In a document level allowance (BG-20) where the VAT category code (BT-95) is 'IPSI' (M) the Document level allowance VAT rate (BT-96) shall be 0 (zero) or greater than zero.";
    BR_AG_07 "BR-AG-07" ["BT-102", "BT-103"]
        "In a document level charge (BG-21) where the VAT category code (BT-102) is 'IPSI' (M) the Document level charge VAT rate (BT-103) shall be 0 (zero) or greater than zero.";
    BR_AG_08 "BR-AG-08" ["BT-116", "BT-131", "BT-92", "BT-99"]
        "In a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'IPSI' (M) the VAT category taxable amount (BT-116) shall equal the sum of Invoice line net amounts (BT-131) minus the sum of document level allowance amounts (BT-92) plus the sum of document level charge amounts (BT-99) where the VAT category codes are 'IPSI' (M).";
    BR_AG_09 "BR-AG-09" ["BT-117", "BT-116", "BT-119"]
        "The VAT category tax amount (BT-117) in a VAT breakdown (BG-23) where the VAT category code (BT-118) is 'IPSI' (M) shall equal the VAT category taxable amount multiplied by the VAT category rate, rounded to two decimals.";
    BR_AG_10 "BR-AG-10" ["BT-118", "BT-120", "BT-121"]
        "A VAT breakdown (BG-23) with VAT category code (BT-118) 'IPSI' (M) shall not have a VAT exemption reason code (BT-121) or VAT exemption reason text (BT-120).";
    // PEPPOL BIS Billing 3.0
    PEPPOL_R001 "PEPPOL-EN16931-R001" ["BT-23"]
        "Business process MUST be provided.";
    PEPPOL_R002 "PEPPOL-EN16931-R002" ["BT-22"]
        "No more than one note is allowed on document level.";
    PEPPOL_R003 "PEPPOL-EN16931-R003" ["BT-10", "BT-13"]
        "A buyer reference or purchase order reference MUST be provided.";
    PEPPOL_R005 "PEPPOL-EN16931-R005" ["BT-5", "BT-6"]
        "VAT accounting currency code MUST be different from invoice currency code when provided.";
    PEPPOL_R007 "PEPPOL-EN16931-R007" ["BT-23"]
        "Business process MUST be in the format 'urn:fdc:peppol.eu:2017:poacc:billing:NN:1.0' where NN indicates the process number.";
    PEPPOL_R010 "PEPPOL-EN16931-R010" ["BT-49"]
        "Buyer electronic address MUST be provided.";
    PEPPOL_R020 "PEPPOL-EN16931-R020" ["BT-34"]
        "Seller electronic address MUST be provided.";
    PEPPOL_R040 "PEPPOL-EN16931-R040" ["BT-92", "BT-93", "BT-94", "BT-99", "BT-100", "BT-101"]
        "Allowance/charge amount must equal base amount * percentage/100 if base amount and percentage exists.";
    PEPPOL_R041 "PEPPOL-EN16931-R041" ["BT-93", "BT-94", "BT-100", "BT-101"]
        "Allowance/charge base amount MUST be provided when allowance/charge percentage is provided.";
    PEPPOL_R042 "PEPPOL-EN16931-R042" ["BT-93", "BT-94", "BT-100", "BT-101"]
        "Allowance/charge percentage MUST be provided when allowance/charge base amount is provided.";
    PEPPOL_R046 "PEPPOL-EN16931-R046" ["BT-146", "BT-147", "BT-148"]
        "Item net price MUST equal (Gross price - Allowance amount) when gross price is provided.";
    PEPPOL_R055 "PEPPOL-EN16931-R055" ["BT-110", "BT-111"]
        "Invoice total VAT amount and Invoice total VAT amount in accounting currency MUST have the same operational sign.";
    PEPPOL_R061 "PEPPOL-EN16931-R061" ["BT-81", "BT-89"]
        "Mandate reference MUST be provided for direct debit.";
    PEPPOL_R110 "PEPPOL-EN16931-R110" ["BT-134", "BT-73"]
        "Start date of line period MUST be within invoice period.";
    PEPPOL_R111 "PEPPOL-EN16931-R111" ["BT-135", "BT-74"]
        "End date of line period MUST be within invoice period.";
    PEPPOL_R120 "PEPPOL-EN16931-R120" ["BT-131", "BT-129", "BT-146", "BT-149", "BT-136", "BT-141"]
        "Invoice line net amount MUST equal (Invoiced quantity * (Item net price/item price base quantity) + Sum of invoice line charge amount - sum of invoice line allowance amount.";
    PEPPOL_R121 "PEPPOL-EN16931-R121" ["BT-149"]
        "Base quantity MUST be a positive number above zero.";
    PEPPOL_R130 "PEPPOL-EN16931-R130" ["BT-130", "BT-150"]
        "Unit code of price base quantity MUST be same as invoiced quantity.";

    // XRechnung (Germany)
    BR_DE_1 "BR-DE-1" ["BG-16"]
        "An invoice must contain information on PAYMENT INSTRUCTIONS (BG-16).";
    BR_DE_2 "BR-DE-2" ["BG-6"]
        "The group SELLER CONTACT (BG-6) must be transmitted.";
    BR_DE_3 "BR-DE-3" ["BT-37"]
        "The element Seller city (BT-37) must be transmitted.";
    BR_DE_4 "BR-DE-4" ["BT-38"]
        "The element Seller post code (BT-38) must be transmitted.";
    BR_DE_5 "BR-DE-5" ["BT-41"]
        "The element Seller contact point (BT-41) must be transmitted.";
    BR_DE_6 "BR-DE-6" ["BT-42"]
        "The element Seller contact telephone number (BT-42) must be transmitted.";
    BR_DE_7 "BR-DE-7" ["BT-43"]
        "The element Seller contact email address (BT-43) must be transmitted.";
    BR_DE_8 "BR-DE-8" ["BT-52"]
        "The element Buyer city (BT-52) must be transmitted.";
    BR_DE_9 "BR-DE-9" ["BT-53"]
        "The element Buyer post code (BT-53) must be transmitted.";
    BR_DE_10 "BR-DE-10" ["BT-77"]
        "The element Deliver to city (BT-77) must be transmitted if the group DELIVER TO ADDRESS (BG-15) is transmitted.";
    BR_DE_11 "BR-DE-11" ["BT-78"]
        "The element Deliver to post code (BT-78) must be transmitted if the group DELIVER TO ADDRESS (BG-15) is transmitted.";
    BR_DE_15 "BR-DE-15" ["BT-10"]
        "The element Buyer reference (BT-10) must be transmitted.";
    BR_DE_16 "BR-DE-16" ["BT-31", "BT-32", "BT-63"]
        "If one of the VAT codes S, Z, E, AE, K, G, L or M is used, one of the elements Seller VAT identifier (BT-31), Seller tax registration identifier (BT-32) or SELLER TAX REPRESENTATIVE PARTY (BG-11) must be transmitted.";
    BR_DE_17 "BR-DE-17" ["BT-3"]
        "Only the codes 326, 380, 384, 389, 381, 875, 876 and 877 may be used for the Invoice type code (BT-3).";
    BR_DE_21 "BR-DE-21" ["BT-24"]
        "The element Specification identifier (BT-24) should syntactically match the identifier of the standard XRechnung.";
    BR_DE_22 "BR-DE-22" ["BT-125"]
        "The filename attribute of all embedded documents (BT-125) must be unique within an invoice.";
    BR_DE_23 "BR-DE-23" ["BT-81", "BG-17", "BG-18", "BG-19"]
        "If the Payment means type code (BT-81) is 30 or 58, CREDIT TRANSFER (BG-17) must be transmitted and neither PAYMENT CARD INFORMATION (BG-18) nor DIRECT DEBIT (BG-19) may be transmitted.";
    BR_DE_24 "BR-DE-24" ["BT-81", "BG-17", "BG-18", "BG-19"]
        "If the Payment means type code (BT-81) is 48, 54 or 55, PAYMENT CARD INFORMATION (BG-18) must be transmitted and neither CREDIT TRANSFER (BG-17) nor DIRECT DEBIT (BG-19) may be transmitted.";
    BR_DE_25 "BR-DE-25" ["BT-81", "BT-89", "BT-90", "BT-91"]
        "If the Payment means type code (BT-81) is 59, DIRECT DEBIT (BG-19) with the Mandate reference identifier (BT-89), the Bank assigned creditor identifier (BT-90) and the Debited account identifier (BT-91) must be transmitted.";
    BR_DE_26 "BR-DE-26" ["BT-3", "BG-3"]
        "If the Invoice type code (BT-3) is 384 (Corrected invoice), PRECEDING INVOICE REFERENCE (BG-3) should be transmitted at least once.";
    BR_DE_27 "BR-DE-27" ["BT-42"]
        "The Seller contact telephone number (BT-42) should contain at least three digits.";
    BR_DE_28 "BR-DE-28" ["BT-43"]
        "The Seller contact email address (BT-43) should contain exactly one @ sign, which is not at the start or end of the address.";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let mut seen = HashSet::new();
        for rule in catalog() {
            assert!(seen.insert(rule.code), "duplicate code {}", rule.code);
        }
    }

    #[test]
    fn every_rule_names_fields_and_description() {
        for rule in catalog() {
            assert!(!rule.fields.is_empty(), "{} has no fields", rule.code);
            assert!(!rule.description.is_empty(), "{} has no description", rule.code);
        }
    }

    #[test]
    fn lookup_finds_rows() {
        assert_eq!(lookup("BR-CO-10").map(|r| r.code), Some("BR-CO-10"));
        assert!(std::ptr::eq(lookup("BR-IC-09").unwrap(), &BR_IC_09));
        assert!(lookup("BR-99").is_none());
    }

    #[test]
    fn family_prefix() {
        assert_eq!(BR_01.family(), "BR");
        assert_eq!(BR_CO_10.family(), "BR-CO");
        assert_eq!(BR_IC_12.family(), "BR-IC");
        assert_eq!(PEPPOL_R120.family(), "PEPPOL-EN16931");
    }

    #[test]
    fn vat_families_have_ten_rules_plus_additions() {
        let count = |prefix: &str| {
            catalog()
                .iter()
                .filter(|r| r.family() == prefix)
                .count()
        };
        for prefix in ["BR-S", "BR-Z", "BR-E", "BR-AE", "BR-G", "BR-AF", "BR-AG"] {
            assert_eq!(count(prefix), 10, "{prefix}");
        }
        assert_eq!(count("BR-IC"), 12);
        assert_eq!(count("BR-O"), 14);
    }
}
