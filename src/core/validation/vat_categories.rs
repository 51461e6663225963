//! VAT category families.
//!
//! Every category shares the same ten-rule shape (breakdown exists, party
//! identifiers for lines / allowances / charges, rates for lines /
//! allowances / charges, taxable amount, tax amount, exemption reason).
//! The families differ only in the parameters below, plus a few extra rules
//! for K and O.

use rust_decimal::Decimal;

use crate::core::calculate::tax_amount;
use crate::core::decimal::{checked_sum, round_half_up};
use crate::core::rules::*;
use crate::core::types::*;

use super::{Findings, blank};

/// Which party identifiers a category needs.
#[derive(Debug, Clone, Copy)]
enum Ids {
    /// Seller VAT id, seller tax registration id or tax representative VAT id.
    SellerAny,
    /// Seller VAT id or tax representative VAT id.
    SellerVat,
    /// As `SellerVat`, plus buyer VAT id or buyer legal registration id.
    SellerAndBuyerVatOrLegal,
    /// As `SellerVat`, plus buyer VAT id.
    SellerAndBuyerVat,
    /// As `SellerAny`, and no buyer VAT id.
    SellerAnyWithoutBuyerVat,
    /// No seller, tax representative or buyer VAT id at all.
    NoVatIds,
}

#[derive(Debug, Clone, Copy)]
enum Rate {
    Positive,
    Zero,
    NonNegative,
}

#[derive(Debug, Clone, Copy)]
enum Reason {
    Required,
    Forbidden,
}

struct Family {
    category: TaxCategory,
    /// Rules 01 .. 10 of the family, in order.
    rules: [&'static Rule; 10],
    ids: Ids,
    rate: Rate,
    /// `true` when the tax amount follows basis × rate, `false` when it must be zero.
    computed: bool,
    reason: Reason,
}

macro_rules! family {
    ($category:ident, [$r1:ident, $r2:ident, $r3:ident, $r4:ident, $r5:ident, $r6:ident, $r7:ident, $r8:ident, $r9:ident, $r10:ident], $ids:ident, $rate:ident, $computed:literal, $reason:ident) => {
        Family {
            category: TaxCategory::$category,
            rules: [&$r1, &$r2, &$r3, &$r4, &$r5, &$r6, &$r7, &$r8, &$r9, &$r10],
            ids: Ids::$ids,
            rate: Rate::$rate,
            computed: $computed,
            reason: Reason::$reason,
        }
    };
}

static FAMILIES: [Family; 9] = [
    family!(
        StandardRate,
        [BR_S_01, BR_S_02, BR_S_03, BR_S_04, BR_S_05, BR_S_06, BR_S_07, BR_S_08, BR_S_09, BR_S_10],
        SellerAny, Positive, true, Forbidden
    ),
    family!(
        ZeroRated,
        [BR_Z_01, BR_Z_02, BR_Z_03, BR_Z_04, BR_Z_05, BR_Z_06, BR_Z_07, BR_Z_08, BR_Z_09, BR_Z_10],
        SellerAny, Zero, false, Forbidden
    ),
    family!(
        Exempt,
        [BR_E_01, BR_E_02, BR_E_03, BR_E_04, BR_E_05, BR_E_06, BR_E_07, BR_E_08, BR_E_09, BR_E_10],
        SellerAny, Zero, false, Required
    ),
    family!(
        ReverseCharge,
        [BR_AE_01, BR_AE_02, BR_AE_03, BR_AE_04, BR_AE_05, BR_AE_06, BR_AE_07, BR_AE_08, BR_AE_09, BR_AE_10],
        SellerAndBuyerVatOrLegal, Zero, false, Required
    ),
    family!(
        IntraCommunitySupply,
        [BR_IC_01, BR_IC_02, BR_IC_03, BR_IC_04, BR_IC_05, BR_IC_06, BR_IC_07, BR_IC_08, BR_IC_09, BR_IC_10],
        SellerAndBuyerVat, Zero, false, Required
    ),
    family!(
        Export,
        [BR_G_01, BR_G_02, BR_G_03, BR_G_04, BR_G_05, BR_G_06, BR_G_07, BR_G_08, BR_G_09, BR_G_10],
        SellerVat, Zero, false, Required
    ),
    family!(
        NotSubjectToVat,
        [BR_O_01, BR_O_02, BR_O_03, BR_O_04, BR_O_05, BR_O_06, BR_O_07, BR_O_08, BR_O_09, BR_O_10],
        NoVatIds, Zero, false, Required
    ),
    family!(
        CanaryIslands,
        [BR_AF_01, BR_AF_02, BR_AF_03, BR_AF_04, BR_AF_05, BR_AF_06, BR_AF_07, BR_AF_08, BR_AF_09, BR_AF_10],
        SellerAny, NonNegative, true, Forbidden
    ),
    family!(
        CeutaMelilla,
        [BR_AG_01, BR_AG_02, BR_AG_03, BR_AG_04, BR_AG_05, BR_AG_06, BR_AG_07, BR_AG_08, BR_AG_09, BR_AG_10],
        SellerAnyWithoutBuyerVat, NonNegative, true, Forbidden
    ),
];

/// Run the family of every category the invoice uses, in category order.
pub(super) fn check(invoice: &Invoice, out: &mut Findings) {
    for category in invoice.tax_categories() {
        let Some(family) = FAMILIES.iter().find(|f| f.category == category) else {
            continue;
        };
        family.check(invoice, out);
        match category {
            TaxCategory::IntraCommunitySupply => intra_community_extras(invoice, out),
            TaxCategory::NotSubjectToVat => not_subject_extras(invoice, out),
            _ => {}
        }
    }
}

impl Family {
    fn check(&self, invoice: &Invoice, out: &mut Findings) {
        let code = self.category.code();
        let [r01, r02, r03, r04, r05, r06, r07, r08, r09, r10] = self.rules;
        let lines: Vec<(usize, &InvoiceLine)> = invoice
            .lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.tax_category == Some(self.category))
            .collect();
        let allowances: Vec<(usize, &AllowanceCharge)> = self.document_level(invoice, false);
        let charges: Vec<(usize, &AllowanceCharge)> = self.document_level(invoice, true);
        let breakdown: Vec<(usize, &TradeTax)> = invoice
            .trade_taxes
            .iter()
            .enumerate()
            .filter(|(_, t)| t.category == Some(self.category))
            .collect();

        // 01
        let used = !lines.is_empty() || !allowances.is_empty() || !charges.is_empty();
        if used && breakdown.is_empty() {
            out.violation(r01, format!("category {code} is used but has no VAT breakdown entry"));
        }

        // 02 .. 04
        if let Some(missing) = self.missing_ids(invoice) {
            for (i, line) in &lines {
                out.violation(r02, format!("lines[{i}] ({}): category {code} {missing}", line.id));
            }
            for (i, _) in &allowances {
                out.violation(r03, format!("allowances_charges[{i}]: category {code} {missing}"));
            }
            for (i, _) in &charges {
                out.violation(r04, format!("allowances_charges[{i}]: category {code} {missing}"));
            }
        }

        // 05 .. 07
        for (i, line) in &lines {
            if !self.rate_ok(line.tax_rate) {
                out.violation(
                    r05,
                    format!(
                        "lines[{i}] ({}): rate {}% for category {code}, {}",
                        line.id,
                        line.tax_rate,
                        self.rate_expectation()
                    ),
                );
            }
        }
        for (rule, group) in [(r06, &allowances), (r07, &charges)] {
            for (i, ac) in group {
                if !self.rate_ok(ac.tax_rate) {
                    out.violation(
                        rule,
                        format!(
                            "allowances_charges[{i}]: rate {}% for category {code}, {}",
                            ac.tax_rate,
                            self.rate_expectation()
                        ),
                    );
                }
            }
        }

        // 08
        for (i, tax) in &breakdown {
            let Some(expected) = taxable_amount(invoice, self.category, tax.rate) else {
                out.violation(
                    r08,
                    format!(
                        "trade_taxes[{i}] ({code} {}%): taxable amount exceeds the representable decimal range",
                        tax.rate
                    ),
                );
                continue;
            };
            if tax.basis_amount != expected {
                out.violation(
                    r08,
                    format!(
                        "trade_taxes[{i}] ({code} {}%): taxable amount is {}, expected {expected}",
                        tax.rate, tax.basis_amount
                    ),
                );
            }
        }

        // 09
        for (i, tax) in &breakdown {
            let expected = if self.computed {
                tax_amount(tax.basis_amount, tax.rate)
            } else {
                Some(Decimal::ZERO)
            };
            match expected {
                Some(expected) if tax.calculated_amount != expected => out.violation(
                    r09,
                    format!(
                        "trade_taxes[{i}] ({code} {}%): tax amount is {}, expected {expected}",
                        tax.rate, tax.calculated_amount
                    ),
                ),
                Some(_) => {}
                None => out.violation(
                    r09,
                    format!(
                        "trade_taxes[{i}] ({code} {}%): tax amount exceeds the representable decimal range",
                        tax.rate
                    ),
                ),
            }
        }

        // 10
        for (i, tax) in &breakdown {
            let has_reason = !blank(tax.exemption_reason.as_deref())
                || !blank(tax.exemption_reason_code.as_deref());
            match (self.reason, has_reason) {
                (Reason::Required, false) => out.violation(
                    r10,
                    format!("trade_taxes[{i}] ({code}): exemption reason or reason code is required"),
                ),
                (Reason::Forbidden, true) => out.violation(
                    r10,
                    format!("trade_taxes[{i}] ({code}): exemption reason is not allowed"),
                ),
                _ => {}
            }
        }
    }

    fn document_level<'a>(&self, invoice: &'a Invoice, charge: bool) -> Vec<(usize, &'a AllowanceCharge)> {
        invoice
            .allowances_charges
            .iter()
            .enumerate()
            .filter(|(_, ac)| ac.is_charge == charge && ac.tax_category == Some(self.category))
            .collect()
    }

    /// Describes what is missing (or present but forbidden), or `None` when
    /// the parties carry the identifiers the category needs.
    fn missing_ids(&self, invoice: &Invoice) -> Option<&'static str> {
        let present = |v: Option<&String>| !blank(v.map(String::as_str));
        let rep_vat = present(
            invoice
                .tax_representative
                .as_ref()
                .and_then(|p| p.vat_id.as_ref()),
        );
        let seller_vat = present(invoice.seller.vat_id.as_ref()) || rep_vat;
        let seller_any = seller_vat || present(invoice.seller.tax_registration_id.as_ref());
        let buyer_vat = present(invoice.buyer.vat_id.as_ref());
        let buyer_legal = present(
            invoice
                .buyer
                .legal_organization
                .as_ref()
                .and_then(|o| o.id.as_ref()),
        );

        match self.ids {
            Ids::SellerAny if !seller_any => {
                Some("needs a seller VAT identifier, tax registration identifier or tax representative")
            }
            Ids::SellerVat if !seller_vat => {
                Some("needs a seller or tax representative VAT identifier")
            }
            Ids::SellerAndBuyerVatOrLegal if !seller_vat || !(buyer_vat || buyer_legal) => Some(
                "needs a seller VAT identifier and a buyer VAT or legal registration identifier",
            ),
            Ids::SellerAndBuyerVat if !seller_vat || !buyer_vat => {
                Some("needs both seller and buyer VAT identifiers")
            }
            Ids::SellerAnyWithoutBuyerVat if !seller_any => {
                Some("needs a seller VAT identifier, tax registration identifier or tax representative")
            }
            Ids::SellerAnyWithoutBuyerVat if buyer_vat => {
                Some("does not allow a buyer VAT identifier")
            }
            Ids::NoVatIds if seller_vat || buyer_vat => {
                Some("does not allow seller, tax representative or buyer VAT identifiers")
            }
            _ => None,
        }
    }

    fn rate_ok(&self, rate: Decimal) -> bool {
        match self.rate {
            Rate::Positive => rate > Decimal::ZERO,
            Rate::Zero => rate.is_zero(),
            Rate::NonNegative => rate >= Decimal::ZERO,
        }
    }

    fn rate_expectation(&self) -> &'static str {
        match self.rate {
            Rate::Positive => "expected greater than 0",
            Rate::Zero => "expected 0",
            Rate::NonNegative => "expected 0 or greater",
        }
    }
}

/// Σ line net amounts − Σ allowances + Σ charges for one (category, rate),
/// rounded half-up to cents. `None` on overflow.
fn taxable_amount(invoice: &Invoice, category: TaxCategory, rate: Decimal) -> Option<Decimal> {
    let lines = invoice
        .lines
        .iter()
        .filter(|l| l.tax_category == Some(category) && l.tax_rate == rate)
        .map(|l| l.line_total);
    let adjustments = invoice
        .allowances_charges
        .iter()
        .filter(|ac| ac.tax_category == Some(category) && ac.tax_rate == rate)
        .map(|ac| if ac.is_charge { ac.amount } else { -ac.amount });
    checked_sum(lines.chain(adjustments)).map(|basis| round_half_up(basis, 2))
}

/// BR-IC-11, BR-IC-12.
fn intra_community_extras(invoice: &Invoice, out: &mut Findings) {
    let in_breakdown = invoice
        .trade_taxes
        .iter()
        .any(|t| t.category == Some(TaxCategory::IntraCommunitySupply));
    if !in_breakdown {
        return;
    }
    let has_period = invoice
        .billing_period
        .is_some_and(|p| p.start.is_some() || p.end.is_some());
    if invoice.delivery_date.is_none() && !has_period {
        out.violation(
            &BR_IC_11,
            "intra-community supply needs an actual delivery date or an invoicing period",
        );
    }
    let ship_to_country = invoice.ship_to.as_ref().and_then(Party::country_code);
    if ship_to_country.is_none() {
        out.violation(
            &BR_IC_12,
            "intra-community supply needs a deliver-to country code",
        );
    }
}

/// BR-O-11 .. BR-O-14.
fn not_subject_extras(invoice: &Invoice, out: &mut Findings) {
    let o_entries = invoice
        .trade_taxes
        .iter()
        .filter(|t| t.category == Some(TaxCategory::NotSubjectToVat))
        .count();
    if o_entries == 0 {
        return;
    }

    if o_entries > 1 {
        out.violation(
            &BR_O_11,
            format!("{o_entries} VAT breakdown entries with category O, only one allowed"),
        );
    }
    for (i, line) in invoice.lines.iter().enumerate() {
        if let Some(category) = line.tax_category.filter(|c| *c != TaxCategory::NotSubjectToVat) {
            out.violation(
                &BR_O_12,
                format!(
                    "lines[{i}] ({}): category {} next to a category O breakdown",
                    line.id,
                    category.code()
                ),
            );
        }
    }
    for (i, ac) in invoice.allowances_charges.iter().enumerate() {
        if let Some(category) = ac.tax_category.filter(|c| *c != TaxCategory::NotSubjectToVat) {
            out.violation(
                &BR_O_13,
                format!(
                    "allowances_charges[{i}]: category {} next to a category O breakdown",
                    category.code()
                ),
            );
        }
    }
    let others: Vec<&str> = invoice
        .trade_taxes
        .iter()
        .filter_map(|t| t.category)
        .filter(|c| *c != TaxCategory::NotSubjectToVat)
        .map(|c| c.code())
        .collect();
    if !others.is_empty() {
        out.violation(
            &BR_O_14,
            format!(
                "category O breakdown mixed with categories {}",
                others.join(", ")
            ),
        );
    }
}
