//! Calculator: line net amounts, the VAT breakdown (BG-23) and the
//! document totals (BG-22).
//!
//! Amounts accumulate at full precision and are rounded half-up to cents
//! once per result. Every sum and product is checked; leaving the `Decimal`
//! range is reported as [`InvoiceError::Overflow`].

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::decimal::{checked_sum, round_half_up};
use super::error::InvoiceError;
use super::types::*;

/// Exemption texts applied to zero-rate breakdown entries when the caller
/// has nothing more specific.
pub fn default_exemption_reasons() -> HashMap<TaxCategory, String> {
    [
        (TaxCategory::Exempt, "Exempt from VAT"),
        (TaxCategory::ReverseCharge, "Reverse charge"),
        (TaxCategory::IntraCommunitySupply, "Intra-community supply"),
        (TaxCategory::Export, "Export outside the EU"),
        (TaxCategory::NotSubjectToVat, "Not subject to VAT"),
    ]
    .into_iter()
    .map(|(category, text)| (category, text.to_string()))
    .collect()
}

/// `basis × rate / 100`, rounded half-up to cents. `None` on overflow.
pub fn tax_amount(basis: Decimal, rate: Decimal) -> Option<Decimal> {
    let product = basis.checked_mul(rate)?.checked_div(Decimal::ONE_HUNDRED)?;
    Some(round_half_up(product, 2))
}

/// Line net amount: `quantity × net_price / base_quantity + charges − allowances`,
/// rounded half-up to cents. A missing or zero base quantity counts as 1.
/// `None` on overflow.
pub fn line_net_amount(line: &InvoiceLine) -> Option<Decimal> {
    let base_quantity = line
        .base_quantity
        .filter(|q| !q.is_zero())
        .unwrap_or(Decimal::ONE);
    let price_amount = line
        .quantity
        .checked_mul(line.net_price)?
        .checked_div(base_quantity)?;
    let charges = checked_sum(line.charges().map(|c| c.amount))?;
    let allowances = checked_sum(line.allowances().map(|a| a.amount))?;
    let net = price_amount.checked_add(charges)?.checked_sub(allowances)?;
    Some(round_half_up(net, 2))
}

/// Rebuild the VAT breakdown from lines and document level allowances/charges.
///
/// One entry per (category, rate), sorted by category code then rate. The
/// basis accumulates line net amounts, minus allowances, plus charges, at
/// full precision and is rounded to cents once.
///
/// Zero-rate entries take their exemption reason from `exemption_reasons`,
/// falling back to the reason and VATEX code of the entry being replaced.
/// Positive-rate entries never carry an exemption reason. Tax point date and
/// due date code survive from the replaced entry.
///
/// On overflow the breakdown is left untouched.
pub fn derive_tax_breakdown(
    invoice: &mut Invoice,
    exemption_reasons: &HashMap<TaxCategory, String>,
) -> Result<(), InvoiceError> {
    let mut buckets: HashMap<(TaxCategory, Decimal), Decimal> = HashMap::new();

    let lines = invoice
        .lines
        .iter()
        .filter_map(|l| Some((l.tax_category?, l.tax_rate, l.line_total)));
    let adjustments = invoice.allowances_charges.iter().filter_map(|ac| {
        let signed = if ac.is_charge { ac.amount } else { -ac.amount };
        Some((ac.tax_category?, ac.tax_rate, signed))
    });
    for (category, rate, amount) in lines.chain(adjustments) {
        let basis = buckets.entry((category, rate)).or_insert(Decimal::ZERO);
        *basis = basis
            .checked_add(amount)
            .ok_or_else(|| overflow(format!("BT-116 taxable amount for {}", category.code())))?;
    }

    let mut breakdown = Vec::with_capacity(buckets.len());
    for ((category, rate), basis) in buckets {
        let prior = invoice
            .trade_taxes
            .iter()
            .find(|t| t.category == Some(category) && t.rate == rate);
        let basis_amount = round_half_up(basis, 2);
        let calculated_amount = tax_amount(basis_amount, rate)
            .ok_or_else(|| overflow(format!("BT-117 VAT amount for {} {rate}%", category.code())))?;

        let (exemption_reason, exemption_reason_code) = if rate.is_zero() {
            match exemption_reasons.get(&category) {
                Some(reason) => (
                    Some(reason.clone()),
                    prior.and_then(|t| t.exemption_reason_code.clone()),
                ),
                None => (
                    prior.and_then(|t| t.exemption_reason.clone()),
                    prior.and_then(|t| t.exemption_reason_code.clone()),
                ),
            }
        } else {
            (None, None)
        };

        breakdown.push(TradeTax {
            type_code: "VAT".to_string(),
            category: Some(category),
            rate,
            rate_presence: Presence::of(category != TaxCategory::NotSubjectToVat),
            basis_amount,
            basis_presence: Presence::Present,
            calculated_amount,
            calculated_presence: Presence::Present,
            exemption_reason,
            exemption_reason_code,
            tax_point_date: prior.and_then(|t| t.tax_point_date),
            due_date_type_code: prior.and_then(|t| t.due_date_type_code.clone()),
        });
    }

    breakdown.sort_by(|a, b| a.category.cmp(&b.category).then(a.rate.cmp(&b.rate)));
    debug!(entries = breakdown.len(), "VAT breakdown derived");
    invoice.trade_taxes = breakdown;
    Ok(())
}

/// Recompute the document totals (BG-22) from lines, document level
/// allowances/charges and the VAT breakdown.
///
/// Prepaid and rounding amounts are inputs and are left untouched. On
/// overflow the totals are left untouched.
pub fn update_totals(invoice: &mut Invoice) -> Result<(), InvoiceError> {
    let line_total = checked_sum(invoice.lines.iter().map(|l| l.line_total))
        .ok_or_else(|| overflow("BT-106 sum of line net amounts"))?;
    let allowance_total = checked_sum(invoice.allowances().map(|ac| ac.amount))
        .ok_or_else(|| overflow("BT-107 sum of allowances"))?;
    let charge_total = checked_sum(invoice.charges().map(|ac| ac.amount))
        .ok_or_else(|| overflow("BT-108 sum of charges"))?;
    let tax_total = checked_sum(invoice.trade_taxes.iter().map(|t| t.calculated_amount))
        .ok_or_else(|| overflow("BT-110 total VAT amount"))?;

    let tax_basis_total = line_total
        .checked_sub(allowance_total)
        .and_then(|v| v.checked_add(charge_total))
        .ok_or_else(|| overflow("BT-109 total without VAT"))?;
    let grand_total = tax_basis_total
        .checked_add(tax_total)
        .ok_or_else(|| overflow("BT-112 total with VAT"))?;
    let totals = &mut invoice.totals;
    let due_payable = grand_total
        .checked_sub(totals.prepaid)
        .and_then(|v| v.checked_add(totals.rounding))
        .ok_or_else(|| overflow("BT-115 amount due"))?;

    totals.line_total = line_total;
    totals.allowance_total = allowance_total;
    totals.charge_total = charge_total;
    totals.tax_total = tax_total;
    totals.tax_basis_total = tax_basis_total;
    totals.grand_total = grand_total;
    totals.due_payable = due_payable;

    let presence = &mut totals.presence;
    presence.line_total = Presence::Present;
    presence.allowance_total = Presence::of(invoice.allowances_charges.iter().any(|ac| !ac.is_charge));
    presence.charge_total = Presence::of(invoice.allowances_charges.iter().any(|ac| ac.is_charge));
    presence.tax_basis_total = Presence::Present;
    presence.tax_total = Presence::Present;
    presence.grand_total = Presence::Present;
    presence.due_payable = Presence::Present;
    Ok(())
}

fn overflow(what: impl Into<String>) -> InvoiceError {
    InvoiceError::Overflow(what.into())
}
