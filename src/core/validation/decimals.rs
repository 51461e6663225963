use rust_decimal::Decimal;

use crate::core::decimal::fractional_digits;
use crate::core::rules::*;
use crate::core::types::*;

use super::Findings;

/// Largest scale allowed for monetary amounts.
const AMOUNT_DIGITS: u32 = 2;

fn amount(out: &mut Findings, rule: &'static Rule, field: impl std::fmt::Display, value: Decimal) {
    let digits = fractional_digits(value);
    if digits > AMOUNT_DIGITS {
        out.violation(
            rule,
            format!("{field} {value} has {digits} decimals, at most {AMOUNT_DIGITS} allowed"),
        );
    }
}

/// Decimal precision rules (BR-DEC-*).
pub(super) fn check(invoice: &Invoice, out: &mut Findings) {
    // BR-DEC-01 .. BR-DEC-06
    for (i, ac) in invoice.allowances().enumerate() {
        amount(out, &BR_DEC_01, format_args!("allowance[{i}] amount"), ac.amount);
    }
    for (i, ac) in invoice.allowances().enumerate() {
        if let Some(basis) = ac.basis_amount {
            amount(out, &BR_DEC_02, format_args!("allowance[{i}] base amount"), basis);
        }
    }
    for (i, ac) in invoice.charges().enumerate() {
        amount(out, &BR_DEC_05, format_args!("charge[{i}] amount"), ac.amount);
    }
    for (i, ac) in invoice.charges().enumerate() {
        if let Some(basis) = ac.basis_amount {
            amount(out, &BR_DEC_06, format_args!("charge[{i}] base amount"), basis);
        }
    }

    // BR-DEC-09 .. BR-DEC-18
    let t = &invoice.totals;
    amount(out, &BR_DEC_09, "sum of line net amounts", t.line_total);
    amount(out, &BR_DEC_10, "sum of allowances", t.allowance_total);
    amount(out, &BR_DEC_11, "sum of charges", t.charge_total);
    amount(out, &BR_DEC_12, "total without VAT", t.tax_basis_total);
    amount(out, &BR_DEC_13, "total VAT amount", t.tax_total);
    amount(out, &BR_DEC_14, "total with VAT", t.grand_total);
    if let Some(accounting) = t.tax_total_accounting {
        amount(out, &BR_DEC_15, "total VAT in accounting currency", accounting);
    }
    amount(out, &BR_DEC_16, "paid amount", t.prepaid);
    amount(out, &BR_DEC_17, "rounding amount", t.rounding);
    amount(out, &BR_DEC_18, "amount due", t.due_payable);

    // BR-DEC-19, BR-DEC-20
    for (i, tax) in invoice.trade_taxes.iter().enumerate() {
        amount(out, &BR_DEC_19, format_args!("trade_taxes[{i}] taxable amount"), tax.basis_amount);
    }
    for (i, tax) in invoice.trade_taxes.iter().enumerate() {
        amount(out, &BR_DEC_20, format_args!("trade_taxes[{i}] tax amount"), tax.calculated_amount);
    }

    // BR-DEC-23 .. BR-DEC-28
    for (i, line) in invoice.lines.iter().enumerate() {
        amount(
            out,
            &BR_DEC_23,
            format_args!("lines[{i}] ({}): line net amount", line.id),
            line.line_total,
        );
    }
    let line_adjustments = [
        (false, &BR_DEC_24, &BR_DEC_25, "allowance"),
        (true, &BR_DEC_27, &BR_DEC_28, "charge"),
    ];
    for (is_charge, amount_rule, basis_rule, kind) in line_adjustments {
        for (i, line) in invoice.lines.iter().enumerate() {
            for ac in line.allowances_charges.iter().filter(|ac| ac.is_charge == is_charge) {
                amount(out, amount_rule, format_args!("lines[{i}] ({}): {kind}", line.id), ac.amount);
            }
        }
        for (i, line) in invoice.lines.iter().enumerate() {
            for ac in line.allowances_charges.iter().filter(|ac| ac.is_charge == is_charge) {
                if let Some(basis) = ac.basis_amount {
                    amount(
                        out,
                        basis_rule,
                        format_args!("lines[{i}] ({}): {kind} base amount", line.id),
                        basis,
                    );
                }
            }
        }
    }
}
