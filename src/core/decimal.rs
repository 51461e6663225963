//! Rounding, precision and per-syntax date helpers.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::InvoiceError;

/// Expected date shape in CII (`udt:DateTimeString format="102"`).
pub const CII_DATE_FORMAT: &str = "YYYYMMDD";
/// Expected date shape in UBL.
pub const UBL_DATE_FORMAT: &str = "YYYY-MM-DD";

/// Round to `dp` fractional digits, halves away from zero.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of fractional digits carried by the decimal's exponent.
/// `1.50` has two, `1.5` has one.
pub fn fractional_digits(value: Decimal) -> u32 {
    value.scale()
}

/// Sum of `values`, or `None` once the running total leaves the `Decimal` range.
pub fn checked_sum<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
}

/// Parse a CII date: exactly eight digits, `YYYYMMDD`.
pub fn parse_date_cii(value: &str, field: &str) -> Result<NaiveDate, InvoiceError> {
    let trimmed = value.trim();
    if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_date(value, field, CII_DATE_FORMAT));
    }
    NaiveDate::parse_from_str(trimmed, "%Y%m%d")
        .map_err(|_| invalid_date(value, field, CII_DATE_FORMAT))
}

/// Parse a UBL date: exactly `YYYY-MM-DD`.
pub fn parse_date_ubl(value: &str, field: &str) -> Result<NaiveDate, InvoiceError> {
    let trimmed = value.trim();
    let bytes = trimmed.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(invalid_date(value, field, UBL_DATE_FORMAT));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| invalid_date(value, field, UBL_DATE_FORMAT))
}

pub fn format_date_cii(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn format_date_ubl(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn invalid_date(value: &str, field: &str, expected: &'static str) -> InvoiceError {
    InvoiceError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_halves_away_from_zero() {
        assert_eq!(round_half_up(dec!(2.345), 2), dec!(2.35));
        assert_eq!(round_half_up(dec!(-2.345), 2), dec!(-2.35));
        assert_eq!(round_half_up(dec!(2.344), 2), dec!(2.34));
        assert_eq!(round_half_up(dec!(100.001), 2), dec!(100.00));
        assert_eq!(round_half_up(dec!(0.125), 2), dec!(0.13));
    }

    #[test]
    fn rounding_keeps_shorter_scales() {
        assert_eq!(round_half_up(dec!(19), 2).to_string(), "19");
        assert_eq!(round_half_up(dec!(19.5), 2).to_string(), "19.5");
    }

    #[test]
    fn fractional_digits_follow_the_exponent() {
        assert_eq!(fractional_digits(dec!(100.123)), 3);
        assert_eq!(fractional_digits(dec!(100.10)), 2);
        assert_eq!(fractional_digits(dec!(100)), 0);
    }

    #[test]
    fn checked_sum_stops_at_the_range_limit() {
        assert_eq!(checked_sum([dec!(1.50), dec!(2.25)]), Some(dec!(3.75)));
        assert_eq!(checked_sum(Vec::<Decimal>::new()), Some(Decimal::ZERO));
        assert_eq!(checked_sum([Decimal::MAX, Decimal::MAX]), None);
    }

    #[test]
    fn cii_dates() {
        let d = parse_date_cii("20240615", "BT-2").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        assert_eq!(format_date_cii(d), "20240615");
        assert!(parse_date_cii("2024-06-15", "BT-2").is_err());
        assert!(parse_date_cii("20241315", "BT-2").is_err());
        assert!(parse_date_cii("202406", "BT-2").is_err());
    }

    #[test]
    fn ubl_dates() {
        let d = parse_date_ubl("2024-06-15", "BT-2").unwrap();
        assert_eq!(format_date_ubl(d), "2024-06-15");
        assert!(parse_date_ubl("20240615", "BT-2").is_err());
        assert!(parse_date_ubl("2024-6-15", "BT-2").is_err());
        assert!(parse_date_ubl("2024-02-30", "BT-2").is_err());
    }

    #[test]
    fn date_error_names_field_and_format() {
        let err = parse_date_ubl("15.06.2024", "BT-2 issue date").unwrap_err();
        match err {
            InvoiceError::InvalidDate {
                field,
                value,
                expected,
            } => {
                assert_eq!(field, "BT-2 issue date");
                assert_eq!(value, "15.06.2024");
                assert_eq!(expected, UBL_DATE_FORMAT);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
