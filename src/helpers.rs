//! Normalization helpers for tag field values
//!
//! MT940 tags carry dates as bare digit pairs (`YYMMDD`) and amounts as
//! comma-decimal digit runs signed by a debit/credit indicator. The
//! extraction rules in [`crate::tags::grammar`] hand the raw captured text
//! to this module to turn it into typed values.

use std::fmt;

use chrono::NaiveDate;

/// Errors from turning captured text into typed values
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// Digit pairs did not form a calendar date
    InvalidDate {
        year: String,
        month: String,
        day: String,
    },
    /// Debit/credit indicator was neither `D` nor `C` (with optional `R` prefix)
    InvalidIndicator(String),
    /// Amount text was empty or not a comma-decimal digit run
    InvalidAmount(String),
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::InvalidDate { year, month, day } => {
                write!(f, "Invalid date: {}-{}-{}", year, month, day)
            }
            NormalizeError::InvalidIndicator(mark) => {
                write!(f, "Invalid debit/credit indicator: {}", mark)
            }
            NormalizeError::InvalidAmount(raw) => write!(f, "Invalid amount: {}", raw),
        }
    }
}

impl std::error::Error for NormalizeError {}

pub mod date {
    use super::{NaiveDate, NormalizeError};

    /// Parse a two-digit year plus month/day digit pairs into a date.
    ///
    /// Two-digit years map into 2000-2099; MT940 messages predating 2000 do
    /// not occur in practice.
    pub fn parse(yy: &str, mm: &str, dd: &str) -> Result<NaiveDate, NormalizeError> {
        let invalid = || NormalizeError::InvalidDate {
            year: yy.to_string(),
            month: mm.to_string(),
            day: dd.to_string(),
        };

        let year: i32 = yy.parse().map_err(|_| invalid())?;
        let month: u32 = mm.parse().map_err(|_| invalid())?;
        let day: u32 = dd.parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(2000 + year, month, day).ok_or_else(invalid)
    }
}

pub mod amount {
    use super::NormalizeError;

    /// Parse a comma-decimal amount string into a signed value.
    ///
    /// The debit/credit letter of `indicator` decides the sign: `D` yields a
    /// negative amount, `C` a positive one. A leading reversal marker `R`
    /// (as in `RD`/`RC` on statement lines) is skipped and does not flip the
    /// sign; reversals are reported separately by the statement-line fields.
    pub fn parse(indicator: &str, raw: &str) -> Result<f64, NormalizeError> {
        let sign = match indicator.strip_prefix('R').unwrap_or(indicator) {
            "D" => -1.0,
            "C" => 1.0,
            _ => return Err(NormalizeError::InvalidIndicator(indicator.to_string())),
        };

        let value: f64 = raw
            .replace(',', ".")
            .parse()
            .map_err(|_| NormalizeError::InvalidAmount(raw.to_string()))?;

        Ok(sign * value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_parse() {
        let parsed = date::parse("23", "06", "15").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2023, 6, 15).unwrap());
    }

    #[test]
    fn test_date_century_is_2000s() {
        let parsed = date::parse("00", "01", "01").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    }

    #[test]
    fn test_date_rejects_impossible_day() {
        let result = date::parse("23", "02", "30");
        assert!(result.is_err());
    }

    #[test]
    fn test_date_rejects_non_digits() {
        let result = date::parse("ab", "06", "15");
        assert!(result.is_err());
    }

    #[test]
    fn test_amount_credit_is_positive() {
        assert_eq!(amount::parse("C", "1234,56").unwrap(), 1234.56);
    }

    #[test]
    fn test_amount_debit_is_negative() {
        assert_eq!(amount::parse("D", "1234,56").unwrap(), -1234.56);
    }

    #[test]
    fn test_amount_reversal_prefix_keeps_sign() {
        assert_eq!(amount::parse("RC", "10,00").unwrap(), 10.0);
        assert_eq!(amount::parse("RD", "10,00").unwrap(), -10.0);
    }

    #[test]
    fn test_amount_trailing_comma() {
        // "500," is a whole amount with an empty decimal part
        assert_eq!(amount::parse("C", "500,").unwrap(), 500.0);
    }

    #[test]
    fn test_amount_rejects_empty() {
        assert!(amount::parse("C", "").is_err());
    }

    #[test]
    fn test_amount_rejects_bad_indicator() {
        assert!(amount::parse("X", "10,00").is_err());
        assert!(amount::parse("", "10,00").is_err());
    }
}
