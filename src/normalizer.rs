//! Numeric normalization
//!
//! Exports written under European locales use `,` as the decimal separator
//! and `.` as a thousands separator (e.g. `64.242.400` for 64242.400).
//! This module parses such locale-ambiguous decimal strings into floats.

use crate::error::RestoreError;

/// Parse a decimal string that may use either `.` or `,` as the decimal
/// separator and `.` as a thousands separator.
///
/// An empty or blank string parses to 0.0. Any other string that does not
/// reduce to a valid float literal is an error carrying the original value.
pub fn parse_decimal(raw: &str) -> Result<f64, RestoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let cleaned = if trimmed.contains(',') {
        // Comma is the decimal separator, any periods are thousands separators
        trimmed.replace('.', "").replace(',', ".")
    } else {
        match trimmed.rsplit_once('.') {
            // More than one period: all but the last are thousands separators
            Some((head, tail)) if head.contains('.') => {
                format!("{}.{}", head.replace('.', ""), tail)
            }
            _ => trimmed.to_string(),
        }
    };

    cleaned
        .parse::<f64>()
        .map_err(|_| RestoreError::InvalidNumber(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_float_unchanged() {
        assert_eq!(parse_decimal("12.5").unwrap(), 12.5);
        assert_eq!(parse_decimal("0").unwrap(), 0.0);
        assert_eq!(parse_decimal("100").unwrap(), 100.0);
    }

    #[test]
    fn test_comma_decimal_separator() {
        assert_eq!(parse_decimal("12,5").unwrap(), 12.5);
        assert_eq!(parse_decimal("0,001").unwrap(), 0.001);
    }

    #[test]
    fn test_thousands_separators_with_comma_decimal() {
        assert_eq!(parse_decimal("1.234.567,89").unwrap(), 1234567.89);
    }

    #[test]
    fn test_thousands_separators_with_period_decimal() {
        assert_eq!(parse_decimal("64.242.400").unwrap(), 64242.4);
        assert_eq!(parse_decimal("1.234.5").unwrap(), 1234.5);
    }

    #[test]
    fn test_blank_input_is_zero() {
        assert_eq!(parse_decimal("").unwrap(), 0.0);
        assert_eq!(parse_decimal("   ").unwrap(), 0.0);
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(parse_decimal(" 7.25 ").unwrap(), 7.25);
    }

    #[test]
    fn test_invalid_value_reports_original() {
        let err = parse_decimal("12x5").unwrap_err();
        match err {
            RestoreError::InvalidNumber(value) => assert_eq!(value, "12x5"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
