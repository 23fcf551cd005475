//! Canton counts as printed on the results pages.
//!
//! Half cantons are written as fractions, so "4 3/2" means four full
//! cantons plus three half cantons.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::CantonCountError;

/// Sums the whitespace separated tokens of `input`. A token is either a
/// decimal literal or a fraction `a/b` of two integers.
pub fn parse_canton_count(input: &str) -> Result<Decimal, CantonCountError> {
    let invalid = |token: &str| CantonCountError {
        token: token.to_string(),
        input: input.to_string(),
    };

    let mut count = Decimal::ZERO;
    for token in input.split_whitespace() {
        let value = match token.split_once('/') {
            Some((dividend, divisor)) => {
                let dividend: i64 = dividend.parse().map_err(|_| invalid(token))?;
                let divisor: i64 = divisor.parse().map_err(|_| invalid(token))?;
                Decimal::from(dividend)
                    .checked_div(Decimal::from(divisor))
                    .ok_or_else(|| invalid(token))?
            }
            None => Decimal::from_str(token).map_err(|_| invalid(token))?,
        };
        count = count.checked_add(value).ok_or_else(|| invalid(token))?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn whole_number() {
        assert_eq!(parse_canton_count("7").unwrap(), dec("7"));
    }

    #[test]
    fn whole_and_half_cantons() {
        assert_eq!(parse_canton_count("4 3/2").unwrap(), dec("5.5"));
        assert_eq!(parse_canton_count("7 3/2").unwrap(), dec("8.5"));
        assert_eq!(parse_canton_count("11 1/2").unwrap(), dec("11.5"));
    }

    #[test]
    fn only_half_cantons() {
        assert_eq!(parse_canton_count("1/2").unwrap(), dec("0.5"));
        assert_eq!(parse_canton_count("0 0/2").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn repeated_whitespace_is_ignored() {
        assert_eq!(parse_canton_count("  12   5/2 ").unwrap(), dec("14.5"));
        assert_eq!(parse_canton_count("12\u{a0}5/2").unwrap(), dec("14.5"));
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(parse_canton_count("").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn decimal_literal() {
        assert_eq!(parse_canton_count("8.5").unwrap(), dec("8.5"));
    }

    #[test]
    fn sum_of_joined_tokens() {
        for (a, b) in [("7", "3/2"), ("12", "5"), ("1/2", "4/2"), ("0", "23")] {
            let joined = parse_canton_count(&format!("{a} {b}")).unwrap();
            let separate = parse_canton_count(a).unwrap() + parse_canton_count(b).unwrap();
            assert_eq!(joined, separate, "{a} + {b}");
        }
    }

    #[test]
    fn rejects_garbage_token() {
        let err = parse_canton_count("4 drei").unwrap_err();
        assert_eq!(err.token, "drei");
        assert_eq!(err.input, "4 drei");
    }

    #[test]
    fn rejects_malformed_fraction() {
        assert!(parse_canton_count("3/").is_err());
        assert!(parse_canton_count("1.5/2").is_err());
        assert!(parse_canton_count("1/2/3").is_err());
    }

    #[test]
    fn rejects_division_by_zero() {
        assert!(parse_canton_count("3/0").is_err());
    }
}
