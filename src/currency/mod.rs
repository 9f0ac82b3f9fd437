//! Money handling: cent rounding, locale text parsing and display formatting.
//!
//! Amounts typed by users arrive as masked text such as `R$1234,56`. Only the
//! `<symbol><digits>,<cents>` shape is accepted; thousands grouping such as
//! `R$1.234,56` is rejected rather than guessed at.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Number of fractional digits kept for every stored amount.
pub const CENTS_SCALE: u32 = 2;

/// Text formatting preferences for amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    #[serde(default)]
    pub negative_style: NegativeStyle,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "R$".into(),
            decimal_separator: ',',
            negative_style: NegativeStyle::Sign,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

/// Rounds to cents, half away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENTS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a floating point amount coming off the wire into a cent-precise decimal.
pub fn amount_from_f64(value: f64) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteAmount(value.to_string()));
    }
    Decimal::from_f64(value)
        .map(round_cents)
        .ok_or_else(|| ValidationError::MalformedAmount(value.to_string()))
}

/// Parses `R$1234,56`-style text. A leading `-` is accepted before or after
/// the symbol, the symbol itself is optional, and at most two fractional
/// digits are allowed.
pub fn parse_amount(text: &str, format: &CurrencyFormat) -> Result<Decimal, ValidationError> {
    let malformed = || ValidationError::MalformedAmount(text.to_string());

    let mut rest = text.trim();
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped.trim_start();
    }
    if !format.symbol.is_empty() {
        if let Some(stripped) = rest.strip_prefix(format.symbol.as_str()) {
            rest = stripped.trim_start();
        }
    }
    if !negative {
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            rest = stripped;
        }
    }

    let (int_part, frac_part) = match rest.split_once(format.decimal_separator) {
        Some((int_part, frac_part)) => {
            if frac_part.is_empty() || frac_part.len() > CENTS_SCALE as usize {
                return Err(malformed());
            }
            (int_part, frac_part)
        }
        None => (rest, "0"),
    };
    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(malformed());
    }

    let value: Decimal = format!("{int_part}.{frac_part}")
        .parse()
        .map_err(|_| malformed())?;
    Ok(if negative { -value } else { value })
}

/// Renders an amount with exactly two decimals, e.g. `R$1234,50` or `-R$50,00`.
pub fn format_amount(amount: Decimal, format: &CurrencyFormat) -> String {
    let mut magnitude = round_cents(amount.abs());
    magnitude.rescale(CENTS_SCALE);
    let digits = magnitude.to_string();
    let body = match format.decimal_separator {
        '.' => digits,
        separator => digits.replacen('.', &separator.to_string(), 1),
    };
    let rendered = format!("{}{}", format.symbol, body);
    if amount.is_sign_negative() && !magnitude.is_zero() {
        match format.negative_style {
            NegativeStyle::Sign => format!("-{rendered}"),
            NegativeStyle::Parentheses => format!("({rendered})"),
        }
    } else {
        rendered
    }
}

pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    date.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brl() -> CurrencyFormat {
        CurrencyFormat::default()
    }

    #[test]
    fn parses_masked_input() {
        assert_eq!(
            parse_amount("R$1234,56", &brl()),
            Ok(Decimal::new(123456, 2))
        );
        assert_eq!(parse_amount("R$ 7,5", &brl()), Ok(Decimal::new(75, 1)));
        assert_eq!(parse_amount("-R$20,00", &brl()), Ok(Decimal::new(-2000, 2)));
        assert_eq!(parse_amount("15", &brl()), Ok(Decimal::from(15)));
    }

    #[test]
    fn rejects_grouping_and_extra_precision() {
        for text in ["R$1.234,56", "R$1234,567", "R$", "R$12,", "R$,50", "abc", ""] {
            assert!(
                matches!(
                    parse_amount(text, &brl()),
                    Err(ValidationError::MalformedAmount(_))
                ),
                "`{text}` should be rejected"
            );
        }
    }

    #[test]
    fn formats_two_decimals_with_comma() {
        assert_eq!(format_amount(Decimal::new(123456, 2), &brl()), "R$1234,56");
        assert_eq!(format_amount(Decimal::from(50), &brl()), "R$50,00");
        assert_eq!(format_amount(Decimal::new(-5, 1), &brl()), "-R$0,50");
        assert_eq!(format_amount(Decimal::new(-1, 3), &brl()), "R$0,00");
    }

    #[test]
    fn parentheses_style_wraps_negatives() {
        let format = CurrencyFormat {
            negative_style: NegativeStyle::Parentheses,
            ..brl()
        };
        assert_eq!(format_amount(Decimal::new(-990, 2), &format), "(R$9,90)");
    }

    #[test]
    fn text_round_trips() {
        for text in ["R$0,01", "R$1234,56", "-R$10,00"] {
            let parsed = parse_amount(text, &brl()).unwrap();
            assert_eq!(format_amount(parsed, &brl()), text);
        }
    }

    #[test]
    fn non_finite_floats_fail() {
        assert!(matches!(
            amount_from_f64(f64::NAN),
            Err(ValidationError::NonFiniteAmount(_))
        ));
        assert_eq!(amount_from_f64(12.5), Ok(Decimal::new(1250, 2)));
    }
}
