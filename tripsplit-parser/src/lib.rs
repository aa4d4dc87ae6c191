#![warn(clippy::uninlined_format_args)]

use nom::{
    branch::alt,
    character::complete::{char, digit1},
    combinator::opt,
    sequence::{pair, preceded},
    IResult, Parser,
};
use rust_decimal::Decimal;

/// Normalizes free-form amount text into a canonical decimal value.
///
/// Accepts values with a leading currency symbol, thousands separators,
/// and either a comma or a dot as the decimal mark. Parsing is total:
/// empty, unparseable, or unrepresentable input yields zero rather than
/// an error.
///
/// Every character that is not a digit, comma, dot, or minus sign is
/// stripped, the first comma becomes the decimal mark, and the longest
/// leading decimal literal of what remains is parsed. Trailing garbage is
/// ignored, so `"$ 12,50"` is `12.5` and `"1.234,56"` is `1.234` (the
/// first dot wins as the decimal mark).
pub fn parse_amount(input: &str) -> Decimal {
    let normalized = normalize(input);
    let Ok((_, (negative, int, frac))) = decimal_literal(&normalized) else {
        return Decimal::ZERO;
    };

    let digits = format!("{int}{frac}");
    let Ok(mantissa) = digits.parse::<i128>() else {
        return Decimal::ZERO;
    };
    let Ok(value) = Decimal::try_from_i128_with_scale(mantissa, frac.len() as u32) else {
        return Decimal::ZERO;
    };
    if negative {
        -value
    } else {
        value
    }
}

/// Keeps digits, separators, and sign; the first comma becomes a dot.
fn normalize(input: &str) -> String {
    let mut seen_comma = false;
    input
        .chars()
        .filter(|c| matches!(c, '0'..='9' | ',' | '.' | '-'))
        .map(|c| {
            if c == ',' && !seen_comma {
                seen_comma = true;
                '.'
            } else {
                c
            }
        })
        .collect()
}

// Longest leading decimal literal: optional minus, then `12`, `12.5`, or
// `.5`. A dot without trailing digits is left unconsumed, so `"5."` reads
// as `5`.
fn decimal_literal(input: &str) -> IResult<&str, (bool, &str, &str)> {
    pair(
        opt(char('-')),
        alt((
            pair(digit1, opt(preceded(char('.'), digit1)))
                .map(|(int, frac): (&str, Option<&str>)| (int, frac.unwrap_or(""))),
            preceded(char('.'), digit1).map(|frac: &str| ("", frac)),
        )),
    )
    .map(|(sign, (int, frac))| (sign.is_some(), int, frac))
    .parse(input)
}
