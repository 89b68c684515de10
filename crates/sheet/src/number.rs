//! Locale-aware numeric parsing.

use crate::locale::Locale;
use sheetview_core::Scalar;

const CURRENCY_PREFIXES: [&str; 6] = ["R$", "US$", "$", "€", "£", "¥"];
const SUFFIXES: [&str; 2] = ["%", "€"];

/// Parse a displayed number such as `1.234,56`, `R$ 10,00` or `-7`.
///
/// Thousands separators are removed and the decimal separator becomes `.`;
/// what remains must be an optionally signed decimal with at least one digit.
pub fn parse_number(input: &str, locale: &Locale) -> Option<f64> {
    let mut s = input.trim();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };
    s = rest.trim_start();
    for prefix in CURRENCY_PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest;
            break;
        }
    }
    for suffix in SUFFIXES {
        if let Some(rest) = s.strip_suffix(suffix) {
            s = rest;
            break;
        }
    }

    let mut cleaned = String::with_capacity(s.len() + 1);
    cleaned.push_str(sign);
    let mut digits = 0usize;
    let mut dots = 0usize;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == locale.thousands_separator {
            continue;
        }
        if ch == locale.decimal_separator || ch == '.' {
            dots += 1;
            cleaned.push('.');
        } else if ch.is_ascii_digit() {
            digits += 1;
            cleaned.push(ch);
        } else {
            return None;
        }
    }

    if digits == 0 || dots > 1 {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric reading of a canonical value. Booleans are never numbers.
pub fn to_number(value: &Scalar, locale: &Locale) -> Option<f64> {
    match value {
        Scalar::Number(n) => Some(*n),
        Scalar::Text(s) => parse_number(s, locale),
        Scalar::Bool(_) => None,
    }
}
