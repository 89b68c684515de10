//! Display-time formatting of canonical values.

use crate::locale::Locale;
use crate::number::to_number;
use serde::{Deserialize, Serialize};
use sheetview_core::{format_number, Scalar};

/// Per-column display format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DisplayFormat {
    #[default]
    Plain,
    Decimal {
        places: usize,
    },
    /// Ratio shown as a percentage (`0.5` → `50%`).
    Percent {
        places: usize,
    },
    Currency {
        symbol: String,
        places: usize,
    },
}

/// Render a value for display.
///
/// Booleans use the locale's yes/no tokens. Numeric formats also apply to
/// text that parses as a number; other text is shown as-is.
pub fn format_scalar(value: &Scalar, format: Option<&DisplayFormat>, locale: &Locale) -> String {
    if let Scalar::Bool(b) = value {
        return if *b { locale.yes.clone() } else { locale.no.clone() };
    }

    let format = match format {
        None | Some(DisplayFormat::Plain) => return value.to_string(),
        Some(format) => format,
    };
    let Some(n) = to_number(value, locale) else {
        return value.to_string();
    };

    match format {
        DisplayFormat::Plain => format_number(n),
        DisplayFormat::Decimal { places } => format_fixed(n, *places, locale),
        DisplayFormat::Percent { places } => format!("{}%", format_fixed(n * 100.0, *places, locale)),
        DisplayFormat::Currency { symbol, places } => {
            let body = format_fixed(n.abs(), *places, locale);
            if n < 0.0 {
                format!("-{symbol} {body}")
            } else {
                format!("{symbol} {body}")
            }
        }
    }
}

/// Fixed decimals with locale separators: `1234.5` → `1.234,50`.
pub fn format_fixed(n: f64, places: usize, locale: &Locale) -> String {
    let fixed = format!("{:.*}", places, n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(locale.thousands_separator);
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if n < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push(locale.decimal_separator);
        out.push_str(frac_part);
    }
    out
}
