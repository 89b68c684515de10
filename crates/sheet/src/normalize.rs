//! Raw cell payload to canonical scalar.

use crate::dates::{looks_like_date, parse_date, to_iso_date};
use crate::locale::Locale;
use regex::Regex;
use serde_json::Value as JsonValue;
use sheetview_core::{format_number, ColumnKind, RawCell, Scalar};

fn date_hint_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\by\b|\bY\b|dd|mm|yyyy|/|-").expect("valid regex"))
}

/// Does a formatted-display string look like it came from a date format?
///
/// Any slash or dash counts, so `-3` and `1/2` are flagged as well.
pub fn is_date_hint(formatted: &str) -> bool {
    date_hint_regex().is_match(formatted)
}

fn wants_date(cell: &RawCell, raw: &JsonValue, kind: ColumnKind) -> bool {
    if kind.is_date() {
        return true;
    }
    if cell.formatted.as_deref().is_some_and(is_date_hint) {
        return true;
    }
    matches!(raw, JsonValue::String(s) if looks_like_date(s))
}

/// Plain text for a value that is not read as a date. Arrays and objects
/// (a `timeofday` cell, for one) prefer the formatted text when it is given.
fn raw_string_form(cell: &RawCell, raw: &JsonValue) -> String {
    match raw {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_number),
        other => cell
            .formatted
            .clone()
            .unwrap_or_else(|| other.to_string()),
    }
}

/// Convert one raw cell into its canonical value.
///
/// Absent cells and null values become empty text. Values that look like
/// dates become `YYYY-MM-DD` text, or their plain string form when no date
/// can be read from them. Everything else passes through unchanged.
pub fn normalize_cell(cell: Option<&RawCell>, kind: ColumnKind, locale: &Locale) -> Scalar {
    let Some(cell) = cell else {
        return Scalar::empty();
    };
    let raw = match cell.value.as_ref() {
        None | Some(JsonValue::Null) => return Scalar::empty(),
        Some(raw) => raw,
    };

    if let JsonValue::Bool(b) = raw {
        return Scalar::Bool(*b);
    }

    if wants_date(cell, raw, kind) {
        let parsed = match raw {
            JsonValue::String(s) => parse_date(s, locale),
            _ => None,
        }
        .or_else(|| cell.formatted.as_deref().and_then(|f| parse_date(f, locale)));

        return match parsed {
            Some(dt) => Scalar::Text(to_iso_date(&dt)),
            None => Scalar::Text(raw_string_form(cell, raw)),
        };
    }

    match raw {
        JsonValue::Number(n) => n
            .as_f64()
            .map_or_else(|| Scalar::Text(n.to_string()), Scalar::Number),
        JsonValue::String(s) => Scalar::Text(s.clone()),
        other => Scalar::Text(raw_string_form(cell, other)),
    }
}
