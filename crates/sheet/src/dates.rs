//! Date recognition for cell payloads and sort keys.

use crate::locale::Locale;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};

fn gviz_date_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^Date\((\d{1,4}),\s*(\d{1,2}),\s*(\d{1,2})(?:,\s*(\d{1,2}),\s*(\d{1,2}),\s*(\d{1,2})(?:,\s*\d{1,3})?)?\)$")
            .expect("valid regex")
    })
}

fn year_first_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2}))?(?:\.\d+)?Z?)?$")
            .expect("valid regex")
    })
}

fn year_last_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[-/](\d{1,2})[-/](\d{4})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2}))?)?$")
            .expect("valid regex")
    })
}

/// Loose shape test used by the normalizer: digits separated by `/` or `-`.
pub fn looks_like_date(s: &str) -> bool {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{2,4}[/-]\d{1,2}[/-]\d{1,2}").expect("valid regex"))
        .is_match(s)
        || is_gviz_date(s)
}

/// `Date(2024,0,15)` literal as emitted by the JSON query output.
pub fn is_gviz_date(s: &str) -> bool {
    s.starts_with("Date(") && s.ends_with(')')
}

fn num(caps: &Captures<'_>, idx: usize) -> u32 {
    caps.get(idx)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn build(year: u32, month: u32, day: u32, caps: &Captures<'_>, time_at: usize) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    date.and_hms_opt(num(caps, time_at), num(caps, time_at + 1), num(caps, time_at + 2))
}

/// Parse the date shapes a spreadsheet emits.
///
/// Accepts `Date(y,m,d[,h,mi,s[,ms]])` with a zero-based month, RFC 3339,
/// `YYYY-MM-DD` / `YYYY/MM/DD` with an optional time, and `DD/MM/YYYY` or
/// `MM/DD/YYYY` depending on [`Locale::day_first`].
pub fn parse_date(input: &str, locale: &Locale) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = gviz_date_regex().captures(s) {
        return build(num(&caps, 1), num(&caps, 2) + 1, num(&caps, 3), &caps, 4);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    if let Some(caps) = year_first_regex().captures(s) {
        return build(num(&caps, 1), num(&caps, 2), num(&caps, 3), &caps, 4);
    }

    if let Some(caps) = year_last_regex().captures(s) {
        let (first, second) = (num(&caps, 1), num(&caps, 2));
        let (day, month) = if locale.day_first {
            (first, second)
        } else {
            (second, first)
        };
        return build(num(&caps, 3), month, day, &caps, 4);
    }

    None
}

/// `YYYY-MM-DD` form of a parsed date.
pub fn to_iso_date(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d").to_string()
}
