//! Client-side filter, search and sort.
//!
//! Everything here is a pure function of its inputs. Unknown columns, empty
//! terms and unmatched filters are no-ops, never errors.

use crate::dates::parse_date;
use crate::locale::Locale;
use crate::number::to_number;
use chrono::NaiveDateTime;
use sheetview_core::{Page, Row, Scalar, SortDirection, TransformState};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Apply filter, search and sort, in that order.
pub fn apply(rows: &[Row], headers: &[String], state: &TransformState, locale: &Locale) -> Vec<Row> {
    let mut out: Vec<Row> = rows.to_vec();

    if let (Some(column), Some(value)) = (&state.filter_column, &state.filter_value) {
        if !column.is_empty() && !value.is_empty() {
            if let Some(idx) = headers.iter().position(|h| h == column) {
                let wanted = value.to_lowercase();
                out.retain(|row| {
                    row.get(idx)
                        .is_some_and(|cell| cell.to_string().to_lowercase() == wanted)
                });
            }
        }
    }

    if !state.search_term.is_empty() {
        let term = state.search_term.to_lowercase();
        out.retain(|row| {
            row.iter()
                .any(|cell| cell.to_string().to_lowercase().contains(&term))
        });
    }

    if let Some(column) = &state.sort_column {
        if let Some(idx) = headers.iter().position(|h| h == column) {
            out = sort_rows(out, idx, state.sort_direction, locale);
        }
    }

    out
}

/// [`apply`] over a page, keeping its headers and timestamp.
pub fn apply_to_page(page: &Page, state: &TransformState, locale: &Locale) -> Page {
    page.with_rows(apply(&page.rows, &page.headers, state, locale))
}

/// Precomputed readings of one sort cell.
struct SortKey {
    number: Option<f64>,
    date: Option<NaiveDateTime>,
    folded: String,
}

impl SortKey {
    fn new(value: Option<&Scalar>, locale: &Locale) -> Self {
        let Some(value) = value else {
            return Self {
                number: None,
                date: None,
                folded: String::new(),
            };
        };
        let date = match value {
            Scalar::Text(s) => parse_date(s, locale),
            _ => None,
        };
        Self {
            number: to_number(value, locale),
            date,
            folded: fold(&value.to_string()),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        if let (Some(a), Some(b)) = (self.number, other.number) {
            return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        }
        if let (Some(a), Some(b)) = (self.date, other.date) {
            return a.cmp(&b);
        }
        self.folded.cmp(&other.folded)
    }
}

/// Case- and accent-insensitive collation key.
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Three-tier comparison: numeric, then chronological, then folded text.
pub fn compare_values(a: &Scalar, b: &Scalar, locale: &Locale) -> Ordering {
    SortKey::new(Some(a), locale).compare(&SortKey::new(Some(b), locale))
}

/// Stable sort by one column.
///
/// Equal keys keep their input order in both directions. The comparator is
/// not guaranteed to be a total order on mixed columns, so a merge sort is
/// used instead of `slice::sort_by`.
pub fn sort_rows(rows: Vec<Row>, column: usize, direction: SortDirection, locale: &Locale) -> Vec<Row> {
    let keyed: Vec<(usize, SortKey, Row)> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let key = SortKey::new(row.get(column), locale);
            (i, key, row)
        })
        .collect();

    let sorted = merge_sort(keyed, &|a: &(usize, SortKey, Row), b: &(usize, SortKey, Row)| {
        let ord = a.1.compare(&b.1);
        let ord = match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        ord.then(a.0.cmp(&b.0))
    });

    sorted.into_iter().map(|(_, _, row)| row).collect()
}

fn merge_sort<T, F>(mut items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        out.extend(next);
    }
    out
}
