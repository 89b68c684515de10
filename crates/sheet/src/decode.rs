//! Header-set derivation and row alignment.

use crate::locale::Locale;
use crate::normalize::normalize_cell;
use sheetview_core::{ColumnKind, RawCell, RawColumn, Row};
use std::collections::HashSet;

/// Derive unique column names from source column descriptors.
///
/// Uses the label, else the column id, else `Column N`. Repeated names get
/// `_2`, `_3`, ... appended, skipping suffixes that are already taken.
pub fn decode_headers(columns: &[RawColumn]) -> Vec<String> {
    let names: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let label = col.label.trim();
            if !label.is_empty() {
                label.to_string()
            } else if !col.id.trim().is_empty() {
                col.id.trim().to_string()
            } else {
                format!("Column {}", i + 1)
            }
        })
        .collect();
    dedupe_headers(names)
}

/// Make header names unique, keeping the first occurrence unchanged.
pub fn dedupe_headers(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        if seen.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let mut n = 2;
        let unique = loop {
            let candidate = format!("{name}_{n}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        taken.insert(unique.clone());
        seen.insert(unique.clone());
        out.push(unique);
    }
    out
}

/// Decode one raw row into exactly `header_len` canonical values.
///
/// Cells beyond the payload are empty; cells beyond `header_len` are dropped.
pub fn decode_row(
    cells: &[Option<RawCell>],
    kinds: &[ColumnKind],
    header_len: usize,
    locale: &Locale,
) -> Row {
    (0..header_len)
        .map(|i| {
            let cell = cells.get(i).and_then(Option::as_ref);
            let kind = kinds.get(i).copied().unwrap_or_default();
            normalize_cell(cell, kind, locale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sheetview_core::Scalar;

    fn col(id: &str, label: &str) -> RawColumn {
        RawColumn {
            id: id.to_string(),
            label: label.to_string(),
            kind: ColumnKind::Unknown,
        }
    }

    #[test]
    fn test_header_fallbacks() {
        let headers = decode_headers(&[col("A", "Nome"), col("B", ""), col("", " ")]);
        assert_eq!(headers, vec!["Nome", "B", "Column 3"]);
    }

    #[test]
    fn test_duplicate_headers_suffixed() {
        let headers = decode_headers(&[col("A", "x"), col("B", "x"), col("C", "x")]);
        assert_eq!(headers, vec!["x", "x_2", "x_3"]);
    }

    #[test]
    fn test_duplicate_suffix_skips_existing_name() {
        let headers = dedupe_headers(vec!["x".into(), "x".into(), "x_2".into()]);
        assert_eq!(headers, vec!["x", "x_3", "x_2"]);
    }

    #[test]
    fn test_row_length_matches_headers() {
        let locale = Locale::default();
        let cells = vec![Some(RawCell::new(json!("a"))), None];
        for n in 0..6 {
            let row = decode_row(&cells, &[], n, &locale);
            assert_eq!(row.len(), n);
        }
        let row = decode_row(&cells, &[], 4, &locale);
        assert_eq!(row[0], Scalar::text("a"));
        assert_eq!(row[1], Scalar::empty());
        assert_eq!(row[3], Scalar::empty());
    }
}
