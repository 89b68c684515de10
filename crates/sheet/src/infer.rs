//! Numeric column inference.

use crate::locale::Locale;
use crate::number::to_number;
use indexmap::IndexSet;
use sheetview_core::Row;

/// Rows inspected per column.
pub const SAMPLE_ROWS: usize = 200;

/// Columns whose sampled non-empty values are at least 90% numeric.
///
/// Columns with no non-empty sampled value are never numeric. The result
/// keeps header order.
pub fn infer_numeric(rows: &[Row], headers: &[String], locale: &Locale) -> IndexSet<String> {
    let sample = &rows[..rows.len().min(SAMPLE_ROWS)];

    headers
        .iter()
        .enumerate()
        .filter(|(col, _)| {
            let mut present = 0usize;
            let mut numeric = 0usize;
            for value in sample.iter().filter_map(|row| row.get(*col)) {
                if value.is_empty() {
                    continue;
                }
                present += 1;
                if to_number(value, locale).is_some() {
                    numeric += 1;
                }
            }
            present > 0 && numeric * 10 >= present * 9
        })
        .map(|(_, name)| name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetview_core::Scalar;

    #[test]
    fn test_empty_column_is_not_numeric() {
        let rows = vec![vec![Scalar::empty()], vec![Scalar::empty()]];
        let numeric = infer_numeric(&rows, &["x".to_string()], &Locale::default());
        assert!(numeric.is_empty());
    }

    #[test]
    fn test_only_first_rows_are_sampled() {
        let mut rows: Vec<Row> = (0..SAMPLE_ROWS).map(|i| vec![Scalar::Number(i as f64)]).collect();
        rows.extend((0..SAMPLE_ROWS).map(|_| vec![Scalar::text("text")]));
        let numeric = infer_numeric(&rows, &["n".to_string()], &Locale::default());
        assert!(numeric.contains("n"));
    }

    #[test]
    fn test_booleans_are_not_numeric() {
        let rows = vec![vec![Scalar::Bool(true)], vec![Scalar::Bool(false)]];
        let numeric = infer_numeric(&rows, &["b".to_string()], &Locale::default());
        assert!(numeric.is_empty());
    }
}
