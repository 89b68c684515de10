//! Per-column numeric summaries.

use crate::locale::Locale;
use crate::number::to_number;
use serde::Serialize;
use sheetview_core::Page;

/// Aggregates over the numeric values of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    /// Number of numeric values.
    pub count: usize,
    pub sum: f64,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Summarize the requested columns. Unknown columns are skipped.
pub fn summarize(page: &Page, columns: &[String], locale: &Locale) -> Vec<ColumnSummary> {
    columns
        .iter()
        .filter_map(|name| {
            let idx = page.column_index(name)?;
            let values: Vec<f64> = page
                .rows
                .iter()
                .filter_map(|row| row.get(idx))
                .filter_map(|v| to_number(v, locale))
                .collect();

            let sum: f64 = values.iter().sum();
            let count = values.len();
            Some(ColumnSummary {
                column: name.clone(),
                count,
                sum,
                mean: (count > 0).then(|| sum / count as f64),
                min: values.iter().copied().reduce(f64::min),
                max: values.iter().copied().reduce(f64::max),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetview_core::Scalar;

    #[test]
    fn test_summarize() {
        let page = Page::new(
            vec!["Nome".into(), "Nota".into()],
            vec![
                vec![Scalar::text("Ana"), Scalar::text("8,5")],
                vec![Scalar::text("Beto"), Scalar::Number(7.0)],
                vec![Scalar::text("Caio"), Scalar::empty()],
            ],
        );
        let summaries = summarize(
            &page,
            &["Nota".to_string(), "Nome".to_string(), "Missing".to_string()],
            &Locale::default(),
        );
        assert_eq!(summaries.len(), 2);

        let nota = &summaries[0];
        assert_eq!(nota.count, 2);
        assert!((nota.sum - 15.5).abs() < f64::EPSILON);
        assert_eq!(nota.mean, Some(7.75));
        assert_eq!(nota.min, Some(7.0));
        assert_eq!(nota.max, Some(8.5));

        let nome = &summaries[1];
        assert_eq!(nome.count, 0);
        assert_eq!(nome.mean, None);
        assert_eq!(nome.min, None);
    }
}
