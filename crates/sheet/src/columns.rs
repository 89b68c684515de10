//! Per-worksheet column projection: order, hide, rename.

use crate::decode::dedupe_headers;
use crate::format::DisplayFormat;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sheetview_core::{Page, SortDirection, TransformState};

/// Sort applied when the caller has not picked one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSort {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Static presentation settings for one worksheet.
///
/// `order`, `hide` and `rename` use source column names. `default_sort`,
/// `summarize` and `formats` use the names shown after renaming.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub order: Vec<String>,
    pub rename: IndexMap<String, String>,
    pub hide: Vec<String>,
    pub default_sort: Option<DefaultSort>,
    pub summarize: Vec<String>,
    pub formats: IndexMap<String, DisplayFormat>,
}

impl ColumnConfig {
    /// Does projection leave pages untouched?
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.order.is_empty() && self.rename.is_empty() && self.hide.is_empty()
    }

    /// Display format configured for a shown column.
    #[must_use]
    pub fn format_for(&self, column: &str) -> Option<&DisplayFormat> {
        self.formats.get(column)
    }

    /// Fill in the default sort when `state` has none.
    #[must_use]
    pub fn effective_state(&self, state: &TransformState) -> TransformState {
        match (&state.sort_column, &self.default_sort) {
            (None, Some(sort)) => state.clone().with_sort(sort.column.clone(), sort.direction),
            _ => state.clone(),
        }
    }
}

/// Reorder, drop and rename columns of a page.
///
/// Columns named in `order` come first, the rest follow in source order.
/// Names in the configuration that the page does not have are ignored.
pub fn project(page: &Page, config: &ColumnConfig) -> Page {
    if config.is_identity() {
        return page.clone();
    }

    let mut indices: Vec<usize> = Vec::with_capacity(page.headers.len());
    for name in &config.order {
        if let Some(i) = page.column_index(name) {
            if !indices.contains(&i) {
                indices.push(i);
            }
        }
    }
    for i in 0..page.headers.len() {
        if !indices.contains(&i) {
            indices.push(i);
        }
    }
    indices.retain(|&i| !config.hide.contains(&page.headers[i]));

    let headers: Vec<String> = indices
        .iter()
        .map(|&i| {
            let source = &page.headers[i];
            config.rename.get(source).unwrap_or(source).clone()
        })
        .collect();

    let rows = page
        .rows
        .iter()
        .map(|row| {
            indices
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Page::with_fetched_at(dedupe_headers(headers), rows, page.fetched_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetview_core::Scalar;

    fn page() -> Page {
        Page::new(
            vec!["id".into(), "nome".into(), "nota".into(), "obs".into()],
            vec![vec![
                Scalar::Number(1.0),
                Scalar::text("Ana"),
                Scalar::text("8,5"),
                Scalar::text("-"),
            ]],
        )
    }

    #[test]
    fn test_identity() {
        let p = page();
        assert_eq!(project(&p, &ColumnConfig::default()), p);
    }

    #[test]
    fn test_order_hide_rename() {
        let config = ColumnConfig {
            order: vec!["nota".into(), "nome".into(), "ghost".into()],
            hide: vec!["obs".into()],
            rename: [("nome".to_string(), "Name".to_string())].into_iter().collect(),
            ..ColumnConfig::default()
        };
        let out = project(&page(), &config);
        assert_eq!(out.headers, vec!["nota", "Name", "id"]);
        assert_eq!(
            out.rows[0],
            vec![Scalar::text("8,5"), Scalar::text("Ana"), Scalar::Number(1.0)]
        );
    }

    #[test]
    fn test_rename_collision_is_deduplicated() {
        let config = ColumnConfig {
            rename: [("nome".to_string(), "id".to_string())].into_iter().collect(),
            ..ColumnConfig::default()
        };
        let out = project(&page(), &config);
        assert_eq!(out.headers, vec!["id", "id_2", "nota", "obs"]);
    }

    #[test]
    fn test_default_sort_only_when_unset() {
        let config = ColumnConfig {
            default_sort: Some(DefaultSort {
                column: "nota".into(),
                direction: SortDirection::Desc,
            }),
            ..ColumnConfig::default()
        };
        let state = config.effective_state(&TransformState::default());
        assert_eq!(state.sort_column.as_deref(), Some("nota"));
        assert_eq!(state.sort_direction, SortDirection::Desc);

        let chosen = TransformState::default().with_sort("id", SortDirection::Asc);
        assert_eq!(config.effective_state(&chosen), chosen);
    }
}
