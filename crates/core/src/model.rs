//! Worksheets, raw payloads, pages and transform state.

use crate::value::Scalar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a worksheet is addressed on the query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorksheetId {
    /// Numeric grid id (`gid=`).
    Gid(u64),
    /// Worksheet name (`sheet=`).
    Name(String),
}

impl fmt::Display for WorksheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gid(gid) => write!(f, "{gid}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// One tabular source inside a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worksheet {
    pub title: String,
    pub id: WorksheetId,
    /// Display label from static configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Worksheet {
    pub fn new(title: impl Into<String>, id: WorksheetId) -> Self {
        Self {
            title: title.into(),
            id,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label if configured, otherwise the title.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.title)
    }

    /// Does `query` name this worksheet (title, label or id)?
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.title == query
            || self.label.as_deref() == Some(query)
            || self.id.to_string() == query
    }
}

/// Result of worksheet discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub worksheets: Vec<Worksheet>,
    /// Set when discovery failed and `worksheets` holds the synthetic fallback.
    pub degraded: bool,
    pub reason: Option<String>,
}

impl Discovery {
    pub fn found(worksheets: Vec<Worksheet>) -> Self {
        Self {
            worksheets,
            degraded: false,
            reason: None,
        }
    }

    /// A single worksheet standing in for the whole spreadsheet.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            worksheets: vec![Worksheet::new("Sheet1", WorksheetId::Gid(0))],
            degraded: true,
            reason: Some(reason.into()),
        }
    }
}

/// Declared type of a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    Number,
    String,
    Boolean,
    Date,
    DateTime,
    TimeOfDay,
    #[default]
    Unknown,
}

impl ColumnKind {
    /// Map a protocol type name (`number`, `date`, ...) to a kind.
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "number" => Self::Number,
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "timeofday" => Self::TimeOfDay,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn is_date(self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

/// Column descriptor as delivered by the source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawColumn {
    pub id: String,
    pub label: String,
    pub kind: ColumnKind,
}

/// One cell as delivered by the source: raw value plus optional formatted text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawCell {
    #[serde(rename = "v", default)]
    pub value: Option<serde_json::Value>,
    #[serde(rename = "f", default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

impl RawCell {
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            value: Some(value),
            formatted: None,
        }
    }

    #[must_use]
    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = Some(formatted.into());
        self
    }
}

/// Canonical row, aligned with the page headers.
pub type Row = Vec<Scalar>;

/// A decoded batch of rows; the unit of caching and transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    /// Build a page stamped with the current time.
    ///
    /// Rows are padded with empty values or truncated to the header length.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self::with_fetched_at(headers, rows, Utc::now())
    }

    pub fn with_fetched_at(headers: Vec<String>, mut rows: Vec<Row>, fetched_at: DateTime<Utc>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.resize_with(width, Scalar::empty);
        }
        Self {
            headers,
            rows,
            fetched_at,
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Same headers and timestamp, different rows.
    #[must_use]
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self::with_fetched_at(self.headers.clone(), rows, self.fetched_at)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Caller-owned search, filter and sort settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformState {
    pub search_term: String,
    pub filter_column: Option<String>,
    pub filter_value: Option<String>,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
}

impl TransformState {
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    #[must_use]
    pub fn with_filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter_column = Some(column.into());
        self.filter_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_column = Some(column.into());
        self.sort_direction = direction;
        self
    }

    /// Clicking a header: same column flips direction, a new column sorts ascending.
    #[must_use]
    pub fn toggle_sort(&self, column: &str) -> Self {
        let mut next = self.clone();
        if self.sort_column.as_deref() == Some(column) {
            next.sort_direction = self.sort_direction.toggled();
        } else {
            next.sort_column = Some(column.to_string());
            next.sort_direction = SortDirection::Asc;
        }
        next
    }
}
