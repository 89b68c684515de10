//! Row pipeline for sheetview
//!
//! Turns raw cell payloads into canonical rows and applies the client-side
//! transforms a viewer needs: filter, search, stable sort, column
//! projection, numeric inference, summaries, display formatting and CSV
//! export.
//!
//! # Examples
//!
//! ## Decoding a row
//!
//! ```
//! use serde_json::json;
//! use sheetview_core::{RawCell, Scalar};
//! use sheetview_sheet::{decode_row, Locale};
//!
//! let cells = vec![
//!     Some(RawCell::new(json!("Ana"))),
//!     Some(RawCell::new(json!("Date(2024,0,15)")).with_formatted("15/01/2024")),
//! ];
//! let row = decode_row(&cells, &[], 3, &Locale::default());
//!
//! assert_eq!(row, vec![Scalar::text("Ana"), Scalar::text("2024-01-15"), Scalar::empty()]);
//! ```
//!
//! ## Sorting and filtering
//!
//! ```
//! use sheetview_core::{Scalar, SortDirection, TransformState};
//! use sheetview_sheet::{apply, Locale};
//!
//! let headers = vec!["Nome".to_string(), "Nota".to_string()];
//! let rows = vec![
//!     vec![Scalar::text("Ana"), Scalar::text("8,5")],
//!     vec![Scalar::text("Beto"), Scalar::text("7,0")],
//!     vec![Scalar::text("Ana"), Scalar::text("9,0")],
//! ];
//! let state = TransformState::default().with_sort("Nota", SortDirection::Desc);
//! let sorted = apply(&rows, &headers, &state, &Locale::default());
//!
//! assert_eq!(sorted[0][1], Scalar::text("9,0"));
//! assert_eq!(sorted[2][0], Scalar::text("Beto"));
//! ```

mod columns;
mod csv;
mod dates;
mod decode;
mod error;
mod format;
mod infer;
mod locale;
mod normalize;
mod number;
mod summary;
mod transform;

/// Re-export column projection.
pub use columns::{project, ColumnConfig, DefaultSort};
/// Re-export CSV export.
pub use csv::{export_csv, to_csv_string, write_csv};
/// Re-export date helpers.
pub use dates::{looks_like_date, parse_date, to_iso_date};
/// Re-export row decoding.
pub use decode::{decode_headers, decode_row, dedupe_headers};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export display formatting.
pub use format::{format_fixed, format_scalar, DisplayFormat};
/// Re-export numeric inference.
pub use infer::{infer_numeric, SAMPLE_ROWS};
/// Re-export locale settings.
pub use locale::Locale;
/// Re-export cell normalization.
pub use normalize::{is_date_hint, normalize_cell};
/// Re-export numeric parsing.
pub use number::{parse_number, to_number};
/// Re-export summaries.
pub use summary::{summarize, ColumnSummary};
/// Re-export transforms.
pub use transform::{apply, apply_to_page, compare_values, fold, sort_rows};
