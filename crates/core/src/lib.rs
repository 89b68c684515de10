//! # sheetview-core
//!
//! Core types shared by the sheetview crates.
//!
//! This crate provides:
//! - Canonical cell values
//! - Worksheet, page and transform-state models
//! - The `TabularSource` trait implemented by source clients
//! - Error types

/// Error types and result aliases.
pub mod error;
/// Worksheets, raw payloads, pages and transform state.
pub mod model;
/// Remote source abstraction.
pub mod source;
/// Canonical cell values.
pub mod value;

/// Re-export core error types.
pub use error::{NetworkFailure, ViewError, ViewResult};
/// Re-export model types.
pub use model::{
    ColumnKind, Discovery, Page, RawCell, RawColumn, Row, SortDirection, TransformState,
    Worksheet, WorksheetId,
};
/// Re-export the source seam.
pub use source::{PageData, PageQuery, TabularSource};
/// Re-export the canonical value type.
pub use value::{format_number, Scalar};
