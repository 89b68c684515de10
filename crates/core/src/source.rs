//! The seam between the viewer and a remote tabular source.

use crate::error::ViewResult;
use crate::model::{Discovery, Row, WorksheetId};
use async_trait::async_trait;

/// Headers and canonical rows returned by one page query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageData {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Page request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub header_rows: u32,
    pub limit: usize,
    pub offset: usize,
}

/// A read-only remote spreadsheet.
///
/// Implementations never retry; the caller decides whether to re-invoke.
#[async_trait]
pub trait TabularSource: Send + Sync {
    /// List worksheets, degrading to a synthetic single worksheet on failure.
    async fn list_worksheets(&self, spreadsheet_id: &str) -> Discovery;

    /// Fetch and decode one page of rows.
    async fn fetch_page(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetId,
        query: PageQuery,
    ) -> ViewResult<PageData>;

    /// Count the data rows of a worksheet.
    async fn count(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetId,
        header_rows: u32,
    ) -> ViewResult<usize>;
}
