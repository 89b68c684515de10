use sheetview_core::WorksheetId;
use std::fmt;

/// What a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheSubject {
    /// One page of rows, 1-based page number and page size.
    Page { page: usize, limit: usize },
    /// The row count of a worksheet.
    Count,
}

/// Composite cache key.
///
/// Renders as `{prefix}:{spreadsheet}:{worksheet}:h{header_rows}:page:p{page}:l{limit}`
/// or `{prefix}:{spreadsheet}:{worksheet}:h{header_rows}:count`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub prefix: String,
    pub spreadsheet_id: String,
    pub worksheet: WorksheetId,
    pub header_rows: u32,
    pub subject: CacheSubject,
}

impl CacheKey {
    pub fn page(
        prefix: &str,
        spreadsheet_id: &str,
        worksheet: &WorksheetId,
        header_rows: u32,
        page: usize,
        limit: usize,
    ) -> Self {
        Self {
            prefix: prefix.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            worksheet: worksheet.clone(),
            header_rows,
            subject: CacheSubject::Page { page, limit },
        }
    }

    pub fn count(prefix: &str, spreadsheet_id: &str, worksheet: &WorksheetId, header_rows: u32) -> Self {
        Self {
            prefix: prefix.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            worksheet: worksheet.clone(),
            header_rows,
            subject: CacheSubject::Count,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:h{}:",
            self.prefix, self.spreadsheet_id, self.worksheet, self.header_rows
        )?;
        match self.subject {
            CacheSubject::Page { page, limit } => write!(f, "page:p{page}:l{limit}"),
            CacheSubject::Count => f.write_str("count"),
        }
    }
}
