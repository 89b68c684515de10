//! # sheetview-viewer
//!
//! The facade a front end talks to: worksheet listing, cached page and
//! count loading, column projection, transforms, inference, summaries and
//! CSV export for one spreadsheet.
//!
//! Every operation awaits at most one request at a time. Pages are cached in
//! their canonical, pre-projection form so that column settings can change
//! without invalidating the cache.

mod config;

pub use config::{CacheConfig, ViewerConfig, WorksheetEntry};

use indexmap::IndexSet;
use sheetview_cache::{Cache, CacheKey};
use sheetview_core::{
    Discovery, Page, PageQuery, Row, TabularSource, TransformState, ViewResult, Worksheet,
    WorksheetId,
};
use sheetview_http::{Endpoints, GvizSource, HttpClient};
use sheetview_sheet::{
    apply_to_page, export_csv, format_scalar, infer_numeric, project, summarize, ColumnConfig,
    ColumnSummary,
};
use tracing::{debug, info};

/// Read-only view over one spreadsheet.
#[derive(Debug)]
pub struct Viewer<S: TabularSource> {
    source: S,
    cache: Cache,
    config: ViewerConfig,
    no_columns: ColumnConfig,
}

impl Viewer<GvizSource> {
    /// Viewer backed by the public query endpoint, with the cache described
    /// by the configuration.
    pub fn connect(config: ViewerConfig) -> ViewResult<Self> {
        config.validate()?;
        let http = HttpClient::with_timeout(config.request_timeout())?;
        let endpoints =
            Endpoints::at(config.base_url.clone()).with_discovery_url(config.discovery_url.clone());
        let source = GvizSource::new(http, endpoints, config.locale.clone())
            .with_count_column(config.count_column.clone());
        let cache = config.build_cache();
        Self::new(source, cache, config)
    }
}

impl<S: TabularSource> Viewer<S> {
    pub fn new(source: S, cache: Cache, config: ViewerConfig) -> ViewResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            cache,
            config,
            no_columns: ColumnConfig::default(),
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Column settings in effect for a worksheet.
    pub fn columns(&self, worksheet: &Worksheet) -> &ColumnConfig {
        self.config.columns_for(worksheet).unwrap_or(&self.no_columns)
    }

    /// Configured worksheets when present, otherwise discovery.
    pub async fn list_worksheets(&self) -> Discovery {
        if let Some(worksheets) = self.config.static_worksheets() {
            debug!("using {} configured worksheet(s)", worksheets.len());
            return Discovery::found(worksheets);
        }
        self.source.list_worksheets(&self.config.spreadsheet_id).await
    }

    /// Find a worksheet by title, label or id.
    ///
    /// Unknown names are addressed directly: digits as a gid, anything else as
    /// a worksheet name.
    pub async fn resolve_worksheet(&self, query: &str) -> Worksheet {
        let discovery = self.list_worksheets().await;
        if let Some(found) = discovery.worksheets.into_iter().find(|w| w.matches(query)) {
            return found;
        }
        let id = query
            .parse::<u64>()
            .map(WorksheetId::Gid)
            .unwrap_or_else(|_| WorksheetId::Name(query.to_string()));
        Worksheet::new(query, id)
    }

    /// Load one page (1-based) and project it for display.
    ///
    /// The page size defaults to `default_rows_per_page` and is clamped to
    /// `1..=max_rows_per_page`. Page 0 is read as page 1.
    pub async fn load_page(
        &self,
        worksheet: &Worksheet,
        page: usize,
        page_size: Option<usize>,
    ) -> ViewResult<Page> {
        let limit = self.config.clamp_page_size(page_size);
        let canonical = self.canonical_page(worksheet, page.max(1), limit).await?;
        Ok(project(&canonical, self.columns(worksheet)))
    }

    async fn canonical_page(&self, worksheet: &Worksheet, page: usize, limit: usize) -> ViewResult<Page> {
        let key = CacheKey::page(
            &self.config.cache.prefix,
            &self.config.spreadsheet_id,
            &worksheet.id,
            self.config.header_rows,
            page,
            limit,
        )
        .to_string();

        if let Some(cached) = self.cache.get::<Page>(&key, self.config.page_ttl()) {
            return Ok(cached);
        }

        let query = PageQuery {
            header_rows: self.config.header_rows,
            limit,
            offset: (page - 1) * limit,
        };
        let data = self
            .source
            .fetch_page(&self.config.spreadsheet_id, &worksheet.id, query)
            .await?;
        let fetched = Page::new(data.headers, data.rows);
        info!(
            worksheet = %worksheet.title,
            page,
            rows = fetched.row_count(),
            "loaded page"
        );

        self.cache.set(&key, &fetched);
        Ok(fetched)
    }

    /// Number of data rows in a worksheet, cached with the count TTL.
    pub async fn count_rows(&self, worksheet: &Worksheet) -> ViewResult<usize> {
        let key = CacheKey::count(
            &self.config.cache.prefix,
            &self.config.spreadsheet_id,
            &worksheet.id,
            self.config.header_rows,
        )
        .to_string();

        if let Some(count) = self.cache.get::<usize>(&key, self.config.count_ttl()) {
            return Ok(count);
        }

        let count = self
            .source
            .count(&self.config.spreadsheet_id, &worksheet.id, self.config.header_rows)
            .await?;
        self.cache.set(&key, &count);
        Ok(count)
    }

    /// Number of pages of `page_size` rows needed for `total` rows.
    pub fn page_count(&self, total: usize, page_size: Option<usize>) -> usize {
        total.div_ceil(self.config.clamp_page_size(page_size))
    }

    /// Filter, search and sort a projected page. The worksheet's default sort
    /// applies when `state` has no sort column.
    pub fn apply_transform(&self, worksheet: &Worksheet, page: &Page, state: &TransformState) -> Page {
        let state = self.columns(worksheet).effective_state(state);
        apply_to_page(page, &state, &self.config.locale)
    }

    /// Columns whose values are mostly numeric.
    pub fn infer_numeric_columns(&self, page: &Page) -> IndexSet<String> {
        infer_numeric(&page.rows, &page.headers, &self.config.locale)
    }

    /// Summaries for the worksheet's configured `summarize` columns, or for
    /// every inferred numeric column when none are configured.
    pub fn summarize(&self, worksheet: &Worksheet, page: &Page) -> Vec<ColumnSummary> {
        let configured = &self.columns(worksheet).summarize;
        let columns: Vec<String> = if configured.is_empty() {
            self.infer_numeric_columns(page).into_iter().collect()
        } else {
            configured.clone()
        };
        summarize(page, &columns, &self.config.locale)
    }

    /// Display strings for one row, using the worksheet's column formats.
    pub fn format_row(&self, worksheet: &Worksheet, headers: &[String], row: &Row) -> Vec<String> {
        let columns = self.columns(worksheet);
        headers
            .iter()
            .zip(row)
            .map(|(header, value)| format_scalar(value, columns.format_for(header), &self.config.locale))
            .collect()
    }

    pub fn export_csv(&self, page: &Page) -> ViewResult<String> {
        Ok(export_csv(page)?)
    }

    /// Every row of a worksheet, projected and transformed.
    ///
    /// Pages of `max_rows_per_page` rows are fetched one after another until
    /// a short page arrives.
    pub async fn export_all(&self, worksheet: &Worksheet, state: &TransformState) -> ViewResult<Page> {
        let limit = self.config.max_rows_per_page;
        let mut page_number = 1;
        let first = self.canonical_page(worksheet, page_number, limit).await?;
        let mut done = first.row_count() < limit;
        let headers = first.headers.clone();
        let fetched_at = first.fetched_at;
        let mut rows = first.rows;

        while !done {
            page_number += 1;
            let next = self.canonical_page(worksheet, page_number, limit).await?;
            done = next.row_count() < limit;
            rows.extend(next.rows);
        }
        info!(
            worksheet = %worksheet.title,
            pages = page_number,
            rows = rows.len(),
            "exported worksheet"
        );

        let all = Page::with_fetched_at(headers, rows, fetched_at);
        let projected = project(&all, self.columns(worksheet));
        Ok(self.apply_transform(worksheet, &projected, state))
    }
}
