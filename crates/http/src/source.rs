use crate::discovery::parse_worksheets;
use crate::gviz;
use crate::HttpClient;
use async_trait::async_trait;
use sheetview_core::{
    Discovery, PageData, PageQuery, TabularSource, ViewResult, WorksheetId,
};
use sheetview_sheet::Locale;
use tracing::{debug, warn};

/// Public host of the query endpoint.
pub const DEFAULT_BASE_URL: &str = "https://docs.google.com";

/// Public worksheets feed; `{base}` and `{id}` are substituted.
pub const DEFAULT_DISCOVERY_URL: &str =
    "https://spreadsheets.google.com/feeds/worksheets/{id}/public/basic?alt=json";

/// Where the source client sends its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub discovery_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Both endpoints on one host. Used to point the client at a local server.
    pub fn at(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            discovery_url: "{base}/feeds/worksheets/{id}/public/basic?alt=json".to_string(),
            base_url,
        }
    }

    #[must_use]
    pub fn with_discovery_url(mut self, template: impl Into<String>) -> Self {
        self.discovery_url = template.into();
        self
    }

    pub fn query_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/spreadsheets/d/{spreadsheet_id}/gviz/tq",
            self.base_url.trim_end_matches('/')
        )
    }

    pub fn discovery_url(&self, spreadsheet_id: &str) -> String {
        self.discovery_url
            .replace("{base}", self.base_url.trim_end_matches('/'))
            .replace("{id}", spreadsheet_id)
    }
}

/// [`TabularSource`] backed by the Google Visualization query endpoint.
#[derive(Debug, Clone)]
pub struct GvizSource {
    http: HttpClient,
    endpoints: Endpoints,
    locale: Locale,
    count_column: String,
}

impl GvizSource {
    pub fn new(http: HttpClient, endpoints: Endpoints, locale: Locale) -> Self {
        Self {
            http,
            endpoints,
            locale,
            count_column: "A".to_string(),
        }
    }

    /// Column used by `select count(...)`.
    #[must_use]
    pub fn with_count_column(mut self, column: impl Into<String>) -> Self {
        self.count_column = column.into();
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn query(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetId,
        header_rows: u32,
        tq: String,
    ) -> ViewResult<gviz::Table> {
        let url = self.endpoints.query_url(spreadsheet_id);
        let mut params = vec![
            ("tqx", "out:json".to_string()),
            ("headers", header_rows.to_string()),
            ("tq", tq),
        ];
        match worksheet {
            WorksheetId::Gid(gid) => params.push(("gid", gid.to_string())),
            WorksheetId::Name(name) => params.push(("sheet", name.clone())),
        }
        debug!(url = %url, worksheet = %worksheet, "gviz query: {}", params[2].1);

        let body = self.http.get_text(&url, &params).await?;
        gviz::parse_response(&body)
    }
}

#[async_trait]
impl TabularSource for GvizSource {
    async fn list_worksheets(&self, spreadsheet_id: &str) -> Discovery {
        let url = self.endpoints.discovery_url(spreadsheet_id);
        debug!(url = %url, "discovering worksheets");

        let reason = match self.http.get_text(&url, &[]).await {
            Ok(body) => match parse_worksheets(&body) {
                Some(worksheets) => {
                    debug!("discovered {} worksheet(s)", worksheets.len());
                    return Discovery::found(worksheets);
                }
                None => "discovery response listed no usable worksheets".to_string(),
            },
            Err(e) => e.to_string(),
        };

        warn!(spreadsheet = spreadsheet_id, "worksheet discovery degraded: {reason}");
        Discovery::fallback(reason)
    }

    async fn fetch_page(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetId,
        query: PageQuery,
    ) -> ViewResult<PageData> {
        let tq = gviz::page_query(query.limit, query.offset);
        let table = self
            .query(spreadsheet_id, worksheet, query.header_rows, tq)
            .await?;
        Ok(gviz::decode_table(&table, &self.locale))
    }

    async fn count(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetId,
        header_rows: u32,
    ) -> ViewResult<usize> {
        let tq = gviz::count_query(&self.count_column);
        let table = self
            .query(spreadsheet_id, worksheet, header_rows, tq)
            .await?;
        gviz::decode_count(&table)
    }
}
