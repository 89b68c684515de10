//! Google Visualization query protocol: query strings and response parsing.

use serde::Deserialize;
use sheetview_core::{ColumnKind, PageData, RawCell, RawColumn, ViewError, ViewResult};
use sheetview_sheet::{decode_headers, decode_row, Locale};

/// `select * limit L offset O`
pub fn page_query(limit: usize, offset: usize) -> String {
    format!("select * limit {limit} offset {offset}")
}

/// `select count(C)`
pub fn count_query(column: &str) -> String {
    format!("select count({column})")
}

/// Strip the `setResponse(...);` wrapper around the JSON object.
pub fn unwrap_payload(raw: &str) -> ViewResult<&str> {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&raw[start..=end]),
        _ => Err(ViewError::protocol(
            "response does not contain a JSON object",
        )),
    }
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<Message>,
    #[serde(default)]
    table: Option<Table>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detailed_message: Option<String>,
}

impl Message {
    fn describe(&self) -> String {
        self.detailed_message
            .as_deref()
            .or(self.message.as_deref())
            .or(self.reason.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }
}

/// The `table` member of a successful response.
#[derive(Debug, Deserialize)]
pub struct Table {
    #[serde(default)]
    cols: Option<Vec<Column>>,
    #[serde(default)]
    rows: Option<Vec<TableRow>>,
}

#[derive(Debug, Deserialize)]
struct Column {
    #[serde(default)]
    id: String,
    #[serde(default)]
    label: String,
    #[serde(default, rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(default)]
    c: Vec<Option<RawCell>>,
}

/// Parse a raw response body and validate its status.
///
/// `ok` and `warning` are accepted; anything else is a protocol error carrying
/// the server's messages.
pub fn parse_response(raw: &str) -> ViewResult<Table> {
    let json = unwrap_payload(raw)?;
    let response: Response = serde_json::from_str(json)
        .map_err(|e| ViewError::protocol(format!("unparseable payload: {e}")))?;

    match response.status.as_deref() {
        Some("ok" | "warning") => {}
        Some(status) => {
            let details: Vec<String> = response.errors.iter().map(Message::describe).collect();
            let detail = if details.is_empty() {
                format!("status '{status}'")
            } else {
                details.join("; ")
            };
            return Err(ViewError::protocol(format!("query failed: {detail}")));
        }
        None => return Err(ViewError::protocol("response has no status")),
    }

    let table = response
        .table
        .ok_or_else(|| ViewError::protocol("response has no table"))?;
    if table.cols.is_none() || table.rows.is_none() {
        return Err(ViewError::protocol("table is missing cols or rows"));
    }
    Ok(table)
}

/// Decode a validated table into headers and canonical rows.
pub fn decode_table(table: &Table, locale: &Locale) -> PageData {
    let columns: Vec<RawColumn> = table
        .cols
        .iter()
        .flatten()
        .map(|c| RawColumn {
            id: c.id.clone(),
            label: c.label.clone(),
            kind: ColumnKind::from_type_name(&c.kind),
        })
        .collect();
    let headers = decode_headers(&columns);
    let kinds: Vec<ColumnKind> = columns.iter().map(|c| c.kind).collect();

    let rows = table
        .rows
        .iter()
        .flatten()
        .map(|r| decode_row(&r.c, &kinds, headers.len(), locale))
        .collect();

    PageData { headers, rows }
}

/// Read the single value of a `select count(...)` response.
///
/// An empty result counts as zero.
pub fn decode_count(table: &Table) -> ViewResult<usize> {
    let value = table
        .rows
        .iter()
        .flatten()
        .next()
        .and_then(|row| row.c.first())
        .and_then(Option::as_ref)
        .and_then(|cell| cell.value.as_ref());

    match value {
        None | Some(serde_json::Value::Null) => Ok(0),
        Some(serde_json::Value::Number(n)) => n
            .as_f64()
            .filter(|f| *f >= 0.0)
            .map(|f| f.round() as usize)
            .ok_or_else(|| ViewError::protocol(format!("invalid count value {n}"))),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| ViewError::protocol(format!("invalid count value '{s}'"))),
        Some(other) => Err(ViewError::protocol(format!("invalid count value {other}"))),
    }
}
