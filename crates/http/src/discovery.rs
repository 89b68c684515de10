//! Worksheet listing from the metadata endpoint.
//!
//! Three response shapes are understood:
//! - Sheets API: `{"sheets": [{"properties": {"title", "sheetId"}}]}`
//! - Worksheets feed: `{"feed": {"entry": [{"title": {"$t"}, "link": [{"href"}], "gs$sheetId": {"$t"}}]}}`
//! - A flat array of `{"title"|"name", "gid"|"id"|"sheetId"}`

use regex::Regex;
use serde_json::Value as JsonValue;
use sheetview_core::{Worksheet, WorksheetId};
use std::sync::OnceLock;

fn gid_param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[?&#]gid=(\d+)").expect("valid regex"))
}

/// Parse a discovery body into worksheets.
///
/// Returns `None` when the body is not JSON, matches no known shape, or
/// yields no usable entries. Entries without an id take their 0-based
/// position as gid.
pub fn parse_worksheets(body: &str) -> Option<Vec<Worksheet>> {
    let json: JsonValue = serde_json::from_str(body.trim()).ok()?;

    let entries: Vec<(Option<String>, Option<u64>)> = if let Some(sheets) =
        json.get("sheets").and_then(JsonValue::as_array)
    {
        sheets
            .iter()
            .map(|s| {
                let props = s.get("properties").unwrap_or(s);
                (
                    props.get("title").and_then(as_string),
                    props.get("sheetId").and_then(as_gid),
                )
            })
            .collect()
    } else if let Some(entries) = json
        .get("feed")
        .and_then(|f| f.get("entry"))
        .and_then(JsonValue::as_array)
    {
        entries.iter().map(feed_entry).collect()
    } else if let Some(items) = json.as_array() {
        items
            .iter()
            .map(|item| {
                let title = ["title", "name"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(as_string));
                let gid = ["gid", "sheetId", "id"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(as_gid));
                (title, gid)
            })
            .collect()
    } else {
        return None;
    };

    let worksheets: Vec<Worksheet> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, (title, gid))| {
            let title = title.filter(|t| !t.trim().is_empty())?;
            Some(Worksheet::new(
                title,
                WorksheetId::Gid(gid.unwrap_or(position as u64)),
            ))
        })
        .collect();

    (!worksheets.is_empty()).then_some(worksheets)
}

fn feed_entry(entry: &JsonValue) -> (Option<String>, Option<u64>) {
    let title = entry.get("title").and_then(|t| t.get("$t").or(Some(t))).and_then(as_string);

    let gid = entry
        .get("gs$sheetId")
        .and_then(|g| g.get("$t").or(Some(g)))
        .and_then(as_gid)
        .or_else(|| {
            entry
                .get("link")
                .and_then(JsonValue::as_array)
                .into_iter()
                .flatten()
                .filter_map(|l| l.get("href").and_then(JsonValue::as_str))
                .find_map(|href| {
                    gid_param_regex()
                        .captures(href)
                        .and_then(|c| c[1].parse().ok())
                })
        });

    (title, gid)
}

fn as_string(value: &JsonValue) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn as_gid(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gid(ws: &Worksheet) -> u64 {
        match ws.id {
            WorksheetId::Gid(g) => g,
            WorksheetId::Name(_) => panic!("expected gid"),
        }
    }

    #[test]
    fn test_sheets_api_shape() {
        let body = r#"{"sheets":[{"properties":{"title":"Alunos","sheetId":0}},{"properties":{"title":"Notas","sheetId":1538400201}}]}"#;
        let sheets = parse_worksheets(body).unwrap();
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[1].title, "Notas");
        assert_eq!(gid(&sheets[1]), 1_538_400_201);
    }

    #[test]
    fn test_feed_shape() {
        let body = r#"{"feed":{"entry":[
            {"title":{"$t":"Alunos"},"link":[{"rel":"alternate","href":"https://docs.google.com/x/pubhtml?gid=0"},{"href":"https://example.com/csv?format=csv&gid=77"}]},
            {"title":{"$t":"Notas"},"gs$sheetId":{"$t":"42"}},
            {"title":{"$t":"Extra"}}
        ]}}"#;
        let sheets = parse_worksheets(body).unwrap();
        assert_eq!(sheets.len(), 3);
        assert_eq!(gid(&sheets[0]), 0);
        assert_eq!(gid(&sheets[1]), 42);
        // No id anywhere: position
        assert_eq!(gid(&sheets[2]), 2);
    }

    #[test]
    fn test_flat_array_shape() {
        let body = r#"[{"name":"A","gid":"5"},{"title":"B","id":9},{"title":"C"}]"#;
        let sheets = parse_worksheets(body).unwrap();
        let gids: Vec<u64> = sheets.iter().map(gid).collect();
        assert_eq!(gids, vec![5, 9, 2]);
        assert_eq!(sheets[0].title, "A");
    }

    #[test]
    fn test_unusable_bodies() {
        assert!(parse_worksheets("<html>login</html>").is_none());
        assert!(parse_worksheets(r#"{"other":true}"#).is_none());
        assert!(parse_worksheets(r#"{"sheets":[]}"#).is_none());
        assert!(parse_worksheets(r#"[{"gid":1}]"#).is_none());
    }
}
