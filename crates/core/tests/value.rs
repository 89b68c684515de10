use sheetview_core::{
    format_number, Discovery, Page, RawCell, Scalar, SortDirection, TransformState, Worksheet,
    WorksheetId,
};

#[test]
fn test_type_name_and_empty() {
    assert_eq!(Scalar::empty().type_name(), "Text");
    assert!(Scalar::empty().is_empty());
    assert!(!Scalar::text(" ").is_empty());
    assert!(!Scalar::Number(0.0).is_empty());
    assert_eq!(Scalar::Bool(true).type_name(), "Bool");
    assert_eq!(Scalar::Number(1.5).type_name(), "Number");
}

#[test]
fn test_as_accessors() {
    assert_eq!(Scalar::Number(42.0).as_number(), Some(42.0));
    assert_eq!(Scalar::text("42").as_number(), None);
    assert_eq!(Scalar::Bool(false).as_bool(), Some(false));
    assert_eq!(Scalar::text("hi").as_text(), Some("hi"));
}

#[test]
fn test_display() {
    assert_eq!(Scalar::Number(3.0).to_string(), "3");
    assert_eq!(Scalar::Number(8.5).to_string(), "8.5");
    assert_eq!(Scalar::Number(-12.0).to_string(), "-12");
    assert_eq!(Scalar::Bool(true).to_string(), "true");
    assert_eq!(Scalar::text("Ana").to_string(), "Ana");
    assert_eq!(format_number(1e20), "100000000000000000000");
}

#[test]
fn test_scalar_json_shape() {
    let row = vec![Scalar::text("x"), Scalar::Number(2.5), Scalar::Bool(true)];
    let json = serde_json::to_string(&row).unwrap();
    assert_eq!(json, r#"["x",2.5,true]"#);

    let back: Vec<Scalar> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, row);

    // Numeric-looking text stays text
    let text: Scalar = serde_json::from_str(r#""8,5""#).unwrap();
    assert_eq!(text, Scalar::text("8,5"));
}

#[test]
fn test_page_pads_and_truncates_rows() {
    let page = Page::new(
        vec!["A".into(), "B".into()],
        vec![
            vec![Scalar::text("only")],
            vec![Scalar::text("1"), Scalar::text("2"), Scalar::text("3")],
        ],
    );
    assert!(page.rows.iter().all(|r| r.len() == 2));
    assert_eq!(page.rows[0][1], Scalar::empty());
    assert_eq!(page.rows[1][1], Scalar::text("2"));
    assert_eq!(page.column_index("B"), Some(1));
    assert_eq!(page.column_index("C"), None);
}

#[test]
fn test_page_serializes_camel_case() {
    let page = Page::new(vec!["A".into()], vec![vec![Scalar::Number(1.0)]]);
    let json = serde_json::to_value(&page).unwrap();
    assert!(json.get("fetchedAt").is_some());
    let back: Page = serde_json::from_value(json).unwrap();
    assert_eq!(back, page);
}

#[test]
fn test_raw_cell_deserialize() {
    let cell: RawCell = serde_json::from_str(r#"{"v": 8.5, "f": "8,5"}"#).unwrap();
    assert_eq!(cell.value, Some(serde_json::json!(8.5)));
    assert_eq!(cell.formatted.as_deref(), Some("8,5"));

    let cell: RawCell = serde_json::from_str(r#"{"v": null}"#).unwrap();
    assert_eq!(cell.value, None);
}

#[test]
fn test_worksheet_matching() {
    let ws = Worksheet::new("Cadastros", WorksheetId::Gid(42)).with_label("Registrations");
    assert!(ws.matches("Cadastros"));
    assert!(ws.matches("Registrations"));
    assert!(ws.matches("42"));
    assert!(!ws.matches("Escolas"));
    assert_eq!(ws.display_name(), "Registrations");
}

#[test]
fn test_discovery_fallback() {
    let discovery = Discovery::fallback("HTTP 500");
    assert!(discovery.degraded);
    assert_eq!(discovery.worksheets.len(), 1);
    assert_eq!(discovery.worksheets[0].id, WorksheetId::Gid(0));
    assert_eq!(discovery.reason.as_deref(), Some("HTTP 500"));
}

#[test]
fn test_toggle_sort() {
    let state = TransformState::default();
    let state = state.toggle_sort("Nota");
    assert_eq!(state.sort_column.as_deref(), Some("Nota"));
    assert_eq!(state.sort_direction, SortDirection::Asc);

    let state = state.toggle_sort("Nota");
    assert_eq!(state.sort_direction, SortDirection::Desc);

    let state = state.toggle_sort("Nome");
    assert_eq!(state.sort_column.as_deref(), Some("Nome"));
    assert_eq!(state.sort_direction, SortDirection::Asc);
}
