use crate::error::{Result, SheetError};
use sheetview_core::{Page, Row};
use std::io::Write;

/// Write a header row followed by `rows` as CSV.
///
/// Fields are quoted only when they contain a comma, a quote or a line
/// break; embedded quotes are doubled. Values use their canonical string form.
pub fn write_csv<W: Write>(writer: W, headers: &[String], rows: &[Row]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    csv_writer.write_record(headers)?;
    for row in rows {
        let record: Vec<String> = row.iter().map(ToString::to_string).collect();
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Serialize headers and rows to a CSV string without a trailing newline.
pub fn to_csv_string(headers: &[String], rows: &[Row]) -> Result<String> {
    if headers.is_empty() {
        return Ok(String::new());
    }
    let mut buffer = Vec::new();
    write_csv(&mut buffer, headers, rows)?;
    let mut out = String::from_utf8(buffer).map_err(|e| SheetError::Serialize(e.to_string()))?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Export a page as comma-separated CSV.
pub fn export_csv(page: &Page) -> Result<String> {
    to_csv_string(&page.headers, &page.rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetview_core::Scalar;

    #[test]
    fn test_quoting() {
        let page = Page::new(
            vec!["A".into(), "B".into()],
            vec![vec![Scalar::text("x,y"), Scalar::text("z\"w")]],
        );
        assert_eq!(export_csv(&page).unwrap(), "A,B\n\"x,y\",\"z\"\"w\"");
    }

    #[test]
    fn test_newlines_are_quoted() {
        let page = Page::new(vec!["A".into()], vec![vec![Scalar::text("one\ntwo")]]);
        assert_eq!(export_csv(&page).unwrap(), "A\n\"one\ntwo\"");
    }

    #[test]
    fn test_canonical_string_forms() {
        let page = Page::new(
            vec!["n".into(), "b".into(), "e".into()],
            vec![vec![Scalar::Number(3.0), Scalar::Bool(true), Scalar::text("x")]],
        );
        assert_eq!(export_csv(&page).unwrap(), "n,b,e\n3,true,x");
    }

    #[test]
    fn test_header_only() {
        let page = Page::new(vec!["A".into(), "B".into()], Vec::new());
        assert_eq!(export_csv(&page).unwrap(), "A,B");
    }

    #[test]
    fn test_write_csv_keeps_final_newline() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &["a".to_string()], &[vec![Scalar::text("1")]]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "a\n1\n");
    }

    #[test]
    fn test_no_columns() {
        let page = Page::new(Vec::new(), Vec::new());
        assert_eq!(export_csv(&page).unwrap(), "");
    }
}
