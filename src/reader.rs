//! CSV export reading
//!
//! Delimiter sniffing plus a thin reader that yields each record as an
//! ordered field-name-to-value mapping. Column order is preserved because
//! some lookups ("first `Modifier*` column") depend on it.

use crate::error::RestoreError;

/// A parsed export: header columns and data rows
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub delimiter: char,
}

/// One data row, fields in column order
#[derive(Debug, Clone)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    fn from_record(headers: &[String], record: &csv::StringRecord) -> Row {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        Row { fields }
    }

    /// Value of `column`, or `None` when the export has no such column.
    /// A present-but-blank field is `Some("")`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Value of `column`, failing when the export has no such column.
    pub fn require(&self, column: &str) -> Result<&str, RestoreError> {
        self.get(column)
            .ok_or_else(|| RestoreError::MissingColumn(column.to_string()))
    }

    /// First listed column that is present with a non-blank value.
    pub fn first_non_empty(&self, columns: &[&str]) -> Option<&str> {
        columns
            .iter()
            .filter_map(|column| self.get(column))
            .find(|value| !value.trim().is_empty())
    }

    /// Fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Pick the field delimiter by counting `;` vs `,` in the raw first line.
///
/// `;` wins only when strictly more frequent. This is a heuristic, not a
/// full CSV dialect sniff; it covers the two delimiters the exporter uses.
pub fn sniff_delimiter(first_line: &str) -> char {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    if semicolons > commas {
        ';'
    } else {
        ','
    }
}

/// Read the whole export into memory.
///
/// Rows shorter than the header are padded with empty fields; a leading
/// UTF-8 BOM (common in exports written on Windows) is stripped.
pub fn read_table(content: &str) -> Result<CsvTable, RestoreError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let delimiter = sniff_delimiter(content.lines().next().unwrap_or(""));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(Row::from_record(&headers, &record));
    }

    Ok(CsvTable {
        headers,
        rows,
        delimiter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_semicolon() {
        assert_eq!(sniff_delimiter("a;b;c"), ';');
    }

    #[test]
    fn test_sniff_comma_default() {
        assert_eq!(sniff_delimiter("a,b,c"), ',');
        // Ties go to comma
        assert_eq!(sniff_delimiter("a;b,c"), ',');
        assert_eq!(sniff_delimiter("abc"), ',');
    }

    #[test]
    fn test_read_comma_table() {
        let table = read_table("Subject,Behavior\nA,Walk\nB,Rest\n").unwrap();
        assert_eq!(table.delimiter, ',');
        assert_eq!(table.headers, vec!["Subject", "Behavior"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("Subject"), Some("A"));
        assert_eq!(table.rows[1].get("Behavior"), Some("Rest"));
    }

    #[test]
    fn test_read_semicolon_table() {
        let table = read_table("Subject;Behavior\nA;Walk\n").unwrap();
        assert_eq!(table.delimiter, ';');
        assert_eq!(table.rows[0].get("Behavior"), Some("Walk"));
    }

    #[test]
    fn test_short_row_padded_with_empty_fields() {
        let table = read_table("Subject,Behavior,Comment\nA,Walk\n").unwrap();
        assert_eq!(table.rows[0].get("Comment"), Some(""));
    }

    #[test]
    fn test_bom_stripped_from_header() {
        let table = read_table("\u{feff}Subject,Behavior\nA,Walk\n").unwrap();
        assert_eq!(table.headers[0], "Subject");
    }

    #[test]
    fn test_require_missing_column() {
        let table = read_table("Subject\nA\n").unwrap();
        let err = table.rows[0].require("Time").unwrap_err();
        assert!(matches!(err, RestoreError::MissingColumn(ref col) if col == "Time"));
    }

    #[test]
    fn test_first_non_empty_respects_listing_order() {
        let table = read_table("Comment,Comment start\n,fallback\n").unwrap();
        assert_eq!(
            table.rows[0].first_non_empty(&["Comment", "Comment start"]),
            Some("fallback")
        );
    }

    #[test]
    fn test_fields_preserve_column_order() {
        let table = read_table("B,A,C\n1,2,3\n").unwrap();
        let names: Vec<&str> = table.rows[0].fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }
}
