use std::collections::HashSet;

use serde_json::Value;

/// In-memory result of a worksheet read.
///
/// Column names come from the worksheet header row and are shared by every
/// row. Every row holds exactly one value per column, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Zero rows, zero columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from the raw cell grid of a worksheet, first row being
    /// the header.
    ///
    /// Short rows are padded with empty strings and cells past the header
    /// width are dropped. Values are kept as the remote source returned them.
    /// Header names are made unique, see [`unique_columns`].
    pub fn from_value_rows(values: Vec<Vec<Value>>) -> Self {
        let mut rows = values.into_iter();
        let Some(header) = rows.next() else {
            return Self::empty();
        };

        let columns = unique_columns(header.iter().map(cell_text));

        let width = columns.len();
        let rows = rows
            .map(|mut row| {
                row.truncate(width);
                row.resize(width, Value::String(String::new()));
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }
}

/// One record of a [`Table`], addressable by column name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'t> {
    columns: &'t [String],
    values: &'t [Value],
}

impl<'t> Row<'t> {
    pub fn get(&self, column: &str) -> Option<&'t Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    pub fn values(&self) -> &'t [Value] {
        self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'t str, &'t Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Names every header cell so that no column is lost:
///
/// - a blank cell at position `i` (0-based) becomes `Unnamed: i`;
/// - a repeated name gets `.1`, `.2`, ... appended in order of appearance,
///   skipping suffixes that are already taken.
///
/// `["rep", "", "total", "total"]` gives `["rep", "Unnamed: 1", "total", "total.1"]`.
pub fn unique_columns(header: impl IntoIterator<Item = String>) -> Vec<String> {
    let named: Vec<String> = header
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            if name.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name
            }
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::with_capacity(named.len());
    let mut columns = Vec::with_capacity(named.len());
    for name in named {
        let mut unique = name.clone();
        let mut suffix = 0;
        while taken.contains(&unique) {
            suffix += 1;
            unique = format!("{}.{}", name, suffix);
        }
        taken.insert(unique.clone());
        columns.push(unique);
    }
    columns
}

/// Text of a cell as a spreadsheet would show it: strings without quotes,
/// nulls as empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<Value>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| json!(cell)).collect())
            .collect()
    }

    #[test]
    fn test_header_row_becomes_columns() {
        let table = Table::from_value_rows(grid(&[&["name", "price"], &["Widget", "9.99"]]));

        assert_eq!(table.columns(), &["name".to_string(), "price".to_string()]);
        assert_eq!(table.row_count(), 1);
        let row = table.row(0).unwrap();
        assert_eq!(row.get("name"), Some(&json!("Widget")));
        assert_eq!(row.get("price"), Some(&json!("9.99")));
        assert_eq!(row.get("stock"), None);
    }

    #[test]
    fn test_values_are_not_coerced() {
        let table = Table::from_value_rows(vec![
            vec![json!("id"), json!("qty")],
            vec![json!(1), json!("007")],
        ]);

        let row = table.row(0).unwrap();
        assert_eq!(row.get("id"), Some(&json!(1)));
        assert_eq!(row.get("qty"), Some(&json!("007")));
    }

    #[test]
    fn test_empty_worksheet_has_no_columns() {
        let table = Table::from_value_rows(vec![]);
        assert_eq!(table, Table::empty());
        assert_eq!(table.column_count(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_header_only_keeps_columns() {
        let table = Table::from_value_rows(grid(&[&["rep", "region"]]));
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_short_rows_are_padded_and_long_rows_truncated() {
        let table = Table::from_value_rows(grid(&[
            &["a", "b", "c"],
            &["1"],
            &["1", "2", "3", "4"],
            &[],
        ]));

        assert_eq!(table.row(0).unwrap().values(), &[json!("1"), json!(""), json!("")]);
        assert_eq!(table.row(1).unwrap().values(), &[json!("1"), json!("2"), json!("3")]);
        assert_eq!(table.row(2).unwrap().values(), &[json!(""), json!(""), json!("")]);
    }

    #[test]
    fn test_blank_and_repeated_headers_keep_their_columns() {
        let table = Table::from_value_rows(grid(&[
            &["rep", "", "total", ""],
            &["Ana", "x", "120", "y"],
        ]));

        assert_eq!(table.columns(), &["rep", "Unnamed: 1", "total", "Unnamed: 3"]);
        let row = table.row(0).unwrap();
        assert_eq!(row.get("Unnamed: 1"), Some(&json!("x")));
        assert_eq!(row.get("total"), Some(&json!("120")));
        assert_eq!(row.get("Unnamed: 3"), Some(&json!("y")));
    }

    #[test]
    fn test_repeated_headers_get_numbered() {
        let columns = unique_columns(
            ["date", "amount", "date", "date.1", "date"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(columns, vec!["date", "amount", "date.1", "date.1.1", "date.2"]);
    }

    #[test]
    fn test_row_iter_keeps_column_order() {
        let table = Table::from_value_rows(grid(&[&["z", "a", "m"], &["1", "2", "3"]]));
        let pairs: Vec<(&str, String)> = table
            .row(0)
            .unwrap()
            .iter()
            .map(|(k, v)| (k, cell_text(v)))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("z", "1".to_string()),
                ("a", "2".to_string()),
                ("m", "3".to_string())
            ]
        );
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("9.99")), "9.99");
        assert_eq!(cell_text(&json!(3)), "3");
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!(true)), "true");
    }
}
