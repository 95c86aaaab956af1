//! Tabular data loaded from CSV files and workbooks.

use serde::Serialize;

/// Placeholder shown for empty cells.
const MISSING: &str = "NaN";

/// A header row plus data rows, every row as wide as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding or truncating rows to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows, excluding the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Render the whole table as aligned text.
    ///
    /// The header comes first; every data line starts with its zero-based
    /// row index. Cells are right-aligned to their column width and
    /// separated by two spaces.
    pub fn to_text(&self) -> String {
        let index_width = self.index_width();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                self.rows
                    .iter()
                    .map(|r| display(&r[i]).chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        let mut header = " ".repeat(index_width);
        for (name, &w) in self.columns.iter().zip(&widths) {
            header.push_str(&format!("  {name:>w$}"));
        }
        lines.push(header);

        for (idx, row) in self.rows.iter().enumerate() {
            let mut line = format!("{idx:<index_width$}");
            for (cell, &w) in row.iter().zip(&widths) {
                line.push_str(&format!("  {:>w$}", display(cell)));
            }
            lines.push(line);
        }

        lines.join("\n")
    }

    /// Render one column as `index    value` lines.
    ///
    /// Returns `None` if the column does not exist.
    pub fn column_text(&self, name: &str) -> Option<String> {
        let col = self.column_index(name)?;
        let index_width = self.index_width();
        let width = self
            .rows
            .iter()
            .map(|r| display(&r[col]).chars().count())
            .max()
            .unwrap_or(0);

        Some(
            self.rows
                .iter()
                .enumerate()
                .map(|(idx, row)| format!("{idx:<index_width$}    {:>width$}", display(&row[col])))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    fn index_width(&self) -> usize {
        self.rows.len().saturating_sub(1).to_string().len()
    }
}

fn display(cell: &str) -> &str {
    if cell.is_empty() { MISSING } else { cell }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["name".into(), "score".into()],
            vec![
                vec!["Ana".into(), "10".into()],
                vec!["Bogdan".into()],
                vec!["Cezar".into(), "7.5".into()],
            ],
        )
    }

    #[test]
    fn short_rows_are_padded() {
        let t = sample();
        assert_eq!(t.rows()[1], vec!["Bogdan".to_string(), String::new()]);
    }

    #[test]
    fn whole_table_renders_aligned() {
        let text = sample().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "     name  score");
        assert_eq!(lines[1], "0     Ana     10");
        assert_eq!(lines[2], "1  Bogdan    NaN");
        assert_eq!(lines[3], "2   Cezar    7.5");
    }

    #[test]
    fn single_column_renders_with_index() {
        let text = sample().column_text("name").unwrap();
        assert_eq!(text, "0       Ana\n1    Bogdan\n2     Cezar");
    }

    #[test]
    fn unknown_column_is_none() {
        assert!(sample().column_text("age").is_none());
    }
}
