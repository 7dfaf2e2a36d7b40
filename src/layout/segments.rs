//! Row segmentation and row-span flattening for the HTML-table form of a grid.
//!
//! Unlike the CSS grid, a `<table>` needs explicit `rowspan` values and cells
//! grouped into `<tr>` elements. Here a cell can own child rows that sit to
//! its right; the cell spans every row of its descendants.

use serde::{Deserialize, Serialize};

use crate::types::CellValue;

/// One cell of a data table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    /// Unique among the cells of one row
    pub id: String,
    #[serde(default)]
    pub content: CellValue,
    #[serde(default)]
    pub col_span: Option<u32>,
    /// Vertical header cell rather than data cell
    #[serde(default)]
    pub is_header_cell: bool,
    /// Rows to the right vertically spanned by this cell
    #[serde(default)]
    pub child_rows: Vec<TableRow>,
}

impl TableCell {
    pub fn new(id: impl Into<String>, content: impl Into<CellValue>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_child_rows(mut self, rows: Vec<TableRow>) -> Self {
        self.child_rows = rows;
        self
    }
}

/// One row of a data table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<TableCell>,
    #[serde(default)]
    pub is_header_row: bool,
}

impl TableRow {
    pub fn new(id: impl Into<String>, cells: Vec<TableCell>) -> Self {
        Self {
            id: id.into(),
            cells,
            is_header_row: false,
        }
    }

    pub fn header(id: impl Into<String>, cells: Vec<TableCell>) -> Self {
        Self {
            id: id.into(),
            cells,
            is_header_row: true,
        }
    }
}

/// A cell placed into an HTML row, with its computed row span
#[derive(Debug, Clone, Copy)]
pub struct FlatCell<'a> {
    pub cell: &'a TableCell,
    pub row_span: u32,
    /// Index of the `<tr>` this cell belongs to
    pub html_row: u32,
}

/// Split rows into runs that are all header rows or all data rows, keeping order.
///
/// `[header, data, header, header, data, data]` becomes
/// `[[header], [data], [header, header], [data, data]]`.
pub fn split_rows_into_segments(rows: &[TableRow]) -> Vec<&[TableRow]> {
    rows.chunk_by(|a, b| a.is_header_row == b.is_header_row)
        .collect()
}

/// Number of table rows a cell spans, counting all descendant rows.
pub fn row_span(cell: &TableCell) -> u32 {
    if cell.child_rows.is_empty() {
        return 1;
    }
    cell.child_rows
        .iter()
        .map(|row| row.cells.first().map_or(1, row_span))
        .sum()
}

/// Flatten a segment's rows into cells tagged with row span and HTML row index.
pub fn flatten_cells(rows: &[TableRow]) -> Vec<FlatCell<'_>> {
    let mut out = Vec::new();
    flatten_into(rows, 0, &mut out);
    out
}

/// Returns the next free HTML row index.
fn flatten_into<'a>(rows: &'a [TableRow], mut html_row: u32, out: &mut Vec<FlatCell<'a>>) -> u32 {
    let mut last_cell_has_children = true;
    for row in rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if !last_cell_has_children && i == 0 {
                html_row += 1;
            }
            out.push(FlatCell {
                cell,
                row_span: row_span(cell),
                html_row,
            });
            if !cell.child_rows.is_empty() {
                html_row = flatten_into(&cell.child_rows, html_row, out);
            }
            last_cell_has_children = !cell.child_rows.is_empty();
        }
    }
    html_row + 1
}

/// Group flattened cells into HTML rows.
pub fn html_rows<'a>(cells: &[FlatCell<'a>]) -> Vec<Vec<FlatCell<'a>>> {
    cells
        .chunk_by(|a, b| a.html_row == b.html_row)
        .map(<[FlatCell<'a>]>::to_vec)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn data(id: &str) -> TableRow {
        TableRow::new(id, vec![TableCell::new(id, id)])
    }

    fn header(id: &str) -> TableRow {
        TableRow::header(id, vec![TableCell::new(id, id)])
    }

    #[test]
    fn test_split_segments() {
        let rows = vec![
            header("h1"),
            data("d1"),
            header("h2"),
            header("h3"),
            data("d2"),
            data("d3"),
        ];
        let segments = split_rows_into_segments(&rows);
        let ids: Vec<Vec<&str>> = segments
            .iter()
            .map(|s| s.iter().map(|r| r.id.as_str()).collect())
            .collect();
        assert_eq!(
            ids,
            vec![vec!["h1"], vec!["d1"], vec!["h2", "h3"], vec!["d2", "d3"]]
        );
        assert!(split_rows_into_segments(&[]).is_empty());
    }

    #[test]
    fn test_row_span_counts_descendants() {
        let nested = TableCell::new("inner", "i").with_child_rows(vec![data("x"), data("y")]);
        let cell = TableCell::new("outer", "o").with_child_rows(vec![
            TableRow::new("a", vec![nested]),
            data("b"),
        ]);
        assert_eq!(row_span(&cell), 3);
        assert_eq!(row_span(&TableCell::new("leaf", "l")), 1);
    }

    #[test]
    fn test_flatten_assigns_html_rows() {
        let rows = vec![
            TableRow::new(
                "a",
                vec![TableCell::new("a", "A").with_child_rows(vec![data("b"), data("c")])],
            ),
            data("d"),
        ];
        let flat = flatten_cells(&rows);
        let summary: Vec<(&str, u32, u32)> = flat
            .iter()
            .map(|f| (f.cell.id.as_str(), f.row_span, f.html_row))
            .collect();
        assert_eq!(
            summary,
            vec![("a", 2, 0), ("b", 1, 0), ("c", 1, 1), ("d", 1, 2)]
        );

        let grouped = html_rows(&flat);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].len(), 2);
    }

    #[test]
    fn test_flatten_plain_rows() {
        let rows = vec![
            TableRow::new("r1", vec![TableCell::new("x", "1"), TableCell::new("y", "2")]),
            TableRow::new("r2", vec![TableCell::new("x", "3"), TableCell::new("y", "4")]),
        ];
        let flat = flatten_cells(&rows);
        let html: Vec<u32> = flat.iter().map(|f| f.html_row).collect();
        assert_eq!(html, vec![0, 0, 1, 1]);
    }
}
