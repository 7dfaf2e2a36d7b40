//! Recursive CSS-grid placement for the row/cell tree.
//!
//! Each row's cells sit side by side starting at the row's anchor column and
//! span vertically over the row's children. Child rows continue to the right
//! of the parent's cells, stacked from the parent's own grid line.

use serde::Serialize;
use serde_json::Value;

use crate::types::{Cell, CellContext, CellValue, Row};

/// Grid line where a layout pass starts (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridAnchor {
    pub row: u32,
    pub col: u32,
}

impl Default for GridAnchor {
    fn default() -> Self {
        Self { row: 1, col: 1 }
    }
}

/// A cell with its computed grid lines
///
/// Lines are 1-based; `row_end` and `col_end` are exclusive, matching CSS
/// `grid-row: start / end`.
#[derive(Debug, Clone, Copy)]
pub struct PositionedCell<'a> {
    pub cell: &'a Cell,
    pub row_id: &'a str,
    /// Index of the cell within its row
    pub cell_index: usize,
    /// Wrapper named by the owning row, if any
    pub wrapper: Option<&'a str>,
    pub row_start: u32,
    pub row_end: u32,
    pub col_start: u32,
    pub col_end: u32,
}

impl PositionedCell<'_> {
    /// CSS `grid-row` value.
    pub fn grid_row(&self) -> String {
        format!("{} / {}", self.row_start, self.row_end)
    }

    /// CSS `grid-column` value.
    pub fn grid_column(&self) -> String {
        format!("{} / {}", self.col_start, self.col_end)
    }

    /// Resolve the cell's content against the layout-wide `meta`.
    pub fn resolve(&self, meta: &Value) -> CellValue {
        let ctx = CellContext {
            id: &self.cell.id,
            source: self.cell.source.as_ref(),
            meta,
        };
        self.cell.content.resolve(&ctx)
    }
}

/// Owned, serializable cell ready for the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCell {
    /// `"{row_id}-{cell_id}"`, unique across the grid when row ids are
    pub key: String,
    pub row_id: String,
    pub cell_id: String,
    pub cell_index: usize,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,
    pub no_wrapper: bool,
    pub content: CellValue,
    pub grid_row: String,
    pub grid_column: String,
}

/// Lay out a grid starting at line (1, 1).
pub fn layout_grid(rows: &[Row]) -> Vec<PositionedCell<'_>> {
    layout_grid_at(rows, GridAnchor::default())
}

/// Lay out a grid starting at `anchor`.
pub fn layout_grid_at(rows: &[Row], anchor: GridAnchor) -> Vec<PositionedCell<'_>> {
    let mut out = Vec::new();
    place_rows(rows, anchor, &mut out);
    out
}

fn place_rows<'a>(rows: &'a [Row], anchor: GridAnchor, out: &mut Vec<PositionedCell<'a>>) {
    let mut row_line = anchor.row;
    for row in rows {
        let span = row.row_span();
        let mut col_line = anchor.col;
        for (cell_index, cell) in row.cells.iter().enumerate() {
            let width = cell.span();
            out.push(PositionedCell {
                cell,
                row_id: &row.id,
                cell_index,
                wrapper: row.wrapper.as_deref(),
                row_start: row_line,
                row_end: row_line + span,
                col_start: col_line,
                col_end: col_line + width,
            });
            col_line += width;
        }

        if !row.children.is_empty() {
            place_rows(
                &row.children,
                GridAnchor {
                    row: row_line,
                    col: col_line,
                },
                out,
            );
        }
        row_line += span;
    }
}

/// Lay out a grid and resolve every cell's content with the same `meta`.
pub fn render_grid(rows: &[Row], meta: &Value) -> Vec<RenderedCell> {
    layout_grid(rows)
        .iter()
        .map(|positioned| RenderedCell {
            key: format!("{}-{}", positioned.row_id, positioned.cell.id),
            row_id: positioned.row_id.to_string(),
            cell_id: positioned.cell.id.clone(),
            cell_index: positioned.cell_index,
            role: positioned.cell.role.clone(),
            wrapper: positioned.wrapper.map(str::to_string),
            no_wrapper: positioned.cell.no_wrapper,
            content: positioned.resolve(meta),
            grid_row: positioned.grid_row(),
            grid_column: positioned.grid_column(),
        })
        .collect()
}

/// Number of grid lines spanned by the whole grid, as `(rows, cols)`.
pub fn grid_extent(rows: &[Row]) -> (u32, u32) {
    layout_grid(rows).iter().fold((0, 0), |(r, c), cell| {
        (r.max(cell.row_end - 1), c.max(cell.col_end - 1))
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coords(cell: &PositionedCell<'_>) -> (u32, u32, u32, u32) {
        (cell.row_start, cell.row_end, cell.col_start, cell.col_end)
    }

    #[test]
    fn test_flat_rows() {
        let grid = vec![
            Row::new("r1", vec![Cell::new("a", "A"), Cell::new("b", "B")]),
            Row::new("r2", vec![Cell::new("a", "C"), Cell::new("b", "D")]),
        ];
        let cells = layout_grid(&grid);

        assert_eq!(cells.len(), 4);
        assert_eq!(coords(&cells[0]), (1, 2, 1, 2));
        assert_eq!(coords(&cells[1]), (1, 2, 2, 3));
        assert_eq!(coords(&cells[2]), (2, 3, 1, 2));
        assert_eq!(coords(&cells[3]), (2, 3, 2, 3));
    }

    #[test]
    fn test_children_to_the_right() {
        let grid = vec![Row::new("parent", vec![Cell::new("p", "P").with_span(2)])
            .with_children(vec![
                Row::new("c1", vec![Cell::new("x", "X")]),
                Row::new("c2", vec![Cell::new("x", "Y")]),
                Row::new("c3", vec![Cell::new("x", "Z")]),
            ])];
        let cells = layout_grid(&grid);

        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].row_id, "parent");
        assert_eq!(coords(&cells[0]), (1, 4, 1, 3));
        assert_eq!(coords(&cells[1]), (1, 2, 3, 4));
        assert_eq!(coords(&cells[2]), (2, 3, 3, 4));
        assert_eq!(coords(&cells[3]), (3, 4, 3, 4));
    }

    #[test]
    fn test_sibling_after_children_advances() {
        let grid = vec![
            Row::new("a", vec![Cell::new("a", "A")]).with_children(vec![
                Row::new("a1", vec![Cell::new("x", "1")]),
                Row::new("a2", vec![Cell::new("x", "2")]),
            ]),
            Row::new("b", vec![Cell::new("b", "B")]),
        ];
        let cells = layout_grid(&grid);
        let last = cells.last().unwrap();
        assert_eq!(last.row_id, "b");
        assert_eq!(coords(last), (3, 4, 1, 2));
    }

    #[test]
    fn test_empty_row_consumes_span() {
        let grid = vec![
            Row::new("empty", vec![]),
            Row::new("next", vec![Cell::new("n", "N")]),
        ];
        let cells = layout_grid(&grid);
        assert_eq!(cells.len(), 1);
        assert_eq!(coords(&cells[0]), (2, 3, 1, 2));
    }

    #[test]
    fn test_empty_grid() {
        assert!(layout_grid(&[]).is_empty());
        assert_eq!(grid_extent(&[]), (0, 0));
    }

    #[test]
    fn test_custom_anchor() {
        let grid = vec![Row::new("r", vec![Cell::new("a", "A")])];
        let cells = layout_grid_at(&grid, GridAnchor { row: 4, col: 3 });
        assert_eq!(coords(&cells[0]), (4, 5, 3, 4));
        assert_eq!(cells[0].grid_row(), "4 / 5");
        assert_eq!(cells[0].grid_column(), "3 / 4");
    }

    #[test]
    fn test_render_threads_meta_through_children() {
        let cell = || {
            Cell::computed("m", |ctx| {
                CellValue::Text(ctx.meta["label"].as_str().unwrap_or("").to_string())
            })
        };
        let grid = vec![Row::new("top", vec![cell()])
            .with_children(vec![Row::new("child", vec![cell()])])];

        let rendered = render_grid(&grid, &json!({"label": "same"}));
        assert_eq!(rendered.len(), 2);
        assert!(rendered
            .iter()
            .all(|c| c.content == CellValue::Text("same".into())));
        assert_eq!(rendered[1].key, "child-m");
        assert_eq!(rendered[1].grid_column, "2 / 3");
    }

    #[test]
    fn test_grid_extent() {
        let grid = vec![Row::new("p", vec![Cell::new("p", "P")]).with_children(vec![
            Row::new("c1", vec![Cell::new("x", "X").with_span(3)]),
            Row::new("c2", vec![]),
        ])];
        assert_eq!(grid_extent(&grid), (2, 4));
    }
}
