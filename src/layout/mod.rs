//! Layout engine for placing grid cells.
//!
//! This module handles:
//! - Recursive CSS-grid placement of rows, cells, and child rows
//! - Resolving computed cell content with layout-wide metadata
//! - Header/data segmentation and row spans for the HTML-table variant

mod grid;
mod segments;

pub use grid::{
    grid_extent, layout_grid, layout_grid_at, render_grid, GridAnchor, PositionedCell,
    RenderedCell,
};
pub use segments::{
    flatten_cells, html_rows, row_span, split_rows_into_segments, FlatCell, TableCell, TableRow,
};
