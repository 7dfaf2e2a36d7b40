//! Grid layout tests
//!
//! Tests for cell placement, row and column spans, nested child rows,
//! computed content, JSON input, and HTML-table segmentation.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::placements;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use portalgrid::layout::{
    flatten_cells, html_rows, layout_grid, render_grid, split_rows_into_segments, TableCell,
    TableRow,
};
use portalgrid::{Cell, CellValue, Row};

fn file_set_grid() -> Vec<Row> {
    vec![
        Row::new(
            "set-a",
            vec![Cell::new("set", "Set A").with_role("rowheader")],
        )
        .with_children(vec![
            Row::new("f1", vec![Cell::new("acc", "IGVFFI0001"), Cell::new("size", 10.0)]),
            Row::new("f2", vec![Cell::new("acc", "IGVFFI0002"), Cell::new("size", 20.0)]),
        ]),
        Row::new("set-b", vec![Cell::new("set", "Set B")]).with_children(vec![Row::new(
            "f3",
            vec![Cell::new("acc", "IGVFFI0003"), Cell::new("size", 30.0)],
        )]),
    ]
}

#[test]
fn test_layout_is_deterministic() {
    let grid = file_set_grid();
    let first = render_grid(&grid, &Value::Null);
    let second = render_grid(&grid, &Value::Null);
    assert_eq!(first, second);
}

#[test]
fn test_nested_rows_place_to_the_right() {
    let cells = render_grid(&file_set_grid(), &Value::Null);
    assert_eq!(
        placements(&cells),
        vec![
            ("set-a-set".into(), "1 / 3".into(), "1 / 2".into()),
            ("f1-acc".into(), "1 / 2".into(), "2 / 3".into()),
            ("f1-size".into(), "1 / 2".into(), "3 / 4".into()),
            ("f2-acc".into(), "2 / 3".into(), "2 / 3".into()),
            ("f2-size".into(), "2 / 3".into(), "3 / 4".into()),
            ("set-b-set".into(), "3 / 4".into(), "1 / 2".into()),
            ("f3-acc".into(), "3 / 4".into(), "2 / 3".into()),
            ("f3-size".into(), "3 / 4".into(), "3 / 4".into()),
        ]
    );
}

#[test]
fn test_own_cells_span_all_children() {
    let grid = vec![Row::new("p", vec![Cell::new("a", "A"), Cell::new("b", "B")])
        .with_children((0..5).map(|i| Row::new(format!("c{i}"), vec![])).collect())];
    for cell in layout_grid(&grid) {
        assert_eq!(cell.row_end - cell.row_start, 5);
    }
}

#[test]
fn test_children_start_after_spanned_columns() {
    let grid = vec![Row::new(
        "p",
        vec![Cell::new("a", "A").with_span(3), Cell::new("b", "B").with_span(2)],
    )
    .with_children(vec![Row::new("c", vec![Cell::new("x", "X")])])];
    let cells = layout_grid(&grid);
    let child = cells.iter().find(|c| c.row_id == "c").unwrap();
    assert_eq!(child.col_start, 6);
}

#[test]
fn test_grandchildren() {
    let grid = vec![Row::new("a", vec![Cell::new("a", "A")]).with_children(vec![Row::new(
        "b",
        vec![Cell::new("b", "B")],
    )
    .with_children(vec![
        Row::new("c1", vec![Cell::new("c", "C1")]),
        Row::new("c2", vec![Cell::new("c", "C2")]),
    ])])];
    let cells = layout_grid(&grid);
    let coords: Vec<(&str, u32, u32, u32)> = cells
        .iter()
        .map(|c| (c.row_id, c.row_start, c.row_end, c.col_start))
        .collect();
    // "a" has one child, so it spans one row even though "b" spans two
    assert_eq!(
        coords,
        vec![("a", 1, 2, 1), ("b", 1, 3, 2), ("c1", 1, 2, 3), ("c2", 2, 3, 3)]
    );
}

#[test]
fn test_meta_reaches_every_cell() {
    let grid = vec![
        Row::new(
            "r",
            vec![Cell::computed("n", |ctx| {
                CellValue::Number(ctx.meta["factor"].as_f64().unwrap_or(0.0))
            })],
        )
        .with_children(vec![Row::new(
            "c",
            vec![Cell::computed("n", |ctx| {
                CellValue::Number(ctx.meta["factor"].as_f64().unwrap_or(0.0))
            })],
        )]),
    ];
    let cells = render_grid(&grid, &json!({"factor": 2.5}));
    assert!(cells.iter().all(|c| c.content == CellValue::Number(2.5)));
}

#[test]
fn test_rows_from_json() {
    let rows: Vec<Row> = serde_json::from_value(json!([
        {
            "id": "header",
            "wrapper": "header",
            "cells": [
                { "id": "a", "content": "Accession", "role": "columnheader" },
                { "id": "b", "content": "Size", "role": "columnheader" }
            ]
        },
        { "id": "r1", "cells": [{ "id": "a", "content": "X" }, { "id": "b", "content": 1 }] }
    ]))
    .unwrap();
    let cells = render_grid(&rows, &Value::Null);
    assert_eq!(cells.len(), 4);
    assert_eq!(cells[0].wrapper.as_deref(), Some("header"));
    assert_eq!(cells[0].role, "columnheader");
    assert_eq!(cells[3].content, CellValue::Number(1.0));

    let json = serde_json::to_value(&cells[3]).unwrap();
    assert_eq!(json["gridRow"], json!("2 / 3"));
    assert_eq!(json["content"], json!(1.0));
}

#[test]
fn test_segments_and_row_spans() {
    let rows = vec![
        TableRow::header("h", vec![TableCell::new("t", "Title")]),
        TableRow::new(
            "d1",
            vec![TableCell::new("k", "Key").with_child_rows(vec![
                TableRow::new("v1", vec![TableCell::new("v", "1")]),
                TableRow::new("v2", vec![TableCell::new("v", "2")]),
            ])],
        ),
        TableRow::new("d2", vec![TableCell::new("k", "Other")]),
    ];

    let segments = split_rows_into_segments(&rows);
    assert_eq!(segments.len(), 2);

    let flat = flatten_cells(segments[1]);
    let spans: Vec<(String, u32, u32)> = flat
        .iter()
        .map(|f| (f.cell.content.to_text(), f.row_span, f.html_row))
        .collect();
    assert_eq!(
        spans,
        vec![
            ("Key".to_string(), 2, 0),
            ("1".to_string(), 1, 0),
            ("2".to_string(), 1, 1),
            ("Other".to_string(), 1, 2),
        ]
    );
    assert_eq!(html_rows(&flat).len(), 3);
}
