//! Collection table tests
//!
//! Tests for the `#hidden=` URL fragment, hidden-column persistence and
//! precedence, column ordering, and TSV export.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use chrono::{TimeZone, Utc};
use common::records;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use portalgrid::columns::{
    extract_hidden_column_ids, generate_hidden_columns_url, generate_tsv_export,
    generate_tsv_export_at, load_stored_hidden_columns, save_stored_hidden_columns,
    sort_columns_for_display, CollectionColumn, ColumnVisibility, HiddenSource, KeyValueStore,
    MemoryStore, MAX_CELL_LENGTH, TSV_DATA_URI_PREFIX,
};
use portalgrid::{GridError, Result};

const FILES_URL: &str = "https://portal.org/search/?type=File";

fn file_columns() -> Vec<CollectionColumn> {
    vec![
        CollectionColumn::new("@id", "ID"),
        CollectionColumn::new("lab", "Lab"),
        CollectionColumn::new("award", "Award"),
        CollectionColumn::new("file_format", "Format"),
    ]
}

fn hidden(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| (*id).to_string()).collect()
}

/// A store whose writes always fail, like a full browser quota
struct FullStore;

impl KeyValueStore for FullStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(GridError::Storage(format!("quota exceeded writing {key}")))
    }
}

// ---------------------------------------------------------------------------
// URL fragment
// ---------------------------------------------------------------------------

#[test_case(&["lab"] ; "one column")]
#[test_case(&["lab", "award", "@id"] ; "several columns")]
#[test_case(&["file_format"] ; "underscore")]
fn test_fragment_round_trip(ids: &[&str]) {
    let url = generate_hidden_columns_url(FILES_URL, &hidden(ids)).unwrap();
    assert_eq!(extract_hidden_column_ids(&url), Some(hidden(ids)));
}

#[test]
fn test_empty_list_removes_fragment() {
    let url = generate_hidden_columns_url(&format!("{FILES_URL}#hidden=lab"), &[]).unwrap();
    assert_eq!(url, FILES_URL);
    assert_eq!(extract_hidden_column_ids(&url), None);
}

#[test]
fn test_generate_replaces_existing_fragment() {
    let url =
        generate_hidden_columns_url(&format!("{FILES_URL}#hidden=lab"), &hidden(&["award"]))
            .unwrap();
    assert_eq!(url, format!("{FILES_URL}#hidden=award"));
}

#[test_case("https://portal.org/files/#hidden=lab%20award", &["lab", "20award"] ; "encoded space splits")]
#[test_case("https://portal.org/files/#hidden=,lab,,", &["lab"] ; "empty tokens dropped")]
#[test_case("/files/#hidden=lab.award", &["lab", "award"] ; "relative url")]
fn test_fragment_tokens(url: &str, expected: &[&str]) {
    assert_eq!(extract_hidden_column_ids(url), Some(hidden(expected)));
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[test]
fn test_storage_used_without_fragment() {
    let mut store = MemoryStore::new();
    save_stored_hidden_columns(&mut store, "File", &hidden(&["award"])).unwrap();

    let vis = ColumnVisibility::load(&mut store, "File", &file_columns(), Some(FILES_URL)).unwrap();
    assert_eq!(vis.source(), HiddenSource::Storage);
    assert_eq!(vis.hidden(), hidden(&["award"]).as_slice());
    assert!(vis.is_hidden("award"));
    assert!(!vis.is_hidden("lab"));
}

#[test]
fn test_storage_is_per_collection_type() {
    let mut store = MemoryStore::new();
    save_stored_hidden_columns(&mut store, "File", &hidden(&["award"])).unwrap();

    let vis = ColumnVisibility::load(&mut store, "Donor", &file_columns(), None).unwrap();
    assert_eq!(vis.source(), HiddenSource::Default);
    assert_eq!(vis.collection_type(), "Donor");
}

#[test]
fn test_stale_stored_ids_are_dropped() {
    let mut store = MemoryStore::new();
    save_stored_hidden_columns(&mut store, "File", &hidden(&["@id", "gone", "lab"])).unwrap();

    let vis = ColumnVisibility::load(&mut store, "File", &file_columns(), None).unwrap();
    assert_eq!(vis.hidden(), hidden(&["lab"]).as_slice());
    assert_eq!(
        load_stored_hidden_columns(&store, "File"),
        Some(hidden(&["lab"]))
    );
}

#[test]
fn test_toggle_persists_in_storage_mode() {
    let mut store = MemoryStore::new();
    let mut vis = ColumnVisibility::load(&mut store, "File", &file_columns(), None).unwrap();

    assert_eq!(vis.set_hidden(&mut store, "lab", true, FILES_URL).unwrap(), None);
    assert_eq!(vis.set_hidden(&mut store, "award", true, FILES_URL).unwrap(), None);
    assert_eq!(vis.set_hidden(&mut store, "lab", false, FILES_URL).unwrap(), None);

    assert_eq!(vis.source(), HiddenSource::Storage);
    assert_eq!(
        load_stored_hidden_columns(&store, "File"),
        Some(hidden(&["award"]))
    );
}

#[test]
fn test_toggle_stays_in_url_mode() {
    let mut store = MemoryStore::new();
    let url = format!("{FILES_URL}#hidden=lab");
    let mut vis = ColumnVisibility::load(&mut store, "File", &file_columns(), Some(&url)).unwrap();

    let next = vis.set_hidden(&mut store, "award", true, &url).unwrap();
    assert_eq!(next, Some(format!("{FILES_URL}#hidden=lab,award")));
    assert_eq!(vis.source(), HiddenSource::Url);
    assert!(store.is_empty());
}

#[test]
fn test_save_url_columns() {
    let mut store = MemoryStore::new();
    let url = format!("{FILES_URL}#hidden=lab,award");
    let mut vis = ColumnVisibility::load(&mut store, "File", &file_columns(), Some(&url)).unwrap();

    let next = vis.save_url_columns(&mut store, &url).unwrap();
    assert_eq!(next, FILES_URL);
    assert_eq!(vis.source(), HiddenSource::Storage);
    assert_eq!(
        load_stored_hidden_columns(&store, "File"),
        Some(hidden(&["lab", "award"]))
    );
}

#[test]
fn test_clear_url_columns_restores_stored_set() {
    let mut store = MemoryStore::new();
    save_stored_hidden_columns(&mut store, "File", &hidden(&["file_format"])).unwrap();
    let url = format!("{FILES_URL}#hidden=lab");
    let columns = file_columns();
    let mut vis = ColumnVisibility::load(&mut store, "File", &columns, Some(&url)).unwrap();
    assert_eq!(vis.hidden(), hidden(&["lab"]).as_slice());

    let next = vis.clear_url_columns(&mut store, &columns, &url).unwrap();
    assert_eq!(next, FILES_URL);
    assert_eq!(vis.source(), HiddenSource::Storage);
    assert_eq!(vis.hidden(), hidden(&["file_format"]).as_slice());
}

#[test]
fn test_shareable_url() {
    let mut store = MemoryStore::new();
    let mut vis = ColumnVisibility::load(&mut store, "File", &file_columns(), None).unwrap();
    vis.set_hidden(&mut store, "award", true, FILES_URL).unwrap();
    assert_eq!(
        vis.shareable_url(FILES_URL).unwrap(),
        format!("{FILES_URL}#hidden=award")
    );
}

#[test]
fn test_storage_failure_propagates() {
    let mut store = FullStore;
    let mut vis = ColumnVisibility::load(&mut store, "File", &file_columns(), None).unwrap();
    let err = vis
        .set_hidden(&mut store, "lab", true, FILES_URL)
        .unwrap_err();
    assert!(matches!(err, GridError::Storage(_)));
}

#[test]
fn test_visible_columns_in_display_order() {
    let mut store = MemoryStore::new();
    let mut vis = ColumnVisibility::load(&mut store, "File", &file_columns(), None).unwrap();
    vis.set_hidden(&mut store, "lab", true, FILES_URL).unwrap();

    let columns = file_columns();
    let titles: Vec<&str> = vis
        .visible_columns(&columns)
        .iter()
        .map(|c| c.title.as_str())
        .collect();
    assert_eq!(titles, vec!["ID", "Award", "Format"]);
}

#[test]
fn test_sort_columns_for_display_keeps_id_first() {
    let columns = vec![
        CollectionColumn::new("z", "Zebra"),
        CollectionColumn::new("@id", "Identifier"),
        CollectionColumn::new("a", "Aardvark"),
    ];
    let ids: Vec<String> = sort_columns_for_display(columns)
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["@id", "a", "z"]);
}

// ---------------------------------------------------------------------------
// TSV export
// ---------------------------------------------------------------------------

#[test]
fn test_export_content() {
    let data = records(json!([
        { "@id": "/files/F1/", "lab": "Snyder", "award": "U01", "file_format": "fastq" },
        { "@id": "/files/F2/", "lab": { "title": "Bernstein" }, "file_format": "bam" }
    ]));
    let now = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap();
    let export = generate_tsv_export_at(
        &data,
        &file_columns(),
        &hidden(&["award"]),
        "File",
        FILES_URL,
        now,
    )
    .unwrap();

    assert_eq!(export.filename, "file-2024_03_07_14h_05m_09s_UTC.tsv");
    let lines: Vec<&str> = export.content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "2024_03_07_14h_05m_09s_UTC\thttps://portal.org/search/?type=File#hidden=award",
            "ID\tLab\tFormat",
            "/files/F1/\tSnyder\tfastq",
            "/files/F2/\t{\"title\":\"Bernstein\"}\tbam",
        ]
    );
}

#[test]
fn test_export_without_type() {
    let now = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    let export =
        generate_tsv_export_at(&[], &file_columns(), &[], "", FILES_URL, now).unwrap();
    assert_eq!(export.filename, "2023_12_31_23h_59m_59s_UTC.tsv");
    assert_eq!(
        export.content,
        format!("2023_12_31_23h_59m_59s_UTC\t{FILES_URL}\nID\tLab\tAward\tFormat")
    );
}

#[test]
fn test_export_truncates_long_cells() {
    let data = records(json!([{ "@id": "/files/F1/", "lab": "x".repeat(1000) }]));
    let columns = vec![
        CollectionColumn::new("@id", "ID"),
        CollectionColumn::new("lab", "Lab"),
    ];
    let export = generate_tsv_export(&data, &columns, &[], "File", FILES_URL).unwrap();
    let last = export.content.lines().last().unwrap();
    let lab = last.split('\t').nth(1).unwrap();
    assert_eq!(lab.len(), MAX_CELL_LENGTH);
}

#[test]
fn test_export_is_deterministic_apart_from_timestamp() {
    let data = records(json!([{ "@id": "/files/F1/", "lab": "Snyder" }]));
    let first = generate_tsv_export_at(
        &data,
        &file_columns(),
        &[],
        "File",
        FILES_URL,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
    .unwrap();
    let second = generate_tsv_export_at(
        &data,
        &file_columns(),
        &[],
        "File",
        FILES_URL,
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    )
    .unwrap();

    let body = |content: &str| content.lines().skip(1).map(str::to_string).collect::<Vec<_>>();
    assert_eq!(body(&first.content), body(&second.content));
    assert_ne!(first.filename, second.filename);
}

#[test]
fn test_export_data_uri() {
    let data = records(json!([{ "@id": "/files/F1/", "lab": "Snyder lab" }]));
    let columns = vec![CollectionColumn::new("lab", "Lab")];
    let now = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap();
    let export = generate_tsv_export_at(&data, &columns, &[], "File", FILES_URL, now).unwrap();

    let uri = export.data_uri();
    assert!(uri.starts_with(TSV_DATA_URI_PREFIX));
    assert!(uri.ends_with("%0ALab%0ASnyder%20lab"));
}
