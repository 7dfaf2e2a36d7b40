//! Common test builders for portal records and grids.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use serde_json::{json, Value};

use portalgrid::layout::RenderedCell;
use portalgrid::Record;

/// Convert a JSON object literal into a record.
#[must_use]
pub fn record(value: Value) -> Record {
    value
        .as_object()
        .cloned()
        .expect("record literal must be an object")
}

/// Convert a JSON array of objects into records.
#[must_use]
pub fn records(value: Value) -> Vec<Record> {
    value
        .as_array()
        .expect("records literal must be an array")
        .iter()
        .cloned()
        .map(record)
        .collect()
}

/// A sequencing file with the grouping fields set as given.
#[must_use]
pub fn seq_file(
    id: &str,
    run: Option<u32>,
    flowcell: Option<&str>,
    lane: Option<u32>,
    read_type: Option<&str>,
) -> Record {
    let mut file = record(json!({
        "@id": id,
        "@type": ["SequenceFile", "File", "Item"],
    }));
    if let Some(run) = run {
        file.insert("sequencing_run".into(), json!(run));
    }
    if let Some(flowcell) = flowcell {
        file.insert("flowcell_id".into(), json!(flowcell));
    }
    if let Some(lane) = lane {
        file.insert("lane".into(), json!(lane));
    }
    if let Some(read_type) = read_type {
        file.insert("illumina_read_type".into(), json!(read_type));
    }
    file
}

/// Values of `field` across records, as strings.
#[must_use]
pub fn field_values(records: &[&Record], field: &str) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get(field).map(|v| v.to_string()).unwrap_or_default())
        .collect()
}

/// `(key, grid-row, grid-column)` for each rendered cell.
#[must_use]
pub fn placements(cells: &[RenderedCell]) -> Vec<(String, String, String)> {
    cells
        .iter()
        .map(|c| (c.key.clone(), c.grid_row.clone(), c.grid_column.clone()))
        .collect()
}
