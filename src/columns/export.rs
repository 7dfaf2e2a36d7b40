//! TSV download of a collection table.
//!
//! The file opens with a line holding the export time and the URL of the
//! table view, hidden columns included, followed by the column titles and
//! one line per record.

use chrono::{DateTime, Utc};

use crate::columns::{filter_hidden_columns, generate_hidden_columns_url, TableColumn};
use crate::error::Result;
use crate::types::{value_to_text, Record};

/// Longest cell spreadsheet applications import reliably, in characters
pub const MAX_CELL_LENGTH: usize = 490;

/// Prefix of the `data:` URI offered for download
pub const TSV_DATA_URI_PREFIX: &str = "data:text/tab-separated-values; charset=utf-8,";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsvExport {
    pub filename: String,
    /// Raw TSV text
    pub content: String,
}

impl TsvExport {
    /// Percent-encoded content behind the TSV `data:` prefix.
    pub fn data_uri(&self) -> String {
        format!("{TSV_DATA_URI_PREFIX}{}", urlencoding::encode(&self.content))
    }
}

/// Timestamp used in the metadata line and the file name,
/// e.g. `2024_03_07_14h_05m_09s_UTC`.
pub fn export_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y_%m_%d_%Hh_%Mm_%Ss_UTC").to_string()
}

/// Cell text cut to [`MAX_CELL_LENGTH`] characters.
pub fn truncate_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_LENGTH) {
        Some((end, _)) => text.get(..end).unwrap_or(text),
        None => text,
    }
}

/// Export the visible columns of `records`, stamped with the current time.
pub fn generate_tsv_export<C: TableColumn>(
    records: &[Record],
    columns: &[C],
    hidden: &[String],
    collection_type: &str,
    source_url: &str,
) -> Result<TsvExport> {
    generate_tsv_export_at(records, columns, hidden, collection_type, source_url, Utc::now())
}

/// Export the visible columns of `records` as of `now`.
///
/// `columns` are written in the order given; hidden ones are skipped.
pub fn generate_tsv_export_at<C: TableColumn>(
    records: &[Record],
    columns: &[C],
    hidden: &[String],
    collection_type: &str,
    source_url: &str,
    now: DateTime<Utc>,
) -> Result<TsvExport> {
    let timestamp = export_timestamp(now);
    let view_url = generate_hidden_columns_url(source_url, hidden)?;
    let visible = filter_hidden_columns(columns, hidden);

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(format!("{timestamp}\t{view_url}"));
    lines.push(
        visible
            .iter()
            .map(|column| column.title())
            .collect::<Vec<_>>()
            .join("\t"),
    );
    for record in records {
        let cells: Vec<String> = visible
            .iter()
            .map(|column| {
                let text = record.get(column.id()).map(value_to_text).unwrap_or_default();
                truncate_cell(&text).to_string()
            })
            .collect();
        lines.push(cells.join("\t"));
    }

    let filename = if collection_type.is_empty() {
        format!("{timestamp}.tsv")
    } else {
        format!("{}-{timestamp}.tsv", collection_type.to_lowercase())
    };
    log::debug!("exported {} record(s) to {filename}", records.len());

    Ok(TsvExport {
        filename,
        content: lines.join("\n"),
    })
}
