//! Column visibility and export for collection tables.
//!
//! Hidden columns come from one of two places: a `#hidden=a,b` URL fragment
//! that lets users share a view, or per-collection-type storage. The fragment
//! wins when present.

mod export;
mod storage;
mod url_hash;
mod visibility;

use serde::{Deserialize, Serialize};

pub use export::{
    export_timestamp, generate_tsv_export, generate_tsv_export_at, truncate_cell, TsvExport,
    MAX_CELL_LENGTH, TSV_DATA_URI_PREFIX,
};
pub use storage::{
    load_stored_hidden_columns, load_validated_hidden_columns, save_stored_hidden_columns,
    storage_key, KeyValueStore, MemoryStore, STORAGE_KEY_PREFIX,
};
pub use url_hash::{
    clear_hidden_columns_from_url, extract_hidden_column_ids, generate_hidden_columns_url,
    HIDDEN_FRAGMENT_PREFIX,
};
pub use visibility::{ColumnVisibility, HiddenSource};

use crate::sortable::Column;
use crate::types::ID_FIELD;

/// Anything shown as a titled table column
pub trait TableColumn {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
}

/// Column of a collection table, one per schema property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionColumn {
    pub id: String,
    pub title: String,
}

impl CollectionColumn {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

impl TableColumn for CollectionColumn {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl TableColumn for Column {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl<C: TableColumn> TableColumn for &C {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn title(&self) -> &str {
        (**self).title()
    }
}

/// Columns whose id is not in `hidden`, in their original order.
///
/// Applies to every column alike; keeping `@id` visible is up to the caller.
pub fn filter_hidden_columns<'a, C: TableColumn>(columns: &'a [C], hidden: &[String]) -> Vec<&'a C> {
    columns
        .iter()
        .filter(|column| !hidden.iter().any(|id| id == column.id()))
        .collect()
}

/// Order columns by title, with the `@id` column always first. Stable.
pub fn sort_columns_for_display<C: TableColumn>(mut columns: Vec<C>) -> Vec<C> {
    columns.sort_by(|a, b| {
        let a_rest = a.id() != ID_FIELD;
        let b_rest = b.id() != ID_FIELD;
        a_rest.cmp(&b_rest).then_with(|| {
            if a_rest && b_rest {
                a.title().cmp(b.title())
            } else {
                std::cmp::Ordering::Equal
            }
        })
    });
    columns
}
