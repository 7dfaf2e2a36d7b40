//! portalgrid - table shaping for data-portal collection views
//!
//! Turns JSON records from a data-provider API into grids ready to render,
//! natively or in the browser via WebAssembly:
//! - Recursive CSS-grid layout with row and column spans
//! - Sortable grids with stable sorting and a built-in pager
//! - Pager slots with ellipses at a constant width
//! - Hidden columns from `#hidden=` URL fragments or local storage
//! - TSV export of the visible columns
//! - Sequencing-file tables paged by run/flowcell/lane group
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { layout_grid, pager_slots } from 'portalgrid';
//! await init();
//! const cells = layout_grid(rows, meta);
//! const pager = pager_slots(3, 20);
//! ```

pub mod columns;
pub mod error;
pub mod files;
pub mod layout;
pub mod pager;
pub mod sortable;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod web;

use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use crate::columns::{generate_tsv_export, CollectionColumn};
use crate::files::{generate_file_groups, GroupPaginator};
use crate::pager::PagerState;

pub use error::{GridError, Result};
pub use types::*;

thread_local! {
    static PAGINATOR: RefCell<GroupPaginator> = RefCell::new(GroupPaginator::default());
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    // Plain objects rather than JS Maps for JSON maps
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> std::result::Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid input: {e}")))
}

/// Route panics to the browser console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Lay out a grid and resolve its cells
///
/// # Arguments
/// * `rows` - Array of rows (`{ id, cells, children?, wrapper? }`)
/// * `meta` - Object passed unchanged to every cell
///
/// # Errors
/// Returns an error if `rows` does not have the row shape.
#[wasm_bindgen]
pub fn layout_grid(rows: JsValue, meta: JsValue) -> std::result::Result<JsValue, JsValue> {
    let rows: Vec<Row> = from_js(rows)?;
    let meta: Value = if meta.is_undefined() || meta.is_null() {
        Value::Null
    } else {
        from_js(meta)?
    };
    to_js(&layout::render_grid(&rows, &meta))
}

/// Page slots and button states for a pager
///
/// # Errors
/// Returns an error unless `1 <= current_page <= total_pages`.
#[wasm_bindgen]
pub fn pager_slots(current_page: u32, total_pages: u32) -> std::result::Result<JsValue, JsValue> {
    let state = PagerState::new(current_page, total_pages)?;
    to_js(&state.model())
}

/// Column ids hidden by the URL's `#hidden=` fragment, or `null` without one
#[must_use]
#[wasm_bindgen]
pub fn extract_hidden_columns(url: &str) -> Option<Vec<String>> {
    columns::extract_hidden_column_ids(url)
}

/// `url` with a `#hidden=` fragment for `hidden`, or without a fragment when empty
///
/// # Errors
/// Returns an error if `url` is not an absolute URL.
#[wasm_bindgen]
pub fn hidden_columns_url(url: &str, hidden: Vec<String>) -> std::result::Result<String, JsValue> {
    Ok(columns::generate_hidden_columns_url(url, &hidden)?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TsvDownload {
    filename: String,
    data_uri: String,
}

/// Build a TSV download of the visible columns
///
/// # Returns
/// `{ filename, dataUri }`
///
/// # Errors
/// Returns an error if the records or columns are malformed or `url` is not absolute.
#[wasm_bindgen]
pub fn export_tsv(
    records: JsValue,
    columns: JsValue,
    hidden: Vec<String>,
    collection_type: &str,
    url: &str,
) -> std::result::Result<JsValue, JsValue> {
    let records: Vec<Record> = from_js(records)?;
    let columns: Vec<CollectionColumn> = from_js(columns)?;
    let export = generate_tsv_export(&records, &columns, &hidden, collection_type, url)?;
    to_js(&TsvDownload {
        data_uri: export.data_uri(),
        filename: export.filename,
    })
}

/// Group sequencing files and split the groups into pages
///
/// Results are memoized per group layout and page size.
///
/// # Errors
/// Returns an error if `files` is not an array of objects.
#[wasm_bindgen]
pub fn paginate_sequence_files(
    files: JsValue,
    page_size: usize,
) -> std::result::Result<JsValue, JsValue> {
    let files: Vec<Record> = from_js(files)?;
    let groups = generate_file_groups(&files);
    let pages = PAGINATOR.with(|p| p.borrow_mut().paginate(&groups, page_size));
    to_js(pages.as_slice())
}

/// Resolve the hidden columns of a collection table from the page URL and `localStorage`
///
/// # Errors
/// Returns an error if the columns are malformed or storage is unavailable.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn load_hidden_columns(
    collection_type: &str,
    columns: JsValue,
) -> std::result::Result<JsValue, JsValue> {
    let columns: Vec<CollectionColumn> = from_js(columns)?;
    let mut store = web::LocalStorage::open()?;
    let location = web::current_location()?;
    let visibility =
        columns::ColumnVisibility::load(&mut store, collection_type, &columns, Some(&location))?;
    to_js(&visibility)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
