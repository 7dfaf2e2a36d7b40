//! Structured error types for portalgrid.
//!
//! Most operations in this crate are total over well-formed input; the errors
//! below cover the few places where caller input or a storage backend can fail.

/// All errors that can occur while shaping, paging, or exporting grid data.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The key-value store refused a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A sortable grid needs at least one column.
    #[error("A sortable grid needs at least one column")]
    NoColumns,

    /// Pager state outside `1..=total_pages`.
    #[error("Page {current} out of range 1..={total}")]
    PageOutOfRange {
        /// Requested current page.
        current: u32,
        /// Total number of pages.
        total: u32,
    },

    /// Input that does not have the expected shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::InvalidInput(s.to_string())
    }
}

impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
