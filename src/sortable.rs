//! Sortable grid: turns flat records into a grid with a sortable header row.
//!
//! The grid owns its sort state. Header clicks flip the direction of the
//! current column or switch to a new column sorted ascending. Records are
//! sorted stably, so records with equal keys keep their input order in both
//! directions.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{GridError, Result};
use crate::pager::{PagedData, PagerAction, PagerState};
use crate::types::{field_text, Cell, CellContent, CellRenderer, CellValue, Grid, Record, Row};

/// Records per page for callers that turn on paging with [`SortableGrid::with_page_size`]
pub const SORTABLE_GRID_PAGE_SIZE: usize = 10;

/// Row id of the header row
pub const HEADER_ROW_ID: &str = "header";

/// Role given to header cells
pub const HEADER_CELL_ROLE: &str = "columnheader";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Column and direction the records are sorted by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortState {
    /// Apply a click on the header of `column_id`.
    pub fn click(&mut self, column_id: &str) {
        if self.column_id == column_id {
            self.direction = self.direction.toggled();
        } else {
            self.column_id = column_id.to_string();
            self.direction = SortDirection::Asc;
        }
    }
}

/// Caller-supplied starting sort
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialSort {
    #[serde(default)]
    pub column_id: Option<String>,
    #[serde(default)]
    pub direction: Option<SortDirection>,
    /// Keep records in caller order and never sort
    #[serde(default, alias = "isSortingSuppressed")]
    pub suppressed: bool,
}

/// A comparable sort key with a total order across JSON value kinds
///
/// Booleans sort before numbers, numbers before text, and missing values last.
#[derive(Debug, Clone)]
pub enum SortKey {
    Bool(bool),
    Number(f64),
    Text(String),
    Missing,
}

impl SortKey {
    /// Key for a raw field value. Arrays and objects compare by their JSON text.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => SortKey::Missing,
            Some(Value::Bool(b)) => SortKey::Bool(*b),
            Some(Value::Number(n)) => n.as_f64().map_or(SortKey::Missing, SortKey::Number),
            Some(Value::String(s)) => SortKey::Text(s.clone()),
            Some(other) => SortKey::Text(other.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Bool(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Missing => 3,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        SortKey::Text(s.to_string())
    }
}

impl From<f64> for SortKey {
    fn from(n: f64) -> Self {
        SortKey::Number(n)
    }
}

type ValueFn = dyn Fn(&Record) -> CellValue + Send + Sync;
type SorterFn = dyn Fn(&Record, &Value) -> SortKey + Send + Sync;
type HideFn = dyn Fn(&[Record], &[Column], &Value) -> bool + Send + Sync;

/// Configuration of one sortable-grid column
#[derive(Clone)]
pub struct Column {
    /// Record field shown in this column
    pub id: String,
    pub title: String,
    pub is_sortable: bool,
    display: Option<CellRenderer>,
    value: Option<Arc<ValueFn>>,
    sorter: Option<Arc<SorterFn>>,
    hide: Option<Arc<HideFn>>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("is_sortable", &self.is_sortable)
            .field("display", &self.display.is_some())
            .field("value", &self.value.is_some())
            .field("sorter", &self.sorter.is_some())
            .field("hide", &self.hide.is_some())
            .finish()
    }
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_sortable: true,
            display: None,
            value: None,
            sorter: None,
            hide: None,
        }
    }

    /// Render cells with `f`, called with the record as the cell source.
    #[must_use]
    pub fn display(
        mut self,
        f: impl Fn(&crate::types::CellContext<'_>) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        self.display = Some(CellRenderer::new(f));
        self
    }

    /// Derive the cell value from the record. Also used for sorting, as
    /// lowercased text, when the column has no sorter.
    #[must_use]
    pub fn value(mut self, f: impl Fn(&Record) -> CellValue + Send + Sync + 'static) -> Self {
        self.value = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn sorter(mut self, f: impl Fn(&Record, &Value) -> SortKey + Send + Sync + 'static) -> Self {
        self.sorter = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn hide_when(
        mut self,
        f: impl Fn(&[Record], &[Column], &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.hide = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn unsortable(mut self) -> Self {
        self.is_sortable = false;
        self
    }

    pub fn is_hidden(&self, records: &[Record], columns: &[Column], meta: &Value) -> bool {
        self.hide.as_ref().is_some_and(|hide| hide(records, columns, meta))
    }

    /// Sort key of `record` for this column.
    pub fn sort_key(&self, record: &Record, meta: &Value) -> SortKey {
        if let Some(sorter) = &self.sorter {
            return sorter(record, meta);
        }
        if let Some(value) = &self.value {
            return SortKey::Text(value(record).to_text().to_lowercase());
        }
        SortKey::from_value(record.get(&self.id))
    }

    /// Content of this column's cell for `record`.
    pub fn cell_content(&self, record: &Record) -> CellContent {
        if let Some(value) = &self.value {
            return CellContent::Static(value(record));
        }
        if let Some(display) = &self.display {
            return CellContent::Computed(display.clone());
        }
        match record.get(&self.id) {
            Some(field) => CellContent::Static(CellValue::from(field)),
            None => CellContent::default(),
        }
    }
}

/// Output of one sortable-grid build
#[derive(Debug, Clone)]
pub struct SortedGrid {
    /// Header row followed by the rows of the current page
    pub rows: Grid,
    /// Count of all records, not just the current page's
    pub total_count: usize,
    /// Present when paging is on and there is more than one page
    pub pager: Option<PagerState>,
    /// Sort actually applied, after falling back from a hidden column
    pub sort: SortState,
    pub sorting_suppressed: bool,
}

/// A table of records with a clickable, sortable header row
#[derive(Debug)]
pub struct SortableGrid {
    columns: Vec<Column>,
    key_field: Option<String>,
    sort: SortState,
    suppressed: bool,
    pager: Option<PagedData>,
    last_record_count: Option<usize>,
}

impl SortableGrid {
    /// Fails with [`GridError::NoColumns`] when `columns` is empty.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let first = columns.first().ok_or(GridError::NoColumns)?;
        let sort = SortState {
            column_id: first.id.clone(),
            direction: SortDirection::Asc,
        };
        Ok(Self {
            columns,
            key_field: None,
            sort,
            suppressed: false,
            pager: None,
            last_record_count: None,
        })
    }

    /// Take each row's id from this record field instead of the record index.
    #[must_use]
    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = Some(key_field.into());
        self
    }

    #[must_use]
    pub fn with_initial_sort(mut self, initial: InitialSort) -> Self {
        if let Some(column_id) = initial.column_id {
            self.sort.column_id = column_id;
        }
        self.sort.direction = initial.direction.unwrap_or_default();
        self.suppressed = initial.suppressed;
        self
    }

    /// Page the record rows, `page_size` per page. Without this every record
    /// gets a row.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pager = Some(PagedData::new().with_max_items_per_page(page_size));
        self
    }

    /// Turn paging back off and show every record.
    #[must_use]
    pub fn without_pager(mut self) -> Self {
        self.pager = None;
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn handle_sort_click(&mut self, column_id: &str) {
        self.sort.click(column_id);
    }

    /// Route a pager interaction, using the record count of the last build.
    pub fn handle_pager(&mut self, action: PagerAction) {
        if let (Some(pager), Some(count)) = (self.pager.as_mut(), self.last_record_count) {
            pager.handle(count, action);
        }
    }

    /// Columns whose hide predicate does not fire for these records.
    pub fn visible_columns(&self, records: &[Record], meta: &Value) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|column| !column.is_hidden(records, &self.columns, meta))
            .collect()
    }

    /// Sort records by `column` in `direction`, stably.
    pub fn sort_records<'a>(
        records: &'a [Record],
        column: &Column,
        direction: SortDirection,
        meta: &Value,
    ) -> Vec<&'a Record> {
        let mut keyed: Vec<(SortKey, &Record)> = records
            .iter()
            .map(|record| (column.sort_key(record, meta), record))
            .collect();
        match direction {
            SortDirection::Asc => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
            SortDirection::Desc => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
        }
        keyed.into_iter().map(|(_, record)| record).collect()
    }

    /// Build the header row and the current page of record rows.
    pub fn build(&mut self, records: &[Record], meta: &Value) -> Result<SortedGrid> {
        if self.last_record_count != Some(records.len()) {
            if let Some(pager) = self.pager.as_mut() {
                pager.set_current_index(0);
            }
            self.last_record_count = Some(records.len());
        }

        let all_columns = &self.columns;
        let visible: Vec<&Column> = all_columns
            .iter()
            .filter(|column| !column.is_hidden(records, all_columns, meta))
            .collect();
        let Some(first_visible) = visible.first() else {
            return Err(GridError::NoColumns);
        };

        let sort_column = match visible.iter().find(|c| c.id == self.sort.column_id) {
            Some(column) => *column,
            None => {
                log::debug!(
                    "sort column {:?} not visible, falling back to {:?}",
                    self.sort.column_id,
                    first_visible.id
                );
                self.sort.column_id = first_visible.id.clone();
                first_visible
            }
        };

        let ordered: Vec<&Record> = if self.suppressed {
            records.iter().collect()
        } else {
            Self::sort_records(records, sort_column, self.sort.direction, meta)
        };

        let (page, pager) = match &self.pager {
            Some(paged) => (paged.page_data(&ordered), paged.pager(ordered.len())),
            None => (ordered.as_slice(), None),
        };
        let offset = self
            .pager
            .as_ref()
            .map_or(0, |p| p.current_index().saturating_mul(p.max_items_per_page()));

        let mut rows = Vec::with_capacity(page.len() + 1);
        rows.push(self.header_row(&visible, records.len()));
        for (i, record) in page.iter().enumerate() {
            rows.push(self.record_row(record, offset + i, &visible));
        }

        Ok(SortedGrid {
            rows,
            total_count: records.len(),
            pager,
            sort: self.sort.clone(),
            sorting_suppressed: self.suppressed,
        })
    }

    fn header_row(&self, visible: &[&Column], record_count: usize) -> Row {
        let cells = visible
            .iter()
            .map(|column| {
                let active = !self.suppressed && column.id == self.sort.column_id;
                Cell::new(column.id.clone(), column.title.clone())
                    .with_role(HEADER_CELL_ROLE)
                    .with_source(json!({
                        "columnId": column.id,
                        "sortable": column.is_sortable && record_count > 1,
                        "active": active,
                        "direction": self.sort.direction.as_str(),
                    }))
            })
            .collect();
        Row::new(HEADER_ROW_ID, cells).with_wrapper(HEADER_ROW_ID)
    }

    fn record_row(&self, record: &Record, index: usize, visible: &[&Column]) -> Row {
        let id = self
            .key_field
            .as_deref()
            .and_then(|key| field_text(record, key))
            .unwrap_or_else(|| index.to_string());
        let source = Value::Object(record.clone());
        let cells = visible
            .iter()
            .map(|column| {
                Cell::new(column.id.clone(), column.cell_content(record))
                    .with_source(source.clone())
            })
            .collect();
        Row::new(id, cells)
    }
}
