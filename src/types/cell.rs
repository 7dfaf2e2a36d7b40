use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Default ARIA role for a grid cell
pub const DEFAULT_CELL_ROLE: &str = "cell";

/// A static, already-resolved cell value
///
/// Serializes untagged so JavaScript sees plain `null`, strings, numbers, or JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Json(Value),
}

impl CellValue {
    /// Plain-text form: empty for `Empty`, the string itself for `Text`,
    /// shortest round-trip form for numbers, JSON for everything else.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Json(v) => v.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Number(n) => n
                .as_f64()
                .map_or_else(|| CellValue::Json(value.clone()), CellValue::Number),
            other => CellValue::Json(other.clone()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Arguments handed to a computed cell's renderer
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    /// Id of the cell being rendered
    pub id: &'a str,
    /// Per-cell source data, usually the record the row came from
    pub source: Option<&'a Value>,
    /// Grid-wide metadata, identical for every cell of one layout pass
    pub meta: &'a Value,
}

type RenderFn = dyn Fn(&CellContext<'_>) -> CellValue + Send + Sync;

/// A pure function producing a cell's content from its context
#[derive(Clone)]
pub struct CellRenderer(Arc<RenderFn>);

impl CellRenderer {
    pub fn new(f: impl Fn(&CellContext<'_>) -> CellValue + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn render(&self, ctx: &CellContext<'_>) -> CellValue {
        (self.0)(ctx)
    }
}

impl fmt::Debug for CellRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CellRenderer(..)")
    }
}

/// Content of a cell: either a value known up front or one computed at layout time
#[derive(Debug, Clone)]
pub enum CellContent {
    Static(CellValue),
    Computed(CellRenderer),
}

impl Default for CellContent {
    fn default() -> Self {
        CellContent::Static(CellValue::Empty)
    }
}

impl CellContent {
    /// Resolve to a value. Static content ignores the context.
    pub fn resolve(&self, ctx: &CellContext<'_>) -> CellValue {
        match self {
            CellContent::Static(value) => value.clone(),
            CellContent::Computed(renderer) => renderer.render(ctx),
        }
    }
}

impl From<CellValue> for CellContent {
    fn from(value: CellValue) -> Self {
        CellContent::Static(value)
    }
}

impl From<&str> for CellContent {
    fn from(s: &str) -> Self {
        CellContent::Static(s.into())
    }
}

impl From<String> for CellContent {
    fn from(s: String) -> Self {
        CellContent::Static(s.into())
    }
}

impl From<f64> for CellContent {
    fn from(n: f64) -> Self {
        CellContent::Static(n.into())
    }
}

// Only static content can come from JSON.
impl<'de> Deserialize<'de> for CellContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        CellValue::deserialize(deserializer).map(CellContent::Static)
    }
}

fn default_span() -> u32 {
    1
}

fn default_role() -> String {
    DEFAULT_CELL_ROLE.to_string()
}

/// One cell of a grid row
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Unique within the owning row
    pub id: String,
    #[serde(default)]
    pub content: CellContent,
    /// Number of columns spanned; 0 is treated as 1
    #[serde(default = "default_span", alias = "columns")]
    pub column_span: u32,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub source: Option<Value>,
    /// Render the content bare, without the row's cell wrapper
    #[serde(default, alias = "noWrapper")]
    pub no_wrapper: bool,
}

impl Cell {
    pub fn new(id: impl Into<String>, content: impl Into<CellContent>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            column_span: 1,
            role: default_role(),
            source: None,
            no_wrapper: false,
        }
    }

    /// Cell whose content is computed from `(id, source, meta)` at layout time.
    pub fn computed(
        id: impl Into<String>,
        f: impl Fn(&CellContext<'_>) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self::new(id, CellContent::Computed(CellRenderer::new(f)))
    }

    #[must_use]
    pub fn with_span(mut self, span: u32) -> Self {
        self.column_span = span;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn without_wrapper(mut self) -> Self {
        self.no_wrapper = true;
        self
    }

    /// Effective column span, never less than 1.
    pub fn span(&self) -> u32 {
        self.column_span.max(1)
    }
}

/// One row of a grid, optionally with child rows laid out to its right
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Unique within its grid level
    pub id: String,
    #[serde(default)]
    pub cells: Vec<Cell>,
    /// Sub-rows sharing this row's cells through a vertical span
    #[serde(default)]
    pub children: Vec<Row>,
    /// Name of a row wrapper overriding the default cell wrapper (e.g. "header")
    #[serde(default)]
    pub wrapper: Option<String>,
}

impl Row {
    pub fn new(id: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            id: id.into(),
            cells,
            children: Vec::new(),
            wrapper: None,
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Row>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn with_wrapper(mut self, wrapper: impl Into<String>) -> Self {
        self.wrapper = Some(wrapper.into());
        self
    }

    /// Number of grid rows this row's cells span vertically.
    pub fn row_span(&self) -> u32 {
        u32::try_from(self.children.len()).unwrap_or(u32::MAX).max(1)
    }

    /// Number of grid columns taken by this row's own cells.
    pub fn width(&self) -> u32 {
        self.cells.iter().map(Cell::span).sum()
    }
}

/// A whole grid, interpreted top to bottom
pub type Grid = Vec<Row>;
