//! Grid for the sequencing-file table.
//!
//! Files of one run/flowcell/lane group stay together on a page, and every
//! other group is shaded through the row wrapper.

use serde_json::Value;
use std::sync::Arc;

use crate::error::Result;
use crate::files::grouping::{generate_file_groups, grouped_file_count, FileGroups};
use crate::files::paginator::GroupPaginator;
use crate::pager::{PagerAction, PagerState};
use crate::types::{field_text, Cell, CellContext, CellValue, Grid, Record, Row, ID_FIELD};

/// Files per page of the sequencing-file table
pub const SEQUENCING_FILES_PER_PAGE: usize = 10;

/// Wrapper shading rows of every other group
pub const ALTERNATE_ROW_WRAPPER: &str = "alternate";

const HEADER_WRAPPER: &str = "header";
const READ_TYPE_COLUMN: &str = "illumina-read-type";
const TILE_COLUMN: &str = "tile";

/// A column of the sequencing-file table and the file property it shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencingColumn {
    pub id: &'static str,
    pub title: &'static str,
    pub field: &'static str,
}

pub const SEQUENCING_FILE_COLUMNS: &[SequencingColumn] = &[
    SequencingColumn { id: "accession", title: "Accession", field: "accession" },
    SequencingColumn { id: "content-type", title: "Content Type", field: "content_type" },
    SequencingColumn { id: "file-format", title: "File Format", field: "file_format" },
    SequencingColumn { id: "sequencing-run", title: "Sequencing Run", field: "sequencing_run" },
    SequencingColumn { id: "flowcell-id", title: "Flowcell ID", field: "flowcell_id" },
    SequencingColumn { id: "lane", title: "Lane", field: "lane" },
    SequencingColumn {
        id: READ_TYPE_COLUMN,
        title: "Illumina Read Type",
        field: "illumina_read_type",
    },
    SequencingColumn { id: "index", title: "Index", field: "index" },
    SequencingColumn {
        id: "sequencing_platform",
        title: "Sequencing Platform",
        field: "sequencing_platform",
    },
    SequencingColumn { id: TILE_COLUMN, title: "Tile", field: "tile" },
    SequencingColumn { id: "file-size", title: "File Size", field: "file_size" },
    SequencingColumn { id: "lab", title: "Lab", field: "lab" },
    SequencingColumn { id: "upload-status", title: "Upload Status", field: "upload_status" },
];

/// Display value of a file property; embedded objects show their title or term name.
fn display_property(value: Option<&Value>) -> CellValue {
    match value {
        Some(Value::Object(object)) => ["title", "term_name", ID_FIELD]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .map_or(CellValue::Empty, CellValue::from),
        Some(other) => CellValue::from(other),
        None => CellValue::Empty,
    }
}

impl SequencingColumn {
    /// Template cell rendering this column's property from the row's file.
    pub fn template_cell(&self) -> Cell {
        let field = self.field;
        Cell::computed(self.id, move |ctx: &CellContext<'_>| {
            display_property(ctx.source.and_then(|file| file.get(field)))
        })
    }
}

/// One row per file, template cells bound to the file.
///
/// Row ids are the file `@id`s. Rows of odd-numbered groups get
/// `alternate_wrapper`.
pub fn file_groups_to_grid(groups: &FileGroups, template: &[Cell], alternate_wrapper: &str) -> Grid {
    let mut rows = Vec::with_capacity(groups.values().map(Vec::len).sum());
    for (group_index, (key, files)) in groups.iter().enumerate() {
        for (file_index, file) in files.iter().enumerate() {
            let id = field_text(file, ID_FIELD).unwrap_or_else(|| format!("{key}-{file_index}"));
            let source = Value::Object(file.clone());
            let cells = template
                .iter()
                .map(|cell| cell.clone().with_source(source.clone()))
                .collect();
            let row = Row::new(id, cells);
            rows.push(if group_index % 2 == 1 {
                row.with_wrapper(alternate_wrapper)
            } else {
                row
            });
        }
    }
    rows
}

/// Paged, grouped table of sequencing files
#[derive(Debug)]
pub struct SequencingFileTable {
    groups: FileGroups,
    pages: Arc<Vec<FileGroups>>,
    page_index: usize,
    show_read_type: bool,
    show_tile: bool,
}

impl SequencingFileTable {
    /// Group and paginate `files`. The read-type column only shows for
    /// Illumina read-type tables; the tile column only when some file has a tile.
    pub fn new(files: &[Record], is_illumina_read_type: bool, paginator: &mut GroupPaginator) -> Self {
        let groups = generate_file_groups(files);
        let pages = paginator.paginate(&groups, SEQUENCING_FILES_PER_PAGE);
        Self {
            groups,
            pages,
            page_index: 0,
            show_read_type: is_illumina_read_type,
            show_tile: files.iter().any(|file| file.contains_key("tile")),
        }
    }

    pub fn groups(&self) -> &FileGroups {
        &self.groups
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Files that made it into a group; files without a run are not counted.
    pub fn total_file_count(&self) -> usize {
        grouped_file_count(&self.groups)
    }

    pub fn visible_columns(&self) -> Vec<&'static SequencingColumn> {
        SEQUENCING_FILE_COLUMNS
            .iter()
            .filter(|column| match column.id {
                READ_TYPE_COLUMN => self.show_read_type,
                TILE_COLUMN => self.show_tile,
                _ => true,
            })
            .collect()
    }

    pub fn header_row(&self) -> Row {
        let cells = self
            .visible_columns()
            .iter()
            .map(|column| Cell::new(column.id, column.title).with_role("columnheader"))
            .collect();
        Row::new("header", cells).with_wrapper(HEADER_WRAPPER)
    }

    /// Header row followed by the current page's file rows.
    pub fn page_grid(&self) -> Grid {
        let template: Vec<Cell> = self
            .visible_columns()
            .iter()
            .map(|column| column.template_cell())
            .collect();
        let mut grid = vec![self.header_row()];
        if let Some(page) = self.pages.get(self.page_index) {
            grid.extend(file_groups_to_grid(page, &template, ALTERNATE_ROW_WRAPPER));
        }
        grid
    }

    /// Pager for the table, when there is more than one page.
    pub fn pager(&self) -> Result<Option<PagerState>> {
        if self.pages.len() <= 1 {
            return Ok(None);
        }
        let total = u32::try_from(self.pages.len()).unwrap_or(u32::MAX);
        let current = u32::try_from(self.page_index + 1).unwrap_or(u32::MAX);
        PagerState::new(current, total).map(Some)
    }

    pub fn handle(&mut self, action: PagerAction) -> Result<()> {
        if let Some(page) = self.pager()?.and_then(|pager| pager.click(action)) {
            self.page_index = usize::try_from(page).unwrap_or(1).saturating_sub(1);
        }
        Ok(())
    }
}
