//! Grouped pagination for sequencing-file tables.
//!
//! Files sharing a sequencing run, flowcell, and lane form a group. Pages hold
//! whole groups, so a page can exceed its nominal size rather than split one.

mod cache;
mod grouping;
mod paginator;
mod table;

pub use cache::{LruCache, DEFAULT_CACHE_CAPACITY};
pub use grouping::{
    generate_file_groups, group_key, grouped_file_count, paginate_file_groups, pagination_key,
    FileGroups, FLOWCELL_FIELD, LANE_FIELD, MISSING_KEY_PART, READ_TYPE_FIELD,
    SEQUENCING_RUN_FIELD,
};
pub use paginator::GroupPaginator;
pub use table::{
    file_groups_to_grid, SequencingColumn, SequencingFileTable, ALTERNATE_ROW_WRAPPER,
    SEQUENCING_FILES_PER_PAGE, SEQUENCING_FILE_COLUMNS,
};
