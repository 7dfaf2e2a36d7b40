//! Grouping sequencing files by run, flowcell, and lane.

use indexmap::IndexMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::types::{field_text, value_to_text, Record};

pub const SEQUENCING_RUN_FIELD: &str = "sequencing_run";
pub const FLOWCELL_FIELD: &str = "flowcell_id";
pub const LANE_FIELD: &str = "lane";
pub const READ_TYPE_FIELD: &str = "illumina_read_type";

/// Stands in for a missing flowcell or lane; sorts after digits and uppercase ids
pub const MISSING_KEY_PART: &str = "z";

/// Files keyed by group, in key order
pub type FileGroups = IndexMap<String, Vec<Record>>;

/// Group key of a file, or `None` when it has no sequencing run.
///
/// Keys look like `S1-HXYZ-L2`; a missing flowcell or lane becomes `z`.
pub fn group_key(file: &Record) -> Option<String> {
    let run = match file.get(SEQUENCING_RUN_FIELD) {
        None | Some(serde_json::Value::Null) => return None,
        Some(run) => value_to_text(run),
    };
    let flowcell = field_text(file, FLOWCELL_FIELD);
    let lane = field_text(file, LANE_FIELD);
    Some(format!(
        "S{run}-{}-L{}",
        flowcell.as_deref().unwrap_or(MISSING_KEY_PART),
        lane.as_deref().unwrap_or(MISSING_KEY_PART),
    ))
}

/// Group files by `(run, flowcell, lane)`.
///
/// Files without a sequencing run are left out. Groups come in ascending key
/// order; files within a group by read type, files without one last.
pub fn generate_file_groups(files: &[Record]) -> FileGroups {
    let mut groups = FileGroups::new();
    for file in files {
        match group_key(file) {
            Some(key) => groups.entry(key).or_default().push(file.clone()),
            None => log::debug!(
                "skipping file {:?} without a sequencing run",
                field_text(file, crate::types::ID_FIELD).unwrap_or_default()
            ),
        }
    }

    groups.sort_keys();
    for files in groups.values_mut() {
        files.sort_by_cached_key(|file| {
            let read_type = field_text(file, READ_TYPE_FIELD);
            (read_type.is_none(), read_type)
        });
    }
    groups
}

/// Split groups into pages without ever splitting a group.
///
/// Groups accumulate onto a page until its file count reaches `page_size`;
/// the next group starts a new page. A trailing partial page is kept.
pub fn paginate_file_groups(groups: &FileGroups, page_size: usize) -> Vec<FileGroups> {
    let mut pages = Vec::new();
    let mut page = FileGroups::new();
    let mut count = 0;
    for (key, files) in groups {
        page.insert(key.clone(), files.clone());
        count += files.len();
        if count >= page_size {
            pages.push(std::mem::take(&mut page));
            count = 0;
        }
    }
    if !page.is_empty() {
        pages.push(page);
    }
    pages
}

/// Hash of the ordered group keys and page size, identifying a pagination.
pub fn pagination_key(groups: &FileGroups, page_size: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    for key in groups.keys() {
        key.hash(&mut hasher);
    }
    page_size.hash(&mut hasher);
    hasher.finish()
}

/// Number of files across all groups.
pub fn grouped_file_count(groups: &FileGroups) -> usize {
    groups.values().map(Vec::len).sum()
}
