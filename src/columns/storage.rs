//! Persisted hidden-column sets, one per collection type.

use indexmap::IndexMap;

use crate::columns::TableColumn;
use crate::error::Result;
use crate::types::ID_FIELD;

/// Prefix of the storage key; the collection type follows it
pub const STORAGE_KEY_PREFIX: &str = "hidden-columns-";

/// Minimal string key-value store, such as browser local storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store for native use and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: IndexMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn storage_key(collection_type: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}{collection_type}")
}

/// Stored hidden column ids for `collection_type`.
///
/// `None` when nothing is stored. Malformed stored JSON counts as nothing stored.
pub fn load_stored_hidden_columns<S: KeyValueStore + ?Sized>(
    store: &S,
    collection_type: &str,
) -> Option<Vec<String>> {
    let key = storage_key(collection_type);
    let raw = store.get(&key).filter(|raw| !raw.is_empty())?;
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(ids) => Some(ids),
        Err(err) => {
            log::warn!("ignoring malformed hidden columns under {key:?}: {err}");
            None
        }
    }
}

pub fn save_stored_hidden_columns<S: KeyValueStore + ?Sized>(
    store: &mut S,
    collection_type: &str,
    hidden: &[String],
) -> Result<()> {
    let json = serde_json::to_string(hidden)?;
    store.set(&storage_key(collection_type), &json)
}

/// Stored hidden ids that still name a current column other than `@id`.
///
/// When any stored id gets dropped, the cleaned list is written back.
pub fn load_validated_hidden_columns<S, C>(
    store: &mut S,
    collection_type: &str,
    columns: &[C],
) -> Result<Option<Vec<String>>>
where
    S: KeyValueStore + ?Sized,
    C: TableColumn,
{
    let Some(stored) = load_stored_hidden_columns(store, collection_type) else {
        return Ok(None);
    };
    let valid: Vec<String> = stored
        .iter()
        .filter(|id| id.as_str() != ID_FIELD && columns.iter().any(|c| c.id() == id.as_str()))
        .cloned()
        .collect();
    if valid.len() != stored.len() {
        log::debug!(
            "dropping {} stale hidden column(s) for {collection_type:?}",
            stored.len() - valid.len()
        );
        save_stored_hidden_columns(store, collection_type, &valid)?;
    }
    Ok(Some(valid))
}
