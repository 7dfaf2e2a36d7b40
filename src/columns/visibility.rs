use serde::Serialize;

use crate::columns::{
    clear_hidden_columns_from_url, extract_hidden_column_ids, filter_hidden_columns,
    generate_hidden_columns_url, load_validated_hidden_columns, save_stored_hidden_columns,
    sort_columns_for_display, KeyValueStore, TableColumn,
};
use crate::error::Result;
use crate::types::ID_FIELD;

/// Where the current hidden-column set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HiddenSource {
    /// A `#hidden=` fragment; storage is left alone until the user saves it
    Url,
    Storage,
    /// Nothing stored and no fragment
    Default,
}

/// Hidden-column state of one collection table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnVisibility {
    collection_type: String,
    column_ids: Vec<String>,
    hidden: Vec<String>,
    source: HiddenSource,
}

impl ColumnVisibility {
    /// Resolve the hidden set: the URL fragment if `url` has one, else the
    /// validated stored set, else nothing hidden.
    pub fn load<S, C>(
        store: &mut S,
        collection_type: &str,
        columns: &[C],
        url: Option<&str>,
    ) -> Result<Self>
    where
        S: KeyValueStore + ?Sized,
        C: TableColumn,
    {
        let column_ids = columns.iter().map(|c| c.id().to_string()).collect();
        if let Some(hidden) = url.and_then(extract_hidden_column_ids) {
            return Ok(Self {
                collection_type: collection_type.to_string(),
                column_ids,
                hidden,
                source: HiddenSource::Url,
            });
        }

        let stored = load_validated_hidden_columns(store, collection_type, columns)?;
        let (hidden, source) = match stored {
            Some(hidden) => (hidden, HiddenSource::Storage),
            None => (Vec::new(), HiddenSource::Default),
        };
        Ok(Self {
            collection_type: collection_type.to_string(),
            column_ids,
            hidden,
            source,
        })
    }

    pub fn collection_type(&self) -> &str {
        &self.collection_type
    }

    pub fn hidden(&self) -> &[String] {
        &self.hidden
    }

    pub fn source(&self) -> HiddenSource {
        self.source
    }

    pub fn is_hidden(&self, column_id: &str) -> bool {
        self.hidden.iter().any(|id| id == column_id)
    }

    pub fn is_any_hidden(&self) -> bool {
        !self.hidden.is_empty()
    }

    /// Hide or show one column.
    ///
    /// A URL-sourced set stays in the URL: the returned URL carries the new
    /// fragment and storage is untouched. Otherwise the set is persisted and
    /// `None` returned.
    pub fn set_hidden<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        column_id: &str,
        hidden: bool,
        current_url: &str,
    ) -> Result<Option<String>> {
        if hidden {
            if !self.is_hidden(column_id) {
                self.hidden.push(column_id.to_string());
            }
        } else {
            self.hidden.retain(|id| id != column_id);
        }

        if self.source == HiddenSource::Url {
            return generate_hidden_columns_url(current_url, &self.hidden).map(Some);
        }
        self.persist(store)?;
        Ok(None)
    }

    /// Hide every column except `@id`, or show them all.
    pub fn set_all_hidden<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        hidden: bool,
    ) -> Result<()> {
        self.hidden = if hidden {
            self.column_ids
                .iter()
                .filter(|id| id.as_str() != ID_FIELD)
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        self.persist(store)
    }

    /// Persist the URL's hidden set and return the URL to navigate to,
    /// without its fragment.
    pub fn save_url_columns<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        current_url: &str,
    ) -> Result<String> {
        self.persist(store)?;
        clear_hidden_columns_from_url(current_url)
    }

    /// Drop the URL's hidden set in favour of the stored one, returning the
    /// URL without its fragment.
    pub fn clear_url_columns<S, C>(
        &mut self,
        store: &mut S,
        columns: &[C],
        current_url: &str,
    ) -> Result<String>
    where
        S: KeyValueStore + ?Sized,
        C: TableColumn,
    {
        let collection_type = self.collection_type.clone();
        *self = Self::load(store, &collection_type, columns, None)?;
        clear_hidden_columns_from_url(current_url)
    }

    /// URL reproducing the current hidden set, for sharing.
    pub fn shareable_url(&self, current_url: &str) -> Result<String> {
        generate_hidden_columns_url(current_url, &self.hidden)
    }

    /// Columns to show, `@id` first and the rest by title.
    pub fn visible_columns<'a, C: TableColumn>(&self, columns: &'a [C]) -> Vec<&'a C> {
        sort_columns_for_display(filter_hidden_columns(columns, &self.hidden))
    }

    fn persist<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        save_stored_hidden_columns(store, &self.collection_type, &self.hidden)?;
        self.source = HiddenSource::Storage;
        Ok(())
    }
}
