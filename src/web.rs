//! Browser adapters: `localStorage` as a key-value store and the page location.

use crate::columns::KeyValueStore;
use crate::error::{GridError, Result};

fn js_error(err: &wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| GridError::Storage("no window".to_string()))
}

/// The browser's `localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let storage = window()?
            .local_storage()
            .map_err(|e| GridError::Storage(js_error(&e)))?
            .ok_or_else(|| GridError::Storage("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("localStorage read of {key:?} failed: {}", js_error(&e));
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| GridError::Storage(js_error(&e)))
    }
}

/// Full URL of the current page.
pub fn current_location() -> Result<String> {
    window()?
        .location()
        .href()
        .map_err(|e| GridError::InvalidInput(js_error(&e)))
}
