/// `chrome.storage.local` backend

use crate::error::StorageError;
use crate::storage::KeyValueStore;
use serde_json::Value;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/storage.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getAllKeys() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getByKeys(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setEntries(entries: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn clearAll() -> Result<(), JsValue>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChromeStorage;

fn backend_error(op: &str, err: JsValue) -> StorageError {
    StorageError::Backend(format!("{} failed: {:?}", op, err))
}

impl KeyValueStore for ChromeStorage {
    async fn get_all_keys(&self) -> Result<Vec<String>, StorageError> {
        let keys_js = getAllKeys()
            .await
            .map_err(|e| backend_error("getAllKeys", e))?;

        Ok(serde_wasm_bindgen::from_value(keys_js)?)
    }

    async fn get_by_keys(&self, keys: &[String]) -> Result<Vec<(String, Value)>, StorageError> {
        let keys_js = serde_wasm_bindgen::to_value(keys)?;
        let values_js = getByKeys(keys_js)
            .await
            .map_err(|e| backend_error("getByKeys", e))?;

        if values_js.is_null() || values_js.is_undefined() {
            return Ok(Vec::new());
        }

        let values: BTreeMap<String, Value> = serde_wasm_bindgen::from_value(values_js)?;
        Ok(values.into_iter().collect())
    }

    async fn set_entries(&self, entries: Vec<(String, Value)>) -> Result<(), StorageError> {
        let object: serde_json::Map<String, Value> = entries.into_iter().collect();
        // Plain JS objects, not Maps, so chrome.storage can persist them
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let entries_js = serde::Serialize::serialize(&object, &serializer)?;

        setEntries(entries_js)
            .await
            .map_err(|e| backend_error("setEntries", e))
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        clearAll().await.map_err(|e| backend_error("clearAll", e))
    }
}
