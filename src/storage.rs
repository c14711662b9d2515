/// Key-value storage contract and the key-prefix convention used on top of it
use crate::error::StorageError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub const EVENT_PREFIX: &str = "T_";
pub const VIDEO_PREFIX: &str = "V_";

/// What a persisted key refers to
#[derive(Debug, Clone, PartialEq)]
pub enum StorageKey<'a> {
    Event,
    Video(&'a str),
}

impl<'a> StorageKey<'a> {
    /// Classify a raw key; unrecognised prefixes yield `None`
    pub fn parse(key: &'a str) -> Option<StorageKey<'a>> {
        if key.starts_with(EVENT_PREFIX) {
            Some(StorageKey::Event)
        } else {
            key.strip_prefix(VIDEO_PREFIX).map(StorageKey::Video)
        }
    }
}

/// `T_<ISO-8601>`; two events in the same millisecond share a key
pub fn event_key(ts: &DateTime<Utc>) -> String {
    format!("{}{}", EVENT_PREFIX, crate::reaction_data::timestamp::format(ts))
}

pub fn video_key(video: &str) -> String {
    format!("{}{}", VIDEO_PREFIX, video)
}

/// The local store the extension persists into.
///
/// Entries come back in the backend's key order, which is what "storage order" means
/// for `EventStore::video_detail`.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get_all_keys(&self) -> Result<Vec<String>, StorageError>;

    async fn get_by_keys(&self, keys: &[String]) -> Result<Vec<(String, Value)>, StorageError>;

    async fn set_entries(&self, entries: Vec<(String, Value)>) -> Result<(), StorageError>;

    async fn clear_all(&self) -> Result<(), StorageError>;
}

/// In-memory backend, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        MemoryStore {
            entries: Rc::new(RefCell::new(entries.into_iter().collect())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get_all_keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }

    async fn get_by_keys(&self, keys: &[String]) -> Result<Vec<(String, Value)>, StorageError> {
        let entries = self.entries.borrow();
        let mut found: Vec<(String, Value)> = keys
            .iter()
            .filter_map(|key| entries.get(key).map(|value| (key.clone(), value.clone())))
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(found)
    }

    async fn set_entries(&self, entries: Vec<(String, Value)>) -> Result<(), StorageError> {
        self.entries.borrow_mut().extend(entries);
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        self.entries.borrow_mut().clear();
        Ok(())
    }
}
