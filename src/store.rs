/// In-memory snapshot of everything persisted, and the store object that owns it

use crate::aggregate::{self, Aggregation, TimeWindow};
use crate::config::{KindPolicy, ViewerConfig};
use crate::error::StorageError;
use crate::operations;
use crate::reaction_data::{ReactionEvent, ReactionKinds, VideoDetail, VideoMeta};
use crate::storage::{KeyValueStore, StorageKey};
use serde_json::Value;
use std::collections::HashMap;

/// Events and video metadata partitioned by key prefix
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub events: Vec<ReactionEvent>,
    pub videos: HashMap<String, VideoMeta>,
    pub kinds: ReactionKinds,
}

impl Snapshot {
    pub fn empty(config: &ViewerConfig) -> Snapshot {
        Snapshot {
            events: Vec::new(),
            videos: HashMap::new(),
            kinds: ReactionKinds::seeded(&config.seed_reactions),
        }
    }

    /// Partition raw entries: `T_` keys are events, `V_` keys are video metadata,
    /// anything else is ignored. Values that don't decode are skipped.
    pub fn from_entries<I>(entries: I, config: &ViewerConfig) -> Snapshot
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut snapshot = Snapshot::empty(config);

        for (key, value) in entries {
            match StorageKey::parse(&key) {
                Some(StorageKey::Event) => match serde_json::from_value::<ReactionEvent>(value) {
                    Ok(event) => {
                        if config.kind_policy == KindPolicy::Discovered {
                            snapshot.kinds.insert(&event.reaction);
                        }
                        snapshot.events.push(event);
                    }
                    Err(e) => log::warn!("skipping malformed event {}: {}", key, e),
                },
                Some(StorageKey::Video(video)) => match serde_json::from_value::<VideoMeta>(value) {
                    Ok(meta) => {
                        snapshot.videos.insert(video.to_string(), meta);
                    }
                    Err(e) => log::warn!("skipping malformed video {}: {}", key, e),
                },
                None => {}
            }
        }

        snapshot
    }
}

/// Read every key and value from the backend and partition them
pub async fn load<S: KeyValueStore>(backend: &S, config: &ViewerConfig) -> Result<Snapshot, StorageError> {
    let keys = backend.get_all_keys().await?;
    let entries = backend.get_by_keys(&keys).await?;
    let snapshot = Snapshot::from_entries(entries, config);

    log::info!(
        "loaded {} events, {} videos, {} reaction kinds",
        snapshot.events.len(),
        snapshot.videos.len(),
        snapshot.kinds.len()
    );

    Ok(snapshot)
}

/// A backend plus the snapshot read from it.
///
/// The snapshot only changes on `reload` (full replace) and `clear` (full reset).
/// `record` writes through to the backend without touching it.
#[derive(Debug, Clone)]
pub struct EventStore<S> {
    backend: S,
    config: ViewerConfig,
    snapshot: Snapshot,
}

impl<S: KeyValueStore> EventStore<S> {
    /// Construct and load in one step
    pub async fn open(backend: S, config: ViewerConfig) -> Result<EventStore<S>, StorageError> {
        let snapshot = load(&backend, &config).await?;
        Ok(EventStore {
            backend,
            config,
            snapshot,
        })
    }

    pub async fn reload(&mut self) -> Result<(), StorageError> {
        self.snapshot = load(&self.backend, &self.config).await?;
        Ok(())
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn aggregate(&self, window: TimeWindow) -> Aggregation {
        aggregate::aggregate(&self.snapshot, window)
    }

    pub fn video_detail(&self, video: Option<&str>) -> VideoDetail {
        aggregate::video_detail(&self.snapshot, video)
    }

    /// Persist one event; call `reload` to see it in `aggregate`
    pub async fn record(&self, event: &ReactionEvent, meta: &VideoMeta) -> Result<(), StorageError> {
        operations::record(&self.backend, event, meta).await
    }

    /// Wipe the whole backend. The snapshot is reset even if the wipe fails.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        let result = self.backend.clear_all().await;
        self.snapshot = Snapshot::empty(&self.config);
        if let Err(e) = &result {
            log::error!("clear failed: {}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};
    use futures::executor::block_on;
    use serde_json::json;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        async fn get_all_keys(&self) -> Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }

        async fn get_by_keys(&self, _keys: &[String]) -> Result<Vec<(String, Value)>, StorageError> {
            Ok(Vec::new())
        }

        async fn set_entries(&self, _entries: Vec<(String, Value)>) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }

        async fn clear_all(&self) -> Result<(), StorageError> {
            Err(StorageError::Backend("unavailable".to_string()))
        }
    }

    fn create_test_backend() -> MemoryStore {
        MemoryStore::with_entries([
            (
                "T_2024-01-01T00:00:00.000Z".to_string(),
                json!({"reaction": "❤", "video": "abc12345678", "ts": "2024-01-01T00:00:00.000Z"}),
            ),
            (
                "T_2024-01-01T00:00:01.000Z".to_string(),
                json!({"reaction": "👏", "video": "abc12345678", "ts": "2024-01-01T00:00:01.000Z"}),
            ),
            ("V_abc12345678".to_string(), json!({"channel": "Ch", "title": "Ti"})),
            ("unrelated".to_string(), json!({"reaction": "❤", "ts": "2024-01-01T00:00:00.000Z"})),
        ])
    }

    #[test]
    fn test_partition_by_prefix() {
        let snapshot = block_on(load(&create_test_backend(), &ViewerConfig::default())).unwrap();

        assert_eq!(snapshot.events.len(), 2);
        assert_eq!(snapshot.videos.len(), 1);
        assert_eq!(snapshot.videos["abc12345678"].channel, "Ch");
        assert!(snapshot.events.iter().all(|e| e.video.as_deref() == Some("abc12345678")));
    }

    #[test]
    fn test_discovered_kinds_follow_seeds() {
        let snapshot = block_on(load(&create_test_backend(), &ViewerConfig::default())).unwrap();

        let kinds: Vec<&str> = snapshot.kinds.iter().collect();
        assert_eq!(kinds, vec!["❤", "😄", "🎉", "😳", "💯", "👏"]);
    }

    #[test]
    fn test_fixed_kinds_ignore_data() {
        let config = ViewerConfig {
            kind_policy: KindPolicy::Fixed,
            ..ViewerConfig::default()
        };

        let snapshot = block_on(load(&create_test_backend(), &config)).unwrap();

        assert_eq!(snapshot.kinds.len(), 5);
        assert!(!snapshot.kinds.contains("👏"));
        assert_eq!(snapshot.events.len(), 2);
    }

    #[test]
    fn test_malformed_values_are_skipped() {
        let entries = vec![
            ("T_bad".to_string(), json!({"reaction": "❤"})),
            ("V_bad".to_string(), json!("not an object")),
            (
                "T_2024-01-01T00:00:00.000Z".to_string(),
                json!({"reaction": "❤", "ts": "2024-01-01T00:00:00.000Z"}),
            ),
        ];

        let snapshot = Snapshot::from_entries(entries, &ViewerConfig::default());

        assert_eq!(snapshot.events.len(), 1);
        assert_eq!(snapshot.events[0].video, None);
        assert!(snapshot.videos.is_empty());
    }

    #[test]
    fn test_record_then_reload() {
        let backend = MemoryStore::new();
        let mut store = block_on(EventStore::open(backend, ViewerConfig::default())).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let event = ReactionEvent::new("🎉", Some("xyz98765432"), ts);
        let meta = VideoMeta {
            channel: "Chan".to_string(),
            title: "Title".to_string(),
        };

        block_on(store.record(&event, &meta)).unwrap();
        assert!(store.snapshot().events.is_empty());

        block_on(store.reload()).unwrap();

        let aggregation = store.aggregate(TimeWindow::all());
        assert_eq!(aggregation.rows.len(), 1);
        assert_eq!(aggregation.rows[0].count("🎉"), 1);

        let detail = store.video_detail(Some("xyz98765432"));
        assert_eq!(detail.title.as_deref(), Some("Title"));
        assert_eq!(detail.details, vec![event]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let backend = create_test_backend();
        let mut store = block_on(EventStore::open(backend.clone(), ViewerConfig::default())).unwrap();

        block_on(store.clear()).unwrap();
        assert!(backend.is_empty());
        assert!(store.snapshot().events.is_empty());
        assert!(store.snapshot().videos.is_empty());
        assert_eq!(store.snapshot().kinds.len(), 5);

        block_on(store.clear()).unwrap();
        assert!(backend.is_empty());
        assert!(store.aggregate(TimeWindow::all()).rows.is_empty());
    }

    #[test]
    fn test_clear_resets_memory_even_on_failure() {
        let mut store = EventStore {
            backend: FailingStore,
            config: ViewerConfig::default(),
            snapshot: block_on(load(&create_test_backend(), &ViewerConfig::default())).unwrap(),
        };
        assert_eq!(store.snapshot().events.len(), 2);

        let result = block_on(store.clear());

        assert_eq!(result, Err(StorageError::Backend("unavailable".to_string())));
        assert!(store.snapshot().events.is_empty());
    }

    #[test]
    fn test_record_failure_propagates() {
        let store = block_on(EventStore::open(FailingStore, ViewerConfig::default())).unwrap();
        let event = ReactionEvent::new("❤", Some("v"), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let result = block_on(store.record(&event, &VideoMeta::default()));

        assert!(matches!(result, Err(StorageError::Backend(_))));
    }
}
