/// Write operations against the backend

use crate::error::StorageError;
use crate::reaction_data::{ReactionEvent, VideoMeta};
use crate::storage::{event_key, video_key, KeyValueStore};

/// Write the event under its timestamp key and overwrite the video's metadata.
///
/// Events without a video id are written alone. A second event in the same
/// millisecond replaces the first.
pub async fn record<S: KeyValueStore>(
    backend: &S,
    event: &ReactionEvent,
    meta: &VideoMeta,
) -> Result<(), StorageError> {
    let mut entries = vec![(event_key(&event.ts), serde_json::to_value(event)?)];
    if let Some(video) = &event.video {
        entries.push((video_key(video), serde_json::to_value(meta)?));
    }

    log::debug!("recording {} for {:?}", event.reaction, event.video);
    backend.set_entries(entries).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};
    use futures::executor::block_on;
    use serde_json::json;

    fn create_test_meta(channel: &str, title: &str) -> VideoMeta {
        VideoMeta {
            channel: channel.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_record_writes_event_and_meta() {
        let backend = MemoryStore::new();
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let event = ReactionEvent::new("❤", Some("abc12345678"), ts);

        block_on(record(&backend, &event, &create_test_meta("Ch", "Ti"))).unwrap();

        assert_eq!(backend.len(), 2);
        assert_eq!(
            backend.get("T_2024-01-01T00:00:00.000Z"),
            Some(json!({"reaction": "❤", "video": "abc12345678", "ts": "2024-01-01T00:00:00.000Z"}))
        );
        assert_eq!(
            backend.get("V_abc12345678"),
            Some(json!({"channel": "Ch", "title": "Ti"}))
        );
    }

    #[test]
    fn test_record_overwrites_meta() {
        let backend = MemoryStore::new();
        let first = ReactionEvent::new("❤", Some("abc12345678"), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let second = ReactionEvent::new("😄", Some("abc12345678"), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap());

        block_on(record(&backend, &first, &create_test_meta("Old", "Old title"))).unwrap();
        block_on(record(&backend, &second, &create_test_meta("New", "New title"))).unwrap();

        assert_eq!(backend.len(), 3);
        assert_eq!(
            backend.get("V_abc12345678"),
            Some(json!({"channel": "New", "title": "New title"}))
        );
    }

    #[test]
    fn test_same_millisecond_last_write_wins() {
        let backend = MemoryStore::new();
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        block_on(record(&backend, &ReactionEvent::new("❤", Some("v"), ts), &VideoMeta::default())).unwrap();
        block_on(record(&backend, &ReactionEvent::new("🎉", Some("v"), ts), &VideoMeta::default())).unwrap();

        assert_eq!(backend.len(), 2);
        assert_eq!(backend.get("T_2024-01-01T00:00:00.000Z").unwrap()["reaction"], "🎉");
    }

    #[test]
    fn test_record_without_video_skips_meta() {
        let backend = MemoryStore::new();
        let event = ReactionEvent::new("💯", None, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        block_on(record(&backend, &event, &create_test_meta("Ch", "Ti"))).unwrap();

        assert_eq!(backend.len(), 1);
    }
}
