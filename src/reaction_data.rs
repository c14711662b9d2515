/// Data structures for Reaction Recorder
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reaction kinds that always get a column, even at zero count
pub const SEED_REACTIONS: [&str; 5] = ["❤", "😄", "🎉", "😳", "💯"];

/// One observed click on a reaction button
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactionEvent {
    pub reaction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(with = "timestamp")]
    pub ts: DateTime<Utc>,
}

impl ReactionEvent {
    pub fn new(reaction: &str, video: Option<&str>, ts: DateTime<Utc>) -> ReactionEvent {
        ReactionEvent {
            reaction: reaction.to_string(),
            video: video.map(str::to_string),
            ts,
        }
    }

    /// Epoch milliseconds, the unit `last_reaction` and chart buckets use
    pub fn ts_millis(&self) -> i64 {
        self.ts.timestamp_millis()
    }
}

/// Channel and title of a video, last write wins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VideoMeta {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub title: String,
}

/// Metadata for one video plus every recorded event for it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoDetail {
    pub video: Option<String>,
    pub channel: Option<String>,
    pub title: Option<String>,
    pub details: Vec<ReactionEvent>,
}

/// Insertion-ordered set of reaction symbols
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReactionKinds(Vec<String>);

impl ReactionKinds {
    pub fn seeded<S: AsRef<str>>(seeds: &[S]) -> ReactionKinds {
        let mut kinds = ReactionKinds::default();
        for seed in seeds {
            kinds.insert(seed.as_ref());
        }
        kinds
    }

    /// Returns true when the kind was not already present
    pub fn insert(&mut self, kind: &str) -> bool {
        if self.contains(kind) {
            return false;
        }
        self.0.push(kind.to_string());
        true
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.0.iter().any(|k| k == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Timestamps on the wire are ISO-8601 with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_wire_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let event = ReactionEvent::new("❤", Some("abc12345678"), ts);

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "reaction": "❤",
                "video": "abc12345678",
                "ts": "2024-01-01T00:00:00.000Z",
            })
        );
    }

    #[test]
    fn test_event_without_video() {
        let json = r#"{"reaction":"🎉","ts":"2024-03-05T10:20:30.456Z"}"#;

        let event: ReactionEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.video, None);
        assert_eq!(event.reaction, "🎉");
        assert_eq!(event.ts_millis() % 1000, 456);
        assert!(!serde_json::to_string(&event).unwrap().contains("video"));
    }

    #[test]
    fn test_event_rejects_bad_timestamp() {
        let json = r#"{"reaction":"🎉","video":"x","ts":"yesterday"}"#;
        assert!(serde_json::from_str::<ReactionEvent>(json).is_err());
    }

    #[test]
    fn test_video_meta_missing_fields() {
        let meta: VideoMeta = serde_json::from_str(r#"{"title":"Ti"}"#).unwrap();
        assert_eq!(meta.channel, "");
        assert_eq!(meta.title, "Ti");
    }

    #[test]
    fn test_reaction_kinds_keep_order_and_dedupe() {
        let mut kinds = ReactionKinds::seeded(&SEED_REACTIONS);

        assert_eq!(kinds.len(), 5);
        assert!(!kinds.insert("😄"));
        assert!(kinds.insert("👏"));

        let all: Vec<&str> = kinds.iter().collect();
        assert_eq!(all, vec!["❤", "😄", "🎉", "😳", "💯", "👏"]);
    }
}
