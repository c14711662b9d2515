/// Per-video reaction aggregation over a time window
use crate::reaction_data::{ReactionEvent, VideoDetail};
use crate::store::Snapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// `from` is inclusive, `to` is exclusive; `None` means unbounded on that side
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> TimeWindow {
        TimeWindow { from, to }
    }

    pub fn all() -> TimeWindow {
        TimeWindow::default()
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| from <= *ts) && self.to.is_none_or(|to| *ts < to)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Summary of one video's reactions within a window
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregateRow {
    pub video: Option<String>,
    pub channel: Option<String>,
    pub title: Option<String>,
    /// Latest event timestamp in the window, epoch milliseconds
    pub last_reaction: i64,
    #[serde(flatten)]
    pub counts: BTreeMap<String, usize>,
}

impl AggregateRow {
    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Rows, most recently active video first, with the column order for the counts
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Aggregation {
    pub rows: Vec<AggregateRow>,
    pub reaction_kinds: Vec<String>,
}

/// Filter by window, group by video, count per known kind, sort by last reaction.
///
/// Every row carries a count for every known kind (zero if unseen) so the table
/// has stable columns. Events whose kind isn't known still affect `last_reaction`.
pub fn aggregate(snapshot: &Snapshot, window: TimeWindow) -> Aggregation {
    let mut groups: HashMap<Option<&str>, Vec<&ReactionEvent>> = HashMap::new();
    for event in snapshot.events.iter().filter(|e| window.contains(&e.ts)) {
        groups.entry(event.video.as_deref()).or_default().push(event);
    }

    let mut rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(video, group)| {
            let meta = video.and_then(|v| snapshot.videos.get(v));
            let last_reaction = group
                .iter()
                .map(|e| e.ts_millis())
                .max()
                .unwrap_or_default();

            let mut counts: BTreeMap<String, usize> =
                snapshot.kinds.iter().map(|k| (k.to_string(), 0)).collect();
            for event in &group {
                if let Some(count) = counts.get_mut(&event.reaction) {
                    *count += 1;
                }
            }

            AggregateRow {
                video: video.map(str::to_string),
                channel: meta.map(|m| m.channel.clone()),
                title: meta.map(|m| m.title.clone()),
                last_reaction,
                counts,
            }
        })
        .collect();

    // Latest first, then by video id so equal timestamps have a stable order
    rows.sort_by(|a, b| {
        b.last_reaction
            .cmp(&a.last_reaction)
            .then_with(|| a.video.cmp(&b.video))
    });

    Aggregation {
        rows,
        reaction_kinds: snapshot.kinds.to_vec(),
    }
}

/// Metadata for a video and all of its events, unfiltered, in storage order
pub fn video_detail(snapshot: &Snapshot, video: Option<&str>) -> VideoDetail {
    let meta = video.and_then(|v| snapshot.videos.get(v));

    VideoDetail {
        video: video.map(str::to_string),
        channel: meta.map(|m| m.channel.clone()),
        title: meta.map(|m| m.title.clone()),
        details: snapshot
            .events
            .iter()
            .filter(|e| e.video.as_deref() == video)
            .cloned()
            .collect(),
    }
}
