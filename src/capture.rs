/// Turning a reaction-button click on the watch page into records
use crate::reaction_data::{ReactionEvent, VideoMeta};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static LIVE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/live/([-_A-Za-z0-9]{11})").expect("valid live path regex"));

/// Video id from a watch URL: the `v` query parameter, else a `/live/<id>` path segment
///
/// Examples:
/// - https://www.youtube.com/watch?v=abc12345678&t=10 → abc12345678
/// - https://www.youtube.com/live/abc12345678?si=x → abc12345678
pub fn extract_video_id(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url.trim()).ok()?;

    if let Some((_, v)) = url.query_pairs().find(|(key, _)| key == "v") {
        return Some(v.into_owned());
    }

    LIVE_PATH
        .captures(url.path())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The button's alt text starts with the reaction symbol, e.g. "💯を送信"
pub fn reaction_from_alt(alt: &str) -> Option<String> {
    alt.chars().next().map(|c| c.to_string())
}

/// Everything scraped from the page for one click
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionClick {
    pub channel: String,
    pub title: String,
    pub video: Option<String>,
    pub reaction: String,
}

impl ReactionClick {
    /// `None` if the alt text has no reaction symbol
    pub fn from_page(channel: &str, title: &str, page_url: &str, alt: &str) -> Option<ReactionClick> {
        Some(ReactionClick {
            channel: channel.trim().to_string(),
            title: title.trim().to_string(),
            video: extract_video_id(page_url),
            reaction: reaction_from_alt(alt)?,
        })
    }

    pub fn into_records(self, ts: DateTime<Utc>) -> (ReactionEvent, VideoMeta) {
        let event = ReactionEvent {
            reaction: self.reaction,
            video: self.video,
            ts,
        };
        let meta = VideoMeta {
            channel: self.channel,
            title: self.title,
        };
        (event, meta)
    }
}
