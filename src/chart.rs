/// Time-bucketed series for the detail graph
use crate::reaction_data::ReactionEvent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolution of the detail graph's x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketUnit {
    #[default]
    Second,
    Minute,
}

impl BucketUnit {
    pub fn millis(self) -> i64 {
        match self {
            BucketUnit::Second => 1_000,
            BucketUnit::Minute => 60_000,
        }
    }

    /// Floor epoch milliseconds to the start of the bucket
    pub fn truncate(self, millis: i64) -> i64 {
        millis - millis.rem_euclid(self.millis())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BucketUnit::Second => "second",
            BucketUnit::Minute => "minute",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BucketUnit::Second => "Second",
            BucketUnit::Minute => "Minute",
        }
    }

    pub fn parse(value: &str) -> Option<BucketUnit> {
        match value {
            "second" => Some(BucketUnit::Second),
            "minute" => Some(BucketUnit::Minute),
            _ => None,
        }
    }
}

/// Counts per bucket for one reaction kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub reaction: String,
    /// (bucket start in epoch ms, count), ascending by time
    pub points: Vec<(i64, usize)>,
}

impl ChartSeries {
    pub fn max_count(&self) -> usize {
        self.points.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }
}

/// One series per reaction kind, in order of first appearance
pub fn bucket_series(details: &[ReactionEvent], unit: BucketUnit) -> Vec<ChartSeries> {
    let mut order: Vec<&str> = Vec::new();
    let mut buckets: BTreeMap<&str, BTreeMap<i64, usize>> = BTreeMap::new();

    for event in details {
        let reaction = event.reaction.as_str();
        if !buckets.contains_key(reaction) {
            order.push(reaction);
        }
        *buckets
            .entry(reaction)
            .or_default()
            .entry(unit.truncate(event.ts_millis()))
            .or_insert(0) += 1;
    }

    order
        .into_iter()
        .map(|reaction| ChartSeries {
            reaction: reaction.to_string(),
            points: buckets
                .remove(reaction)
                .map(|points| points.into_iter().collect())
                .unwrap_or_default(),
        })
        .collect()
}

/// Earliest and latest bucket across all series
pub fn time_range(series: &[ChartSeries]) -> Option<(i64, i64)> {
    let times = series.iter().flat_map(|s| s.points.iter().map(|(t, _)| *t));
    let (min, max) = times.fold((i64::MAX, i64::MIN), |(lo, hi), t| (lo.min(t), hi.max(t)));
    if min > max { None } else { Some((min, max)) }
}
