use std::collections::HashMap;

use tracing::debug;

use crate::error::FeedbackError;
use crate::models::{EventNarrative, EventSummary, FeedbackRecord, Sentiment};

pub fn narrative_for(positive_count: usize, negative_count: usize) -> EventNarrative {
    if positive_count > negative_count {
        EventNarrative::Positive
    } else if negative_count > positive_count {
        EventNarrative::Negative
    } else {
        EventNarrative::Mixed
    }
}

/// Rounds half away from zero to two decimals.
pub fn round_rating(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl EventSummary {
    pub fn from_group(event: &str, records: &[&FeedbackRecord]) -> Result<Self, FeedbackError> {
        if records.is_empty() {
            return Err(FeedbackError::EmptyEventGroup(event.to_string()));
        }

        let total = records.len();
        let rating_sum: i64 = records.iter().map(|r| i64::from(r.rating)).sum();
        let count = |sentiment: Sentiment| {
            records
                .iter()
                .filter(|record| record.sentiment == sentiment)
                .count()
        };
        let positive_count = count(Sentiment::Positive);
        let neutral_count = count(Sentiment::Neutral);
        let negative_count = count(Sentiment::Negative);

        Ok(EventSummary {
            event: event.to_string(),
            total,
            average_rating: round_rating(rating_sum as f64 / total as f64),
            positive_count,
            neutral_count,
            negative_count,
            narrative: narrative_for(positive_count, negative_count),
        })
    }
}

/// Groups records by exact event name, in order of first appearance.
pub fn group_by_event(records: &[FeedbackRecord]) -> Vec<(String, Vec<&FeedbackRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&FeedbackRecord>)> = Vec::new();

    for record in records {
        let position = *index.entry(record.event.as_str()).or_insert_with(|| {
            groups.push((record.event.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[position].1.push(record);
    }

    groups
}

pub fn summarize(records: &[FeedbackRecord]) -> Vec<EventSummary> {
    let summaries: Vec<EventSummary> = group_by_event(records)
        .into_iter()
        .filter_map(|(event, rows)| EventSummary::from_group(&event, &rows).ok())
        .collect();

    debug!(
        records = records.len(),
        events = summaries.len(),
        "summarized feedback"
    );
    summaries
}
