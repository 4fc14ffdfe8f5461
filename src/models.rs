use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::error::FeedbackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = FeedbackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Positive" => Ok(Sentiment::Positive),
            "Neutral" => Ok(Sentiment::Neutral),
            "Negative" => Ok(Sentiment::Negative),
            other => Err(FeedbackError::UnknownSentiment(other.to_string())),
        }
    }
}

/// A validated submission that has not been classified yet.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub event: String,
    pub student: String,
    pub rating: i32,
    pub comment: String,
}

/// One stored review. The sentiment is fixed when the record is created and
/// never recomputed, so old rows keep the label they were submitted with.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRecord {
    pub event: String,
    pub student: String,
    pub rating: i32,
    pub comment: String,
    pub sentiment: Sentiment,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventNarrative {
    Positive,
    Negative,
    Mixed,
}

impl EventNarrative {
    pub fn text(&self) -> &'static str {
        match self {
            EventNarrative::Positive => "Overall positive response. Majority enjoyed the event.",
            EventNarrative::Negative => {
                "Event received mixed/negative responses. Improvements needed."
            }
            EventNarrative::Mixed => "Event received neutral/mixed feedback overall.",
        }
    }
}

impl Serialize for EventNarrative {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.text())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub event: String,
    pub total: usize,
    pub average_rating: f64,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
    pub narrative: EventNarrative,
}
