use std::io::Read;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::FeedbackError;
use crate::models::{FeedbackRecord, NewFeedback};
use crate::sentiment::{self, PolarityScorer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingRange {
    pub min: i32,
    pub max: i32,
}

impl Default for RatingRange {
    fn default() -> Self {
        Self { min: 1, max: 5 }
    }
}

impl RatingRange {
    pub fn validate(&self, value: i32) -> Result<i32, FeedbackError> {
        if (self.min..=self.max).contains(&value) {
            Ok(value)
        } else {
            Err(FeedbackError::InvalidRating {
                value,
                min: self.min,
                max: self.max,
            })
        }
    }

    pub fn parse(&self, raw: &str) -> Result<i32, FeedbackError> {
        let value = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| FeedbackError::UnparsableRating(raw.to_string()))?;
        self.validate(value)
    }
}

/// Collapses runs of whitespace and title-cases each word, so "  tech   FEST"
/// and "Tech Fest" land in the same group.
pub fn normalize_event_name(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());

    for (index, word) in raw.split_whitespace().enumerate() {
        if index > 0 {
            normalized.push(' ');
        }
        let mut previous_cased = false;
        for c in word.chars() {
            if previous_cased {
                normalized.extend(c.to_lowercase());
            } else {
                normalized.extend(c.to_uppercase());
            }
            previous_cased = c.is_lowercase() || c.is_uppercase();
        }
    }

    normalized
}

pub fn prepare(
    event: &str,
    student: &str,
    rating: i32,
    comment: &str,
    range: RatingRange,
) -> Result<NewFeedback, FeedbackError> {
    for (field, value) in [("event", event), ("student", student), ("comment", comment)] {
        if value.contains('\0') {
            return Err(FeedbackError::UnstorableText { field });
        }
    }

    Ok(NewFeedback {
        event: normalize_event_name(event),
        student: student.to_string(),
        rating: range.validate(rating)?,
        comment: comment.to_string(),
    })
}

/// Labels a validated submission. Scorer failures are downgraded to Neutral.
pub fn into_record<S: PolarityScorer + ?Sized>(
    feedback: NewFeedback,
    scorer: &S,
) -> FeedbackRecord {
    let sentiment = sentiment::classify_or_neutral(scorer, &feedback.comment);
    debug!(event = %feedback.event, %sentiment, "classified feedback");

    FeedbackRecord {
        event: feedback.event,
        student: feedback.student,
        rating: feedback.rating,
        comment: feedback.comment,
        sentiment,
        submitted_at: Utc::now(),
    }
}

/// One CSV row as uploaded; the rating stays raw until it is validated.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRow {
    pub event: String,
    pub student: String,
    pub rating: String,
    pub comment: String,
}

pub fn accept_row<S: PolarityScorer + ?Sized>(
    row: &FeedbackRow,
    range: RatingRange,
    scorer: &S,
) -> Result<FeedbackRecord, FeedbackError> {
    let rating = range.parse(&row.rating)?;
    let feedback = prepare(&row.event, &row.student, rating, &row.comment, range)?;
    Ok(into_record(feedback, scorer))
}

#[derive(Debug, Default)]
pub struct ImportBatch {
    pub records: Vec<FeedbackRecord>,
    pub skipped: usize,
}

/// Reads `event,student,rating,comment` rows. Rows that fail validation are
/// logged and counted; malformed CSV aborts the batch.
pub fn read_batch<R: Read, S: PolarityScorer + ?Sized>(
    reader: R,
    range: RatingRange,
    scorer: &S,
) -> anyhow::Result<ImportBatch> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut batch = ImportBatch::default();

    for (line, result) in reader.deserialize::<FeedbackRow>().enumerate() {
        let row = result?;
        match accept_row(&row, range, scorer) {
            Ok(record) => batch.records.push(record),
            Err(err) => {
                warn!(line = line + 2, error = %err, "skipping feedback row");
                batch.skipped += 1;
            }
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use crate::sentiment::LexiconScorer;

    #[test]
    fn normalizes_whitespace_and_case() {
        assert_eq!(normalize_event_name("  tech   FEST "), "Tech Fest");
        assert_eq!(normalize_event_name("cultural\tnight"), "Cultural Night");
        assert_eq!(normalize_event_name("3d printing o'neil"), "3D Printing O'Neil");
        assert_eq!(normalize_event_name("   "), "");
    }

    #[test]
    fn uncased_characters_start_a_new_word() {
        assert_eq!(normalize_event_name("中a fest"), "中A Fest");
        assert_eq!(normalize_event_name("hack-a-thon"), "Hack-A-Thon");
    }

    #[test]
    fn normalization_is_stable() {
        let once = normalize_event_name("hack   the   CAMPUS");
        assert_eq!(normalize_event_name(&once), once);
    }

    #[test]
    fn rating_range_is_inclusive() {
        let range = RatingRange::default();
        assert_eq!(range.validate(1), Ok(1));
        assert_eq!(range.validate(5), Ok(5));
        assert_eq!(
            range.validate(6),
            Err(FeedbackError::InvalidRating {
                value: 6,
                min: 1,
                max: 5
            })
        );
        assert!(range.validate(0).is_err());
    }

    #[test]
    fn parse_rejects_non_integers() {
        let range = RatingRange::default();
        assert_eq!(range.parse(" 4 "), Ok(4));
        assert_eq!(
            range.parse("four"),
            Err(FeedbackError::UnparsableRating("four".to_string()))
        );
        assert!(range.parse("4.5").is_err());
    }

    #[test]
    fn prepared_feedback_becomes_labeled_record() {
        let feedback = prepare(
            "tech fest",
            "A",
            5,
            "Amazing event!",
            RatingRange::default(),
        )
        .unwrap();
        let record = into_record(feedback, &LexiconScorer::default());
        assert_eq!(record.event, "Tech Fest");
        assert_eq!(record.rating, 5);
        assert_eq!(record.sentiment, Sentiment::Positive);
    }

    #[test]
    fn invalid_rating_never_builds_a_record() {
        let result = prepare("tech fest", "A", 9, "ok", RatingRange::default());
        assert!(matches!(result, Err(FeedbackError::InvalidRating { value: 9, .. })));
    }

    #[test]
    fn nul_text_is_rejected_before_storage() {
        let result = prepare("Tech Fest", "A", 4, "bad\0text", RatingRange::default());
        assert_eq!(result.unwrap_err(), FeedbackError::UnstorableText { field: "comment" });
        let result = prepare("Tech\0Fest", "A", 4, "fine", RatingRange::default());
        assert_eq!(result.unwrap_err(), FeedbackError::UnstorableText { field: "event" });
    }

    #[test]
    fn batch_skips_and_counts_invalid_rows() {
        let data = "event,student,rating,comment\n\
                    tech fest,A,4,Loved it\n\
                    tech fest,B,four,ok\n\
                    tech fest,C,9,ok\n\
                    tech fest,D,4.5,ok\n";
        let batch = read_batch(data.as_bytes(), RatingRange::default(), &LexiconScorer::default())
            .unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.skipped, 3);
        assert_eq!(batch.records[0].event, "Tech Fest");
        assert_eq!(batch.records[0].sentiment, Sentiment::Positive);
    }

    #[test]
    fn batch_counts_nul_comment_as_skipped() {
        let data = "event,student,rating,comment\nTech Fest,A,4,\"bad\0text\"\nTech Fest,B,5,Amazing\n";
        let batch = read_batch(data.as_bytes(), RatingRange::default(), &LexiconScorer::default())
            .unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.skipped, 1);
        assert!(batch.records.iter().all(|record| !record.comment.contains('\0')));
    }

    #[test]
    fn malformed_csv_aborts_the_batch() {
        let data = "event,student,rating,comment\nTech Fest,A,4\n";
        assert!(read_batch(data.as_bytes(), RatingRange::default(), &LexiconScorer::default())
            .is_err());
    }
}
