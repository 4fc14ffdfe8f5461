use anyhow::Context;
use sqlx::{PgExecutor, PgPool, Row};
use tracing::{debug, info};

use crate::models::{FeedbackRecord, Sentiment};
use crate::sentiment::PolarityScorer;
use crate::submission::{self, RatingRange};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed<S: PolarityScorer + ?Sized>(
    pool: &PgPool,
    scorer: &S,
) -> anyhow::Result<usize> {
    let submissions = vec![
        ("Tech Fest", "Avery Lee", 5, "Amazing event! The robotics demos were brilliant."),
        ("Tech Fest", "Jules Moreno", 2, "Terrible, disorganized. Sessions started late."),
        ("Tech Fest", "Kiara Patel", 4, "Really informative talks."),
        ("Cultural Night", "Avery Lee", 5, "Loved it"),
        ("Cultural Night", "Jules Moreno", 3, "It was fine"),
        ("Cultural Night", "Kiara Patel", 4, "Loved every bit"),
        ("Career Fair", "Jules Moreno", 2, "Too crowded and the booths were confusing."),
    ];

    let mut inserted = 0usize;
    for (event, student, rating, comment) in submissions {
        let feedback =
            submission::prepare(event, student, rating, comment, RatingRange::default())?;
        let record = submission::into_record(feedback, scorer);
        insert_feedback(pool, &record).await?;
        inserted += 1;
    }

    Ok(inserted)
}

pub async fn insert_feedback<'e, E: PgExecutor<'e>>(
    executor: E,
    record: &FeedbackRecord,
) -> anyhow::Result<i64> {
    let id: i64 = sqlx::query(
        r#"
        INSERT INTO event_feedback.feedback
        (event, student, rating, comment, sentiment, submitted_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&record.event)
    .bind(&record.student)
    .bind(record.rating)
    .bind(&record.comment)
    .bind(record.sentiment.as_str())
    .bind(record.submitted_at)
    .fetch_one(executor)
    .await?
    .get("id");

    debug!(id, event = %record.event, sentiment = %record.sentiment, "stored feedback");
    Ok(id)
}

pub async fn fetch_feedback(
    pool: &PgPool,
    event: Option<&str>,
) -> anyhow::Result<Vec<FeedbackRecord>> {
    let mut query = String::from(
        "SELECT event, student, rating, comment, sentiment, submitted_at \
         FROM event_feedback.feedback",
    );

    if event.is_some() {
        query.push_str(" WHERE event = $1");
    }
    query.push_str(" ORDER BY event, id");

    let mut rows = sqlx::query(&query);

    if let Some(value) = event {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    let mut feedback = Vec::with_capacity(records.len());

    for row in records {
        let sentiment: String = row.get("sentiment");
        feedback.push(FeedbackRecord {
            event: row.get("event"),
            student: row.get("student"),
            rating: row.get("rating"),
            comment: row.get("comment"),
            sentiment: sentiment.parse::<Sentiment>()?,
            submitted_at: row.get("submitted_at"),
        });
    }

    Ok(feedback)
}

#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub inserted: usize,
    pub skipped: usize,
}

/// Validates the whole file first, then stores the accepted rows in one
/// transaction so a failed insert leaves nothing behind.
pub async fn import_csv<S: PolarityScorer + ?Sized>(
    pool: &PgPool,
    csv_path: &std::path::Path,
    scorer: &S,
    range: RatingRange,
) -> anyhow::Result<ImportOutcome> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let batch = submission::read_batch(file, range, scorer)?;

    let mut tx = pool.begin().await?;
    for record in batch.records.iter() {
        insert_feedback(&mut *tx, record).await?;
    }
    tx.commit().await?;

    let outcome = ImportOutcome {
        inserted: batch.records.len(),
        skipped: batch.skipped,
    };
    info!(
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        path = %csv_path.display(),
        "imported feedback"
    );
    Ok(outcome)
}
