use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::AdminSession;
use crate::models::{EventSummary, FeedbackRecord};
use crate::summary;

#[derive(Debug, Serialize)]
pub struct EventReport<'a> {
    #[serde(flatten)]
    pub summary: EventSummary,
    pub rows: Vec<&'a FeedbackRecord>,
}

#[derive(Debug, Serialize)]
pub struct AdminReport<'a> {
    pub prepared_for: &'a str,
    pub generated_at: DateTime<Utc>,
    pub events: Vec<EventReport<'a>>,
}

pub fn collect<'a>(session: &'a AdminSession, records: &'a [FeedbackRecord]) -> AdminReport<'a> {
    let events = summary::group_by_event(records)
        .into_iter()
        .filter_map(|(event, rows)| {
            let summary = EventSummary::from_group(&event, &rows).ok()?;
            Some(EventReport { summary, rows })
        })
        .collect();

    AdminReport {
        prepared_for: &session.username,
        generated_at: Utc::now(),
        events,
    }
}

pub fn build_json(
    session: &AdminSession,
    records: &[FeedbackRecord],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&collect(session, records))
}

pub fn summary_line(summary: &EventSummary) -> String {
    format!(
        "- {}: {} reviews, avg rating {:.2} ({} positive, {} neutral, {} negative). {}",
        summary.event,
        summary.total,
        summary.average_rating,
        summary.positive_count,
        summary.neutral_count,
        summary.negative_count,
        summary.narrative.text()
    )
}

pub fn build_report(session: &AdminSession, records: &[FeedbackRecord]) -> String {
    let report = collect(session, records);
    let mut output = String::new();

    let _ = writeln!(output, "# Event Feedback Report");
    let _ = writeln!(
        output,
        "Prepared for {} on {}",
        report.prepared_for,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Event Overview");

    if report.events.is_empty() {
        let _ = writeln!(output, "No feedback has been submitted yet.");
        return output;
    }

    for event in report.events.iter() {
        let _ = writeln!(output, "{}", summary_line(&event.summary));
    }

    for event in report.events.iter() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", event.summary.event);
        let _ = writeln!(output, "{}", event.summary.narrative.text());
        let _ = writeln!(output);
        let _ = writeln!(output, "| Student | Rating | Sentiment | Comment |");
        let _ = writeln!(output, "|---|---|---|---|");
        for row in event.rows.iter() {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                escape_cell(&row.student),
                row.rating,
                row.sentiment,
                escape_cell(&row.comment)
            );
        }
    }

    output
}

fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
