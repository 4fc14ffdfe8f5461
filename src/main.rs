use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod error;
mod lexicon;
mod models;
mod report;
mod sentiment;
mod submission;
mod summary;

use crate::config::AppConfig;
use crate::lexicon::Lexicon;
use crate::models::Sentiment;
use crate::sentiment::{LexiconScorer, PolarityScorer};

#[derive(Parser)]
#[command(name = "event-feedback")]
#[command(about = "Campus event feedback with sentiment summaries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AdminLogin {
    #[arg(long)]
    username: String,
    #[arg(long, env = "ADMIN_LOGIN_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed feedback
    Seed,
    /// Submit one piece of feedback
    Submit {
        #[arg(long)]
        event: String,
        #[arg(long)]
        student: String,
        #[arg(long)]
        rating: String,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Import feedback from a CSV file (event,student,rating,comment)
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Score and label a single comment
    Classify { text: String },
    /// Print per-event summaries (admin only)
    Summary {
        #[command(flatten)]
        login: AdminLogin,
        #[arg(long)]
        event: Option<String>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the admin report (admin only)
    Report {
        #[command(flatten)]
        login: AdminLogin,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.require_database_url()?)
        .await
        .context("failed to connect to Postgres")
}

fn build_scorer(config: &AppConfig) -> anyhow::Result<LexiconScorer> {
    let lexicon = match &config.lexicon_path {
        Some(path) => Lexicon::from_csv(path)?,
        None => Lexicon::builtin(),
    };
    info!(words = lexicon.len(), "sentiment lexicon ready");
    Ok(LexiconScorer::new(lexicon))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&config).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let scorer = build_scorer(&config)?;
            let pool = connect(&config).await?;
            let inserted = db::seed(&pool, &scorer).await?;
            println!("Inserted {inserted} seed reviews.");
        }
        Commands::Submit {
            event,
            student,
            rating,
            comment,
        } => {
            let rating = config.rating_range.parse(&rating)?;
            let feedback =
                submission::prepare(&event, &student, rating, &comment, config.rating_range)?;
            let scorer = build_scorer(&config)?;
            let record = submission::into_record(feedback, &scorer);
            let pool = connect(&config).await?;
            let id = db::insert_feedback(&pool, &record).await?;
            println!(
                "Stored feedback #{id} for {} ({}).",
                record.event, record.sentiment
            );
        }
        Commands::Import { csv } => {
            let scorer = build_scorer(&config)?;
            let pool = connect(&config).await?;
            let outcome = db::import_csv(&pool, &csv, &scorer, config.rating_range).await?;
            println!(
                "Inserted {} reviews from {} ({} skipped).",
                outcome.inserted,
                csv.display(),
                outcome.skipped
            );
        }
        Commands::Classify { text } => {
            let scorer = build_scorer(&config)?;
            match scorer.polarity(&text) {
                Ok(polarity) => println!(
                    "{} (polarity {:.3})",
                    sentiment::classify_polarity(polarity),
                    polarity
                ),
                Err(err) => {
                    warn!(error = %err, "sentiment scoring failed");
                    println!("{} (scorer unavailable)", Sentiment::Neutral);
                }
            }
        }
        Commands::Summary { login, event, json } => {
            let session = auth::login(config.admin.as_ref(), &login.username, &login.password)?;
            let pool = connect(&config).await?;
            let event = event.as_deref().map(submission::normalize_event_name);
            let records = db::fetch_feedback(&pool, event.as_deref()).await?;
            let summaries = summary::summarize(&records);

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if summaries.is_empty() {
                println!("No feedback has been submitted yet.");
            } else {
                println!("Event summaries for {}:", session.username);
                for summary in summaries.iter() {
                    println!("{}", report::summary_line(summary));
                }
            }
        }
        Commands::Report { login, out, json } => {
            let session = auth::login(config.admin.as_ref(), &login.username, &login.password)?;
            let pool = connect(&config).await?;
            let records = db::fetch_feedback(&pool, None).await?;
            let rendered = if json {
                report::build_json(&session, &records)?
            } else {
                report::build_report(&session, &records)
            };
            std::fs::write(&out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
