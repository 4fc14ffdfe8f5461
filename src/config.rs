use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::auth::AdminCredentials;
use crate::submission::RatingRange;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub admin: Option<AdminCredentials>,
    pub rating_range: RatingRange,
    pub lexicon_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        let rating_range = RatingRange {
            min: parse_or(&lookup, "RATING_MIN", RatingRange::default().min)?,
            max: parse_or(&lookup, "RATING_MAX", RatingRange::default().max)?,
        };
        if rating_range.min > rating_range.max {
            bail!(
                "RATING_MIN ({}) must not exceed RATING_MAX ({})",
                rating_range.min,
                rating_range.max
            );
        }

        let admin = match (lookup("ADMIN_USERNAME"), lookup("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminCredentials::new(username, password))
            }
            _ => None,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            max_connections,
            admin,
            rating_range,
            lexicon_path: lookup("SENTIMENT_LEXICON").map(PathBuf::from),
        })
    }

    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set to a production Postgres instance")
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value `{raw}`")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.rating_range, RatingRange { min: 1, max: 5 });
        assert!(config.admin.is_none());
        assert!(config.lexicon_path.is_none());
        assert!(config.require_database_url().is_err());
    }

    #[test]
    fn reads_all_keys() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/feedback"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("ADMIN_USERNAME", "organizer"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("RATING_MIN", "0"),
            ("RATING_MAX", "10"),
            ("SENTIMENT_LEXICON", "lexicon.csv"),
        ])
        .unwrap();
        assert_eq!(config.require_database_url().unwrap(), "postgres://localhost/feedback");
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.rating_range, RatingRange { min: 0, max: 10 });
        let session = config.admin.unwrap().login("organizer", "s3cret").unwrap();
        assert_eq!(session.username, "organizer");
        assert_eq!(config.lexicon_path, Some(PathBuf::from("lexicon.csv")));
    }

    #[test]
    fn partial_admin_credentials_are_ignored() {
        let config = config_from(&[("ADMIN_USERNAME", "organizer")]).unwrap();
        assert!(config.admin.is_none());
    }

    #[test]
    fn malformed_numbers_are_errors() {
        assert!(config_from(&[("RATING_MAX", "five")]).is_err());
        assert!(config_from(&[("DB_MAX_CONNECTIONS", "-1")]).is_err());
    }

    #[test]
    fn inverted_rating_range_is_rejected() {
        assert!(config_from(&[("RATING_MIN", "6"), ("RATING_MAX", "5")]).is_err());
    }
}
