use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::FeedbackError;

/// The single admin login, loaded from configuration.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AdminSession, FeedbackError> {
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());

        if user_ok && pass_ok {
            let session = AdminSession {
                token: Uuid::new_v4(),
                username: self.username.clone(),
                issued_at: Utc::now(),
            };
            info!(
                username = %session.username,
                token = %session.token,
                issued_at = %session.issued_at,
                "admin session opened"
            );
            Ok(session)
        } else {
            warn!(username, "rejected admin login");
            Err(FeedbackError::Unauthorized)
        }
    }
}

/// Proof of a successful admin login. Admin views take one explicitly.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: Uuid,
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

pub fn login(
    credentials: Option<&AdminCredentials>,
    username: &str,
    password: &str,
) -> Result<AdminSession, FeedbackError> {
    credentials
        .ok_or(FeedbackError::MissingAdminCredentials)?
        .login(username, password)
}

fn constant_time_eq(expected: &[u8], given: &[u8]) -> bool {
    if expected.len() != given.len() {
        return false;
    }
    expected
        .iter()
        .zip(given)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> AdminCredentials {
        AdminCredentials::new("organizer", "s3cret")
    }

    #[test]
    fn correct_credentials_open_a_session() {
        let session = credentials().login("organizer", "s3cret").unwrap();
        assert_eq!(session.username, "organizer");
    }

    #[test]
    fn sessions_get_distinct_tokens() {
        let creds = credentials();
        let first = creds.login("organizer", "s3cret").unwrap();
        let second = creds.login("organizer", "s3cret").unwrap();
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn wrong_credentials_are_rejected() {
        let creds = credentials();
        assert_eq!(
            creds.login("organizer", "S3cret").unwrap_err(),
            FeedbackError::Unauthorized
        );
        assert_eq!(
            creds.login("admin", "s3cret").unwrap_err(),
            FeedbackError::Unauthorized
        );
        assert_eq!(creds.login("", "").unwrap_err(), FeedbackError::Unauthorized);
    }

    #[test]
    fn missing_configuration_refuses_login() {
        assert_eq!(
            login(None, "admin", "admin123").unwrap_err(),
            FeedbackError::MissingAdminCredentials
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", credentials());
        assert!(rendered.contains("organizer"));
        assert!(!rendered.contains("s3cret"));
    }
}
