#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FeedbackError {
    #[error("rating {value} is outside the accepted range {min}..={max}")]
    InvalidRating { value: i32, min: i32, max: i32 },
    #[error("rating `{0}` is not an integer")]
    UnparsableRating(String),
    #[error("{field} contains a NUL character")]
    UnstorableText { field: &'static str },
    #[error("sentiment scorer unavailable: {0}")]
    ClassificationUnavailable(String),
    #[error("event group `{0}` has no feedback")]
    EmptyEventGroup(String),
    #[error("unknown sentiment label `{0}`")]
    UnknownSentiment(String),
    #[error("invalid admin credentials")]
    Unauthorized,
    #[error("ADMIN_USERNAME and ADMIN_PASSWORD must be configured for admin commands")]
    MissingAdminCredentials,
}
