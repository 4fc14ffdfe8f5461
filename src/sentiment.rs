use tracing::warn;

use crate::error::FeedbackError;
use crate::lexicon::Lexicon;
use crate::models::Sentiment;

pub const POSITIVE_THRESHOLD: f64 = 0.05;
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

const NEGATION_FACTOR: f64 = -0.5;
const NEGATION_WINDOW: usize = 2;

/// Scores free text on a polarity scale of -1.0 (negative) to 1.0 (positive).
pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> Result<f64, FeedbackError>;
}

#[derive(Debug, Clone, Default)]
pub struct LexiconScorer {
    lexicon: Lexicon,
}

impl LexiconScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Result<f64, FeedbackError> {
        if text.contains('\0') {
            return Err(FeedbackError::ClassificationUnavailable(
                "text contains a NUL character".to_string(),
            ));
        }

        let tokens = tokenize(text);
        let mut contributions = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            let Some(mut value) = self.lexicon.polarity(token) else {
                continue;
            };

            if index > 0 {
                if let Some(multiplier) = self.lexicon.intensity(&tokens[index - 1]) {
                    value *= multiplier;
                }
            }

            let window = &tokens[index.saturating_sub(NEGATION_WINDOW)..index];
            if window.iter().any(|word| self.lexicon.is_negator(word)) {
                value *= NEGATION_FACTOR;
            }

            contributions.push(value.clamp(-1.0, 1.0));
        }

        if contributions.is_empty() {
            return Ok(0.0);
        }

        let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
        Ok(mean.clamp(-1.0, 1.0))
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.to_lowercase().replace('\u{2019}', "'");
    normalized
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|token| token.trim_matches('\''))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Thresholds are exclusive: a score of exactly +/-0.05 stays neutral.
pub fn classify_polarity(polarity: f64) -> Sentiment {
    if polarity > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if polarity < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn classify<S: PolarityScorer + ?Sized>(
    scorer: &S,
    text: &str,
) -> Result<Sentiment, FeedbackError> {
    scorer.polarity(text).map(classify_polarity)
}

/// Classifies `text`, falling back to neutral when the scorer fails.
pub fn classify_or_neutral<S: PolarityScorer + ?Sized>(scorer: &S, text: &str) -> Sentiment {
    match classify(scorer, text) {
        Ok(sentiment) => sentiment,
        Err(err) => {
            warn!(error = %err, "sentiment scoring failed, storing Neutral");
            Sentiment::Neutral
        }
    }
}
