use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};

const WORDS: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("brilliant", 0.9),
    ("enjoy", 0.4),
    ("enjoyable", 0.5),
    ("enjoyed", 0.5),
    ("engaging", 0.4),
    ("excellent", 1.0),
    ("exciting", 0.3),
    ("fantastic", 0.4),
    ("fun", 0.3),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("impressive", 1.0),
    ("informative", 0.5),
    ("insightful", 0.6),
    ("interesting", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("memorable", 0.5),
    ("nice", 0.6),
    ("organized", 0.3),
    ("outstanding", 0.5),
    ("perfect", 1.0),
    ("superb", 1.0),
    ("useful", 0.3),
    ("wonderful", 1.0),
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("chaotic", -0.6),
    ("confusing", -0.3),
    ("crowded", -0.3),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("disorganized", -0.5),
    ("dull", -0.3),
    ("hate", -0.8),
    ("hated", -0.9),
    ("horrible", -1.0),
    ("late", -0.3),
    ("messy", -0.5),
    ("poor", -0.4),
    ("rude", -0.3),
    ("sad", -0.5),
    ("slow", -0.3),
    ("terrible", -1.0),
    ("unorganized", -0.5),
    ("useless", -0.5),
    ("waste", -0.2),
    ("worst", -1.0),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("incredibly", 1.5),
    ("quite", 1.1),
    ("really", 1.3),
    ("slightly", 0.6),
    ("so", 1.2),
    ("somewhat", 0.7),
    ("super", 1.4),
    ("very", 1.3),
];

const NEGATORS: &[&str] = &["hardly", "neither", "never", "no", "nor", "not", "nothing"];

/// Word polarities plus the modifiers that adjust them.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negators: HashSet<String>,
}

impl Lexicon {
    pub fn builtin() -> Self {
        Self {
            words: WORDS.iter().map(|(w, p)| (w.to_string(), *p)).collect(),
            intensifiers: INTENSIFIERS
                .iter()
                .map(|(w, m)| (w.to_string(), *m))
                .collect(),
            negators: NEGATORS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Loads `word,polarity` rows, replacing the built-in word list.
    /// Intensifiers and negators stay built in.
    pub fn from_csv(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open lexicon {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("invalid lexicon {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        #[derive(serde::Deserialize)]
        struct LexiconRow {
            word: String,
            polarity: f64,
        }

        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut words = HashMap::new();

        for result in reader.deserialize::<LexiconRow>() {
            let row = result?;
            if !(-1.0..=1.0).contains(&row.polarity) {
                bail!("polarity {} for `{}` is outside -1..=1", row.polarity, row.word);
            }
            words.insert(row.word.to_lowercase(), row.polarity);
        }

        if words.is_empty() {
            bail!("lexicon has no entries");
        }

        Ok(Self {
            words,
            ..Self::builtin()
        })
    }

    pub fn polarity(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    pub fn intensity(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    pub fn is_negator(&self, word: &str) -> bool {
        self.negators.contains(word) || word.ends_with("n't")
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_polarities_stay_in_bounds() {
        for (word, polarity) in WORDS {
            assert!((-1.0..=1.0).contains(polarity), "{word} out of range");
        }
    }

    #[test]
    fn neutral_words_carry_no_polarity() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.polarity("fine"), None);
        assert_eq!(lexicon.polarity("okay"), None);
        assert_eq!(lexicon.polarity("amazing"), Some(0.6));
    }

    #[test]
    fn contractions_count_as_negators() {
        let lexicon = Lexicon::builtin();
        assert!(lexicon.is_negator("didn't"));
        assert!(lexicon.is_negator("not"));
        assert!(!lexicon.is_negator("note"));
    }

    #[test]
    fn csv_lexicon_replaces_words_but_keeps_modifiers() {
        let data = "word,polarity\nStellar, 0.9\nmeh,-0.2\n";
        let lexicon = Lexicon::from_reader(data.as_bytes()).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.polarity("stellar"), Some(0.9));
        assert_eq!(lexicon.polarity("amazing"), None);
        assert_eq!(lexicon.intensity("very"), Some(1.3));
    }

    #[test]
    fn csv_lexicon_rejects_out_of_range_polarity() {
        let data = "word,polarity\nwild,1.5\n";
        assert!(Lexicon::from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn csv_lexicon_rejects_empty_file() {
        let data = "word,polarity\n";
        assert!(Lexicon::from_reader(data.as_bytes()).is_err());
    }
}
