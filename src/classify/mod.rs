//! Text classification seam for submission sentiment labels
//!
//! The emotion labeling the pipeline can attach to submissions is an
//! external concern: the real system calls out to a hosted model. Here it
//! is an injected collaborator behind the [`TextClassifier`] trait — the
//! orchestrator owns an optional trait object, never a process-wide
//! singleton — plus a small deterministic lexicon implementation so the
//! seam works offline.

use anyhow::Result;

/// One label produced by a classifier, with its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    pub score: f64,
}

/// A collaborator that labels free text.
///
/// Implementations must be deterministic for identical input; the
/// pipeline runs them from parallel workers.
pub trait TextClassifier: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &'static str;

    /// Label `text`, strongest label first.
    fn classify(&self, text: &str) -> Result<Vec<Label>>;
}

/// Lexicon-based emotion classifier.
///
/// Counts keyword hits per emotion and scores each emotion by its share
/// of total hits. Crude next to a hosted model, but dependency-free and
/// stable, which is what batch runs and tests need.
pub struct LexiconClassifier {
    lexicon: &'static [(&'static str, &'static [&'static str])],
}

/// Fallback label when no keyword matches.
const NEUTRAL: &str = "neutral";

const EMOTION_LEXICON: &[(&str, &[&str])] = &[
    (
        "joy",
        &["happy", "glad", "great", "awesome", "excited", "love it", "wonderful"],
    ),
    (
        "sadness",
        &["sad", "miss", "lost", "cry", "lonely", "depressed", "sorry"],
    ),
    (
        "anger",
        &["angry", "furious", "hate", "annoyed", "outrageous", "ridiculous"],
    ),
    (
        "fear",
        &["afraid", "scared", "worried", "terrified", "anxious", "nervous"],
    ),
    ("love", &["love", "adore", "dear", "sweetheart", "caring"]),
    (
        "surprise",
        &["surprised", "unexpected", "shocked", "unbelievable", "wow"],
    ),
];

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self {
            lexicon: EMOTION_LEXICON,
        }
    }
}

impl TextClassifier for LexiconClassifier {
    fn name(&self) -> &'static str {
        "lexicon-emotion"
    }

    fn classify(&self, text: &str) -> Result<Vec<Label>> {
        let haystack = text.to_lowercase();
        let mut hits: Vec<(usize, &str)> = Vec::new();
        let mut total = 0usize;

        for (emotion, keywords) in self.lexicon {
            let count: usize = keywords.iter().map(|k| haystack.matches(k).count()).sum();
            if count > 0 {
                hits.push((count, emotion));
                total += count;
            }
        }

        if total == 0 {
            return Ok(vec![Label {
                name: NEUTRAL.to_string(),
                score: 0.0,
            }]);
        }

        // Strongest first; ties broken by name for stable output
        hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(b.1)));
        Ok(hits
            .into_iter()
            .map(|(count, emotion)| Label {
                name: emotion.to_string(),
                score: count as f64 / total as f64,
            })
            .collect())
    }
}
