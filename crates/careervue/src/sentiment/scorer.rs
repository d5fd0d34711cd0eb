use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lexicon::{Lexicon, Polarity};
use super::record::MessageText;
use super::stats::SentimentStats;

const POSITIVE_THRESHOLD: f64 = 0.3;
const NEGATIVE_THRESHOLD: f64 = -0.3;

/// Polarity bucket assigned to a scored text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Outcome of scoring a single text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub score: f64,
    pub positive_count: usize,
    pub negative_count: usize,
    pub total_keywords: usize,
}

impl SentimentResult {
    /// Canonical result for text with no keyword hits, or no text at all.
    pub const NEUTRAL: SentimentResult = SentimentResult {
        sentiment: Sentiment::Neutral,
        score: 0.0,
        positive_count: 0,
        negative_count: 0,
        total_keywords: 0,
    };

    fn from_counts(positive_count: usize, negative_count: usize) -> Self {
        let total_keywords = positive_count + negative_count;
        if total_keywords == 0 {
            return Self::NEUTRAL;
        }

        let score = (positive_count as f64 - negative_count as f64) / total_keywords as f64;
        let sentiment = if score > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };

        Self {
            sentiment,
            score,
            positive_count,
            negative_count,
            total_keywords,
        }
    }
}

/// Keyword sentiment classifier over an injected [`Lexicon`].
///
/// Classification never fails: anything that is not scorable text yields
/// [`SentimentResult::NEUTRAL`]. The scorer holds no mutable state, so a single
/// instance can be shared behind an `Arc` across request handlers.
#[derive(Debug, Clone, Default)]
pub struct SentimentScorer {
    lexicon: Lexicon,
}

impl SentimentScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn classify(&self, text: &str) -> SentimentResult {
        if text.is_empty() {
            return SentimentResult::NEUTRAL;
        }

        let normalized = text.to_lowercase();
        let haystack = normalized.as_bytes();
        // Hits of a single term never overlap; the scan resumes after each accepted hit.
        let mut resume_at = vec![0usize; self.lexicon.pattern_count()];
        let mut positive_count = 0;
        let mut negative_count = 0;

        for hit in self.lexicon.matcher().find_overlapping_iter(normalized.as_str()) {
            let pattern = hit.pattern().as_usize();
            if hit.start() < resume_at[pattern]
                || !is_word_boundary(haystack, hit.start())
                || !is_word_boundary(haystack, hit.end())
            {
                continue;
            }
            resume_at[pattern] = hit.end();

            match self.lexicon.polarity(pattern) {
                Polarity::Positive => positive_count += 1,
                Polarity::Negative => negative_count += 1,
            }
        }

        SentimentResult::from_counts(positive_count, negative_count)
    }

    pub fn classify_opt(&self, text: Option<&str>) -> SentimentResult {
        text.map_or(SentimentResult::NEUTRAL, |text| self.classify(text))
    }

    /// Scores a raw JSON value; only strings carry text, every other shape is neutral.
    pub fn classify_value(&self, value: &Value) -> SentimentResult {
        match value {
            Value::String(text) => self.classify(text),
            _ => SentimentResult::NEUTRAL,
        }
    }

    pub fn classify_message<M: MessageText>(&self, message: &M) -> SentimentResult {
        self.classify(&message.scoring_text())
    }

    /// Lazily scores each record in input order.
    pub fn classify_batch<'a, I>(
        &'a self,
        records: I,
    ) -> impl Iterator<Item = SentimentResult> + 'a
    where
        I: IntoIterator,
        I::IntoIter: 'a,
        I::Item: MessageText,
    {
        records
            .into_iter()
            .map(move |record| self.classify_message(&record))
    }

    pub fn aggregate_stats<I>(&self, records: I) -> SentimentStats
    where
        I: IntoIterator,
        I::Item: MessageText,
    {
        SentimentStats::from_results(
            records
                .into_iter()
                .map(|record| self.classify_message(&record)),
        )
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn is_word_boundary(haystack: &[u8], at: usize) -> bool {
    let before = at > 0 && is_word_byte(haystack[at - 1]);
    let after = at < haystack.len() && is_word_byte(haystack[at]);
    before != after
}
