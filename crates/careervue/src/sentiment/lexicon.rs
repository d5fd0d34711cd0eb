use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use aho_corasick::{AhoCorasick, MatchKind};
use serde::Deserialize;

const POSITIVE_TERMS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "awesome",
    "perfect",
    "outstanding",
    "superb",
    "brilliant",
    "impressive",
    "love",
    "best",
    "helpful",
    "satisfied",
    "happy",
    "pleased",
    "thank",
    "thanks",
    "appreciate",
    "grateful",
    "recommend",
    "professional",
    "quality",
    "efficient",
    "smooth",
    "easy",
    "user-friendly",
    "reliable",
    "fast",
    "quick",
    "responsive",
    "beautiful",
    "modern",
    "clean",
    "intuitive",
    "useful",
    "valuable",
    "top-notch",
];

const NEGATIVE_TERMS: &[&str] = &[
    "bad",
    "poor",
    "terrible",
    "awful",
    "horrible",
    "worst",
    "hate",
    "disappointed",
    "frustrating",
    "slow",
    "difficult",
    "confusing",
    "complicated",
    "broken",
    "error",
    "bug",
    "issue",
    "problem",
    "fail",
    "failed",
    "wrong",
    "not working",
    "doesnt work",
    "useless",
    "waste",
    "annoying",
    "irritating",
    "outdated",
    "old",
    "ugly",
    "messy",
    "hard",
    "impossible",
    "never",
    "cant",
];

/// Which side of the lexicon a term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Polarity {
    Positive,
    Negative,
}

/// Errors raised while assembling a lexicon.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("lexicon terms must not be blank")]
    EmptyTerm,
    #[error("term '{0}' appears in both the positive and negative lists")]
    Overlap(String),
    #[error("unable to read lexicon file: {0}")]
    Io(#[from] std::io::Error),
    #[error("lexicon file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to compile lexicon matcher: {0}")]
    Build(#[from] aho_corasick::BuildError),
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    positive: Vec<String>,
    negative: Vec<String>,
}

/// Positive and negative keyword sets compiled into a single matcher.
///
/// Terms are stored trimmed and lowercased. The two sets are disjoint; construction
/// fails otherwise. Once built the lexicon is immutable and can be shared freely.
#[derive(Debug, Clone)]
pub struct Lexicon {
    positive: BTreeSet<String>,
    negative: BTreeSet<String>,
    matcher: AhoCorasick,
    polarities: Vec<Polarity>,
}

impl Lexicon {
    /// The portal's stock vocabulary.
    pub fn builtin() -> Self {
        Self::new(POSITIVE_TERMS.iter().copied(), NEGATIVE_TERMS.iter().copied())
            .unwrap_or_else(|err| unreachable!("built-in lexicon is well formed: {err}"))
    }

    pub fn new<P, N, S, T>(positive: P, negative: N) -> Result<Self, LexiconError>
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let positive = normalize_terms(positive)?;
        let negative = normalize_terms(negative)?;

        if let Some(shared) = positive.intersection(&negative).next() {
            return Err(LexiconError::Overlap(shared.clone()));
        }

        let mut patterns = Vec::with_capacity(positive.len() + negative.len());
        let mut polarities = Vec::with_capacity(positive.len() + negative.len());
        for term in &positive {
            patterns.push(term.as_str());
            polarities.push(Polarity::Positive);
        }
        for term in &negative {
            patterns.push(term.as_str());
            polarities.push(Polarity::Negative);
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)?;

        Ok(Self {
            positive,
            negative,
            matcher,
            polarities,
        })
    }

    /// Load a lexicon from a `{ "positive": [...], "negative": [...] }` document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_reader(reader)?;
        Self::new(file.positive, file.negative)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn positive_terms(&self) -> impl Iterator<Item = &str> {
        self.positive.iter().map(String::as_str)
    }

    pub fn negative_terms(&self) -> impl Iterator<Item = &str> {
        self.negative.iter().map(String::as_str)
    }

    pub(crate) fn matcher(&self) -> &AhoCorasick {
        &self.matcher
    }

    pub(crate) fn polarity(&self, pattern: usize) -> Polarity {
        self.polarities[pattern]
    }

    pub(crate) fn pattern_count(&self) -> usize {
        self.polarities.len()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_terms<I, S>(terms: I) -> Result<BTreeSet<String>, LexiconError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|term| {
            let term = term.as_ref().trim().to_lowercase();
            if term.is_empty() {
                Err(LexiconError::EmptyTerm)
            } else {
                Ok(term)
            }
        })
        .collect()
}
