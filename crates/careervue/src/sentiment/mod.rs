//! Keyword sentiment scoring for contact messages.
//!
//! A [`Lexicon`] is compiled once into a single multi-pattern matcher and injected into a
//! [`SentimentScorer`]. Each term counts on whole-word hits only, and the net balance of
//! positive against negative hits yields a score in `[-1, 1]`.

mod lexicon;
mod record;
mod scorer;
mod stats;

pub use lexicon::{Lexicon, LexiconError};
pub use record::{MessageRecord, MessageText};
pub use scorer::{Sentiment, SentimentResult, SentimentScorer};
pub use stats::SentimentStats;
