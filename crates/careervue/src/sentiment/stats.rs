use serde::Serialize;

use super::scorer::{Sentiment, SentimentResult};

/// Bucket counts and averages over a set of scored messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentStats {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub average_score: f64,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
}

impl SentimentStats {
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = SentimentResult>,
    {
        let mut stats = Self::default();
        let mut score_sum = 0.0;

        for result in results {
            stats.total += 1;
            score_sum += result.score;
            match result.sentiment {
                Sentiment::Positive => stats.positive += 1,
                Sentiment::Negative => stats.negative += 1,
                Sentiment::Neutral => stats.neutral += 1,
            }
        }

        if stats.total > 0 {
            let total = stats.total as f64;
            stats.average_score = score_sum / total;
            stats.positive_percentage = percentage(stats.positive, total);
            stats.negative_percentage = percentage(stats.negative, total);
            stats.neutral_percentage = percentage(stats.neutral, total);
        }

        stats
    }
}

fn percentage(count: usize, total: f64) -> f64 {
    count as f64 / total * 100.0
}
