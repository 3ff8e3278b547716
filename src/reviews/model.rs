// src/reviews/model.rs
//! Summarization and sentiment labeling backends.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::info;

use super::ReviewRecord;
use crate::config::ModelConfig;
use crate::core::ModelServiceClient;

/// Reviews fed to the summarizer; the rest are dropped, not chunked.
pub const SUMMARY_REVIEW_LIMIT: usize = 500;

const SUMMARY_SENTENCES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: Sentiment,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabeledReview {
    pub review: String,
    pub star_rating: String,
    pub sentiment: Sentiment,
    pub score: f64,
}

pub enum ReviewModel {
    Service(ModelServiceClient),
    Lexicon(LexiconModel),
}

impl ReviewModel {
    /// Remote model service when a URL is configured, otherwise the
    /// built-in lexicon model.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        match &config.service_url {
            Some(url) => {
                info!("Using review model service at {}", url);
                Ok(Self::Service(ModelServiceClient::new(
                    url.clone(),
                    config.timeout_seconds,
                )?))
            }
            None => {
                info!("No review model service configured, using lexicon model");
                Ok(Self::Lexicon(LexiconModel))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Service(_) => "service",
            Self::Lexicon(_) => "lexicon",
        }
    }

    pub async fn summarize(&self, reviews: &[ReviewRecord]) -> Result<String> {
        if reviews.is_empty() {
            anyhow::bail!("No reviews to summarize");
        }
        let text = summary_input(reviews);

        match self {
            Self::Service(client) => client.summarize(&text).await,
            Self::Lexicon(model) => Ok(model.summarize(&text)),
        }
    }

    pub async fn label(&self, reviews: &[ReviewRecord]) -> Result<Vec<LabeledReview>> {
        let texts: Vec<&str> = reviews.iter().map(|r| r.review.as_str()).collect();

        let scores = match self {
            Self::Service(client) => client.sentiment(&texts).await?,
            Self::Lexicon(model) => texts.iter().map(|t| model.classify(t)).collect(),
        };

        if scores.len() != reviews.len() {
            anyhow::bail!(
                "Sentiment model returned {} labels for {} reviews",
                scores.len(),
                reviews.len()
            );
        }

        Ok(reviews
            .iter()
            .zip(scores)
            .map(|(record, score)| LabeledReview {
                review: record.review.clone(),
                star_rating: record.star_rating.clone(),
                sentiment: score.label,
                score: score.score,
            })
            .collect())
    }
}

/// Space-joined text of the first [`SUMMARY_REVIEW_LIMIT`] reviews.
pub fn summary_input(reviews: &[ReviewRecord]) -> String {
    reviews
        .iter()
        .take(SUMMARY_REVIEW_LIMIT)
        .map(|r| r.review.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn positive_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| {
        [
            "good", "great", "excellent", "amazing", "awesome", "love", "loved", "loves",
            "perfect", "best", "happy", "nice", "recommend", "recommended", "fantastic",
            "wonderful", "easy", "sturdy", "comfortable", "fast", "quality", "works", "worth",
            "satisfied", "reliable", "beautiful", "solid", "pleased", "superb", "value",
        ]
        .into_iter()
        .collect()
    })
}

fn negative_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| {
        [
            "bad", "poor", "terrible", "awful", "worst", "hate", "hated", "broke", "broken",
            "waste", "disappointed", "disappointing", "useless", "cheap", "defective", "return",
            "returned", "refund", "slow", "flimsy", "horrible", "junk", "problem", "problems",
            "stopped", "failed", "fails", "noisy", "leaks", "unhappy",
        ]
        .into_iter()
        .collect()
    })
}

fn negators() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| {
        ["not", "no", "never", "isn't", "wasn't", "don't", "doesn't", "didn't", "hardly"]
            .into_iter()
            .collect()
    })
}

fn stop_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| {
        [
            "the", "and", "for", "this", "that", "with", "was", "are", "but", "have", "has",
            "you", "not", "its", "it's", "they", "them", "from", "had", "were", "would", "will",
            "can", "all", "one", "very", "just", "than", "then", "too", "out", "get", "got",
        ]
        .into_iter()
        .collect()
    })
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Offline fallback: word-list sentiment and frequency-scored extractive
/// summaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconModel;

impl LexiconModel {
    pub fn classify(&self, text: &str) -> SentimentScore {
        let mut positive = 0usize;
        let mut negative = 0usize;
        let mut negated = false;

        for word in words(text) {
            if negators().contains(word.as_str()) {
                negated = true;
                continue;
            }
            let polarity = if positive_words().contains(word.as_str()) {
                Some(true)
            } else if negative_words().contains(word.as_str()) {
                Some(false)
            } else {
                None
            };
            if let Some(is_positive) = polarity {
                if is_positive != negated {
                    positive += 1;
                } else {
                    negative += 1;
                }
                negated = false;
            }
        }

        let hits = positive + negative;
        let margin = positive.abs_diff(negative) as f64;
        let score = if hits == 0 {
            0.5
        } else {
            0.5 + 0.5 * margin / hits as f64
        };
        let label = if negative > positive {
            Sentiment::Negative
        } else {
            Sentiment::Positive
        };

        SentimentScore { label, score }
    }

    /// The highest-scoring sentences, in their original order.
    pub fn summarize(&self, text: &str) -> String {
        let sentences: Vec<&str> = text
            .split_inclusive(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if sentences.len() <= SUMMARY_SENTENCES {
            return sentences.join(" ");
        }

        let mut frequency: HashMap<String, usize> = HashMap::new();
        for word in words(text).filter(|w| w.len() > 2 && !stop_words().contains(w.as_str())) {
            *frequency.entry(word).or_default() += 1;
        }

        let mut scored: Vec<(usize, f64)> = sentences
            .iter()
            .enumerate()
            .map(|(index, sentence)| {
                let tokens: Vec<String> = words(sentence).collect();
                let total: usize = tokens
                    .iter()
                    .filter_map(|t| frequency.get(t))
                    .sum();
                let score = if tokens.is_empty() {
                    0.0
                } else {
                    total as f64 / tokens.len() as f64
                };
                (index, score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        let mut chosen: Vec<usize> = scored
            .into_iter()
            .take(SUMMARY_SENTENCES)
            .map(|(index, _)| index)
            .collect();
        chosen.sort_unstable();

        chosen
            .into_iter()
            .map(|index| sentences[index])
            .collect::<Vec<_>>()
            .join(" ")
    }
}
