// src/scoring/tfidf.rs
//! TF-IDF vectors and cosine similarity over a small in-memory corpus.
//!
//! Weighting follows the usual defaults: lower-cased `\b\w\w+\b` tokens,
//! raw term counts, smoothed idf `ln((1 + n) / (1 + df)) + 1`, and
//! L2-normalised rows.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

pub fn tokenize(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[derive(Debug, Default, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terms in column order.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> + '_ {
        self.vocabulary.keys().map(String::as_str)
    }

    /// Learn vocabulary and idf weights from `documents` and return one
    /// L2-normalised row per document. A document with no tokens maps to
    /// the zero vector.
    pub fn fit_transform(&mut self, documents: &[&str]) -> Vec<Vec<f64>> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();

        let terms: HashSet<&String> = tokenized.iter().flatten().collect();
        let mut sorted: Vec<&String> = terms.into_iter().collect();
        sorted.sort();
        self.vocabulary = sorted
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.clone(), index))
            .collect();

        let n = documents.len() as f64;
        let mut df = vec![0usize; self.vocabulary.len()];
        for tokens in &tokenized {
            let unique: HashSet<usize> = tokens.iter().map(|t| self.vocabulary[t]).collect();
            for index in unique {
                df[index] += 1;
            }
        }
        self.idf = df
            .iter()
            .map(|&count| ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0)
            .collect();

        tokenized
            .iter()
            .map(|tokens| {
                let mut row = vec![0.0; self.vocabulary.len()];
                for token in tokens {
                    row[self.vocabulary[token]] += 1.0;
                }
                for (value, idf) in row.iter_mut().zip(&self.idf) {
                    *value *= idf;
                }
                l2_normalize(&mut row);
                row
            })
            .collect()
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|v| *v /= norm);
    }
}

/// Cosine similarity; zero when either vector has zero length.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_single_characters() {
        assert_eq!(
            tokenize("Node.js, C++ and R"),
            vec!["node", "js", "and"]
        );
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit_transform(&["sql python", "java"]);
        let terms: Vec<&str> = vectorizer.vocabulary().collect();
        assert_eq!(terms, vec!["java", "python", "sql"]);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let mut vectorizer = TfIdfVectorizer::new();
        let rows = vectorizer.fit_transform(&["python sql sql", "python java"]);
        for row in rows {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_smoothed_idf_weights() {
        let mut vectorizer = TfIdfVectorizer::new();
        let rows = vectorizer.fit_transform(&["python sql", "python java"]);
        let similarity = cosine_similarity(&rows[0], &rows[1]);

        // shared term idf = 1, unique term idf = ln(3/2) + 1
        let unique = (1.5f64).ln() + 1.0;
        let expected = 1.0 / (1.0 + unique * unique);
        assert!((similarity - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_document_is_zero_vector() {
        let mut vectorizer = TfIdfVectorizer::new();
        let rows = vectorizer.fit_transform(&["", "python"]);
        assert!(rows[0].iter().all(|v| *v == 0.0));
        assert_eq!(cosine_similarity(&rows[0], &rows[1]), 0.0);
    }
}
