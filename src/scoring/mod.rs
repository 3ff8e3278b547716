// src/scoring/mod.rs
//! Resume-to-job-description scoring.

pub mod tfidf;

pub use tfidf::{cosine_similarity, TfIdfVectorizer};

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityReport {
    pub score: f64,
    pub resume_skills: Vec<String>,
    pub required_skills: Vec<String>,
}

/// TF-IDF cosine similarity between two skill lists, in [0, 1].
///
/// Each list is joined into one whitespace separated document. Empty
/// lists, and lists whose entries produce no tokens, score 0.0.
pub fn similarity_score(resume_skills: &[String], required_skills: &[String]) -> f64 {
    if resume_skills.is_empty() || required_skills.is_empty() {
        return 0.0;
    }

    let resume_doc = join_skills(resume_skills);
    let required_doc = join_skills(required_skills);

    let mut vectorizer = TfIdfVectorizer::new();
    let rows = vectorizer.fit_transform(&[resume_doc.as_str(), required_doc.as_str()]);

    cosine_similarity(&rows[0], &rows[1]).clamp(0.0, 1.0)
}

pub fn score_report(resume_skills: Vec<String>, required_skills: Vec<String>) -> SimilarityReport {
    SimilarityReport {
        score: similarity_score(&resume_skills, &required_skills),
        resume_skills,
        required_skills,
    }
}

fn join_skills(skills: &[String]) -> String {
    skills
        .iter()
        .map(|s| s.trim())
        .collect::<Vec<_>>()
        .join(" ")
}
