// src/skills/matcher.rs
//! Substring skill matching against a shared vocabulary.
//!
//! Matching is plain case-insensitive containment with no word-boundary
//! check, so short entries such as "r" or "go" match inside longer words.

use std::sync::Arc;

use super::SkillVocabulary;

#[derive(Debug, Clone)]
pub struct SkillMatcher {
    vocabulary: Arc<SkillVocabulary>,
}

impl SkillMatcher {
    pub fn new(vocabulary: Arc<SkillVocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    /// Vocabulary entries found in `text`, in vocabulary order.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        self.vocabulary
            .iter()
            .filter(|skill| text.contains(skill))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(skills: &[&str]) -> SkillMatcher {
        SkillMatcher::new(Arc::new(SkillVocabulary::new(skills.iter().copied())))
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        let m = matcher(&["python", "sql", "java"]);
        let found = m.extract("Jane Doe has 3 years of experience in Python and SQL.");
        assert_eq!(found, vec!["python", "sql"]);
    }

    #[test]
    fn test_extract_matches_inside_words() {
        // No word boundary check: "r" hits any word containing the letter.
        let m = matcher(&["r", "java"]);
        assert_eq!(m.extract("Rust developer"), vec!["r"]);
        assert_eq!(m.extract("JavaScript"), vec!["r", "java"]);
        assert!(m.extract("Go, Python").is_empty());
    }

    #[test]
    fn test_results_are_vocabulary_substrings() {
        let m = SkillMatcher::new(Arc::new(SkillVocabulary::builtin()));
        let text = "Built REST services with Node.js, Docker and Kubernetes on AWS; \
                    tuned PostgreSQL and wrote C++ tooling.";
        let lowered = text.to_lowercase();
        let found = m.extract(text);

        assert!(!found.is_empty());
        for skill in &found {
            assert!(m.vocabulary().contains(skill));
            assert!(lowered.contains(skill.as_str()));
        }
        assert!(found.contains(&"docker".to_string()));
        assert!(found.contains(&"postgresql".to_string()));
    }

    #[test]
    fn test_empty_text_finds_nothing() {
        let m = matcher(&["python"]);
        assert!(m.extract("").is_empty());
    }
}
