// src/resume/mod.rs
//! Resume parsing pipeline: text → name, skills, experience.

pub mod experience;
pub mod name;
pub mod text_extractor;

pub use experience::extract_experience;
pub use name::{HeuristicTagger, NameExtractor, PosTag, PosTagger, NAME_NOT_FOUND};
pub use text_extractor::{DocumentKind, TextExtractor};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::skills::SkillMatcher;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub name: String,
    pub skills: Vec<String>,
    pub experience: Option<String>,
}

pub struct ResumeParser {
    matcher: SkillMatcher,
    names: NameExtractor,
}

impl ResumeParser {
    pub fn new(matcher: SkillMatcher) -> Self {
        Self {
            matcher,
            names: NameExtractor::new(),
        }
    }

    pub fn matcher(&self) -> &SkillMatcher {
        &self.matcher
    }

    pub fn parse_text(&self, text: &str) -> ParsedResume {
        let parsed = ParsedResume {
            name: self.names.extract(text),
            skills: self.matcher.extract(text),
            experience: extract_experience(text),
        };

        info!(
            "Parsed resume: name={}, {} skills, experience={}",
            parsed.name,
            parsed.skills.len(),
            parsed.experience.as_deref().unwrap_or("None")
        );
        parsed
    }

    pub async fn parse_file(&self, path: &Path) -> Result<ParsedResume> {
        let text = TextExtractor::extract_file(path).await?;
        Ok(self.parse_text(&text))
    }
}
