// src/skills/mod.rs
pub mod matcher;
pub mod vocabulary;

pub use matcher::SkillMatcher;
pub use vocabulary::SkillVocabulary;
