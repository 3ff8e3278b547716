// src/resume/name.rs
//! Candidate name heuristic: first singular proper noun in the document.
//!
//! Tokenization and tagging are deliberately small. Any tagger that
//! implements [`PosTagger`] can be plugged into [`NameExtractor`].

use std::collections::HashSet;
use std::sync::OnceLock;

pub const NAME_NOT_FOUND: &str = "Not Found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    ProperNoun,
    CardinalNumber,
    Punctuation,
    FunctionWord,
    Word,
}

pub trait PosTagger: Send + Sync {
    fn tag(&self, token: &str) -> PosTag;

    fn tag_all<'a>(&self, tokens: &'a [String]) -> Vec<(&'a str, PosTag)> {
        tokens.iter().map(|t| (t.as_str(), self.tag(t))).collect()
    }
}

/// Split text into word and punctuation tokens. Clitics such as `'s`
/// and `n't` become their own tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for chunk in text.split_whitespace() {
        let chars: Vec<char> = chunk.chars().collect();
        let mut word = String::new();

        for (i, &c) in chars.iter().enumerate() {
            let next_is_alnum = chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
            let joins_word = !word.is_empty() && next_is_alnum && matches!(c, '\'' | '-' | '.' | '’');

            if c.is_alphanumeric() || joins_word {
                word.push(c);
            } else {
                push_word(&mut tokens, &mut word);
                tokens.push(c.to_string());
            }
        }
        push_word(&mut tokens, &mut word);
    }

    tokens
}

fn push_word(tokens: &mut Vec<String>, word: &mut String) {
    if word.is_empty() {
        return;
    }
    let current = std::mem::take(word);
    let normalized = current.replace('’', "'");

    // Offsets come from `normalized`; lowercasing can change byte lengths.
    let split = normalized.len().saturating_sub(3);
    if split > 0
        && normalized
            .get(split..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case("n't"))
    {
        tokens.push(normalized[..split].to_string());
        tokens.push(normalized[split..].to_string());
        return;
    }

    if let Some(pos) = normalized.rfind('\'') {
        let suffix = normalized[pos + 1..].to_lowercase();
        if pos > 0 && matches!(suffix.as_str(), "s" | "re" | "ve" | "ll" | "d" | "m") {
            tokens.push(normalized[..pos].to_string());
            tokens.push(normalized[pos..].to_string());
            return;
        }
    }

    tokens.push(current);
}

fn function_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| {
        [
            // determiners and pronouns
            "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her",
            "its", "our", "their", "i", "me", "you", "he", "she", "it", "we", "they", "them",
            "us", "him", "who", "whom", "which", "what", "each", "every", "all", "some", "any",
            "no", "both",
            // prepositions and conjunctions
            "in", "on", "at", "by", "for", "with", "from", "to", "of", "into", "over", "under",
            "about", "as", "and", "or", "but", "nor", "so", "yet", "if", "while", "since",
            "during", "through", "across", "per", "via", "within", "including",
            // auxiliaries
            "is", "am", "are", "was", "were", "be", "been", "being", "has", "have", "had",
            "do", "does", "did", "can", "could", "will", "would", "shall", "should", "may",
            "might", "must", "not",
        ]
        .into_iter()
        .collect()
    })
}

fn section_headings() -> &'static HashSet<&'static str> {
    static HEADINGS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    HEADINGS.get_or_init(|| {
        [
            "resume", "résumé", "curriculum", "vitae", "cv", "summary", "profile", "objective",
            "experience", "education", "skills", "contact", "email", "phone", "address",
            "projects", "certifications", "languages", "references", "employment", "history",
            "professional", "work", "personal", "details", "name",
        ]
        .into_iter()
        .collect()
    })
}

/// Capitalization based tagger with closed-class word lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTagger;

impl PosTagger for HeuristicTagger {
    fn tag(&self, token: &str) -> PosTag {
        if token.chars().all(|c| !c.is_alphanumeric()) {
            return PosTag::Punctuation;
        }

        if token.chars().next().is_some_and(|c| c.is_ascii_digit())
            && token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
        {
            return PosTag::CardinalNumber;
        }

        let lower = token.to_lowercase();
        if function_words().contains(lower.as_str()) || lower.starts_with('\'') || lower == "n't" {
            return PosTag::FunctionWord;
        }

        let starts_upper = token.chars().next().is_some_and(char::is_uppercase);
        let is_word = token
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, '\'' | '-' | '.'));

        if starts_upper && is_word && !section_headings().contains(lower.as_str()) {
            PosTag::ProperNoun
        } else {
            PosTag::Word
        }
    }
}

pub struct NameExtractor<T: PosTagger = HeuristicTagger> {
    tagger: T,
}

impl NameExtractor<HeuristicTagger> {
    pub fn new() -> Self {
        Self {
            tagger: HeuristicTagger,
        }
    }
}

impl Default for NameExtractor<HeuristicTagger> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PosTagger> NameExtractor<T> {
    pub fn with_tagger(tagger: T) -> Self {
        Self { tagger }
    }

    /// First proper noun token, or [`NAME_NOT_FOUND`].
    pub fn extract(&self, text: &str) -> String {
        let tokens = tokenize(text);
        self.tagger
            .tag_all(&tokens)
            .into_iter()
            .find(|(_, tag)| *tag == PosTag::ProperNoun)
            .map(|(token, _)| token.to_string())
            .unwrap_or_else(|| NAME_NOT_FOUND.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_punctuation_and_clitics() {
        assert_eq!(
            tokenize("Jane's résumé (2024): Node.js, don't."),
            vec!["Jane", "'s", "résumé", "(", "2024", ")", ":", "Node.js", ",", "do", "n't", "."]
        );
    }

    #[test]
    fn test_tokenize_case_folding_that_changes_byte_length() {
        // U+212A KELVIN SIGN lowercases to one byte, U+0130 to three.
        assert_eq!(tokenize("\u{212A}'s"), vec!["\u{212A}", "'s"]);
        assert_eq!(tokenize("\u{130}\u{130}'s"), vec!["\u{130}\u{130}", "'s"]);
        assert_eq!(tokenize("\u{130}SN'T"), vec!["\u{130}S", "N'T"]);

        let name = NameExtractor::new().extract("\u{212A}'s résumé");
        assert!(!name.is_empty());
    }

    #[test]
    fn test_tagger_classes() {
        let tagger = HeuristicTagger;
        assert_eq!(tagger.tag("Jane"), PosTag::ProperNoun);
        assert_eq!(tagger.tag("SQL"), PosTag::ProperNoun);
        assert_eq!(tagger.tag("The"), PosTag::FunctionWord);
        assert_eq!(tagger.tag("3"), PosTag::CardinalNumber);
        assert_eq!(tagger.tag("2,500.50"), PosTag::CardinalNumber);
        assert_eq!(tagger.tag("."), PosTag::Punctuation);
        assert_eq!(tagger.tag("experience"), PosTag::Word);
        assert_eq!(tagger.tag("Skills"), PosTag::Word);
        assert_eq!(tagger.tag("Python3"), PosTag::Word);
    }

    #[test]
    fn test_extract_first_proper_noun() {
        let extractor = NameExtractor::new();
        let name = extractor.extract("Jane Doe has 3 years of experience in Python and SQL.");
        assert!(name == "Jane" || name == "Doe");
    }

    #[test]
    fn test_headings_are_skipped() {
        let extractor = NameExtractor::new();
        assert_eq!(extractor.extract("RESUME\nSummary\nJohn Smith"), "John");
    }

    #[test]
    fn test_no_proper_noun_returns_sentinel() {
        let extractor = NameExtractor::new();
        assert_eq!(
            extractor.extract("has 3 years of experience in python and sql."),
            NAME_NOT_FOUND
        );
        assert_eq!(extractor.extract(""), NAME_NOT_FOUND);
    }

    struct NothingIsProper;

    impl PosTagger for NothingIsProper {
        fn tag(&self, _token: &str) -> PosTag {
            PosTag::Word
        }
    }

    #[test]
    fn test_custom_tagger() {
        let extractor = NameExtractor::with_tagger(NothingIsProper);
        assert_eq!(extractor.extract("Jane Doe"), NAME_NOT_FOUND);
    }
}
