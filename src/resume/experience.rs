// src/resume/experience.rs
use regex::Regex;
use std::sync::OnceLock;

fn experience_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)\s+years? of experience").expect("experience pattern is valid")
    })
}

/// Number from the first "<N> year(s) of experience" phrase, if any.
pub fn extract_experience(text: &str) -> Option<String> {
    experience_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_experience() {
        assert_eq!(
            extract_experience("Engineer with 5 years of experience in Rust"),
            Some("5".to_string())
        );
        assert_eq!(
            extract_experience("1 year of experience"),
            Some("1".to_string())
        );
    }

    #[test]
    fn test_first_match_wins() {
        let text = "12 years of experience overall, 3 years of experience leading teams";
        assert_eq!(extract_experience(text), Some("12".to_string()));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(extract_experience("Five years of experience"), None);
        assert_eq!(extract_experience("5 years experience"), None);
        assert_eq!(extract_experience("5 Years of Experience"), None);
        assert_eq!(extract_experience(""), None);
    }

    #[test]
    fn test_whitespace_between_number_and_years() {
        assert_eq!(
            extract_experience("over 7\n years of experience"),
            Some("7".to_string())
        );
    }
}
