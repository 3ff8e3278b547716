// src/utils.rs
use anyhow::Result;
use std::path::Path;

use crate::resume::TextExtractor;

/// Treat `value` as a document path when such a file exists, otherwise as
/// the literal text.
pub async fn read_text_input(value: &str) -> Result<String> {
    let path = Path::new(value);
    if path.is_file() {
        TextExtractor::extract_file(path).await
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_text_input_from_file_or_literal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jd.txt");
        std::fs::write(&path, "Rust and SQL").unwrap();

        let from_file = read_text_input(path.to_str().unwrap()).await.unwrap();
        assert_eq!(from_file, "Rust and SQL");

        let literal = read_text_input("Looking for a Python developer").await.unwrap();
        assert_eq!(literal, "Looking for a Python developer");
    }
}
