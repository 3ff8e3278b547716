// src/resume/text_extractor.rs
//! Document-to-text conversion for uploaded resumes.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Sniff the document type from its leading bytes.
    pub fn detect(bytes: &[u8]) -> Result<Self> {
        let head = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .map(|start| &bytes[start..])
            .unwrap_or_default();

        if head.starts_with(PDF_MAGIC) {
            Ok(Self::Pdf)
        } else if std::str::from_utf8(bytes).is_ok() {
            Ok(Self::PlainText)
        } else {
            anyhow::bail!("Unsupported document format: expected a PDF or UTF-8 text file")
        }
    }
}

pub struct TextExtractor;

impl TextExtractor {
    /// Read a document from disk and return its text.
    pub async fn extract_file(path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read document: {}", path.display()))?;

        let text = Self::extract_bytes(bytes).await?;
        info!(
            "Extracted {} characters from {}",
            text.len(),
            path.display()
        );
        Ok(text)
    }

    /// Convert raw document bytes to text. PDF decoding runs on the
    /// blocking pool; a panicking decoder surfaces as an error.
    pub async fn extract_bytes(bytes: Vec<u8>) -> Result<String> {
        match DocumentKind::detect(&bytes)? {
            DocumentKind::PlainText => {
                debug!("Document detected as plain text");
                String::from_utf8(bytes).context("Document is not valid UTF-8")
            }
            DocumentKind::Pdf => {
                debug!("Document detected as PDF");
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await
                    .context("PDF extraction task failed")?
                    .map_err(|e| anyhow::anyhow!("Failed to extract text from PDF: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pdf_magic() {
        assert_eq!(
            DocumentKind::detect(b"%PDF-1.7\n...").unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::detect(b"\n  %PDF-1.4").unwrap(),
            DocumentKind::Pdf
        );
    }

    #[test]
    fn test_detect_plain_text() {
        assert_eq!(
            DocumentKind::detect("Jane Doe, résumé".as_bytes()).unwrap(),
            DocumentKind::PlainText
        );
    }

    #[test]
    fn test_detect_rejects_binary() {
        assert!(DocumentKind::detect(&[0xff, 0xfe, 0x00, 0x9f]).is_err());
    }

    #[tokio::test]
    async fn test_extract_file_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        tokio::fs::write(&path, "Jane Doe\n5 years of experience")
            .await
            .unwrap();

        let text = TextExtractor::extract_file(&path).await.unwrap();
        assert!(text.contains("5 years of experience"));
    }

    /// Single-page PDF showing `line` in Helvetica, with a correct xref table.
    fn one_page_pdf(line: &str) -> Vec<u8> {
        let content = format!("BT /F1 18 Tf 72 720 Td ({}) Tj ET", line);
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }

        let xref_start = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        pdf.push_str("0000000000 65535 f \n");
        for offset in offsets {
            pdf.push_str(&format!("{:010} 00000 n \n", offset));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        ));
        pdf.into_bytes()
    }

    #[tokio::test]
    async fn test_extract_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        tokio::fs::write(&path, one_page_pdf("Jane Doe Python SQL"))
            .await
            .unwrap();

        let text = TextExtractor::extract_file(&path).await.unwrap();
        let compact: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(compact.contains("Python"), "extracted: {:?}", text);
        assert!(compact.contains("Jane"), "extracted: {:?}", text);
    }

    #[tokio::test]
    async fn test_extract_corrupt_pdf_fails() {
        let result = TextExtractor::extract_bytes(b"%PDF-1.4\nnot really a pdf".to_vec()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_extract_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TextExtractor::extract_file(&dir.path().join("missing.pdf"))
            .await
            .is_err());
    }
}
