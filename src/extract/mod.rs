//! Field scraping over the rendered markdown of a tax form.
//!
//! Rendering PDF pages to markdown happens upstream; these extractors only see
//! text. Every field is best effort: a missing match leaves the field empty
//! (metadata) or zero (amounts).

pub mod int;
pub mod nec;
pub mod w2;

use crate::core::documents::parse_amount;
use crate::core::{DocumentKind, Extracted, IncomeDocument};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub use int::extract_1099_int;
pub use nec::extract_1099_nec;
pub use w2::{extract_w2, W2Boxes};

/// First capture group of `re`, trimmed
pub(crate) fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// First capture group of `re` read as an amount
pub(crate) fn capture_amount(re: &Regex, text: &str) -> Option<Decimal> {
    capture(re, text).map(|s| parse_amount(&s))
}

/// Extraction result of one file, whatever its form type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedFile {
    W2(Extracted<crate::core::W2Document>),
    Int1099(Extracted<crate::core::InterestDocument>),
    Nec1099(Extracted<crate::core::CompensationDocument>),
}

impl ExtractedFile {
    pub fn error(&self) -> Option<&str> {
        match self {
            ExtractedFile::W2(e) => e.error.as_deref(),
            ExtractedFile::Int1099(e) => e.error.as_deref(),
            ExtractedFile::Nec1099(e) => e.error.as_deref(),
        }
    }

    /// The document, unless extraction failed
    pub fn document(&self) -> Option<IncomeDocument> {
        if self.error().is_some() {
            return None;
        }
        Some(match self {
            ExtractedFile::W2(e) => e.document.clone().into(),
            ExtractedFile::Int1099(e) => e.document.clone().into(),
            ExtractedFile::Nec1099(e) => e.document.clone().into(),
        })
    }
}

/// Extract one rendered form. Unreadable or empty files become failed records.
pub fn extract_file(path: &Path, kind: DocumentKind) -> ExtractedFile {
    let source_file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    let text = match fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => Ok(text),
        Ok(_) => Err("Failed to extract data: no text found".to_string()),
        Err(e) => Err(format!("Failed to extract data: {e}")),
    };

    match text {
        Ok(text) => {
            log::info!("Extracting {} from {}", kind, path.display());
            extract_text(&text, kind, source_file)
        }
        Err(message) => {
            log::warn!("{}: {}", path.display(), message);
            match kind {
                DocumentKind::W2 => ExtractedFile::W2(Extracted::failed(source_file, message)),
                DocumentKind::Int1099 => {
                    ExtractedFile::Int1099(Extracted::failed(source_file, message))
                }
                DocumentKind::Nec1099 => {
                    ExtractedFile::Nec1099(Extracted::failed(source_file, message))
                }
            }
        }
    }
}

/// Extract a form from text already in memory
pub fn extract_text(text: &str, kind: DocumentKind, source_file: Option<String>) -> ExtractedFile {
    match kind {
        DocumentKind::W2 => {
            let boxes = extract_w2(text);
            ExtractedFile::W2(Extracted::ok(boxes.into_document(source_file)))
        }
        DocumentKind::Int1099 => {
            let mut doc = extract_1099_int(text);
            doc.source_file = source_file;
            ExtractedFile::Int1099(Extracted::ok(doc))
        }
        DocumentKind::Nec1099 => {
            let mut doc = extract_1099_nec(text);
            doc.source_file = source_file;
            ExtractedFile::Nec1099(Extracted::ok(doc))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file_becomes_failed_record() {
        let result = extract_file(&PathBuf::from("no/such/w2.md"), DocumentKind::W2);
        assert!(result
            .error()
            .is_some_and(|e| e.starts_with("Failed to extract data")));
        assert!(result.document().is_none());
        match result {
            ExtractedFile::W2(e) => assert_eq!(e.document.source_file.as_deref(), Some("w2.md")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn extract_text_sets_source_file() {
        let result = extract_text("", DocumentKind::Nec1099, Some("nec.md".to_string()));
        let doc = result.document().unwrap();
        assert_eq!(doc.kind(), DocumentKind::Nec1099);
        match doc {
            IncomeDocument::Compensation(nec) => {
                assert_eq!(nec.source_file.as_deref(), Some("nec.md"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
