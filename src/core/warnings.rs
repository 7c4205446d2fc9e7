use super::documents::DocumentKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Data quality issues found while reading documents. None of them stop a computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Extraction failed; the record was left out of the return.
    ExtractionFailed {
        kind: DocumentKind,
        source_file: Option<String>,
        message: String,
    },
    /// No payer/employer or taxpayer identifiers were recovered.
    MissingIdentity {
        kind: DocumentKind,
        source_file: Option<String>,
    },
    /// Same content submitted more than once. Each copy still counts.
    DuplicateDocument {
        kind: DocumentKind,
        fingerprint: String,
        count: usize,
    },
}

impl Warning {
    pub fn type_name(&self) -> &'static str {
        match self {
            Warning::ExtractionFailed { .. } => "ExtractionFailed",
            Warning::MissingIdentity { .. } => "MissingIdentity",
            Warning::DuplicateDocument { .. } => "DuplicateDocument",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Warning::ExtractionFailed {
                kind,
                source_file,
                message,
            } => format!(
                "{} {} excluded: {}",
                kind,
                source_file.as_deref().unwrap_or("(unnamed)"),
                message
            ),
            Warning::MissingIdentity { kind, source_file } => format!(
                "{} {} has no identifying details - check the extraction",
                kind,
                source_file.as_deref().unwrap_or("(unnamed)")
            ),
            Warning::DuplicateDocument {
                kind,
                fingerprint,
                count,
            } => format!(
                "{} submitted {} times (fingerprint {}) - every copy is counted",
                kind,
                count,
                &fingerprint[..fingerprint.len().min(12)]
            ),
        }
    }
}
