//! Return input as produced by the intake and extraction steps.
//!
//! This is where loosely-typed extraction output becomes typed documents.
//! Records flagged with an extraction `error` are dropped here with a warning.

use super::documents::{
    CompensationDocument, DocumentKind, IncomeDocument, InterestDocument, TaxDocument,
    W2Document,
};
use super::profile::TaxpayerProfile;
use super::tax_return::TaxReturn;
use super::warnings::Warning;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

/// An extractor result: a document, or the reason extraction failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Extracted<T> {
    /// Set when extraction failed; the record is then ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub document: T,
}

impl<T> Extracted<T> {
    pub fn ok(document: T) -> Self {
        Extracted {
            error: None,
            document,
        }
    }
}

impl<T: Default> Extracted<T> {
    pub fn failed(source_file: Option<String>, error: impl Into<String>) -> Self
    where
        T: WithSource,
    {
        let mut document = T::default();
        document.set_source_file(source_file);
        Extracted {
            error: Some(error.into()),
            document,
        }
    }
}

/// Documents that remember which file they came from
pub trait WithSource {
    fn set_source_file(&mut self, source_file: Option<String>);
}

impl WithSource for W2Document {
    fn set_source_file(&mut self, source_file: Option<String>) {
        self.source_file = source_file;
    }
}

impl WithSource for InterestDocument {
    fn set_source_file(&mut self, source_file: Option<String>) {
        self.source_file = source_file;
    }
}

impl WithSource for CompensationDocument {
    fn set_source_file(&mut self, source_file: Option<String>) {
        self.source_file = source_file;
    }
}

/// Input root for return JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReturnInput {
    #[serde(default)]
    pub taxpayer: TaxpayerProfile,
    #[serde(default)]
    pub w2s: Vec<Extracted<W2Document>>,
    #[serde(default, rename = "1099ints")]
    pub ints: Vec<Extracted<InterestDocument>>,
    #[serde(default, rename = "1099necs")]
    pub necs: Vec<Extracted<CompensationDocument>>,
}

/// Read return input from JSON
pub fn read_return_json<R: Read>(reader: R) -> anyhow::Result<ReturnInput> {
    let input: ReturnInput = serde_json::from_reader(reader)?;
    Ok(input)
}

/// Build a return from input, adding documents in input order.
/// Failed extractions are skipped and reported.
pub fn build_return(input: ReturnInput) -> (TaxReturn, Vec<Warning>) {
    let mut warnings = Vec::new();
    let mut tax_return = TaxReturn::new(input.taxpayer);

    accept_documents(input.w2s, &mut tax_return, &mut warnings);
    accept_documents(input.ints, &mut tax_return, &mut warnings);
    accept_documents(input.necs, &mut tax_return, &mut warnings);

    warnings.extend(duplicate_warnings(&tax_return));
    (tax_return, warnings)
}

fn accept_documents<T>(
    records: Vec<Extracted<T>>,
    tax_return: &mut TaxReturn,
    warnings: &mut Vec<Warning>,
) where
    T: TaxDocument + Into<IncomeDocument>,
{
    for record in records {
        let source_file = record.document.source_file().map(str::to_string);
        if let Some(message) = record.error {
            log::warn!(
                "Excluding {} {}: {}",
                T::KIND,
                source_file.as_deref().unwrap_or("(unnamed)"),
                message
            );
            warnings.push(Warning::ExtractionFailed {
                kind: T::KIND,
                source_file,
                message,
            });
            continue;
        }
        if !record.document.has_identity() {
            warnings.push(Warning::MissingIdentity {
                kind: T::KIND,
                source_file,
            });
        }
        tax_return.add_document(record.document);
    }
}

fn duplicate_warnings(tax_return: &TaxReturn) -> Vec<Warning> {
    let mut seen: HashMap<String, (DocumentKind, usize)> = HashMap::new();
    let mut order = Vec::new();
    for doc in tax_return.documents() {
        let fingerprint = doc.fingerprint();
        let entry = seen.entry(fingerprint.clone()).or_insert_with(|| {
            order.push(fingerprint);
            (doc.kind(), 0)
        });
        entry.1 += 1;
    }

    order
        .into_iter()
        .filter_map(|fingerprint| {
            let (kind, count) = seen[&fingerprint];
            (count > 1).then_some(Warning::DuplicateDocument {
                kind,
                fingerprint,
                count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FilingStatus;
    use rust_decimal_macros::dec;

    const INPUT: &str = r#"{
        "taxpayer": {"first_name": "Jane", "filing_status": "single"},
        "w2s": [
            {"source_file": "w2.pdf", "employer_name": "Acme", "wages": 60000, "federal_tax_withheld": 5000},
            {"source_file": "bad.pdf", "error": "Failed to extract data: no text layer"}
        ],
        "1099ints": [
            {"payer_name": "First Bank", "box1_interest_income": 120.5}
        ],
        "1099necs": [
            {"nonemployee_compensation": "1,500.00"}
        ]
    }"#;

    #[test]
    fn huge_amounts_fail_to_read() {
        let input = r#"{
            "taxpayer": {"filing_status": "single"},
            "w2s": [
                {"wages": "50000000000000000000000000000"},
                {"wages": "50000000000000000000000000000"}
            ]
        }"#;
        let err = read_return_json(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn reads_and_builds_return() {
        let input = read_return_json(INPUT.as_bytes()).unwrap();
        assert_eq!(input.taxpayer.filing_status, Some(FilingStatus::Single));

        let (tax_return, warnings) = build_return(input);
        assert_eq!(tax_return.w2s().len(), 1);
        assert_eq!(tax_return.ints().len(), 1);
        assert_eq!(tax_return.necs().len(), 1);
        assert_eq!(tax_return.totals().wages, dec!(60000));
        assert_eq!(tax_return.totals().interest_income, dec!(120.5));
        assert_eq!(tax_return.totals().self_employment_income, dec!(1500));

        assert_eq!(warnings.len(), 2);
        assert!(matches!(
            &warnings[0],
            Warning::ExtractionFailed { kind: DocumentKind::W2, source_file: Some(f), .. } if f == "bad.pdf"
        ));
        assert!(matches!(
            &warnings[1],
            Warning::MissingIdentity {
                kind: DocumentKind::Nec1099,
                ..
            }
        ));
    }

    #[test]
    fn empty_input_is_valid() {
        let input = read_return_json("{}".as_bytes()).unwrap();
        let (tax_return, warnings) = build_return(input);
        assert_eq!(tax_return.document_count(), 0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn duplicates_reported_but_kept() {
        let doc = r#"{"employer_name": "Acme", "wages": 1000}"#;
        let json = format!(r#"{{"w2s": [{doc}, {doc}, {doc}]}}"#);
        let (tax_return, warnings) = build_return(read_return_json(json.as_bytes()).unwrap());
        assert_eq!(tax_return.w2s().len(), 3);
        assert_eq!(tax_return.totals().wages, dec!(3000));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            Warning::DuplicateDocument { count: 3, .. }
        ));
    }

    #[test]
    fn failed_record_round_trips_through_json() {
        let failed: Extracted<W2Document> =
            Extracted::failed(Some("scan.pdf".to_string()), "no text");
        let json = serde_json::to_string(&failed).unwrap();
        let back: Extracted<W2Document> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.error.as_deref(), Some("no text"));
        assert_eq!(back.document.source_file.as_deref(), Some("scan.pdf"));
    }
}
