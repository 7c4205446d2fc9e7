//! Validate command - report missing intake answers and document issues without computing tax

use crate::cmd::read_input;
use crate::core::{build_return, ReturnInput, TaxTable, TaxYear, Warning};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Return input JSON. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    tax_year: i32,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

const NO_DOCUMENTS: &str = "At least one file upload (W-2, 1099-INT, 1099-NEC)";

fn submitted_records(input: &ReturnInput) -> usize {
    input.w2s.len() + input.ints.len() + input.necs.len()
}

fn collect_issues(input: ReturnInput, table: &TaxTable, year: TaxYear) -> Vec<ValidationIssue> {
    let today = chrono::Local::now().date_naive();
    let mut issues: Vec<ValidationIssue> = input
        .taxpayer
        .missing_fields(today)
        .into_iter()
        .map(|field| ValidationIssue {
            issue_type: "MissingField".to_string(),
            message: field.to_string(),
        })
        .collect();

    if submitted_records(&input) == 0 {
        issues.push(ValidationIssue {
            issue_type: "MissingField".to_string(),
            message: NO_DOCUMENTS.to_string(),
        });
    }

    if let Some(status) = input.taxpayer.filing_status {
        if let Err(e) = table.lookup(year, status) {
            issues.push(ValidationIssue {
                issue_type: "TaxTable".to_string(),
                message: e.to_string(),
            });
        }
    }

    let (_, warnings) = build_return(input);
    issues.extend(warnings.iter().map(|w: &Warning| ValidationIssue {
        issue_type: w.type_name().to_string(),
        message: w.message(),
    }));
    issues
}

impl ValidateCommand {
    pub fn exec(&self, table: &TaxTable, year: TaxYear) -> anyhow::Result<()> {
        let input = read_input(&self.file)?;
        let issues = collect_issues(input, table, year);

        if self.json {
            self.print_json(&issues, year)?;
        } else {
            self.print_text(&issues, year);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue], year: TaxYear) {
        println!();
        println!("VALIDATION RESULTS ({})", year);
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();

            for (i, issue) in issues.iter().enumerate() {
                println!("  {}. [{}] {}", i + 1, issue.issue_type, issue.message);
            }
            println!();
        }
    }

    fn print_json(&self, issues: &[ValidationIssue], year: TaxYear) -> anyhow::Result<()> {
        let output = ValidationOutput {
            tax_year: year.0,
            issue_count: issues.len(),
            issues: issues.to_vec(),
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
