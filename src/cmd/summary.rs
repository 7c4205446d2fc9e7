//! Summary command - income totals, bracket tax and refund for one return

use crate::cmd::read_return;
use crate::core::{bracket_detail, BracketSlice, TaxSummary, TaxTable, TaxYear, Warning};
use crate::utils::write_csv;
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// Return input JSON. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as a single CSV row
    #[arg(long)]
    csv: bool,
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData<'a> {
    tax_year: i32,
    filing_status: String,
    #[serde(flatten)]
    summary: &'a TaxSummary,
    marginal_rate: Decimal,
    warnings: &'a [Warning],
}

#[derive(Debug, Tabled)]
struct BracketRow {
    #[tabled(rename = "Bracket")]
    range: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Taxed")]
    taxed_amount: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

impl From<&BracketSlice> for BracketRow {
    fn from(slice: &BracketSlice) -> Self {
        let range = match slice.max {
            Some(max) => format!("{} - {}", format_usd(slice.min), format_usd(max)),
            None => format!("{} +", format_usd(slice.min)),
        };
        BracketRow {
            range,
            rate: format_pct(slice.rate),
            taxed_amount: format_usd(slice.taxed_amount),
            tax: format_usd(slice.tax),
        }
    }
}

impl SummaryCommand {
    pub fn exec(&self, table: &TaxTable, year: TaxYear) -> anyhow::Result<()> {
        let (mut tax_return, warnings) = read_return(&self.file)?;
        let summary = tax_return.finalize(table, year)?;
        let detail = bracket_detail(&tax_return, table, year)?;
        let marginal = detail.marginal_rate;

        if self.json {
            let data = SummaryData {
                tax_year: year.0,
                filing_status: summary.filing_status.key().to_string(),
                summary: &summary,
                marginal_rate: marginal,
                warnings: &warnings,
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else if self.csv {
            write_csv([&summary], io::stdout())?;
        } else {
            print_summary(&summary, &detail.slices, marginal, &warnings);
        }
        Ok(())
    }
}

fn print_summary(
    summary: &TaxSummary,
    slices: &[BracketSlice],
    marginal: Decimal,
    warnings: &[Warning],
) {
    println!();
    println!(
        "TAX SUMMARY ({}, {})",
        summary.year,
        summary.filing_status.label()
    );
    println!();

    println!("INCOME");
    println!("  Wages: {}", format_usd(summary.wages));
    println!("  Interest: {}", format_usd(summary.interest_income));
    println!(
        "  Self-employment: {}",
        format_usd(summary.self_employment_income)
    );
    println!("  Gross income: {}", format_usd(summary.gross_income));
    println!(
        "  Standard deduction: {} | Taxable: {}",
        format_usd(summary.standard_deduction),
        format_usd(summary.taxable_income)
    );
    println!();

    if !slices.is_empty() {
        let rows: Vec<BracketRow> = slices.iter().map(BracketRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!("  Marginal rate: {}", format_pct(marginal));
        println!();
    }

    println!("TAX");
    println!("  Tax owed: {}", format_usd(summary.tax_owed));
    println!("  Withheld: {}", format_usd(summary.federal_tax_withheld));
    if summary.is_refund() {
        println!("  REFUND: {}", format_usd(summary.refund_or_amount_due));
    } else {
        println!(
            "  AMOUNT DUE: {}",
            format_usd(summary.refund_or_amount_due.abs())
        );
    }
    println!();

    if !warnings.is_empty() {
        println!("\u{26A0} {} warning(s):", warnings.len());
        for warning in warnings {
            println!("  [{}] {}", warning.type_name(), warning.message());
        }
        println!();
    }
}

fn format_usd(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

fn format_pct(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}
