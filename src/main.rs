mod cmd;
mod core;
mod extract;
mod form1040;
mod utils;

use crate::core::{TaxTable, TaxYear};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fedtax",
    version,
    about = "US federal income tax for W-2, 1099-INT and 1099-NEC income"
)]
struct Cli {
    /// Tax table JSON to use instead of the bundled tables
    #[arg(long, global = true)]
    tax_table: Option<PathBuf>,

    /// Tax year to compute
    #[arg(short, long, global = true, default_value_t = 2024)]
    year: i32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the tax summary of a return
    Summary(cmd::summary::SummaryCommand),
    /// Check a return for missing answers and document issues
    Validate(cmd::validate::ValidateCommand),
    /// Scrape rendered tax forms into document records
    Extract(cmd::extract::ExtractCommand),
    /// Form 1040 field values for a return
    Form(cmd::form::FormCommand),
    /// Print the return input format
    Schema(cmd::schema::SchemaCommand),
}

fn load_table(path: Option<&PathBuf>) -> anyhow::Result<TaxTable> {
    let table = match path {
        Some(path) => TaxTable::from_path(path)?,
        None => TaxTable::embedded()?,
    };
    Ok(table)
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let table = load_table(cli.tax_table.as_ref())?;
    let year = TaxYear(cli.year);
    if !table.years().any(|y| y == year) {
        log::warn!("No tax table entry for {}", year);
    }

    match cli.command {
        Command::Summary(summary) => summary.exec(&table, year),
        Command::Validate(validate) => validate.exec(&table, year),
        Command::Extract(extract) => extract.exec(),
        Command::Form(form) => form.exec(&table, year),
        Command::Schema(schema) => schema.exec(),
    }
}
