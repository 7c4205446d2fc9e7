//! Form command - Form 1040 field values for a return

use crate::cmd::read_return;
use crate::core::{TaxTable, TaxYear};
use crate::form1040::fill_fields;
use clap::Args;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct FormCommand {
    /// Return input JSON. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as a JSON object of field name to value
    #[arg(long)]
    json: bool,

    /// Include fields left blank
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Tabled)]
struct FieldRow<'a> {
    #[tabled(rename = "Field")]
    name: &'a str,
    #[tabled(rename = "Value")]
    value: &'a str,
}

impl FormCommand {
    pub fn exec(&self, table: &TaxTable, year: TaxYear) -> anyhow::Result<()> {
        let (mut tax_return, _) = read_return(&self.file)?;
        let summary = tax_return.finalize(table, year)?;
        let mut fields = fill_fields(&tax_return.taxpayer, &summary, year);
        if !self.all {
            fields.retain(|_, value| !value.is_empty());
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&fields)?);
        } else {
            let rows = fields.iter().map(|(name, value)| FieldRow {
                name: name.as_str(),
                value: value.as_str(),
            });
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        Ok(())
    }
}
