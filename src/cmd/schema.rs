//! Schema command - print expected input formats

use crate::core::{DocumentKind, ReturnInput};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the return input
    JsonSchema,
    /// Field descriptions per document type
    Fields,
}

const DOCUMENT_LISTS: [(DocumentKind, &str); 3] = [
    (DocumentKind::W2, "w2s"),
    (DocumentKind::Int1099, "1099ints"),
    (DocumentKind::Nec1099, "1099necs"),
];

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::Fields => self.print_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(ReturnInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_fields(&self) -> anyhow::Result<()> {
        println!("Return Input Documents");
        println!("======================");
        for (kind, list) in DOCUMENT_LISTS {
            println!();
            println!("{} (\"{}\")", kind, list);
            for field in kind.field_schema() {
                let name = if field.alias.is_empty() {
                    field.name.to_string()
                } else {
                    format!("{} | {}", field.name, field.alias)
                };
                println!("  {:44} ({:6})  {}", name, field.kind, field.description);
            }
        }
        println!();
        println!("Amounts accept numbers or strings such as \"$1,234.56\"; blanks count as zero.");
        println!("A record with an \"error\" field is reported and left out of the return.");
        Ok(())
    }
}
