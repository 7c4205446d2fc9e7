//! Extract command - scrape rendered tax forms into document records

use crate::core::{DocumentKind, ReturnInput};
use crate::extract::{extract_file, extract_w2, ExtractedFile};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Form type of every file given
    #[arg(short, long, value_enum)]
    kind: KindArg,

    /// Markdown renderings of the forms
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print every W-2 box instead of the fields used by the return
    #[arg(long, conflicts_with = "as_return")]
    detail: bool,

    /// Wrap the records in return input JSON, ready for `summary`
    #[arg(long)]
    as_return: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    W2,
    #[value(name = "1099-int")]
    Int1099,
    #[value(name = "1099-nec")]
    Nec1099,
}

impl From<KindArg> for DocumentKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::W2 => DocumentKind::W2,
            KindArg::Int1099 => DocumentKind::Int1099,
            KindArg::Nec1099 => DocumentKind::Nec1099,
        }
    }
}

impl ExtractCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let kind: DocumentKind = self.kind.into();

        if self.detail {
            return self.print_detail(kind);
        }

        let records: Vec<ExtractedFile> = self
            .files
            .iter()
            .map(|path| extract_file(path, kind))
            .collect();

        let failed = records.iter().filter(|r| r.error().is_some()).count();
        if failed > 0 {
            log::warn!("{} of {} file(s) failed to extract", failed, records.len());
        }

        if self.as_return {
            let input = into_return_input(records);
            println!("{}", serde_json::to_string_pretty(&input)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Ok(())
    }

    fn print_detail(&self, kind: DocumentKind) -> anyhow::Result<()> {
        if kind != DocumentKind::W2 {
            anyhow::bail!("--detail is only available for W-2 forms");
        }
        let mut boxes = Vec::new();
        for path in &self.files {
            let text = fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            boxes.push(extract_w2(&text));
        }
        println!("{}", serde_json::to_string_pretty(&boxes)?);
        Ok(())
    }
}

fn into_return_input(records: Vec<ExtractedFile>) -> ReturnInput {
    let mut input = ReturnInput::default();
    for record in records {
        match record {
            ExtractedFile::W2(doc) => input.w2s.push(doc),
            ExtractedFile::Int1099(doc) => input.ints.push(doc),
            ExtractedFile::Nec1099(doc) => input.necs.push(doc),
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Extracted;
    use crate::extract::extract_text;

    #[test]
    fn records_are_grouped_by_kind() {
        let records = vec![
            extract_text("", DocumentKind::Nec1099, Some("a.md".to_string())),
            ExtractedFile::W2(Extracted::failed(Some("b.md".to_string()), "unreadable")),
            extract_text("", DocumentKind::Nec1099, Some("c.md".to_string())),
        ];
        let input = into_return_input(records);
        assert_eq!(input.necs.len(), 2);
        assert_eq!(input.w2s.len(), 1);
        assert!(input.ints.is_empty());
    }
}
