pub mod extract;
pub mod form;
pub mod schema;
pub mod summary;
pub mod validate;

use crate::core::{build_return, read_return_json, ReturnInput, TaxReturn, Warning};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read return input JSON (or stdin with "-")
pub fn read_input(path: &Path) -> anyhow::Result<ReturnInput> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        read_from_file(path)
    }
}

/// Read return input and build the return, logging any warnings
pub fn read_return(path: &Path) -> anyhow::Result<(TaxReturn, Vec<Warning>)> {
    let input = read_input(path)?;
    let (tax_return, warnings) = build_return(input);
    for warning in &warnings {
        log::warn!("{}", warning.message());
    }
    log::info!(
        "Loaded return with {} document(s) from {}",
        tax_return.document_count(),
        path.display()
    );
    Ok((tax_return, warnings))
}

fn read_from_file(path: &Path) -> anyhow::Result<ReturnInput> {
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;
    let reader = BufReader::new(file);
    read_return_json(reader)
}

fn read_from_stdin() -> anyhow::Result<ReturnInput> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    read_return_json(io::Cursor::new(buffer))
}
