use carbonscope_core::error::EngineError;
use carbonscope_core::extraction::extract_records;
use carbonscope_core::validation::validate_records;
use carbonscope_core::EngineOptions;
use std::path::PathBuf;

use crate::commands::read_workbook;
use crate::output::{self, ParsedWorkbook};

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
    options: &EngineOptions,
) -> Result<(), EngineError> {
    let bytes = read_workbook(&input_file)?;
    let sheet = extract_records(&bytes, options)?;
    let records = validate_records(&sheet.records, options.max_diagnostics)?;
    let parsed = ParsedWorkbook {
        invalid_records: sheet.records.len() - records.len(),
        sheet,
        records,
    };

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&parsed)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} record(s), written to {}",
                parsed.records.len(),
                path.display()
            );
            if parsed.sheet.rows_dropped > 0 {
                eprintln!(
                    "  {} row(s) without energy or emissions data skipped",
                    parsed.sheet.rows_dropped
                );
            }
            if parsed.invalid_records > 0 {
                eprintln!("  {} invalid record(s) dropped", parsed.invalid_records);
            }
        }
        None => match output_format {
            "json" => output::json::print(&parsed)?,
            _ => output::table::print_parsed(&parsed),
        },
    }

    Ok(())
}
