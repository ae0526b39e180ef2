use carbonscope_core::error::EngineError;
use carbonscope_core::model::ProcessingResult;
use carbonscope_core::views::filter::{apply_filters, IndicatorFilter};
use carbonscope_core::{try_process_workbook, EngineOptions};
use std::path::PathBuf;

use crate::commands::read_workbook;
use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    year: Option<i32>,
    sector: Option<String>,
    options: &EngineOptions,
) -> Result<(), EngineError> {
    let bytes = read_workbook(&input_file)?;
    let processed = try_process_workbook(&bytes, options)?;
    let rows_processed = processed.records.len();

    let filter = IndicatorFilter { year, sector };
    let data = apply_filters(&processed.indicators, &filter);

    match output_format {
        "json" => output::json::print(&ProcessingResult::Success {
            data,
            rows_processed,
        }),
        _ => {
            output::table::print_indicators(&data, rows_processed, &filter);
            Ok(())
        }
    }
}
