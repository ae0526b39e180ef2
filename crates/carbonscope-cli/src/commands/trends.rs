use carbonscope_core::error::EngineError;
use carbonscope_core::views::trend_report;
use carbonscope_core::{try_process_workbook, EngineOptions};
use std::path::PathBuf;

use crate::commands::read_workbook;
use crate::output;

pub fn run(input_file: PathBuf, output_format: &str, options: &EngineOptions) -> Result<(), EngineError> {
    let bytes = read_workbook(&input_file)?;
    let data = try_process_workbook(&bytes, options)?.indicators;
    let report = trend_report(&data);

    match output_format {
        "json" => output::json::print(&report),
        _ => {
            output::table::print_trends(&report);
            Ok(())
        }
    }
}
