pub mod config;
pub mod error;
pub mod extraction;
pub mod indicators;
pub mod model;
pub mod upload;
pub mod validation;
pub mod views;

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use config::EngineOptions;
use error::EngineError;
use extraction::ExtractedSheet;
use model::{IndicatorSet, ProcessingResult, ValidatedRecord};

/// Everything produced from one workbook, for callers that want more than the
/// indicator set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedWorkbook {
    pub sheet: ExtractedSheet,
    pub records: Vec<ValidatedRecord>,
    pub indicators: IndicatorSet,
}

/// Failure message when processing panics.
pub const UNEXPECTED_FAILURE: &str = "unexpected error while processing the file";

/// Extract, validate and compute indicators for a spreadsheet buffer.
pub fn try_process_workbook(
    bytes: &[u8],
    options: &EngineOptions,
) -> Result<ProcessedWorkbook, EngineError> {
    let sheet = extraction::extract_records(bytes, options)?;
    if sheet.records.is_empty() {
        return Err(EngineError::NoUsableRows);
    }

    let records = validation::validate_records(&sheet.records, options.max_diagnostics)?;
    let indicators = indicators::calculate_indicators_with(&records, options)?;

    Ok(ProcessedWorkbook {
        sheet,
        records,
        indicators,
    })
}

/// Main API entry point: turn a spreadsheet buffer into a `ProcessingResult`.
///
/// Never fails. Errors, including a panic anywhere in the pipeline, come back
/// as `ProcessingResult::Failure`.
pub fn process_workbook(bytes: &[u8], options: &EngineOptions) -> ProcessingResult {
    into_result(|| try_process_workbook(bytes, options))
}

fn into_result<F>(run: F) -> ProcessingResult
where
    F: FnOnce() -> Result<ProcessedWorkbook, EngineError>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(run));

    match outcome {
        Ok(Ok(processed)) => {
            info!(
                rows = processed.records.len(),
                companies = processed.indicators.total_companies,
                "processed workbook"
            );
            ProcessingResult::Success {
                rows_processed: processed.records.len(),
                data: processed.indicators,
            }
        }
        Ok(Err(e)) => {
            warn!(error = %e, "workbook rejected");
            ProcessingResult::Failure {
                error: e.to_string(),
            }
        }
        Err(_) => {
            warn!("workbook processing panicked");
            ProcessingResult::Failure {
                error: UNEXPECTED_FAILURE.into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_becomes_failure() {
        let result = into_result(|| panic!("boom"));
        assert_eq!(
            result,
            ProcessingResult::Failure {
                error: UNEXPECTED_FAILURE.into()
            }
        );
    }

    #[test]
    fn test_error_message_passed_through() {
        let result = into_result(|| Err(EngineError::NoUsableRows));
        let ProcessingResult::Failure { error } = result else {
            panic!("expected a failure");
        };
        assert_eq!(error, EngineError::NoUsableRows.to_string());
    }
}
