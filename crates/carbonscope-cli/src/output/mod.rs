pub mod json;
pub mod table;

use carbonscope_core::extraction::ExtractedSheet;
use carbonscope_core::model::ValidatedRecord;
use serde::Serialize;

/// Output of the `parse` command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedWorkbook {
    pub sheet: ExtractedSheet,
    pub records: Vec<ValidatedRecord>,
    pub invalid_records: usize,
}
