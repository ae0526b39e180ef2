pub mod cells;
pub mod columns;

use std::io::Cursor;

use calamine::{Data, Range, Reader};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::model::{RawRecord, DEFAULT_COMPANY, GENERAL_SECTOR, UNKNOWN_COMPANY, UNSPECIFIED_SECTOR};
use crate::EngineOptions;
use cells::{cell_as_number, cell_as_text};
use columns::{resolve_columns, ColumnMap, ColumnMatch, Field};

/// Rows pulled out of the first sheet of a workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSheet {
    /// Header row as it appears in the sheet.
    pub headers: Vec<String>,
    pub columns: ColumnMap,
    pub records: Vec<RawRecord>,
    /// Non-blank data rows read from the sheet.
    pub rows_read: usize,
    /// Rows dropped because both energy and emissions were zero (or absent).
    pub rows_dropped: usize,
}

/// Extract raw records from the first sheet of a spreadsheet buffer.
///
/// Any container calamine recognizes (xlsx, xls, xlsb, ods) is accepted.
pub fn extract_records(bytes: &[u8], options: &EngineOptions) -> Result<ExtractedSheet, EngineError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| EngineError::Workbook(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| EngineError::Workbook(e.to_string()))?,
        None => return Err(EngineError::EmptyWorkbook),
    };

    extract_from_range(&range, options)
}

/// Extract raw records from an in-memory sheet.
///
/// The first row of the used range is the header row. Blank rows are skipped,
/// and rows where both energy and emissions are zero are dropped.
pub fn extract_from_range(
    range: &Range<Data>,
    options: &EngineOptions,
) -> Result<ExtractedSheet, EngineError> {
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| cell_as_text(Some(c)).unwrap_or_default())
            .collect(),
        None => return Err(EngineError::NoData),
    };

    let data_rows: Vec<&[Data]> = rows.filter(|row| !is_blank(row)).collect();
    if data_rows.is_empty() {
        return Err(EngineError::NoData);
    }

    let columns = resolve_columns(&headers, &options.columns);
    if !columns.has_required() {
        return Err(EngineError::MissingRequiredColumns {
            headers: headers.into_iter().filter(|h| !h.is_empty()).collect(),
        });
    }
    debug!(?columns, "resolved columns");

    let default_year = Decimal::from(
        options
            .default_year
            .unwrap_or_else(|| chrono::Local::now().year()),
    );

    let mut records = Vec::with_capacity(data_rows.len());
    let mut rows_dropped = 0;

    for row in &data_rows {
        let company = match &columns.company {
            Some(col) => text_at(row, col).unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            None => DEFAULT_COMPANY.to_string(),
        };
        let sector = match &columns.sector {
            Some(col) => text_at(row, col).unwrap_or_else(|| UNSPECIFIED_SECTOR.to_string()),
            None => GENERAL_SECTOR.to_string(),
        };
        let mut out_of_range = Vec::new();
        let mut number = |field: Field, col: &Option<ColumnMatch>, default: Decimal| match col {
            Some(col) => number_at(row, col).unwrap_or_else(|| {
                out_of_range.push(field);
                Decimal::ZERO
            }),
            None => default,
        };
        let year = number(Field::Year, &columns.year, default_year);
        let energy_consumption = number(Field::Energy, &columns.energy, Decimal::ZERO);
        let co2_emissions = number(Field::Emissions, &columns.emissions, Decimal::ZERO);

        // Skip rows with no meaningful data. Unreadable numbers go on to
        // validation so the row is reported.
        if energy_consumption > Decimal::ZERO || co2_emissions > Decimal::ZERO || !out_of_range.is_empty() {
            records.push(RawRecord {
                company,
                sector,
                year,
                energy_consumption,
                co2_emissions,
                out_of_range,
            });
        } else {
            rows_dropped += 1;
        }
    }

    debug!(
        rows_read = data_rows.len(),
        kept = records.len(),
        dropped = rows_dropped,
        "extracted rows"
    );

    Ok(ExtractedSheet {
        headers,
        columns,
        records,
        rows_read: data_rows.len(),
        rows_dropped,
    })
}

fn is_blank(row: &[Data]) -> bool {
    row.iter().all(|c| match c {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    })
}

fn text_at(row: &[Data], col: &ColumnMatch) -> Option<String> {
    cell_as_text(row.get(col.index))
}

fn number_at(row: &[Data], col: &ColumnMatch) -> Option<Decimal> {
    cell_as_number(row.get(col.index))
}
