use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::extraction::columns::Field;

/// Sector assigned when the sector cell is empty.
pub const UNSPECIFIED_SECTOR: &str = "Unspecified";
/// Sector assigned when the sheet has no sector column at all.
pub const GENERAL_SECTOR: &str = "General";
/// Company assigned when the company cell is empty.
pub const UNKNOWN_COMPANY: &str = "Unknown";
/// Company assigned when the sheet has no company column at all.
pub const DEFAULT_COMPANY: &str = "Company";

/// One spreadsheet row after column resolution and cell coercion, before
/// validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub company: String,
    pub sector: String,
    pub year: Decimal,
    pub energy_consumption: Decimal,
    pub co2_emissions: Decimal,
    /// Numeric fields whose cell held a number too large to represent. The
    /// field's value is 0 in that case.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub out_of_range: Vec<Field>,
}

/// A record that satisfies every field constraint at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedRecord {
    pub company: String,
    pub sector: String,
    pub year: i32,
    pub energy_consumption: Decimal,
    pub co2_emissions: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyAggregate {
    pub year: i32,
    pub total_emissions: Decimal,
    pub total_energy: Decimal,
    pub company_count: usize,
    /// Emissions per energy unit (t CO₂ / MWh in the usual input).
    pub carbon_intensity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyEmissions {
    pub company: String,
    pub sector: String,
    pub total_emissions: Decimal,
    pub total_energy: Decimal,
    pub carbon_intensity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorAggregate {
    pub sector: String,
    pub total_emissions: Decimal,
    pub total_energy: Decimal,
    pub company_count: usize,
    pub carbon_intensity: Decimal,
}

/// A projected yearly total. This is a linear trend extrapolation, not a
/// validated statistical model; `confidence` only reflects how well a straight
/// line fits the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub year: i32,
    pub predicted_emissions: Decimal,
    /// 0-100, decays with the forecast horizon and never drops below 10.
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopReducer {
    pub company: String,
    pub sector: String,
    pub reduction_percent: Decimal,
    /// Emissions in the company's earliest recorded year.
    pub previous_emissions: Decimal,
    /// Emissions in the company's latest recorded year.
    pub current_emissions: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    pub top_emitters: Vec<CompanyEmissions>,
    pub top_reducers: Vec<TopReducer>,
    /// Lowest carbon intensity first.
    pub most_efficient: Vec<CompanyEmissions>,
    /// Highest carbon intensity first.
    pub least_efficient: Vec<CompanyEmissions>,
}

/// The full set of derived indicators for one workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSet {
    pub emissions_by_year: Vec<YearlyAggregate>,
    pub average_energy_per_company: Decimal,
    pub top_emitters: Vec<CompanyEmissions>,
    pub total_companies: usize,
    pub total_emissions: Decimal,
    pub total_energy_consumption: Decimal,
    pub emissions_by_sector: Vec<SectorAggregate>,
    pub average_carbon_intensity: Decimal,
    #[serde(default)]
    pub forecast: Vec<ForecastPoint>,
    #[serde(default)]
    pub rankings: Rankings,
}

/// Outcome of one engine invocation.
///
/// Serializes as `{ "success": true, "data": ..., "rowsProcessed": n }` or
/// `{ "success": false, "error": "..." }`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingResult {
    Success {
        data: IndicatorSet,
        rows_processed: usize,
    },
    Failure {
        error: String,
    },
}

impl ProcessingResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingResult::Success { .. })
    }

    pub fn data(&self) -> Option<&IndicatorSet> {
        match self {
            ProcessingResult::Success { data, .. } => Some(data),
            ProcessingResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ProcessingResult::Success { .. } => None,
            ProcessingResult::Failure { error } => Some(error),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireResultRef<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a IndicatorSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows_processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResult {
    success: bool,
    #[serde(default)]
    data: Option<IndicatorSet>,
    #[serde(default)]
    rows_processed: Option<usize>,
    #[serde(default)]
    error: Option<String>,
}

impl Serialize for ProcessingResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            ProcessingResult::Success {
                data,
                rows_processed,
            } => WireResultRef {
                success: true,
                data: Some(data),
                rows_processed: Some(*rows_processed),
                error: None,
            },
            ProcessingResult::Failure { error } => WireResultRef {
                success: false,
                data: None,
                rows_processed: None,
                error: Some(error),
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProcessingResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireResult::deserialize(deserializer)?;
        if wire.success {
            let data = wire
                .data
                .ok_or_else(|| serde::de::Error::missing_field("data"))?;
            Ok(ProcessingResult::Success {
                data,
                rows_processed: wire.rows_processed.unwrap_or_default(),
            })
        } else {
            Ok(ProcessingResult::Failure {
                error: wire.error.unwrap_or_default(),
            })
        }
    }
}
