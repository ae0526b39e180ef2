use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EngineError;
use crate::extraction::columns::ColumnSynonyms;
use crate::indicators::forecast::MAX_HORIZON;

/// Tunables for one engine invocation. Every field has a default, so a JSON
/// options file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Year used when the sheet has no year column. Current calendar year if unset.
    pub default_year: Option<i32>,
    /// Number of top emitters in the indicator summary.
    pub summary_limit: usize,
    /// Cap on every ranking list.
    pub ranking_limit: usize,
    /// Forecast periods past the last historical year.
    pub forecast_horizon: u32,
    /// Validation messages kept when records are rejected.
    pub max_diagnostics: usize,
    pub columns: ColumnSynonyms,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_year: None,
            summary_limit: 5,
            ranking_limit: 10,
            forecast_horizon: 3,
            max_diagnostics: 3,
            columns: ColumnSynonyms::default(),
        }
    }
}

/// Load options from a JSON file.
pub fn load_options(path: &Path) -> Result<EngineOptions, EngineError> {
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let options: EngineOptions = serde_json::from_str(&content).map_err(|e| EngineError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_options(&options)?;
    Ok(options)
}

/// Parse options from a JSON string.
pub fn parse_options_str(json: &str) -> Result<EngineOptions, EngineError> {
    let options: EngineOptions = serde_json::from_str(json)?;
    validate_options(&options)?;
    Ok(options)
}

/// Reject option sets the engine cannot honor.
pub fn validate_options(options: &EngineOptions) -> Result<(), EngineError> {
    if let Some(year) = options.default_year {
        if !(crate::validation::MIN_YEAR..=crate::validation::MAX_YEAR).contains(&year) {
            return Err(EngineError::ConfigInvalid(format!(
                "default_year {year} is outside {}-{}",
                crate::validation::MIN_YEAR,
                crate::validation::MAX_YEAR
            )));
        }
    }

    if !(1..=MAX_HORIZON).contains(&options.forecast_horizon) {
        return Err(EngineError::ConfigInvalid(format!(
            "forecast_horizon {} is outside 1-{MAX_HORIZON}",
            options.forecast_horizon
        )));
    }

    if options.columns.company.is_empty() && options.columns.emissions.is_empty() {
        return Err(EngineError::ConfigInvalid(
            "company and emissions synonyms cannot both be empty".into(),
        ));
    }

    Ok(())
}
