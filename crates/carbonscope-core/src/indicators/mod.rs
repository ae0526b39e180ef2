pub(crate) mod aggregate;
pub mod forecast;
pub(crate) mod rankings;
pub mod rounding;

use tracing::info;

use crate::error::EngineError;
use crate::model::{IndicatorSet, ValidatedRecord};
use crate::EngineOptions;

/// Compute the indicator set with default options.
pub fn calculate_indicators(records: &[ValidatedRecord]) -> Result<IndicatorSet, EngineError> {
    calculate_indicators_with(records, &EngineOptions::default())
}

/// Compute every indicator from validated records.
///
/// Empty input yields an all-zero set. The result depends only on the records
/// and their order. Fails only when a total leaves the `Decimal` range, which
/// cannot happen for records that passed validation.
pub fn calculate_indicators_with(
    records: &[ValidatedRecord],
    options: &EngineOptions,
) -> Result<IndicatorSet, EngineError> {
    let agg = aggregate::aggregate(records)?;
    let rankings = rankings::rank(&agg.companies, options.ranking_limit);
    let forecast = forecast::forecast(&agg.yearly, options.forecast_horizon);

    let mut top_emitters = rankings::emitters(&agg.companies);
    top_emitters.truncate(options.summary_limit);

    let set = IndicatorSet {
        average_energy_per_company: agg.average_energy_per_company(),
        average_carbon_intensity: agg.average_carbon_intensity(),
        total_companies: agg.total_companies(),
        total_emissions: rounding::round_total(agg.total_emissions),
        total_energy_consumption: rounding::round_total(agg.total_energy),
        emissions_by_year: agg.yearly,
        emissions_by_sector: agg.sectors,
        top_emitters,
        forecast,
        rankings,
    };

    info!(
        records = records.len(),
        companies = set.total_companies,
        years = set.emissions_by_year.len(),
        sectors = set.emissions_by_sector.len(),
        "calculated indicators"
    );

    Ok(set)
}
