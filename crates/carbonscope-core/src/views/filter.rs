use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::indicators::rounding::{carbon_intensity, round_total};
use crate::model::IndicatorSet;

/// Dashboard filter. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorFilter {
    pub year: Option<i32>,
    pub sector: Option<String>,
}

impl IndicatorFilter {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.sector.is_none()
    }
}

/// Years present in the set, newest first.
pub fn available_years(set: &IndicatorSet) -> Vec<i32> {
    let mut years: Vec<i32> = set.emissions_by_year.iter().map(|y| y.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years
}

/// Sector names present in the set, alphabetically.
pub fn available_sectors(set: &IndicatorSet) -> Vec<String> {
    let mut sectors: Vec<String> = set.emissions_by_sector.iter().map(|s| s.sector.clone()).collect();
    sectors.sort();
    sectors
}

/// Narrow an indicator set to one year and/or one sector.
///
/// With a sector filter the totals come from that sector's aggregate; without
/// one they are summed from the remaining yearly rows. Forecast and rankings
/// are carried over untouched.
pub fn apply_filters(set: &IndicatorSet, filter: &IndicatorFilter) -> IndicatorSet {
    if filter.is_empty() {
        return set.clone();
    }

    let emissions_by_year: Vec<_> = set
        .emissions_by_year
        .iter()
        .filter(|y| filter.year.map_or(true, |year| y.year == year))
        .cloned()
        .collect();

    let (emissions_by_sector, top_emitters) = match &filter.sector {
        Some(sector) => (
            set.emissions_by_sector
                .iter()
                .filter(|s| &s.sector == sector)
                .cloned()
                .collect(),
            set.top_emitters
                .iter()
                .filter(|c| &c.sector == sector)
                .cloned()
                .collect(),
        ),
        None => (set.emissions_by_sector.clone(), set.top_emitters.clone()),
    };

    let mut total_emissions = emissions_by_year
        .iter()
        .fold(Decimal::ZERO, |acc, y| acc.saturating_add(y.total_emissions));
    let mut total_energy = emissions_by_year
        .iter()
        .fold(Decimal::ZERO, |acc, y| acc.saturating_add(y.total_energy));
    let mut total_companies: usize = emissions_by_year.iter().map(|y| y.company_count).sum();

    if filter.sector.is_some() {
        if let Some(sector) = emissions_by_sector.first() {
            total_emissions = sector.total_emissions;
            total_energy = sector.total_energy;
            total_companies = sector.company_count;
        }
    }

    let average_energy_per_company = if total_companies > 0 {
        round_total(total_energy / Decimal::from(total_companies))
    } else {
        Decimal::ZERO
    };

    IndicatorSet {
        emissions_by_year,
        average_energy_per_company,
        top_emitters,
        total_companies,
        total_emissions,
        total_energy_consumption: total_energy,
        emissions_by_sector,
        average_carbon_intensity: carbon_intensity(total_emissions, total_energy),
        forecast: set.forecast.clone(),
        rankings: set.rankings.clone(),
    }
}
