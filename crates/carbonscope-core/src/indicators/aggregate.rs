use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::rounding::{carbon_intensity, round_total};
use crate::error::EngineError;
use crate::model::{CompanyEmissions, SectorAggregate, ValidatedRecord, YearlyAggregate};

/// Running totals for one company. Company names are matched exactly.
#[derive(Debug, Clone)]
pub(crate) struct CompanyAggregate {
    pub company: String,
    /// Sector of the first record seen for this company.
    pub sector: String,
    pub emissions: Decimal,
    pub energy: Decimal,
    /// Emissions per year, used to find emission reducers.
    pub yearly_emissions: BTreeMap<i32, Decimal>,
}

impl CompanyAggregate {
    pub fn to_emissions(&self) -> CompanyEmissions {
        CompanyEmissions {
            company: self.company.clone(),
            sector: self.sector.clone(),
            total_emissions: round_total(self.emissions),
            total_energy: round_total(self.energy),
            carbon_intensity: carbon_intensity(self.emissions, self.energy),
        }
    }
}

#[derive(Default)]
struct GroupTotals<'a> {
    emissions: Decimal,
    energy: Decimal,
    companies: HashSet<&'a str>,
}

impl<'a> GroupTotals<'a> {
    fn add(&mut self, record: &'a ValidatedRecord) -> Result<(), EngineError> {
        add_to(&mut self.emissions, record.co2_emissions, "emissions")?;
        add_to(&mut self.energy, record.energy_consumption, "energy consumption")?;
        self.companies.insert(record.company.as_str());
        Ok(())
    }
}

fn add_to(total: &mut Decimal, value: Decimal, what: &str) -> Result<(), EngineError> {
    *total = total
        .checked_add(value)
        .ok_or_else(|| EngineError::Overflow(format!("{what} total exceeds the supported range")))?;
    Ok(())
}

/// Everything the indicator set is built from.
#[derive(Debug, Clone)]
pub(crate) struct Aggregates {
    /// Sorted by year ascending.
    pub yearly: Vec<YearlyAggregate>,
    /// In order of first appearance.
    pub companies: Vec<CompanyAggregate>,
    /// Sorted by total emissions descending.
    pub sectors: Vec<SectorAggregate>,
    pub total_emissions: Decimal,
    pub total_energy: Decimal,
}

impl Aggregates {
    pub fn total_companies(&self) -> usize {
        self.companies.len()
    }

    pub fn average_energy_per_company(&self) -> Decimal {
        if self.companies.is_empty() {
            return Decimal::ZERO;
        }
        round_total(self.total_energy / Decimal::from(self.companies.len()))
    }

    /// Grand-total ratio, not an average of per-company ratios.
    pub fn average_carbon_intensity(&self) -> Decimal {
        carbon_intensity(round_total(self.total_emissions), self.total_energy)
    }
}

/// Group records by year, company and sector.
///
/// Fails with [`EngineError::Overflow`] when a running total leaves the
/// `Decimal` range.
pub(crate) fn aggregate(records: &[ValidatedRecord]) -> Result<Aggregates, EngineError> {
    let mut by_year: BTreeMap<i32, GroupTotals> = BTreeMap::new();
    let mut sector_order: Vec<&str> = Vec::new();
    let mut by_sector: HashMap<&str, GroupTotals> = HashMap::new();
    let mut company_index: HashMap<&str, usize> = HashMap::new();
    let mut companies: Vec<CompanyAggregate> = Vec::new();
    let mut total_emissions = Decimal::ZERO;
    let mut total_energy = Decimal::ZERO;

    for record in records {
        add_to(&mut total_emissions, record.co2_emissions, "emissions")?;
        add_to(&mut total_energy, record.energy_consumption, "energy consumption")?;

        by_year.entry(record.year).or_default().add(record)?;

        by_sector
            .entry(record.sector.as_str())
            .or_insert_with(|| {
                sector_order.push(record.sector.as_str());
                GroupTotals::default()
            })
            .add(record)?;

        let idx = *company_index
            .entry(record.company.as_str())
            .or_insert_with(|| {
                companies.push(CompanyAggregate {
                    company: record.company.clone(),
                    sector: record.sector.clone(),
                    emissions: Decimal::ZERO,
                    energy: Decimal::ZERO,
                    yearly_emissions: BTreeMap::new(),
                });
                companies.len() - 1
            });
        let company = &mut companies[idx];
        add_to(&mut company.emissions, record.co2_emissions, "emissions")?;
        add_to(&mut company.energy, record.energy_consumption, "energy consumption")?;
        add_to(
            company.yearly_emissions.entry(record.year).or_insert(Decimal::ZERO),
            record.co2_emissions,
            "emissions",
        )?;
    }

    let yearly = by_year
        .into_iter()
        .map(|(year, totals)| YearlyAggregate {
            year,
            total_emissions: round_total(totals.emissions),
            total_energy: round_total(totals.energy),
            company_count: totals.companies.len(),
            carbon_intensity: carbon_intensity(totals.emissions, totals.energy),
        })
        .collect();

    let mut sectors: Vec<SectorAggregate> = sector_order
        .iter()
        .filter_map(|name| by_sector.get(name).map(|totals| (*name, totals)))
        .map(|(name, totals)| SectorAggregate {
            sector: name.to_string(),
            total_emissions: round_total(totals.emissions),
            total_energy: round_total(totals.energy),
            company_count: totals.companies.len(),
            carbon_intensity: carbon_intensity(totals.emissions, totals.energy),
        })
        .collect();
    sectors.sort_by(|a, b| b.total_emissions.cmp(&a.total_emissions));

    Ok(Aggregates {
        yearly,
        companies,
        sectors,
        total_emissions,
        total_energy,
    })
}
