use rust_decimal::Decimal;

use super::aggregate::CompanyAggregate;
use super::rounding::round_total;
use crate::model::{CompanyEmissions, Rankings, TopReducer};

/// Build every ranking from the per-company aggregates.
///
/// All sorts are stable, so ties keep the order in which companies first
/// appeared in the sheet.
pub(crate) fn rank(companies: &[CompanyAggregate], limit: usize) -> Rankings {
    let mut top_emitters = emitters(companies);
    top_emitters.truncate(limit);

    let with_energy: Vec<CompanyEmissions> = companies
        .iter()
        .map(CompanyAggregate::to_emissions)
        .filter(|c| c.total_energy > Decimal::ZERO)
        .collect();

    let mut most_efficient = with_energy.clone();
    most_efficient.sort_by(|a, b| a.carbon_intensity.cmp(&b.carbon_intensity));
    most_efficient.truncate(limit);

    let mut least_efficient = with_energy;
    least_efficient.sort_by(|a, b| b.carbon_intensity.cmp(&a.carbon_intensity));
    least_efficient.truncate(limit);

    let mut top_reducers: Vec<TopReducer> = companies.iter().filter_map(reducer).collect();
    top_reducers.sort_by(|a, b| b.reduction_percent.cmp(&a.reduction_percent));
    top_reducers.truncate(limit);

    Rankings {
        top_emitters,
        top_reducers,
        most_efficient,
        least_efficient,
    }
}

/// Every company, highest total emissions first.
pub(crate) fn emitters(companies: &[CompanyAggregate]) -> Vec<CompanyEmissions> {
    let mut all: Vec<CompanyEmissions> = companies.iter().map(CompanyAggregate::to_emissions).collect();
    all.sort_by(|a, b| b.total_emissions.cmp(&a.total_emissions));
    all
}

/// Earliest vs latest year. Needs two distinct years and a real decrease.
fn reducer(company: &CompanyAggregate) -> Option<TopReducer> {
    if company.yearly_emissions.len() < 2 {
        return None;
    }
    let (_, first) = company.yearly_emissions.first_key_value()?;
    let (_, last) = company.yearly_emissions.last_key_value()?;
    if *first <= Decimal::ZERO || last >= first {
        return None;
    }

    let percent = (*first - *last)
        .checked_div(*first)
        .map(|ratio| round_total(ratio * Decimal::ONE_HUNDRED))?;

    Some(TopReducer {
        company: company.company.clone(),
        sector: company.sector.clone(),
        reduction_percent: percent,
        previous_emissions: round_total(*first),
        current_emissions: round_total(*last),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::aggregate::aggregate;
    use crate::model::ValidatedRecord;
    use rust_decimal_macros::dec;

    fn rec(company: &str, year: i32, energy: Decimal, emissions: Decimal) -> ValidatedRecord {
        ValidatedRecord {
            company: company.into(),
            sector: "Energia".into(),
            year,
            energy_consumption: energy,
            co2_emissions: emissions,
        }
    }

    fn scenario() -> Vec<ValidatedRecord> {
        vec![
            rec("EDP", 2022, dec!(400000), dec!(100000)),
            rec("EDP", 2023, dec!(450000), dec!(120000)),
            rec("Galp", 2022, dec!(600000), dec!(200000)),
            rec("Galp", 2023, dec!(550000), dec!(180000)),
            rec("REN", 2023, dec!(200000), dec!(50000)),
        ]
    }

    #[test]
    fn test_top_emitters() {
        let rankings = rank(&aggregate(&scenario()).unwrap().companies, 10);
        let names: Vec<&str> = rankings.top_emitters.iter().map(|c| c.company.as_str()).collect();
        assert_eq!(names, vec!["Galp", "EDP", "REN"]);
        assert_eq!(rankings.top_emitters[0].total_emissions, dec!(380000));
    }

    #[test]
    fn test_reducers_exclude_growth_and_single_year() {
        let rankings = rank(&aggregate(&scenario()).unwrap().companies, 10);
        assert_eq!(rankings.top_reducers.len(), 1);
        let galp = &rankings.top_reducers[0];
        assert_eq!(galp.company, "Galp");
        assert_eq!(galp.reduction_percent, dec!(10));
        assert_eq!(galp.previous_emissions, dec!(200000));
        assert_eq!(galp.current_emissions, dec!(180000));
    }

    #[test]
    fn test_reducer_needs_positive_first_year() {
        let records = vec![rec("X", 2022, dec!(1), dec!(0)), rec("X", 2023, dec!(1), dec!(0))];
        assert!(rank(&aggregate(&records).unwrap().companies, 10).top_reducers.is_empty());
    }

    #[test]
    fn test_efficiency_skips_zero_energy() {
        let records = vec![
            rec("A", 2023, dec!(100), dec!(50)),
            rec("B", 2023, dec!(100), dec!(10)),
            rec("C", 2023, dec!(0), dec!(5)),
        ];
        let rankings = rank(&aggregate(&records).unwrap().companies, 10);
        let most: Vec<&str> = rankings.most_efficient.iter().map(|c| c.company.as_str()).collect();
        let least: Vec<&str> = rankings.least_efficient.iter().map(|c| c.company.as_str()).collect();
        assert_eq!(most, vec!["B", "A"]);
        assert_eq!(least, vec!["A", "B"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let records = vec![
            rec("First", 2023, dec!(10), dec!(5)),
            rec("Second", 2023, dec!(10), dec!(5)),
        ];
        let rankings = rank(&aggregate(&records).unwrap().companies, 10);
        assert_eq!(rankings.top_emitters[0].company, "First");
        assert_eq!(rankings.most_efficient[0].company, "First");
        assert_eq!(rankings.least_efficient[0].company, "First");
    }

    #[test]
    fn test_limit_applies() {
        let records: Vec<ValidatedRecord> = (0..15)
            .map(|i| rec(&format!("C{i}"), 2023, dec!(10), Decimal::from(i + 1)))
            .collect();
        let rankings = rank(&aggregate(&records).unwrap().companies, 10);
        assert_eq!(rankings.top_emitters.len(), 10);
        assert_eq!(rankings.top_emitters[0].company, "C14");
        assert_eq!(rankings.most_efficient.len(), 10);
    }
}
