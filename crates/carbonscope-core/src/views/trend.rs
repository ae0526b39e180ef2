use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{percent_change, whole_percent, Direction};
use crate::indicators::rounding::round_total;
use crate::model::{ForecastPoint, YearlyAggregate};

/// Emissions for one year against the year before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearChange {
    pub year: i32,
    pub emissions: Decimal,
    pub previous_emissions: Option<Decimal>,
    pub change: Option<Decimal>,
    /// Absent for the first year and when the previous year had no emissions.
    pub change_percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallTrend {
    pub change: Decimal,
    pub change_percent: Option<Decimal>,
    pub direction: Direction,
    /// Years between the first and last data point.
    pub years: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => ConfidenceLevel::High,
            40..=69 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }
}

/// Where the forecast ends relative to the last actual year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastOutlook {
    pub last_actual_year: i32,
    pub last_actual_emissions: Decimal,
    pub final_year: i32,
    pub final_emissions: Decimal,
    /// `Down` when the final forecast is below the last actual total, else `Up`.
    pub direction: Direction,
    /// Whole-number magnitude of the change, 0 when the last actual total is 0.
    pub percent: Decimal,
    pub average_confidence: u8,
    pub confidence_level: ConfidenceLevel,
}

fn sorted_by_year(yearly: &[YearlyAggregate]) -> Vec<&YearlyAggregate> {
    let mut sorted: Vec<&YearlyAggregate> = yearly.iter().collect();
    sorted.sort_by_key(|y| y.year);
    sorted
}

/// Year-over-year emission changes, oldest year first.
pub fn year_over_year(yearly: &[YearlyAggregate]) -> Vec<YearChange> {
    let sorted = sorted_by_year(yearly);
    let mut previous: Option<Decimal> = None;

    sorted
        .into_iter()
        .map(|y| {
            let current = y.total_emissions;
            let change = YearChange {
                year: y.year,
                emissions: current,
                previous_emissions: previous,
                change: previous.map(|p| current - p),
                change_percent: previous.and_then(|p| percent_change(p, current)).map(round_total),
            };
            previous = Some(current);
            change
        })
        .collect()
}

/// First year against last year. `None` with fewer than two years.
pub fn overall_trend(yearly: &[YearlyAggregate]) -> Option<OverallTrend> {
    let sorted = sorted_by_year(yearly);
    if sorted.len() < 2 {
        return None;
    }
    let first = sorted.first()?;
    let last = sorted.last()?;

    let change = last.total_emissions - first.total_emissions;
    let direction = if change > Decimal::ZERO {
        Direction::Up
    } else if change < Decimal::ZERO {
        Direction::Down
    } else {
        Direction::Stable
    };

    Some(OverallTrend {
        change,
        change_percent: percent_change(first.total_emissions, last.total_emissions).map(round_total),
        direction,
        years: last.year - first.year,
    })
}

/// Summarize a forecast against the history it was fitted on.
pub fn forecast_outlook(yearly: &[YearlyAggregate], forecast: &[ForecastPoint]) -> Option<ForecastOutlook> {
    if yearly.len() < 2 {
        return None;
    }
    let last_actual = sorted_by_year(yearly).last().copied()?;
    let final_point = forecast.last()?;

    let direction = if final_point.predicted_emissions < last_actual.total_emissions {
        Direction::Down
    } else {
        Direction::Up
    };
    let percent = percent_change(last_actual.total_emissions, final_point.predicted_emissions)
        .map(whole_percent)
        .unwrap_or(Decimal::ZERO);

    let confidence_sum: u32 = forecast.iter().map(|p| u32::from(p.confidence)).sum();
    let average_confidence = ((f64::from(confidence_sum) / forecast.len() as f64).round() as u8).min(100);

    Some(ForecastOutlook {
        last_actual_year: last_actual.year,
        last_actual_emissions: last_actual.total_emissions,
        final_year: final_point.year,
        final_emissions: final_point.predicted_emissions,
        direction,
        percent,
        average_confidence,
        confidence_level: ConfidenceLevel::from_score(average_confidence),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn year(year: i32, emissions: Decimal) -> YearlyAggregate {
        YearlyAggregate {
            year,
            total_emissions: emissions,
            total_energy: Decimal::ZERO,
            company_count: 1,
            carbon_intensity: Decimal::ZERO,
        }
    }

    fn point(year: i32, emissions: Decimal, confidence: u8) -> ForecastPoint {
        ForecastPoint {
            year,
            predicted_emissions: emissions,
            confidence,
        }
    }

    #[test]
    fn test_year_over_year() {
        let changes = year_over_year(&[year(2023, dec!(350000)), year(2022, dec!(300000))]);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].year, 2022);
        assert!(changes[0].change.is_none());
        assert_eq!(changes[1].change, Some(dec!(50000)));
        assert_eq!(changes[1].change_percent, Some(dec!(16.67)));
    }

    #[test]
    fn test_percent_absent_after_zero_year() {
        let changes = year_over_year(&[year(2022, Decimal::ZERO), year(2023, dec!(10))]);
        assert_eq!(changes[1].change, Some(dec!(10)));
        assert!(changes[1].change_percent.is_none());
    }

    #[test]
    fn test_overall_trend() {
        let trend = overall_trend(&[year(2020, dec!(200)), year(2021, dec!(250)), year(2023, dec!(150))]).unwrap();
        assert_eq!(trend.direction, Direction::Down);
        assert_eq!(trend.change, dec!(-50));
        assert_eq!(trend.change_percent, Some(dec!(-25)));
        assert_eq!(trend.years, 3);
    }

    #[test]
    fn test_overall_trend_needs_two_years() {
        assert!(overall_trend(&[year(2020, dec!(1))]).is_none());
        let flat = overall_trend(&[year(2020, dec!(5)), year(2021, dec!(5))]).unwrap();
        assert_eq!(flat.direction, Direction::Stable);
    }

    #[test]
    fn test_forecast_outlook() {
        let history = [year(2022, dec!(300000)), year(2023, dec!(350000))];
        let forecast = [
            point(2024, dec!(400000), 90),
            point(2025, dec!(450000), 80),
            point(2026, dec!(500000), 65),
        ];
        let outlook = forecast_outlook(&history, &forecast).unwrap();
        assert_eq!(outlook.direction, Direction::Up);
        assert_eq!(outlook.final_year, 2026);
        // 150000 / 350000 = 42.86%
        assert_eq!(outlook.percent, dec!(43));
        assert_eq!(outlook.average_confidence, 78);
        assert_eq!(outlook.confidence_level, ConfidenceLevel::High);
    }

    #[test]
    fn test_forecast_outlook_empty_forecast() {
        let history = [year(2022, dec!(1)), year(2023, dec!(2))];
        assert!(forecast_outlook(&history, &[]).is_none());
    }

    #[test]
    fn test_confidence_levels() {
        assert_eq!(ConfidenceLevel::from_score(70), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(40), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(10), ConfidenceLevel::Low);
    }
}
