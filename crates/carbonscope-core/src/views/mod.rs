//! Read-only views derived from a computed `IndicatorSet`: refiltering,
//! emissions trends, carbon-intensity trends and the forecast outlook.

pub mod filter;
pub mod intensity;
pub mod trend;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::IndicatorSet;
use intensity::{IntensityTrend, SectorEfficiency};
use trend::{ForecastOutlook, OverallTrend, YearChange};

/// Direction of a change over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stable,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Stable => write!(f, "stable"),
        }
    }
}

/// `(current - previous) / previous * 100`, or `None` when `previous` is not
/// positive or the result does not fit a `Decimal`.
pub(crate) fn percent_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous <= Decimal::ZERO {
        return None;
    }
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Whole-number magnitude of a percentage.
pub(crate) fn whole_percent(value: Decimal) -> Decimal {
    value
        .abs()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Every trend view for one indicator set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub year_over_year: Vec<YearChange>,
    pub overall: Option<OverallTrend>,
    pub intensity: Option<IntensityTrend>,
    pub sectors: SectorEfficiency,
    pub forecast: Option<ForecastOutlook>,
    pub average_carbon_intensity: Decimal,
}

pub fn trend_report(set: &IndicatorSet) -> TrendReport {
    TrendReport {
        year_over_year: trend::year_over_year(&set.emissions_by_year),
        overall: trend::overall_trend(&set.emissions_by_year),
        intensity: intensity::intensity_trend(&set.emissions_by_year),
        sectors: intensity::sector_efficiency(&set.emissions_by_sector),
        forecast: trend::forecast_outlook(&set.emissions_by_year, &set.forecast),
        average_carbon_intensity: set.average_carbon_intensity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(dec!(200), dec!(150)), Some(dec!(-25)));
        assert_eq!(percent_change(Decimal::ZERO, dec!(5)), None);
        assert_eq!(percent_change(dec!(0.0000000000000000000001), dec!(1000000000000000)), None);
    }

    #[test]
    fn test_whole_percent() {
        assert_eq!(whole_percent(dec!(-42.5)), dec!(43));
        assert_eq!(whole_percent(dec!(3.33)), dec!(3));
    }

    #[test]
    fn test_empty_set_report() {
        let report = trend_report(&IndicatorSet::default());
        assert!(report.year_over_year.is_empty());
        assert!(report.overall.is_none());
        assert!(report.intensity.is_none());
        assert!(report.forecast.is_none());
        assert!(report.sectors.ranked.is_empty());
    }
}
