use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{percent_change, whole_percent, Direction};
use crate::model::{SectorAggregate, YearlyAggregate};

/// Relative change below which intensity is considered stable.
const STABLE_BAND: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
const EFFICIENT_FACTOR: Decimal = Decimal::from_parts(7, 0, 0, false, 1);
const INEFFICIENT_FACTOR: Decimal = Decimal::from_parts(13, 0, 0, false, 1);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityTrend {
    pub first_year: i32,
    pub last_year: i32,
    pub first_intensity: Decimal,
    pub last_intensity: Decimal,
    /// `Down` is an efficiency improvement.
    pub direction: Direction,
    /// Whole-number magnitude of the change.
    pub percent: Decimal,
}

/// Carbon intensity of the first year against the last, ignoring years with
/// no energy data. `None` with fewer than two such years.
pub fn intensity_trend(yearly: &[YearlyAggregate]) -> Option<IntensityTrend> {
    let mut points: Vec<&YearlyAggregate> = yearly.iter().filter(|y| y.total_energy > Decimal::ZERO).collect();
    points.sort_by_key(|y| y.year);
    if points.len() < 2 {
        return None;
    }
    let first = points.first()?;
    let last = points.last()?;

    let (a, b) = (first.carbon_intensity, last.carbon_intensity);
    let direction = if b < a * (Decimal::ONE - STABLE_BAND) {
        Direction::Down
    } else if b > a.saturating_mul(Decimal::ONE + STABLE_BAND) {
        Direction::Up
    } else {
        Direction::Stable
    };

    Some(IntensityTrend {
        first_year: first.year,
        last_year: last.year,
        first_intensity: a,
        last_intensity: b,
        direction,
        percent: percent_change(a, b).map(whole_percent).unwrap_or(Decimal::ZERO),
    })
}

/// Sectors with energy data, lowest carbon intensity first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorEfficiency {
    pub ranked: Vec<SectorAggregate>,
}

impl SectorEfficiency {
    pub fn most_efficient(&self) -> Option<&SectorAggregate> {
        self.ranked.first()
    }

    pub fn least_efficient(&self) -> Option<&SectorAggregate> {
        self.ranked.last()
    }
}

pub fn sector_efficiency(sectors: &[SectorAggregate]) -> SectorEfficiency {
    let mut ranked: Vec<SectorAggregate> = sectors
        .iter()
        .filter(|s| s.total_energy > Decimal::ZERO)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| a.carbon_intensity.cmp(&b.carbon_intensity));
    SectorEfficiency { ranked }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityBand {
    Efficient,
    Average,
    Inefficient,
}

/// Classify an intensity against the overall average.
pub fn intensity_band(value: Decimal, average: Decimal) -> IntensityBand {
    if value <= average * EFFICIENT_FACTOR {
        IntensityBand::Efficient
    } else if value <= average.saturating_mul(INEFFICIENT_FACTOR) {
        IntensityBand::Average
    } else {
        IntensityBand::Inefficient
    }
}
