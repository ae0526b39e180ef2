use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use super::rounding::round_total;
use crate::model::{ForecastPoint, YearlyAggregate};

/// Confidence never decays below this floor.
pub const MIN_CONFIDENCE: i32 = 10;
/// Confidence lost per year of horizon.
pub const CONFIDENCE_DECAY: i32 = 10;
/// Longest projection produced; larger horizons are cut to this.
pub const MAX_HORIZON: u32 = 50;

/// Ordinary least-squares fit of total emissions against the calendar year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, 0 when the history is flat.
    pub r_squared: f64,
}

impl LinearTrend {
    pub fn predict(&self, year: i32) -> f64 {
        self.slope * f64::from(year) + self.intercept
    }

    /// R² scaled to 0-100.
    pub fn base_confidence(&self) -> i32 {
        ((self.r_squared * 100.0).round() as i32).clamp(0, 100)
    }
}

/// Fit a line through `(year, total_emissions)`. `None` below two points.
pub fn fit_trend(yearly: &[YearlyAggregate]) -> Option<LinearTrend> {
    if yearly.len() < 2 {
        return None;
    }

    let xs: Vec<f64> = yearly.iter().map(|y| f64::from(y.year)).collect();
    let ys: Vec<f64> = yearly
        .iter()
        .map(|y| y.total_emissions.to_f64().unwrap_or_default())
        .collect();

    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(&ys).map(|(x, y)| x * y).sum();
    let sum_xx: f64 = xs.iter().map(|x| x * x).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let mean_y = sum_y / n;
    let ss_total: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_residual: f64 = xs
        .iter()
        .zip(&ys)
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();
    let r_squared = if ss_total > 0.0 {
        1.0 - ss_residual / ss_total
    } else {
        0.0
    };

    Some(LinearTrend {
        slope,
        intercept,
        r_squared,
    })
}

/// Project `horizon` years past the last historical year.
///
/// Input must be sorted by year with one entry per year. Returns nothing with
/// fewer than two years of history.
pub fn forecast(yearly: &[YearlyAggregate], horizon: u32) -> Vec<ForecastPoint> {
    let Some(trend) = fit_trend(yearly) else {
        return Vec::new();
    };
    let Some(last_year) = yearly.iter().map(|y| y.year).max() else {
        return Vec::new();
    };
    let base = trend.base_confidence();

    let horizon = horizon.min(MAX_HORIZON) as i32;
    (1..=horizon)
        .map(|i| {
            let year = last_year.saturating_add(i);
            let predicted = Decimal::from_f64(trend.predict(year))
                .map(round_total)
                .unwrap_or_default()
                .max(Decimal::ZERO);
            let confidence = (base - CONFIDENCE_DECAY * i).max(MIN_CONFIDENCE);
            ForecastPoint {
                year,
                predicted_emissions: predicted,
                confidence: confidence as u8,
            }
        })
        .collect()
}
