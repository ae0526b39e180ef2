use rust_decimal::{Decimal, RoundingStrategy};

/// Round an emissions or energy total to 2 decimal places.
pub fn round_total(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a carbon-intensity ratio to 3 decimal places.
pub fn round_ratio(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

/// Emissions per energy unit, rounded to 3 dp; exactly 0 when `energy` is 0.
pub fn carbon_intensity(emissions: Decimal, energy: Decimal) -> Decimal {
    if energy > Decimal::ZERO {
        emissions
            .checked_div(energy)
            .map(round_ratio)
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}
