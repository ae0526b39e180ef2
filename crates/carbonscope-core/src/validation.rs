use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::EngineError;
use crate::extraction::columns::Field;
use crate::model::{RawRecord, ValidatedRecord, UNSPECIFIED_SECTOR};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Largest accepted energy or emissions value, 10^15.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Check one record against every field constraint.
///
/// Returns the first violated constraint, in field order.
pub fn check_record(raw: &RawRecord) -> Result<ValidatedRecord, String> {
    if raw.company.is_empty() {
        return Err("company name is required".into());
    }

    if raw.out_of_range.contains(&Field::Year) {
        return Err("year value out of range".into());
    }
    if !raw.year.fract().is_zero() {
        return Err("year must be an integer".into());
    }
    let year = raw
        .year
        .to_i32()
        .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
        .ok_or_else(|| format!("invalid year {} (expected {MIN_YEAR}-{MAX_YEAR})", raw.year))?;

    if raw.energy_consumption < Decimal::ZERO {
        return Err("energy consumption cannot be negative".into());
    }
    if raw.out_of_range.contains(&Field::Energy) || raw.energy_consumption > MAX_QUANTITY {
        return Err(format!("energy consumption value out of range (max {MAX_QUANTITY})"));
    }
    if raw.co2_emissions < Decimal::ZERO {
        return Err("CO2 emissions cannot be negative".into());
    }
    if raw.out_of_range.contains(&Field::Emissions) || raw.co2_emissions > MAX_QUANTITY {
        return Err(format!("CO2 emissions value out of range (max {MAX_QUANTITY})"));
    }

    let sector = if raw.sector.is_empty() {
        UNSPECIFIED_SECTOR.to_string()
    } else {
        raw.sector.clone()
    };

    Ok(ValidatedRecord {
        company: raw.company.clone(),
        sector,
        year,
        energy_consumption: raw.energy_consumption,
        co2_emissions: raw.co2_emissions,
    })
}

/// Validate records independently, dropping the invalid ones.
///
/// At most `max_diagnostics` messages are kept, each naming the spreadsheet
/// row (the header is row 1) and the first violated constraint. Fails only
/// when no record survives.
pub fn validate_records(
    raw: &[RawRecord],
    max_diagnostics: usize,
) -> Result<Vec<ValidatedRecord>, EngineError> {
    let mut valid = Vec::with_capacity(raw.len());
    let mut diagnostics = Vec::new();
    let mut invalid = 0usize;

    for (i, record) in raw.iter().enumerate() {
        match check_record(record) {
            Ok(v) => valid.push(v),
            Err(reason) => {
                invalid += 1;
                if diagnostics.len() < max_diagnostics {
                    diagnostics.push(format!("Row {}: {}", i + 2, reason));
                }
            }
        }
    }

    if valid.is_empty() {
        let message = if diagnostics.is_empty() {
            "no valid records found in the file".to_string()
        } else {
            format!("no valid records found. {}", diagnostics.join("; "))
        };
        return Err(EngineError::NoValidRecords(message));
    }

    if invalid > 0 {
        warn!(invalid, kept = valid.len(), "dropped invalid records");
    }

    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(company: &str, year: Decimal, energy: Decimal, emissions: Decimal) -> RawRecord {
        RawRecord {
            company: company.into(),
            sector: "Energia".into(),
            year,
            energy_consumption: energy,
            co2_emissions: emissions,
            out_of_range: Vec::new(),
        }
    }

    #[test]
    fn test_valid_record() {
        let v = check_record(&raw("EDP", dec!(2023), dec!(500000), dec!(150000))).unwrap();
        assert_eq!(v.year, 2023);
        assert_eq!(v.sector, "Energia");
    }

    #[test]
    fn test_year_with_trailing_zero_scale() {
        let v = check_record(&raw("EDP", dec!(2023.00), dec!(1), dec!(1))).unwrap();
        assert_eq!(v.year, 2023);
    }

    #[test]
    fn test_year_too_old() {
        let err = check_record(&raw("EDP", dec!(1800), dec!(1), dec!(1))).unwrap_err();
        assert!(err.contains("invalid year"));
    }

    #[test]
    fn test_year_boundaries() {
        assert!(check_record(&raw("EDP", dec!(1900), dec!(1), dec!(1))).is_ok());
        assert!(check_record(&raw("EDP", dec!(2100), dec!(1), dec!(1))).is_ok());
        assert!(check_record(&raw("EDP", dec!(2101), dec!(1), dec!(1))).is_err());
    }

    #[test]
    fn test_fractional_year() {
        let err = check_record(&raw("EDP", dec!(2023.5), dec!(1), dec!(1))).unwrap_err();
        assert_eq!(err, "year must be an integer");
    }

    #[test]
    fn test_negative_emissions() {
        let err = check_record(&raw("EDP", dec!(2023), dec!(1), dec!(-100))).unwrap_err();
        assert!(err.contains("emissions"));
    }

    #[test]
    fn test_quantity_limit() {
        assert!(check_record(&raw("EDP", dec!(2023), MAX_QUANTITY, MAX_QUANTITY)).is_ok());
        let err = check_record(&raw("EDP", dec!(2023), dec!(1), dec!(50000000000000000000000000000))).unwrap_err();
        assert!(err.starts_with("CO2 emissions value out of range"), "{err}");
        let err = check_record(&raw("EDP", dec!(2023), dec!(1000000000000001), dec!(1))).unwrap_err();
        assert!(err.starts_with("energy consumption value out of range"), "{err}");
    }

    #[test]
    fn test_unrepresentable_cell_reported() {
        let mut r = raw("EDP", dec!(2023), dec!(1), Decimal::ZERO);
        r.out_of_range = vec![Field::Emissions];
        let err = validate_records(&[r], 3).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Row 2: CO2 emissions value out of range"), "{msg}");
    }

    #[test]
    fn test_unrepresentable_year_reported() {
        let mut r = raw("EDP", Decimal::ZERO, dec!(1), dec!(1));
        r.out_of_range = vec![Field::Year];
        assert_eq!(check_record(&r).unwrap_err(), "year value out of range");
    }

    #[test]
    fn test_empty_company_reported_first() {
        let err = check_record(&raw("", dec!(1800), dec!(-1), dec!(-1))).unwrap_err();
        assert_eq!(err, "company name is required");
    }

    #[test]
    fn test_empty_sector_defaults() {
        let mut r = raw("EDP", dec!(2023), dec!(1), dec!(1));
        r.sector = String::new();
        assert_eq!(check_record(&r).unwrap().sector, UNSPECIFIED_SECTOR);
    }

    #[test]
    fn test_partial_success_keeps_valid_in_order() {
        let records = vec![
            raw("EDP", dec!(2023), dec!(500000), dec!(150000)),
            raw("Invalid", dec!(1800), dec!(100), dec!(50)),
            raw("Galp", dec!(2023), dec!(600000), dec!(200000)),
        ];
        let valid = validate_records(&records, 3).unwrap();
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].company, "EDP");
        assert_eq!(valid[1].company, "Galp");
    }

    #[test]
    fn test_all_invalid_fails_with_diagnostics() {
        let records = vec![raw("", dec!(2023), dec!(100), dec!(-50))];
        let err = validate_records(&records, 3).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Row 2: company name is required"), "{msg}");
    }

    #[test]
    fn test_diagnostics_are_bounded() {
        let records: Vec<RawRecord> = (0..10)
            .map(|_| raw("X", dec!(1500), dec!(1), dec!(1)))
            .collect();
        let err = validate_records(&records, 3).unwrap_err();
        let msg = err.to_string();
        assert_eq!(msg.matches("Row ").count(), 3);
        assert!(msg.contains("Row 4:"));
        assert!(!msg.contains("Row 5:"));
    }

    #[test]
    fn test_empty_input_generic_message() {
        let err = validate_records(&[], 3).unwrap_err();
        assert_eq!(err.to_string(), "no valid records found in the file");
    }
}
