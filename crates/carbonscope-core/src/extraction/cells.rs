use calamine::Data;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Coerce a cell into a number.
///
/// Numeric cells are taken as-is. Text cells are cleaned and parsed with
/// [`parse_number`]. Everything else (empty, bool, error cells) is 0. Date
/// cells contribute their serial number.
///
/// `None` means the cell holds a number `Decimal` cannot represent.
pub fn cell_as_number(cell: Option<&Data>) -> Option<Decimal> {
    match cell {
        Some(Data::Float(f)) => f64_to_decimal(*f),
        Some(Data::Int(i)) => Some(Decimal::from(*i)),
        Some(Data::DateTime(dt)) => f64_to_decimal(dt.as_f64()),
        Some(Data::String(s)) => parse_number(s),
        _ => Some(Decimal::ZERO),
    }
}

/// Text of a cell, or `None` for empty cells and empty strings.
///
/// Whitespace is kept as-is so that company names round-trip exactly.
pub fn cell_as_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(dt.as_f64().to_string()),
        other => Some(format!("{other}")),
    }
}

/// Parse a loosely formatted number from free text.
///
/// Handles formats like:
/// - "150000" -> 150000
/// - "1 234,5 t" -> 1234.5 (Portuguese decimal comma, unit suffix)
/// - "≈ 42.7 MWh" -> 42.7
/// - "-12" -> -12
///
/// Every character except digits, `,`, `.` and `-` is dropped, the first comma
/// becomes the decimal point, and the longest numeric prefix is parsed.
/// Anything that does not start with a number yields 0. A number too large
/// for `Decimal` yields `None`.
pub fn parse_number(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    let cleaned = cleaned.replacen(',', ".", 1);

    let prefix = numeric_prefix(&cleaned);
    if prefix.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(&prefix).ok()
}

/// Longest leading `-?digits[.digits]` run, padded so `Decimal` accepts it
/// (".5" -> "0.5", "5." -> "5").
fn numeric_prefix(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    if chars.peek() == Some(&'-') {
        out.push('-');
        chars.next();
    }

    let mut int_digits = 0;
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            out.push(c);
            int_digits += 1;
            chars.next();
        } else {
            break;
        }
    }

    let mut frac = String::new();
    if chars.peek() == Some(&'.') {
        chars.next();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                frac.push(c);
                chars.next();
            } else {
                break;
            }
        }
    }

    if int_digits == 0 && frac.is_empty() {
        return String::new();
    }
    if int_digits == 0 {
        out.push('0');
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Convert f64 to Decimal, preserving reasonable precision.
///
/// Uses string round-trip to avoid floating-point artifacts
/// (e.g., 0.0035_f64 becoming 0.00349999...). `None` for values outside the
/// `Decimal` range and for NaN or infinity.
pub fn f64_to_decimal(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    let s = format!("{f}");
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::try_from(f).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn f64_to_decimal_preserves_precision() {
        assert_eq!(f64_to_decimal(0.0035), Some(dec!(0.0035)));
        assert_eq!(f64_to_decimal(150000.0), Some(dec!(150000)));
        assert_eq!(f64_to_decimal(1.23), Some(dec!(1.23)));
    }

    #[test]
    fn test_plain_integer() {
        assert_eq!(parse_number("150000"), Some(dec!(150000)));
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse_number("1234,5"), Some(dec!(1234.5)));
    }

    #[test]
    fn test_units_and_spaces_stripped() {
        assert_eq!(parse_number("1 234,5 t"), Some(dec!(1234.5)));
        assert_eq!(parse_number("42.7 MWh"), Some(dec!(42.7)));
    }

    #[test]
    fn test_only_first_comma_is_decimal_point() {
        // "1.234,5" -> "1.234.5" -> stops at the second dot
        assert_eq!(parse_number("1.234,5"), Some(dec!(1.234)));
    }

    #[test]
    fn test_negative() {
        assert_eq!(parse_number("-12"), Some(dec!(-12)));
    }

    #[test]
    fn test_leading_dot() {
        assert_eq!(parse_number(".5"), Some(dec!(0.5)));
        assert_eq!(parse_number("5."), Some(dec!(5)));
    }

    #[test]
    fn test_garbage_is_zero() {
        assert_eq!(parse_number(""), Some(Decimal::ZERO));
        assert_eq!(parse_number("n/a"), Some(Decimal::ZERO));
        assert_eq!(parse_number("--5"), Some(Decimal::ZERO));
        assert_eq!(parse_number("-"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_cell_coercion() {
        assert_eq!(cell_as_number(Some(&Data::Float(2023.0))), Some(dec!(2023)));
        assert_eq!(cell_as_number(Some(&Data::Int(7))), Some(dec!(7)));
        assert_eq!(cell_as_number(Some(&Data::String("12,5".into()))), Some(dec!(12.5)));
        assert_eq!(cell_as_number(Some(&Data::Bool(true))), Some(Decimal::ZERO));
        assert_eq!(cell_as_number(Some(&Data::Empty)), Some(Decimal::ZERO));
        assert_eq!(cell_as_number(None), Some(Decimal::ZERO));
    }

    #[test]
    fn test_numbers_beyond_decimal_range() {
        assert_eq!(cell_as_number(Some(&Data::Float(1e30))), None);
        assert_eq!(cell_as_number(Some(&Data::Float(f64::INFINITY))), None);
        assert_eq!(parse_number("123456789012345678901234567890"), None);
        assert_eq!(
            cell_as_number(Some(&Data::String("123456789012345678901234567890 t".into()))),
            None
        );
        assert_eq!(f64_to_decimal(f64::NAN), None);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_as_text(Some(&Data::String("EDP".into()))).as_deref(), Some("EDP"));
        assert_eq!(cell_as_text(Some(&Data::Float(42.0))).as_deref(), Some("42"));
        assert!(cell_as_text(Some(&Data::String(String::new()))).is_none());
        assert!(cell_as_text(Some(&Data::Empty)).is_none());
        assert!(cell_as_text(None).is_none());
    }
}
