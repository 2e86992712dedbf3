//! Value normalization
//!
//! Submitted spreadsheets carry predictable formatting damage: decimal
//! commas, leading apostrophes from text-guarded cells, and `+`/`/` scanner
//! artifacts inside record identifiers. This module canonicalizes values
//! before validation:
//! - `normalize_number` / `try_parse_number`: coerce numeric-looking text
//! - `is_null_like`: recognize the null sentinels upstream tooling produces
//! - `clean`: table-wide pass applying both repairs

use crate::models::{CellValue, RecordTable};

/// A parsed number, integer-ness preserved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Decimal(d) => d,
        }
    }
}

impl From<Number> for CellValue {
    fn from(number: Number) -> Self {
        match number {
            Number::Integer(i) => CellValue::Integer(i),
            Number::Decimal(d) => CellValue::Decimal(d),
        }
    }
}

/// The string could not be coerced to a number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot interpret {value:?} as a number")]
pub struct FormatError {
    pub value: String,
}

/// Coerce a string to a number, undoing common spreadsheet mistakes
///
/// Replaces the decimal comma with `.` and strips a leading `'` (the text
/// guard Excel leaves on cells pasted as text). An integer parse is tried
/// first so `"42"` stays an integer; otherwise a float parse. Anything else
/// is a `FormatError`.
pub fn normalize_number(raw: &str) -> Result<Number, FormatError> {
    let repaired = raw.strip_prefix('\'').unwrap_or(raw).replace(',', ".");

    if let Ok(i) = repaired.parse::<i64>() {
        return Ok(Number::Integer(i));
    }
    repaired
        .parse::<f64>()
        .map(Number::Decimal)
        .map_err(|_| FormatError {
            value: raw.to_string(),
        })
}

/// Parse a cell as a number if possible
///
/// Already-numeric cells pass through unchanged; text goes through
/// [`normalize_number`]. Everything else is `None` — the caller decides what
/// a non-number means, instead of catching an error.
pub fn try_parse_number(value: &CellValue) -> Option<Number> {
    match value {
        CellValue::Integer(i) => Some(Number::Integer(*i)),
        CellValue::Decimal(d) => Some(Number::Decimal(*d)),
        CellValue::Text(s) => normalize_number(s).ok(),
        CellValue::Empty => None,
    }
}

/// Whether the cell holds one of the null sentinels rather than content
///
/// Recognizes the empty string, the `nan`/`nat` tokens that numeric and
/// datetime tooling print for missing values (case-insensitive), and an
/// actual floating-point NaN.
pub fn is_null_like(value: &CellValue) -> bool {
    match value {
        CellValue::Empty => true,
        CellValue::Text(s) => {
            s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("nat")
        }
        CellValue::Decimal(d) => d.is_nan(),
        CellValue::Integer(_) => false,
    }
}

/// Columns holding record identifiers, exempt from numeric normalization
const IDENTIFIER_COLUMNS: [&str; 2] = ["id", "parentID"];

/// Clean a submitted table in place
///
/// Identifier columns get their separators repaired: `+` and `/` are scanner
/// misreads of `-` in coded labels and are rewritten. Every other cell is
/// numeric-normalized where possible; cells that fail to normalize are left
/// untouched so the later per-cell check can report the original content.
pub fn clean(table: &mut RecordTable) {
    let identifier_cols: Vec<usize> = table
        .column_names()
        .iter()
        .enumerate()
        .filter(|(_, name)| IDENTIFIER_COLUMNS.contains(&name.as_str()))
        .map(|(index, _)| index)
        .collect();
    let column_count = table.column_names().len();

    for row in table.rows_mut() {
        for col in 0..column_count {
            let cell = &mut row[col];
            let repaired = match cell {
                CellValue::Text(text) if identifier_cols.contains(&col) => {
                    if text.contains('+') || text.contains('/') {
                        Some(CellValue::Text(text.replace(['+', '/'], "-")))
                    } else {
                        None
                    }
                }
                CellValue::Text(text) => normalize_number(text).ok().map(CellValue::from),
                _ => None,
            };
            if let Some(value) = repaired {
                *cell = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_number_decimal_comma() {
        assert_eq!(normalize_number("3,14"), Ok(Number::Decimal(3.14)));
    }

    #[test]
    fn test_normalize_number_leading_quote() {
        assert_eq!(normalize_number("'42"), Ok(Number::Integer(42)));
    }

    #[test]
    fn test_normalize_number_rejects_text() {
        assert!(normalize_number("abc").is_err());
        assert!(normalize_number("").is_err());
    }

    #[test]
    fn test_normalize_number_integer_stays_integer() {
        assert_eq!(normalize_number("42"), Ok(Number::Integer(42)));
        assert_eq!(normalize_number("-7"), Ok(Number::Integer(-7)));
    }

    #[test]
    fn test_try_parse_number_passthrough() {
        assert_eq!(
            try_parse_number(&CellValue::Decimal(1.5)),
            Some(Number::Decimal(1.5))
        );
        assert_eq!(try_parse_number(&CellValue::Empty), None);
        assert_eq!(try_parse_number(&CellValue::from("no")), None);
    }

    #[test]
    fn test_is_null_like() {
        assert!(is_null_like(&CellValue::Empty));
        assert!(is_null_like(&CellValue::from("")));
        assert!(is_null_like(&CellValue::from("NaN")));
        assert!(is_null_like(&CellValue::from("NaT")));
        assert!(is_null_like(&CellValue::Decimal(f64::NAN)));
        assert!(!is_null_like(&CellValue::from("NULL")));
        assert!(!is_null_like(&CellValue::Integer(0)));
    }

    #[test]
    fn test_clean_repairs_ids_and_numbers() {
        let mut table = RecordTable::new(["id", "parentID", "weightInGrams", "comments1"]);
        table
            .push_row(vec![
                CellValue::from("12345678+9f76-4e54-a2f5-babd859a1b2c"),
                CellValue::from("87654321-9f76-4e54-a2f5/babd859a1b2c"),
                CellValue::from("'12,5"),
                CellValue::from("kept as-is"),
            ])
            .unwrap();

        clean(&mut table);

        // '+' and '/' normalized to '-', and only in identifier columns
        assert_eq!(
            table.cell(0, "id").unwrap().as_text().unwrap(),
            "12345678-9f76-4e54-a2f5-babd859a1b2c"
        );
        assert_eq!(
            table.cell(0, "parentID").unwrap().as_text().unwrap(),
            "87654321-9f76-4e54-a2f5-babd859a1b2c"
        );
        assert_eq!(
            table.cell(0, "weightInGrams"),
            Some(&CellValue::Decimal(12.5))
        );
        assert_eq!(
            table.cell(0, "comments1").unwrap().as_text().unwrap(),
            "kept as-is"
        );
    }
}
