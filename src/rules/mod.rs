//! Rule compilation
//!
//! Turns a declarative [`ValidationRule`] into an executable [`Evaluator`]:
//! symbolic bounds are resolved to concrete values, enumeration sources are
//! fetched through the lookup collaborator, and the result is a pure
//! predicate over a single cell. Evaluating a malformed or mismatched value
//! yields `false` — bad data is an answer here, never an error.

mod bounds;

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::models::field::{parse_datetime, parse_time};
use crate::models::{CellValue, Criteria, ValidationRule};
use crate::normalize::{try_parse_number, Number};
use crate::providers::LookupProvider;

use bounds::{fraction_to_time, resolve_date_bound, resolve_datetime_bound, resolve_time_bound};

/// Fields whose values are coded record identifiers
///
/// Length rules on these fields additionally require the value to parse as a
/// UUID, catching well-formed-length garbage from mis-scanned labels.
const IDENTIFIER_FIELDS: [&str; 5] = ["id", "parentID", "eventID", "occurrenceID", "measurementID"];

/// Comparison criteria with every bound resolved to a concrete value
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedCriteria<T> {
    Equals(T),
    GreaterThan(T),
    GreaterOrEqual(T),
    Between { minimum: T, maximum: T },
}

impl<T: PartialOrd> ResolvedCriteria<T> {
    fn check(&self, value: &T) -> bool {
        match self {
            ResolvedCriteria::Equals(expected) => value == expected,
            ResolvedCriteria::GreaterThan(limit) => value > limit,
            ResolvedCriteria::GreaterOrEqual(limit) => value >= limit,
            ResolvedCriteria::Between { minimum, maximum } => value >= minimum && value <= maximum,
        }
    }
}

fn resolve<T, U>(criteria: &Criteria<T>, mut resolve_bound: impl FnMut(&T) -> U) -> ResolvedCriteria<U> {
    match criteria {
        Criteria::Equals { value } => ResolvedCriteria::Equals(resolve_bound(value)),
        Criteria::GreaterThan { value } => ResolvedCriteria::GreaterThan(resolve_bound(value)),
        Criteria::GreaterOrEqual { value } => ResolvedCriteria::GreaterOrEqual(resolve_bound(value)),
        Criteria::Between { minimum, maximum } => ResolvedCriteria::Between {
            minimum: resolve_bound(minimum),
            maximum: resolve_bound(maximum),
        },
    }
}

/// A compiled validation predicate with resolved bounds
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluator {
    /// Accepts everything; exists to give unvalidated fields the same interface
    AcceptAny,
    /// Length of the value rendered as a string; identifier fields must also
    /// parse as UUIDs
    Length {
        criteria: ResolvedCriteria<i64>,
        requires_uuid: bool,
    },
    Integer(ResolvedCriteria<i64>),
    Decimal(ResolvedCriteria<f64>),
    /// Case-sensitive membership of a resolved enumeration
    OneOf(HashSet<String>),
    Date(ResolvedCriteria<NaiveDate>),
    DateTime(ResolvedCriteria<NaiveDateTime>),
    Time(ResolvedCriteria<NaiveTime>),
    /// An enumeration whose source was unavailable; accepts everything
    Unconstrained,
}

impl Evaluator {
    /// Compile a declarative rule for the named field
    ///
    /// Enumeration sources are resolved through `lookup`; if the collaborator
    /// is unavailable the rule degrades to [`Evaluator::Unconstrained`]
    /// rather than failing the run.
    pub fn compile(rule: &ValidationRule, field_name: &str, lookup: &dyn LookupProvider) -> Self {
        match rule {
            ValidationRule::AcceptAny => Evaluator::AcceptAny,
            ValidationRule::Length { criteria } => Evaluator::Length {
                criteria: resolve(criteria, |v| *v),
                requires_uuid: IDENTIFIER_FIELDS
                    .iter()
                    .any(|id| id.eq_ignore_ascii_case(field_name)),
            },
            ValidationRule::Integer { criteria } => Evaluator::Integer(resolve(criteria, |v| *v)),
            ValidationRule::Decimal { criteria } => Evaluator::Decimal(resolve(criteria, |v| *v)),
            ValidationRule::Enumeration { source } => {
                let values = match source {
                    crate::models::EnumerationSource::Inline(values) => Some(values.clone()),
                    crate::models::EnumerationSource::Lookup(name) => {
                        match lookup.fetch_enumeration(name) {
                            Ok(values) => Some(values),
                            Err(error) => {
                                tracing::warn!(
                                    field = field_name,
                                    source = name.as_str(),
                                    %error,
                                    "enumeration source unavailable, accepting any value"
                                );
                                None
                            }
                        }
                    }
                };
                match values {
                    Some(values) => Evaluator::OneOf(values.into_iter().collect()),
                    None => Evaluator::Unconstrained,
                }
            }
            ValidationRule::Date { criteria } => {
                Evaluator::Date(resolve(criteria, resolve_date_bound))
            }
            ValidationRule::DateTime { criteria } => {
                Evaluator::DateTime(resolve(criteria, resolve_datetime_bound))
            }
            ValidationRule::Time { criteria } => {
                Evaluator::Time(resolve(criteria, resolve_time_bound))
            }
        }
    }

    /// Evaluate one cell; `false` for any malformed or mismatched value
    pub fn evaluate(&self, value: &CellValue) -> bool {
        match self {
            Evaluator::AcceptAny | Evaluator::Unconstrained => true,
            Evaluator::Length {
                criteria,
                requires_uuid,
            } => {
                let rendered = value.to_display_string();
                if *requires_uuid && Uuid::parse_str(&rendered).is_err() {
                    return false;
                }
                criteria.check(&(rendered.chars().count() as i64))
            }
            Evaluator::Integer(criteria) => match try_parse_number(value) {
                Some(Number::Integer(i)) => criteria.check(&i),
                _ => false,
            },
            Evaluator::Decimal(criteria) => match try_parse_number(value) {
                Some(number) => criteria.check(&number.as_f64()),
                None => false,
            },
            Evaluator::OneOf(accepted) => accepted.contains(&value.to_display_string()),
            Evaluator::Date(criteria) => match parse_date_value(value) {
                Some(date) => criteria.check(&date),
                None => false,
            },
            Evaluator::DateTime(criteria) => match value.as_text().and_then(parse_datetime) {
                Some(datetime) => criteria.check(&datetime),
                None => false,
            },
            Evaluator::Time(criteria) => match parse_time_value(value) {
                Some(time) => criteria.check(&time),
                None => false,
            },
        }
    }
}

fn parse_date_value(value: &CellValue) -> Option<NaiveDate> {
    let text = value.as_text()?;
    text.parse::<NaiveDate>()
        .ok()
        .or_else(|| parse_datetime(text).map(|dt| dt.date()))
}

fn parse_time_value(value: &CellValue) -> Option<NaiveTime> {
    match value {
        CellValue::Text(text) => parse_time(text),
        // Legacy spreadsheet encoding: time as a fraction of a day
        CellValue::Decimal(fraction) => fraction_to_time(*fraction),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Criteria, EnumerationSource};
    use crate::providers::{NoLookup, StaticLookupProvider};

    fn decimal_between(minimum: f64, maximum: f64) -> Evaluator {
        Evaluator::compile(
            &ValidationRule::Decimal {
                criteria: Criteria::Between { minimum, maximum },
            },
            "decimalLatitude",
            &NoLookup,
        )
    }

    #[test]
    fn test_decimal_between_is_inclusive() {
        let evaluator = decimal_between(-90.0, 90.0);
        assert!(evaluator.evaluate(&CellValue::Decimal(-90.0)));
        assert!(evaluator.evaluate(&CellValue::Decimal(90.0)));
        assert!(evaluator.evaluate(&CellValue::Decimal(0.0)));
        assert!(evaluator.evaluate(&CellValue::Integer(45)));
        assert!(!evaluator.evaluate(&CellValue::Decimal(90.0001)));
        assert!(!evaluator.evaluate(&CellValue::Decimal(-90.0001)));
    }

    #[test]
    fn test_decimal_rejects_text_without_raising() {
        let evaluator = decimal_between(0.0, 9999.0);
        assert!(!evaluator.evaluate(&CellValue::from("abc")));
        assert!(evaluator.evaluate(&CellValue::from("12,5")));
    }

    #[test]
    fn test_integer_requires_integer() {
        let evaluator = Evaluator::compile(
            &ValidationRule::Integer {
                criteria: Criteria::GreaterThan { value: 0 },
            },
            "bottleNumber",
            &NoLookup,
        );
        assert!(evaluator.evaluate(&CellValue::Integer(3)));
        assert!(evaluator.evaluate(&CellValue::from("3")));
        assert!(!evaluator.evaluate(&CellValue::Integer(0)));
        assert!(!evaluator.evaluate(&CellValue::Decimal(3.5)));
        assert!(!evaluator.evaluate(&CellValue::from("3.5")));
    }

    #[test]
    fn test_length_equals_with_uuid_requirement() {
        let evaluator = Evaluator::compile(
            &ValidationRule::Length {
                criteria: Criteria::Equals { value: 36 },
            },
            "id",
            &NoLookup,
        );
        assert!(evaluator.evaluate(&CellValue::from("a1b2c3d4-e5f6-7890-abcd-ef1234567890")));
        // right length, not a UUID
        assert!(!evaluator.evaluate(&CellValue::from("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz")));
        assert!(!evaluator.evaluate(&CellValue::from("a1b2c3d4")));
    }

    #[test]
    fn test_length_without_uuid_requirement() {
        let evaluator = Evaluator::compile(
            &ValidationRule::Length {
                criteria: Criteria::GreaterThan { value: 3 },
            },
            "catalogNumber",
            &NoLookup,
        );
        assert!(evaluator.evaluate(&CellValue::from("ABC-001")));
        assert!(!evaluator.evaluate(&CellValue::from("AB")));
        assert!(evaluator.evaluate(&CellValue::Integer(12345)));
    }

    #[test]
    fn test_enumeration_inline_and_lookup() {
        let inline = Evaluator::compile(
            &ValidationRule::Enumeration {
                source: EnumerationSource::Inline(vec!["up".to_string(), "down".to_string()]),
            },
            "geospatial_vertical_positive",
            &NoLookup,
        );
        assert!(inline.evaluate(&CellValue::from("up")));
        assert!(!inline.evaluate(&CellValue::from("Up")));

        let provider = StaticLookupProvider::new().with_list("gear_types", ["CTD", "Multinet"]);
        let looked_up = Evaluator::compile(
            &ValidationRule::Enumeration {
                source: EnumerationSource::Lookup("gear_types".to_string()),
            },
            "gearType",
            &provider,
        );
        assert!(looked_up.evaluate(&CellValue::from("CTD")));
        assert!(!looked_up.evaluate(&CellValue::from("Trawl")));
    }

    #[test]
    fn test_enumeration_degrades_when_source_unavailable() {
        let evaluator = Evaluator::compile(
            &ValidationRule::Enumeration {
                source: EnumerationSource::Lookup("gear_types".to_string()),
            },
            "gearType",
            &NoLookup,
        );
        assert_eq!(evaluator, Evaluator::Unconstrained);
        assert!(evaluator.evaluate(&CellValue::from("anything goes")));
    }

    #[test]
    fn test_date_between_with_relative_upper_bound() {
        use crate::models::DateBound;
        let evaluator = Evaluator::compile(
            &ValidationRule::Date {
                criteria: Criteria::Between {
                    minimum: DateBound::Literal(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
                    maximum: DateBound::RelativeToToday(2),
                },
            },
            "eventDate",
            &NoLookup,
        );
        assert!(evaluator.evaluate(&CellValue::from("2022-04-10")));
        assert!(evaluator.evaluate(&CellValue::from("2000-01-01")));
        assert!(!evaluator.evaluate(&CellValue::from("1999-12-31")));
        assert!(!evaluator.evaluate(&CellValue::from("2999-01-01")));
        assert!(!evaluator.evaluate(&CellValue::from("10/04/2022")));
        assert!(!evaluator.evaluate(&CellValue::from("not a date")));
    }

    #[test]
    fn test_time_with_fractional_bounds() {
        use crate::models::TimeBound;
        let evaluator = Evaluator::compile(
            &ValidationRule::Time {
                criteria: Criteria::Between {
                    minimum: TimeBound::FractionalDay(0.0),
                    maximum: TimeBound::FractionalDay(0.9999999),
                },
            },
            "eventTime",
            &NoLookup,
        );
        assert!(evaluator.evaluate(&CellValue::from("09:46:24")));
        assert!(evaluator.evaluate(&CellValue::from("09:46")));
        assert!(evaluator.evaluate(&CellValue::Decimal(0.5)));
        assert!(!evaluator.evaluate(&CellValue::from("25:00")));
        assert!(!evaluator.evaluate(&CellValue::Integer(3)));
    }

    #[test]
    fn test_accept_any() {
        let evaluator = Evaluator::compile(&ValidationRule::AcceptAny, "comments1", &NoLookup);
        assert!(evaluator.evaluate(&CellValue::from("anything")));
        assert!(evaluator.evaluate(&CellValue::Integer(7)));
    }
}
