//! Field specification model
//!
//! A `FieldSpec` is the declarative description of one field accepted by the
//! catalogue: its names, display metadata and the validation rule its values
//! must satisfy. Specifications are loaded once (from the built-in catalog or
//! a YAML file) and are read-only afterwards.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declarative specification of a single field
///
/// # Example
///
/// ```rust
/// use metadata_validation_sdk::models::{Criteria, FieldSpec, ValidationRule};
///
/// let spec = FieldSpec::new("decimalLatitude", "Decimal Latitude")
///     .with_units("degrees_north")
///     .with_rule(ValidationRule::Decimal {
///         criteria: Criteria::Between { minimum: -90.0, maximum: 90.0 },
///     });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Short (system) name of the field
    pub name: String,
    /// Displayed name of the field
    pub disp_name: String,
    /// Description shown to the user filling in the template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Measurement unit, using the CF standard (e.g. "m", "m s-1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Whether child records inherit this field from their parent
    #[serde(default)]
    pub inherit: bool,
    /// If inheriting, values already entered in children are kept
    #[serde(default)]
    pub inherit_weak: bool,
    /// Validation rule for values of this field; absent means unvalidated
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "valid")]
    pub rule: Option<ValidationRule>,
}

impl FieldSpec {
    /// Create a new field specification with no validation rule
    pub fn new(name: &str, disp_name: &str) -> Self {
        Self {
            name: name.to_string(),
            disp_name: disp_name.to_string(),
            description: None,
            units: None,
            inherit: false,
            inherit_weak: false,
            rule: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    /// Mark the field as inheritable by child records
    pub fn inheritable(mut self) -> Self {
        self.inherit = true;
        self
    }

    /// Mark the field as weakly inheritable (children keep their own values)
    pub fn inheritable_weak(mut self) -> Self {
        self.inherit = true;
        self.inherit_weak = true;
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rule = Some(rule);
        self
    }
}

/// Validation rule for one field, dispatched on its kind
///
/// This is a closed set: a catalog entry with an unknown `kind` fails to
/// deserialize, which is the fatal configuration-error path. Bounds that are
/// symbolic in the catalog (`=TODAY()+2`, fractional-day times) stay symbolic
/// here and are resolved to concrete values when the rule is compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ValidationRule {
    /// Accepts any value representable as a string
    #[serde(rename = "any")]
    AcceptAny,
    /// Constrains the length of the value rendered as a string
    Length {
        #[serde(flatten)]
        criteria: Criteria<i64>,
    },
    /// Requires an integer value satisfying the criteria
    Integer {
        #[serde(flatten)]
        criteria: Criteria<i64>,
    },
    /// Requires a numeric value satisfying the criteria
    Decimal {
        #[serde(flatten)]
        criteria: Criteria<f64>,
    },
    /// Requires membership of an enumerated set of accepted strings
    #[serde(rename = "list")]
    Enumeration { source: EnumerationSource },
    /// Requires a calendar date within the criteria
    Date {
        #[serde(flatten)]
        criteria: Criteria<DateBound>,
    },
    /// Requires a date and time of day within the criteria
    #[serde(rename = "datetime")]
    DateTime {
        #[serde(flatten)]
        criteria: Criteria<DateTimeBound>,
    },
    /// Requires a time of day within the criteria
    Time {
        #[serde(flatten)]
        criteria: Criteria<TimeBound>,
    },
}

/// Comparison criteria attached to a validation rule
///
/// Serialized with the same tokens the catalogs use (`==`, `>`, `>=`,
/// `between`). `Between` is inclusive at both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "criteria")]
pub enum Criteria<T> {
    #[serde(rename = "==")]
    Equals { value: T },
    #[serde(rename = ">")]
    GreaterThan { value: T },
    #[serde(rename = ">=")]
    GreaterOrEqual { value: T },
    #[serde(rename = "between")]
    Between { minimum: T, maximum: T },
}

/// Source of the accepted strings for an enumeration rule
///
/// Either spelled out in the specification itself or the name of a lookup
/// table resolved through a [`LookupProvider`](crate::providers::LookupProvider)
/// when the rule is compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumerationSource {
    Inline(Vec<String>),
    Lookup(String),
}

/// A date bound, literal or relative to the day of validation
///
/// Relative bounds are written `=TODAY()`, `=TODAY()+2` or `=TODAY()-7` in
/// catalogs and resolved to a concrete date once, when the rule is compiled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateBound {
    Literal(NaiveDate),
    RelativeToToday(i64),
}

/// A datetime bound, literal or relative to the moment of validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateTimeBound {
    Literal(NaiveDateTime),
    RelativeToToday(i64),
}

/// A time-of-day bound, literal or as a fraction of a day
///
/// Fractional bounds (e.g. `0.9999999` for just before midnight) are the
/// legacy spreadsheet representation and are converted to a time of day once,
/// when the rule is compiled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeBound {
    Literal(NaiveTime),
    FractionalDay(f64),
}

static TODAY_FORMULA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^=\s*TODAY\(\)\s*(?:([+-])\s*(\d+))?\s*$").unwrap());

/// Parse a `=TODAY()[+-]n` expression into a day offset
fn parse_today_formula(expr: &str) -> Option<i64> {
    let caps = TODAY_FORMULA.captures(expr)?;
    let offset = match (caps.get(1), caps.get(2)) {
        (Some(sign), Some(days)) => {
            let days: i64 = days.as_str().parse().ok()?;
            if sign.as_str() == "-" { -days } else { days }
        }
        _ => 0,
    };
    Some(offset)
}

impl Serialize for DateBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DateBound::Literal(date) => serializer.serialize_str(&date.to_string()),
            DateBound::RelativeToToday(offset) => serializer.serialize_str(&format_today_formula(*offset)),
        }
    }
}

impl<'de> Deserialize<'de> for DateBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Some(offset) = parse_today_formula(&raw) {
            return Ok(DateBound::RelativeToToday(offset));
        }
        raw.parse::<NaiveDate>()
            .map(DateBound::Literal)
            .map_err(|_| de::Error::custom(format!("invalid date bound: {raw:?}")))
    }
}

impl Serialize for DateTimeBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DateTimeBound::Literal(dt) => serializer.serialize_str(&dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            DateTimeBound::RelativeToToday(offset) => serializer.serialize_str(&format_today_formula(*offset)),
        }
    }
}

impl<'de> Deserialize<'de> for DateTimeBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Some(offset) = parse_today_formula(&raw) {
            return Ok(DateTimeBound::RelativeToToday(offset));
        }
        parse_datetime(&raw)
            .map(DateTimeBound::Literal)
            .ok_or_else(|| de::Error::custom(format!("invalid datetime bound: {raw:?}")))
    }
}

fn format_today_formula(offset: i64) -> String {
    if offset == 0 {
        "=TODAY()".to_string()
    } else if offset > 0 {
        format!("=TODAY()+{offset}")
    } else {
        format!("=TODAY()-{}", -offset)
    }
}

/// Parse a datetime from the formats the templates produce
pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ").ok())
}

/// Parse a time of day from the formats the templates produce
pub(crate) fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .ok()
        .or_else(|| NaiveTime::parse_from_str(raw, "%H:%M").ok())
        .or_else(|| NaiveTime::parse_from_str(raw, "%H:%M:%SZ").ok())
}

impl Serialize for TimeBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeBound::Literal(time) => serializer.serialize_str(&time.to_string()),
            TimeBound::FractionalDay(fraction) => serializer.serialize_f64(*fraction),
        }
    }
}

impl<'de> Deserialize<'de> for TimeBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimeBoundVisitor;

        impl<'de> Visitor<'de> for TimeBoundVisitor {
            type Value = TimeBound;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a time of day or a fraction of a day")
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<TimeBound, E> {
                Ok(TimeBound::FractionalDay(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<TimeBound, E> {
                Ok(TimeBound::FractionalDay(value as f64))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<TimeBound, E> {
                Ok(TimeBound::FractionalDay(value as f64))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<TimeBound, E> {
                parse_time(value)
                    .map(TimeBound::Literal)
                    .ok_or_else(|| E::custom(format!("invalid time bound: {value:?}")))
            }
        }

        deserializer.deserialize_any(TimeBoundVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_today_formula() {
        assert_eq!(parse_today_formula("=TODAY()"), Some(0));
        assert_eq!(parse_today_formula("=TODAY()+2"), Some(2));
        assert_eq!(parse_today_formula("=TODAY()-7"), Some(-7));
        assert_eq!(parse_today_formula("=TODAY() + 2"), Some(2));
        assert_eq!(parse_today_formula("2000-01-01"), None);
        assert_eq!(parse_today_formula("=NOW()"), None);
    }

    #[test]
    fn test_date_bound_from_yaml() {
        let bound: DateBound = serde_yaml::from_str("\"2000-01-01\"").unwrap();
        assert_eq!(
            bound,
            DateBound::Literal(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        );

        let bound: DateBound = serde_yaml::from_str("\"=TODAY()+2\"").unwrap();
        assert_eq!(bound, DateBound::RelativeToToday(2));
    }

    #[test]
    fn test_rule_from_yaml() {
        let yaml = r#"
kind: decimal
criteria: between
minimum: -90
maximum: 90
"#;
        let rule: ValidationRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            rule,
            ValidationRule::Decimal {
                criteria: Criteria::Between {
                    minimum: -90.0,
                    maximum: 90.0
                }
            }
        );
    }

    #[test]
    fn test_rule_unknown_kind_is_rejected() {
        let yaml = "kind: telepathy\ncriteria: between\nminimum: 0\nmaximum: 1\n";
        assert!(serde_yaml::from_str::<ValidationRule>(yaml).is_err());
    }

    #[test]
    fn test_enumeration_source_from_yaml() {
        let inline: EnumerationSource = serde_yaml::from_str("[up, down]").unwrap();
        assert_eq!(
            inline,
            EnumerationSource::Inline(vec!["up".to_string(), "down".to_string()])
        );

        let lookup: EnumerationSource = serde_yaml::from_str("gear_types").unwrap();
        assert_eq!(lookup, EnumerationSource::Lookup("gear_types".to_string()));
    }

    #[test]
    fn test_time_bound_from_yaml() {
        let fractional: TimeBound = serde_yaml::from_str("0.5").unwrap();
        assert_eq!(fractional, TimeBound::FractionalDay(0.5));

        let literal: TimeBound = serde_yaml::from_str("\"12:30:00\"").unwrap();
        assert_eq!(
            literal,
            TimeBound::Literal(NaiveTime::from_hms_opt(12, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_field_spec_roundtrip() {
        let spec = FieldSpec::new("decimalLatitude", "Decimal Latitude")
            .with_units("degrees_north")
            .inheritable()
            .with_rule(ValidationRule::Decimal {
                criteria: Criteria::Between {
                    minimum: -90.0,
                    maximum: 90.0,
                },
            });
        let yaml = serde_yaml::to_string(&spec).unwrap();
        let back: FieldSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, spec);
    }
}
