//! Built-in dataset metadata field catalog
//!
//! Fields describing the dataset as a whole (one row per submission), drawn
//! from the discovery conventions the templates target.

use chrono::NaiveDateTime;

use crate::models::{
    Criteria, DateTimeBound, EnumerationSource, FieldSpec, ValidationRule,
};

fn accept_any() -> ValidationRule {
    ValidationRule::AcceptAny
}

fn coverage_rule() -> ValidationRule {
    let start = NaiveDateTime::parse_from_str("2000-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")
        .unwrap_or_default();
    ValidationRule::DateTime {
        criteria: Criteria::Between {
            minimum: DateTimeBound::Literal(start),
            maximum: DateTimeBound::RelativeToToday(2),
        },
    }
}

fn decimal_between(minimum: f64, maximum: f64) -> ValidationRule {
    ValidationRule::Decimal {
        criteria: Criteria::Between { minimum, maximum },
    }
}

/// The built-in dataset metadata field specifications
pub fn metadata_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("title", "Title")
            .with_description("A short phrase or sentence describing the dataset.")
            .with_rule(accept_any()),
        FieldSpec::new("abstract", "Abstract")
            .with_description("A paragraph describing the dataset, analogous to an abstract for a paper.")
            .with_rule(accept_any()),
        FieldSpec::new("metadataProvider", "Metadata Provider").with_rule(accept_any()),
        FieldSpec::new("language", "Language").with_rule(accept_any()),
        FieldSpec::new("keywords", "Keywords").with_rule(accept_any()),
        FieldSpec::new("geospatial_lat_min", "Minimum Latitude")
            .with_units("degrees_north")
            .with_rule(decimal_between(-90.0, 90.0)),
        FieldSpec::new("geospatial_lat_max", "Maximum Latitude")
            .with_units("degrees_north")
            .with_rule(decimal_between(-90.0, 90.0)),
        FieldSpec::new("geospatial_lon_min", "Minimum Longitude")
            .with_units("degree_east")
            .with_rule(decimal_between(-180.0, 180.0)),
        FieldSpec::new("geospatial_lon_max", "Maximum Longitude")
            .with_units("degree_east")
            .with_rule(decimal_between(-180.0, 180.0)),
        FieldSpec::new("geospatial_vertical_min", "Minimum Vertical (m)")
            .with_units("m")
            .with_rule(decimal_between(0.0, 9999.0)),
        FieldSpec::new("geospatial_vertical_max", "Maximum Vertical (m)")
            .with_units("m")
            .with_rule(decimal_between(0.0, 9999.0)),
        FieldSpec::new("geospatial_vertical_positive", "Vertical Positive Direction")
            .with_rule(ValidationRule::Enumeration {
                source: EnumerationSource::Inline(vec!["up".to_string(), "down".to_string()]),
            }),
        FieldSpec::new("time_coverage_start", "Time Coverage Start")
            .with_description("Time of the first data point, ISO8601 in UTC, e.g. 2022-04-10T15:42:38Z.")
            .with_rule(coverage_rule()),
        FieldSpec::new("time_coverage_end", "Time Coverage End")
            .with_rule(coverage_rule()),
        FieldSpec::new("date_created", "Date Created").with_rule(coverage_rule()),
        FieldSpec::new("creator_name", "Creator Name").with_rule(accept_any()),
        FieldSpec::new("creator_email", "Creator Email").with_rule(accept_any()),
        FieldSpec::new("creator_institution", "Creator Institution").with_rule(accept_any()),
        FieldSpec::new("project", "Project").with_rule(accept_any()),
        FieldSpec::new("license", "License").with_rule(accept_any()),
        FieldSpec::new("cruise_number", "Cruise Number").with_rule(accept_any()),
        FieldSpec::new("cruise_name", "Cruise Name").with_rule(accept_any()),
        FieldSpec::new("vessel_name", "Vessel Name").with_rule(accept_any()),
    ]
}
