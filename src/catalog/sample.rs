//! Built-in sample field catalog
//!
//! The fields a sample-logging template can carry, with their validation
//! rules. Coded identifiers are 36-character UUIDs; dates are bounded by the
//! start of the programme and "the day after tomorrow" to catch clock and
//! typo errors; coordinates and depths carry their physical ranges.

use chrono::NaiveDate;

use crate::models::{
    Criteria, DateBound, EnumerationSource, FieldSpec, TimeBound, ValidationRule,
};

fn uuid_rule() -> ValidationRule {
    ValidationRule::Length {
        criteria: Criteria::Equals { value: 36 },
    }
}

fn event_date_rule() -> ValidationRule {
    ValidationRule::Date {
        criteria: Criteria::Between {
            minimum: DateBound::Literal(programme_start()),
            maximum: DateBound::RelativeToToday(2),
        },
    }
}

fn event_time_rule() -> ValidationRule {
    ValidationRule::Time {
        criteria: Criteria::Between {
            minimum: TimeBound::FractionalDay(0.0),
            maximum: TimeBound::FractionalDay(0.999_999_9),
        },
    }
}

fn decimal_between(minimum: f64, maximum: f64) -> ValidationRule {
    ValidationRule::Decimal {
        criteria: Criteria::Between { minimum, maximum },
    }
}

fn decimal_at_least(value: f64) -> ValidationRule {
    ValidationRule::Decimal {
        criteria: Criteria::GreaterOrEqual { value },
    }
}

fn decimal_above(value: f64) -> ValidationRule {
    ValidationRule::Decimal {
        criteria: Criteria::GreaterThan { value },
    }
}

fn lookup(source: &str) -> ValidationRule {
    ValidationRule::Enumeration {
        source: EnumerationSource::Lookup(source.to_string()),
    }
}

fn programme_start() -> NaiveDate {
    // Records predating the programme are transcription errors
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

/// The built-in sample field specifications
pub fn sample_fields() -> Vec<FieldSpec> {
    vec![
        // Identifiers
        FieldSpec::new("id", "ID")
            .with_description("A 36 character long universally unique ID (UUID) including 4 '-'. Could be read in with a code reader.")
            .with_rule(uuid_rule()),
        FieldSpec::new("parentID", "Parent ID")
            .with_description("ID of the sample this subsample was taken from.")
            .with_rule(uuid_rule()),
        FieldSpec::new("eventID", "Event ID")
            .with_description("An identifier for the set of information associated with an Event (something that occurs at a place and time).")
            .with_rule(uuid_rule()),
        FieldSpec::new("occurrenceID", "Occurrence ID")
            .with_description("An identifier for the Occurrence (as opposed to a particular digital record of the occurrence).")
            .with_rule(uuid_rule()),
        FieldSpec::new("measurementID", "Measurement ID")
            .with_rule(uuid_rule()),
        FieldSpec::new("catalogNumber", "Catalogue Number")
            .with_rule(ValidationRule::Length {
                criteria: Criteria::GreaterThan { value: 3 },
            }),
        FieldSpec::new("bottleNumber", "Bottle Number")
            .with_rule(ValidationRule::Integer {
                criteria: Criteria::GreaterThan { value: 0 },
            }),
        FieldSpec::new("recordNumber", "Record Number")
            .with_rule(ValidationRule::Integer {
                criteria: Criteria::GreaterThan { value: 0 },
            }),
        FieldSpec::new("statID", "Local Station ID")
            .with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("stationName", "Station Name")
            .inheritable()
            .with_rule(lookup("stations")),
        // Timing
        FieldSpec::new("eventDate", "Event Date (UTC)")
            .with_description("Start date that the data were collected at, in ISO8601 format, e.g. 2022-04-10.")
            .inheritable()
            .with_rule(event_date_rule()),
        FieldSpec::new("middleDate", "Middle Date (UTC)")
            .inheritable()
            .with_rule(event_date_rule()),
        FieldSpec::new("endDate", "End Date (UTC)")
            .inheritable()
            .with_rule(event_date_rule()),
        FieldSpec::new("eventTime", "Event Time (UTC)")
            .inheritable()
            .with_rule(event_time_rule()),
        FieldSpec::new("middleTime", "Middle Time (UTC)")
            .inheritable()
            .with_rule(event_time_rule()),
        FieldSpec::new("endTime", "End Time (UTC)")
            .inheritable()
            .with_rule(event_time_rule()),
        // Coordinates
        FieldSpec::new("decimalLatitude", "Decimal Latitude")
            .with_description("Latitude in decimal degrees, northern hemisphere positive.")
            .with_units("degrees_north")
            .inheritable()
            .with_rule(decimal_between(-90.0, 90.0)),
        FieldSpec::new("decimalLongitude", "Decimal Longitude")
            .with_description("Longitude in decimal degrees, east of Greenwich positive.")
            .with_units("degree_east")
            .inheritable()
            .with_rule(decimal_between(-180.0, 180.0)),
        FieldSpec::new("endDecimalLatitude", "End Decimal Latitude")
            .with_units("degrees_north")
            .inheritable()
            .with_rule(decimal_between(-90.0, 90.0)),
        FieldSpec::new("endDecimalLongitude", "End Decimal Longitude")
            .with_units("degree_east")
            .inheritable()
            .with_rule(decimal_between(-180.0, 180.0)),
        FieldSpec::new("shipSpeedInMetersPerSecond", "Ship Speed (m/s)")
            .with_units("m/s")
            .with_rule(decimal_at_least(0.0)),
        FieldSpec::new("bottomDepthInMeters", "Bottom Depth (m)")
            .with_units("m")
            .inheritable()
            .with_rule(decimal_at_least(0.0)),
        // Vertical extent
        FieldSpec::new("minimumDepthInMeters", "Minimum depth (m)")
            .with_description("The minimum depth sampled in meters; 0 m is the surface. Include depth or elevation, not both.")
            .with_units("m")
            .inheritable_weak()
            .with_rule(decimal_between(0.0, 9999.0)),
        FieldSpec::new("maximumDepthInMeters", "Maximum depth (m)")
            .with_units("m")
            .inheritable_weak()
            .with_rule(decimal_between(0.0, 9999.0)),
        FieldSpec::new("minimumElevationInMeters", "Minimum elevation (m)")
            .with_units("m")
            .inheritable_weak()
            .with_rule(decimal_at_least(0.0)),
        FieldSpec::new("maximumElevationInMeters", "Maximum elevation (m)")
            .with_units("m")
            .inheritable_weak()
            .with_rule(decimal_at_least(0.0)),
        // Personnel; the *_details composites expand into these
        FieldSpec::new("pi_details", "PI Details").with_rule(lookup("personnel")),
        FieldSpec::new("pi_name", "PI Name").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("pi_email", "PI Email").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("pi_orcid", "PI OrcID").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("pi_institution", "PI Institution").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("recordedBy_details", "Recorded By").with_rule(lookup("personnel")),
        FieldSpec::new("recordedBy_name", "Recorded By (Name)").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("recordedBy_email", "Recorded By (Email)").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("recordedBy_orcid", "Recorded By (OrcID)").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("recordedBy_institution", "Recorded By (Institution)")
            .with_rule(ValidationRule::AcceptAny),
        // Sampling
        FieldSpec::new("sampleType", "Sample Type").with_rule(lookup("sample_types")),
        FieldSpec::new("intendedMethod", "Intended Method").with_rule(lookup("intended_methods")),
        FieldSpec::new("gearType", "Gear Type")
            .inheritable()
            .with_rule(lookup("gear_types")),
        FieldSpec::new("storageTemp", "Storage temp").with_rule(lookup("storage_temperatures")),
        FieldSpec::new("fixative", "Fixative").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("filter", "Filter").with_rule(lookup("filters")),
        FieldSpec::new("sampleLocation", "Sample Location").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("dilution_factor", "Dilution factor").with_rule(decimal_above(0.0)),
        FieldSpec::new("filteredVolumeInMilliliters", "Filtered Volume (mL)")
            .with_units("mL")
            .with_rule(decimal_above(0.0)),
        FieldSpec::new("sampleVolumeInMilliliters", "Sample Volume (mL)")
            .with_units("mL")
            .with_rule(decimal_above(0.0)),
        // Species and measurements
        FieldSpec::new("individualCount", "Individual Count")
            .with_rule(ValidationRule::Integer {
                criteria: Criteria::GreaterThan { value: 0 },
            }),
        FieldSpec::new("scientificName", "Scientific Name").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("kingdom", "Kingdom").with_rule(lookup("kingdoms")),
        FieldSpec::new("sex", "Sex").with_rule(lookup("sex")),
        FieldSpec::new("maturationStage", "Maturation Stage")
            .with_rule(ValidationRule::Integer {
                criteria: Criteria::Between { minimum: 0, maximum: 7 },
            }),
        FieldSpec::new("weightInGrams", "Weight (g)")
            .with_units("g")
            .with_rule(decimal_above(0.0)),
        FieldSpec::new("seaWaterTemperatureInCelsius", "Sea Water Temp (C)")
            .with_units("Celsius")
            .with_rule(decimal_above(-10.0)),
        FieldSpec::new("seaWaterPracticalSalinity", "Sea Water Practical Salinity")
            .with_units("1")
            .with_rule(decimal_at_least(0.0)),
        FieldSpec::new("seaWaterPH", "Sea Water pH (total scale)")
            .with_units("1")
            .with_rule(decimal_between(-2.0, 16.0)),
        FieldSpec::new("seaIceThicknessInCentimeters", "Sea Ice Thickness (cm)")
            .with_units("cm")
            .with_rule(decimal_above(0.0)),
        // Record details
        FieldSpec::new("serialNumber", "Instrument Serial Number")
            .with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("dataFilename", "Data Filename").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("samplingProtocolDoc", "Sampling Protocol Document")
            .with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("samplingProtocolSection", "Sampling Protocol Section")
            .with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("samplingProtocolVersion", "Sampling Protocol Version")
            .with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("comments1", "Comments").with_rule(ValidationRule::AcceptAny),
        FieldSpec::new("comments2", "More Comments").with_rule(ValidationRule::AcceptAny),
    ]
}
