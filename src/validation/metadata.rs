//! Single-record validation
//!
//! Dataset metadata is one record, not a batch: no identifiers to
//! cross-check, no rows to compress. Content is checked the same way the
//! batch validator checks cells.

use crate::models::{Record, ValidationReport};
use crate::registry::FieldRegistry;

use super::exempt_from_content_check;

/// Validate a single metadata record
pub fn check_single(record: &Record, registry: &FieldRegistry) -> ValidationReport {
    let mut report = ValidationReport::pass();

    let unknown: Vec<&str> = record
        .iter()
        .map(|(name, _)| name)
        .filter(|name| !registry.contains(name))
        .collect();
    if !unknown.is_empty() {
        report.push(format!(
            "Field name not recognised: [{}]",
            unknown.join(", ")
        ));
    }

    for (name, value) in record.iter() {
        let Some(checker) = registry.get(name) else {
            continue;
        };
        if !exempt_from_content_check(value) && !checker.evaluate(value) {
            report.push(format!("Content in wrong format ({})", checker.disp_name));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::metadata_fields;
    use crate::models::CellValue;
    use crate::providers::NoLookup;

    fn metadata_registry() -> FieldRegistry {
        FieldRegistry::build(&metadata_fields(), &NoLookup)
    }

    #[test]
    fn test_valid_metadata_passes() {
        let mut record = Record::new();
        record.insert("title", CellValue::from("Mesozooplankton biodiversity"));
        record.insert("geospatial_lat_min", CellValue::Decimal(76.5));
        record.insert("time_coverage_start", CellValue::from("2022-04-10 15:42:38"));

        let report = check_single(&record, &metadata_registry());
        assert!(report.passed, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn test_out_of_range_latitude_is_reported() {
        let mut record = Record::new();
        record.insert("geospatial_lat_min", CellValue::Decimal(96.5));

        let report = check_single(&record, &metadata_registry());
        assert!(!report.passed);
        assert_eq!(
            report.errors,
            vec!["Content in wrong format (Minimum Latitude)"]
        );
    }

    #[test]
    fn test_blank_metadata_is_exempt() {
        let mut record = Record::new();
        record.insert("title", CellValue::Empty);
        record.insert("geospatial_lat_min", CellValue::from(""));

        let report = check_single(&record, &metadata_registry());
        assert!(report.passed);
    }

    #[test]
    fn test_unknown_metadata_field_is_reported() {
        let mut record = Record::new();
        record.insert("favourite_colour", CellValue::from("teal"));

        let report = check_single(&record, &metadata_registry());
        assert!(!report.passed);
        assert_eq!(
            report.errors,
            vec!["Field name not recognised: [favourite_colour]"]
        );
    }
}
