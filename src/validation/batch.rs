//! Batch validation
//!
//! Checks a table of candidate records against the field registry and the
//! catalogue's integrity rules. Malformed data is the expected case here and
//! is always reported through the returned [`ValidationReport`]; this module
//! never fails on user input.

use std::collections::{HashMap, HashSet};

use crate::models::{compress_rows, CellValue, RecordTable, ValidationReport};
use crate::normalize::{is_null_like, try_parse_number};
use crate::registry::FieldRegistry;

use super::{exempt_from_content_check, SubmissionOptions};

/// The four personnel columns each `*_details` composite expands into
const PI_DETAIL_COLUMNS: [&str; 4] = ["pi_name", "pi_email", "pi_orcid", "pi_institution"];
const RECORDED_BY_DETAIL_COLUMNS: [&str; 4] = [
    "recordedBy_name",
    "recordedBy_email",
    "recordedBy_orcid",
    "recordedBy_institution",
];
/// Personnel sub-fields that may legitimately be left blank
const OPTIONAL_PERSONNEL_COLUMNS: [&str; 2] = ["pi_orcid", "recordedBy_orcid"];

/// The vertical-extent columns; every record must place itself on this axis
const VERTICAL_EXTENT_COLUMNS: [&str; 4] = [
    "minimumDepthInMeters",
    "maximumDepthInMeters",
    "minimumElevationInMeters",
    "maximumElevationInMeters",
];

/// Validate a batch of candidate records
///
/// Structural problems (missing required columns, unrecognized columns) stop
/// the run before any content check: there is no meaningful cell validation
/// over an unrecognized schema. Identity, content and cross-field checks are
/// independent and all of their findings are reported together.
pub fn check_batch(
    table: &RecordTable,
    registry: &FieldRegistry,
    registered_ids: &HashSet<String>,
    options: &SubmissionOptions,
) -> ValidationReport {
    let mut report = ValidationReport::pass();

    check_required_columns(table, options, &mut report);
    check_unknown_columns(table, registry, &mut report);
    if !report.passed {
        report.push(
            "Not doing any more tests until all required fields are present \
             and all fields are recognised",
        );
        return report;
    }

    check_identities(table, registered_ids, options, &mut report);
    check_cell_content(table, registry, options, &mut report);
    check_vertical_extent(table, options, &mut report);

    report
}

fn check_required_columns(
    table: &RecordTable,
    options: &SubmissionOptions,
    report: &mut ValidationReport,
) {
    let mut pi_reported = false;
    let mut recorded_by_reported = false;

    for required in &options.required {
        if table.has_column(required) {
            continue;
        }
        if PI_DETAIL_COLUMNS.contains(&required.as_str()) {
            // One umbrella message for the composite, and the optional
            // sub-field alone never triggers it
            if required != "pi_orcid" && !pi_reported {
                report.push("Required field \"pi_details\" is missing");
                pi_reported = true;
            }
        } else if RECORDED_BY_DETAIL_COLUMNS.contains(&required.as_str()) {
            if required != "recordedBy_orcid" && !recorded_by_reported {
                report.push("Required field \"recordedBy_details\" is missing");
                recorded_by_reported = true;
            }
        } else {
            report.push(format!("Required field \"{required}\" is missing"));
        }
    }
}

fn check_unknown_columns(
    table: &RecordTable,
    registry: &FieldRegistry,
    report: &mut ValidationReport,
) {
    let unknown: Vec<&str> = table
        .columns()
        .filter(|column| !registry.contains(column))
        .collect();
    if !unknown.is_empty() {
        report.push(format!(
            "Field name not recognised: [{}]",
            unknown.join(", ")
        ));
    }
}

/// The row's identifier, when it carries one
fn id_at<'t>(table: &'t RecordTable, row: usize, column: &str) -> Option<&'t str> {
    table
        .cell(row, column)
        .filter(|cell| !is_null_like(cell))
        .and_then(CellValue::as_text)
}

fn check_identities(
    table: &RecordTable,
    registered_ids: &HashSet<String>,
    options: &SubmissionOptions,
    report: &mut ValidationReport,
) {
    if !table.has_column("id") {
        return;
    }
    let multi = table.row_count() > 1;
    let has_parent = table.has_column("parentID");

    let mut id_counts: HashMap<&str, usize> = HashMap::new();
    for row in 0..table.row_count() {
        if let Some(id) = id_at(table, row, "id") {
            *id_counts.entry(id).or_insert(0) += 1;
        }
    }

    let mut already_registered = Vec::new();
    let mut duplicates = Vec::new();
    let mut self_parents = Vec::new();
    let mut missing_parents = Vec::new();

    for row in 0..table.row_count() {
        let rownum = row as i64 + options.first_row_offset;
        if let Some(id) = id_at(table, row, "id") {
            // A row that changed its identifier away from the previous one
            // is checked as a new registration
            let treat_as_new = match &options.previous_id {
                Some(previous) if id != previous => true,
                _ => options.is_new,
            };
            if treat_as_new && registered_ids.contains(id) {
                already_registered.push(rownum);
            }
            if id_counts.get(id).copied().unwrap_or(0) > 1 {
                duplicates.push(rownum);
            }
            if has_parent && id_at(table, row, "parentID") == Some(id) {
                self_parents.push(rownum);
            }
        }
        if has_parent {
            if let Some(parent) = id_at(table, row, "parentID") {
                if !registered_ids.contains(parent) && id_counts.get(parent).is_none() {
                    missing_parents.push(rownum);
                }
            }
        }
    }

    if !already_registered.is_empty() {
        if multi {
            report.push(format!(
                "ID(s) already registered in the system, Rows: {}",
                compress_rows(&already_registered)
            ));
        } else {
            report.push("ID already registered in the system");
        }
    }
    if !duplicates.is_empty() {
        report.push(format!(
            "ID(s) registered more than once in same upload, Rows: {}",
            compress_rows(&duplicates)
        ));
    }
    if !self_parents.is_empty() {
        if multi {
            report.push(format!(
                "ID is same as Parent ID, Rows: {}",
                compress_rows(&self_parents)
            ));
        } else {
            report.push("ID and ParentID cannot be the same");
        }
    }
    if !missing_parents.is_empty() {
        if multi {
            report.push(format!(
                "ParentID not registered, Rows: {}",
                compress_rows(&missing_parents)
            ));
        } else {
            report.push("ParentID not registered in system");
        }
    }
}

fn check_cell_content(
    table: &RecordTable,
    registry: &FieldRegistry,
    options: &SubmissionOptions,
    report: &mut ValidationReport,
) {
    let multi = table.row_count() > 1;

    for column in table.columns() {
        let checker = registry
            .get(column)
            .expect("every column was checked against the registry");
        let required = options.required.iter().any(|r| r == column);

        let mut bad_content = Vec::new();
        let mut blanks = Vec::new();

        for row in 0..table.row_count() {
            let rownum = row as i64 + options.first_row_offset;
            let Some(value) = table.cell(row, column) else {
                continue;
            };

            if exempt_from_content_check(value) {
                if required
                    && is_null_like(value)
                    && !OPTIONAL_PERSONNEL_COLUMNS.contains(&column)
                {
                    blanks.push(rownum);
                }
            } else if !checker.evaluate(value) {
                bad_content.push(rownum);
            }
        }

        if !bad_content.is_empty() {
            if multi {
                report.push(format!(
                    "{} ({}), Rows: {} Error: Content in wrong format",
                    checker.disp_name,
                    checker.name,
                    compress_rows(&bad_content)
                ));
            } else {
                report.push(format!("Content in wrong format ({})", checker.disp_name));
            }
        }
        if !blanks.is_empty() {
            if multi {
                report.push(format!(
                    "{} ({}), Rows: {} Error: Value missing (required)",
                    checker.disp_name,
                    checker.name,
                    compress_rows(&blanks)
                ));
            } else {
                report.push(format!("Required value missing ({})", checker.disp_name));
            }
        }
    }
}

/// A numeric reading of a cell, ignoring deliberately valueless cells
fn numeric_cell(table: &RecordTable, row: usize, column: &str) -> Option<f64> {
    let value = table.cell(row, column)?;
    if exempt_from_content_check(value) {
        return None;
    }
    try_parse_number(value).map(|n| n.as_f64())
}

fn check_vertical_extent(
    table: &RecordTable,
    options: &SubmissionOptions,
    report: &mut ValidationReport,
) {
    let multi = table.row_count() > 1;

    // min <= max, checked only where both cells hold numbers; malformed
    // cells are already reported by the content stage
    for (minimum_col, maximum_col, label) in [
        ("minimumDepthInMeters", "maximumDepthInMeters", "depth"),
        (
            "minimumElevationInMeters",
            "maximumElevationInMeters",
            "elevation",
        ),
    ] {
        if !table.has_column(minimum_col) || !table.has_column(maximum_col) {
            continue;
        }
        let mut out_of_order = Vec::new();
        for row in 0..table.row_count() {
            if let (Some(minimum), Some(maximum)) = (
                numeric_cell(table, row, minimum_col),
                numeric_cell(table, row, maximum_col),
            ) {
                if minimum > maximum {
                    out_of_order.push(row as i64 + options.first_row_offset);
                }
            }
        }
        if !out_of_order.is_empty() {
            let message = format!(
                "Maximum {label} must be greater than or equal to minimum {label}"
            );
            if multi {
                report.push(format!(
                    "{message}, Rows: {}",
                    compress_rows(&out_of_order)
                ));
            } else {
                report.push(format!("{message}."));
            }
        }
    }

    // Every record needs a vertical placement: flagged when the submission
    // carries all four extent columns and a row leaves every one blank
    if VERTICAL_EXTENT_COLUMNS
        .iter()
        .all(|column| table.has_column(column))
    {
        let mut missing = Vec::new();
        for row in 0..table.row_count() {
            let all_blank = VERTICAL_EXTENT_COLUMNS.iter().all(|column| {
                table
                    .cell(row, column)
                    .map(is_null_like)
                    .unwrap_or(true)
            });
            if all_blank {
                missing.push(row as i64 + options.first_row_offset);
            }
        }
        if !missing.is_empty() {
            let message = "Please include an elevation or depth (preferably both minimum \
                 and maximum, they can be the same)";
            if multi {
                report.push(format!("{message}, Rows: {}", compress_rows(&missing)));
            } else {
                report.push(message);
            }
        }
    }
}
