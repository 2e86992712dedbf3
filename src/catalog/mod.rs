//! Field catalogs
//!
//! Provides the field specifications a validation run works from:
//! - Built-in sample and dataset-metadata catalogs
//! - YAML loading for deployment-specific catalogs
//!
//! A malformed catalog is a configuration error and fails loudly; it is the
//! one kind of problem this crate raises instead of reporting.

mod metadata;
mod sample;

pub use metadata::metadata_fields;
pub use sample::sample_fields;

use std::path::Path;

use crate::models::FieldSpec;

/// Error loading a field catalog
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid field catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Parse a field catalog from YAML
///
/// The document is a sequence of field specifications:
///
/// ```yaml
/// - name: decimalLatitude
///   disp_name: Decimal Latitude
///   units: degrees_north
///   inherit: true
///   valid:
///     kind: decimal
///     criteria: between
///     minimum: -90
///     maximum: 90
/// ```
pub fn load_fields_str(yaml: &str) -> Result<Vec<FieldSpec>, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Read and parse a field catalog file
pub fn load_fields_file(path: impl AsRef<Path>) -> Result<Vec<FieldSpec>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_fields_str(&content)
}
