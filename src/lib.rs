//! Metadata Validation SDK - Shared library for checking sample metadata submissions
//!
//! Provides unified interfaces for:
//! - Field catalogs (built-in and YAML-loaded specifications)
//! - Rule compilation (declarative validation rules to executable predicates)
//! - Value normalization (spreadsheet formatting repair)
//! - Batch and single-record validation with row-addressable error reports
//! - Collaborator abstractions (enumeration lookups, registered identifiers)

pub mod catalog;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod registry;
pub mod rules;
pub mod validation;

// Re-export commonly used types
pub use catalog::{load_fields_file, load_fields_str, ConfigError};
pub use models::{
    CellValue, Criteria, FieldSpec, Record, RecordTable, ValidationReport, ValidationRule,
};
pub use normalize::{clean, is_null_like, normalize_number, try_parse_number, FormatError, Number};
pub use providers::{
    LookupError, LookupProvider, NoLookup, RegisteredIdsProvider, StaticLookupProvider,
    StaticRegisteredIds,
};
pub use registry::{Checker, FieldRegistry};
pub use rules::Evaluator;
pub use validation::{check_batch, check_single, SubmissionOptions, ValidationRunner};
