//! Models module for the SDK
//!
//! Defines the core data structures of the validation engine:
//! - Field specifications and their validation rules
//! - Record tables (candidate submissions)
//! - Validation reports

pub mod field;
pub mod report;
pub mod table;

pub use field::{
    Criteria, DateBound, DateTimeBound, EnumerationSource, FieldSpec, TimeBound, ValidationRule,
};
pub use report::{compress_rows, ValidationReport};
pub use table::{CellValue, Record, RecordTable, TableError};
