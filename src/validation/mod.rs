//! Validation functionality
//!
//! Provides the checks run over a submitted batch before it is accepted
//! into the catalogue:
//! - Batch validation (structure, identity integrity, per-cell content,
//!   cross-field physical invariants)
//! - Single-record validation for dataset metadata
//! - The orchestrating runner tying registries, normalization and the
//!   validators together

pub mod batch;
pub mod metadata;
pub mod runner;

pub use batch::check_batch;
pub use metadata::check_single;
pub use runner::ValidationRunner;

use crate::models::CellValue;
use crate::normalize::is_null_like;

/// Submission-mode inputs for a batch check
#[derive(Debug, Clone)]
pub struct SubmissionOptions {
    /// Columns the submission must contain
    pub required: Vec<String>,
    /// True when records are logged for the first time; enables the
    /// already-registered identifier check
    pub is_new: bool,
    /// Added to in-table row indices in every reported row number; 0 for API
    /// submissions, the header height (4) for spreadsheet imports
    pub first_row_offset: i64,
    /// When a single record's identifier was edited in the form, the
    /// identifier it was registered under; a row keeping this id is checked
    /// as an update, any other id as a new record
    pub previous_id: Option<String>,
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self {
            required: Vec::new(),
            is_new: true,
            first_row_offset: 0,
            previous_id: None,
        }
    }
}

/// Cells the catalogue treats as deliberately valueless
///
/// Null-like cells and the registered-null sentinel are exempt from content
/// checks; requiredness is handled separately.
pub(crate) fn exempt_from_content_check(value: &CellValue) -> bool {
    is_null_like(value) || value.as_text() == Some("NULL")
}
