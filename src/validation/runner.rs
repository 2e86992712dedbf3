//! Validation runner
//!
//! The entry point callers use: builds the field registries, normalizes the
//! submitted table, fetches the registered-id set, and runs the batch and
//! metadata validators. Lookup collaborators that fail degrade the affected
//! checks instead of failing the run.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::catalog;
use crate::models::{FieldSpec, Record, RecordTable, ValidationReport};
use crate::normalize;
use crate::providers::{LookupProvider, RegisteredIdsProvider};
use crate::registry::FieldRegistry;

use super::{batch, metadata, SubmissionOptions};

/// Runs the full validation pipeline over a submission
///
/// # Example
///
/// ```rust
/// use metadata_validation_sdk::models::RecordTable;
/// use metadata_validation_sdk::providers::{NoLookup, StaticRegisteredIds};
/// use metadata_validation_sdk::validation::{SubmissionOptions, ValidationRunner};
///
/// let registered = StaticRegisteredIds::new(Vec::<String>::new());
/// let runner = ValidationRunner::new(&NoLookup, &registered);
/// let table = RecordTable::new(["id", "eventDate"]);
/// let report = runner.run(&table, None, &SubmissionOptions::default());
/// assert!(report.passed);
/// ```
pub struct ValidationRunner<'a> {
    fields: Vec<FieldSpec>,
    metadata_fields: Vec<FieldSpec>,
    lookup: &'a dyn LookupProvider,
    registered_ids: &'a dyn RegisteredIdsProvider,
}

impl<'a> ValidationRunner<'a> {
    /// Create a runner over the built-in catalogs
    pub fn new(
        lookup: &'a dyn LookupProvider,
        registered_ids: &'a dyn RegisteredIdsProvider,
    ) -> Self {
        Self {
            fields: catalog::sample_fields(),
            metadata_fields: catalog::metadata_fields(),
            lookup,
            registered_ids,
        }
    }

    /// Replace the sample field catalog (deployment-specific templates)
    pub fn with_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields;
        self
    }

    /// Replace the dataset metadata field catalog
    pub fn with_metadata_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.metadata_fields = fields;
        self
    }

    /// Validate a submission; `metadata` is checked when present and both
    /// parts must pass
    pub fn run(
        &self,
        table: &RecordTable,
        metadata_record: Option<&Record>,
        options: &SubmissionOptions,
    ) -> ValidationReport {
        let registry = FieldRegistry::build(&self.fields, self.lookup);

        let mut table = table.clone();
        normalize::clean(&mut table);

        let registered = match self.registered_ids.fetch_registered_ids() {
            Ok(ids) => ids,
            Err(error) => {
                warn!(%error, "registered-id collaborator unavailable, skipping duplicate checks");
                HashSet::new()
            }
        };

        let mut report = batch::check_batch(&table, &registry, &registered, options);

        if let Some(record) = metadata_record {
            let metadata_registry = FieldRegistry::build(&self.metadata_fields, self.lookup);
            report.merge(metadata::check_single(record, &metadata_registry));
        }

        info!(
            rows = table.row_count(),
            passed = report.passed,
            errors = report.errors.len(),
            "validation run complete"
        );
        report
    }
}
