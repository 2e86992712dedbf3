//! External collaborator abstraction
//!
//! Defines the two lookup interfaces the engine depends on and in-memory
//! implementations for tests and offline runs:
//! - `LookupProvider`: resolves a named enumeration source to its accepted
//!   strings (backed by a database table or a static config file upstream)
//! - `RegisteredIdsProvider`: the identifiers already on file in the
//!   catalogue, used for duplicate and dangling-parent detection
//!
//! Both contracts are synchronous; retry and timeout policy belongs to the
//! caller that owns the actual backend.

use std::collections::{HashMap, HashSet};

/// Error type for collaborator lookups
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("unknown enumeration source: {0}")]
    UnknownSource(String),
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("backend error: {0}")]
    BackendError(String),
}

/// Resolves named enumeration sources to their accepted string sets
pub trait LookupProvider {
    fn fetch_enumeration(&self, source: &str) -> Result<Vec<String>, LookupError>;
}

/// Supplies the record identifiers already registered in the catalogue
pub trait RegisteredIdsProvider {
    fn fetch_registered_ids(&self) -> Result<HashSet<String>, LookupError>;
}

/// In-memory lookup provider backed by named lists
///
/// # Example
///
/// ```rust
/// use metadata_validation_sdk::providers::{LookupProvider, StaticLookupProvider};
///
/// let provider = StaticLookupProvider::new()
///     .with_list("gear_types", ["CTD", "Multinet", "Box corer"]);
/// assert_eq!(provider.fetch_enumeration("gear_types").unwrap().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticLookupProvider {
    lists: HashMap<String, Vec<String>>,
}

impl StaticLookupProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list<I, S>(mut self, source: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists.insert(
            source.to_string(),
            values.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl LookupProvider for StaticLookupProvider {
    fn fetch_enumeration(&self, source: &str) -> Result<Vec<String>, LookupError> {
        self.lists
            .get(source)
            .cloned()
            .ok_or_else(|| LookupError::UnknownSource(source.to_string()))
    }
}

/// In-memory registered-id set
#[derive(Debug, Clone, Default)]
pub struct StaticRegisteredIds {
    ids: HashSet<String>,
}

impl StaticRegisteredIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl RegisteredIdsProvider for StaticRegisteredIds {
    fn fetch_registered_ids(&self) -> Result<HashSet<String>, LookupError> {
        Ok(self.ids.clone())
    }
}

/// A collaborator that is never available
///
/// Stands in when the engine runs without a database connection; enumeration
/// rules degrade to no constraint and the registered-id set to empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl LookupProvider for NoLookup {
    fn fetch_enumeration(&self, source: &str) -> Result<Vec<String>, LookupError> {
        Err(LookupError::Unavailable(format!(
            "no lookup backend configured (source: {source})"
        )))
    }
}

impl RegisteredIdsProvider for NoLookup {
    fn fetch_registered_ids(&self) -> Result<HashSet<String>, LookupError> {
        Err(LookupError::Unavailable(
            "no registered-id backend configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_lookup_unknown_source() {
        let provider = StaticLookupProvider::new().with_list("sex", ["male", "female"]);
        assert!(matches!(
            provider.fetch_enumeration("kingdoms"),
            Err(LookupError::UnknownSource(_))
        ));
    }

    #[test]
    fn test_no_lookup_is_unavailable() {
        assert!(NoLookup.fetch_enumeration("anything").is_err());
        assert!(NoLookup.fetch_registered_ids().is_err());
    }
}
