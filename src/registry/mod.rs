//! Field registry
//!
//! Combines field specifications with their compiled evaluators into the
//! name-keyed `Checker` map a validation run works against. A registry is
//! built fresh per run (enumeration sources may change between runs) and is
//! immutable afterwards, so sharing one across threads is safe.

use std::collections::HashMap;

use tracing::info;

use crate::models::{CellValue, FieldSpec};
use crate::providers::LookupProvider;
use crate::rules::Evaluator;

/// The composite personnel fields are expanded into their underlying columns
/// by the form layer and validated through those; they never get a checker.
pub const COMPOSITE_PERSONNEL_FIELDS: [&str; 2] = ["pi_details", "recordedBy_details"];

/// A compiled evaluator together with the field's display metadata
#[derive(Debug, Clone)]
pub struct Checker {
    pub name: String,
    pub disp_name: String,
    pub units: Option<String>,
    pub inherit: bool,
    pub inherit_weak: bool,
    evaluator: Evaluator,
}

impl Checker {
    /// Evaluate one cell against this field's rule
    pub fn evaluate(&self, value: &CellValue) -> bool {
        self.evaluator.evaluate(value)
    }
}

/// The complete name-to-checker map for one validation run
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    checkers: HashMap<String, Checker>,
}

impl FieldRegistry {
    /// Compile a set of field specifications into a registry
    ///
    /// Enumeration sources are resolved through `lookup` as each rule is
    /// compiled. Fields without a rule get an accept-any checker so every
    /// recognized column evaluates through the same interface.
    pub fn build(specs: &[FieldSpec], lookup: &dyn LookupProvider) -> Self {
        let mut checkers = HashMap::new();
        for spec in specs {
            if COMPOSITE_PERSONNEL_FIELDS.contains(&spec.name.as_str()) {
                continue;
            }
            let evaluator = match &spec.rule {
                Some(rule) => Evaluator::compile(rule, &spec.name, lookup),
                None => Evaluator::AcceptAny,
            };
            checkers.insert(
                spec.name.clone(),
                Checker {
                    name: spec.name.clone(),
                    disp_name: spec.disp_name.clone(),
                    units: spec.units.clone(),
                    inherit: spec.inherit,
                    inherit_weak: spec.inherit_weak,
                    evaluator,
                },
            );
        }
        info!(fields = checkers.len(), "built field registry");
        Self { checkers }
    }

    pub fn get(&self, name: &str) -> Option<&Checker> {
        self.checkers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checkers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checkers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::providers::NoLookup;

    #[test]
    fn test_build_excludes_composite_personnel_fields() {
        let registry = FieldRegistry::build(&catalog::sample_fields(), &NoLookup);
        assert!(registry.get("pi_details").is_none());
        assert!(registry.get("recordedBy_details").is_none());
        assert!(registry.get("pi_name").is_some());
        assert!(registry.get("recordedBy_name").is_some());
    }

    #[test]
    fn test_unruled_fields_accept_anything() {
        let specs = vec![FieldSpec::new("scrawl", "Scrawl")];
        let registry = FieldRegistry::build(&specs, &NoLookup);
        let checker = registry.get("scrawl").unwrap();
        assert!(checker.evaluate(&CellValue::from("anything")));
    }

    #[test]
    fn test_registry_carries_display_metadata() {
        let registry = FieldRegistry::build(&catalog::sample_fields(), &NoLookup);
        let checker = registry.get("decimalLatitude").unwrap();
        assert_eq!(checker.disp_name, "Decimal Latitude");
        assert_eq!(checker.units.as_deref(), Some("degrees_north"));
        assert!(checker.inherit);
    }
}
