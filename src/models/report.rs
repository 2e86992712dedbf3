//! Validation report model

use serde::{Deserialize, Serialize};

/// Outcome of a validation run
///
/// Every independent problem found in the submission contributes one
/// user-presentable sentence to `errors`; `passed` is true only when the list
/// is empty. Bad data is always reported this way, never as an `Err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// A passing report with no findings
    pub fn pass() -> Self {
        Self {
            passed: true,
            errors: Vec::new(),
        }
    }

    /// Record a finding; the report can no longer pass
    pub fn push(&mut self, message: impl Into<String>) {
        self.passed = false;
        self.errors.push(message.into());
    }

    /// Fold another report into this one; both must pass for the merge to pass
    pub fn merge(&mut self, other: ValidationReport) {
        self.passed = self.passed && other.passed;
        self.errors.extend(other.errors);
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::pass()
    }
}

/// Render a sorted list of row numbers as compact range notation
///
/// Consecutive runs of three or more rows compress to `first - last`; shorter
/// runs list each row. For instance `[3, 4, 5, 6, 7]` renders as `[3 - 7]`
/// and `[3, 5]` as `[3, 5]`.
pub fn compress_rows(rows: &[i64]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut i = 0;
    while i < rows.len() {
        let start = rows[i];
        let mut end = start;
        let mut j = i + 1;
        while j < rows.len() && rows[j] == end + 1 {
            end = rows[j];
            j += 1;
        }
        let run = j - i;
        if run >= 3 {
            parts.push(format!("{start} - {end}"));
        } else {
            for row in &rows[i..j] {
                parts.push(row.to_string());
            }
        }
        i = j;
    }
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_rows_long_run() {
        assert_eq!(compress_rows(&[3, 4, 5, 6, 7]), "[3 - 7]");
    }

    #[test]
    fn test_compress_rows_pair() {
        assert_eq!(compress_rows(&[3, 5]), "[3, 5]");
        assert_eq!(compress_rows(&[3, 4]), "[3, 4]");
    }

    #[test]
    fn test_compress_rows_mixed() {
        assert_eq!(compress_rows(&[1, 2, 3, 4, 7]), "[1 - 4, 7]");
        assert_eq!(compress_rows(&[1, 2, 9]), "[1, 2, 9]");
        assert_eq!(compress_rows(&[5]), "[5]");
    }

    #[test]
    fn test_merge_keeps_order_and_verdict() {
        let mut first = ValidationReport::pass();
        first.push("a");
        let mut second = ValidationReport::pass();
        second.push("b");
        first.merge(second);
        assert!(!first.passed);
        assert_eq!(first.errors, vec!["a", "b"]);

        let mut passing = ValidationReport::pass();
        passing.merge(ValidationReport::pass());
        assert!(passing.passed);
    }
}
