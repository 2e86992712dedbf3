//! Record table model
//!
//! Candidate records arrive as a table: an ordered set of columns and an
//! ordered sequence of rows. The column set is data-driven, not fixed; the
//! batch validator checks every column name against the field registry
//! instead of assuming a schema.

use serde::{Deserialize, Serialize};

/// A single cell value as submitted
///
/// Submitted tables are heterogeneous: numbers that survived the upstream
/// parse arrive as numbers, everything else as text. The normalizer upgrades
/// numeric-looking text to `Integer`/`Decimal` before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// The cell's text content, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell the way it would appear in a spreadsheet cell
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Decimal(d) => d.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Bool(b) => CellValue::Text(b.to_string()),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Integer(i)
                } else {
                    CellValue::Decimal(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// Error constructing a record table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("row has {got} cells but the table has {expected} columns")]
    ArityMismatch { expected: usize, got: usize },
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },
}

/// An ordered table of candidate records keyed by column name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RecordTable {
    /// Create an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; its arity must match the column set
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::ArityMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Build a table from a JSON array of objects, as submitted by the web layer
    ///
    /// Columns are the union of the objects' keys in order of first
    /// appearance; keys missing from a record become empty cells.
    pub fn from_json_records(records: &[serde_json::Value]) -> Result<Self, TableError> {
        let mut columns: Vec<String> = Vec::new();
        for (index, record) in records.iter().enumerate() {
            let object = record
                .as_object()
                .ok_or(TableError::NotAnObject { index })?;
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut table = RecordTable::new(columns);
        for record in records {
            if let Some(object) = record.as_object() {
                let row = table
                    .columns
                    .iter()
                    .map(|column| {
                        object
                            .get(column)
                            .map(CellValue::from)
                            .unwrap_or(CellValue::Empty)
                    })
                    .collect();
                table.rows.push(row);
            }
        }
        Ok(table)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cell at (row, column name), if both exist
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// All values of one column, in row order
    pub fn column_values(&self, column: &str) -> Option<impl Iterator<Item = &CellValue>> {
        let col = self.column_index(column)?;
        Some(self.rows.iter().map(move |r| &r[col]))
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut Vec<CellValue>> {
        self.rows.iter_mut()
    }

    pub(crate) fn column_names(&self) -> &[String] {
        &self.columns
    }
}

/// A single record keyed by field name, used for dataset metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: CellValue) {
        if let Some(entry) = self.fields.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from a JSON object
    pub fn from_json_object(value: &serde_json::Value) -> Result<Self, TableError> {
        let object = value
            .as_object()
            .ok_or(TableError::NotAnObject { index: 0 })?;
        let mut record = Record::new();
        for (key, val) in object {
            record.insert(key, CellValue::from(val));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_records_unions_columns() {
        let records = vec![
            json!({"id": "a", "eventDate": "2022-04-10"}),
            json!({"id": "b", "sampleType": "Ice core"}),
        ];
        let table = RecordTable::from_json_records(&records).unwrap();

        let columns: Vec<&str> = table.columns().collect();
        assert_eq!(columns, vec!["id", "eventDate", "sampleType"]);
        assert_eq!(table.cell(0, "sampleType"), Some(&CellValue::Empty));
        assert_eq!(
            table.cell(1, "sampleType"),
            Some(&CellValue::Text("Ice core".to_string()))
        );
    }

    #[test]
    fn test_from_json_records_rejects_non_objects() {
        let records = vec![json!(["not", "an", "object"])];
        assert!(RecordTable::from_json_records(&records).is_err());
    }

    #[test]
    fn test_push_row_arity_check() {
        let mut table = RecordTable::new(["id", "eventDate"]);
        let result = table.push_row(vec![CellValue::from("a")]);
        assert!(matches!(
            result,
            Err(TableError::ArityMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_cell_value_from_json_numbers() {
        assert_eq!(CellValue::from(&json!(42)), CellValue::Integer(42));
        assert_eq!(CellValue::from(&json!(3.14)), CellValue::Decimal(3.14));
        assert_eq!(CellValue::from(&json!(null)), CellValue::Empty);
    }

    #[test]
    fn test_record_insert_overwrites() {
        let mut record = Record::new();
        record.insert("title", CellValue::from("first"));
        record.insert("title", CellValue::from("second"));
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("title"), Some(&CellValue::from("second")));
    }
}
