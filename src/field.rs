//! Schema-less numeric field table.
//!
//! Every item in a collection may carry a dense row of 64-bit floats. Field
//! names are assigned a collection-wide column index on first use; the
//! assignment is append-only so row layouts stay stable for the lifetime of
//! the collection. A sorted copy of the names is kept for display.

use rustc_hash::FxHashMap;
use tracing::trace;

/// Name-to-column mapping plus the per-id rows.
#[derive(Debug, Default)]
pub struct FieldTable {
    map: FxHashMap<String, usize>,
    arr: Vec<String>,
    rows: FxHashMap<String, Vec<f64>>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column index for `name`, assigning the next unused index on first
    /// use and inserting the name into the sorted array.
    pub fn column(&mut self, name: &str) -> usize {
        if let Some(&column) = self.map.get(name) {
            return column;
        }
        let column = self.map.len();
        self.map.insert(name.to_string(), column);
        if let Err(pos) = self.arr.binary_search_by(|probe| probe.as_str().cmp(name)) {
            self.arr.insert(pos, name.to_string());
        }
        trace!(field = name, column, "assigned field column");
        column
    }

    /// Write `value` at `column` for `id`, growing the row with zeros as
    /// needed. Returns the row length before and after the write and
    /// whether the stored value changed.
    pub fn write(&mut self, id: &str, column: usize, value: f64) -> (usize, usize, bool) {
        let row = self.rows.entry(id.to_string()).or_default();
        let old_len = row.len();
        if column >= row.len() {
            row.resize(column + 1, 0.0);
        }
        let old_value = row[column];
        row[column] = value;
        (old_len, row.len(), old_value != value)
    }

    /// The field row for `id`; empty when the id has no row.
    pub fn row(&self, id: &str) -> &[f64] {
        self.rows.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Replace the entire row for `id`.
    pub fn set_row(&mut self, id: &str, values: Vec<f64>) {
        self.rows.insert(id.to_string(), values);
    }

    /// Remove and return the row for `id`.
    pub fn remove_row(&mut self, id: &str) -> Option<Vec<f64>> {
        self.rows.remove(id)
    }

    /// Name-to-column view.
    pub fn map(&self) -> &FxHashMap<String, usize> {
        &self.map
    }

    /// Field names in ascending order.
    pub fn names(&self) -> &[String] {
        &self.arr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_assignment_is_append_only() {
        let mut table = FieldTable::new();
        assert_eq!(table.column("speed"), 0);
        assert_eq!(table.column("age"), 1);
        assert_eq!(table.column("speed"), 0);
        assert_eq!(table.column("zzz"), 2);
        assert_eq!(table.map().len(), 3);
    }

    #[test]
    fn test_names_stay_sorted() {
        let mut table = FieldTable::new();
        table.column("speed");
        table.column("age");
        table.column("weight");
        table.column("age");
        assert_eq!(table.names(), ["age", "speed", "weight"]);
    }

    #[test]
    fn test_write_grows_row_with_zeros() {
        let mut table = FieldTable::new();
        let (old_len, new_len, updated) = table.write("a", 2, 7.0);
        assert_eq!((old_len, new_len), (0, 3));
        assert!(updated);
        assert_eq!(table.row("a"), &[0.0, 0.0, 7.0]);
    }

    #[test]
    fn test_write_same_value_not_updated() {
        let mut table = FieldTable::new();
        table.write("a", 0, 5.0);
        let (_, _, updated) = table.write("a", 0, 5.0);
        assert!(!updated);
        let (_, _, updated) = table.write("a", 0, 6.0);
        assert!(updated);
    }

    #[test]
    fn test_missing_row_reads_empty() {
        let table = FieldTable::new();
        assert!(table.row("missing").is_empty());
    }

    #[test]
    fn test_remove_row() {
        let mut table = FieldTable::new();
        table.set_row("a", vec![1.0, 2.0]);
        assert_eq!(table.remove_row("a"), Some(vec![1.0, 2.0]));
        assert_eq!(table.remove_row("a"), None);
        assert!(table.row("a").is_empty());
    }
}
