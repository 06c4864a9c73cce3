use core::fmt;

use super::{Column, F64Column, Source, VecColumn};
use crate::defaults;

/// Row index of a table.
///
/// An index without labels is positional (`0..len`).
/// Labels, when present, are kept in a [`VecColumn`] and may be of any kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    name: Option<String>,
    labels: Option<VecColumn>,
}

impl Index {
    /// A positional index
    pub fn range() -> Self {
        Self::default()
    }

    /// An index with explicit labels
    pub fn new(labels: impl Into<VecColumn>) -> Self {
        Self {
            name: None,
            labels: Some(labels.into()),
        }
    }

    /// Name the index, returning self for chaining
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The index name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The index labels, `None` for a positional index
    pub fn labels(&self) -> Option<&VecColumn> {
        self.labels.as_ref()
    }

    /// Whether the index is positional
    pub fn is_range(&self) -> bool {
        self.labels.is_none()
    }

    /// The index values for a table of `len` rows.
    /// Labels are truncated or padded with nulls to `len`.
    pub fn materialize(&self, len: usize) -> VecColumn {
        match &self.labels {
            None => VecColumn::I64((0..len as i64).map(Some).collect()),
            Some(labels) => {
                let kept: Vec<usize> = (0..len.min(labels.len())).collect();
                let mut col = labels.take(&kept);
                while col.len() < len {
                    col.push_null();
                }
                col
            }
        }
    }
}

/// Simple table source backed by vectors.
/// This source owns the data and ensures that all columns have the same length.
#[derive(Clone, Default)]
pub struct TableSource {
    heads: Vec<String>,
    columns: Vec<VecColumn>,
    index: Index,
    len: usize,
}

impl TableSource {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the column names
    pub fn heads(&self) -> &[String] {
        &self.heads
    }

    /// Add a column with the given name.
    /// A column already present under that name is replaced in place.
    /// If the column is shorter than existing columns, it will be padded with null values.
    /// If the column is longer than existing columns, existing columns will be padded with null values
    pub fn add_column(&mut self, name: &str, col: impl Into<VecColumn>) {
        let col = col.into();
        match self.heads.iter().position(|h| h == name) {
            Some(pos) => {
                self.columns[pos] = col;
                self.len = self.columns.iter().map(VecColumn::len).max().unwrap_or(0);
            }
            None => {
                self.len = self.len.max(col.len());
                self.heads.push(name.to_string());
                self.columns.push(col);
            }
        }
        for col in &mut self.columns {
            while col.len() < self.len {
                col.push_null();
            }
        }
    }

    /// Add a column with the given name, returning self for chaining
    pub fn with_column(mut self, name: &str, col: impl Into<VecColumn>) -> Self {
        self.add_column(name, col);
        self
    }

    /// Set the row index, returning self for chaining
    pub fn with_index(mut self, index: Index) -> Self {
        self.index = index;
        self
    }

    /// Get the row index
    pub fn row_index(&self) -> &Index {
        &self.index
    }

    /// Get a column by name, with its concrete type
    pub fn vec_column(&self, name: &str) -> Option<&VecColumn> {
        let idx = self.heads.iter().position(|h| h == name)?;
        self.columns.get(idx)
    }

    /// Extract a column as a [`Series`] sharing this table's index
    pub fn series(&self, name: &str) -> Option<Series> {
        self.vec_column(name).map(|col| {
            Series::new(col.clone())
                .with_name(name)
                .with_index(self.index.clone())
        })
    }

    /// Get the number of rows in the table
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Source for TableSource {
    fn names(&self) -> Vec<&str> {
        self.heads.iter().map(|s| s.as_str()).collect()
    }

    fn column(&self, name: &str) -> Option<&dyn Column> {
        self.vec_column(name).map(|c| c as &dyn Column)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn index(&self) -> Option<&Index> {
        Some(&self.index)
    }

    fn to_table(&self) -> TableSource {
        self.clone()
    }
}

/// Custom Debug implementation to pretty-print the table
impl fmt::Debug for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.len();
        let cols = self.heads.len();

        // Determine which columns to show
        let (col_indices, show_ellipsis) = if cols > 8 {
            let mut idxs = (0..4).collect::<Vec<_>>();
            idxs.extend((cols - 4)..cols);
            (idxs, true)
        } else {
            ((0..cols).collect::<Vec<_>>(), false)
        };

        let row_indices: Vec<usize> = if rows <= 10 {
            (0..rows).collect()
        } else {
            (0..5).chain((rows - 5)..rows).collect()
        };

        let mut col_widths: Vec<usize> = col_indices
            .iter()
            .map(|&i| self.heads[i].len())
            .collect();
        for (col_pos, &col_idx) in col_indices.iter().enumerate() {
            for &row in &row_indices {
                let cell = self.columns[col_idx].sample(row).to_string();
                col_widths[col_pos] = col_widths[col_pos].max(cell.len());
            }
        }
        let ellipsis_width = 6;

        writeln!(f, "TableSource: {} rows x {} columns", rows, cols)?;
        for (col_pos, &i) in col_indices.iter().enumerate() {
            write!(f, "| {:^width$} ", &self.heads[i], width = col_widths[col_pos])?;
        }
        if show_ellipsis {
            write!(f, "| {:^width$} ", "...", width = ellipsis_width)?;
        }
        writeln!(f, "|")?;

        for (col_pos, _) in col_indices.iter().enumerate() {
            write!(f, "|{:=^width$}", "", width = col_widths[col_pos] + 2)?;
        }
        if show_ellipsis {
            write!(f, "|{:=^width$}", "", width = ellipsis_width + 2)?;
        }
        writeln!(f, "|")?;

        let print_row = |f: &mut fmt::Formatter<'_>, row: usize| -> fmt::Result {
            for (col_pos, &i) in col_indices.iter().enumerate() {
                let cell = self.columns[i].sample(row).to_string();
                write!(f, "| {:>width$} ", cell, width = col_widths[col_pos])?;
            }
            if show_ellipsis {
                write!(f, "| {:^width$} ", "...", width = ellipsis_width)?;
            }
            writeln!(f, "|")
        };

        if rows <= 10 {
            for row in 0..rows {
                print_row(f, row)?;
            }
        } else {
            for row in 0..5 {
                print_row(f, row)?;
            }
            for (col_pos, _) in col_indices.iter().enumerate() {
                write!(f, "| {:^width$} ", "...", width = col_widths[col_pos])?;
            }
            if show_ellipsis {
                write!(f, "| {:^width$} ", "...", width = ellipsis_width)?;
            }
            writeln!(f, "|")?;
            for row in (rows - 5)..rows {
                print_row(f, row)?;
            }
        }
        Ok(())
    }
}

/// A single column of data with its row index.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: Option<String>,
    column: VecColumn,
    index: Index,
}

impl Series {
    /// Create an unnamed series with a positional index
    pub fn new(column: impl Into<VecColumn>) -> Self {
        Self {
            name: None,
            column: column.into(),
            index: Index::range(),
        }
    }

    /// Name the series, returning self for chaining
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the row index, returning self for chaining
    pub fn with_index(mut self, index: Index) -> Self {
        self.index = index;
        self
    }

    /// The series name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name of the column holding the series values once in a table.
    /// Unnamed series get [`defaults::SERIES_NAME`].
    pub fn column_name(&self) -> &str {
        self.name.as_deref().unwrap_or(defaults::SERIES_NAME)
    }

    /// The series values
    pub fn values(&self) -> &VecColumn {
        &self.column
    }

    /// The row index
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Put the series in a single column table, keeping the index
    pub fn to_table(&self) -> TableSource {
        TableSource::new()
            .with_column(self.column_name(), self.column.clone())
            .with_index(self.index.clone())
    }
}

impl Column for Series {
    fn len(&self) -> usize {
        self.column.len()
    }

    fn len_some(&self) -> usize {
        Column::len_some(&self.column)
    }

    fn kind(&self) -> super::ValueKind {
        self.column.kind()
    }

    fn sample_iter(&self) -> Box<dyn Iterator<Item = super::Sample<'_>> + '_> {
        self.column.sample_iter()
    }

    fn to_vec_column(&self) -> VecColumn {
        self.column.clone()
    }

    fn f64(&self) -> Option<&dyn F64Column> {
        self.column.f64()
    }

    fn i64(&self) -> Option<&dyn super::I64Column> {
        self.column.i64()
    }

    fn bool(&self) -> Option<&dyn super::BoolColumn> {
        self.column.bool()
    }

    fn str(&self) -> Option<&dyn super::StrColumn> {
        self.column.str()
    }

    fn time(&self) -> Option<&dyn super::TimeColumn> {
        self.column.time()
    }

    fn time_delta(&self) -> Option<&dyn super::TimeDeltaColumn> {
        self.column.time_delta()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_column_pads_with_nulls() {
        let table = TableSource::new()
            .with_column("a", vec![1i64, 2, 3])
            .with_column("b", vec![1.0]);
        assert_eq!(table.len(), 3);
        let b = table.column("b").unwrap();
        assert_eq!(b.len(), 3);
        assert_eq!(b.len_some(), 1);
    }

    #[test]
    fn add_column_replaces_existing() {
        let table = TableSource::new()
            .with_column("a", vec![1i64, 2])
            .with_column("b", vec!["x", "y"])
            .with_column("a", vec![3.0, 4.0]);
        assert_eq!(table.names(), vec!["a", "b"]);
        assert_eq!(table.vec_column("a"), Some(&VecColumn::F64(vec![3.0, 4.0])));
    }

    #[test]
    fn materialize_index() {
        assert_eq!(
            Index::range().materialize(3),
            VecColumn::I64(vec![Some(0), Some(1), Some(2)])
        );
        let idx = Index::new(vec!["a", "b", "c"]);
        assert_eq!(idx.materialize(2), VecColumn::from(vec!["a", "b"]));
        assert_eq!(
            idx.materialize(4),
            VecColumn::Str(vec![
                Some("a".into()),
                Some("b".into()),
                Some("c".into()),
                None
            ])
        );
    }

    #[test]
    fn series_to_table() {
        let s = Series::new(vec![1.0, 2.0]);
        assert_eq!(s.to_table().names(), vec!["0"]);

        let s = s.with_name("y").with_index(Index::new(vec![10i64, 20]));
        let table = s.to_table();
        assert_eq!(table.names(), vec!["y"]);
        assert_eq!(table.row_index().labels(), Some(&VecColumn::from(vec![10i64, 20])));
    }

    #[test]
    fn table_series_shares_index() {
        let table = TableSource::new()
            .with_column("a", vec![1i64, 2])
            .with_index(Index::new(vec!["r0", "r1"]).with_name("rows"));
        let s = table.series("a").unwrap();
        assert_eq!(s.name(), Some("a"));
        assert_eq!(s.index().name(), Some("rows"));
        assert!(table.series("b").is_none());
    }

    #[test]
    fn debug_print() {
        let table = TableSource::new()
            .with_column("x", vec![1i64, 2])
            .with_column("name", vec!["a", "b"]);
        let printed = format!("{:?}", table);
        assert!(printed.starts_with("TableSource: 2 rows x 2 columns"));
        assert!(printed.contains("| 1 |"));
    }
}
