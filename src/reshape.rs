//! Wide to long reshaping.
//!
//! [`unpivot`] melts the value columns of a table into a [`LongTable`]:
//! one row per pair of source row and value column, with the identifier
//! columns copied, the column name in a `variable` column and the cell
//! in a `value` column. This is the layout every multi-series chart is
//! built from.
use crate::data::{Column, Error, Index, Source, TableSource, VecColumn};
use crate::defaults;

/// Options of [`unpivot`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unpivot {
    ids: Option<Vec<String>>,
    values: Option<Vec<String>>,
    variable_name: String,
    value_name: String,
}

impl Default for Unpivot {
    fn default() -> Self {
        Self {
            ids: None,
            values: None,
            variable_name: defaults::VARIABLE_NAME.to_string(),
            value_name: defaults::VALUE_NAME.to_string(),
        }
    }
}

impl Unpivot {
    /// Options with the default names and without identifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier column, returning self for chaining
    pub fn with_id(mut self, name: impl Into<String>) -> Self {
        self.ids.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    /// Add identifier columns, returning self for chaining
    pub fn with_ids<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids
            .get_or_insert_with(Vec::new)
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Add a value column, returning self for chaining
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.values.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    /// Add value columns, returning self for chaining.
    /// Passing an empty list melts no column at all.
    pub fn with_value_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values
            .get_or_insert_with(Vec::new)
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the name of the variable column, returning self for chaining
    pub fn with_variable_name(mut self, name: impl Into<String>) -> Self {
        self.variable_name = name.into();
        self
    }

    /// Set the name of the value column, returning self for chaining
    pub fn with_value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = name.into();
        self
    }

    /// Identifier columns. `None` uses the row index.
    pub fn ids(&self) -> Option<&[String]> {
        self.ids.as_deref()
    }

    /// Value columns. `None` melts every non-identifier column.
    pub fn value_columns(&self) -> Option<&[String]> {
        self.values.as_deref()
    }

    /// Name of the variable column
    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    /// Name of the value column
    pub fn value_name(&self) -> &str {
        &self.value_name
    }
}

/// A table in long layout, as returned by [`unpivot`]
#[derive(Debug, Clone)]
pub struct LongTable {
    table: TableSource,
    ids: Vec<String>,
    variable_name: String,
    value_name: String,
    // value columns melted from categorical columns
    categorical: Vec<String>,
}

impl LongTable {
    /// The underlying table
    pub fn table(&self) -> &TableSource {
        &self.table
    }

    /// Consume and return the underlying table
    pub fn into_table(self) -> TableSource {
        self.table
    }

    /// Names of the identifier columns
    pub fn id_names(&self) -> &[String] {
        &self.ids
    }

    /// Name of the variable column
    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    /// Name of the value column
    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    /// Distinct variables, in order of first appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = Vec::new();
        if let Some(col) = self.table.column(&self.variable_name) {
            for s in col.sample_iter() {
                if let Some(v) = s.as_cat() {
                    if !vars.contains(&v) {
                        vars.push(v);
                    }
                }
            }
        }
        vars
    }

    /// Pivot back to the wide layout.
    ///
    /// Identifier columns are taken from the first variable block,
    /// then each variable becomes a column again, categorical if it was
    /// melted from a categorical column.
    pub fn widen(&self) -> TableSource {
        let mut wide = TableSource::new();
        let (Some(var_col), Some(value_col)) = (
            self.table.column(&self.variable_name),
            self.table.vec_column(&self.value_name),
        ) else {
            return wide;
        };

        let mut blocks: Vec<(&str, Vec<usize>)> = Vec::new();
        for (row, s) in var_col.sample_iter().enumerate() {
            let Some(var) = s.as_cat() else { continue };
            match blocks.iter_mut().find(|(name, _)| *name == var) {
                Some((_, rows)) => rows.push(row),
                None => blocks.push((var, vec![row])),
            }
        }

        if let Some((_, first)) = blocks.first() {
            for id in &self.ids {
                if let Some(col) = self.table.vec_column(id) {
                    wide.add_column(id, col.take(first));
                }
            }
        }
        for (var, rows) in &blocks {
            let col = match value_col.take(rows).narrowed() {
                VecColumn::Str(v) if self.categorical.iter().any(|c| c == var) => {
                    VecColumn::Cat(v)
                }
                col => col,
            };
            wide.add_column(var, col);
        }
        wide
    }
}

impl Source for LongTable {
    fn names(&self) -> Vec<&str> {
        self.table.names()
    }

    fn column(&self, name: &str) -> Option<&dyn Column> {
        self.table.column(name)
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn index(&self) -> Option<&Index> {
        Some(self.table.row_index())
    }

    fn to_table(&self) -> TableSource {
        self.table.clone()
    }
}

/// Materialize the row index of `src` as its first column.
///
/// The column is named after the index, or [`defaults::INDEX_NAME`], or
/// [`defaults::INDEX_FALLBACK_NAME`] when the former is already taken.
/// The returned table has a positional index.
pub fn reset_index(src: &dyn Source) -> Result<TableSource, Error> {
    reset_index_named(src).map(|(_, table)| table)
}

/// Same as [`reset_index`], also returning the name of the index column
pub(crate) fn reset_index_named(src: &dyn Source) -> Result<(String, TableSource), Error> {
    let name = index_column_name(src)?;
    let index = src.index().cloned().unwrap_or_default();
    let mut table = TableSource::new();
    table.add_column(&name, index.materialize(src.len()));
    for col_name in src.names() {
        if let Some(col) = src.column(col_name) {
            table.add_column(col_name, col.to_vec_column());
        }
    }
    Ok((name, table))
}

fn index_column_name(src: &dyn Source) -> Result<String, Error> {
    let taken = |name: &str| src.column(name).is_some();
    match src.index().and_then(Index::name) {
        Some(name) if taken(name) => Err(Error::DuplicateColumn(name.to_string())),
        Some(name) => Ok(name.to_string()),
        None if !taken(defaults::INDEX_NAME) => Ok(defaults::INDEX_NAME.to_string()),
        None if !taken(defaults::INDEX_FALLBACK_NAME) => {
            Ok(defaults::INDEX_FALLBACK_NAME.to_string())
        }
        None => Err(Error::DuplicateColumn(
            defaults::INDEX_FALLBACK_NAME.to_string(),
        )),
    }
}

/// Melt a table from wide to long layout.
///
/// Without identifier, the row index is materialized (see [`reset_index`])
/// and used as identifier. Without value columns, every column that is not
/// an identifier is melted. Value columns form the outer order of the rows,
/// the source row order is kept within each block.
///
/// All referenced columns are checked before any output is built, the first
/// missing one fails with [`Error::MissingColumn`].
pub fn unpivot(src: &dyn Source, opts: &Unpivot) -> Result<LongTable, Error> {
    for name in opts.ids().into_iter().chain(opts.value_columns()).flatten() {
        lookup(src, name)?;
    }
    match opts.ids() {
        Some(ids) => melt(src, ids.to_vec(), opts),
        None => {
            let (index_name, table) = reset_index_named(src)?;
            let values = match opts.value_columns() {
                Some(values) => values.to_vec(),
                None => src.names().into_iter().map(str::to_string).collect(),
            };
            let opts = Unpivot {
                values: Some(values),
                ..opts.clone()
            };
            melt(&table, vec![index_name], &opts)
        }
    }
}

fn lookup<'a>(src: &'a dyn Source, name: &str) -> Result<&'a dyn Column, Error> {
    src.column(name)
        .ok_or_else(|| Error::MissingColumn(name.to_string()))
}

fn check_output_names(ids: &[String], opts: &Unpivot) -> Result<(), Error> {
    for (i, id) in ids.iter().enumerate() {
        if ids[..i].contains(id) {
            return Err(Error::NameConflict(id.clone()));
        }
    }
    if opts.variable_name == opts.value_name {
        return Err(Error::NameConflict(opts.value_name.clone()));
    }
    for name in [&opts.variable_name, &opts.value_name] {
        if ids.contains(name) {
            return Err(Error::NameConflict(name.clone()));
        }
    }
    Ok(())
}

fn melt(src: &dyn Source, ids: Vec<String>, opts: &Unpivot) -> Result<LongTable, Error> {
    check_output_names(&ids, opts)?;

    let values: Vec<String> = match opts.value_columns() {
        Some(values) => values.to_vec(),
        None => src
            .names()
            .into_iter()
            .filter(|name| !ids.iter().any(|id| id == name))
            .map(str::to_string)
            .collect(),
    };
    let value_cols = values
        .iter()
        .map(|name| lookup(src, name).map(|col| col.to_vec_column()))
        .collect::<Result<Vec<_>, _>>()?;

    let rows = src.len();
    let mut table = TableSource::new();
    for id in &ids {
        let col = lookup(src, id)?;
        table.add_column(id, col.to_vec_column().tile(values.len()));
    }
    let variable: Vec<Option<String>> = values
        .iter()
        .flat_map(|name| std::iter::repeat_n(Some(name.clone()), rows))
        .collect();
    table.add_column(&opts.variable_name, VecColumn::Str(variable));
    let value_refs: Vec<&VecColumn> = value_cols.iter().collect();
    table.add_column(&opts.value_name, VecColumn::concat(&value_refs));

    let categorical = values
        .iter()
        .zip(&value_cols)
        .filter(|(_, col)| matches!(col, VecColumn::Cat(_)))
        .map(|(name, _)| name.clone())
        .collect();

    Ok(LongTable {
        table,
        ids,
        variable_name: opts.variable_name.clone(),
        value_name: opts.value_name.clone(),
        categorical,
    })
}
