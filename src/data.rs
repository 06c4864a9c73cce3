//! Data source abstractions and implementations.
//!
//! Data to be plotted must implement the [`Column`] trait.
//! Besides typed access to the values, a column reports its [`ValueKind`],
//! which drives the encoding type of the channel it ends up on.
//! Columns are grouped by name in a struct implementing the [`Source`] trait,
//! together with an optional row [`Index`].
//!
//! [`TableSource`] is the owned table used throughout the crate,
//! and [`Series`] is a single column with its index.
use core::fmt;
use std::collections::HashSet;

use crate::time::{DateTime, TimeDelta};

mod table;
pub use table::{Index, Series, TableSource};

#[cfg(feature = "data-csv")]
mod csv;
#[cfg(feature = "data-csv")]
pub use csv::{CsvColSpec, CsvParseError, CsvParser};

#[cfg(feature = "data-polars")]
pub mod polars;

/// Errors related to column lookup and naming
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A column referenced by name does not exist
    MissingColumn(String),
    /// A column would be inserted under a name that is already taken
    DuplicateColumn(String),
    /// An output column name conflicts with another output column
    NameConflict(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingColumn(name) => write!(f, "No such column: '{}'", name),
            Error::DuplicateColumn(name) => write!(f, "Column '{}' already exists", name),
            Error::NameConflict(name) => {
                write!(f, "Output column name '{}' is used more than once", name)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Kind of the values held by a column.
///
/// The vocabulary follows the one of dynamically typed data frames,
/// where a column of objects can hold values of several kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Integer values only
    Integer,
    /// Integers mixed with non-numeric values
    MixedInteger,
    /// Floating point values
    Floating,
    /// Integers mixed with floating point values
    MixedIntegerFloat,
    /// Complex numbers
    Complex,
    /// Strings
    String,
    /// Raw bytes
    Bytes,
    /// Categorical values
    Categorical,
    /// Booleans
    Boolean,
    /// Values of several non-numeric kinds
    Mixed,
    /// Date-times
    Datetime,
    /// Calendar dates
    Date,
    /// Times of day
    Time,
    /// Time deltas
    Duration,
    /// Time periods
    Period,
    /// No value, or only nulls
    Empty,
    /// A kind this crate does not know about, by name
    Other(String),
}

impl ValueKind {
    /// The name of the kind
    pub fn name(&self) -> &str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::MixedInteger => "mixed-integer",
            ValueKind::Floating => "floating",
            ValueKind::MixedIntegerFloat => "mixed-integer-float",
            ValueKind::Complex => "complex",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
            ValueKind::Categorical => "categorical",
            ValueKind::Boolean => "boolean",
            ValueKind::Mixed => "mixed",
            ValueKind::Datetime => "datetime",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::Duration => "timedelta",
            ValueKind::Period => "period",
            ValueKind::Empty => "empty",
            ValueKind::Other(name) => name,
        }
    }

    /// Whether values of this kind are real numbers
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueKind::Integer | ValueKind::Floating | ValueKind::MixedIntegerFloat
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Infer the value kind of a sequence of samples. Nulls are ignored.
pub fn infer_kind<'a>(samples: impl Iterator<Item = Sample<'a>>) -> ValueKind {
    let (mut bools, mut ints, mut nums, mut cats, mut times, mut deltas) =
        (false, false, false, false, false, false);
    for s in samples {
        match s {
            Sample::Null => (),
            Sample::Bool(_) => bools = true,
            Sample::Int(_) => ints = true,
            Sample::Num(_) => nums = true,
            Sample::Cat(_) => cats = true,
            Sample::Time(_) => times = true,
            Sample::TimeDelta(_) => deltas = true,
        }
    }
    let others = bools || cats || times || deltas;
    match (ints, nums, others) {
        (false, false, false) => ValueKind::Empty,
        (true, false, false) => ValueKind::Integer,
        (false, true, false) => ValueKind::Floating,
        (true, true, false) => ValueKind::MixedIntegerFloat,
        (true, _, true) => ValueKind::MixedInteger,
        (false, true, true) => ValueKind::Mixed,
        (false, false, true) => match (bools, cats, times, deltas) {
            (true, false, false, false) => ValueKind::Boolean,
            (false, true, false, false) => ValueKind::String,
            (false, false, true, false) => ValueKind::Datetime,
            (false, false, false, true) => ValueKind::Duration,
            _ => ValueKind::Mixed,
        },
    }
}

/// Sample value enum. Useful when the type is not known at compile time.
///
/// This type borrows string data for categorical samples. See also [`OwnedSample`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Sample<'a> {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Num(f64),
    /// Categorical or string value
    Cat(&'a str),
    /// Time value
    Time(DateTime),
    /// Time delta value
    TimeDelta(TimeDelta),
}

impl<'a> Sample<'a> {
    /// Check if the sample is null
    pub fn is_null(&self) -> bool {
        matches!(self, Sample::Null)
    }

    /// Get the sample as a numeric value, if possible.
    /// Integers are converted.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Sample::Num(v) => Some(*v),
            Sample::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get the sample as an integer value, if possible
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Sample::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the sample as a categorical value, if possible
    pub fn as_cat(&self) -> Option<&'a str> {
        match self {
            Sample::Cat(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the sample as a time value, if possible
    pub fn as_time(&self) -> Option<DateTime> {
        match self {
            Sample::Time(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the sample as a time delta value, if possible
    pub fn as_time_delta(&self) -> Option<TimeDelta> {
        match self {
            Sample::TimeDelta(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert the sample to an owned sample
    pub fn into_owned(self) -> OwnedSample {
        match self {
            Sample::Null => OwnedSample::Null,
            Sample::Bool(v) => OwnedSample::Bool(v),
            Sample::Int(v) => OwnedSample::Int(v),
            Sample::Num(v) => OwnedSample::Num(v),
            Sample::Cat(v) => OwnedSample::Cat(v.to_string()),
            Sample::Time(v) => OwnedSample::Time(v),
            Sample::TimeDelta(v) => OwnedSample::TimeDelta(v),
        }
    }
}

impl fmt::Display for Sample<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sample::Null => f.write_str("(null)"),
            Sample::Bool(v) => write!(f, "{}", v),
            Sample::Int(v) => write!(f, "{}", v),
            Sample::Num(v) => write!(f, "{:.6}", v),
            Sample::Cat(v) => f.write_str(v),
            Sample::Time(v) => write!(f, "{}", v),
            Sample::TimeDelta(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for Sample<'_> {
    fn from(val: f64) -> Self {
        if val.is_nan() {
            Sample::Null
        } else {
            Sample::Num(val)
        }
    }
}

impl From<Option<f64>> for Sample<'_> {
    fn from(val: Option<f64>) -> Self {
        val.map_or(Sample::Null, Sample::from)
    }
}

impl From<i64> for Sample<'_> {
    fn from(val: i64) -> Self {
        Sample::Int(val)
    }
}

impl From<Option<i64>> for Sample<'_> {
    fn from(val: Option<i64>) -> Self {
        val.map_or(Sample::Null, Sample::Int)
    }
}

impl From<bool> for Sample<'_> {
    fn from(val: bool) -> Self {
        Sample::Bool(val)
    }
}

impl From<Option<bool>> for Sample<'_> {
    fn from(val: Option<bool>) -> Self {
        val.map_or(Sample::Null, Sample::Bool)
    }
}

impl<'a> From<&'a str> for Sample<'a> {
    fn from(val: &'a str) -> Self {
        Sample::Cat(val)
    }
}

impl<'a> From<Option<&'a str>> for Sample<'a> {
    fn from(val: Option<&'a str>) -> Self {
        val.map_or(Sample::Null, Sample::Cat)
    }
}

impl From<DateTime> for Sample<'_> {
    fn from(val: DateTime) -> Self {
        Sample::Time(val)
    }
}

impl From<Option<DateTime>> for Sample<'_> {
    fn from(val: Option<DateTime>) -> Self {
        val.map_or(Sample::Null, Sample::Time)
    }
}

impl From<TimeDelta> for Sample<'_> {
    fn from(val: TimeDelta) -> Self {
        Sample::TimeDelta(val)
    }
}

impl From<Option<TimeDelta>> for Sample<'_> {
    fn from(val: Option<TimeDelta>) -> Self {
        val.map_or(Sample::Null, Sample::TimeDelta)
    }
}

/// Owned version of [`Sample`]
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OwnedSample {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Num(f64),
    /// Categorical or string value
    Cat(String),
    /// Time value
    Time(DateTime),
    /// Time delta value
    TimeDelta(TimeDelta),
}

impl OwnedSample {
    /// Check if the sample is null
    pub fn is_null(&self) -> bool {
        matches!(self, OwnedSample::Null)
    }

    /// Borrow the sample
    pub fn as_sample(&self) -> Sample<'_> {
        match self {
            OwnedSample::Null => Sample::Null,
            OwnedSample::Bool(v) => Sample::Bool(*v),
            OwnedSample::Int(v) => Sample::Int(*v),
            OwnedSample::Num(v) => Sample::Num(*v),
            OwnedSample::Cat(v) => Sample::Cat(v.as_str()),
            OwnedSample::Time(v) => Sample::Time(*v),
            OwnedSample::TimeDelta(v) => Sample::TimeDelta(*v),
        }
    }
}

impl From<Sample<'_>> for OwnedSample {
    fn from(val: Sample<'_>) -> Self {
        val.into_owned()
    }
}

impl From<f64> for OwnedSample {
    fn from(val: f64) -> Self {
        Sample::from(val).into_owned()
    }
}

impl From<i64> for OwnedSample {
    fn from(val: i64) -> Self {
        OwnedSample::Int(val)
    }
}

impl From<bool> for OwnedSample {
    fn from(val: bool) -> Self {
        OwnedSample::Bool(val)
    }
}

impl From<&str> for OwnedSample {
    fn from(val: &str) -> Self {
        OwnedSample::Cat(val.to_string())
    }
}

impl From<String> for OwnedSample {
    fn from(val: String) -> Self {
        OwnedSample::Cat(val)
    }
}

impl From<DateTime> for OwnedSample {
    fn from(val: DateTime) -> Self {
        OwnedSample::Time(val)
    }
}

impl From<TimeDelta> for OwnedSample {
    fn from(val: TimeDelta) -> Self {
        OwnedSample::TimeDelta(val)
    }
}

/// Hashable identity of a non-null sample.
/// Floats holding an integral value share the key of that integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SampleKey<'a> {
    Bool(bool),
    Int(i64),
    Num(u64),
    Cat(&'a str),
    Time(DateTime),
    TimeDelta(TimeDelta),
}

impl<'a> SampleKey<'a> {
    fn new(sample: Sample<'a>) -> Option<Self> {
        match sample {
            Sample::Null => None,
            Sample::Bool(v) => Some(SampleKey::Bool(v)),
            Sample::Int(v) => Some(SampleKey::Int(v)),
            Sample::Num(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                Some(SampleKey::Int(v as i64))
            }
            Sample::Num(v) => Some(SampleKey::Num(v.to_bits())),
            Sample::Cat(v) => Some(SampleKey::Cat(v)),
            Sample::Time(v) => Some(SampleKey::Time(v)),
            Sample::TimeDelta(v) => Some(SampleKey::TimeDelta(v)),
        }
    }
}

/// A trait for a column of data.
///
/// Only `len` and `len_some` are mandatory, but at least one of the typed
/// accessors should be implemented, or `sample_iter` for columns of mixed values.
pub trait Column: std::fmt::Debug {
    /// Get the length of the column
    fn len(&self) -> usize;

    /// Get the number of non-null values in the column
    fn len_some(&self) -> usize;

    /// Get the kind of the values in the column.
    ///
    /// The default implementation derives it from the typed accessors,
    /// or from the samples if none is available.
    /// A column without any non-null value is [`ValueKind::Empty`].
    fn kind(&self) -> ValueKind {
        if self.len_some() == 0 {
            ValueKind::Empty
        } else if self.time().is_some() {
            ValueKind::Datetime
        } else if self.time_delta().is_some() {
            ValueKind::Duration
        } else if self.i64().is_some() {
            ValueKind::Integer
        } else if self.bool().is_some() {
            ValueKind::Boolean
        } else if self.f64().is_some() {
            ValueKind::Floating
        } else if self.str().is_some() {
            ValueKind::String
        } else {
            infer_kind(self.sample_iter())
        }
    }

    /// Get an iterator over the samples in the column
    fn sample_iter(&self) -> Box<dyn Iterator<Item = Sample<'_>> + '_> {
        if let Some(col) = self.time() {
            Box::new(col.time_iter().map(Sample::from))
        } else if let Some(col) = self.time_delta() {
            Box::new(col.time_delta_iter().map(Sample::from))
        } else if let Some(col) = self.i64() {
            Box::new(col.i64_iter().map(Sample::from))
        } else if let Some(col) = self.bool() {
            Box::new(col.bool_iter().map(Sample::from))
        } else if let Some(col) = self.f64() {
            Box::new(col.f64_iter().map(Sample::from))
        } else if let Some(col) = self.str() {
            Box::new(col.str_iter().map(Sample::from))
        } else {
            Box::new(std::iter::repeat_n(Sample::Null, self.len()))
        }
    }

    /// Number of distinct non-null values
    fn distinct_count(&self) -> usize {
        self.sample_iter()
            .filter_map(SampleKey::new)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Copy the column into a [`VecColumn`]
    fn to_vec_column(&self) -> VecColumn {
        if let Some(col) = self.time() {
            VecColumn::Time(col.time_iter().collect())
        } else if let Some(col) = self.time_delta() {
            VecColumn::TimeDelta(col.time_delta_iter().collect())
        } else if let Some(col) = self.i64() {
            VecColumn::I64(col.i64_iter().collect())
        } else if let Some(col) = self.bool() {
            VecColumn::Bool(col.bool_iter().collect())
        } else if let Some(col) = self.f64() {
            VecColumn::F64(col.f64_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        } else if let Some(col) = self.str() {
            VecColumn::Str(col.str_iter().map(|s| s.map(str::to_string)).collect())
        } else {
            VecColumn::Mixed(self.sample_iter().map(Sample::into_owned).collect())
        }
    }

    /// Get the column as a f64 column, if possible
    fn f64(&self) -> Option<&dyn F64Column> {
        None
    }

    /// Get the column as an i64 column, if possible
    fn i64(&self) -> Option<&dyn I64Column> {
        None
    }

    /// Get the column as a bool column, if possible
    fn bool(&self) -> Option<&dyn BoolColumn> {
        None
    }

    /// Get the column as a str column, if possible
    fn str(&self) -> Option<&dyn StrColumn> {
        None
    }

    /// Get the column as a time column, if possible
    fn time(&self) -> Option<&dyn TimeColumn> {
        None
    }

    /// Get the column as a time delta column, if possible
    fn time_delta(&self) -> Option<&dyn TimeDeltaColumn> {
        None
    }
}

/// Trait for a column of f64 values
pub trait F64Column: std::fmt::Debug {
    /// Get the length of the column
    fn len(&self) -> usize;

    /// Get the number of non-null values in the column
    /// That is, the number of values that are not NaN
    fn len_some(&self) -> usize {
        self.f64_iter().filter(|v| v.is_some()).count()
    }

    /// Get an iterator over the f64 values in the column
    fn f64_iter(&self) -> Box<dyn Iterator<Item = Option<f64>> + '_>;

    /// Get the min and max values in the column.
    /// Returns None if there are only null values.
    fn minmax(&self) -> Option<(f64, f64)> {
        let mut res: Option<(f64, f64)> = None;
        for v in self.f64_iter() {
            match (v, res) {
                (None, _) => continue,
                (Some(v), Some((min, max))) => {
                    res = Some((min.min(v), max.max(v)));
                }
                (Some(v), None) => {
                    res = Some((v, v));
                }
            }
        }
        res
    }
}

/// Trait for a column of i64 values
pub trait I64Column: std::fmt::Debug {
    /// Get the length of the column
    fn len(&self) -> usize;

    /// Get the number of non-null values in the column
    fn len_some(&self) -> usize {
        self.i64_iter().filter(|v| v.is_some()).count()
    }

    /// Get an iterator over the i64 values in the column
    fn i64_iter(&self) -> Box<dyn Iterator<Item = Option<i64>> + '_>;
}

/// Trait for a column of boolean values
pub trait BoolColumn: std::fmt::Debug {
    /// Get the length of the column
    fn len(&self) -> usize;

    /// Get the number of non-null values in the column
    fn len_some(&self) -> usize {
        self.bool_iter().filter(|v| v.is_some()).count()
    }

    /// Get an iterator over the boolean values in the column
    fn bool_iter(&self) -> Box<dyn Iterator<Item = Option<bool>> + '_>;
}

/// Trait for a column of string values
pub trait StrColumn: std::fmt::Debug {
    /// Get the length of the column
    fn len(&self) -> usize;

    /// Get the number of non-null values in the column
    fn len_some(&self) -> usize {
        self.str_iter().filter(|v| v.is_some()).count()
    }

    /// Get an iterator over the string values in the column
    fn str_iter(&self) -> Box<dyn Iterator<Item = Option<&str>> + '_>;
}

/// Trait for a column of time values
pub trait TimeColumn: std::fmt::Debug {
    /// Get the length of the column
    fn len(&self) -> usize;

    /// Get the number of non-null values in the column
    fn len_some(&self) -> usize {
        self.time_iter().filter(|v| v.is_some()).count()
    }

    /// Get an iterator over the time values in the column
    fn time_iter(&self) -> Box<dyn Iterator<Item = Option<DateTime>> + '_>;
}

/// Trait for a column of time delta values
pub trait TimeDeltaColumn: std::fmt::Debug {
    /// Get the length of the column
    fn len(&self) -> usize;

    /// Get the number of non-null values in the column
    fn len_some(&self) -> usize {
        self.time_delta_iter().filter(|v| v.is_some()).count()
    }

    /// Get an iterator over the time delta values in the column
    fn time_delta_iter(&self) -> Box<dyn Iterator<Item = Option<TimeDelta>> + '_>;
}

/// A trait for a source of data, organized by named columns.
///
/// All columns of a source have the same length.
pub trait Source: fmt::Debug {
    /// Get the names of the columns in the source
    fn names(&self) -> Vec<&str>;

    /// Get a column by name
    fn column(&self, name: &str) -> Option<&dyn Column>;

    /// Number of rows in the source
    fn len(&self) -> usize {
        self.names()
            .first()
            .and_then(|name| self.column(name))
            .map_or(0, |col| col.len())
    }

    /// The row index of the source.
    /// `None` stands for a positional index (`0..len`).
    fn index(&self) -> Option<&Index> {
        None
    }

    /// Copy the source into a [`TableSource`].
    /// The index is kept.
    fn to_table(&self) -> TableSource {
        let mut table = TableSource::new();
        for name in self.names() {
            if let Some(col) = self.column(name) {
                table.add_column(name, col.to_vec_column());
            }
        }
        table.with_index(self.index().cloned().unwrap_or_default())
    }

    /// Copy the given columns, in the given order, into a [`TableSource`].
    ///
    /// All names are checked before anything is copied.
    fn select(&self, names: &[&str]) -> Result<TableSource, Error> {
        let columns = names
            .iter()
            .map(|&name| {
                self.column(name)
                    .ok_or_else(|| Error::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut table = TableSource::new();
        for (name, col) in names.iter().zip(columns) {
            table.add_column(name, col.to_vec_column());
        }
        Ok(table.with_index(self.index().cloned().unwrap_or_default()))
    }
}

/// Empty source
impl Source for () {
    fn names(&self) -> Vec<&str> {
        Vec::new()
    }

    fn column(&self, _name: &str) -> Option<&dyn Column> {
        None
    }
}

impl F64Column for Vec<f64> {
    fn len(&self) -> usize {
        self.len()
    }

    fn f64_iter(&self) -> Box<dyn Iterator<Item = Option<f64>> + '_> {
        Box::new(self.iter().map(|v| if v.is_nan() { None } else { Some(*v) }))
    }
}

impl Column for Vec<f64> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.iter().filter(|v| !v.is_nan()).count()
    }

    fn f64(&self) -> Option<&dyn F64Column> {
        Some(self)
    }
}

impl F64Column for Vec<Option<i64>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn f64_iter(&self) -> Box<dyn Iterator<Item = Option<f64>> + '_> {
        Box::new(self.iter().map(|v| v.map(|v| v as f64)))
    }
}

impl I64Column for Vec<Option<i64>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn i64_iter(&self) -> Box<dyn Iterator<Item = Option<i64>> + '_> {
        Box::new(self.iter().copied())
    }
}

impl Column for Vec<Option<i64>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.iter().filter(|v| v.is_some()).count()
    }

    fn f64(&self) -> Option<&dyn F64Column> {
        Some(self)
    }

    fn i64(&self) -> Option<&dyn I64Column> {
        Some(self)
    }
}

impl F64Column for Vec<i64> {
    fn len(&self) -> usize {
        self.len()
    }

    fn f64_iter(&self) -> Box<dyn Iterator<Item = Option<f64>> + '_> {
        Box::new(self.iter().map(|v| Some(*v as f64)))
    }
}

impl I64Column for Vec<i64> {
    fn len(&self) -> usize {
        self.len()
    }

    fn i64_iter(&self) -> Box<dyn Iterator<Item = Option<i64>> + '_> {
        Box::new(self.iter().map(|v| Some(*v)))
    }
}

impl Column for Vec<i64> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.len()
    }

    fn f64(&self) -> Option<&dyn F64Column> {
        Some(self)
    }

    fn i64(&self) -> Option<&dyn I64Column> {
        Some(self)
    }
}

impl BoolColumn for Vec<Option<bool>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn bool_iter(&self) -> Box<dyn Iterator<Item = Option<bool>> + '_> {
        Box::new(self.iter().copied())
    }
}

impl Column for Vec<Option<bool>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.iter().filter(|v| v.is_some()).count()
    }

    fn bool(&self) -> Option<&dyn BoolColumn> {
        Some(self)
    }
}

impl BoolColumn for Vec<bool> {
    fn len(&self) -> usize {
        self.len()
    }

    fn bool_iter(&self) -> Box<dyn Iterator<Item = Option<bool>> + '_> {
        Box::new(self.iter().map(|v| Some(*v)))
    }
}

impl Column for Vec<bool> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.len()
    }

    fn bool(&self) -> Option<&dyn BoolColumn> {
        Some(self)
    }
}

impl StrColumn for Vec<Option<String>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn str_iter(&self) -> Box<dyn Iterator<Item = Option<&str>> + '_> {
        Box::new(self.iter().map(|s| s.as_deref()))
    }
}

impl Column for Vec<Option<String>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.iter().filter(|s| s.is_some()).count()
    }

    fn str(&self) -> Option<&dyn StrColumn> {
        Some(self)
    }
}

impl StrColumn for Vec<String> {
    fn len(&self) -> usize {
        self.len()
    }

    fn str_iter(&self) -> Box<dyn Iterator<Item = Option<&str>> + '_> {
        Box::new(self.iter().map(|s| Some(s.as_str())))
    }
}

impl Column for Vec<String> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.len()
    }

    fn str(&self) -> Option<&dyn StrColumn> {
        Some(self)
    }
}

impl StrColumn for Vec<&str> {
    fn len(&self) -> usize {
        self.len()
    }

    fn str_iter(&self) -> Box<dyn Iterator<Item = Option<&str>> + '_> {
        Box::new(self.iter().map(|s| Some(*s)))
    }
}

impl Column for Vec<&str> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.len()
    }

    fn str(&self) -> Option<&dyn StrColumn> {
        Some(self)
    }
}

impl TimeColumn for Vec<Option<DateTime>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn time_iter(&self) -> Box<dyn Iterator<Item = Option<DateTime>> + '_> {
        Box::new(self.iter().copied())
    }
}

impl Column for Vec<Option<DateTime>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.iter().filter(|v| v.is_some()).count()
    }

    fn time(&self) -> Option<&dyn TimeColumn> {
        Some(self)
    }
}

impl TimeColumn for Vec<DateTime> {
    fn len(&self) -> usize {
        self.len()
    }

    fn time_iter(&self) -> Box<dyn Iterator<Item = Option<DateTime>> + '_> {
        Box::new(self.iter().map(|v| Some(*v)))
    }
}

impl Column for Vec<DateTime> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.len()
    }

    fn time(&self) -> Option<&dyn TimeColumn> {
        Some(self)
    }
}

impl TimeDeltaColumn for Vec<Option<TimeDelta>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn time_delta_iter(&self) -> Box<dyn Iterator<Item = Option<TimeDelta>> + '_> {
        Box::new(self.iter().copied())
    }
}

impl Column for Vec<Option<TimeDelta>> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.iter().filter(|v| v.is_some()).count()
    }

    fn time_delta(&self) -> Option<&dyn TimeDeltaColumn> {
        Some(self)
    }
}

impl TimeDeltaColumn for Vec<TimeDelta> {
    fn len(&self) -> usize {
        self.len()
    }

    fn time_delta_iter(&self) -> Box<dyn Iterator<Item = Option<TimeDelta>> + '_> {
        Box::new(self.iter().map(|v| Some(*v)))
    }
}

impl Column for Vec<TimeDelta> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.len()
    }

    fn time_delta(&self) -> Option<&dyn TimeDeltaColumn> {
        Some(self)
    }
}

impl Column for Vec<OwnedSample> {
    fn len(&self) -> usize {
        self.len()
    }

    fn len_some(&self) -> usize {
        self.iter().filter(|s| !s.is_null()).count()
    }

    fn sample_iter(&self) -> Box<dyn Iterator<Item = Sample<'_>> + '_> {
        Box::new(self.iter().map(OwnedSample::as_sample))
    }
}

/// Column implementation backed by vectors, type known at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum VecColumn {
    /// f64 column, NaN is null
    F64(Vec<f64>),
    /// i64 column
    I64(Vec<Option<i64>>),
    /// boolean column
    Bool(Vec<Option<bool>>),
    /// string column
    Str(Vec<Option<String>>),
    /// categorical column
    Cat(Vec<Option<String>>),
    /// time column
    Time(Vec<Option<DateTime>>),
    /// time delta column
    TimeDelta(Vec<Option<TimeDelta>>),
    /// column of samples of any kind
    Mixed(Vec<OwnedSample>),
}

// Applies the same vector expression to whatever variant is held
macro_rules! map_variant {
    ($col:expr, $v:ident => $body:expr) => {
        match $col {
            VecColumn::F64($v) => VecColumn::F64($body),
            VecColumn::I64($v) => VecColumn::I64($body),
            VecColumn::Bool($v) => VecColumn::Bool($body),
            VecColumn::Str($v) => VecColumn::Str($body),
            VecColumn::Cat($v) => VecColumn::Cat($body),
            VecColumn::Time($v) => VecColumn::Time($body),
            VecColumn::TimeDelta($v) => VecColumn::TimeDelta($body),
            VecColumn::Mixed($v) => VecColumn::Mixed($body),
        }
    };
}

impl VecColumn {
    /// Build a categorical column
    pub fn categorical<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        VecColumn::Cat(values.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Get the length of the column
    pub fn len(&self) -> usize {
        match self {
            VecColumn::F64(v) => v.len(),
            VecColumn::I64(v) => v.len(),
            VecColumn::Bool(v) => v.len(),
            VecColumn::Str(v) | VecColumn::Cat(v) => v.len(),
            VecColumn::Time(v) => v.len(),
            VecColumn::TimeDelta(v) => v.len(),
            VecColumn::Mixed(v) => v.len(),
        }
    }

    /// Check whether the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a null value
    pub fn push_null(&mut self) {
        match self {
            VecColumn::F64(v) => v.push(f64::NAN),
            VecColumn::I64(v) => v.push(None),
            VecColumn::Bool(v) => v.push(None),
            VecColumn::Str(v) | VecColumn::Cat(v) => v.push(None),
            VecColumn::Time(v) => v.push(None),
            VecColumn::TimeDelta(v) => v.push(None),
            VecColumn::Mixed(v) => v.push(OwnedSample::Null),
        }
    }

    /// Get the sample at `idx`, null if out of bounds
    pub fn sample(&self, idx: usize) -> Sample<'_> {
        match self {
            VecColumn::F64(v) => v.get(idx).copied().into(),
            VecColumn::I64(v) => v.get(idx).copied().flatten().into(),
            VecColumn::Bool(v) => v.get(idx).copied().flatten().into(),
            VecColumn::Str(v) | VecColumn::Cat(v) => {
                v.get(idx).and_then(|s| s.as_deref()).into()
            }
            VecColumn::Time(v) => v.get(idx).copied().flatten().into(),
            VecColumn::TimeDelta(v) => v.get(idx).copied().flatten().into(),
            VecColumn::Mixed(v) => v.get(idx).map_or(Sample::Null, OwnedSample::as_sample),
        }
    }

    /// Concatenate columns end to end.
    ///
    /// The variant is kept if all columns share it,
    /// otherwise the result is a [`VecColumn::Mixed`] column.
    pub fn concat(cols: &[&VecColumn]) -> VecColumn {
        let Some(first) = cols.first() else {
            return VecColumn::Mixed(Vec::new());
        };
        let same = cols
            .iter()
            .all(|c| std::mem::discriminant(*c) == std::mem::discriminant(*first));
        if !same {
            return VecColumn::Mixed(
                cols.iter()
                    .flat_map(|c| c.sample_iter().map(Sample::into_owned))
                    .collect(),
            );
        }
        let mut res = (*first).clone();
        for col in &cols[1..] {
            match (&mut res, col) {
                (VecColumn::F64(a), VecColumn::F64(b)) => a.extend_from_slice(b),
                (VecColumn::I64(a), VecColumn::I64(b)) => a.extend_from_slice(b),
                (VecColumn::Bool(a), VecColumn::Bool(b)) => a.extend_from_slice(b),
                (VecColumn::Str(a), VecColumn::Str(b)) => a.extend_from_slice(b),
                (VecColumn::Cat(a), VecColumn::Cat(b)) => a.extend_from_slice(b),
                (VecColumn::Time(a), VecColumn::Time(b)) => a.extend_from_slice(b),
                (VecColumn::TimeDelta(a), VecColumn::TimeDelta(b)) => a.extend_from_slice(b),
                (VecColumn::Mixed(a), VecColumn::Mixed(b)) => a.extend_from_slice(b),
                _ => unreachable!("variants checked above"),
            }
        }
        res
    }

    /// Repeat the whole column `times` times
    pub fn tile(&self, times: usize) -> VecColumn {
        map_variant!(self, v => v.iter().cloned().cycle().take(v.len() * times).collect())
    }

    /// Gather the values at the given positions.
    ///
    /// Panics if a position is out of bounds.
    pub fn take(&self, indices: &[usize]) -> VecColumn {
        map_variant!(self, v => indices.iter().map(|&i| v[i].clone()).collect())
    }

    /// Convert a [`VecColumn::Mixed`] column to the tightest variant able to hold its values.
    /// Other variants are returned unchanged.
    pub fn narrowed(self) -> VecColumn {
        let VecColumn::Mixed(samples) = self else {
            return self;
        };
        match infer_kind(samples.iter().map(OwnedSample::as_sample)) {
            ValueKind::Integer => {
                VecColumn::I64(samples.iter().map(|s| s.as_sample().as_int()).collect())
            }
            ValueKind::Floating | ValueKind::MixedIntegerFloat => VecColumn::F64(
                samples
                    .iter()
                    .map(|s| s.as_sample().as_num().unwrap_or(f64::NAN))
                    .collect(),
            ),
            ValueKind::Boolean => VecColumn::Bool(
                samples
                    .iter()
                    .map(|s| match s {
                        OwnedSample::Bool(b) => Some(*b),
                        _ => None,
                    })
                    .collect(),
            ),
            ValueKind::String => VecColumn::Str(
                samples
                    .into_iter()
                    .map(|s| match s {
                        OwnedSample::Cat(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            ValueKind::Datetime => {
                VecColumn::Time(samples.iter().map(|s| s.as_sample().as_time()).collect())
            }
            ValueKind::Duration => VecColumn::TimeDelta(
                samples
                    .iter()
                    .map(|s| s.as_sample().as_time_delta())
                    .collect(),
            ),
            _ => VecColumn::Mixed(samples),
        }
    }
}

impl From<Vec<f64>> for VecColumn {
    fn from(v: Vec<f64>) -> Self {
        VecColumn::F64(v)
    }
}

impl From<Vec<Option<i64>>> for VecColumn {
    fn from(v: Vec<Option<i64>>) -> Self {
        VecColumn::I64(v)
    }
}

impl From<Vec<i64>> for VecColumn {
    fn from(v: Vec<i64>) -> Self {
        VecColumn::I64(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<bool>>> for VecColumn {
    fn from(v: Vec<Option<bool>>) -> Self {
        VecColumn::Bool(v)
    }
}

impl From<Vec<bool>> for VecColumn {
    fn from(v: Vec<bool>) -> Self {
        VecColumn::Bool(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<String>>> for VecColumn {
    fn from(v: Vec<Option<String>>) -> Self {
        VecColumn::Str(v)
    }
}

impl From<Vec<String>> for VecColumn {
    fn from(v: Vec<String>) -> Self {
        VecColumn::Str(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for VecColumn {
    fn from(v: Vec<&str>) -> Self {
        VecColumn::Str(v.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

impl From<Vec<Option<DateTime>>> for VecColumn {
    fn from(v: Vec<Option<DateTime>>) -> Self {
        VecColumn::Time(v)
    }
}

impl From<Vec<DateTime>> for VecColumn {
    fn from(v: Vec<DateTime>) -> Self {
        VecColumn::Time(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<TimeDelta>>> for VecColumn {
    fn from(v: Vec<Option<TimeDelta>>) -> Self {
        VecColumn::TimeDelta(v)
    }
}

impl From<Vec<TimeDelta>> for VecColumn {
    fn from(v: Vec<TimeDelta>) -> Self {
        VecColumn::TimeDelta(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<OwnedSample>> for VecColumn {
    fn from(v: Vec<OwnedSample>) -> Self {
        VecColumn::Mixed(v)
    }
}

impl Column for VecColumn {
    fn len(&self) -> usize {
        VecColumn::len(self)
    }

    fn len_some(&self) -> usize {
        match self {
            VecColumn::F64(v) => <dyn F64Column>::len_some(v),
            VecColumn::I64(v) => <dyn I64Column>::len_some(v),
            VecColumn::Bool(v) => <dyn BoolColumn>::len_some(v),
            VecColumn::Str(v) | VecColumn::Cat(v) => <dyn StrColumn>::len_some(v),
            VecColumn::Time(v) => <dyn TimeColumn>::len_some(v),
            VecColumn::TimeDelta(v) => <dyn TimeDeltaColumn>::len_some(v),
            VecColumn::Mixed(v) => v.iter().filter(|s| !s.is_null()).count(),
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            _ if Column::len_some(self) == 0 => ValueKind::Empty,
            VecColumn::F64(_) => ValueKind::Floating,
            VecColumn::I64(_) => ValueKind::Integer,
            VecColumn::Bool(_) => ValueKind::Boolean,
            VecColumn::Str(_) => ValueKind::String,
            VecColumn::Cat(_) => ValueKind::Categorical,
            VecColumn::Time(_) => ValueKind::Datetime,
            VecColumn::TimeDelta(_) => ValueKind::Duration,
            VecColumn::Mixed(v) => infer_kind(v.iter().map(OwnedSample::as_sample)),
        }
    }

    fn sample_iter(&self) -> Box<dyn Iterator<Item = Sample<'_>> + '_> {
        match self {
            VecColumn::F64(v) => Box::new(v.iter().map(|v| (*v).into())),
            VecColumn::I64(v) => Box::new(v.iter().map(|v| (*v).into())),
            VecColumn::Bool(v) => Box::new(v.iter().map(|v| (*v).into())),
            VecColumn::Str(v) | VecColumn::Cat(v) => {
                Box::new(v.iter().map(|v| v.as_deref().into()))
            }
            VecColumn::Time(v) => Box::new(v.iter().map(|v| (*v).into())),
            VecColumn::TimeDelta(v) => Box::new(v.iter().map(|v| (*v).into())),
            VecColumn::Mixed(v) => Box::new(v.iter().map(OwnedSample::as_sample)),
        }
    }

    fn to_vec_column(&self) -> VecColumn {
        self.clone()
    }

    fn f64(&self) -> Option<&dyn F64Column> {
        match self {
            VecColumn::F64(v) => Some(v),
            VecColumn::I64(v) => Some(v),
            _ => None,
        }
    }

    fn i64(&self) -> Option<&dyn I64Column> {
        match self {
            VecColumn::I64(v) => Some(v),
            _ => None,
        }
    }

    fn bool(&self) -> Option<&dyn BoolColumn> {
        match self {
            VecColumn::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn str(&self) -> Option<&dyn StrColumn> {
        match self {
            VecColumn::Str(v) | VecColumn::Cat(v) => Some(v),
            _ => None,
        }
    }

    fn time(&self) -> Option<&dyn TimeColumn> {
        match self {
            VecColumn::Time(v) => Some(v),
            _ => None,
        }
    }

    fn time_delta(&self) -> Option<&dyn TimeDeltaColumn> {
        match self {
            VecColumn::TimeDelta(v) => Some(v),
            _ => None,
        }
    }
}

/// Collect the non-null values of a numeric column
pub fn numeric_values(col: &dyn Column) -> Vec<f64> {
    col.sample_iter()
        .filter_map(|s| match s {
            Sample::Num(v) if v.is_finite() => Some(v),
            Sample::Int(v) => Some(v as f64),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> DateTime {
        chrono::NaiveDate::from_ymd_opt(2017, 1, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn kind_of_typed_columns() {
        assert_eq!(vec![1i64, 2, 3].kind(), ValueKind::Integer);
        assert_eq!(vec![1.0, 2.5].kind(), ValueKind::Floating);
        assert_eq!(vec!["a", "b"].kind(), ValueKind::String);
        assert_eq!(vec![true, false].kind(), ValueKind::Boolean);
        assert_eq!(vec![date(1), date(2)].kind(), ValueKind::Datetime);
        assert_eq!(
            vec![TimeDelta::days(1), TimeDelta::hours(3)].kind(),
            ValueKind::Duration
        );
        assert_eq!(
            VecColumn::categorical(["a", "b", "a"]).kind(),
            ValueKind::Categorical
        );
    }

    #[test]
    fn kind_of_empty_columns() {
        assert_eq!(Vec::<f64>::new().kind(), ValueKind::Empty);
        assert_eq!(vec![f64::NAN, f64::NAN].kind(), ValueKind::Empty);
        assert_eq!(vec![None::<i64>, None].kind(), ValueKind::Empty);
        assert_eq!(VecColumn::Mixed(vec![]).kind(), ValueKind::Empty);
    }

    #[test]
    fn kind_of_mixed_columns() {
        let ints = VecColumn::Mixed(vec![1i64.into(), OwnedSample::Null, 3i64.into()]);
        assert_eq!(ints.kind(), ValueKind::Integer);

        let int_float = VecColumn::Mixed(vec![1i64.into(), 2.5.into()]);
        assert_eq!(int_float.kind(), ValueKind::MixedIntegerFloat);

        let int_str = VecColumn::Mixed(vec![1i64.into(), "a".into()]);
        assert_eq!(int_str.kind(), ValueKind::MixedInteger);

        let float_str = VecColumn::Mixed(vec![1.5.into(), "a".into()]);
        assert_eq!(float_str.kind(), ValueKind::Mixed);

        let str_bool = VecColumn::Mixed(vec![true.into(), "a".into()]);
        assert_eq!(str_bool.kind(), ValueKind::Mixed);

        let strs = VecColumn::Mixed(vec!["a".into(), "b".into()]);
        assert_eq!(strs.kind(), ValueKind::String);
    }

    #[test]
    fn distinct_count_ignores_nulls() {
        let col = VecColumn::I64(vec![Some(1), None, Some(1), Some(2)]);
        assert_eq!(col.distinct_count(), 2);

        let col = vec![1.0, f64::NAN, 2.0, 2.0];
        assert_eq!(col.distinct_count(), 2);
    }

    #[test]
    fn distinct_count_merges_integral_floats() {
        let col = VecColumn::Mixed(vec![1i64.into(), 1.0.into(), 1.5.into()]);
        assert_eq!(col.distinct_count(), 2);
    }

    #[test]
    fn concat_same_variant() {
        let a = VecColumn::from(vec![1i64, 2]);
        let b = VecColumn::from(vec![3i64]);
        let c = VecColumn::concat(&[&a, &b]);
        assert_eq!(c, VecColumn::from(vec![1i64, 2, 3]));
    }

    #[test]
    fn concat_mixed_variants() {
        let a = VecColumn::from(vec![1i64]);
        let b = VecColumn::from(vec!["x"]);
        let c = VecColumn::concat(&[&a, &b]);
        assert_eq!(
            c,
            VecColumn::Mixed(vec![OwnedSample::Int(1), OwnedSample::Cat("x".into())])
        );
        assert_eq!(c.kind(), ValueKind::MixedInteger);
    }

    #[test]
    fn tile_and_take() {
        let col = VecColumn::from(vec!["a", "b"]);
        assert_eq!(col.tile(2), VecColumn::from(vec!["a", "b", "a", "b"]));
        assert_eq!(col.tile(0).len(), 0);
        assert_eq!(col.take(&[1, 1, 0]), VecColumn::from(vec!["b", "b", "a"]));
    }

    #[test]
    fn narrowed_mixed() {
        let col = VecColumn::Mixed(vec![1i64.into(), OwnedSample::Null]);
        assert_eq!(col.narrowed(), VecColumn::I64(vec![Some(1), None]));

        let col = VecColumn::Mixed(vec!["a".into()]);
        assert_eq!(col.narrowed(), VecColumn::from(vec!["a"]));

        let col = VecColumn::Mixed(vec!["a".into(), 1i64.into()]);
        assert!(matches!(col.narrowed(), VecColumn::Mixed(_)));
    }

    #[test]
    fn sample_conversions() {
        assert_eq!(Sample::from(f64::NAN), Sample::Null);
        assert_eq!(Sample::from(Some(2i64)).as_num(), Some(2.0));
        assert_eq!(Sample::from("a").into_owned(), OwnedSample::Cat("a".into()));
    }

    #[test]
    fn numeric_values_skip_nulls() {
        let col = VecColumn::I64(vec![Some(1), None, Some(3)]);
        assert_eq!(numeric_values(&col), vec![1.0, 3.0]);
    }

    #[test]
    fn select_checks_all_names() {
        let table = TableSource::new()
            .with_column("a", vec![1i64, 2])
            .with_column("b", vec![1.0, 2.0]);
        assert_eq!(
            table.select(&["b", "nope"]).unwrap_err(),
            Error::MissingColumn("nope".into())
        );
        let sel = table.select(&["b", "a"]).unwrap();
        assert_eq!(sel.names(), vec!["b", "a"]);
    }
}
