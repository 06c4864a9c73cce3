//! [Polars](https://pola.rs) data frames as data sources.
//!
//! A [`DataFrame`] implements [`Source`], its columns and polars [`Series`]
//! implement [`Column`].
//! `Float64`, `Int64`, `Boolean` and `String` columns have direct typed access.
//! Other integer, float and temporal columns are read value by value.
//! Categorical columns must be cast to `String` first, their kind is reported
//! as [`ValueKind::Other`] otherwise.
use polars::prelude::{
    AnyValue, BooleanChunked, DataFrame, DataType, Float64Chunked, Int64Chunked, Series,
    SeriesTrait, StringChunked, TimeUnit,
};

use super::{
    BoolColumn, Column, F64Column, I64Column, Sample, Source, StrColumn, ValueKind,
};
use crate::time::{DateTime, TimeDelta};

type PlColumn = polars::prelude::Column;

impl F64Column for Float64Chunked {
    fn len(&self) -> usize {
        Float64Chunked::len(self)
    }

    fn f64_iter(&self) -> Box<dyn Iterator<Item = Option<f64>> + '_> {
        Box::new(self.into_iter())
    }
}

impl F64Column for Int64Chunked {
    fn len(&self) -> usize {
        Int64Chunked::len(self)
    }

    fn f64_iter(&self) -> Box<dyn Iterator<Item = Option<f64>> + '_> {
        Box::new(self.into_iter().map(|v| v.map(|v| v as f64)))
    }
}

impl I64Column for Int64Chunked {
    fn len(&self) -> usize {
        Int64Chunked::len(self)
    }

    fn i64_iter(&self) -> Box<dyn Iterator<Item = Option<i64>> + '_> {
        Box::new(self.into_iter())
    }
}

impl BoolColumn for BooleanChunked {
    fn len(&self) -> usize {
        BooleanChunked::len(self)
    }

    fn bool_iter(&self) -> Box<dyn Iterator<Item = Option<bool>> + '_> {
        Box::new(self.into_iter())
    }
}

impl StrColumn for StringChunked {
    fn len(&self) -> usize {
        StringChunked::len(self)
    }

    fn str_iter(&self) -> Box<dyn Iterator<Item = Option<&str>> + '_> {
        Box::new(self.into_iter())
    }
}

fn timestamp(value: i64, unit: TimeUnit) -> Option<DateTime> {
    let dt = match unit {
        TimeUnit::Nanoseconds => Some(chrono::DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => chrono::DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => chrono::DateTime::from_timestamp_millis(value),
    };
    dt.map(|dt| dt.naive_utc())
}

fn duration(value: i64, unit: TimeUnit) -> TimeDelta {
    match unit {
        TimeUnit::Nanoseconds => TimeDelta::nanoseconds(value),
        TimeUnit::Microseconds => TimeDelta::microseconds(value),
        TimeUnit::Milliseconds => TimeDelta::milliseconds(value),
    }
}

fn any_value_sample<'a>(value: AnyValue<'a>) -> Sample<'a> {
    match value {
        AnyValue::Boolean(v) => Sample::Bool(v),
        AnyValue::Int8(v) => Sample::Int(v.into()),
        AnyValue::Int16(v) => Sample::Int(v.into()),
        AnyValue::Int32(v) => Sample::Int(v.into()),
        AnyValue::Int64(v) => Sample::Int(v),
        AnyValue::UInt8(v) => Sample::Int(v.into()),
        AnyValue::UInt16(v) => Sample::Int(v.into()),
        AnyValue::UInt32(v) => Sample::Int(v.into()),
        AnyValue::UInt64(v) => i64::try_from(v).map_or(Sample::Num(v as f64), Sample::Int),
        AnyValue::Float32(v) => Sample::from(f64::from(v)),
        AnyValue::Float64(v) => Sample::from(v),
        AnyValue::String(v) => Sample::Cat(v),
        AnyValue::Date(days) => timestamp(i64::from(days) * 86_400_000, TimeUnit::Milliseconds)
            .map_or(Sample::Null, Sample::Time),
        AnyValue::Datetime(v, unit, _) => timestamp(v, unit).map_or(Sample::Null, Sample::Time),
        AnyValue::Duration(v, unit) => Sample::TimeDelta(duration(v, unit)),
        _ => Sample::Null,
    }
}

impl Column for Series {
    fn len(&self) -> usize {
        SeriesTrait::len(&**self)
    }

    fn len_some(&self) -> usize {
        SeriesTrait::len(&**self) - self.null_count()
    }

    fn kind(&self) -> ValueKind {
        if Column::len_some(self) == 0 {
            return ValueKind::Empty;
        }
        match self.dtype() {
            DataType::Float32 | DataType::Float64 => ValueKind::Floating,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ValueKind::Integer,
            DataType::Boolean => ValueKind::Boolean,
            DataType::String => ValueKind::String,
            DataType::Date | DataType::Datetime(..) => ValueKind::Datetime,
            DataType::Duration(..) => ValueKind::Duration,
            other => ValueKind::Other(other.to_string()),
        }
    }

    fn sample_iter(&self) -> Box<dyn Iterator<Item = Sample<'_>> + '_> {
        Box::new(
            (0..SeriesTrait::len(&**self))
                .map(move |idx| self.get(idx).map_or(Sample::Null, any_value_sample)),
        )
    }

    fn f64(&self) -> Option<&dyn F64Column> {
        match self.dtype() {
            DataType::Float64 => Series::f64(self).ok().map(|c| c as &dyn F64Column),
            DataType::Int64 => Series::i64(self).ok().map(|c| c as &dyn F64Column),
            _ => None,
        }
    }

    fn i64(&self) -> Option<&dyn I64Column> {
        Series::i64(self).ok().map(|c| c as &dyn I64Column)
    }

    fn bool(&self) -> Option<&dyn BoolColumn> {
        Series::bool(self).ok().map(|c| c as &dyn BoolColumn)
    }

    fn str(&self) -> Option<&dyn StrColumn> {
        Series::str(self).ok().map(|c| c as &dyn StrColumn)
    }
}

/// Columns of a data frame, read through their materialized series
impl Column for PlColumn {
    fn len(&self) -> usize {
        PlColumn::len(self)
    }

    fn len_some(&self) -> usize {
        PlColumn::len(self) - self.null_count()
    }

    fn kind(&self) -> ValueKind {
        Column::kind(self.as_materialized_series())
    }

    fn sample_iter(&self) -> Box<dyn Iterator<Item = Sample<'_>> + '_> {
        Column::sample_iter(self.as_materialized_series())
    }

    fn f64(&self) -> Option<&dyn F64Column> {
        Column::f64(self.as_materialized_series())
    }

    fn i64(&self) -> Option<&dyn I64Column> {
        Column::i64(self.as_materialized_series())
    }

    fn bool(&self) -> Option<&dyn BoolColumn> {
        Column::bool(self.as_materialized_series())
    }

    fn str(&self) -> Option<&dyn StrColumn> {
        Column::str(self.as_materialized_series())
    }
}

impl Source for DataFrame {
    fn names(&self) -> Vec<&str> {
        self.get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect()
    }

    fn column(&self, name: &str) -> Option<&dyn Column> {
        DataFrame::column(self, name)
            .ok()
            .map(|col| col as &dyn Column)
    }

    fn len(&self) -> usize {
        self.height()
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{NamedFrom, df};

    use super::*;
    use crate::encoding::{EncodingType, infer_type};

    fn frame() -> DataFrame {
        df!(
            "x" => &[1.0, 2.0, 3.0, 4.0],
            "n" => &[1i64, 2, 1, 2],
            "small" => &[1i32, 2, 3, 4],
            "name" => &["a", "b", "c", "d"],
        )
        .unwrap()
    }

    #[test]
    fn frame_source() {
        let df = frame();
        assert_eq!(Source::names(&df), vec!["x", "n", "small", "name"]);
        assert_eq!(Source::len(&df), 4);
        assert!(Source::column(&df, "nope").is_none());
    }

    #[test]
    fn column_kinds() {
        let df = frame();
        let kind = |name: &str| Source::column(&df, name).unwrap().kind();
        assert_eq!(kind("x"), ValueKind::Floating);
        assert_eq!(kind("n"), ValueKind::Integer);
        assert_eq!(kind("small"), ValueKind::Integer);
        assert_eq!(kind("name"), ValueKind::String);
    }

    #[test]
    fn inferred_types() {
        let df = frame();
        let ty = |name: &str| infer_type(Source::column(&df, name).unwrap(), 6);
        assert_eq!(ty("x"), EncodingType::Quantitative);
        assert_eq!(ty("n"), EncodingType::Ordinal);
        assert_eq!(ty("name"), EncodingType::Nominal);
    }

    #[test]
    fn polars_series_column() {
        let s = Series::new("s".into(), &[Some(1.5), None, Some(2.5)]);
        assert_eq!(Column::len(&s), 3);
        assert_eq!(Column::len_some(&s), 2);
        assert_eq!(Column::kind(&s), ValueKind::Floating);
        assert_eq!(Column::distinct_count(&s), 2);
    }

    #[test]
    fn series_samples_and_types() {
        let s = Series::new("s".into(), &[Some(3i64), None, Some(3), Some(4)]);
        assert_eq!(Column::len(&s), 4);
        let ints: Vec<_> = Column::sample_iter(&s).map(|v| v.as_int()).collect();
        assert_eq!(ints, vec![Some(3), None, Some(3), Some(4)]);
        assert_eq!(infer_type(&s, 6), EncodingType::Ordinal);
        assert_eq!(infer_type(&s, 0), EncodingType::Quantitative);
    }

    #[test]
    fn samples_of_narrow_ints() {
        let df = frame();
        let col = Source::column(&df, "small").unwrap();
        let ints: Vec<_> = col.sample_iter().map(|s| s.as_int()).collect();
        assert_eq!(ints, vec![Some(1), Some(2), Some(3), Some(4)]);
    }
}
