use serde_json::{Map, Number, Value};

use crate::data::{Sample, Source};
use crate::time;

/// JSON value of a sample.
///
/// Nulls and non-finite numbers are `null`, times are ISO 8601 strings and
/// time deltas a number of milliseconds.
pub fn sample_value(sample: Sample<'_>) -> Value {
    match sample {
        Sample::Null => Value::Null,
        Sample::Bool(v) => Value::Bool(v),
        Sample::Int(v) => Value::Number(v.into()),
        Sample::Num(v) => Number::from_f64(v).map_or(Value::Null, Value::Number),
        Sample::Cat(v) => Value::String(v.to_string()),
        Sample::Time(v) => Value::String(time::to_iso(&v)),
        Sample::TimeDelta(v) => Value::Number(v.num_milliseconds().into()),
    }
}

/// Rows of a source as JSON objects, as expected in `data.values`
pub fn table_values(src: &dyn Source) -> Vec<Value> {
    let names = src.names();
    let mut columns: Vec<_> = names
        .iter()
        .filter_map(|&name| src.column(name).map(|col| (name, col.sample_iter())))
        .collect();

    let len = src.len();
    let mut rows = Vec::with_capacity(len);
    for _ in 0..len {
        let mut row = Map::new();
        for (name, samples) in columns.iter_mut() {
            let value = samples.next().map_or(Value::Null, sample_value);
            row.insert(name.to_string(), value);
        }
        rows.push(Value::Object(row));
    }
    rows
}
