//! Vega-Lite chart assembly.
//!
//! The [`VgPlot`] extension trait gives tables and series a plotting accessor:
//! [`FramePlot`] for any [`Source`], [`SeriesPlot`] for a [`Series`].
//! Each chart kind has one builder, parameterized by [`PlotOpts`], that returns
//! a [`Chart`]: a Vega-Lite specification plus the table to embed in it.
//!
//! ```
//! use vgplot::chart::{Kind, PlotOpts, VgPlot};
//! use vgplot::data::TableSource;
//!
//! let table = TableSource::new()
//!     .with_column("x", vec![0.0, 0.5, 1.0])
//!     .with_column("y", vec![1.0, 2.0, 4.0]);
//!
//! let chart = table.vgplot().plot(Kind::Line, &PlotOpts::new().with_x("x")).unwrap();
//! let spec = chart.to_vegalite().unwrap();
//! assert_eq!(spec["mark"], "line");
//! assert_eq!(spec["data"]["values"].as_array().unwrap().len(), 3);
//! ```
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};

use crate::data::{self, Series, Source, TableSource};
use crate::defaults;
use crate::encoding::{self, EncodingType};

mod frame;
mod kde;
mod opts;
mod series;
mod values;

pub use frame::FramePlot;
pub use kde::GaussianKde;
pub use opts::{Aggregate, Bandwidth, HistType, KdeInd, PlotOpts};
pub use series::SeriesPlot;
pub use values::{sample_value, table_values};

/// Errors returned when building a chart
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Column lookup or naming error
    Data(data::Error),
    /// The chart kind does not exist, or is not available for this data
    UnsupportedKind(String),
    /// A required parameter was not provided
    MissingParam(&'static str),
    /// A parameter has an invalid value
    InvalidParam(String),
    /// The chart needs numeric columns and there are none
    NoNumericData,
    /// The data exceeds the number of rows allowed in a chart
    MaxRowsExceeded {
        /// Rows in the data
        rows: usize,
        /// Maximum allowed
        max: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Data(err) => write!(f, "{}", err),
            Error::UnsupportedKind(kind) => write!(f, "Unsupported chart kind: '{}'", kind),
            Error::MissingParam(name) => write!(f, "Missing parameter: '{}'", name),
            Error::InvalidParam(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::NoNumericData => f.write_str("No numeric data to plot"),
            Error::MaxRowsExceeded { rows, max } => write!(
                f,
                "The number of rows in the data ({}) exceeds the maximum allowed ({})",
                rows, max
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Data(err) => Some(err),
            _ => None,
        }
    }
}

impl From<data::Error> for Error {
    fn from(err: data::Error) -> Self {
        Error::Data(err)
    }
}

/// Chart kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Lines, one per column
    Line,
    /// Vertical bars
    Bar,
    /// Horizontal bars
    Barh,
    /// Areas, stacked by default
    Area,
    /// Points of one column against another
    Scatter,
    /// Histogram of the numeric columns
    Hist,
    /// Two dimensional histogram
    Hexbin,
    /// Gaussian kernel density estimate
    Kde,
    /// Alias of [`Kind::Kde`]
    Density,
}

impl Kind {
    /// All kinds
    pub const ALL: [Kind; 9] = [
        Kind::Line,
        Kind::Bar,
        Kind::Barh,
        Kind::Area,
        Kind::Scatter,
        Kind::Hist,
        Kind::Hexbin,
        Kind::Kde,
        Kind::Density,
    ];

    /// The kind name
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Line => "line",
            Kind::Bar => "bar",
            Kind::Barh => "barh",
            Kind::Area => "area",
            Kind::Scatter => "scatter",
            Kind::Hist => "hist",
            Kind::Hexbin => "hexbin",
            Kind::Kde => "kde",
            Kind::Density => "density",
        }
    }

    /// Options used by the frame builder of this kind, on top of the common ones
    pub(crate) fn frame_opts(&self) -> &'static [&'static str] {
        match self {
            Kind::Line | Kind::Bar | Kind::Barh | Kind::Area => {
                &["x", "y", "stacked", "variable_name", "value_name"]
            }
            Kind::Scatter => &["x", "y", "color", "size"],
            Kind::Hist => &["stacked", "bins", "histtype", "variable_name", "value_name"],
            Kind::Hexbin => &["x", "y", "hex_value", "reduce", "gridsize"],
            Kind::Kde | Kind::Density => &["y", "bw_method", "ind"],
        }
    }

    /// Options used by the series builder of this kind, on top of the common ones
    pub(crate) fn series_opts(&self) -> &'static [&'static str] {
        match self {
            Kind::Hist => &["bins", "histtype"],
            Kind::Kde | Kind::Density => &["bw_method", "ind"],
            _ => &[],
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .iter()
            .find(|k| k.name() == s)
            .copied()
            .ok_or_else(|| Error::UnsupportedKind(s.to_string()))
    }
}

const FIRST_LAYER_KEYS: &[&str] = &[
    "encoding",
    "mark",
    "data",
    "transform",
    "description",
    "selection",
];
const LAYER_KEYS: &[&str] = &["encoding", "mark", "data", "transform", "description"];

/// A Vega-Lite chart: the specification and the data it plots.
///
/// The data is kept apart from the specification until
/// [`Chart::to_vegalite`] embeds it as inline values.
#[derive(Debug, Clone)]
pub struct Chart {
    spec: Value,
    data: Option<TableSource>,
    max_rows: usize,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()), None)
    }
}

impl Chart {
    /// Create a chart from a specification and its data
    pub fn new(spec: Value, data: Option<TableSource>) -> Self {
        Self {
            spec,
            data,
            max_rows: defaults::MAX_ROWS,
        }
    }

    /// An empty chart, to be filled with [`Chart::add_layer`]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the maximum number of rows embedded by [`Chart::to_vegalite`]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// The maximum number of embedded rows
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// The specification, without data
    pub fn spec(&self) -> &Value {
        &self.spec
    }

    /// Mutable access to the specification
    pub fn spec_mut(&mut self) -> &mut Value {
        &mut self.spec
    }

    /// The chart data
    pub fn data(&self) -> Option<&TableSource> {
        self.data.as_ref()
    }

    /// The mark of the chart
    pub fn mark(&self) -> Option<&Value> {
        self.spec.get("mark")
    }

    /// The encoding of a channel
    pub fn encoding(&self, channel: &str) -> Option<&Value> {
        self.spec.get("encoding")?.get(channel)
    }

    /// The specification with any inline data removed
    pub fn spec_no_data(&self) -> Value {
        let mut spec = self.spec.clone();
        if let Some(obj) = spec.as_object_mut() {
            obj.remove("data");
        }
        spec
    }

    /// The full specification, data embedded as `data.values`
    pub fn to_vegalite(&self) -> Result<Value, Error> {
        let mut spec = self.spec.clone();
        if let Some(data) = &self.data {
            if data.len() > self.max_rows {
                return Err(Error::MaxRowsExceeded {
                    rows: data.len(),
                    max: self.max_rows,
                });
            }
            if let Some(obj) = spec.as_object_mut() {
                obj.insert("data".into(), json!({ "values": table_values(data) }));
            }
        }
        Ok(spec)
    }

    /// Layer another chart over this one.
    ///
    /// An empty chart takes the other chart as a whole. Otherwise the content of
    /// this chart moves into a first layer and the other chart contributes its
    /// encoding, mark, data, transform and description as a new layer.
    pub fn add_layer(&mut self, layer: &Chart) -> Result<&mut Self, Error> {
        let layer_spec = layer.to_vegalite()?;
        let is_empty = self.spec.as_object().is_none_or(Map::is_empty);
        if is_empty {
            self.spec = layer_spec;
            self.data = None;
            return Ok(self);
        }

        let mut spec = self.to_vegalite()?;
        let Some(obj) = spec.as_object_mut() else {
            return Err(Error::InvalidParam(
                "cannot add a layer to a non-object specification".into(),
            ));
        };
        if !obj.contains_key("layer") {
            let first: Map<String, Value> = FIRST_LAYER_KEYS
                .iter()
                .filter_map(|&k| obj.remove(k).map(|v| (k.to_string(), v)))
                .collect();
            obj.insert("layer".into(), Value::Array(vec![Value::Object(first)]));
        }
        let new_layer: Map<String, Value> = LAYER_KEYS
            .iter()
            .filter_map(|&k| layer_spec.get(k).map(|v| (k.to_string(), v.clone())))
            .collect();
        if let Some(layers) = obj.get_mut("layer").and_then(Value::as_array_mut) {
            layers.push(Value::Object(new_layer));
        }
        if !obj.contains_key("data") {
            obj.insert("data".into(), json!({ "name": "no-toplevel-data" }));
        }

        self.spec = spec;
        self.data = None;
        Ok(self)
    }
}

/// Extension trait giving data containers a plotting accessor
pub trait VgPlot {
    /// The accessor type
    type Plotter<'a>
    where
        Self: 'a;

    /// Get the plotting accessor
    fn vgplot(&self) -> Self::Plotter<'_>;
}

impl<S: Source> VgPlot for S {
    type Plotter<'a>
        = FramePlot<'a>
    where
        S: 'a;

    fn vgplot(&self) -> FramePlot<'_> {
        FramePlot::new(self)
    }
}

impl VgPlot for Series {
    type Plotter<'a> = SeriesPlot<'a>;

    fn vgplot(&self) -> SeriesPlot<'_> {
        SeriesPlot::new(self)
    }
}

/// Encoding of a field, with its inferred type
pub(crate) fn field(src: &dyn Source, name: &str, ordinal_threshold: usize) -> Value {
    json!({ "field": name, "type": field_type(src, name, ordinal_threshold).as_str() })
}

/// Inferred type of a field, nominal if the column does not exist
pub(crate) fn field_type(src: &dyn Source, name: &str, ordinal_threshold: usize) -> EncodingType {
    src.column(name)
        .map_or(EncodingType::Nominal, |col| {
            encoding::infer_type(col, ordinal_threshold)
        })
}

/// Stack property of a channel
pub(crate) fn stack_value(stacked: bool) -> Value {
    if stacked { json!("zero") } else { Value::Null }
}

/// Lookup a column, failing with [`data::Error::MissingColumn`]
pub(crate) fn lookup<'a>(src: &'a dyn Source, name: &str) -> Result<&'a dyn data::Column, Error> {
    src.column(name)
        .ok_or_else(|| data::Error::MissingColumn(name.to_string()).into())
}
