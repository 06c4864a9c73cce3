use serde_json::{Value, json};

use super::{Error, Kind};
use crate::defaults;

/// Histogram drawing style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistType {
    /// Bars
    #[default]
    Bar,
    /// Step line
    Step,
    /// Filled step area
    StepFilled,
}

impl HistType {
    pub(crate) fn mark(&self) -> Value {
        match self {
            HistType::Bar => json!("bar"),
            HistType::Step => json!({"type": "line", "interpolate": "step"}),
            HistType::StepFilled => json!({"type": "area", "interpolate": "step"}),
        }
    }
}

/// Aggregation of the values falling in a hexbin cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Aggregate {
    /// Number of values
    Count,
    /// Mean value
    #[default]
    Mean,
    /// Sum of values
    Sum,
    /// Median value
    Median,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
}

impl Aggregate {
    /// The Vega-Lite aggregate name
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Count => "count",
            Aggregate::Mean => "mean",
            Aggregate::Sum => "sum",
            Aggregate::Median => "median",
            Aggregate::Min => "min",
            Aggregate::Max => "max",
        }
    }
}

/// Bandwidth selection of density estimates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Bandwidth {
    /// Scott's rule, `n^(-1/5)`
    #[default]
    Scott,
    /// Silverman's rule, `(3n/4)^(-1/5)`
    Silverman,
    /// Fixed factor applied to the standard deviation
    Factor(f64),
}

/// Evaluation points of density estimates
#[derive(Debug, Clone, PartialEq)]
pub enum KdeInd {
    /// Number of evenly spaced points around the data range
    Points(usize),
    /// Explicit points
    Values(Vec<f64>),
}

/// Options of the chart builders.
///
/// Every field is optional, the builder of each kind picks the ones
/// it uses and falls back to [`defaults`] for the others.
/// Setting an option that the chosen kind does not use logs a warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotOpts {
    /// Column on the x axis
    pub x: Option<String>,
    /// Column on the y axis
    pub y: Option<String>,
    /// Column encoded as color (scatter)
    pub color: Option<String>,
    /// Column encoded as size (scatter)
    pub size: Option<String>,
    /// Column aggregated into the hexbin color
    pub hex_value: Option<String>,
    /// Aggregation of [`PlotOpts::hex_value`]
    pub reduce: Option<Aggregate>,
    /// Whether bars, areas or histograms stack
    pub stacked: Option<bool>,
    /// Maximum number of histogram bins
    pub bins: Option<usize>,
    /// Histogram style
    pub histtype: Option<HistType>,
    /// Number of hexbin bins per axis
    pub gridsize: Option<usize>,
    /// Bandwidth of density estimates
    pub bw_method: Option<Bandwidth>,
    /// Evaluation points of density estimates
    pub ind: Option<KdeInd>,
    /// Opacity, in `[0, 1]`
    pub alpha: Option<f64>,
    /// Chart width in pixels
    pub width: Option<u32>,
    /// Chart height in pixels
    pub height: Option<u32>,
    /// Whether scales can be panned and zoomed
    pub interactive: Option<bool>,
    /// Name of the variable column of melted data
    pub variable_name: Option<String>,
    /// Name of the value column of melted data
    pub value_name: Option<String>,
}

impl PlotOpts {
    /// Options with every field unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the x column
    pub fn with_x(mut self, x: impl Into<String>) -> Self {
        self.x = Some(x.into());
        self
    }

    /// Set the y column
    pub fn with_y(mut self, y: impl Into<String>) -> Self {
        self.y = Some(y.into());
        self
    }

    /// Set the color column
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the size column
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Set the hexbin value column
    pub fn with_hex_value(mut self, col: impl Into<String>) -> Self {
        self.hex_value = Some(col.into());
        self
    }

    /// Set the hexbin aggregation
    pub fn with_reduce(mut self, reduce: Aggregate) -> Self {
        self.reduce = Some(reduce);
        self
    }

    /// Set stacking
    pub fn with_stacked(mut self, stacked: bool) -> Self {
        self.stacked = Some(stacked);
        self
    }

    /// Set the number of histogram bins
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = Some(bins);
        self
    }

    /// Set the histogram style
    pub fn with_histtype(mut self, histtype: HistType) -> Self {
        self.histtype = Some(histtype);
        self
    }

    /// Set the hexbin grid size
    pub fn with_gridsize(mut self, gridsize: usize) -> Self {
        self.gridsize = Some(gridsize);
        self
    }

    /// Set the density bandwidth
    pub fn with_bw_method(mut self, bw: Bandwidth) -> Self {
        self.bw_method = Some(bw);
        self
    }

    /// Set the density evaluation points
    pub fn with_ind(mut self, ind: KdeInd) -> Self {
        self.ind = Some(ind);
        self
    }

    /// Set the opacity
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set the chart width
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the chart height
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Enable or disable pan and zoom
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }

    /// Set the name of the variable column
    pub fn with_variable_name(mut self, name: impl Into<String>) -> Self {
        self.variable_name = Some(name.into());
        self
    }

    /// Set the name of the value column
    pub fn with_value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = Some(name.into());
        self
    }

    /// Name of the variable column
    pub fn variable_name(&self) -> &str {
        self.variable_name
            .as_deref()
            .unwrap_or(defaults::VARIABLE_NAME)
    }

    /// Name of the value column
    pub fn value_name(&self) -> &str {
        self.value_name.as_deref().unwrap_or(defaults::VALUE_NAME)
    }

    fn set_names(&self) -> Vec<&'static str> {
        let flags = [
            ("x", self.x.is_some()),
            ("y", self.y.is_some()),
            ("color", self.color.is_some()),
            ("size", self.size.is_some()),
            ("hex_value", self.hex_value.is_some()),
            ("reduce", self.reduce.is_some()),
            ("stacked", self.stacked.is_some()),
            ("bins", self.bins.is_some()),
            ("histtype", self.histtype.is_some()),
            ("gridsize", self.gridsize.is_some()),
            ("bw_method", self.bw_method.is_some()),
            ("ind", self.ind.is_some()),
            ("variable_name", self.variable_name.is_some()),
            ("value_name", self.value_name.is_some()),
        ];
        flags
            .into_iter()
            .filter_map(|(name, set)| set.then_some(name))
            .collect()
    }

    /// Names of the options that are set but not in `accepted`.
    /// `alpha`, `width`, `height` and `interactive` are accepted by every chart.
    pub fn unrecognized(&self, accepted: &[&str]) -> Vec<&'static str> {
        self.set_names()
            .into_iter()
            .filter(|name| !accepted.contains(name))
            .collect()
    }

    pub(crate) fn warn_unrecognized(&self, plot: &str, accepted: &[&str]) {
        let names = self.unrecognized(accepted);
        if !names.is_empty() {
            let names: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
            log::warn!(
                "Unrecognized keywords in vgplot.{}(): {}",
                plot,
                names.join(", ")
            );
        }
    }

    pub(crate) fn warn_unrecognized_frame(&self, kind: Kind) {
        self.warn_unrecognized(kind.name(), kind.frame_opts());
    }

    pub(crate) fn warn_unrecognized_series(&self, kind: Kind) {
        self.warn_unrecognized(kind.name(), kind.series_opts());
    }

    /// The opacity to encode: `alpha` when set, else `default`
    pub(crate) fn opacity(&self, default: Option<f64>) -> Result<Option<f64>, Error> {
        match self.alpha {
            Some(alpha) if !(0.0..=1.0).contains(&alpha) => Err(Error::InvalidParam(format!(
                "alpha must be in [0, 1], got {}",
                alpha
            ))),
            Some(alpha) => Ok(Some(alpha)),
            None => Ok(default),
        }
    }

    /// Add the top level properties shared by all charts
    pub(crate) fn finalize(&self, mut spec: Value) -> Value {
        if let Some(obj) = spec.as_object_mut() {
            obj.insert("$schema".into(), json!(defaults::SCHEMA));
            obj.insert("width".into(), json!(self.width.unwrap_or(defaults::WIDTH)));
            obj.insert(
                "height".into(),
                json!(self.height.unwrap_or(defaults::HEIGHT)),
            );
            if self.interactive.unwrap_or(true) {
                obj.insert(
                    "selection".into(),
                    json!({"grid": {"type": "interval", "bind": "scales"}}),
                );
            }
        }
        spec
    }
}
