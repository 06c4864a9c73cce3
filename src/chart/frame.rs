use serde_json::{Map, json};

use super::kde::{self, GaussianKde};
use super::{Chart, Error, Kind, PlotOpts, field, lookup, stack_value};
use crate::data::{Source, TableSource, numeric_values};
use crate::defaults;
use crate::reshape::{self, LongTable, Unpivot};

/// Plotting accessor of a table
#[derive(Debug, Clone, Copy)]
pub struct FramePlot<'a> {
    src: &'a dyn Source,
}

impl<'a> FramePlot<'a> {
    /// Create the accessor
    pub fn new(src: &'a dyn Source) -> Self {
        Self { src }
    }

    /// Build a chart of the given kind
    pub fn plot(&self, kind: Kind, opts: &PlotOpts) -> Result<Chart, Error> {
        match kind {
            Kind::Line => self.line(opts),
            Kind::Bar => self.bar(opts),
            Kind::Barh => self.barh(opts),
            Kind::Area => self.area(opts),
            Kind::Scatter => self.scatter(opts),
            Kind::Hist => self.hist(opts),
            Kind::Hexbin => self.hexbin(opts),
            Kind::Kde => self.kde(opts),
            Kind::Density => self.density(opts),
        }
    }

    /// One line per column against the index, or against `x`.
    pub fn line(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_frame(Kind::Line);
        let (long, x, order) = self.melt_xy(opts, true)?;
        let data = long.table();

        let mut encoding = Map::new();
        encoding.insert("x".into(), field(data, &x, defaults::ORDINAL_THRESHOLD));
        encoding.insert(
            "y".into(),
            field(data, long.value_name(), defaults::ORDINAL_THRESHOLD),
        );
        encoding.insert(
            "color".into(),
            field(data, long.variable_name(), defaults::ORDINAL_THRESHOLD),
        );
        if let Some(order) = order {
            encoding.insert(
                "order".into(),
                json!({"field": order, "type": "quantitative"}),
            );
        }
        if let Some(alpha) = opts.opacity(None)? {
            encoding.insert("opacity".into(), json!({ "value": alpha }));
        }

        let spec = json!({ "mark": "line", "encoding": encoding });
        Ok(Chart::new(opts.finalize(spec), Some(long.into_table())))
    }

    /// Vertical bars, one color per column. Not stacked by default.
    pub fn bar(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_frame(Kind::Bar);
        self.stackable(opts, Kind::Bar, false)
    }

    /// Horizontal bars, one color per column. Not stacked by default.
    pub fn barh(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_frame(Kind::Barh);
        self.stackable(opts, Kind::Barh, false)
    }

    /// Areas, one color per column. Stacked by default.
    pub fn area(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_frame(Kind::Area);
        self.stackable(opts, Kind::Area, true)
    }

    /// Points of column `y` against column `x`, optionally colored and sized by other columns
    pub fn scatter(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_frame(Kind::Scatter);
        let x = opts.x.as_deref().ok_or(Error::MissingParam("x"))?;
        let y = opts.y.as_deref().ok_or(Error::MissingParam("y"))?;

        let mut cols = vec![x, y];
        for extra in [opts.color.as_deref(), opts.size.as_deref()].into_iter().flatten() {
            if !cols.contains(&extra) {
                cols.push(extra);
            }
        }
        let data = self.src.select(&cols)?;

        let mut encoding = Map::new();
        encoding.insert("x".into(), field(&data, x, 0));
        encoding.insert("y".into(), field(&data, y, 0));
        if let Some(c) = opts.color.as_deref() {
            encoding.insert("color".into(), field(&data, c, defaults::ORDINAL_THRESHOLD));
        }
        if let Some(s) = opts.size.as_deref() {
            encoding.insert("size".into(), field(&data, s, defaults::ORDINAL_THRESHOLD));
        }
        if let Some(alpha) = opts.opacity(None)? {
            encoding.insert("opacity".into(), json!({ "value": alpha }));
        }

        let spec = json!({ "mark": "circle", "encoding": encoding });
        Ok(Chart::new(opts.finalize(spec), Some(data)))
    }

    /// Histogram of the numeric columns, one color per column
    pub fn hist(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_frame(Kind::Hist);
        let bins = opts.bins.unwrap_or(defaults::HIST_BINS);
        if bins == 0 {
            return Err(Error::InvalidParam("bins must be positive".into()));
        }
        let stacked = opts.stacked.unwrap_or(false);

        let numeric = self.numeric_columns("hist");
        if numeric.is_empty() {
            return Err(Error::NoNumericData);
        }
        let unpivot = Unpivot::new()
            .with_value_columns(numeric)
            .with_variable_name(opts.variable_name())
            .with_value_name(opts.value_name());
        let long = reshape::unpivot(self.src, &unpivot)?;
        let n_series = long.variables().len();
        let data = long.table();

        let mut encoding = Map::new();
        encoding.insert(
            "x".into(),
            json!({
                "field": long.value_name(),
                "type": "quantitative",
                "bin": { "maxbins": bins },
            }),
        );
        encoding.insert(
            "y".into(),
            json!({
                "aggregate": "count",
                "type": "quantitative",
                "stack": stack_value(stacked),
            }),
        );
        encoding.insert(
            "color".into(),
            field(data, long.variable_name(), defaults::ORDINAL_THRESHOLD),
        );
        let default_alpha = (!stacked && n_series > 1).then_some(defaults::UNSTACKED_OPACITY);
        if let Some(alpha) = opts.opacity(default_alpha)? {
            encoding.insert("opacity".into(), json!({ "value": alpha }));
        }

        let mark = opts.histtype.unwrap_or_default().mark();
        let spec = json!({ "mark": mark, "encoding": encoding });
        Ok(Chart::new(opts.finalize(spec), Some(long.into_table())))
    }

    /// Two dimensional histogram of `x` and `y`, colored by count or by the aggregate of `hex_value`
    pub fn hexbin(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_frame(Kind::Hexbin);
        let x = opts.x.as_deref().ok_or(Error::MissingParam("x"))?;
        let y = opts.y.as_deref().ok_or(Error::MissingParam("y"))?;
        let gridsize = opts.gridsize.unwrap_or(defaults::HEXBIN_GRIDSIZE);
        if gridsize == 0 {
            return Err(Error::InvalidParam("gridsize must be positive".into()));
        }

        let mut cols = vec![x, y];
        if let Some(c) = opts.hex_value.as_deref() {
            if !cols.contains(&c) {
                cols.push(c);
            }
        }
        let data = self.src.select(&cols)?;

        let color = match opts.hex_value.as_deref() {
            Some(c) => json!({
                "field": c,
                "aggregate": opts.reduce.unwrap_or_default().as_str(),
                "type": "quantitative",
            }),
            None => json!({ "aggregate": "count", "type": "quantitative" }),
        };
        let mut encoding = Map::new();
        encoding.insert(
            "x".into(),
            json!({ "field": x, "bin": { "maxbins": gridsize }, "type": "quantitative" }),
        );
        encoding.insert(
            "y".into(),
            json!({ "field": y, "bin": { "maxbins": gridsize }, "type": "quantitative" }),
        );
        encoding.insert("color".into(), color);
        if let Some(alpha) = opts.opacity(None)? {
            encoding.insert("opacity".into(), json!({ "value": alpha }));
        }

        let spec = json!({ "mark": "rect", "encoding": encoding });
        Ok(Chart::new(opts.finalize(spec), Some(data)))
    }

    /// Gaussian kernel density estimate of the numeric columns, or of `y`
    pub fn kde(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        self.density_impl(Kind::Kde, opts)
    }

    /// Same as [`FramePlot::kde`]
    pub fn density(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        self.density_impl(Kind::Density, opts)
    }

    fn density_impl(&self, kind: Kind, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_frame(kind);
        let names: Vec<String> = match opts.y.as_deref() {
            Some(y) => {
                let col = lookup(self.src, y)?;
                if !col.kind().is_numeric() {
                    return Err(Error::NoNumericData);
                }
                vec![y.to_string()]
            }
            None => self.numeric_columns(kind.name()),
        };
        if names.is_empty() {
            return Err(Error::NoNumericData);
        }

        let samples = names
            .iter()
            .map(|name| lookup(self.src, name).map(numeric_values))
            .collect::<Result<Vec<_>, _>>()?;
        let all: Vec<f64> = samples.iter().flatten().copied().collect();
        let grid = kde::grid(&all, opts.ind.as_ref())?;
        let bw = opts.bw_method.unwrap_or_default();

        let mut wide = TableSource::new().with_column(defaults::KDE_GRID_NAME, grid.clone());
        for (name, values) in names.iter().zip(samples) {
            let kde = GaussianKde::new(values, bw)?;
            wide.add_column(name, kde.evaluate(&grid));
        }
        let unpivot = Unpivot::new()
            .with_id(defaults::KDE_GRID_NAME)
            .with_value_columns(&names)
            .with_value_name(defaults::KDE_VALUE_NAME);
        let long = reshape::unpivot(&wide, &unpivot)?;

        let mut encoding = Map::new();
        encoding.insert(
            "x".into(),
            json!({ "field": defaults::KDE_GRID_NAME, "type": "quantitative" }),
        );
        encoding.insert(
            "y".into(),
            json!({ "field": defaults::KDE_VALUE_NAME, "type": "quantitative" }),
        );
        encoding.insert(
            "color".into(),
            json!({ "field": long.variable_name(), "type": "nominal" }),
        );
        if let Some(alpha) = opts.opacity(None)? {
            encoding.insert("opacity".into(), json!({ "value": alpha }));
        }

        let spec = json!({ "mark": "line", "encoding": encoding });
        Ok(Chart::new(opts.finalize(spec), Some(long.into_table())))
    }

    /// Shared builder of bars and areas
    fn stackable(&self, opts: &PlotOpts, kind: Kind, stacked_default: bool) -> Result<Chart, Error> {
        let (long, x, _) = self.melt_xy(opts, false)?;
        let data = long.table();
        let stacked = opts.stacked.unwrap_or(stacked_default);

        let (mark, key_threshold, horizontal) = match kind {
            Kind::Barh => ("bar", defaults::BAR_ORDINAL_THRESHOLD, true),
            Kind::Area => ("area", defaults::ORDINAL_THRESHOLD, false),
            _ => ("bar", defaults::BAR_ORDINAL_THRESHOLD, false),
        };
        let key = field(data, &x, key_threshold);
        let mut value = field(data, long.value_name(), defaults::ORDINAL_THRESHOLD);
        value["stack"] = stack_value(stacked);
        let (x_channel, y_channel) = if horizontal { (value, key) } else { (key, value) };

        let mut encoding = Map::new();
        encoding.insert("x".into(), x_channel);
        encoding.insert("y".into(), y_channel);
        encoding.insert(
            "color".into(),
            field(data, long.variable_name(), defaults::ORDINAL_THRESHOLD),
        );
        let default_alpha =
            (!stacked && long.variables().len() > 1).then_some(defaults::UNSTACKED_OPACITY);
        if let Some(alpha) = opts.opacity(default_alpha)? {
            encoding.insert("opacity".into(), json!({ "value": alpha }));
        }

        let spec = json!({ "mark": mark, "encoding": encoding });
        Ok(Chart::new(opts.finalize(spec), Some(long.into_table())))
    }

    /// Melt for the charts of one or more columns against the index or `x`.
    ///
    /// Returns the long table and the name of the x field. When `x` is given
    /// and `keep_order` is set, the index is kept as a second identifier and
    /// its name is returned as well.
    fn melt_xy(
        &self,
        opts: &PlotOpts,
        keep_order: bool,
    ) -> Result<(LongTable, String, Option<String>), Error> {
        let unpivot = Unpivot::new()
            .with_variable_name(opts.variable_name())
            .with_value_name(opts.value_name());
        let Some(x) = opts.x.as_deref() else {
            let unpivot = match opts.y.as_deref() {
                Some(y) => unpivot.with_value_column(y),
                None => unpivot,
            };
            let long = reshape::unpivot(self.src, &unpivot)?;
            let x = long.id_names().first().cloned().unwrap_or_default();
            return Ok((long, x, None));
        };

        lookup(self.src, x)?;
        if let Some(y) = opts.y.as_deref() {
            lookup(self.src, y)?;
        }
        let values: Vec<String> = match opts.y.as_deref() {
            Some(y) => vec![y.to_string()],
            None => self
                .src
                .names()
                .into_iter()
                .filter(|&name| name != x)
                .map(str::to_string)
                .collect(),
        };
        let unpivot = unpivot.with_id(x).with_value_columns(values);
        if !keep_order {
            let long = reshape::unpivot(self.src, &unpivot)?;
            return Ok((long, x.to_string(), None));
        }
        let (index_name, table) = reshape::reset_index_named(self.src)?;
        let long = reshape::unpivot(&table, &unpivot.with_id(&index_name))?;
        Ok((long, x.to_string(), Some(index_name)))
    }

    /// Names of the numeric columns. Others are skipped.
    fn numeric_columns(&self, plot: &str) -> Vec<String> {
        self.src
            .names()
            .into_iter()
            .filter(|&name| {
                let numeric = self
                    .src
                    .column(name)
                    .is_some_and(|col| col.kind().is_numeric());
                if !numeric {
                    log::debug!("{}: skipping non-numeric column '{}'", plot, name);
                }
                numeric
            })
            .map(str::to_string)
            .collect()
    }
}
