use serde_json::{Map, json};

use super::kde::{self, GaussianKde};
use super::{Chart, Error, Kind, PlotOpts, field};
use crate::data::{Column, Series, TableSource, numeric_values};
use crate::defaults;
use crate::reshape;

/// Plotting accessor of a series.
///
/// The values are plotted directly against the index, without melting.
#[derive(Debug, Clone, Copy)]
pub struct SeriesPlot<'a> {
    series: &'a Series,
}

impl<'a> SeriesPlot<'a> {
    /// Create the accessor
    pub fn new(series: &'a Series) -> Self {
        Self { series }
    }

    /// Build a chart of the given kind.
    /// Scatter and hexbin need two columns and are not available.
    pub fn plot(&self, kind: Kind, opts: &PlotOpts) -> Result<Chart, Error> {
        match kind {
            Kind::Line => self.line(opts),
            Kind::Bar => self.bar(opts),
            Kind::Barh => self.barh(opts),
            Kind::Area => self.area(opts),
            Kind::Hist => self.hist(opts),
            Kind::Kde => self.kde(opts),
            Kind::Density => self.density(opts),
            Kind::Scatter | Kind::Hexbin => Err(Error::UnsupportedKind(format!(
                "{} is not available for a series",
                kind
            ))),
        }
    }

    /// Line of the values against the index
    pub fn line(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        self.against_index(Kind::Line, opts)
    }

    /// Vertical bars
    pub fn bar(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        self.against_index(Kind::Bar, opts)
    }

    /// Horizontal bars
    pub fn barh(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        self.against_index(Kind::Barh, opts)
    }

    /// Area under the values
    pub fn area(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        self.against_index(Kind::Area, opts)
    }

    /// Histogram of the values
    pub fn hist(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_series(Kind::Hist);
        let bins = opts.bins.unwrap_or(defaults::HIST_BINS);
        if bins == 0 {
            return Err(Error::InvalidParam("bins must be positive".into()));
        }
        if !self.series.kind().is_numeric() {
            return Err(Error::NoNumericData);
        }
        let data = self.series.to_table();
        let name = self.series.column_name();

        let mut encoding = Map::new();
        encoding.insert(
            "x".into(),
            json!({ "field": name, "type": "quantitative", "bin": { "maxbins": bins } }),
        );
        encoding.insert(
            "y".into(),
            json!({ "aggregate": "count", "type": "quantitative" }),
        );
        if let Some(alpha) = opts.opacity(None)? {
            encoding.insert("opacity".into(), json!({ "value": alpha }));
        }

        let mark = opts.histtype.unwrap_or_default().mark();
        let spec = json!({ "mark": mark, "encoding": encoding });
        Ok(Chart::new(opts.finalize(spec), Some(data)))
    }

    /// Gaussian kernel density estimate of the values
    pub fn kde(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        self.density_impl(Kind::Kde, opts)
    }

    /// Same as [`SeriesPlot::kde`]
    pub fn density(&self, opts: &PlotOpts) -> Result<Chart, Error> {
        self.density_impl(Kind::Density, opts)
    }

    fn density_impl(&self, kind: Kind, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_series(kind);
        if !self.series.kind().is_numeric() {
            return Err(Error::NoNumericData);
        }
        let values = numeric_values(self.series);
        let grid = kde::grid(&values, opts.ind.as_ref())?;
        let kde = GaussianKde::new(values, opts.bw_method.unwrap_or_default())?;
        let name = self.series.column_name();
        let density = kde.evaluate(&grid);
        let data = TableSource::new()
            .with_column(defaults::KDE_GRID_NAME, grid)
            .with_column(name, density);

        let mut encoding = Map::new();
        encoding.insert(
            "x".into(),
            json!({ "field": defaults::KDE_GRID_NAME, "type": "quantitative" }),
        );
        encoding.insert("y".into(), json!({ "field": name, "type": "quantitative" }));
        if let Some(alpha) = opts.opacity(None)? {
            encoding.insert("opacity".into(), json!({ "value": alpha }));
        }

        let spec = json!({ "mark": "line", "encoding": encoding });
        Ok(Chart::new(opts.finalize(spec), Some(data)))
    }

    fn against_index(&self, kind: Kind, opts: &PlotOpts) -> Result<Chart, Error> {
        opts.warn_unrecognized_series(kind);
        let (index_name, data) = reshape::reset_index_named(&self.series.to_table())?;
        let name = self.series.column_name();

        let (mark, key_threshold) = match kind {
            Kind::Bar | Kind::Barh => ("bar", defaults::BAR_ORDINAL_THRESHOLD),
            Kind::Area => ("area", defaults::ORDINAL_THRESHOLD),
            _ => ("line", defaults::ORDINAL_THRESHOLD),
        };
        let key = field(&data, &index_name, key_threshold);
        let value = field(&data, name, defaults::ORDINAL_THRESHOLD);
        let (x, y) = if kind == Kind::Barh { (value, key) } else { (key, value) };

        let mut encoding = Map::new();
        encoding.insert("x".into(), x);
        encoding.insert("y".into(), y);
        if let Some(alpha) = opts.opacity(None)? {
            encoding.insert("opacity".into(), json!({ "value": alpha }));
        }

        let spec = json!({ "mark": mark, "encoding": encoding });
        Ok(Chart::new(opts.finalize(spec), Some(data)))
    }
}
