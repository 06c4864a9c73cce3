//! Statistical plots.
//!
//! Multi-column visualizations that go beyond a single chart kind:
//! scatter matrices, Andrews curves, parallel coordinates and lag plots.
use std::f64::consts::PI;

use serde_json::{Map, json};

use crate::chart::{Chart, Error, FramePlot, PlotOpts, field, lookup};
use crate::data::{Series, Source, TableSource, VecColumn};
use crate::defaults;
use crate::encoding::{self, EncodingType};
use crate::reshape::{self, Unpivot};
use crate::utils::linspace;

/// Options of [`scatter_matrix`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterMatrixOpts {
    /// Column encoded as the color of the points
    pub color: Option<String>,
    /// Column encoded as the size of the points
    pub size: Option<String>,
    /// Size of the whole figure, in inches
    pub figsize: Option<(f64, f64)>,
    /// Pixels per inch
    pub dpi: f64,
}

impl Default for ScatterMatrixOpts {
    fn default() -> Self {
        Self {
            color: None,
            size: None,
            figsize: None,
            dpi: defaults::DPI,
        }
    }
}

impl ScatterMatrixOpts {
    /// Default options
    pub fn new() -> Self {
        Self::default()
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

    /// Set the figure size in inches
    pub fn with_figsize(mut self, width: f64, height: f64) -> Self {
        self.figsize = Some((width, height));
        self
    }

    /// Set the resolution
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }
}

/// Matrix of scatter plots of every pair of quantitative columns.
///
/// The plots are linked: shift-dragging brushes points in all of them,
/// plain dragging pans and zooms all of them.
pub fn scatter_matrix(src: &dyn Source, opts: &ScatterMatrixOpts) -> Result<Chart, Error> {
    let color = opts.color.as_deref().map(|c| lookup(src, c)).transpose()?;
    let size = opts.size.as_deref().map(|s| lookup(src, s)).transpose()?;

    let cols: Vec<&str> = src
        .names()
        .into_iter()
        .filter(|&name| Some(name) != opts.color.as_deref() && Some(name) != opts.size.as_deref())
        .filter(|&name| {
            src.column(name).is_some_and(|col| {
                encoding::infer_type(col, 0) == EncodingType::Quantitative
            })
        })
        .collect();
    if cols.is_empty() {
        return Err(Error::NoNumericData);
    }
    let reversed: Vec<&str> = cols.iter().rev().copied().collect();

    let mut encoding = Map::new();
    encoding.insert(
        "x".into(),
        json!({ "field": { "repeat": "column" }, "type": "quantitative" }),
    );
    encoding.insert(
        "y".into(),
        json!({ "field": { "repeat": "row" }, "type": "quantitative" }),
    );
    let condition = match (opts.color.as_deref(), color) {
        (Some(name), Some(col)) => json!({
            "selection": "brush",
            "field": name,
            "type": encoding::infer_type(col, defaults::ORDINAL_THRESHOLD).as_str(),
        }),
        _ => json!({ "selection": "brush", "value": "steelblue" }),
    };
    encoding.insert(
        "color".into(),
        json!({ "condition": condition, "value": "grey" }),
    );
    if let (Some(name), Some(col)) = (opts.size.as_deref(), size) {
        encoding.insert(
            "size".into(),
            json!({
                "field": name,
                "type": encoding::infer_type(col, defaults::ORDINAL_THRESHOLD).as_str(),
            }),
        );
    }

    let mut inner = json!({
        "mark": "point",
        "selection": {
            "brush": {
                "type": "interval",
                "resolve": "union",
                "on": "[mousedown[event.shiftKey], window:mouseup] > window:mousemove!",
                "translate": "[mousedown[event.shiftKey], window:mouseup] > window:mousemove!",
                "zoom": "wheel![event.shiftKey]",
            },
            "grid": {
                "type": "interval",
                "resolve": "global",
                "bind": "scales",
                "translate": "[mousedown[!event.shiftKey], window:mouseup] > window:mousemove!",
                "zoom": "wheel![!event.shiftKey]",
            },
        },
        "encoding": encoding,
    });
    if let Some((width, height)) = opts.figsize {
        let n = cols.len() as f64;
        inner["width"] = json!(0.8 * opts.dpi * width / n);
        inner["height"] = json!(0.8 * opts.dpi * height / n);
    }

    let spec = json!({
        "$schema": defaults::SCHEMA,
        "repeat": { "row": cols, "column": reversed },
        "spec": inner,
    });
    Ok(Chart::new(spec, Some(src.to_table())))
}

/// Andrews curves of the rows of a table, colored by `class_column`.
///
/// Each row `x` becomes the curve
/// `x0 + x1 sin(t) + x2 cos(t) + x3 sin(2t) + x4 cos(2t) + ...`
/// sampled on `samples` points of `[-pi, pi]`.
/// All columns but the class column must be numeric.
pub fn andrews_curves(
    src: &dyn Source,
    class_column: &str,
    samples: usize,
    opts: &PlotOpts,
) -> Result<Chart, Error> {
    opts.warn_unrecognized("andrews_curves", &[]);
    let class = lookup(src, class_column)?;
    if samples == 0 {
        return Err(Error::InvalidParam("samples must be positive".into()));
    }

    let mut features: Vec<Vec<f64>> = Vec::new();
    for name in src.names().into_iter().filter(|&n| n != class_column) {
        let col = lookup(src, name)?;
        if !col.kind().is_numeric() {
            return Err(Error::InvalidParam(format!(
                "column '{}' is not numeric",
                name
            )));
        }
        features.push(
            col.sample_iter()
                .map(|s| s.as_num().unwrap_or(f64::NAN))
                .collect(),
        );
    }

    let rows = src.len();
    let t = linspace(-PI, PI, samples);
    let mut t_col = Vec::with_capacity(rows * samples);
    let mut sample_col = Vec::with_capacity(rows * samples);
    let mut curve_col = Vec::with_capacity(rows * samples);
    let mut class_rows = Vec::with_capacity(rows * samples);
    for row in 0..rows {
        for (ti, &tv) in t.iter().enumerate() {
            let curve = features
                .iter()
                .enumerate()
                .map(|(i, f)| {
                    let x = f[row];
                    match i {
                        0 => x,
                        i if i % 2 == 1 => x * (((i + 1) / 2) as f64 * tv).sin(),
                        i => x * ((i / 2) as f64 * tv).cos(),
                    }
                })
                .sum::<f64>();
            t_col.push(ti as i64);
            sample_col.push(row as i64);
            curve_col.push(curve);
            class_rows.push(row);
        }
    }

    let data = TableSource::new()
        .with_column("t", t_col)
        .with_column("sample", sample_col)
        .with_column(defaults::KDE_GRID_NAME, curve_col)
        .with_column(class_column, class.to_vec_column().take(&class_rows));

    let mut encoding = Map::new();
    encoding.insert("x".into(), json!({ "field": "t", "type": "quantitative" }));
    encoding.insert(
        "y".into(),
        json!({ "field": defaults::KDE_GRID_NAME, "type": "quantitative" }),
    );
    encoding.insert(
        "color".into(),
        field(&data, class_column, defaults::ORDINAL_THRESHOLD),
    );
    encoding.insert(
        "detail".into(),
        json!({ "field": "sample", "type": "quantitative" }),
    );
    if let Some(alpha) = opts.opacity(None)? {
        encoding.insert("opacity".into(), json!({ "value": alpha }));
    }

    let spec = json!({ "mark": "line", "encoding": encoding });
    Ok(Chart::new(opts.finalize(spec), Some(data)))
}

/// Parallel coordinates plot: each row is a line across the columns,
/// colored by `class_column`.
///
/// `cols` restricts the plotted columns, in the given order.
pub fn parallel_coordinates(
    src: &dyn Source,
    class_column: &str,
    cols: Option<&[&str]>,
    opts: &PlotOpts,
) -> Result<Chart, Error> {
    opts.warn_unrecognized("parallel_coordinates", &["variable_name", "value_name"]);
    let mut selected: Vec<&str> = match cols {
        Some(cols) => cols.to_vec(),
        None => src.names(),
    };
    if !selected.contains(&class_column) {
        selected.push(class_column);
    }
    let table = src.select(&selected)?;
    let (index_name, table) = reshape::reset_index_named(&table)?;

    let unpivot = Unpivot::new()
        .with_id(&index_name)
        .with_id(class_column)
        .with_variable_name(opts.variable_name())
        .with_value_name(opts.value_name());
    let long = reshape::unpivot(&table, &unpivot)?;
    let data = long.table();

    let mut encoding = Map::new();
    encoding.insert(
        "color".into(),
        field(data, class_column, defaults::ORDINAL_THRESHOLD),
    );
    encoding.insert(
        "detail".into(),
        field(data, &index_name, defaults::ORDINAL_THRESHOLD),
    );
    encoding.insert(
        "x".into(),
        field(data, long.variable_name(), defaults::ORDINAL_THRESHOLD),
    );
    encoding.insert(
        "y".into(),
        field(data, long.value_name(), defaults::ORDINAL_THRESHOLD),
    );
    if let Some(alpha) = opts.opacity(None)? {
        encoding.insert("opacity".into(), json!({ "value": alpha }));
    }

    let spec = json!({ "mark": "line", "encoding": encoding });
    Ok(Chart::new(opts.finalize(spec), Some(long.into_table())))
}

fn lag_names(lag: usize) -> (String, String) {
    ("y(t)".to_string(), format!("y(t + {})", lag))
}

fn lagged(col: &VecColumn, lag: usize) -> (VecColumn, VecColumn) {
    let n = col.len();
    let keep = n.saturating_sub(lag);
    let head: Vec<usize> = (0..keep).collect();
    let tail: Vec<usize> = (lag..lag + keep).collect();
    (col.take(&head), col.take(&tail))
}

fn check_lag(lag: usize) -> Result<(), Error> {
    if lag == 0 {
        return Err(Error::InvalidParam("lag must be a positive integer".into()));
    }
    Ok(())
}

/// Scatter plot of a series against itself shifted by `lag`
pub fn lag_plot(series: &Series, lag: usize, opts: &PlotOpts) -> Result<Chart, Error> {
    check_lag(lag)?;
    let (y1, y2) = lag_names(lag);
    let (head, tail) = lagged(series.values(), lag);
    let table = TableSource::new()
        .with_column(&y1, head)
        .with_column(&y2, tail);
    let opts = opts.clone().with_x(y1).with_y(y2);
    FramePlot::new(&table).scatter(&opts)
}

/// Lag plot of every column of a table, colored by column
pub fn lag_plot_frame(src: &dyn Source, lag: usize, opts: &PlotOpts) -> Result<Chart, Error> {
    check_lag(lag)?;
    let (y1, y2) = lag_names(lag);
    let names = src.names();
    let mut heads = Vec::with_capacity(names.len());
    let mut tails = Vec::with_capacity(names.len());
    let mut variable: Vec<Option<String>> = Vec::new();
    for &name in &names {
        let (head, tail) = lagged(&lookup(src, name)?.to_vec_column(), lag);
        variable.extend(std::iter::repeat_n(Some(name.to_string()), head.len()));
        heads.push(head);
        tails.push(tail);
    }

    let heads: Vec<&VecColumn> = heads.iter().collect();
    let tails: Vec<&VecColumn> = tails.iter().collect();
    let table = TableSource::new()
        .with_column(&y1, VecColumn::concat(&heads))
        .with_column(&y2, VecColumn::concat(&tails))
        .with_column(defaults::VARIABLE_NAME, VecColumn::Str(variable));
    let opts = opts
        .clone()
        .with_x(y1)
        .with_y(y2)
        .with_color(defaults::VARIABLE_NAME);
    FramePlot::new(&table).scatter(&opts)
}
