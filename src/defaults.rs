//! Default values of the plotting parameters

/// Maximum distinct count for an integer column to be encoded as ordinal
pub const ORDINAL_THRESHOLD: usize = 6;
/// Ordinal threshold of the category axis of bar charts
pub const BAR_ORDINAL_THRESHOLD: usize = 50;

/// Column name given to a materialized index without name
pub const INDEX_NAME: &str = "index";
/// Fallback when [`INDEX_NAME`] is already a column
pub const INDEX_FALLBACK_NAME: &str = "level_0";
/// Column name of an unnamed series
pub const SERIES_NAME: &str = "0";
/// Column of the wide column names in a long table
pub const VARIABLE_NAME: &str = "variable";
/// Column of the cell values in a long table
pub const VALUE_NAME: &str = "value";

/// Chart width in pixels
pub const WIDTH: u32 = 450;
/// Chart height in pixels
pub const HEIGHT: u32 = 300;
/// Opacity of overlapping bars and areas when not stacked
pub const UNSTACKED_OPACITY: f64 = 0.7;

/// Maximum number of histogram bins
pub const HIST_BINS: usize = 10;
/// Number of hexbin bins along each axis
pub const HEXBIN_GRIDSIZE: usize = 100;
/// Number of evaluation points of density estimates
pub const KDE_POINTS: usize = 1000;
/// Column of the evaluation points of density estimates
pub const KDE_GRID_NAME: &str = " ";
/// Column of the estimated densities
pub const KDE_VALUE_NAME: &str = "Density";

/// Number of points of each Andrews curve
pub const ANDREWS_SAMPLES: usize = 200;
/// Pixels per inch when the scatter matrix size is given in inches
pub const DPI: f64 = 72.0;

/// Maximum number of rows embedded in a chart
pub const MAX_ROWS: usize = 10_000;
/// Vega-Lite schema of the produced specifications
pub const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v2.json";
