#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]
/*!
 * # vgplot
 * _Vega-Lite charts from tabular data_.
 *
 * vgplot builds [Vega-Lite](https://vega.github.io/vega-lite/) chart specifications
 * from column-oriented data. The specification is plain JSON (a [`serde_json::Value`])
 * that any Vega-Lite renderer can display.
 *
 * ## Supported chart kinds
 *  - line, area and bar (vertical and horizontal) charts, stacked or not
 *  - scatter plots and hexagonal binning
 *  - histograms
 *  - kernel density estimates
 *  - scatter matrices, Andrews curves, parallel coordinates and lag plots (see [`plotting`])
 *
 * ## Get started
 *
 * ```
 * use vgplot::chart::{Kind, PlotOpts, VgPlot};
 * use vgplot::data::TableSource;
 *
 * let table = TableSource::new()
 *     .with_column("x", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])
 *     .with_column("a", vec![1.0, 4.0, 9.0, 16.0, 25.0, 36.0, 49.0])
 *     .with_column("b", vec![2.0, 3.0, 2.0, 3.0, 2.0, 3.0, 2.0]);
 *
 * // "a" and "b" are melted into a long table and colored by column name
 * let chart = table.vgplot().plot(Kind::Line, &PlotOpts::new().with_x("x")).unwrap();
 * let spec = chart.to_vegalite().unwrap();
 *
 * assert_eq!(spec["mark"], "line");
 * assert_eq!(spec["encoding"]["color"]["field"], "variable");
 * assert_eq!(spec["data"]["values"].as_array().unwrap().len(), 14);
 * ```
 *
 * The encoding type of each field (quantitative, ordinal, nominal or temporal)
 * is inferred from the column data, see [`encoding::infer_type`].
 *
 * ## Crate features
 *
 *  - `data-csv`: enables CSV data source support (See [`data::CsvParser`])
 *  - `data-polars`: enables [Polars](https://pola.rs) data source support (See [`data::polars`])
 *    pulls in the `polars` dependency, which is quite a beast to compile.
 */
// vgplot is released under the MIT License.

pub mod chart;
pub mod data;
pub mod defaults;
pub mod encoding;
pub mod plotting;
pub mod reshape;
pub mod time;

pub use chart::{Chart, Kind, PlotOpts, VgPlot};
pub use encoding::{EncodingType, infer_type};

pub mod utils {
    //! Utility functions for data generation

    /// Create a linearly spaced vector of `num` elements between `start` and `end`.
    ///
    /// A single element is `start`, both ends are included otherwise.
    pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
        if num == 1 {
            return vec![start];
        }
        let step = (end - start) / (num as f64 - 1.0);
        (0..num).map(|i| start + i as f64 * step).collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_linspace() {
            assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
            assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
            assert!(linspace(3.0, 4.0, 0).is_empty());
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    pub trait Near {
        fn near_abs(&self, other: &Self, tol: f64) -> bool;
        fn near_rel(&self, other: &Self, err: f64) -> bool;
    }

    impl Near for f64 {
        fn near_abs(&self, other: &Self, tol: f64) -> bool {
            (self - other).abs() <= tol
        }

        fn near_rel(&self, other: &Self, err: f64) -> bool {
            let diff = (self - other).abs();
            let largest = self.abs().max(other.abs());
            diff <= largest * err
        }
    }

    macro_rules! assert_near {
        (abs, $a:expr, $b:expr, $tol:expr) => {
            assert!($a.near_abs(&$b, $tol), "Assertion failed: Values are not close enough.\nValue 1: {:?}\nValue 2: {:?}\nTolerance: {}", $a, $b, $tol);
        };
        (abs, $a:expr, $b:expr) => {
            assert_near!(abs, $a, $b, 1e-8);
        };
        (rel, $a:expr, $b:expr, $err:expr) => {
            assert!($a.near_rel(&$b, $err), "Assertion failed: Values are not close enough.\nValue 1: {:?}\nValue 2: {:?}\nRelative error: {}", $a, $b, $err);
        };
        (rel, $a:expr, $b:expr) => {
            assert_near!(rel, $a, $b, 1e-8);
        };
    }

    pub(crate) use assert_near;

    #[test]
    fn test_close_to() {
        let a = 1.0;
        let b = 1.0 + 1e-9;
        assert_near!(abs, a, b);
        assert!(!a.near_abs(&b, 1e-10));
        assert_near!(rel, a, b);
        assert!(!a.near_rel(&b, 1e-10));
    }
}
