use vgplot::chart::{Aggregate, HistType, KdeInd};
use vgplot::data::{Index, Source};

use super::*;

#[test]
fn bar_ref() {
    let chart = two_columns().vgplot().bar(&PlotOpts::new()).unwrap();
    assert_chart_eq_ref!(chart, "frame_bar");
}

#[test]
fn stacked_area() {
    let chart = two_columns().vgplot().area(&PlotOpts::new()).unwrap();
    check_encodings(
        &chart,
        &[
            ("x", json!({"field": "index", "type": "ordinal"})),
            (
                "y",
                json!({"field": "value", "type": "quantitative", "stack": "zero"}),
            ),
            ("color", json!({"field": "variable", "type": "nominal"})),
        ],
    );
    assert!(chart.encoding("opacity").is_none());
}

#[test]
fn unstacked_area() {
    let chart = two_columns()
        .vgplot()
        .area(&PlotOpts::new().with_stacked(false))
        .unwrap();
    assert_eq!(chart.encoding("opacity"), Some(&json!({"value": 0.7})));
    assert_eq!(chart.encoding("y").unwrap()["stack"], json!(null));
}

#[test]
fn barh_with_named_index() {
    let table = two_columns().with_index(Index::new(vec!["p", "q", "r"]).with_name("key"));
    let chart = table.vgplot().barh(&PlotOpts::new()).unwrap();
    check_encodings(
        &chart,
        &[
            (
                "x",
                json!({"field": "value", "type": "quantitative", "stack": null}),
            ),
            ("y", json!({"field": "key", "type": "nominal"})),
        ],
    );
}

#[test]
fn line_against_column_keeps_order() {
    let table = two_columns().with_column("t", vec![0.5, 0.25, 1.0]);
    let chart = table
        .vgplot()
        .line(&PlotOpts::new().with_x("t"))
        .unwrap();
    check_encodings(
        &chart,
        &[
            ("x", json!({"field": "t", "type": "quantitative"})),
            ("order", json!({"field": "index", "type": "quantitative"})),
        ],
    );
    let data = chart.data().unwrap();
    assert_eq!(data.len(), 6);
    assert_eq!(data.names(), vec!["t", "index", "variable", "value"]);
}

#[test]
fn custom_melt_names() {
    let opts = PlotOpts::new()
        .with_variable_name("series")
        .with_value_name("amount");
    let chart = two_columns().vgplot().line(&opts).unwrap();
    check_encodings(
        &chart,
        &[
            ("y", json!({"field": "amount", "type": "quantitative"})),
            ("color", json!({"field": "series", "type": "nominal"})),
        ],
    );
}

#[test]
fn scatter_ref() {
    let opts = PlotOpts::new()
        .with_x("x")
        .with_y("y")
        .with_color("c")
        .with_width(200)
        .with_interactive(false);
    let chart = xy().vgplot().scatter(&opts).unwrap();
    assert_chart_eq_ref!(chart, "frame_scatter");
}

#[test]
fn scatter_needs_x_and_y() {
    assert_eq!(
        xy().vgplot()
            .scatter(&PlotOpts::new().with_x("x"))
            .unwrap_err(),
        Error::MissingParam("y")
    );
}

#[test]
fn hist_ref() {
    let table = TableSource::new()
        .with_column("a", vec![1.0, 2.0, 2.0])
        .with_column("s", vec!["u", "v", "w"]);
    let opts = PlotOpts::new()
        .with_bins(5)
        .with_histtype(HistType::Step);
    let chart = table.vgplot().hist(&opts).unwrap();
    assert_chart_eq_ref!(chart, "frame_hist_step");
}

#[test]
fn hist_of_several_columns_is_translucent() {
    let chart = two_columns().vgplot().hist(&PlotOpts::new()).unwrap();
    assert_eq!(chart.encoding("opacity"), Some(&json!({"value": 0.7})));
    assert_eq!(chart.mark(), Some(&json!("bar")));
}

#[test]
fn hexbin_reduce() {
    let opts = PlotOpts::new()
        .with_x("x")
        .with_y("y")
        .with_hex_value("y")
        .with_reduce(Aggregate::Max)
        .with_gridsize(20);
    let chart = xy().vgplot().hexbin(&opts).unwrap();
    check_encodings(
        &chart,
        &[
            (
                "x",
                json!({"field": "x", "bin": {"maxbins": 20}, "type": "quantitative"}),
            ),
            (
                "color",
                json!({"field": "y", "aggregate": "max", "type": "quantitative"}),
            ),
        ],
    );
    assert_eq!(chart.mark(), Some(&json!("rect")));
    assert_eq!(chart.data().unwrap().names(), vec!["x", "y"]);
}

#[test]
fn kde_of_numeric_columns() {
    let opts = PlotOpts::new().with_ind(KdeInd::Points(50));
    let chart = xy().vgplot().kde(&opts).unwrap();
    check_encodings(
        &chart,
        &[
            ("x", json!({"field": " ", "type": "quantitative"})),
            ("y", json!({"field": "Density", "type": "quantitative"})),
            ("color", json!({"field": "variable", "type": "nominal"})),
        ],
    );
    // x and y on a shared grid, c skipped
    assert_eq!(chart.data().unwrap().len(), 100);
}

#[test]
fn missing_column() {
    let err = two_columns()
        .vgplot()
        .line(&PlotOpts::new().with_y("nope"))
        .unwrap_err();
    assert_eq!(err.to_string(), "No such column: 'nope'");
}
