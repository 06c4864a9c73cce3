use vgplot::data::{Series, Source};
use vgplot::plotting::{self, ScatterMatrixOpts};

use super::*;

fn iris() -> TableSource {
    TableSource::new()
        .with_column("sepal_length", vec![5.1, 4.9, 7.0, 6.4, 6.3, 5.8])
        .with_column("sepal_width", vec![3.5, 3.0, 3.2, 3.2, 3.3, 2.7])
        .with_column("petal_length", vec![1.4, 1.4, 4.7, 4.5, 6.0, 5.1])
        .with_column(
            "species",
            vec!["setosa", "setosa", "versicolor", "versicolor", "virginica", "virginica"],
        )
}

#[test]
fn scatter_matrix() {
    let opts = ScatterMatrixOpts::new().with_color("species");
    let chart = plotting::scatter_matrix(&iris(), &opts).unwrap();
    let spec = chart.to_vegalite().unwrap();
    assert_eq!(
        spec["repeat"]["column"],
        json!(["petal_length", "sepal_width", "sepal_length"])
    );
    assert_eq!(spec["spec"]["selection"]["grid"]["bind"], "scales");
    assert_eq!(spec["data"]["values"].as_array().unwrap().len(), 6);
}

#[test]
fn andrews_curves() {
    let chart = plotting::andrews_curves(&iris(), "species", 20, &PlotOpts::new()).unwrap();
    check_encodings(
        &chart,
        &[
            ("x", json!({"field": "t", "type": "quantitative"})),
            ("y", json!({"field": " ", "type": "quantitative"})),
            ("color", json!({"field": "species", "type": "nominal"})),
            ("detail", json!({"field": "sample", "type": "quantitative"})),
        ],
    );
    assert_eq!(chart.data().unwrap().len(), 6 * 20);
}

#[test]
fn andrews_curves_missing_class() {
    let err = plotting::andrews_curves(&iris(), "kind", 20, &PlotOpts::new()).unwrap_err();
    assert_eq!(err.to_string(), "No such column: 'kind'");
}

#[test]
fn parallel_coordinates() {
    let chart =
        plotting::parallel_coordinates(&iris(), "species", None, &PlotOpts::new().with_alpha(0.5))
            .unwrap();
    check_encodings(
        &chart,
        &[
            ("x", json!({"field": "variable", "type": "nominal"})),
            ("y", json!({"field": "value", "type": "quantitative"})),
            ("detail", json!({"field": "index", "type": "ordinal"})),
            ("opacity", json!({"value": 0.5})),
        ],
    );
    assert_eq!(chart.data().unwrap().len(), 18);
}

#[test]
fn lag_plots() {
    let s = Series::new(vec![1.0, 2.0, 4.0, 8.0]).with_name("s");
    let chart = plotting::lag_plot(&s, 1, &PlotOpts::new()).unwrap();
    assert_eq!(chart.data().unwrap().len(), 3);
    assert_eq!(chart.mark(), Some(&json!("circle")));

    let table = iris().select(&["sepal_length", "sepal_width"]).unwrap();
    let chart = plotting::lag_plot_frame(&table, 2, &PlotOpts::new()).unwrap();
    assert_eq!(chart.data().unwrap().len(), 8);
    check_encodings(
        &chart,
        &[
            ("x", json!({"field": "y(t)", "type": "quantitative"})),
            ("y", json!({"field": "y(t + 2)", "type": "quantitative"})),
            ("color", json!({"field": "variable", "type": "nominal"})),
        ],
    );
}
