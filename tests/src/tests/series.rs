use vgplot::chart::{Bandwidth, KdeInd};
use vgplot::data::{Column, Index, Series, Source};

use super::*;

fn prices() -> Series {
    Series::new(vec![1.5, 2.5, 3.5]).with_name("price")
}

#[test]
fn line_ref() {
    let chart = prices().vgplot().line(&PlotOpts::new()).unwrap();
    assert_chart_eq_ref!(chart, "series_line");
}

#[test]
fn unnamed_series() {
    let chart = Series::new(vec![1i64, 5, 3])
        .vgplot()
        .area(&PlotOpts::new())
        .unwrap();
    check_encodings(
        &chart,
        &[
            ("x", json!({"field": "index", "type": "ordinal"})),
            ("y", json!({"field": "0", "type": "ordinal"})),
        ],
    );
}

#[test]
fn time_index() {
    let days = ["2017-01-02", "2017-01-03", "2017-01-04"]
        .iter()
        .map(|d| vgplot::time::parse_auto(d).map(|(dt, _)| dt))
        .collect::<Vec<_>>();
    let chart = prices()
        .with_index(Index::new(days).with_name("day"))
        .vgplot()
        .bar(&PlotOpts::new())
        .unwrap();
    check_encodings(
        &chart,
        &[("x", json!({"field": "day", "type": "temporal"}))],
    );
    let spec = chart.to_vegalite().unwrap();
    assert_eq!(spec["data"]["values"][2]["day"], "2017-01-04T00:00:00.000");
}

#[test]
fn density_with_bandwidth() {
    let s = Series::new(vec![0.0, 1.0, 1.5, 4.0]).with_name("v");
    let opts = PlotOpts::new()
        .with_bw_method(Bandwidth::Silverman)
        .with_ind(KdeInd::Values(vec![0.0, 1.0, 2.0]));
    let chart = s.vgplot().density(&opts).unwrap();
    check_encodings(
        &chart,
        &[
            ("x", json!({"field": " ", "type": "quantitative"})),
            ("y", json!({"field": "v", "type": "quantitative"})),
        ],
    );
    let data = chart.data().unwrap();
    assert_eq!(data.len(), 3);
    let density: Vec<f64> = data
        .column("v")
        .and_then(|c| c.f64())
        .unwrap()
        .f64_iter()
        .map(|v| v.unwrap())
        .collect();
    assert!(density.iter().all(|d| *d > 0.0));
}

#[test]
fn alpha_out_of_range() {
    assert!(matches!(
        prices().vgplot().line(&PlotOpts::new().with_alpha(1.5)),
        Err(Error::InvalidParam(_))
    ));
}
