use serde_json::json;
use vgplot::chart::{Error, Kind, PlotOpts, VgPlot};
use vgplot::data::TableSource;

use crate::*;

fn two_columns() -> TableSource {
    TableSource::new()
        .with_column("a", vec![1.0, 2.0, 3.0])
        .with_column("b", vec![3.0, 2.0, 1.0])
}

fn xy() -> TableSource {
    TableSource::new()
        .with_column("x", vec![1.0, 2.0, 3.0])
        .with_column("y", vec![2.0, 4.0, 8.0])
        .with_column("c", vec!["a", "b", "a"])
}

mod frame;
mod plotting;
mod series;

#[test]
fn every_kind_by_name() {
    let table = xy();
    let opts = PlotOpts::new().with_x("x").with_y("y");
    for kind in Kind::ALL {
        let parsed: Kind = kind.name().parse().unwrap();
        assert_eq!(parsed, kind);
        let chart = table.vgplot().plot(parsed, &opts).unwrap();
        assert!(chart.mark().is_some(), "no mark for {}", kind);
    }
}

#[test]
fn unknown_kind() {
    assert!(matches!("pie".parse::<Kind>(), Err(Error::UnsupportedKind(_))));
}

#[test]
fn max_rows() {
    let long = TableSource::new().with_column("a", (0..20).map(f64::from).collect::<Vec<_>>());
    let chart = long
        .vgplot()
        .line(&PlotOpts::new())
        .unwrap()
        .with_max_rows(10);
    assert_eq!(
        chart.to_vegalite().unwrap_err(),
        Error::MaxRowsExceeded { rows: 20, max: 10 }
    );
    assert!(chart.spec_no_data().get("data").is_none());
}

#[test]
fn layers() {
    let table = xy();
    let points = table
        .vgplot()
        .scatter(&PlotOpts::new().with_x("x").with_y("y"))
        .unwrap();
    let line = table
        .vgplot()
        .line(&PlotOpts::new().with_x("x").with_y("y"))
        .unwrap();

    let mut chart = vgplot::Chart::empty();
    chart.add_layer(&points).unwrap().add_layer(&line).unwrap();

    let spec = chart.to_vegalite().unwrap();
    let layers = spec["layer"].as_array().unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0]["mark"], "circle");
    assert_eq!(layers[1]["mark"], "line");
    assert_eq!(layers[1]["data"]["values"].as_array().unwrap().len(), 3);
}

mod csv {
    use vgplot::data::CsvParser;

    use super::*;

    const PRICES: &str = "\
date,open,close,sector
2017-01-02,10.5,11.0,tech
2017-01-03,11.0,10.0,tech
2017-01-04,10.0,12.5,energy
";

    #[test]
    fn csv_table_line() {
        let table = CsvParser::new().parse(PRICES).unwrap();
        assert_eq!(table.len(), 3);
        let chart = table
            .vgplot()
            .line(&PlotOpts::new().with_x("date").with_y("close"))
            .unwrap();
        check_encodings(
            &chart,
            &[
                ("x", json!({"field": "date", "type": "temporal"})),
                ("y", json!({"field": "value", "type": "quantitative"})),
                ("color", json!({"field": "variable", "type": "nominal"})),
            ],
        );
        let spec = chart.to_vegalite().unwrap();
        assert_eq!(spec["data"]["values"][0]["date"], "2017-01-02T00:00:00.000");
    }
}
