#![cfg(test)]

use serde_json::Value;
use vgplot::Chart;

mod harness;
mod tests;

/// Check the given channels of the encoding of a chart.
/// Channels absent from `expected` are not checked.
fn check_encodings(chart: &Chart, expected: &[(&str, Value)]) {
    for (channel, value) in expected {
        assert_eq!(
            chart.encoding(channel),
            Some(value),
            "unexpected encoding of channel '{}'",
            channel
        );
    }
}

macro_rules! assert_chart_eq_ref {
    ($chart:expr, $ref_name:expr) => {
        let spec = $chart.to_vegalite().unwrap();
        if let Err(err) = $crate::harness::check_spec_eq_ref(&spec, $ref_name) {
            panic!("{}", err);
        }
    };
}

pub(crate) use assert_chart_eq_ref;
