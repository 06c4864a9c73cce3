//! Encoding type inference.
//!
//! Every field placed on a Vega-Lite channel carries an encoding type.
//! [`infer_type`] derives it from the kind of the column values.
use std::fmt;

use crate::data::{Column, ValueKind};

/// Vega-Lite encoding type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingType {
    /// Continuous numbers
    Quantitative,
    /// Ordered discrete values
    Ordinal,
    /// Unordered categories
    Nominal,
    /// Dates and times
    Temporal,
}

impl EncodingType {
    /// The name used in Vega-Lite specifications
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingType::Quantitative => "quantitative",
            EncodingType::Ordinal => "ordinal",
            EncodingType::Nominal => "nominal",
            EncodingType::Temporal => "temporal",
        }
    }

    /// Map a value kind to its encoding type.
    ///
    /// Integer kinds are ordinal when `ordinal_threshold` is non-zero and the
    /// number of distinct values does not exceed it. `distinct_count` is only
    /// called for integer kinds.
    pub fn from_kind(
        kind: &ValueKind,
        ordinal_threshold: usize,
        distinct_count: impl FnOnce() -> usize,
    ) -> Self {
        match kind {
            ValueKind::Integer | ValueKind::MixedInteger => {
                if ordinal_threshold > 0 && distinct_count() <= ordinal_threshold {
                    EncodingType::Ordinal
                } else {
                    EncodingType::Quantitative
                }
            }
            ValueKind::Floating | ValueKind::MixedIntegerFloat | ValueKind::Complex => {
                EncodingType::Quantitative
            }
            ValueKind::String
            | ValueKind::Bytes
            | ValueKind::Categorical
            | ValueKind::Boolean
            | ValueKind::Mixed => EncodingType::Nominal,
            ValueKind::Datetime
            | ValueKind::Date
            | ValueKind::Time
            | ValueKind::Duration
            | ValueKind::Period => EncodingType::Temporal,
            ValueKind::Empty => {
                log::warn!("Cannot infer vegalite type from an empty column. Defaulting to nominal.");
                EncodingType::Nominal
            }
            ValueKind::Other(name) => {
                log::warn!(
                    "I don't know how to infer vegalite type from '{}'. Defaulting to nominal.",
                    name
                );
                EncodingType::Nominal
            }
        }
    }
}

impl fmt::Display for EncodingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer the encoding type of a column.
///
/// Integer columns with at most `ordinal_threshold` distinct values are
/// ordinal, a threshold of 0 disables that rule. Unknown kinds and empty
/// columns are nominal, with a warning. This function never fails.
pub fn infer_type(col: &dyn Column, ordinal_threshold: usize) -> EncodingType {
    EncodingType::from_kind(&col.kind(), ordinal_threshold, || col.distinct_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{OwnedSample, Sample, VecColumn};
    use crate::defaults::ORDINAL_THRESHOLD;
    use crate::time::{DateTime, NaiveDate, TimeDelta};

    fn dates(n: u32) -> Vec<DateTime> {
        (1..=n)
            .map(|d| {
                NaiveDate::from_ymd_opt(2017, 1, d)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .unwrap()
            })
            .collect()
    }

    #[derive(Debug)]
    struct IntervalColumn(usize);

    impl Column for IntervalColumn {
        fn len(&self) -> usize {
            self.0
        }

        fn len_some(&self) -> usize {
            self.0
        }

        fn kind(&self) -> ValueKind {
            ValueKind::Other("interval".into())
        }

        fn sample_iter(&self) -> Box<dyn Iterator<Item = Sample<'_>> + '_> {
            Box::new(std::iter::repeat_n(Sample::Null, self.0))
        }
    }

    #[test]
    fn small_integer_range_is_ordinal() {
        assert_eq!(
            infer_type(&vec![0i64, 1, 2, 3], ORDINAL_THRESHOLD),
            EncodingType::Ordinal
        );
    }

    #[test]
    fn large_integer_range_is_quantitative() {
        let col: Vec<i64> = (0..40).collect();
        assert_eq!(infer_type(&col, ORDINAL_THRESHOLD), EncodingType::Quantitative);
    }

    #[test]
    fn threshold_counts_distinct_values() {
        let col = vec![1i64, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6];
        assert_eq!(infer_type(&col, 6), EncodingType::Ordinal);
        assert_eq!(infer_type(&col, 5), EncodingType::Quantitative);
    }

    #[test]
    fn zero_threshold_disables_ordinal() {
        assert_eq!(infer_type(&vec![0i64, 1, 2, 3], 0), EncodingType::Quantitative);
        assert_eq!(infer_type(&vec![7i64], 0), EncodingType::Quantitative);
    }

    #[test]
    fn floats_are_quantitative() {
        assert_eq!(
            infer_type(&vec![0.5, 1.5, 2.5], ORDINAL_THRESHOLD),
            EncodingType::Quantitative
        );
        let mixed = VecColumn::Mixed(vec![OwnedSample::Int(1), OwnedSample::Num(0.5)]);
        assert_eq!(infer_type(&mixed, ORDINAL_THRESHOLD), EncodingType::Quantitative);
    }

    #[test]
    fn nominal_kinds() {
        assert_eq!(infer_type(&vec!["a", "b"], 6), EncodingType::Nominal);
        assert_eq!(
            infer_type(&VecColumn::categorical(["a", "b", "a"]), 6),
            EncodingType::Nominal
        );
        assert_eq!(infer_type(&vec![true, false], 6), EncodingType::Nominal);
        let mixed = VecColumn::Mixed(vec![OwnedSample::Num(0.5), "a".into()]);
        assert_eq!(infer_type(&mixed, 6), EncodingType::Nominal);
    }

    #[test]
    fn mixed_integer_follows_integer_rule() {
        let mixed = VecColumn::Mixed(vec![OwnedSample::Int(1), "a".into()]);
        assert_eq!(infer_type(&mixed, 6), EncodingType::Ordinal);
        assert_eq!(infer_type(&mixed, 0), EncodingType::Quantitative);
    }

    #[test]
    fn temporal_kinds() {
        assert_eq!(infer_type(&dates(7), 6), EncodingType::Temporal);
        let deltas: Vec<TimeDelta> = (0..7).map(TimeDelta::days).collect();
        assert_eq!(infer_type(&deltas, 6), EncodingType::Temporal);
    }

    #[test]
    fn unknown_and_empty_are_nominal() {
        assert_eq!(infer_type(&IntervalColumn(3), 6), EncodingType::Nominal);
        assert_eq!(infer_type(&Vec::<f64>::new(), 6), EncodingType::Nominal);
        assert_eq!(infer_type(&vec![None::<i64>; 3], 6), EncodingType::Nominal);
    }

    #[test]
    fn display_names() {
        assert_eq!(EncodingType::Quantitative.to_string(), "quantitative");
        assert_eq!(EncodingType::Temporal.as_str(), "temporal");
    }
}
