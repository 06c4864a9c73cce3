use super::{TableSource, VecColumn};
use crate::time::{self, DateTime};

/// Error raised while parsing CSV data. Lines are numbered from 1, header included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvParseError {
    /// A line has more fields than the header
    ColCount {
        /// line number
        line: usize,
    },
    /// A field cannot be parsed as the type of its column
    ColType {
        /// line number
        line: usize,
        /// column title
        col: String,
    },
    /// A column spec refers to a title absent from the header
    UnknownCol {
        /// column title
        title: String,
    },
    /// A column spec refers to an index past the header
    UnknownColIdx {
        /// column index
        idx: usize,
    },
}

impl std::fmt::Display for CsvParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvParseError::ColCount { line } => {
                write!(f, "Inconsistent column count at line {line}")
            }
            CsvParseError::ColType { line, col } => {
                write!(f, "Inconsistent type in column '{col}' at line {line}")
            }
            CsvParseError::UnknownCol { title } => {
                write!(f, "Unknown column title {title}")
            }
            CsvParseError::UnknownColIdx { idx } => {
                write!(f, "Unknown column index {idx}")
            }
        }
    }
}

impl std::error::Error for CsvParseError {}

/// CSV parsing spec for a specific column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvColSpec {
    /// Type guessed from the first non-empty field
    Auto,
    /// Floating point numbers
    F64,
    /// Integers
    I64,
    /// `true` or `false`
    Bool,
    /// Strings
    Str,
    /// Date-times in one of the formats of [`time::AUTO_FORMATS`], or plain dates
    TimeAuto,
    /// Date-times in a custom `chrono` format
    TimeCustom {
        /// the format
        fmt: String,
    },
}

#[derive(Debug, Clone)]
enum ColId {
    Tit(String),
    Idx(usize),
}

#[derive(Debug, Clone)]
enum CsvColumn {
    F64(Vec<f64>),
    I64(Vec<Option<i64>>),
    Bool(Vec<Option<bool>>),
    Str(Vec<Option<String>>),
    // data and parse format
    Time(Vec<Option<DateTime>>, Option<String>),
}

impl CsvColumn {
    fn with_nulls(spec: CsvColSpec, count: usize) -> Option<Self> {
        let col = match spec {
            CsvColSpec::Auto => return None,
            CsvColSpec::F64 => CsvColumn::F64(vec![f64::NAN; count]),
            CsvColSpec::I64 => CsvColumn::I64(vec![None; count]),
            CsvColSpec::Bool => CsvColumn::Bool(vec![None; count]),
            CsvColSpec::Str => CsvColumn::Str(vec![None; count]),
            CsvColSpec::TimeAuto => CsvColumn::Time(vec![None; count], None),
            CsvColSpec::TimeCustom { fmt } => CsvColumn::Time(vec![None; count], Some(fmt)),
        };
        Some(col)
    }

    fn push_null(&mut self) {
        match self {
            CsvColumn::F64(vec) => vec.push(f64::NAN),
            CsvColumn::I64(vec) => vec.push(None),
            CsvColumn::Bool(vec) => vec.push(None),
            CsvColumn::Str(vec) => vec.push(None),
            CsvColumn::Time(vec, _) => vec.push(None),
        }
    }

    /// Push a non-empty field, returns false if it does not parse
    fn push(&mut self, data: &str) -> bool {
        match self {
            CsvColumn::F64(vec) => data.parse::<f64>().map(|d| vec.push(d)).is_ok(),
            CsvColumn::I64(vec) => data.parse::<i64>().map(|d| vec.push(Some(d))).is_ok(),
            CsvColumn::Bool(vec) => parse_bool(data).map(|d| vec.push(Some(d))).is_some(),
            CsvColumn::Str(vec) => {
                vec.push(Some(data.to_string()));
                true
            }
            CsvColumn::Time(vec, fmt) => {
                let dt = match fmt {
                    Some(fmt) => time::parse_fmt(data, fmt),
                    None => time::parse_auto(data).map(|(dt, found)| {
                        *fmt = Some(found.to_string());
                        dt
                    }),
                };
                dt.map(|dt| vec.push(Some(dt))).is_some()
            }
        }
    }

    /// Integers widen to floats when a float shows up later in the column
    fn widen_to_f64(&mut self) {
        if let CsvColumn::I64(vec) = self {
            let vec = vec
                .iter()
                .map(|v| v.map_or(f64::NAN, |v| v as f64))
                .collect();
            *self = CsvColumn::F64(vec);
        }
    }

    fn into_vec_column(self) -> VecColumn {
        match self {
            CsvColumn::F64(vec) => VecColumn::F64(vec),
            CsvColumn::I64(vec) => VecColumn::I64(vec),
            CsvColumn::Bool(vec) => VecColumn::Bool(vec),
            CsvColumn::Str(vec) => VecColumn::Str(vec),
            CsvColumn::Time(vec, _) => VecColumn::Time(vec),
        }
    }
}

fn parse_bool(data: &str) -> Option<bool> {
    match data {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// A simple CSV parser building a [`TableSource`].
///
/// Fields are split on the separator and trimmed, quoting is not supported.
/// Empty fields are nulls. Columns without any value are string columns of nulls.
#[derive(Debug, Clone)]
pub struct CsvParser {
    sep: char,
    col_specs: Vec<(ColId, CsvColSpec)>,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvParser {
    /// Parser with `,` separator and automatic column types
    pub fn new() -> Self {
        CsvParser {
            sep: ',',
            col_specs: Vec::new(),
        }
    }

    /// Set the field separator
    pub fn with_sep(mut self, sep: char) -> Self {
        self.sep = sep;
        self
    }

    /// Set the type of the column with the given title
    pub fn with_col_spec(mut self, title: &str, spec: CsvColSpec) -> Self {
        self.col_specs.push((ColId::Tit(title.to_string()), spec));
        self
    }

    /// Set the type of the column at the given position
    pub fn with_col_spec_idx(mut self, idx: usize, spec: CsvColSpec) -> Self {
        self.col_specs.push((ColId::Idx(idx), spec));
        self
    }

    /// Parse the data, first line being the header
    pub fn parse(self, data: &str) -> Result<TableSource, CsvParseError> {
        let sep = self.sep;

        let mut lines = data.lines();
        let Some(head_line) = lines.next() else {
            return Ok(TableSource::new());
        };
        let header: Vec<&str> = head_line.split(sep).map(|s| s.trim()).collect();

        let mut specs = vec![CsvColSpec::Auto; header.len()];
        for (id, spec) in self.col_specs {
            let idx = match id {
                ColId::Tit(title) => header
                    .iter()
                    .position(|h| *h == title)
                    .ok_or(CsvParseError::UnknownCol { title })?,
                ColId::Idx(idx) if idx >= header.len() => {
                    return Err(CsvParseError::UnknownColIdx { idx });
                }
                ColId::Idx(idx) => idx,
            };
            specs[idx] = spec;
        }

        // Auto columns have their type determined at first non-null value
        let mut columns: Vec<Option<CsvColumn>> = specs
            .into_iter()
            .map(|spec| CsvColumn::with_nulls(spec, 0))
            .collect();

        let mut row_count = 0;
        for (lidx, line) in lines.enumerate() {
            let line_num = lidx + 2;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(sep).map(|s| s.trim()).collect();
            if fields.len() > columns.len() {
                return Err(CsvParseError::ColCount { line: line_num });
            }
            for (cidx, col) in columns.iter_mut().enumerate() {
                let data = fields.get(cidx).copied().unwrap_or_default();
                if data.is_empty() {
                    if let Some(col) = col {
                        col.push_null();
                    }
                    continue;
                }
                let col = col.get_or_insert_with(|| guess_column_type(data, row_count));
                if !col.push(data) {
                    // an integer column seeing its first float
                    col.widen_to_f64();
                    if !col.push(data) {
                        return Err(CsvParseError::ColType {
                            line: line_num,
                            col: header[cidx].to_string(),
                        });
                    }
                }
            }
            row_count += 1;
        }

        let mut src = TableSource::new();
        for (ci, csv_col) in columns.into_iter().enumerate() {
            let col = match csv_col {
                Some(col) => col.into_vec_column(),
                None => VecColumn::Str(vec![None; row_count]),
            };
            src.add_column(header[ci], col);
        }
        Ok(src)
    }
}

/// An empty column of the type of `data`, preceded by `num_nulls` nulls
fn guess_column_type(data: &str, num_nulls: usize) -> CsvColumn {
    let spec = if time::parse_auto(data).is_some() {
        CsvColSpec::TimeAuto
    } else if data.parse::<i64>().is_ok() {
        CsvColSpec::I64
    } else if data.parse::<f64>().is_ok() {
        CsvColSpec::F64
    } else if parse_bool(data).is_some() {
        CsvColSpec::Bool
    } else {
        CsvColSpec::Str
    };
    CsvColumn::with_nulls(spec, num_nulls).unwrap_or(CsvColumn::Str(vec![None; num_nulls]))
}
