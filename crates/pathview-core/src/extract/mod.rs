//! Extraction of time-indexed series from session tables.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{PathviewError, Result};
use crate::series::{IndicatorSeries, VectorSeries};
use crate::session::load_sessions;
use crate::table::SessionTable;

/// Recognized time column labels, in priority order
pub const TIME_COLUMNS: [&str; 3] = ["Time", "time", "t"];
/// Categorical navigation modality column
pub const MODALITY_COLUMN: &str = "nav";
pub const POSITION_COLUMNS: [&str; 3] = ["posx", "posy", "posz"];
pub const DIRECTION_COLUMNS: [&str; 3] = ["dirx", "diry", "dirz"];
pub const FORCE_COLUMNS: [&str; 3] = ["fx", "fy", "fz"];

/// Navigation modality recorded in the `nav` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    #[serde(rename = "VR")]
    Vr,
    #[serde(rename = "AR")]
    Ar,
}

impl Modality {
    pub fn as_label(self) -> &'static str {
        match self {
            Modality::Vr => "VR",
            Modality::Ar => "AR",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Resolve which time column a table uses.
pub fn time_column(table: &SessionTable) -> Result<&'static str> {
    TIME_COLUMNS
        .into_iter()
        .find(|c| table.has_column(c))
        .ok_or_else(|| PathviewError::MissingTimeColumn {
            table: table.name().to_string(),
            available: table.columns().to_vec(),
        })
}

fn missing_column(table: &SessionTable, column: &str) -> PathviewError {
    PathviewError::MissingColumn {
        table: table.name().to_string(),
        column: column.to_string(),
        available: table.columns().to_vec(),
    }
}

/// Parse one column as numbers. Rows are reported 1-based.
pub fn numeric_column(table: &SessionTable, column: &str) -> Result<Vec<f64>> {
    let cells = table
        .column(column)
        .ok_or_else(|| missing_column(table, column))?;

    cells
        .enumerate()
        .map(|(row, raw)| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| PathviewError::InvalidNumber {
                    table: table.name().to_string(),
                    column: column.to_string(),
                    row: row + 1,
                    value: raw.to_string(),
                })
        })
        .collect()
}

/// Time values of a table; they must not decrease from one row to the next.
pub fn time_values(table: &SessionTable) -> Result<Vec<f64>> {
    let column = time_column(table)?;
    let time = numeric_column(table, column)?;

    if let Some(row) = time.windows(2).position(|w| w[1] < w[0]) {
        return Err(PathviewError::NonMonotonicTime {
            table: table.name().to_string(),
            row: row + 2,
        });
    }
    Ok(time)
}

/// Indicator series flagging rows whose modality equals `modality`.
pub fn modality_indicator(table: &SessionTable, modality: Modality) -> Result<IndicatorSeries> {
    modality_indicator_label(table, modality.as_label())
}

/// Indicator series flagging rows whose `nav` cell equals `label`.
///
/// Matching is not exact string equality: cells are trimmed first, so
/// `" VR"` and `"VR "` both count as `VR`. The comparison is still
/// case-sensitive. Any other value, including an empty cell, yields a 0 flag.
pub fn modality_indicator_label(table: &SessionTable, label: &str) -> Result<IndicatorSeries> {
    let time = time_values(table)?;
    let flags: Vec<bool> = table
        .column(MODALITY_COLUMN)
        .ok_or_else(|| missing_column(table, MODALITY_COLUMN))?
        .map(|cell| cell.trim() == label)
        .collect();

    Ok(IndicatorSeries::new(&time, &flags))
}

/// `modality_indicator` over a sequence of sessions, preserving order.
pub fn modality_indicators<'a, I>(tables: I, modality: Modality) -> Result<Vec<IndicatorSeries>>
where
    I: IntoIterator<Item = &'a SessionTable>,
{
    tables
        .into_iter()
        .map(|table| modality_indicator(table, modality))
        .collect()
}

/// Time plus the named columns, in the given order.
pub fn vector_series<S: AsRef<str>>(table: &SessionTable, columns: &[S]) -> Result<VectorSeries> {
    let time = time_values(table)?;
    let components = columns
        .iter()
        .map(|c| numeric_column(table, c.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    Ok(VectorSeries::from_columns(&time, &components))
}

/// `vector_series` over a sequence of sessions, preserving order.
pub fn vector_series_batch<'a, I, S>(tables: I, columns: &[S]) -> Result<Vec<VectorSeries>>
where
    I: IntoIterator<Item = &'a SessionTable>,
    S: AsRef<str>,
{
    tables
        .into_iter()
        .map(|table| vector_series(table, columns))
        .collect()
}

/// Named per-session variable that can be pulled out of a session directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionVariable {
    Navigation,
    Position,
    Direction,
    Force,
}

impl SessionVariable {
    /// Fixed column triple, or `None` for the navigation indicator.
    pub fn columns(self) -> Option<[&'static str; 3]> {
        match self {
            SessionVariable::Navigation => None,
            SessionVariable::Position => Some(POSITION_COLUMNS),
            SessionVariable::Direction => Some(DIRECTION_COLUMNS),
            SessionVariable::Force => Some(FORCE_COLUMNS),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionVariable::Navigation => "nav",
            SessionVariable::Position => "pos",
            SessionVariable::Direction => "dir",
            SessionVariable::Force => "f",
        }
    }
}

impl FromStr for SessionVariable {
    type Err = PathviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nav" => Ok(SessionVariable::Navigation),
            "pos" => Ok(SessionVariable::Position),
            "dir" => Ok(SessionVariable::Direction),
            "f" => Ok(SessionVariable::Force),
            other => Err(PathviewError::UnrecognizedVariable(other.to_string())),
        }
    }
}

impl fmt::Display for SessionVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session series produced for one `SessionVariable`
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSeries {
    Indicator(Vec<IndicatorSeries>),
    Vector(Vec<VectorSeries>),
}

impl SessionSeries {
    pub fn len(&self) -> usize {
        match self {
            SessionSeries::Indicator(series) => series.len(),
            SessionSeries::Vector(series) => series.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vectors(self) -> Option<Vec<VectorSeries>> {
        match self {
            SessionSeries::Vector(series) => Some(series),
            SessionSeries::Indicator(_) => None,
        }
    }

    pub fn into_indicators(self) -> Option<Vec<IndicatorSeries>> {
        match self {
            SessionSeries::Indicator(series) => Some(series),
            SessionSeries::Vector(_) => None,
        }
    }
}

/// Extract `variable` from a list of session tables.
///
/// Navigation yields the `VR` indicator.
pub fn extract<'a, I>(tables: I, variable: SessionVariable) -> Result<SessionSeries>
where
    I: IntoIterator<Item = &'a SessionTable>,
{
    match variable.columns() {
        None => modality_indicators(tables, Modality::Vr).map(SessionSeries::Indicator),
        Some(columns) => vector_series_batch(tables, &columns).map(SessionSeries::Vector),
    }
}

/// Load a session directory and extract `variable` from every session.
///
/// Returns identifiers, base names and one series per session, index-aligned.
pub fn extract_from_dir<P: AsRef<Path>>(
    dir: P,
    variable: SessionVariable,
) -> Result<(Vec<usize>, Vec<String>, SessionSeries)> {
    let collection = load_sessions(dir)?;
    let series = extract(collection.tables(), variable)?;
    Ok((collection.ids(), collection.filenames(), series))
}
