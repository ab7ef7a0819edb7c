//! In-memory delimited tables with labelled columns.

use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;

use crate::errors::{PathviewError, Result};

/// A row-major table of raw cell text, as read from one delimited file.
///
/// Cells are kept as text; numeric interpretation happens at extraction time
/// so that errors can name the offending column and row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SessionTable {
    /// Builds a table, padding short rows with empty cells.
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Parse a comma-separated file with a header row.
    ///
    /// Column labels have leading whitespace stripped. No column is treated as
    /// an index: a trailing empty field (trailing delimiter) is dropped, any
    /// other surplus field is a format error.
    pub fn read_csv<P: AsRef<Path>>(path: P, name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let name = name.into();
        let file = File::open(path).map_err(|e| PathviewError::TableRead {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|source| PathviewError::TableRead {
                path: path.to_path_buf(),
                source,
            })?
            .iter()
            .map(|label| label.trim_start().to_string())
            .collect();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|source| PathviewError::TableRead {
                path: path.to_path_buf(),
                source,
            })?;
            let line = index + 2; // header + 1-based

            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            while row.len() > columns.len() {
                if !row.last().is_some_and(|extra| extra.trim().is_empty()) {
                    return Err(PathviewError::TableFormat {
                        file: name,
                        line,
                        message: format!(
                            "Expected {} fields, found {}",
                            columns.len(),
                            record.len()
                        ),
                    });
                }
                row.pop();
            }
            rows.push(row);
        }

        log::debug!("{}: columns {:?}, {} rows", name, columns, rows.len());
        Ok(Self::new(name, columns, rows))
    }

    /// Stack tables vertically.
    ///
    /// The result carries the union of column labels in first-seen order; a
    /// cell whose column is absent from its source table is empty.
    pub fn concat<'a, I>(name: impl Into<String>, tables: I) -> Self
    where
        I: IntoIterator<Item = &'a SessionTable>,
    {
        let tables: Vec<&SessionTable> = tables.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(tables.iter().map(|t| t.len()).sum());
        for table in &tables {
            let mapping: Vec<Option<usize>> =
                columns.iter().map(|c| table.column_index(c)).collect();
            for row in &table.rows {
                rows.push(
                    mapping
                        .iter()
                        .map(|source| source.map(|i| row[i].clone()).unwrap_or_default())
                        .collect(),
                );
            }
        }

        Self::new(name, columns, rows)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Cells of one column in row order.
    pub fn column(&self, column: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| row[index].as_str()))
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| r[index].as_str())
    }

    /// Append a column holding the same value on every row.
    ///
    /// An existing column with the same label is overwritten.
    pub fn set_constant_column(&mut self, column: &str, value: &str) {
        match self.column_index(column) {
            Some(index) => {
                for row in &mut self.rows {
                    row[index] = value.to_string();
                }
            }
            None => {
                self.columns.push(column.to_string());
                for row in &mut self.rows {
                    row.push(value.to_string());
                }
            }
        }
    }
}
