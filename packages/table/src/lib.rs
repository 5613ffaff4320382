#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory address tables.
//!
//! A [`Table`] is an ordered list of rows under a list of column names.
//! Tables are read from CSV ([`csv_file`]), one-address-per-line text
//! ([`text_file`]), or Excel workbooks ([`xlsx_file`]), enriched with
//! standardized columns ([`enrich`]), and written back out. Enrichment only ever appends columns; rows are never
//! added, dropped, or reordered and original cells are never touched.

pub mod columns;
pub mod csv_file;
pub mod enrich;
pub mod progress;
pub mod text_file;
pub mod xlsx_file;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use strum_macros::{AsRefStr, Display, EnumString};

pub use enrich::{EnrichSummary, enrich_table, enrich_table_with_progress};

/// Errors that can occur while reading, enriching, or writing a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// No column resolves to an address column.
    #[error("No column named \"Address\" or \"Addresses\" found (columns: {columns:?})")]
    MissingAddressColumn {
        /// The column names that were searched.
        columns: Vec<String>,
    },

    /// A column being appended does not have one value per row.
    #[error("Column '{name}' has {actual} values but the table has {expected} rows")]
    ColumnLength {
        /// Column name.
        name: String,
        /// Number of rows in the table.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// CSV parsing or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file format is recognized but not handled here.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A workbook is not a readable zip archive.
    #[error("Invalid workbook: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A workbook part is not well-formed XML.
    #[error("Invalid workbook XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A workbook is missing a part it needs.
    #[error("Invalid workbook: {0}")]
    Spreadsheet(String),

    /// The input has no header row.
    #[error("Input contains no header row")]
    EmptyInput,
}

/// A single cell.
///
/// Only [`CellValue::Text`] counts as a string for standardization; every
/// other variant is treated like a missing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    /// Empty or missing.
    #[default]
    Null,
    /// Text.
    Text(String),
    /// Integer scalar.
    Integer(i64),
    /// Floating-point scalar.
    Float(f64),
    /// Boolean flag.
    Boolean(bool),
}

impl CellValue {
    /// Returns the text if this cell holds a string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns `true` for [`CellValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Ordered rows under named columns.
///
/// Column names are stored as given and may repeat; lookups by name
/// return the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub const fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a table from rows, padding short rows with nulls and
    /// dropping cells beyond the last column.
    #[must_use]
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column named exactly `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in the first column named `column`.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Appends a row, normalized to the table's width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }

    /// Appends a column with one value per existing row.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnLength`] if `values` does not have
    /// exactly one entry per row.
    pub fn append_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<CellValue>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                name,
                expected: self.rows.len(),
                actual: values.len(),
            });
        }

        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        self.columns.push(name);
        Ok(())
    }

    /// Whether the row was standardized, read from the last
    /// `Address_Updated` column. Serializers use this to highlight rows.
    #[must_use]
    pub fn row_updated(&self, row: usize) -> bool {
        let Some(index) = self
            .columns
            .iter()
            .rposition(|c| c == enrich::ADDRESS_UPDATED)
        else {
            return false;
        };
        matches!(
            self.rows.get(row).and_then(|r| r.get(index)),
            Some(CellValue::Boolean(true))
        )
    }
}

/// File formats a table can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum TableFormat {
    /// Comma-separated values with a header row.
    #[strum(serialize = "csv")]
    Csv,
    /// One address per line.
    #[strum(serialize = "txt")]
    Text,
    /// Excel 2007+ workbooks.
    #[strum(serialize = "xlsx")]
    Xlsx,
    /// Legacy binary Excel workbooks. Recognized so callers can report
    /// them clearly, but not decoded.
    #[strum(serialize = "xls")]
    Xls,
}

impl TableFormat {
    /// Detects the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnsupportedFormat`] for a missing or unknown
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| TableError::UnsupportedFormat(path.display().to_string()))?;
        extension
            .parse()
            .map_err(|_| TableError::UnsupportedFormat(extension.to_string()))
    }

    /// Reads a table in this format from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if the input cannot be decoded or the format
    /// is [`TableFormat::Xls`].
    pub fn read(self, bytes: &[u8]) -> Result<Table, TableError> {
        match self {
            Self::Csv => csv_file::read_csv(bytes),
            Self::Text => text_file::read_lines(bytes),
            Self::Xlsx => xlsx_file::read_xlsx(bytes),
            Self::Xls => Err(TableError::UnsupportedFormat(self.to_string())),
        }
    }
}

/// Reads a table from `path`, choosing the format from its extension.
///
/// # Errors
///
/// Returns [`TableError`] if the format is unsupported, the file cannot
/// be opened, or its contents cannot be decoded.
pub fn read_table_file(path: &Path) -> Result<Table, TableError> {
    let format = TableFormat::from_path(path)?;
    let table = match format {
        TableFormat::Csv => csv_file::read_csv(BufReader::new(File::open(path)?))?,
        TableFormat::Text => text_file::read_lines(BufReader::new(File::open(path)?))?,
        TableFormat::Xlsx => xlsx_file::read_xlsx(&std::fs::read(path)?)?,
        TableFormat::Xls => {
            return Err(TableError::UnsupportedFormat(format.to_string()));
        }
    };
    log::info!(
        "Read {} rows x {} columns from {}",
        table.row_count(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Writes `table` to `path` in `format`.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be created or written, or the
/// format is [`TableFormat::Xls`].
pub fn write_table_file(table: &Table, path: &Path, format: TableFormat) -> Result<(), TableError> {
    match format {
        TableFormat::Csv => csv_file::write_csv(table, BufWriter::new(File::create(path)?))?,
        TableFormat::Text => text_file::write_lines(table, BufWriter::new(File::create(path)?))?,
        TableFormat::Xlsx => {
            xlsx_file::write_xlsx(table, BufWriter::new(File::create(path)?))?.flush()?;
        }
        TableFormat::Xls => {
            return Err(TableError::UnsupportedFormat(format.to_string()));
        }
    }
    log::info!("Wrote {} rows to {}", table.row_count(), path.display());
    Ok(())
}
