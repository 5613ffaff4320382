//! CSV tables.
//!
//! Every non-empty cell is read as text; no numeric or boolean inference is
//! done, so a ZIP like `02134` keeps its leading zero.

use std::io::{Read, Write};

use crate::{CellValue, Table, TableError};

/// Reads a CSV table with a header row.
///
/// Header names are trimmed. Empty cells become [`CellValue::Null`]. Short
/// rows are padded and cells beyond the header width are dropped.
///
/// # Errors
///
/// Returns [`TableError::EmptyInput`] if there is no header row, or
/// [`TableError::Csv`] if the input is not valid CSV.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(TableError::EmptyInput);
    }

    let width = headers.len();
    let mut table = Table::new(headers);

    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            log::warn!(
                "Row {} has {} fields but the header has {width}; extra fields dropped",
                table.row_count() + 1,
                record.len()
            );
        }

        let row = record
            .iter()
            .take(width)
            .map(|value| {
                if value.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Text(value.to_owned())
                }
            })
            .collect();
        table.push_row(row);
    }

    log::debug!("Parsed {} records from CSV", table.row_count());
    Ok(table)
}

/// Writes `table` as CSV with a header row. Nulls are written as empty
/// fields.
///
/// # Errors
///
/// Returns [`TableError::Csv`] if writing fails.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;
    Ok(())
}
