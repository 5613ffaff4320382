//! Plain-text address lists, one address per line.

use std::io::{BufRead, Write};

use crate::columns::{ADDRESS_ALIASES, find_column_index};
use crate::enrich::STANDARDIZED_ADDRESS;
use crate::{CellValue, Table, TableError};

/// Column name given to addresses read from a text file.
pub const TEXT_ADDRESS_COLUMN: &str = "Address";

/// Reads one address per non-blank line into a single `Address` column.
///
/// # Errors
///
/// Returns [`TableError::Io`] if reading fails.
pub fn read_lines<R: BufRead>(reader: R) -> Result<Table, TableError> {
    let mut table = Table::new(vec![TEXT_ADDRESS_COLUMN.to_string()]);
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            table.push_row(vec![CellValue::from(line)]);
        }
    }
    Ok(table)
}

/// Writes one line per row: the standardized address if present,
/// otherwise the original address text. Rows with neither produce an
/// empty line so output lines stay aligned with input rows.
///
/// # Errors
///
/// Returns [`TableError::Io`] if writing fails.
pub fn write_lines<W: Write>(table: &Table, mut writer: W) -> Result<(), TableError> {
    let standardized = table
        .columns()
        .iter()
        .rposition(|c| c == STANDARDIZED_ADDRESS);
    let original = find_column_index(table.columns(), ADDRESS_ALIASES);

    for row in table.rows() {
        let text = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .and_then(CellValue::as_text)
        };
        let line = text(standardized).or_else(|| text(original)).unwrap_or("");
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines() {
        let table = read_lines("1 Main St\r\n\n   \n 2 Oak Ave \n".as_bytes()).unwrap();
        assert_eq!(table.columns(), [TEXT_ADDRESS_COLUMN]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, "Address"), Some(&CellValue::from("2 Oak Ave")));
    }

    #[test]
    fn prefers_standardized_address() {
        let table = Table::from_rows(
            vec!["Address".to_string(), STANDARDIZED_ADDRESS.to_string()],
            vec![
                vec!["1 main st".into(), "1 Main Street".into()],
                vec!["unknown".into(), CellValue::Null],
                vec![CellValue::Null, CellValue::Null],
            ],
        );
        let mut out = Vec::new();
        write_lines(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 Main Street\nunknown\n\n");
    }
}
