//! Table enrichment.
//!
//! Runs [`process_row`] over every row and appends the derived columns in
//! a fixed order. The address column is resolved before any row is
//! touched, so a table without one is rejected with no partial output.

use addrstd_address::process_row;
use addrstd_address_models::{RowResult, StandardizeOptions};

use crate::columns::ResolvedColumns;
use crate::progress::{NullProgress, ProgressCallback};
use crate::{CellValue, Table, TableError};

/// Cleaned, expanded, title-cased address.
pub const STANDARDIZED_ADDRESS: &str = "Standardized_Address";
/// Full state name from the input's state column.
pub const STANDARDIZED_STATE: &str = "Standardized_State";
/// Cleaned, capitalized city from the input's city column.
pub const STANDARDIZED_CITY: &str = "Standardized_City";
/// Five-digit ZIP from the input's ZIP column.
pub const STANDARDIZED_ZIP: &str = "Standardized_ZIP";
/// Parsed house number.
pub const STREET_NUMBER: &str = "Street_Number";
/// Parsed street line.
pub const STREET_NAME: &str = "Street_Name";
/// Parsed or overridden city.
pub const CITY: &str = "City";
/// Parsed or overridden state.
pub const STATE: &str = "State";
/// Parsed or overridden ZIP.
pub const ZIP_CODE: &str = "ZIP_Code";
/// Map search link for the standardized address.
pub const MAPS_URL: &str = "Maps_URL";
/// `true` for rows that had a string address.
pub const ADDRESS_UPDATED: &str = "Address_Updated";

/// Derived columns, in the order they are appended.
pub const DERIVED_COLUMNS: [&str; 11] = [
    STANDARDIZED_ADDRESS,
    STANDARDIZED_STATE,
    STANDARDIZED_CITY,
    STANDARDIZED_ZIP,
    STREET_NUMBER,
    STREET_NAME,
    CITY,
    STATE,
    ZIP_CODE,
    MAPS_URL,
    ADDRESS_UPDATED,
];

/// Counts reported after enriching a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    /// Rows processed.
    pub rows: usize,
    /// Rows with a string address.
    pub updated: usize,
    /// Updated rows that parsed into components.
    pub structured: usize,
}

fn text_cell(value: &str) -> CellValue {
    if value.is_empty() {
        CellValue::Null
    } else {
        CellValue::from(value)
    }
}

/// Cells for one row, in [`DERIVED_COLUMNS`] order. Empty components are
/// written as nulls.
#[must_use]
pub fn derived_cells(result: RowResult) -> [CellValue; 11] {
    let components = result.components.unwrap_or_default();
    [
        result.standardized_address.into(),
        result.standardized_state.into(),
        result.standardized_city.into(),
        result.standardized_zip.into(),
        text_cell(&components.street_number),
        text_cell(&components.street_name),
        text_cell(&components.city),
        text_cell(&components.state),
        text_cell(&components.zip_code),
        result.maps_url.into(),
        result.updated.into(),
    ]
}

/// Enriches `table` in place without progress reporting.
///
/// # Errors
///
/// Returns [`TableError::MissingAddressColumn`] if no address column can
/// be resolved. The table is left unchanged in that case.
pub fn enrich_table(
    table: &mut Table,
    options: &StandardizeOptions,
) -> Result<EnrichSummary, TableError> {
    enrich_table_with_progress(table, options, &NullProgress)
}

/// Enriches `table` in place, reporting one tick per row to `progress`.
///
/// # Errors
///
/// Returns [`TableError::MissingAddressColumn`] if no address column can
/// be resolved. The table is left unchanged in that case.
pub fn enrich_table_with_progress(
    table: &mut Table,
    options: &StandardizeOptions,
    progress: &dyn ProgressCallback,
) -> Result<EnrichSummary, TableError> {
    let resolved = ResolvedColumns::resolve(table.columns())?;
    log::info!(
        "Standardizing {} rows using address column '{}'",
        table.row_count(),
        table.columns()[resolved.address]
    );

    progress.set_total(table.row_count() as u64);
    progress.set_message("Standardizing addresses".to_string());

    let mut summary = EnrichSummary {
        rows: table.row_count(),
        ..EnrichSummary::default()
    };
    let mut columns: Vec<Vec<CellValue>> = DERIVED_COLUMNS
        .iter()
        .map(|_| Vec::with_capacity(table.row_count()))
        .collect();

    for row in table.rows() {
        let result = process_row(&resolved.row_input(row), options);
        if result.updated {
            summary.updated += 1;
        }
        if result.components.is_some() {
            summary.structured += 1;
        }
        for (column, cell) in columns.iter_mut().zip(derived_cells(result)) {
            column.push(cell);
        }
        progress.inc(1);
    }

    for (name, values) in DERIVED_COLUMNS.into_iter().zip(columns) {
        table.append_column(name, values)?;
    }

    log::info!(
        "Standardized {} of {} rows ({} parsed into components)",
        summary.updated,
        summary.rows,
        summary.structured
    );
    progress.finish(format!(
        "{} of {} rows standardized",
        summary.updated, summary.rows
    ));

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        Table::from_rows(columns.iter().map(ToString::to_string).collect(), rows)
    }

    fn derived<'a>(table: &'a Table, row: usize, column: &str) -> &'a CellValue {
        let index = table
            .columns()
            .iter()
            .rposition(|c| c == column)
            .unwrap();
        &table.rows()[row][index]
    }

    #[test]
    fn enriches_end_to_end() {
        let mut table = table(
            &["Address", "State"],
            vec![vec!["123 nw cor. st.".into(), "ca".into()]],
        );
        let summary = enrich_table(&mut table, &StandardizeOptions::default()).unwrap();

        assert_eq!(
            summary,
            EnrichSummary {
                rows: 1,
                updated: 1,
                structured: 1,
            }
        );

        let address = derived(&table, 0, STANDARDIZED_ADDRESS).as_text().unwrap();
        let northwest = address.find("Northwest").unwrap();
        assert!(northwest < address.find("Corner").unwrap());
        assert!(northwest < address.find("Street").unwrap());

        assert_eq!(
            derived(&table, 0, STANDARDIZED_STATE),
            &CellValue::from("California")
        );
        let url = derived(&table, 0, MAPS_URL).as_text().unwrap();
        assert!(url.starts_with("https://www.google.com/maps/search/"));
        assert!(url.contains("%2C%20California"));
        assert_eq!(derived(&table, 0, ADDRESS_UPDATED), &CellValue::Boolean(true));
        assert!(table.row_updated(0));
    }

    #[test]
    fn null_address_row_is_not_updated() {
        let mut table = table(
            &["Addresses", "Notes"],
            vec![
                vec![CellValue::Null, "keep".into()],
                vec![CellValue::Integer(12), "me".into()],
            ],
        );
        let summary = enrich_table(&mut table, &StandardizeOptions::default()).unwrap();

        assert_eq!(summary.updated, 0);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns().len(), 2 + DERIVED_COLUMNS.len());
        for row in 0..2 {
            for name in &DERIVED_COLUMNS[..DERIVED_COLUMNS.len() - 1] {
                assert!(derived(&table, row, name).is_null(), "{name}");
            }
            assert_eq!(
                derived(&table, row, ADDRESS_UPDATED),
                &CellValue::Boolean(false)
            );
            assert!(!table.row_updated(row));
        }
    }

    #[test]
    fn preserves_rows_and_original_cells() {
        let rows = vec![
            vec!["1 main st".into(), "il".into()],
            vec![CellValue::Null, CellValue::Null],
            vec!["somewhere".into(), "ZZ".into()],
        ];
        let mut table = table(&["address", "state"], rows.clone());
        enrich_table(&mut table, &StandardizeOptions::default()).unwrap();

        assert_eq!(table.row_count(), rows.len());
        for (enriched, original) in table.rows().iter().zip(&rows) {
            assert_eq!(&enriched[..2], original.as_slice());
        }
        assert_eq!(derived(&table, 2, STANDARDIZED_STATE), &CellValue::from("ZZ"));
    }

    #[test]
    fn appends_derived_columns_in_order() {
        let mut table = table(&["Address", "City"], vec![]);
        enrich_table(&mut table, &StandardizeOptions::default()).unwrap();
        assert_eq!(&table.columns()[2..], DERIVED_COLUMNS.as_slice());
        assert_eq!(table.columns().iter().filter(|c| *c == "City").count(), 2);
    }

    #[test]
    fn missing_address_column_leaves_table_untouched() {
        let mut table = table(&["Street", "City"], vec![vec!["1 Main".into()]]);
        let before = table.clone();
        let err = enrich_table(&mut table, &StandardizeOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::MissingAddressColumn { .. }));
        assert_eq!(table, before);
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressCallback for RecordingProgress {
        fn set_total(&self, total: u64) {
            self.events.lock().unwrap().push(format!("total {total}"));
        }
        fn inc(&self, delta: u64) {
            self.events.lock().unwrap().push(format!("inc {delta}"));
        }
        fn set_message(&self, _msg: String) {}
        fn finish(&self, msg: String) {
            self.events.lock().unwrap().push(msg);
        }
    }

    #[test]
    fn reports_progress_per_row() {
        let mut table = table(
            &["Address"],
            vec![vec!["1 Elm Ln".into()], vec![CellValue::Null]],
        );
        let progress = RecordingProgress::default();
        enrich_table_with_progress(&mut table, &StandardizeOptions::default(), &progress)
            .unwrap();
        assert_eq!(
            *progress.events.lock().unwrap(),
            vec![
                "total 2".to_string(),
                "inc 1".to_string(),
                "inc 1".to_string(),
                "1 of 2 rows standardized".to_string(),
            ]
        );
    }
}
