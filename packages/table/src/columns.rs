//! Source column resolution.
//!
//! Input files name their columns inconsistently, so each role is matched
//! case-insensitively against a small alias set. The first column (in file
//! order) whose lowercased name is in the set wins.

use addrstd_address_models::RowInput;

use crate::{CellValue, TableError};

/// Names accepted for the address column.
pub const ADDRESS_ALIASES: &[&str] = &["address", "addresses"];

/// Names accepted for the state column.
pub const STATE_ALIASES: &[&str] = &["state", "states"];

/// Names accepted for the city column.
pub const CITY_ALIASES: &[&str] = &["city", "cities"];

/// Names accepted for the ZIP column.
pub const ZIP_ALIASES: &[&str] = &[
    "zip",
    "zips",
    "zip_code",
    "zip_codes",
    "zipcode",
    "zipcodes",
];

/// Index of the first column whose lowercased name is in `aliases`.
#[must_use]
pub fn find_column_index(columns: &[String], aliases: &[&str]) -> Option<usize> {
    columns
        .iter()
        .position(|name| aliases.contains(&name.to_lowercase().as_str()))
}

/// Name of the first column whose lowercased name is in `aliases`.
#[must_use]
pub fn find_column<'a>(columns: &'a [String], aliases: &[&str]) -> Option<&'a str> {
    find_column_index(columns, aliases).map(|i| columns[i].as_str())
}

/// Column positions for each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    /// Address column. Always present.
    pub address: usize,
    /// State column, if any.
    pub state: Option<usize>,
    /// City column, if any.
    pub city: Option<usize>,
    /// ZIP column, if any.
    pub zip: Option<usize>,
}

impl ResolvedColumns {
    /// Resolves every role against `columns`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingAddressColumn`] if no address column
    /// is found. The other roles are optional.
    pub fn resolve(columns: &[String]) -> Result<Self, TableError> {
        let address = find_column_index(columns, ADDRESS_ALIASES).ok_or_else(|| {
            TableError::MissingAddressColumn {
                columns: columns.to_vec(),
            }
        })?;

        let resolved = Self {
            address,
            state: find_column_index(columns, STATE_ALIASES),
            city: find_column_index(columns, CITY_ALIASES),
            zip: find_column_index(columns, ZIP_ALIASES),
        };
        log::debug!("Resolved columns: {resolved:?}");
        Ok(resolved)
    }

    /// Borrows the string cells of `row` for each role. Non-text cells
    /// are treated as absent.
    #[must_use]
    pub fn row_input<'a>(&self, row: &'a [CellValue]) -> RowInput<'a> {
        let text = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .and_then(CellValue::as_text)
        };
        RowInput {
            address: text(Some(self.address)),
            state: text(self.state),
            city: text(self.city),
            zip: text(self.zip),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn matches_case_insensitively() {
        let columns = names(&["Id", "ADDRESSES", "Zip_Code"]);
        assert_eq!(find_column(&columns, ADDRESS_ALIASES), Some("ADDRESSES"));
        assert_eq!(find_column(&columns, ZIP_ALIASES), Some("Zip_Code"));
        assert_eq!(find_column(&columns, CITY_ALIASES), None);
    }

    #[test]
    fn first_match_in_file_order_wins() {
        let columns = names(&["States", "State"]);
        assert_eq!(find_column(&columns, STATE_ALIASES), Some("States"));
    }

    #[test]
    fn does_not_match_substrings() {
        let columns = names(&["Mailing Address", "Statement"]);
        assert_eq!(find_column(&columns, ADDRESS_ALIASES), None);
        assert_eq!(find_column(&columns, STATE_ALIASES), None);
    }

    #[test]
    fn missing_address_column_is_an_error() {
        let columns = names(&["Name", "City"]);
        let err = ResolvedColumns::resolve(&columns).unwrap_err();
        assert!(matches!(
            err,
            TableError::MissingAddressColumn { columns } if columns == names(&["Name", "City"])
        ));
    }

    #[test]
    fn resolves_optional_roles() {
        let columns = names(&["address", "Cities", "ZIPCODES"]);
        let resolved = ResolvedColumns::resolve(&columns).unwrap();
        assert_eq!(
            resolved,
            ResolvedColumns {
                address: 0,
                state: None,
                city: Some(1),
                zip: Some(2),
            }
        );
    }

    #[test]
    fn row_input_ignores_non_text_cells() {
        let columns = names(&["Address", "State", "Zip"]);
        let resolved = ResolvedColumns::resolve(&columns).unwrap();
        let row = vec![
            CellValue::from("1 Main St"),
            CellValue::Null,
            CellValue::Integer(62704),
        ];
        let input = resolved.row_input(&row);
        assert_eq!(input.address, Some("1 Main St"));
        assert_eq!(input.state, None);
        assert_eq!(input.zip, None);
    }
}
