#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for address standardization.
//!
//! This crate contains only data types and their defaults. It has no
//! regex tables, no I/O, and no parsing logic, so the table and server
//! crates can depend on it without pulling in the standardization engine.

use serde::{Deserialize, Serialize};

/// Default base for generated map search links.
pub const DEFAULT_MAPS_BASE_URL: &str = "https://www.google.com/maps/search/";

/// A free-form address decomposed into its postal parts.
///
/// Every field is an owned string; a part the parser could not find is
/// left empty rather than `None` so components can be joined directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressComponents {
    /// House number (e.g. "123", "221B").
    pub street_number: String,
    /// Street line: number, directionals, base name, suffix, and unit.
    pub street_name: String,
    /// Place name.
    pub city: String,
    /// State, either as parsed or as overridden by an explicit value.
    pub state: String,
    /// Five-digit (or ZIP+4) postal code.
    pub zip_code: String,
}

impl AddressComponents {
    /// Returns the components in output order: street number, street
    /// name, city, state, ZIP.
    #[must_use]
    pub fn ordered(&self) -> [&str; 5] {
        [
            &self.street_number,
            &self.street_name,
            &self.city,
            &self.state,
            &self.zip_code,
        ]
    }

    /// Returns `true` if no component carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered().iter().all(|part| part.is_empty())
    }
}

/// The raw cell values for one row, as seen by the row processor.
///
/// `None` means the cell was missing, null, or not a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowInput<'a> {
    /// Address cell.
    pub address: Option<&'a str>,
    /// Explicit state cell, if the table has a state column.
    pub state: Option<&'a str>,
    /// Explicit city cell, if the table has a city column.
    pub city: Option<&'a str>,
    /// Explicit ZIP cell, if the table has a ZIP column.
    pub zip: Option<&'a str>,
}

impl<'a> RowInput<'a> {
    /// Creates an input with only an address.
    #[must_use]
    pub const fn address(address: &'a str) -> Self {
        Self {
            address: Some(address),
            state: None,
            city: None,
            zip: None,
        }
    }
}

/// Outcome of standardizing one row.
///
/// When `updated` is `false` every other field is `None`: the address
/// cell was absent, so no link is produced and the row is not highlighted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowResult {
    /// Final standardized address text.
    pub standardized_address: Option<String>,
    /// Standardized explicit state value.
    pub standardized_state: Option<String>,
    /// Standardized explicit city value.
    pub standardized_city: Option<String>,
    /// Standardized explicit ZIP value.
    pub standardized_zip: Option<String>,
    /// Parsed components, `None` when the address could not be parsed.
    pub components: Option<AddressComponents>,
    /// Map search link for the standardized address.
    pub maps_url: Option<String>,
    /// Whether the row was processed.
    pub updated: bool,
}

impl RowResult {
    /// The result for a row whose address cell was null or non-string.
    #[must_use]
    pub fn not_updated() -> Self {
        Self::default()
    }
}

/// Tunables for the standardization pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardizeOptions {
    /// Prefix that percent-encoded addresses are appended to.
    #[serde(default = "default_maps_base_url")]
    pub maps_base_url: String,
    /// Whether to split addresses into structured components. When
    /// disabled every address takes the title-case-only path.
    #[serde(default = "default_true")]
    pub parse_components: bool,
}

fn default_maps_base_url() -> String {
    DEFAULT_MAPS_BASE_URL.to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for StandardizeOptions {
    fn default() -> Self {
        Self {
            maps_base_url: default_maps_base_url(),
            parse_components: default_true(),
        }
    }
}
