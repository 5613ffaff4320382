//! Per-row standardization.
//!
//! A row either has a string address cell and is processed, or it does
//! not and is reported as not updated with every derived field empty.
//! Explicit state/city/ZIP cells always win over values inferred from
//! the address text.

use addrstd_address_models::{AddressComponents, RowInput, RowResult, StandardizeOptions};

use crate::abbreviations::expand_abbreviations;
use crate::clean::clean_text;
use crate::maps::maps_search_url;
use crate::parser::parse_address;
use crate::standardize::{standardize_city, standardize_state, standardize_zip};
use crate::title_case::apa_title_case;

/// Cleans and expands an address without parsing it.
#[must_use]
pub fn normalize_address_text(address: &str) -> String {
    expand_abbreviations(&clean_text(address))
}

fn override_with(slot: &mut String, explicit: Option<&str>) {
    if let Some(value) = explicit.filter(|v| !v.is_empty()) {
        *slot = value.to_string();
    }
}

/// Joins the title-cased non-empty components with `", "`.
#[must_use]
pub fn format_components(components: &AddressComponents) -> String {
    components
        .ordered()
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| apa_title_case(part))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Standardizes one row.
#[must_use]
pub fn process_row(input: &RowInput<'_>, options: &StandardizeOptions) -> RowResult {
    let Some(address) = input.address else {
        return RowResult::not_updated();
    };

    let expanded = normalize_address_text(address);

    let standardized_state = standardize_state(input.state);
    let standardized_city = standardize_city(input.city);
    let standardized_zip = standardize_zip(input.zip);

    let parsed = if options.parse_components {
        parse_address(&expanded)
            .inspect_err(|e| log::debug!("Falling back to title case for '{expanded}': {e}"))
            .ok()
    } else {
        None
    };

    let (standardized_address, components) = match parsed {
        Some(mut components) => {
            override_with(&mut components.state, standardized_state.as_deref());
            override_with(&mut components.city, standardized_city.as_deref());
            override_with(&mut components.zip_code, standardized_zip.as_deref());
            (format_components(&components), Some(components))
        }
        None => (apa_title_case(&expanded), None),
    };

    let maps_url = maps_search_url(
        &options.maps_base_url,
        &standardized_address,
        standardized_state.as_deref(),
    );

    RowResult {
        standardized_address: Some(standardized_address),
        standardized_state,
        standardized_city,
        standardized_zip,
        components,
        maps_url: Some(maps_url),
        updated: true,
    }
}
